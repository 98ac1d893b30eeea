//! Normalization of raw Overpass elements into ordered store lists.

use std::cmp::Ordering;

use crate::geo::{haversine_distance_meters, Coordinate};

use super::types::{NearbyStore, RawElement, StoreSource};

// == Normalize ==
/// Converts raw elements into stores sorted nearest first.
///
/// Elements without a non-blank `name` tag or without finite coordinates
/// (direct or via `center`) are dropped. Ties on distance are broken by
/// name, then id, so the output does not depend on upstream ordering.
pub fn normalize_elements(origin: Coordinate, elements: &[RawElement]) -> Vec<NearbyStore> {
    let mut stores: Vec<NearbyStore> = elements
        .iter()
        .filter_map(|element| normalize_element(origin, element))
        .collect();

    stores.sort_by(compare_stores);
    stores
}

fn normalize_element(origin: Coordinate, element: &RawElement) -> Option<NearbyStore> {
    let name = element.tag("name").map(str::trim).filter(|n| !n.is_empty())?;
    let position = element_position(element)?;

    Some(NearbyStore {
        id: format!("osm:{}:{}", element.element_type, element.id),
        name: name.to_owned(),
        address: format_address(element),
        lat: position.lat,
        lng: position.lng,
        source: StoreSource::Overpass,
        distance_meters: haversine_distance_meters(origin, position),
    })
}

fn element_position(element: &RawElement) -> Option<Coordinate> {
    let center = element.center.as_ref();
    let lat = element.lat.or_else(|| center.and_then(|c| c.lat))?;
    let lng = element.lon.or_else(|| center.and_then(|c| c.lon))?;

    Some(Coordinate::new(lat, lng)).filter(Coordinate::is_valid)
}

// == Address ==
/// Builds `"<housenumber> <street>, <city>, <state>, <postcode>"`, leaving
/// out blank parts without stray separators.
pub fn format_address(element: &RawElement) -> Option<String> {
    let part = |key: &str| element.tag(key).map(str::trim).filter(|v| !v.is_empty());

    let line1 = [part("addr:housenumber"), part("addr:street")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let line2 = [part("addr:city"), part("addr:state"), part("addr:postcode")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");

    let full = [line1, line2]
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if full.is_empty() {
        None
    } else {
        Some(full)
    }
}

// == Ordering ==
/// Total order: distance, then case-insensitive name, then raw name, then id.
pub fn compare_stores(a: &NearbyStore, b: &NearbyStore) -> Ordering {
    a.distance_meters
        .total_cmp(&b.distance_meters)
        .then_with(|| compare_names(&a.name, &b.name))
        .then_with(|| a.id.cmp(&b.id))
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::ElementCenter;
    use std::collections::HashMap;

    fn node(id: i64, lat: f64, lon: f64, tags: &[(&str, &str)]) -> RawElement {
        RawElement {
            element_type: "node".into(),
            id,
            lat: Some(lat),
            lon: Some(lon),
            center: None,
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_normalizes_and_sorts_deterministically() {
        let origin = Coordinate::new(0.0, 0.0);
        let elements = vec![
            node(2, 0.002, 0.0, &[("name", "B Store")]),
            node(
                1,
                0.001,
                0.0,
                &[
                    ("name", "A Store"),
                    ("addr:housenumber", "123"),
                    ("addr:street", "Main St"),
                    ("addr:city", "Town"),
                    ("addr:state", "CA"),
                    ("addr:postcode", "12345"),
                ],
            ),
        ];

        let stores = normalize_elements(origin, &elements);

        assert_eq!(stores.len(), 2);
        assert_eq!(stores[0].id, "osm:node:1");
        assert_eq!(stores[0].name, "A Store");
        assert_eq!(
            stores[0].address.as_deref(),
            Some("123 Main St, Town, CA, 12345")
        );
        assert_eq!(stores[1].id, "osm:node:2");
        assert_eq!(stores[1].name, "B Store");
        assert!(stores[0].distance_meters < stores[1].distance_meters);
    }

    #[test]
    fn test_skips_elements_without_name() {
        let origin = Coordinate::new(0.0, 0.0);
        let elements = vec![
            node(1, 0.001, 0.0, &[("shop", "supermarket")]),
            node(2, 0.001, 0.0, &[("name", "   ")]),
            node(3, 0.001, 0.0, &[("name", " Corner Shop ")]),
        ];

        let stores = normalize_elements(origin, &elements);
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].name, "Corner Shop");
    }

    #[test]
    fn test_uses_center_for_ways() {
        let origin = Coordinate::new(0.0, 0.0);
        let mut way = node(9, 0.0, 0.0, &[("name", "Market Hall")]);
        way.element_type = "way".into();
        way.lat = None;
        way.lon = None;
        way.center = Some(ElementCenter {
            lat: Some(0.003),
            lon: Some(0.0),
        });

        let stores = normalize_elements(origin, &[way]);
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].id, "osm:way:9");
        assert_eq!(stores[0].lat, 0.003);
    }

    #[test]
    fn test_skips_elements_without_position() {
        let origin = Coordinate::new(0.0, 0.0);
        let mut relation = node(4, 0.0, 0.0, &[("name", "Nowhere Foods")]);
        relation.lat = None;

        assert!(normalize_elements(origin, &[relation]).is_empty());
    }

    #[test]
    fn test_skips_out_of_range_positions() {
        let origin = Coordinate::new(0.0, 0.0);
        let elements = vec![
            node(1, 91.0, 0.0, &[("name", "Polar Grocer")]),
            node(2, 0.0, -181.0, &[("name", "Dateline Deli")]),
            node(3, f64::NAN, 0.0, &[("name", "Nan Market")]),
        ];

        assert!(normalize_elements(origin, &elements).is_empty());
    }

    #[test]
    fn test_ties_break_on_name_then_id() {
        let origin = Coordinate::new(0.0, 0.0);
        let elements = vec![
            node(3, 0.001, 0.0, &[("name", "beta")]),
            node(2, 0.001, 0.0, &[("name", "Alpha")]),
            node(1, 0.001, 0.0, &[("name", "beta")]),
        ];

        let ids: Vec<_> = normalize_elements(origin, &elements)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["osm:node:2", "osm:node:1", "osm:node:3"]);
    }

    #[test]
    fn test_address_omits_missing_parts() {
        let only_street = node(1, 0.0, 0.0, &[("addr:street", "Main St")]);
        assert_eq!(format_address(&only_street).as_deref(), Some("Main St"));

        let city_and_postcode = node(
            1,
            0.0,
            0.0,
            &[("addr:city", "Town"), ("addr:postcode", "12345")],
        );
        assert_eq!(
            format_address(&city_and_postcode).as_deref(),
            Some("Town, 12345")
        );

        let number_and_state = node(
            1,
            0.0,
            0.0,
            &[("addr:housenumber", "7"), ("addr:state", "CA")],
        );
        assert_eq!(format_address(&number_and_state).as_deref(), Some("7, CA"));

        let blank = node(1, 0.0, 0.0, &[("addr:city", "  ")]);
        assert_eq!(format_address(&blank), None);
    }
}
