//! Store data types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Upstream that produced a store record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreSource {
    Overpass,
}

// == Nearby Store ==
/// A grocery store near a query origin.
///
/// `id` is namespaced by source and upstream element (`osm:node:42`) and is
/// the upsert key for [`StoreRegistry`](super::StoreRegistry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyStore {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub source: StoreSource,
    pub distance_meters: f64,
}

/// Center point the provider reports for ways and relations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ElementCenter {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

// == Raw Element ==
/// One entry of an Overpass `elements` array, as received.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub id: i64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<ElementCenter>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl RawElement {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}
