//! Integration tests for the Nominatim and Overpass clients using wiremock
//! HTTP mocks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use nearby_grocer::geocoding::{GeocodeResult, GeocodingErrorCode, NominatimClient};
use nearby_grocer::stores::{NearbyQuery, OverpassClient, StoreFetchError};
use nearby_grocer::throttle::Throttler;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_AGENT: &str = "grocer-test/1.0";

fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client construction should not fail")
}

fn nominatim(base_url: &str, throttle_ms: u64) -> NominatimClient {
    NominatimClient::new(
        http(),
        base_url,
        USER_AGENT,
        Arc::new(Throttler::from_millis("nominatim", throttle_ms)),
    )
    .expect("valid base url")
}

fn overpass(server: &MockServer, throttle_ms: u64) -> OverpassClient {
    OverpassClient::new(
        http(),
        &format!("{}/api/interpreter", server.uri()),
        USER_AGENT,
        Arc::new(Throttler::from_millis("overpass", throttle_ms)),
    )
    .expect("valid endpoint")
}

// == Nominatim ==

#[tokio::test]
async fn geocode_parses_first_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("format", "jsonv2"))
        .and(query_param("limit", "1"))
        .and(query_param("q", "1600 Amphitheatre Parkway"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "lat": "37.4220", "lon": "-122.0841", "display_name": "Test Place" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = nominatim(&server.uri(), 1);
    let result = client
        .geocode("1600 Amphitheatre Parkway")
        .await
        .expect("should geocode");

    assert_eq!(
        result,
        GeocodeResult {
            lat: 37.422,
            lng: -122.0841,
            display_name: Some("Test Place".into()),
        }
    );
}

#[tokio::test]
async fn geocode_empty_list_is_no_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = nominatim(&server.uri(), 1)
        .geocode("nowhere")
        .await
        .expect_err("should fail");

    assert_eq!(err.code(), GeocodingErrorCode::NoResults);
}

#[tokio::test]
async fn geocode_non_success_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = nominatim(&server.uri(), 1)
        .geocode("Seattle")
        .await
        .expect_err("should fail");

    assert_eq!(err.code(), GeocodingErrorCode::UpstreamError);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
}

#[tokio::test]
async fn geocode_unexpected_shape_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;

    let err = nominatim(&server.uri(), 1)
        .geocode("Seattle")
        .await
        .expect_err("should fail");

    assert_eq!(err.code(), GeocodingErrorCode::InvalidResponse);
}

#[tokio::test]
async fn geocode_non_json_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = nominatim(&server.uri(), 1)
        .geocode("Seattle")
        .await
        .expect_err("should fail");

    assert_eq!(err.code(), GeocodingErrorCode::InvalidResponse);
}

#[tokio::test]
async fn geocode_requests_are_spaced_by_throttle_interval() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "lat": "1", "lon": "2" }
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let client = nominatim(&server.uri(), 200);

    let start = Instant::now();
    client.geocode("first query").await.expect("first call");
    client.geocode("second query").await.expect("second call");

    assert!(start.elapsed() >= Duration::from_millis(200));
}

// == Overpass ==

fn overpass_body() -> serde_json::Value {
    json!({
        "elements": [
            { "type": "node", "id": 2, "lat": 0.002, "lon": 0.0, "tags": { "name": "B Store" } },
            { "type": "node", "id": 3, "lat": 0.0005, "lon": 0.0, "tags": { "shop": "convenience" } },
            {
                "type": "node", "id": 1, "lat": 0.001, "lon": 0.0,
                "tags": { "name": "A Store", "addr:housenumber": "123", "addr:street": "Main St" }
            },
            { "type": "way", "id": 4, "center": { "lat": 0.003, "lon": 0.0 }, "tags": { "name": "C Market" } }
        ]
    })
}

#[tokio::test]
async fn fetch_returns_sorted_normalized_stores() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .and(header("user-agent", USER_AGENT))
        .and(body_string_contains("supermarket"))
        .and(body_string_contains("greengrocer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overpass_body()))
        .expect(1)
        .mount(&server)
        .await;

    let stores = overpass(&server, 1)
        .fetch_nearby_stores(&NearbyQuery::new(0.0, 0.0))
        .await;

    let ids: Vec<_> = stores.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["osm:node:1", "osm:node:2", "osm:way:4"]);
    assert_eq!(stores[0].address.as_deref(), Some("123 Main St"));
    assert!(stores.windows(2).all(|w| w[0].distance_meters <= w[1].distance_meters));
}

#[tokio::test]
async fn fetch_truncates_to_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overpass_body()))
        .mount(&server)
        .await;

    let mut query = NearbyQuery::new(0.0, 0.0);
    query.limit = Some(2);
    query.radius_meters = Some(800);

    let stores = overpass(&server, 1).fetch_nearby_stores(&query).await;
    assert_eq!(stores.len(), 2);
    assert_eq!(stores[0].id, "osm:node:1");
}

#[tokio::test]
async fn fetch_upstream_failure_yields_empty_list() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = overpass(&server, 1);
    let query = NearbyQuery::new(47.61, -122.33);

    assert!(client.fetch_nearby_stores(&query).await.is_empty());

    let err = client
        .try_fetch_nearby_stores(&query)
        .await
        .expect_err("should report the failure");
    match err {
        StoreFetchError::UpstreamStatus { status, body } => {
            assert_eq!(status.as_u16(), 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn fetch_missing_elements_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "remark": "timeout" })))
        .mount(&server)
        .await;

    let stores = overpass(&server, 1)
        .try_fetch_nearby_stores(&NearbyQuery::new(0.0, 0.0))
        .await
        .expect("a payload without elements is not a failure");
    assert!(stores.is_empty());
}

#[tokio::test]
async fn fetch_requests_are_spaced_by_throttle_interval() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "elements": [] })))
        .expect(3)
        .mount(&server)
        .await;

    let client = overpass(&server, 100);
    let query = NearbyQuery::new(0.0, 0.0);

    let start = Instant::now();
    let (a, b, c) = tokio::join!(
        client.fetch_nearby_stores(&query),
        client.fetch_nearby_stores(&query),
        client.fetch_nearby_stores(&query),
    );

    assert!(a.is_empty() && b.is_empty() && c.is_empty());
    assert!(start.elapsed() >= Duration::from_millis(200));
}
