use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::{
    entities::{BoundingBox, Coordinates, Tag},
    error::{upstream_error, Error},
};

const DEFAULT_API_URL: &str = "http://overpass-api.de/api/interpreter";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Query area around Maizuru
pub const SEARCH_BOX: BoundingBox = BoundingBox::new(
    35.44880977985438,
    135.35154309496215,
    35.498076744854764,
    135.44095761784553,
);

#[derive(Clone, Debug, Serialize, Deserialize)]
struct OverpassElement {
    lat: f64,
    lon: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

fn api_url() -> String {
    env::var("OVERPASS_URL").unwrap_or_else(|_| DEFAULT_API_URL.into())
}

pub fn node_query(tag: &Tag, bbox: &BoundingBox) -> String {
    format!(
        "[out:json];\nnode[{}={}]({});\nout body;",
        tag.key, tag.value, bbox
    )
}

#[tracing::instrument]
pub async fn find_nodes(tag: &Tag) -> Result<Vec<Coordinates>, Error> {
    let query = node_query(tag, &SEARCH_BOX);

    let res = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?
        .post(api_url())
        .form(&[("data", query)])
        .send()
        .await?;

    if !res.status().is_success() {
        tracing::error!(status = res.status().as_u16(), "overpass request failed");
        return Err(upstream_error());
    }

    let data: OverpassResponse = res.json().await?;

    Ok(data
        .elements
        .into_iter()
        .map(|el| Coordinates::new(el.lat, el.lon))
        .collect())
}

#[test]
fn query_contains_tag_and_bbox() {
    let query = node_query(&Tag::new("amenity", "cafe"), &SEARCH_BOX);
    assert!(query.contains("node[amenity=cafe]"));
    assert!(query.contains("35.44880977985438"));
    assert!(query.contains("135.44095761784553"));
    assert!(query.starts_with("[out:json];"));
}

#[test]
fn parses_elements() {
    let raw = r#"{"version":0.6,"elements":[{"type":"node","id":1,"lat":35.47,"lon":135.40},{"type":"node","id":2,"lat":35.48,"lon":135.41}]}"#;
    let data: OverpassResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(data.elements.len(), 2);
    assert_eq!(data.elements[0].lat, 35.47);
}

#[test]
fn missing_elements_parses_as_empty() {
    let data: OverpassResponse = serde_json::from_str(r#"{"version":0.6}"#).unwrap();
    assert!(data.elements.is_empty());
}
