use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;

use crate::{
    entities::Coordinates,
    error::{decode_error, invalid_input_error, missing_credential_error, upstream_error, Error},
};

const API_URL: &str = "https://api.openrouteservice.org/v2/directions/foot-walking";

// ORS encodes route geometries as precision-5 polylines
const GEOMETRY_PRECISION: u32 = 5;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DirectedRoute {
    geometry: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectedRoute>,
}

#[async_trait]
pub trait DirectionsProvider {
    async fn walking_route(
        &self,
        from: &Coordinates,
        to: &Coordinates,
    ) -> Result<Vec<Coordinates>, Error>;
}

#[derive(Clone, Debug)]
pub struct OrsClient {
    key: String,
    http: reqwest::Client,
}

impl OrsClient {
    pub fn new(key: String) -> Self {
        Self {
            key,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Result<Self, Error> {
        let key =
            env::var("ORS_API_KEY").map_err(|_| missing_credential_error("ORS_API_KEY"))?;

        Ok(Self::new(key))
    }
}

#[async_trait]
impl DirectionsProvider for OrsClient {
    #[tracing::instrument(skip(self))]
    async fn walking_route(
        &self,
        from: &Coordinates,
        to: &Coordinates,
    ) -> Result<Vec<Coordinates>, Error> {
        let res = self
            .http
            .post(API_URL)
            .header("Authorization", &self.key)
            .json(&serde_json::json!({
                "coordinates": [from.to_lon_lat(), to.to_lon_lat()],
            }))
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: DirectionsResponse = res.json().await?;
        let route = data.routes.first().ok_or_else(upstream_error)?;

        decode_geometry(&route.geometry)
    }
}

pub fn decode_geometry(geometry: &str) -> Result<Vec<Coordinates>, Error> {
    let line = polyline::decode_polyline(geometry, GEOMETRY_PRECISION).map_err(decode_error)?;

    Ok(line.into_iter().map(Coordinates::from).collect())
}

#[test]
fn from_env_fails_without_key() {
    env::remove_var("ORS_API_KEY");
    assert!(OrsClient::from_env().is_err());
}

#[test]
fn decodes_known_polyline() {
    let points = decode_geometry("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
    assert_eq!(points.len(), 3);
    assert!((points[0].latitude - 38.5).abs() < 1e-9);
    assert!((points[0].longitude - -120.2).abs() < 1e-9);
    assert!((points[2].latitude - 43.252).abs() < 1e-9);
}

#[test]
fn rejects_garbage_geometry() {
    assert!(decode_geometry("\u{1}").is_err());
}

#[test]
fn parses_directions_response() {
    let raw = r#"{"routes":[{"summary":{"distance":1207.1},"geometry":"_p~iF~ps|U_ulLnnqC"}],"metadata":{}}"#;
    let data: DirectionsResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(data.routes.len(), 1);
    assert_eq!(data.routes[0].geometry, "_p~iF~ps|U_ulLnnqC");
}
