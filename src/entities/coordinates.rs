use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    // OpenRouteService and GeoJSON speak [lon, lat]
    pub fn to_lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl From<geo_types::Coord<f64>> for Coordinates {
    fn from(coord: geo_types::Coord<f64>) -> Self {
        Self {
            latitude: coord.y,
            longitude: coord.x,
        }
    }
}

#[test]
fn lon_lat_order_is_reversed() {
    let point = Coordinates::new(35.47, 135.40);
    assert_eq!(point.to_lon_lat(), [135.40, 35.47]);
}

#[test]
fn from_geo_coord() {
    let coord = geo_types::Coord {
        x: 135.40,
        y: 35.47,
    };
    let point = Coordinates::from(coord);
    assert_eq!(point, Coordinates::new(35.47, 135.40));
}
