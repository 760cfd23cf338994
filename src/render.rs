use serde_json::json;
use std::path::Path;

use crate::{entities::Coordinates, error::Error};

const DEFAULT_ZOOM: u8 = 15;

const RED_MARKER_ICON: &str = "https://raw.githubusercontent.com/pointhi/leaflet-color-markers/master/img/marker-icon-2x-red.png";
const GREEN_MARKER_ICON: &str = "https://raw.githubusercontent.com/pointhi/leaflet-color-markers/master/img/marker-icon-2x-green.png";

pub struct MapDocument {
    start: Coordinates,
    end: Coordinates,
    pois: Vec<Coordinates>,
    path: Vec<Coordinates>,
}

impl MapDocument {
    pub fn new(
        start: Coordinates,
        end: Coordinates,
        pois: Vec<Coordinates>,
        path: Vec<Coordinates>,
    ) -> Self {
        Self {
            start,
            end,
            pois,
            path,
        }
    }

    // View centers on the mean of the POI coordinates; with no POIs the
    // start point stands in so the division never sees a zero count.
    pub fn center(&self) -> Coordinates {
        if self.pois.is_empty() {
            return self.start;
        }

        let count = self.pois.len() as f64;
        let lat = self.pois.iter().map(|p| p.latitude).sum::<f64>() / count;
        let lon = self.pois.iter().map(|p| p.longitude).sum::<f64>() / count;

        Coordinates::new(lat, lon)
    }

    pub fn to_html(&self) -> String {
        let center = self.center();

        let mut script = String::new();

        script.push_str(&format!(
            "var map = L.map(\"map\").setView({}, {});\n",
            json!([center.latitude, center.longitude]),
            DEFAULT_ZOOM,
        ));
        script.push_str(
            "L.tileLayer(\"https://tile.openstreetmap.org/{z}/{x}/{y}.png\", \
             {attribution: \"&copy; OpenStreetMap contributors\"}).addTo(map);\n",
        );
        script.push_str(&format!(
            "var startIcon = L.icon({});\n",
            json!({"iconUrl": RED_MARKER_ICON, "iconSize": [25, 41], "iconAnchor": [12, 41]}),
        ));
        script.push_str(&format!(
            "var goalIcon = L.icon({});\n",
            json!({"iconUrl": GREEN_MARKER_ICON, "iconSize": [25, 41], "iconAnchor": [12, 41]}),
        ));

        script.push_str(&marker(
            &self.start,
            "Start (Higashi Maizuru Station)",
            Some("startIcon"),
        ));
        script.push_str(&marker(&self.end, "Goal (Red Brick Park)", Some("goalIcon")));

        for (i, poi) in self.pois.iter().enumerate() {
            let tooltip = format!("Point {}: ({}, {})", i, poi.latitude, poi.longitude);
            script.push_str(&marker(poi, &tooltip, None));
        }

        if !self.path.is_empty() {
            let latlons: Vec<[f64; 2]> = self
                .path
                .iter()
                .map(|p| [p.latitude, p.longitude])
                .collect();
            script.push_str(&format!(
                "L.polyline({}, {{color: \"blue\", weight: 4, opacity: 0.7}}).addTo(map);\n",
                json!(latlons),
            ));
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\"/>\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\"/>\n\
             <link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.css\"/>\n\
             <script src=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.js\"></script>\n\
             <style>html, body, #map {{ height: 100%; margin: 0; }}</style>\n\
             </head>\n<body>\n<div id=\"map\"></div>\n<script>\n{}</script>\n</body>\n</html>\n",
            script,
        )
    }

    #[tracing::instrument(skip(self))]
    pub async fn save(&self, path: &Path) -> Result<(), Error> {
        tokio::fs::write(path, self.to_html()).await?;

        Ok(())
    }
}

fn marker(position: &Coordinates, tooltip: &str, icon: Option<&str>) -> String {
    let options = match icon {
        Some(name) => format!("{{icon: {}}}", name),
        None => "{}".into(),
    };

    format!(
        "L.marker({}, {}).bindTooltip({}).addTo(map);\n",
        json!([position.latitude, position.longitude]),
        options,
        json!(tooltip),
    )
}

#[test]
fn places_a_marker_per_poi_plus_start_and_end() {
    let pois = vec![
        Coordinates::new(35.47, 135.40),
        Coordinates::new(35.48, 135.41),
    ];
    let document = MapDocument::new(
        Coordinates::new(35.46872450002604, 135.39500977773056),
        Coordinates::new(35.474763476187924, 135.38536802589823),
        pois,
        vec![],
    );

    let html = document.to_html();
    assert_eq!(html.matches("L.marker(").count(), 4);
    assert!(html.contains("Start (Higashi Maizuru Station)"));
    assert!(html.contains("Goal (Red Brick Park)"));
    assert!(html.contains("Point 0:"));
    assert!(html.contains("Point 1:"));
}

#[test]
fn empty_path_draws_no_polyline() {
    let document = MapDocument::new(
        Coordinates::new(35.46, 135.39),
        Coordinates::new(35.47, 135.38),
        vec![Coordinates::new(35.47, 135.40)],
        vec![],
    );

    assert!(!document.to_html().contains("L.polyline("));
}

#[test]
fn non_empty_path_draws_one_polyline() {
    let path = vec![
        Coordinates::new(35.46, 135.39),
        Coordinates::new(35.47, 135.40),
    ];
    let document = MapDocument::new(
        Coordinates::new(35.46, 135.39),
        Coordinates::new(35.47, 135.38),
        vec![Coordinates::new(35.47, 135.40)],
        path,
    );

    let html = document.to_html();
    assert_eq!(html.matches("L.polyline(").count(), 1);
    assert!(html.contains("\"blue\""));
}

#[test]
fn center_is_mean_of_pois() {
    let document = MapDocument::new(
        Coordinates::new(0.0, 0.0),
        Coordinates::new(1.0, 1.0),
        vec![
            Coordinates::new(35.47, 135.40),
            Coordinates::new(35.48, 135.41),
        ],
        vec![],
    );

    let center = document.center();
    assert!((center.latitude - 35.475).abs() < 1e-9);
    assert!((center.longitude - 135.405).abs() < 1e-9);
}

#[test]
fn center_without_pois_falls_back_to_start() {
    let start = Coordinates::new(35.46, 135.39);
    let document = MapDocument::new(start, Coordinates::new(35.47, 135.38), vec![], vec![]);

    assert_eq!(document.center(), start);
}
