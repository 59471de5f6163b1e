//! Self-contained Leaflet maps.
//!
//! A map is a list of layers rendered into a single HTML page. Leaflet and its
//! heat map and marker cluster plugins are loaded from a CDN; the data is
//! embedded as JSON.

use crate::domain::model::{GeoPoint, VANCOUVER};
use crate::utils::error::Result;
use serde::Serialize;

pub const DEFAULT_ZOOM: u8 = 12;

pub const CLUSTER_COLORS: [&str; 15] = [
    "red",
    "blue",
    "green",
    "purple",
    "orange",
    "darkred",
    "lightcoral",
    "cadetblue",
    "darkblue",
    "darkgreen",
    "darkviolet",
    "pink",
    "lightgreen",
    "beige",
    "black",
];

/// Colour for cluster `index`, cycling through the palette.
pub fn cluster_color(index: usize) -> &'static str {
    CLUSTER_COLORS[index % CLUSTER_COLORS.len()]
}

#[derive(Debug, Clone, Serialize)]
pub struct Pin {
    pub lat: f64,
    pub lon: f64,
    pub popup: String,
}

impl Pin {
    pub fn new(location: GeoPoint, popup: &str) -> Self {
        Self {
            lat: location.lat,
            lon: location.lon,
            popup: html_escape(popup),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dot {
    pub lat: f64,
    pub lon: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    Heat { points: Vec<[f64; 2]> },
    Pins { pins: Vec<Pin>, clustered: bool },
    Dots { dots: Vec<Dot>, radius: f64 },
}

impl Layer {
    pub fn heat<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Self {
        Layer::Heat {
            points: points.into_iter().map(|p| [p.lat, p.lon]).collect(),
        }
    }

    pub fn dots<'a>(points: impl IntoIterator<Item = &'a GeoPoint>, color: &str, radius: f64) -> Self {
        Layer::Dots {
            dots: points
                .into_iter()
                .map(|p| Dot {
                    lat: p.lat,
                    lon: p.lon,
                    color: color.to_string(),
                })
                .collect(),
            radius,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Layer::Heat { points } => points.len(),
            Layer::Pins { pins, .. } => pins.len(),
            Layer::Dots { dots, .. } => dots.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeafletMap {
    pub title: String,
    pub center: GeoPoint,
    pub zoom: u8,
    pub layers: Vec<Layer>,
}

impl LeafletMap {
    /// Empty map centred on Vancouver.
    pub fn vancouver(title: &str) -> Self {
        Self {
            title: title.to_string(),
            center: VANCOUVER,
            zoom: DEFAULT_ZOOM,
            layers: Vec::new(),
        }
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn to_html(&self) -> Result<String> {
        let layers = serde_json::to_string(&self.layers)?;
        Ok(PAGE_TEMPLATE
            .replace("__TITLE__", &html_escape(&self.title))
            .replace("__CENTER__", &format!("[{}, {}]", self.center.lat, self.center.lon))
            .replace("__ZOOM__", &self.zoom.to_string())
            // Popups are already escaped, so `<` cannot close the script element.
            .replace("__LAYERS__", &layers))
    }
}

pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>__TITLE__</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js"></script>
<script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>
<style>html, body, #map { width: 100%; height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map").setView(__CENTER__, __ZOOM__);
L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
  attribution: "&copy; OpenStreetMap contributors"
}).addTo(map);
var layers = __LAYERS__;
layers.forEach(function (layer) {
  if (layer.kind === "heat") {
    L.heatLayer(layer.points).addTo(map);
  } else if (layer.kind === "pins") {
    var group = layer.clustered ? L.markerClusterGroup() : L.featureGroup();
    layer.pins.forEach(function (pin) {
      group.addLayer(L.marker([pin.lat, pin.lon]).bindPopup(pin.popup));
    });
    group.addTo(map);
  } else if (layer.kind === "dots") {
    var dots = L.featureGroup();
    layer.dots.forEach(function (dot) {
      dots.addLayer(L.circleMarker([dot.lat, dot.lon], { radius: layer.radius, color: dot.color }));
    });
    dots.addTo(map);
  }
});
</script>
</body>
</html>
"#;
