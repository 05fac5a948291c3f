use js_sys::Reflect;
use serde::Deserialize;
use wasm_bindgen::JsValue;

use metric_map_shared::{DEFAULT_METRIC, MetricName};

pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";
pub const DEFAULT_CENTER_LAT: f64 = 20.0;
pub const DEFAULT_CENTER_LON: f64 = 0.0;
pub const DEFAULT_ZOOM: f64 = 2.0;
pub const MAX_ZOOM: f64 = 19.0;

/// Page-provided override object, e.g.
/// `window.__METRIC_MAP_CONFIG__ = { apiBase: "https://host", zoom: 3 }`.
pub const CONFIG_GLOBAL_KEY: &str = "__METRIC_MAP_CONFIG__";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    pub tile_url: String,
    pub attribution: String,
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
    /// Prefix for `/api/metric/...`; empty means same origin.
    pub api_base: String,
    pub default_metric: MetricName,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url: DEFAULT_TILE_URL.to_owned(),
            attribution: DEFAULT_ATTRIBUTION.to_owned(),
            center_lat: DEFAULT_CENTER_LAT,
            center_lon: DEFAULT_CENTER_LON,
            zoom: DEFAULT_ZOOM,
            api_base: String::new(),
            default_metric: DEFAULT_METRIC,
        }
    }
}

impl MapConfig {
    /// Defaults merged with the page's override object, if it set one.
    pub fn from_window() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let raw = match Reflect::get(window.as_ref(), &JsValue::from_str(CONFIG_GLOBAL_KEY)) {
            Ok(raw) if !raw.is_undefined() && !raw.is_null() => raw,
            _ => return Self::default(),
        };
        match serde_wasm_bindgen::from_value::<MapConfig>(raw) {
            Ok(config) => config.sanitized(),
            Err(e) => {
                web_sys::console::warn_1(
                    &format!("Ignoring invalid {CONFIG_GLOBAL_KEY}: {e}").into(),
                );
                Self::default()
            }
        }
    }

    pub fn sanitized(mut self) -> Self {
        if self.tile_url.trim().is_empty() {
            self.tile_url = DEFAULT_TILE_URL.to_owned();
        }
        self.center_lat = finite_or(self.center_lat, DEFAULT_CENTER_LAT).clamp(-90.0, 90.0);
        self.center_lon = finite_or(self.center_lon, DEFAULT_CENTER_LON).clamp(-180.0, 180.0);
        self.zoom = finite_or(self.zoom, DEFAULT_ZOOM).clamp(0.0, MAX_ZOOM);
        let trimmed_len = self.api_base.trim_end_matches('/').len();
        self.api_base.truncate(trimmed_len);
        self
    }

    pub fn metric_url(&self, metric: MetricName) -> String {
        format!("{}{}", self.api_base, metric.api_path())
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}
