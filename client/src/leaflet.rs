//! Bindings to the subset of Leaflet 1.9 (global `L`) the metric view needs,
//! and the [`MapSurface`] implementation on top of them.

use js_sys::{Array, Reflect};
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

use metric_map_shared::{MarkerSpec, TooltipStyle};

use crate::config::MapConfig;
use crate::view::MapSurface;

#[wasm_bindgen]
extern "C" {
    pub type Map;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn new_map(container: &web_sys::HtmlElement) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &Map, center: &JsValue, zoom: f64);

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &Map, layer: &Layer);

    pub type Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Layer, map: &Map);

    #[wasm_bindgen(extends = Layer)]
    pub type TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url_template: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen(extends = Layer)]
    pub type LayerGroup;

    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    fn layer_group() -> LayerGroup;

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &LayerGroup, layer: &Layer);

    #[wasm_bindgen(extends = Layer)]
    pub type Marker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn marker(lat_lng: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &Marker, html: &str);

    #[wasm_bindgen(method, js_name = bindTooltip)]
    fn bind_tooltip(this: &Marker, text: &str, options: &JsValue);
}

#[derive(Serialize)]
struct TileLayerOptions<'a> {
    attribution: &'a str,
}

fn lat_lng(lat: f64, lon: f64) -> JsValue {
    Array::of2(&JsValue::from_f64(lat), &JsValue::from_f64(lon)).into()
}

/// True once the Leaflet script has defined `window.L`.
pub fn leaflet_loaded() -> bool {
    Reflect::has(&js_sys::global(), &JsValue::from_str("L")).unwrap_or(false)
}

pub struct LeafletSurface {
    map: Map,
    tooltip_options: JsValue,
}

impl LeafletSurface {
    /// Create the map in `container` at the configured viewport and add the base tile layer.
    pub fn mount(container: &web_sys::HtmlElement, config: &MapConfig) -> Result<Self, String> {
        if !leaflet_loaded() {
            return Err("Leaflet is not loaded (window.L is undefined)".into());
        }
        let map = new_map(container).map_err(|e| format!("L.map failed: {e:?}"))?;
        map.set_view(&lat_lng(config.center_lat, config.center_lon), config.zoom);

        let tile_options = serde_wasm_bindgen::to_value(&TileLayerOptions {
            attribution: &config.attribution,
        })
        .map_err(|e| format!("tile layer options: {e}"))?;
        tile_layer(&config.tile_url, &tile_options).add_to(&map);

        let tooltip_options = serde_wasm_bindgen::to_value(&TooltipStyle::default())
            .map_err(|e| format!("tooltip options: {e}"))?;

        Ok(Self {
            map,
            tooltip_options,
        })
    }
}

impl MapSurface for LeafletSurface {
    type Layer = LayerGroup;

    fn build_layer(&mut self, markers: &[MarkerSpec]) -> LayerGroup {
        let group = layer_group();
        for spec in markers {
            let point = marker(&lat_lng(spec.lat, spec.lon));
            point.bind_popup(&spec.popup_html);
            point.bind_tooltip(&spec.tooltip, &self.tooltip_options);
            group.add_layer(&point);
        }
        group
    }

    fn attach_layer(&mut self, layer: &LayerGroup) {
        layer.add_to(&self.map);
    }

    fn detach_layer(&mut self, layer: &LayerGroup) {
        self.map.remove_layer(layer);
    }
}
