//! Leaflet bindings and the [`MapSurface`] backed by them.
//!
//! Expects the page to load `leaflet.js` so that the global `L` exists.

use super::MapSurface;
use super::html::popup_html;
use crate::config::ViewerConfig;
use crate::engine::{OverlayFeature, OverlayKind, OverlayStyle};
use crate::error::{ViewerError, ViewerResult};
use crate::model::{GeoBounds, GeoPoint};
use js_sys::{Array, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    pub type Map;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn create_map(container_id: &str) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &Map, center: &Array, zoom: f64) -> Map;

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn fit_bounds(this: &Map, bounds: &Array) -> Map;

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &Map, layer: &Layer) -> Map;

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &Map, layer: &Layer) -> Map;

    pub type Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Layer, target: &JsValue) -> Layer;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &Layer, content: &str) -> Layer;

    #[wasm_bindgen(extends = Layer)]
    pub type LayerGroup;

    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    fn layer_group() -> LayerGroup;

    #[wasm_bindgen(method, js_name = clearLayers)]
    fn clear_layers(this: &LayerGroup) -> LayerGroup;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url_template: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(catch, js_namespace = L, js_name = geoJSON)]
    fn geo_json(data: &JsValue, options: &JsValue) -> Result<Layer, JsValue>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileOptions<'a> {
    attribution: &'a str,
    max_zoom: u8,
}

fn lat_lng(point: GeoPoint) -> Array {
    Array::of2(&JsValue::from_f64(point.lat), &JsValue::from_f64(point.lng))
}

fn as_layer(group: &LayerGroup) -> &Layer {
    group.as_ref()
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> ViewerResult<JsValue> {
    // Plain objects rather than ES Maps; Leaflet reads GeoJSON with property access.
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| ViewerError::Wasm(format!("Could not convert to JS: {}", e)))
}

pub struct LeafletSurface {
    map: Map,
    regions: LayerGroup,
    sub_regions: LayerGroup,
    highlight: LayerGroup,
}

impl LeafletSurface {
    /// Create the map in the configured container with its tile layer.
    pub fn new(config: &ViewerConfig) -> ViewerResult<Self> {
        let map = create_map(&config.elements.map).map_err(|e| {
            ViewerError::Wasm(format!("Map container {} not usable: {:?}", config.elements.map, e))
        })?;
        map.set_view(&lat_lng(config.initial_center()), config.initial_zoom as f64);

        let options = to_js(&TileOptions {
            attribution: &config.tile_attribution,
            max_zoom: config.max_zoom,
        })?;
        let target: &JsValue = map.as_ref();
        tile_layer(&config.tile_url, &options).add_to(target);

        Ok(LeafletSurface {
            map,
            regions: layer_group(),
            sub_regions: layer_group(),
            highlight: layer_group(),
        })
    }

    fn group(&self, kind: OverlayKind) -> &LayerGroup {
        match kind {
            OverlayKind::Regions => &self.regions,
            OverlayKind::SubRegions => &self.sub_regions,
            OverlayKind::Highlight => &self.highlight,
        }
    }

    fn feature_layer(feature: &OverlayFeature, style: &OverlayStyle) -> ViewerResult<Layer> {
        let data = to_js(&feature.geometry)?;
        let options = Object::new();
        Reflect::set(&options, &JsValue::from_str("style"), &to_js(style)?)
            .map_err(|e| ViewerError::Wasm(format!("{:?}", e)))?;
        let layer = geo_json(&data, &options)
            .map_err(|e| ViewerError::Wasm(format!("Invalid geometry for {}: {:?}", feature.id, e)))?;
        layer.bind_popup(&popup_html(&feature.popup));
        Ok(layer)
    }
}

impl MapSurface for LeafletSurface {
    fn show_overlay(&mut self, kind: OverlayKind) {
        self.map.add_layer(as_layer(self.group(kind)));
    }

    fn hide_overlay(&mut self, kind: OverlayKind) {
        self.map.remove_layer(as_layer(self.group(kind)));
    }

    fn clear_overlay(&mut self, kind: OverlayKind) {
        self.group(kind).clear_layers();
    }

    fn add_feature(&mut self, kind: OverlayKind, feature: &OverlayFeature, style: &OverlayStyle) {
        match Self::feature_layer(feature, style) {
            Ok(layer) => {
                let target: &JsValue = self.group(kind).as_ref();
                layer.add_to(target);
            }
            Err(err) => tracing::error!("Could not render feature {}: {}", feature.id, err),
        }
    }

    fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        self.map.set_view(&lat_lng(center), zoom as f64);
    }

    fn fit_bounds(&mut self, bounds: &GeoBounds) {
        let corners = Array::of2(&lat_lng(bounds.south_west()), &lat_lng(bounds.north_east()));
        self.map.fit_bounds(&corners);
    }
}
