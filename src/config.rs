//! Viewer configuration.
//!
//! Every field has a default matching the stock page layout, so the page can
//! boot with `start_viewer(undefined)` or override only what differs, e.g.
//! `start_viewer({ api_base: "https://gis.example/api" })`.

use crate::engine::layers::OverlayStyles;
use crate::error::{ViewerError, ViewerResult};
use crate::model::GeoPoint;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub api_base: String,
    /// Server root for `/health`; derived from `api_base` when unset.
    pub health_url: Option<String>,
    pub initial_center: [f64; 2],
    pub initial_zoom: u8,
    pub highlight_zoom: u8,
    pub max_zoom: u8,
    pub tile_url: String,
    pub tile_attribution: String,
    pub search_debounce_ms: u32,
    pub min_query_chars: usize,
    pub log_level: String,
    pub elements: ElementIds,
    pub styles: OverlayStyles,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub map: String,
    pub search_input: String,
    pub search_results: String,
    pub info_content: String,
    pub region_toggle: String,
    pub sub_region_toggle: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        ElementIds {
            map: "map".to_string(),
            search_input: "searchInput".to_string(),
            search_results: "searchResults".to_string(),
            info_content: "infoContent".to_string(),
            region_toggle: "layer1".to_string(),
            sub_region_toggle: "layer2".to_string(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            api_base: "http://localhost:5001/api".to_string(),
            health_url: None,
            // Mongolia
            initial_center: [46.8625, 103.8467],
            initial_zoom: 6,
            highlight_zoom: 10,
            max_zoom: 19,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            tile_attribution: "© OpenStreetMap contributors".to_string(),
            search_debounce_ms: 300,
            min_query_chars: 2,
            log_level: "info".to_string(),
            elements: ElementIds::default(),
            styles: OverlayStyles::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> ViewerResult<Self> {
        let config: ViewerConfig =
            serde_json::from_str(json).map_err(|e| ViewerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ViewerResult<()> {
        if self.api_base.trim().is_empty() {
            return Err(ViewerError::Config("api_base cannot be empty".to_string()));
        }
        if self.min_query_chars == 0 {
            return Err(ViewerError::Config(
                "min_query_chars must be at least 1".to_string(),
            ));
        }
        if self.initial_zoom > self.max_zoom || self.highlight_zoom > self.max_zoom {
            return Err(ViewerError::Config(format!(
                "zoom levels cannot exceed max_zoom {}",
                self.max_zoom
            )));
        }
        if !self.initial_center().is_valid() {
            return Err(ViewerError::Config(
                "initial_center is not a valid [lat, lng] pair".to_string(),
            ));
        }
        Ok(())
    }

    pub fn initial_center(&self) -> GeoPoint {
        GeoPoint::new(self.initial_center[0], self.initial_center[1])
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms as u64)
    }

    /// `api_base` without a trailing slash.
    pub fn api_root(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    /// `/health` lives at the server root, next to the `/api` prefix.
    pub fn health_endpoint(&self) -> String {
        if let Some(url) = &self.health_url {
            return url.clone();
        }
        let root = self.api_root();
        let server = root.strip_suffix("/api").unwrap_or(root);
        format!("{}/health", server)
    }
}
