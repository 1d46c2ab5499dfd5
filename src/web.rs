//! Browser entry point.

use crate::api::HttpRegionApi;
use crate::app::{Runtime, Viewer};
use crate::config::ViewerConfig;
use crate::error::{ViewerError, ViewerResult};
use crate::logging::init_logging;
use crate::view::dom::{self, DomPage};
use crate::view::leaflet::LeafletSurface;
use futures::future::LocalBoxFuture;
use gloo_timers::callback::Timeout;
use std::time::Duration;
use wasm_bindgen::prelude::*;

/// Page event loop: `spawn_local` tasks and `setTimeout` timers.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebRuntime;

impl Runtime for WebRuntime {
    type Timer = Timeout;

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn delay(&self, after: Duration, task: Box<dyn FnOnce()>) -> Timeout {
        let millis = u32::try_from(after.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task)
    }
}

pub type WebViewer = Viewer<HttpRegionApi, WebRuntime, LeafletSurface, DomPage>;

#[wasm_bindgen(start)]
fn start() {
    console_error_panic_hook::set_once();
}

fn parse_config(config: JsValue) -> ViewerResult<ViewerConfig> {
    if config.is_undefined() || config.is_null() {
        return Ok(ViewerConfig::default());
    }
    // A JSON string, e.g. the text of an inline `<script type="application/json">`.
    if let Some(json) = config.as_string() {
        return ViewerConfig::from_json_str(&json);
    }
    let config: ViewerConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| ViewerError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Boot the viewer. `config` is an optional plain object or JSON string
/// overriding [`ViewerConfig`] defaults.
#[wasm_bindgen(js_name = startViewer)]
pub fn start_viewer(config: JsValue) -> Result<(), JsValue> {
    let config = parse_config(config)?;
    if let Err(err) = init_logging(&config.log_level) {
        web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    }

    let map = LeafletSurface::new(&config)?;
    let page = DomPage::new(&config.elements)?;
    let api = HttpRegionApi::new(&config);
    let elements = config.elements.clone();

    let viewer = Viewer::new(config, api, WebRuntime, map, page);
    dom::bind_events(&viewer, &elements)?;
    tracing::info!(api = %viewer.config().api_base, "viewer started");
    viewer.spawn_start();
    Ok(())
}
