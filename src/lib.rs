//! Web viewer for administrative boundaries: regions (aimags) and their
//! sub-regions (sums) on a Leaflet map, with debounced name search and a
//! single highlighted sub-region.

pub mod api;
pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod view;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::{Runtime, Viewer};
pub use config::ViewerConfig;
pub use error::{ViewerError, ViewerResult};
