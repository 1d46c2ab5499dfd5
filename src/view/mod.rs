pub mod html;

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod leaflet;

use crate::engine::{OverlayFeature, OverlayKind, OverlayStyle};
use crate::model::{GeoBounds, GeoPoint};

pub trait MapSurface {
    /// Put an overlay group on the map. Its features are untouched.
    fn show_overlay(&mut self, kind: OverlayKind);

    /// Take an overlay group off the map, keeping its features.
    fn hide_overlay(&mut self, kind: OverlayKind);

    fn clear_overlay(&mut self, kind: OverlayKind);

    fn add_feature(&mut self, kind: OverlayKind, feature: &OverlayFeature, style: &OverlayStyle);

    fn set_view(&mut self, center: GeoPoint, zoom: u8);

    fn fit_bounds(&mut self, bounds: &GeoBounds);
}

pub trait PageSurface {
    fn set_info_html(&mut self, html: &str);

    fn set_results_html(&mut self, html: &str);

    fn set_results_visible(&mut self, visible: bool);

    fn clear_search_input(&mut self);
}

/// Where a document click landed, relative to the search widgets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    SearchInput,
    ResultsPanel,
    Outside,
}
