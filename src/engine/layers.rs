use crate::model::{Region, RegionId, SubRegion};
use crate::view::MapSurface;
use geojson::Geometry;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Regions,
    SubRegions,
    Highlight,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 3] = [
        OverlayKind::Regions,
        OverlayKind::SubRegions,
        OverlayKind::Highlight,
    ];

    fn index(self) -> usize {
        match self {
            OverlayKind::Regions => 0,
            OverlayKind::SubRegions => 1,
            OverlayKind::Highlight => 2,
        }
    }
}

/// Path options handed to the map widget as-is, hence the camelCase names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStyle {
    pub color: String,
    pub weight: f64,
    pub fill_color: String,
    pub fill_opacity: f64,
}

impl OverlayStyle {
    pub fn new(color: &str, weight: f64, fill_opacity: f64) -> Self {
        OverlayStyle {
            color: color.to_string(),
            weight,
            fill_color: color.to_string(),
            fill_opacity,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyles {
    pub regions: OverlayStyle,
    pub sub_regions: OverlayStyle,
    pub highlight: OverlayStyle,
}

impl Default for OverlayStyles {
    fn default() -> Self {
        OverlayStyles {
            regions: OverlayStyle::new("#3388ff", 2.0, 0.1),
            sub_regions: OverlayStyle::new("#ff7800", 1.0, 0.05),
            highlight: OverlayStyle::new("#ff0000", 3.0, 0.3),
        }
    }
}

impl OverlayStyles {
    pub fn for_kind(&self, kind: OverlayKind) -> &OverlayStyle {
        match kind {
            OverlayKind::Regions => &self.regions,
            OverlayKind::SubRegions => &self.sub_regions,
            OverlayKind::Highlight => &self.highlight,
        }
    }
}

/// Button carried by a feature popup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopupAction {
    /// List a region's sub-regions in the info panel.
    DrillDown(RegionId),
    /// Run the highlight flow for a sub-region.
    Highlight(RegionId),
}

impl PopupAction {
    pub fn label(&self) -> &'static str {
        match self {
            PopupAction::DrillDown(_) => "Сумуудыг харуулах",
            PopupAction::Highlight(_) => "Сонгох",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Popup {
    pub fields: Vec<(&'static str, String)>,
    pub action: Option<PopupAction>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayFeature {
    pub id: RegionId,
    pub geometry: Geometry,
    pub popup: Popup,
}

impl OverlayFeature {
    pub fn region(region: &Region) -> Self {
        OverlayFeature {
            id: region.id,
            geometry: region.geometry.clone(),
            popup: Popup {
                fields: vec![("Аймаг", region.name.clone())],
                action: Some(PopupAction::DrillDown(region.id)),
            },
        }
    }

    pub fn sub_region(sub: &SubRegion) -> Self {
        OverlayFeature {
            id: sub.id,
            geometry: sub.geometry.clone(),
            popup: Popup {
                fields: vec![("Сум", sub.sum_name.clone()), ("Аймаг", sub.aimag_name.clone())],
                action: Some(PopupAction::Highlight(sub.id)),
            },
        }
    }

    pub fn highlight(sub: &SubRegion) -> Self {
        let mut feature = Self::sub_region(sub);
        feature.popup.action = None;
        feature
    }
}

#[derive(Debug)]
struct Overlay {
    features: Vec<OverlayFeature>,
    visible: bool,
}

/// The three overlay groups. Contents and visibility are tracked here; the
/// map surface only mirrors them.
#[derive(Debug)]
pub struct LayerManager {
    overlays: [Overlay; 3],
    styles: OverlayStyles,
}

impl LayerManager {
    pub fn new(styles: OverlayStyles) -> Self {
        LayerManager {
            overlays: std::array::from_fn(|_| Overlay {
                features: Vec::new(),
                visible: true,
            }),
            styles,
        }
    }

    /// Put every visible group on the map.
    pub fn attach(&self, surface: &mut impl MapSurface) {
        for kind in OverlayKind::ALL {
            if self.is_visible(kind) {
                surface.show_overlay(kind);
            }
        }
    }

    /// Clear-then-add; never an incremental update.
    pub fn replace_features(
        &mut self,
        kind: OverlayKind,
        features: Vec<OverlayFeature>,
        surface: &mut impl MapSurface,
    ) {
        surface.clear_overlay(kind);
        let style = self.styles.for_kind(kind);
        for feature in &features {
            surface.add_feature(kind, feature, style);
        }
        self.overlays[kind.index()].features = features;
    }

    pub fn show_regions(&mut self, regions: &[Region], surface: &mut impl MapSurface) {
        let features = regions.iter().map(OverlayFeature::region).collect();
        self.replace_features(OverlayKind::Regions, features, surface);
    }

    pub fn show_sub_regions(&mut self, sub_regions: &[SubRegion], surface: &mut impl MapSurface) {
        let features = sub_regions.iter().map(OverlayFeature::sub_region).collect();
        self.replace_features(OverlayKind::SubRegions, features, surface);
    }

    pub fn replace_highlight(&mut self, sub: &SubRegion, surface: &mut impl MapSurface) {
        self.replace_features(OverlayKind::Highlight, vec![OverlayFeature::highlight(sub)], surface);
    }

    /// Returns whether visibility changed. Features are kept either way.
    pub fn set_visible(
        &mut self,
        kind: OverlayKind,
        visible: bool,
        surface: &mut impl MapSurface,
    ) -> bool {
        let overlay = &mut self.overlays[kind.index()];
        if overlay.visible == visible {
            return false;
        }
        overlay.visible = visible;
        if visible {
            surface.show_overlay(kind);
        } else {
            surface.hide_overlay(kind);
        }
        true
    }

    pub fn is_visible(&self, kind: OverlayKind) -> bool {
        self.overlays[kind.index()].visible
    }

    pub fn features(&self, kind: OverlayKind) -> &[OverlayFeature] {
        &self.overlays[kind.index()].features
    }
}
