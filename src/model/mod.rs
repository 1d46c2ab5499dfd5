use geojson::{Geometry, Position, Value as GeoValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Backend ids are PostGIS `gid` integers
pub type RegionId = i64;

// Geographic point (latitude, longitude)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }
}

/// Latitude-first, four decimals: `(47.2000, 100.5000)`.
impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", fixed4(self.lat), fixed4(self.lng))
    }
}

// Four decimals with exact ties rounded away from zero, the way the page
// scripts print coordinates. `{:.4}` alone rounds ties to even.
fn fixed4(value: f64) -> String {
    let magnitude = value.abs();
    let units = (magnitude * 1e4).floor();
    // Exact product check: zero only when magnitude is precisely units + 0.5.
    let is_tie = magnitude.mul_add(2e4, -(2.0 * units + 1.0)) == 0.0;
    if !is_tie || units >= 2f64.powi(52) {
        return format!("{:.4}", value);
    }
    let units = units as u64 + 1;
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{}{}.{:04}", sign, units / 10_000, units % 10_000)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl GeoBounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        GeoBounds {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounding box of every position in a GeoJSON geometry. `None` when the
    /// geometry carries no positions.
    pub fn of_geometry(geometry: &Geometry) -> Option<GeoBounds> {
        let mut bounds: Option<GeoBounds> = None;
        visit_positions(&geometry.value, &mut |pos: &Position| {
            if pos.len() < 2 {
                return;
            }
            let (x, y) = (pos[0], pos[1]);
            bounds = Some(match bounds {
                None => GeoBounds::new(x, y, x, y),
                Some(b) => GeoBounds::new(b.min_x.min(x), b.min_y.min(y), b.max_x.max(x), b.max_y.max(y)),
            });
        });
        bounds
    }

    pub fn south_west(&self) -> GeoPoint {
        GeoPoint::new(self.min_y, self.min_x)
    }

    pub fn north_east(&self) -> GeoPoint {
        GeoPoint::new(self.max_y, self.max_x)
    }
}

fn visit_positions(value: &GeoValue, visit: &mut impl FnMut(&Position)) {
    match value {
        GeoValue::Point(pos) => visit(pos),
        GeoValue::MultiPoint(points) | GeoValue::LineString(points) => points.iter().for_each(|p| visit(p)),
        GeoValue::Polygon(rings) | GeoValue::MultiLineString(rings) => {
            rings.iter().flatten().for_each(|p| visit(p))
        }
        GeoValue::MultiPolygon(polygons) => polygons.iter().flatten().flatten().for_each(|p| visit(p)),
        GeoValue::GeometryCollection(geometries) => {
            for geometry in geometries {
                visit_positions(&geometry.value, visit);
            }
        }
    }
}

/// Point coordinates as the backend sends them, `[lon, lat]`. Any `type`
/// member next to `coordinates` is ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointCoordinates {
    pub coordinates: [f64; 2],
}

impl PointCoordinates {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.coordinates[1], self.coordinates[0])
    }
}

/// Top-level division (aimag).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub geometry: Geometry,
}

impl Region {
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::of_geometry(&self.geometry)
    }
}

/// Second-level division (sum).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubRegion {
    pub id: RegionId,
    pub sum_name: String,
    pub aimag_name: String,
    #[serde(default)]
    pub aimag_id: Option<RegionId>,
    pub geometry: Geometry,
    #[serde(default)]
    pub center: Option<PointCoordinates>,
}

impl SubRegion {
    pub fn center_point(&self) -> Option<GeoPoint> {
        self.center.as_ref().map(PointCoordinates::point)
    }
}

/// Entry of a region's drill-down list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubRegionSummary {
    pub id: RegionId,
    pub name: String,
    pub center: PointCoordinates,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchKind {
    #[serde(rename = "aimag")]
    Region,
    #[serde(rename = "sum")]
    SubRegion,
    #[serde(other)]
    Unknown,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Region => "aimag",
            SearchKind::SubRegion => "sum",
            SearchKind::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchKind::Region => "Аймаг",
            _ => "Сум",
        }
    }
}

impl FromStr for SearchKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "aimag" => SearchKind::Region,
            "sum" => SearchKind::SubRegion,
            _ => SearchKind::Unknown,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: RegionId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SearchKind,
    #[serde(default)]
    pub aimag_id: Option<RegionId>,
}

impl SearchResult {
    pub fn target(&self) -> Option<SelectionTarget> {
        SelectionTarget::from_kind(self.kind, self.id)
    }
}

/// What a result row or popup button points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionTarget {
    Region(RegionId),
    SubRegion(RegionId),
}

impl SelectionTarget {
    pub fn from_kind(kind: SearchKind, id: RegionId) -> Option<Self> {
        match kind {
            SearchKind::Region => Some(SelectionTarget::Region(id)),
            SearchKind::SubRegion => Some(SelectionTarget::SubRegion(id)),
            SearchKind::Unknown => None,
        }
    }
}
