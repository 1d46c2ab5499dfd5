// Buttons and rows carry data-* attributes instead of inline handlers.

use crate::engine::layers::Popup;
use crate::engine::{NO_RESULTS_TEXT, PopupAction};
use crate::model::{GeoPoint, RegionId, SearchKind, SearchResult, SelectionTarget, SubRegion, SubRegionSummary};
use std::fmt::Write;

pub const ACTION_ATTR: &str = "data-action";
pub const ID_ATTR: &str = "data-id";
pub const RESULT_KIND_ATTR: &str = "data-result-kind";

const DRILL_DOWN: &str = "drill-down";
const HIGHLIGHT: &str = "highlight";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn popup_html(popup: &Popup) -> String {
    let mut html = popup
        .fields
        .iter()
        .map(|(label, value)| format!("<strong>{}:</strong> {}", label, escape(value)))
        .collect::<Vec<_>>()
        .join("<br>");

    if let Some(action) = popup.action {
        let (name, id) = match action {
            PopupAction::DrillDown(id) => (DRILL_DOWN, id),
            PopupAction::Highlight(id) => (HIGHLIGHT, id),
        };
        let _ = write!(
            html,
            r#"<br><button type="button" {}="{}" {}="{}">{}</button>"#,
            ACTION_ATTR,
            name,
            ID_ATTR,
            id,
            action.label()
        );
    }
    html
}

pub fn parse_popup_action(action: &str, id: &str) -> Option<PopupAction> {
    let id: RegionId = id.trim().parse().ok()?;
    match action {
        DRILL_DOWN => Some(PopupAction::DrillDown(id)),
        HIGHLIGHT => Some(PopupAction::Highlight(id)),
        _ => None,
    }
}

pub fn results_html(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!(r#"<div class="search-result-item">{}</div>"#, NO_RESULTS_TEXT);
    }

    results
        .iter()
        .map(|result| {
            format!(
                r#"<div class="search-result-item" {}="{}" {}="{}">{}<span class="type">{}</span></div>"#,
                RESULT_KIND_ATTR,
                result.kind.as_str(),
                ID_ATTR,
                result.id,
                escape(&result.name),
                result.kind.label()
            )
        })
        .collect()
}

pub fn parse_result_target(kind: &str, id: &str) -> Option<SelectionTarget> {
    let id: RegionId = id.trim().parse().ok()?;
    let kind: SearchKind = kind.parse().ok()?;
    SelectionTarget::from_kind(kind, id)
}

/// Drill-down listing: region name, then `<name> - Төв: (lat, lng)` per entry.
pub fn drill_down_html(region_name: Option<&str>, entries: &[SubRegionSummary]) -> String {
    let mut html = format!(
        "<strong>Аймаг:</strong> {}<br><br><strong>Сумууд:</strong><br>",
        escape(region_name.unwrap_or("Unknown"))
    );
    html.push_str(r#"<ul style="margin-left: 20px; margin-top: 5px;">"#);
    for entry in entries {
        let _ = write!(
            html,
            "<li>{} - Төв: {}</li>",
            escape(&entry.name),
            entry.center.point()
        );
    }
    html.push_str("</ul>");
    html
}

pub fn selection_html(sub: &SubRegion, center: GeoPoint) -> String {
    format!(
        "<strong>Сонгогдсон сум:</strong> {}<br><strong>Аймаг:</strong> {}<br><strong>Төвийн координат:</strong> {}",
        escape(&sub.sum_name),
        escape(&sub.aimag_name),
        center
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::OverlayFeature;
    use crate::model::{PointCoordinates, Region};
    use geojson::{Geometry, Value as GeoValue};

    #[test]
    fn no_results_placeholder() {
        let html = results_html(&[]);
        assert_eq!(html.matches("search-result-item").count(), 1);
        assert!(html.contains("Илэрц олдсонгүй"));
        assert!(!html.contains(RESULT_KIND_ATTR));
    }

    #[test]
    fn result_rows_are_tagged() {
        let html = results_html(&[
            SearchResult {
                id: 3,
                name: "Төв".to_string(),
                kind: SearchKind::Region,
                aimag_id: None,
            },
            SearchResult {
                id: 41,
                name: "Зуунмод, Төв".to_string(),
                kind: SearchKind::SubRegion,
                aimag_id: Some(3),
            },
        ]);
        assert!(html.contains(r#"data-result-kind="aimag" data-id="3">Төв<span class="type">Аймаг</span>"#));
        assert!(html.contains(r#"data-result-kind="sum" data-id="41">"#));
        assert_eq!(parse_result_target("aimag", "3"), Some(SelectionTarget::Region(3)));
        assert_eq!(parse_result_target("sum", "41"), Some(SelectionTarget::SubRegion(41)));
        assert_eq!(parse_result_target("district", "41"), None);
        assert_eq!(parse_result_target("sum", "x"), None);
    }

    #[test]
    fn drill_down_lists_latitude_first() {
        let html = drill_down_html(
            Some("Төв"),
            &[SubRegionSummary {
                id: 1,
                name: "A".to_string(),
                center: PointCoordinates {
                    coordinates: [100.5, 47.2],
                },
            }],
        );
        assert!(html.contains("<li>A - Төв: (47.2000, 100.5000)</li>"));
        assert!(html.starts_with("<strong>Аймаг:</strong> Төв"));
        assert!(drill_down_html(None, &[]).contains("Unknown"));
    }

    #[test]
    fn region_popup_round_trips_action() {
        let region = Region {
            id: 5,
            name: "Төв <b>".to_string(),
            geometry: Geometry::new(GeoValue::Point(vec![106.0, 47.0])),
        };
        let html = popup_html(&OverlayFeature::region(&region).popup);
        assert!(html.contains("Төв &lt;b&gt;"));
        assert!(html.contains(r#"data-action="drill-down" data-id="5">Сумуудыг харуулах</button>"#));
        assert_eq!(parse_popup_action("drill-down", "5"), Some(PopupAction::DrillDown(5)));
        assert_eq!(parse_popup_action("highlight", " 9 "), Some(PopupAction::Highlight(9)));
        assert_eq!(parse_popup_action("delete", "9"), None);
    }

    #[test]
    fn selection_panel_text() {
        let sub = SubRegion {
            id: 12,
            sum_name: "Зуунмод".to_string(),
            aimag_name: "Төв".to_string(),
            aimag_id: None,
            geometry: Geometry::new(GeoValue::Point(vec![106.95, 47.71])),
            center: None,
        };
        let html = selection_html(&sub, GeoPoint::new(47.71, 106.95));
        assert_eq!(
            html,
            "<strong>Сонгогдсон сум:</strong> Зуунмод<br><strong>Аймаг:</strong> Төв<br><strong>Төвийн координат:</strong> (47.7100, 106.9500)"
        );
    }
}
