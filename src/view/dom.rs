//! DOM panels and event wiring.

use super::html::{ACTION_ATTR, ID_ATTR, RESULT_KIND_ATTR, parse_popup_action, parse_result_target};
use super::{ClickTarget, PageSurface};
use crate::config::ElementIds;
use crate::engine::OverlayKind;
use crate::error::{ViewerError, ViewerResult};
use crate::web::WebViewer;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement, Node};

const ACTIVE_CLASS: &str = "active";

fn document() -> ViewerResult<Document> {
    web_sys::window()
        .ok_or_else(|| ViewerError::Wasm("No window".to_string()))?
        .document()
        .ok_or_else(|| ViewerError::Wasm("No document".to_string()))
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> ViewerResult<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| ViewerError::Wasm(format!("Element {} not found", id)))?
        .dyn_into::<T>()
        .map_err(|_| ViewerError::Wasm(format!("Element {} has the wrong type", id)))
}

/// Search input, result dropdown and info panel.
pub struct DomPage {
    input: HtmlInputElement,
    results: HtmlElement,
    info: HtmlElement,
}

impl DomPage {
    pub fn new(ids: &ElementIds) -> ViewerResult<Self> {
        let document = document()?;
        Ok(DomPage {
            input: element_by_id(&document, &ids.search_input)?,
            results: element_by_id(&document, &ids.search_results)?,
            info: element_by_id(&document, &ids.info_content)?,
        })
    }
}

impl PageSurface for DomPage {
    fn set_info_html(&mut self, html: &str) {
        self.info.set_inner_html(html);
    }

    fn set_results_html(&mut self, html: &str) {
        self.results.set_inner_html(html);
    }

    fn set_results_visible(&mut self, visible: bool) {
        let classes = self.results.class_list();
        let toggled = if visible {
            classes.add_1(ACTIVE_CLASS)
        } else {
            classes.remove_1(ACTIVE_CLASS)
        };
        if let Err(err) = toggled {
            tracing::error!("Could not toggle result panel: {:?}", err);
        }
    }

    fn clear_search_input(&mut self) {
        self.input.set_value("");
    }
}

fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    capture: bool,
    handler: impl FnMut(Event) + 'static,
) -> ViewerResult<()> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback_and_bool(event, closure.as_ref().unchecked_ref(), capture)
        .map_err(|e| ViewerError::Wasm(format!("Could not listen for {}: {:?}", event, e)))?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

/// Attach the search, checkbox and document click listeners.
pub fn bind_events(viewer: &WebViewer, ids: &ElementIds) -> ViewerResult<()> {
    let document = document()?;
    let input: HtmlInputElement = element_by_id(&document, &ids.search_input)?;
    let results: HtmlElement = element_by_id(&document, &ids.search_results)?;

    {
        let viewer = viewer.clone();
        let field = input.clone();
        listen(&input, "input", false, move |_| viewer.on_search_input(&field.value()))?;
    }

    for (id, kind) in [
        (&ids.region_toggle, OverlayKind::Regions),
        (&ids.sub_region_toggle, OverlayKind::SubRegions),
    ] {
        let checkbox: HtmlInputElement = element_by_id(&document, id)?;
        let viewer = viewer.clone();
        let source = checkbox.clone();
        listen(&checkbox, "change", false, move |_| {
            viewer.set_overlay_visible(kind, source.checked())
        })?;
    }

    // Capture phase: Leaflet stops click propagation inside popups.
    let viewer = viewer.clone();
    listen(&document, "click", true, move |event| {
        let Some(target) = event.target() else {
            return;
        };
        if let Some(element) = target.dyn_ref::<Element>() {
            dispatch_data_actions(&viewer, element);
        }
        let node = target.dyn_ref::<Node>();
        let click = if input.contains(node) {
            ClickTarget::SearchInput
        } else if results.contains(node) {
            ClickTarget::ResultsPanel
        } else {
            ClickTarget::Outside
        };
        viewer.on_document_click(click);
    })
}

fn dispatch_data_actions(viewer: &WebViewer, element: &Element) {
    let attr_pair = |selector: &str, kind_attr: &str| {
        element
            .closest(selector)
            .ok()
            .flatten()
            .and_then(|el| Some((el.get_attribute(kind_attr)?, el.get_attribute(ID_ATTR)?)))
    };

    if let Some((action, id)) = attr_pair(&format!("[{}]", ACTION_ATTR), ACTION_ATTR) {
        match parse_popup_action(&action, &id) {
            Some(action) => viewer.spawn_popup_action(action),
            None => tracing::warn!(action = %action, id = %id, "unrecognised popup action"),
        }
    }
    if let Some((kind, id)) = attr_pair(&format!("[{}]", RESULT_KIND_ATTR), RESULT_KIND_ATTR) {
        if let Some(target) = parse_result_target(&kind, &id) {
            viewer.spawn_selection(target);
        }
    }
}
