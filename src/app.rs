// State is borrowed only between awaits. Every fetch finishes before the
// first mutation, so a failed call leaves the viewer untouched.

use crate::api::RegionApi;
use crate::config::ViewerConfig;
use crate::engine::{
    InputOutcome, LayerManager, OverlayKind, PopupAction, RegionStore, SearchController,
    SearchPhase, SearchTicket, SelectionState,
};
use crate::error::{ViewerError, ViewerResult};
use crate::model::{GeoPoint, RegionId, SelectionTarget, SubRegion};
use crate::view::{ClickTarget, MapSurface, PageSurface, html};
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;


/// Task and timer services of the host event loop.
pub trait Runtime {
    /// Dropping the handle cancels the timer.
    type Timer;

    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    fn delay(&self, after: Duration, task: Box<dyn FnOnce()>) -> Self::Timer;
}

struct ViewerState<M, P, T> {
    store: RegionStore,
    layers: LayerManager,
    search: SearchController<T>,
    selection: SelectionState,
    map: M,
    page: P,
}

struct Shared<A, R: Runtime, M, P> {
    api: A,
    runtime: R,
    config: ViewerConfig,
    state: RefCell<ViewerState<M, P, R::Timer>>,
}

pub struct Viewer<A, R: Runtime, M, P> {
    shared: Rc<Shared<A, R, M, P>>,
}

impl<A, R: Runtime, M, P> Clone for Viewer<A, R, M, P> {
    fn clone(&self) -> Self {
        Viewer {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<A, R, M, P> Viewer<A, R, M, P>
where
    A: RegionApi + 'static,
    R: Runtime + 'static,
    M: MapSurface + 'static,
    P: PageSurface + 'static,
{
    pub fn new(config: ViewerConfig, api: A, runtime: R, mut map: M, page: P) -> Self {
        let layers = LayerManager::new(config.styles.clone());
        layers.attach(&mut map);

        let state = ViewerState {
            store: RegionStore::new(),
            layers,
            search: SearchController::new(config.min_query_chars),
            selection: SelectionState::new(),
            map,
            page,
        };
        Viewer {
            shared: Rc::new(Shared {
                api,
                runtime,
                config,
                state: RefCell::new(state),
            }),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.shared.config
    }

    /// Initial load: both boundary lists concurrently, plus a health probe.
    pub async fn start(&self) {
        futures::join!(self.load_regions(), self.load_sub_regions(), self.check_health());
    }

    pub async fn load_regions(&self) {
        match self.shared.api.regions().await {
            Ok(regions) => {
                let mut state = self.shared.state.borrow_mut();
                let ViewerState {
                    store, layers, map, ..
                } = &mut *state;
                let regions = store.set_regions(regions);
                layers.show_regions(regions, map);
                tracing::info!(count = regions.len(), "regions loaded");
            }
            Err(err) => tracing::error!("Error loading regions: {}", err),
        }
    }

    pub async fn load_sub_regions(&self) {
        match self.shared.api.sub_regions().await {
            Ok(sub_regions) => {
                let mut state = self.shared.state.borrow_mut();
                let ViewerState {
                    store, layers, map, ..
                } = &mut *state;
                let sub_regions = store.set_sub_regions(sub_regions);
                layers.show_sub_regions(sub_regions, map);
                tracing::info!(count = sub_regions.len(), "sub-regions loaded");
            }
            Err(err) => tracing::error!("Error loading sub-regions: {}", err),
        }
    }

    async fn check_health(&self) {
        match self.shared.api.health().await {
            Ok(status) => tracing::info!(status = %status, "backend health"),
            Err(err) => tracing::warn!("Backend health check failed: {}", err),
        }
    }

    /// Drill-down: list a region's sub-regions in the info panel. Overlays are
    /// left alone.
    pub async fn show_region_sub_regions(&self, region_id: RegionId) {
        match self.shared.api.region_sub_regions(region_id).await {
            Ok(entries) => {
                let mut state = self.shared.state.borrow_mut();
                let region_name = state.store.find_region(region_id).map(|r| r.name.as_str());
                let html = html::drill_down_html(region_name, &entries);
                state.page.set_info_html(&html);
                tracing::debug!(region_id, count = entries.len(), "drill-down shown");
            }
            Err(err) => tracing::error!("Error loading sub-regions of region {}: {}", region_id, err),
        }
    }

    /// Highlight flow shared by popup buttons and search results.
    pub async fn highlight_sub_region(&self, id: RegionId) {
        match self.fetch_highlight(id).await {
            Ok((sub, center)) => {
                let zoom = self.shared.config.highlight_zoom;
                let mut state = self.shared.state.borrow_mut();
                let ViewerState {
                    layers,
                    selection,
                    map,
                    page,
                    ..
                } = &mut *state;
                let sub = selection.replace(sub);
                layers.replace_highlight(sub, map);
                map.set_view(center, zoom);
                page.set_info_html(&html::selection_html(sub, center));
                tracing::info!(id, name = %sub.sum_name, "sub-region highlighted");
            }
            Err(err) => tracing::error!("Error highlighting sub-region {}: {}", id, err),
        }
    }

    async fn fetch_highlight(&self, id: RegionId) -> ViewerResult<(SubRegion, GeoPoint)> {
        let sub = self.shared.api.sub_region(id).await?;
        let center = sub
            .center_point()
            .ok_or_else(|| ViewerError::Decode(format!("sub-region {} has no center", id)))?;
        Ok((sub, center))
    }

    /// Input event on the search box. Arms the debounce timer or, for short
    /// queries, hides the panel.
    pub fn on_search_input(&self, text: &str) {
        let weak = Rc::downgrade(&self.shared);
        let debounce = self.shared.config.search_debounce();
        let runtime = &self.shared.runtime;

        let mut state = self.shared.state.borrow_mut();
        let outcome = state.search.on_input(text, |ticket| {
            runtime.delay(
                debounce,
                Box::new(move || {
                    if let Some(shared) = weak.upgrade() {
                        Viewer { shared }.spawn_with(move |viewer| async move {
                            viewer.run_search(ticket).await
                        });
                    }
                }),
            )
        });
        if outcome == InputOutcome::Idle {
            state.page.set_results_visible(false);
        }
    }

    /// Debounce elapsed for `ticket`: query the backend and render the panel.
    pub async fn run_search(&self, ticket: SearchTicket) {
        let query = self.shared.state.borrow_mut().search.begin_request(ticket);
        let Some(query) = query else {
            return;
        };

        match self.shared.api.search(&query).await {
            Ok(results) => {
                let mut state = self.shared.state.borrow_mut();
                let ViewerState { search, page, .. } = &mut *state;
                if search.show_results(ticket, results) {
                    page.set_results_html(&html::results_html(search.results()));
                    page.set_results_visible(true);
                }
            }
            Err(err) => tracing::error!("Error searching {:?}: {}", query, err),
        }
    }

    /// A result row was chosen: dismiss the panel, then either fit the view
    /// to the region and drill down, or highlight the sub-region.
    pub async fn select_search_result(&self, target: SelectionTarget) {
        self.dismiss_search();
        match target {
            SelectionTarget::Region(id) => {
                {
                    let mut state = self.shared.state.borrow_mut();
                    let ViewerState { store, map, .. } = &mut *state;
                    let Some(region) = store.find_region(id) else {
                        tracing::warn!(id, "selected region is not loaded");
                        return;
                    };
                    if let Some(bounds) = region.bounds() {
                        map.fit_bounds(&bounds);
                    }
                }
                self.show_region_sub_regions(id).await;
            }
            SelectionTarget::SubRegion(id) => self.highlight_sub_region(id).await,
        }
    }

    pub async fn run_popup_action(&self, action: PopupAction) {
        match action {
            PopupAction::DrillDown(id) => self.show_region_sub_regions(id).await,
            PopupAction::Highlight(id) => self.highlight_sub_region(id).await,
        }
    }

    /// Hide the panel, clear the input and cancel any scheduled search.
    pub fn dismiss_search(&self) {
        let mut state = self.shared.state.borrow_mut();
        let ViewerState { search, page, .. } = &mut *state;
        search.dismiss();
        page.clear_search_input();
        page.set_results_visible(false);
    }

    pub fn on_document_click(&self, target: ClickTarget) {
        if target == ClickTarget::Outside {
            self.dismiss_search();
        }
    }

    pub fn set_overlay_visible(&self, kind: OverlayKind, visible: bool) {
        let mut state = self.shared.state.borrow_mut();
        let ViewerState { layers, map, .. } = &mut *state;
        if layers.set_visible(kind, visible, map) {
            tracing::debug!(?kind, visible, "overlay toggled");
        }
    }

    /// Run an operation as a detached task on the runtime.
    pub fn spawn_with<F, Fut>(&self, operation: F)
    where
        F: FnOnce(Self) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        let task = operation(self.clone());
        self.shared.runtime.spawn(Box::pin(task));
    }

    pub fn spawn_start(&self) {
        self.spawn_with(|viewer| async move { viewer.start().await });
    }

    pub fn spawn_selection(&self, target: SelectionTarget) {
        self.spawn_with(move |viewer| async move { viewer.select_search_result(target).await });
    }

    pub fn spawn_popup_action(&self, action: PopupAction) {
        self.spawn_with(move |viewer| async move { viewer.run_popup_action(action).await });
    }

    pub fn highlighted(&self) -> Option<SubRegion> {
        self.shared.state.borrow().selection.current().cloned()
    }

    pub fn overlay_feature_count(&self, kind: OverlayKind) -> usize {
        self.shared.state.borrow().layers.features(kind).len()
    }

    pub fn is_overlay_visible(&self, kind: OverlayKind) -> bool {
        self.shared.state.borrow().layers.is_visible(kind)
    }

    pub fn search_phase(&self) -> SearchPhase {
        self.shared.state.borrow().search.phase().clone()
    }

    pub fn is_results_visible(&self) -> bool {
        self.shared.state.borrow().search.is_panel_visible()
    }

    pub fn region_count(&self) -> usize {
        self.shared.state.borrow().store.regions().len()
    }

    pub fn sub_region_count(&self) -> usize {
        self.shared.state.borrow().store.sub_regions().len()
    }
}
