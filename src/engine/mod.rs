pub mod layers;
pub mod search;
pub mod selection;
pub mod store;

pub use layers::{LayerManager, OverlayFeature, OverlayKind, OverlayStyle, OverlayStyles, PopupAction};
pub use search::{InputOutcome, SearchController, SearchPhase, SearchTicket, NO_RESULTS_TEXT};
pub use selection::SelectionState;
pub use store::RegionStore;
