// Debounced search. Dropping the stored timer handle must cancel the timer;
// stale tickets are refused in begin_request regardless.

use crate::model::SearchResult;

pub const NO_RESULTS_TEXT: &str = "Илэрц олдсонгүй";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchTicket(u64);

#[derive(Clone, Debug, PartialEq)]
pub enum SearchPhase {
    /// Query too short; panel hidden, nothing scheduled.
    Idle,
    /// A request for `query` is scheduled, or in flight once `requested`.
    Pending {
        query: String,
        ticket: SearchTicket,
        requested: bool,
    },
    ResultsShown,
    /// Outside click or result selection.
    Dismissed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Idle,
    Scheduled(SearchTicket),
}

#[derive(Debug)]
pub struct SearchController<T> {
    min_chars: usize,
    generation: u64,
    phase: SearchPhase,
    timer: Option<T>,
    results: Vec<SearchResult>,
    panel_visible: bool,
}

impl<T> SearchController<T> {
    pub fn new(min_chars: usize) -> Self {
        SearchController {
            min_chars,
            generation: 0,
            phase: SearchPhase::Idle,
            timer: None,
            results: Vec::new(),
            panel_visible: false,
        }
    }

    /// Handle a change of the input text. Any previously armed timer is
    /// dropped before anything else happens.
    pub fn on_input(&mut self, text: &str, arm: impl FnOnce(SearchTicket) -> T) -> InputOutcome {
        self.timer = None;

        let query = text.trim();
        // Measured in UTF-16 units, as the input element reports its length.
        if query.encode_utf16().count() < self.min_chars {
            self.phase = SearchPhase::Idle;
            self.panel_visible = false;
            return InputOutcome::Idle;
        }

        self.generation += 1;
        let ticket = SearchTicket(self.generation);
        self.phase = SearchPhase::Pending {
            query: query.to_string(),
            ticket,
            requested: false,
        };
        self.timer = Some(arm(ticket));
        tracing::debug!(query, "search scheduled");
        InputOutcome::Scheduled(ticket)
    }

    /// The debounce for `ticket` elapsed. Returns the query to send, or `None`
    /// if a newer keystroke or a dismissal superseded it.
    pub fn begin_request(&mut self, ticket: SearchTicket) -> Option<String> {
        match &mut self.phase {
            SearchPhase::Pending {
                query,
                ticket: current,
                requested,
            } if *current == ticket && !*requested => {
                *requested = true;
                self.timer = None;
                Some(query.clone())
            }
            _ => None,
        }
    }

    /// Apply a search response. Responses are not ordered: whichever arrives
    /// last is shown, unless the controller went idle or was dismissed
    /// meanwhile. Returns whether the panel should be redrawn.
    pub fn show_results(&mut self, ticket: SearchTicket, results: Vec<SearchResult>) -> bool {
        if matches!(self.phase, SearchPhase::Idle | SearchPhase::Dismissed) {
            tracing::debug!("dropping search response after panel closed");
            return false;
        }
        // An older response while a newer query is still pending is shown,
        // but the newer request stays alive.
        let answers_pending =
            matches!(&self.phase, SearchPhase::Pending { ticket: current, .. } if *current == ticket);
        if answers_pending {
            self.phase = SearchPhase::ResultsShown;
        }
        self.results = results;
        self.panel_visible = true;
        true
    }

    pub fn dismiss(&mut self) {
        self.timer = None;
        self.phase = SearchPhase::Dismissed;
        self.panel_visible = false;
        self.results.clear();
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn is_panel_visible(&self) -> bool {
        self.panel_visible
    }

    #[cfg(test)]
    fn has_armed_timer(&self) -> bool {
        self.timer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SearchKind;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Stand-in for a timer handle; flags itself cancelled when dropped.
    struct Handle(Rc<Cell<bool>>);

    impl Drop for Handle {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    fn result(id: i64) -> SearchResult {
        SearchResult {
            id,
            name: format!("r{id}"),
            kind: SearchKind::SubRegion,
            aimag_id: None,
        }
    }

    fn schedule(search: &mut SearchController<Handle>, text: &str) -> (InputOutcome, Rc<Cell<bool>>) {
        let cancelled = Rc::new(Cell::new(false));
        let flag = cancelled.clone();
        let outcome = search.on_input(text, move |_| Handle(flag));
        (outcome, cancelled)
    }

    #[test]
    fn short_queries_stay_idle() {
        let mut search = SearchController::<Handle>::new(2);
        for text in ["", "U", "  U  ", "Ө"] {
            let (outcome, _) = schedule(&mut search, text);
            assert_eq!(outcome, InputOutcome::Idle);
            assert_eq!(search.phase(), &SearchPhase::Idle);
            assert!(!search.has_armed_timer());
            assert!(!search.is_panel_visible());
        }
    }

    #[test]
    fn astral_character_reaches_minimum_length() {
        let mut search = SearchController::<Handle>::new(2);
        let (outcome, _) = schedule(&mut search, "😀");
        assert!(matches!(outcome, InputOutcome::Scheduled(_)));
        assert!(search.has_armed_timer());
        assert!(matches!(search.phase(), SearchPhase::Pending { query, .. } if query == "😀"));
    }

    #[test]
    fn keystroke_cancels_previous_timer() {
        let mut search = SearchController::new(2);
        let (first, first_cancelled) = schedule(&mut search, "Ul");
        let (second, second_cancelled) = schedule(&mut search, "Ula");

        assert!(first_cancelled.get());
        assert!(!second_cancelled.get());

        let (InputOutcome::Scheduled(old), InputOutcome::Scheduled(new)) = (first, second) else {
            panic!("both inputs should schedule");
        };
        assert_eq!(search.begin_request(old), None);
        assert_eq!(search.begin_request(new), Some("Ula".to_string()));
        assert!(second_cancelled.get());
        // A ticket fires at most once.
        assert_eq!(search.begin_request(new), None);
    }

    #[test]
    fn going_short_cancels_pending_search() {
        let mut search = SearchController::new(2);
        let (outcome, cancelled) = schedule(&mut search, "Ula");
        schedule(&mut search, "U");

        assert!(cancelled.get());
        let InputOutcome::Scheduled(ticket) = outcome else {
            panic!("expected a scheduled search");
        };
        assert_eq!(search.begin_request(ticket), None);
    }

    #[test]
    fn empty_response_shows_panel() {
        let mut search = SearchController::new(2);
        let (InputOutcome::Scheduled(ticket), _) = schedule(&mut search, "zz") else {
            panic!("expected a scheduled search");
        };
        search.begin_request(ticket);

        assert!(search.show_results(ticket, vec![]));
        assert!(search.is_panel_visible());
        assert_eq!(search.phase(), &SearchPhase::ResultsShown);
        assert!(search.results().is_empty());
    }

    #[test]
    fn late_response_after_dismiss_is_dropped() {
        let mut search = SearchController::new(2);
        let (InputOutcome::Scheduled(ticket), _) = schedule(&mut search, "Төв") else {
            panic!("expected a scheduled search");
        };
        search.begin_request(ticket);
        search.dismiss();

        assert!(!search.show_results(ticket, vec![result(1)]));
        assert!(!search.is_panel_visible());
        assert!(search.results().is_empty());
    }

    #[test]
    fn older_response_does_not_swallow_newer_request() {
        let mut search = SearchController::new(2);
        let (InputOutcome::Scheduled(old), _) = schedule(&mut search, "Ба") else {
            panic!("expected a scheduled search");
        };
        search.begin_request(old);
        let (InputOutcome::Scheduled(new), _) = schedule(&mut search, "Баян") else {
            panic!("expected a scheduled search");
        };

        assert!(search.show_results(old, vec![result(1), result(2)]));
        assert!(search.is_panel_visible());
        assert_eq!(search.begin_request(new), Some("Баян".to_string()));
        assert!(search.show_results(new, vec![result(3)]));
        assert_eq!(search.results().len(), 1);
    }

    #[test]
    fn dismiss_hides_from_any_phase() {
        let mut search = SearchController::<Handle>::new(2);
        search.dismiss();
        assert_eq!(search.phase(), &SearchPhase::Dismissed);

        let (_, cancelled) = schedule(&mut search, "Ула");
        search.dismiss();
        assert!(cancelled.get());
        assert!(!search.is_panel_visible());
    }
}
