use crate::model::SubRegion;

/// The single highlighted sub-region. Last write wins, no history.
#[derive(Debug, Default)]
pub struct SelectionState {
    current: Option<SubRegion>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection, returning the new one.
    pub fn replace(&mut self, sub: SubRegion) -> &SubRegion {
        self.current.insert(sub)
    }

    pub fn current(&self) -> Option<&SubRegion> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::{Geometry, Value as GeoValue};

    fn sub(id: i64) -> SubRegion {
        SubRegion {
            id,
            sum_name: "Эрдэнэ".to_string(),
            aimag_name: "Төв".to_string(),
            aimag_id: Some(3),
            geometry: Geometry::new(GeoValue::Point(vec![107.0, 47.0])),
            center: None,
        }
    }

    #[test]
    fn last_write_wins() {
        let mut selection = SelectionState::new();
        assert!(selection.current().is_none());

        selection.replace(sub(1));
        let current = selection.replace(sub(2));
        assert_eq!(current.id, 2);
        assert_eq!(selection.current().map(|s| s.id), Some(2));
    }
}
