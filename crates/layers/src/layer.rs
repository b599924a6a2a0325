use scene::{PlaceIndex, SelectionSet};

/// Markers to attach and detach to move the map layer to a new visible set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MarkerDelta {
    pub added: Vec<PlaceIndex>,
    pub removed: Vec<PlaceIndex>,
}

impl MarkerDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Tracks which place markers are currently attached to the map.
///
/// Markers present in both the old and new set are left alone so their
/// popups and label state survive a refilter.
#[derive(Debug, Default, Clone)]
pub struct MarkerLayer {
    attached: SelectionSet,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    pub fn contains(&self, index: PlaceIndex) -> bool {
        self.attached.contains(index)
    }

    /// Replace the attached set with `next`, returning what changed.
    pub fn sync(&mut self, next: SelectionSet) -> MarkerDelta {
        let delta = MarkerDelta {
            added: next.diff(&self.attached).iter().collect(),
            removed: self.attached.diff(&next).iter().collect(),
        };
        self.attached = next;
        delta
    }

    /// Detach everything, e.g. before a reload swaps the place world.
    pub fn clear(&mut self) -> MarkerDelta {
        self.sync(SelectionSet::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(ids: &[u32]) -> SelectionSet {
        SelectionSet::from_indices(ids.iter().map(|i| PlaceIndex(*i)))
    }

    fn idx(ids: &[u32]) -> Vec<PlaceIndex> {
        ids.iter().map(|i| PlaceIndex(*i)).collect()
    }

    #[test]
    fn sync_only_touches_changed_markers() {
        let mut layer = MarkerLayer::new();
        let first = layer.sync(set(&[0, 1, 2]));
        assert_eq!(first.added, idx(&[0, 1, 2]));
        assert!(first.removed.is_empty());

        let second = layer.sync(set(&[1, 2, 3]));
        assert_eq!(second.added, idx(&[3]));
        assert_eq!(second.removed, idx(&[0]));
        assert!(layer.contains(PlaceIndex(3)));
        assert!(!layer.contains(PlaceIndex(0)));

        assert!(layer.sync(set(&[1, 2, 3])).is_empty());
    }

    #[test]
    fn clear_detaches_everything() {
        let mut layer = MarkerLayer::new();
        layer.sync(set(&[4, 70]));
        let delta = layer.clear();
        assert_eq!(delta.removed, idx(&[4, 70]));
        assert!(layer.is_empty());
    }
}
