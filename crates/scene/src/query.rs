use std::collections::BTreeSet;

use crate::world::{PlaceEntry, PlaceIndex, PlaceWorld};

/// Canonical form of a search box value: trimmed and lower-cased.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Category-enable set intersected with a free-text substring match.
///
/// `query` must already be normalized (see [`normalize_query`]); an empty
/// query matches everything.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityFilter<'a> {
    pub enabled: &'a BTreeSet<String>,
    pub query: &'a str,
}

impl<'a> VisibilityFilter<'a> {
    pub fn new(enabled: &'a BTreeSet<String>, query: &'a str) -> Self {
        Self { enabled, query }
    }

    pub fn matches(&self, entry: &PlaceEntry) -> bool {
        if !self.enabled.contains(&entry.place.category) {
            return false;
        }
        self.query.is_empty() || entry.search_text().contains(self.query)
    }

    /// Filter a subset of the world, keeping the input order.
    pub fn apply<I>(&self, world: &PlaceWorld, indices: I) -> Vec<PlaceIndex>
    where
        I: IntoIterator<Item = PlaceIndex>,
    {
        indices
            .into_iter()
            .filter(|idx| world.entry(*idx).is_some_and(|e| self.matches(e)))
            .collect()
    }

    /// Visible places in world order.
    pub fn visible(&self, world: &PlaceWorld) -> Vec<PlaceIndex> {
        self.apply(world, world.indices())
    }
}
