use std::collections::{BTreeMap, BTreeSet};

use crate::world::PlaceWorld;

/// Place count per normalized category, iterated alphabetically.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryIndex {
    counts: BTreeMap<String, usize>,
}

impl CategoryIndex {
    pub fn from_world(world: &PlaceWorld) -> Self {
        let mut counts = BTreeMap::new();
        for (_, entry) in world.iter() {
            *counts.entry(entry.place.category.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.counts.contains_key(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Every known category, for an "everything enabled" filter.
    pub fn all(&self) -> BTreeSet<String> {
        self.counts.keys().cloned().collect()
    }
}
