use std::collections::HashMap;

use foundation::{Color, PlaceId};
use tracing::warn;

use crate::classify::{color_for, parse_episode};
use crate::place::Place;

/// Dense position of a place inside a [`PlaceWorld`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceIndex(pub u32);

impl PlaceIndex {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// A place plus the keys derived from it once at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceEntry {
    pub place: Place,
    pub episode: f64,
    pub color: Color,
    search_text: String,
}

impl PlaceEntry {
    pub fn new(place: Place) -> Self {
        let episode = parse_episode(&place.category);
        let color = color_for(&place.category);
        let search_text =
            format!("{} {} {}", place.name, place.description, place.category).to_lowercase();
        Self {
            place,
            episode,
            color,
            search_text,
        }
    }

    /// Lower-cased `"{name} {description} {category}"`.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }
}

/// The loaded place collection for one load cycle.
///
/// Places are never removed; ids map to indices in O(1).
#[derive(Debug, Default, Clone)]
pub struct PlaceWorld {
    entries: Vec<PlaceEntry>,
    by_id: HashMap<PlaceId, PlaceIndex>,
}

impl PlaceWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from normalized places. A repeated id keeps the first place.
    pub fn from_places(places: impl IntoIterator<Item = Place>) -> Self {
        let mut world = Self::new();
        for place in places {
            world.insert(place);
        }
        world
    }

    /// Returns `None` (and keeps the existing place) when the id is taken.
    pub fn insert(&mut self, place: Place) -> Option<PlaceIndex> {
        if self.by_id.contains_key(&place.id) {
            warn!(id = %place.id, "duplicate place id ignored");
            return None;
        }
        let index = PlaceIndex(self.entries.len() as u32);
        self.by_id.insert(place.id.clone(), index);
        self.entries.push(PlaceEntry::new(place));
        Some(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: PlaceIndex) -> Option<&PlaceEntry> {
        self.entries.get(index.as_usize())
    }

    pub fn place(&self, index: PlaceIndex) -> Option<&Place> {
        self.entry(index).map(|e| &e.place)
    }

    pub fn index_of(&self, id: &str) -> Option<PlaceIndex> {
        self.by_id.get(id).copied()
    }

    pub fn by_id(&self, id: &str) -> Option<&PlaceEntry> {
        self.index_of(id).and_then(|idx| self.entry(idx))
    }

    pub fn indices(&self) -> impl Iterator<Item = PlaceIndex> + '_ {
        (0..self.entries.len() as u32).map(PlaceIndex)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlaceIndex, &PlaceEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (PlaceIndex(i as u32), e))
    }
}

#[cfg(test)]
mod tests {
    use super::{PlaceIndex, PlaceWorld};
    use crate::test_support::place;

    #[test]
    fn lookup_by_id_and_index() {
        let world = PlaceWorld::from_places(vec![
            place("a", "ep.1", "국밥"),
            place("b", "misc", "Cafe"),
        ]);
        assert_eq!(world.len(), 2);
        assert_eq!(world.index_of("b"), Some(PlaceIndex(1)));
        assert_eq!(world.by_id("a").unwrap().episode, 1.0);
        assert!(world.by_id("zzz").is_none());
        assert_eq!(world.by_id("b").unwrap().search_text(), "cafe  misc");
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let mut world = PlaceWorld::new();
        assert!(world.insert(place("a", "x", "first")).is_some());
        assert!(world.insert(place("a", "x", "second")).is_none());
        assert_eq!(world.len(), 1);
        assert_eq!(world.by_id("a").unwrap().place.name, "first");
    }
}
