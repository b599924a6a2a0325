use crate::world::PlaceIndex;

/// Set of place indices backed by a bitset.
///
/// Used for visible-set membership and for computing marker deltas between
/// two visible sets. Iteration yields indices in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    words: Vec<u64>,
    len: usize,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_indices<I>(indices: I) -> Self
    where
        I: IntoIterator<Item = PlaceIndex>,
    {
        let mut s = Self::new();
        for idx in indices {
            s.insert(idx);
        }
        s
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, index: PlaceIndex) -> bool {
        let (word, bit) = word_bit(index);
        self.words
            .get(word)
            .is_some_and(|w| (w & (1u64 << bit)) != 0)
    }

    /// Returns `true` if the set changed.
    pub fn insert(&mut self, index: PlaceIndex) -> bool {
        let (word, bit) = word_bit(index);
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << bit;
        let w = &mut self.words[word];
        if (*w & mask) != 0 {
            return false;
        }
        *w |= mask;
        self.len += 1;
        true
    }

    /// Set difference: `self \ other`.
    pub fn diff(&self, other: &Self) -> Self {
        let mut words = self.words.clone();
        for (w, ow) in words.iter_mut().zip(other.words.iter()) {
            *w &= !ow;
        }
        let len = words.iter().map(|w| w.count_ones() as usize).sum();
        Self { words, len }
    }

    pub fn iter(&self) -> impl Iterator<Item = PlaceIndex> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &word)| {
            BitIter(word).map(move |bit| PlaceIndex(wi as u32 * 64 + bit))
        })
    }
}

fn word_bit(index: PlaceIndex) -> (usize, u32) {
    ((index.0 / 64) as usize, index.0 % 64)
}

struct BitIter(u64);

impl Iterator for BitIter {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.0 == 0 {
            return None;
        }
        let tz = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(tz)
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionSet;
    use crate::world::PlaceIndex;

    fn p(i: u32) -> PlaceIndex {
        PlaceIndex(i)
    }

    #[test]
    fn insert_contains_and_len() {
        let mut s = SelectionSet::new();
        assert!(s.is_empty());
        assert!(s.insert(p(1)));
        assert!(!s.insert(p(1)));
        assert!(s.contains(p(1)));
        assert!(!s.contains(p(200)));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn iter_is_sorted_across_words() {
        let s = SelectionSet::from_indices([p(65), p(2), p(10)]);
        let got: Vec<u32> = s.iter().map(|i| i.0).collect();
        assert_eq!(got, vec![2, 10, 65]);
    }

    #[test]
    fn diff_gives_marker_delta() {
        let old = SelectionSet::from_indices([p(1), p(2), p(100)]);
        let new = SelectionSet::from_indices([p(2), p(3)]);

        let added: Vec<u32> = new.diff(&old).iter().map(|i| i.0).collect();
        let removed: Vec<u32> = old.diff(&new).iter().map(|i| i.0).collect();
        assert_eq!(added, vec![3]);
        assert_eq!(removed, vec![1, 100]);
        assert_eq!(old.diff(&new).len(), 2);
    }
}
