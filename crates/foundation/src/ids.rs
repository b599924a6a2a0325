use std::borrow::Borrow;
use std::fmt;

/// Opaque, stable place identifier.
///
/// Unique within one load cycle; the world keys its O(1) lookup on it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceId(String);

impl PlaceId {
    pub fn new(id: impl Into<String>) -> Self {
        PlaceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PlaceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlaceId {
    fn from(value: &str) -> Self {
        PlaceId(value.to_string())
    }
}

impl From<String> for PlaceId {
    fn from(value: String) -> Self {
        PlaceId(value)
    }
}
