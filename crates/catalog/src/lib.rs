use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

pub mod raw;

pub use raw::RawPlace;

/// Key written by the frame-capture planner.
pub const FRAME_IMAGE_KEY: &str = "youtubeFrameImage";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed place payload: {0}")]
    Malformed(String),
    #[error("place source unavailable: {0}")]
    Unavailable(String),
}

/// One successful read of a place source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBatch {
    pub records: Vec<RawPlace>,
    /// Content hash of the payload, when the source has raw bytes.
    pub revision: Option<String>,
}

/// Read-once supplier of raw place records.
///
/// Sources never partially succeed: a malformed payload fails the whole load.
pub trait PlaceSource {
    fn describe(&self) -> String;
    fn load(&self) -> Result<SourceBatch, LoadError>;
}

/// Short content hash identifying one payload revision.
pub fn revision_for_payload(bytes: &[u8]) -> String {
    let hex = blake3::hash(bytes).to_hex();
    hex.as_str()[..16].to_string()
}

/// Parse a `places.json` payload: a JSON array of objects, or `null`.
pub fn parse_places_json(payload: &str) -> Result<Vec<RawPlace>, LoadError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| LoadError::Malformed(e.to_string()))?;
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(LoadError::Malformed(format!(
                "expected an array of places, found {}",
                json_kind(&other)
            )));
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            return Err(LoadError::Malformed(format!(
                "record {idx} is {}, expected an object",
                json_kind(&item)
            )));
        }
        let place = RawPlace::from_value(item)
            .map_err(|e| LoadError::Malformed(format!("record {idx}: {e}")))?;
        out.push(place);
    }
    Ok(out)
}

/// Store frame image paths back into a `places.json` payload.
///
/// `images` is keyed by record index. Every other field is preserved as-is,
/// in its original key order; the image key is appended or updated in place.
pub fn annotate_frame_images(
    payload: &str,
    images: &BTreeMap<usize, String>,
) -> Result<String, LoadError> {
    let mut value: Value =
        serde_json::from_str(payload).map_err(|e| LoadError::Malformed(e.to_string()))?;
    let Some(items) = value.as_array_mut() else {
        return Err(LoadError::Malformed("expected an array of places".into()));
    };

    for (idx, path) in images {
        let Some(obj) = items.get_mut(*idx).and_then(Value::as_object_mut) else {
            continue;
        };
        obj.insert(FRAME_IMAGE_KEY.to_string(), Value::String(path.clone()));
    }

    let mut out =
        serde_json::to_string_pretty(&value).map_err(|e| LoadError::Malformed(e.to_string()))?;
    out.push('\n');
    Ok(out)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone)]
pub struct JsonFilePlaceSource {
    path: PathBuf,
}

impl JsonFilePlaceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlaceSource for JsonFilePlaceSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<SourceBatch, LoadError> {
        let payload = fs::read_to_string(&self.path).map_err(|e| LoadError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        let records = parse_places_json(&payload)?;
        debug!(path = %self.path.display(), records = records.len(), "read place file");
        Ok(SourceBatch {
            records,
            revision: Some(revision_for_payload(payload.as_bytes())),
        })
    }
}

/// Source backed by a JSON string already in memory (e.g. a fetched body).
#[derive(Debug, Clone)]
pub struct JsonStrPlaceSource {
    payload: String,
}

impl JsonStrPlaceSource {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

impl PlaceSource for JsonStrPlaceSource {
    fn describe(&self) -> String {
        "inline json".to_string()
    }

    fn load(&self) -> Result<SourceBatch, LoadError> {
        Ok(SourceBatch {
            records: parse_places_json(&self.payload)?,
            revision: Some(revision_for_payload(self.payload.as_bytes())),
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryPlaceSource {
    records: Vec<RawPlace>,
}

impl InMemoryPlaceSource {
    pub fn new(records: Vec<RawPlace>) -> Self {
        Self { records }
    }
}

impl PlaceSource for InMemoryPlaceSource {
    fn describe(&self) -> String {
        format!("in-memory ({} records)", self.records.len())
    }

    fn load(&self) -> Result<SourceBatch, LoadError> {
        Ok(SourceBatch {
            records: self.records.clone(),
            revision: None,
        })
    }
}
