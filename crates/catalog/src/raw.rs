use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Accepted spellings per field, most preferred first. The first non-null
/// spelling wins and the rest are discarded before deserializing.
const FIELD_SPELLINGS: &[(&str, &[&str])] = &[
    ("lat", &["lat", "latitude"]),
    ("lon", &["lon", "lng", "longitude"]),
    ("videoUrl", &["youtubeUrl", "videoUrl"]),
    ("videoId", &["youtubeId", "videoId"]),
    ("videoStartSeconds", &["youtubeStart", "videoStartSeconds"]),
    ("frameImage", &["youtubeFrameImage", "frameImage"]),
];

/// Place record as stored in `places.json`, before normalization.
///
/// Every field is optional and leniently typed: ids and coordinates are
/// accepted as numbers or strings, and both the `youtube*` and `video*` key
/// spellings are understood.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlace {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, alias = "latitude", deserialize_with = "lenient_number")]
    pub lat: Option<f64>,
    #[serde(
        default,
        alias = "lng",
        alias = "longitude",
        deserialize_with = "lenient_number"
    )]
    pub lon: Option<f64>,
    #[serde(default, alias = "youtubeUrl", deserialize_with = "lenient_string")]
    pub video_url: Option<String>,
    #[serde(default, alias = "youtubeId", deserialize_with = "lenient_string")]
    pub video_id: Option<String>,
    #[serde(
        default,
        alias = "youtubeStart",
        deserialize_with = "lenient_number"
    )]
    pub video_start_seconds: Option<f64>,
    #[serde(
        default,
        alias = "youtubeFrameImage",
        deserialize_with = "lenient_string"
    )]
    pub frame_image: Option<String>,
}

impl RawPlace {
    pub fn new(name: impl Into<String>, category: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: Some(name.into()),
            category: Some(category.into()),
            lat: Some(lat),
            lon: Some(lon),
            ..Self::default()
        }
    }

    /// Deserialize one stored record.
    ///
    /// Unlike plain serde aliases, a record carrying two spellings of the
    /// same field is accepted.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Object(mut obj) => {
                fold_spellings(&mut obj);
                serde_json::from_value(Value::Object(obj))
            }
            other => serde_json::from_value(other),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_video(mut self, url: impl Into<String>, start_seconds: Option<f64>) -> Self {
        self.video_url = Some(url.into());
        self.video_start_seconds = start_seconds;
        self
    }
}

fn fold_spellings(obj: &mut Map<String, Value>) {
    for (field, spellings) in FIELD_SPELLINGS {
        let mut chosen = None;
        for key in *spellings {
            if let Some(v) = obj.remove(*key)
                && chosen.is_none()
                && !v.is_null()
            {
                chosen = Some(v);
            }
        }
        if let Some(v) = chosen {
            obj.insert((*field).to_string(), v);
        }
    }
}

fn lenient_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

// Unparseable values become NaN rather than `None` so the normalizer reports
// them as non-finite coordinates instead of missing ones.
fn lenient_number<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(n.as_f64().unwrap_or(f64::NAN)),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.parse::<f64>().unwrap_or(f64::NAN))
            }
        }
        Some(_) => Some(f64::NAN),
    })
}
