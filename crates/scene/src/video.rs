use foundation::{clock_label, parse_offset};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

/// External video reference attached to a place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoLink {
    pub url: String,
    /// Set only when `url` points at a known video host.
    pub video_id: Option<String>,
    pub start_seconds: Option<u64>,
    /// `M:SS` rendering of `start_seconds`.
    pub start_label: Option<String>,
}

impl VideoLink {
    pub fn new(url: impl Into<String>, start_seconds: Option<u64>) -> Self {
        let url = url.into();
        Self {
            video_id: video_id_from_url(&url),
            start_label: start_seconds.map(clock_label),
            start_seconds,
            url,
        }
    }

    /// Link that opens the video at the start offset (`t={s}s`).
    pub fn watch_url(&self) -> String {
        let Some(start) = self.start_seconds else {
            return self.url.clone();
        };

        match Url::parse(&self.url) {
            Ok(mut url) => {
                let kept: Vec<(String, String)> = url
                    .query_pairs()
                    .filter(|(k, _)| k != "t")
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect();
                {
                    let mut pairs = url.query_pairs_mut();
                    pairs.clear();
                    for (k, v) in &kept {
                        pairs.append_pair(k, v);
                    }
                    pairs.append_pair("t", &format!("{start}s"));
                }
                url.to_string()
            }
            Err(_) => {
                let sep = if self.url.contains('?') { '&' } else { '?' };
                format!("{}{sep}t={start}s", self.url)
            }
        }
    }
}

/// Video id for YouTube URLs (`watch?v=`, `youtu.be/`, `shorts/`, `embed/`,
/// `live/`). Any other host yields `None`.
pub fn video_id_from_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(&host);

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let candidate = match host {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => {
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned()),
                Some("shorts" | "embed" | "live" | "v") => segments.next().map(str::to_string),
                _ => None,
            }
        }
        _ => None,
    }?;

    let valid = !candidate.is_empty()
        && candidate.len() <= 64
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(candidate)
}

/// Start offset carried in the URL itself (`t=` or `start=`).
pub fn start_from_url(raw: &str) -> Option<u64> {
    let url = Url::parse(raw.trim()).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "t" || k == "start")
        .and_then(|(_, v)| parse_offset(&v))
}

/// One row of the video override table.
///
/// Matches a place by exact `name`, or by case-insensitive `keyword` regex
/// against the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoOverrideEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
    pub url: String,
    #[serde(default)]
    pub start_seconds: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum OverrideError {
    #[error("override {index} has neither a name nor a keyword")]
    NoMatcher { index: usize },
    #[error("override {index} keyword is not a valid pattern: {source}")]
    BadKeyword { index: usize, source: regex::Error },
}

#[derive(Debug, Clone)]
struct CompiledOverride {
    name: Option<String>,
    keyword: Option<Regex>,
    url: String,
    start_seconds: u64,
}

#[derive(Debug, Clone, Default)]
pub struct VideoOverrides {
    entries: Vec<CompiledOverride>,
}

impl VideoOverrides {
    pub fn compile(entries: &[VideoOverrideEntry]) -> Result<Self, OverrideError> {
        let mut out = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if entry.name.is_none() && entry.keyword.is_none() {
                return Err(OverrideError::NoMatcher { index });
            }
            let keyword = match &entry.keyword {
                Some(pattern) => Some(
                    RegexBuilder::new(pattern)
                        .case_insensitive(true)
                        .build()
                        .map_err(|source| OverrideError::BadKeyword { index, source })?,
                ),
                None => None,
            };
            out.push(CompiledOverride {
                name: entry.name.clone(),
                keyword,
                url: entry.url.clone(),
                start_seconds: entry.start_seconds,
            });
        }
        Ok(Self { entries: out })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(url, start_seconds)` for `name`. Exact names win over keywords.
    pub fn lookup(&self, name: &str) -> Option<(&str, u64)> {
        let exact = self
            .entries
            .iter()
            .find(|e| e.name.as_deref() == Some(name));
        let hit = exact.or_else(|| {
            self.entries
                .iter()
                .find(|e| e.keyword.as_ref().is_some_and(|re| re.is_match(name)))
        })?;
        Some((hit.url.as_str(), hit.start_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_youtube_ids() {
        assert_eq!(
            video_id_from_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            video_id_from_url("https://youtu.be/dQw4w9WgXcQ?t=42").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            video_id_from_url("https://m.youtube.com/shorts/abc_DEF-1").as_deref(),
            Some("abc_DEF-1")
        );
        assert_eq!(video_id_from_url("https://vimeo.com/12345"), None);
        assert_eq!(video_id_from_url("not a url"), None);
        assert_eq!(video_id_from_url("https://www.youtube.com/feed"), None);
    }

    #[test]
    fn start_comes_from_t_or_start() {
        assert_eq!(start_from_url("https://youtu.be/x?t=1m5s"), Some(65));
        assert_eq!(start_from_url("https://youtube.com/embed/x?start=30"), Some(30));
        assert_eq!(start_from_url("https://youtu.be/x"), None);
    }

    #[test]
    fn watch_url_replaces_t() {
        let link = VideoLink::new("https://www.youtube.com/watch?v=abc&t=5", Some(95));
        assert_eq!(link.start_label.as_deref(), Some("1:35"));
        assert_eq!(
            link.watch_url(),
            "https://www.youtube.com/watch?v=abc&t=95s"
        );

        let bare = VideoLink::new("https://youtu.be/abc", None);
        assert_eq!(bare.watch_url(), "https://youtu.be/abc");

        let relative = VideoLink::new("videos/abc?x=1", Some(3));
        assert_eq!(relative.watch_url(), "videos/abc?x=1&t=3s");
        assert_eq!(relative.video_id, None);
    }

    #[test]
    fn exact_name_beats_keyword() {
        let table = VideoOverrides::compile(&[
            VideoOverrideEntry {
                name: None,
                keyword: Some("국밥".into()),
                url: "https://youtu.be/kw".into(),
                start_seconds: 0,
            },
            VideoOverrideEntry {
                name: Some("할매 국밥".into()),
                keyword: None,
                url: "https://youtu.be/exact".into(),
                start_seconds: 120,
            },
        ])
        .unwrap();

        assert_eq!(table.lookup("할매 국밥"), Some(("https://youtu.be/exact", 120)));
        assert_eq!(table.lookup("수변최고 돼지국밥"), Some(("https://youtu.be/kw", 0)));
        assert_eq!(table.lookup("밀면"), None);
    }

    #[test]
    fn rejects_bad_entries() {
        let err = VideoOverrides::compile(&[VideoOverrideEntry {
            name: None,
            keyword: None,
            url: "u".into(),
            start_seconds: 0,
        }])
        .unwrap_err();
        assert!(matches!(err, OverrideError::NoMatcher { index: 0 }));

        let err = VideoOverrides::compile(&[VideoOverrideEntry {
            name: None,
            keyword: Some("(".into()),
            url: "u".into(),
            start_seconds: 0,
        }])
        .unwrap_err();
        assert!(matches!(err, OverrideError::BadKeyword { index: 0, .. }));
    }
}
