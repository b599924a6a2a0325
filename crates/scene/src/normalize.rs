use std::collections::HashSet;

use catalog::RawPlace;
use foundation::{LatLon, PlaceId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::place::Place;
use crate::video::{OverrideError, VideoLink, VideoOverrideEntry, VideoOverrides, start_from_url};

pub const UNCATEGORIZED: &str = "미분류";

const PREFIX_SEPARATORS: &[char] = &['-', ':', '|', '/', '·', '>', '–', '—'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Label used when a record has no usable category.
    pub uncategorized_label: String,
    /// Leading tag phrase stripped from categories (ASCII case-insensitive).
    pub category_prefix: Option<String>,
    /// Stripped only after `category_prefix` matched.
    pub category_sub_prefix: Option<String>,
    pub video_overrides: Vec<VideoOverrideEntry>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            uncategorized_label: UNCATEGORIZED.to_string(),
            category_prefix: Some("Food Otaku Map".to_string()),
            category_sub_prefix: Some("Korea".to_string()),
            video_overrides: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DropReason {
    #[error("missing coordinate")]
    MissingCoordinate,
    #[error("non-finite coordinate")]
    NonFiniteCoordinate,
}

/// A raw record excluded from the working set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record {index} ({}) dropped: {reason}", .id.as_deref().unwrap_or("no id"))]
pub struct DroppedRecord {
    pub index: usize,
    pub id: Option<String>,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeReport {
    pub places: Vec<Place>,
    pub dropped: Vec<DroppedRecord>,
    /// Records whose id was missing or collided and had to be rewritten.
    pub reassigned_ids: usize,
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    config: NormalizeConfig,
    overrides: VideoOverrides,
}

impl Normalizer {
    pub fn new(config: NormalizeConfig) -> Result<Self, OverrideError> {
        let overrides = VideoOverrides::compile(&config.video_overrides)?;
        Ok(Self { config, overrides })
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    pub fn normalize(&self, records: Vec<RawPlace>) -> NormalizeReport {
        let mut report = NormalizeReport::default();
        let mut used: HashSet<String> = HashSet::with_capacity(records.len());

        for (index, raw) in records.into_iter().enumerate() {
            let position = match coordinate(&raw) {
                Ok(p) => p,
                Err(reason) => {
                    let dropped = DroppedRecord {
                        index,
                        id: raw.id.clone(),
                        reason,
                    };
                    warn!("{dropped}");
                    report.dropped.push(dropped);
                    continue;
                }
            };

            let (id, reassigned) = unique_id(&mut used, raw.id.as_deref(), index);
            if reassigned {
                report.reassigned_ids += 1;
            }

            let name = raw.name.as_deref().map(str::trim).unwrap_or_default().to_string();
            let video = self.video_for(&name, &raw);
            let place = Place {
                id: PlaceId::new(id),
                category: self.category(raw.category.as_deref()),
                description: raw
                    .description
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string(),
                name,
                position,
                video,
                frame_image: non_empty(raw.frame_image.as_deref()),
            };
            report.places.push(place);
        }

        debug!(
            places = report.places.len(),
            dropped = report.dropped.len(),
            reassigned = report.reassigned_ids,
            "normalized place records"
        );
        report
    }

    /// Trimmed category with the organizational prefix removed.
    pub fn category(&self, raw: Option<&str>) -> String {
        let mut label = raw.unwrap_or_default().trim();
        if let Some(prefix) = self.config.category_prefix.as_deref()
            && let Some(rest) = strip_tag(label, prefix)
        {
            label = rest;
            if let Some(sub) = self.config.category_sub_prefix.as_deref()
                && let Some(rest) = strip_tag(label, sub)
            {
                label = rest;
            }
        }

        if label.is_empty() {
            self.config.uncategorized_label.clone()
        } else {
            label.to_string()
        }
    }

    fn video_for(&self, name: &str, raw: &RawPlace) -> Option<VideoLink> {
        let mut url = non_empty(raw.video_url.as_deref());
        let mut start = raw
            .video_start_seconds
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(|s| s.floor() as u64);

        if url.is_none()
            && let Some((override_url, offset)) = self.overrides.lookup(name)
        {
            debug!(name, url = override_url, offset, "applied video override");
            url = Some(override_url.to_string());
            start = (offset > 0).then_some(offset);
        }

        let Some(url) = url else {
            if start.is_some() {
                debug!(name, "discarding video start without a video url");
            }
            return None;
        };

        let start = start.or_else(|| start_from_url(&url));
        Some(VideoLink::new(url, start))
    }
}

fn coordinate(raw: &RawPlace) -> Result<LatLon, DropReason> {
    let (Some(lat), Some(lon)) = (raw.lat, raw.lon) else {
        return Err(DropReason::MissingCoordinate);
    };
    let p = LatLon::new(lat, lon);
    if !p.is_finite() {
        return Err(DropReason::NonFiniteCoordinate);
    }
    Ok(p)
}

fn unique_id(used: &mut HashSet<String>, raw: Option<&str>, index: usize) -> (String, bool) {
    let base = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(id) => id.to_string(),
        None => {
            let id = format!("place-{index}");
            if used.insert(id.clone()) {
                return (id, true);
            }
            id
        }
    };

    if used.insert(base.clone()) {
        return (base, false);
    }

    let mut n = 2usize;
    loop {
        let candidate = format!("{base}#{n}");
        if used.insert(candidate.clone()) {
            warn!(id = %base, renamed = %candidate, "duplicate place id renamed");
            return (candidate, true);
        }
        n += 1;
    }
}

fn strip_tag<'a>(label: &'a str, tag: &str) -> Option<&'a str> {
    let tag = tag.trim();
    if tag.is_empty() {
        return None;
    }
    let head = label.get(..tag.len())?;
    if !head.eq_ignore_ascii_case(tag) {
        return None;
    }
    let rest = &label[tag.len()..];
    let is_gap = |c: char| c.is_whitespace() || PREFIX_SEPARATORS.contains(&c);
    if rest.chars().next().is_some_and(|c| !is_gap(c)) {
        return None;
    }
    Some(rest.trim_start_matches(is_gap))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
