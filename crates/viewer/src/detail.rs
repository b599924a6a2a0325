use foundation::{Color, LatLon, PlaceId};
use layers::ALL_CATEGORIES_SWATCH;
use scene::{NO_EPISODE, PlaceEntry, color_for};
use url::form_urlencoded;

use crate::state::ViewState;

pub const NO_DESCRIPTION: &str = "설명 없음";
pub const EMPTY_RESULTS: &str = "검색 결과가 없습니다. 다른 키워드로 다시 시도하세요.";
pub const ALL_CATEGORIES_LABEL: &str = "전체";

/// One entry of the result list.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRow {
    pub id: PlaceId,
    pub name: String,
    pub category: String,
    pub color: Color,
    pub episode: Option<f64>,
    pub start_label: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChipKey {
    All,
    Category(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChip {
    pub key: ChipKey,
    pub label: String,
    pub count: usize,
    pub swatch: Color,
    pub pressed: bool,
}

/// Data behind a marker popup.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupDetail {
    pub id: PlaceId,
    pub name: String,
    pub category: String,
    /// `lat, lon` with six decimals.
    pub coordinates: String,
    pub description: String,
    pub start_label: Option<String>,
    pub watch_url: Option<String>,
    pub maps_url: String,
    pub thumbnail: Option<String>,
}

impl PopupDetail {
    pub fn for_entry(entry: &PlaceEntry) -> Self {
        let place = &entry.place;
        let description = if place.description.trim().is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            place.description.clone()
        };
        Self {
            id: place.id.clone(),
            name: place.name.clone(),
            category: place.category.clone(),
            coordinates: format_coordinates(place.position),
            description,
            start_label: place.video_start_label().map(str::to_string),
            watch_url: place.video.as_ref().map(|v| v.watch_url()),
            maps_url: google_maps_url(place.position),
            thumbnail: place.frame_image.clone(),
        }
    }

    /// Caption for the video link button.
    pub fn video_caption(&self) -> Option<String> {
        self.watch_url.as_ref()?;
        Some(match &self.start_label {
            Some(label) => format!("유튜브 ({label}) 열기 ↗"),
            None => "유튜브 열기 ↗".to_string(),
        })
    }
}

pub fn format_coordinates(p: LatLon) -> String {
    format!("{:.6}, {:.6}", p.lat, p.lon)
}

pub fn google_maps_url(p: LatLon) -> String {
    let q: String = form_urlencoded::byte_serialize(format!("{},{}", p.lat, p.lon).as_bytes())
        .collect();
    format!("https://www.google.com/maps?q={q}")
}

pub fn row_for(entry: &PlaceEntry, active: bool) -> PlaceRow {
    PlaceRow {
        id: entry.place.id.clone(),
        name: entry.place.name.clone(),
        category: entry.place.category.clone(),
        color: entry.color,
        episode: (entry.episode != NO_EPISODE).then_some(entry.episode),
        start_label: entry.place.video_start_label().map(str::to_string),
        active,
    }
}

/// Rows for the visible set, in display order.
pub fn rows(state: &ViewState) -> Vec<PlaceRow> {
    let active = state.active();
    state
        .visible()
        .iter()
        .filter_map(|idx| state.world().entry(*idx))
        .map(|entry| row_for(entry, active == Some(&entry.place.id)))
        .collect()
}

/// The "all" chip followed by one chip per category, alphabetically.
pub fn chips(state: &ViewState) -> Vec<CategoryChip> {
    let mut out = Vec::with_capacity(state.categories().len() + 1);
    out.push(CategoryChip {
        key: ChipKey::All,
        label: ALL_CATEGORIES_LABEL.to_string(),
        count: state.world().len(),
        swatch: ALL_CATEGORIES_SWATCH,
        pressed: state.all_enabled(),
    });
    out.extend(state.categories().iter().map(|(category, count)| CategoryChip {
        key: ChipKey::Category(category.to_string()),
        label: category.to_string(),
        count,
        swatch: color_for(category),
        pressed: state.is_enabled(category),
    }));
    out
}
