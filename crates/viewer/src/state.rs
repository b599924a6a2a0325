use std::collections::BTreeSet;

use foundation::PlaceId;
use scene::{
    CategoryIndex, Place, PlaceIndex, PlaceWorld, SelectionSet, VisibilityFilter, normalize_query,
    order_visible,
};
use tracing::debug;

pub const STATUS_LOADING: &str = "places.json 로딩 중...";
pub const STATUS_ERROR: &str = "에러 발생";
pub const STATUS_RESET: &str = "초기화";

pub fn loaded_status(count: usize) -> String {
    format!("{count}개 장소 로드 완료")
}

pub fn marker_status(place: &Place) -> String {
    format!("{} · {}", place.category, place.name)
}

/// Where a selection came from. Both fly to the place and open its popup; a
/// marker click also reports the place on the status line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SelectOrigin {
    List,
    Marker,
}

/// What a transition asks the synchronizer to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    /// Visible set changed: resync markers, rows and the count.
    pub visible_changed: bool,
    /// Rows need re-rendering even though the set is the same (highlight).
    pub render_list: bool,
    pub render_chips: bool,
    pub fit: bool,
    pub fly_to: Option<PlaceIndex>,
    pub open_popup: Option<PlaceIndex>,
    pub status: Option<String>,
    pub declutter: bool,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The session's view state. Only the named transitions mutate it.
#[derive(Debug, Default, Clone)]
pub struct ViewState {
    world: PlaceWorld,
    categories: CategoryIndex,
    enabled: BTreeSet<String>,
    query: String,
    active: Option<PlaceId>,
    /// Cached, ordered result of the filter.
    visible: Vec<PlaceIndex>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn world(&self) -> &PlaceWorld {
        &self.world
    }

    pub fn categories(&self) -> &CategoryIndex {
        &self.categories
    }

    pub fn enabled(&self) -> &BTreeSet<String> {
        &self.enabled
    }

    pub fn is_enabled(&self, category: &str) -> bool {
        self.enabled.contains(category)
    }

    pub fn all_enabled(&self) -> bool {
        self.enabled.len() == self.categories.len()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn active(&self) -> Option<&PlaceId> {
        self.active.as_ref()
    }

    /// Visible places in display order.
    pub fn visible(&self) -> &[PlaceIndex] {
        &self.visible
    }

    pub fn visible_set(&self) -> SelectionSet {
        SelectionSet::from_indices(self.visible.iter().copied())
    }

    /// Swap in a freshly normalized place set. Every category starts enabled.
    pub fn load(&mut self, places: Vec<Place>) -> Effects {
        self.world = PlaceWorld::from_places(places);
        self.categories = CategoryIndex::from_world(&self.world);
        self.enabled = self.categories.all();
        self.query.clear();
        self.active = None;
        self.refresh();
        debug!(
            places = self.world.len(),
            categories = self.categories.len(),
            "view state loaded"
        );

        Effects {
            visible_changed: true,
            render_chips: true,
            fit: true,
            status: Some(loaded_status(self.world.len())),
            declutter: true,
            ..Effects::none()
        }
    }

    pub fn set_query(&mut self, raw: &str) -> Effects {
        let query = normalize_query(raw);
        if query == self.query {
            return Effects::none();
        }
        self.query = query;
        let changed = self.refresh();
        debug!(query = %self.query, visible = self.visible.len(), "query changed");
        Effects {
            visible_changed: changed,
            declutter: changed,
            ..Effects::none()
        }
    }

    /// Flip one category. Unknown categories are ignored.
    pub fn toggle_category(&mut self, category: &str) -> Effects {
        if !self.categories.contains(category) {
            return Effects::none();
        }
        if !self.enabled.remove(category) {
            self.enabled.insert(category.to_string());
        }
        self.after_category_change()
    }

    /// Master toggle: everything enabled turns everything off, otherwise
    /// everything turns on.
    pub fn toggle_all(&mut self) -> Effects {
        self.enabled = if self.all_enabled() {
            BTreeSet::new()
        } else {
            self.categories.all()
        };
        self.after_category_change()
    }

    pub fn reset(&mut self) -> Effects {
        self.query.clear();
        self.active = None;
        self.enabled = self.categories.all();
        let changed = self.refresh();
        Effects {
            visible_changed: changed,
            render_list: true,
            render_chips: true,
            fit: true,
            status: Some(STATUS_RESET.to_string()),
            declutter: changed,
            ..Effects::none()
        }
    }

    /// Highlight a visible place. Unknown or filtered-out ids are ignored.
    pub fn select(&mut self, id: &str, origin: SelectOrigin) -> Effects {
        let Some(index) = self.world.index_of(id) else {
            return Effects::none();
        };
        if !self.visible.contains(&index) {
            return Effects::none();
        }
        let Some(place) = self.world.place(index) else {
            return Effects::none();
        };

        self.active = Some(place.id.clone());
        let status = match origin {
            SelectOrigin::List => None,
            SelectOrigin::Marker => Some(marker_status(place)),
        };
        Effects {
            render_list: true,
            fly_to: Some(index),
            open_popup: Some(index),
            status,
            ..Effects::none()
        }
    }

    fn after_category_change(&mut self) -> Effects {
        let changed = self.refresh();
        debug!(
            enabled = self.enabled.len(),
            visible = self.visible.len(),
            "categories changed"
        );
        Effects {
            visible_changed: changed,
            render_chips: true,
            fit: true,
            declutter: changed,
            ..Effects::none()
        }
    }

    /// Recompute the ordered visible set; `true` when it changed.
    fn refresh(&mut self) -> bool {
        let filter = VisibilityFilter::new(&self.enabled, &self.query);
        let mut next = filter.visible(&self.world);
        order_visible(&self.world, &mut next);
        if next == self.visible {
            return false;
        }
        self.visible = next;
        true
    }
}
