use catalog::{LoadError, PlaceSource};
use foundation::{GeoBounds, LatLon, PlaceId};
use layers::{DeclutterConfig, DeclutterOutcome, LabelGeometry, MarkerLayer, MarkerSpec, declutter};
use runtime::{
    CoalescingScheduler, DECLUTTER_CANCELLED, DECLUTTER_HIDDEN, DECLUTTER_PASSES,
    DECLUTTER_REQUESTED, EventBus, FrameRequester, FrameToken, LOAD_DROPPED, LOAD_RECORDS,
    Metrics, PLACES_TOTAL, PLACES_VISIBLE,
};
use scene::{DroppedRecord, Normalizer};
use tracing::{debug, info, warn};

use crate::camera::{FitOptions, fly_zoom, visible_bounds};
use crate::config::{ConfigError, ViewerConfig};
use crate::detail::{CategoryChip, PlaceRow, PopupDetail, chips, rows};
use crate::state::{Effects, STATUS_ERROR, STATUS_LOADING, SelectOrigin, ViewState};

/// What the core needs from the interactive map.
///
/// Frame requests model the host's "next paint" callback; the host reports a
/// fired frame back through [`Viewer::on_frame`].
pub trait MapWidget: LabelGeometry + FrameRequester {
    fn add_marker(&mut self, marker: &MarkerSpec);
    fn remove_marker(&mut self, id: &PlaceId);
    /// Hides or shows the label text only; the marker glyph stays.
    fn set_label_visible(&mut self, id: &PlaceId, visible: bool);
    fn set_view(&mut self, center: LatLon, zoom: f64);
    fn fit_bounds(&mut self, bounds: GeoBounds, options: FitOptions);
    fn fly_to(&mut self, center: LatLon, zoom: f64);
    fn zoom(&self) -> f64;
    fn open_popup(&mut self, id: &PlaceId);
}

/// Sidebar: result rows, count, category chips and status line.
pub trait ListSurface {
    fn render_rows(&mut self, rows: &[PlaceRow]);
    fn render_count(&mut self, visible: usize, total: usize);
    fn render_chips(&mut self, chips: &[CategoryChip]);
    fn set_status(&mut self, text: &str);
    fn set_loading(&mut self, loading: bool);
    fn show_error(&mut self, message: &str);
    /// Hide an error shown by an earlier load.
    fn clear_error(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub dropped: Vec<DroppedRecord>,
    pub reassigned_ids: usize,
    pub revision: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct DeclutterPass;

/// Owns the view state and keeps the map and list in step with it.
#[derive(Debug)]
pub struct Viewer {
    config: ViewerConfig,
    normalizer: Normalizer,
    state: ViewState,
    markers: MarkerLayer,
    scheduler: CoalescingScheduler<DeclutterPass>,
    metrics: Metrics,
    events: EventBus,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let normalizer = config.normalizer()?;
        Ok(Self {
            config,
            normalizer,
            state: ViewState::new(),
            markers: MarkerLayer::new(),
            scheduler: CoalescingScheduler::new(),
            metrics: Metrics::new(),
            events: EventBus::new(),
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn declutter_pending(&self) -> Option<FrameToken> {
        self.scheduler.pending_token()
    }

    /// Put the map at its configured starting view.
    pub fn mount<M>(&self, map: &mut M)
    where
        M: MapWidget + ?Sized,
    {
        let view = self.config.initial_view();
        map.set_view(view.center, view.zoom);
    }

    /// Fetch, normalize and show a new place set.
    ///
    /// A failed fetch leaves the current state untouched.
    pub fn load<S, M, L>(
        &mut self,
        source: &S,
        map: &mut M,
        list: &mut L,
    ) -> Result<LoadSummary, LoadError>
    where
        S: PlaceSource + ?Sized,
        M: MapWidget + ?Sized,
        L: ListSurface + ?Sized,
    {
        list.clear_error();
        list.set_status(STATUS_LOADING);
        list.set_loading(true);

        let batch = match source.load() {
            Ok(batch) => batch,
            Err(err) => {
                warn!(source = %source.describe(), error = %err, "place load failed");
                self.events.emit("load_failed", err.to_string());
                list.set_loading(false);
                list.show_error(&err.to_string());
                list.set_status(STATUS_ERROR);
                return Err(err);
            }
        };

        let report = self.normalizer.normalize(batch.records);
        self.metrics
            .inc_counter(LOAD_RECORDS, report.places.len() as u64);
        self.metrics
            .inc_counter(LOAD_DROPPED, report.dropped.len() as u64);

        let stale = self.markers.clear();
        for idx in stale.removed {
            if let Some(place) = self.state.world().place(idx) {
                map.remove_marker(&place.id);
            }
        }

        let summary = LoadSummary {
            loaded: report.places.len(),
            dropped: report.dropped,
            reassigned_ids: report.reassigned_ids,
            revision: batch.revision,
        };
        let effects = self.state.load(report.places);
        self.apply(effects, map, list);
        list.set_loading(false);

        info!(
            source = %source.describe(),
            loaded = summary.loaded,
            dropped = summary.dropped.len(),
            "places loaded"
        );
        self.events.emit(
            "load",
            format!("{} loaded, {} dropped", summary.loaded, summary.dropped.len()),
        );
        Ok(summary)
    }

    pub fn set_query<M, L>(&mut self, raw: &str, map: &mut M, list: &mut L)
    where
        M: MapWidget + ?Sized,
        L: ListSurface + ?Sized,
    {
        let effects = self.state.set_query(raw);
        if !effects.is_empty() {
            self.events.emit("query", self.state.query().to_string());
        }
        self.apply(effects, map, list);
    }

    pub fn toggle_category<M, L>(&mut self, category: &str, map: &mut M, list: &mut L)
    where
        M: MapWidget + ?Sized,
        L: ListSurface + ?Sized,
    {
        let effects = self.state.toggle_category(category);
        if !effects.is_empty() {
            let on = self.state.is_enabled(category);
            self.events.emit("toggle", format!("{category} -> {on}"));
        }
        self.apply(effects, map, list);
    }

    pub fn toggle_all<M, L>(&mut self, map: &mut M, list: &mut L)
    where
        M: MapWidget + ?Sized,
        L: ListSurface + ?Sized,
    {
        let effects = self.state.toggle_all();
        self.events.emit(
            "toggle_all",
            format!("{} enabled", self.state.enabled().len()),
        );
        self.apply(effects, map, list);
    }

    pub fn reset<M, L>(&mut self, map: &mut M, list: &mut L)
    where
        M: MapWidget + ?Sized,
        L: ListSurface + ?Sized,
    {
        let effects = self.state.reset();
        self.events.emit("reset", "");
        self.apply(effects, map, list);
    }

    pub fn select<M, L>(&mut self, id: &str, origin: SelectOrigin, map: &mut M, list: &mut L)
    where
        M: MapWidget + ?Sized,
        L: ListSurface + ?Sized,
    {
        let effects = self.state.select(id, origin);
        if effects.is_empty() {
            debug!(id, "ignored selection of unknown or hidden place");
            return;
        }
        self.events.emit("select", format!("{id} via {origin:?}"));
        self.apply(effects, map, list);
    }

    /// Pan, zoom or resize happened; labels moved.
    pub fn on_view_changed<M>(&mut self, map: &mut M)
    where
        M: MapWidget + ?Sized,
    {
        self.request_declutter(map);
    }

    /// A requested frame arrived. Runs the declutter pass if `token` is the
    /// pending one; stale tokens do nothing.
    pub fn on_frame<M>(&mut self, token: FrameToken, map: &mut M) -> Option<DeclutterOutcome>
    where
        M: MapWidget + ?Sized,
    {
        self.scheduler.fire(token)?;

        let world = self.state.world();
        let ids = self
            .state
            .visible()
            .iter()
            .filter_map(|idx| world.place(*idx))
            .map(|p| &p.id);
        let outcome = declutter(ids, &*map, self.declutter_config());

        for (id, visible) in outcome.visibility() {
            map.set_label_visible(id, visible);
        }

        self.metrics.inc_counter(DECLUTTER_PASSES, 1);
        self.metrics
            .inc_counter(DECLUTTER_HIDDEN, outcome.hidden.len() as u64);
        self.events.emit(
            "declutter",
            format!(
                "{} shown, {} hidden, {} skipped",
                outcome.shown.len(),
                outcome.hidden.len(),
                outcome.skipped.len()
            ),
        );
        Some(outcome)
    }

    pub fn popup_detail(&self, id: &str) -> Option<PopupDetail> {
        self.state.world().by_id(id).map(PopupDetail::for_entry)
    }

    /// Fit the map to the visible places. No-op when nothing is visible.
    pub fn fit_to_visible<M>(&self, map: &mut M)
    where
        M: MapWidget + ?Sized,
    {
        let Some(bounds) = visible_bounds(
            self.state.world(),
            self.state.visible(),
            self.config.fit_padding_ratio,
        ) else {
            debug!("fit skipped: nothing visible");
            return;
        };
        map.fit_bounds(bounds, self.config.fit_options());
    }

    fn declutter_config(&self) -> DeclutterConfig {
        self.config.declutter()
    }

    fn request_declutter<M>(&mut self, map: &mut M)
    where
        M: MapWidget + ?Sized,
    {
        let cancelled_before = self.scheduler.stats().cancelled;
        self.scheduler.schedule(map, DeclutterPass);
        self.metrics.inc_counter(DECLUTTER_REQUESTED, 1);
        let cancelled = self.scheduler.stats().cancelled - cancelled_before;
        if cancelled > 0 {
            self.metrics.inc_counter(DECLUTTER_CANCELLED, cancelled);
        }
    }

    fn apply<M, L>(&mut self, effects: Effects, map: &mut M, list: &mut L)
    where
        M: MapWidget + ?Sized,
        L: ListSurface + ?Sized,
    {
        if effects.visible_changed {
            let delta = self.markers.sync(self.state.visible_set());
            let world = self.state.world();
            for idx in &delta.removed {
                if let Some(place) = world.place(*idx) {
                    map.remove_marker(&place.id);
                }
            }
            for idx in &delta.added {
                if let Some(entry) = world.entry(*idx) {
                    map.add_marker(&MarkerSpec::for_entry(entry));
                }
            }
            debug!(
                added = delta.added.len(),
                removed = delta.removed.len(),
                "marker layer synced"
            );

            let visible = self.state.visible().len();
            let total = world.len();
            list.render_count(visible, total);
            self.metrics.set_gauge(PLACES_VISIBLE, visible as i64);
            self.metrics.set_gauge(PLACES_TOTAL, total as i64);
        }

        if effects.visible_changed || effects.render_list {
            list.render_rows(&rows(&self.state));
        }
        if effects.render_chips {
            list.render_chips(&chips(&self.state));
        }
        if effects.fit {
            self.fit_to_visible(map);
        }
        if let Some(place) = effects.fly_to.and_then(|idx| self.state.world().place(idx)) {
            let zoom = fly_zoom(map.zoom(), self.config.select_min_zoom);
            map.fly_to(place.position, zoom);
        }
        if let Some(place) = effects
            .open_popup
            .and_then(|idx| self.state.world().place(idx))
        {
            map.open_popup(&place.id);
        }
        if let Some(status) = &effects.status {
            list.set_status(status);
        }
        if effects.declutter {
            self.request_declutter(map);
        }
    }
}
