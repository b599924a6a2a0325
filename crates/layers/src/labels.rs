use foundation::{Aabb2, PlaceId};
use tracing::debug;

/// Read access to the live, laid-out label rectangles of the map widget.
///
/// `None` means the label has no geometry yet (not rendered, detached, or
/// mid-layout).
pub trait LabelGeometry {
    fn label_rect(&self, id: &PlaceId) -> Option<Aabb2>;
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DeclutterConfig {
    /// Clearance required between two shown labels, on every side.
    pub padding_px: f64,
}

impl Default for DeclutterConfig {
    fn default() -> Self {
        Self { padding_px: 4.0 }
    }
}

/// Result of one declutter pass. Every input id lands in exactly one list,
/// each list keeping input order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DeclutterOutcome {
    pub shown: Vec<PlaceId>,
    pub hidden: Vec<PlaceId>,
    /// No usable rect this pass; visibility left as it was.
    pub skipped: Vec<PlaceId>,
}

impl DeclutterOutcome {
    pub fn visibility(&self) -> impl Iterator<Item = (&PlaceId, bool)> + '_ {
        self.shown
            .iter()
            .map(|id| (id, true))
            .chain(self.hidden.iter().map(|id| (id, false)))
    }
}

/// Greedy label overlap resolution.
///
/// `ordered` is the visible set in display order; earlier ids win. A label
/// is hidden when its rect touches any already-kept rect within
/// `config.padding_px`. O(n·k) for n labels and k kept.
pub fn declutter<'a, G, I>(ordered: I, geometry: &G, config: DeclutterConfig) -> DeclutterOutcome
where
    G: LabelGeometry + ?Sized,
    I: IntoIterator<Item = &'a PlaceId>,
{
    let mut out = DeclutterOutcome::default();
    let mut kept: Vec<Aabb2> = Vec::new();

    for id in ordered {
        let Some(rect) = geometry.label_rect(id).filter(|r| !r.is_degenerate()) else {
            out.skipped.push(id.clone());
            continue;
        };

        if kept
            .iter()
            .any(|k| k.intersects_padded(&rect, config.padding_px))
        {
            out.hidden.push(id.clone());
        } else {
            kept.push(rect);
            out.shown.push(id.clone());
        }
    }

    debug!(
        shown = out.shown.len(),
        hidden = out.hidden.len(),
        skipped = out.skipped.len(),
        "declutter pass"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct FixedRects(HashMap<PlaceId, Aabb2>);

    impl FixedRects {
        fn new(rects: &[(&str, [f64; 4])]) -> Self {
            Self(
                rects
                    .iter()
                    .map(|(id, [x, y, w, h])| {
                        (PlaceId::new(*id), Aabb2::from_origin_size([*x, *y], [*w, *h]))
                    })
                    .collect(),
            )
        }
    }

    impl LabelGeometry for FixedRects {
        fn label_rect(&self, id: &PlaceId) -> Option<Aabb2> {
            self.0.get(id).copied()
        }
    }

    fn ids(names: &[&str]) -> Vec<PlaceId> {
        names.iter().map(|n| PlaceId::new(*n)).collect()
    }

    #[test]
    fn first_label_wins_a_pileup() {
        let geo = FixedRects::new(&[
            ("a", [0.0, 0.0, 40.0, 12.0]),
            ("b", [10.0, 2.0, 40.0, 12.0]),
            ("c", [20.0, 4.0, 40.0, 12.0]),
        ]);
        let order = ids(&["a", "b", "c"]);
        let out = declutter(&order, &geo, DeclutterConfig::default());

        assert_eq!(out.shown, ids(&["a"]));
        assert_eq!(out.hidden, ids(&["b", "c"]));
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn priority_follows_input_order() {
        let geo = FixedRects::new(&[
            ("a", [0.0, 0.0, 40.0, 12.0]),
            ("b", [10.0, 2.0, 40.0, 12.0]),
        ]);
        let out = declutter(&ids(&["b", "a"]), &geo, DeclutterConfig::default());
        assert_eq!(out.shown, ids(&["b"]));
        assert_eq!(out.hidden, ids(&["a"]));
    }

    #[test]
    fn separated_labels_all_shown() {
        let geo = FixedRects::new(&[
            ("a", [0.0, 0.0, 40.0, 12.0]),
            ("b", [100.0, 0.0, 40.0, 12.0]),
            ("c", [0.0, 100.0, 40.0, 12.0]),
        ]);
        let out = declutter(&ids(&["a", "b", "c"]), &geo, DeclutterConfig::default());
        assert_eq!(out.shown, ids(&["a", "b", "c"]));
        assert!(out.hidden.is_empty());
    }

    #[test]
    fn padding_hides_near_misses() {
        // 3px gap: closer than the 4px clearance.
        let geo = FixedRects::new(&[
            ("a", [0.0, 0.0, 10.0, 10.0]),
            ("b", [13.0, 0.0, 10.0, 10.0]),
        ]);
        let order = ids(&["a", "b"]);
        let out = declutter(&order, &geo, DeclutterConfig::default());
        assert_eq!(out.hidden, ids(&["b"]));

        let out = declutter(&order, &geo, DeclutterConfig { padding_px: 2.0 });
        assert_eq!(out.shown, ids(&["a", "b"]));
    }

    #[test]
    fn missing_or_empty_rects_are_skipped() {
        let geo = FixedRects::new(&[
            ("a", [0.0, 0.0, 40.0, 12.0]),
            ("zero", [5.0, 5.0, 0.0, 12.0]),
            ("b", [5.0, 5.0, 40.0, 12.0]),
        ]);
        let out = declutter(
            &ids(&["ghost", "zero", "a", "b"]),
            &geo,
            DeclutterConfig::default(),
        );
        assert_eq!(out.skipped, ids(&["ghost", "zero"]));
        assert_eq!(out.shown, ids(&["a"]));
        assert_eq!(out.hidden, ids(&["b"]));

        let vis: Vec<(&str, bool)> = out.visibility().map(|(id, v)| (id.as_str(), v)).collect();
        assert_eq!(vis, vec![("a", true), ("b", false)]);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let geo = FixedRects::new(&[]);
        let out = declutter(&ids(&[]), &geo, DeclutterConfig::default());
        assert_eq!(out, DeclutterOutcome::default());
    }
}
