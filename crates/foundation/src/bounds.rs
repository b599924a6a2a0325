/// Axis-aligned screen-space rectangle, in pixels.
///
/// Convention: `min` is the top-left corner and `max` the bottom-right corner,
/// with `y` growing downwards as in DOM client rects.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Build from a `left, top, width, height` client rect.
    pub fn from_origin_size(origin: [f64; 2], size: [f64; 2]) -> Self {
        Aabb2 {
            min: origin,
            max: [origin[0] + size[0], origin[1] + size[1]],
        }
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    /// True when the rect has no drawable area or carries non-finite values.
    ///
    /// A label that has not been laid out yet reports such a rect.
    pub fn is_degenerate(&self) -> bool {
        let finite = self.min.iter().chain(self.max.iter()).all(|v| v.is_finite());
        !finite || self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Overlap test with `pad` pixels of clearance required on all sides.
    ///
    /// Two rects are separate only if, on at least one axis, one ends (plus
    /// padding) before the other starts.
    pub fn intersects_padded(&self, other: &Aabb2, pad: f64) -> bool {
        !(self.max[0] + pad < other.min[0]
            || self.min[0] - pad > other.max[0]
            || self.max[1] + pad < other.min[1]
            || self.min[1] - pad > other.max[1])
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;

    #[test]
    fn padded_overlap_counts_near_misses() {
        let a = Aabb2::from_origin_size([0.0, 0.0], [10.0, 10.0]);
        let near = Aabb2::from_origin_size([13.0, 0.0], [10.0, 10.0]);
        let far = Aabb2::from_origin_size([20.0, 0.0], [10.0, 10.0]);

        assert!(!a.intersects_padded(&near, 0.0));
        assert!(a.intersects_padded(&near, 4.0));
        assert!(!a.intersects_padded(&far, 4.0));
        assert!(!far.intersects_padded(&a, 4.0));
    }

    #[test]
    fn separation_on_one_axis_is_enough() {
        let a = Aabb2::from_origin_size([0.0, 0.0], [10.0, 10.0]);
        let below = Aabb2::from_origin_size([2.0, 30.0], [10.0, 10.0]);
        assert!(!a.intersects_padded(&below, 4.0));
    }

    #[test]
    fn degenerate_rects() {
        assert!(Aabb2::from_origin_size([5.0, 5.0], [0.0, 12.0]).is_degenerate());
        assert!(Aabb2::new([f64::NAN, 0.0], [1.0, 1.0]).is_degenerate());
        assert!(!Aabb2::from_origin_size([5.0, 5.0], [1.0, 1.0]).is_degenerate());
    }
}
