/// Geographic coordinate in degrees (WGS84).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Lat/lon bounding box.
///
/// Does not attempt antimeridian wrapping: `west <= east` always.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Minimal box covering all finite points, or `None` if there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLon>,
    {
        let mut out: Option<GeoBounds> = None;
        for p in points.into_iter().filter(LatLon::is_finite) {
            out = Some(match out {
                None => GeoBounds {
                    south: p.lat,
                    west: p.lon,
                    north: p.lat,
                    east: p.lon,
                },
                Some(b) => GeoBounds {
                    south: b.south.min(p.lat),
                    west: b.west.min(p.lon),
                    north: b.north.max(p.lat),
                    east: b.east.max(p.lon),
                },
            });
        }
        out
    }

    /// Grow each side by `ratio` of the box extent on that axis.
    ///
    /// A single-point box stays a point; the zoom clamp of the caller deals
    /// with that case.
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_buf = (self.north - self.south).abs() * ratio;
        let lon_buf = (self.east - self.west).abs() * ratio;
        GeoBounds {
            south: self.south - lat_buf,
            west: self.west - lon_buf,
            north: self.north + lat_buf,
            east: self.east + lon_buf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoBounds, LatLon};

    #[test]
    fn bounds_cover_points_and_skip_non_finite() {
        let b = GeoBounds::from_points([
            LatLon::new(35.0, 129.0),
            LatLon::new(f64::NAN, 0.0),
            LatLon::new(37.5, 127.0),
        ])
        .unwrap();
        assert_eq!(
            b,
            GeoBounds {
                south: 35.0,
                west: 127.0,
                north: 37.5,
                east: 129.0
            }
        );
        assert!(GeoBounds::from_points(Vec::<LatLon>::new()).is_none());
    }

    #[test]
    fn pad_grows_by_fraction_of_extent() {
        let b = GeoBounds {
            south: 0.0,
            west: 0.0,
            north: 10.0,
            east: 20.0,
        };
        let p = b.pad(0.2);
        assert_eq!(p.south, -2.0);
        assert_eq!(p.north, 12.0);
        assert_eq!(p.west, -4.0);
        assert_eq!(p.east, 24.0);
    }

    #[test]
    fn single_point_stays_point() {
        let b = GeoBounds::from_points([LatLon::new(1.0, 2.0)]).unwrap();
        assert_eq!(b.pad(0.2), b);
    }
}
