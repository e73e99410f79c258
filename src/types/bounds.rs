//! Geographic domain bounds.

use std::fmt;

/// Longitude/latitude envelope of a grid, in degrees.
///
/// # Example
///
/// ```
/// use ptrack_rs::types::GeoBounds;
///
/// let bounds = GeoBounds::new(-125.0, -122.0, 46.0, 50.0);
/// assert!(bounds.contains(-123.5, 48.0));
/// assert_eq!(bounds.to_string(), "lon [-125.0000, -122.0000] × lat [46.0000, 50.0000]");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    /// Western edge (minimum longitude)
    pub lon_min: f64,
    /// Eastern edge (maximum longitude)
    pub lon_max: f64,
    /// Southern edge (minimum latitude)
    pub lat_min: f64,
    /// Northern edge (maximum latitude)
    pub lat_max: f64,
}

impl GeoBounds {
    /// Create new bounds.
    ///
    /// # Panics
    ///
    /// Panics if `lon_max < lon_min` or `lat_max < lat_min`.
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        assert!(
            lon_max >= lon_min,
            "lon_max ({}) must not be less than lon_min ({})",
            lon_max,
            lon_min
        );
        assert!(
            lat_max >= lat_min,
            "lat_max ({}) must not be less than lat_min ({})",
            lat_max,
            lat_min
        );

        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// Check if a point is inside the envelope (inclusive).
    #[inline]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.lon_min && lon <= self.lon_max && lat >= self.lat_min && lat <= self.lat_max
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lon [{:.4}, {:.4}] × lat [{:.4}, {:.4}]",
            self.lon_min, self.lon_max, self.lat_min, self.lat_max
        )
    }
}
