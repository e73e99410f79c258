//! Staggered (Arakawa C) grid locations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Axis, GridError, LandMask};
use crate::types::GeoBounds;

/// Where on the staggered grid a variable lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridLocation {
    /// Cell centers: tracers, free surface, bathymetry, wind, vertical velocity
    Rho,
    /// East faces: eastward velocity
    U,
    /// North faces: northward velocity
    V,
}

impl GridLocation {
    /// All locations in storage order.
    pub const ALL: [GridLocation; 3] = [GridLocation::Rho, GridLocation::U, GridLocation::V];

    /// Position in [`GridLocation::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            GridLocation::Rho => 0,
            GridLocation::U => 1,
            GridLocation::V => 2,
        }
    }

    /// ROMS name suffix ("rho", "u", "v").
    pub const fn suffix(self) -> &'static str {
        match self {
            GridLocation::Rho => "rho",
            GridLocation::U => "u",
            GridLocation::V => "v",
        }
    }
}

impl fmt::Display for GridLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// One coordinate system of the staggered grid: plaid lon/lat axes plus mask.
#[derive(Clone, Debug)]
pub struct StaggeredGrid {
    location: GridLocation,
    lon: Axis,
    lat: Axis,
    mask: LandMask,
}

impl StaggeredGrid {
    /// Create a coordinate system, checking that the mask matches the axes.
    pub fn new(
        location: GridLocation,
        lon: Axis,
        lat: Axis,
        mask: LandMask,
    ) -> Result<Self, GridError> {
        if lon.len() < 2 || lat.len() < 2 {
            return Err(GridError::TooFewPoints {
                needed: 2,
                found: lon.len().min(lat.len()),
            });
        }
        if mask.shape() != (lat.len(), lon.len()) {
            return Err(GridError::ShapeMismatch {
                what: format!("{} mask", location),
                expected: (lat.len(), lon.len()),
                found: mask.shape().0 * mask.shape().1,
            });
        }
        Ok(Self {
            location,
            lon,
            lat,
            mask,
        })
    }

    /// Which staggered location this is.
    #[inline]
    pub fn location(&self) -> GridLocation {
        self.location
    }

    /// Longitude axis (columns).
    #[inline]
    pub fn lon(&self) -> &Axis {
        &self.lon
    }

    /// Latitude axis (rows).
    #[inline]
    pub fn lat(&self) -> &Axis {
        &self.lat
    }

    /// Land mask.
    #[inline]
    pub fn mask(&self) -> &LandMask {
        &self.mask
    }

    /// Shape `(ny, nx)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.lat.len(), self.lon.len())
    }

    /// Lon/lat envelope.
    pub fn bounds(&self) -> GeoBounds {
        GeoBounds::new(self.lon.min(), self.lon.max(), self.lat.min(), self.lat.max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_checked() {
        let lon = Axis::linspace(0.0, 2.0, 3).unwrap();
        let lat = Axis::linspace(0.0, 1.0, 2).unwrap();
        let mask = LandMask::all_wet(2, 3);
        assert!(StaggeredGrid::new(GridLocation::Rho, lon.clone(), lat.clone(), mask).is_ok());
        assert!(StaggeredGrid::new(GridLocation::Rho, lon, lat, LandMask::all_wet(3, 2)).is_err());
    }

    #[test]
    fn test_location_index_matches_all() {
        for (i, loc) in GridLocation::ALL.iter().enumerate() {
            assert_eq!(loc.index(), i);
        }
        assert_eq!(GridLocation::U.to_string(), "u");
    }
}
