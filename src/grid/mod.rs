//! Grid model: staggered horizontal coordinate systems, land masks and the
//! vertical sigma levels.
//!
//! A ROMS-style grid has three horizontal coordinate systems:
//!
//! - **rho**: cell centers (`nx × ny`)
//! - **u**: east/west faces (`(nx-1) × ny`), eastward velocity
//! - **v**: north/south faces (`nx × (ny-1)`), northward velocity
//!
//! Each carries plaid longitude/latitude axes and a static water mask. The
//! domain envelope used for out-of-domain detection is that of the rho grid.
//!
//! # Example
//!
//! ```
//! use ptrack_rs::grid::{Axis, GridLocation, GridModel};
//! use ptrack_rs::vertical::SigmaLevels;
//!
//! let lon = Axis::linspace(-123.0, -122.0, 11).unwrap();
//! let lat = Axis::linspace(47.0, 48.0, 11).unwrap();
//! let grid = GridModel::regular(lon, lat, SigmaLevels::uniform(10)).unwrap();
//!
//! assert_eq!(grid.get(GridLocation::U).shape(), (11, 10));
//! assert_eq!(grid.get(GridLocation::V).shape(), (10, 11));
//! assert!(grid.bounds().contains(-122.5, 47.5));
//! ```

mod axis;
mod land_mask;
mod staggered;

pub use axis::{Axis, Bracket, ExtrapolationPolicy};
pub use land_mask::{LandMask, LandMaskStatistics};
pub use staggered::{GridLocation, StaggeredGrid};

use thiserror::Error;

use crate::types::GeoBounds;
use crate::vertical::SigmaLevels;

/// Error type for grid construction.
#[derive(Debug, Error)]
pub enum GridError {
    /// Coordinate values are not strictly monotonic
    #[error("non-monotonic coordinates: {0}")]
    NonMonotonic(String),

    /// Array size does not match the expected shape
    #[error("{what}: expected shape {expected:?}, got {found} values")]
    ShapeMismatch {
        what: String,
        expected: (usize, usize),
        found: usize,
    },

    /// Not enough nodes along an axis
    #[error("need at least {needed} points, found {found}")]
    TooFewPoints { needed: usize, found: usize },

    /// 2-D coordinates cannot be reduced to 1-D axes
    #[error("coordinates are not plaid: {0}")]
    NotPlaid(String),

    /// Invalid sigma level curves
    #[error("invalid sigma levels: {0}")]
    InvalidSigmaLevels(String),

    /// A staggered grid was supplied for the wrong location
    #[error("expected {expected} grid, got {found}")]
    WrongLocation {
        expected: GridLocation,
        found: GridLocation,
    },
}

/// The full model grid.
#[derive(Clone, Debug)]
pub struct GridModel {
    grids: [StaggeredGrid; 3],
    levels: SigmaLevels,
}

impl GridModel {
    /// Assemble a grid from its three staggered coordinate systems.
    pub fn new(
        rho: StaggeredGrid,
        u: StaggeredGrid,
        v: StaggeredGrid,
        levels: SigmaLevels,
    ) -> Result<Self, GridError> {
        let expected_locations = [
            (&rho, GridLocation::Rho),
            (&u, GridLocation::U),
            (&v, GridLocation::V),
        ];
        for (grid, expected) in expected_locations {
            if grid.location() != expected {
                return Err(GridError::WrongLocation {
                    expected,
                    found: grid.location(),
                });
            }
        }
        Ok(Self {
            grids: [rho, u, v],
            levels,
        })
    }

    /// Build a fully wet plaid grid from rho axes.
    ///
    /// u points sit at longitude midpoints, v points at latitude midpoints.
    pub fn regular(lon: Axis, lat: Axis, levels: SigmaLevels) -> Result<Self, GridError> {
        let mask = LandMask::all_wet(lat.len(), lon.len());
        Self::from_rho_mask(lon, lat, mask, levels)
    }

    /// Build a plaid grid from rho axes and a rho mask, deriving u and v.
    pub fn from_rho_mask(
        lon: Axis,
        lat: Axis,
        mask: LandMask,
        levels: SigmaLevels,
    ) -> Result<Self, GridError> {
        let lon_u = Axis::new(midpoints(lon.values()))?;
        let lat_v = Axis::new(midpoints(lat.values()))?;
        let mask_u = LandMask::u_from_rho(&mask);
        let mask_v = LandMask::v_from_rho(&mask);

        let rho = StaggeredGrid::new(GridLocation::Rho, lon.clone(), lat.clone(), mask)?;
        let u = StaggeredGrid::new(GridLocation::U, lon_u, lat.clone(), mask_u)?;
        let v = StaggeredGrid::new(GridLocation::V, lon, lat_v, mask_v)?;
        Self::new(rho, u, v, levels)
    }

    /// Copy of this grid with the given rho cells `(j, i)` turned to land.
    ///
    /// Fails with [`GridError::ShapeMismatch`] if a cell is outside the grid.
    pub fn with_land(&self, cells: &[(usize, usize)]) -> Result<Self, GridError> {
        let rho = self.get(GridLocation::Rho);
        let mut mask = rho.mask().clone();
        for &(j, i) in cells {
            mask.set_land(j, i)?;
        }
        Self::from_rho_mask(rho.lon().clone(), rho.lat().clone(), mask, self.levels.clone())
    }

    /// Coordinate system for a staggered location.
    #[inline]
    pub fn get(&self, location: GridLocation) -> &StaggeredGrid {
        &self.grids[location.index()]
    }

    /// Vertical levels.
    #[inline]
    pub fn levels(&self) -> &SigmaLevels {
        &self.levels
    }

    /// Domain envelope (rho grid).
    pub fn bounds(&self) -> GeoBounds {
        self.get(GridLocation::Rho).bounds()
    }

    /// Whether a horizontal position is inside the domain under `policy`.
    ///
    /// With [`ExtrapolationPolicy::Clamp`] every finite position counts as
    /// inside.
    pub fn in_domain(&self, lon: f64, lat: f64, policy: ExtrapolationPolicy) -> bool {
        let rho = self.get(GridLocation::Rho);
        rho.lon().bracket(lon, policy).is_some() && rho.lat().bracket(lat, policy).is_some()
    }
}

fn midpoints(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}
