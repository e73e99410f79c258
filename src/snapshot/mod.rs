//! Ocean-state snapshots and their sources.
//!
//! A [`Snapshot`] holds every field for one output time. Snapshots are
//! immutable once built and are shared behind `Arc` for the interval(s)
//! that reference them. A [`SnapshotSource`] is the ordered, time-indexed
//! sequence the tracker walks; [`check_spacing`] is the caller-side gap
//! check run before tracking.
//!
//! # Example
//!
//! ```
//! use ptrack_rs::grid::{Axis, GridModel};
//! use ptrack_rs::snapshot::{MemorySource, SnapshotBuilder, SnapshotSource, Variable};
//! use ptrack_rs::vertical::SigmaLevels;
//!
//! let grid = GridModel::regular(
//!     Axis::linspace(0.0, 0.02, 3).unwrap(),
//!     Axis::linspace(60.0, 60.02, 3).unwrap(),
//!     SigmaLevels::uniform(4),
//! )
//! .unwrap();
//!
//! let snap = |t| {
//!     SnapshotBuilder::new(&grid, t)
//!         .uniform(Variable::U, 1.0)
//!         .uniform(Variable::V, 0.0)
//!         .uniform(Variable::Zeta, 0.0)
//!         .uniform(Variable::H, 50.0)
//!         .build()
//! };
//! let source = MemorySource::new(vec![snap(0.0), snap(3600.0)]).unwrap();
//! assert_eq!(source.len(), 2);
//! ```

mod catalog;
mod field;
#[cfg(feature = "netcdf")]
mod roms_history;
#[allow(clippy::module_inception)]
mod snapshot;
mod source;
mod variable;

pub use catalog::{ContinuousCatalog, SnapshotCatalog};
pub use field::Field;
#[cfg(feature = "netcdf")]
pub use roms_history::{RomsHistorySource, read_grid};
pub use snapshot::{Snapshot, SnapshotBuilder};
pub use source::{MemorySource, SnapshotSource, check_spacing};
pub use variable::{Variable, VerticalLayout};

use thiserror::Error;

use crate::grid::GridError;

/// Errors raised while building or reading snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Index past the end of the source
    #[error("Snapshot index {index} out of range (source has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Requested variable not present
    #[error("Missing variable: {0}")]
    MissingVariable(String),

    /// Field shape does not match the grid
    #[error("Shape mismatch for {what}: expected {expected:?}, found {found} values")]
    ShapeMismatch {
        what: String,
        expected: (usize, usize, usize),
        found: usize,
    },

    /// Snapshot times not strictly increasing
    #[error("Snapshot {index} at t={found} does not follow t={previous}")]
    NonMonotonicTime { index: usize, previous: f64, found: f64 },

    /// Irregular spacing between consecutive snapshots
    #[error("Data gap before snapshot {index}: expected spacing {expected} s, found {found} s")]
    DataGap { index: usize, expected: f64, found: f64 },

    /// Catalog has no snapshots for the requested day
    #[error("No snapshots for day {0}")]
    DayOutOfRange(i64),

    /// Invalid data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Grid construction failed
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// NetCDF library error
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),
}
