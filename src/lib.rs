//! # ptrack-rs
//!
//! Lagrangian particle tracking through ROMS ocean-model output.
//!
//! This crate provides the building blocks of an offline tracker:
//! - Staggered Arakawa-C grids with land masks and sigma levels
//! - Snapshot sources (in-memory and ROMS history files)
//! - Trilinear interpolation with per-variable land fill
//! - Runge-Kutta integrators (RK2, RK4 or user-defined)
//! - Surface-trapped drift with windage, or 3-D tracking with vertical mixing
//! - A daily tracking engine and a multi-release driver
//! - Trajectory stores (in-memory and CF-style NetCDF)

pub mod config;
pub mod grid;
pub mod integrate;
pub mod interp;
pub mod particles;
pub mod release;
pub mod snapshot;
pub mod tracker;
pub mod trajectory;
pub mod types;
pub mod vertical;

// Re-export main types for convenience
pub use config::{ConfigError, Direction, RunConfig};
pub use grid::{Axis, ExtrapolationPolicy, GridError, GridLocation, GridModel, LandMask};
pub use integrate::{Integrator, Method, Rk2, Rk4, StepContext, StepVelocity, SubStep};
pub use interp::{FillPolicy, InterpolationStrategy, Samples, SpatialInterpolator, TemporalSampler};
pub use particles::{ParticleError, ParticleSet, ParticleStatus, Positions};
pub use release::{Release, ReleaseInfo, ReleaseRunner, ReleaseSummary};
pub use snapshot::{
    ContinuousCatalog, MemorySource, Snapshot, SnapshotBuilder, SnapshotCatalog, SnapshotError,
    SnapshotSource, Variable,
};
pub use tracker::{TrackError, Tracker, TrackerState};
pub use trajectory::{DayTrack, MemoryStore, Property, StoreError, TrajectoryStore};
pub use types::{GeoBounds, ParticleId, SnapshotIndex};
pub use vertical::{SigmaLevels, SongHaidvogelStretching, Stretching, UniformStretching};

#[cfg(feature = "netcdf")]
pub use snapshot::{RomsHistorySource, read_grid};
#[cfg(feature = "netcdf")]
pub use trajectory::{NetCDFTrajectoryStore, TrajectoryFileConfig};
