//! The daily tracking engine.
//!
//! [`Tracker`] advances a [`ParticleSet`](crate::particles::ParticleSet)
//! through the snapshot intervals of one tracking day:
//!
//! ```text
//! Idle -> Stepping{0, 0..ndiv} -> Written{0} -> Stepping{1, ..} -> ... -> Done
//! ```
//!
//! Each interval of `delta_t` seconds (negative in reverse) is split into
//! `ndiv` sub-steps. Saves fall every `ndiv / saves_per_interval` sub-steps,
//! plus the initial state, and record positions together with properties
//! sampled at the same time. The walk runs on a copy of the particle set,
//! which replaces the caller's set only when the whole day succeeded.

mod engine;
mod state;

pub use engine::Tracker;
pub use state::TrackerState;

use thiserror::Error;

use crate::config::ConfigError;
use crate::grid::GridError;
use crate::particles::ParticleError;
use crate::snapshot::SnapshotError;
use crate::trajectory::StoreError;

/// Whole-batch failures. Per-particle conditions are recorded in-band.
#[derive(Debug, Error)]
pub enum TrackError {
    /// Fewer snapshots than the requested intervals need
    #[error("Missing snapshots: {needed} needed, {found} supplied")]
    MissingSnapshots { needed: usize, found: usize },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Trajectory store error: {0}")]
    Store(#[from] StoreError),

    #[error("Particle error: {0}")]
    Particles(#[from] ParticleError),
}
