//! Trajectory records.
//!
//! The tracker produces one [`DayTrack`] per tracking day and hands it to a
//! [`TrajectoryStore`] only after the day has finished, so a failed day
//! never touches rows written by earlier days. Stores are sized for the
//! whole release up front; unwritten rows stay as fill values.

mod memory;
#[cfg(feature = "netcdf")]
mod netcdf_store;
mod property;
mod track;

pub use memory::MemoryStore;
#[cfg(feature = "netcdf")]
pub use netcdf_store::{
    FILL_VALUE_F64, FILL_VALUE_STATUS, NetCDFTrajectoryStore, TrajectoryFileConfig,
};
pub use property::Property;
pub use track::DayTrack;

use thiserror::Error;

/// Error type for trajectory output.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Rows past the end of the record
    #[error("Rows {row0}..{end} out of range (record has {n_times} times)")]
    RowOutOfRange { row0: usize, end: usize, n_times: usize },

    /// Day track sized for a different particle count
    #[error("Particle count mismatch: store has {expected}, track has {found}")]
    ParticleMismatch { expected: usize, found: usize },

    /// Missing variable
    #[error("Missing variable: {0}")]
    MissingVariable(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// NetCDF library error
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),
}

/// Durable `[time, particle]` record of one release.
pub trait TrajectoryStore {
    /// Rows in the record.
    fn n_times(&self) -> usize;

    /// Particles per row.
    fn n_particles(&self) -> usize;

    /// Write every row of `track` starting at row `row0`.
    ///
    /// Overlapping a previously written row overwrites it with identical
    /// data (consecutive days share their boundary save).
    fn write_rows(&mut self, row0: usize, track: &DayTrack) -> Result<(), StoreError>;
}

/// Validate a write before touching any row.
pub(crate) fn check_rows<S: TrajectoryStore + ?Sized>(
    store: &S,
    row0: usize,
    track: &DayTrack,
) -> Result<(), StoreError> {
    if track.n_particles() != store.n_particles() {
        return Err(StoreError::ParticleMismatch {
            expected: store.n_particles(),
            found: track.n_particles(),
        });
    }
    let end = row0 + track.n_rows();
    if end > store.n_times() {
        return Err(StoreError::RowOutOfRange {
            row0,
            end,
            n_times: store.n_times(),
        });
    }
    Ok(())
}
