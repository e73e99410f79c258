//! Time-indexed snapshot sequences.

use std::sync::Arc;

use super::{Snapshot, SnapshotError};
use crate::types::SnapshotIndex;

/// An ordered sequence of snapshots keyed by a monotonically increasing index.
///
/// `load` is a scoped acquisition: implementations backed by files open,
/// read and close within the call.
pub trait SnapshotSource: Send + Sync {
    /// Number of snapshots available.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Absolute time (seconds) of snapshot `index`.
    fn time_of(&self, index: SnapshotIndex) -> Result<f64, SnapshotError>;

    /// Load snapshot `index`.
    fn load(&self, index: SnapshotIndex) -> Result<Arc<Snapshot>, SnapshotError>;
}

/// Snapshots held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    snapshots: Vec<Arc<Snapshot>>,
}

impl MemorySource {
    /// Create a source; times must be strictly increasing.
    pub fn new(snapshots: Vec<Snapshot>) -> Result<Self, SnapshotError> {
        for (k, pair) in snapshots.windows(2).enumerate() {
            if pair[1].time() <= pair[0].time() {
                return Err(SnapshotError::NonMonotonicTime {
                    index: k + 1,
                    previous: pair[0].time(),
                    found: pair[1].time(),
                });
            }
        }
        Ok(Self {
            snapshots: snapshots.into_iter().map(Arc::new).collect(),
        })
    }

    /// Sub-sequence `[start, start + len)`, sharing the loaded data.
    pub fn window(&self, start: usize, len: usize) -> Result<Self, SnapshotError> {
        let end = start + len;
        if end > self.snapshots.len() {
            return Err(SnapshotError::IndexOutOfRange {
                index: end.saturating_sub(1),
                len: self.snapshots.len(),
            });
        }
        Ok(Self {
            snapshots: self.snapshots[start..end].to_vec(),
        })
    }

    fn get(&self, index: SnapshotIndex) -> Result<&Arc<Snapshot>, SnapshotError> {
        self.snapshots
            .get(index.get())
            .ok_or(SnapshotError::IndexOutOfRange {
                index: index.get(),
                len: self.snapshots.len(),
            })
    }
}

impl SnapshotSource for MemorySource {
    fn len(&self) -> usize {
        self.snapshots.len()
    }

    fn time_of(&self, index: SnapshotIndex) -> Result<f64, SnapshotError> {
        Ok(self.get(index)?.time())
    }

    fn load(&self, index: SnapshotIndex) -> Result<Arc<Snapshot>, SnapshotError> {
        Ok(Arc::clone(self.get(index)?))
    }
}

/// Check that consecutive snapshots are `expected` seconds apart (within `tol`).
///
/// Returns the first irregular step as [`SnapshotError::DataGap`]. The tracker
/// does not call this itself; drivers run it before tracking.
pub fn check_spacing(
    source: &dyn SnapshotSource,
    expected: f64,
    tol: f64,
) -> Result<(), SnapshotError> {
    if source.len() < 2 {
        return Ok(());
    }
    let mut prev = source.time_of(SnapshotIndex::new(0))?;
    for k in 1..source.len() {
        let t = source.time_of(SnapshotIndex::new(k))?;
        let found = t - prev;
        if (found - expected).abs() > tol {
            return Err(SnapshotError::DataGap {
                index: k,
                expected,
                found,
            });
        }
        prev = t;
    }
    Ok(())
}
