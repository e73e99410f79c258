//! Day-indexed access to snapshot sequences.

use std::sync::Arc;

use super::{MemorySource, SnapshotError, SnapshotSource};

/// Supplies the snapshot sequence for one tracking day.
///
/// Day `d` covers snapshots `[d·n, (d+1)·n]` where `n` is the number of
/// intervals per day, so consecutive days share their boundary snapshot.
pub trait SnapshotCatalog {
    /// Snapshots for `day`, in chronological order.
    fn day(
        &self,
        day: i64,
        intervals_per_day: usize,
    ) -> Result<Box<dyn SnapshotSource>, SnapshotError>;
}

/// A catalog cut from one continuous in-memory record.
#[derive(Clone, Debug)]
pub struct ContinuousCatalog {
    source: Arc<MemorySource>,
}

impl ContinuousCatalog {
    pub fn new(source: MemorySource) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Number of whole days available.
    pub fn n_days(&self, intervals_per_day: usize) -> usize {
        match self.source.len() {
            0 => 0,
            n => (n - 1) / intervals_per_day.max(1),
        }
    }
}

impl SnapshotCatalog for ContinuousCatalog {
    fn day(
        &self,
        day: i64,
        intervals_per_day: usize,
    ) -> Result<Box<dyn SnapshotSource>, SnapshotError> {
        let start = usize::try_from(day).map_err(|_| SnapshotError::DayOutOfRange(day))?;
        let start = start * intervals_per_day;
        let available = self.source.len().saturating_sub(start).min(intervals_per_day + 1);
        if available == 0 {
            return Err(SnapshotError::DayOutOfRange(day));
        }
        // Short days are handed through; the tracker reports MissingSnapshots.
        Ok(Box::new(self.source.window(start, available)?))
    }
}
