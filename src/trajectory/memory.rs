//! In-memory trajectory record.

use super::{DayTrack, Property, StoreError, TrajectoryStore, check_rows};
use crate::particles::ParticleStatus;
use crate::types::ParticleId;

/// A whole release held in memory, `[time][particle]` per property.
///
/// Rows that have not been written are `NaN` with no status, so a
/// partially tracked release is still a valid, truncated record.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    ids: Vec<ParticleId>,
    times: Vec<f64>,
    values: Vec<Vec<f64>>,
    status: Vec<Option<ParticleStatus>>,
    written: Vec<bool>,
}

impl MemoryStore {
    /// Empty record of `n_times` rows for the given particles.
    pub fn new(n_times: usize, ids: Vec<ParticleId>) -> Self {
        let np = ids.len();
        Self {
            ids,
            times: vec![f64::NAN; n_times],
            values: vec![vec![f64::NAN; n_times * np]; Property::COUNT],
            status: vec![None; n_times * np],
            written: vec![false; n_times],
        }
    }

    pub fn ids(&self) -> &[ParticleId] {
        &self.ids
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    #[inline]
    pub fn get(&self, prop: Property, t: usize, p: usize) -> f64 {
        self.values[prop.index()][t * self.ids.len() + p]
    }

    /// All particles of `prop` at row `t`.
    pub fn row(&self, prop: Property, t: usize) -> &[f64] {
        let np = self.ids.len();
        &self.values[prop.index()][t * np..(t + 1) * np]
    }

    /// Time series of `prop` for particle `p`.
    pub fn series(&self, prop: Property, p: usize) -> Vec<f64> {
        (0..self.times.len()).map(|t| self.get(prop, t, p)).collect()
    }

    /// Status at row `t`, `None` if the row has not been written.
    pub fn status(&self, t: usize, p: usize) -> Option<ParticleStatus> {
        self.status[t * self.ids.len() + p]
    }

    pub fn is_written(&self, t: usize) -> bool {
        self.written[t]
    }

    /// Number of rows written so far.
    pub fn n_written(&self) -> usize {
        self.written.iter().filter(|&&w| w).count()
    }
}

impl TrajectoryStore for MemoryStore {
    fn n_times(&self) -> usize {
        self.times.len()
    }

    fn n_particles(&self) -> usize {
        self.ids.len()
    }

    fn write_rows(&mut self, row0: usize, track: &DayTrack) -> Result<(), StoreError> {
        check_rows(self, row0, track)?;
        let np = self.ids.len();
        for r in 0..track.n_rows() {
            let t = row0 + r;
            self.times[t] = track.times()[r];
            for prop in Property::ALL {
                self.values[prop.index()][t * np..(t + 1) * np].copy_from_slice(track.row(prop, r));
            }
            let statuses = &mut self.status[t * np..(t + 1) * np];
            for (slot, &s) in statuses.iter_mut().zip(track.status_row(r)) {
                *slot = Some(s);
            }
            self.written[t] = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<ParticleId> {
        (0..n).map(ParticleId::new).collect()
    }

    #[test]
    fn test_write_rows() {
        let mut store = MemoryStore::new(5, ids(2));
        let mut day = DayTrack::new(3, 2);
        for r in 0..3 {
            day.set_time(r, 100.0 * r as f64);
            day.set(Property::Lon, r, 0, r as f64);
        }
        store.write_rows(2, &day).unwrap();
        assert_eq!(store.n_written(), 3);
        assert!(!store.is_written(1));
        assert_eq!(store.times()[4], 200.0);
        assert_eq!(store.get(Property::Lon, 3, 0), 1.0);
        assert_eq!(store.status(3, 1), Some(ParticleStatus::Active));
        assert_eq!(store.status(0, 1), None);
        assert!(store.series(Property::Lon, 0)[0].is_nan());
    }

    #[test]
    fn test_out_of_range() {
        let mut store = MemoryStore::new(4, ids(2));
        let day = DayTrack::new(3, 2);
        assert!(matches!(store.write_rows(2, &day), Err(StoreError::RowOutOfRange { .. })));
        let wrong = DayTrack::new(2, 3);
        assert!(matches!(
            store.write_rows(0, &wrong),
            Err(StoreError::ParticleMismatch { expected: 2, found: 3 })
        ));
        assert_eq!(store.n_written(), 0);
    }
}
