//! One tracking day's worth of save rows.

use super::Property;
use crate::particles::ParticleStatus;

/// Save rows for one day, laid out `[time][particle]`.
///
/// Rows start as `NaN`; the tracker fills them as saves are reached.
#[derive(Clone, Debug, PartialEq)]
pub struct DayTrack {
    n_particles: usize,
    times: Vec<f64>,
    values: Vec<Vec<f64>>,
    status: Vec<ParticleStatus>,
}

impl DayTrack {
    pub fn new(n_rows: usize, n_particles: usize) -> Self {
        Self {
            n_particles,
            times: vec![f64::NAN; n_rows],
            values: vec![vec![f64::NAN; n_rows * n_particles]; Property::COUNT],
            status: vec![ParticleStatus::Active; n_rows * n_particles],
        }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn n_particles(&self) -> usize {
        self.n_particles
    }

    /// Absolute time of every row.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn set_time(&mut self, row: usize, time: f64) {
        self.times[row] = time;
    }

    #[inline]
    pub fn get(&self, prop: Property, row: usize, p: usize) -> f64 {
        self.values[prop.index()][row * self.n_particles + p]
    }

    #[inline]
    pub fn set(&mut self, prop: Property, row: usize, p: usize, value: f64) {
        self.values[prop.index()][row * self.n_particles + p] = value;
    }

    /// All particles of `prop` at `row`.
    pub fn row(&self, prop: Property, row: usize) -> &[f64] {
        let start = row * self.n_particles;
        &self.values[prop.index()][start..start + self.n_particles]
    }

    /// Every property of particle `p` at `row`, in [`Property::ALL`] order.
    pub fn record(&self, row: usize, p: usize) -> Vec<f64> {
        Property::ALL.iter().map(|&prop| self.get(prop, row, p)).collect()
    }

    /// Overwrite every property of particle `p` at `row`.
    pub fn set_record(&mut self, row: usize, p: usize, values: &[f64]) {
        for (&prop, &v) in Property::ALL.iter().zip(values) {
            self.set(prop, row, p, v);
        }
    }

    #[inline]
    pub fn status(&self, row: usize, p: usize) -> ParticleStatus {
        self.status[row * self.n_particles + p]
    }

    pub fn set_status(&mut self, row: usize, p: usize, status: ParticleStatus) {
        self.status[row * self.n_particles + p] = status;
    }

    /// Status of every particle at `row`.
    pub fn status_row(&self, row: usize) -> &[ParticleStatus] {
        let start = row * self.n_particles;
        &self.status[start..start + self.n_particles]
    }

    /// Reverse the row order, so reverse-tracked days run forward in time.
    pub fn reverse_time(&mut self) {
        let np = self.n_particles;
        let n_rows = self.n_rows();
        self.times.reverse();
        let flip = |data: &mut Vec<f64>| {
            let mut out = Vec::with_capacity(data.len());
            for r in (0..n_rows).rev() {
                out.extend_from_slice(&data[r * np..(r + 1) * np]);
            }
            *data = out;
        };
        for column in &mut self.values {
            flip(column);
        }
        let mut status = Vec::with_capacity(self.status.len());
        for r in (0..n_rows).rev() {
            status.extend_from_slice(&self.status[r * np..(r + 1) * np]);
        }
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let mut t = DayTrack::new(3, 2);
        assert!(t.get(Property::Lon, 0, 0).is_nan());
        t.set(Property::Lon, 1, 1, 5.0);
        assert_eq!(t.row(Property::Lon, 1)[1], 5.0);
        assert!(t.row(Property::Lon, 1)[0].is_nan());
    }

    #[test]
    fn test_reverse_time() {
        let mut t = DayTrack::new(3, 2);
        for r in 0..3 {
            t.set_time(r, r as f64);
            for p in 0..2 {
                t.set(Property::Lat, r, p, (10 * r + p) as f64);
            }
        }
        t.set_status(2, 1, ParticleStatus::Beached);
        t.reverse_time();
        assert_eq!(t.times(), &[2.0, 1.0, 0.0]);
        assert_eq!(t.row(Property::Lat, 0), &[20.0, 21.0]);
        assert_eq!(t.row(Property::Lat, 2), &[0.0, 1.0]);
        assert_eq!(t.status(0, 1), ParticleStatus::Beached);
        assert_eq!(t.status(2, 1), ParticleStatus::Active);
    }

    #[test]
    fn test_record_roundtrip() {
        let mut t = DayTrack::new(1, 1);
        let rec: Vec<f64> = (0..Property::COUNT).map(|k| k as f64).collect();
        t.set_record(0, 0, &rec);
        assert_eq!(t.record(0, 0), rec);
        assert_eq!(t.get(Property::Vwind, 0, 0), 13.0);
    }
}
