//! Linear blending between two bracketing snapshots.

use std::sync::Arc;

use super::{Samples, SpatialInterpolator};
use crate::particles::Positions;
use crate::snapshot::{Snapshot, SnapshotError, Variable};

/// Samples fields at a fractional time between two snapshots.
///
/// `value = (1 - frac) * value(s0) + frac * value(s1)`, with each endpoint
/// land-filled by the spatial interpolator. At `frac == 0` or `frac == 1`
/// the endpoint is returned as is, without touching the other snapshot.
pub struct TemporalSampler<'a, 'g> {
    interp: &'a SpatialInterpolator<'g>,
    s0: Arc<Snapshot>,
    s1: Arc<Snapshot>,
}

impl<'a, 'g> TemporalSampler<'a, 'g> {
    pub fn new(interp: &'a SpatialInterpolator<'g>, s0: Arc<Snapshot>, s1: Arc<Snapshot>) -> Self {
        Self { interp, s0, s1 }
    }

    /// Absolute time at `frac`.
    pub fn time_at(&self, frac: f64) -> f64 {
        (1.0 - frac) * self.s0.time() + frac * self.s1.time()
    }

    /// Sample `vars` at `frac`; every variable must be present.
    pub fn sample(
        &self,
        vars: &[Variable],
        positions: &Positions,
        frac: f64,
    ) -> Result<Samples, SnapshotError> {
        if frac == 0.0 {
            return self.interp.sample(&self.s0, vars, positions);
        }
        if frac == 1.0 {
            return self.interp.sample(&self.s1, vars, positions);
        }
        let a = self.interp.sample(&self.s0, vars, positions)?;
        let b = self.interp.sample(&self.s1, vars, positions)?;
        Ok(blend(a, &b, frac))
    }

    /// Like [`sample`](Self::sample), but variables missing from either
    /// snapshot come back as all-`NaN` columns instead of an error.
    pub fn sample_available(
        &self,
        vars: &[Variable],
        positions: &Positions,
        frac: f64,
    ) -> Result<Samples, SnapshotError> {
        let present: Vec<Variable> = vars
            .iter()
            .copied()
            .filter(|&v| self.s0.has(v) && self.s1.has(v))
            .collect();
        let mut samples = self.sample(&present, positions, frac)?;
        for &var in vars {
            if samples.get(var).is_none() {
                samples.insert(var, vec![f64::NAN; positions.len()]);
            }
        }
        Ok(samples)
    }
}

fn blend(mut a: Samples, b: &Samples, frac: f64) -> Samples {
    let vars: Vec<Variable> = a.variables().collect();
    for var in vars {
        if let (Some(x), Some(y)) = (a.values.get_mut(&var), b.get(var)) {
            for (xv, &yv) in x.iter_mut().zip(y) {
                *xv = (1.0 - frac) * *xv + frac * yv;
            }
        }
    }
    a
}
