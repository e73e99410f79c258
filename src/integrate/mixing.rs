//! Random-walk vertical mixing.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sub-grid vertical mixing as a bounded uniform random walk.
///
/// Each sub-step adds `r * sqrt(6 * kv * |dt|)` metres of vertical
/// displacement with `r` uniform on [-1, 1], which has the variance
/// `2 * kv * |dt|` of a diffusive step. Seeded for reproducible runs.
#[derive(Clone, Debug)]
pub struct VerticalMixing {
    diffusivity: f64,
    rng: StdRng,
}

impl VerticalMixing {
    /// `diffusivity` in m²/s.
    pub fn new(diffusivity: f64, seed: u64) -> Self {
        Self {
            diffusivity,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn diffusivity(&self) -> f64 {
        self.diffusivity
    }

    /// Largest displacement magnitude (m) for a step of `dt` seconds.
    pub fn amplitude(&self, dt: f64) -> f64 {
        (6.0 * self.diffusivity * dt.abs()).sqrt()
    }

    /// Vertical displacements (m) for `n` particles over `dt` seconds.
    pub fn displacements(&mut self, n: usize, dt: f64) -> Vec<f64> {
        let amp = self.amplitude(dt);
        (0..n).map(|_| amp * self.rng.gen_range(-1.0..=1.0)).collect()
    }
}
