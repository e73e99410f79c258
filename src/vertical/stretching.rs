//! Vertical stretching functions for building sigma levels.
//!
//! Model output normally carries its own `Cs_r`/`Cs_w` curves, which are
//! loaded with [`SigmaLevels::from_levels`](super::SigmaLevels::from_levels).
//! The functions here build the same curves for synthetic grids.

/// A stretching function mapping uniform s-levels onto stretched levels.
///
/// Implementations must return values strictly increasing from -1 (bottom)
/// to 0 (surface).
pub trait Stretching: Send + Sync {
    /// Stretched value C(s) for a uniform coordinate s ∈ [-1, 0].
    fn cs(&self, s: f64) -> f64;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Compute `(cs_r, cs_w)` for `n_levels` cells.
    ///
    /// `cs_r` has `n_levels` entries at cell centers, `cs_w` has
    /// `n_levels + 1` entries at cell faces with `cs_w[0] = -1` and
    /// `cs_w[n_levels] = 0`.
    fn compute_levels(&self, n_levels: usize) -> (Vec<f64>, Vec<f64>) {
        let n = n_levels as f64;
        let cs_w: Vec<f64> = (0..=n_levels)
            .map(|k| self.cs((k as f64 - n) / n))
            .collect();
        let cs_r: Vec<f64> = (0..n_levels)
            .map(|k| self.cs((k as f64 - n + 0.5) / n))
            .collect();
        (cs_r, cs_w)
    }
}

/// Equal spacing in sigma.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformStretching;

impl Stretching for UniformStretching {
    #[inline]
    fn cs(&self, s: f64) -> f64 {
        s
    }

    fn name(&self) -> &'static str {
        "uniform"
    }
}

/// Song & Haidvogel (1994) stretching, the classic ROMS `Vstretching = 1`.
///
/// ```text
/// C(s) = (1 - θb) sinh(θs s) / sinh(θs)
///      + θb [tanh(θs (s + 1/2)) / (2 tanh(θs / 2)) - 1/2]
/// ```
///
/// `theta_s` (0-10) refines toward the surface; `theta_b` (0-1) shifts
/// some of that refinement to the bottom.
#[derive(Clone, Copy, Debug)]
pub struct SongHaidvogelStretching {
    /// Surface control parameter.
    pub theta_s: f64,
    /// Bottom control parameter.
    pub theta_b: f64,
}

impl SongHaidvogelStretching {
    /// Create stretching with the given control parameters.
    pub fn new(theta_s: f64, theta_b: f64) -> Self {
        Self { theta_s, theta_b }
    }
}

impl Default for SongHaidvogelStretching {
    fn default() -> Self {
        Self::new(4.0, 0.8)
    }
}

impl Stretching for SongHaidvogelStretching {
    fn cs(&self, s: f64) -> f64 {
        if self.theta_s <= 0.0 {
            return s;
        }
        let ts = self.theta_s;
        let surface = (ts * s).sinh() / ts.sinh();
        let bottom = (ts * (s + 0.5)).tanh() / (2.0 * (0.5 * ts).tanh()) - 0.5;
        (1.0 - self.theta_b) * surface + self.theta_b * bottom
    }

    fn name(&self) -> &'static str {
        "song-haidvogel"
    }
}
