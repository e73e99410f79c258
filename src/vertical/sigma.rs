//! Sigma level sets for terrain-following vertical coordinates.

use super::stretching::Stretching;
use crate::grid::GridError;

/// Stretched sigma levels of a model grid.
///
/// Stores the rho levels (cell centers, `Cs_r`) and the w levels (cell
/// faces, `Cs_w`), both ordered from the bottom (index 0) to the surface.
///
/// # Memory Layout
///
/// Plain `Vec<f64>` storage; the interpolator searches these slices directly.
#[derive(Clone, Debug)]
pub struct SigmaLevels {
    /// σ at cell centers, length = n_levels.
    cs_r: Vec<f64>,
    /// σ at cell faces, length = n_levels + 1.
    cs_w: Vec<f64>,
    /// Name of the stretching function (or "file" for loaded levels).
    stretching_name: String,
}

impl SigmaLevels {
    /// Build levels from a stretching function.
    ///
    /// # Example
    ///
    /// ```
    /// use ptrack_rs::vertical::{SigmaLevels, UniformStretching};
    ///
    /// let levels = SigmaLevels::new(10, UniformStretching);
    /// assert_eq!(levels.n_levels(), 10);
    /// assert!((levels.top() + 0.05).abs() < 1e-12);
    /// ```
    pub fn new(n_levels: usize, stretching: impl Stretching) -> Self {
        let (cs_r, cs_w) = stretching.compute_levels(n_levels);
        Self {
            cs_r,
            cs_w,
            stretching_name: stretching.name().to_string(),
        }
    }

    /// Uniformly spaced levels (convenience constructor).
    #[inline]
    pub fn uniform(n_levels: usize) -> Self {
        Self::new(n_levels, super::stretching::UniformStretching)
    }

    /// Use level curves read from model output.
    ///
    /// # Errors
    ///
    /// `cs_w` must have exactly one more entry than `cs_r`, both must be
    /// strictly increasing and lie in [-1, 0].
    pub fn from_levels(cs_r: Vec<f64>, cs_w: Vec<f64>) -> Result<Self, GridError> {
        if cs_r.is_empty() || cs_w.len() != cs_r.len() + 1 {
            return Err(GridError::InvalidSigmaLevels(format!(
                "expected n rho levels and n+1 w levels, got {} and {}",
                cs_r.len(),
                cs_w.len()
            )));
        }
        for (name, levels) in [("Cs_r", &cs_r), ("Cs_w", &cs_w)] {
            if levels.iter().any(|&s| !(-1.0..=0.0).contains(&s)) {
                return Err(GridError::InvalidSigmaLevels(format!(
                    "{} has values outside [-1, 0]",
                    name
                )));
            }
            if levels.windows(2).any(|w| w[1] <= w[0]) {
                return Err(GridError::InvalidSigmaLevels(format!(
                    "{} is not strictly increasing",
                    name
                )));
            }
        }

        Ok(Self {
            cs_r,
            cs_w,
            stretching_name: "file".to_string(),
        })
    }

    /// Number of vertical cells.
    #[inline]
    pub fn n_levels(&self) -> usize {
        self.cs_r.len()
    }

    /// Sigma at cell centers, bottom to surface.
    #[inline]
    pub fn rho(&self) -> &[f64] {
        &self.cs_r
    }

    /// Sigma at cell faces, bottom to surface.
    #[inline]
    pub fn w(&self) -> &[f64] {
        &self.cs_w
    }

    /// Name of the stretching used to build the levels.
    #[inline]
    pub fn stretching_name(&self) -> &str {
        &self.stretching_name
    }

    /// Top rho level, where surface-trapped particles are pinned.
    #[inline]
    pub fn top(&self) -> f64 {
        self.cs_r[self.cs_r.len() - 1]
    }

    /// Bottom rho level.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.cs_r[0]
    }

    /// Clamp sigma to the rho-level range `[bottom, top]`.
    ///
    /// Not-a-number passes through unchanged.
    #[inline]
    pub fn clamp(&self, sigma: f64) -> f64 {
        if sigma < self.bottom() {
            self.bottom()
        } else if sigma > self.top() {
            self.top()
        } else {
            sigma
        }
    }

    /// Particle height relative to the free surface (m, negative down).
    ///
    /// ```text
    /// z = σ × (η + H)
    /// ```
    #[inline]
    pub fn depth_below_surface(sigma: f64, zeta: f64, h: f64) -> f64 {
        sigma * Self::total_depth(zeta, h)
    }

    /// Total water column thickness `η + H`.
    #[inline]
    pub fn total_depth(zeta: f64, h: f64) -> f64 {
        zeta + h
    }
}
