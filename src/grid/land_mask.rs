//! Static land/water masks for staggered grid locations.
//!
//! Follows the ROMS convention: 1 = water, 0 = land. The u and v masks are
//! derived from the rho mask, a velocity point being wet only when both
//! neighbouring rho cells are wet.

use super::GridError;

/// Land mask over a `[ny][nx]` grid of nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct LandMask {
    /// True if the node is water
    wet: Vec<bool>,
    /// Number of rows (latitude direction)
    ny: usize,
    /// Number of columns (longitude direction)
    nx: usize,
}

/// Summary counts for a mask.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandMaskStatistics {
    /// Number of water nodes
    pub n_wet: usize,
    /// Number of land nodes
    pub n_dry: usize,
    /// Fraction of nodes that are water
    pub wet_fraction: f64,
}

impl LandMask {
    /// A mask where every node is water.
    pub fn all_wet(ny: usize, nx: usize) -> Self {
        Self {
            wet: vec![true; ny * nx],
            ny,
            nx,
        }
    }

    /// Build from model mask values (`mask_rho` etc.), row-major `[ny][nx]`.
    ///
    /// Values above 0.5 are water.
    pub fn from_values(values: &[f64], ny: usize, nx: usize) -> Result<Self, GridError> {
        if values.len() != ny * nx {
            return Err(GridError::ShapeMismatch {
                what: "land mask".into(),
                expected: (ny, nx),
                found: values.len(),
            });
        }
        Ok(Self {
            wet: values.iter().map(|&m| m > 0.5).collect(),
            ny,
            nx,
        })
    }

    /// Mask for u points (between rho columns i and i+1).
    pub fn u_from_rho(rho: &LandMask) -> Self {
        let nx = rho.nx.saturating_sub(1);
        let mut wet = Vec::with_capacity(rho.ny * nx);
        for j in 0..rho.ny {
            for i in 0..nx {
                wet.push(rho.is_wet(j, i) && rho.is_wet(j, i + 1));
            }
        }
        Self { wet, ny: rho.ny, nx }
    }

    /// Mask for v points (between rho rows j and j+1).
    pub fn v_from_rho(rho: &LandMask) -> Self {
        let ny = rho.ny.saturating_sub(1);
        let mut wet = Vec::with_capacity(ny * rho.nx);
        for j in 0..ny {
            for i in 0..rho.nx {
                wet.push(rho.is_wet(j, i) && rho.is_wet(j + 1, i));
            }
        }
        Self { wet, ny, nx: rho.nx }
    }

    /// Mark node `(j, i)` as land.
    pub fn set_land(&mut self, j: usize, i: usize) -> Result<(), GridError> {
        if j >= self.ny || i >= self.nx {
            return Err(GridError::ShapeMismatch {
                what: format!("land node ({}, {})", j, i),
                expected: (self.ny, self.nx),
                found: j * self.nx + i + 1,
            });
        }
        self.wet[j * self.nx + i] = false;
        Ok(())
    }

    /// Check if node `(j, i)` is water.
    #[inline]
    pub fn is_wet(&self, j: usize, i: usize) -> bool {
        self.wet[j * self.nx + i]
    }

    /// Shape `(ny, nx)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    /// Count wet and dry nodes.
    pub fn statistics(&self) -> LandMaskStatistics {
        let n_wet = self.wet.iter().filter(|&&w| w).count();
        let total = self.wet.len();
        LandMaskStatistics {
            n_wet,
            n_dry: total - n_wet,
            wet_fraction: if total > 0 {
                n_wet as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}
