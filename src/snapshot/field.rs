//! Dense gridded arrays.

use super::{SnapshotError, Variable, VerticalLayout};
use crate::grid::GridModel;

/// A `[nz][ny][nx]` array stored row-major (`i` fastest).
///
/// 2-D fields have `nz == 1`. `NaN` marks masked (land) source values.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    nz: usize,
    ny: usize,
    nx: usize,
    values: Vec<f64>,
}

impl Field {
    /// Wrap an existing array.
    pub fn new(shape: (usize, usize, usize), values: Vec<f64>) -> Result<Self, SnapshotError> {
        let (nz, ny, nx) = shape;
        if values.len() != nz * ny * nx {
            return Err(SnapshotError::ShapeMismatch {
                what: "field".into(),
                expected: shape,
                found: values.len(),
            });
        }
        Ok(Self { nz, ny, nx, values })
    }

    pub(crate) fn from_parts(nz: usize, ny: usize, nx: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), nz * ny * nx);
        Self { nz, ny, nx, values }
    }

    /// Constant-valued field.
    pub fn filled(shape: (usize, usize, usize), value: f64) -> Self {
        let (nz, ny, nx) = shape;
        Self {
            nz,
            ny,
            nx,
            values: vec![value; nz * ny * nx],
        }
    }

    /// Shape `(nz, ny, nx)` a variable must have on `grid`.
    pub fn expected_shape(grid: &GridModel, var: Variable) -> (usize, usize, usize) {
        let (ny, nx) = grid.get(var.location()).shape();
        let n = grid.levels().n_levels();
        let nz = match var.vertical() {
            VerticalLayout::Surface => 1,
            VerticalLayout::RhoLevels => n,
            VerticalLayout::WLevels => n + 1,
        };
        (nz, ny, nx)
    }

    /// Value at `(k, j, i)`.
    #[inline]
    pub fn at(&self, k: usize, j: usize, i: usize) -> f64 {
        self.values[(k * self.ny + j) * self.nx + i]
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nz, self.ny, self.nx)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
