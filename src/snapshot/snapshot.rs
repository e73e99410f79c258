//! Immutable model state at one output time.

use std::collections::BTreeMap;

use super::{Field, SnapshotError, Variable, VerticalLayout};
use crate::grid::GridModel;

/// All fields for a single output time.
///
/// Fields are validated against the grid when inserted and are never
/// mutated afterwards; sources hand them out behind an `Arc`.
#[derive(Clone, Debug)]
pub struct Snapshot {
    time: f64,
    fields: BTreeMap<Variable, Field>,
}

impl Snapshot {
    /// Empty snapshot at `time` (seconds since the source reference time).
    pub fn new(time: f64) -> Self {
        Self {
            time,
            fields: BTreeMap::new(),
        }
    }

    /// Add a field after checking its shape against `grid`.
    pub fn insert(
        &mut self,
        grid: &GridModel,
        var: Variable,
        field: Field,
    ) -> Result<(), SnapshotError> {
        let expected = Field::expected_shape(grid, var);
        if field.shape() != expected {
            let (nz, ny, nx) = field.shape();
            return Err(SnapshotError::ShapeMismatch {
                what: var.name().into(),
                expected,
                found: nz * ny * nx,
            });
        }
        self.fields.insert(var, field);
        Ok(())
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Field for `var`, or `MissingVariable`.
    pub fn get(&self, var: Variable) -> Result<&Field, SnapshotError> {
        self.fields
            .get(&var)
            .ok_or_else(|| SnapshotError::MissingVariable(var.name().into()))
    }

    pub fn has(&self, var: Variable) -> bool {
        self.fields.contains_key(&var)
    }

    /// Variables present, in output order.
    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.fields.keys().copied()
    }
}

/// Builds snapshots from constants or analytic functions of position.
///
/// Land nodes of the target location receive `NaN`, as in model output.
pub struct SnapshotBuilder<'g> {
    grid: &'g GridModel,
    snapshot: Snapshot,
}

impl<'g> SnapshotBuilder<'g> {
    pub fn new(grid: &'g GridModel, time: f64) -> Self {
        Self {
            grid,
            snapshot: Snapshot::new(time),
        }
    }

    /// Constant field (land nodes masked).
    pub fn uniform(self, var: Variable, value: f64) -> Self {
        self.from_fn(var, |_, _, _| value)
    }

    /// Field evaluated at every node as `f(lon, lat, sigma)`.
    ///
    /// 2-D fields are evaluated with `sigma = 0`.
    pub fn from_fn(mut self, var: Variable, f: impl Fn(f64, f64, f64) -> f64) -> Self {
        let staggered = self.grid.get(var.location());
        let levels = self.grid.levels();
        let sigmas: Vec<f64> = match var.vertical() {
            VerticalLayout::Surface => vec![0.0],
            VerticalLayout::RhoLevels => levels.rho().to_vec(),
            VerticalLayout::WLevels => levels.w().to_vec(),
        };
        let (ny, nx) = staggered.shape();
        let mut values = Vec::with_capacity(sigmas.len() * ny * nx);
        for &s in &sigmas {
            for j in 0..ny {
                let lat = staggered.lat().values()[j];
                for i in 0..nx {
                    let lon = staggered.lon().values()[i];
                    values.push(if staggered.mask().is_wet(j, i) {
                        f(lon, lat, s)
                    } else {
                        f64::NAN
                    });
                }
            }
        }
        self.snapshot
            .fields
            .insert(var, Field::from_parts(sigmas.len(), ny, nx, values));
        self
    }

    /// Raw values in `[k][j][i]` order; shape is checked.
    pub fn with_values(mut self, var: Variable, values: Vec<f64>) -> Result<Self, SnapshotError> {
        let field = Field::new(Field::expected_shape(self.grid, var), values)?;
        self.snapshot.insert(self.grid, var, field)?;
        Ok(self)
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}
