//! Spatial and temporal interpolation of snapshot fields at particle positions.
//!
//! # Staggering
//!
//! Scalars and `w` are sampled on the rho grid, `u` and `v` on their own
//! staggered grids. 3-D fields are blended trilinearly from the eight
//! surrounding nodes; `w` uses the cell-face sigma levels, everything else
//! the cell-center levels.
//!
//! # Land
//!
//! Before weighting, land nodes are replaced according to the variable's
//! [`FillPolicy`]. When every node around a point is land under local-mean
//! fill the sample is `NaN`.
//!
//! # Strategies
//!
//! [`InterpolationStrategy::PerParticle`] locates and samples one particle
//! at a time. [`InterpolationStrategy::Batch`] locates all particles first
//! and then gathers corner columns chunk by chunk (in parallel with the
//! `parallel` feature). Both share the same fill and weighting kernels and
//! produce identical values.

mod batch;
mod kernel;
pub mod temporal;

pub use kernel::{CellBracket, Location};
pub use temporal::TemporalSampler;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grid::{Axis, ExtrapolationPolicy, GridError, GridModel};
use crate::particles::Positions;
use crate::snapshot::{Snapshot, SnapshotError, Variable};
use kernel::LevelAxes;

/// Replacement for land-masked source values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillPolicy {
    /// Land contributes zero (velocity and wind)
    Zero,
    /// Land takes the mean of the water nodes around the point (tracers,
    /// free surface, depth)
    LocalMean,
}

/// Default particle count above which `Auto` switches to the batch path.
pub const DEFAULT_BATCH_THRESHOLD: usize = 100;

/// How sample indices and weights are computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterpolationStrategy {
    /// Per-particle below `threshold` particles, batch above
    Auto { threshold: usize },
    /// One particle at a time
    PerParticle,
    /// Vectorized column gather
    Batch,
}

impl Default for InterpolationStrategy {
    fn default() -> Self {
        InterpolationStrategy::Auto {
            threshold: DEFAULT_BATCH_THRESHOLD,
        }
    }
}

impl InterpolationStrategy {
    /// Concrete strategy for `n` particles.
    pub fn resolve(self, n: usize) -> Self {
        match self {
            InterpolationStrategy::Auto { threshold } if n > threshold => {
                InterpolationStrategy::Batch
            }
            InterpolationStrategy::Auto { .. } => InterpolationStrategy::PerParticle,
            other => other,
        }
    }
}

/// Sampled values for a batch of particles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Samples {
    values: BTreeMap<Variable, Vec<f64>>,
    out_of_domain: Vec<bool>,
}

impl Samples {
    pub(crate) fn new(out_of_domain: Vec<bool>) -> Self {
        Self {
            values: BTreeMap::new(),
            out_of_domain,
        }
    }

    pub(crate) fn insert(&mut self, var: Variable, values: Vec<f64>) {
        self.values.insert(var, values);
    }

    /// Values of `var`, one per particle.
    pub fn get(&self, var: Variable) -> Option<&[f64]> {
        self.values.get(&var).map(Vec::as_slice)
    }

    /// Values of `var`, or `MissingVariable` if it was not sampled.
    pub fn require(&self, var: Variable) -> Result<&[f64], SnapshotError> {
        self.get(var)
            .ok_or_else(|| SnapshotError::MissingVariable(var.name().to_string()))
    }

    /// Per-particle out-of-domain flags.
    pub fn out_of_domain(&self) -> &[bool] {
        &self.out_of_domain
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.out_of_domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out_of_domain.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.values.keys().copied()
    }
}

/// Samples snapshot fields at particle positions.
#[derive(Clone, Debug)]
pub struct SpatialInterpolator<'g> {
    grid: &'g GridModel,
    levels: LevelAxes,
    policy: ExtrapolationPolicy,
    strategy: InterpolationStrategy,
}

impl<'g> SpatialInterpolator<'g> {
    pub fn new(
        grid: &'g GridModel,
        policy: ExtrapolationPolicy,
        strategy: InterpolationStrategy,
    ) -> Result<Self, GridError> {
        let levels = LevelAxes {
            rho: Axis::new(grid.levels().rho().to_vec())?,
            w: Axis::new(grid.levels().w().to_vec())?,
        };
        Ok(Self {
            grid,
            levels,
            policy,
            strategy,
        })
    }

    /// Same interpolator with a different strategy.
    pub fn with_strategy(mut self, strategy: InterpolationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn grid(&self) -> &'g GridModel {
        self.grid
    }

    pub fn policy(&self) -> ExtrapolationPolicy {
        self.policy
    }

    pub fn strategy(&self) -> InterpolationStrategy {
        self.strategy
    }

    /// Locate a single point.
    pub fn locate(&self, lon: f64, lat: f64, sigma: f64) -> Location {
        kernel::locate(self.grid, &self.levels, self.policy, lon, lat, sigma)
    }

    /// Sample `vars` from `snapshot` at every position.
    ///
    /// Fails only if a requested variable is absent from the snapshot.
    pub fn sample(
        &self,
        snapshot: &Snapshot,
        vars: &[Variable],
        positions: &Positions,
    ) -> Result<Samples, SnapshotError> {
        match self.strategy.resolve(positions.len()) {
            InterpolationStrategy::Batch => self.sample_batch(snapshot, vars, positions),
            _ => self.sample_per_particle(snapshot, vars, positions),
        }
    }

    fn sample_per_particle(
        &self,
        snapshot: &Snapshot,
        vars: &[Variable],
        positions: &Positions,
    ) -> Result<Samples, SnapshotError> {
        let n = positions.len();
        let fields = vars
            .iter()
            .map(|&v| snapshot.get(v).map(|f| (v, f)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut columns = vec![vec![f64::NAN; n]; vars.len()];
        let mut out_of_domain = vec![false; n];
        for p in 0..n {
            let (lon, lat, sigma) = positions.get(p);
            let loc = self.locate(lon, lat, sigma);
            out_of_domain[p] = loc.out_of_domain;
            for (column, &(var, field)) in columns.iter_mut().zip(&fields) {
                let location = var.location();
                column[p] = kernel::sample_point(
                    field,
                    self.grid.get(location).mask(),
                    location,
                    var.vertical(),
                    var.fill_policy(),
                    &loc,
                );
            }
        }

        let mut samples = Samples::new(out_of_domain);
        for (var, column) in vars.iter().zip(columns) {
            samples.insert(*var, column);
        }
        Ok(samples)
    }

    fn sample_batch(
        &self,
        snapshot: &Snapshot,
        vars: &[Variable],
        positions: &Positions,
    ) -> Result<Samples, SnapshotError> {
        let fields = vars
            .iter()
            .map(|&v| snapshot.get(v).map(|f| (v, f)))
            .collect::<Result<Vec<_>, _>>()?;

        let locations = batch::locate_all(self.grid, &self.levels, self.policy, positions);
        let mut samples = Samples::new(locations.iter().map(|l| l.out_of_domain).collect());
        for (var, field) in fields {
            let location = var.location();
            let column = batch::sample_column(
                field,
                self.grid.get(location).mask(),
                location,
                var.vertical(),
                var.fill_policy(),
                &locations,
            );
            samples.insert(var, column);
        }
        Ok(samples)
    }
}
