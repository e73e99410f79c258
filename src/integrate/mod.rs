//! Sub-step integration of particle positions.
//!
//! An [`Integrator`] turns the particle positions at the start of a sub-step
//! into one effective velocity for the whole sub-step; the tracker then adds
//! windage and turbulence and applies [`update_position`]. Intermediate
//! stages sample the flow through a [`StepContext`], which hides the two
//! bracketing snapshots and the fractional times.
//!
//! Built-in methods are [`Rk2`] and [`Rk4`], selected with [`Method`].
//! Any other scheme can be supplied by implementing [`Integrator`].
//!
//! # Example
//!
//! ```
//! use ptrack_rs::integrate::{Integrator, Method};
//!
//! let rk4 = Method::Rk4;
//! assert_eq!(rk4.name(), "rk4");
//! assert_eq!(rk4.stage_fractions(), vec![0.0, 0.5, 0.5, 1.0]);
//! ```

mod mixing;
mod position;
mod runge_kutta;

pub use mixing::VerticalMixing;
pub use position::{EARTH_EQUATORIAL_RADIUS, EARTH_POLAR_RADIUS, earth_radius, update_position};
pub use runge_kutta::{Rk2, Rk4};

use serde::{Deserialize, Serialize};

use crate::interp::TemporalSampler;
use crate::particles::Positions;
use crate::snapshot::{SnapshotError, Variable};
use crate::vertical::SigmaLevels;

/// One of the `ndiv` sub-steps of a snapshot interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubStep {
    /// Zero-based sub-step number
    pub index: usize,
    /// Sub-steps per interval
    pub count: usize,
    /// Signed duration (s); negative when tracking in reverse
    pub dt: f64,
    /// Interval fraction at the start of the sub-step
    pub frac0: f64,
    /// Interval fraction at the end of the sub-step
    pub frac1: f64,
}

impl SubStep {
    /// Sub-step `index` of `count` over an interval of `delta_t` seconds.
    pub fn new(index: usize, count: usize, delta_t: f64) -> Self {
        Self {
            index,
            count,
            dt: delta_t / count as f64,
            frac0: index as f64 / count as f64,
            frac1: (index + 1) as f64 / count as f64,
        }
    }

    /// Interval fraction at the sub-step midpoint.
    #[inline]
    pub fn mid(&self) -> f64 {
        0.5 * (self.frac0 + self.frac1)
    }
}

/// Velocity and water-column depth for a batch of particles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepVelocity {
    /// Eastward velocity (m/s)
    pub u: Vec<f64>,
    /// Northward velocity (m/s)
    pub v: Vec<f64>,
    /// Vertical velocity (m/s)
    pub w: Vec<f64>,
    /// Water-column depth `zeta + h` (m)
    pub depth: Vec<f64>,
    /// Any stage sampled outside the domain
    pub out_of_domain: Vec<bool>,
}

impl StepVelocity {
    pub fn len(&self) -> usize {
        self.u.len()
    }

    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }

    /// Carry over out-of-domain flags from an earlier stage.
    pub fn mark_out_of_domain(&mut self, earlier: &StepVelocity) {
        for (a, &b) in self.out_of_domain.iter_mut().zip(&earlier.out_of_domain) {
            *a |= b;
        }
    }

    /// `(V0 + 2 V1 + 2 V2 + V3) / 6`, component by component.
    pub fn rk4_average(v0: &Self, v1: &Self, v2: &Self, v3: &Self) -> Self {
        let avg = |a: &[f64], b: &[f64], c: &[f64], d: &[f64]| -> Vec<f64> {
            (0..a.len())
                .map(|p| (a[p] + 2.0 * b[p] + 2.0 * c[p] + d[p]) / 6.0)
                .collect()
        };
        Self {
            u: avg(&v0.u, &v1.u, &v2.u, &v3.u),
            v: avg(&v0.v, &v1.v, &v2.v, &v3.v),
            w: avg(&v0.w, &v1.w, &v2.w, &v3.w),
            depth: avg(&v0.depth, &v1.depth, &v2.depth, &v3.depth),
            out_of_domain: (0..v0.len())
                .map(|p| {
                    v0.out_of_domain[p]
                        || v1.out_of_domain[p]
                        || v2.out_of_domain[p]
                        || v3.out_of_domain[p]
                })
                .collect(),
        }
    }

    /// Add `factor * (uwind, vwind)` to the horizontal velocity.
    pub fn add_windage(&mut self, factor: f64, uwind: &[f64], vwind: &[f64]) {
        for p in 0..self.u.len() {
            self.u[p] += factor * uwind[p];
            self.v[p] += factor * vwind[p];
        }
    }
}

/// Flow access for one sub-step.
pub struct StepContext<'a, 'g> {
    sampler: &'a TemporalSampler<'a, 'g>,
    levels: &'g SigmaLevels,
    surface_trapped: bool,
    sub_step: SubStep,
}

impl<'a, 'g> StepContext<'a, 'g> {
    pub fn new(
        sampler: &'a TemporalSampler<'a, 'g>,
        levels: &'g SigmaLevels,
        surface_trapped: bool,
        sub_step: SubStep,
    ) -> Self {
        Self {
            sampler,
            levels,
            surface_trapped,
            sub_step,
        }
    }

    #[inline]
    pub fn sub_step(&self) -> SubStep {
        self.sub_step
    }

    #[inline]
    pub fn surface_trapped(&self) -> bool {
        self.surface_trapped
    }

    /// Velocity and depth at `positions`, `frac` of the way through the interval.
    ///
    /// Surface-trapped particles get `w = 0` and do not need `w` in the snapshots.
    pub fn velocity(
        &self,
        positions: &Positions,
        frac: f64,
    ) -> Result<StepVelocity, SnapshotError> {
        let vars: &[Variable] = if self.surface_trapped {
            &[Variable::U, Variable::V, Variable::Zeta, Variable::H]
        } else {
            &[Variable::U, Variable::V, Variable::W, Variable::Zeta, Variable::H]
        };
        let s = self.sampler.sample(vars, positions, frac)?;
        let zeta = s.require(Variable::Zeta)?;
        let h = s.require(Variable::H)?;
        Ok(StepVelocity {
            u: s.require(Variable::U)?.to_vec(),
            v: s.require(Variable::V)?.to_vec(),
            w: match s.get(Variable::W) {
                Some(w) => w.to_vec(),
                None => vec![0.0; positions.len()],
            },
            depth: zeta
                .iter()
                .zip(h)
                .map(|(&z, &h)| SigmaLevels::total_depth(z, h))
                .collect(),
            out_of_domain: s.out_of_domain().to_vec(),
        })
    }

    /// Wind `(uwind, vwind)` at `positions` and `frac`.
    pub fn wind(
        &self,
        positions: &Positions,
        frac: f64,
    ) -> Result<(Vec<f64>, Vec<f64>), SnapshotError> {
        let s = self.sampler.sample(&[Variable::Uwind, Variable::Vwind], positions, frac)?;
        Ok((s.require(Variable::Uwind)?.to_vec(), s.require(Variable::Vwind)?.to_vec()))
    }

    /// Positions after moving with `velocity` for `dt` seconds.
    pub fn advance(&self, positions: &Positions, velocity: &StepVelocity, dt: f64) -> Positions {
        update_position(positions, velocity, dt, None, self.levels, self.surface_trapped)
    }

    /// Like [`advance`](Self::advance), with extra vertical displacement (m).
    pub fn advance_with(
        &self,
        positions: &Positions,
        velocity: &StepVelocity,
        dt: f64,
        extra_dz: &[f64],
    ) -> Positions {
        update_position(positions, velocity, dt, Some(extra_dz), self.levels, self.surface_trapped)
    }
}

/// A scheme that produces the effective velocity of one sub-step.
///
/// Implementations may sample the flow any number of times through the
/// [`StepContext`], at any fraction within the sub-step, but must not
/// reorder sub-steps or keep state between them.
pub trait Integrator: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Order of accuracy.
    fn order(&self) -> usize;

    /// Sub-step fractions at which the flow is sampled.
    fn stage_fractions(&self) -> Vec<f64>;

    /// Number of flow samples per sub-step.
    fn n_stages(&self) -> usize {
        self.stage_fractions().len()
    }

    /// Effective velocity over the sub-step starting at `positions`.
    fn step(
        &self,
        ctx: &StepContext<'_, '_>,
        positions: &Positions,
    ) -> Result<StepVelocity, SnapshotError>;
}

/// Built-in integration methods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Midpoint method
    Rk2,
    /// Classic fourth-order Runge-Kutta
    #[default]
    Rk4,
}

impl Method {
    fn scheme(self) -> &'static dyn Integrator {
        match self {
            Method::Rk2 => &Rk2,
            Method::Rk4 => &Rk4,
        }
    }
}

impl Integrator for Method {
    fn name(&self) -> &str {
        self.scheme().name()
    }

    fn order(&self) -> usize {
        self.scheme().order()
    }

    fn stage_fractions(&self) -> Vec<f64> {
        self.scheme().stage_fractions()
    }

    fn step(
        &self,
        ctx: &StepContext<'_, '_>,
        positions: &Positions,
    ) -> Result<StepVelocity, SnapshotError> {
        self.scheme().step(ctx, positions)
    }
}
