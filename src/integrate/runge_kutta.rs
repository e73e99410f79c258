//! Midpoint (RK2) and classic fourth-order (RK4) sub-steps.

use super::{Integrator, StepContext, StepVelocity};
use crate::particles::Positions;
use crate::snapshot::SnapshotError;

/// Second-order midpoint method.
///
/// ```text
/// V0 = V(x, t0)
/// x1 = x + V0 dt/2
/// V1 = V(x1, tmid)
/// ```
///
/// The step velocity is `V1`, applied from the original position.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rk2;

impl Integrator for Rk2 {
    fn name(&self) -> &str {
        "rk2"
    }

    fn order(&self) -> usize {
        2
    }

    fn stage_fractions(&self) -> Vec<f64> {
        vec![0.0, 0.5]
    }

    fn step(
        &self,
        ctx: &StepContext<'_, '_>,
        positions: &Positions,
    ) -> Result<StepVelocity, SnapshotError> {
        let sub = ctx.sub_step();
        let v0 = ctx.velocity(positions, sub.frac0)?;
        let x1 = ctx.advance(positions, &v0, 0.5 * sub.dt);
        let mut v1 = ctx.velocity(&x1, sub.mid())?;
        v1.mark_out_of_domain(&v0);
        Ok(v1)
    }
}

/// Classic fourth-order Runge-Kutta.
///
/// ```text
/// V0 = V(x, t0)
/// V1 = V(x + V0 dt/2, tmid)
/// V2 = V(x + V1 dt/2, tmid)
/// V3 = V(x + V2 dt, t1)
/// V  = (V0 + 2 V1 + 2 V2 + V3) / 6
/// ```
///
/// The water-column depth is weighted the same way.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rk4;

impl Integrator for Rk4 {
    fn name(&self) -> &str {
        "rk4"
    }

    fn order(&self) -> usize {
        4
    }

    fn stage_fractions(&self) -> Vec<f64> {
        vec![0.0, 0.5, 0.5, 1.0]
    }

    fn step(
        &self,
        ctx: &StepContext<'_, '_>,
        positions: &Positions,
    ) -> Result<StepVelocity, SnapshotError> {
        let sub = ctx.sub_step();
        let half = 0.5 * sub.dt;
        let v0 = ctx.velocity(positions, sub.frac0)?;
        let x1 = ctx.advance(positions, &v0, half);
        let v1 = ctx.velocity(&x1, sub.mid())?;
        let x2 = ctx.advance(positions, &v1, half);
        let v2 = ctx.velocity(&x2, sub.mid())?;
        let x3 = ctx.advance(positions, &v2, sub.dt);
        let v3 = ctx.velocity(&x3, sub.frac1)?;
        Ok(StepVelocity::rk4_average(&v0, &v1, &v2, &v3))
    }
}
