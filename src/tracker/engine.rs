//! Day walk over snapshot intervals.

use std::sync::Arc;

use super::{TrackError, TrackerState};
use crate::config::{Direction, RunConfig};
use crate::grid::GridModel;
use crate::integrate::{Integrator, StepContext, SubStep, VerticalMixing};
use crate::interp::{SpatialInterpolator, TemporalSampler};
use crate::particles::{ParticleSet, ParticleStatus};
use crate::snapshot::{SnapshotSource, Variable};
use crate::trajectory::{DayTrack, Property};
use crate::types::SnapshotIndex;
use crate::vertical::SigmaLevels;

/// Advances particle sets through tracking days.
///
/// # Example
///
/// ```
/// use ptrack_rs::config::RunConfig;
/// use ptrack_rs::grid::{Axis, GridModel};
/// use ptrack_rs::particles::ParticleSet;
/// use ptrack_rs::snapshot::{MemorySource, SnapshotBuilder, Variable};
/// use ptrack_rs::tracker::Tracker;
/// use ptrack_rs::vertical::SigmaLevels;
///
/// let grid = GridModel::regular(
///     Axis::linspace(0.0, 0.1, 3).unwrap(),
///     Axis::linspace(45.0, 45.1, 3).unwrap(),
///     SigmaLevels::uniform(4),
/// )
/// .unwrap();
/// let snap = |t| {
///     SnapshotBuilder::new(&grid, t)
///         .uniform(Variable::U, 0.1)
///         .uniform(Variable::V, 0.0)
///         .uniform(Variable::Zeta, 0.0)
///         .uniform(Variable::H, 30.0)
///         .build()
/// };
/// let source = MemorySource::new(vec![snap(0.0), snap(3600.0)]).unwrap();
///
/// let config = RunConfig::default().with_sub_steps(4);
/// let mut tracker = Tracker::new(&grid, &config).unwrap();
/// let mut particles = ParticleSet::from_arrays(vec![0.05], vec![45.05], vec![0.0]).unwrap();
/// let day = tracker.track_intervals(&source, &mut particles, 1).unwrap();
///
/// assert_eq!(day.n_rows(), 2);
/// assert!(particles.positions().lon[0] > 0.05);
/// ```
pub struct Tracker<'a> {
    grid: &'a GridModel,
    config: &'a RunConfig,
    interp: SpatialInterpolator<'a>,
    integrator: Box<dyn Integrator>,
    mixing: Option<VerticalMixing>,
    state: TrackerState,
}

impl<'a> Tracker<'a> {
    /// Validate `config` and set up interpolation for `grid`.
    pub fn new(grid: &'a GridModel, config: &'a RunConfig) -> Result<Self, TrackError> {
        config.validate()?;
        let interp = SpatialInterpolator::new(grid, config.extrapolation, config.interpolation)?;
        let mixing = config
            .effective_turbulence()
            .then(|| VerticalMixing::new(config.vertical_diffusivity, config.random_seed));
        Ok(Self {
            grid,
            config,
            interp,
            integrator: Box::new(config.method),
            mixing,
            state: TrackerState::Idle,
        })
    }

    /// Replace the configured method with a user-defined integrator.
    pub fn with_integrator(mut self, integrator: impl Integrator + 'static) -> Self {
        self.integrator = Box::new(integrator);
        self
    }

    #[inline]
    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn integrator(&self) -> &dyn Integrator {
        self.integrator.as_ref()
    }

    pub fn config(&self) -> &RunConfig {
        self.config
    }

    pub fn grid(&self) -> &GridModel {
        self.grid
    }

    pub fn interpolator(&self) -> &SpatialInterpolator<'a> {
        &self.interp
    }

    /// Drop particles whose starting position is on land.
    ///
    /// Samples salinity (or the free surface when salinity is absent) from
    /// the first snapshot in tracking order; a not-a-number sample inside
    /// the domain means every surrounding node is land. Out-of-domain
    /// particles are kept and flagged by the first tracking call. Returns
    /// the number removed.
    pub fn trim_land(
        &self,
        source: &dyn SnapshotSource,
        particles: &mut ParticleSet,
    ) -> Result<usize, TrackError> {
        if source.is_empty() {
            return Err(TrackError::MissingSnapshots { needed: 1, found: 0 });
        }
        let first = match self.config.direction {
            Direction::Forward => 0,
            Direction::Reverse => source.len() - 1,
        };
        let snapshot = source.load(SnapshotIndex::new(first))?;
        let var = if snapshot.has(Variable::Salt) {
            Variable::Salt
        } else {
            Variable::Zeta
        };
        let samples = self.interp.sample(&snapshot, &[var], particles.positions())?;
        let keep: Vec<bool> = samples
            .require(var)?
            .iter()
            .zip(samples.out_of_domain())
            .map(|(v, &outside)| outside || !v.is_nan())
            .collect();
        let removed = particles.retain(&keep);
        if removed > 0 {
            log::warn!(
                "Removed {} of {} particles starting on land",
                removed,
                removed + particles.len()
            );
        }
        Ok(removed)
    }

    /// Track one day of `intervals_per_day` snapshot intervals.
    pub fn track_day(
        &mut self,
        source: &dyn SnapshotSource,
        particles: &mut ParticleSet,
    ) -> Result<DayTrack, TrackError> {
        self.track_intervals(source, particles, self.config.intervals_per_day)
    }

    /// Track through `n_intervals` snapshot intervals.
    ///
    /// Forward runs walk snapshots `0..=n`; reverse runs walk the last
    /// `n + 1` snapshots from the end, and the returned rows are put back in
    /// chronological order. On success `particles` holds the final state;
    /// on failure it is left untouched.
    pub fn track_intervals(
        &mut self,
        source: &dyn SnapshotSource,
        particles: &mut ParticleSet,
        n_intervals: usize,
    ) -> Result<DayTrack, TrackError> {
        let needed = n_intervals + 1;
        if source.len() < needed {
            return Err(TrackError::MissingSnapshots {
                needed,
                found: source.len(),
            });
        }

        self.state = TrackerState::Idle;
        let mut work = particles.clone();
        match self.walk(source, &mut work, n_intervals) {
            Ok(track) => {
                *particles = work;
                self.state = TrackerState::Done;
                Ok(track)
            }
            Err(e) => {
                self.state = TrackerState::Idle;
                Err(e)
            }
        }
    }

    fn walk(
        &mut self,
        source: &dyn SnapshotSource,
        work: &mut ParticleSet,
        n: usize,
    ) -> Result<DayTrack, TrackError> {
        let config = self.config;
        let ndiv = config.sub_steps_per_interval;
        let spi = config.saves_per_interval;
        let stride = config.save_stride();
        let last = source.len() - 1;
        let index = |k: usize| match config.direction {
            Direction::Forward => SnapshotIndex::new(k),
            Direction::Reverse => SnapshotIndex::new(last - k),
        };

        if config.surface_trapped {
            // row 0 and the first stage already sample at the top level
            let top = self.grid.levels().top();
            work.positions_mut().sigma.fill(top);
        }

        let mut track = DayTrack::new(n * spi + 1, work.len());
        let mut s0 = source.load(index(0))?;
        {
            let sampler = TemporalSampler::new(&self.interp, Arc::clone(&s0), Arc::clone(&s0));
            record(config, &sampler, 0.0, work, &mut track, 0)?;
        }

        for interval in 0..n {
            let s1 = source.load(index(interval + 1))?;
            let delta_t = s1.time() - s0.time();
            log::debug!("Interval {} of {} (dt = {} s)", interval + 1, n, delta_t);

            let sampler = TemporalSampler::new(&self.interp, Arc::clone(&s0), Arc::clone(&s1));
            for nd in 0..ndiv {
                self.state = TrackerState::Stepping { interval, sub_step: nd };
                let sub = SubStep::new(nd, ndiv, delta_t);
                advance(
                    self.grid,
                    config,
                    self.integrator.as_ref(),
                    self.mixing.as_mut(),
                    &sampler,
                    sub,
                    work,
                )?;
                if (nd + 1) % stride == 0 {
                    let row = interval * spi + (nd + 1) / stride;
                    record(config, &sampler, sub.frac1, work, &mut track, row)?;
                }
            }
            self.state = TrackerState::Written { interval };
            s0 = s1;
        }

        if config.direction == Direction::Reverse {
            track.reverse_time();
        }
        Ok(track)
    }
}

/// One sub-step for every active particle.
///
/// A particle whose stages sampled outside the domain, or whose new
/// position would be outside, stays at its last valid position and is
/// flagged out of domain.
fn advance(
    grid: &GridModel,
    config: &RunConfig,
    integrator: &dyn Integrator,
    mixing: Option<&mut VerticalMixing>,
    sampler: &TemporalSampler<'_, '_>,
    sub: SubStep,
    work: &mut ParticleSet,
) -> Result<(), TrackError> {
    let ctx = StepContext::new(sampler, grid.levels(), config.surface_trapped, sub);
    let mut velocity = integrator.step(&ctx, work.positions())?;

    let windage = config.effective_windage();
    if windage > 0.0 {
        // wind is sampled once, at the original positions and the midpoint time
        let (uwind, vwind) = ctx.wind(work.positions(), sub.mid())?;
        velocity.add_windage(windage, &uwind, &vwind);
    }

    let moved = match mixing {
        Some(mixing) => {
            let dz = mixing.displacements(work.len(), sub.dt);
            ctx.advance_with(work.positions(), &velocity, sub.dt, &dz)
        }
        None => ctx.advance(work.positions(), &velocity, sub.dt),
    };

    let mut newly_out = 0;
    for p in 0..work.len() {
        if !work.status()[p].is_active() {
            continue;
        }
        let (lon, lat, sigma) = moved.get(p);
        if velocity.out_of_domain[p] || !grid.in_domain(lon, lat, config.extrapolation) {
            work.set_status(p, ParticleStatus::OutOfDomain);
            newly_out += 1;
        } else {
            work.positions_mut().set(p, lon, lat, sigma);
        }
    }
    if newly_out > 0 {
        log::warn!(
            "{} particles left the domain in sub-step {} of {}",
            newly_out,
            sub.index + 1,
            sub.count
        );
    }
    Ok(())
}

/// Write save row `row` at interval fraction `frac`.
fn record(
    config: &RunConfig,
    sampler: &TemporalSampler<'_, '_>,
    frac: f64,
    work: &mut ParticleSet,
    track: &mut DayTrack,
    row: usize,
) -> Result<(), TrackError> {
    track.set_time(row, sampler.time_at(frac));
    let samples = sampler.sample_available(&Variable::ALL, work.positions(), frac)?;
    let value = |var: Variable, p: usize| samples.get(var).map_or(f64::NAN, |c| c[p]);

    let mut newly_beached = 0;
    let mut newly_out = 0;
    for p in 0..work.len() {
        let (lon, lat, sigma) = work.positions().get(p);
        let status = work.status()[p];
        match status {
            ParticleStatus::Beached => {
                if let Some(held) = work.held(p) {
                    track.set_record(row, p, held);
                }
            }
            ParticleStatus::OutOfDomain => write_position(track, row, p, lon, lat, sigma),
            ParticleStatus::Active if samples.out_of_domain()[p] => {
                work.set_status(p, ParticleStatus::OutOfDomain);
                write_position(track, row, p, lon, lat, sigma);
                newly_out += 1;
            }
            ParticleStatus::Active => {
                let zeta = value(Variable::Zeta, p);
                let h = value(Variable::H, p);
                let mut rec = vec![f64::NAN; Property::COUNT];
                rec[Property::Lon.index()] = lon;
                rec[Property::Lat.index()] = lat;
                rec[Property::Sigma.index()] = sigma;
                rec[Property::Z.index()] = SigmaLevels::depth_below_surface(sigma, zeta, h);
                rec[Property::Zbot.index()] = -h;
                for prop in Property::ALL {
                    if let Some(var) = prop.source() {
                        rec[prop.index()] = value(var, p);
                    }
                }
                track.set_record(row, p, &rec);

                let speed = rec[Property::U.index()].hypot(rec[Property::V.index()]);
                if speed <= config.beaching_speed_threshold {
                    work.set_status(p, ParticleStatus::Beached);
                    work.hold(p, rec);
                    newly_beached += 1;
                }
            }
        }
        track.set_status(row, p, work.status()[p]);
    }

    if newly_beached > 0 {
        log::debug!("{} particles beached at save row {}", newly_beached, row);
    }
    if newly_out > 0 {
        log::warn!("{} particles outside the domain at save row {}", newly_out, row);
    }
    Ok(())
}

/// Position only; every sampled property is not-a-number.
fn write_position(track: &mut DayTrack, row: usize, p: usize, lon: f64, lat: f64, sigma: f64) {
    let mut rec = vec![f64::NAN; Property::COUNT];
    rec[Property::Lon.index()] = lon;
    rec[Property::Lat.index()] = lat;
    rec[Property::Sigma.index()] = sigma;
    track.set_record(row, p, &rec);
}
