//! Multi-day, multi-release driver.
//!
//! A release is one batch of particles tracked together for
//! `days_to_track` days. Each day's final state seeds the next day, and each
//! day's saves land in the release's trajectory store as soon as the day is
//! finished, so an interrupted release leaves a valid truncated record.
//!
//! Row layout for `D` days of `spd` saves per day (store sized `D·spd + 1`):
//!
//! ```text
//! forward   day d -> rows [d·spd, (d+1)·spd]          catalog day start + d
//! reverse   day d -> rows [(D-1-d)·spd, (D-d)·spd]    catalog day start - 1 - d
//! ```
//!
//! Consecutive days share one boundary row.

mod progress;

pub use progress::{ProgressReporter, format_duration};

use crate::config::{Direction, RunConfig};
use crate::grid::{GridLocation, GridModel};
use crate::particles::{ParticleSet, ParticleStatus};
use crate::snapshot::SnapshotCatalog;
use crate::tracker::{TrackError, Tracker};
use crate::trajectory::{StoreError, TrajectoryStore};
use crate::types::ParticleId;

/// Identity of one release, handed to the store factory.
#[derive(Clone, Debug, PartialEq)]
pub struct ReleaseInfo {
    /// Position in the release schedule
    pub index: usize,
    /// Calendar day the release starts (catalog day index)
    pub start_day: i64,
    /// Particles left after land trimming
    pub n_particles: usize,
    /// Particles removed for starting on land
    pub trimmed: usize,
    /// Rows the store must hold
    pub n_rows: usize,
}

/// Outcome of a tracked release.
#[derive(Clone, Debug, PartialEq)]
pub struct ReleaseSummary {
    pub start_day: i64,
    pub days_tracked: usize,
    pub active: usize,
    pub beached: usize,
    pub out_of_domain: usize,
    /// Wall-clock time in seconds
    pub wall_time: f64,
}

/// A finished release with its store and final particle state.
pub struct Release<S> {
    pub info: ReleaseInfo,
    pub summary: ReleaseSummary,
    pub particles: ParticleSet,
    pub store: S,
}

/// Runs releases over a snapshot catalog.
pub struct ReleaseRunner<'a> {
    grid: &'a GridModel,
    config: &'a RunConfig,
}

impl<'a> ReleaseRunner<'a> {
    /// Validate `config` for use on `grid`.
    pub fn new(grid: &'a GridModel, config: &'a RunConfig) -> Result<Self, TrackError> {
        config.validate()?;
        let stats = grid.get(GridLocation::Rho).mask().statistics();
        log::info!(
            "Releases on {} ({} water nodes, {:.1}% of the grid)",
            grid.bounds(),
            stats.n_wet,
            100.0 * stats.wet_fraction
        );
        Ok(Self { grid, config })
    }

    pub fn config(&self) -> &RunConfig {
        self.config
    }

    /// Start days of every scheduled release, `days_between_releases` apart.
    pub fn start_days(&self, first_day: i64) -> Vec<i64> {
        (0..self.config.number_of_releases)
            .map(|r| first_day + r as i64 * self.config.days_between_releases)
            .collect()
    }

    /// Catalog day tracked on day `nd` of a release starting at `start_day`.
    pub fn catalog_day(&self, start_day: i64, nd: usize) -> i64 {
        match self.config.direction {
            Direction::Forward => start_day + nd as i64,
            Direction::Reverse => start_day - 1 - nd as i64,
        }
    }

    /// First store row written by day `nd` of the release.
    pub fn first_row(&self, nd: usize) -> usize {
        let spd = self.config.saves_per_day();
        match self.config.direction {
            Direction::Forward => nd * spd,
            Direction::Reverse => (self.config.days_to_track - 1 - nd) * spd,
        }
    }

    /// Trim land particles against the release's first day.
    ///
    /// Returns the number removed (zero when trimming is disabled).
    pub fn prepare<C>(
        &self,
        catalog: &C,
        start_day: i64,
        particles: &mut ParticleSet,
    ) -> Result<usize, TrackError>
    where
        C: SnapshotCatalog + ?Sized,
    {
        let bounds = self.grid.bounds();
        let positions = particles.positions();
        let outside = (0..positions.len())
            .filter(|&p| !bounds.contains(positions.lon[p], positions.lat[p]))
            .count();
        if outside > 0 {
            log::warn!("{} particles start outside {}", outside, bounds);
        }
        if !self.config.trim_land_at_release {
            return Ok(0);
        }
        let source = catalog.day(self.catalog_day(start_day, 0), self.config.intervals_per_day)?;
        Tracker::new(self.grid, self.config)?.trim_land(source.as_ref(), particles)
    }

    /// Track one release for `days_to_track` days into `store`.
    ///
    /// The store is checked against the particle count and row layout
    /// before the first day, so a mismatch commits nothing.
    pub fn track_release<C, S>(
        &self,
        catalog: &C,
        start_day: i64,
        particles: &mut ParticleSet,
        store: &mut S,
    ) -> Result<ReleaseSummary, TrackError>
    where
        C: SnapshotCatalog + ?Sized,
        S: TrajectoryStore + ?Sized,
    {
        let n_rows = self.config.rows_per_release();
        if store.n_particles() != particles.len() {
            return Err(StoreError::ParticleMismatch {
                expected: store.n_particles(),
                found: particles.len(),
            }
            .into());
        }
        if store.n_times() < n_rows {
            return Err(StoreError::RowOutOfRange {
                row0: 0,
                end: n_rows,
                n_times: store.n_times(),
            }
            .into());
        }

        let days = self.config.days_to_track;
        let steps_per_day = (particles.len()
            * self.config.intervals_per_day
            * self.config.sub_steps_per_interval) as u64;
        let mut tracker = Tracker::new(self.grid, self.config)?;
        let label = format!("release starting day {}", start_day);
        let mut progress = ProgressReporter::new(label, days);

        for nd in 0..days {
            let day = self.catalog_day(start_day, nd);
            let source = catalog.day(day, self.config.intervals_per_day)?;
            let track = tracker.track_day(source.as_ref(), particles)?;
            store.write_rows(self.first_row(nd), &track)?;
            progress.day_done(steps_per_day);
        }

        Ok(ReleaseSummary {
            start_day,
            days_tracked: days,
            active: particles.count(ParticleStatus::Active),
            beached: particles.count(ParticleStatus::Beached),
            out_of_domain: particles.count(ParticleStatus::OutOfDomain),
            wall_time: progress.finish(),
        })
    }

    /// Run every scheduled release from the same initial particle set.
    ///
    /// `make_store` is called once per release, after land trimming, with
    /// the release info and the surviving particle ids.
    pub fn run_all<C, S, F>(
        &self,
        catalog: &C,
        first_day: i64,
        initial: &ParticleSet,
        mut make_store: F,
    ) -> Result<Vec<Release<S>>, TrackError>
    where
        C: SnapshotCatalog + ?Sized,
        S: TrajectoryStore,
        F: FnMut(&ReleaseInfo, &[ParticleId]) -> Result<S, StoreError>,
    {
        let start_days = self.start_days(first_day);
        let mut releases = Vec::with_capacity(start_days.len());

        for (index, start_day) in start_days.into_iter().enumerate() {
            log::info!(
                "Release {} of {} starting day {} ({} particles)",
                index + 1,
                self.config.number_of_releases,
                start_day,
                initial.len()
            );
            let mut particles = initial.clone();
            let trimmed = self.prepare(catalog, start_day, &mut particles)?;
            let info = ReleaseInfo {
                index,
                start_day,
                n_particles: particles.len(),
                trimmed,
                n_rows: self.config.rows_per_release(),
            };
            let mut store = make_store(&info, particles.ids())?;
            let summary = self.track_release(catalog, start_day, &mut particles, &mut store)?;
            log::info!(
                "Release {} done: {} active, {} beached, {} out of domain",
                index + 1,
                summary.active,
                summary.beached,
                summary.out_of_domain
            );
            releases.push(Release {
                info,
                summary,
                particles,
                store,
            });
        }
        Ok(releases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Axis;
    use crate::vertical::SigmaLevels;

    fn grid() -> GridModel {
        GridModel::regular(
            Axis::linspace(0.0, 1.0, 3).unwrap(),
            Axis::linspace(0.0, 1.0, 3).unwrap(),
            SigmaLevels::uniform(2),
        )
        .unwrap()
    }

    #[test]
    fn test_forward_layout() {
        let g = grid();
        let config = RunConfig::default()
            .with_sub_steps(4)
            .with_saves_per_interval(2)
            .with_intervals_per_day(3)
            .with_days_to_track(3)
            .with_releases(2, 5);
        let runner = ReleaseRunner::new(&g, &config).unwrap();
        assert_eq!(runner.start_days(10), vec![10, 15]);
        assert_eq!(runner.catalog_day(10, 2), 12);
        assert_eq!(runner.first_row(0), 0);
        assert_eq!(runner.first_row(2), 12);
        assert_eq!(config.rows_per_release(), 19);
    }

    #[test]
    fn test_reverse_layout() {
        let g = grid();
        let config = RunConfig::default()
            .with_direction(Direction::Reverse)
            .with_intervals_per_day(2)
            .with_days_to_track(3);
        let runner = ReleaseRunner::new(&g, &config).unwrap();
        assert_eq!(runner.catalog_day(10, 0), 9);
        assert_eq!(runner.catalog_day(10, 2), 7);
        assert_eq!(runner.first_row(0), 4);
        assert_eq!(runner.first_row(2), 0);
    }

    #[test]
    fn test_invalid_config() {
        let g = grid();
        let config = RunConfig::default().with_days_to_track(0);
        assert!(ReleaseRunner::new(&g, &config).is_err());
    }
}
