//! End-to-end tracking scenarios on small synthetic grids.
//!
//! These tests verify:
//! - Displacement under a uniform current matches the closed form
//! - Particles outside the domain are flagged, not given zero velocity
//! - Surface-trapped sigma never drifts, whatever the starting depth
//! - Beached particles never move again
//! - Vertical motion, windage and user-defined integrators

use approx::assert_relative_eq;
use ptrack_rs::integrate::earth_radius;
use ptrack_rs::{
    Axis, Direction, GridModel, Integrator, MemorySource, ParticleSet, ParticleStatus, Positions,
    Property, RunConfig, SigmaLevels, Snapshot, SnapshotBuilder, SnapshotError,
    SongHaidvogelStretching, StepContext, StepVelocity, Tracker, Variable,
};

const HOUR: f64 = 3600.0;

/// 3×3 rho grid spanning 0.2° in each direction.
fn grid_3x3() -> GridModel {
    GridModel::regular(
        Axis::linspace(0.0, 0.2, 3).unwrap(),
        Axis::linspace(45.0, 45.2, 3).unwrap(),
        SigmaLevels::uniform(4),
    )
    .unwrap()
}

fn uniform_snapshot(grid: &GridModel, time: f64, u: f64, v: f64) -> Snapshot {
    SnapshotBuilder::new(grid, time)
        .uniform(Variable::U, u)
        .uniform(Variable::V, v)
        .uniform(Variable::W, 0.0)
        .uniform(Variable::Zeta, 0.0)
        .uniform(Variable::H, 100.0)
        .uniform(Variable::Salt, 35.0)
        .uniform(Variable::Temp, 10.0)
        .build()
}

fn uniform_source(grid: &GridModel, n: usize, u: f64, v: f64) -> MemorySource {
    MemorySource::new(
        (0..n)
            .map(|k| uniform_snapshot(grid, k as f64 * HOUR, u, v))
            .collect(),
    )
    .unwrap()
}

/// Degrees of longitude covered by `meters` eastward at `lat`.
fn meters_to_lon(meters: f64, lat: f64) -> f64 {
    (meters / (earth_radius(lat) * lat.to_radians().cos())).to_degrees()
}

#[test]
fn test_uniform_eastward_flow_displacement() {
    let grid = grid_3x3();
    let source = uniform_source(&grid, 2, 1.0, 0.0);
    let config = RunConfig::default().with_sub_steps(4).with_windage(0.0);
    let mut tracker = Tracker::new(&grid, &config).unwrap();
    let mut particles = ParticleSet::from_arrays(vec![0.1], vec![45.1], vec![0.0]).unwrap();

    let day = tracker.track_intervals(&source, &mut particles, 1).unwrap();

    let expected = 0.1 + meters_to_lon(1.0 * HOUR, 45.1);
    let lon = particles.positions().lon[0];
    assert!(
        (lon - expected).abs() < 1e-6,
        "Expected lon {:.8}, got {:.8}",
        expected,
        lon
    );
    assert_eq!(particles.positions().lat[0], 45.1);
    assert_eq!(day.get(Property::Lon, 1, 0), lon);
    assert_eq!(day.times(), &[0.0, HOUR]);
    assert_eq!(day.status(1, 0), ParticleStatus::Active);
}

#[test]
fn test_particle_outside_domain_is_flagged() {
    let grid = grid_3x3();
    let source = uniform_source(&grid, 2, 1.0, 0.0);
    let config = RunConfig::default().with_sub_steps(4);
    let mut tracker = Tracker::new(&grid, &config).unwrap();
    // One grid cell west of the domain
    let mut particles =
        ParticleSet::from_arrays(vec![-0.1, 0.1], vec![45.1, 45.1], vec![0.0, 0.0]).unwrap();

    let day = tracker.track_intervals(&source, &mut particles, 1).unwrap();

    assert_eq!(day.status(0, 0), ParticleStatus::OutOfDomain);
    assert_eq!(day.status(1, 0), ParticleStatus::OutOfDomain);
    assert_eq!(particles.status()[0], ParticleStatus::OutOfDomain);
    // Frozen, never advected with a filled velocity
    assert_eq!(particles.positions().lon[0], -0.1);
    assert_eq!(day.get(Property::Lon, 1, 0), -0.1);
    assert!(day.get(Property::Salt, 1, 0).is_nan());
    assert!(day.get(Property::U, 0, 0).is_nan());
    // The neighbour is unaffected
    assert_eq!(day.status(1, 1), ParticleStatus::Active);
    assert!(particles.positions().lon[1] > 0.1);
}

#[test]
fn test_particle_leaving_domain_is_frozen() {
    let grid = grid_3x3();
    let source = uniform_source(&grid, 3, 2.0, 0.0);
    let config = RunConfig::default().with_sub_steps(6);
    let mut tracker = Tracker::new(&grid, &config).unwrap();
    // 2 m/s covers ~0.092° per hour, so the east edge is crossed within the first hour
    let mut particles = ParticleSet::from_arrays(vec![0.15], vec![45.1], vec![0.0]).unwrap();

    let day = tracker.track_intervals(&source, &mut particles, 2).unwrap();

    assert_eq!(day.status(0, 0), ParticleStatus::Active);
    assert_eq!(particles.status()[0], ParticleStatus::OutOfDomain);
    let lon = particles.positions().lon[0];
    assert!(lon <= 0.2 && lon > 0.15, "Frozen inside the domain, got {}", lon);
    assert!(day.get(Property::Salt, 2, 0).is_nan());
}

#[test]
fn test_surface_trapped_sigma_is_top_at_every_save() {
    let grid = grid_3x3();
    let source = uniform_source(&grid, 4, 0.3, 0.2);
    let config = RunConfig::default()
        .with_sub_steps(6)
        .with_saves_per_interval(3);
    let mut tracker = Tracker::new(&grid, &config).unwrap();
    let mut particles =
        ParticleSet::from_arrays(vec![0.05, 0.1], vec![45.05, 45.05], vec![-0.5, -0.9]).unwrap();

    let day = tracker.track_intervals(&source, &mut particles, 3).unwrap();

    let top = grid.levels().top();
    assert_eq!(day.n_rows(), 10);
    for row in 0..day.n_rows() {
        for p in 0..2 {
            assert_eq!(day.get(Property::Sigma, row, p), top);
            assert_relative_eq!(day.get(Property::Z, row, p), top * 100.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_surface_trapped_start_depth_is_ignored() {
    let grid = grid_3x3();
    // Still at the bottom rho level, 1 m/s at the top one
    let snap = |t: f64| {
        SnapshotBuilder::new(&grid, t)
            .from_fn(Variable::U, |_, _, s| (s + 0.875) / 0.75)
            .uniform(Variable::V, 0.0)
            .uniform(Variable::Zeta, 0.0)
            .uniform(Variable::H, 100.0)
            .build()
    };
    let source = MemorySource::new(vec![snap(0.0), snap(HOUR)]).unwrap();
    let config = RunConfig::default().with_sub_steps(4);
    let mut tracker = Tracker::new(&grid, &config).unwrap();
    let bottom = grid.levels().bottom();
    let top = grid.levels().top();
    let mut particles =
        ParticleSet::from_arrays(vec![0.05, 0.05], vec![45.1, 45.1], vec![bottom, top]).unwrap();

    let day = tracker.track_intervals(&source, &mut particles, 1).unwrap();

    for p in 0..2 {
        assert_eq!(day.get(Property::Sigma, 0, p), top);
        assert_eq!(day.status(0, p), ParticleStatus::Active);
        assert_relative_eq!(day.get(Property::U, 0, p), 1.0, epsilon = 1e-12);
    }
    let lon = &particles.positions().lon;
    assert!(lon[0] > 0.05 + 0.9 * meters_to_lon(HOUR, 45.1));
    assert_eq!(lon[0], lon[1]);
    assert_eq!(particles.status()[0], ParticleStatus::Active);
}

#[test]
fn test_beached_particle_never_moves() {
    let grid = grid_3x3();
    // Flow stops exactly at the first snapshot boundary, then resumes
    let speeds = [0.2, 0.0, 0.3, 0.3];
    let source = MemorySource::new(
        speeds
            .iter()
            .enumerate()
            .map(|(k, &u)| uniform_snapshot(&grid, k as f64 * HOUR, u, 0.0))
            .collect(),
    )
    .unwrap();
    let config = RunConfig::default().with_sub_steps(4);
    let mut tracker = Tracker::new(&grid, &config).unwrap();
    let mut particles = ParticleSet::from_arrays(vec![0.05], vec![45.1], vec![0.0]).unwrap();

    let day = tracker.track_intervals(&source, &mut particles, 3).unwrap();

    assert_eq!(day.status(0, 0), ParticleStatus::Active);
    assert_eq!(day.status(1, 0), ParticleStatus::Beached);
    let beached_at = day.get(Property::Lon, 1, 0);
    assert!(beached_at > 0.05);
    for row in 2..4 {
        assert_eq!(day.get(Property::Lon, row, 0), beached_at);
        assert_eq!(day.status(row, 0), ParticleStatus::Beached);
        assert_eq!(day.get(Property::Salt, row, 0), day.get(Property::Salt, 1, 0));
    }
    assert_eq!(particles.positions().lon[0], beached_at);
}

#[test]
fn test_beaching_threshold_is_configurable() {
    let grid = grid_3x3();
    let source = uniform_source(&grid, 2, 0.01, 0.0);
    let config = RunConfig::default().with_beaching_threshold(0.05);
    let mut tracker = Tracker::new(&grid, &config).unwrap();
    let mut particles = ParticleSet::from_arrays(vec![0.1], vec![45.1], vec![0.0]).unwrap();

    tracker.track_intervals(&source, &mut particles, 1).unwrap();

    assert_eq!(particles.status()[0], ParticleStatus::Beached);
    assert_eq!(particles.positions().lon[0], 0.1);
}

#[test]
fn test_three_dimensional_vertical_motion() {
    let grid = grid_3x3();
    let snap = |t: f64| {
        SnapshotBuilder::new(&grid, t)
            .uniform(Variable::U, 0.0)
            .uniform(Variable::V, 0.1)
            .uniform(Variable::W, -0.001)
            .uniform(Variable::Zeta, 0.0)
            .uniform(Variable::H, 100.0)
            .build()
    };
    let source = MemorySource::new(vec![snap(0.0), snap(HOUR)]).unwrap();
    let config = RunConfig::default()
        .with_surface_trapped(false)
        .with_turbulence(Some(false))
        .with_sub_steps(4);
    let mut tracker = Tracker::new(&grid, &config).unwrap();
    let mut particles = ParticleSet::from_arrays(vec![0.1], vec![45.05], vec![-0.5]).unwrap();

    let day = tracker.track_intervals(&source, &mut particles, 1).unwrap();

    // 3.6 m down through a 100 m column
    assert_relative_eq!(particles.positions().sigma[0], -0.536, epsilon = 1e-12);
    assert_relative_eq!(day.get(Property::Z, 1, 0), -53.6, epsilon = 1e-9);
    assert_relative_eq!(day.get(Property::Zbot, 1, 0), -100.0, epsilon = 1e-9);
    assert!(particles.positions().lat[0] > 45.05);
    // Temperature was not supplied
    assert!(day.get(Property::Temp, 1, 0).is_nan());
}

#[test]
fn test_vertical_motion_on_stretched_levels() {
    let grid = GridModel::regular(
        Axis::linspace(0.0, 0.2, 3).unwrap(),
        Axis::linspace(45.0, 45.2, 3).unwrap(),
        SigmaLevels::new(10, SongHaidvogelStretching::new(5.0, 0.4)),
    )
    .unwrap();
    let snap = |t: f64| {
        SnapshotBuilder::new(&grid, t)
            .uniform(Variable::U, 0.0)
            .uniform(Variable::V, 0.0)
            .uniform(Variable::W, -0.001)
            .uniform(Variable::Zeta, 0.0)
            .uniform(Variable::H, 100.0)
            .from_fn(Variable::Salt, |_, _, s| 30.0 + 10.0 * s)
            .build()
    };
    let source = MemorySource::new(vec![snap(0.0), snap(HOUR)]).unwrap();
    let config = RunConfig::default()
        .with_surface_trapped(false)
        .with_turbulence(Some(false))
        .with_sub_steps(4);
    let mut tracker = Tracker::new(&grid, &config).unwrap();
    let mut particles = ParticleSet::from_arrays(vec![0.1], vec![45.1], vec![-0.5]).unwrap();

    let day = tracker.track_intervals(&source, &mut particles, 1).unwrap();

    // Sigma bookkeeping does not depend on level spacing
    assert_relative_eq!(particles.positions().sigma[0], -0.536, epsilon = 1e-12);
    assert_relative_eq!(day.get(Property::Z, 1, 0), -53.6, epsilon = 1e-9);
    // A tracer linear in sigma is recovered between unevenly spaced levels
    assert_relative_eq!(day.get(Property::Salt, 0, 0), 25.0, epsilon = 1e-9);
    assert_relative_eq!(day.get(Property::Salt, 1, 0), 24.64, epsilon = 1e-9);
}

#[test]
fn test_turbulence_is_reproducible() {
    let grid = grid_3x3();
    let source = uniform_source(&grid, 3, 0.1, 0.0);
    let run = |seed: u64| {
        let config = RunConfig::default()
            .with_surface_trapped(false)
            .with_vertical_diffusivity(1e-3)
            .with_random_seed(seed)
            .with_sub_steps(4);
        let mut tracker = Tracker::new(&grid, &config).unwrap();
        let mut particles =
            ParticleSet::from_arrays(vec![0.05, 0.1], vec![45.1, 45.1], vec![-0.5, -0.5]).unwrap();
        tracker.track_intervals(&source, &mut particles, 2).unwrap();
        particles.positions().sigma.clone()
    };

    let a = run(7);
    assert_eq!(a, run(7));
    assert_ne!(a, run(8));
    let levels = grid.levels();
    assert!(a.iter().all(|&s| s >= levels.bottom() && s <= levels.top()));
}

#[test]
fn test_windage_adds_to_surface_drift() {
    let grid = grid_3x3();
    let snap = |t: f64| {
        SnapshotBuilder::new(&grid, t)
            .uniform(Variable::U, 0.1)
            .uniform(Variable::V, 0.0)
            .uniform(Variable::Zeta, 0.0)
            .uniform(Variable::H, 50.0)
            .uniform(Variable::Uwind, 10.0)
            .uniform(Variable::Vwind, 0.0)
            .build()
    };
    let source = MemorySource::new(vec![snap(0.0), snap(HOUR)]).unwrap();
    let config = RunConfig::default().with_windage(0.02).with_sub_steps(4);
    let mut tracker = Tracker::new(&grid, &config).unwrap();
    let mut particles = ParticleSet::from_arrays(vec![0.05], vec![45.1], vec![0.0]).unwrap();

    let day = tracker.track_intervals(&source, &mut particles, 1).unwrap();

    let expected = 0.05 + meters_to_lon(0.3 * HOUR, 45.1);
    assert_relative_eq!(particles.positions().lon[0], expected, epsilon = 1e-9);
    assert_relative_eq!(day.get(Property::Uwind, 1, 0), 10.0, epsilon = 1e-9);
}

#[test]
fn test_windage_without_wind_fields_fails() {
    let grid = grid_3x3();
    let source = uniform_source(&grid, 2, 0.1, 0.0);
    let config = RunConfig::default().with_windage(0.03);
    let mut tracker = Tracker::new(&grid, &config).unwrap();
    let mut particles = ParticleSet::from_arrays(vec![0.05], vec![45.1], vec![0.0]).unwrap();

    assert!(tracker.track_intervals(&source, &mut particles, 1).is_err());
    assert_eq!(particles.positions().lon[0], 0.05);
}

/// Forward Euler, as a user-supplied scheme.
struct Euler;

impl Integrator for Euler {
    fn name(&self) -> &str {
        "Euler"
    }

    fn order(&self) -> usize {
        1
    }

    fn stage_fractions(&self) -> Vec<f64> {
        vec![0.0]
    }

    fn step(
        &self,
        ctx: &StepContext<'_, '_>,
        positions: &Positions,
    ) -> Result<StepVelocity, SnapshotError> {
        ctx.velocity(positions, ctx.sub_step().frac0)
    }
}

#[test]
fn test_user_defined_integrator() {
    let grid = grid_3x3();
    let source = uniform_source(&grid, 2, 0.5, 0.0);
    let config = RunConfig::default().with_sub_steps(4);

    let mut rk4 = Tracker::new(&grid, &config).unwrap();
    let mut euler = Tracker::new(&grid, &config).unwrap().with_integrator(Euler);
    assert_eq!(euler.integrator().name(), "Euler");
    assert_eq!(euler.integrator().n_stages(), 1);

    let mut a = ParticleSet::from_arrays(vec![0.05], vec![45.1], vec![0.0]).unwrap();
    let mut b = a.clone();
    rk4.track_intervals(&source, &mut a, 1).unwrap();
    euler.track_intervals(&source, &mut b, 1).unwrap();

    // Exact for both in a uniform, steady current
    assert_relative_eq!(a.positions().lon[0], b.positions().lon[0], epsilon = 1e-12);
}

#[test]
fn test_reverse_rows_are_chronological() {
    let grid = grid_3x3();
    let source = uniform_source(&grid, 3, 0.5, 0.0);
    let config = RunConfig::default()
        .with_direction(Direction::Reverse)
        .with_sub_steps(2);
    let mut tracker = Tracker::new(&grid, &config).unwrap();
    let mut particles = ParticleSet::from_arrays(vec![0.1], vec![45.1], vec![0.0]).unwrap();

    let day = tracker.track_intervals(&source, &mut particles, 2).unwrap();

    assert_eq!(day.times(), &[0.0, HOUR, 2.0 * HOUR]);
    // The walk starts at the last snapshot and moves west
    assert_eq!(day.get(Property::Lon, 2, 0), 0.1);
    assert!(day.get(Property::Lon, 0, 0) < day.get(Property::Lon, 1, 0));
    assert_eq!(particles.positions().lon[0], day.get(Property::Lon, 0, 0));
}
