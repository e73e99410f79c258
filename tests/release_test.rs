//! Multi-day, multi-release runs into in-memory trajectory stores.

use ptrack_rs::{
    Axis, ContinuousCatalog, Direction, GridModel, MemorySource, MemoryStore, ParticleSet,
    ParticleStatus, Property, ReleaseRunner, RunConfig, SigmaLevels, SnapshotBuilder,
    StoreError, TrackError, Tracker, TrajectoryStore, Variable,
};

const HOUR: f64 = 3600.0;

/// 5×5 grid with a 2×2 block of land in the south-west corner.
fn grid() -> GridModel {
    GridModel::regular(
        Axis::linspace(0.0, 0.4, 5).unwrap(),
        Axis::linspace(45.0, 45.4, 5).unwrap(),
        SigmaLevels::uniform(3),
    )
    .unwrap()
    .with_land(&[(0, 0), (0, 1), (1, 0), (1, 1)])
    .unwrap()
}

fn source(grid: &GridModel, n: usize) -> MemorySource {
    MemorySource::new(
        (0..n)
            .map(|k| {
                SnapshotBuilder::new(grid, k as f64 * HOUR)
                    .uniform(Variable::U, 0.2)
                    .uniform(Variable::V, 0.05)
                    .uniform(Variable::Zeta, 0.0)
                    .uniform(Variable::H, 20.0)
                    .uniform(Variable::Salt, 34.0)
                    .build()
            })
            .collect(),
    )
    .unwrap()
}

/// Two-hour days keep the runs small.
fn config() -> RunConfig {
    RunConfig::default()
        .with_sub_steps(2)
        .with_intervals_per_day(2)
        .with_days_to_track(2)
}

fn particles() -> ParticleSet {
    ParticleSet::from_arrays(
        vec![0.05, 0.2, 0.25],
        vec![45.05, 45.2, 45.3],
        vec![0.0; 3],
    )
    .unwrap()
}

#[test]
fn test_release_schedule_fills_every_row() {
    let grid = grid();
    let catalog = ContinuousCatalog::new(source(&grid, 7));
    let config = config().with_releases(2, 1);
    let runner = ReleaseRunner::new(&grid, &config).unwrap();

    let releases = runner
        .run_all(&catalog, 0, &particles(), |info, ids| {
            Ok(MemoryStore::new(info.n_rows, ids.to_vec()))
        })
        .unwrap();

    assert_eq!(releases.len(), 2);
    for (r, release) in releases.iter().enumerate() {
        let store = &release.store;
        assert_eq!(release.info.start_day, r as i64);
        assert_eq!(release.info.trimmed, 1);
        assert_eq!(store.n_times(), 5);
        assert_eq!(store.n_written(), 5);
        // The particle on land is gone; the others keep their ids
        let ids: Vec<usize> = store.ids().iter().map(|id| id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        let t0 = r as f64 * 2.0 * HOUR;
        let expected: Vec<f64> = (0..5).map(|k| t0 + k as f64 * HOUR).collect();
        assert_eq!(store.times(), expected.as_slice());
        for t in 0..5 {
            assert_eq!(store.status(t, 0), Some(ParticleStatus::Active));
        }
        assert_eq!(release.summary.active, 2);
        assert_eq!(release.summary.days_tracked, 2);
    }
    // Same flow, same start positions: the later release repeats the first
    assert_eq!(
        releases[0].store.series(Property::Lon, 0),
        releases[1].store.series(Property::Lon, 0)
    );
}

#[test]
fn test_days_chain_like_one_long_walk() {
    let grid = grid();
    let config = config().with_trim_land(false);
    let catalog = ContinuousCatalog::new(source(&grid, 5));
    let runner = ReleaseRunner::new(&grid, &config).unwrap();

    let mut chained = particles();
    let mut store = MemoryStore::new(config.rows_per_release(), chained.ids().to_vec());
    runner
        .track_release(&catalog, 0, &mut chained, &mut store)
        .unwrap();

    let mut single = particles();
    Tracker::new(&grid, &config)
        .unwrap()
        .track_intervals(&source(&grid, 5), &mut single, 4)
        .unwrap();

    assert_eq!(chained.positions(), single.positions());
    assert_eq!(store.get(Property::Lon, 4, 1), single.positions().lon[1]);
    // The land particle beaches at once and stays put
    assert_eq!(store.status(0, 0), Some(ParticleStatus::Beached));
    assert_eq!(store.get(Property::Lon, 4, 0), 0.05);
}

#[test]
fn test_missing_snapshot_stops_release() {
    let grid = grid();
    let config = config();
    // Day 1 only has two of its three snapshots
    let catalog = ContinuousCatalog::new(source(&grid, 4));
    let runner = ReleaseRunner::new(&grid, &config).unwrap();
    let mut ps = particles();
    runner.prepare(&catalog, 0, &mut ps).unwrap();
    let mut store = MemoryStore::new(config.rows_per_release(), ps.ids().to_vec());

    let err = runner
        .track_release(&catalog, 0, &mut ps, &mut store)
        .unwrap_err();

    assert!(matches!(
        err,
        TrackError::MissingSnapshots {
            needed: 3,
            found: 2
        }
    ));
    // Day 0 is a valid truncated record
    assert_eq!(store.n_written(), 3);
    assert!(!store.is_written(3));
    assert!(store.get(Property::Lon, 4, 0).is_nan());
}

#[test]
fn test_store_mismatch_commits_nothing() {
    let grid = grid();
    let config = config();
    let catalog = ContinuousCatalog::new(source(&grid, 5));
    let runner = ReleaseRunner::new(&grid, &config).unwrap();
    let mut ps = particles();
    let mut short = MemoryStore::new(2, ps.ids().to_vec());

    let err = runner
        .track_release(&catalog, 0, &mut ps, &mut short)
        .unwrap_err();
    assert!(matches!(err, TrackError::Store(StoreError::RowOutOfRange { .. })));
    assert_eq!(short.n_written(), 0);

    let mut wrong = MemoryStore::new(5, ps.ids()[..2].to_vec());
    let err = runner
        .track_release(&catalog, 0, &mut ps, &mut wrong)
        .unwrap_err();
    assert!(matches!(
        err,
        TrackError::Store(StoreError::ParticleMismatch { .. })
    ));
    assert_eq!(ps.positions(), particles().positions());
}

#[test]
fn test_reverse_release() {
    let grid = grid();
    let config = config().with_direction(Direction::Reverse);
    let catalog = ContinuousCatalog::new(source(&grid, 5));
    let runner = ReleaseRunner::new(&grid, &config).unwrap();

    let releases = runner
        .run_all(&catalog, 2, &particles(), |info, ids| {
            Ok(MemoryStore::new(info.n_rows, ids.to_vec()))
        })
        .unwrap();
    let store = &releases[0].store;

    assert_eq!(store.times(), &[0.0, HOUR, 2.0 * HOUR, 3.0 * HOUR, 4.0 * HOUR]);
    // Released at the end of day 1, tracked back to the start of day 0
    assert_eq!(store.get(Property::Lon, 4, 0), 0.2);
    let lon = store.series(Property::Lon, 0);
    assert!(lon.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(releases[0].particles.positions().lon[0], lon[0]);
}

#[test]
fn test_config_from_json_drives_runner() {
    let grid = grid();
    let config = RunConfig::from_json_str(
        r#"{
            "method": "rk2",
            "sub_steps_per_interval": 2,
            "intervals_per_day": 2,
            "days_to_track": 1,
            "number_of_releases": 3,
            "days_between_releases": 1
        }"#,
    )
    .unwrap();
    let catalog = ContinuousCatalog::new(source(&grid, 7));
    let runner = ReleaseRunner::new(&grid, &config).unwrap();
    assert_eq!(runner.start_days(0), vec![0, 1, 2]);

    let releases = runner
        .run_all(&catalog, 0, &particles(), |info, ids| {
            Ok(MemoryStore::new(info.n_rows, ids.to_vec()))
        })
        .unwrap();
    assert_eq!(releases.len(), 3);
    assert!(releases.iter().all(|r| r.store.n_written() == 3));

    let bad = RunConfig::default().with_sub_steps(0);
    assert!(matches!(
        ReleaseRunner::new(&grid, &bad),
        Err(TrackError::Config(_))
    ));
}
