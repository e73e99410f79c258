//! Column-gather batch strategy.
//!
//! Locates every particle up front, then processes each variable one chunk
//! of particles at a time: gather all corners of the chunk, then fill and
//! weight the whole column. Chunks are independent and, with the
//! `parallel` feature, run on the rayon pool partitioned by particle index.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::kernel::{LevelAxes, Location, finish, gather, locate};
use super::FillPolicy;
use crate::grid::{ExtrapolationPolicy, GridLocation, GridModel, LandMask};
use crate::particles::Positions;
use crate::snapshot::{Field, VerticalLayout};

/// Particles per work chunk.
pub(crate) const CHUNK_SIZE: usize = 256;

/// Locate every particle.
pub(crate) fn locate_all(
    grid: &GridModel,
    levels: &LevelAxes,
    policy: ExtrapolationPolicy,
    positions: &Positions,
) -> Vec<Location> {
    let one = |p: usize| {
        let (lon, lat, sigma) = positions.get(p);
        locate(grid, levels, policy, lon, lat, sigma)
    };

    #[cfg(feature = "parallel")]
    {
        (0..positions.len()).into_par_iter().map(one).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..positions.len()).map(one).collect()
    }
}

/// Sample one field at every location.
pub(crate) fn sample_column(
    field: &Field,
    mask: &LandMask,
    location: GridLocation,
    layout: VerticalLayout,
    policy: FillPolicy,
    locations: &[Location],
) -> Vec<f64> {
    let mut out = vec![f64::NAN; locations.len()];

    let process = |(values, locs): (&mut [f64], &[Location])| {
        let mut corners = vec![[0.0f64; 8]; locs.len()];
        let mut land = vec![[false; 8]; locs.len()];
        for (n, loc) in locs.iter().enumerate() {
            let cell = loc.horizontal[location.index()];
            let vb = loc.vertical(layout);
            gather(field, mask, &cell, &vb, &mut corners[n], &mut land[n]);
        }
        for (n, loc) in locs.iter().enumerate() {
            let cell = loc.horizontal[location.index()];
            values[n] = finish(policy, layout, loc, &cell, &mut corners[n], &land[n]);
        }
    };

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(CHUNK_SIZE)
        .zip(locations.par_chunks(CHUNK_SIZE))
        .for_each(process);
    #[cfg(not(feature = "parallel"))]
    out.chunks_mut(CHUNK_SIZE).zip(locations.chunks(CHUNK_SIZE)).for_each(process);

    out
}
