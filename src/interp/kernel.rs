//! Shared corner gather, land fill and trilinear weighting.
//!
//! Both interpolation strategies go through these functions in the same
//! order, which is what makes their results bit-identical.

use super::FillPolicy;
use crate::grid::{Axis, Bracket, ExtrapolationPolicy, GridLocation, GridModel, LandMask};
use crate::snapshot::{Field, VerticalLayout};

/// Horizontal bracket of a query on one staggered grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBracket {
    /// Latitude (row) bracket
    pub j: Bracket,
    /// Longitude (column) bracket
    pub i: Bracket,
}

/// Everything needed to sample any variable at one query point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    /// Horizontal brackets, indexed by [`GridLocation::index`]
    pub horizontal: [CellBracket; 3],
    /// Bracket on the rho (cell-center) sigma levels
    pub rho: Bracket,
    /// Bracket on the w (cell-face) sigma levels
    pub w: Bracket,
    /// Outside the rho envelope under the active policy
    pub out_of_domain: bool,
    /// Some coordinate was not a number
    pub undefined: bool,
}

impl Location {
    /// Whether samples at this location are meaningful.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.out_of_domain && !self.undefined
    }

    #[inline]
    pub(crate) fn vertical(&self, layout: VerticalLayout) -> Bracket {
        match layout {
            VerticalLayout::Surface => Bracket::at(0),
            VerticalLayout::RhoLevels => self.rho,
            VerticalLayout::WLevels => self.w,
        }
    }
}

/// Sigma level axes searched for the vertical bracket.
#[derive(Clone, Debug)]
pub(crate) struct LevelAxes {
    pub rho: Axis,
    pub w: Axis,
}

/// Locate one query point.
///
/// The domain test uses the rho envelope with `policy`; the staggered u/v
/// axes and the sigma levels always clamp, so a point inside the rho
/// envelope but beyond the outermost u or v node uses the edge nodes.
pub(crate) fn locate(
    grid: &GridModel,
    levels: &LevelAxes,
    policy: ExtrapolationPolicy,
    lon: f64,
    lat: f64,
    sigma: f64,
) -> Location {
    let rho = grid.get(GridLocation::Rho);
    let out_of_domain =
        rho.lon().bracket(lon, policy).is_none() || rho.lat().bracket(lat, policy).is_none();
    let mut undefined = lon.is_nan() || lat.is_nan() || sigma.is_nan();

    let mut clamp = |axis: &Axis, x: f64| {
        axis.bracket(x, ExtrapolationPolicy::Clamp).unwrap_or_else(|| {
            undefined = true;
            Bracket::at(0)
        })
    };

    let mut horizontal = [CellBracket {
        j: Bracket::at(0),
        i: Bracket::at(0),
    }; 3];
    for loc in GridLocation::ALL {
        let g = grid.get(loc);
        horizontal[loc.index()] = CellBracket {
            j: clamp(g.lat(), lat),
            i: clamp(g.lon(), lon),
        };
    }
    let rho_b = clamp(&levels.rho, sigma);
    let w_b = clamp(&levels.w, sigma);

    Location {
        horizontal,
        rho: rho_b,
        w: w_b,
        out_of_domain,
        undefined,
    }
}

/// Gather the eight surrounding source values and their land flags.
///
/// Corner `c = 4*dk + 2*dj + di`. A node is land when the grid mask says so
/// or the stored value is not a number.
#[inline]
pub(crate) fn gather(
    field: &Field,
    mask: &LandMask,
    cell: &CellBracket,
    vb: &Bracket,
    corners: &mut [f64; 8],
    land: &mut [bool; 8],
) {
    let ks = [vb.i0, vb.i1];
    let js = [cell.j.i0, cell.j.i1];
    let is = [cell.i.i0, cell.i.i1];
    for (dk, &k) in ks.iter().enumerate() {
        for (dj, &j) in js.iter().enumerate() {
            for (di, &i) in is.iter().enumerate() {
                let c = 4 * dk + 2 * dj + di;
                let v = field.at(k, j, i);
                land[c] = v.is_nan() || !mask.is_wet(j, i);
                corners[c] = v;
            }
        }
    }
}

/// Replace land corners per `policy`. Returns `false` if nothing is left
/// to interpolate (every corner land under local-mean fill).
#[inline]
pub(crate) fn fill(policy: FillPolicy, corners: &mut [f64; 8], land: &[bool; 8]) -> bool {
    match policy {
        FillPolicy::Zero => {
            for (c, &l) in corners.iter_mut().zip(land) {
                if l {
                    *c = 0.0;
                }
            }
            true
        }
        FillPolicy::LocalMean => {
            let mut sum = 0.0;
            let mut count = 0usize;
            for (&c, &l) in corners.iter().zip(land) {
                if !l {
                    sum += c;
                    count += 1;
                }
            }
            if count == 0 {
                return false;
            }
            if count < 8 {
                let mean = sum / count as f64;
                for (c, &l) in corners.iter_mut().zip(land) {
                    if l {
                        *c = mean;
                    }
                }
            }
            true
        }
    }
}

/// Trilinear blend of eight corners.
#[inline]
pub(crate) fn trilinear(c: &[f64; 8], fz: f64, fy: f64, fx: f64) -> f64 {
    let gx = 1.0 - fx;
    let gy = 1.0 - fy;
    let c00 = gx * c[0] + fx * c[1];
    let c01 = gx * c[2] + fx * c[3];
    let c10 = gx * c[4] + fx * c[5];
    let c11 = gx * c[6] + fx * c[7];
    let c0 = gy * c00 + fy * c01;
    let c1 = gy * c10 + fy * c11;
    (1.0 - fz) * c0 + fz * c1
}

/// Interpolate filled corners at `loc`, or `NaN` when undefined.
#[inline]
pub(crate) fn finish(
    policy: FillPolicy,
    layout: VerticalLayout,
    loc: &Location,
    cell: &CellBracket,
    corners: &mut [f64; 8],
    land: &[bool; 8],
) -> f64 {
    if !loc.is_valid() || !fill(policy, corners, land) {
        return f64::NAN;
    }
    trilinear(corners, loc.vertical(layout).frac, cell.j.frac, cell.i.frac)
}

/// Sample one field at one location.
#[inline]
pub(crate) fn sample_point(
    field: &Field,
    mask: &LandMask,
    location: GridLocation,
    layout: VerticalLayout,
    policy: FillPolicy,
    loc: &Location,
) -> f64 {
    let cell = loc.horizontal[location.index()];
    let vb = loc.vertical(layout);
    let mut corners = [0.0; 8];
    let mut land = [false; 8];
    gather(field, mask, &cell, &vb, &mut corners, &mut land);
    finish(policy, layout, loc, &cell, &mut corners, &land)
}
