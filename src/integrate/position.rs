//! Converting velocities into position increments.

use crate::particles::Positions;
use crate::vertical::SigmaLevels;

use super::StepVelocity;

/// WGS-84 equatorial radius (m).
pub const EARTH_EQUATORIAL_RADIUS: f64 = 6_378_137.0;
/// WGS-84 polar radius (m).
pub const EARTH_POLAR_RADIUS: f64 = 6_356_752.3;

/// Geocentric earth radius (m) at latitude `lat_deg`.
///
/// ```
/// use ptrack_rs::integrate::earth_radius;
///
/// assert!((earth_radius(0.0) - 6_378_137.0).abs() < 1e-6);
/// assert!((earth_radius(90.0) - 6_356_752.3).abs() < 1e-6);
/// ```
pub fn earth_radius(lat_deg: f64) -> f64 {
    let (a, b) = (EARTH_EQUATORIAL_RADIUS, EARTH_POLAR_RADIUS);
    let phi = lat_deg.to_radians();
    let (c, s) = (phi.cos(), phi.sin());
    let num = (a * a * c).powi(2) + (b * b * s).powi(2);
    let den = (a * c).powi(2) + (b * s).powi(2);
    (num / den).sqrt()
}

/// Advance `positions` by `velocity * dt`.
///
/// Horizontal displacement in metres is turned into degrees with the local
/// earth radius and the cosine of latitude at the start position. Vertical
/// displacement (plus `extra_dz`, metres) is divided by the water-column
/// depth and added to sigma. When `surface_trapped` sigma is pinned to the
/// top level; otherwise a not-a-number sigma keeps its previous value and
/// the result is clamped to the level range.
pub fn update_position(
    positions: &Positions,
    velocity: &StepVelocity,
    dt: f64,
    extra_dz: Option<&[f64]>,
    levels: &SigmaLevels,
    surface_trapped: bool,
) -> Positions {
    let n = positions.len();
    let mut out = positions.clone();
    for p in 0..n {
        let (lon, lat, sigma) = positions.get(p);
        let r = earth_radius(lat);
        let clat = lat.to_radians().cos();
        let dx = velocity.u[p] * dt;
        let dy = velocity.v[p] * dt;
        let mut dz = velocity.w[p] * dt;
        if let Some(extra) = extra_dz {
            dz += extra[p];
        }

        let new_lon = lon + dx.to_degrees() / (r * clat);
        let new_lat = lat + dy.to_degrees() / r;
        let new_sigma = if surface_trapped {
            levels.top()
        } else {
            let s = sigma + dz / velocity.depth[p];
            levels.clamp(if s.is_nan() { sigma } else { s })
        };
        out.set(p, new_lon, new_lat, new_sigma);
    }
    out
}
