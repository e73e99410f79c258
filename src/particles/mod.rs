//! Particle positions, identities and fates.
//!
//! A [`ParticleSet`] is created once per release and threaded through the
//! daily tracking calls. Particles removed at release time keep their
//! original [`ParticleId`], so output can always be matched back to the
//! initial condition.

mod status;

pub use status::ParticleStatus;

use thiserror::Error;

use crate::types::ParticleId;

/// Errors from building a particle set.
#[derive(Debug, Error)]
pub enum ParticleError {
    /// Initial-condition arrays differ in length
    #[error("Initial condition arrays differ in length: lon={lon}, lat={lat}, sigma={sigma}")]
    LengthMismatch { lon: usize, lat: usize, sigma: usize },
}

/// Structure-of-arrays particle coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Positions {
    /// Longitude (degrees east)
    pub lon: Vec<f64>,
    /// Latitude (degrees north)
    pub lat: Vec<f64>,
    /// Sigma coordinate, -1 at the bottom to 0 at the surface
    pub sigma: Vec<f64>,
}

impl Positions {
    /// Build from three equal-length arrays.
    pub fn new(lon: Vec<f64>, lat: Vec<f64>, sigma: Vec<f64>) -> Result<Self, ParticleError> {
        if lon.len() != lat.len() || lon.len() != sigma.len() {
            return Err(ParticleError::LengthMismatch {
                lon: lon.len(),
                lat: lat.len(),
                sigma: sigma.len(),
            });
        }
        Ok(Self { lon, lat, sigma })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lon.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lon.is_empty()
    }

    /// `(lon, lat, sigma)` of particle `p`.
    #[inline]
    pub fn get(&self, p: usize) -> (f64, f64, f64) {
        (self.lon[p], self.lat[p], self.sigma[p])
    }

    #[inline]
    pub fn set(&mut self, p: usize, lon: f64, lat: f64, sigma: f64) {
        self.lon[p] = lon;
        self.lat[p] = lat;
        self.sigma[p] = sigma;
    }

    fn retain(&mut self, keep: &[bool]) {
        let mut it = keep.iter();
        self.lon.retain(|_| *it.next().unwrap_or(&false));
        let mut it = keep.iter();
        self.lat.retain(|_| *it.next().unwrap_or(&false));
        let mut it = keep.iter();
        self.sigma.retain(|_| *it.next().unwrap_or(&false));
    }
}

/// The particles of one release.
#[derive(Clone, Debug)]
pub struct ParticleSet {
    ids: Vec<ParticleId>,
    positions: Positions,
    status: Vec<ParticleStatus>,
    /// Property values frozen at beaching, indexed like `Property::ALL`.
    held: Vec<Option<Vec<f64>>>,
}

impl ParticleSet {
    /// All particles active, with ids `0..n`.
    pub fn new(positions: Positions) -> Self {
        let n = positions.len();
        Self {
            ids: (0..n).map(ParticleId::new).collect(),
            positions,
            status: vec![ParticleStatus::Active; n],
            held: vec![None; n],
        }
    }

    /// Build from initial-condition arrays.
    pub fn from_arrays(
        lon: Vec<f64>,
        lat: Vec<f64>,
        sigma: Vec<f64>,
    ) -> Result<Self, ParticleError> {
        Ok(Self::new(Positions::new(lon, lat, sigma)?))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[ParticleId] {
        &self.ids
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub(crate) fn positions_mut(&mut self) -> &mut Positions {
        &mut self.positions
    }

    pub fn status(&self) -> &[ParticleStatus] {
        &self.status
    }

    pub(crate) fn set_status(&mut self, p: usize, status: ParticleStatus) {
        self.status[p] = status;
    }

    /// Number of particles with the given status.
    pub fn count(&self, status: ParticleStatus) -> usize {
        self.status.iter().filter(|&&s| s == status).count()
    }

    /// Values held for a beached particle.
    pub fn held(&self, p: usize) -> Option<&[f64]> {
        self.held[p].as_deref()
    }

    pub(crate) fn hold(&mut self, p: usize, values: Vec<f64>) {
        self.held[p] = Some(values);
    }

    /// Keep only particles where `keep[p]` is true; returns the number removed.
    ///
    /// Surviving particles keep their original ids.
    pub fn retain(&mut self, keep: &[bool]) -> usize {
        let before = self.len();
        self.positions.retain(keep);
        let mut it = keep.iter();
        self.ids.retain(|_| *it.next().unwrap_or(&false));
        let mut it = keep.iter();
        self.status.retain(|_| *it.next().unwrap_or(&false));
        let mut it = keep.iter();
        self.held.retain(|_| *it.next().unwrap_or(&false));
        before - self.len()
    }
}
