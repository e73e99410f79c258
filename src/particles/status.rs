//! Per-particle fates recorded in-band in the trajectory.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fate of a particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleStatus {
    /// Advecting normally
    #[default]
    Active,
    /// Sampled zero (or sub-threshold) speed at a save; position and
    /// properties are held from then on
    Beached,
    /// Left the grid envelope; frozen at the last valid position
    OutOfDomain,
}

impl ParticleStatus {
    /// Integer code written to trajectory output.
    pub const fn code(self) -> i8 {
        match self {
            ParticleStatus::Active => 0,
            ParticleStatus::Beached => 1,
            ParticleStatus::OutOfDomain => 2,
        }
    }

    /// Inverse of [`code`](Self::code).
    pub const fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => Some(ParticleStatus::Active),
            1 => Some(ParticleStatus::Beached),
            2 => Some(ParticleStatus::OutOfDomain),
            _ => None,
        }
    }

    /// Whether the particle still moves.
    #[inline]
    pub fn is_active(self) -> bool {
        self == ParticleStatus::Active
    }
}

impl fmt::Display for ParticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticleStatus::Active => write!(f, "active"),
            ParticleStatus::Beached => write!(f, "beached"),
            ParticleStatus::OutOfDomain => write!(f, "out of domain"),
        }
    }
}
