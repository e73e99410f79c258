//! Quantities recorded for every particle at every save time.

use std::fmt;

use crate::snapshot::Variable;

/// A recorded per-particle quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Property {
    Lon,
    Lat,
    /// Sigma coordinate
    Sigma,
    /// Height below the free surface, `sigma * (zeta + h)`
    Z,
    Zeta,
    H,
    /// Bottom height, `-h`
    Zbot,
    Salt,
    Temp,
    U,
    V,
    W,
    Uwind,
    Vwind,
}

impl Property {
    /// Number of recorded properties.
    pub const COUNT: usize = 14;

    /// Every property, in storage order.
    pub const ALL: [Property; Property::COUNT] = [
        Property::Lon,
        Property::Lat,
        Property::Sigma,
        Property::Z,
        Property::Zeta,
        Property::H,
        Property::Zbot,
        Property::Salt,
        Property::Temp,
        Property::U,
        Property::V,
        Property::W,
        Property::Uwind,
        Property::Vwind,
    ];

    /// Position in [`Property::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Variable name in trajectory output.
    pub const fn name(self) -> &'static str {
        match self {
            Property::Lon => "lon",
            Property::Lat => "lat",
            Property::Sigma => "cs",
            Property::Z => "z",
            Property::Zeta => "zeta",
            Property::H => "h",
            Property::Zbot => "zbot",
            Property::Salt => "salt",
            Property::Temp => "temp",
            Property::U => "u",
            Property::V => "v",
            Property::W => "w",
            Property::Uwind => "Uwind",
            Property::Vwind => "Vwind",
        }
    }

    pub const fn units(self) -> &'static str {
        match self {
            Property::Lon => "degrees_east",
            Property::Lat => "degrees_north",
            Property::Sigma => "1",
            Property::Z | Property::Zeta | Property::H | Property::Zbot => "m",
            Property::Salt => "1e-3",
            Property::Temp => "degC",
            Property::U | Property::V | Property::W | Property::Uwind | Property::Vwind => "m s-1",
        }
    }

    pub const fn long_name(self) -> &'static str {
        match self {
            Property::Lon => "particle longitude",
            Property::Lat => "particle latitude",
            Property::Sigma => "particle sigma coordinate",
            Property::Z => "particle height relative to the free surface",
            Property::Zeta => "free-surface height",
            Property::H => "bottom depth",
            Property::Zbot => "bottom height",
            Property::Salt => "salinity",
            Property::Temp => "potential temperature",
            Property::U => "eastward velocity",
            Property::V => "northward velocity",
            Property::W => "vertical velocity",
            Property::Uwind => "eastward wind",
            Property::Vwind => "northward wind",
        }
    }

    /// Snapshot variable sampled directly into this property, if any.
    pub const fn source(self) -> Option<Variable> {
        match self {
            Property::Zeta => Some(Variable::Zeta),
            Property::H => Some(Variable::H),
            Property::Salt => Some(Variable::Salt),
            Property::Temp => Some(Variable::Temp),
            Property::U => Some(Variable::U),
            Property::V => Some(Variable::V),
            Property::W => Some(Variable::W),
            Property::Uwind => Some(Variable::Uwind),
            Property::Vwind => Some(Variable::Vwind),
            Property::Lon | Property::Lat | Property::Sigma | Property::Z | Property::Zbot => None,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
