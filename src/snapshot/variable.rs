//! Model output variables known to the tracker.

use std::fmt;

use crate::grid::GridLocation;
use crate::interp::FillPolicy;

/// Vertical layout of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalLayout {
    /// 2-D field (one value per water column)
    Surface,
    /// 3-D field on the rho levels (cell centers)
    RhoLevels,
    /// 3-D field on the w levels (cell faces)
    WLevels,
}

/// A gridded variable, named as in ROMS history files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variable {
    /// Salinity (psu)
    Salt,
    /// Potential temperature (°C)
    Temp,
    /// Free-surface height (m)
    Zeta,
    /// Bottom depth, positive down (m)
    H,
    /// Eastward velocity (m/s)
    U,
    /// Northward velocity (m/s)
    V,
    /// Vertical velocity (m/s)
    W,
    /// Eastward 10 m wind (m/s)
    Uwind,
    /// Northward 10 m wind (m/s)
    Vwind,
}

impl Variable {
    /// Every variable, in output order.
    pub const ALL: [Variable; 9] = [
        Variable::Salt,
        Variable::Temp,
        Variable::Zeta,
        Variable::H,
        Variable::U,
        Variable::V,
        Variable::W,
        Variable::Uwind,
        Variable::Vwind,
    ];

    /// Name in model output files.
    pub const fn name(self) -> &'static str {
        match self {
            Variable::Salt => "salt",
            Variable::Temp => "temp",
            Variable::Zeta => "zeta",
            Variable::H => "h",
            Variable::U => "u",
            Variable::V => "v",
            Variable::W => "w",
            Variable::Uwind => "Uwind",
            Variable::Vwind => "Vwind",
        }
    }

    /// Look up a variable by its file name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }

    /// Staggered location the variable is stored on.
    pub const fn location(self) -> GridLocation {
        match self {
            Variable::U => GridLocation::U,
            Variable::V => GridLocation::V,
            _ => GridLocation::Rho,
        }
    }

    /// Vertical layout of the variable.
    pub const fn vertical(self) -> VerticalLayout {
        match self {
            Variable::Salt | Variable::Temp | Variable::U | Variable::V => {
                VerticalLayout::RhoLevels
            }
            Variable::W => VerticalLayout::WLevels,
            Variable::Zeta | Variable::H | Variable::Uwind | Variable::Vwind => {
                VerticalLayout::Surface
            }
        }
    }

    /// How land-masked source values are replaced before interpolation.
    pub const fn fill_policy(self) -> FillPolicy {
        match self {
            Variable::U | Variable::V | Variable::W | Variable::Uwind | Variable::Vwind => {
                FillPolicy::Zero
            }
            Variable::Salt | Variable::Temp | Variable::Zeta | Variable::H => FillPolicy::LocalMean,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
