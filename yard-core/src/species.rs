use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Wood species handled by the yard.
///
/// The set is closed. Adding a species means adding a variant here, a
/// column in [`crate::reference::MONTHLY_DENSITY`] and an arm in
/// [`crate::reference::stacking_factor`]; the compiler flags each spot.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
pub enum Species {
    Pinus,
    Eucalipto,
}

impl Species {
    /// Number of species, i.e. columns in the density table.
    pub const COUNT: usize = 2;

    /// Every species, in table column order.
    pub const ALL: [Species; Species::COUNT] = [Species::Pinus, Species::Eucalipto];

    /// Canonical name as stored and printed.
    pub fn name(&self) -> &'static str {
        match self {
            Species::Pinus => "Pinus",
            Species::Eucalipto => "Eucalipto",
        }
    }

    /// Column of this species in the density table.
    pub fn index(&self) -> usize {
        match self {
            Species::Pinus => 0,
            Species::Eucalipto => 1,
        }
    }

    pub fn stacking_factor(&self) -> f64 {
        crate::reference::stacking_factor(*self)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Species {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Species::ALL
            .into_iter()
            .find(|species| species.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownSpecies(wanted.to_string()))
    }
}
