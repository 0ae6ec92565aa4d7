//! Volume-to-mass conversion and scale reconciliation.
//!
//! ```text
//! estimated_mass = volume * stacking_factor * density / 1000     (kg -> t)
//! real_conversion_factor = scale_mass / volume                    (t/m³)
//! error_tons = estimated_mass - scale_mass
//! error_pct  = error_tons / scale_mass * 100
//! ```
//!
//! The three scale-derived values are only defined for a weighed pile
//! (`scale_mass > 0`); otherwise they are all zero.

use crate::{reference, species::Species};
use yard_utils::numbers::round_to;

/// Decimal places kept for masses in tons.
pub const MASS_DECIMALS: i32 = 2;

/// Decimal places kept for the real conversion factor.
pub const FACTOR_DECIMALS: i32 = 4;

/// Decimal places kept for percentages.
pub const PCT_DECIMALS: i32 = 2;

const KG_PER_TON: f64 = 1000.0;

/// Outputs of the calculator, rounded once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFields {
    pub stacking_factor: f64,
    pub estimated_mass: f64,
    pub real_conversion_factor: f64,
    pub error_tons: f64,
    pub error_pct: f64,
}

/// Compute the derived fields of a measurement.
///
/// Inputs are assumed valid (`volume > 0`, `density > 0`, `scale_mass >= 0`);
/// see [`crate::entry::MeasurementEntry::validate`].
///
/// The error chain works from rounded values so that a stored record
/// always satisfies `error_tons == round(estimated_mass - scale_mass, 2)`
/// and `error_pct == round(error_tons / scale_mass * 100, 2)` on its own
/// fields.
pub fn derive(volume: f64, species: Species, density: f64, scale_mass: f64) -> DerivedFields {
    let stacking_factor = reference::stacking_factor(species);
    let estimated_mass = round_to(
        volume * stacking_factor * density / KG_PER_TON,
        MASS_DECIMALS,
    );

    if scale_mass > 0.0 {
        let real_conversion_factor = round_to(scale_mass / volume, FACTOR_DECIMALS);
        let error_tons = round_to(estimated_mass - scale_mass, MASS_DECIMALS);
        let error_pct = round_to(error_tons / scale_mass * 100.0, PCT_DECIMALS);
        DerivedFields {
            stacking_factor,
            estimated_mass,
            real_conversion_factor,
            error_tons,
            error_pct,
        }
    } else {
        DerivedFields {
            stacking_factor,
            estimated_mass,
            real_conversion_factor: 0.0,
            error_tons: 0.0,
            error_pct: 0.0,
        }
    }
}
