//! Static engineering tables: seasonal wood density and stacking factors.
//!
//! Density values are kg/m³ for the Campos Gerais region (Paraná), where
//! moisture peaks in the summer rains and bottoms out in the dry winter.
//! They are compiled in and not editable at runtime; a manual density
//! override is a per-entry decision, see [`crate::entry::MeasurementEntry`].

use crate::species::Species;
use chrono::{Datelike, NaiveDate};

/// Density in kg/m³ by calendar month (row 0 = January), one column per
/// species in [`Species::ALL`] order.
pub const MONTHLY_DENSITY: [[u32; Species::COUNT]; 12] = [
    [580, 820],
    [580, 820],
    [560, 790],
    [540, 760],
    [520, 740],
    [500, 720],
    [500, 710],
    [490, 700],
    [510, 730],
    [530, 760],
    [550, 780],
    [570, 800],
];

/// Density for a calendar month (1-12). `None` outside that range.
pub fn density_for(month: u32, species: Species) -> Option<f64> {
    let row = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTHLY_DENSITY
        .get(row)
        .map(|densities| f64::from(densities[species.index()]))
}

/// Table density for the month of `date`.
pub fn default_density(date: &NaiveDate, species: Species) -> f64 {
    // month() is always 1..=12
    let densities = MONTHLY_DENSITY[date.month0() as usize];
    f64::from(densities[species.index()])
}

/// Fraction of a stacked pile's geometric volume that is solid wood.
pub fn stacking_factor(species: Species) -> f64 {
    match species {
        // straighter logs, fewer voids
        Species::Pinus => 0.65,
        Species::Eucalipto => 0.60,
    }
}

/// One row of the density table, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityRow {
    pub month: u32,
    pub densities: [(Species, f64); Species::COUNT],
}

/// The whole density table as display rows, January first.
pub fn density_table() -> Vec<DensityRow> {
    (1..=12u32)
        .map(|month| {
            let row = MONTHLY_DENSITY[(month - 1) as usize];
            DensityRow {
                month,
                densities: Species::ALL.map(|species| (species, f64::from(row[species.index()]))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_for_june() {
        assert_eq!(density_for(6, Species::Pinus), Some(500.0));
        assert_eq!(density_for(6, Species::Eucalipto), Some(720.0));
    }

    #[test]
    fn test_density_for_out_of_range() {
        assert_eq!(density_for(0, Species::Pinus), None);
        assert_eq!(density_for(13, Species::Eucalipto), None);
    }

    #[test]
    fn test_default_density_follows_month() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let aug = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let dec = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        assert_eq!(default_density(&jan, Species::Pinus), 580.0);
        assert_eq!(default_density(&aug, Species::Eucalipto), 700.0);
        assert_eq!(default_density(&dec, Species::Pinus), 570.0);
    }

    #[test]
    fn test_stacking_factors() {
        assert_eq!(stacking_factor(Species::Pinus), 0.65);
        assert_eq!(stacking_factor(Species::Eucalipto), 0.60);
        for species in Species::ALL {
            let f = stacking_factor(species);
            assert!(f > 0.0 && f <= 1.0);
        }
    }

    #[test]
    fn test_density_table_has_twelve_rows() {
        let table = density_table();
        assert_eq!(table.len(), 12);
        assert_eq!(table[0].month, 1);
        assert_eq!(table[11].month, 12);
        assert_eq!(table[7].densities[0], (Species::Pinus, 490.0));
        assert_eq!(table[7].densities[1], (Species::Eucalipto, 700.0));
    }
}
