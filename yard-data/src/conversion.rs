//! Real conversion factor check.
//!
//! The real factor of a weighed survey is scale mass over drone volume,
//! in t/m³. Aggregated over a set of surveys it says whether the piles are
//! wetter or looser than the reference tables assume.

use crate::series::RecordRow;
use serde::Serialize;
use std::fmt;
use yard_core::Species;

/// Pinus factor above which wood is wet or the pile tightly stacked.
pub const PINUS_WET_ABOVE: f64 = 0.60;
/// Pinus factor below which wood is dry or the pile loosely stacked.
pub const PINUS_DRY_BELOW: f64 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConversionAssessment {
    WetOrCompact,
    Expected,
    DryOrLoose,
    /// No weighed surveys, or no reference range for the species
    Unassessed,
}

impl fmt::Display for ConversionAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConversionAssessment::WetOrCompact => "wet wood or compact stacking",
            ConversionAssessment::Expected => "within expected range",
            ConversionAssessment::DryOrLoose => "dry wood or loose stacking",
            ConversionAssessment::Unassessed => "not assessed",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionCheck {
    pub species: Species,
    pub weighed_count: usize,
    /// t/m³ over weighed surveys; `None` when none is weighed
    pub factor: Option<f64>,
    pub assessment: ConversionAssessment,
}

impl ConversionCheck {
    /// Check the rows of `species` among `rows`.
    pub fn compute(rows: &[RecordRow<'_>], species: Species) -> Self {
        let mut weighed_count = 0;
        let mut scale_total = 0.0;
        let mut volume_total = 0.0;
        for row in rows.iter().filter(|row| row.record.species() == species) {
            if let Some(scale_mass) = row.record.weighed_scale_mass() {
                weighed_count += 1;
                scale_total += scale_mass;
                volume_total += row.record.drone_volume();
            }
        }
        let factor = (weighed_count > 0 && volume_total > 0.0).then(|| scale_total / volume_total);
        ConversionCheck {
            species,
            weighed_count,
            factor,
            assessment: assess(species, factor),
        }
    }

    /// One check per species, in [`Species::ALL`] order.
    pub fn compute_all(rows: &[RecordRow<'_>]) -> Vec<Self> {
        Species::ALL
            .iter()
            .map(|&species| ConversionCheck::compute(rows, species))
            .collect()
    }
}

pub fn assess(species: Species, factor: Option<f64>) -> ConversionAssessment {
    match (species, factor) {
        (Species::Pinus, Some(f)) if f > PINUS_WET_ABOVE => ConversionAssessment::WetOrCompact,
        (Species::Pinus, Some(f)) if f < PINUS_DRY_BELOW => ConversionAssessment::DryOrLoose,
        (Species::Pinus, Some(_)) => ConversionAssessment::Expected,
        _ => ConversionAssessment::Unassessed,
    }
}
