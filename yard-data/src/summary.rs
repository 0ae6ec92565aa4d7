//! Summary statistics over a selected set of rows.

use crate::series::RecordRow;
use serde::Serialize;
use yard_core::Species;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub record_count: usize,
    /// Records with a scale ticket
    pub weighed_count: usize,
    /// m³
    pub total_volume: f64,
    /// t
    pub total_estimated_mass: f64,
    /// t, weighed records only
    pub scale_mass_total: f64,
    /// Mean of `|error_pct|` over weighed records; 0 when none is weighed
    pub mean_abs_error_pct: f64,
}

impl Summary {
    /// Summarize `rows`, which are taken to be the selected set.
    ///
    /// Unweighed records count towards the totals but never towards the
    /// error mean.
    pub fn compute(rows: &[RecordRow<'_>]) -> Self {
        let mut summary = Summary::default();
        let mut abs_error_sum = 0.0;
        for row in rows {
            let record = row.record;
            summary.record_count += 1;
            summary.total_volume += record.drone_volume();
            summary.total_estimated_mass += record.estimated_mass();
            if let Some(scale_mass) = record.weighed_scale_mass() {
                summary.weighed_count += 1;
                summary.scale_mass_total += scale_mass;
                abs_error_sum += record.error_pct().abs();
            }
        }
        if summary.weighed_count > 0 {
            summary.mean_abs_error_pct = abs_error_sum / summary.weighed_count as f64;
        }
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

/// One [`Summary`] per species, each computed on that species' subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesSummary {
    pub by_species: Vec<(Species, Summary)>,
}

impl SpeciesSummary {
    pub fn compute(rows: &[RecordRow<'_>]) -> Self {
        let by_species = Species::ALL
            .iter()
            .map(|&species| {
                let subset: Vec<RecordRow<'_>> = rows
                    .iter()
                    .filter(|row| row.record.species() == species)
                    .copied()
                    .collect();
                (species, Summary::compute(&subset))
            })
            .collect();
        SpeciesSummary { by_species }
    }

    pub fn get(&self, species: Species) -> Summary {
        self.by_species
            .iter()
            .find(|(s, _)| *s == species)
            .map(|(_, summary)| *summary)
            .unwrap_or_default()
    }
}
