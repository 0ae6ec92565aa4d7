//! Commands that change the store.

use crate::{open_store, Settings};
use anyhow::Context;
use log::info;
use yard_core::{DensitySource, MeasurementEntry, MeasurementRecord};
use yard_utils::dates::format_display;

/// Validate and derive `entry`, then append it to the store.
pub fn run_record(
    settings: &Settings,
    entry: MeasurementEntry,
) -> anyhow::Result<MeasurementRecord> {
    let record = entry.into_record().context("invalid measurement")?;
    let mut store = open_store(settings)?;
    store.append(&record).with_context(|| {
        format!(
            "record for pile {} on {} was NOT saved",
            record.pile_id(),
            format_display(&record.date())
        )
    })?;
    info!(
        "recorded {} ({} records in store)",
        record.pile_id(),
        store.len()
    );
    Ok(record)
}

pub fn run_remove(settings: &Settings, index: usize) -> anyhow::Result<MeasurementRecord> {
    let mut store = open_store(settings)?;
    let removed = store
        .remove(index)
        .with_context(|| format!("could not remove record {index}"))?;
    Ok(removed)
}

/// Human-readable rendering of a freshly derived record.
pub fn describe(record: &MeasurementRecord) -> String {
    let mut lines = vec![
        format!(
            "{} {} ({}) on {}",
            record.pile_id(),
            record.species(),
            density_label(record.density_source()),
            format_display(&record.date())
        ),
        format!(
            "  volume {} m3 x stacking {} x density {} kg/m3",
            record.drone_volume(),
            record.stacking_factor(),
            record.applied_density()
        ),
        format!("  estimated mass {:.2} t", record.estimated_mass()),
    ];
    match record.weighed_scale_mass() {
        Some(scale) => {
            lines.push(format!(
                "  scale mass {:.2} t, error {:+.2} t ({:+.2}%), real factor {:.4} t/m3",
                scale,
                record.error_tons(),
                record.error_pct(),
                record.real_conversion_factor()
            ));
        }
        None => lines.push("  not weighed yet".to_string()),
    }
    lines.join("\n")
}

pub fn density_label(source: DensitySource) -> &'static str {
    match source {
        DensitySource::Table => "table density",
        DensitySource::Manual => "manual density",
    }
}
