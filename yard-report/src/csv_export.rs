//! Tabular export, one row per selected record.
//!
//! Values are written as stored; nothing is recomputed except the
//! read-time delta, which is rounded for display.

use crate::error::Result;
use std::io::Write;
use yard_data::RecordRow;
use yard_utils::{dates::format_date, numbers::round_to};

pub const CSV_HEADER: [&str; 9] = [
    "date",
    "pile_id",
    "species",
    "drone_volume",
    "applied_density",
    "estimated_mass",
    "scale_mass",
    "error_pct",
    "mass_delta_pct",
];

/// Write `rows`, in the order given, as CSV with a header line.
pub fn write_csv<W: Write>(rows: &[RecordRow<'_>], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for row in rows {
        wtr.write_record(csv_fields(row))?;
    }
    wtr.flush()?;
    log::debug!("csv: wrote {} rows", rows.len());
    Ok(())
}

pub fn to_csv_bytes(rows: &[RecordRow<'_>]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_csv(rows, &mut out)?;
    Ok(out)
}

fn csv_fields(row: &RecordRow<'_>) -> [String; 9] {
    let r = row.record;
    [
        format_date(&r.date()),
        r.pile_id().to_string(),
        r.species().to_string(),
        r.drone_volume().to_string(),
        r.applied_density().to_string(),
        r.estimated_mass().to_string(),
        r.scale_mass().to_string(),
        r.error_pct().to_string(),
        round_to(row.mass_delta_pct, 2).to_string(),
    ]
}
