//! Terminal views: record listing, summary and reference tables.

use crate::{open_store, Settings};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use yard_core::{reference, DensitySource, Species};
use yard_data::{
    annotate, select, views::presentation_order, ConversionCheck, RecordRow, Selection,
    SpeciesSummary, Summary,
};
use yard_utils::{dates::format_display, numbers::group_thousands};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table
}

fn species_color(species: Species) -> Color {
    match species {
        Species::Pinus => Color::Green,
        Species::Eucalipto => Color::Blue,
    }
}

fn or_dash(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map_or_else(|| "-".to_string(), fmt)
}

/// Rows in presentation order. A `*` marks a manual density.
pub fn list_table(rows: &[RecordRow<'_>]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "#", "Date", "Pile", "Species", "Vol (m3)", "Dens", "Est. (t)", "Scale (t)", "Error %",
        "Delta (t)", "Delta %",
    ]);
    for row in rows {
        let r = row.record;
        let manual = if r.density_source() == DensitySource::Manual {
            "*"
        } else {
            ""
        };
        table.add_row(vec![
            Cell::new(row.index),
            Cell::new(format_display(&r.date())),
            Cell::new(r.pile_id()),
            Cell::new(r.species()).fg(species_color(r.species())),
            Cell::new(group_thousands(r.drone_volume(), 1)),
            Cell::new(format!("{:.0}{manual}", r.applied_density())),
            Cell::new(group_thousands(r.estimated_mass(), 2)),
            Cell::new(or_dash(r.weighed_scale_mass(), |m| group_thousands(m, 2))),
            Cell::new(or_dash(r.weighed_error_pct(), |p| format!("{p:+.2}"))),
            Cell::new(format!("{:+.2}", row.mass_delta)),
            Cell::new(format!("{:+.1}", row.mass_delta_pct)),
        ]);
    }
    table
}

pub fn summary_table(rows: &[RecordRow<'_>]) -> Table {
    let totals = Summary::compute(rows);
    let by_species = SpeciesSummary::compute(rows);
    let checks = ConversionCheck::compute_all(rows);

    let mut table = new_table();
    table.set_header(vec![
        "Scope",
        "Records",
        "Weighed",
        "Vol (m3)",
        "Est. (t)",
        "Scale (t)",
        "Mean |error| %",
        "Real factor (t/m3)",
        "Assessment",
    ]);
    table.add_row(summary_cells(Cell::new("All"), &totals, None));
    for check in &checks {
        let label = Cell::new(check.species).fg(species_color(check.species));
        let species_summary = by_species.get(check.species);
        table.add_row(summary_cells(label, &species_summary, Some(check)));
    }
    table
}

fn summary_cells(label: Cell, summary: &Summary, check: Option<&ConversionCheck>) -> Vec<Cell> {
    vec![
        label,
        Cell::new(summary.record_count),
        Cell::new(summary.weighed_count),
        Cell::new(group_thousands(summary.total_volume, 0)),
        Cell::new(group_thousands(summary.total_estimated_mass, 0)),
        Cell::new(group_thousands(summary.scale_mass_total, 0)),
        Cell::new(format!("{:.2}", summary.mean_abs_error_pct)),
        Cell::new(or_dash(check.and_then(|c| c.factor), |f| format!("{f:.4}"))),
        Cell::new(check.map_or_else(String::new, |c| c.assessment.to_string())),
    ]
}

/// Seasonal densities in kg/m3 and the stacking factors.
pub fn densities_table() -> Table {
    let mut table = new_table();
    let mut header = vec!["Month".to_string()];
    header.extend(Species::ALL.iter().map(|s| format!("{s} (kg/m3)")));
    table.set_header(header);
    for row in reference::density_table() {
        let month = u8::try_from(row.month)
            .ok()
            .and_then(|m| chrono::Month::try_from(m).ok())
            .map_or_else(|| row.month.to_string(), |m| m.name().to_string());
        let mut cells = vec![month];
        cells.extend(row.densities.iter().map(|(_, density)| format!("{density:.0}")));
        table.add_row(cells);
    }
    let mut stacking = vec!["Stacking factor".to_string()];
    stacking.extend(
        Species::ALL
            .iter()
            .map(|s| format!("{:.2}", reference::stacking_factor(*s))),
    );
    table.add_row(stacking);
    table
}

pub fn run_list(settings: &Settings, selection: &Selection) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let rows = annotate(store.records());
    let mut selected = select(&rows, selection);
    if selected.is_empty() {
        println!("No records selected.");
        return Ok(());
    }
    presentation_order(&mut selected);
    println!("{}", list_table(&selected));
    println!("{} of {} records", selected.len(), store.len());
    Ok(())
}

pub fn run_summary(settings: &Settings, selection: &Selection) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let rows = annotate(store.records());
    let selected = select(&rows, selection);
    println!("{}", summary_table(&selected));
    Ok(())
}

pub fn run_densities() -> anyhow::Result<()> {
    println!("{}", densities_table());
    Ok(())
}
