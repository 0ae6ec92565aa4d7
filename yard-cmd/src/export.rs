//! File exports of the selected records.

use crate::{open_store, Settings};
use anyhow::Context;
use chrono::Local;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use yard_data::{annotate, select, views::presentation_order, Selection};
use yard_report::{render_pdf, render_species_charts, to_csv_bytes, PdfOptions};

pub fn run_export_csv(
    settings: &Settings,
    selection: &Selection,
    output: &Path,
) -> anyhow::Result<usize> {
    let store = open_store(settings)?;
    let rows = annotate(store.records());
    let mut selected = select(&rows, selection);
    presentation_order(&mut selected);
    let bytes = to_csv_bytes(&selected)?;
    fs::write(output, bytes).with_context(|| format!("writing {}", output.display()))?;
    info!("exported {} rows to {}", selected.len(), output.display());
    Ok(selected.len())
}

pub fn run_export_pdf(
    settings: &Settings,
    selection: &Selection,
    output: &Path,
    title: Option<String>,
) -> anyhow::Result<usize> {
    let store = open_store(settings)?;
    let rows = annotate(store.records());
    let mut selected = select(&rows, selection);
    if selected.is_empty() {
        anyhow::bail!("select at least one record to build a report");
    }
    presentation_order(&mut selected);

    let logo = read_logo(settings.logo.as_deref())?;
    let mut options = PdfOptions::new(Local::now().naive_local());
    if let Some(title) = title {
        options = options.with_title(title);
    }
    if let Some(logo) = &logo {
        options = options.with_logo(logo);
    }
    let bytes = render_pdf(&selected, &options).context("rendering PDF report")?;
    fs::write(output, bytes).with_context(|| format!("writing {}", output.display()))?;
    info!("exported {} rows to {}", selected.len(), output.display());
    Ok(selected.len())
}

/// Write one SVG per species present in the selection.
pub fn run_chart(
    settings: &Settings,
    selection: &Selection,
    output_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    let store = open_store(settings)?;
    let rows = annotate(store.records());
    let mut selected = select(&rows, selection);
    // oldest survey first along the x axis
    selected.sort_by(|a, b| {
        a.record
            .date()
            .cmp(&b.record.date())
            .then_with(|| a.record.pile_id().cmp(b.record.pile_id()))
    });

    let charts = render_species_charts(&selected)?;
    if charts.is_empty() {
        warn!("no records selected, no chart written");
        return Ok(Vec::new());
    }
    fs::create_dir_all(output_dir).with_context(|| format!("creating {}", output_dir.display()))?;
    let mut written = Vec::with_capacity(charts.len());
    for chart in charts {
        let path = output_dir.join(format!("{}_mass.svg", chart.species.name().to_lowercase()));
        fs::write(&path, chart.svg).with_context(|| format!("writing {}", path.display()))?;
        info!("chart for {} written to {}", chart.species, path.display());
        written.push(path);
    }
    Ok(written)
}

/// A configured logo that does not exist is skipped with a warning.
fn read_logo(path: Option<&Path>) -> anyhow::Result<Option<Vec<u8>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    if !path.exists() {
        warn!(
            "logo {} not found, report will have no logo",
            path.display()
        );
        return Ok(None);
    }
    let bytes = fs::read(path).with_context(|| format!("reading logo {}", path.display()))?;
    Ok(Some(bytes))
}
