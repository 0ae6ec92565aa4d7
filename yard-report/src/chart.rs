//! Estimated versus weighed mass, one grouped bar chart per species.

use crate::error::{ReportError, Result};
use plotters::prelude::*;
use yard_core::Species;
use yard_data::RecordRow;
use yard_utils::dates::format_short;

pub const CHART_SIZE: (u32, u32) = (1000, 500);

const ESTIMATED_COLOR: RGBColor = RGBColor(70, 130, 180);
const SCALE_COLOR: RGBColor = RGBColor(255, 140, 0);

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesChart {
    pub species: Species,
    pub svg: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Bar {
    label: String,
    estimated: f64,
    scale: f64,
}

/// `dd/mm - pile`
pub fn bar_label(row: &RecordRow<'_>) -> String {
    format!(
        "{} - {}",
        format_short(&row.record.date()),
        row.record.pile_id()
    )
}

/// A chart for every species present in `rows`.
pub fn render_species_charts(rows: &[RecordRow<'_>]) -> Result<Vec<SpeciesChart>> {
    let mut charts = Vec::new();
    for species in Species::ALL {
        if let Some(svg) = render_species_chart(rows, species)? {
            charts.push(SpeciesChart { species, svg });
        }
    }
    Ok(charts)
}

/// SVG for the rows of `species`, or `None` when there are none.
pub fn render_species_chart(rows: &[RecordRow<'_>], species: Species) -> Result<Option<String>> {
    let bars: Vec<Bar> = rows
        .iter()
        .filter(|row| row.record.species() == species)
        .map(|row| Bar {
            label: bar_label(row),
            estimated: row.record.estimated_mass(),
            scale: row.record.scale_mass(),
        })
        .collect();
    if bars.is_empty() {
        return Ok(None);
    }
    let title = format!("{species}: estimated vs scale mass (t)");
    let mut svg = String::new();
    draw_bars(&mut svg, &title, &bars).map_err(|err| ReportError::Chart(err.to_string()))?;
    log::debug!("chart: {} bars for {}", bars.len(), species);
    Ok(Some(svg))
}

fn draw_bars<'a>(svg: &'a mut String, title: &str, bars: &[Bar]) -> DrawResult<(), SVGBackend<'a>> {
    let root = SVGBackend::with_string(svg, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = bars
        .iter()
        .map(|bar| bar.estimated.max(bar.scale))
        .fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.2 } else { 1.0 };
    // group i is centred on x = i
    let x_end = bars.len() as f64 - 0.5;
    let labels: Vec<&str> = bars.iter().map(|bar| bar.label.as_str()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..x_end, 0f64..y_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|x| label_at(&labels, *x))
        .y_desc("t")
        .draw()?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let x = i as f64;
            Rectangle::new(
                [(x - 0.4, 0.0), (x - 0.02, bar.estimated)],
                ESTIMATED_COLOR.filled(),
            )
        }))?
        .label("Estimated")
        .legend(|(x, y)| legend_swatch(x, y, ESTIMATED_COLOR));
    chart
        .draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let x = i as f64;
            Rectangle::new(
                [(x + 0.02, 0.0), (x + 0.4, bar.scale)],
                SCALE_COLOR.filled(),
            )
        }))?
        .label("Scale")
        .legend(|(x, y)| legend_swatch(x, y, SCALE_COLOR));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn legend_swatch(x: i32, y: i32, color: RGBColor) -> Rectangle<(i32, i32)> {
    Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled())
}

/// Label for a group centre; blank between groups.
fn label_at(labels: &[&str], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    labels
        .get(nearest as usize)
        .map(|label| label.to_string())
        .unwrap_or_default()
}
