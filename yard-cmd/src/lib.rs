//! Command implementations for the yard CLI.
//!
//! Each subcommand opens the store, works on an explicit selection built
//! from its flags, and returns; nothing is kept between invocations.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Subcommand;
use std::path::PathBuf;
use yard_core::{MeasurementEntry, Species};
use yard_store::RecordStore;

pub mod export;
pub mod record;
pub mod select;
pub mod show;

pub use select::SelectionArgs;

/// Options shared by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Store file
    pub store: PathBuf,
    /// JPEG printed in PDF report headers
    pub logo: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a drone survey and append it to the store
    Record {
        /// Survey date, YYYY-MM-DD or DD/MM/YYYY (default: today)
        #[arg(short, long, value_parser = select::parse_date_arg)]
        date: Option<NaiveDate>,

        /// Pile identifier
        #[arg(short, long)]
        pile: String,

        /// Pinus or Eucalipto
        #[arg(short, long)]
        species: Species,

        /// Stacked volume from the drone survey, m3
        #[arg(short, long)]
        volume: f64,

        /// Density override in kg/m3 (default: seasonal table)
        #[arg(long)]
        density: Option<f64>,

        /// Scale ticket total in tons, if the pile has been weighed
        #[arg(long)]
        scale: Option<f64>,
    },

    /// List records, newest first, with per-pile changes
    List {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Totals, mean absolute error and conversion factor check
    Summary {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Export selected records as CSV
    ExportCsv {
        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Export selected records as a PDF report
    ExportPdf {
        /// Output PDF path
        #[arg(short, long)]
        output: PathBuf,

        /// Report title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Write estimated vs scale mass charts (SVG), one per species
    Chart {
        /// Directory for the SVG files
        #[arg(short, long)]
        output_dir: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Show the seasonal density and stacking factor tables
    Densities,

    /// Remove the record at a store index, as shown by `list`
    Remove {
        #[arg(long)]
        index: usize,
    },
}

pub fn run(settings: &Settings, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Record {
            date,
            pile,
            species,
            volume,
            density,
            scale,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let mut entry = MeasurementEntry::new(date, pile, species, volume);
            entry.density = density;
            entry.scale_mass = scale;
            let saved = record::run_record(settings, entry)?;
            println!("{}", record::describe(&saved));
            Ok(())
        }
        Command::List { selection } => show::run_list(settings, &selection.to_selection()),
        Command::Summary { selection } => show::run_summary(settings, &selection.to_selection()),
        Command::ExportCsv { output, selection } => {
            let count = export::run_export_csv(settings, &selection.to_selection(), &output)?;
            println!("Wrote {count} records to {}", output.display());
            Ok(())
        }
        Command::ExportPdf {
            output,
            title,
            selection,
        } => {
            let count =
                export::run_export_pdf(settings, &selection.to_selection(), &output, title)?;
            println!("Wrote report of {count} records to {}", output.display());
            Ok(())
        }
        Command::Chart {
            output_dir,
            selection,
        } => {
            let written = export::run_chart(settings, &selection.to_selection(), &output_dir)?;
            for path in written {
                println!("Wrote {}", path.display());
            }
            Ok(())
        }
        Command::Densities => show::run_densities(),
        Command::Remove { index } => {
            let removed = record::run_remove(settings, index)?;
            println!(
                "Removed {} {} ({})",
                removed.pile_id(),
                removed.date(),
                removed.species()
            );
            Ok(())
        }
    }
}

pub(crate) fn open_store(settings: &Settings) -> anyhow::Result<RecordStore> {
    RecordStore::open(&settings.store)
        .with_context(|| format!("opening store {}", settings.store.display()))
}
