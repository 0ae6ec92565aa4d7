//! Exports over a selected, ordered set of record rows.
//!
//! Renderers are pure: they take rows and options and return bytes or
//! text. Writing files is left to the caller.

pub mod chart;
pub mod csv_export;
pub mod error;
pub mod pdf;

pub use chart::{render_species_charts, SpeciesChart};
pub use csv_export::{to_csv_bytes, write_csv};
pub use error::{ReportError, Result};
pub use pdf::{render_pdf, PdfOptions};
