//! PDF export.

pub mod fonts;
pub mod jpeg;
pub mod report;
pub mod writer;

pub use report::{render_pdf, PdfOptions, DEFAULT_TITLE};
