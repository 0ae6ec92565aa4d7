//! Read-side views over the record store.
//!
//! Everything here works on a borrowed slice of records and allocates only
//! the derived rows:
//!
//! - [`series::annotate`] attaches per-pile deltas to every record,
//! - [`views`] provides the listing orders,
//! - [`selection`] narrows rows down to what a report covers,
//! - [`summary`] and [`conversion`] compute statistics on the result.

pub mod conversion;
pub mod selection;
pub mod series;
pub mod summary;
pub mod views;

pub use conversion::{ConversionAssessment, ConversionCheck};
pub use selection::{select, select_by, Selection};
pub use series::{annotate, RecordRow};
pub use summary::{SpeciesSummary, Summary};
