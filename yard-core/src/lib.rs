//! Core types for timber yard stock reconciliation.
//!
//! Drone photogrammetry gives the stacked volume of a wood pile; the
//! seasonal density table and the species stacking factor turn that
//! volume into an estimated mass, which is then compared against truck
//! scale tickets once the pile is weighed.
//!
//! # Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use yard_core::{MeasurementEntry, Species};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let record = MeasurementEntry::new(date, "P-10", Species::Pinus, 100.0)
//!     .with_scale_mass(30.0)
//!     .into_record()
//!     .unwrap();
//!
//! assert_eq!(record.estimated_mass(), 32.5);
//! assert_eq!(record.error_pct(), 8.33);
//! ```

pub mod calculator;
pub mod entry;
pub mod error;
pub mod measurement;
pub mod reference;
pub mod species;

pub use entry::MeasurementEntry;
pub use error::ValidationError;
pub use measurement::{DensitySource, MeasurementRecord};
pub use species::Species;
