//! Explicit selection state.
//!
//! Which records go into a summary or a report is decided by the
//! presentation layer and passed in as a value; nothing here holds on
//! to it between calls.

use crate::series::RecordRow;
use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeSet;
use yard_core::Species;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    /// Every record
    #[default]
    All,
    /// No record
    Nothing,
    /// Records of one species
    Species(Species),
    /// Records at these store positions
    Indices(BTreeSet<usize>),
    /// Records of these piles
    Piles(BTreeSet<String>),
    /// Records dated within the bounds, both inclusive; `None` is open
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    /// Records matching every inner selection
    AllOf(Vec<Selection>),
}

impl Selection {
    pub fn matches(&self, row: &RecordRow<'_>) -> bool {
        let record = row.record;
        match self {
            Selection::All => true,
            Selection::Nothing => false,
            Selection::Species(species) => record.species() == *species,
            Selection::Indices(indices) => indices.contains(&row.index),
            Selection::Piles(piles) => piles.contains(record.pile_id()),
            Selection::DateRange { from, to } => {
                let date = record.date();
                from.map_or(true, |from| date >= from) && to.map_or(true, |to| date <= to)
            }
            Selection::AllOf(parts) => parts.iter().all(|part| part.matches(row)),
        }
    }
}

/// Rows matching `selection`, in their incoming order.
pub fn select<'a>(rows: &[RecordRow<'a>], selection: &Selection) -> Vec<RecordRow<'a>> {
    let selected = select_by(rows, |row| selection.matches(row));
    debug!("selection: {} of {} rows", selected.len(), rows.len());
    selected
}

/// Rows matching an arbitrary predicate, in their incoming order.
pub fn select_by<'a, F>(rows: &[RecordRow<'a>], predicate: F) -> Vec<RecordRow<'a>>
where
    F: Fn(&RecordRow<'a>) -> bool,
{
    rows.iter().filter(|row| predicate(row)).copied().collect()
}
