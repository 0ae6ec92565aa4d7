//! Display orderings over annotated rows.
//!
//! Each ordering is an independent sort of the same rows; neither depends
//! on the other having been applied first.

use crate::series::RecordRow;
use std::cmp::Ordering;

/// Newest survey first, ties broken by pile id ascending.
pub fn presentation_order(rows: &mut [RecordRow<'_>]) {
    rows.sort_by(|a, b| {
        b.record
            .date()
            .cmp(&a.record.date())
            .then_with(|| a.record.pile_id().cmp(b.record.pile_id()))
    });
}

/// Pile id ascending, then oldest survey first.
pub fn pile_order(rows: &mut [RecordRow<'_>]) {
    rows.sort_by(by_pile_then_date);
}

fn by_pile_then_date(a: &RecordRow<'_>, b: &RecordRow<'_>) -> Ordering {
    a.record
        .pile_id()
        .cmp(b.record.pile_id())
        .then_with(|| a.record.date().cmp(&b.record.date()))
}
