//! Per-pile chronological series and period-over-period change.
//!
//! Deltas are derived at read time from the whole store and never
//! persisted. Each pile's records are walked in date order and compared
//! with the previous survey of the same pile.

use serde::Serialize;
use yard_core::MeasurementRecord;

/// A stored record together with its read-time derived values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecordRow<'a> {
    /// Position of the record in the store
    pub index: usize,
    pub record: &'a MeasurementRecord,
    /// Change in estimated mass (t) since the previous survey of this pile
    pub mass_delta: f64,
    /// Same change as a percentage of the previous estimate
    pub mass_delta_pct: f64,
}

/// Annotate every record with its per-pile delta.
///
/// The result is in pile order: `pile_id` ascending, then `date`
/// ascending. The sort is stable, so same-day surveys of a pile keep
/// their store order and are compared in that order.
pub fn annotate(records: &[MeasurementRecord]) -> Vec<RecordRow<'_>> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| {
        let (ra, rb) = (&records[a], &records[b]);
        ra.pile_id()
            .cmp(rb.pile_id())
            .then(ra.date().cmp(&rb.date()))
    });

    let mut rows = Vec::with_capacity(records.len());
    let mut previous: Option<&MeasurementRecord> = None;
    for index in order {
        let record = &records[index];
        let (mass_delta, mass_delta_pct) = match previous {
            Some(prev) if prev.pile_id() == record.pile_id() => {
                let delta = record.estimated_mass() - prev.estimated_mass();
                (delta, percent_change(prev.estimated_mass(), delta))
            }
            _ => (0.0, 0.0),
        };
        rows.push(RecordRow {
            index,
            record,
            mass_delta,
            mass_delta_pct,
        });
        previous = Some(record);
    }
    rows
}

fn percent_change(previous: f64, delta: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        delta / previous * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use yard_core::{DensitySource, MeasurementEntry, Species};

    fn record(pile: &str, month: u32, day: u32, volume: f64) -> MeasurementRecord {
        let date = NaiveDate::from_ymd_opt(2024, month, day).unwrap();
        MeasurementEntry::new(date, pile, Species::Pinus, volume)
            .with_density(500.0)
            .into_record()
            .unwrap()
    }

    #[test]
    fn test_first_record_of_pile_has_zero_delta() {
        let records = vec![record("A", 6, 1, 100.0)];
        let rows = annotate(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mass_delta, 0.0);
        assert_eq!(rows[0].mass_delta_pct, 0.0);
    }

    #[test]
    fn test_delta_law_out_of_order_input() {
        // stored newest first; estimates 32.5, 39.0, 26.0
        let records = vec![
            record("A", 6, 20, 80.0),
            record("A", 6, 1, 100.0),
            record("A", 6, 10, 120.0),
        ];
        let rows = annotate(&records);
        let indices: Vec<usize> = rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 0]);

        assert_eq!(rows[0].mass_delta, 0.0);
        for pair in rows.windows(2) {
            let expected = pair[1].record.estimated_mass() - pair[0].record.estimated_mass();
            assert_eq!(pair[1].mass_delta, expected);
        }
        assert!((rows[1].mass_delta - 6.5).abs() < 1e-9);
        assert!((rows[1].mass_delta_pct - 20.0).abs() < 1e-9);
        assert!((rows[2].mass_delta - -13.0).abs() < 1e-9);
        assert!((rows[2].mass_delta_pct - -33.333333333).abs() < 1e-6);
    }

    #[test]
    fn test_piles_do_not_leak_into_each_other() {
        let records = vec![
            record("B", 6, 1, 200.0),
            record("A", 6, 5, 100.0),
            record("B", 6, 9, 220.0),
        ];
        let rows = annotate(&records);
        let piles: Vec<&str> = rows.iter().map(|r| r.record.pile_id()).collect();
        assert_eq!(piles, vec!["A", "B", "B"]);
        assert_eq!(rows[0].mass_delta, 0.0);
        assert_eq!(rows[1].mass_delta, 0.0);
        assert!((rows[2].mass_delta - 6.5).abs() < 1e-9);
    }

    #[test]
    fn test_same_day_keeps_store_order() {
        let records = vec![record("A", 6, 1, 100.0), record("A", 6, 1, 110.0)];
        let rows = annotate(&records);
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[1].index, 1);
        assert!((rows[1].mass_delta - 3.25).abs() < 1e-9);
    }

    #[test]
    fn test_zero_previous_estimate_gives_zero_pct() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        // 0.001 m³ estimates to 0.00 t once rounded
        let tiny = MeasurementRecord::new(
            date,
            "A",
            Species::Pinus,
            0.001,
            500.0,
            DensitySource::Table,
            0.0,
        );
        assert_eq!(tiny.estimated_mass(), 0.0);
        let records = vec![tiny, record("A", 6, 10, 100.0)];

        let rows = annotate(&records);
        assert_eq!(rows[1].index, 1);
        assert!((rows[1].mass_delta - 32.5).abs() < 1e-9);
        assert!(rows[1].mass_delta_pct.is_finite());
        assert_eq!(rows[1].mass_delta_pct, 0.0);
    }

    #[test]
    fn test_empty_store() {
        assert!(annotate(&[]).is_empty());
    }
}
