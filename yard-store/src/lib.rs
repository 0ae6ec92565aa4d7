//! Durable single-file store for measurement records.
//!
//! The whole collection lives in memory and the whole file is rewritten on
//! every change. Each change is staged on a copy of the collection,
//! written atomically, and only then committed in memory, so a failed
//! write leaves both the file and the in-memory store as they were.
//!
//! There is no locking: one writer per store file.
//!
//! # Usage
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use yard_core::{MeasurementEntry, Species};
//! use yard_store::RecordStore;
//!
//! let mut store = RecordStore::open("yard_stock.json").unwrap();
//! let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let record = MeasurementEntry::new(date, "P-10", Species::Pinus, 100.0)
//!     .into_record()
//!     .unwrap();
//! store.append(&record).unwrap();
//! ```

pub mod atomic_write;
pub mod error;
pub mod loader;

pub use error::{Result, StoreError};
pub use loader::{load, Loaded};

use log::{info, warn};
use std::path::{Path, PathBuf};
use yard_core::MeasurementRecord;

/// The record collection backed by one JSON file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    records: Vec<MeasurementRecord>,
    /// The file held malformed data when opened; keep a copy before
    /// the first overwrite.
    backup_pending: bool,
}

impl RecordStore {
    /// Open the store at `path`, loading whatever it holds.
    ///
    /// Missing and malformed files both yield an empty store; only a
    /// failure to read an existing file is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let loaded = loader::read_store(&path)?;
        let backup_pending = loaded == Loaded::Corrupt;
        Ok(RecordStore {
            path,
            records: loaded.into_records(),
            backup_pending,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MeasurementRecord> {
        self.records.get(index)
    }

    /// Append a record and persist the whole collection.
    ///
    /// On error the record is not in the store; the caller still holds it
    /// and may retry.
    pub fn append(&mut self, record: &MeasurementRecord) -> Result<()> {
        let mut candidate = self.records.clone();
        candidate.push(record.clone());
        self.commit(candidate)?;
        info!(
            "store: appended {} {} ({} records)",
            record.pile_id(),
            record.date(),
            self.records.len()
        );
        Ok(())
    }

    /// Replace the record at `index`, returning the previous one.
    pub fn replace(
        &mut self,
        index: usize,
        record: &MeasurementRecord,
    ) -> Result<MeasurementRecord> {
        self.check_index(index)?;
        let mut candidate = self.records.clone();
        let previous = std::mem::replace(&mut candidate[index], record.clone());
        self.commit(candidate)?;
        info!("store: replaced record {}", index);
        Ok(previous)
    }

    /// Remove the record at `index`, returning it.
    pub fn remove(&mut self, index: usize) -> Result<MeasurementRecord> {
        self.check_index(index)?;
        let mut candidate = self.records.clone();
        let removed = candidate.remove(index);
        self.commit(candidate)?;
        info!(
            "store: removed record {} ({} {})",
            index,
            removed.pile_id(),
            removed.date()
        );
        Ok(removed)
    }

    /// Rewrite the file from the in-memory collection.
    pub fn persist(&mut self) -> Result<()> {
        self.commit(self.records.clone())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
        }
    }

    fn commit(&mut self, candidate: Vec<MeasurementRecord>) -> Result<()> {
        let bytes = loader::encode(&candidate)?;
        if self.backup_pending {
            self.backup_malformed();
        }
        save_bytes(&self.path, &bytes)?;
        self.records = candidate;
        self.backup_pending = false;
        Ok(())
    }

    fn backup_malformed(&self) {
        let mut backup = self.path.as_os_str().to_owned();
        backup.push(".corrupt");
        let backup = PathBuf::from(backup);
        match std::fs::copy(&self.path, &backup) {
            Ok(_) => warn!(
                "store: kept malformed {} as {}",
                self.path.display(),
                backup.display()
            ),
            Err(err) => warn!(
                "store: could not back up malformed {}: {}",
                self.path.display(),
                err
            ),
        }
    }
}

fn save_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    atomic_write::atomic_write(path, bytes).map_err(|source| StoreError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    info!("store: wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use yard_core::{MeasurementEntry, Species};

    fn record(pile: &str, day: u32, volume: f64, scale: f64) -> MeasurementRecord {
        let date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        MeasurementEntry::new(date, pile, Species::Pinus, volume)
            .with_scale_mass(scale)
            .into_record()
            .unwrap()
    }

    #[test]
    fn test_open_missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("store.json")).unwrap();
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_append_then_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let r = record("P-10", 15, 100.0, 30.0);

        let mut store = RecordStore::open(&path).unwrap();
        store.append(&r).unwrap();

        let reloaded = load(&path).unwrap();
        assert_eq!(reloaded, vec![r]);
    }

    #[test]
    fn test_append_keeps_prior_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let first = record("P-1", 1, 10.0, 0.0);
        let second = record("P-2", 2, 20.0, 5.0);

        RecordStore::open(&path).unwrap().append(&first).unwrap();
        let mut store = RecordStore::open(&path).unwrap();
        store.append(&second).unwrap();

        assert_eq!(store.records(), &[first.clone(), second.clone()]);
        assert_eq!(load(&path).unwrap(), vec![first, second]);
    }

    #[test]
    fn test_persist_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = RecordStore::open(&path).unwrap();
        store.append(&record("P-1", 3, 123.45, 41.7)).unwrap();
        store.append(&record("P-2", 4, 77.7, 0.0)).unwrap();
        let written = fs::read(&path).unwrap();

        let mut reopened = RecordStore::open(&path).unwrap();
        reopened.persist().unwrap();

        assert_eq!(fs::read(&path).unwrap(), written);
    }

    #[test]
    fn test_failed_append_is_not_committed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = RecordStore::open(&path).unwrap();
        store.append(&record("P-1", 1, 10.0, 0.0)).unwrap();

        // make the target unwritable by turning it into a directory
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        fs::write(path.join("blocker"), b"x").unwrap();

        let err = store.append(&record("P-2", 2, 20.0, 0.0)).unwrap_err();
        assert!(matches!(err, StoreError::Persist { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_malformed_store_opens_empty_and_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, b"{{ definitely not records").unwrap();

        let mut store = RecordStore::open(&path).unwrap();
        assert!(store.is_empty());

        store.append(&record("P-1", 1, 10.0, 0.0)).unwrap();
        assert_eq!(load(&path).unwrap().len(), 1);
        let backup = dir.path().join("store.json.corrupt");
        assert_eq!(fs::read(backup).unwrap(), b"{{ definitely not records");
    }

    #[test]
    fn test_replace_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = RecordStore::open(&path).unwrap();
        let a = record("A", 1, 10.0, 0.0);
        let b = record("B", 2, 20.0, 0.0);
        let fixed_b = record("B", 2, 25.0, 0.0);
        store.append(&a).unwrap();
        store.append(&b).unwrap();

        let previous = store.replace(1, &fixed_b).unwrap();
        assert_eq!(previous, b);
        assert_eq!(load(&path).unwrap(), vec![a.clone(), fixed_b]);

        let removed = store.remove(0).unwrap();
        assert_eq!(removed, a);
        assert_eq!(load(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_index_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::open(dir.path().join("store.json")).unwrap();
        let err = store.remove(0).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 0, len: 0 }));
        assert!(!store.path().exists());
    }
}
