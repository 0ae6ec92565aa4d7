//! Reading and encoding the store file.
//!
//! The file is a pretty-printed JSON array of records with named fields;
//! see [`MeasurementRecord`] for what an older file may leave out.
//! A missing file is an empty store. A file that is present but cannot be
//! decoded is also treated as an empty store, with a warning, since there
//! is nothing useful to recover from it in-process. Any other read failure
//! is returned to the caller.

use crate::error::{Result, StoreError};
use log::{info, warn};
use std::{fs, io::ErrorKind, path::Path};
use yard_core::MeasurementRecord;

/// Outcome of reading a store file.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    /// No file at the path yet
    Missing,
    /// File decoded cleanly
    Records(Vec<MeasurementRecord>),
    /// File present but malformed; contents were discarded
    Corrupt,
}

impl Loaded {
    pub fn into_records(self) -> Vec<MeasurementRecord> {
        match self {
            Loaded::Records(records) => records,
            Loaded::Missing | Loaded::Corrupt => Vec::new(),
        }
    }
}

/// Load every record stored at `path`.
///
/// Returns an empty sequence for a missing or malformed file.
pub fn load(path: &Path) -> Result<Vec<MeasurementRecord>> {
    read_store(path).map(Loaded::into_records)
}

/// Read the store file and report how it went.
pub fn read_store(path: &Path) -> Result<Loaded> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!("store: no file at {}, starting empty", path.display());
            return Ok(Loaded::Missing);
        }
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        info!("store: {} is blank, starting empty", path.display());
        return Ok(Loaded::Records(Vec::new()));
    }

    match decode(&bytes) {
        Ok(records) => {
            info!(
                "store: loaded {} records from {}",
                records.len(),
                path.display()
            );
            Ok(Loaded::Records(records))
        }
        Err(err) => {
            warn!(
                "store: {} is malformed ({}); prior history is ignored and will be overwritten on next save",
                path.display(),
                err
            );
            Ok(Loaded::Corrupt)
        }
    }
}

pub fn decode(bytes: &[u8]) -> serde_json::Result<Vec<MeasurementRecord>> {
    serde_json::from_slice(bytes)
}

pub fn encode(records: &[MeasurementRecord]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yard_core::Species;

    const SAMPLE_STORE: &str = include_str!("../../fixtures/sample_store.json");
    const SPREADSHEET_STORE: &str = include_str!("../../fixtures/spreadsheet_store.json");

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert_eq!(read_store(&path).unwrap(), Loaded::Missing);
        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, SAMPLE_STORE).unwrap();

        let records = load(&path).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].pile_id(), "P-01");
        assert_eq!(records[1].error_pct(), 2.03);
        assert_eq!(records[4].estimated_mass(), 169.0);
    }

    #[test]
    fn test_load_spreadsheet_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estoque_arauco_final.json");
        fs::write(&path, SPREADSHEET_STORE).unwrap();

        let records = match read_store(&path).unwrap() {
            Loaded::Records(records) => records,
            other => panic!("expected records, got {other:?}"),
        };
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].pile_id(), "P-10");
        assert_eq!(records[0].date().to_string(), "2024-06-15");
        assert_eq!(records[0].weighed_error_pct(), Some(8.33));
        assert_eq!(records[1].species(), Species::Eucalipto);
        assert_eq!(records[1].estimated_mass(), 213.0);
        assert!(!records[1].is_weighed());
        assert_eq!(records[2].applied_density(), 480.0);
        assert_eq!(records[2].real_conversion_factor(), 0.3333);
    }

    #[test]
    fn test_load_without_derived_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(
            &path,
            r#"[{"date":"2024-06-15","pile_id":"P","species":"Pinus","drone_volume":100.0,"scale_mass":30.0}]"#,
        )
        .unwrap();

        let records = load(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].applied_density(), 500.0);
        assert_eq!(records[0].stacking_factor(), 0.65);
        assert_eq!(records[0].estimated_mass(), 32.5);
        assert_eq!(records[0].error_pct(), 8.33);
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        for garbage in [
            &b"{not json"[..],
            &b"{\"date\": \"2024-01-01\"}"[..],
            &b"[{\"pile_id\": \"A\"}]"[..],
            &b"\xff\xfe\x00"[..],
        ] {
            fs::write(&path, garbage).unwrap();
            assert_eq!(read_store(&path).unwrap(), Loaded::Corrupt);
            assert!(load(&path).unwrap().is_empty());
        }
    }

    #[test]
    fn test_blank_file_is_empty_not_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(read_store(&path).unwrap(), Loaded::Records(Vec::new()));
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // reading a directory fails with something other than NotFound
        let result = load(dir.path());
        assert!(matches!(result, Err(StoreError::Read { .. })));
    }

    #[test]
    fn test_encode_decode_fixture_is_stable() {
        let records = decode(SAMPLE_STORE.as_bytes()).unwrap();
        let encoded = encode(&records).unwrap();
        assert_eq!(decode(&encoded).unwrap(), records);
        assert_eq!(String::from_utf8(encoded).unwrap(), SAMPLE_STORE.trim_end());
    }
}
