//! CSV dataset loading and the process-wide dataset cache.
//!
//! The input file is produced upstream and is static for the lifetime of
//! the process, so it is read once and then shared read-only by every
//! interaction.

use crate::error::{DataError, LoadFailure};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Columns the loader refuses to run without.
pub const REQUIRED_COLUMNS: [&str; 4] = ["stationName", "bus_id", "bucket_time", "is_warning"];

/// One observation of a bus at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrivalRecord {
    pub station_name: Option<String>,
    pub bus_id: Option<String>,
    pub bucket_time: Option<String>,
    pub is_warning: bool,
}

impl ArrivalRecord {
    pub fn new(
        station_name: Option<&str>,
        bus_id: Option<&str>,
        bucket_time: Option<&str>,
        is_warning: bool,
    ) -> Self {
        ArrivalRecord {
            station_name: station_name.map(str::to_string),
            bus_id: bus_id.map(str::to_string),
            bucket_time: bucket_time.map(str::to_string),
            is_warning,
        }
    }
}

/// A row as it appears in the CSV file, before coercion.
///
/// Empty fields and fields missing from short rows both come through as `None`.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "stationName", default)]
    station_name: Option<String>,
    #[serde(default)]
    bus_id: Option<String>,
    #[serde(default)]
    bucket_time: Option<String>,
    #[serde(default)]
    is_warning: Option<String>,
}

impl From<RawRecord> for ArrivalRecord {
    fn from(raw: RawRecord) -> Self {
        ArrivalRecord {
            station_name: raw.station_name,
            bus_id: raw.bus_id,
            bucket_time: raw.bucket_time,
            is_warning: raw.is_warning.as_deref().and_then(parse_flag).unwrap_or(false),
        }
    }
}

/// Interprets the textual boolean forms written by common CSV producers.
///
/// Returns `None` for anything unrecognized so the caller decides the fallback.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// The full, immutable set of arrival records.
#[derive(Debug, Default)]
pub struct Dataset {
    records: Vec<ArrivalRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<ArrivalRecord>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[ArrivalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stop names a user can choose from: deduplicated, sorted, missing names excluded.
    pub fn station_names(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| r.station_name.as_deref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Reads arrival records from any CSV source.
///
/// # Errors
///
/// Fails if the header lacks a required column or the CSV itself is malformed.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<ArrivalRecord>, LoadFailure> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadFailure::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let raw: RawRecord = result?;
        records.push(ArrivalRecord::from(raw));
    }

    Ok(records)
}

/// Reads the dataset at `path` without caching.
///
/// # Errors
///
/// Returns [`DataError::DataUnavailable`] if the file is missing or malformed.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_dataset(path: &Path) -> Result<Dataset, DataError> {
    let file = File::open(path).map_err(|e| DataError::unavailable(path, e))?;
    let records = read_records(file).map_err(|e| DataError::unavailable(path, e))?;

    info!(records = records.len(), "Dataset loaded");
    Ok(Dataset::from_records(records))
}

/// Loads a dataset on first use and hands out the same instance afterwards.
///
/// A failed load is not remembered; the next call tries again.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    cell: OnceLock<Dataset>,
    loads: AtomicUsize,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DatasetCache {
            path: path.into(),
            cell: OnceLock::new(),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached dataset, loading it if this is the first request.
    pub fn dataset(&self) -> Result<&Dataset, DataError> {
        if let Some(dataset) = self.cell.get() {
            debug!(path = %self.path.display(), "Dataset cache hit");
            return Ok(dataset);
        }

        let loaded = load_dataset(&self.path)?;
        self.loads.fetch_add(1, Ordering::Relaxed);
        Ok(self.cell.get_or_init(|| loaded))
    }

    /// Number of successful loads performed by this cache.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

static SHARED: OnceLock<DatasetCache> = OnceLock::new();

/// The process-wide dataset cache.
///
/// The first path registered wins; the input is static, so later callers
/// asking for a different path get the original cache and a warning.
pub fn shared_cache(path: impl AsRef<Path>) -> &'static DatasetCache {
    let path = path.as_ref();
    let cache = SHARED.get_or_init(|| DatasetCache::new(path));
    if cache.path() != path {
        warn!(
            requested = %path.display(),
            cached = %cache.path().display(),
            "Dataset cache already bound to another path"
        );
    }
    cache
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    const SAMPLE: &str = "\
stationName,bus_id,bucket_time,is_warning,remainSeat
A,1,08:00,False,12
A,1,08:00,True,4
,2,08:10,False,30
B,3,08:10,true,2
";

    #[test]
    fn test_read_records_coerces_fields() {
        let records = read_records(SAMPLE.as_bytes()).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0], ArrivalRecord::new(Some("A"), Some("1"), Some("08:00"), false));
        assert!(records[1].is_warning);
        assert_eq!(records[2].station_name, None);
        assert!(records[3].is_warning);
    }

    #[test]
    fn test_read_records_missing_columns() {
        let csv = "stationName,bus_id\nA,1\n";
        let err = read_records(csv.as_bytes()).unwrap_err();

        match err {
            LoadFailure::MissingColumns(cols) => {
                assert_eq!(cols, vec!["bucket_time".to_string(), "is_warning".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_records_short_row_is_missing_not_rejected() {
        let csv = "stationName,bus_id,bucket_time,is_warning\nA,1\n";
        let records = read_records(csv.as_bytes()).unwrap();

        assert_eq!(records, vec![ArrivalRecord::new(Some("A"), Some("1"), None, false)]);
    }

    #[test]
    fn test_read_records_unrecognized_flag_is_not_warning() {
        let csv = "stationName,bus_id,bucket_time,is_warning\nA,1,t1,maybe\n";
        let records = read_records(csv.as_bytes()).unwrap();

        assert!(!records[0].is_warning);
    }

    #[test]
    fn test_parse_flag_variants() {
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("FALSE"), Some(false));
        assert_eq!(parse_flag(" no "), Some(false));
        assert_eq!(parse_flag(""), None);
        assert_eq!(parse_flag("2"), None);
    }

    #[test]
    fn test_station_names_sorted_deduplicated_without_missing() {
        let dataset = Dataset::from_records(read_records(SAMPLE.as_bytes()).unwrap());
        assert_eq!(dataset.station_names(), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let path = temp_path("bus_seat_dashboard_does_not_exist.csv");
        let _ = fs::remove_file(&path);

        let err = load_dataset(&path).unwrap_err();
        let DataError::DataUnavailable { source, .. } = err;
        assert!(matches!(source, LoadFailure::Io(_)));
    }

    #[test]
    fn test_cache_loads_once() {
        let path = temp_path("bus_seat_dashboard_test_cache.csv");
        fs::write(&path, SAMPLE).unwrap();

        let cache = DatasetCache::new(&path);
        let first = cache.dataset().unwrap() as *const Dataset;
        let second = cache.dataset().unwrap() as *const Dataset;

        assert_eq!(first, second);
        assert_eq!(cache.load_count(), 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_cache_does_not_remember_failure() {
        let path = temp_path("bus_seat_dashboard_test_cache_retry.csv");
        let _ = fs::remove_file(&path);

        let cache = DatasetCache::new(&path);
        assert!(cache.dataset().is_err());
        assert_eq!(cache.load_count(), 0);

        fs::write(&path, SAMPLE).unwrap();
        assert_eq!(cache.dataset().unwrap().len(), 4);
        assert_eq!(cache.load_count(), 1);

        fs::remove_file(&path).unwrap();
    }
}
