//! Error types shared by the loader and the transformer.

use std::path::PathBuf;
use thiserror::Error;

/// Raised when the dataset cannot be turned into records.
///
/// Fatal for the whole session: no view can be rendered without data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("dataset unavailable at {}", path.display())]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: LoadFailure,
    },
}

impl DataError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: impl Into<LoadFailure>) -> Self {
        DataError::DataUnavailable {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Underlying reason a load failed.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// A metric identifier outside the closed set of known metrics.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown metric: {0}")]
pub struct UnknownMetric(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_data_unavailable_display_names_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = DataError::unavailable("data/buses.csv", io_err);
        assert_eq!(err.to_string(), "dataset unavailable at data/buses.csv");
    }

    #[test]
    fn test_data_unavailable_keeps_source() {
        let err = DataError::unavailable(
            "x.csv",
            LoadFailure::MissingColumns(vec!["bus_id".into(), "is_warning".into()]),
        );
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("missing required columns: bus_id, is_warning")
        );
    }

    #[test]
    fn test_unknown_metric_display() {
        let err = UnknownMetric("row_count".into());
        assert_eq!(err.to_string(), "unknown metric: row_count");
    }
}
