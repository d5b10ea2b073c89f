//! Environment-driven settings.
//!
//! Values come from the process environment (a `.env` file is loaded by the
//! binary first); command-line flags override them.

use crate::analyzers::filter::StopSelection;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "processed_bus_data.csv";
pub const DEFAULT_STATIONS: &str = "강남역나라빌딩앞";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/bus_seat_dashboard.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// CSV produced by the upstream bucketing job.
    pub data_path: PathBuf,
    /// Selection used when the user names no stop.
    pub default_stations: StopSelection,
    pub log_file_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            default_stations: StopSelection::parse(DEFAULT_STATIONS),
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE_PATH),
        }
    }
}

impl Config {
    /// Reads `BUS_DATA_PATH`, `DEFAULT_STATIONS` and `LOG_FILE_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        Config {
            data_path: get("BUS_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            default_stations: get("DEFAULT_STATIONS")
                .map(|v| StopSelection::parse(&v))
                .unwrap_or(defaults.default_stations),
            log_file_path: get("LOG_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert!(config.default_stations.contains("강남역나라빌딩앞"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("BUS_DATA_PATH", "/data/buses.csv"),
            ("DEFAULT_STATIONS", "A, B"),
            ("LOG_FILE_PATH", ""),
        ]);
        let config = Config::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.data_path, PathBuf::from("/data/buses.csv"));
        assert_eq!(
            config.default_stations,
            ["A", "B"].into_iter().collect::<StopSelection>()
        );
        assert_eq!(config.log_file_path, PathBuf::from(DEFAULT_LOG_FILE_PATH));
    }
}
