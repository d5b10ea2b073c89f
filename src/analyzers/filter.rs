//! Narrowing the dataset to the stops a user picked.

use crate::dataset::ArrivalRecord;
use std::collections::BTreeSet;

/// The set of stop names chosen by the user. Empty means "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopSelection {
    names: BTreeSet<String>,
}

impl StopSelection {
    /// Selection that matches every record.
    pub fn all() -> Self {
        StopSelection::default()
    }

    /// Parses a comma-separated list, trimming entries and dropping blanks.
    pub fn parse(line: &str) -> Self {
        line.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for StopSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        StopSelection {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Keeps the records whose stop is in `selection`, in input order.
///
/// An empty selection keeps everything. Records without a stop name never
/// match a non-empty selection.
pub fn filter_by_stops<'a>(
    records: &'a [ArrivalRecord],
    selection: &StopSelection,
) -> Vec<&'a ArrivalRecord> {
    if selection.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|r| {
            r.station_name
                .as_deref()
                .is_some_and(|name| selection.contains(name))
        })
        .collect()
}
