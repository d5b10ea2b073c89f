//! Data types used by the aggregation pipeline.

use crate::error::UnknownMetric;
use serde::Serialize;

/// Wide-form result: one row per bucket, one column per metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketAggregate {
    pub bucket_time: String,
    pub distinct_bus_id_count: usize,
    pub warning_bus_id_count: usize,
}

impl BucketAggregate {
    /// Value of `metric` in this row.
    pub fn count(&self, metric: Metric) -> usize {
        match metric {
            Metric::DistinctBuses => self.distinct_bus_id_count,
            Metric::WarningBuses => self.warning_bus_id_count,
        }
    }
}

/// The two metrics computed per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Metric {
    DistinctBuses,
    WarningBuses,
}

impl Metric {
    /// Every metric, in the order series are emitted.
    pub const ALL: [Metric; 2] = [Metric::DistinctBuses, Metric::WarningBuses];

    /// Column name used in the wide table.
    pub fn id(self) -> &'static str {
        match self {
            Metric::DistinctBuses => "distinct_bus_id_count",
            Metric::WarningBuses => "warning_bus_id_count",
        }
    }

    /// Human-readable series name.
    pub fn label(self) -> &'static str {
        match self {
            Metric::DistinctBuses => "total bus run count",
            Metric::WarningBuses => "low-seat bus count",
        }
    }

    /// Resolves a wide-table column name back into a metric.
    ///
    /// # Errors
    ///
    /// Any name outside the known set is rejected rather than passed through.
    pub fn from_id(id: &str) -> Result<Metric, UnknownMetric> {
        Metric::ALL
            .into_iter()
            .find(|m| m.id() == id)
            .ok_or_else(|| UnknownMetric(id.to_string()))
    }
}

/// Long-form row after melting, still carrying the metric kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeltedRow {
    pub bucket_time: String,
    pub metric: Metric,
    pub count: usize,
}

/// Long-form row as handed to the chart, with the metric relabeled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongRow {
    pub bucket_time: String,
    pub metric_label: &'static str,
    pub count: usize,
}

/// Outcome of a single interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionView {
    HasData {
        aggregate: Vec<BucketAggregate>,
        long: Vec<LongRow>,
    },
    Empty,
}

impl SelectionView {
    pub fn is_empty(&self) -> bool {
        matches!(self, SelectionView::Empty)
    }
}
