//! Chart-ready series built from the long table.
//!
//! Only the data and its fixed styling are produced here; drawing is left
//! to whatever consumes `chart.json`.

use crate::analyzers::types::{LongRow, Metric};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const CHART_TITLE: &str = "Bus ID count by bucket time";
pub const X_AXIS_TITLE: &str = "Bucket Time";
pub const Y_AXIS_TITLE: &str = "Count";

/// Color a metric's series is drawn in. Low-seat counts use the alerting color.
pub fn series_color(metric: Metric) -> &'static str {
    match metric {
        Metric::DistinctBuses => "blue",
        Metric::WarningBuses => "red",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub bucket_time: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub label: &'static str,
    pub color: &'static str,
    pub points: Vec<ChartPoint>,
}

/// Everything a line chart of one selection needs.
#[derive(Debug, Serialize)]
pub struct ChartSpec {
    pub title: &'static str,
    pub x_axis: &'static str,
    pub y_axis: &'static str,
    pub generated_at: DateTime<Utc>,
    pub series: Vec<ChartSeries>,
}

impl ChartSpec {
    /// Splits `long` into one series per metric, keeping point order.
    pub fn from_long(long: &[LongRow]) -> Self {
        let series = Metric::ALL
            .into_iter()
            .map(|metric| ChartSeries {
                label: metric.label(),
                color: series_color(metric),
                points: long
                    .iter()
                    .filter(|row| row.metric_label == metric.label())
                    .map(|row| ChartPoint {
                        bucket_time: row.bucket_time.clone(),
                        count: row.count,
                    })
                    .collect(),
            })
            .collect();

        ChartSpec {
            title: CHART_TITLE,
            x_axis: X_AXIS_TITLE,
            y_axis: Y_AXIS_TITLE,
            generated_at: Utc::now(),
            series,
        }
    }
}
