//! Wide-to-long reshaping for multi-series charts.

use crate::analyzers::types::{BucketAggregate, LongRow, MeltedRow, Metric};

/// Turns each wide row into one row per metric.
///
/// All rows of the first metric come first, in bucket order, followed by
/// the rows of the second metric.
pub fn melt(aggregate: &[BucketAggregate]) -> Vec<MeltedRow> {
    Metric::ALL
        .into_iter()
        .flat_map(move |metric| {
            aggregate.iter().map(move |row| MeltedRow {
                bucket_time: row.bucket_time.clone(),
                metric,
                count: row.count(metric),
            })
        })
        .collect()
}

/// Replaces each metric with its display label.
pub fn relabel(rows: Vec<MeltedRow>) -> Vec<LongRow> {
    rows.into_iter()
        .map(|row| LongRow {
            bucket_time: row.bucket_time,
            metric_label: row.metric.label(),
            count: row.count,
        })
        .collect()
}

/// Melts then relabels: the chart-ready form of `aggregate`.
pub fn to_long_form(aggregate: &[BucketAggregate]) -> Vec<LongRow> {
    relabel(melt(aggregate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn bucket(t: &str, distinct: usize, warning: usize) -> BucketAggregate {
        BucketAggregate {
            bucket_time: t.into(),
            distinct_bus_id_count: distinct,
            warning_bus_id_count: warning,
        }
    }

    #[test]
    fn test_long_form_has_two_rows_per_bucket() {
        let aggregate = vec![bucket("t1", 3, 1), bucket("t2", 4, 0), bucket("t3", 1, 1)];

        let long = to_long_form(&aggregate);
        assert_eq!(long.len(), 2 * aggregate.len());

        let pairs: HashSet<(&str, &str)> = long
            .iter()
            .map(|r| (r.bucket_time.as_str(), r.metric_label))
            .collect();
        assert_eq!(pairs.len(), long.len());
    }

    #[test]
    fn test_melt_orders_by_metric_then_bucket() {
        let melted = melt(&[bucket("t1", 2, 1), bucket("t2", 5, 3)]);

        let order: Vec<(Metric, &str, usize)> = melted
            .iter()
            .map(|r| (r.metric, r.bucket_time.as_str(), r.count))
            .collect();
        assert_eq!(
            order,
            vec![
                (Metric::DistinctBuses, "t1", 2),
                (Metric::DistinctBuses, "t2", 5),
                (Metric::WarningBuses, "t1", 1),
                (Metric::WarningBuses, "t2", 3),
            ]
        );
    }

    #[test]
    fn test_only_display_labels_leak() {
        let long = to_long_form(&[bucket("t1", 2, 1)]);

        for row in &long {
            assert!(
                row.metric_label == "total bus run count"
                    || row.metric_label == "low-seat bus count"
            );
            assert!(Metric::from_id(row.metric_label).is_err());
        }
    }

    #[test]
    fn test_empty_aggregate_melts_to_nothing() {
        assert!(to_long_form(&[]).is_empty());
    }
}
