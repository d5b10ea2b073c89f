use crate::analyzers::types::BucketAggregate;
use crate::dataset::ArrivalRecord;
use std::collections::{BTreeMap, HashSet};

/// Distinct buses seen in one bucket, split by warning flag.
#[derive(Default)]
struct BucketBuses<'a> {
    all: HashSet<&'a str>,
    warning: HashSet<&'a str>,
}

/// Groups `rows` by bucket and counts distinct buses per bucket.
///
/// Buckets come out in ascending order of their label. Rows without a
/// bucket cannot be grouped and are skipped; rows without a bus id are
/// grouped but never counted. Buckets with no rows are not emitted.
pub fn aggregate_buckets(rows: &[&ArrivalRecord]) -> Vec<BucketAggregate> {
    let mut buckets: BTreeMap<&str, BucketBuses> = BTreeMap::new();

    for row in rows {
        let Some(bucket_time) = row.bucket_time.as_deref() else {
            continue;
        };

        let entry = buckets.entry(bucket_time).or_default();

        if let Some(bus_id) = row.bus_id.as_deref() {
            entry.all.insert(bus_id);
            if row.is_warning {
                entry.warning.insert(bus_id);
            }
        }
    }

    buckets
        .into_iter()
        .map(|(bucket_time, buses)| BucketAggregate {
            bucket_time: bucket_time.to_string(),
            distinct_bus_id_count: buses.all.len(),
            warning_bus_id_count: buses.warning.len(),
        })
        .collect()
}
