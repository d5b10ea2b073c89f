use crate::analyzers::aggregate::aggregate_buckets;
use crate::analyzers::filter::{StopSelection, filter_by_stops};
use crate::analyzers::reshape::to_long_form;
use crate::analyzers::types::SelectionView;
use crate::dataset::Dataset;
use tracing::{debug, info};

/// Runs one interaction: filter, aggregate, reshape.
///
/// Aggregation is skipped entirely when the selection leaves no rows, and
/// the view is [`SelectionView::Empty`] when nothing could be bucketed.
#[tracing::instrument(skip_all, fields(stops = selection.len()))]
pub fn build_view(dataset: &Dataset, selection: &StopSelection) -> SelectionView {
    let filtered = filter_by_stops(dataset.records(), selection);
    debug!(
        total = dataset.len(),
        matched = filtered.len(),
        "Records filtered"
    );

    if filtered.is_empty() {
        info!("No records for selection");
        return SelectionView::Empty;
    }

    let aggregate = aggregate_buckets(&filtered);
    if aggregate.is_empty() {
        info!(matched = filtered.len(), "Selected records carry no bucket");
        return SelectionView::Empty;
    }

    let long = to_long_form(&aggregate);
    debug!(buckets = aggregate.len(), long_rows = long.len(), "View built");

    SelectionView::HasData { aggregate, long }
}
