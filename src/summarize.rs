//! Top-N truncation of over-long series into an aggregate "remainder"
//! bucket ("Avg of 5 Others", "All 12 Others", ...).

use crate::models::{RawDataset, XAxisData};

/// Sentinel base for the remainder bucket's id; drilldown is disabled for
/// ids at or below this value.
pub const SUMMARY_ID_BASE: i64 = -9999;

/// Aggregate used for the remainder bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Mean,
    Min,
    Max,
    Sum,
}

impl AggregateKind {
    /// Choose the aggregate from the statistic's alias. `use_average`
    /// reflects the aggregate (non-time-series) query shape, where any
    /// non-pie series averages its remainder; time-series builds pass false
    /// and rely on the name heuristic alone.
    ///
    /// Min/max statistics keep their own aggregate in every case, and pie
    /// charts never average: a pie shows a distribution, so the remainder
    /// slice must be a sum to stay proportional.
    pub fn for_metric(metric: &str, use_average: bool) -> Self {
        if metric.contains("min_") {
            AggregateKind::Min
        } else if metric.contains("max_") {
            AggregateKind::Max
        } else if use_average
            || metric.contains("avg_")
            || metric.contains("count")
            || metric.contains("utilization")
            || metric.contains("rate")
            || metric.contains("expansion_factor")
        {
            AggregateKind::Mean
        } else {
            AggregateKind::Sum
        }
    }

    fn remainder_label(&self, others: usize) -> String {
        match self {
            AggregateKind::Mean => format!("Avg of {others} Others"),
            AggregateKind::Min => format!("Min of {others} Others"),
            AggregateKind::Max => format!("Max of {others} Others"),
            AggregateKind::Sum => format!("All {others} Others"),
        }
    }
}

/// Whether a series needs truncation: true iff at least one category falls
/// beyond the display limit.
pub fn should_summarize(true_count: usize, limit: usize) -> bool {
    true_count as i64 - limit as i64 >= 1
}

/// Truncate `dataset` to its top `limit` points plus one synthetic
/// remainder point aggregated with `kind`. Returns the remainder label, or
/// `None` when nothing was truncated. A second call on an already-truncated
/// dataset is a no-op.
pub fn summarize(dataset: &mut RawDataset, limit: usize, kind: AggregateKind) -> Option<String> {
    if dataset.summarized {
        return None;
    }
    let count = dataset.value_count();
    if count <= limit {
        return None;
    }

    let others = count - limit;
    let tail: Vec<f64> = dataset.values[limit..].iter().filter_map(|v| *v).collect();
    let remainder = match kind {
        AggregateKind::Min => tail.iter().copied().fold(f64::INFINITY, f64::min),
        AggregateKind::Max => tail.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        // Nulls count toward the denominator, matching the raw category count.
        AggregateKind::Mean => tail.iter().sum::<f64>() / others as f64,
        AggregateKind::Sum => tail.iter().sum::<f64>(),
    };
    let remainder = if remainder.is_finite() { remainder } else { 0.0 };

    let keep = limit + 1;
    dataset.values.truncate(keep);
    dataset.x_labels.resize(keep, None);
    dataset.x_ids.resize(keep, 0);
    dataset.errors.resize(keep, None);

    let label = kind.remainder_label(others);
    dataset.values[limit] = Some(remainder);
    dataset.x_labels[limit] = Some(label.clone());
    // Negative sentinel id prevents drilldown into the merged bucket.
    dataset.x_ids[limit] = SUMMARY_ID_BASE - limit as i64;
    dataset.errors[limit] = Some(0.0);
    dataset.summarized = true;

    log::debug!(
        "summarized {:?}: kept {} of {} categories ({})",
        dataset.name,
        limit,
        count,
        label
    );
    Some(label)
}

/// After truncating one series, adopt its (shortened) label list as the
/// canonical X axis, backfilling any null label from the axis's existing
/// labels at the same position.
pub fn merge_x_labels(dataset: &RawDataset, x_axis: &mut XAxisData) {
    let merged: Vec<Option<String>> = dataset
        .x_labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            label
                .clone()
                .or_else(|| x_axis.labels.get(i).cloned().flatten())
        })
        .collect();
    x_axis.labels = merged;
}
