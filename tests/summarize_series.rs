use metricharts::models::{RawDataset, XAxisData};
use metricharts::summarize::{
    AggregateKind, SUMMARY_ID_BASE, merge_x_labels, should_summarize, summarize,
};

fn dataset(values: Vec<Option<f64>>) -> RawDataset {
    let n = values.len();
    RawDataset {
        id: 1,
        name: "CPU Hours: Total".into(),
        description: String::new(),
        unit: "CPU Hours".into(),
        x_labels: (0..n).map(|i| Some(format!("resource{i}"))).collect(),
        x_ids: (0..n as i64).collect(),
        values,
        errors: vec![Some(0.5); n],
        true_count: n,
        decimals: 1,
        sem_decimals: 1,
        summarized: false,
    }
}

#[test]
fn summarization_fires_only_past_the_limit() {
    assert!(!should_summarize(9, 10));
    assert!(!should_summarize(10, 10));
    assert!(should_summarize(11, 10));
    assert!(should_summarize(5, 0));
}

#[test]
fn aggregate_follows_metric_alias() {
    assert_eq!(AggregateKind::for_metric("min_memory", false), AggregateKind::Min);
    assert_eq!(AggregateKind::for_metric("max_wait_time", false), AggregateKind::Max);
    assert_eq!(AggregateKind::for_metric("avg_cpu_hours", false), AggregateKind::Mean);
    assert_eq!(AggregateKind::for_metric("job_count", false), AggregateKind::Mean);
    assert_eq!(AggregateKind::for_metric("utilization", false), AggregateKind::Mean);
    assert_eq!(AggregateKind::for_metric("expansion_factor", false), AggregateKind::Mean);
    assert_eq!(AggregateKind::for_metric("total_cpu_hours", false), AggregateKind::Sum);
    // Aggregate-shaped builds average anything without its own statistic.
    assert_eq!(AggregateKind::for_metric("total_cpu_hours", true), AggregateKind::Mean);
    assert_eq!(AggregateKind::for_metric("max_wait_time", true), AggregateKind::Max);
}

#[test]
fn sum_remainder_replaces_the_tail() {
    let mut ds = dataset(vec![
        Some(50.0),
        Some(40.0),
        Some(30.0),
        Some(8.0),
        Some(2.0),
        Some(1.0),
    ]);
    let label = summarize(&mut ds, 3, AggregateKind::Sum);
    assert_eq!(label.as_deref(), Some("All 3 Others"));
    assert_eq!(ds.value_count(), 4);
    assert_eq!(ds.values[3], Some(11.0));
    assert_eq!(ds.x_labels[3].as_deref(), Some("All 3 Others"));
    assert_eq!(ds.x_ids[3], SUMMARY_ID_BASE - 3);
    assert_eq!(ds.errors[3], Some(0.0));
    assert!(ds.summarized);
}

#[test]
fn mean_counts_nulls_in_the_denominator() {
    let mut ds = dataset(vec![Some(9.0), Some(8.0), Some(2.0), None, Some(4.0)]);
    summarize(&mut ds, 2, AggregateKind::Mean).unwrap();
    // Tail is [2, null, 4]: sum 6 over 3 raw categories.
    assert_eq!(ds.values[2], Some(2.0));
    assert_eq!(ds.x_labels[2].as_deref(), Some("Avg of 3 Others"));
}

#[test]
fn min_and_max_pick_from_the_tail() {
    let mut ds = dataset(vec![Some(9.0), Some(7.0), Some(5.0), Some(3.0)]);
    summarize(&mut ds, 1, AggregateKind::Min).unwrap();
    assert_eq!(ds.values[1], Some(3.0));
    assert_eq!(ds.x_labels[1].as_deref(), Some("Min of 3 Others"));

    let mut ds = dataset(vec![Some(9.0), Some(7.0), Some(5.0), Some(3.0)]);
    summarize(&mut ds, 1, AggregateKind::Max).unwrap();
    assert_eq!(ds.values[1], Some(7.0));
    assert_eq!(ds.x_labels[1].as_deref(), Some("Max of 3 Others"));
}

#[test]
fn all_null_tail_yields_zero_remainder() {
    let mut ds = dataset(vec![Some(9.0), None, None]);
    summarize(&mut ds, 1, AggregateKind::Min).unwrap();
    assert_eq!(ds.values[1], Some(0.0));
}

#[test]
fn short_series_is_untouched() {
    let mut ds = dataset(vec![Some(1.0), Some(2.0)]);
    assert!(summarize(&mut ds, 5, AggregateKind::Sum).is_none());
    assert_eq!(ds.value_count(), 2);
    assert!(!ds.summarized);
}

#[test]
fn second_summarize_is_a_no_op() {
    let mut ds = dataset(vec![Some(5.0), Some(4.0), Some(3.0), Some(2.0)]);
    summarize(&mut ds, 2, AggregateKind::Sum).unwrap();
    let snapshot = ds.clone();
    assert!(summarize(&mut ds, 2, AggregateKind::Sum).is_none());
    assert_eq!(ds.values, snapshot.values);
    assert_eq!(ds.x_labels, snapshot.x_labels);
}

#[test]
fn merge_backfills_null_labels_from_canonical_axis() {
    let mut ds = dataset(vec![Some(5.0), Some(4.0), Some(3.0)]);
    ds.x_labels[1] = None;
    let mut x_axis = XAxisData {
        title: "Resource".into(),
        labels: vec![
            Some("alpha".into()),
            Some("beta".into()),
            Some("gamma".into()),
            Some("delta".into()),
        ],
        ids: vec![1, 2, 3, 4],
        total: 4,
    };
    merge_x_labels(&ds, &mut x_axis);
    assert_eq!(
        x_axis.labels,
        vec![
            Some("resource0".into()),
            Some("beta".into()),
            Some("resource2".into()),
        ]
    );
}
