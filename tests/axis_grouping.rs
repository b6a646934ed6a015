use metricharts::axis::group_axes;
use metricharts::color::ColorChoice;
use metricharts::models::{CombineType, DataSeriesDescriptor, DisplayType};
use std::collections::BTreeMap;

fn descriptor(id: i64, realm: &str, metric: &str) -> DataSeriesDescriptor {
    DataSeriesDescriptor {
        id,
        realm: realm.into(),
        metric: metric.into(),
        category: realm.into(),
        group_by: "resource".into(),
        group_by_label: "Resource".into(),
        filters: Vec::new(),
        display_type: DisplayType::Line,
        combine_type: CombineType::None,
        color: ColorChoice::Auto,
        log_scale: false,
        std_err: false,
        std_err_labels: false,
        value_labels: false,
        line_type: "Solid".into(),
        line_width: 2.0,
        visibility: BTreeMap::new(),
        z_index: None,
        trend_line: false,
        restricted_by_roles: false,
        role_restrictions: Vec::new(),
    }
}

#[test]
fn share_axis_collapses_everything_onto_one_axis() {
    let descriptors = vec![
        descriptor(1, "Jobs", "total_cpu_hours"),
        descriptor(2, "Cloud", "core_time"),
        descriptor(3, "Jobs", "job_count"),
    ];
    let groups = group_axes(&descriptors, &["CPU Hours", "Core Hours", "Jobs"], true, true);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "sharedAxis");
    assert_eq!(groups[0].members, vec![0, 1, 2]);
}

#[test]
fn same_unit_series_share_an_axis_when_legend_is_on() {
    let descriptors = vec![
        descriptor(1, "Jobs", "total_cpu_hours"),
        descriptor(2, "Cloud", "core_time"),
        descriptor(3, "Jobs", "job_count"),
    ];
    let groups = group_axes(&descriptors, &["Hours", "Hours", "Jobs"], false, true);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].members, vec![0, 1]);
    assert_eq!(groups[1].members, vec![2]);
}

#[test]
fn log_scale_splits_a_shared_unit() {
    let mut a = descriptor(1, "Jobs", "total_cpu_hours");
    let mut b = descriptor(2, "Jobs", "avg_cpu_hours");
    a.log_scale = false;
    b.log_scale = true;
    let groups = group_axes(&[a, b], &["Hours", "Hours"], false, true);
    assert_eq!(groups.len(), 2);
}

#[test]
fn percent_stacking_splits_a_shared_unit() {
    let a = descriptor(1, "Jobs", "total_cpu_hours");
    let mut b = descriptor(2, "Jobs", "avg_cpu_hours");
    b.combine_type = CombineType::Percent;
    let groups = group_axes(&[a, b], &["Hours", "Hours"], false, true);
    assert_eq!(groups.len(), 2);
}

#[test]
fn no_legend_groups_by_realm_and_metric() {
    let descriptors = vec![
        descriptor(1, "Jobs", "total_cpu_hours"),
        descriptor(2, "Cloud", "total_cpu_hours"),
        descriptor(3, "Jobs", "total_cpu_hours"),
    ];
    // Same unit everywhere, but with the legend off each realm/metric pair
    // claims its own axis.
    let groups = group_axes(&descriptors, &["Hours", "Hours", "Hours"], false, false);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].members, vec![0, 2]);
    assert_eq!(groups[1].members, vec![1]);
}

#[test]
fn single_series_ignores_unit_grouping() {
    let descriptors = vec![descriptor(1, "Jobs", "total_cpu_hours")];
    let groups = group_axes(&descriptors, &["Hours"], false, true);
    assert_eq!(groups.len(), 1);
    assert!(groups[0].key.contains("total_cpu_hours"));
}

#[test]
fn groups_keep_first_appearance_order() {
    let descriptors = vec![
        descriptor(1, "Jobs", "a"),
        descriptor(2, "Jobs", "b"),
        descriptor(3, "Jobs", "a"),
        descriptor(4, "Jobs", "c"),
    ];
    let groups = group_axes(&descriptors, &["A", "B", "A", "C"], false, true);
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].members, vec![0, 2]);
    assert_eq!(groups[1].members, vec![1]);
    assert_eq!(groups[2].members, vec![3]);
}
