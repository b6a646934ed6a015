//! Partitioning of data series descriptors into axis groups.
//!
//! Series sharing a grouping key render against one Y axis. Key derivation,
//! in priority order:
//!
//! 1. `share_axis` set: every series lands on a single `"sharedAxis"` key.
//! 2. legend enabled and more than one series: `unit + log_scale + percent`,
//!    so same-unit series share an axis even across different metrics.
//! 3. otherwise: `realm + metric + log_scale + percent`, one axis per
//!    distinct metric.
//!
//! First-appearance order fixes the axis index; grouping is stable with
//! respect to descriptor input order.

use crate::models::DataSeriesDescriptor;

/// One axis group: derived key plus member indices into the descriptor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisGrouping {
    pub key: String,
    pub members: Vec<usize>,
}

/// Derive the axis grouping key for one descriptor.
fn axis_key(
    descriptor: &DataSeriesDescriptor,
    unit: &str,
    share_axis: bool,
    has_legend: bool,
    series_count: usize,
) -> String {
    if share_axis {
        return "sharedAxis".to_string();
    }
    if has_legend && series_count > 1 {
        format!("{}_{}_{}", unit, descriptor.log_scale, descriptor.is_percent())
    } else {
        format!(
            "{}_{}_{}_{}",
            descriptor.realm,
            descriptor.metric,
            descriptor.log_scale,
            descriptor.is_percent()
        )
    }
}

/// Group descriptors into axes. `units` supplies each descriptor's unit
/// string (from its dataset); descriptors without a dataset still group, by
/// empty unit. Groups are returned in first-appearance order.
pub fn group_axes(
    descriptors: &[DataSeriesDescriptor],
    units: &[&str],
    share_axis: bool,
    has_legend: bool,
) -> Vec<AxisGrouping> {
    let mut groups: Vec<AxisGrouping> = Vec::new();
    for (index, descriptor) in descriptors.iter().enumerate() {
        let unit = units.get(index).copied().unwrap_or("");
        let key = axis_key(descriptor, unit, share_axis, has_legend, descriptors.len());
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.members.push(index),
            None => {
                log::debug!("axis group {:?} opens at index {}", key, groups.len());
                groups.push(AxisGrouping {
                    key,
                    members: vec![index],
                });
            }
        }
    }
    groups
}
