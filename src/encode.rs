//! Series encoding: turn one axis group's descriptors and datasets into
//! resolved axis and trace models.
//!
//! Encoding is strictly ordered. Color assignment depends on the allocator
//! cursor left by earlier series, and legend ranks come from a running
//! counter, so series are processed in input order and companion traces
//! (error bars, trend lines) take the ranks adjacent to their primary.

use crate::axis::AxisGrouping;
use crate::color::{ColorAllocator, Rgb, alter_brightness};
use crate::models::{
    AxisScale, BuildRequest, CombineType, DataSeriesDescriptor, DisplayType, RawDataset, XAxisData,
};
use crate::overrides::series_visible;
use crate::restrictions::RoleRestrictionNotices;
use crate::summarize::{self, AggregateKind};
use crate::trend;
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// At most this many pie slices receive value labels; more would break the
/// chart margin on slice-heavy pies.
pub const PIE_LABEL_LIMIT: usize = 12;

/// Pie slices under this percent share get no value label.
const PIE_LABEL_MIN_SHARE: f64 = 2.0;

/// A per-series problem that skips that series and leaves the rest of the
/// build intact.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("no dataset answers descriptor {id} ({realm}/{metric})")]
    MissingDataset { id: i64, realm: String, metric: String },
    #[error("dataset for series {series:?} has no values")]
    NoData { series: String },
}

/// Stacking directive resolved from a descriptor's combine type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackMode {
    #[default]
    None,
    /// Shared stack group, values accumulate.
    Stack,
    /// Shared stack group, normalized so each X sums to 100.
    Percent,
    /// Independent baseline fill (area) or side-by-side grouping (bar).
    Side,
}

/// Which edge of the plot an axis renders on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// One resolved Y axis (X axis when the chart is axis-swapped).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisSpec {
    pub index: usize,
    /// Final title after overrides; empty when the placeholder default won.
    pub title: String,
    /// Pre-override title, kept so saved label-keyed overrides keep resolving.
    pub original_title: String,
    pub default_title: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub log_scale: bool,
    /// Axis title color; always equals the first member series' color.
    pub color: Rgb,
    pub side: AxisSide,
    /// Fractional position across the swapped side, multi-axis charts only.
    pub position: Option<f64>,
    pub domain: Option<(f64, f64)>,
}

/// Drilldown metadata for one chart point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrilldownEntry {
    pub id: i64,
    pub label: String,
}

/// Companion error-bar payload for a primary series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBars {
    /// `"Std Err: {formatted primary name}"`, pre-override.
    pub name: String,
    pub display_name: String,
    pub values: Vec<Option<f64>>,
    pub labels: Vec<String>,
    pub color: Rgb,
    pub visible: bool,
    /// Set when the primary series is hidden; the error entry then only
    /// appears in the legend.
    pub legend_only: bool,
    pub legend_rank: i64,
}

/// Companion fitted trend line for a primary series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendSeries {
    pub name: String,
    pub display_name: String,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub visible: bool,
    pub legend_rank: i64,
}

/// One fully resolved chart trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedSeries {
    /// Final display name after legend override.
    pub name: String,
    /// Formatted name before the legend override, the override lookup key.
    pub original_name: String,
    pub dataset_id: i64,
    pub axis_index: usize,
    pub display_type: DisplayType,
    pub stack: StackMode,
    pub color: Rgb,
    pub line_color: Rgb,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
    /// Per-slice colors, pie series only.
    pub slice_colors: Vec<Rgb>,
    pub drilldown: Vec<DrilldownEntry>,
    pub drillable: Vec<bool>,
    /// Per-point label text; empty when labels were not requested.
    pub value_labels: Vec<String>,
    pub line_type: String,
    pub line_width: f64,
    pub z_index: i64,
    pub legend_rank: i64,
    pub visible: bool,
    pub restricted_by_roles: bool,
    pub hide_markers: bool,
    pub error_bars: Option<ErrorBars>,
    pub trend: Option<TrendSeries>,
}

/// Mutable state for one chart build, created fresh per composer run.
pub struct BuildContext<'a> {
    pub request: &'a BuildRequest,
    /// Working copy of the canonical X axis; label merges mutate it.
    pub x_axis: XAxisData,
    pub datasets: BTreeMap<i64, RawDataset>,
    pub allocator: ColorAllocator,
    pub restrictions: RoleRestrictionNotices,
    pub legend_rank: i64,
    pub summarize: bool,
    pub limit: usize,
    pub multi_category: bool,
}

/// Encode one axis group: resolve the axis and build its traces in input
/// order. Per-series failures are logged and skipped.
pub fn encode_axis_group(
    ctx: &mut BuildContext<'_>,
    group: &AxisGrouping,
    axis_index: usize,
) -> (AxisSpec, Vec<EncodedSeries>) {
    let request = ctx.request;
    let first = &request.descriptors[group.members[0]];

    // The axis base color is drawn before any series so the axis title and
    // the first series always match.
    let (axis_color, _) = ctx.allocator.for_choice(first.color);

    let default_title = format!("yAxis{axis_index}");
    let base_title = axis_base_title(ctx, first);
    let mut title = if request.share_axis {
        default_title.clone()
    } else {
        base_title
    };
    let original_title = title.clone();

    let mut min = if first.log_scale { None } else { Some(0.0) };
    let mut max = None;
    let mut log_scale = first.log_scale;
    if let Some(ov) = request.axis_overrides.resolve(axis_index, &original_title) {
        if let Some(t) = &ov.title {
            title = t.clone();
        }
        if let Some(m) = ov.min {
            // Log axes cannot start at or below zero.
            min = if first.log_scale && m <= 0.0 { None } else { Some(m) };
        }
        if let Some(m) = ov.max {
            max = Some(m);
        }
        if let Some(scale) = ov.chart_type {
            log_scale = log_scale || scale == AxisScale::Log;
        }
    }
    if title == default_title {
        title.clear();
    }

    let axis = AxisSpec {
        index: axis_index,
        title,
        original_title,
        default_title,
        min,
        max,
        log_scale,
        color: axis_color,
        side: if axis_index % 2 == 1 { AxisSide::Right } else { AxisSide::Left },
        position: None,
        domain: None,
    };

    let mut series_out = Vec::new();
    for (member_index, &descriptor_index) in group.members.iter().enumerate() {
        let d = &request.descriptors[descriptor_index];
        let Some(mut dataset) = ctx.datasets.remove(&d.id) else {
            log::warn!(
                "skipping series: {}",
                SkipReason::MissingDataset {
                    id: d.id,
                    realm: d.realm.clone(),
                    metric: d.metric.clone(),
                }
            );
            continue;
        };
        if dataset.values.is_empty() {
            log::warn!(
                "skipping series: {}",
                SkipReason::NoData {
                    series: dataset.name.clone(),
                }
            );
            continue;
        }

        ctx.legend_rank += 2;
        let rank = ctx.legend_rank - 1;

        // First series of the group reuses the axis's designated color.
        let (color, line_color) = if member_index == 0 {
            (axis_color, alter_brightness(axis_color, -70.0))
        } else {
            ctx.allocator.for_choice(d.color)
        };

        let true_count = if dataset.true_count > 0 {
            dataset.true_count
        } else {
            dataset.value_count()
        };
        let mut summarized_now = false;
        if ctx.summarize && summarize::should_summarize(true_count, ctx.limit) {
            let use_average = !request.timeseries && !d.display_type.is_pie();
            let mut kind = AggregateKind::for_metric(&d.metric, use_average);
            if d.display_type.is_pie() && kind == AggregateKind::Mean {
                kind = AggregateKind::Sum;
            }
            if summarize::summarize(&mut dataset, ctx.limit, kind).is_some() {
                summarize::merge_x_labels(&dataset, &mut ctx.x_axis);
                summarized_now = true;
            }
        }

        let mut name = dataset.name.clone();
        if d.restricted_by_roles && request.show_warnings {
            name.push_str(&ctx.restrictions.register(&d.role_restrictions));
        }
        if ctx.multi_category {
            name = format!("{}: {}", d.category, name);
        }
        let formatted = format!("{}{}", name, d.filter_suffix());
        let display_name = request.legend_overrides.display_name(&formatted);
        let visible = series_visible(d, &formatted);

        let n = dataset.value_count();
        let mut x = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);
        let mut drilldown = Vec::with_capacity(n);
        let mut drillable = vec![true; n];
        let mut slice_colors = Vec::new();
        for i in 0..n {
            let label = dataset
                .x_value(i)
                .map(str::to_string)
                .or_else(|| ctx.x_axis.labels.get(i).cloned().flatten())
                .unwrap_or_default();
            y.push(dataset.values[i]);
            drilldown.push(DrilldownEntry {
                id: dataset.x_id(i).unwrap_or(0),
                label: label.clone(),
            });
            if d.display_type.is_pie() {
                slice_colors.push(if i == 0 {
                    axis_color
                } else {
                    ctx.allocator.next_color()
                });
            }
            x.push(label);
        }
        if summarized_now && n > 0 {
            drillable[n - 1] = false;
        }

        let value_labels = if d.display_type.is_pie() {
            pie_value_labels(d, &x, &y, dataset.decimals)
        } else {
            cartesian_value_labels(d, &dataset)
        };

        let stack = stack_mode(d);
        let error_bars = build_error_bars(ctx, d, &dataset, &formatted, line_color, visible, rank);
        let trend = build_trend_series(ctx, d, &dataset, &formatted, &x, rank);

        let hide_markers = d.display_type.is_line_family()
            && (n >= 32 || (group.members.len() > 1 && n >= 21));

        series_out.push(EncodedSeries {
            name: display_name,
            original_name: formatted,
            dataset_id: d.id,
            axis_index,
            display_type: d.display_type,
            stack,
            color,
            line_color,
            x,
            y,
            slice_colors,
            drilldown,
            drillable,
            value_labels,
            line_type: d.line_type.clone(),
            line_width: d.line_width,
            z_index: d.z_index.unwrap_or(member_index as i64),
            legend_rank: rank,
            visible,
            restricted_by_roles: d.restricted_by_roles,
            hide_markers,
            error_bars,
            trend,
        });
    }

    (axis, series_out)
}

/// Axis title before overrides: the unit when known, the series name
/// otherwise, with a `% of` prefix for percent-stacked groups.
fn axis_base_title(ctx: &BuildContext<'_>, first: &DataSeriesDescriptor) -> String {
    let base = ctx
        .datasets
        .get(&first.id)
        .map(|ds| {
            if ds.unit.is_empty() {
                ds.name.clone()
            } else {
                ds.unit.clone()
            }
        })
        .unwrap_or_else(|| first.metric.clone());
    if first.is_percent() {
        format!("% of {base}")
    } else {
        base
    }
}

fn stack_mode(d: &DataSeriesDescriptor) -> StackMode {
    if d.display_type == DisplayType::Line {
        return StackMode::None;
    }
    match d.combine_type {
        CombineType::Stack => StackMode::Stack,
        // Percent normalization cannot render on a log axis.
        CombineType::Percent if !d.log_scale => StackMode::Percent,
        CombineType::Side => StackMode::Side,
        _ => StackMode::None,
    }
}

fn build_error_bars(
    ctx: &BuildContext<'_>,
    d: &DataSeriesDescriptor,
    dataset: &RawDataset,
    formatted: &str,
    line_color: Rgb,
    primary_visible: bool,
    primary_rank: i64,
) -> Option<ErrorBars> {
    if !(d.std_err || d.std_err_labels) || d.display_type.is_pie() {
        return None;
    }
    // A log axis cannot represent the negative lower bound of an error bar.
    if d.log_scale {
        return None;
    }

    let n = dataset.value_count();
    let mut values = dataset.errors.clone();
    values.resize(n, None);
    let labels: Vec<String> = values
        .iter()
        .map(|e| format!("+/- {}", format_value(e.unwrap_or(0.0), dataset.sem_decimals)))
        .collect();

    let name = format!("Std Err: {formatted}");
    let display_name = ctx.request.legend_overrides.display_name(&name);
    let visible = series_visible(d, &name);

    Some(ErrorBars {
        name,
        display_name,
        values,
        labels,
        color: line_color,
        visible,
        legend_only: !primary_visible,
        legend_rank: primary_rank + 1,
    })
}

fn build_trend_series(
    ctx: &BuildContext<'_>,
    d: &DataSeriesDescriptor,
    dataset: &RawDataset,
    formatted: &str,
    x_labels: &[String],
    primary_rank: i64,
) -> Option<TrendSeries> {
    if !d.trend_line || d.display_type.is_pie() {
        return None;
    }
    let Some(fit) = trend::fit(&dataset.values) else {
        log::debug!("trend line skipped for {formatted:?}: fewer than 2 points");
        return None;
    };

    let mut x = Vec::new();
    let mut y = Vec::new();
    for (i, value) in dataset.values.iter().enumerate() {
        if value.is_none() {
            continue;
        }
        let predicted = fit.slope * i as f64 + fit.intercept;
        // Log scale cannot render non-positive points.
        if d.log_scale && predicted <= 0.0 {
            continue;
        }
        x.push(x_labels.get(i).cloned().unwrap_or_default());
        y.push(predicted);
    }

    let name = format!(
        "Trend Line: {} ({}), R-Squared={:.2}",
        formatted,
        fit.formula(),
        fit.r_squared
    );
    let display_name = ctx.request.legend_overrides.display_name(&name);
    let visible = series_visible(d, &name);

    Some(TrendSeries {
        name,
        display_name,
        slope: fit.slope,
        intercept: fit.intercept,
        r_squared: fit.r_squared,
        x,
        y,
        visible,
        legend_rank: primary_rank + 2,
    })
}

fn pie_value_labels(
    d: &DataSeriesDescriptor,
    x: &[String],
    y: &[Option<f64>],
    decimals: u32,
) -> Vec<String> {
    if !d.value_labels {
        return Vec::new();
    }
    let total: f64 = y.iter().flatten().sum();
    let mut allocated = 0;
    y.iter()
        .enumerate()
        .map(|(i, value)| {
            let v = value.unwrap_or(0.0);
            let big_enough = percent_share(v, total).is_some_and(|s| s >= PIE_LABEL_MIN_SHARE);
            if allocated < PIE_LABEL_LIMIT && big_enough {
                allocated += 1;
                format!("{}: {}", x[i], format_value(v, decimals))
            } else {
                String::new()
            }
        })
        .collect()
}

fn cartesian_value_labels(d: &DataSeriesDescriptor, dataset: &RawDataset) -> Vec<String> {
    if !(d.value_labels || d.std_err_labels) {
        return Vec::new();
    }
    (0..dataset.value_count())
        .map(|i| {
            let value = dataset.values[i].map(|v| format_value(v, dataset.decimals));
            let error = dataset
                .errors
                .get(i)
                .copied()
                .flatten()
                .map(|e| format!("+/- {}", format_value(e, dataset.sem_decimals)));
            match (d.value_labels, d.std_err_labels) {
                (true, true) => match (value, error) {
                    (Some(v), Some(e)) => format!("{v} [{e}]"),
                    (Some(v), None) => v,
                    (None, Some(e)) => e,
                    (None, None) => String::new(),
                },
                (true, false) => value.unwrap_or_default(),
                (false, true) => error.unwrap_or_default(),
                (false, false) => String::new(),
            }
        })
        .collect()
}

/// Percent share of `value` in `total`; `None` when the total is zero, so a
/// degenerate distribution yields an empty label instead of a division error.
fn percent_share(value: f64, total: f64) -> Option<f64> {
    if total == 0.0 {
        None
    } else {
        Some(value / total * 100.0)
    }
}

/// Format a value with thousands separators and fixed decimals (`30,000.5`).
pub fn format_value(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let rendered = format!("{:.*}", decimals as usize, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (rendered, None),
    };
    let grouped = int_part
        .parse::<u64>()
        .map(|v| v.to_formatted_string(&Locale::en))
        .unwrap_or(int_part);
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(&f);
    }
    out
}
