//! Top-level chart composition: axis grouping, per-axis series encoding,
//! and final chart assembly.
//!
//! One [`ChartComposer::build`] call fully resolves a [`BuildRequest`] into
//! a [`ChartSpec`] with no shared state: the color allocator, legend-rank
//! counter, and restriction registry all live in a per-build context, so
//! concurrent builds cannot perturb each other's color sequences.

use crate::axis;
use crate::color::ColorAllocator;
use crate::encode::{self, AxisSide, AxisSpec, BuildContext, EncodedSeries};
use crate::models::{BuildRequest, RawDataset, XAxisData};
use crate::restrictions::RoleRestrictionNotices;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Default display limit when the request does not set one.
const DEFAULT_LIMIT: usize = 10;

/// Fractional height consumed by each extra axis when the chart is
/// axis-swapped and value axes stack vertically.
const SWAP_AXIS_STEP: f64 = 0.115;

/// A structural failure that aborts the whole build.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("missing X axis data; nothing can render without it")]
    MissingXAxis,
}

/// The resolved category (X) axis of the chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XAxisSpec {
    pub title: String,
    pub labels: Vec<String>,
    pub ids: Vec<i64>,
}

/// Root output: a fully resolved, backend-agnostic chart model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub subtitle: String,
    pub x_axis: XAxisSpec,
    pub axes: Vec<AxisSpec>,
    pub series: Vec<EncodedSeries>,
    /// Dimension name -> display label, for captioning.
    pub dimensions: BTreeMap<String, String>,
    /// Metric name -> description, for captioning.
    pub metrics: BTreeMap<String, String>,
    /// Category count used for paging; 1 disables paging entirely.
    pub total: usize,
    pub restriction_warnings: Vec<String>,
    pub swap_xy: bool,
    /// Domain of the category axis across the swapped side, when swapped.
    pub category_axis_domain: Option<(f64, f64)>,
    pub font_size: i32,
}

/// Composes one chart build. Cheap to construct; all state is created
/// inside [`build`](Self::build).
pub struct ChartComposer<'a> {
    request: &'a BuildRequest,
}

impl<'a> ChartComposer<'a> {
    pub fn new(request: &'a BuildRequest) -> Self {
        Self { request }
    }

    pub fn build(&self) -> Result<ChartSpec, ComposeError> {
        let request = self.request;
        let x_axis: XAxisData = request.x_axis.clone().ok_or(ComposeError::MissingXAxis)?;

        let mut categories: Vec<&str> = request
            .descriptors
            .iter()
            .map(|d| d.category.as_str())
            .collect();
        categories.sort_unstable();
        categories.dedup();
        let multi_category = categories.len() > 1;

        // Paging total is frozen before any summarization mutates datasets.
        let mut total = if x_axis.total > 0 {
            x_axis.total
        } else {
            x_axis.labels.len()
        };

        // Any pie series forces the whole build into summarization: pies
        // cannot page, so the category count collapses to a single page.
        let mut summarize = request.summarize;
        if !summarize
            && request
                .descriptors
                .iter()
                .any(|d| d.display_type.is_pie())
        {
            log::debug!("pie series present; summarizing all series and disabling paging");
            summarize = true;
            total = 1;
        }

        let datasets: BTreeMap<i64, RawDataset> = request
            .datasets
            .iter()
            .map(|ds| (ds.id, ds.clone()))
            .collect();
        let units: Vec<&str> = request
            .descriptors
            .iter()
            .map(|d| datasets.get(&d.id).map(|ds| ds.unit.as_str()).unwrap_or(""))
            .collect();
        let groups = axis::group_axes(
            &request.descriptors,
            &units,
            request.share_axis,
            request.has_legend,
        );

        let mut ctx = BuildContext {
            request,
            x_axis,
            datasets,
            allocator: ColorAllocator::new(),
            restrictions: RoleRestrictionNotices::new(),
            legend_rank: 1,
            summarize,
            limit: request.limit.unwrap_or(DEFAULT_LIMIT),
            multi_category,
        };

        let mut axes = Vec::with_capacity(groups.len());
        let mut series = Vec::new();
        for (axis_index, group) in groups.iter().enumerate() {
            let (axis, mut encoded) = encode::encode_axis_group(&mut ctx, group, axis_index);
            axes.push(axis);
            series.append(&mut encoded);
        }

        let category_axis_domain = if request.swap_xy {
            Some(apply_swap_layout(&mut axes))
        } else {
            None
        };

        let restriction_warnings = if request.show_warnings {
            ctx.restrictions.strings()
        } else {
            Vec::new()
        };

        let mut subtitle = if request.show_filters && !request.global_filters.is_empty() {
            let mut unique: Vec<&str> = Vec::new();
            for f in &request.global_filters {
                if !unique.contains(&f.as_str()) {
                    unique.push(f);
                }
            }
            unique.join(" -- ")
        } else {
            request.subtitle.clone()
        };
        if subtitle.is_empty()
            && let (Some(start), Some(end)) = (request.start_date, request.end_date)
        {
            subtitle = format!("{start} to {end}");
        }

        // A chart with only a subtitle promotes it to the headline.
        let mut title = request.title.clone();
        if title.is_empty() && !subtitle.is_empty() {
            title = std::mem::take(&mut subtitle);
        }

        let mut dimensions = BTreeMap::new();
        let mut metrics = BTreeMap::new();
        for d in &request.descriptors {
            if !d.group_by.is_empty() {
                let label = if d.group_by_label.is_empty() {
                    d.group_by.clone()
                } else {
                    d.group_by_label.clone()
                };
                dimensions.insert(d.group_by.clone(), label);
            }
        }
        for ds in &request.datasets {
            metrics.insert(ds.name.clone(), ds.description.clone());
        }

        let x_title = if ctx.x_axis.title.is_empty() {
            request
                .descriptors
                .first()
                .map(|d| {
                    if d.group_by_label.is_empty() {
                        d.group_by.clone()
                    } else {
                        d.group_by_label.clone()
                    }
                })
                .unwrap_or_default()
        } else {
            ctx.x_axis.title.clone()
        };

        Ok(ChartSpec {
            title,
            subtitle,
            x_axis: XAxisSpec {
                title: x_title,
                labels: ctx
                    .x_axis
                    .labels
                    .iter()
                    .map(|l| l.clone().unwrap_or_default())
                    .collect(),
                ids: ctx.x_axis.ids.clone(),
            },
            axes,
            series,
            dimensions,
            metrics,
            total,
            restriction_warnings,
            swap_xy: request.swap_xy,
            category_axis_domain,
            font_size: request.font_size,
        })
    }
}

/// Compose a chart in one call.
pub fn compose(request: &BuildRequest) -> Result<ChartSpec, ComposeError> {
    ChartComposer::new(request).build()
}

/// Re-position value axes for a horizontal (axis-swapped) chart: they move
/// to the top/bottom edges, alternating, each claiming a fixed fraction of
/// the vertical range. Returns the remaining domain left for the category
/// axis.
fn apply_swap_layout(axes: &mut [AxisSpec]) -> (f64, f64) {
    let count = axes.len();
    let half_up = count.div_ceil(2);
    let half_down = count / 2;

    for axis in axes.iter_mut() {
        let index = axis.index;
        if index % 2 == 1 {
            axis.side = AxisSide::Top;
            let shift = (half_down - index / 2) as f64;
            axis.position = Some((1.0 - SWAP_AXIS_STEP * shift).min(1.0));
        } else {
            axis.side = AxisSide::Bottom;
            let shift = (half_up - index.div_ceil(2)) as f64;
            axis.position = Some((SWAP_AXIS_STEP * shift).max(0.0));
        }
        axis.domain = Some((0.0, 1.0));
    }

    (
        SWAP_AXIS_STEP * half_up as f64,
        1.0 - SWAP_AXIS_STEP * half_down as f64,
    )
}
