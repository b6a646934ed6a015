use crate::color::ColorChoice;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a single data series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayType {
    Line,
    Bar,
    HBar,
    Pie,
    Scatter,
    Area,
    Spline,
    #[serde(rename = "areaspline")]
    AreaSpline,
    Column,
}

impl DisplayType {
    pub fn is_pie(&self) -> bool {
        matches!(self, DisplayType::Pie)
    }

    /// Bar-family types render as bars regardless of orientation.
    pub fn is_bar_family(&self) -> bool {
        matches!(self, DisplayType::Bar | DisplayType::HBar | DisplayType::Column)
    }

    pub fn is_area_family(&self) -> bool {
        matches!(self, DisplayType::Area | DisplayType::AreaSpline)
    }

    /// Types subject to the dense-chart marker-hiding heuristic.
    pub fn is_line_family(&self) -> bool {
        matches!(
            self,
            DisplayType::Line | DisplayType::Spline | DisplayType::Area | DisplayType::AreaSpline
        )
    }
}

/// How multiple series sharing a category combine on the chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineType {
    #[default]
    None,
    Stack,
    Percent,
    Side,
}

/// One applied dimension filter, carried for display purposes only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub dimension: String,
    pub value_id: String,
    pub value_name: String,
}

/// Parameters describing a role-based restriction applied to a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRestriction {
    /// Dimension names the viewer's access is limited to (e.g. "resources").
    pub dimensions: Vec<String>,
}

/// One requested data series: metric identity, grouping, and display
/// configuration. Immutable once submitted for a chart build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSeriesDescriptor {
    pub id: i64,
    pub realm: String,
    pub metric: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub group_by: String,
    #[serde(default)]
    pub group_by_label: String,
    #[serde(default)]
    pub filters: Vec<Filter>,
    pub display_type: DisplayType,
    #[serde(default)]
    pub combine_type: CombineType,
    #[serde(default)]
    pub color: ColorChoice,
    #[serde(default)]
    pub log_scale: bool,
    #[serde(default)]
    pub std_err: bool,
    #[serde(default)]
    pub std_err_labels: bool,
    #[serde(default)]
    pub value_labels: bool,
    #[serde(default = "default_line_type")]
    pub line_type: String,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    /// Per-series visibility toggles keyed by the fully formatted display name.
    #[serde(default)]
    pub visibility: BTreeMap<String, bool>,
    #[serde(default)]
    pub z_index: Option<i64>,
    #[serde(default)]
    pub trend_line: bool,
    #[serde(default)]
    pub restricted_by_roles: bool,
    #[serde(default)]
    pub role_restrictions: Vec<RoleRestriction>,
}

fn default_line_type() -> String {
    "Solid".to_string()
}

fn default_line_width() -> f64 {
    2.0
}

impl DataSeriesDescriptor {
    /// Percent stacking is only honored on linear axes.
    pub fn is_percent(&self) -> bool {
        self.combine_type == CombineType::Percent
    }

    /// Human-readable suffix describing the applied filters, appended to the
    /// formatted series name (empty when no filters are set).
    pub fn filter_suffix(&self) -> String {
        if self.filters.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self
            .filters
            .iter()
            .map(|f| format!("{}: {}", f.dimension, f.value_name))
            .collect();
        format!(" ({})", parts.join(", "))
    }
}

/// Per-descriptor numeric payload returned by the dataset collaborator.
///
/// X labels are nullable because merging a truncated series against the
/// canonical X axis can leave holes that are backfilled later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDataset {
    /// Id of the descriptor this dataset answers.
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub x_labels: Vec<Option<String>>,
    #[serde(default)]
    pub x_ids: Vec<i64>,
    pub values: Vec<Option<f64>>,
    #[serde(default)]
    pub errors: Vec<Option<f64>>,
    /// Unique category count before any query limit was applied; drives paging.
    #[serde(default)]
    pub true_count: usize,
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    #[serde(default)]
    pub sem_decimals: u32,
    /// Set once the series has been truncated to top-N plus remainder.
    #[serde(default)]
    pub summarized: bool,
}

fn default_decimals() -> u32 {
    1
}

impl RawDataset {
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn x_value(&self, index: usize) -> Option<&str> {
        self.x_labels.get(index).and_then(|l| l.as_deref())
    }

    pub fn x_id(&self, index: usize) -> Option<i64> {
        self.x_ids.get(index).copied()
    }
}

/// Canonical ordered X axis returned by the dataset collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XAxisData {
    #[serde(default)]
    pub title: String,
    pub labels: Vec<Option<String>>,
    #[serde(default)]
    pub ids: Vec<i64>,
    /// Total category count across all pages; frozen before summarization.
    #[serde(default)]
    pub total: usize,
}

/// Whether an axis renders on a linear or logarithmic scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    Linear,
    Log,
}

/// A user override for one rendered axis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AxisOverride {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub chart_type: Option<AxisScale>,
}

/// Axis overrides keyed either by `original{index}` (current format) or by
/// the original axis label text (legacy saved configurations).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisOverrides(pub BTreeMap<String, AxisOverride>);

/// A user override for one legend entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegendOverride {
    #[serde(default)]
    pub title: Option<String>,
}

/// Legend overrides keyed by the fully formatted series name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegendOverrides(pub BTreeMap<String, LegendOverride>);

/// Everything one chart build consumes. Descriptors and datasets arrive from
/// the (external) query layer fully materialized; `datasets` is matched to
/// `descriptors` by descriptor id.
///
/// When `summarize` may fire, datasets are expected unpaged (all categories
/// present); truncation to top-N plus remainder happens here, not in the
/// query layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub descriptors: Vec<DataSeriesDescriptor>,
    pub datasets: Vec<RawDataset>,
    pub x_axis: Option<XAxisData>,
    #[serde(default)]
    pub axis_overrides: AxisOverrides,
    #[serde(default)]
    pub legend_overrides: LegendOverrides,
    #[serde(default)]
    pub show_filters: bool,
    /// Human-readable descriptions of chart-wide filters, for the subtitle.
    #[serde(default)]
    pub global_filters: Vec<String>,
    #[serde(default)]
    pub font_size: i32,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Paging offset already applied by the dataset layer; recorded only.
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub summarize: bool,
    #[serde(default)]
    pub share_axis: bool,
    #[serde(default = "default_true")]
    pub has_legend: bool,
    #[serde(default)]
    pub swap_xy: bool,
    #[serde(default = "default_true")]
    pub show_warnings: bool,
    /// Time-series builds choose the remainder aggregate from the metric
    /// name; aggregate builds average for any non-pie series.
    #[serde(default)]
    pub timeseries: bool,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

fn default_true() -> bool {
    true
}
