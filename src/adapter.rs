//! Render adapters: translate a resolved [`ChartSpec`] into the concrete
//! JSON layout a charting backend expects.
//!
//! Adapters only rename and rearrange. Every number, label, color, and
//! ordering decision is already final in the [`ChartSpec`]; an adapter that
//! computes anything new is a bug.

use crate::compose::ChartSpec;
use crate::encode::{AxisSide, AxisSpec, EncodedSeries, StackMode};
use crate::models::DisplayType;
use serde_json::{Map, Value, json};

/// A chart backend target.
pub trait RenderAdapter {
    /// The backend's name, for logging and CLI selection.
    fn name(&self) -> &'static str;

    /// Render the chart as the backend's native JSON configuration.
    fn render(&self, spec: &ChartSpec) -> Value;
}

/// Wrap a rendered chart in the store envelope the chart browser consumes.
pub fn export_json_store(spec: &ChartSpec, adapter: &dyn RenderAdapter) -> Value {
    json!({
        "totalCount": spec.total,
        "success": true,
        "message": "success",
        "data": [adapter.render(spec)],
    })
}

/// Plotly-flavored output: traces plus a `layout` object, numbered
/// `yaxis`/`yaxis2`/... axes, stack groups on the traces.
pub struct PlotlyAdapter;

impl RenderAdapter for PlotlyAdapter {
    fn name(&self) -> &'static str {
        "plotly"
    }

    fn render(&self, spec: &ChartSpec) -> Value {
        let mut layout = Map::new();
        layout.insert("title".into(), json!({ "text": spec.title }));
        if !spec.subtitle.is_empty() {
            layout.insert("subtitle".into(), json!({ "text": spec.subtitle }));
        }
        layout.insert(
            "font".into(),
            json!({ "size": spec.font_size + 12 }),
        );

        let mut category_axis = json!({
            "title": { "text": spec.x_axis.title },
            "type": "category",
            "categoryarray": spec.x_axis.labels,
            "categoryorder": "array",
        });
        if let Some((lo, hi)) = spec.category_axis_domain {
            category_axis["domain"] = json!([lo, hi]);
            category_axis["autorange"] = json!("reversed");
        }
        // Swapping moves the category axis to the vertical slot.
        let category_key = if spec.swap_xy { "yaxis" } else { "xaxis" };
        layout.insert(category_key.into(), category_axis);

        for axis in &spec.axes {
            layout.insert(value_axis_key(spec, axis.index), plotly_axis(spec, axis));
        }
        // Plotly ignores stackgroup on bar traces; bars stack via the layout.
        let bar_stack = |mode: StackMode| {
            spec.series
                .iter()
                .any(|s| s.stack == mode && s.display_type.is_bar_family())
        };
        if bar_stack(StackMode::Percent) {
            layout.insert("barmode".into(), json!("stack"));
            layout.insert("barnorm".into(), json!("percent"));
        } else if bar_stack(StackMode::Stack) {
            layout.insert("barmode".into(), json!("stack"));
        } else if bar_stack(StackMode::Side) {
            layout.insert("barmode".into(), json!("group"));
        }

        let mut traces = Vec::new();
        for series in &spec.series {
            traces.push(plotly_trace(spec, series));
            if let Some(err) = &series.error_bars {
                // Hidden primaries still advertise their error series in the
                // legend through a data-less entry.
                if err.legend_only {
                    traces.push(json!({
                        "name": err.display_name,
                        "type": "scatter",
                        "x": [],
                        "y": [],
                        "marker": { "color": err.color.hex() },
                        "legendrank": err.legend_rank,
                        "visible": "legendonly",
                    }));
                }
            }
            if let Some(trend) = &series.trend {
                let (x, y) = if spec.swap_xy {
                    (json!(trend.y), json!(trend.x))
                } else {
                    (json!(trend.x), json!(trend.y))
                };
                traces.push(json!({
                    "name": trend.display_name,
                    "type": "scatter",
                    "mode": "lines",
                    "x": x,
                    "y": y,
                    "line": { "dash": "dot", "color": series.line_color.hex() },
                    "legendrank": trend.legend_rank,
                    "visible": if trend.visible { json!(true) } else { json!("legendonly") },
                }));
            }
        }

        json!({
            "chart_title": spec.title,
            "data": traces,
            "layout": Value::Object(layout),
            "dimensions": spec.dimensions,
            "metrics": spec.metrics,
            "restriction_warnings": spec.restriction_warnings,
        })
    }
}

fn value_axis_key(spec: &ChartSpec, index: usize) -> String {
    let base = if spec.swap_xy { "xaxis" } else { "yaxis" };
    if index == 0 {
        base.to_string()
    } else {
        format!("{base}{}", index + 1)
    }
}

/// The `yaxis`/`xaxis` reference a trace carries ("y", "y2", ...).
fn trace_axis_ref(spec: &ChartSpec, index: usize) -> String {
    let base = if spec.swap_xy { "x" } else { "y" };
    if index == 0 {
        base.to_string()
    } else {
        format!("{base}{}", index + 1)
    }
}

fn plotly_axis(spec: &ChartSpec, axis: &AxisSpec) -> Value {
    let mut out = json!({
        "title": {
            "text": axis.title,
            "font": { "color": axis.color.hex() },
        },
        "otitle": axis.original_title,
        "dtitle": axis.default_title,
        "type": if axis.log_scale { "log" } else { "linear" },
        "side": axis_side_name(axis.side),
        "overlaying": if axis.index > 0 { json!(if spec.swap_xy { "x" } else { "y" }) } else { Value::Null },
    });
    if axis.min.is_some() || axis.max.is_some() {
        out["range"] = json!([axis.min, axis.max]);
    }
    if let Some(position) = axis.position {
        out["position"] = json!(position);
        out["anchor"] = json!("free");
    }
    if let Some((lo, hi)) = axis.domain {
        out["domain"] = json!([lo, hi]);
    }
    out
}

fn axis_side_name(side: AxisSide) -> &'static str {
    match side {
        AxisSide::Left => "left",
        AxisSide::Right => "right",
        AxisSide::Top => "top",
        AxisSide::Bottom => "bottom",
    }
}

fn plotly_trace(spec: &ChartSpec, series: &EncodedSeries) -> Value {
    if series.display_type.is_pie() {
        return json!({
            "name": series.name,
            "otitle": series.original_name,
            "type": "pie",
            "labels": series.x,
            "values": series.y,
            "text": series.value_labels,
            "marker": { "colors": series.slice_colors.iter().map(|c| c.hex()).collect::<Vec<_>>() },
            "drilldown": series.drilldown,
            "legendrank": series.legend_rank,
            "visible": if series.visible { json!(true) } else { json!("legendonly") },
        });
    }

    let (x, y) = if spec.swap_xy {
        (json!(series.y), json!(series.x))
    } else {
        (json!(series.x), json!(series.y))
    };
    let mut trace = json!({
        "name": series.name,
        "otitle": series.original_name,
        "datasetId": series.dataset_id,
        "x": x,
        "y": y,
        "drilldown": series.drilldown,
        "drillable": series.drillable,
        "marker": { "color": series.color.hex() },
        "line": {
            "color": series.line_color.hex(),
            "width": series.line_width,
            "dash": dash_style(&series.line_type),
        },
        "zIndex": series.z_index,
        "legendrank": series.legend_rank,
        "visible": if series.visible { json!(true) } else { json!("legendonly") },
    });
    trace["type"] = json!(if series.display_type.is_bar_family() {
        "bar"
    } else {
        "scatter"
    });
    if series.display_type.is_bar_family() && spec.swap_xy {
        trace["orientation"] = json!("h");
    }
    if !series.display_type.is_bar_family() {
        let mode = if series.hide_markers { "lines" } else { "lines+markers" };
        trace["mode"] = json!(mode);
    }
    if series.display_type.is_area_family() {
        trace["fill"] = json!(match (series.stack == StackMode::Side, spec.swap_xy) {
            (true, false) => "tozeroy",
            (true, true) => "tozerox",
            (false, false) => "tonexty",
            (false, true) => "tonextx",
        });
    }
    match series.stack {
        StackMode::Stack => {
            trace["stackgroup"] = json!("one");
        }
        StackMode::Percent => {
            trace["stackgroup"] = json!("one");
            trace["groupnorm"] = json!("percent");
        }
        _ => {}
    }
    if !series.value_labels.is_empty() {
        trace["text"] = json!(series.value_labels);
        trace["textposition"] = json!("top center");
    }
    if let Some(err) = &series.error_bars
        && !err.legend_only
        && err.visible
    {
        let key = if spec.swap_xy { "error_x" } else { "error_y" };
        trace[key] = json!({
            "type": "data",
            "array": err.values,
            "color": err.color.hex(),
            "visible": true,
        });
        trace["error_labels"] = json!(err.labels);
    }
    trace[if spec.swap_xy { "xaxis" } else { "yaxis" }] = json!(trace_axis_ref(spec, series.axis_index));
    trace
}

fn dash_style(line_type: &str) -> &'static str {
    match line_type {
        "Dash" | "dash" => "dash",
        "Dot" | "dot" => "dot",
        "DashDot" | "dashdot" => "dashdot",
        "LongDash" | "longdash" => "longdash",
        "ShortDot" | "shortdot" => "dot",
        _ => "solid",
    }
}

/// Highcharts-flavored output: `series` array with `yAxis` indices, category
/// labels on the shared `xAxis`, stacking set per series.
pub struct HighchartsAdapter;

impl RenderAdapter for HighchartsAdapter {
    fn name(&self) -> &'static str {
        "highcharts"
    }

    fn render(&self, spec: &ChartSpec) -> Value {
        let y_axis: Vec<Value> = spec.axes.iter().map(|a| highcharts_axis(a)).collect();

        let mut series = Vec::new();
        for s in &spec.series {
            series.push(highcharts_series(spec, s));
            if let Some(err) = &s.error_bars {
                series.push(json!({
                    "name": err.display_name,
                    "type": "errorbar",
                    "yAxis": s.axis_index,
                    "data": err.values,
                    "color": err.color.hex(),
                    "visible": err.visible && !err.legend_only,
                    "showInLegend": true,
                    "legendIndex": err.legend_rank,
                }));
            }
            if let Some(trend) = &s.trend {
                series.push(json!({
                    "name": trend.display_name,
                    "type": "line",
                    "yAxis": s.axis_index,
                    "data": trend.x.iter().zip(&trend.y)
                        .map(|(label, value)| json!({ "name": label, "y": value }))
                        .collect::<Vec<_>>(),
                    "dashStyle": "Dot",
                    "visible": trend.visible,
                    "legendIndex": trend.legend_rank,
                }));
            }
        }

        json!({
            "chart": {
                "inverted": spec.swap_xy,
                "style": { "fontSize": spec.font_size + 12 },
            },
            "title": { "text": spec.title },
            "subtitle": { "text": spec.subtitle },
            "xAxis": {
                "title": { "text": spec.x_axis.title },
                "categories": spec.x_axis.labels,
            },
            "yAxis": y_axis,
            "series": series,
            "dimensions": spec.dimensions,
            "metrics": spec.metrics,
            "restriction_warnings": spec.restriction_warnings,
        })
    }
}

fn highcharts_axis(axis: &AxisSpec) -> Value {
    json!({
        "title": {
            "text": axis.title,
            "style": { "color": axis.color.hex() },
        },
        "otitle": axis.original_title,
        "dtitle": axis.default_title,
        "min": axis.min,
        "max": axis.max,
        "type": if axis.log_scale { "logarithmic" } else { "linear" },
        "opposite": axis.side == AxisSide::Right,
        "index": axis.index,
    })
}

fn highcharts_series(spec: &ChartSpec, series: &EncodedSeries) -> Value {
    if series.display_type.is_pie() {
        let data: Vec<Value> = series
            .x
            .iter()
            .enumerate()
            .map(|(i, label)| {
                json!({
                    "name": label,
                    "y": series.y[i],
                    "color": series.slice_colors.get(i).map(|c| c.hex()),
                    "drilldown": series.drilldown.get(i),
                })
            })
            .collect();
        return json!({
            "name": series.name,
            "otitle": series.original_name,
            "type": "pie",
            "data": data,
            "visible": series.visible,
            "legendIndex": series.legend_rank,
        });
    }

    let mut out = json!({
        "name": series.name,
        "otitle": series.original_name,
        "datasetId": series.dataset_id,
        "type": highcharts_type(series.display_type),
        "yAxis": series.axis_index,
        "data": series.y,
        "color": series.color.hex(),
        "lineColor": series.line_color.hex(),
        "lineWidth": series.line_width,
        "dashStyle": series.line_type,
        "zIndex": series.z_index,
        "visible": series.visible,
        "legendIndex": series.legend_rank,
        "drilldown": series.drilldown,
    });
    match series.stack {
        StackMode::Stack => out["stacking"] = json!("normal"),
        StackMode::Percent => out["stacking"] = json!("percent"),
        _ => {}
    }
    if series.hide_markers {
        out["marker"] = json!({ "enabled": false });
    }
    if !series.value_labels.is_empty() {
        out["dataLabels"] = json!({ "enabled": true, "labels": series.value_labels });
    }
    out
}

fn highcharts_type(display: DisplayType) -> &'static str {
    match display {
        DisplayType::Line => "line",
        DisplayType::Spline => "spline",
        DisplayType::Area => "area",
        DisplayType::AreaSpline => "areaspline",
        DisplayType::Bar | DisplayType::HBar | DisplayType::Column => "column",
        DisplayType::Scatter => "scatter",
        DisplayType::Pie => "pie",
    }
}
