use crate::compose::ChartSpec;
use anyhow::Result;
use csv::WriterBuilder;
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save a resolved chart model as pretty JSON.
pub fn save_spec_json<P: AsRef<Path>>(spec: &ChartSpec, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(spec)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save a rendered backend configuration as pretty JSON.
pub fn save_rendered_json<P: AsRef<Path>>(rendered: &Value, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(rendered)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save chart traces as CSV with header, one row per (series, point).
pub fn save_traces_csv<P: AsRef<Path>>(spec: &ChartSpec, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("series", "axis", "x", "y", "error", "visible"))?;
    for series in &spec.series {
        for (i, y) in series.y.iter().enumerate() {
            let error = series
                .error_bars
                .as_ref()
                .and_then(|e| e.values.get(i).copied().flatten());
            wtr.serialize((
                &series.name,
                series.axis_index,
                series.x.get(i).map(String::as_str).unwrap_or(""),
                y,
                error,
                series.visible,
            ))?;
        }
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::XAxisSpec;
    use crate::encode::{EncodedSeries, StackMode};
    use crate::color::Rgb;
    use crate::models::DisplayType;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn spec_with_one_series() -> ChartSpec {
        ChartSpec {
            title: "CPU Hours".into(),
            subtitle: String::new(),
            x_axis: XAxisSpec {
                title: "Resource".into(),
                labels: vec!["alpha".into(), "beta".into()],
                ids: vec![1, 2],
            },
            axes: Vec::new(),
            series: vec![EncodedSeries {
                name: "CPU Hours: Total".into(),
                original_name: "CPU Hours: Total".into(),
                dataset_id: 1,
                axis_index: 0,
                display_type: DisplayType::Bar,
                stack: StackMode::None,
                color: Rgb::from_u32(0x1199FF),
                line_color: Rgb::from_u32(0x0A5C99),
                x: vec!["alpha".into(), "beta".into()],
                y: vec![Some(10.0), None],
                slice_colors: Vec::new(),
                drilldown: Vec::new(),
                drillable: vec![true, true],
                value_labels: Vec::new(),
                line_type: "Solid".into(),
                line_width: 2.0,
                z_index: 0,
                legend_rank: 2,
                visible: true,
                restricted_by_roles: false,
                hide_markers: false,
                error_bars: None,
                trend: None,
            }],
            dimensions: BTreeMap::new(),
            metrics: BTreeMap::new(),
            total: 2,
            restriction_warnings: Vec::new(),
            swap_xy: false,
            category_axis_domain: None,
            font_size: 0,
        }
    }

    #[test]
    fn write_json_and_csv() {
        let dir = tempdir().unwrap();
        let jsonp = dir.path().join("chart.json");
        let csvp = dir.path().join("chart.csv");
        let spec = spec_with_one_series();
        save_spec_json(&spec, &jsonp).unwrap();
        save_traces_csv(&spec, &csvp).unwrap();
        assert!(jsonp.exists());
        let body = std::fs::read_to_string(&csvp).unwrap();
        assert!(body.starts_with("series,axis,x,y,error,visible"));
        assert!(body.contains("CPU Hours: Total,0,alpha,10.0,,true"));
    }

    #[test]
    fn round_trips_through_serde() {
        let spec = spec_with_one_series();
        let text = serde_json::to_string(&spec).unwrap();
        let back: ChartSpec = serde_json::from_str(&text).unwrap();
        assert_eq!(back.series.len(), 1);
        assert_eq!(back.series[0].y, vec![Some(10.0), None]);
    }
}
