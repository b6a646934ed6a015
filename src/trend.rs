//! Ordinary least-squares trend estimation over a series' non-null values.
//!
//! The point index, not the timestamp, is the independent variable, so the
//! fit is invariant to aggregation-unit spacing (day vs. month vs. quarter).

/// Fitted line parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl TrendLine {
    /// Formula text embedded in the trend series' legend label, e.g.
    /// `"2.00x +1.00"`. Slopes that round to 0.00 get a third decimal.
    pub fn formula(&self) -> String {
        let slope = if format!("{:.2}", self.slope) == "0.00"
            || format!("{:.2}", self.slope) == "-0.00"
        {
            format!("{:.3}", self.slope)
        } else {
            format!("{:.2}", self.slope)
        };
        let sign = if self.intercept > 0.0 { "+" } else { "" };
        format!("{}x {}{:.2}", slope, sign, self.intercept)
    }
}

/// Fit y = slope * index + intercept over the non-null values, where each
/// value's x coordinate is its index in the series. Returns `None` when
/// fewer than two non-null points exist or the fit is degenerate.
pub fn fit(values: &[Option<f64>]) -> Option<TrendLine> {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|y| (i as f64, y)))
        .collect();
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (x, y) in &points {
        sxx += (x - mean_x) * (x - mean_x);
        syy += (y - mean_y) * (y - mean_y);
        sxy += (x - mean_x) * (y - mean_y);
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    // A flat series is fit exactly by its own mean line.
    let r_squared = if syy == 0.0 {
        1.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };

    Some(TrendLine {
        slope,
        intercept,
        r_squared,
    })
}
