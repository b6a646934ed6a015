use metricharts::trend::{TrendLine, fit};

#[test]
fn perfect_line_recovers_slope_and_intercept() {
    let line = fit(&[Some(1.0), Some(3.0), Some(5.0)]).unwrap();
    assert!((line.slope - 2.0).abs() < 1e-12);
    assert!((line.intercept - 1.0).abs() < 1e-12);
    assert!((line.r_squared - 1.0).abs() < 1e-12);
}

#[test]
fn nulls_keep_their_index_positions() {
    // Points (0,1) and (2,5): the gap at index 1 still counts as distance.
    let line = fit(&[Some(1.0), None, Some(5.0)]).unwrap();
    assert!((line.slope - 2.0).abs() < 1e-12);
    assert!((line.intercept - 1.0).abs() < 1e-12);
}

#[test]
fn fewer_than_two_points_is_no_fit() {
    assert!(fit(&[]).is_none());
    assert!(fit(&[Some(4.0)]).is_none());
    assert!(fit(&[Some(4.0), None, None]).is_none());
}

#[test]
fn flat_series_fits_its_own_mean() {
    let line = fit(&[Some(5.0), Some(5.0), Some(5.0)]).unwrap();
    assert_eq!(line.slope, 0.0);
    assert_eq!(line.intercept, 5.0);
    assert_eq!(line.r_squared, 1.0);
}

#[test]
fn noisy_series_reports_partial_r_squared() {
    let line = fit(&[Some(1.0), Some(4.0), Some(3.0), Some(8.0)]).unwrap();
    assert!(line.slope > 0.0);
    assert!(line.r_squared > 0.0 && line.r_squared < 1.0);
}

#[test]
fn formula_formats_slope_sign_and_precision() {
    let line = TrendLine { slope: 2.0, intercept: 1.0, r_squared: 1.0 };
    assert_eq!(line.formula(), "2.00x +1.00");

    let line = TrendLine { slope: 2.0, intercept: -1.0, r_squared: 1.0 };
    assert_eq!(line.formula(), "2.00x -1.00");

    let line = TrendLine { slope: 2.0, intercept: 0.0, r_squared: 1.0 };
    assert_eq!(line.formula(), "2.00x 0.00");

    // Slopes that would print as 0.00 pick up a third decimal.
    let line = TrendLine { slope: 0.001, intercept: 3.0, r_squared: 0.5 };
    assert_eq!(line.formula(), "0.001x +3.00");
}
