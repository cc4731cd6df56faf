//! Assertion helpers for floating-point statistics
#![allow(dead_code)] // Test utilities may not all be used in every test

use olympiad_data::MeanStdDev;

// ============================================================================
// Assertion Helpers
// ============================================================================

const TOLERANCE: f64 = 1e-9;

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {} but got {}",
        expected,
        actual
    );
}

pub fn assert_close_opt(actual: Option<f64>, expected: Option<f64>) {
    match (actual, expected) {
        (Some(actual), Some(expected)) => assert_close(actual, expected),
        (None, None) => {}
        _ => panic!("expected {:?} but got {:?}", expected, actual),
    }
}

pub fn assert_mean_std_dev(actual: Option<MeanStdDev>, mean: f64, std_dev: f64) {
    let actual = actual.expect("expected a mean and standard deviation");
    assert_close(actual.mean, mean);
    assert_close(actual.std_dev, std_dev);
}
