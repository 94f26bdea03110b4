//! Unit tests for the moving-average primitives

use entrix::common::math::{ema, ema_from_previous, ema_series, mean, sma};

#[test]
fn test_mean_empty_is_none() {
    assert!(mean(&[]).is_none());
}

#[test]
fn test_mean_basic() {
    assert_eq!(mean(&[2.0, 4.0, 6.0]), Some(4.0));
}

#[test]
fn test_sma_insufficient_data() {
    assert!(sma(&[1.0, 2.0], 3).is_none());
    assert!(sma(&[1.0, 2.0, 3.0], 0).is_none());
}

#[test]
fn test_sma_uses_last_period_values() {
    let values = [10.0, 20.0, 1.0, 2.0, 3.0];
    assert_eq!(sma(&values, 3), Some(2.0));
}

#[test]
fn test_ema_seeded_by_sma() {
    // Seed = SMA(1, 2, 3) = 2; k = 0.5 for period 3.
    // step(4): (4 - 2) * 0.5 + 2 = 3; step(5): (5 - 3) * 0.5 + 3 = 4.
    assert_eq!(ema(&[1.0, 2.0, 3.0, 4.0, 5.0], 3), Some(4.0));
}

#[test]
fn test_ema_from_previous_step() {
    assert_eq!(ema_from_previous(4.0, 2.0, 3), 3.0);
}

#[test]
fn test_ema_series_length() {
    let values: Vec<f64> = (1..=10).map(|i| i as f64).collect();
    let series = ema_series(&values, 4).unwrap();
    assert_eq!(series.len(), 7);
}

#[test]
fn test_ema_constant_series_is_flat() {
    let values = [5.0; 30];
    let series = ema_series(&values, 10).unwrap();
    assert!(series.iter().all(|&v| (v - 5.0).abs() < 1e-12));
}
