//! Unit tests for the Wilder RSI

use entrix::indicators::momentum::{wilder_rsi, wilder_rsi_default};

#[test]
fn test_rsi_insufficient_data() {
    let closes: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
    assert!(wilder_rsi_default(&closes).is_none());
}

#[test]
fn test_rsi_all_gains_saturates_at_100() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
    assert_eq!(wilder_rsi_default(&closes), Some(100.0));
}

#[test]
fn test_rsi_all_losses_is_zero() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 - i as f64).collect();
    assert_eq!(wilder_rsi_default(&closes), Some(0.0));
}

#[test]
fn test_rsi_always_within_bounds() {
    // A deterministic zig-zag walk.
    let mut closes = vec![100.0];
    for i in 1..120 {
        let step = if i % 3 == 0 { -1.7 } else { 0.9 };
        closes.push(closes[i - 1] + step);
    }
    for window_end in 15..closes.len() {
        let rsi = wilder_rsi_default(&closes[..window_end]).unwrap();
        assert!((0.0..=100.0).contains(&rsi), "rsi {} out of bounds", rsi);
    }
}

#[test]
fn test_rsi_balanced_moves_near_midline() {
    // Alternating +1/-1 gives equal average gain and loss, so RS = 1.
    let closes: Vec<f64> = (0..41)
        .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
        .collect();
    let rsi = wilder_rsi(&closes, 14).unwrap();
    assert!((rsi - 50.0).abs() < 5.0, "expected near 50, got {}", rsi);
}
