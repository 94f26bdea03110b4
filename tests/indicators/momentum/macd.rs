//! Unit tests for MACD

use entrix::indicators::momentum::{macd_default, macd_with_signal};

#[test]
fn test_macd_insufficient_data() {
    let closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
    assert!(macd_default(&closes).is_none());
}

#[test]
fn test_macd_positive_in_sustained_uptrend() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.5).collect();
    let output = macd_default(&closes).unwrap();
    assert!(output.macd > 0.0);
    assert_eq!(output.histogram, output.macd - output.signal);
}

#[test]
fn test_macd_negative_in_sustained_downtrend() {
    let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64 * 0.5).collect();
    let output = macd_default(&closes).unwrap();
    assert!(output.macd < 0.0);
    assert!(!output.crossed_above);
}

#[test]
fn test_macd_detects_bullish_crossover_after_reversal() {
    // 30 bars down, then a strong reversal: the MACD line must cross above
    // its lagging signal line at some evaluation point.
    let mut closes: Vec<f64> = (0..30).map(|i| 100.0 - i as f64 * 0.5).collect();
    let floor = *closes.last().unwrap();
    closes.extend((1..=15).map(|i| floor + i as f64 * 2.0));

    let mut crossed = false;
    for end in 34..=closes.len() {
        let output = macd_with_signal(&closes[..end], 12, 26, 9).unwrap();
        if output.crossed_above {
            crossed = true;
            assert!(
                output.histogram > 0.0,
                "crossover must leave the histogram positive"
            );
        }
    }
    assert!(crossed, "reversal never produced a bullish crossover");
}

#[test]
fn test_macd_short_series_degrades_without_crossover() {
    // 30 closes leave only 5 MACD values, fewer than the signal period.
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64 * 0.3).collect();
    let output = macd_default(&closes).unwrap();
    assert!(!output.crossed_above);
    assert!(output.signal.is_finite());
}
