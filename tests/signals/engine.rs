//! Unit tests for the indicator engine

use chrono::Utc;
use entrix::{
    synthesize_fallback, IndicatorEngine, PriceHistory, PricePoint, SignalTechnique, Trend,
};

fn uptrend_history(count: usize) -> PriceHistory {
    let points = (0..count)
        .map(|i| {
            let price = 100.0 + i as f64 * 0.5;
            PricePoint::new(
                price,
                price + 0.3,
                price - 0.2,
                price + 0.1,
                1000.0,
                Utc::now(),
            )
        })
        .collect();
    PriceHistory::real(points)
}

fn downtrend_history(count: usize) -> PriceHistory {
    let points = (0..count)
        .map(|i| {
            let price = 200.0 - i as f64;
            PricePoint::new(
                price,
                price + 0.3,
                price - 0.2,
                price,
                1000.0,
                Utc::now(),
            )
        })
        .collect();
    PriceHistory::real(points)
}

#[test]
fn test_compute_insufficient_data() {
    assert!(IndicatorEngine::compute(&uptrend_history(20)).is_none());
}

#[test]
fn test_compute_degenerate_history() {
    let history = synthesize_fallback(0.0, 30);
    assert!(IndicatorEngine::compute(&history).is_none());
}

#[test]
fn test_uptrend_snapshot() {
    let snapshot = IndicatorEngine::compute(&uptrend_history(60)).unwrap();

    assert_eq!(snapshot.trend, Trend::Bullish);
    assert!((0.0..=100.0).contains(&snapshot.rsi));
    assert!(snapshot.sma10 > snapshot.sma50);
    assert!(snapshot.support_level < snapshot.resistance_level);
    assert!(snapshot.fib61 < snapshot.fib50 && snapshot.fib50 < snapshot.fib38);
    assert!(!snapshot.synthetic);
}

#[test]
fn test_downtrend_flags_oversold_and_bearish() {
    let snapshot = IndicatorEngine::compute(&downtrend_history(60)).unwrap();

    assert_eq!(snapshot.trend, Trend::Bearish);
    assert!(snapshot.rsi < 30.0);
    let techniques: Vec<SignalTechnique> =
        snapshot.signals.iter().map(|s| s.technique).collect();
    assert!(techniques.contains(&SignalTechnique::OversoldBounce));
    // The last close sits on the lowest low of the window.
    assert!(techniques.contains(&SignalTechnique::SupportBounce));
}

#[test]
fn test_volume_surge_on_rising_close_is_a_breakout() {
    let mut points: Vec<PricePoint> = (0..59)
        .map(|_| PricePoint::new(100.0, 100.3, 99.8, 100.0, 1000.0, Utc::now()))
        .collect();
    points.push(PricePoint::new(100.0, 102.3, 99.9, 102.0, 3000.0, Utc::now()));
    let snapshot = IndicatorEngine::compute(&PriceHistory::real(points)).unwrap();

    assert!(snapshot.volume_ratio > 1.5);
    assert!(snapshot
        .signals
        .iter()
        .any(|s| s.technique == SignalTechnique::VolumeBreakout));
}

#[test]
fn test_synthetic_history_halves_confidence() {
    let history = synthesize_fallback(43250.5, 30);
    let snapshot = IndicatorEngine::compute(&history).unwrap();

    assert!(snapshot.synthetic);
    for signal in &snapshot.signals {
        assert!(
            signal.confidence <= 0.5,
            "synthetic confidence {} above 0.5",
            signal.confidence
        );
    }
}

#[test]
fn test_scores_stay_in_bounds_across_shapes() {
    for history in [
        uptrend_history(60),
        downtrend_history(60),
        synthesize_fallback(250.0, 30),
        synthesize_fallback(0.0001, 45),
    ] {
        if let Some(snapshot) = IndicatorEngine::compute(&history) {
            let score = snapshot.overall_quality.score();
            assert!((0.0..=100.0).contains(&score));
            assert!((0.0..=100.0).contains(&snapshot.rsi));
            for signal in &snapshot.signals {
                assert!((0.0..=1.0).contains(&signal.confidence));
            }
        }
    }
}
