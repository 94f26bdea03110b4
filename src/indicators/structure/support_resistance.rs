//! Support and resistance from recent extremes.

use crate::models::price::PricePoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportResistance {
    pub support: f64,
    pub resistance: f64,
}

/// Lowest low and highest high over the trailing `lookback` bars.
pub fn support_resistance(points: &[PricePoint], lookback: usize) -> Option<SupportResistance> {
    if points.is_empty() || lookback == 0 {
        return None;
    }
    let window = &points[points.len().saturating_sub(lookback)..];
    let support = window.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);
    let resistance = window
        .iter()
        .map(|p| p.high)
        .fold(f64::NEG_INFINITY, f64::max);
    Some(SupportResistance {
        support,
        resistance,
    })
}

/// Support/resistance with the default lookback (20).
pub fn support_resistance_default(points: &[PricePoint]) -> Option<SupportResistance> {
    support_resistance(points, 20)
}
