//! Volume ratio against the trailing average.

use crate::common::math;
use crate::models::price::PricePoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeProfile {
    pub current: f64,
    pub average: f64,
    /// current / average; 0 when the average is zero.
    pub ratio: f64,
}

/// Current volume against the mean of the last `lookback` bars.
pub fn volume_ratio(points: &[PricePoint], lookback: usize) -> Option<VolumeProfile> {
    let current = points.last()?.volume;
    let window = &points[points.len().saturating_sub(lookback)..];
    let volumes: Vec<f64> = window.iter().map(|p| p.volume).collect();
    let average = math::mean(&volumes)?;
    let ratio = if average > 0.0 { current / average } else { 0.0 };
    Some(VolumeProfile {
        current,
        average,
        ratio,
    })
}
