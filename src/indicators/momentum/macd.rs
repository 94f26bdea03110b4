//! MACD (Moving Average Convergence Divergence) indicator
//!
//! MACD = EMA(12) - EMA(26)
//! Signal = EMA(9) of the MACD series
//! Histogram = MACD - Signal

use crate::common::math;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    /// True when the MACD line moved from at-or-below the signal line on the
    /// previous bar to above it on the current bar.
    pub crossed_above: bool,
}

/// Calculate MACD with its signal line and crossover state.
///
/// When the MACD series is shorter than the signal period the signal line
/// degrades to the arithmetic mean of the available MACD values; a crossover
/// is never reported in that case.
pub fn macd_with_signal(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Option<MacdOutput> {
    if fast == 0 || slow <= fast || closes.len() < slow {
        return None;
    }

    let fast_series = math::ema_series(closes, fast)?;
    let slow_series = math::ema_series(closes, slow)?;

    // fast_series[i] covers close index fast-1+i; align both at slow-1.
    let offset = slow - fast;
    let macd_series: Vec<f64> = fast_series[offset..]
        .iter()
        .zip(&slow_series)
        .map(|(f, s)| f - s)
        .collect();
    let macd = *macd_series.last()?;

    let (signal_value, crossed_above) = match math::ema_series(&macd_series, signal) {
        Some(signal_series) => {
            let signal_value = *signal_series.last()?;
            let crossed = if signal_series.len() >= 2 && macd_series.len() >= 2 {
                let prev_diff = macd_series[macd_series.len() - 2]
                    - signal_series[signal_series.len() - 2];
                prev_diff <= 0.0 && macd - signal_value > 0.0
            } else {
                false
            };
            (signal_value, crossed)
        }
        None => (math::mean(&macd_series)?, false),
    };

    Some(MacdOutput {
        macd,
        signal: signal_value,
        histogram: macd - signal_value,
        crossed_above,
    })
}

/// MACD with the default periods (12, 26, 9).
pub fn macd_default(closes: &[f64]) -> Option<MacdOutput> {
    macd_with_signal(closes, 12, 26, 9)
}
