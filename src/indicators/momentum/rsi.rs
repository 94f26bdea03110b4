//! RSI (Relative Strength Index) with Wilder smoothing
//!
//! RSI = 100 - (100 / (1 + RS))
//! RS = smoothed average gain / smoothed average loss

/// Calculate Wilder-smoothed RSI over the closes.
///
/// The first `period` changes seed the averages; every later change is
/// folded in with `avg = (avg * (period - 1) + value) / period`. When the
/// average loss is zero the index saturates at 100.
pub fn wilder_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for window in closes.windows(2).take(period) {
        let change = window[1] - window[0];
        if change > 0.0 {
            gain_sum += change;
        } else {
            loss_sum += -change;
        }
    }
    let mut avg_gain = gain_sum / period as f64;
    let mut avg_loss = loss_sum / period as f64;

    for window in closes.windows(2).skip(period) {
        let change = window[1] - window[0];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// RSI with the default period (14).
pub fn wilder_rsi_default(closes: &[f64]) -> Option<f64> {
    wilder_rsi(closes, 14)
}
