//! Fibonacci retracement levels over a lookback window.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibLevels {
    pub fib38: f64,
    pub fib50: f64,
    pub fib61: f64,
}

impl FibLevels {
    /// The level nearest to `price`, with its ratio label.
    pub fn nearest(&self, price: f64) -> (f64, &'static str) {
        let candidates = [
            (self.fib38, "38.2%"),
            (self.fib50, "50.0%"),
            (self.fib61, "61.8%"),
        ];
        candidates
            .into_iter()
            .min_by(|a, b| {
                (a.0 - price)
                    .abs()
                    .partial_cmp(&(b.0 - price).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or((self.fib50, "50.0%"))
    }
}

/// `high - (high - low) * ratio` for the canonical 38.2 / 50 / 61.8 ratios.
pub fn retracement_levels(high: f64, low: f64) -> FibLevels {
    let range = high - low;
    FibLevels {
        fib38: high - range * 0.382,
        fib50: high - range * 0.5,
        fib61: high - range * 0.618,
    }
}
