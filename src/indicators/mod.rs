//! Pure indicator calculations over price series.

pub mod momentum;
pub mod structure;
pub mod volume;

pub use momentum::{macd_default, macd_with_signal, wilder_rsi, wilder_rsi_default, MacdOutput};
pub use structure::{
    retracement_levels, support_resistance, support_resistance_default, FibLevels,
    SupportResistance,
};
pub use volume::{volume_ratio, VolumeProfile};
