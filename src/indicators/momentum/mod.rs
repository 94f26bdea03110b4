pub mod macd;
pub mod rsi;

pub use macd::{macd_default, macd_with_signal, MacdOutput};
pub use rsi::{wilder_rsi, wilder_rsi_default};
