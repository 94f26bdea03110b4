pub mod fibonacci;
pub mod support_resistance;

pub use fibonacci::{retracement_levels, FibLevels};
pub use support_resistance::{support_resistance, support_resistance_default, SupportResistance};
