pub mod clock;
pub mod indicator;
pub mod indicator_row;

#[cfg(test)]
mod testing;

pub use clock::ClockApplet;
pub use indicator::{Indicator, ResolvedIcon};
pub use indicator_row::IndicatorRow;
