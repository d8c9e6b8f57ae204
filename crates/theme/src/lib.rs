pub mod metrics;
pub mod style;

pub use metrics::CosmicMeasure;
pub use panel_core::Color;
pub use style::Style;
