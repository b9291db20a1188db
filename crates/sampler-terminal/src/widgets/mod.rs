//! Dashboard widgets implementing Brick + Widget traits.
//!
//! - [`Block`]: border and title chrome around a component
//! - [`RunChart`]: live multi-series line chart
//! - [`Dashboard`]: root widget stacking run charts

mod block;
mod dashboard;
pub mod runchart;
pub mod symbols;

pub use block::Block;
pub use dashboard::Dashboard;
pub use runchart::{RunChart, RunChartConfig};
