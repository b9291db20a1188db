//! Terminal backend and run chart engine for sampler.
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::use_self)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_fields_in_debug)]
//!
//! This crate bridges `sampler_core` abstractions (Canvas, Widget, Brick) to
//! the terminal using `crossterm` directly, and hosts the [`RunChart`]
//! widget that plots labelled numeric samples over a sliding time window.
//!
//! # Architecture
//!
//! - Producers ([`sampler::Sampler`]) push [`Sample`]s into charts through
//!   the [`Consumer`] trait, each on its own thread.
//! - The [`TuiApp`] loop verifies, measures, lays out and paints the
//!   [`Dashboard`] into a [`CellBuffer`] once per tick, then flushes only
//!   changed cells through the [`DiffRenderer`].
//! - Each chart serializes ingestion and rendering behind one mutex.
//!
//! # Example
//!
//! ```no_run
//! use sampler_terminal::{Dashboard, RunChart, RunChartConfig, TuiApp};
//! use std::sync::Arc;
//!
//! let chart = Arc::new(RunChart::new(RunChartConfig {
//!     title: "load".to_string(),
//!     ..RunChartConfig::default()
//! }));
//! TuiApp::new(Dashboard::new(vec![chart]))?.run()?;
//! # Ok::<(), sampler_terminal::TuiError>(())
//! ```

mod app;
mod color;
pub mod config;
pub mod direct;
mod error;
pub mod sampler;
pub mod theme;
pub mod widgets;

pub use app::{
    CrosstermBackend, CrosstermTerminal, FrameMetrics, GenericTerminal, Terminal,
    TerminalBackend, TestableBackend, TuiApp, TuiConfig,
};
pub use color::ColorMode;
pub use config::{ConfigError, DashboardConfig};
pub use direct::{Cell, CellBuffer, DiffRenderer, DirectTerminalCanvas, Modifiers};
pub use error::{TuiError, VerificationError};
pub use theme::{Theme, ThemeKind};
pub use widgets::{Block, Dashboard, RunChart, RunChartConfig};

// Re-export core types for convenience
pub use sampler_core::{
    Brick, BrickAssertion, BrickBudget, BrickVerification, Canvas, Color, Constraints, Consumer,
    Point, Rect, Sample, SampleError, Size, TextStyle, Widget,
};

/// Build the dashboard and its producers from a configuration.
///
/// Charts are returned ready to draw; producers are not started.
///
/// # Errors
///
/// Returns [`ConfigError::Color`] when an item color does not resolve.
pub fn build_dashboard(config: &DashboardConfig) -> Result<(Dashboard, sampler::Sampler), ConfigError> {
    let theme = config.theme();
    let mut charts = Vec::with_capacity(config.runcharts.len());
    let mut producers = sampler::Sampler::new();
    for section in &config.runcharts {
        let chart = std::sync::Arc::new(
            RunChart::new(section.chart_config()).with_theme(theme.clone()),
        );
        let rate = std::time::Duration::from_millis(section.rate_ms);
        for (i, item) in section.items.iter().enumerate() {
            let source = sampler::SampleSource::new(
                item.label.clone(),
                item.sample.clone(),
                item.resolved_color(&theme, i)?,
            );
            producers = producers.with_source(chart.clone(), source, rate);
        }
        charts.push(chart);
    }
    Ok((Dashboard::new(charts), producers))
}
