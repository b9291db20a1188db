//! Real-time multi-series run chart.
//!
//! A [`RunChart`] ingests samples from producer threads and redraws a sliding
//! time window on every frame. One mutex guards all chart state: ingestion
//! ([`Consumer::consume`]) and rendering ([`RunChart::draw`]) each hold it for
//! their whole duration, so a frame never observes a half-applied sample.
//!
//! ```text
//! producer ─ consume ─┐                    ┌─ GridCalculator
//!                     ├─ Mutex<ChartState> ┼─ CoordinateMapper
//! render tick ─ draw ─┘                    └─ LineRenderer
//! ```

mod clock;
mod grid;
mod mapper;
mod render;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use grid::{
    format_value, timescale_for, ChartGrid, GridCalculator, PlotArea, TimeRange,
    CHART_HISTORY_RESERVE, X_AXIS_GRID_WIDTH, X_AXIS_LABELS_GAP, X_AXIS_LABELS_HEIGHT,
    X_AXIS_LABELS_WIDTH, X_AXIS_LEGEND_WIDTH, Y_AXIS_LABELS_GAP, Y_AXIS_LABELS_HEIGHT,
};
pub use mapper::CoordinateMapper;
pub use render::{LineRenderer, LEGEND_ENTRY_HEIGHT};
pub use store::{TimeLine, TimePoint, TimeSeriesStore, ValueExtrema, RETENTION_FLOOR};

use super::block::Block;
use crate::theme::Theme;
use chrono::TimeDelta;
use sampler_core::{
    Brick, BrickAssertion, BrickBudget, BrickVerification, Canvas, Constraints, Consumer,
    LayoutResult, Rect, Sample, Size, Widget,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{info, trace, warn};

/// Largest supported number of decimals.
pub const MAX_PRECISION: usize = 10;

/// Construction-time settings of a run chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunChartConfig {
    /// Title shown in the border.
    pub title: String,
    /// Decimals in value labels and legend.
    pub precision: usize,
    /// Producer refresh interval; fixes the timescale.
    pub rate_ms: u64,
    /// Draw a border and title around the chart.
    pub border: bool,
}

impl Default for RunChartConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            precision: 1,
            rate_ms: 1000,
            border: true,
        }
    }
}

/// Anchor of the cached x columns: the rightmost plot column and its row span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Anchor {
    right: i32,
    left: i32,
}

#[derive(Debug, Default)]
struct ChartState {
    store: TimeSeriesStore,
    anchor: Option<Anchor>,
}

/// A live line chart over a sliding time window.
#[derive(Debug)]
pub struct RunChart {
    config: RunChartConfig,
    timescale: TimeDelta,
    block: Block,
    theme: Theme,
    clock: Arc<dyn Clock>,
    state: Mutex<ChartState>,
    bounds: Rect,
    assertions: Vec<BrickAssertion>,
}

impl RunChart {
    /// Create a chart using the system clock and the default theme.
    #[must_use]
    pub fn new(config: RunChartConfig) -> Self {
        let timescale = timescale_for(config.rate_ms);
        let theme = Theme::default();
        info!(title = %config.title, rate_ms = config.rate_ms, timescale_s = timescale.num_seconds(), "run chart created");
        Self {
            block: Self::block_for(&config, &theme),
            config,
            timescale,
            theme,
            clock: Arc::new(SystemClock),
            state: Mutex::new(ChartState::default()),
            bounds: Rect::default(),
            assertions: vec![
                BrickAssertion::custom("timescale at least one second"),
                BrickAssertion::custom("precision within range"),
                BrickAssertion::max_latency_ms(16),
            ],
        }
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the color theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.block = Self::block_for(&self.config, &theme);
        self.theme = theme;
        self
    }

    fn block_for(config: &RunChartConfig, theme: &Theme) -> Block {
        Block::new()
            .with_title(config.title.clone())
            .with_border(config.border)
            .with_colors(theme.border, theme.foreground)
    }

    /// Chart settings.
    #[must_use]
    pub const fn config(&self) -> &RunChartConfig {
        &self.config
    }

    /// Time covered by one grid column.
    #[must_use]
    pub const fn timescale(&self) -> TimeDelta {
        self.timescale
    }

    fn lock(&self) -> MutexGuard<'_, ChartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the store while holding the chart lock.
    pub fn with_store<R>(&self, f: impl FnOnce(&TimeSeriesStore) -> R) -> R {
        f(&self.lock().store)
    }

    /// Grid the next frame would use for `viewport`, without drawing.
    #[must_use]
    pub fn grid_for(&self, viewport: Rect) -> ChartGrid {
        let state = self.lock();
        self.calculator()
            .compute(&state.store, self.block.inner(viewport), self.clock.now())
    }

    const fn calculator(&self) -> GridCalculator {
        GridCalculator {
            timescale: self.timescale,
            precision: self.config.precision,
        }
    }

    /// Draw one frame into `viewport`.
    pub fn draw(&self, canvas: &mut dyn Canvas, viewport: Rect) {
        let started = Instant::now();
        let mut state = self.lock();

        let inner = self.block.draw(canvas, viewport);
        let grid = self.calculator().compute(&state.store, inner, self.clock.now());
        let anchor = Anchor {
            right: grid.plot.right,
            left: grid.plot.left,
        };
        let anchor_moved = state.anchor != Some(anchor);
        state.anchor = Some(anchor);

        state.store.purge_before(grid.history_cutoff());
        state
            .store
            .set_visible_columns(usize::try_from(grid.plot.width()).unwrap_or(0));
        CoordinateMapper::new(&grid).refresh_cached_x(&mut state.store, anchor_moved);

        canvas.push_clip(inner);
        let renderer = LineRenderer::new(
            &grid,
            self.config.precision,
            self.theme.foreground,
            self.theme.grid,
        );
        renderer.render_axes(canvas);
        renderer.render_lines(canvas, &state.store);
        renderer.render_error_marks(canvas, &state.store);
        renderer.render_legend(canvas, &state.store);
        canvas.pop_clip();

        trace!(
            title = %self.config.title,
            lines = state.store.len(),
            columns = grid.lines_count,
            elapsed_us = started.elapsed().as_micros() as u64,
            "run chart frame"
        );
    }
}

impl Consumer for RunChart {
    fn consume(&self, sample: Sample) {
        let mut state = self.lock();
        let now = self.clock.now();
        if let Err(err) = state.store.ingest(&sample, now) {
            warn!(chart = %self.config.title, %err, "sample not plotted");
        }
    }
}

impl Brick for RunChart {
    fn brick_name(&self) -> &'static str {
        "run_chart"
    }

    fn assertions(&self) -> &[BrickAssertion] {
        &self.assertions
    }

    fn budget(&self) -> BrickBudget {
        BrickBudget::uniform(16)
    }

    fn verify(&self) -> BrickVerification {
        let start = Instant::now();
        let mut passed = Vec::new();
        let mut failed = Vec::new();
        for assertion in &self.assertions {
            let outcome = match assertion {
                BrickAssertion::Custom(name) if name.starts_with("timescale") => {
                    (self.timescale >= TimeDelta::seconds(1))
                        .then_some(())
                        .ok_or_else(|| format!("timescale {}s below 1s", self.timescale.num_seconds()))
                }
                BrickAssertion::Custom(name) if name.starts_with("precision") => {
                    (self.config.precision <= MAX_PRECISION)
                        .then_some(())
                        .ok_or_else(|| format!("precision {} above {MAX_PRECISION}", self.config.precision))
                }
                _ => Ok(()),
            };
            match outcome {
                Ok(()) => passed.push(assertion.clone()),
                Err(reason) => failed.push((assertion.clone(), reason)),
            }
        }
        BrickVerification {
            passed,
            failed,
            verification_time: start.elapsed(),
        }
    }
}

impl Widget for RunChart {
    fn measure(&self, constraints: Constraints) -> Size {
        constraints.biggest()
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        self.draw(canvas, self.bounds);
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
