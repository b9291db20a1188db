//! Per-frame axis geometry: visible time window, value range, plot area.

use super::store::{TimeSeriesStore, ValueExtrema};
use chrono::{DateTime, TimeDelta, Utc};
use sampler_core::Rect;

/// Width of one time label.
pub const X_AXIS_LABELS_WIDTH: i32 = 8;
/// Gap between time labels.
pub const X_AXIS_LABELS_GAP: i32 = 2;
/// Columns per timescale step.
pub const X_AXIS_GRID_WIDTH: i32 = X_AXIS_LABELS_GAP + X_AXIS_LABELS_WIDTH;
/// Rows taken by the time labels.
pub const X_AXIS_LABELS_HEIGHT: i32 = 1;
/// Width reserved for the legend at the right of the chart.
pub const X_AXIS_LEGEND_WIDTH: i32 = 20;
/// Rows per value label.
pub const Y_AXIS_LABELS_HEIGHT: i32 = 1;
/// Rows between value labels.
pub const Y_AXIS_LABELS_GAP: i32 = 1;
/// Timescale steps of history kept to the left of the window.
pub const CHART_HISTORY_RESERVE: i32 = 5;

/// Time covered by one grid column for a given refresh interval.
///
/// `refresh_ms × X_AXIS_GRID_WIDTH / 2`, rounded to the nearest second and
/// never below one second.
#[must_use]
pub fn timescale_for(refresh_ms: u64) -> TimeDelta {
    let millis = refresh_ms.saturating_mul(X_AXIS_GRID_WIDTH as u64) / 2;
    let seconds = millis.saturating_add(500) / 1000;
    TimeDelta::seconds(i64::try_from(seconds).unwrap_or(i64::MAX / 1000).max(1))
}

/// Value rendered with a fixed number of decimals.
#[must_use]
pub fn format_value(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

/// Sliding window of wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Oldest instant shown.
    pub min: DateTime<Utc>,
    /// Newest instant shown ("now").
    pub max: DateTime<Utc>,
}

impl TimeRange {
    /// True when `t` lies strictly inside the window.
    #[must_use]
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t > self.min && t < self.max
    }
}

/// Cell geometry of one chart frame.
///
/// Coordinates are absolute cells. The plot spans columns `left..=right` and
/// rows `top..bottom`; the x axis sits on row `bottom` and the time labels
/// below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotArea {
    /// Left edge of the working area.
    pub inner_x: i32,
    /// Top edge of the working area.
    pub inner_y: i32,
    /// Working area width.
    pub inner_width: i32,
    /// Working area height.
    pub inner_height: i32,
    /// Column of the y axis.
    pub axis_x: i32,
    /// First plot column.
    pub left: i32,
    /// Last plot column, where "now" is anchored.
    pub right: i32,
    /// First plot row.
    pub top: i32,
    /// Row of the x axis; the plot ends just above it.
    pub bottom: i32,
    /// Row of the time labels.
    pub label_row: i32,
}

impl PlotArea {
    /// Lay out a working area whose value labels are `value_label_width` wide.
    #[must_use]
    pub fn new(inner: Rect, value_label_width: usize) -> Self {
        let inner_x = inner.x.round() as i32;
        let inner_y = inner.y.round() as i32;
        let inner_width = inner.width.round().max(0.0) as i32;
        let inner_height = inner.height.round().max(0.0) as i32;
        let axis_x = inner_x + value_label_width as i32;
        let bottom = inner_y + inner_height - X_AXIS_LABELS_HEIGHT - 1;
        Self {
            inner_x,
            inner_y,
            inner_width,
            inner_height,
            axis_x,
            left: axis_x + 1,
            right: inner_x + inner_width - 1,
            top: inner_y,
            bottom,
            label_row: inner_y + inner_height - 1,
        }
    }

    /// Number of plot rows.
    #[must_use]
    pub fn height(&self) -> i32 {
        (self.bottom - self.top).max(0)
    }

    /// Number of plot columns.
    #[must_use]
    pub fn width(&self) -> i32 {
        (self.right - self.left + 1).max(0)
    }

    /// True when nothing can be plotted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// True when the fractional cell position lies inside the plot.
    #[must_use]
    pub fn contains(&self, x: i32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top as f32 && y < self.bottom as f32
    }
}

/// Snapshot of everything a frame needs to place points and labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGrid {
    /// Value range over points strictly inside `range`.
    pub extrema: ValueExtrema,
    /// Visible time window.
    pub range: TimeRange,
    /// Number of grid columns (time labels).
    pub lines_count: i32,
    /// Width of the widest value label.
    pub value_label_width: usize,
    /// Time covered by one grid column.
    pub timescale: TimeDelta,
    /// Cell geometry.
    pub plot: PlotArea,
}

impl ChartGrid {
    /// Instant before which history is no longer needed.
    #[must_use]
    pub fn history_cutoff(&self) -> DateTime<Utc> {
        self.range.min - self.timescale * CHART_HISTORY_RESERVE
    }
}

/// Derives a [`ChartGrid`] from store contents, viewport and time.
#[derive(Debug, Clone, Copy)]
pub struct GridCalculator {
    /// Time covered by one grid column.
    pub timescale: TimeDelta,
    /// Decimals in value labels.
    pub precision: usize,
}

impl GridCalculator {
    /// Compute the grid for a working area at `now`.
    #[must_use]
    pub fn compute(&self, store: &TimeSeriesStore, inner: Rect, now: DateTime<Utc>) -> ChartGrid {
        let value_label_width = store
            .all_points()
            .map(|p| format_value(p.value, self.precision).chars().count())
            .max()
            .unwrap_or_else(|| format_value(0.0, self.precision).chars().count());

        let plot = PlotArea::new(inner, value_label_width);
        let lines_count = (plot.inner_width - value_label_width as i32).max(0) / X_AXIS_GRID_WIDTH;
        let range = TimeRange {
            min: now - self.timescale * lines_count,
            max: now,
        };
        let extrema = ValueExtrema::of(
            store
                .all_points()
                .filter(|p| range.contains(p.timestamp))
                .map(|p| p.value),
        )
        .unwrap_or(ValueExtrema::EMPTY);

        ChartGrid {
            extrema,
            range,
            lines_count,
            value_label_width,
            timescale: self.timescale,
            plot,
        }
    }
}
