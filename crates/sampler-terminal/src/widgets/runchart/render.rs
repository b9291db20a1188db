//! Axis, line and legend drawing.

use super::grid::{
    format_value, ChartGrid, X_AXIS_GRID_WIDTH, X_AXIS_LABELS_WIDTH, X_AXIS_LEGEND_WIDTH,
    Y_AXIS_LABELS_GAP, Y_AXIS_LABELS_HEIGHT,
};
use super::mapper::CoordinateMapper;
use super::store::{TimeLine, TimeSeriesStore};
use crate::widgets::symbols::{
    AXIS_ORIGIN, ERROR_MARK, HORIZONTAL_DASH, LEGEND_DOT, VERTICAL_DASH,
};
use chrono::{DateTime, Local, Utc};
use sampler_core::{Canvas, Color, Point, TextStyle};

/// Rows taken by one legend entry (marker, cur, max, min, spacer).
pub const LEGEND_ENTRY_HEIGHT: i32 = 5;

/// Draws one frame of a run chart from a computed grid.
#[derive(Debug, Clone, Copy)]
pub struct LineRenderer<'a> {
    grid: &'a ChartGrid,
    precision: usize,
    foreground: Color,
    grid_color: Color,
}

impl<'a> LineRenderer<'a> {
    /// Create a renderer for one frame.
    #[must_use]
    pub const fn new(
        grid: &'a ChartGrid,
        precision: usize,
        foreground: Color,
        grid_color: Color,
    ) -> Self {
        Self {
            grid,
            precision,
            foreground,
            grid_color,
        }
    }

    fn text(&self, canvas: &mut dyn Canvas, text: &str, x: i32, y: i32, color: Color) {
        canvas.draw_text(text, Point::new(x as f32, y as f32), &TextStyle::colored(color));
    }

    /// Origin, axis lines, dashed grid and both label rows.
    pub fn render_axes(&self, canvas: &mut dyn Canvas) {
        let plot = &self.grid.plot;
        let fg = self.foreground;

        self.text(canvas, AXIS_ORIGIN, plot.axis_x, plot.bottom, fg);
        for x in plot.left..=plot.right {
            self.text(canvas, HORIZONTAL_DASH, x, plot.bottom, fg);
        }

        for y in (plot.top + 1..plot.bottom).step_by(2) {
            for k in 1..=self.grid.lines_count {
                let x = plot.right - k * X_AXIS_GRID_WIDTH;
                if x >= plot.left {
                    self.text(canvas, VERTICAL_DASH, x, y, self.grid_color);
                }
            }
        }

        for y in plot.top..plot.bottom {
            self.text(canvas, VERTICAL_DASH, plot.axis_x, y, fg);
        }

        for k in 1..=self.grid.lines_count {
            let instant = self.grid.range.max - self.grid.timescale * k;
            let label = instant.with_timezone(&Local).format("%H:%M:%S").to_string();
            let x = plot.right - k * X_AXIS_GRID_WIDTH - X_AXIS_LABELS_WIDTH / 2;
            self.text(canvas, &label, x, plot.label_row, fg);
        }

        self.render_value_labels(canvas);
    }

    fn render_value_labels(&self, canvas: &mut dyn Canvas) {
        let plot = &self.grid.plot;
        let extrema = self.grid.extrema;
        let height = plot.height();
        if height == 0 {
            return;
        }
        if extrema.is_flat() || height < 2 {
            let label = format_value(extrema.max, self.precision);
            self.text(canvas, &label, plot.inner_x, plot.top + height / 2, self.foreground);
            return;
        }
        let per_row = (extrema.max - extrema.min) / f64::from(height - 1);
        let cadence = (Y_AXIS_LABELS_GAP + Y_AXIS_LABELS_HEIGHT) as usize;
        for row in (0..height).step_by(cadence) {
            let value = extrema.max - per_row * f64::from(row);
            let label = format_value(value, self.precision);
            self.text(canvas, &label, plot.inner_x, plot.top + row, self.foreground);
        }
    }

    /// Braille segments for every line, one point per column.
    pub fn render_lines(&self, canvas: &mut dyn Canvas, store: &TimeSeriesStore) {
        let plot = self.grid.plot;
        if plot.is_empty() {
            return;
        }
        let mapper = CoordinateMapper::new(self.grid);
        for line in store.lines() {
            let survivors = self.column_survivors(line, &mapper);
            let mut previous: Option<(Point, DateTime<Utc>)> = None;
            for (point, timestamp) in survivors {
                let from = match previous {
                    Some((p, t)) if !line.has_error_between(t, timestamp) => p,
                    _ => point,
                };
                canvas.draw_segment(from, point, line.color());
                previous = Some((point, timestamp));
            }
        }
    }

    /// In-plot points of a line with at most one per column; a later point
    /// replaces an earlier one in the same column.
    fn column_survivors(
        &self,
        line: &TimeLine,
        mapper: &CoordinateMapper<'_>,
    ) -> Vec<(Point, DateTime<Utc>)> {
        let plot = &self.grid.plot;
        let mut survivors: Vec<(i32, Point, DateTime<Utc>)> = Vec::new();
        for tp in line.points() {
            let x = tp.cached_x.unwrap_or_else(|| mapper.time_to_x(tp.timestamp));
            let point = mapper.to_point(x, tp.value);
            if !plot.contains(x, point.y) {
                continue;
            }
            match survivors.iter_mut().find(|(column, _, _)| *column == x) {
                Some(slot) => *slot = (x, point, tp.timestamp),
                None => survivors.push((x, point, tp.timestamp)),
            }
        }
        survivors.into_iter().map(|(_, p, t)| (p, t)).collect()
    }

    /// `×` on the x axis at every failed sample instant.
    pub fn render_error_marks(&self, canvas: &mut dyn Canvas, store: &TimeSeriesStore) {
        let plot = &self.grid.plot;
        let mapper = CoordinateMapper::new(self.grid);
        for line in store.lines() {
            for mark in line.error_marks() {
                let x = mapper.time_to_x(*mark);
                if x >= plot.left && x <= plot.right {
                    self.text(canvas, ERROR_MARK, x, plot.bottom, line.color());
                }
            }
        }
    }

    /// Label, current value and all-time extrema per line.
    pub fn render_legend(&self, canvas: &mut dyn Canvas, store: &TimeSeriesStore) {
        let plot = &self.grid.plot;
        let x = plot.inner_x + plot.inner_width - X_AXIS_LEGEND_WIDTH;
        for (i, line) in store.lines().enumerate() {
            let y = plot.inner_y + 1 + i as i32 * LEGEND_ENTRY_HEIGHT;
            self.text(canvas, LEGEND_DOT, x - 2, y, line.color());
            self.text(canvas, line.label(), x, y, line.color());

            let current = match line.latest() {
                Some(point) if !line.latest_failed() => format_value(point.value, self.precision),
                _ => "no data".to_string(),
            };
            self.text(canvas, &format!("cur {current}"), x, y + 1, self.foreground);

            if let Some(extrema) = line.extrema() {
                let max = format_value(extrema.max, self.precision);
                let min = format_value(extrema.min, self.precision);
                self.text(canvas, &format!("max {max}"), x, y + 2, self.foreground);
                self.text(canvas, &format!("min {min}"), x, y + 3, self.foreground);
            }
        }
    }
}
