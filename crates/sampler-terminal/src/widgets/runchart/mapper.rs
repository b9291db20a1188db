//! Time/value to cell coordinate mapping.

use super::grid::{ChartGrid, X_AXIS_GRID_WIDTH};
use super::store::TimeSeriesStore;
use chrono::{DateTime, Utc};
use sampler_core::Point;

/// Maps absolute time and value onto the plot of one [`ChartGrid`].
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper<'a> {
    grid: &'a ChartGrid,
}

impl<'a> CoordinateMapper<'a> {
    /// Create a mapper for a frame.
    #[must_use]
    pub const fn new(grid: &'a ChartGrid) -> Self {
        Self { grid }
    }

    /// Column of instant `t`; "now" lands on the rightmost plot column.
    #[must_use]
    pub fn time_to_x(&self, t: DateTime<Utc>) -> i32 {
        let behind = (self.grid.range.max - t).num_nanoseconds().unwrap_or(i64::MAX) as f64;
        let scale = self.grid.timescale.num_nanoseconds().unwrap_or(i64::MAX).max(1) as f64;
        let columns = (f64::from(X_AXIS_GRID_WIDTH) * behind / scale).floor();
        self.grid.plot.right - columns.clamp(f64::from(i32::MIN / 2), f64::from(i32::MAX / 2)) as i32
    }

    /// Fractional row of value `v`.
    ///
    /// The covered range spans the plot from the centre of its top row to the
    /// centre of its bottom row. A flat range maps to the vertical centre.
    #[must_use]
    pub fn value_to_y(&self, v: f64) -> f32 {
        let plot = &self.grid.plot;
        let extrema = &self.grid.extrema;
        let height = plot.height();
        if extrema.is_flat() || height < 2 {
            return plot.top as f32 + height as f32 / 2.0;
        }
        let ratio = (v - extrema.min) / (extrema.max - extrema.min);
        (f64::from(plot.bottom) - 0.5 - ratio * f64::from(height - 1)) as f32
    }

    /// Sub-cell drawing position for a point in column `x`.
    #[must_use]
    pub fn to_point(&self, x: i32, v: f64) -> Point {
        Point::new(x as f32 + 0.5, self.value_to_y(v))
    }

    /// Bring cached columns up to date.
    ///
    /// When the anchor is unchanged the drift measured on one probe point is
    /// applied to every cached column; otherwise (first frame, resize,
    /// missing cache) every column is recomputed.
    pub fn refresh_cached_x(&self, store: &mut TimeSeriesStore, anchor_moved: bool) {
        let probe = store
            .lines()
            .find_map(|line| line.points().front())
            .and_then(|p| p.cached_x.map(|x| self.time_to_x(p.timestamp) - x));

        for line in store.lines_mut() {
            for point in line.points_mut() {
                point.cached_x = match (point.cached_x, probe) {
                    (Some(x), Some(delta)) if !anchor_moved => Some(x + delta),
                    _ => Some(self.time_to_x(point.timestamp)),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::runchart::grid::{PlotArea, TimeRange};
    use crate::widgets::runchart::store::ValueExtrema;
    use chrono::TimeDelta;
    use sampler_core::{Color, Rect, Sample};

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn grid(extrema: ValueExtrema, now: DateTime<Utc>) -> ChartGrid {
        let plot = PlotArea::new(Rect::new(0.0, 0.0, 44.0, 10.0), 4);
        ChartGrid {
            extrema,
            range: TimeRange {
                min: now - TimeDelta::seconds(20),
                max: now,
            },
            lines_count: 4,
            value_label_width: 4,
            timescale: TimeDelta::seconds(5),
            plot,
        }
    }

    #[test]
    fn test_time_to_x_anchors_now_right() {
        let g = grid(ValueExtrema::EMPTY, t(100));
        let m = CoordinateMapper::new(&g);
        assert_eq!(m.time_to_x(t(100)), 43);
        assert_eq!(m.time_to_x(t(95)), 33);
        assert_eq!(m.time_to_x(t(80)), 3);
        assert_eq!(m.time_to_x(t(101)), 45);
    }

    #[test]
    fn test_time_to_x_sub_step() {
        let g = grid(ValueExtrema::EMPTY, t(100));
        let m = CoordinateMapper::new(&g);
        let half = t(100) - TimeDelta::milliseconds(2500);
        assert_eq!(m.time_to_x(half), 38);
        let just_before = t(100) - TimeDelta::milliseconds(1);
        assert_eq!(m.time_to_x(just_before), 43);
    }

    #[test]
    fn test_value_to_y_spans_plot() {
        let g = grid(ValueExtrema { max: 10.0, min: 0.0 }, t(0));
        let m = CoordinateMapper::new(&g);
        assert_eq!(m.value_to_y(10.0), 0.5);
        assert_eq!(m.value_to_y(0.0), 7.5);
        assert!((m.value_to_y(5.0) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_value_to_y_flat_is_centre() {
        let g = grid(ValueExtrema { max: 3.0, min: 3.0 }, t(0));
        let m = CoordinateMapper::new(&g);
        assert_eq!(m.value_to_y(3.0), 4.0);
        assert_eq!(m.to_point(10, 3.0), Point::new(10.5, 4.0));
    }

    #[test]
    fn test_refresh_applies_probe_drift() {
        let mut store = TimeSeriesStore::new();
        store.ingest(&Sample::new("a", "1", Color::RED), t(90)).unwrap();
        store.ingest(&Sample::new("a", "2", Color::RED), t(95)).unwrap();

        let first = grid(ValueExtrema::EMPTY, t(100));
        CoordinateMapper::new(&first).refresh_cached_x(&mut store, true);
        let cached: Vec<_> = store.all_points().map(|p| p.cached_x).collect();
        assert_eq!(cached, vec![Some(23), Some(33)]);

        store.ingest(&Sample::new("a", "3", Color::RED), t(104)).unwrap();
        let second = grid(ValueExtrema::EMPTY, t(105));
        CoordinateMapper::new(&second).refresh_cached_x(&mut store, false);
        let cached: Vec<_> = store.all_points().map(|p| p.cached_x).collect();
        assert_eq!(cached, vec![Some(13), Some(23), Some(41)]);
    }

    #[test]
    fn test_refresh_recomputes_on_anchor_move() {
        let mut store = TimeSeriesStore::new();
        store.ingest(&Sample::new("a", "1", Color::RED), t(90)).unwrap();
        let g = grid(ValueExtrema::EMPTY, t(100));
        let m = CoordinateMapper::new(&g);
        m.refresh_cached_x(&mut store, true);
        for line in store.lines_mut() {
            for p in line.points_mut() {
                p.cached_x = Some(-999);
            }
        }
        m.refresh_cached_x(&mut store, true);
        assert_eq!(store.all_points().next().unwrap().cached_x, Some(23));
    }
}
