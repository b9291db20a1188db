//! Per-label time series storage.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use sampler_core::{Color, Sample, SampleError};
use std::collections::VecDeque;
use tracing::debug;

/// Minimum number of points (and error marks) retained per line.
pub const RETENTION_FLOOR: usize = 256;

/// One plotted observation.
#[derive(Debug, Clone, PartialEq)]
pub struct TimePoint {
    /// Parsed sample value.
    pub value: f64,
    /// Ingestion instant.
    pub timestamp: DateTime<Utc>,
    /// Column computed on an earlier frame, shifted by the measured drift.
    pub(crate) cached_x: Option<i32>,
}

/// Highest and lowest value of a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValueExtrema {
    /// Largest value.
    pub max: f64,
    /// Smallest value.
    pub min: f64,
}

impl ValueExtrema {
    /// Extrema of an empty set.
    pub const EMPTY: Self = Self { max: 0.0, min: 0.0 };

    /// Extrema over `values`, `None` when there are none.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| {
            Some(match acc {
                None => Self { max: v, min: v },
                Some(e) => Self {
                    max: e.max.max(v),
                    min: e.min.min(v),
                },
            })
        })
    }

    /// True when every covered value is equal.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.max == self.min
    }
}

/// All samples received for one label.
#[derive(Debug, Clone)]
pub struct TimeLine {
    label: String,
    color: Color,
    points: VecDeque<TimePoint>,
    error_marks: VecDeque<DateTime<Utc>>,
    latest_failed: bool,
}

impl TimeLine {
    fn new(label: String, color: Color) -> Self {
        Self {
            label,
            color,
            points: VecDeque::new(),
            error_marks: VecDeque::new(),
            latest_failed: false,
        }
    }

    /// Series label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Series color, taken from the first sample with this label.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Points in arrival order.
    #[must_use]
    pub fn points(&self) -> &VecDeque<TimePoint> {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut VecDeque<TimePoint> {
        &mut self.points
    }

    /// Instants at which a sample for this line failed.
    #[must_use]
    pub fn error_marks(&self) -> &VecDeque<DateTime<Utc>> {
        &self.error_marks
    }

    /// Most recent plotted point.
    #[must_use]
    pub fn latest(&self) -> Option<&TimePoint> {
        self.points.back()
    }

    /// True while the most recent sample for this line was erroneous.
    #[must_use]
    pub const fn latest_failed(&self) -> bool {
        self.latest_failed
    }

    /// Extrema over every stored point, regardless of the visible window.
    #[must_use]
    pub fn extrema(&self) -> Option<ValueExtrema> {
        ValueExtrema::of(self.points.iter().map(|p| p.value))
    }

    /// True when an error mark lies in the open interval `(after, before)`.
    #[must_use]
    pub fn has_error_between(&self, after: DateTime<Utc>, before: DateTime<Utc>) -> bool {
        self.error_marks.iter().any(|t| *t > after && *t < before)
    }

    fn enforce(&mut self, bound: usize) -> usize {
        let excess = self.points.len().saturating_sub(bound);
        self.points.drain(..excess);
        let marks = self.error_marks.len().saturating_sub(bound);
        self.error_marks.drain(..marks);
        excess
    }

    /// Drop points older than `cutoff`, keeping the newest of them so the line
    /// still enters the plot from its left edge.
    fn purge_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        let mut purged = 0;
        while self.points.len() > 1 && self.points.get(1).is_some_and(|p| p.timestamp < cutoff) {
            self.points.pop_front();
            purged += 1;
        }
        while self.error_marks.front().is_some_and(|t| *t < cutoff) {
            self.error_marks.pop_front();
        }
        purged
    }
}

/// Insertion-ordered map of label to line.
#[derive(Debug, Clone)]
pub struct TimeSeriesStore {
    lines: IndexMap<String, TimeLine>,
    bound: usize,
}

impl Default for TimeSeriesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSeriesStore {
    /// Create an empty store bounded at [`RETENTION_FLOOR`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: IndexMap::new(),
            bound: RETENTION_FLOOR,
        }
    }

    /// Record a sample at `now`.
    ///
    /// The line is created on first sight of the label, even when the sample
    /// itself is erroneous. A sample that does not parse leaves an error mark
    /// instead of a point.
    ///
    /// # Errors
    ///
    /// Returns the parse or producer error after recording the error mark.
    pub fn ingest(&mut self, sample: &Sample, now: DateTime<Utc>) -> Result<(), SampleError> {
        let line = self
            .lines
            .entry(sample.label.clone())
            .or_insert_with(|| {
                debug!(label = %sample.label, "new run chart line");
                TimeLine::new(sample.label.clone(), sample.color)
            });

        let last_instant = line
            .points
            .back()
            .map(|p| p.timestamp)
            .into_iter()
            .chain(line.error_marks.back().copied())
            .max();
        let timestamp = last_instant.map_or(now, |last| last.max(now));

        let outcome = match sample.parse_value() {
            Ok(value) => {
                line.points.push_back(TimePoint {
                    value,
                    timestamp,
                    cached_x: None,
                });
                line.latest_failed = false;
                Ok(())
            }
            Err(err) => {
                line.error_marks.push_back(timestamp);
                line.latest_failed = true;
                Err(err)
            }
        };

        let evicted = line.enforce(self.bound);
        if evicted > 0 {
            debug!(label = %sample.label, evicted, bound = self.bound, "retention bound reached");
        }
        outcome
    }

    /// Set the count bound from the visible plot width of the last frame.
    pub fn set_visible_columns(&mut self, columns: usize) {
        self.bound = columns.saturating_mul(2).max(RETENTION_FLOOR);
    }

    /// Current per-line count bound.
    #[must_use]
    pub const fn bound(&self) -> usize {
        self.bound
    }

    /// Drop history older than `cutoff` from every line.
    pub fn purge_before(&mut self, cutoff: DateTime<Utc>) {
        for line in self.lines.values_mut() {
            let purged = line.purge_before(cutoff);
            if purged > 0 {
                debug!(label = %line.label, purged, "purged points before window");
            }
        }
    }

    /// Lines in first-seen order.
    pub fn lines(&self) -> impl Iterator<Item = &TimeLine> {
        self.lines.values()
    }

    pub(crate) fn lines_mut(&mut self) -> impl Iterator<Item = &mut TimeLine> {
        self.lines.values_mut()
    }

    /// Line for a label.
    #[must_use]
    pub fn line(&self, label: &str) -> Option<&TimeLine> {
        self.lines.get(label)
    }

    /// Number of distinct labels seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True before the first sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Every stored point of every line.
    pub fn all_points(&self) -> impl Iterator<Item = &TimePoint> {
        self.lines.values().flat_map(|line| line.points.iter())
    }
}
