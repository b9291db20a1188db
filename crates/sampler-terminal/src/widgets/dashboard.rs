//! Vertical stack of run charts sharing the terminal.

use super::runchart::RunChart;
use sampler_core::{
    Brick, BrickAssertion, BrickBudget, BrickVerification, Canvas, Constraints, LayoutResult,
    Rect, Size, Widget,
};
use std::sync::Arc;
use std::time::Instant;

/// Root widget: charts stacked top to bottom in equal bands.
///
/// Charts are shared with their producers through [`Arc`], so sampling keeps
/// going while the dashboard lays out and paints.
#[derive(Debug)]
pub struct Dashboard {
    charts: Vec<Arc<RunChart>>,
    bounds: Rect,
    assertions: Vec<BrickAssertion>,
}

impl Dashboard {
    /// Create a dashboard over `charts`.
    #[must_use]
    pub fn new(charts: Vec<Arc<RunChart>>) -> Self {
        Self {
            charts,
            bounds: Rect::default(),
            assertions: vec![
                BrickAssertion::custom("at least one chart"),
                BrickAssertion::max_latency_ms(16),
            ],
        }
    }

    /// Charts in display order.
    #[must_use]
    pub fn charts(&self) -> &[Arc<RunChart>] {
        &self.charts
    }

    /// Split `area` into one band per chart; the last band absorbs the
    /// remainder rows.
    #[must_use]
    pub fn bands(&self, area: Rect) -> Vec<Rect> {
        let count = self.charts.len();
        if count == 0 {
            return Vec::new();
        }
        let total = area.height.max(0.0).floor() as usize;
        let band = total / count;
        (0..count)
            .map(|i| {
                let height = if i + 1 == count {
                    total - band * (count - 1)
                } else {
                    band
                };
                Rect::new(
                    area.x,
                    area.y + (band * i) as f32,
                    area.width,
                    height as f32,
                )
            })
            .collect()
    }
}

impl Brick for Dashboard {
    fn brick_name(&self) -> &'static str {
        "dashboard"
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
            match assertion {
                BrickAssertion::Custom(_) if self.charts.is_empty() => {
                    failed.push((assertion.clone(), "no charts configured".to_string()));
                }
                _ => passed.push(assertion.clone()),
            }
        }
        for chart in &self.charts {
            let nested = chart.verify();
            passed.extend(nested.passed);
            failed.extend(nested.failed);
        }
        BrickVerification {
            passed,
            failed,
            verification_time: start.elapsed(),
        }
    }
}

impl Widget for Dashboard {
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
        for (chart, band) in self.charts.iter().zip(self.bands(self.bounds)) {
            chart.draw(canvas, band);
        }
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
