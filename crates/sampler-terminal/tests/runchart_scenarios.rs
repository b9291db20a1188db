//! End-to-end run chart scenarios: ingestion through the public consumer
//! entry point, rendering into a real cell buffer.

use chrono::{DateTime, Utc};
use sampler_core::{Color, Consumer, Rect, Sample};
use sampler_terminal::direct::{CellBuffer, DirectTerminalCanvas};
use sampler_terminal::widgets::runchart::{ManualClock, ValueExtrema, RETENTION_FLOOR};
use sampler_terminal::widgets::{RunChart, RunChartConfig};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn chart(precision: usize) -> (RunChart, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start()));
    let chart = RunChart::new(RunChartConfig {
        title: "scenario".to_string(),
        precision,
        ..RunChartConfig::default()
    })
    .with_clock(clock.clone());
    (chart, clock)
}

fn viewport(width: u16, height: u16) -> Rect {
    Rect::new(0.0, 0.0, f32::from(width), f32::from(height))
}

fn render(chart: &RunChart, width: u16, height: u16) -> CellBuffer {
    let mut buf = CellBuffer::new(width, height);
    {
        let mut canvas = DirectTerminalCanvas::new(&mut buf);
        chart.draw(&mut canvas, viewport(width, height));
    }
    buf
}

fn screen(buf: &CellBuffer) -> Vec<String> {
    (0..buf.height()).map(|y| buf.row_text(y)).collect()
}

fn has(buf: &CellBuffer, text: &str) -> bool {
    screen(buf).iter().any(|row| row.contains(text))
}

fn braille_cells(buf: &CellBuffer) -> usize {
    buf.cells().iter().filter(|c| c.braille_bits().is_some()).count()
}

#[test]
fn legend_reports_current_and_extrema() {
    let (chart, clock) = chart(2);
    for v in ["1.0", "3.0", "2.0"] {
        chart.consume(Sample::new("a", v, Color::GREEN));
        clock.advance(Duration::from_secs(1));
    }

    assert_eq!(
        chart.grid_for(viewport(80, 14)).extrema,
        ValueExtrema { max: 3.0, min: 1.0 }
    );
    let buf = render(&chart, 80, 14);
    let rows = screen(&buf);
    // inner x 1, width 78: legend column 59, first entry on row 2
    let marker_row: Vec<char> = rows[2].chars().collect();
    assert_eq!(marker_row[57], '•', "{rows:#?}");
    assert_eq!(marker_row[59], 'a', "{rows:#?}");
    assert!(rows[3].contains("cur 2.00"), "{rows:#?}");
    assert!(rows[4].contains("max 3.00"), "{rows:#?}");
    assert!(rows[5].contains("min 1.00"), "{rows:#?}");
    assert!(braille_cells(&buf) > 0);
}

#[test]
fn unparseable_sample_is_marked_then_recovers() {
    let (chart, clock) = chart(1);
    chart.consume(Sample::new("b", "N/A", Color::YELLOW));
    clock.advance(Duration::from_secs(1));

    chart.with_store(|s| {
        let line = s.line("b").unwrap();
        assert!(line.points().is_empty());
        assert_eq!(line.error_marks().len(), 1);
    });
    let buf = render(&chart, 80, 14);
    assert!(has(&buf, "cur no data"));
    assert!(!has(&buf, "max "));
    // x axis row: inner y 1, height 12 → row 11
    assert!(buf.row_text(11).contains('×'), "{:#?}", screen(&buf));
    assert_eq!(braille_cells(&buf), 0);

    chart.consume(Sample::new("b", "5.0", Color::YELLOW));
    clock.advance(Duration::from_secs(1));
    chart.with_store(|s| assert_eq!(s.line("b").unwrap().points()[0].value, 5.0));
    let buf = render(&chart, 80, 14);
    assert!(has(&buf, "cur 5.0"));
    assert!(has(&buf, "max 5.0"));
    assert!(braille_cells(&buf) > 0);
}

#[test]
fn producer_failure_behaves_like_parse_failure() {
    let (chart, clock) = chart(1);
    chart.consume(Sample::new("c", "4", Color::RED));
    clock.advance(Duration::from_secs(1));
    chart.consume(Sample::failed("c", Color::RED, "exit status: 1"));
    clock.advance(Duration::from_secs(1));

    let buf = render(&chart, 80, 14);
    assert!(has(&buf, "cur no data"));
    assert!(has(&buf, "max 4.0"));
}

#[test]
fn tiny_viewports_do_not_panic() {
    let (chart, clock) = chart(1);
    for (label, v) in [("a", "1"), ("b", "2"), ("a", "3"), ("b", "oops")] {
        chart.consume(Sample::new(label, v, Color::BLUE));
        clock.advance(Duration::from_millis(500));
    }
    for (w, h) in [(4, 10), (10, 4), (3, 3), (1, 1), (2, 30), (30, 2)] {
        let buf = render(&chart, w, h);
        assert_eq!(buf.width(), w);
    }
    let mut empty = CellBuffer::new(0, 0);
    chart.draw(&mut DirectTerminalCanvas::new(&mut empty), viewport(0, 0));
}

#[test]
fn empty_chart_draws_axes_only() {
    let (chart, _) = chart(1);
    let buf = render(&chart, 60, 10);
    assert!(has(&buf, "└┈┈"));
    assert!(has(&buf, "0.0"));
    assert_eq!(braille_cells(&buf), 0);
}

#[test]
fn retention_stabilizes_at_bound() {
    let (chart, clock) = chart(1);
    let mut lens = Vec::new();
    for round in 0..4 {
        for i in 0..400 {
            chart.consume(Sample::new("r", (round * 400 + i).to_string(), Color::CYAN));
            clock.advance(Duration::from_millis(1));
        }
        render(&chart, 100, 12);
        lens.push(chart.with_store(|s| s.line("r").unwrap().points().len()));
    }
    let bound = chart.with_store(|s| s.bound());
    assert_eq!(bound, RETENTION_FLOOR);
    assert!(lens.iter().all(|&n| n == bound), "{lens:?}");
}

#[test]
fn concurrent_producers_and_renders() {
    let (chart, _) = chart(1);
    let chart = Arc::new(chart);
    let producers: Vec<_> = (0..4)
        .map(|p| {
            let chart = Arc::clone(&chart);
            thread::spawn(move || {
                for i in 0..300 {
                    let value = if i % 50 == 49 {
                        "bad".to_string()
                    } else {
                        format!("{}.5", i % 17)
                    };
                    chart.consume(Sample::new(format!("p{p}"), value, Color::GREEN));
                }
            })
        })
        .collect();

    let renderer = {
        let chart = Arc::clone(&chart);
        thread::spawn(move || {
            for _ in 0..50 {
                render(&chart, 90, 16);
            }
        })
    };

    for p in producers {
        p.join().unwrap();
    }
    renderer.join().unwrap();

    chart.with_store(|s| {
        let labels: Vec<&str> = s.lines().map(|l| l.label()).collect();
        assert_eq!(labels.len(), 4);
        for p in 0..4 {
            assert!(labels.contains(&format!("p{p}").as_str()));
        }
        for line in s.lines() {
            assert!(line.points().len() <= s.bound());
            assert!(line
                .points()
                .iter()
                .zip(line.points().iter().skip(1))
                .all(|(a, b)| a.timestamp <= b.timestamp));
        }
    });
}

#[test]
fn borderless_chart_uses_full_viewport() {
    let clock = Arc::new(ManualClock::new(start()));
    let chart = RunChart::new(RunChartConfig {
        title: "hidden".to_string(),
        border: false,
        ..RunChartConfig::default()
    })
    .with_clock(clock);
    let buf = render(&chart, 60, 10);
    assert!(!has(&buf, "hidden"));
    assert!(!has(&buf, "╭"));
    // origin on row height - 2, column = label width
    assert!(buf.row_text(8).starts_with("   └"), "{:#?}", screen(&buf));
}
