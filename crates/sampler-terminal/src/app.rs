//! Dashboard runner with Jidoka verification gates.

use crate::color::ColorMode;
use crate::direct::{CellBuffer, DiffRenderer, DirectTerminalCanvas};
use crate::error::{TuiError, VerificationError};
use crossterm::{
    cursor,
    event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use sampler_core::{Constraints, Rect, Widget};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Terminal abstraction for testability.
pub trait Terminal {
    /// Enter raw mode and alternate screen.
    fn enter(&mut self) -> Result<(), TuiError>;
    /// Leave alternate screen and raw mode.
    fn leave(&mut self) -> Result<(), TuiError>;
    /// Get terminal size (width, height).
    fn size(&self) -> Result<(u16, u16), TuiError>;
    /// Poll for events with timeout.
    fn poll(&self, timeout: Duration) -> Result<bool, TuiError>;
    /// Read the next event.
    fn read_event(&self) -> Result<CrosstermEvent, TuiError>;
    /// Flush output.
    fn flush(
        &mut self,
        buffer: &mut CellBuffer,
        renderer: &mut DiffRenderer,
    ) -> Result<(), TuiError>;
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn enter(&mut self) -> Result<(), TuiError> {
        (**self).enter()
    }
    fn leave(&mut self) -> Result<(), TuiError> {
        (**self).leave()
    }
    fn size(&self) -> Result<(u16, u16), TuiError> {
        (**self).size()
    }
    fn poll(&self, timeout: Duration) -> Result<bool, TuiError> {
        (**self).poll(timeout)
    }
    fn read_event(&self) -> Result<CrosstermEvent, TuiError> {
        (**self).read_event()
    }
    fn flush(
        &mut self,
        buffer: &mut CellBuffer,
        renderer: &mut DiffRenderer,
    ) -> Result<(), TuiError> {
        (**self).flush(buffer, renderer)
    }
}

/// Backend trait for raw terminal operations (crossterm calls).
pub trait TerminalBackend {
    fn enable_raw_mode(&mut self) -> Result<(), TuiError>;
    fn disable_raw_mode(&mut self) -> Result<(), TuiError>;
    fn enter_alternate_screen(&mut self) -> Result<(), TuiError>;
    fn leave_alternate_screen(&mut self) -> Result<(), TuiError>;
    fn hide_cursor(&mut self) -> Result<(), TuiError>;
    fn show_cursor(&mut self) -> Result<(), TuiError>;
    fn size(&self) -> Result<(u16, u16), TuiError>;
    fn poll(&self, timeout: Duration) -> Result<bool, TuiError>;
    fn read_event(&self) -> Result<CrosstermEvent, TuiError>;
    fn write_flush(
        &mut self,
        buffer: &mut CellBuffer,
        renderer: &mut DiffRenderer,
    ) -> Result<(), TuiError>;
}

/// Real crossterm backend on stdout.
#[derive(Debug)]
pub struct CrosstermBackend {
    stdout: Stdout,
}

impl CrosstermBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enable_raw_mode(&mut self) -> Result<(), TuiError> {
        enable_raw_mode().map_err(|_| TuiError::TerminalNotAvailable)
    }
    fn disable_raw_mode(&mut self) -> Result<(), TuiError> {
        let _ = disable_raw_mode();
        Ok(())
    }
    fn enter_alternate_screen(&mut self) -> Result<(), TuiError> {
        execute!(self.stdout, EnterAlternateScreen)?;
        Ok(())
    }
    fn leave_alternate_screen(&mut self) -> Result<(), TuiError> {
        let _ = execute!(self.stdout, LeaveAlternateScreen);
        Ok(())
    }
    fn hide_cursor(&mut self) -> Result<(), TuiError> {
        execute!(self.stdout, cursor::Hide)?;
        Ok(())
    }
    fn show_cursor(&mut self) -> Result<(), TuiError> {
        let _ = execute!(self.stdout, cursor::Show);
        Ok(())
    }
    fn size(&self) -> Result<(u16, u16), TuiError> {
        Ok(crossterm::terminal::size()?)
    }
    fn poll(&self, timeout: Duration) -> Result<bool, TuiError> {
        Ok(event::poll(timeout)?)
    }
    fn read_event(&self) -> Result<CrosstermEvent, TuiError> {
        Ok(event::read()?)
    }
    fn write_flush(
        &mut self,
        buffer: &mut CellBuffer,
        renderer: &mut DiffRenderer,
    ) -> Result<(), TuiError> {
        renderer.flush(buffer, &mut self.stdout)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Backend over any writer with scripted size, polls and events.
/// Captures the escape sequences a real terminal would receive.
#[derive(Debug)]
pub struct TestableBackend<W: Write> {
    writer: W,
    size: (u16, u16),
    raw_mode: bool,
    alternate_screen: bool,
    cursor_hidden: bool,
    events: RefCell<VecDeque<CrosstermEvent>>,
    poll_results: RefCell<VecDeque<bool>>,
    sizes: RefCell<VecDeque<(u16, u16)>>,
}

impl<W: Write> TestableBackend<W> {
    /// Create a backend with the given writer and size.
    pub fn new(writer: W, width: u16, height: u16) -> Self {
        Self {
            writer,
            size: (width, height),
            raw_mode: false,
            alternate_screen: false,
            cursor_hidden: false,
            events: RefCell::new(VecDeque::new()),
            poll_results: RefCell::new(VecDeque::new()),
            sizes: RefCell::new(VecDeque::new()),
        }
    }

    /// Queue events to be returned by `read_event`.
    #[must_use]
    pub fn with_events(self, events: Vec<CrosstermEvent>) -> Self {
        *self.events.borrow_mut() = events.into_iter().collect();
        self
    }

    /// Queue poll results; an exhausted queue polls `false`.
    #[must_use]
    pub fn with_polls(self, polls: Vec<bool>) -> Self {
        *self.poll_results.borrow_mut() = polls.into_iter().collect();
        self
    }

    /// Queue sizes reported by successive `size` calls; the last one sticks.
    #[must_use]
    pub fn with_sizes(self, sizes: Vec<(u16, u16)>) -> Self {
        *self.sizes.borrow_mut() = sizes.into_iter().collect();
        self
    }

    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    pub fn is_alternate_screen(&self) -> bool {
        self.alternate_screen
    }

    pub fn is_cursor_hidden(&self) -> bool {
        self.cursor_hidden
    }

    /// Get the underlying writer (consumes self).
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> TerminalBackend for TestableBackend<W> {
    fn enable_raw_mode(&mut self) -> Result<(), TuiError> {
        self.raw_mode = true;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<(), TuiError> {
        self.raw_mode = false;
        Ok(())
    }

    fn enter_alternate_screen(&mut self) -> Result<(), TuiError> {
        self.alternate_screen = true;
        execute!(self.writer, EnterAlternateScreen)?;
        Ok(())
    }

    fn leave_alternate_screen(&mut self) -> Result<(), TuiError> {
        self.alternate_screen = false;
        let _ = execute!(self.writer, LeaveAlternateScreen);
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<(), TuiError> {
        self.cursor_hidden = true;
        execute!(self.writer, cursor::Hide)?;
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<(), TuiError> {
        self.cursor_hidden = false;
        let _ = execute!(self.writer, cursor::Show);
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16), TuiError> {
        let mut sizes = self.sizes.borrow_mut();
        if sizes.len() > 1 {
            return Ok(sizes.pop_front().unwrap_or(self.size));
        }
        Ok(sizes.front().copied().unwrap_or(self.size))
    }

    fn poll(&self, _timeout: Duration) -> Result<bool, TuiError> {
        Ok(self.poll_results.borrow_mut().pop_front().unwrap_or(false))
    }

    fn read_event(&self) -> Result<CrosstermEvent, TuiError> {
        self.events
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| TuiError::Io(io::Error::new(io::ErrorKind::WouldBlock, "no events")))
    }

    fn write_flush(
        &mut self,
        buffer: &mut CellBuffer,
        renderer: &mut DiffRenderer,
    ) -> Result<(), TuiError> {
        renderer.flush(buffer, &mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Terminal implementation over a backend.
#[derive(Debug)]
pub struct GenericTerminal<B: TerminalBackend> {
    backend: B,
}

impl<B: TerminalBackend> GenericTerminal<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Access the backend, e.g. to inspect captured output.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: TerminalBackend> Terminal for GenericTerminal<B> {
    fn enter(&mut self) -> Result<(), TuiError> {
        self.backend.enable_raw_mode()?;
        self.backend.enter_alternate_screen()?;
        self.backend.hide_cursor()?;
        Ok(())
    }

    fn leave(&mut self) -> Result<(), TuiError> {
        self.backend.show_cursor()?;
        self.backend.leave_alternate_screen()?;
        self.backend.disable_raw_mode()?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16), TuiError> {
        self.backend.size()
    }

    fn poll(&self, timeout: Duration) -> Result<bool, TuiError> {
        self.backend.poll(timeout)
    }

    fn read_event(&self) -> Result<CrosstermEvent, TuiError> {
        self.backend.read_event()
    }

    fn flush(
        &mut self,
        buffer: &mut CellBuffer,
        renderer: &mut DiffRenderer,
    ) -> Result<(), TuiError> {
        self.backend.write_flush(buffer, renderer)
    }
}

/// Convenience alias for crossterm-backed terminal.
pub type CrosstermTerminal = GenericTerminal<CrosstermBackend>;

/// Configuration for the dashboard runner.
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Render cadence in milliseconds; also the input poll timeout.
    pub tick_rate_ms: u64,
    /// Color mode (auto-detected if not specified).
    pub color_mode: Option<ColorMode>,
    /// Skip Brick verification (debugging only).
    pub skip_verification: bool,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            color_mode: None,
            skip_verification: false,
        }
    }
}

/// Frame timing metrics.
#[derive(Debug, Clone, Default)]
pub struct FrameMetrics {
    /// Time spent in verification phase.
    pub verify_time: Duration,
    /// Time spent in measure phase.
    pub measure_time: Duration,
    /// Time spent in layout phase.
    pub layout_time: Duration,
    /// Time spent in paint phase.
    pub paint_time: Duration,
    /// Total frame time.
    pub total_time: Duration,
    /// Frame number.
    pub frame_count: u64,
}

/// Main application runner.
#[derive(Debug)]
pub struct TuiApp<W: Widget> {
    root: W,
    config: TuiConfig,
    metrics: FrameMetrics,
    should_quit: bool,
    color_mode: ColorMode,
}

struct AppRunner<'a, W: Widget, T: Terminal> {
    app: &'a mut TuiApp<W>,
    terminal: T,
    buffer: CellBuffer,
    renderer: DiffRenderer,
}

fn is_quit_key(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && (key.code == KeyCode::Char('q')
            || key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

impl<W: Widget, T: Terminal> AppRunner<'_, W, T> {
    fn run_loop(&mut self) -> Result<(), TuiError> {
        let tick_duration = Duration::from_millis(self.app.config.tick_rate_ms);

        loop {
            let frame_start = Instant::now();

            let (width, height) = self.terminal.size()?;
            if width != self.buffer.width() || height != self.buffer.height() {
                debug!(width, height, "terminal resized");
                self.buffer.resize(width, height);
                self.renderer.reset();
            }

            // Jidoka gate
            let verify_start = Instant::now();
            if !self.app.config.skip_verification {
                let verification = self.app.root.verify();
                if !verification.is_valid() {
                    return Err(TuiError::VerificationFailed(VerificationError::from(
                        verification,
                    )));
                }
            }
            self.app.metrics.verify_time = verify_start.elapsed();

            self.app.render_frame(&mut self.buffer);
            self.terminal.flush(&mut self.buffer, &mut self.renderer)?;

            self.app.metrics.total_time = frame_start.elapsed();
            self.app.metrics.frame_count += 1;

            if self.terminal.poll(tick_duration)? {
                match self.terminal.read_event()? {
                    CrosstermEvent::Key(key) if is_quit_key(&key) => self.app.should_quit = true,
                    CrosstermEvent::Resize(..) => self.buffer.mark_all_dirty(),
                    _ => {}
                }
            }

            if self.app.should_quit {
                break;
            }
        }

        Ok(())
    }
}

impl<W: Widget> TuiApp<W> {
    /// Create a runner for `root`.
    ///
    /// # Errors
    ///
    /// Returns [`TuiError::InvalidBrick`] when the root declares no assertions.
    pub fn new(root: W) -> Result<Self, TuiError> {
        if root.assertions().is_empty() {
            return Err(TuiError::InvalidBrick(
                "Root widget has no assertions - every Brick must have at least one falsifiable assertion".to_string(),
            ));
        }

        Ok(Self {
            root,
            config: TuiConfig::default(),
            metrics: FrameMetrics::default(),
            should_quit: false,
            color_mode: ColorMode::detect(),
        })
    }

    /// Set the configuration.
    #[must_use]
    pub fn with_config(mut self, config: TuiConfig) -> Self {
        if let Some(mode) = config.color_mode {
            self.color_mode = mode;
        }
        self.config = config;
        self
    }

    #[must_use]
    pub fn root(&self) -> &W {
        &self.root
    }

    #[must_use]
    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    #[must_use]
    pub const fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Request the application to quit after the current frame.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Run on the real terminal (blocking).
    ///
    /// # Errors
    ///
    /// Propagates terminal I/O failures and failed verification.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.run_with_terminal(GenericTerminal::new(CrosstermBackend::new()))
    }

    /// Run with a custom terminal implementation.
    ///
    /// The terminal is restored even when the loop fails.
    ///
    /// # Errors
    ///
    /// Propagates terminal I/O failures and failed verification.
    pub fn run_with_terminal<T: Terminal>(&mut self, mut terminal: T) -> Result<(), TuiError> {
        terminal.enter()?;

        let (width, height) = terminal.size()?;
        info!(width, height, tick_ms = self.config.tick_rate_ms, "dashboard started");
        let buffer = CellBuffer::new(width, height);
        let renderer = DiffRenderer::with_color_mode(self.color_mode);

        let mut runner = AppRunner {
            app: self,
            terminal,
            buffer,
            renderer,
        };

        let result = runner.run_loop();
        runner.terminal.leave()?;
        info!(frames = runner.app.metrics.frame_count, "dashboard stopped");

        result
    }

    fn render_frame(&mut self, buffer: &mut CellBuffer) {
        let width = buffer.width();
        let height = buffer.height();

        let measure_start = Instant::now();
        let constraints = Constraints::new(0.0, f32::from(width), 0.0, f32::from(height));
        let _size = self.root.measure(constraints);
        self.metrics.measure_time = measure_start.elapsed();

        let layout_start = Instant::now();
        let bounds = Rect::new(0.0, 0.0, f32::from(width), f32::from(height));
        let _ = self.root.layout(bounds);
        self.metrics.layout_time = layout_start.elapsed();

        let paint_start = Instant::now();
        buffer.blank();
        if !bounds.is_empty() {
            let mut canvas = DirectTerminalCanvas::new(buffer);
            self.root.paint(&mut canvas);
        }
        self.metrics.paint_time = paint_start.elapsed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Dashboard, RunChart, RunChartConfig};
    use crossterm::event::KeyEventState;
    use sampler_core::{Color, Consumer, Sample};
    use std::sync::Arc;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn dashboard() -> Dashboard {
        let chart = Arc::new(RunChart::new(RunChartConfig {
            title: "net".to_string(),
            ..RunChartConfig::default()
        }));
        chart.consume(Sample::new("rx", "12.5", Color::GREEN));
        Dashboard::new(vec![chart])
    }

    fn app() -> TuiApp<Dashboard> {
        TuiApp::new(dashboard()).unwrap().with_config(TuiConfig {
            tick_rate_ms: 1,
            color_mode: Some(ColorMode::Mono),
            skip_verification: false,
        })
    }

    #[test]
    fn test_rejects_root_without_assertions() {
        struct Bare;
        impl sampler_core::Brick for Bare {
            fn brick_name(&self) -> &'static str {
                "bare"
            }
            fn assertions(&self) -> &[sampler_core::BrickAssertion] {
                &[]
            }
            fn budget(&self) -> sampler_core::BrickBudget {
                sampler_core::BrickBudget::default()
            }
            fn verify(&self) -> sampler_core::BrickVerification {
                sampler_core::BrickVerification {
                    passed: vec![],
                    failed: vec![],
                    verification_time: Duration::ZERO,
                }
            }
        }
        impl Widget for Bare {
            fn measure(&self, constraints: Constraints) -> sampler_core::Size {
                constraints.biggest()
            }
            fn layout(&mut self, bounds: Rect) -> sampler_core::LayoutResult {
                sampler_core::LayoutResult {
                    size: bounds.size(),
                }
            }
            fn paint(&self, _canvas: &mut dyn sampler_core::Canvas) {}
        }
        assert!(matches!(TuiApp::new(Bare), Err(TuiError::InvalidBrick(_))));
    }

    #[test]
    fn test_quits_on_q_and_restores_terminal() {
        let backend = TestableBackend::new(Vec::new(), 60, 12)
            .with_polls(vec![false, false, true])
            .with_events(vec![key(KeyCode::Char('q'), KeyModifiers::NONE)]);
        let mut terminal = GenericTerminal::new(backend);
        let mut app = app();
        app.run_with_terminal(&mut terminal).unwrap();

        assert_eq!(app.metrics().frame_count, 3);
        let backend = terminal.backend();
        assert!(!backend.is_raw_mode());
        assert!(!backend.is_alternate_screen());
        assert!(!backend.is_cursor_hidden());
    }

    #[test]
    fn test_quits_on_ctrl_c() {
        let backend = TestableBackend::new(Vec::new(), 40, 10)
            .with_polls(vec![true])
            .with_events(vec![key(KeyCode::Char('c'), KeyModifiers::CONTROL)]);
        let mut app = app();
        app.run_with_terminal(GenericTerminal::new(backend)).unwrap();
        assert_eq!(app.metrics().frame_count, 1);
    }

    #[test]
    fn test_plain_c_does_not_quit() {
        let backend = TestableBackend::new(Vec::new(), 40, 10)
            .with_polls(vec![true, true])
            .with_events(vec![
                key(KeyCode::Char('c'), KeyModifiers::NONE),
                key(KeyCode::Char('q'), KeyModifiers::NONE),
            ]);
        let mut app = app();
        app.run_with_terminal(GenericTerminal::new(backend)).unwrap();
        assert_eq!(app.metrics().frame_count, 2);
    }

    #[test]
    fn test_frame_output_contains_chart_chrome() {
        let backend = TestableBackend::new(Vec::new(), 40, 10)
            .with_polls(vec![true])
            .with_events(vec![key(KeyCode::Char('q'), KeyModifiers::NONE)]);
        let mut terminal = GenericTerminal::new(backend);
        app().run_with_terminal(&mut terminal).unwrap();
        let out = String::from_utf8_lossy(&terminal.backend.writer).into_owned();
        assert!(out.contains("net"));
        assert!(out.contains('╭'));
        assert!(out.contains("rx"));
    }

    #[test]
    fn test_resize_between_frames() {
        let backend = TestableBackend::new(Vec::new(), 40, 10)
            .with_sizes(vec![(40, 10), (40, 10), (80, 20)])
            .with_polls(vec![false, true])
            .with_events(vec![key(KeyCode::Char('q'), KeyModifiers::NONE)]);
        let mut app = app();
        app.run_with_terminal(GenericTerminal::new(backend)).unwrap();
        assert_eq!(app.root().bounds(), Rect::new(0.0, 0.0, 80.0, 20.0));
    }

    #[test]
    fn test_failed_verification_stops_loop() {
        let mut app = TuiApp::new(Dashboard::new(Vec::new()))
            .unwrap()
            .with_config(TuiConfig {
                tick_rate_ms: 1,
                color_mode: Some(ColorMode::Mono),
                skip_verification: false,
            });
        let mut terminal = GenericTerminal::new(TestableBackend::new(Vec::new(), 40, 10));
        let err = app.run_with_terminal(&mut terminal).unwrap_err();
        assert!(matches!(err, TuiError::VerificationFailed(_)));
        assert!(!terminal.backend().is_raw_mode());
    }
}
