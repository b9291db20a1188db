//! Shell-command sample producers.
//!
//! Every item runs on its own thread: it executes the item's command through
//! `sh -c` once per refresh interval and hands the trimmed stdout to the
//! chart as a [`Sample`]. Producers never wait for rendering.
//!
//! ```no_run
//! use sampler_core::Color;
//! use sampler_terminal::sampler::{Sampler, SampleSource};
//! use sampler_terminal::widgets::{RunChart, RunChartConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let chart = Arc::new(RunChart::new(RunChartConfig::default()));
//! let handle = Sampler::new()
//!     .with_source(chart, SampleSource::new("load", "cut -d' ' -f1 /proc/loadavg", Color::CYAN), Duration::from_secs(1))
//!     .start();
//! // ... run the dashboard ...
//! handle.stop();
//! ```

use sampler_core::{Color, Consumer, Sample};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Delay between consecutive producer starts.
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(10);

/// A labelled shell command.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSource {
    pub label: String,
    pub command: String,
    pub color: Color,
}

impl SampleSource {
    #[must_use]
    pub fn new(label: impl Into<String>, command: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
            color,
        }
    }

    /// Run the command once and turn its outcome into a sample.
    ///
    /// A spawn failure or non-zero exit yields a sample flagged as failed.
    #[must_use]
    pub fn sample(&self) -> Sample {
        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .output();
        match output {
            Ok(out) if out.status.success() => Sample::new(
                self.label.clone(),
                String::from_utf8_lossy(&out.stdout).trim(),
                self.color,
            ),
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr);
                let reason = match stderr.trim() {
                    "" => out.status.to_string(),
                    msg => format!("{}: {msg}", out.status),
                };
                warn!(label = %self.label, command = %self.command, %reason, "sample command failed");
                Sample::failed(self.label.clone(), self.color, reason)
            }
            Err(err) => {
                warn!(label = %self.label, command = %self.command, %err, "sample command did not start");
                Sample::failed(self.label.clone(), self.color, err.to_string())
            }
        }
    }
}

struct Producer {
    consumer: Arc<dyn Consumer>,
    source: SampleSource,
    rate: Duration,
}

/// Builder for a group of producers sharing one shutdown flag.
#[derive(Default)]
pub struct Sampler {
    producers: Vec<Producer>,
    stagger: Option<Duration>,
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler")
            .field(
                "sources",
                &self.producers.iter().map(|p| &p.source.label).collect::<Vec<_>>(),
            )
            .field("stagger", &self.stagger)
            .finish()
    }
}

impl Sampler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed `consumer` from `source` every `rate`.
    #[must_use]
    pub fn with_source(
        mut self,
        consumer: Arc<dyn Consumer>,
        source: SampleSource,
        rate: Duration,
    ) -> Self {
        self.producers.push(Producer {
            consumer,
            source,
            rate,
        });
        self
    }

    /// Override the delay between producer starts.
    #[must_use]
    pub const fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = Some(stagger);
        self
    }

    /// Number of configured producers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// Spawn one thread per producer.
    ///
    /// The first sample is taken immediately; later ones follow a fixed
    /// schedule so slow commands do not accumulate drift.
    pub fn start(self) -> SamplerHandle {
        let running = Arc::new(AtomicBool::new(true));
        let stagger = self.stagger.unwrap_or(DEFAULT_STAGGER);

        let mut threads = Vec::with_capacity(self.producers.len());
        for (i, producer) in self.producers.into_iter().enumerate() {
            let running = Arc::clone(&running);
            let delay = stagger.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX));
            let label = producer.source.label.clone();
            let spawned = thread::Builder::new()
                .name(format!("sampler-{label}"))
                .spawn(move || run_producer(&producer, &running, delay));
            match spawned {
                Ok(handle) => threads.push(handle),
                Err(err) => warn!(%label, %err, "failed to spawn producer thread"),
            }
        }
        debug!(producers = threads.len(), "sampling started");

        SamplerHandle { running, threads }
    }
}

/// Sleep until `deadline` or until shutdown; returns whether to keep going.
fn wait_until(deadline: Instant, running: &AtomicBool) -> bool {
    loop {
        if !running.load(Ordering::Acquire) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::park_timeout(deadline - now);
    }
}

fn run_producer(producer: &Producer, running: &AtomicBool, delay: Duration) {
    let rate = producer.rate.max(Duration::from_millis(1));
    let mut next = Instant::now() + delay;
    while wait_until(next, running) {
        producer.consumer.consume(producer.source.sample());
        next += rate;
        let now = Instant::now();
        if next < now {
            // Command outran its interval: skip the missed ticks.
            next = now;
        }
    }
}

/// Running producers. Dropping the handle stops them.
#[derive(Debug)]
pub struct SamplerHandle {
    running: Arc<AtomicBool>,
    threads: Vec<JoinHandle<()>>,
}

impl SamplerHandle {
    /// Whether producers are still scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Raise the shutdown flag and join every producer.
    ///
    /// A command already executing is waited for.
    pub fn stop(mut self) {
        self.stop_internal();
    }

    fn stop_internal(&mut self) {
        self.running.store(false, Ordering::Release);
        for handle in &self.threads {
            handle.thread().unpark();
        }
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for SamplerHandle {
    fn drop(&mut self) {
        self.stop_internal();
    }
}
