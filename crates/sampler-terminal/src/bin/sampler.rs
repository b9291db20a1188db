//! sampler: live terminal run charts fed by shell commands
//!
//! Run: cargo run -p sampler-terminal --features cli --bin sampler -- --config sampler.yml

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sampler_terminal::{build_dashboard, DashboardConfig, TuiApp, TuiConfig, TuiError};

/// Visualize shell command output as real-time run charts
#[derive(Parser)]
#[command(name = "sampler", version, about, long_about = None)]
struct Cli {
    /// Dashboard configuration (YAML)
    #[arg(short, long, value_name = "PATH")]
    config: PathBuf,

    /// Write logs to this file (filtered by RUST_LOG, default info)
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Render interval in milliseconds
    #[arg(long, default_value = "250")]
    tick_ms: u64,
}

fn init_logging(path: &Path) -> Result<(), TuiError> {
    let file = File::create(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
    Ok(())
}

fn main() -> Result<(), TuiError> {
    let cli = Cli::parse();

    // The terminal belongs to the dashboard; logs only go to a file.
    if let Some(path) = &cli.log {
        init_logging(path)?;
    }

    let config = DashboardConfig::load(&cli.config)?;
    let (dashboard, producers) = build_dashboard(&config)?;

    let mut app = TuiApp::new(dashboard)?.with_config(TuiConfig {
        tick_rate_ms: cli.tick_ms.max(1),
        ..TuiConfig::default()
    });

    let sampling = producers.start();
    let result = app.run();
    sampling.stop();
    result
}
