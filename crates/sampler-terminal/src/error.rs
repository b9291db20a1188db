//! Error types for sampler-terminal.

use crate::config::ConfigError;
use sampler_core::BrickVerification;
use thiserror::Error;

/// Errors that can occur in the TUI application.
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error from terminal operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dashboard configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Brick verification failed before a frame was painted.
    #[error("Brick verification failed: {0}")]
    VerificationFailed(VerificationError),

    /// Invalid Brick configuration.
    #[error("Invalid brick: {0}")]
    InvalidBrick(String),

    /// Terminal not available.
    #[error("Terminal not available")]
    TerminalNotAvailable,
}

/// Verification error with details.
#[derive(Debug)]
pub struct VerificationError {
    /// The verification result.
    pub verification: BrickVerification,
    /// Human-readable summary.
    pub summary: String,
}

impl std::fmt::Display for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary)
    }
}

impl From<BrickVerification> for VerificationError {
    fn from(v: BrickVerification) -> Self {
        let summary = if v.is_valid() {
            "Verification passed".to_string()
        } else {
            let reasons: Vec<&str> = v.failed.iter().map(|(_, why)| why.as_str()).collect();
            format!(
                "{} assertion(s) failed: {}",
                v.failed.len(),
                reasons.join("; ")
            )
        };
        Self {
            verification: v,
            summary,
        }
    }
}
