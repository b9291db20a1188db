//! Sample ingestion contract.
//!
//! Producers (shell commands, APIs, tests) hand [`Sample`]s to a
//! [`Consumer`]. The consumer owns timestamping and parsing: a sample carries
//! the raw textual value exactly as the producer emitted it.

use crate::Color;
use std::sync::Arc;
use thiserror::Error;

/// One externally produced observation for a labelled series.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Series label; samples with equal labels belong to one line.
    pub label: String,
    /// Raw value as produced, parsed as a decimal on ingestion.
    pub value: String,
    /// Color of the series this sample belongs to.
    pub color: Color,
    /// Set by the producer when it failed to obtain a value.
    pub error: Option<String>,
}

impl Sample {
    /// Create a sample carrying a raw value.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            color,
            error: None,
        }
    }

    /// Create a sample for a producer that failed to obtain a value.
    #[must_use]
    pub fn failed(label: impl Into<String>, color: Color, error: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
            color,
            error: Some(error.into()),
        }
    }

    /// Parse the raw value as a finite decimal number.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::Producer`] when the producer flagged the sample
    /// and [`SampleError::Unparseable`] when the value is not a finite number.
    pub fn parse_value(&self) -> Result<f64, SampleError> {
        if let Some(message) = &self.error {
            return Err(SampleError::Producer {
                label: self.label.clone(),
                message: message.clone(),
            });
        }
        self.value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| SampleError::Unparseable {
                label: self.label.clone(),
                value: self.value.clone(),
            })
    }
}

/// Reasons a sample does not yield a plottable number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    /// The raw value is not a finite decimal number.
    #[error("sample '{label}': value {value:?} is not a number")]
    Unparseable {
        /// Series label
        label: String,
        /// Raw value received
        value: String,
    },

    /// The producer reported a failure instead of a value.
    #[error("sample '{label}': producer failed: {message}")]
    Producer {
        /// Series label
        label: String,
        /// Producer-supplied description
        message: String,
    },
}

/// Sink for samples. Implementations must tolerate calls from any thread.
pub trait Consumer: Send + Sync {
    /// Ingest one sample.
    fn consume(&self, sample: Sample);
}

impl<T: Consumer + ?Sized> Consumer for Arc<T> {
    fn consume(&self, sample: Sample) {
        (**self).consume(sample);
    }
}
