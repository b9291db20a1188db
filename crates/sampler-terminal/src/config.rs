//! YAML dashboard configuration.
//!
//! ```yaml
//! theme: dark
//! runcharts:
//!   - title: Latency
//!     rate-ms: 500
//!     precision: 2
//!     items:
//!       - label: google
//!         color: "#ff5f5f"
//!         sample: curl -o /dev/null -s -w '%{time_total}' https://google.com
//! ```

use crate::theme::{Theme, ThemeKind};
use crate::widgets::runchart::{RunChartConfig, MAX_PRECISION};
use sampler_core::{Color, ColorParseError};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a dashboard configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for the schema.
    #[error("YAML error: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// An item color is neither hex nor a known name.
    #[error("item '{label}': {source}")]
    Color {
        /// Item label
        label: String,
        /// Parse failure
        #[source]
        source: ColorParseError,
    },

    /// The configuration parsed but is not usable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_rate_ms() -> u64 {
    1000
}

fn default_precision() -> usize {
    1
}

fn default_border() -> bool {
    true
}

/// Root of a dashboard configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DashboardConfig {
    /// Color theme.
    #[serde(default)]
    pub theme: ThemeKind,
    /// Charts in display order.
    #[serde(default)]
    pub runcharts: Vec<RunChartSection>,
}

/// One run chart and its producers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunChartSection {
    #[serde(default)]
    pub title: String,
    /// Producer refresh interval in milliseconds.
    #[serde(default = "default_rate_ms")]
    pub rate_ms: u64,
    #[serde(default = "default_precision")]
    pub precision: usize,
    #[serde(default = "default_border")]
    pub border: bool,
    pub items: Vec<ItemConfig>,
}

/// A labelled series fed by a shell command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemConfig {
    pub label: String,
    /// Hex (`#rrggbb`) or color name; the theme palette is used when absent.
    #[serde(default)]
    pub color: Option<String>,
    /// Shell command printing one number per run.
    pub sample: String,
}

impl ItemConfig {
    /// Resolve the series color; `index` selects the palette fallback.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Color`] for an unrecognized color.
    pub fn resolved_color(&self, theme: &Theme, index: usize) -> Result<Color, ConfigError> {
        match &self.color {
            Some(id) => Color::parse(id).map_err(|source| ConfigError::Color {
                label: self.label.clone(),
                source,
            }),
            None => Ok(theme.series_color(index)),
        }
    }
}

impl RunChartSection {
    /// Widget settings for this chart.
    #[must_use]
    pub fn chart_config(&self) -> RunChartConfig {
        RunChartConfig {
            title: self.title.clone(),
            precision: self.precision,
            rate_ms: self.rate_ms,
            border: self.border,
        }
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let name = if self.title.is_empty() {
            format!("run chart #{}", index + 1)
        } else {
            format!("run chart '{}'", self.title)
        };
        if self.rate_ms == 0 {
            return Err(ConfigError::Invalid(format!("{name}: rate-ms must be positive")));
        }
        if self.precision > MAX_PRECISION {
            return Err(ConfigError::Invalid(format!(
                "{name}: precision {} exceeds {MAX_PRECISION}",
                self.precision
            )));
        }
        if self.items.is_empty() {
            return Err(ConfigError::Invalid(format!("{name}: no items")));
        }
        let mut seen = HashSet::new();
        for item in &self.items {
            if item.label.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name}: item without label")));
            }
            if item.sample.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{name}: item '{}' has no sample command",
                    item.label
                )));
            }
            if !seen.insert(item.label.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "{name}: duplicate label '{}'",
                    item.label
                )));
            }
        }
        Ok(())
    }
}

impl DashboardConfig {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML and
    /// [`ConfigError::Invalid`] or [`ConfigError::Color`] for unusable content.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file is unreadable, otherwise
    /// the errors of [`DashboardConfig::from_yaml`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Check the structural rules and item colors.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runcharts.is_empty() {
            return Err(ConfigError::Invalid("no run charts configured".to_string()));
        }
        let theme = self.theme();
        for (index, chart) in self.runcharts.iter().enumerate() {
            chart.validate(index)?;
            for (i, item) in chart.items.iter().enumerate() {
                item.resolved_color(&theme, i)?;
            }
        }
        Ok(())
    }

    /// Theme selected by the file.
    #[must_use]
    pub fn theme(&self) -> Theme {
        Theme::from_kind(self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r##"
theme: light
runcharts:
  - title: Latency
    position: [[0, 0], [80, 20]]
    rate-ms: 500
    precision: 2
    border: false
    items:
      - label: google
        color: "#ff5f5f"
        sample: echo 0.12
      - label: github
        sample: echo 0.3
"##;

    #[test]
    fn test_parse_full_document() {
        let config = DashboardConfig::from_yaml(FULL).unwrap();
        assert_eq!(config.theme, ThemeKind::Light);
        let chart = &config.runcharts[0];
        assert_eq!(chart.rate_ms, 500);
        assert_eq!(chart.precision, 2);
        assert!(!chart.border);
        assert_eq!(chart.items[1].label, "github");
        assert_eq!(
            chart.chart_config(),
            RunChartConfig {
                title: "Latency".to_string(),
                precision: 2,
                rate_ms: 500,
                border: false,
            }
        );
    }

    #[test]
    fn test_defaults_applied() {
        let config = DashboardConfig::from_yaml(
            "runcharts:\n  - items:\n      - label: a\n        sample: echo 1\n",
        )
        .unwrap();
        assert_eq!(config.theme, ThemeKind::Dark);
        let chart = &config.runcharts[0];
        assert_eq!(chart.rate_ms, 1000);
        assert_eq!(chart.precision, 1);
        assert!(chart.border);
        assert!(chart.title.is_empty());
    }

    #[test]
    fn test_item_colors_resolve() {
        let config = DashboardConfig::from_yaml(FULL).unwrap();
        let theme = config.theme();
        let items = &config.runcharts[0].items;
        assert_eq!(
            items[0].resolved_color(&theme, 0).unwrap(),
            Color::from_hex("#ff5f5f").unwrap()
        );
        assert_eq!(items[1].resolved_color(&theme, 1).unwrap(), theme.series_color(1));
    }

    #[test]
    fn test_rejects_empty_dashboard() {
        let err = DashboardConfig::from_yaml("theme: dark\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("no run charts")));
    }

    #[test]
    fn test_rejects_zero_rate() {
        let yaml = "runcharts:\n  - title: x\n    rate-ms: 0\n    items:\n      - label: a\n        sample: echo 1\n";
        let err = DashboardConfig::from_yaml(yaml).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: run chart 'x': rate-ms must be positive"
        );
    }

    #[test]
    fn test_rejects_duplicate_labels() {
        let yaml = "runcharts:\n  - items:\n      - label: a\n        sample: echo 1\n      - label: a\n        sample: echo 2\n";
        let err = DashboardConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("run chart #1: duplicate label 'a'"));
    }

    #[test]
    fn test_rejects_excess_precision() {
        let yaml = "runcharts:\n  - precision: 11\n    items:\n      - label: a\n        sample: echo 1\n";
        assert!(DashboardConfig::from_yaml(yaml)
            .unwrap_err()
            .to_string()
            .contains("precision 11 exceeds 10"));
    }

    #[test]
    fn test_rejects_blank_sample() {
        let yaml = "runcharts:\n  - items:\n      - label: a\n        sample: '  '\n";
        assert!(DashboardConfig::from_yaml(yaml)
            .unwrap_err()
            .to_string()
            .contains("has no sample command"));
    }

    #[test]
    fn test_rejects_unknown_color() {
        let yaml = "runcharts:\n  - items:\n      - label: a\n        color: chartreuse-ish\n        sample: echo 1\n";
        let err = DashboardConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Color { ref label, .. } if label == "a"));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = DashboardConfig::from_yaml("runcharts: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = DashboardConfig::load("/nonexistent/sampler.yml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().starts_with("cannot read /nonexistent/sampler.yml"));
    }
}
