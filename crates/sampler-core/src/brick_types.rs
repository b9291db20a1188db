//! Brick verification types.
//!
//! Every widget declares falsifiable assertions about its own state and a
//! render budget. The app runner verifies the root brick before each frame
//! and refuses to paint a widget whose assertions fail.

use std::time::Duration;

/// Brick assertion that must be verified at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum BrickAssertion {
    /// Text content must be visible (not hidden, not zero-opacity)
    TextVisible,

    /// Maximum render latency in milliseconds
    MaxLatencyMs(u32),

    /// Minimum viewport (width, height) in cells for a meaningful render
    MinViewport(u16, u16),

    /// Custom assertion with a name for error reporting
    Custom(String),
}

impl BrickAssertion {
    /// Create a text visibility assertion
    #[must_use]
    pub const fn text_visible() -> Self {
        Self::TextVisible
    }

    /// Create a max latency assertion
    #[must_use]
    pub const fn max_latency_ms(ms: u32) -> Self {
        Self::MaxLatencyMs(ms)
    }

    /// Create a minimum viewport assertion
    #[must_use]
    pub const fn min_viewport(width: u16, height: u16) -> Self {
        Self::MinViewport(width, height)
    }

    /// Create a named custom assertion
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }
}

/// Performance budget for a brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrickBudget {
    /// Maximum time for measure phase
    pub measure_ms: u32,
    /// Maximum time for layout phase
    pub layout_ms: u32,
    /// Maximum time for paint phase
    pub paint_ms: u32,
    /// Total budget (may be less than sum of phases)
    pub total_ms: u32,
}

impl BrickBudget {
    /// Create a budget with equal distribution across phases
    #[must_use]
    pub const fn uniform(total_ms: u32) -> Self {
        let phase_ms = total_ms / 3;
        Self {
            measure_ms: phase_ms,
            layout_ms: phase_ms,
            paint_ms: phase_ms,
            total_ms,
        }
    }

    /// Convert to Duration
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        Duration::from_millis(self.total_ms as u64)
    }
}

impl Default for BrickBudget {
    fn default() -> Self {
        // Default: 16ms total for 60fps
        Self::uniform(16)
    }
}

/// Result of verifying brick assertions
#[derive(Debug, Clone)]
pub struct BrickVerification {
    /// All assertions that passed
    pub passed: Vec<BrickAssertion>,
    /// All assertions that failed with reasons
    pub failed: Vec<(BrickAssertion, String)>,
    /// Time taken to verify
    pub verification_time: Duration,
}

impl BrickVerification {
    /// Check if all assertions passed
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failed.is_empty()
    }

    /// Get the falsification score (passed / total)
    #[must_use]
    pub fn score(&self) -> f32 {
        let total = self.passed.len() + self.failed.len();
        if total == 0 {
            1.0
        } else {
            self.passed.len() as f32 / total as f32
        }
    }
}

/// Core Brick trait.
///
/// Presentation components implement this trait so the runner can check
/// their contract before painting:
/// 1. Assertions that must pass for the brick to be valid
/// 2. Performance budget that must not be exceeded
pub trait Brick: Send + Sync {
    /// Get the brick's unique type name
    fn brick_name(&self) -> &'static str;

    /// Get all assertions for this brick
    fn assertions(&self) -> &[BrickAssertion];

    /// Get the performance budget
    fn budget(&self) -> BrickBudget;

    /// Verify all assertions against current state
    fn verify(&self) -> BrickVerification;

    /// Check if this brick can be rendered (all assertions pass)
    fn can_render(&self) -> bool {
        self.verify().is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_uniform_splits_phases() {
        let budget = BrickBudget::uniform(30);
        assert_eq!(budget.measure_ms, 10);
        assert_eq!(budget.paint_ms, 10);
        assert_eq!(budget.as_duration(), Duration::from_millis(30));
        assert_eq!(BrickBudget::default().total_ms, 16);
    }

    #[test]
    fn test_verification_score() {
        let v = BrickVerification {
            passed: vec![BrickAssertion::text_visible()],
            failed: vec![(BrickAssertion::max_latency_ms(16), "slow".to_string())],
            verification_time: Duration::from_micros(1),
        };
        assert!(!v.is_valid());
        assert_eq!(v.score(), 0.5);
    }

    #[test]
    fn test_empty_verification_is_valid() {
        let v = BrickVerification {
            passed: vec![],
            failed: vec![],
            verification_time: Duration::ZERO,
        };
        assert!(v.is_valid());
        assert_eq!(v.score(), 1.0);
    }

    #[test]
    fn test_assertion_constructors() {
        assert_eq!(
            BrickAssertion::min_viewport(4, 10),
            BrickAssertion::MinViewport(4, 10)
        );
        assert_eq!(
            BrickAssertion::custom("has charts"),
            BrickAssertion::Custom("has charts".to_string())
        );
    }
}
