//! Quorum checks for missing data.

use thiserror::Error;

/// The default fraction of languages that must have data for a property.
pub const DEFAULT_QUORUM_THRESHOLD: f64 = 0.5;

/// Too few languages had data for a property to answer a query about it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "Insufficient data for '{field}': only {present} of {total} languages have it \
     (quorum {threshold})"
)]
pub struct QuorumError {
    pub field: String,
    pub present: usize,
    pub total: usize,
    pub threshold: f64,
}

impl QuorumError {
    pub fn missing(&self) -> usize {
        self.total - self.present
    }
}

/// Decides whether enough languages had data.
///
/// A check fails when `present < threshold * total`; exactly half present
/// passes the default threshold. An empty set always passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuorumPolicy {
    threshold: f64,
}

impl Default for QuorumPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_QUORUM_THRESHOLD,
        }
    }
}

impl QuorumPolicy {
    /// Creates a policy; the threshold is clamped into `[0, 1]`.
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            DEFAULT_QUORUM_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self { threshold }
    }

    /// A policy that never fails.
    pub fn disabled() -> Self {
        Self { threshold: 0.0 }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn check(&self, field: &str, present: usize, total: usize) -> Result<(), QuorumError> {
        if total > 0 && (present as f64) < self.threshold * total as f64 {
            return Err(QuorumError {
                field: field.to_string(),
                present,
                total,
                threshold: self.threshold,
            });
        }
        Ok(())
    }
}
