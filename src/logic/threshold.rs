//! Decision Threshold
//!
//! Converts a phishing probability (percent) into a verdict.

use serde::{Deserialize, Serialize};

/// Default decision threshold, in percent
pub const DEFAULT_PHISHING_THRESHOLD: f64 = 50.0;

/// Threshold Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Probability strictly above this is phishing (0.0 - 100.0)
    pub threshold: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_PHISHING_THRESHOLD,
        }
    }
}

impl ThresholdConfig {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Strict inequality: a probability equal to the threshold is benign
    pub fn is_phishing(&self, probability: f64) -> bool {
        probability > self.threshold
    }
}
