// src/core/value.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar cost value, optionally annotated with the precision it was
/// estimated to (e.g. a shot-noise standard error reported by a backend).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueEstimate {
    /// The estimated value.
    pub value: f64,
    /// Optional uncertainty of `value`.
    pub precision: Option<f64>,
}

impl ValueEstimate {
    /// Wraps a bare value with no precision attached.
    pub fn new(value: f64) -> Self {
        Self { value, precision: None }
    }

    /// Returns a copy carrying the given precision.
    pub fn with_precision(self, precision: f64) -> Self {
        Self { precision: Some(precision), ..self }
    }
}

impl From<f64> for ValueEstimate {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<ValueEstimate> for f64 {
    fn from(estimate: ValueEstimate) -> Self {
        estimate.value
    }
}

impl fmt::Display for ValueEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            Some(precision) => write!(f, "{} ± {}", self.value, precision),
            None => write!(f, "{}", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ValueEstimate::new(0.5).to_string(), "0.5");
        assert_eq!(ValueEstimate::new(0.5).with_precision(0.1).to_string(), "0.5 ± 0.1");
    }
}
