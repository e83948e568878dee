// src/validation/mod.rs

//! Provides functions to validate `BitstringDistribution` contents.

use crate::core::{BitstringDistribution, QcbmError, Result};

// Default tolerance value (can be overridden by caller)
const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Checks that a single bit-string key is made of `'0'`/`'1'` characters only.
fn is_bitstring(key: &str) -> bool {
    key.bytes().all(|b| b == b'0' || b == b'1')
}

/// Checks if the distribution is normalized (sum of weights ≈ 1.0).
///
/// # Arguments
/// * `distribution` - The `BitstringDistribution` to check.
/// * `tolerance` - Allowed deviation from 1.0 (e.g., 1e-9). Defaults are available.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(QcbmError::Incoherence)` if normalization fails.
pub fn check_normalization(distribution: &BitstringDistribution, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let total = distribution.total_weight();
    if (total - 1.0).abs() > effective_tolerance {
        Err(QcbmError::Incoherence {
            message: format!("Distribution normalization failed. Sum(w_i) = {} (Deviation > {})", total, effective_tolerance)
        })
    } else {
        Ok(())
    }
}

/// Performs the structural checks every distribution must pass: equal-length
/// binary keys and finite non-negative weights. Normalization is not required.
///
/// # Returns
/// * `Ok(())` if all checks pass.
/// * `Err(QcbmError::InvalidDistribution)` naming the first offending entry.
pub fn validate_distribution(distribution: &BitstringDistribution) -> Result<()> {
    let expected_len = distribution.num_qubits();
    for (bitstring, weight) in distribution.iter() {
        if !is_bitstring(bitstring) {
            return Err(QcbmError::InvalidDistribution {
                message: format!("key {:?} contains characters other than '0' and '1'", bitstring)
            });
        }
        if Some(bitstring.len()) != expected_len {
            return Err(QcbmError::InvalidDistribution {
                message: format!("key {:?} has length {}, expected {:?}", bitstring, bitstring.len(), expected_len)
            });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(QcbmError::InvalidDistribution {
                message: format!("weight {} for key {:?} is not a finite non-negative number", weight, bitstring)
            });
        }
    }
    Ok(())
}
