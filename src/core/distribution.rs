// src/core/distribution.rs

use crate::core::{QcbmError, Result};
use crate::validation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A weighting over fixed-length bit-strings.
///
/// Keys are strings of `'0'`/`'1'` characters, all of the same length (the
/// number of qubits being modelled). Weights are non-negative and finite but
/// need not sum to one: targets built from patterns carry weight `1.0` per
/// pattern, while backends usually report empirical frequencies. Distance
/// measures normalize internally, see
/// [`evaluate_distribution_distance`](crate::distance::evaluate_distribution_distance).
///
/// Analogy: the measurement histogram returned by running a circuit many times.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "HashMap<String, f64>", into = "HashMap<String, f64>")]
pub struct BitstringDistribution {
    distribution_dict: HashMap<String, f64>,
}

impl BitstringDistribution {
    /// Creates a distribution from a bit-string → weight mapping.
    ///
    /// # Returns
    /// * `Err(QcbmError::InvalidDistribution)` if keys differ in length, contain
    ///   anything other than `'0'` and `'1'`, or a weight is negative or not finite.
    pub fn new(distribution_dict: HashMap<String, f64>) -> Result<Self> {
        let distribution = Self { distribution_dict };
        validation::validate_distribution(&distribution)?;
        Ok(distribution)
    }

    /// Builds a distribution from a dense probability vector.
    ///
    /// Index `i` becomes the big-endian bit-string of `i`, so the vector length
    /// must be a power of two no smaller than 2.
    ///
    /// # Arguments
    /// * `probabilities` - One weight per computational basis state.
    pub fn from_probabilities(probabilities: &[f64]) -> Result<Self> {
        let len = probabilities.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(QcbmError::InvalidDistribution {
                message: format!("probability vector length {} is not a power of two >= 2", len),
            });
        }
        let width = len.trailing_zeros() as usize;
        let distribution_dict = probabilities
            .iter()
            .enumerate()
            .map(|(index, p)| (format!("{:0width$b}", index, width = width), *p))
            .collect();
        Self::new(distribution_dict)
    }

    /// Builds the normalized empirical distribution of a collection of
    /// measured bit-strings.
    pub fn from_samples<I, S>(samples: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts: HashMap<String, f64> = HashMap::new();
        let mut total = 0usize;
        for sample in samples {
            *counts.entry(sample.as_ref().to_string()).or_insert(0.0) += 1.0;
            total += 1;
        }
        if total == 0 {
            return Err(QcbmError::InvalidDistribution {
                message: "cannot build an empirical distribution from zero samples".to_string(),
            });
        }
        for weight in counts.values_mut() {
            *weight /= total as f64;
        }
        Self::new(counts)
    }

    /// Weight of `bitstring`, or `None` if it is not in the support.
    pub fn get(&self, bitstring: &str) -> Option<f64> {
        self.distribution_dict.get(bitstring).copied()
    }

    /// Number of qubits (key length); `None` for an empty distribution.
    pub fn num_qubits(&self) -> Option<usize> {
        self.distribution_dict.keys().next().map(|k| k.len())
    }

    /// Number of bit-strings with an entry.
    pub fn len(&self) -> usize {
        self.distribution_dict.len()
    }

    /// Returns `true` if the distribution has no entries.
    pub fn is_empty(&self) -> bool {
        self.distribution_dict.is_empty()
    }

    /// Iterates over `(bitstring, weight)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.distribution_dict.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.distribution_dict.values().sum()
    }

    /// Returns `true` if the weights sum to one within `tolerance`
    /// (default `1e-9`).
    pub fn is_normalized(&self, tolerance: Option<f64>) -> bool {
        validation::check_normalization(self, tolerance).is_ok()
    }

    /// Rescales the weights in place so they sum to one.
    ///
    /// # Returns
    /// * `Err(QcbmError::Incoherence)` if the total weight is zero, since there
    ///   is nothing to rescale.
    pub fn normalize(&mut self) -> Result<()> {
        let total = self.total_weight();
        if total <= 0.0 {
            return Err(QcbmError::Incoherence {
                message: "cannot normalize a distribution with zero total weight".to_string(),
            });
        }
        for weight in self.distribution_dict.values_mut() {
            *weight /= total;
        }
        Ok(())
    }

    /// Returns a reference to the underlying bit-string → weight map.
    pub fn distribution_dict(&self) -> &HashMap<String, f64> {
        &self.distribution_dict
    }

    /// Consumes the distribution, yielding the underlying map.
    pub fn into_distribution_dict(self) -> HashMap<String, f64> {
        self.distribution_dict
    }
}

impl TryFrom<HashMap<String, f64>> for BitstringDistribution {
    type Error = QcbmError;

    fn try_from(distribution_dict: HashMap<String, f64>) -> Result<Self> {
        Self::new(distribution_dict)
    }
}

impl From<BitstringDistribution> for HashMap<String, f64> {
    fn from(distribution: BitstringDistribution) -> Self {
        distribution.distribution_dict
    }
}

impl fmt::Display for BitstringDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitstring Distribution:")?;
        if self.distribution_dict.is_empty() {
            writeln!(f, "  (empty)")?;
        } else {
            // Sort by bit-string for consistent and readable output
            let mut sorted: Vec<_> = self.distribution_dict.iter().collect();
            sorted.sort_by(|(a, _), (b, _)| a.cmp(b));
            for (bitstring, weight) in sorted {
                writeln!(f, "  {}: {:.6}", bitstring, weight)?;
            }
        }
        Ok(())
    }
}
