// src/distance/mod.rs

//! Distance measures between bit-string distributions.
//!
//! A distance measure is anything implementing [`DistanceMeasure`]; plain
//! closures with the matching signature qualify through a blanket impl, so a
//! cost function can be handed either one of the built-in measures below or a
//! caller-defined one.

use crate::core::{BitstringDistribution, QcbmError, Result};
use std::collections::{HashMap, HashSet};

/// Default clipping value for logarithms of vanishing probabilities.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Named numeric options forwarded to a distance measure (e.g. `"epsilon"`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DistanceMeasureParameters(HashMap<String, f64>);

impl DistanceMeasureParameters {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an option. Returns `self` for chaining.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Looks up an option.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Returns `true` if no options are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, f64>> for DistanceMeasureParameters {
    fn from(options: HashMap<String, f64>) -> Self {
        Self(options)
    }
}

/// Capability: a scalar divergence between a target and a measured distribution.
pub trait DistanceMeasure {
    /// Computes the distance of `measured` from `target`.
    fn distance(
        &self,
        target: &BitstringDistribution,
        measured: &BitstringDistribution,
        params: &DistanceMeasureParameters,
    ) -> Result<f64>;
}

impl<F> DistanceMeasure for F
where
    F: Fn(&BitstringDistribution, &BitstringDistribution, &DistanceMeasureParameters) -> Result<f64>,
{
    fn distance(
        &self,
        target: &BitstringDistribution,
        measured: &BitstringDistribution,
        params: &DistanceMeasureParameters,
    ) -> Result<f64> {
        self(target, measured, params)
    }
}

/// Union of the supports of two distributions.
fn support<'a>(p: &'a BitstringDistribution, q: &'a BitstringDistribution) -> HashSet<&'a str> {
    p.iter().chain(q.iter()).map(|(k, _)| k).collect()
}

fn epsilon(params: &DistanceMeasureParameters) -> Result<f64> {
    let epsilon = params.get("epsilon").unwrap_or(DEFAULT_EPSILON);
    if epsilon > 0.0 && epsilon.is_finite() {
        Ok(epsilon)
    } else {
        Err(QcbmError::DistanceError {
            message: format!("epsilon must be a positive finite number, got {}", epsilon),
        })
    }
}

/// `½ Σ_x |p(x) − q(x)|` over the union of both supports.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalVariationDistance;

impl DistanceMeasure for TotalVariationDistance {
    fn distance(
        &self,
        target: &BitstringDistribution,
        measured: &BitstringDistribution,
        _params: &DistanceMeasureParameters,
    ) -> Result<f64> {
        let sum: f64 = support(target, measured)
            .into_iter()
            .map(|x| (target.get(x).unwrap_or(0.0) - measured.get(x).unwrap_or(0.0)).abs())
            .sum();
        Ok(0.5 * sum)
    }
}

/// `−Σ_x p(x) ln max(q(x), ε)`, with `ε` taken from the `"epsilon"` option.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClippedNegativeLogLikelihood;

impl DistanceMeasure for ClippedNegativeLogLikelihood {
    fn distance(
        &self,
        target: &BitstringDistribution,
        measured: &BitstringDistribution,
        params: &DistanceMeasureParameters,
    ) -> Result<f64> {
        let epsilon = epsilon(params)?;
        let value: f64 = target
            .iter()
            .filter(|(_, p)| *p > 0.0)
            .map(|(x, p)| -p * measured.get(x).unwrap_or(0.0).max(epsilon).ln())
            .sum();
        Ok(value)
    }
}

/// Jensen–Shannon divergence (natural log), clipping `q` in the same way as
/// [`ClippedNegativeLogLikelihood`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JensenShannonDivergence;

impl DistanceMeasure for JensenShannonDivergence {
    fn distance(
        &self,
        target: &BitstringDistribution,
        measured: &BitstringDistribution,
        params: &DistanceMeasureParameters,
    ) -> Result<f64> {
        let epsilon = epsilon(params)?;
        let mut value = 0.0;
        for x in support(target, measured) {
            let p = target.get(x).unwrap_or(0.0);
            let q = measured.get(x).unwrap_or(0.0);
            let m = (0.5 * (p + q)).max(epsilon);
            if p > 0.0 {
                value += 0.5 * p * (p / m).ln();
            }
            if q > 0.0 {
                value += 0.5 * q * (q / m).ln();
            }
        }
        Ok(value)
    }
}

/// Normalizes copies of both distributions and applies `measure`.
///
/// # Returns
/// * `Err(QcbmError::DistributionMismatch)` if the distributions are over
///   different numbers of qubits (an empty distribution matches nothing).
/// * `Err(QcbmError::Incoherence)` if either has zero total weight.
/// * Otherwise whatever `measure` returns.
pub fn evaluate_distribution_distance<D>(
    target: &BitstringDistribution,
    measured: &BitstringDistribution,
    measure: &D,
    params: &DistanceMeasureParameters,
) -> Result<f64>
where
    D: DistanceMeasure + ?Sized,
{
    let target_qubits = target.num_qubits();
    let measured_qubits = measured.num_qubits();
    if target_qubits.is_none() || target_qubits != measured_qubits {
        return Err(QcbmError::DistributionMismatch { target_qubits, measured_qubits });
    }

    let mut target = target.clone();
    let mut measured = measured.clone();
    target.normalize()?;
    measured.normalize()?;

    measure.distance(&target, &measured, params)
}
