// src/cost_function/mod.rs

//! Cost function for quantum circuit Born machines.
//!
//! `QcbmCostFunction` ties together an [`Ansatz`] that turns parameters into an
//! executable circuit, a [`Backend`] that samples that circuit, a target
//! distribution and a [`DistanceMeasure`]. Each call to
//! [`QcbmCostFunction::evaluate`] runs that whole pipeline once; an external
//! optimizer drives it repeatedly.
//!
//! Evaluation history is append-only and unbounded. Callers running long
//! optimizations should bound the iteration count or disable the history.

use crate::core::{BitstringDistribution, QcbmError, Result, ValueEstimate};
use crate::distance::{evaluate_distribution_distance, DistanceMeasure, DistanceMeasureParameters};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Capability: compiles a parameter vector into an executable circuit.
pub trait Ansatz {
    /// Circuit representation understood by the paired [`Backend`].
    type Circuit;

    /// Binds `params` to the ansatz template.
    fn executable_circuit(&self, params: &[f64]) -> Result<Self::Circuit>;
}

/// Capability: runs a circuit and reports the distribution of measured bit-strings.
pub trait Backend<C> {
    /// Executes `circuit` and returns the observed distribution.
    fn bitstring_distribution(&mut self, circuit: &C) -> Result<BitstringDistribution>;
}

/// Gradient method an optimizer should use with this cost function.
///
/// Carried for the optimizer's benefit only; evaluation never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientType {
    /// Finite-difference estimate of the gradient.
    #[default]
    FiniteDifference,
}

impl FromStr for GradientType {
    type Err = QcbmError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "finite_difference" => Ok(GradientType::FiniteDifference),
            other => Err(QcbmError::UnsupportedGradientType { tag: other.to_string() }),
        }
    }
}

impl fmt::Display for GradientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradientType::FiniteDifference => write!(f, "finite_difference"),
        }
    }
}

/// One logged call to [`QcbmCostFunction::evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Cost value returned by the call.
    pub value: f64,
    /// Owned copy of the parameters passed in.
    pub params: Vec<f64>,
    /// Distribution observed on the backend.
    pub bitstring_distribution: HashMap<String, f64>,
}

/// Distance of a Born machine's output from a target distribution, as a
/// function of the ansatz parameters.
///
/// Not meant to be shared between threads: `evaluate` takes `&mut self`, so a
/// single caller drives each instance unless it is wrapped in a lock.
pub struct QcbmCostFunction<A, B, D> {
    ansatz: A,
    backend: B,
    distance_measure: D,
    distance_measure_parameters: DistanceMeasureParameters,
    target_distribution: BitstringDistribution,
    save_evaluation_history: bool,
    gradient_type: GradientType,
    /// Chronological record of every evaluation, if enabled.
    evaluations_history: Vec<EvaluationRecord>,
}

impl<A, B, D> QcbmCostFunction<A, B, D>
where
    A: Ansatz,
    B: Backend<A::Circuit>,
    D: DistanceMeasure,
{
    /// Creates a cost function that records its history and advertises
    /// finite-difference gradients. Use [`QcbmCostFunctionBuilder`] to change either.
    pub fn new(
        ansatz: A,
        backend: B,
        distance_measure: D,
        distance_measure_parameters: DistanceMeasureParameters,
        target_distribution: BitstringDistribution,
    ) -> Self {
        Self {
            ansatz,
            backend,
            distance_measure,
            distance_measure_parameters,
            target_distribution,
            save_evaluation_history: true,
            gradient_type: GradientType::default(),
            evaluations_history: Vec::new(),
        }
    }

    /// Evaluates the cost for `params`, recording the evaluation if history is enabled.
    ///
    /// Every call compiles and samples a fresh circuit; nothing is cached.
    ///
    /// # Returns
    /// * `Ok(ValueEstimate)` holding the distance of the observed distribution from the target.
    /// * `Err(QcbmError)` exactly as raised by the ansatz, backend or distance
    ///   measure. Failed calls leave the history unchanged.
    pub fn evaluate(&mut self, params: &[f64]) -> Result<ValueEstimate> {
        let (value, distribution) = self.evaluate_distribution(params)?;
        if self.save_evaluation_history {
            self.evaluations_history.push(EvaluationRecord {
                value,
                params: params.to_vec(),
                bitstring_distribution: distribution.into_distribution_dict(),
            });
        }
        debug!("cost function evaluated to {} for {} parameters", value, params.len());
        Ok(ValueEstimate::new(value))
    }

    fn evaluate_distribution(&mut self, params: &[f64]) -> Result<(f64, BitstringDistribution)> {
        trace!("evaluating cost function at {:?}", params);
        let circuit = self.ansatz.executable_circuit(params)?;
        let distribution = self.backend.bitstring_distribution(&circuit)?;
        let value = evaluate_distribution_distance(
            &self.target_distribution,
            &distribution,
            &self.distance_measure,
            &self.distance_measure_parameters,
        )?;
        Ok((value, distribution))
    }
}

impl<A, B, D> QcbmCostFunction<A, B, D> {
    /// Evaluations recorded so far, oldest first. Always empty when history is disabled.
    pub fn evaluations_history(&self) -> &[EvaluationRecord] {
        &self.evaluations_history
    }

    /// Serializes the evaluation history as a JSON array.
    pub fn history_to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.evaluations_history)?)
    }

    /// The distribution the Born machine is trained towards.
    pub fn target_distribution(&self) -> &BitstringDistribution {
        &self.target_distribution
    }

    /// Options forwarded to the distance measure.
    pub fn distance_measure_parameters(&self) -> &DistanceMeasureParameters {
        &self.distance_measure_parameters
    }

    /// Gradient method requested for the optimizer.
    pub fn gradient_type(&self) -> GradientType {
        self.gradient_type
    }

    /// Returns `true` if evaluations are being recorded.
    pub fn saves_evaluation_history(&self) -> bool {
        self.save_evaluation_history
    }

    /// The ansatz in use.
    pub fn ansatz(&self) -> &A {
        &self.ansatz
    }

    /// The backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

//-------------------------------------------------------------------------
// Cost Function Builder
//-------------------------------------------------------------------------

/// A helper struct for constructing `QcbmCostFunction` instances using method chaining.
pub struct QcbmCostFunctionBuilder<A, B, D> {
    ansatz: Option<A>,
    backend: Option<B>,
    distance_measure: Option<D>,
    distance_measure_parameters: DistanceMeasureParameters,
    target_distribution: Option<BitstringDistribution>,
    save_evaluation_history: bool,
    gradient_type: GradientType,
}

impl<A, B, D> QcbmCostFunctionBuilder<A, B, D>
where
    A: Ansatz,
    B: Backend<A::Circuit>,
    D: DistanceMeasure,
{
    /// Creates an empty builder with history enabled and finite-difference gradients.
    pub fn new() -> Self {
        Self {
            ansatz: None,
            backend: None,
            distance_measure: None,
            distance_measure_parameters: DistanceMeasureParameters::new(),
            target_distribution: None,
            save_evaluation_history: true,
            gradient_type: GradientType::default(),
        }
    }

    /// Sets the ansatz.
    pub fn ansatz(mut self, ansatz: A) -> Self {
        self.ansatz = Some(ansatz);
        self
    }

    /// Sets the backend.
    pub fn backend(mut self, backend: B) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Sets the distance measure.
    pub fn distance_measure(mut self, distance_measure: D) -> Self {
        self.distance_measure = Some(distance_measure);
        self
    }

    /// Replaces the options forwarded to the distance measure.
    pub fn distance_measure_parameters(mut self, params: DistanceMeasureParameters) -> Self {
        self.distance_measure_parameters = params;
        self
    }

    /// Sets the target distribution.
    pub fn target_distribution(mut self, target: BitstringDistribution) -> Self {
        self.target_distribution = Some(target);
        self
    }

    /// Enables or disables evaluation history.
    pub fn save_evaluation_history(mut self, save: bool) -> Self {
        self.save_evaluation_history = save;
        self
    }

    /// Sets the gradient method advertised to the optimizer.
    pub fn gradient_type(mut self, gradient_type: GradientType) -> Self {
        self.gradient_type = gradient_type;
        self
    }

    /// Consumes the builder and returns the finished cost function.
    ///
    /// # Returns
    /// * `Err(QcbmError::MissingComponent)` naming the first absent part.
    pub fn build(self) -> Result<QcbmCostFunction<A, B, D>> {
        let missing = |component| QcbmError::MissingComponent { component };
        let mut cost_function = QcbmCostFunction::new(
            self.ansatz.ok_or_else(|| missing("ansatz"))?,
            self.backend.ok_or_else(|| missing("backend"))?,
            self.distance_measure.ok_or_else(|| missing("distance measure"))?,
            self.distance_measure_parameters,
            self.target_distribution.ok_or_else(|| missing("target distribution"))?,
        );
        cost_function.save_evaluation_history = self.save_evaluation_history;
        cost_function.gradient_type = self.gradient_type;
        Ok(cost_function)
    }
}

impl<A, B, D> Default for QcbmCostFunctionBuilder<A, B, D>
where
    A: Ansatz,
    B: Backend<A::Circuit>,
    D: DistanceMeasure,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::TotalVariationDistance;

    /// Ansatz whose "circuit" is just the first parameter.
    struct ProbabilityAnsatz;

    impl Ansatz for ProbabilityAnsatz {
        type Circuit = f64;

        fn executable_circuit(&self, params: &[f64]) -> Result<f64> {
            params.first().copied().ok_or_else(|| QcbmError::AnsatzError {
                message: "expected one parameter".to_string(),
            })
        }
    }

    /// Backend reporting `p(1) = circuit` on a single qubit.
    struct BernoulliBackend {
        calls: usize,
    }

    impl Backend<f64> for BernoulliBackend {
        fn bitstring_distribution(&mut self, circuit: &f64) -> Result<BitstringDistribution> {
            self.calls += 1;
            BitstringDistribution::from_probabilities(&[1.0 - circuit, *circuit])
        }
    }

    fn target() -> BitstringDistribution {
        BitstringDistribution::new([("0".to_string(), 1.0)].into_iter().collect())
            .expect("valid target")
    }

    #[test]
    fn test_gradient_type_parsing() {
        assert_eq!("finite_difference".parse::<GradientType>().ok(), Some(GradientType::FiniteDifference));
        assert_eq!(GradientType::default().to_string(), "finite_difference");
        assert!(matches!(
            "parameter_shift".parse::<GradientType>(),
            Err(QcbmError::UnsupportedGradientType { .. })
        ));
    }

    #[test]
    fn test_no_caching_of_repeated_params() -> Result<()> {
        let mut cost = QcbmCostFunction::new(
            ProbabilityAnsatz,
            BernoulliBackend { calls: 0 },
            TotalVariationDistance,
            DistanceMeasureParameters::new(),
            target(),
        );
        cost.evaluate(&[0.25])?;
        cost.evaluate(&[0.25])?;
        assert_eq!(cost.backend().calls, 2);
        assert_eq!(cost.evaluations_history().len(), 2);
        Ok(())
    }

    #[test]
    fn test_ansatz_error_propagates_without_history() {
        let mut cost = QcbmCostFunction::new(
            ProbabilityAnsatz,
            BernoulliBackend { calls: 0 },
            TotalVariationDistance,
            DistanceMeasureParameters::new(),
            target(),
        );
        let err = cost.evaluate(&[]).unwrap_err();
        assert!(matches!(err, QcbmError::AnsatzError { .. }));
        assert_eq!(cost.backend().calls, 0);
        assert!(cost.evaluations_history().is_empty());
    }

    #[test]
    fn test_builder_requires_components() {
        let result = QcbmCostFunctionBuilder::<ProbabilityAnsatz, BernoulliBackend, TotalVariationDistance>::new()
            .ansatz(ProbabilityAnsatz)
            .backend(BernoulliBackend { calls: 0 })
            .distance_measure(TotalVariationDistance)
            .build();
        assert!(matches!(
            result,
            Err(QcbmError::MissingComponent { component: "target distribution" })
        ));
    }

    #[test]
    fn test_history_json() -> Result<()> {
        let mut cost = QcbmCostFunction::new(
            ProbabilityAnsatz,
            BernoulliBackend { calls: 0 },
            TotalVariationDistance,
            DistanceMeasureParameters::new(),
            target(),
        );
        cost.evaluate(&[0.5])?;
        let json = cost.history_to_json()?;
        let records: Vec<EvaluationRecord> = serde_json::from_str(&json)?;
        assert_eq!(records, cost.evaluations_history());
        assert_eq!(records[0].params, vec![0.5]);
        Ok(())
    }
}
