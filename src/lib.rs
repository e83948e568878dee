// src/lib.rs

//! `qcbm` - Cost functions and benchmark targets for quantum circuit Born machines
//!
//! A Born machine is a parameterized circuit whose measurement statistics
//! define a probability distribution over bit-strings. This library provides
//! the pieces needed to train one against a target, without simulating any
//! circuit itself:
//!
//! - [`target`] builds the "bars and stripes" benchmark distribution and counts
//!   its patterns in closed form.
//! - [`distance`] holds divergence measures between bit-string distributions.
//! - [`cost_function`] wires an [`Ansatz`], a [`Backend`], a target and a
//!   distance measure into a single parameters → value map for an optimizer.

pub mod core;
pub mod validation;
pub mod target;
pub mod distance;
pub mod cost_function;

// Re-export the most common types for easier top-level use
pub use crate::core::{BitstringDistribution, QcbmError, Result, ValueEstimate};
pub use crate::target::{
    bars_and_stripes_zigzag,
    count_structured_binary_patterns,
    generate_structured_binary_target,
    generate_structured_binary_target_seeded,
    Method,
};
pub use crate::distance::{
    evaluate_distribution_distance,
    ClippedNegativeLogLikelihood,
    DistanceMeasure,
    DistanceMeasureParameters,
    JensenShannonDivergence,
    TotalVariationDistance,
};
pub use crate::cost_function::{
    Ansatz,
    Backend,
    EvaluationRecord,
    GradientType,
    QcbmCostFunction,
    QcbmCostFunctionBuilder,
};
pub use crate::validation::{check_normalization, validate_distribution};

// Example: Training signal for a 2x2 bars and stripes target
// A toy "backend" returns the probability vector it is handed, so the cost is
// the total variation distance between that vector and the six-pattern target.
/// ```
/// use qcbm::{
///     Ansatz, Backend, BitstringDistribution, DistanceMeasureParameters, Method,
///     QcbmCostFunction, QcbmError, TotalVariationDistance,
///     count_structured_binary_patterns, generate_structured_binary_target_seeded,
/// };
///
/// // The "circuit" is the list of basis-state probabilities itself.
/// struct Identity;
/// impl Ansatz for Identity {
///     type Circuit = Vec<f64>;
///     fn executable_circuit(&self, params: &[f64]) -> Result<Vec<f64>, QcbmError> {
///         Ok(params.to_vec())
///     }
/// }
///
/// struct Exact;
/// impl Backend<Vec<f64>> for Exact {
///     fn bitstring_distribution(&mut self, circuit: &Vec<f64>) -> Result<BitstringDistribution, QcbmError> {
///         BitstringDistribution::from_probabilities(circuit)
///     }
/// }
///
/// # fn main() -> Result<(), QcbmError> {
/// assert_eq!(count_structured_binary_patterns(2, 2)?, 6);
/// let target = generate_structured_binary_target_seeded(2, 2, 1.0, Method::Zigzag, Some(7))?;
/// assert_eq!(target.len(), 6);
///
/// let mut cost = QcbmCostFunction::new(
///     Identity,
///     Exact,
///     TotalVariationDistance,
///     DistanceMeasureParameters::new(),
///     target,
/// );
///
/// // Uniform over all 16 grids: the 10 non-patterns carry 10/16 of the mass.
/// let uniform = vec![1.0 / 16.0; 16];
/// let value = cost.evaluate(&uniform)?;
/// assert!((value.value - 10.0 / 16.0).abs() < 1e-12);
/// assert_eq!(cost.evaluations_history().len(), 1);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
