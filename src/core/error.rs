// src/core/error.rs

//! Error handling logic

use thiserror::Error;

/// Errors raised while building targets, comparing distributions or
/// evaluating a cost function.
///
/// Failures reported by ansatz, backend or distance-measure implementations
/// travel through the cost function untouched, so implementors should pick
/// the variant that describes their own failure.
#[derive(Debug, Error)]
pub enum QcbmError {
    /// A target generation method tag that has no implementation.
    #[error("method {method:?} is not supported for generating a bars and stripes target")]
    UnsupportedMethod {
        /// The rejected tag
        method: String,
    },

    /// A gradient method tag that has no implementation.
    #[error("gradient type {tag:?} is not supported")]
    UnsupportedGradientType {
        /// The rejected tag
        tag: String,
    },

    /// Grid dimensions must both be at least one.
    #[error("invalid grid dimensions {nrows}x{ncols}: both must be at least 1")]
    InvalidDimension {
        /// Requested number of rows
        nrows: usize,
        /// Requested number of columns
        ncols: usize,
    },

    /// Grid too large to enumerate or count in machine integers.
    #[error("dimension overflow: {message}")]
    DimensionOverflow {
        /// DimensionOverflow failure message
        message: String,
    },

    /// Subset fraction outside `(0, 1]`.
    #[error("percentage {percentage} must lie in (0, 1]")]
    InvalidPercentage {
        /// The rejected fraction
        percentage: f64,
    },

    /// Malformed bit-string keys or weights.
    #[error("invalid bitstring distribution: {message}")]
    InvalidDistribution {
        /// InvalidDistribution failure message
        message: String,
    },

    /// Two distributions defined over different numbers of qubits.
    #[error("cannot compare distributions over {target_qubits:?} and {measured_qubits:?} qubits")]
    DistributionMismatch {
        /// Qubit count of the target, `None` if it is empty
        target_qubits: Option<usize>,
        /// Qubit count of the measured distribution, `None` if it is empty
        measured_qubits: Option<usize>,
    },

    /// A distribution failed a normalization check.
    #[error("incoherence violation: {message}")]
    Incoherence {
        /// Incoherence failure message
        message: String,
    },

    /// Raised by ansatz implementations when a circuit cannot be built.
    #[error("ansatz error: {message}")]
    AnsatzError {
        /// AnsatzError failure message
        message: String,
    },

    /// Raised by backend implementations when a circuit cannot be sampled.
    #[error("backend error: {message}")]
    BackendError {
        /// BackendError failure message
        message: String,
    },

    /// Raised by distance measures on unusable input or options.
    #[error("distance measure error: {message}")]
    DistanceError {
        /// DistanceError failure message
        message: String,
    },

    /// A builder was finished without one of its required parts.
    #[error("cost function is missing its {component}")]
    MissingComponent {
        /// Name of the absent part
        component: &'static str,
    },

    /// Evaluation history could not be exported.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Shorthand for results carrying a [`QcbmError`].
pub type Result<T> = std::result::Result<T, QcbmError>;
