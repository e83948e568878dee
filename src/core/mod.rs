// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod error;
pub mod distribution;
pub mod value;

// Re-export public types for convenient access via `qcbm::core::TypeName`
pub use error::{QcbmError, Result};
pub use distribution::BitstringDistribution;
pub use value::ValueEstimate;
