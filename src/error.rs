// src/error.rs
use thiserror::Error;

use crate::model::Dimension;

/// Everything the engine can reject. All variants are caller errors;
/// nothing here is transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("{field} = {value} is outside [0, 1]")]
    OutOfRange { field: String, value: f64 },

    #[error("invalid confidence interval [{lower}, {upper}]")]
    InvalidInterval { lower: f64, upper: f64 },

    #[error("estimate #{index} has non-positive weight {weight}")]
    InvalidWeight { index: usize, weight: f64 },

    #[error("no estimates to aggregate")]
    NoEstimates,

    #[error("{dimension} parameters are missing")]
    MissingParameters { dimension: Dimension },

    #[error("unknown confidence level '{0}'")]
    UnknownConfidenceLevel(String),
}
