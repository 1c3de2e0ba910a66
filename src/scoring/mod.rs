// src/scoring/mod.rs
//! Composite score formulas behind one strategy trait.
//!
//! CR is a closed-form product; CC and RU are pluggable. The engine only
//! talks to [`CompositeScorer`], so interval derivation, labelling and
//! versioning stay shared while each formula can be swapped and tested alone.

pub mod labels;
pub mod scorers;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::model::{check_unit, Dimension, Mode, ParameterSet};

pub use labels::{label_for, LabelTier};
pub use scorers::{CompostabilityScorer, RecyclabilityScorer, ReusabilityScorer};

/// Output of a single formula evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub mean: f64,
    pub public: u8,
}

impl CompositeScore {
    pub fn from_mean(mean: f64) -> Result<Self, ScoringError> {
        Ok(Self {
            mean,
            public: public_score(mean)?,
        })
    }
}

/// `(ParameterSet, Mode) -> {mean, public}` for one dimension.
pub trait CompositeScorer: Send + Sync {
    fn dimension(&self) -> Dimension;

    /// Formula version stamped on every record this scorer produces.
    fn method_version(&self) -> &str;

    fn score(&self, params: &ParameterSet, mode: Mode) -> Result<CompositeScore, ScoringError>;
}

/// `round(mean × 100)` as an integer in `0..=100`.
pub fn public_score(mean: f64) -> Result<u8, ScoringError> {
    check_unit("mean", mean)?;
    Ok((mean * 100.0).round() as u8)
}

/// Clamp a raw product into `[0,1]` to absorb floating-point drift.
pub(crate) fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
