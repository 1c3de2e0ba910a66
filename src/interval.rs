//! # Confidence intervals
//!
//! Two ways to put a 95% band around a composite mean:
//! - `from_standard_error`: `mean ± z·SE`, used when several independent
//!   weighted estimates exist.
//! - `from_relative_margin`: `mean ± margin·mean`, the fallback when a single
//!   computed score is all we have.
//!
//! Both clamp into `[0,1]`, which keeps `lower ≤ mean ≤ upper` for any valid mean.

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::model::check_unit;

/// Two-sided z for 95% coverage.
pub const Z_95: f64 = 1.96;

/// Fallback relative margin (±10% of the mean).
pub const DEFAULT_RELATIVE_MARGIN: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Checked constructor; never repairs bad bounds.
    pub fn new(lower: f64, upper: f64) -> Result<Self, ScoringError> {
        let ok = lower.is_finite()
            && upper.is_finite()
            && (0.0..=1.0).contains(&lower)
            && (0.0..=1.0).contains(&upper)
            && lower <= upper;
        if ok {
            Ok(Self { lower, upper })
        } else {
            Err(ScoringError::InvalidInterval { lower, upper })
        }
    }

    /// `mean ± z·se`, clamped to `[0,1]`.
    pub fn from_standard_error(mean: f64, se: f64, z: f64) -> Result<Self, ScoringError> {
        check_unit("mean", mean)?;
        let half = z * se;
        if !half.is_finite() || half < 0.0 {
            return Err(ScoringError::InvalidInterval {
                lower: mean - half,
                upper: mean + half,
            });
        }
        Self::new((mean - half).max(0.0), (mean + half).min(1.0))
    }

    /// `mean ± relative_margin·mean`, clamped to `[0,1]`.
    pub fn from_relative_margin(mean: f64, relative_margin: f64) -> Result<Self, ScoringError> {
        check_unit("mean", mean)?;
        let margin = relative_margin * mean;
        Self::new((mean - margin).max(0.0), (mean + margin).min(1.0))
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}
