//! # Source weight aggregation
//!
//! Combines several source-derived estimates of the same quantity into a
//! weighted mean and a weighted standard error.
//!
//! ```text
//! mean = Σ(w·x) / Σw
//! SE   = sqrt( Σ w·(x − mean)² / (Σw · (n − 1)) )      (n ≥ 2 only)
//! ```
//!
//! With fewer than two estimates there is no spread to measure; `standard_error`
//! is `None` and callers fall back to the fixed relative margin (see `interval`).

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::interval::ConfidenceInterval;
use crate::model::check_unit;

/// One estimate and the reliability weight of the source behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedEstimate {
    pub estimate: f64,
    pub weight: f64,
}

impl WeightedEstimate {
    pub fn new(estimate: f64, weight: f64) -> Self {
        Self { estimate, weight }
    }
}

/// Result of aggregating one or more estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub mean: f64,
    pub standard_error: Option<f64>,
    pub total_weight: f64,
    pub n: usize,
}

impl Aggregate {
    /// SE-based interval when available, relative-margin fallback otherwise.
    pub fn confidence_interval(
        &self,
        z: f64,
        relative_margin: f64,
    ) -> Result<ConfidenceInterval, ScoringError> {
        match self.standard_error {
            Some(se) => ConfidenceInterval::from_standard_error(self.mean, se, z),
            None => ConfidenceInterval::from_relative_margin(self.mean, relative_margin),
        }
    }
}

fn check_inputs(estimates: &[WeightedEstimate]) -> Result<(), ScoringError> {
    if estimates.is_empty() {
        return Err(ScoringError::NoEstimates);
    }
    for (index, e) in estimates.iter().enumerate() {
        if !(e.weight.is_finite() && e.weight > 0.0) {
            return Err(ScoringError::InvalidWeight {
                index,
                weight: e.weight,
            });
        }
        check_unit("estimate", e.estimate)?;
    }
    Ok(())
}

/// Weighted mean `Σ(w·x) / Σw`.
pub fn weighted_mean(estimates: &[WeightedEstimate]) -> Result<f64, ScoringError> {
    check_inputs(estimates)?;
    Ok(mean_unchecked(estimates))
}

fn mean_unchecked(estimates: &[WeightedEstimate]) -> f64 {
    let (num, den) = estimates
        .iter()
        .fold((0.0, 0.0), |(n, d), e| (n + e.weight * e.estimate, d + e.weight));
    num / den
}

/// Weighted standard error; `Ok(None)` for fewer than two estimates.
pub fn weighted_standard_error(estimates: &[WeightedEstimate]) -> Result<Option<f64>, ScoringError> {
    check_inputs(estimates)?;
    Ok(se_unchecked(estimates, mean_unchecked(estimates)))
}

fn se_unchecked(estimates: &[WeightedEstimate], mean: f64) -> Option<f64> {
    let n = estimates.len();
    if n < 2 {
        return None;
    }
    let total: f64 = estimates.iter().map(|e| e.weight).sum();
    let ss: f64 = estimates
        .iter()
        .map(|e| e.weight * (e.estimate - mean).powi(2))
        .sum();
    Some((ss / (total * (n as f64 - 1.0))).sqrt())
}

/// Mean, SE and totals in one pass over validated input.
pub fn aggregate(estimates: &[WeightedEstimate]) -> Result<Aggregate, ScoringError> {
    check_inputs(estimates)?;
    let mean = mean_unchecked(estimates);
    Ok(Aggregate {
        mean,
        standard_error: se_unchecked(estimates, mean),
        total_weight: estimates.iter().map(|e| e.weight).sum(),
        n: estimates.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn est(pairs: &[(f64, f64)]) -> Vec<WeightedEstimate> {
        pairs
            .iter()
            .map(|&(x, w)| WeightedEstimate::new(x, w))
            .collect()
    }

    #[test]
    fn equal_weights_give_plain_mean() {
        let m = weighted_mean(&est(&[(0.2, 1.0), (0.4, 1.0), (0.6, 1.0)])).unwrap();
        assert!((m - 0.4).abs() < 1e-12);
    }

    #[test]
    fn heavier_source_pulls_mean() {
        let m = weighted_mean(&est(&[(0.2, 1.0), (0.8, 0.3)])).unwrap();
        assert!((m - (0.2 + 0.24) / 1.3).abs() < 1e-12);
    }

    #[test]
    fn standard_error_matches_formula() {
        let e = est(&[(0.5, 1.0), (0.7, 1.0)]);
        // mean 0.6, ss = 0.01 + 0.01, SE = sqrt(0.02 / (2 * 1)) = 0.1
        let se = weighted_standard_error(&e).unwrap().unwrap();
        assert!((se - 0.1).abs() < 1e-12);
    }

    #[test]
    fn single_estimate_has_no_standard_error() {
        let a = aggregate(&est(&[(0.42, 0.7)])).unwrap();
        assert_eq!(a.n, 1);
        assert!(a.standard_error.is_none());
        assert!((a.mean - 0.42).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(weighted_mean(&[]), Err(ScoringError::NoEstimates));
        assert!(matches!(
            aggregate(&est(&[(0.5, 1.0), (0.5, 0.0)])),
            Err(ScoringError::InvalidWeight { index: 1, .. })
        ));
        assert!(matches!(
            aggregate(&est(&[(1.5, 1.0)])),
            Err(ScoringError::OutOfRange { .. })
        ));
    }

    #[test]
    fn accepts_arbitrary_positive_weights() {
        let a = aggregate(&est(&[(0.3, 2.5), (0.6, 17.0)])).unwrap();
        assert!((a.total_weight - 19.5).abs() < 1e-12);
        assert!(a.mean > 0.3 && a.mean < 0.6);
    }

    #[test]
    fn interval_path_depends_on_count() {
        let one = aggregate(&est(&[(0.5, 1.0)])).unwrap();
        let ci = one.confidence_interval(1.96, 0.10).unwrap();
        assert!((ci.lower - 0.45).abs() < 1e-12 && (ci.upper - 0.55).abs() < 1e-12);

        let two = aggregate(&est(&[(0.5, 1.0), (0.7, 1.0)])).unwrap();
        let ci = two.confidence_interval(1.96, 0.10).unwrap();
        assert!((ci.lower - (0.6 - 0.196)).abs() < 1e-9);
        assert!((ci.upper - (0.6 + 0.196)).abs() < 1e-9);
    }
}
