//! # Confidence levels
//!
//! Policy classification of how well a material's scores are evidenced.
//! This is not the statistical interval; it is metadata about the ledger.
//!
//! Two rules exist on purpose and are kept separate:
//! - **suggestion** looks at source count *and* average weight;
//! - **validation** (data-quality audit) looks at raw count only and is stricter
//!   for `High`/`Medium` claims.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::debug;

use crate::error::ScoringError;
use crate::metrics::record_confidence_mismatch;
use crate::model::{total_weight, Material, Source};

/// Suggestion thresholds.
const HIGH_MIN_SOURCES: usize = 3;
const HIGH_MIN_WEIGHTED_SCORE: f64 = 0.8;
const MEDIUM_MIN_SOURCES: usize = 2;
const MEDIUM_MIN_WEIGHTED_SCORE: f64 = 0.6;

/// Validation: minimum raw source counts for a stated level.
const VALIDATE_HIGH_SOURCES: usize = 3;
const VALIDATE_MEDIUM_SOURCES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// `High(3) > Medium(2) > Low(1)`.
    pub fn rank(self) -> u8 {
        match self {
            ConfidenceLevel::High => 3,
            ConfidenceLevel::Medium => 2,
            ConfidenceLevel::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceLevel {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(ConfidenceLevel::High),
            "medium" => Ok(ConfidenceLevel::Medium),
            "low" => Ok(ConfidenceLevel::Low),
            _ => Err(ScoringError::UnknownConfidenceLevel(s.to_string())),
        }
    }
}

/// Suggest a level from ledger size and total weight.
///
/// `weighted_score = total_weight / source_count` (0 without sources).
pub fn suggested_confidence_level(source_count: usize, total_weight: f64) -> ConfidenceLevel {
    if source_count == 0 {
        return ConfidenceLevel::Low;
    }
    let weighted_score = total_weight / source_count as f64;

    if source_count >= HIGH_MIN_SOURCES && weighted_score >= HIGH_MIN_WEIGHTED_SCORE {
        ConfidenceLevel::High
    } else if source_count >= MEDIUM_MIN_SOURCES || weighted_score >= MEDIUM_MIN_WEIGHTED_SCORE {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// Convenience: suggestion straight from a ledger.
pub fn suggest_for_sources(sources: &[Source]) -> ConfidenceLevel {
    suggested_confidence_level(sources.len(), total_weight(sources))
}

/// Level the raw count alone can back, used by validation.
fn supported_by_count(source_count: usize) -> ConfidenceLevel {
    if source_count >= VALIDATE_HIGH_SOURCES {
        ConfidenceLevel::High
    } else if source_count >= VALIDATE_MEDIUM_SOURCES {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

fn required_sources(level: ConfidenceLevel) -> usize {
    match level {
        ConfidenceLevel::High => VALIDATE_HIGH_SOURCES,
        ConfidenceLevel::Medium => VALIDATE_MEDIUM_SOURCES,
        ConfidenceLevel::Low => 0,
    }
}

/// Check a stated level against its ledger.
///
/// Returns `None` when consistent, otherwise a human-readable message naming
/// how many more sources the stated level needs.
pub fn validate_confidence_level(stated: ConfidenceLevel, sources: &[Source]) -> Option<String> {
    let count = sources.len();
    let supported = supported_by_count(count);
    if stated.rank() <= supported.rank() {
        return None;
    }

    let required = required_sources(stated);
    let missing = required.saturating_sub(count);
    let msg = if count == 0 {
        format!(
            "Confidence level {stated} is set but no sources are cited; add {missing} more source(s)"
        )
    } else {
        format!(
            "Confidence level {stated} requires at least {required} sources but only {count} cited; add {missing} more source(s)"
        )
    };
    Some(msg)
}

/// One material whose stated level is not backed by its ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceMismatch {
    pub material_id: String,
    pub stated: ConfidenceLevel,
    pub source_count: usize,
    pub message: String,
}

/// Audit a collection; materials without a stated level are skipped.
pub fn audit_confidence_levels(materials: &[Material]) -> Vec<ConfidenceMismatch> {
    let mut out = Vec::new();
    for m in materials {
        let Some(stated) = m.confidence_level else {
            continue;
        };
        if let Some(message) = validate_confidence_level(stated, &m.sources) {
            debug!(material_id = %m.id, %stated, sources = m.sources.len(), "confidence mismatch");
            record_confidence_mismatch();
            out.push(ConfidenceMismatch {
                material_id: m.id.clone(),
                stated,
                source_count: m.sources.len(),
                message,
            });
        }
    }
    out
}

/// Suggested level per material, compared with what is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceChange {
    pub material_id: String,
    pub previous: Option<ConfidenceLevel>,
    pub suggested: ConfidenceLevel,
}

impl ConfidenceChange {
    pub fn changed(&self) -> bool {
        self.previous != Some(self.suggested)
    }
}

/// Batch recalculation of suggested levels; order follows the input.
pub fn recalculate_confidence_levels(materials: &[Material]) -> Vec<ConfidenceChange> {
    materials
        .iter()
        .map(|m| ConfidenceChange {
            material_id: m.id.clone(),
            previous: m.confidence_level,
            suggested: suggest_for_sources(&m.sources),
        })
        .collect()
}
