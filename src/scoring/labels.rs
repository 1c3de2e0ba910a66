//! Five-bucket labels for composite means.
//!
//! Thresholds run on the normalized mean, not the 0..100 public score, so a
//! value is never rounded twice before bucketing.

use serde::{Deserialize, Serialize};

use crate::model::Dimension;

/// Bucket of a normalized mean, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelTier {
    Excellent,
    Good,
    Moderate,
    Limited,
    Poor,
}

impl LabelTier {
    /// `[0.8,1] [0.6,0.8) [0.4,0.6) [0.2,0.4) [0,0.2)`; NaN falls to `Poor`.
    pub fn from_normalized(score: f64) -> Self {
        if score >= 0.80 {
            LabelTier::Excellent
        } else if score >= 0.60 {
            LabelTier::Good
        } else if score >= 0.40 {
            LabelTier::Moderate
        } else if score >= 0.20 {
            LabelTier::Limited
        } else {
            LabelTier::Poor
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    pub fn text(self, dimension: Dimension) -> &'static str {
        let table: &[&str; 5] = match dimension {
            Dimension::Recyclability => &CR_LABELS,
            Dimension::Compostability => &CC_LABELS,
            Dimension::Reusability => &RU_LABELS,
        };
        table[self.index()]
    }
}

const CR_LABELS: [&str; 5] = [
    "Easily recyclable",
    "Recyclable",
    "Technically recyclable",
    "Limited recyclability",
    "Unrecyclable / Experimental",
];

const CC_LABELS: [&str; 5] = [
    "Highly compostable",
    "Compostable",
    "Industrially compostable",
    "Limited compostability",
    "Non-compostable",
];

const RU_LABELS: [&str; 5] = [
    "Highly reusable",
    "Reusable",
    "Moderately reusable",
    "Limited reusability",
    "Single-use",
];

/// Label text for a normalized mean in a given dimension.
pub fn label_for(normalized_score: f64, dimension: Dimension) -> &'static str {
    LabelTier::from_normalized(normalized_score).text(dimension)
}
