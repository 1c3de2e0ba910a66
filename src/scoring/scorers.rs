//! Concrete formulas for CR, CC and RU.
//!
//! CR = Y × D × C × M × U_clean, with U_clean depending on the mode.
//!
//! CC = B × N × T × H × M × K_compost and RU = L × R × U × C_RU × M × K_reuse.
//! M enters every dimension the same way in both modes; only the per-mode
//! constant (U_clean, K_compost, K_reuse) separates practical from theoretical.

use super::{clamp01, CompositeScore, CompositeScorer};
use crate::error::ScoringError;
use crate::model::{Dimension, Mode, ParameterSet};

pub const CR_METHOD_VERSION: &str = "CR-v1";
pub const CC_METHOD_VERSION: &str = "CC-v1";
pub const RU_METHOD_VERSION: &str = "RU-v1";

/// Realistic sorting/contamination.
pub const CLEANLINESS_PRACTICAL: f64 = 0.6;
/// Contaminant-free input.
pub const CLEANLINESS_THEORETICAL: f64 = 1.0;

/// Share of ideal composting conditions reached by real facilities.
pub const COMPOSTING_PRACTICAL: f64 = 0.8;
pub const COMPOSTING_THEORETICAL: f64 = 1.0;

/// Share of reuse cycles that actually return the item.
pub const REUSE_PRACTICAL: f64 = 0.8;
pub const REUSE_THEORETICAL: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecyclabilityScorer {
    pub cleanliness_practical: f64,
    pub cleanliness_theoretical: f64,
}

impl Default for RecyclabilityScorer {
    fn default() -> Self {
        Self {
            cleanliness_practical: CLEANLINESS_PRACTICAL,
            cleanliness_theoretical: CLEANLINESS_THEORETICAL,
        }
    }
}

impl RecyclabilityScorer {
    pub fn new(cleanliness_practical: f64, cleanliness_theoretical: f64) -> Self {
        Self {
            cleanliness_practical,
            cleanliness_theoretical,
        }
    }

    fn cleanliness(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Practical => self.cleanliness_practical,
            Mode::Theoretical => self.cleanliness_theoretical,
        }
    }
}

impl CompositeScorer for RecyclabilityScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Recyclability
    }

    fn method_version(&self) -> &str {
        CR_METHOD_VERSION
    }

    fn score(&self, params: &ParameterSet, mode: Mode) -> Result<CompositeScore, ScoringError> {
        params.validate_dimension(Dimension::Recyclability)?;
        let missing = ScoringError::MissingParameters {
            dimension: Dimension::Recyclability,
        };
        let p = params.recyclability.as_ref().ok_or(missing)?;
        let raw =
            p.yield_rate * p.disassembly * p.collection * params.maturity * self.cleanliness(mode);
        CompositeScore::from_mean(clamp01(raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompostabilityScorer {
    pub conditions_practical: f64,
    pub conditions_theoretical: f64,
}

impl Default for CompostabilityScorer {
    fn default() -> Self {
        Self {
            conditions_practical: COMPOSTING_PRACTICAL,
            conditions_theoretical: COMPOSTING_THEORETICAL,
        }
    }
}

impl CompostabilityScorer {
    pub fn new(conditions_practical: f64, conditions_theoretical: f64) -> Self {
        Self {
            conditions_practical,
            conditions_theoretical,
        }
    }

    fn conditions(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Practical => self.conditions_practical,
            Mode::Theoretical => self.conditions_theoretical,
        }
    }
}

impl CompositeScorer for CompostabilityScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Compostability
    }

    fn method_version(&self) -> &str {
        CC_METHOD_VERSION
    }

    fn score(&self, params: &ParameterSet, mode: Mode) -> Result<CompositeScore, ScoringError> {
        params.validate_dimension(Dimension::Compostability)?;
        let missing = ScoringError::MissingParameters {
            dimension: Dimension::Compostability,
        };
        let p = params.compostability.as_ref().ok_or(missing)?;
        let raw = p.biodegradation
            * p.nutrient_balance
            * p.toxicity
            * p.habitat
            * params.maturity
            * self.conditions(mode);
        CompositeScore::from_mean(clamp01(raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReusabilityScorer {
    pub retention_practical: f64,
    pub retention_theoretical: f64,
}

impl Default for ReusabilityScorer {
    fn default() -> Self {
        Self {
            retention_practical: REUSE_PRACTICAL,
            retention_theoretical: REUSE_THEORETICAL,
        }
    }
}

impl ReusabilityScorer {
    pub fn new(retention_practical: f64, retention_theoretical: f64) -> Self {
        Self {
            retention_practical,
            retention_theoretical,
        }
    }

    fn retention(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Practical => self.retention_practical,
            Mode::Theoretical => self.retention_theoretical,
        }
    }
}

impl CompositeScorer for ReusabilityScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Reusability
    }

    fn method_version(&self) -> &str {
        RU_METHOD_VERSION
    }

    fn score(&self, params: &ParameterSet, mode: Mode) -> Result<CompositeScore, ScoringError> {
        params.validate_dimension(Dimension::Reusability)?;
        let missing = ScoringError::MissingParameters {
            dimension: Dimension::Reusability,
        };
        let p = params.reusability.as_ref().ok_or(missing)?;
        let raw = p.lifetime
            * p.repairability
            * p.upgradability
            * p.contamination
            * params.maturity
            * self.retention(mode);
        CompositeScore::from_mean(clamp01(raw))
    }
}
