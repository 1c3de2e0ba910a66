//! # Scoring Engine
//! Pure, testable logic that maps `(ParameterSet | estimates, Dimension)` → `ScoreRecord`.
//! No I/O, no shared mutable state; one engine can serve many threads.
//!
//! Per dimension the engine asks the dimension's [`CompositeScorer`] for the
//! practical and theoretical means, derives the 95% bands, the public score
//! and the label, and stamps the formula version and time.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::aggregate::{aggregate, WeightedEstimate};
use crate::config::{load_engine_config_default, EngineConfig};
use crate::confidence::{suggest_for_sources, validate_confidence_level, ConfidenceLevel};
use crate::error::ScoringError;
use crate::interval::ConfidenceInterval;
use crate::metrics::{record_batch, record_score};
use crate::model::{check_unit, Dimension, Material, Mode, ParameterSet};
use crate::scoring::{
    public_score, CompositeScorer, CompostabilityScorer, LabelTier, RecyclabilityScorer,
    ReusabilityScorer,
};

/// Engine output for one dimension of one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub dimension: Dimension,
    pub practical_mean: f64,
    pub theoretical_mean: f64,
    #[serde(rename = "practical_CI95")]
    pub practical_ci95: ConfidenceInterval,
    #[serde(rename = "theoretical_CI95")]
    pub theoretical_ci95: ConfidenceInterval,
    /// `round(practical_mean × 100)`.
    pub public_score: u8,
    pub label: String,
    pub tier: LabelTier,
    pub method_version: String,
    pub calculation_timestamp: DateTime<Utc>,
}

impl ScoreRecord {
    /// Re-check a (possibly stored) record against every record invariant.
    pub fn validate(&self) -> Result<(), ScoringError> {
        check_unit("practical_mean", self.practical_mean)?;
        check_unit("theoretical_mean", self.theoretical_mean)?;
        for (ci, mean) in [
            (self.practical_ci95, self.practical_mean),
            (self.theoretical_ci95, self.theoretical_mean),
        ] {
            ConfidenceInterval::new(ci.lower, ci.upper)?;
            if !ci.contains(mean) {
                return Err(ScoringError::InvalidInterval {
                    lower: ci.lower,
                    upper: ci.upper,
                });
            }
        }
        let expected = public_score(self.practical_mean)?;
        if expected != self.public_score {
            return Err(ScoringError::OutOfRange {
                field: "public_score".to_string(),
                value: f64::from(self.public_score),
            });
        }
        Ok(())
    }

    /// Opt-in check; the engine never enforces practical ≤ theoretical.
    pub fn practical_exceeds_theoretical(&self) -> bool {
        self.practical_mean > self.theoretical_mean
    }
}

/// Append `version` to a comma-joined audit trail unless already present.
pub fn accumulate_method_version(existing: &str, version: &str) -> String {
    let mut parts: Vec<&str> = existing
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    let version = version.trim();
    if !version.is_empty() && !parts.contains(&version) {
        parts.push(version);
    }
    parts.join(",")
}

/// All records computed for one material in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialScores {
    pub material_id: String,
    pub records: Vec<ScoreRecord>,
    /// Comma-joined versions of every formula used, e.g. `"CR-v1,CC-v1"`.
    pub method_version: String,
    pub suggested_confidence: ConfidenceLevel,
    /// Validation message when the stated level is not backed by sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_issue: Option<String>,
}

impl MaterialScores {
    pub fn record(&self, dimension: Dimension) -> Option<&ScoreRecord> {
        self.records.iter().find(|r| r.dimension == dimension)
    }

    pub fn mode_order_violations(&self) -> Vec<Dimension> {
        self.records
            .iter()
            .filter(|r| r.practical_exceeds_theoretical())
            .map(|r| r.dimension)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialFailure {
    pub material_id: String,
    pub message: String,
    #[serde(skip)]
    pub error: ScoringError,
}

/// Outcome of a batch run: successes and per-material failures, input order kept.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub scored: Vec<MaterialScores>,
    pub failures: Vec<MaterialFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.scored.len() + self.failures.len()
    }
}

pub struct ScoringEngine {
    config: EngineConfig,
    recyclability: Box<dyn CompositeScorer>,
    compostability: Box<dyn CompositeScorer>,
    reusability: Box<dyn CompositeScorer>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ScoringEngine {
    pub fn new(config: EngineConfig) -> Self {
        let config = config.sanitized();
        Self {
            recyclability: Box::new(RecyclabilityScorer::new(
                config.cleanliness_practical,
                config.cleanliness_theoretical,
            )),
            compostability: Box::new(CompostabilityScorer::new(
                config.composting_practical,
                config.composting_theoretical,
            )),
            reusability: Box::new(ReusabilityScorer::new(
                config.reuse_practical,
                config.reuse_theoretical,
            )),
            config,
        }
    }

    /// Engine from `$SCORING_CONFIG_PATH` / `config/scoring.*` / defaults.
    pub fn from_default_config() -> anyhow::Result<Self> {
        Ok(Self::new(load_engine_config_default()?))
    }

    /// Replace the formula for the scorer's dimension.
    pub fn with_scorer(mut self, scorer: Box<dyn CompositeScorer>) -> Self {
        match scorer.dimension() {
            Dimension::Recyclability => self.recyclability = scorer,
            Dimension::Compostability => self.compostability = scorer,
            Dimension::Reusability => self.reusability = scorer,
        }
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scorer(&self, dimension: Dimension) -> &dyn CompositeScorer {
        match dimension {
            Dimension::Recyclability => self.recyclability.as_ref(),
            Dimension::Compostability => self.compostability.as_ref(),
            Dimension::Reusability => self.reusability.as_ref(),
        }
    }

    /// Score one dimension from parameters. Uses the fixed-margin interval,
    /// since a formula yields a single estimate per mode.
    pub fn score_dimension(
        &self,
        params: &ParameterSet,
        dimension: Dimension,
    ) -> Result<ScoreRecord, ScoringError> {
        params.validate_dimension(dimension)?;
        let scorer = self.scorer(dimension);
        let practical = scorer.score(params, Mode::Practical)?;
        let theoretical = scorer.score(params, Mode::Theoretical)?;

        let margin = self.config.relative_margin;
        self.build_record(
            dimension,
            practical.mean,
            theoretical.mean,
            ConfidenceInterval::from_relative_margin(practical.mean, margin)?,
            ConfidenceInterval::from_relative_margin(theoretical.mean, margin)?,
        )
    }

    /// Score one dimension from independent weighted estimates of the
    /// composite mean. Two or more estimates per mode use `mean ± z·SE`.
    pub fn score_from_estimates(
        &self,
        dimension: Dimension,
        practical: &[WeightedEstimate],
        theoretical: &[WeightedEstimate],
    ) -> Result<ScoreRecord, ScoringError> {
        let p = aggregate(practical)?;
        let t = aggregate(theoretical)?;
        let (z, margin) = (self.config.z_score, self.config.relative_margin);
        self.build_record(
            dimension,
            p.mean,
            t.mean,
            p.confidence_interval(z, margin)?,
            t.confidence_interval(z, margin)?,
        )
    }

    fn build_record(
        &self,
        dimension: Dimension,
        practical_mean: f64,
        theoretical_mean: f64,
        practical_ci95: ConfidenceInterval,
        theoretical_ci95: ConfidenceInterval,
    ) -> Result<ScoreRecord, ScoringError> {
        let tier = LabelTier::from_normalized(practical_mean);
        let record = ScoreRecord {
            dimension,
            practical_mean,
            theoretical_mean,
            practical_ci95,
            theoretical_ci95,
            public_score: public_score(practical_mean)?,
            label: tier.text(dimension).to_string(),
            tier,
            method_version: self.scorer(dimension).method_version().to_string(),
            calculation_timestamp: Utc::now(),
        };
        debug!(
            %dimension,
            practical = record.practical_mean,
            theoretical = record.theoretical_mean,
            public = record.public_score,
            "score record built"
        );
        record_score(dimension);
        Ok(record)
    }

    /// Score the requested dimensions of a material (first occurrence wins when
    /// one is repeated); an empty slice means every dimension the material has
    /// parameters for. Fails as a whole on
    /// the first invalid dimension.
    pub fn score_material(
        &self,
        material: &Material,
        dimensions: &[Dimension],
    ) -> Result<MaterialScores, ScoringError> {
        material.parameters.validate()?;
        let dims: Vec<Dimension> = if dimensions.is_empty() {
            Dimension::ALL
                .into_iter()
                .filter(|d| material.parameters.has(*d))
                .collect()
        } else {
            let mut seen = Vec::with_capacity(dimensions.len());
            for d in dimensions {
                if !seen.contains(d) {
                    seen.push(*d);
                }
            }
            seen
        };

        let mut records = Vec::with_capacity(dims.len());
        let mut method_version = String::new();
        for d in dims {
            let r = self.score_dimension(&material.parameters, d)?;
            method_version = accumulate_method_version(&method_version, &r.method_version);
            records.push(r);
        }

        Ok(MaterialScores {
            material_id: material.id.clone(),
            records,
            method_version,
            suggested_confidence: suggest_for_sources(&material.sources),
            confidence_issue: material
                .confidence_level
                .and_then(|stated| validate_confidence_level(stated, &material.sources)),
        })
    }

    /// Score many materials in parallel. One bad material never aborts the rest.
    pub fn recalculate_batch(&self, materials: &[Material], dimensions: &[Dimension]) -> BatchReport {
        let started = Instant::now();

        // pořadí výsledků odpovídá vstupu (collect z par_iter ho zachovává)
        let results: Vec<Result<MaterialScores, MaterialFailure>> = materials
            .par_iter()
            .map(|m| {
                self.score_material(m, dimensions)
                    .map_err(|error| MaterialFailure {
                        material_id: m.id.clone(),
                        message: error.to_string(),
                        error,
                    })
            })
            .collect();

        let mut scored = Vec::new();
        let mut failures = Vec::new();
        for r in results {
            match r {
                Ok(s) => scored.push(s),
                Err(f) => {
                    warn!(material_id = %f.material_id, error = %f.message, "material skipped in batch");
                    failures.push(f);
                }
            }
        }

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        record_batch(scored.len(), failures.len(), elapsed_ms);
        info!(
            scored = scored.len(),
            failed = failures.len(),
            elapsed_ms,
            "batch recalculation finished"
        );

        BatchReport { scored, failures }
    }
}
