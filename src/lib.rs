// src/lib.rs
//! Composite sustainability scoring: Recyclability (CR), Compostability (CC)
//! and Reusability (RU) with 95% intervals, evidence-based confidence levels
//! and parameter coverage reporting.
//!
//! Everything here is a pure function over in-memory data. Persistence,
//! transport and rendering belong to the caller.

pub mod aggregate;
pub mod confidence;
pub mod config;
pub mod coverage;
pub mod engine;
pub mod error;
pub mod interval;
pub mod metrics;
pub mod model;
pub mod scoring;
pub mod source_weights;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{aggregate, weighted_mean, weighted_standard_error, Aggregate, WeightedEstimate};
pub use crate::confidence::{
    audit_confidence_levels, recalculate_confidence_levels, suggested_confidence_level,
    validate_confidence_level, ConfidenceLevel,
};
pub use crate::coverage::{
    coverage_stats, filter_parameters_with_sources, filter_parameters_without_sources,
    parameter_availability, CoverageStats, ParameterAvailability, ParameterSourceCache,
};
pub use crate::engine::{
    accumulate_method_version, BatchReport, MaterialScores, ScoreRecord, ScoringEngine,
};
pub use crate::error::ScoringError;
pub use crate::interval::ConfidenceInterval;
pub use crate::model::{Dimension, Material, Mode, ParameterSet, Source, SourceKind};
pub use crate::scoring::{label_for, public_score, CompositeScore, CompositeScorer, LabelTier};
