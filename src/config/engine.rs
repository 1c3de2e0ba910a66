// src/config/engine.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::interval::{DEFAULT_RELATIVE_MARGIN, Z_95};
use crate::model::default_tracked_parameters;
use crate::scoring::scorers::{
    CLEANLINESS_PRACTICAL, CLEANLINESS_THEORETICAL, COMPOSTING_PRACTICAL, COMPOSTING_THEORETICAL,
    REUSE_PRACTICAL, REUSE_THEORETICAL,
};

pub const ENV_CONFIG_PATH: &str = "SCORING_CONFIG_PATH";
const DEFAULT_TOML_PATH: &str = "config/scoring.toml";
const DEFAULT_JSON_PATH: &str = "config/scoring.json";

fn default_cleanliness_practical() -> f64 {
    CLEANLINESS_PRACTICAL
}
fn default_cleanliness_theoretical() -> f64 {
    CLEANLINESS_THEORETICAL
}
fn default_composting_practical() -> f64 {
    COMPOSTING_PRACTICAL
}
fn default_composting_theoretical() -> f64 {
    COMPOSTING_THEORETICAL
}
fn default_reuse_practical() -> f64 {
    REUSE_PRACTICAL
}
fn default_reuse_theoretical() -> f64 {
    REUSE_THEORETICAL
}
fn default_relative_margin() -> f64 {
    DEFAULT_RELATIVE_MARGIN
}
fn default_z_score() -> f64 {
    Z_95
}

/// Tunables of the scoring engine. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// U_clean for practical CR.
    #[serde(default = "default_cleanliness_practical")]
    pub cleanliness_practical: f64,
    /// U_clean for theoretical CR.
    #[serde(default = "default_cleanliness_theoretical")]
    pub cleanliness_theoretical: f64,
    /// K_compost per mode.
    #[serde(default = "default_composting_practical")]
    pub composting_practical: f64,
    #[serde(default = "default_composting_theoretical")]
    pub composting_theoretical: f64,
    /// K_reuse per mode.
    #[serde(default = "default_reuse_practical")]
    pub reuse_practical: f64,
    #[serde(default = "default_reuse_theoretical")]
    pub reuse_theoretical: f64,
    /// Fallback CI half-width as a fraction of the mean.
    #[serde(default = "default_relative_margin")]
    pub relative_margin: f64,
    #[serde(default = "default_z_score")]
    pub z_score: f64,
    /// Parameter keys used for coverage reporting.
    #[serde(default = "default_tracked_parameters")]
    pub tracked_parameters: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cleanliness_practical: default_cleanliness_practical(),
            cleanliness_theoretical: default_cleanliness_theoretical(),
            composting_practical: default_composting_practical(),
            composting_theoretical: default_composting_theoretical(),
            reuse_practical: default_reuse_practical(),
            reuse_theoretical: default_reuse_theoretical(),
            relative_margin: default_relative_margin(),
            z_score: default_z_score(),
            tracked_parameters: default_tracked_parameters(),
        }
    }
}

impl EngineConfig {
    /// Reset out-of-range values to defaults and tidy the key list.
    pub fn sanitized(mut self) -> Self {
        fn in_unit_open(x: f64) -> bool {
            x.is_finite() && x > 0.0 && x <= 1.0
        }

        let defaults = Self::default();
        for (name, value, fallback) in [
            (
                "cleanliness_practical",
                &mut self.cleanliness_practical,
                defaults.cleanliness_practical,
            ),
            (
                "cleanliness_theoretical",
                &mut self.cleanliness_theoretical,
                defaults.cleanliness_theoretical,
            ),
            (
                "composting_practical",
                &mut self.composting_practical,
                defaults.composting_practical,
            ),
            (
                "composting_theoretical",
                &mut self.composting_theoretical,
                defaults.composting_theoretical,
            ),
            (
                "reuse_practical",
                &mut self.reuse_practical,
                defaults.reuse_practical,
            ),
            (
                "reuse_theoretical",
                &mut self.reuse_theoretical,
                defaults.reuse_theoretical,
            ),
            (
                "relative_margin",
                &mut self.relative_margin,
                defaults.relative_margin,
            ),
        ] {
            if !in_unit_open(*value) {
                warn!(field = name, value = *value, "out of range, using default");
                *value = fallback;
            }
        }
        if !(self.z_score.is_finite() && self.z_score > 0.0) {
            warn!(value = self.z_score, "z_score must be positive, using default");
            self.z_score = default_z_score();
        }

        let mut seen = Vec::with_capacity(self.tracked_parameters.len());
        for k in self.tracked_parameters {
            let t = k.trim();
            if !t.is_empty() && !seen.iter().any(|s: &String| s == t) {
                seen.push(t.to_string());
            }
        }
        self.tracked_parameters = if seen.is_empty() {
            default_tracked_parameters()
        } else {
            seen
        };
        self
    }
}

/// Load from an explicit path. Supports TOML or JSON formats.
pub fn load_engine_config_from(path: &Path) -> Result<EngineConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading scoring config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing scoring config {}", path.display()))
}

/// Load using env var + fallbacks:
/// 1) $SCORING_CONFIG_PATH
/// 2) config/scoring.toml
/// 3) config/scoring.json
/// 4) built-in defaults
pub fn load_engine_config_default() -> Result<EngineConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_engine_config_from(&pb);
        } else {
            return Err(anyhow!("SCORING_CONFIG_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from(DEFAULT_TOML_PATH);
    if toml_p.exists() {
        return load_engine_config_from(&toml_p);
    }
    let json_p = PathBuf::from(DEFAULT_JSON_PATH);
    if json_p.exists() {
        return load_engine_config_from(&json_p);
    }
    Ok(EngineConfig::default())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<EngineConfig> {
    // TOML first unless the file is clearly JSON.
    let try_toml = hint_ext != "json";
    if try_toml {
        if let Ok(c) = toml::from_str::<EngineConfig>(s) {
            return Ok(c.sanitized());
        }
    }
    if let Ok(c) = serde_json::from_str::<EngineConfig>(s) {
        return Ok(c.sanitized());
    }
    if !try_toml {
        if let Ok(c) = toml::from_str::<EngineConfig>(s) {
            return Ok(c.sanitized());
        }
    }
    Err(anyhow!("unsupported scoring config format"))
}
