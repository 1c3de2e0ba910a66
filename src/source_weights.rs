//! # Source Weights
//!
//! Maps free-text citation categories (e.g. "Peer-reviewed journal",
//! "LCA white paper", "NGO study") to reliability weights.
//!
//! - Loads from JSON config (weights + aliases).
//! - Case-insensitive lookup with normalization of punctuation, dashes, etc.
//! - Aliases map alternative wordings to canonical categories.
//! - Fallback order: aliases → exact match → substring match → default.
//! - `default_seed()` carries the policy bands (1.0 / 0.9 / 0.7 / 0.6 / 0.3).
//!
//! These are caller-side defaults. Configured weights are not capped at 1.0,
//! matching the engine, which accepts any positive weight.

use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};
use tracing::warn;

use crate::model::{Source, SourceKind};

/// Category → weight bands, loaded from JSON or defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceWeightBands {
    /// Weight used when no category matches.
    #[serde(default = "default_default_weight")]
    pub default_weight: f64,
    /// Weights for canonical category names.
    #[serde(default)]
    pub weights: HashMap<String, f64>,
    /// Aliases mapping other wordings → canonical names.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

fn default_default_weight() -> f64 {
    SourceKind::Ngo.default_weight()
}

impl Default for SourceWeightBands {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl SourceWeightBands {
    /// Load from a JSON file. Falls back to `default_seed()` on error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "invalid source weight bands, using seed");
                Self::default_seed()
            }),
            Err(_) => Self::default_seed(),
        }
    }

    /// Weight for a category string.
    ///
    /// 1. Alias lookup (normalized) → canonical → weight.
    /// 2. Exact weight match.
    /// 3. Substring fallback, longest key first ("peer reviewed journal" → "peer reviewed").
    /// 4. Default weight.
    pub fn weight_for(&self, category: &str) -> f64 {
        let s = normalize(category);

        if let Some(canon) = self.aliases.get(&s) {
            if let Some(&w) = self.weights.get(&normalize(canon)) {
                return positive_weight(w);
            }
        }

        if let Some(&w) = self.weights.get(&s) {
            return positive_weight(w);
        }

        let mut keys: Vec<(&String, &f64)> = self.weights.iter().collect();
        keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));
        for (k, &w) in keys {
            if s.contains(k.as_str()) {
                return positive_weight(w);
            }
        }

        positive_weight(self.default_weight)
    }

    /// Citation weighted by its free-text category.
    pub fn source_for_category(&self, title: impl Into<String>, category: &str) -> Source {
        Source::new(title).weighted(self.weight_for(category))
    }

    /// Built-in policy bands with common wordings.
    pub fn default_seed() -> Self {
        let mut weights = HashMap::new();
        let mut aliases = HashMap::new();

        for (k, kind) in [
            ("peer reviewed", SourceKind::PeerReviewed),
            ("government", SourceKind::Government),
            ("international report", SourceKind::Government),
            ("industrial", SourceKind::Industrial),
            ("white paper", SourceKind::Industrial),
            ("lca", SourceKind::Industrial),
            ("ngo", SourceKind::Ngo),
            ("nonprofit", SourceKind::Ngo),
            ("internal", SourceKind::Internal),
            ("unpublished", SourceKind::Internal),
        ] {
            weights.insert(k.to_string(), kind.default_weight());
        }

        for (a, c) in [
            ("journal", "peer reviewed"),
            ("journal article", "peer reviewed"),
            ("peer reviewed", "peer reviewed"),
            ("peerreviewed", "peer reviewed"),
            ("agency report", "government"),
            ("oecd", "international report"),
            ("unep", "international report"),
            ("eu commission", "government"),
            ("epa", "government"),
            ("life cycle assessment", "lca"),
            ("industry report", "industrial"),
            ("whitepaper", "white paper"),
            ("non profit", "nonprofit"),
            ("charity", "nonprofit"),
            ("in house", "internal"),
            ("lab notes", "internal"),
        ] {
            aliases.insert(a.to_string(), c.to_string());
        }

        Self {
            default_weight: default_default_weight(),
            weights,
            aliases,
        }
    }
}

/// Lowercase, turn punctuation/dashes into spaces, collapse whitespace.
fn normalize(s: &str) -> String {
    let mut out = s.trim().to_ascii_lowercase();

    for ch in ['—', '–', '-', '_', '/', '\\'] {
        out = out.replace(ch, " ");
    }

    out = out.replace(['\n', '\r', '\t', '.', ',', '(', ')', '\''], " ");

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Positive weights pass through as configured (above 1.0 included);
/// zero, negative or non-finite ones drop to the lowest band.
fn positive_weight(x: f64) -> f64 {
    if x.is_finite() && x > 0.0 {
        x
    } else {
        SourceKind::Internal.default_weight()
    }
}
