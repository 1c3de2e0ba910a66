//! # Parameter source coverage
//!
//! Answers "does at least one cited source support this parameter?" per
//! material and parameter key.
//!
//! - `parameter_availability` scans one material's ledger once.
//! - `ParameterSourceCache::build` does the same for a whole material list
//!   and is then read-only; queries are hash lookups.
//! - Stats and filters are projections over an availability map and never
//!   go back to the ledger.
//!
//! The cache is valid only for the materials it was built from. When the
//! data changes, build a new one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::metrics::record_cache_build;
use crate::model::{Material, Source};

/// `parameter key → supported?`. Keys never inserted read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterAvailability(HashMap<String, bool>);

impl ParameterAvailability {
    pub fn get(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    /// No entries at all (material without sources).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Availability for a single material. An empty ledger yields an empty map.
pub fn parameter_availability<S: AsRef<str>>(
    material: &Material,
    keys: &[S],
) -> ParameterAvailability {
    if material.sources.is_empty() {
        return ParameterAvailability::default();
    }
    let map = keys
        .iter()
        .map(|k| {
            let k = k.as_ref();
            (k.to_string(), material.sources.iter().any(|s| s.supports(k)))
        })
        .collect();
    ParameterAvailability(map)
}

/// How many sources in the ledger cite `key`.
pub fn sources_supporting(material: &Material, key: &str) -> usize {
    material.sources.iter().filter(|s| s.supports(key)).count()
}

/// Precomputed `material id → availability` index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSourceCache {
    by_material: HashMap<String, ParameterAvailability>,
}

impl ParameterSourceCache {
    pub fn build<S: AsRef<str>>(materials: &[Material], keys: &[S]) -> Self {
        let by_material: HashMap<String, ParameterAvailability> = materials
            .iter()
            .map(|m| (m.id.clone(), parameter_availability(m, keys)))
            .collect();
        debug!(
            materials = by_material.len(),
            keys = keys.len(),
            "parameter source cache built"
        );
        record_cache_build(by_material.len());
        Self { by_material }
    }

    pub fn is_available(&self, material_id: &str, key: &str) -> bool {
        self.by_material
            .get(material_id)
            .is_some_and(|a| a.get(key))
    }

    /// `None` when the material was not part of the build.
    pub fn availability(&self, material_id: &str) -> Option<&ParameterAvailability> {
        self.by_material.get(material_id)
    }

    pub fn len(&self) -> usize {
        self.by_material.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_material.is_empty()
    }

    /// Coverage stats for a cached material; unknown ids count as uncovered.
    pub fn coverage_stats<S: AsRef<str>>(&self, material_id: &str, keys: &[S]) -> CoverageStats {
        match self.by_material.get(material_id) {
            Some(a) => coverage_stats(a, keys),
            None => coverage_stats(&ParameterAvailability::default(), keys),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageStats {
    pub total: usize,
    pub with_sources: usize,
    pub without_sources: usize,
    /// `round(100 · with_sources / total)`; 0 when nothing is tracked.
    pub percentage_covered: u32,
    pub missing_parameters: Vec<String>,
}

pub fn coverage_stats<S: AsRef<str>>(
    availability: &ParameterAvailability,
    keys: &[S],
) -> CoverageStats {
    let total = keys.len();
    let missing_parameters = filter_parameters_without_sources(keys, availability);
    let without_sources = missing_parameters.len();
    let with_sources = total - without_sources;
    let percentage_covered = if total == 0 {
        0
    } else {
        (100.0 * with_sources as f64 / total as f64).round() as u32
    };
    CoverageStats {
        total,
        with_sources,
        without_sources,
        percentage_covered,
        missing_parameters,
    }
}

/// Keys with at least one supporting source, in input order.
pub fn filter_parameters_with_sources<S: AsRef<str>>(
    keys: &[S],
    availability: &ParameterAvailability,
) -> Vec<String> {
    keys.iter()
        .map(AsRef::as_ref)
        .filter(|k| availability.get(k))
        .map(str::to_string)
        .collect()
}

/// Keys with no supporting source, in input order.
pub fn filter_parameters_without_sources<S: AsRef<str>>(
    keys: &[S],
    availability: &ParameterAvailability,
) -> Vec<String> {
    keys.iter()
        .map(AsRef::as_ref)
        .filter(|k| !availability.get(k))
        .map(str::to_string)
        .collect()
}

/// Keys cited anywhere in a ledger, sorted and deduped. Handy for reports.
pub fn cited_parameters(sources: &[Source]) -> Vec<String> {
    let mut out: Vec<String> = sources
        .iter()
        .flat_map(|s| s.parameters.iter().cloned())
        .collect();
    out.sort();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParameterSet;

    const KEYS: [&str; 5] = ["Y_value", "D_value", "C_value", "M_value", "CR_practical_mean"];

    fn material() -> Material {
        Material::new("pet", ParameterSet::new(0.65))
            .with_source(Source::new("A").supporting(["Y_value", "D_value"]))
            .with_source(Source::new("B").supporting(["Y_value", "M_value"]))
    }

    #[test]
    fn availability_reflects_ledger() {
        let a = parameter_availability(&material(), &KEYS);
        assert!(a.get("Y_value"));
        assert!(a.get("M_value"));
        assert!(!a.get("C_value"));
        assert!(!a.get("not_tracked"));
        assert_eq!(sources_supporting(&material(), "Y_value"), 2);
    }

    #[test]
    fn empty_ledger_maps_to_empty_availability() {
        let bare = Material::new("bare", ParameterSet::new(0.1));
        let a = parameter_availability(&bare, &KEYS);
        assert!(a.is_empty());
        assert!(!a.get("Y_value"));
    }

    #[test]
    fn stats_for_three_of_five() {
        let a = parameter_availability(&material(), &KEYS);
        let s = coverage_stats(&a, &KEYS);
        assert_eq!(s.total, 5);
        assert_eq!(s.with_sources, 3);
        assert_eq!(s.without_sources, 2);
        assert_eq!(s.percentage_covered, 60);
        assert_eq!(s.missing_parameters, vec!["C_value", "CR_practical_mean"]);
    }

    #[test]
    fn stats_with_no_keys() {
        let s = coverage_stats(&ParameterAvailability::default(), &[] as &[&str]);
        assert_eq!(s.total, 0);
        assert_eq!(s.percentage_covered, 0);
    }

    #[test]
    fn cache_lookup_matches_single_material() {
        let mats = vec![material(), Material::new("bare", ParameterSet::new(0.2))];
        let cache = ParameterSourceCache::build(&mats, &KEYS);
        for m in &mats {
            let single = parameter_availability(m, &KEYS);
            for k in KEYS {
                assert_eq!(cache.is_available(&m.id, k), single.get(k));
            }
        }
        assert!(!cache.is_available("unknown", "Y_value"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn filters_partition_keys() {
        let a = parameter_availability(&material(), &KEYS);
        let with = filter_parameters_with_sources(&KEYS, &a);
        let without = filter_parameters_without_sources(&KEYS, &a);
        assert_eq!(with, vec!["Y_value", "D_value", "M_value"]);
        assert_eq!(with.len() + without.len(), KEYS.len());
    }

    #[test]
    fn cited_parameters_dedupes() {
        assert_eq!(
            cited_parameters(&material().sources),
            vec!["D_value", "M_value", "Y_value"]
        );
    }
}
