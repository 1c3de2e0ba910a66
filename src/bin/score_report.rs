//! Demo: score a JSON list of materials and print the batch report.
//!
//! Usage: `score_report <materials.json> [--metrics]`

use anyhow::{bail, Context, Result};
use circular_scores::coverage::cited_parameters;
use circular_scores::metrics::Metrics;
use circular_scores::{
    audit_confidence_levels, telemetry, ParameterSourceCache, ScoringEngine,
};
use serde_json::json;
use std::fs;

fn main() -> Result<()> {
    // .env is optional; it can carry SCORING_CONFIG_PATH / SCORING_DEV_LOG.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: score_report <materials.json> [--metrics]");
    };
    let with_metrics = args.any(|a| a == "--metrics");
    let metrics = with_metrics.then(Metrics::init);

    let raw = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let materials: Vec<circular_scores::Material> =
        serde_json::from_str(&raw).with_context(|| format!("parsing materials from {path}"))?;

    let engine = ScoringEngine::from_default_config()?;
    let keys = engine.config().tracked_parameters.clone();

    let report = engine.recalculate_batch(&materials, &[]);
    let cache = ParameterSourceCache::build(&materials, &keys);
    let coverage: Vec<_> = materials
        .iter()
        .map(|m| {
            json!({
                "material_id": m.id,
                "coverage": cache.coverage_stats(&m.id, &keys),
                "cited": cited_parameters(&m.sources),
            })
        })
        .collect();
    let audit = audit_confidence_levels(&materials);

    let out = json!({
        "report": report,
        "coverage": coverage,
        "confidence_audit": audit,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);

    if let Some(m) = metrics {
        println!("{}", m.render());
    }
    Ok(())
}
