// tests/e2e_scoring.rs
//
// End-to-end: JSON material in → score records, confidence and coverage out.

use circular_scores::{
    parameter_availability, Dimension, LabelTier, Material, ParameterSourceCache, ScoringEngine,
};
use circular_scores::{coverage::coverage_stats, ConfidenceLevel};

fn pet_json() -> &'static str {
    r#"{
        "id": "pet-bottle",
        "name": "PET bottle",
        "parameters": {
            "M": 0.65,
            "CR": { "Y": 0.75, "D": 0.80, "C": 0.70, "E": 0.9 },
            "RU": { "L": 0.4, "R": 0.3, "U": 0.2, "C_RU": 0.5 }
        },
        "sources": [
            { "title": "Mechanical recycling yields", "weight": 1.0, "parameters": ["Y_value", "D_value"] },
            { "title": "Collection statistics", "weight": 0.9, "parameters": ["C_value", "E_value"] }
        ],
        "confidence_level": "High"
    }"#
}

#[test]
fn worked_recyclability_example() {
    let material: Material = serde_json::from_str(pet_json()).unwrap();
    let engine = ScoringEngine::default();

    let scores = engine
        .score_material(&material, &[Dimension::Recyclability])
        .unwrap();
    let cr = scores.record(Dimension::Recyclability).unwrap();

    // 0.75 · 0.80 · 0.70 · 0.65 · 0.6
    assert!((cr.practical_mean - 0.1638).abs() < 1e-9);
    assert_eq!(cr.public_score, 16);
    assert_eq!(cr.tier, LabelTier::Poor);
    assert_eq!(cr.label, "Unrecyclable / Experimental");

    // theoretical: U_clean = 1.0
    assert!((cr.theoretical_mean - 0.273).abs() < 1e-9);
    assert!(!cr.practical_exceeds_theoretical());

    // ±10% fallback band
    assert!((cr.practical_ci95.lower - 0.14742).abs() < 1e-9);
    assert!((cr.practical_ci95.upper - 0.18018).abs() < 1e-9);
    cr.validate().unwrap();
}

#[test]
fn full_material_pipeline() {
    let material: Material = serde_json::from_str(pet_json()).unwrap();
    let engine = ScoringEngine::default();

    let scores = engine.score_material(&material, &[]).unwrap();
    assert_eq!(scores.method_version, "CR-v1,RU-v1");
    assert_eq!(scores.records.len(), 2);

    // two sources, avg weight 0.95 → Medium; stated High is flagged
    assert_eq!(scores.suggested_confidence, ConfidenceLevel::Medium);
    let issue = scores.confidence_issue.as_deref().unwrap();
    assert!(issue.contains("1 more source(s)"), "{issue}");

    let keys = Dimension::Recyclability.parameter_keys();
    let cache = ParameterSourceCache::build(std::slice::from_ref(&material), &keys);
    let stats = cache.coverage_stats(&material.id, &keys);
    assert_eq!(stats.total, 7);
    assert_eq!(stats.with_sources, 4);
    // 4 of 7 keys cited
    assert_eq!(stats.percentage_covered, 57);
    assert_eq!(
        stats.missing_parameters,
        vec!["M_value", "CR_practical_mean", "CR_theoretical_mean"]
    );
    assert_eq!(
        stats,
        coverage_stats(&parameter_availability(&material, &keys), &keys)
    );
}

#[test]
fn record_serializes_with_ci_names_and_iso_timestamp() {
    let material: Material = serde_json::from_str(pet_json()).unwrap();
    let record = ScoringEngine::default()
        .score_dimension(&material.parameters, Dimension::Reusability)
        .unwrap();

    let v = serde_json::to_value(&record).unwrap();
    assert_eq!(v["dimension"], "RU");
    assert_eq!(v["method_version"], "RU-v1");
    assert!(v["practical_CI95"]["lower"].is_f64());
    assert!(v["theoretical_CI95"]["upper"].is_f64());
    let ts = v["calculation_timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "{ts}");

    // stored record round-trips and still validates
    let back: circular_scores::ScoreRecord = serde_json::from_value(v).unwrap();
    back.validate().unwrap();
}

#[test]
fn out_of_range_input_is_rejected_with_field_name() {
    let json = pet_json().replace("\"D\": 0.80", "\"D\": 1.80");
    let material: Material = serde_json::from_str(&json).unwrap();
    let err = ScoringEngine::default()
        .score_material(&material, &[])
        .unwrap_err();
    assert!(err.to_string().contains("CR.D"), "{err}");
}

#[test]
fn cr_e_outside_unit_range_is_rejected() {
    let json = pet_json().replace("\"E\": 0.9", "\"E\": 7.0");
    let material: Material = serde_json::from_str(&json).unwrap();
    let err = ScoringEngine::default()
        .score_material(&material, &[Dimension::Recyclability])
        .unwrap_err();
    assert!(err.to_string().contains("CR.E"), "{err}");

    let report = ScoringEngine::default().recalculate_batch(std::slice::from_ref(&material), &[]);
    assert!(report.scored.is_empty());
    assert!(report.failures[0].message.contains("CR.E"));
}
