// tests/thresholds.rs
//
// Label bucket boundaries for every dimension, driven through the engine so
// that public score and label are checked together.

use circular_scores::{
    label_for, public_score, Dimension, LabelTier, ScoringEngine, WeightedEstimate,
};

const TABLE: [(Dimension, [&str; 5]); 3] = [
    (
        Dimension::Recyclability,
        [
            "Easily recyclable",
            "Recyclable",
            "Technically recyclable",
            "Limited recyclability",
            "Unrecyclable / Experimental",
        ],
    ),
    (
        Dimension::Compostability,
        [
            "Highly compostable",
            "Compostable",
            "Industrially compostable",
            "Limited compostability",
            "Non-compostable",
        ],
    ),
    (
        Dimension::Reusability,
        [
            "Highly reusable",
            "Reusable",
            "Moderately reusable",
            "Limited reusability",
            "Single-use",
        ],
    ),
];

/// Representative points: each bucket's lower edge and a value just below it.
const EDGES: [(f64, usize); 9] = [
    (1.00, 0),
    (0.80, 0),
    (0.7999, 1),
    (0.60, 1),
    (0.5999, 2),
    (0.40, 2),
    (0.3999, 3),
    (0.20, 3),
    (0.1999, 4),
];

#[test]
fn every_dimension_uses_the_same_edges() {
    for (dim, labels) in TABLE {
        for (score, bucket) in EDGES {
            assert_eq!(
                label_for(score, dim),
                labels[bucket],
                "{dim} at {score} should be bucket {bucket}"
            );
        }
        assert_eq!(label_for(0.0, dim), labels[4]);
    }
}

#[test]
fn engine_labels_practical_mean_not_public_score() {
    let engine = ScoringEngine::default();
    // 0.7951 → public 80, still below the 0.80 edge
    let single = [WeightedEstimate::new(0.7951, 1.0)];
    let r = engine
        .score_from_estimates(Dimension::Compostability, &single, &single)
        .unwrap();
    assert_eq!(r.public_score, 80);
    assert_eq!(r.tier, LabelTier::Good);
    assert_eq!(r.label, "Compostable");
}

#[test]
fn public_score_covers_full_range() {
    let mut prev = 0u8;
    for i in 0..=1000 {
        let mean = i as f64 / 1000.0;
        let p = public_score(mean).unwrap();
        assert!(p >= prev, "public score must not decrease ({mean})");
        assert!(p <= 100);
        prev = p;
    }
    assert_eq!(prev, 100);
}
