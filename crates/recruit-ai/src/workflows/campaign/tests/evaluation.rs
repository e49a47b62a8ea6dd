use std::collections::BTreeMap;

use super::common::*;
use crate::workflows::campaign::domain::BiasFlag;
use crate::workflows::campaign::evaluation::{CandidateEvaluator, PipelineTuning};

#[test]
fn evaluator_applies_the_boost_and_caps_at_one() {
    let evaluator = CandidateEvaluator::default();
    let seeds = vec![
        seed("Marina Byte", "Full Stack Engineer", 0.72, &["High Confidence"]),
        seed("Kai Ops", "DevOps Engineer", 0.95, &[]),
    ];

    let evaluations = evaluator.evaluate(&seeds).expect("evaluation succeeds");

    assert_eq!(evaluations.len(), 2);
    assert!((evaluations[0].score - 0.82).abs() < 1e-9);
    assert!((evaluations[1].score - 1.0).abs() < 1e-9);
}

#[test]
fn evaluator_preserves_input_order() {
    let evaluator = CandidateEvaluator::default();
    let seeds = vec![
        seed("Nia Vector", "Platform Architect", 0.64, &[]),
        seed("Alex Dev", "Backend Engineer", 0.90, &[]),
    ];

    let evaluations = evaluator.evaluate(&seeds).expect("evaluation succeeds");

    assert_eq!(evaluations[0].name, "Nia Vector");
    assert_eq!(evaluations[1].name, "Alex Dev");
}

#[test]
fn tag_driven_flags_come_before_the_score_check() {
    let evaluator = CandidateEvaluator::default();
    let seeds = vec![seed(
        "Alex Dev",
        "Backend Engineer",
        0.60,
        &["Data Deficient", "Manual Review Required"],
    )];

    let evaluations = evaluator.evaluate(&seeds).expect("evaluation succeeds");

    assert_eq!(
        evaluations[0].bias_flags,
        vec![
            BiasFlag::DataDeficient,
            BiasFlag::ManualReviewRequired,
            BiasFlag::BiasWarning,
        ]
    );
}

#[test]
fn low_scores_earn_a_bias_warning() {
    let evaluator = CandidateEvaluator::default();
    let seeds = vec![
        seed("Kai Ops", "DevOps Engineer", 0.64, &[]),
        seed("Marina Byte", "Full Stack Engineer", 0.65, &[]),
    ];

    let evaluations = evaluator.evaluate(&seeds).expect("evaluation succeeds");

    assert_eq!(evaluations[0].bias_flags, vec![BiasFlag::BiasWarning]);
    assert!(evaluations[1].bias_flags.is_empty());
}

#[test]
fn role_overrides_tighten_the_bias_threshold() {
    let mut role_thresholds = BTreeMap::new();
    role_thresholds.insert("DevOps Engineer".to_string(), 0.9);
    let tuning = PipelineTuning {
        role_thresholds,
        ..PipelineTuning::default()
    };
    let evaluator = CandidateEvaluator::new(tuning);

    let seeds = vec![
        seed("Kai Ops", "DevOps Engineer", 0.8, &[]),
        seed("Marina Byte", "Full Stack Engineer", 0.8, &[]),
    ];

    let evaluations = evaluator.evaluate(&seeds).expect("evaluation succeeds");

    assert_eq!(evaluations[0].bias_flags, vec![BiasFlag::BiasWarning]);
    assert!(evaluations[1].bias_flags.is_empty());
}

#[test]
fn evaluation_carries_comments_and_profile_links() {
    let evaluator = CandidateEvaluator::default();
    let seeds = vec![seed(
        "Alex Dev",
        "Backend Engineer",
        0.7,
        &["High Confidence", "Open Source"],
    )];

    let evaluations = evaluator.evaluate(&seeds).expect("evaluation succeeds");

    assert_eq!(evaluations[0].comments, "Evaluated Alex Dev; 2 tag(s) observed.");
    assert_eq!(
        evaluations[0].profile_url,
        "https://talent.example.com/alex-dev"
    );
    assert_eq!(evaluations[0].tags, vec!["High Confidence", "Open Source"]);
}

#[test]
fn empty_seed_slate_evaluates_to_empty() {
    let evaluator = CandidateEvaluator::default();
    let evaluations = evaluator.evaluate(&[]).expect("evaluation succeeds");
    assert!(evaluations.is_empty());
}
