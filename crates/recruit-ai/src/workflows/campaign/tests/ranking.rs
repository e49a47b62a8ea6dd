use super::common::*;
use crate::workflows::campaign::domain::{BiasFlag, RankingPolicy};
use crate::workflows::campaign::ranking::CandidateRanker;

#[test]
fn slate_is_ordered_by_score_descending() {
    let ranker = CandidateRanker::new();
    let evaluations = vec![
        evaluation("Alex Dev", 0.70, &[], &[]),
        evaluation("Marina Byte", 0.90, &[], &[]),
        evaluation("Kai Ops", 0.80, &[], &[]),
    ];

    let ranked = ranker
        .recommend(&evaluations, &RankingPolicy::default())
        .expect("ranking succeeds");

    let names: Vec<&str> = ranked.iter().map(|candidate| candidate.name.as_str()).collect();
    assert_eq!(names, ["Marina Byte", "Kai Ops", "Alex Dev"]);
}

#[test]
fn tied_scores_keep_their_input_order() {
    let ranker = CandidateRanker::new();
    let evaluations = vec![
        evaluation("Alex Dev", 0.70, &[], &[]),
        evaluation("Marina Byte", 0.90, &[], &[]),
        evaluation("Kai Ops", 0.70, &[], &[]),
    ];

    let ranked = ranker
        .recommend(&evaluations, &RankingPolicy::default())
        .expect("ranking succeeds");

    let names: Vec<&str> = ranked.iter().map(|candidate| candidate.name.as_str()).collect();
    assert_eq!(names, ["Marina Byte", "Alex Dev", "Kai Ops"]);
}

#[test]
fn review_burden_tags_earn_the_diversity_bonus() {
    let ranker = CandidateRanker::new();
    let evaluations = vec![
        evaluation("Marina Byte", 0.80, &[], &[]),
        evaluation("Alex Dev", 0.70, &[], &["Manual Review Required"]),
        evaluation("Kai Ops", 0.70, &[], &["Data Deficient"]),
        evaluation("Nia Vector", 0.70, &[], &["High Confidence"]),
    ];

    let ranked = ranker
        .recommend(&evaluations, &RankingPolicy::default())
        .expect("ranking succeeds");

    // ordering is decided before the bonus lands
    assert_eq!(ranked[0].name, "Marina Byte");
    assert!((ranked[0].final_score - 0.80).abs() < 1e-9);
    assert!((ranked[1].final_score - 0.75).abs() < 1e-9);
    assert!((ranked[2].final_score - 0.75).abs() < 1e-9);
    assert!((ranked[3].final_score - 0.70).abs() < 1e-9);
}

#[test]
fn bias_flags_alone_do_not_earn_the_bonus() {
    let ranker = CandidateRanker::new();
    let evaluations = vec![evaluation(
        "Alex Dev",
        0.70,
        &[BiasFlag::BiasWarning],
        &["High Confidence"],
    )];

    let ranked = ranker
        .recommend(&evaluations, &RankingPolicy::default())
        .expect("ranking succeeds");

    assert!((ranked[0].final_score - 0.70).abs() < 1e-9);
    assert_eq!(ranked[0].notes.as_deref(), Some("Manual review advised."));
}

#[test]
fn final_score_saturates_at_one() {
    let ranker = CandidateRanker::new();
    let evaluations = vec![evaluation(
        "Marina Byte",
        0.98,
        &[],
        &["Data Deficient"],
    )];

    let ranked = ranker
        .recommend(&evaluations, &RankingPolicy::default())
        .expect("ranking succeeds");

    assert!((ranked[0].final_score - 1.0).abs() < 1e-9);
}

#[test]
fn tiers_advance_every_two_positions() {
    let ranker = CandidateRanker::new();
    let evaluations: Vec<_> = [0.9, 0.8, 0.7, 0.6, 0.5]
        .iter()
        .enumerate()
        .map(|(i, score)| evaluation(&format!("Candidate {i}"), *score, &[], &[]))
        .collect();

    let ranked = ranker
        .recommend(&evaluations, &RankingPolicy::default())
        .expect("ranking succeeds");

    let labels: Vec<&str> = ranked
        .iter()
        .map(|candidate| candidate.rank_label.as_str())
        .collect();
    assert_eq!(labels, ["Tier 1", "Tier 1", "Tier 2", "Tier 2", "Tier 3"]);
    assert_eq!(ranked[0].recommendation, "Rank 1: Candidate 0 (0.90)");
    assert_eq!(ranked[4].recommendation, "Rank 5: Candidate 4 (0.50)");
}

#[test]
fn clean_candidates_carry_no_notes() {
    let ranker = CandidateRanker::new();
    let evaluations = vec![evaluation("Marina Byte", 0.9, &[], &[])];

    let ranked = ranker
        .recommend(&evaluations, &RankingPolicy::default())
        .expect("ranking succeeds");

    assert_eq!(ranked[0].notes, None);
}

#[test]
fn empty_evaluations_rank_to_an_empty_slate() {
    let ranker = CandidateRanker::new();
    let ranked = ranker
        .recommend(&[], &RankingPolicy::default())
        .expect("ranking succeeds");
    assert!(ranked.is_empty());
}

#[test]
fn custom_diversity_bonus_is_honored() {
    let ranker = CandidateRanker::new();
    let policy = RankingPolicy {
        diversity_bonus: 0.2,
        ..RankingPolicy::default()
    };
    let evaluations = vec![evaluation(
        "Alex Dev",
        0.70,
        &[],
        &["Manual Review Required"],
    )];

    let ranked = ranker.recommend(&evaluations, &policy).expect("ranking succeeds");

    assert!((ranked[0].final_score - 0.90).abs() < 1e-9);
}
