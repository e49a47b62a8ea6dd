use std::sync::Arc;

use super::common::*;
use crate::workflows::campaign::domain::JobDescription;
use crate::workflows::campaign::evaluation::PipelineTuning;
use crate::workflows::campaign::sourcing::{CandidateResearcher, StaticCandidateCatalog};

fn researcher() -> CandidateResearcher<StaticCandidateCatalog> {
    CandidateResearcher::new(
        Arc::new(StaticCandidateCatalog::builtin()),
        PipelineTuning::default(),
    )
}

#[test]
fn research_returns_seeds_in_roster_order() {
    let seeds = researcher()
        .research(&brief(), 4)
        .expect("research succeeds");

    let names: Vec<&str> = seeds.iter().map(|seed| seed.name.as_str()).collect();
    assert_eq!(names, ["Alex Dev", "Marina Byte", "Kai Ops", "Nia Vector"]);
    assert!(seeds
        .iter()
        .all(|seed| seed.candidate_id.0.starts_with("CAN-")));
}

#[test]
fn research_respects_the_limit() {
    let seeds = researcher()
        .research(&brief(), 2)
        .expect("research succeeds");

    assert_eq!(seeds.len(), 2);
    assert_eq!(seeds[0].name, "Alex Dev");
    assert_eq!(seeds[1].name, "Marina Byte");

    let none = researcher()
        .research(&brief(), 0)
        .expect("research succeeds");
    assert!(none.is_empty());
}

#[test]
fn richer_briefs_raise_scores_up_to_the_cap() {
    let long_brief = JobDescription::new("Platform Lead", "x".repeat(1_000));
    let seeds = researcher()
        .research(&long_brief, 4)
        .expect("research succeeds");

    // 1000 chars / 400 = +2.5, far past the cap for every profile
    assert!(seeds.iter().all(|seed| seed.score == 0.95));
}

#[test]
fn empty_brief_leaves_baseline_scores_untouched() {
    let bare = JobDescription::new("Platform Lead", "");
    let seeds = researcher().research(&bare, 4).expect("research succeeds");

    let scores: Vec<f64> = seeds.iter().map(|seed| seed.score).collect();
    assert_eq!(scores, [0.60, 0.72, 0.68, 0.64]);
}

#[test]
fn rationale_names_the_candidate_and_the_role_brief() {
    let seeds = researcher()
        .research(&brief(), 1)
        .expect("research succeeds");

    assert_eq!(
        seeds[0].rationale,
        "Alex Dev shows a Backend Engineer signal that aligns with Senior Python Engineer."
    );
    assert_eq!(
        seeds[0].tags,
        vec!["Data Deficient".to_string(), "Manual Review Required".to_string()]
    );
    assert_eq!(
        seeds[0].data_sources,
        vec!["Serper.dev".to_string(), "GitHub".to_string()]
    );
}

#[test]
fn repeated_research_derives_identical_candidate_ids() {
    let first = researcher()
        .research(&brief(), 4)
        .expect("research succeeds");
    let second = researcher()
        .research(&brief(), 4)
        .expect("research succeeds");

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.candidate_id, b.candidate_id);
    }
}
