use chrono::Utc;

use super::domain::{BiasFlag, EvaluationResult, RankedCandidate, RankingPolicy};
use super::trace::{CrewError, StageTracer};

/// Ranking stage: orders an evaluated slate under a policy and labels tiers.
pub struct CandidateRanker {
    tracer: StageTracer,
}

impl Default for CandidateRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateRanker {
    pub fn new() -> Self {
        Self {
            tracer: StageTracer::new("ranker"),
        }
    }

    /// Sort descending by score (stable, so tied scores keep input order),
    /// grant the diversity bonus to flagged candidates, and label tiers two
    /// candidates per band.
    pub fn recommend(
        &self,
        evaluations: &[EvaluationResult],
        policy: &RankingPolicy,
    ) -> Result<Vec<RankedCandidate>, CrewError> {
        self.tracer.scope("recommend", || {
            let mut ordered: Vec<&EvaluationResult> = evaluations.iter().collect();
            ordered.sort_by(|a, b| b.score.total_cmp(&a.score));

            let ranked = ordered
                .iter()
                .enumerate()
                .map(|(index, evaluation)| rank_entry(index + 1, evaluation, policy))
                .collect();

            Ok(ranked)
        })
    }
}

fn rank_entry(
    position: usize,
    evaluation: &EvaluationResult,
    policy: &RankingPolicy,
) -> RankedCandidate {
    let bonus = if deserves_diversity_bonus(evaluation) {
        policy.diversity_bonus
    } else {
        0.0
    };
    let final_score = (evaluation.score + bonus).min(1.0);
    let tier = 1 + (position - 1) / 2;

    RankedCandidate {
        candidate_id: evaluation.candidate_id.clone(),
        name: evaluation.name.clone(),
        role: evaluation.role.clone(),
        final_score,
        rationale: evaluation.rationale.clone(),
        tags: evaluation.tags.clone(),
        bias_flags: evaluation.bias_flags.clone(),
        rank_label: format!("Tier {tier}"),
        recommendation: format!("Rank {position}: {} ({final_score:.2})", evaluation.name),
        profile_url: evaluation.profile_url.clone(),
        notes: if evaluation.bias_flags.is_empty() {
            None
        } else {
            Some("Manual review advised.".to_string())
        },
        ranked_at: Utc::now(),
    }
}

/// Eligibility is read from the candidate tags, not from the derived
/// bias_flags list, so a slate with sanitized flags still earns the bonus.
fn deserves_diversity_bonus(evaluation: &EvaluationResult) -> bool {
    evaluation.tags.iter().any(|tag| {
        tag == BiasFlag::ManualReviewRequired.label() || tag == BiasFlag::DataDeficient.label()
    })
}
