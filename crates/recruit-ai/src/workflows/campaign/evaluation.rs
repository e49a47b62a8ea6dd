use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::{profile_url_for, BiasFlag, CandidateSeed, EvaluationResult};
use super::trace::{CrewError, StageTracer};

/// Tuning dials for the sourcing and evaluation heuristics.
///
/// Defaults reproduce the long-standing behavior: a 0.95 research score cap
/// fed by one point per 400 characters of role brief, a flat +0.1 evaluation
/// boost, and a 0.65 bias threshold unless a role override says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineTuning {
    pub research_divisor: f64,
    pub research_cap: f64,
    pub evaluation_boost: f64,
    pub default_bias_threshold: f64,
    pub role_thresholds: BTreeMap<String, f64>,
}

impl Default for PipelineTuning {
    fn default() -> Self {
        Self {
            research_divisor: 400.0,
            research_cap: 0.95,
            evaluation_boost: 0.1,
            default_bias_threshold: 0.65,
            role_thresholds: BTreeMap::new(),
        }
    }
}

impl PipelineTuning {
    pub fn bias_threshold_for(&self, role: &str) -> f64 {
        self.role_thresholds
            .get(role)
            .copied()
            .unwrap_or(self.default_bias_threshold)
    }
}

/// Stage deriving bias findings and adjusted scores from sourced seeds.
pub struct CandidateEvaluator {
    tuning: PipelineTuning,
    tracer: StageTracer,
}

impl Default for CandidateEvaluator {
    fn default() -> Self {
        Self::new(PipelineTuning::default())
    }
}

impl CandidateEvaluator {
    pub fn new(tuning: PipelineTuning) -> Self {
        Self {
            tuning,
            tracer: StageTracer::new("evaluator"),
        }
    }

    /// Produce one evaluation per seed, preserving input order.
    pub fn evaluate(&self, seeds: &[CandidateSeed]) -> Result<Vec<EvaluationResult>, CrewError> {
        self.tracer.scope("evaluate", || {
            Ok(seeds.iter().map(|seed| self.evaluate_seed(seed)).collect())
        })
    }

    fn evaluate_seed(&self, seed: &CandidateSeed) -> EvaluationResult {
        let bias_flags = self.derive_flags(seed);

        EvaluationResult {
            candidate_id: seed.candidate_id.clone(),
            name: seed.name.clone(),
            role: seed.role.clone(),
            score: (seed.score + self.tuning.evaluation_boost).min(1.0),
            rationale: seed.rationale.clone(),
            bias_flags,
            comments: format!(
                "Evaluated {}; {} tag(s) observed.",
                seed.name,
                seed.tags.len()
            ),
            tags: seed.tags.clone(),
            profile_url: profile_url_for(&seed.name),
            evaluated_at: Utc::now(),
        }
    }

    /// Flag order is fixed: data deficiency, manual review, then the score
    /// threshold check. All matching flags are emitted independently.
    fn derive_flags(&self, seed: &CandidateSeed) -> Vec<BiasFlag> {
        let mut flags = Vec::new();

        if seed
            .tags
            .iter()
            .any(|tag| tag == BiasFlag::DataDeficient.label())
        {
            flags.push(BiasFlag::DataDeficient);
        }
        if seed
            .tags
            .iter()
            .any(|tag| tag == BiasFlag::ManualReviewRequired.label())
        {
            flags.push(BiasFlag::ManualReviewRequired);
        }
        if seed.score < self.tuning.bias_threshold_for(&seed.role) {
            flags.push(BiasFlag::BiasWarning);
        }

        flags
    }
}
