use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    CampaignId, CampaignPhase, CompliancePolicy, ComplianceSummary, EvaluationResult,
    JobDescription, OutreachDraft, OutreachTemplate, RankedCandidate, RankingPolicy,
    RiskAssessment, RiskLevel,
};
use super::evaluation::{CandidateEvaluator, PipelineTuning};
use super::outreach::OutreachComposer;
use super::ranking::CandidateRanker;
use super::sourcing::{CandidateResearcher, CandidateSource};
use super::trace::{CrewError, StageTracer};

/// Default slate size for a campaign run.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 4;

/// Construction-time configuration for an orchestrator. Everything has a
/// sensible default; a campaign without a bound role brief falls back to the
/// placeholder brief on each run.
#[derive(Debug, Clone, Default)]
pub struct CampaignSettings {
    pub job_description: Option<JobDescription>,
    pub ranking_policy: RankingPolicy,
    pub compliance: CompliancePolicy,
    pub tuning: PipelineTuning,
}

/// Sequences the pipeline stages for one campaign and retains the latest
/// committed snapshots plus an append-only risk history.
///
/// Mutating operations take `&mut self`, so one orchestrator serves one
/// campaign as a single writer; shared use (the HTTP layer) goes through a
/// `Mutex`.
pub struct CampaignOrchestrator<S> {
    researcher: CandidateResearcher<S>,
    evaluator: CandidateEvaluator,
    ranker: CandidateRanker,
    composer: OutreachComposer,
    tracer: StageTracer,
    policy: RankingPolicy,
    compliance: CompliancePolicy,
    job_description: JobDescription,
    latest_candidates: Vec<RankedCandidate>,
    latest_evaluations: Vec<EvaluationResult>,
    risk_history: Vec<RiskAssessment>,
    outreach_drafted: bool,
}

impl<S: CandidateSource> CampaignOrchestrator<S> {
    pub fn new(source: Arc<S>, settings: CampaignSettings) -> Self {
        let CampaignSettings {
            job_description,
            ranking_policy,
            compliance,
            tuning,
        } = settings;

        Self {
            researcher: CandidateResearcher::new(source, tuning.clone()),
            evaluator: CandidateEvaluator::new(tuning),
            ranker: CandidateRanker::new(),
            composer: OutreachComposer::new(),
            tracer: StageTracer::new("orchestrator"),
            policy: ranking_policy,
            compliance,
            job_description: job_description.unwrap_or_else(JobDescription::fallback),
            latest_candidates: Vec::new(),
            latest_evaluations: Vec::new(),
            risk_history: Vec::new(),
            outreach_drafted: false,
        }
    }

    /// Execute Research → Evaluate → Rank → RiskAssess against the provided
    /// or construction-bound role brief. Snapshots and risk history commit
    /// only after every stage succeeds; a failing stage leaves prior state
    /// untouched.
    pub fn run_campaign(
        &mut self,
        job_description: Option<JobDescription>,
        limit: usize,
    ) -> Result<(Vec<RankedCandidate>, Vec<EvaluationResult>), CrewError> {
        let brief = job_description.unwrap_or_else(|| self.job_description.clone());
        info!(job_title = %brief.title, limit, "campaign run started");

        let tracer = self.tracer;
        tracer.scope("run_campaign", || {
            let seeds = self.researcher.research(&brief, limit)?;
            let evaluations = self.evaluator.evaluate(&seeds)?;
            let ranked = self.ranker.recommend(&evaluations, &self.policy)?;
            let risk = self.assess_risk(&evaluations);

            let bias_flags: usize = evaluations
                .iter()
                .map(|evaluation| evaluation.bias_flags.len())
                .sum();
            info!(
                job_title = %brief.title,
                candidates = ranked.len(),
                bias_flags,
                "campaign run complete"
            );

            self.record_state(ranked.clone(), evaluations.clone(), risk);
            self.outreach_drafted = false;

            Ok((ranked, evaluations))
        })
    }

    /// Re-run Rank + RiskAssess only, against supplied evaluations or the
    /// stored snapshot. With neither available this soft-fails to an empty
    /// slate with a warning so callers can poll before a campaign has run.
    pub fn rerank(
        &mut self,
        evaluations: Option<Vec<EvaluationResult>>,
        policy: Option<RankingPolicy>,
    ) -> Result<Vec<RankedCandidate>, CrewError> {
        let tracer = self.tracer;
        tracer.scope("rerank", || {
            let source = match evaluations {
                Some(list) if !list.is_empty() => list,
                _ => self.latest_evaluations.clone(),
            };
            if source.is_empty() {
                warn!("rerank requested before any evaluations exist");
                return Ok(Vec::new());
            }

            if let Some(policy) = policy {
                self.policy = policy;
            }

            let ranked = self.ranker.recommend(&source, &self.policy)?;
            let risk = self.assess_risk(&source);
            self.record_state(ranked.clone(), source, risk);
            Ok(ranked)
        })
    }

    /// Draft outreach for supplied candidates or the last ranked slate.
    /// Soft-fails to empty when no candidates exist; a draft failing for one
    /// candidate is logged and skipped without aborting the batch.
    pub fn generate_outreach(
        &mut self,
        campaign_id: &CampaignId,
        candidates: Option<Vec<RankedCandidate>>,
        template: Option<OutreachTemplate>,
    ) -> Result<Vec<OutreachDraft>, CrewError> {
        let tracer = self.tracer;
        tracer.scope("generate_outreach", || {
            let roster = match candidates {
                Some(list) if !list.is_empty() => list,
                _ => self.latest_candidates.clone(),
            };
            if roster.is_empty() {
                warn!(campaign_id = %campaign_id.0, "outreach requested before any candidates exist");
                return Ok(Vec::new());
            }

            let template = template.unwrap_or_default();

            let mut drafts = Vec::with_capacity(roster.len());
            for candidate in &roster {
                match self.composer.draft(campaign_id, candidate, &template) {
                    Ok(draft) => drafts.push(draft),
                    Err(error) => warn!(
                        campaign_id = %campaign_id.0,
                        candidate_id = %candidate.candidate_id.0,
                        %error,
                        "outreach draft skipped"
                    ),
                }
            }

            if !drafts.is_empty() {
                self.outreach_drafted = true;
            }

            Ok(drafts)
        })
    }

    /// Aggregate bias-flag density for a slate. An empty slate reads as
    /// denominator 1, so risk is zero and the level stays standard.
    pub fn assess_risk(&self, evaluations: &[EvaluationResult]) -> RiskAssessment {
        let bias_flags: usize = evaluations
            .iter()
            .map(|evaluation| evaluation.bias_flags.len())
            .sum();
        let score = (bias_flags as f64 / evaluations.len().max(1) as f64).min(1.0);
        let level = if score > 0.3 {
            RiskLevel::Elevated
        } else {
            RiskLevel::Standard
        };

        RiskAssessment {
            score,
            bias_flags,
            level,
            generated_at: Utc::now(),
        }
    }

    pub fn compliance_summary(&self) -> ComplianceSummary {
        self.compliance.summary()
    }

    /// Swap the active ranking policy used as the default for future runs.
    /// Idempotent; no other state is touched.
    pub fn set_policy(&mut self, policy: RankingPolicy) {
        self.policy = policy;
    }

    pub fn phase(&self) -> CampaignPhase {
        CampaignPhase::from_progress(
            !self.latest_evaluations.is_empty(),
            !self.latest_candidates.is_empty(),
            self.outreach_drafted,
        )
    }

    pub fn active_policy(&self) -> &RankingPolicy {
        &self.policy
    }

    pub fn job_description(&self) -> &JobDescription {
        &self.job_description
    }

    pub fn latest_candidates(&self) -> &[RankedCandidate] {
        &self.latest_candidates
    }

    pub fn latest_evaluations(&self) -> &[EvaluationResult] {
        &self.latest_evaluations
    }

    pub fn risk_history(&self) -> &[RiskAssessment] {
        &self.risk_history
    }

    fn record_state(
        &mut self,
        candidates: Vec<RankedCandidate>,
        evaluations: Vec<EvaluationResult>,
        risk: RiskAssessment,
    ) {
        self.latest_candidates = candidates;
        self.latest_evaluations = evaluations;
        self.risk_history.push(risk);
    }
}
