//! Bias-aware candidate recruitment campaigns.
//!
//! A campaign moves a role brief through four pure stages: sourcing research,
//! candidate evaluation, ranked recommendation, and outreach drafting. The
//! [`CampaignOrchestrator`] drives the stages in order, snapshots the latest
//! slate for re-entry, and keeps an append-only risk history. Persistence sits
//! behind the [`CampaignStore`] trait, and the HTTP surface is assembled by
//! [`campaign_router`].

pub mod domain;
pub(crate) mod crew;
pub(crate) mod evaluation;
pub(crate) mod outreach;
pub(crate) mod ranking;
pub mod roster;
pub mod router;
pub(crate) mod sourcing;
pub mod store;
pub(crate) mod trace;

#[cfg(test)]
mod tests;

pub use crew::{CampaignOrchestrator, CampaignSettings, DEFAULT_CANDIDATE_LIMIT};
pub use domain::{
    BiasFlag, CampaignId, CampaignPhase, CandidateId, CandidateSeed, CompliancePolicy,
    ComplianceSummary, DraftId, EvaluationResult, JobDescription, OutreachDraft, OutreachTemplate,
    RankedCandidate, RankingPolicy, RiskAssessment, RiskLevel,
};
pub use evaluation::{CandidateEvaluator, PipelineTuning};
pub use outreach::OutreachComposer;
pub use ranking::CandidateRanker;
pub use roster::{RosterImportError, RosterImporter};
pub use router::{campaign_router, CampaignAppState};
pub use sourcing::{CandidateProfile, CandidateResearcher, CandidateSource, StaticCandidateCatalog};
pub use store::{
    AuditEvent, CampaignMetrics, CampaignRecord, CampaignStatus, CampaignStore, NewCampaign,
    SearchInsight, SearchInsights, StoreError, UnknownStatusError,
};
pub use trace::CrewError;
