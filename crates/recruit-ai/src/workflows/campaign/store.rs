use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{BiasFlag, CampaignId, EvaluationResult, OutreachDraft, RankedCandidate};

/// Lifecycle states a stored campaign moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Created,
    Initialized,
    Running,
    Ranked,
    Purged,
}

impl CampaignStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CampaignStatus::Created => "created",
            CampaignStatus::Initialized => "initialized",
            CampaignStatus::Running => "running",
            CampaignStatus::Ranked => "ranked",
            CampaignStatus::Purged => "purged",
        }
    }

    /// Strict parse of a status label. Unknown input is an error, never a
    /// silent fallback to some default state.
    pub fn parse(value: &str) -> Result<Self, UnknownStatusError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "created" => Ok(CampaignStatus::Created),
            "initialized" => Ok(CampaignStatus::Initialized),
            "running" => Ok(CampaignStatus::Running),
            "ranked" => Ok(CampaignStatus::Ranked),
            "purged" => Ok(CampaignStatus::Purged),
            _ => Err(UnknownStatusError(value.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown campaign status: {0}")]
pub struct UnknownStatusError(pub String);

/// Minute-resolution UTC stamp used on stored records and audit entries.
pub fn minute_stamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M").to_string()
}

/// Derived measurements for a campaign's current slate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignMetrics {
    pub total_candidates: usize,
    pub bias_checks: usize,
    pub bias_checks_passed: bool,
    pub data_deficient_count: usize,
    pub selection_rationale: String,
    pub generated_at: String,
}

impl CampaignMetrics {
    pub fn from_slate(ranked: &[RankedCandidate], evaluations: &[EvaluationResult]) -> Self {
        let bias_checks = evaluations
            .iter()
            .map(|evaluation| evaluation.bias_flags.len())
            .sum::<usize>();
        let data_deficient_count = ranked
            .iter()
            .filter(|candidate| {
                candidate
                    .tags
                    .iter()
                    .any(|tag| tag == BiasFlag::DataDeficient.label())
            })
            .count();
        let selection_rationale = match ranked.first() {
            Some(top) => format!("{} ({}) leads the pack", top.name, top.role),
            None => "Campaign initializing".to_string(),
        };

        Self {
            total_candidates: ranked.len(),
            bias_checks,
            bias_checks_passed: bias_checks == 0,
            data_deficient_count,
            selection_rationale,
            generated_at: minute_stamp(),
        }
    }
}

/// One templated sourcing signal. Stands in for an external search
/// integration; the shape is what campaign reports embed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchInsight {
    pub source: String,
    pub summary: String,
}

/// Search signals captured for a campaign at creation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchInsights {
    pub query: String,
    pub insights: Vec<SearchInsight>,
}

impl SearchInsights {
    pub fn for_query(query: &str) -> Self {
        Self {
            query: query.to_string(),
            insights: vec![SearchInsight {
                source: "Serper.dev".to_string(),
                summary: format!("Top skills matched for {query}"),
            }],
        }
    }
}

/// Aggregate record for one stored campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub campaign_id: CampaignId,
    pub title: String,
    pub description: String,
    pub job_description: String,
    pub created_at: String,
    pub status: CampaignStatus,
    pub candidates: Vec<RankedCandidate>,
    pub evaluations: Vec<EvaluationResult>,
    pub outreach_drafts: Vec<OutreachDraft>,
    pub metrics: CampaignMetrics,
    pub search_insights: SearchInsights,
}

/// Everything needed to persist a freshly run campaign.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    pub job_description: String,
    pub candidates: Vec<RankedCandidate>,
    pub evaluations: Vec<EvaluationResult>,
    pub metrics: CampaignMetrics,
    pub search_insights: SearchInsights,
}

/// Audit trail entry appended on every campaign mutation worth keeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: String,
    pub campaign_id: CampaignId,
    pub action: String,
    pub details: Value,
}

/// Storage abstraction so transport handlers can be exercised against test
/// doubles. Missing ids surface as `Ok(None)` or `Ok(false)`; only genuine
/// storage failures are errors.
pub trait CampaignStore: Send + Sync {
    fn create(&self, campaign: NewCampaign) -> Result<CampaignRecord, StoreError>;
    fn get(&self, id: &CampaignId) -> Result<Option<CampaignRecord>, StoreError>;
    fn update_status(&self, id: &CampaignId, status: CampaignStatus) -> Result<(), StoreError>;
    fn update_candidates(
        &self,
        id: &CampaignId,
        candidates: Vec<RankedCandidate>,
        evaluations: Vec<EvaluationResult>,
        metrics: CampaignMetrics,
    ) -> Result<Option<CampaignRecord>, StoreError>;
    fn add_outreach_drafts(
        &self,
        id: &CampaignId,
        drafts: Vec<OutreachDraft>,
    ) -> Result<Option<Vec<OutreachDraft>>, StoreError>;
    fn record_audit(&self, id: &CampaignId, action: &str, details: Value)
        -> Result<(), StoreError>;
    fn audit_trail(&self) -> Result<Vec<AuditEvent>, StoreError>;
    fn purge(&self, id: &CampaignId) -> Result<bool, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("campaign store unavailable: {0}")]
    Unavailable(String),
}
