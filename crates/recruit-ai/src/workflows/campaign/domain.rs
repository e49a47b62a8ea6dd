use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Identifier wrapper for stored campaigns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub String);

/// Identifier wrapper for sourced candidates.
///
/// Derived from the candidate name and the job title, so the same pairing
/// always yields the same id across independent sourcing runs. That makes
/// re-lookups after a rerank or a fresh campaign run idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn derive(name: &str, job_title: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update(b"|");
        hasher.update(job_title.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        Self(format!("CAN-{}", digest[..8].to_ascii_uppercase()))
    }
}

/// Identifier wrapper for outreach drafts. Random per draft, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftId(pub String);

impl DraftId {
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("DRAFT-{}", hex[..6].to_ascii_uppercase()))
    }
}

/// Deterministic public profile link for a candidate name: lower-cased,
/// spaces joined with hyphens.
pub(crate) fn profile_url_for(name: &str) -> String {
    format!(
        "https://talent.example.com/{}",
        name.to_lowercase().replace(' ', "-")
    )
}

/// The role brief a campaign recruits against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub classification: String,
}

impl JobDescription {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            created_at: Utc::now(),
            classification: "Tier-2".to_string(),
        }
    }

    /// Placeholder brief used when a campaign runs without a bound role.
    pub fn fallback() -> Self {
        Self::new("Talent Search", "No JD provided.")
    }
}

/// A freshly sourced candidate, pre-evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSeed {
    pub candidate_id: CandidateId,
    pub name: String,
    pub role: String,
    pub score: f64,
    pub rationale: String,
    pub tags: Vec<String>,
    pub data_sources: Vec<String>,
    pub sourced_at: DateTime<Utc>,
}

/// Discrete reasons a candidate requires mandatory human review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiasFlag {
    #[serde(rename = "Data Deficient")]
    DataDeficient,
    #[serde(rename = "Manual Review Required")]
    ManualReviewRequired,
    #[serde(rename = "Bias Warning")]
    BiasWarning,
}

impl BiasFlag {
    pub const fn label(self) -> &'static str {
        match self {
            BiasFlag::DataDeficient => "Data Deficient",
            BiasFlag::ManualReviewRequired => "Manual Review Required",
            BiasFlag::BiasWarning => "Bias Warning",
        }
    }
}

/// Scored candidate with bias findings attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub candidate_id: CandidateId,
    pub name: String,
    pub role: String,
    pub score: f64,
    pub rationale: String,
    pub bias_flags: Vec<BiasFlag>,
    pub comments: String,
    pub tags: Vec<String>,
    pub profile_url: String,
    pub evaluated_at: DateTime<Utc>,
}

/// Final slate entry after policy ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub candidate_id: CandidateId,
    pub name: String,
    pub role: String,
    pub final_score: f64,
    pub rationale: String,
    pub tags: Vec<String>,
    pub bias_flags: Vec<BiasFlag>,
    pub rank_label: String,
    pub recommendation: String,
    pub profile_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub ranked_at: DateTime<Utc>,
}

/// Dials applied when ordering an evaluated slate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingPolicy {
    pub name: String,
    pub diversity_bonus: f64,
    pub bias_threshold: f64,
    pub respect_flags: bool,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            name: "balanced".to_string(),
            diversity_bonus: 0.05,
            bias_threshold: 0.7,
            respect_flags: true,
        }
    }
}

/// Static regulatory metadata attached to every campaign. Descriptive only;
/// nothing here is enforced by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompliancePolicy {
    pub gdpr_notes: String,
    pub eu_ai_act_risk_category: String,
    pub retention_days: u32,
    pub logging_level: String,
}

impl Default for CompliancePolicy {
    fn default() -> Self {
        Self {
            gdpr_notes: "Personal data processed only for recruitment; subject rights respected."
                .to_string(),
            eu_ai_act_risk_category: "High-Risk HR".to_string(),
            retention_days: 30,
            logging_level: "INFO".to_string(),
        }
    }
}

/// Flattened compliance view exposed to reports and dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub gdpr: String,
    pub eu_ai_act: String,
    pub retention_days: u32,
    pub logging_level: String,
}

impl CompliancePolicy {
    pub fn summary(&self) -> ComplianceSummary {
        ComplianceSummary {
            gdpr: self.gdpr_notes.clone(),
            eu_ai_act: self.eu_ai_act_risk_category.clone(),
            retention_days: self.retention_days,
            logging_level: self.logging_level.clone(),
        }
    }
}

/// Message scaffold for outreach drafting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachTemplate {
    pub tone: String,
    pub call_to_action: String,
    pub compliance_notes: String,
    pub eu_ai_act_statement: String,
}

impl Default for OutreachTemplate {
    fn default() -> Self {
        Self {
            tone: "professional".to_string(),
            call_to_action: "Let's schedule a time to chat".to_string(),
            compliance_notes: "GDPR-compliant; transparent opt-out included.".to_string(),
            eu_ai_act_statement:
                "High-risk HR workflow per EU AI Act; human oversight and record keeping enforced."
                    .to_string(),
        }
    }
}

/// A composed outreach message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachDraft {
    pub draft_id: DraftId,
    pub campaign_id: CampaignId,
    pub candidate_id: CandidateId,
    pub message: String,
    pub tone: String,
    pub created_at: DateTime<Utc>,
}

/// Coarse classification of a campaign's aggregate bias-flag density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Standard,
    Elevated,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Standard => "standard",
            RiskLevel::Elevated => "elevated",
        }
    }
}

/// Aggregate risk reading taken after every rank or rerank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub bias_flags: usize,
    pub level: RiskLevel,
    pub generated_at: DateTime<Utc>,
}

/// Observable progress of a single campaign's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignPhase {
    Uninitialized,
    Sourced,
    Evaluated,
    Ranked,
    OutreachDrafted,
}

impl CampaignPhase {
    pub const fn label(self) -> &'static str {
        match self {
            CampaignPhase::Uninitialized => "uninitialized",
            CampaignPhase::Sourced => "sourced",
            CampaignPhase::Evaluated => "evaluated",
            CampaignPhase::Ranked => "ranked",
            CampaignPhase::OutreachDrafted => "outreach_drafted",
        }
    }

    /// Phase implied by committed pipeline output. Drafting and ranking are
    /// revisitable, so progress only ever reflects the furthest committed
    /// step, never a partially applied run.
    pub fn from_progress(evaluated: bool, ranked: bool, drafted: bool) -> Self {
        if drafted {
            CampaignPhase::OutreachDrafted
        } else if ranked {
            CampaignPhase::Ranked
        } else if evaluated {
            CampaignPhase::Evaluated
        } else {
            CampaignPhase::Uninitialized
        }
    }
}
