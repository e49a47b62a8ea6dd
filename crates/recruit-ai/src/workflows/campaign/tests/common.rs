use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::workflows::campaign::domain::{
    BiasFlag, CampaignId, CandidateId, CandidateSeed, EvaluationResult, JobDescription,
    OutreachDraft, RankedCandidate,
};
use crate::workflows::campaign::router::CampaignAppState;
use crate::workflows::campaign::store::{
    minute_stamp, AuditEvent, CampaignMetrics, CampaignRecord, CampaignStatus, CampaignStore,
    NewCampaign, StoreError,
};
use crate::workflows::campaign::{
    campaign_router, CampaignOrchestrator, CampaignSettings, StaticCandidateCatalog,
};

pub(super) fn brief() -> JobDescription {
    JobDescription::new(
        "Senior Python Engineer",
        "Build scalable APIs with strong testing culture and mentorship.",
    )
}

pub(super) fn orchestrator() -> CampaignOrchestrator<StaticCandidateCatalog> {
    CampaignOrchestrator::new(
        Arc::new(StaticCandidateCatalog::builtin()),
        CampaignSettings::default(),
    )
}

pub(super) fn seed(name: &str, role: &str, score: f64, tags: &[&str]) -> CandidateSeed {
    CandidateSeed {
        candidate_id: CandidateId::derive(name, "Senior Python Engineer"),
        name: name.to_string(),
        role: role.to_string(),
        score,
        rationale: format!("{name} shows a {role} signal that aligns with Senior Python Engineer."),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        data_sources: vec!["Serper.dev".to_string()],
        sourced_at: Utc::now(),
    }
}

pub(super) fn evaluation(
    name: &str,
    score: f64,
    bias_flags: &[BiasFlag],
    tags: &[&str],
) -> EvaluationResult {
    EvaluationResult {
        candidate_id: CandidateId::derive(name, "Senior Python Engineer"),
        name: name.to_string(),
        role: "Backend Engineer".to_string(),
        score,
        rationale: format!("{name} shows a strong signal."),
        bias_flags: bias_flags.to_vec(),
        comments: format!("Evaluated {name}; {} tag(s) observed.", tags.len()),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        profile_url: format!(
            "https://talent.example.com/{}",
            name.to_lowercase().replace(' ', "-")
        ),
        evaluated_at: Utc::now(),
    }
}

pub(super) fn ranked(name: &str, final_score: f64, tags: &[&str]) -> RankedCandidate {
    RankedCandidate {
        candidate_id: CandidateId::derive(name, "Senior Python Engineer"),
        name: name.to_string(),
        role: "Backend Engineer".to_string(),
        final_score,
        rationale: format!("{name} shows a strong signal."),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        bias_flags: Vec::new(),
        rank_label: "Tier 1".to_string(),
        recommendation: format!("Rank 1: {name} ({final_score:.2})"),
        profile_url: format!(
            "https://talent.example.com/{}",
            name.to_lowercase().replace(' ', "-")
        ),
        notes: None,
        ranked_at: Utc::now(),
    }
}

/// In-memory store double mirroring the production store semantics.
#[derive(Default)]
pub(super) struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    records: HashMap<CampaignId, CampaignRecord>,
    audit: Vec<AuditEvent>,
    sequence: usize,
}

impl MemoryStore {
    pub(super) fn audit_actions(&self) -> Vec<String> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        guard.audit.iter().map(|event| event.action.clone()).collect()
    }
}

impl CampaignStore for MemoryStore {
    fn create(&self, campaign: NewCampaign) -> Result<CampaignRecord, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard.sequence += 1;
        let campaign_id = CampaignId(format!("CAMP_{:03}", guard.sequence));
        let record = CampaignRecord {
            campaign_id: campaign_id.clone(),
            title: campaign.title,
            description: campaign.description,
            job_description: campaign.job_description,
            created_at: minute_stamp(),
            status: CampaignStatus::Initialized,
            candidates: campaign.candidates,
            evaluations: campaign.evaluations,
            outreach_drafts: Vec::new(),
            metrics: campaign.metrics,
            search_insights: campaign.search_insights,
        };
        guard.records.insert(campaign_id.clone(), record.clone());
        let timestamp = record.created_at.clone();
        guard.audit.push(AuditEvent {
            timestamp,
            campaign_id,
            action: "campaign_created".to_string(),
            details: serde_json::json!({ "title": record.title }),
        });
        Ok(record)
    }

    fn get(&self, id: &CampaignId) -> Result<Option<CampaignRecord>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.records.get(id).cloned())
    }

    fn update_status(&self, id: &CampaignId, status: CampaignStatus) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        if let Some(record) = guard.records.get_mut(id) {
            record.status = status;
        }
        Ok(())
    }

    fn update_candidates(
        &self,
        id: &CampaignId,
        candidates: Vec<RankedCandidate>,
        evaluations: Vec<EvaluationResult>,
        metrics: CampaignMetrics,
    ) -> Result<Option<CampaignRecord>, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        match guard.records.get_mut(id) {
            Some(record) => {
                record.candidates = candidates;
                record.evaluations = evaluations;
                record.metrics = metrics;
                record.status = CampaignStatus::Ranked;
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    fn add_outreach_drafts(
        &self,
        id: &CampaignId,
        drafts: Vec<OutreachDraft>,
    ) -> Result<Option<Vec<OutreachDraft>>, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        match guard.records.get_mut(id) {
            Some(record) => {
                record.outreach_drafts = drafts;
                Ok(Some(record.outreach_drafts.clone()))
            }
            None => Ok(None),
        }
    }

    fn record_audit(
        &self,
        id: &CampaignId,
        action: &str,
        details: Value,
    ) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard.audit.push(AuditEvent {
            timestamp: minute_stamp(),
            campaign_id: id.clone(),
            action: action.to_string(),
            details,
        });
        Ok(())
    }

    fn audit_trail(&self) -> Result<Vec<AuditEvent>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.audit.clone())
    }

    fn purge(&self, id: &CampaignId) -> Result<bool, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.records.remove(id).is_some())
    }
}

/// Store double that fails every call, for the unavailable-path handlers.
pub(super) struct UnavailableStore;

impl CampaignStore for UnavailableStore {
    fn create(&self, _campaign: NewCampaign) -> Result<CampaignRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn get(&self, _id: &CampaignId) -> Result<Option<CampaignRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update_status(&self, _id: &CampaignId, _status: CampaignStatus) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update_candidates(
        &self,
        _id: &CampaignId,
        _candidates: Vec<RankedCandidate>,
        _evaluations: Vec<EvaluationResult>,
        _metrics: CampaignMetrics,
    ) -> Result<Option<CampaignRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn add_outreach_drafts(
        &self,
        _id: &CampaignId,
        _drafts: Vec<OutreachDraft>,
    ) -> Result<Option<Vec<OutreachDraft>>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn record_audit(
        &self,
        _id: &CampaignId,
        _action: &str,
        _details: Value,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn audit_trail(&self) -> Result<Vec<AuditEvent>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn purge(&self, _id: &CampaignId) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn app_state() -> CampaignAppState<StaticCandidateCatalog, MemoryStore> {
    CampaignAppState {
        orchestrator: Arc::new(Mutex::new(orchestrator())),
        store: Arc::new(MemoryStore::default()),
    }
}

pub(super) fn router_with_state(
    state: CampaignAppState<StaticCandidateCatalog, MemoryStore>,
) -> axum::Router {
    campaign_router(state)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
