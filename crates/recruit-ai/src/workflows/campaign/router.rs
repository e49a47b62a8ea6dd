use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::crew::{CampaignOrchestrator, DEFAULT_CANDIDATE_LIMIT};
use super::domain::{
    BiasFlag, CampaignId, CampaignPhase, CandidateId, ComplianceSummary, JobDescription,
    OutreachTemplate, RankedCandidate, RankingPolicy,
};
use super::sourcing::CandidateSource;
use super::store::{
    CampaignMetrics, CampaignRecord, CampaignStatus, CampaignStore, NewCampaign, SearchInsights,
    StoreError,
};
use super::trace::CrewError;

pub const MIN_TITLE_CHARS: usize = 5;
pub const MIN_CONTENT_CHARS: usize = 20;

/// Boundary checks for inbound role briefs. These never reach the pipeline;
/// a malformed brief is rejected with a client error before any stage runs.
#[derive(Debug, thiserror::Error)]
pub enum JobValidationError {
    #[error("job title must be at least {} characters", MIN_TITLE_CHARS)]
    TitleTooShort,
    #[error("job content must be at least {} characters", MIN_CONTENT_CHARS)]
    ContentTooShort,
}

pub fn validate_job_description(title: &str, content: &str) -> Result<(), JobValidationError> {
    if title.trim().chars().count() < MIN_TITLE_CHARS {
        return Err(JobValidationError::TitleTooShort);
    }
    if content.trim().chars().count() < MIN_CONTENT_CHARS {
        return Err(JobValidationError::ContentTooShort);
    }
    Ok(())
}

/// Shared handler state: one orchestrator serialized behind a mutex plus the
/// campaign store.
pub struct CampaignAppState<S, C> {
    pub orchestrator: Arc<Mutex<CampaignOrchestrator<S>>>,
    pub store: Arc<C>,
}

impl<S, C> Clone for CampaignAppState<S, C> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            store: Arc::clone(&self.store),
        }
    }
}

/// Router builder exposing the campaign endpoints under `/api/v1`.
pub fn campaign_router<S, C>(state: CampaignAppState<S, C>) -> Router
where
    S: CandidateSource + 'static,
    C: CampaignStore + 'static,
{
    Router::new()
        .route("/api/v1/campaigns", post(create_campaign_handler::<S, C>))
        .route(
            "/api/v1/campaigns/:campaign_id/status",
            get(campaign_status_handler::<S, C>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/candidates",
            get(campaign_candidates_handler::<S, C>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/rank",
            post(rank_campaign_handler::<S, C>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/outreach",
            post(campaign_outreach_handler::<S, C>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/report",
            get(campaign_report_handler::<S, C>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id",
            delete(purge_campaign_handler::<S, C>),
        )
        .route("/api/v1/outreach/send", post(send_outreach_handler::<S, C>))
        .route("/api/v1/audit-log", get(audit_log_handler::<S, C>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    pub title: String,
    #[serde(default = "default_campaign_description")]
    pub description: String,
    pub content: String,
}

fn default_campaign_description() -> String {
    "Recruitment campaign".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct RankRequest {
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub diversity_bonus: Option<f64>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutreachRequest {
    #[serde(default)]
    pub template_tone: Option<String>,
    #[serde(default)]
    pub call_to_action: Option<String>,
    #[serde(default)]
    pub compliance_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OutreachSendRequest {
    pub campaign_id: String,
    pub candidate_id: String,
    pub message: String,
}

/// Candidate payload exposed by the candidates and rank endpoints.
#[derive(Debug, Serialize)]
pub struct CandidateView {
    pub candidate_id: CandidateId,
    pub name: String,
    pub role: String,
    pub score: f64,
    pub rationale: String,
    pub rank_label: String,
    pub bias_flags: Vec<BiasFlag>,
    pub tags: Vec<String>,
    pub profile_url: String,
}

impl From<&RankedCandidate> for CandidateView {
    fn from(candidate: &RankedCandidate) -> Self {
        Self {
            candidate_id: candidate.candidate_id.clone(),
            name: candidate.name.clone(),
            role: candidate.role.clone(),
            score: candidate.final_score,
            rationale: candidate.rationale.clone(),
            rank_label: candidate.rank_label.clone(),
            bias_flags: candidate.bias_flags.clone(),
            tags: candidate.tags.clone(),
            profile_url: candidate.profile_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CampaignStatusView {
    pub campaign_id: CampaignId,
    pub status: CampaignStatus,
    pub last_updated: String,
    pub total_candidates: usize,
    pub bias_flags: usize,
    pub phase: &'static str,
    pub metrics: CampaignMetrics,
}

#[derive(Debug, Serialize)]
pub struct BiasCheckEntry {
    pub flag: BiasFlag,
    pub candidate_id: CandidateId,
}

#[derive(Debug, Serialize)]
pub struct CampaignReport {
    pub campaign_id: CampaignId,
    pub status: CampaignStatus,
    pub metrics: CampaignMetrics,
    pub bias_checks: Vec<BiasCheckEntry>,
    pub selection_rationale: String,
    pub compliance: ComplianceSummary,
    pub search_insights: SearchInsights,
}

#[derive(Debug, Serialize)]
pub struct DraftView {
    pub draft_id: String,
    pub candidate_id: CandidateId,
    pub message: String,
}

pub(crate) async fn create_campaign_handler<S, C>(
    State(state): State<CampaignAppState<S, C>>,
    axum::Json(payload): axum::Json<CreateCampaignRequest>,
) -> Response
where
    S: CandidateSource + 'static,
    C: CampaignStore + 'static,
{
    if let Err(error) = validate_job_description(&payload.title, &payload.content) {
        return error_response(StatusCode::BAD_REQUEST, &error.to_string());
    }

    let brief = JobDescription::new(payload.title.clone(), payload.content.clone());

    let run = {
        let mut orchestrator = state
            .orchestrator
            .lock()
            .expect("orchestrator mutex poisoned");
        orchestrator.run_campaign(Some(brief.clone()), DEFAULT_CANDIDATE_LIMIT)
    };
    let (ranked, evaluations) = match run {
        Ok(result) => result,
        Err(error) => return crew_failure(&error),
    };

    let metrics = CampaignMetrics::from_slate(&ranked, &evaluations);
    let search_insights = SearchInsights::for_query(&brief.content);

    let record = match state.store.create(NewCampaign {
        title: payload.title,
        description: payload.description,
        job_description: brief.content,
        candidates: ranked,
        evaluations,
        metrics: metrics.clone(),
        search_insights: search_insights.clone(),
    }) {
        Ok(record) => record,
        Err(error) => return store_failure(&error),
    };

    record_audit_soft(
        state.store.as_ref(),
        &record.campaign_id,
        "campaign_initialized",
        json!({ "jd": record.title }),
    );

    let body = json!({
        "campaign_id": record.campaign_id,
        "status": record.status,
        "metrics": metrics,
        "search_insights": search_insights,
    });
    (StatusCode::CREATED, axum::Json(body)).into_response()
}

pub(crate) async fn campaign_status_handler<S, C>(
    State(state): State<CampaignAppState<S, C>>,
    Path(campaign_id): Path<String>,
) -> Response
where
    S: CandidateSource + 'static,
    C: CampaignStore + 'static,
{
    let id = CampaignId(campaign_id);
    match state.store.get(&id) {
        Ok(Some(record)) => {
            let bias_flags = record
                .candidates
                .iter()
                .map(|candidate| candidate.bias_flags.len())
                .sum();
            let view = CampaignStatusView {
                campaign_id: record.campaign_id.clone(),
                status: record.status,
                last_updated: record.created_at.clone(),
                total_candidates: record.candidates.len(),
                bias_flags,
                phase: phase_of_record(&record).label(),
                metrics: record.metrics,
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Ok(None) => campaign_not_found(),
        Err(error) => store_failure(&error),
    }
}

pub(crate) async fn campaign_candidates_handler<S, C>(
    State(state): State<CampaignAppState<S, C>>,
    Path(campaign_id): Path<String>,
) -> Response
where
    S: CandidateSource + 'static,
    C: CampaignStore + 'static,
{
    let id = CampaignId(campaign_id);
    match state.store.get(&id) {
        Ok(Some(record)) => {
            let views: Vec<CandidateView> = record.candidates.iter().map(Into::into).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Ok(None) => campaign_not_found(),
        Err(error) => store_failure(&error),
    }
}

pub(crate) async fn rank_campaign_handler<S, C>(
    State(state): State<CampaignAppState<S, C>>,
    Path(campaign_id): Path<String>,
    payload: Option<axum::Json<RankRequest>>,
) -> Response
where
    S: CandidateSource + 'static,
    C: CampaignStore + 'static,
{
    let id = CampaignId(campaign_id);
    let request = payload.map(|axum::Json(value)| value).unwrap_or_default();

    let record = match state.store.get(&id) {
        Ok(Some(record)) => record,
        Ok(None) => return campaign_not_found(),
        Err(error) => return store_failure(&error),
    };
    if record.evaluations.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "no evaluations available for ranking",
        );
    }

    let mut policy = RankingPolicy::default();
    if let Some(strategy) = request.strategy {
        policy.name = strategy;
    }
    if let Some(bonus) = request.diversity_bonus {
        policy.diversity_bonus = bonus;
    }

    // the slate is rebuilt under the running status, then settles on ranked
    if let Err(error) = state.store.update_status(&id, CampaignStatus::Running) {
        warn!(campaign_id = %id.0, %error, "status update skipped");
    }

    let rerun = {
        let mut orchestrator = state
            .orchestrator
            .lock()
            .expect("orchestrator mutex poisoned");
        orchestrator.rerank(Some(record.evaluations.clone()), Some(policy.clone()))
    };
    let mut ranked = match rerun {
        Ok(ranked) => ranked,
        Err(error) => return crew_failure(&error),
    };
    if let Some(limit) = request.limit {
        if limit > 0 {
            ranked.truncate(limit);
        }
    }

    let metrics = CampaignMetrics::from_slate(&ranked, &record.evaluations);
    match state.store.update_candidates(
        &id,
        ranked.clone(),
        record.evaluations.clone(),
        metrics.clone(),
    ) {
        Ok(Some(_)) => {}
        Ok(None) => return campaign_not_found(),
        Err(error) => return store_failure(&error),
    }

    record_audit_soft(
        state.store.as_ref(),
        &id,
        "ranking_updated",
        json!({ "strategy": policy.name }),
    );

    let views: Vec<CandidateView> = ranked.iter().map(Into::into).collect();
    let body = json!({
        "campaign_id": id,
        "ranked_candidates": views,
        "metrics": metrics,
    });
    (StatusCode::OK, axum::Json(body)).into_response()
}

pub(crate) async fn campaign_outreach_handler<S, C>(
    State(state): State<CampaignAppState<S, C>>,
    Path(campaign_id): Path<String>,
    payload: Option<axum::Json<OutreachRequest>>,
) -> Response
where
    S: CandidateSource + 'static,
    C: CampaignStore + 'static,
{
    let id = CampaignId(campaign_id);
    let overrides = payload.map(|axum::Json(value)| value).unwrap_or_default();

    let record = match state.store.get(&id) {
        Ok(Some(record)) => record,
        Ok(None) => return campaign_not_found(),
        Err(error) => return store_failure(&error),
    };

    let OutreachTemplate {
        tone,
        call_to_action,
        compliance_notes,
        eu_ai_act_statement,
    } = OutreachTemplate::default();
    let template = OutreachTemplate {
        tone: overrides.template_tone.unwrap_or(tone),
        call_to_action: overrides.call_to_action.unwrap_or(call_to_action),
        compliance_notes: overrides.compliance_notes.unwrap_or(compliance_notes),
        eu_ai_act_statement,
    };

    let drafted = {
        let mut orchestrator = state
            .orchestrator
            .lock()
            .expect("orchestrator mutex poisoned");
        orchestrator.generate_outreach(&id, Some(record.candidates.clone()), Some(template))
    };
    let drafts = match drafted {
        Ok(drafts) => drafts,
        Err(error) => return crew_failure(&error),
    };

    let persisted = match state.store.add_outreach_drafts(&id, drafts) {
        Ok(Some(drafts)) => drafts,
        Ok(None) => return campaign_not_found(),
        Err(error) => return store_failure(&error),
    };

    record_audit_soft(
        state.store.as_ref(),
        &id,
        "outreach_generated",
        json!({ "draft_count": persisted.len() }),
    );

    let views: Vec<DraftView> = persisted
        .iter()
        .map(|draft| DraftView {
            draft_id: draft.draft_id.0.clone(),
            candidate_id: draft.candidate_id.clone(),
            message: draft.message.clone(),
        })
        .collect();
    let body = json!({
        "campaign_id": id,
        "drafts": views,
    });
    (StatusCode::OK, axum::Json(body)).into_response()
}

pub(crate) async fn send_outreach_handler<S, C>(
    State(state): State<CampaignAppState<S, C>>,
    axum::Json(payload): axum::Json<OutreachSendRequest>,
) -> Response
where
    S: CandidateSource + 'static,
    C: CampaignStore + 'static,
{
    let OutreachSendRequest {
        campaign_id,
        candidate_id,
        message,
    } = payload;
    if message.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "outreach message must not be empty");
    }

    let id = CampaignId(campaign_id);
    match state.store.get(&id) {
        Ok(Some(_)) => {}
        Ok(None) => return campaign_not_found(),
        Err(error) => return store_failure(&error),
    }

    let store = Arc::clone(&state.store);
    let task_id = id.clone();
    let audit_candidate = candidate_id.clone();
    tokio::spawn(async move {
        if let Err(error) = store.record_audit(
            &task_id,
            "outreach_sent",
            json!({ "candidate_id": audit_candidate, "message": message }),
        ) {
            warn!(campaign_id = %task_id.0, %error, "outreach audit append failed");
        }
    });

    let body = json!({
        "status": "queued",
        "candidate_id": candidate_id,
    });
    (StatusCode::OK, axum::Json(body)).into_response()
}

pub(crate) async fn campaign_report_handler<S, C>(
    State(state): State<CampaignAppState<S, C>>,
    Path(campaign_id): Path<String>,
) -> Response
where
    S: CandidateSource + 'static,
    C: CampaignStore + 'static,
{
    let id = CampaignId(campaign_id);
    let record = match state.store.get(&id) {
        Ok(Some(record)) => record,
        Ok(None) => return campaign_not_found(),
        Err(error) => return store_failure(&error),
    };

    let compliance = {
        let orchestrator = state
            .orchestrator
            .lock()
            .expect("orchestrator mutex poisoned");
        orchestrator.compliance_summary()
    };

    let bias_checks = record
        .candidates
        .iter()
        .flat_map(|candidate| {
            candidate.bias_flags.iter().map(|flag| BiasCheckEntry {
                flag: *flag,
                candidate_id: candidate.candidate_id.clone(),
            })
        })
        .collect();

    let report = CampaignReport {
        campaign_id: record.campaign_id.clone(),
        status: record.status,
        selection_rationale: record.metrics.selection_rationale.clone(),
        metrics: record.metrics,
        bias_checks,
        compliance,
        search_insights: record.search_insights,
    };
    (StatusCode::OK, axum::Json(report)).into_response()
}

pub(crate) async fn audit_log_handler<S, C>(
    State(state): State<CampaignAppState<S, C>>,
) -> Response
where
    S: CandidateSource + 'static,
    C: CampaignStore + 'static,
{
    match state.store.audit_trail() {
        Ok(events) => (StatusCode::OK, axum::Json(events)).into_response(),
        Err(error) => store_failure(&error),
    }
}

pub(crate) async fn purge_campaign_handler<S, C>(
    State(state): State<CampaignAppState<S, C>>,
    Path(campaign_id): Path<String>,
) -> Response
where
    S: CandidateSource + 'static,
    C: CampaignStore + 'static,
{
    let id = CampaignId(campaign_id);
    match state.store.purge(&id) {
        Ok(true) => {
            let body = json!({
                "campaign_id": id,
                "status": CampaignStatus::Purged.label(),
            });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Ok(false) => campaign_not_found(),
        Err(error) => store_failure(&error),
    }
}

/// Phase implied by what a stored record has accumulated. A record with no
/// pipeline output yet reads as freshly sourced.
fn phase_of_record(record: &CampaignRecord) -> CampaignPhase {
    if !record.outreach_drafts.is_empty() {
        CampaignPhase::OutreachDrafted
    } else if !record.candidates.is_empty() {
        CampaignPhase::Ranked
    } else if !record.evaluations.is_empty() {
        CampaignPhase::Evaluated
    } else {
        CampaignPhase::Sourced
    }
}

fn record_audit_soft<C: CampaignStore>(
    store: &C,
    id: &CampaignId,
    action: &str,
    details: serde_json::Value,
) {
    if let Err(error) = store.record_audit(id, action, details) {
        warn!(campaign_id = %id.0, action, %error, "audit append failed");
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let payload = json!({ "error": message });
    (status, axum::Json(payload)).into_response()
}

fn campaign_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "campaign not found")
}

fn crew_failure(error: &CrewError) -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, &error.to_string())
}

fn store_failure(error: &StoreError) -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, &error.to_string())
}
