use chrono::Utc;
use html_escape::encode_text;

use super::domain::{CampaignId, DraftId, OutreachDraft, OutreachTemplate, RankedCandidate};
use super::trace::{CrewError, StageTracer};

/// Drafting stage: composes sanitized outreach messages for ranked candidates.
pub struct OutreachComposer {
    tracer: StageTracer,
}

impl Default for OutreachComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutreachComposer {
    pub fn new() -> Self {
        Self {
            tracer: StageTracer::new("composer"),
        }
    }

    /// Compose one draft for a candidate. Repeated drafting of the same
    /// candidate yields a fresh draft id each time; the message body is a
    /// pure function of candidate and template.
    pub fn draft(
        &self,
        campaign_id: &CampaignId,
        candidate: &RankedCandidate,
        template: &OutreachTemplate,
    ) -> Result<OutreachDraft, CrewError> {
        self.tracer.scope("draft", || {
            Ok(OutreachDraft {
                draft_id: DraftId::generate(),
                campaign_id: campaign_id.clone(),
                candidate_id: candidate.candidate_id.clone(),
                message: compose_message(candidate, template),
                tone: template.tone.clone(),
                created_at: Utc::now(),
            })
        })
    }
}

/// Every free-text field is escaped before interpolation; candidate- and
/// template-supplied text cannot carry structural markup into the message.
fn compose_message(candidate: &RankedCandidate, template: &OutreachTemplate) -> String {
    let rationale_prose = candidate.rationale.to_lowercase();

    let name = encode_text(&candidate.name);
    let role = encode_text(&candidate.role);
    let rationale = encode_text(&rationale_prose);
    let call_to_action = encode_text(&template.call_to_action);
    let compliance = encode_text(&template.compliance_notes);
    let regulatory = encode_text(&template.eu_ai_act_statement);

    format!(
        "Hi {name},\n\n\
         I saw your work as a {role} and the way you {rationale}\n\
         {compliance} {regulatory}\n\
         {call_to_action}.\n\n\
         Best,\nRecruitment Crew"
    )
}
