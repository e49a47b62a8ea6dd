use crate::infra::InMemoryCampaignStore;
use clap::Args;
use recruit_ai::error::AppError;
use recruit_ai::workflows::campaign::{
    CampaignMetrics, CampaignOrchestrator, CampaignSettings, CampaignStore, CandidateSource,
    EvaluationResult, JobDescription, NewCampaign, OutreachTemplate, RankedCandidate,
    RankingPolicy, RosterImporter, SearchInsights, StaticCandidateCatalog,
    DEFAULT_CANDIDATE_LIMIT,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Role title the demo campaign recruits for.
    #[arg(long, default_value = "Senior Rust Engineer")]
    pub(crate) title: String,
    /// Role brief used to score sourced candidates.
    #[arg(
        long,
        default_value = "Own backend services end to end and champion inclusive hiring."
    )]
    pub(crate) content: String,
    /// Optional roster CSV export to source candidates from.
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
    /// Maximum number of candidates to source.
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Outreach template tone override.
    #[arg(long)]
    pub(crate) tone: Option<String>,
    /// Skip the outreach portion of the demo.
    #[arg(long)]
    pub(crate) skip_outreach: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CampaignRunArgs {
    /// Role title to recruit for
    #[arg(long)]
    pub(crate) title: String,
    /// Role brief used to score sourced candidates
    #[arg(long)]
    pub(crate) content: String,
    /// Optional roster CSV export to source candidates from
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
    /// Maximum number of candidates to source
    #[arg(long, default_value_t = DEFAULT_CANDIDATE_LIMIT)]
    pub(crate) limit: usize,
    /// Ranking strategy name recorded on the active policy
    #[arg(long)]
    pub(crate) strategy: Option<String>,
    /// Score bonus granted to candidates carrying review-burden tags
    #[arg(long, value_parser = crate::infra::parse_bonus)]
    pub(crate) diversity_bonus: Option<f64>,
    /// Include the per-candidate evaluation detail in the output
    #[arg(long)]
    pub(crate) list_evaluations: bool,
}

pub(crate) fn run_campaign_report(args: CampaignRunArgs) -> Result<(), AppError> {
    let CampaignRunArgs {
        title,
        content,
        roster_csv,
        limit,
        strategy,
        diversity_bonus,
        list_evaluations,
    } = args;

    let (catalog, imported) = load_catalog(roster_csv)?;

    let mut policy = RankingPolicy::default();
    if let Some(strategy) = strategy {
        policy.name = strategy;
    }
    if let Some(bonus) = diversity_bonus {
        policy.diversity_bonus = bonus;
    }
    let settings = CampaignSettings {
        ranking_policy: policy,
        ..CampaignSettings::default()
    };

    let mut crew = CampaignOrchestrator::new(Arc::new(catalog), settings);
    let brief = JobDescription::new(title, content);
    let (ranked, evaluations) = crew.run_campaign(Some(brief.clone()), limit)?;

    render_campaign_run(&crew, &brief, &ranked, &evaluations, imported, list_evaluations);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        title,
        content,
        roster_csv,
        limit,
        tone,
        skip_outreach,
    } = args;

    println!("Recruitment campaign demo");
    let (catalog, imported) = load_catalog(roster_csv)?;
    let coverage = source_coverage(&catalog);

    let mut crew = CampaignOrchestrator::new(Arc::new(catalog), CampaignSettings::default());
    let brief = JobDescription::new(title.clone(), content.clone());
    let limit = limit.unwrap_or(DEFAULT_CANDIDATE_LIMIT);
    let (ranked, evaluations) = crew.run_campaign(Some(brief.clone()), limit)?;
    render_campaign_run(&crew, &brief, &ranked, &evaluations, imported, false);

    println!(
        "\nSourcing coverage ({} profile(s) on file)",
        coverage.profiles
    );
    for channel in &coverage.channels {
        println!(
            "- {}: {} profile(s) | {:.0}% of roster",
            channel.source,
            channel.profiles,
            channel.share(coverage.profiles) * 100.0
        );
    }

    if skip_outreach {
        return Ok(());
    }

    println!("\nOutreach tour (messages sanitized)");
    let store = InMemoryCampaignStore::default();
    let metrics = CampaignMetrics::from_slate(&ranked, &evaluations);
    let record = store.create(NewCampaign {
        title,
        description: "CLI demo campaign".to_string(),
        job_description: content.clone(),
        candidates: ranked.clone(),
        evaluations,
        metrics,
        search_insights: SearchInsights::for_query(&content),
    })?;
    println!(
        "- Stored campaign {} -> status {}",
        record.campaign_id.0,
        record.status.label()
    );

    let template = tone.map(|tone| OutreachTemplate {
        tone,
        ..OutreachTemplate::default()
    });
    let drafts = crew.generate_outreach(&record.campaign_id, Some(ranked), template)?;
    let drafts = match store.add_outreach_drafts(&record.campaign_id, drafts)? {
        Some(drafts) => drafts,
        None => {
            println!("  Stored campaign vanished before drafts landed");
            return Ok(());
        }
    };
    store.record_audit(
        &record.campaign_id,
        "outreach_generated",
        json!({ "draft_count": drafts.len() }),
    )?;

    for draft in &drafts {
        println!(
            "- {} -> {} ({} tone)",
            draft.draft_id.0, draft.candidate_id.0, draft.tone
        );
    }
    if let Some(first) = drafts.first() {
        println!("\nFirst message preview\n{}", first.message);
    }

    println!("\nAudit trail");
    for event in store.audit_trail()? {
        println!(
            "- {} | {} | {}",
            event.timestamp, event.action, event.campaign_id.0
        );
    }

    Ok(())
}

pub(crate) fn load_catalog(
    roster_csv: Option<PathBuf>,
) -> Result<(StaticCandidateCatalog, bool), AppError> {
    match roster_csv {
        Some(path) => RosterImporter::from_path(path)
            .map(|catalog| (catalog, true))
            .map_err(AppError::from),
        None => Ok((StaticCandidateCatalog::builtin(), false)),
    }
}

pub(crate) fn render_campaign_run(
    crew: &CampaignOrchestrator<StaticCandidateCatalog>,
    brief: &JobDescription,
    ranked: &[RankedCandidate],
    evaluations: &[EvaluationResult],
    imported: bool,
    list_evaluations: bool,
) {
    println!("Recruitment campaign run");
    println!(
        "Role brief: {} ({}) under policy '{}'",
        brief.title,
        brief.classification,
        crew.active_policy().name
    );

    if imported {
        println!("Candidate source: roster CSV import");
    } else {
        println!("Candidate source: built-in demonstration catalog");
    }

    println!("\nRanked slate");
    for candidate in ranked {
        let flags = if candidate.bias_flags.is_empty() {
            "clean".to_string()
        } else {
            candidate
                .bias_flags
                .iter()
                .map(|flag| flag.label())
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!(
            "- {} | {} ({}) | score {:.3} | flags: {}",
            candidate.rank_label, candidate.name, candidate.role, candidate.final_score, flags
        );
        if let Some(notes) = &candidate.notes {
            println!("  note: {notes}");
        }
    }

    if list_evaluations {
        println!("\nEvaluation detail");
        for evaluation in evaluations {
            println!(
                "- {} | {} | score {:.3} | {} flag(s) | {}",
                evaluation.candidate_id.0,
                evaluation.name,
                evaluation.score,
                evaluation.bias_flags.len(),
                evaluation.comments
            );
        }
    }

    let metrics = CampaignMetrics::from_slate(ranked, evaluations);
    println!("\nCampaign metrics");
    println!(
        "- {} candidate(s) | {} bias check(s) | passed: {}",
        metrics.total_candidates, metrics.bias_checks, metrics.bias_checks_passed
    );
    println!("- data deficient: {}", metrics.data_deficient_count);
    println!("- {}", metrics.selection_rationale);

    if let Some(risk) = crew.risk_history().last() {
        println!(
            "\nRisk assessment: {} ({} flag(s), score {:.2})",
            risk.level.label(),
            risk.bias_flags,
            risk.score
        );
    }

    let compliance = crew.compliance_summary();
    println!("\nCompliance posture");
    println!("- GDPR: {}", compliance.gdpr);
    println!(
        "- EU AI Act: {} | retention {} day(s) | log level {}",
        compliance.eu_ai_act, compliance.retention_days, compliance.logging_level
    );
}

#[derive(Debug)]
struct SourceChannel {
    source: String,
    profiles: usize,
}

impl SourceChannel {
    fn share(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.profiles as f64 / total as f64
        }
    }
}

#[derive(Debug)]
struct SourceCoverage {
    profiles: usize,
    channels: Vec<SourceChannel>,
}

/// Tally which sourcing feeds the roster draws on. Channels are ordered by
/// name so the printout is stable between runs.
fn source_coverage(catalog: &StaticCandidateCatalog) -> SourceCoverage {
    let profiles = catalog.profiles();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for profile in profiles {
        for source in &profile.data_sources {
            *counts.entry(source.clone()).or_default() += 1;
        }
    }

    SourceCoverage {
        profiles: profiles.len(),
        channels: counts
            .into_iter()
            .map(|(source, profiles)| SourceChannel { source, profiles })
            .collect(),
    }
}
