use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::{profile_url_for, CandidateId, CandidateSeed, JobDescription};
use super::evaluation::PipelineTuning;
use super::trace::{CrewError, StageTracer};

/// A sourceable talent record as supplied by a roster or sourcing feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    pub role: String,
    pub baseline_score: f64,
    pub tags: Vec<String>,
    pub data_sources: Vec<String>,
    pub profile_url: String,
}

/// Read-only, ordered roster the research stage draws candidates from.
pub trait CandidateSource: Send + Sync {
    fn profiles(&self) -> &[CandidateProfile];
}

/// Fixed in-memory roster. The default content is a small demonstration
/// catalog; [`crate::workflows::campaign::RosterImporter`] builds one from a
/// CSV export instead.
#[derive(Debug, Clone, Default)]
pub struct StaticCandidateCatalog {
    profiles: Vec<CandidateProfile>,
}

impl StaticCandidateCatalog {
    pub fn new(profiles: Vec<CandidateProfile>) -> Self {
        Self { profiles }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            profile(
                "Alex Dev",
                "Backend Engineer",
                0.60,
                &["Data Deficient", "Manual Review Required"],
                &["Serper.dev", "GitHub"],
            ),
            profile(
                "Marina Byte",
                "Full Stack Engineer",
                0.72,
                &["High Confidence"],
                &["Serper.dev", "Portfolio"],
            ),
            profile(
                "Kai Ops",
                "DevOps Engineer",
                0.68,
                &["Manual Review Required"],
                &["GitHub", "Browserless.io"],
            ),
            profile(
                "Nia Vector",
                "Platform Architect",
                0.64,
                &["Leadership Potential"],
                &["LinkedIn", "Public Portfolio"],
            ),
        ])
    }
}

impl CandidateSource for StaticCandidateCatalog {
    fn profiles(&self) -> &[CandidateProfile] {
        &self.profiles
    }
}

fn profile(
    name: &str,
    role: &str,
    baseline_score: f64,
    tags: &[&str],
    data_sources: &[&str],
) -> CandidateProfile {
    CandidateProfile {
        name: name.to_string(),
        role: role.to_string(),
        baseline_score,
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        data_sources: data_sources.iter().map(|s| s.to_string()).collect(),
        profile_url: profile_url_for(name),
    }
}

/// Research stage: turns a role brief plus the roster into scored seeds.
pub struct CandidateResearcher<S> {
    source: Arc<S>,
    tuning: PipelineTuning,
    tracer: StageTracer,
}

impl<S: CandidateSource> CandidateResearcher<S> {
    pub fn new(source: Arc<S>, tuning: PipelineTuning) -> Self {
        Self {
            source,
            tuning,
            tracer: StageTracer::new("researcher"),
        }
    }

    /// Source up to `limit` seeds in roster order. Richer role briefs earn a
    /// saturating score bonus; an empty brief leaves the baseline untouched.
    pub fn research(
        &self,
        job_description: &JobDescription,
        limit: usize,
    ) -> Result<Vec<CandidateSeed>, CrewError> {
        self.tracer.scope("research", || {
            let content_bonus =
                job_description.content.chars().count() as f64 / self.tuning.research_divisor;

            let seeds = self
                .source
                .profiles()
                .iter()
                .take(limit)
                .map(|profile| CandidateSeed {
                    candidate_id: CandidateId::derive(&profile.name, &job_description.title),
                    name: profile.name.clone(),
                    role: profile.role.clone(),
                    score: (profile.baseline_score + content_bonus).min(self.tuning.research_cap),
                    rationale: format!(
                        "{} shows a {} signal that aligns with {}.",
                        profile.name, profile.role, job_description.title
                    ),
                    tags: profile.tags.clone(),
                    data_sources: profile.data_sources.clone(),
                    sourced_at: Utc::now(),
                })
                .collect();

            Ok(seeds)
        })
    }
}
