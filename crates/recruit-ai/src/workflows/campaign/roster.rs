use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::profile_url_for;
use super::sourcing::{CandidateProfile, StaticCandidateCatalog};

/// Errors raised while importing a roster export.
#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("roster row {row} is unusable: {reason}")]
    Row { row: usize, reason: String },
}

/// Builds a candidate catalog from a sourcing-tool CSV export.
///
/// Expected columns: `Name`, `Role`, `Baseline Score`, and optionally
/// `Tags`, `Data Sources` (both `;`-separated), and `Profile Url`. A
/// missing profile URL is derived from the candidate name.
pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<StaticCandidateCatalog, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<StaticCandidateCatalog, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut profiles = Vec::new();

        for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
            let row = record?;
            // data rows are 1-based and follow the header line
            profiles.push(profile_from_row(index + 2, row)?);
        }

        Ok(StaticCandidateCatalog::new(profiles))
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Role")]
    role: String,
    #[serde(rename = "Baseline Score")]
    baseline_score: f64,
    #[serde(rename = "Tags", default)]
    tags: String,
    #[serde(rename = "Data Sources", default)]
    data_sources: String,
    #[serde(rename = "Profile Url", default)]
    profile_url: String,
}

fn profile_from_row(row: usize, entry: RosterRow) -> Result<CandidateProfile, RosterImportError> {
    if entry.name.is_empty() {
        return Err(RosterImportError::Row {
            row,
            reason: "missing candidate name".to_string(),
        });
    }
    if !(0.0..=1.0).contains(&entry.baseline_score) {
        return Err(RosterImportError::Row {
            row,
            reason: format!("baseline score {} outside [0, 1]", entry.baseline_score),
        });
    }

    let profile_url = if entry.profile_url.is_empty() {
        profile_url_for(&entry.name)
    } else {
        entry.profile_url
    };

    Ok(CandidateProfile {
        name: entry.name,
        role: entry.role,
        baseline_score: entry.baseline_score,
        tags: split_list(&entry.tags),
        data_sources: split_list(&entry.data_sources),
        profile_url,
    })
}

fn split_list(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
