//! CSV-backed candidate repository.
//!
//! Rows are written to a sibling temp file and renamed into place, so readers
//! only ever see a complete set. List-valued fields are joined with `;`.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{Candidate, ProfileType};
use super::repository::{rank_candidates, CandidateRepository, SinkError};
use crate::config::StorageConfig;

const LIST_DELIMITER: char = ';';

#[derive(Debug, Clone)]
pub struct CsvCandidateRepository {
    path: PathBuf,
    backup_previous: bool,
}

#[derive(Debug, Serialize)]
struct CandidateRow<'a> {
    name: &'a str,
    profile_type: &'static str,
    summary: &'a str,
    contacts: String,
    source_links: String,
    match_justification: &'a str,
    tier: &'static str,
    score: u8,
}

impl<'a> From<&'a Candidate> for CandidateRow<'a> {
    fn from(candidate: &'a Candidate) -> Self {
        Self {
            name: &candidate.name,
            profile_type: candidate.profile_type.label(),
            summary: &candidate.summary,
            contacts: join_list(&candidate.contacts),
            source_links: join_list(&candidate.source_links),
            match_justification: &candidate.match_justification,
            tier: candidate.tier().label(),
            score: candidate.score(),
        }
    }
}

/// Lenient row shape for reading back files that may have been edited by hand.
#[derive(Debug, Deserialize)]
struct StoredRow {
    #[serde(default, deserialize_with = "blank_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    profile_type: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    summary: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    contacts: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    source_links: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    match_justification: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    score: Option<String>,
}

impl StoredRow {
    /// The stored tier column is not trusted; it is re-derived from the score.
    fn into_candidate(self) -> Candidate {
        let profile_type = self
            .profile_type
            .as_deref()
            .and_then(ProfileType::parse)
            .unwrap_or_default();
        let score = self
            .score
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .map(|value| value.round() as i32)
            .unwrap_or(0);

        Candidate::new(
            self.name.unwrap_or_default(),
            profile_type,
            self.summary.unwrap_or_default(),
            self.match_justification.unwrap_or_default(),
        )
        .with_links(split_list(self.contacts), split_list(self.source_links))
        .with_score(score)
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn join_list(values: &[String]) -> String {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(&LIST_DELIMITER.to_string())
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|raw| {
            raw.split(LIST_DELIMITER)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl CsvCandidateRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup_previous: true,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.candidates_csv.clone()).with_backup(config.backup_previous)
    }

    pub fn with_backup(mut self, backup_previous: bool) -> Self {
        self.backup_previous = backup_previous;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        sibling_with_suffix(&self.path, "bak")
    }

    /// Serialize candidates, in the given order, as CSV into `writer`.
    pub fn write_rows<W: std::io::Write>(
        writer: W,
        candidates: &[Candidate],
    ) -> Result<(), SinkError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for candidate in candidates {
            csv_writer.serialize(CandidateRow::from(candidate))?;
        }
        if candidates.is_empty() {
            csv_writer.write_record([
                "name",
                "profile_type",
                "summary",
                "contacts",
                "source_links",
                "match_justification",
                "tier",
                "score",
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Parse rows written by [`write_rows`](Self::write_rows) or edited by hand.
    pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Candidate>, SinkError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut candidates = Vec::new();
        for row in csv_reader.deserialize::<StoredRow>() {
            candidates.push(row?.into_candidate());
        }
        rank_candidates(&mut candidates);
        Ok(candidates)
    }
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "candidates.csv".into());
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

impl CandidateRepository for CsvCandidateRepository {
    fn persist(&self, candidates: &[Candidate]) -> Result<String, SinkError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut ranked = candidates.to_vec();
        rank_candidates(&mut ranked);

        let temp_path = sibling_with_suffix(&self.path, "tmp");
        let written = fs::File::create(&temp_path)
            .map_err(SinkError::from)
            .and_then(|file| Self::write_rows(std::io::BufWriter::new(file), &ranked));
        if let Err(err) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }

        if self.backup_previous && self.path.exists() {
            if let Err(err) = fs::copy(&self.path, self.backup_path()) {
                let _ = fs::remove_file(&temp_path);
                return Err(err.into());
            }
        }

        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }

        let location = self.path.display().to_string();
        tracing::info!(count = ranked.len(), location = %location, "persisted candidates");
        Ok(location)
    }

    fn load_all(&self) -> Result<Vec<Candidate>, SinkError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&self.path)?;
        Self::read_rows(file)
    }
}
