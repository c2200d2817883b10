//! Read model over the persisted candidate set, backing the candidates
//! endpoint and the `candidates` CLI command.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{Candidate, ProfileType, Tier};
use super::repository::{rank_candidates, CandidateRepository, SinkError};

/// Empty sets mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub tiers: BTreeSet<Tier>,
    pub profile_types: BTreeSet<ProfileType>,
    pub text: Option<String>,
}

impl CatalogFilter {
    /// Build a filter from comma-separated query values, ignoring unknown entries.
    pub fn from_params(tiers: Option<&str>, profile_types: Option<&str>, text: Option<&str>) -> Self {
        let split = |raw: Option<&str>| -> Vec<String> {
            raw.unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .collect()
        };

        Self {
            tiers: split(tiers).iter().filter_map(|value| Tier::parse(value)).collect(),
            profile_types: split(profile_types)
                .iter()
                .filter_map(|value| ProfileType::parse(value))
                .collect(),
            text: text
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_lowercase),
        }
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        if !self.tiers.is_empty() && !self.tiers.contains(&candidate.tier()) {
            return false;
        }
        if !self.profile_types.is_empty() && !self.profile_types.contains(&candidate.profile_type)
        {
            return false;
        }
        match &self.text {
            Some(needle) => {
                let haystack = format!(
                    "{} {} {}",
                    candidate.name, candidate.summary, candidate.match_justification
                )
                .to_lowercase();
                haystack.contains(needle.as_str())
            }
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub candidate: Candidate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogView {
    pub total: usize,
    pub filtered: usize,
    pub average_score: f64,
    pub top_score: u8,
    pub entries: Vec<CatalogEntry>,
}

impl CatalogView {
    /// Rank `candidates`, apply `filter`, and number the survivors from 1.
    /// Statistics describe the filtered set.
    pub fn build(mut candidates: Vec<Candidate>, filter: &CatalogFilter) -> Self {
        let total = candidates.len();
        rank_candidates(&mut candidates);

        let entries: Vec<CatalogEntry> = candidates
            .into_iter()
            .filter(|candidate| filter.matches(candidate))
            .enumerate()
            .map(|(index, candidate)| CatalogEntry {
                rank: index + 1,
                candidate,
            })
            .collect();

        let filtered = entries.len();
        let top_score = entries
            .iter()
            .map(|entry| entry.candidate.score())
            .max()
            .unwrap_or(0);
        let average_score = if filtered == 0 {
            0.0
        } else {
            let sum: u32 = entries
                .iter()
                .map(|entry| u32::from(entry.candidate.score()))
                .sum();
            (f64::from(sum) / filtered as f64 * 10.0).round() / 10.0
        };

        Self {
            total,
            filtered,
            average_score,
            top_score,
            entries,
        }
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter().map(|entry| &entry.candidate)
    }

    /// Highlighted candidates, in rank order.
    pub fn tier_a(&self) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.candidate.tier() == Tier::A)
            .collect()
    }
}

/// Load the stored set from `repository` and build a filtered view over it.
pub fn load_catalog<R>(repository: &R, filter: &CatalogFilter) -> Result<CatalogView, SinkError>
where
    R: CandidateRepository + ?Sized,
{
    let candidates = repository.load_all()?;
    Ok(CatalogView::build(candidates, filter))
}
