use std::cmp::Ordering;

use super::domain::Candidate;

/// Durable home for the ranked candidates of the latest run.
pub trait CandidateRepository: Send + Sync {
    /// Replace the stored set with `candidates`, returning where it was written.
    /// Implementations must store the set in [`rank_candidates`] order and must not
    /// leave a partially written set behind on failure.
    fn persist(&self, candidates: &[Candidate]) -> Result<String, SinkError>;

    /// Load the stored set in ranked order; empty when nothing was persisted yet.
    fn load_all(&self) -> Result<Vec<Candidate>, SinkError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("candidate storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("candidate storage encoding failure: {0}")]
    Csv(#[from] csv::Error),
    #[error("candidate storage unavailable: {0}")]
    Unavailable(String),
}

/// Tier ascending, then score descending, then name ascending.
pub fn compare_ranked(left: &Candidate, right: &Candidate) -> Ordering {
    left.tier()
        .cmp(&right.tier())
        .then_with(|| right.score().cmp(&left.score()))
        .then_with(|| left.name.cmp(&right.name))
}

pub fn rank_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(compare_ranked);
}
