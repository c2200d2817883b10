use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::catalog::{load_catalog, CatalogFilter, CatalogView};
use super::domain::{Candidate, SearchCriteria};
use super::normalize::normalize_profile;
use super::orchestrator::{AttemptReport, DiscoveryOrchestrator, DiscoveryOutcome};
use super::repository::{rank_candidates, CandidateRepository, SinkError};
use super::scoring::ScoringEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStatus {
    Completed,
    NoCandidates,
}

impl DiscoveryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DiscoveryStatus::Completed => "completed",
            DiscoveryStatus::NoCandidates => "no_candidates",
        }
    }
}

/// Response returned by a discovery run.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryResponse {
    pub status: DiscoveryStatus,
    pub total_unique: usize,
    pub persisted_location: Option<String>,
    pub preview: Vec<Candidate>,
    pub geo_used: Option<String>,
    pub attempt_used: Option<String>,
    pub rotation_queries: Vec<String>,
    pub attempts: Vec<AttemptReport>,
    pub criteria: SearchCriteria,
    pub generated_at: DateTime<Utc>,
}

/// Service composing the orchestrator, normalizer, scoring engine, and repository.
pub struct DiscoveryService<R> {
    orchestrator: DiscoveryOrchestrator,
    engine: ScoringEngine,
    repository: Arc<R>,
    preview_limit: usize,
}

impl<R> DiscoveryService<R>
where
    R: CandidateRepository + 'static,
{
    pub fn new(orchestrator: DiscoveryOrchestrator, repository: Arc<R>) -> Self {
        let preview_limit = orchestrator.config().preview_limit;
        Self {
            orchestrator,
            engine: ScoringEngine::default(),
            repository,
            preview_limit,
        }
    }

    pub fn with_engine(mut self, engine: ScoringEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Discover, score, rank and persist candidates for `criteria`.
    ///
    /// An empty pool is reported as [`DiscoveryStatus::NoCandidates`] and nothing is
    /// written. A persistence failure is the only error.
    pub async fn run(
        &self,
        criteria: SearchCriteria,
    ) -> Result<DiscoveryResponse, DiscoveryServiceError> {
        let outcome = self.orchestrator.discover(&criteria).await;

        let (profiles, trace) = match outcome {
            DiscoveryOutcome::Candidates { profiles, trace } => (profiles, trace),
            DiscoveryOutcome::NoCandidates { trace } => {
                tracing::info!("discovery found no candidates");
                return Ok(DiscoveryResponse {
                    status: DiscoveryStatus::NoCandidates,
                    total_unique: 0,
                    persisted_location: None,
                    preview: Vec::new(),
                    geo_used: trace.geo_used,
                    attempt_used: trace.attempt_used,
                    rotation_queries: trace.rotation_queries,
                    attempts: trace.attempts,
                    criteria,
                    generated_at: Utc::now(),
                });
            }
        };

        let mut candidates: Vec<Candidate> = profiles
            .iter()
            .map(|raw| self.engine.apply(normalize_profile(raw), &criteria))
            .collect();
        rank_candidates(&mut candidates);

        let location = self.repository.persist(&candidates)?;
        let preview = candidates
            .iter()
            .take(self.preview_limit)
            .cloned()
            .collect();

        Ok(DiscoveryResponse {
            status: DiscoveryStatus::Completed,
            total_unique: candidates.len(),
            persisted_location: Some(location),
            preview,
            geo_used: trace.geo_used,
            attempt_used: trace.attempt_used,
            rotation_queries: trace.rotation_queries,
            attempts: trace.attempts,
            criteria,
            generated_at: Utc::now(),
        })
    }

    /// Filtered view over the most recently persisted set.
    pub fn catalog(&self, filter: &CatalogFilter) -> Result<CatalogView, DiscoveryServiceError> {
        Ok(load_catalog(self.repository.as_ref(), filter)?)
    }
}

/// Error raised by the discovery service.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryServiceError {
    #[error(transparent)]
    Sink(#[from] SinkError),
}
