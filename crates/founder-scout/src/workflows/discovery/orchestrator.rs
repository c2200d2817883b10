use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::cascade::{rotation_attempts, standard_cascade, ProfileQuery, QueryAttempt};
use super::dedup::dedupe;
use super::domain::{RawProfile, SearchCriteria};
use super::source::{ProfileSource, SourceError};

/// How the orchestrator decides it has seen enough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryPolicy {
    /// Keep only the first non-empty batch.
    FirstHit,
    /// Merge batches until the unique pool reaches the target size.
    #[default]
    Accumulate,
}

impl DiscoveryPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            DiscoveryPolicy::FirstHit => "first-hit",
            DiscoveryPolicy::Accumulate => "accumulate",
        }
    }
}

impl FromStr for DiscoveryPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first-hit" | "firsthit" => Ok(DiscoveryPolicy::FirstHit),
            "accumulate" | "accumulate-until-target" => Ok(DiscoveryPolicy::Accumulate),
            other => Err(format!("unknown discovery policy '{other}'")),
        }
    }
}

/// Tuning for a discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    pub policy: DiscoveryPolicy,
    pub target_pool_size: usize,
    pub page_limit: usize,
    pub preview_limit: usize,
    /// Upper bound on a single adapter call, on top of the adapter's own timeout.
    pub call_timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            policy: DiscoveryPolicy::Accumulate,
            target_pool_size: 40,
            page_limit: 30,
            preview_limit: 25,
            call_timeout: Duration::from_secs(35),
        }
    }
}

impl DiscoveryConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.target_pool_size == 0 {
            return Err("target pool size must be greater than 0".to_string());
        }
        if self.page_limit == 0 {
            return Err("page limit must be greater than 0".to_string());
        }
        if self.call_timeout.is_zero() {
            return Err("call timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Found,
    Empty,
    Unavailable,
    Failed,
}

/// What happened on one cascade or rotation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptReport {
    pub label: String,
    pub query: ProfileQuery,
    pub status: AttemptStatus,
    pub batch_size: usize,
    pub pool_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run metadata returned alongside the pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryTrace {
    pub geo_used: Option<String>,
    pub attempt_used: Option<String>,
    pub rotation_queries: Vec<String>,
    pub attempts: Vec<AttemptReport>,
    pub target_reached: bool,
}

/// Result of a discovery run. An empty pool is an outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryOutcome {
    Candidates {
        profiles: Vec<RawProfile>,
        trace: DiscoveryTrace,
    },
    NoCandidates {
        trace: DiscoveryTrace,
    },
}

impl DiscoveryOutcome {
    pub fn trace(&self) -> &DiscoveryTrace {
        match self {
            DiscoveryOutcome::Candidates { trace, .. } | DiscoveryOutcome::NoCandidates { trace } => {
                trace
            }
        }
    }

    pub fn profiles(&self) -> &[RawProfile] {
        match self {
            DiscoveryOutcome::Candidates { profiles, .. } => profiles,
            DiscoveryOutcome::NoCandidates { .. } => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DiscoveryOutcome::NoCandidates { .. })
    }
}

/// Drives the profile source through the cascade and rotation lists.
pub struct DiscoveryOrchestrator {
    source: Arc<dyn ProfileSource>,
    config: DiscoveryConfig,
}

struct RunState {
    pool: Vec<RawProfile>,
    trace: DiscoveryTrace,
    unavailable_logged: bool,
}

impl DiscoveryOrchestrator {
    pub fn new(source: Arc<dyn ProfileSource>, config: DiscoveryConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub async fn discover(&self, criteria: &SearchCriteria) -> DiscoveryOutcome {
        let geo_id = self.resolve_geo(criteria).await;
        let mut state = RunState {
            pool: Vec::new(),
            trace: DiscoveryTrace {
                geo_used: Some(geo_id.clone()).filter(|id| !id.is_empty()),
                ..DiscoveryTrace::default()
            },
            unavailable_logged: false,
        };

        let cascade = standard_cascade(criteria, &geo_id, self.config.page_limit);
        let done = self.run_steps(&cascade, false, &mut state).await;
        if !done {
            let rotation = rotation_attempts(self.config.page_limit);
            self.run_steps(&rotation, true, &mut state).await;
        }

        let RunState { pool, trace, .. } = state;
        info!(
            policy = self.config.policy.label(),
            unique = pool.len(),
            steps = trace.attempts.len(),
            attempt_used = trace.attempt_used.as_deref().unwrap_or("none"),
            "discovery finished"
        );

        if pool.is_empty() {
            DiscoveryOutcome::NoCandidates { trace }
        } else {
            DiscoveryOutcome::Candidates {
                profiles: pool,
                trace,
            }
        }
    }

    async fn resolve_geo(&self, criteria: &SearchCriteria) -> String {
        let Some(sector) = criteria.sector_text() else {
            return String::new();
        };

        let lookup = tokio::time::timeout(self.config.call_timeout, self.source.lookup_geo_id(sector));
        match lookup.await {
            Ok(Ok(Some(geo_id))) => {
                debug!(sector, geo_id = %geo_id, "resolved geo identifier");
                geo_id.trim().to_string()
            }
            Ok(Ok(None)) => {
                debug!(sector, "geo identifier unresolved");
                String::new()
            }
            Ok(Err(err)) => {
                warn!(sector, error = %err, "geo lookup failed");
                String::new()
            }
            Err(_) => {
                warn!(sector, "geo lookup timed out");
                String::new()
            }
        }
    }

    /// Returns `true` once the policy says to stop.
    async fn run_steps(
        &self,
        attempts: &[QueryAttempt],
        rotation: bool,
        state: &mut RunState,
    ) -> bool {
        for attempt in attempts {
            if rotation {
                state.trace.rotation_queries.push(attempt.query.search.clone());
            }

            let (status, batch, error) = match self.fetch(&attempt.query).await {
                Ok(batch) if batch.is_empty() => (AttemptStatus::Empty, batch, None),
                Ok(batch) => (AttemptStatus::Found, batch, None),
                Err(err) => {
                    if err.is_unavailable() {
                        if !state.unavailable_logged {
                            warn!(error = %err, "profile source unavailable; steps yield no results");
                            state.unavailable_logged = true;
                        }
                        (AttemptStatus::Unavailable, Vec::new(), Some(err.to_string()))
                    } else {
                        warn!(label = %attempt.label, error = %err, "discovery step failed");
                        (AttemptStatus::Failed, Vec::new(), Some(err.to_string()))
                    }
                }
            };

            let batch_size = batch.len();
            if batch_size > 0 && state.trace.attempt_used.is_none() {
                state.trace.attempt_used = Some(attempt.label.clone());
            }

            let stop = match self.config.policy {
                DiscoveryPolicy::FirstHit => {
                    if batch_size > 0 {
                        state.pool = dedupe(batch);
                        true
                    } else {
                        false
                    }
                }
                DiscoveryPolicy::Accumulate => {
                    let mut merged = std::mem::take(&mut state.pool);
                    merged.extend(batch);
                    state.pool = dedupe(merged);
                    state.pool.len() >= self.config.target_pool_size
                }
            };

            debug!(
                label = %attempt.label,
                batch = batch_size,
                pool = state.pool.len(),
                "discovery step complete"
            );
            state.trace.attempts.push(AttemptReport {
                label: attempt.label.clone(),
                query: attempt.query.clone(),
                status,
                batch_size,
                pool_size: state.pool.len(),
                error,
            });

            if stop {
                if self.config.policy == DiscoveryPolicy::Accumulate {
                    state.trace.target_reached = true;
                    info!(
                        target_size = self.config.target_pool_size,
                        label = %attempt.label,
                        "candidate pool reached target"
                    );
                }
                return true;
            }
        }

        false
    }

    async fn fetch(&self, query: &ProfileQuery) -> Result<Vec<RawProfile>, SourceError> {
        match tokio::time::timeout(self.config.call_timeout, self.source.search_people(query)).await
        {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout),
        }
    }
}
