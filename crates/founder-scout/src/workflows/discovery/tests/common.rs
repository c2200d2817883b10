use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::discovery::cascade::ProfileQuery;
use crate::workflows::discovery::domain::{Candidate, RawProfile, SearchCriteria};
use crate::workflows::discovery::orchestrator::{
    DiscoveryConfig, DiscoveryOrchestrator, DiscoveryPolicy,
};
use crate::workflows::discovery::repository::{CandidateRepository, SinkError};
use crate::workflows::discovery::service::DiscoveryService;
use crate::workflows::discovery::source::{ProfileSource, SourceError};

/// Scripted reply for one `search_people` call.
#[derive(Debug, Clone)]
pub(super) enum Step {
    Batch(Vec<RawProfile>),
    Empty,
    Fail(u16),
    Unavailable,
    Hang,
}

#[derive(Debug, Clone)]
pub(super) enum Geo {
    Resolves(String),
    Unknown,
    Fails,
    Unavailable,
}

/// Fake profile source replaying `steps` in call order, then `otherwise` forever.
pub(super) struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    otherwise: Step,
    geo: Geo,
    queries: Mutex<Vec<ProfileQuery>>,
    geo_lookups: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub(super) fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            otherwise: Step::Empty,
            geo: Geo::Unknown,
            queries: Mutex::new(Vec::new()),
            geo_lookups: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn otherwise(mut self, step: Step) -> Self {
        self.otherwise = step;
        self
    }

    pub(super) fn with_geo(mut self, geo: Geo) -> Self {
        self.geo = geo;
        self
    }

    pub(super) fn queries(&self) -> Vec<ProfileQuery> {
        self.queries.lock().expect("query log poisoned").clone()
    }

    pub(super) fn geo_lookups(&self) -> Vec<String> {
        self.geo_lookups.lock().expect("geo log poisoned").clone()
    }
}

#[async_trait]
impl ProfileSource for ScriptedSource {
    async fn search_people(&self, query: &ProfileQuery) -> Result<Vec<RawProfile>, SourceError> {
        self.queries
            .lock()
            .expect("query log poisoned")
            .push(query.clone());
        let step = self
            .steps
            .lock()
            .expect("script poisoned")
            .pop_front()
            .unwrap_or_else(|| self.otherwise.clone());

        match step {
            Step::Batch(profiles) => Ok(profiles),
            Step::Empty => Ok(Vec::new()),
            Step::Fail(status) => Err(SourceError::Status(status)),
            Step::Unavailable => Err(SourceError::Unavailable("no api key".to_string())),
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Vec::new())
            }
        }
    }

    async fn lookup_geo_id(&self, search: &str) -> Result<Option<String>, SourceError> {
        self.geo_lookups
            .lock()
            .expect("geo log poisoned")
            .push(search.to_string());
        match &self.geo {
            Geo::Resolves(id) => Ok(Some(id.clone())),
            Geo::Unknown => Ok(None),
            Geo::Fails => Err(SourceError::Status(500)),
            Geo::Unavailable => Err(SourceError::Unavailable("no api key".to_string())),
        }
    }
}

pub(super) fn profile(id: &str, name: &str, position: &str) -> RawProfile {
    RawProfile::from_value(json!({
        "publicIdentifier": id,
        "name": name,
        "position": position,
    }))
    .expect("object payload")
}

/// `count` distinct founder profiles with identifiers `{prefix}-0..`.
pub(super) fn batch(prefix: &str, count: usize) -> Vec<RawProfile> {
    (0..count)
        .map(|index| {
            profile(
                &format!("{prefix}-{index}"),
                &format!("{prefix} {index}"),
                "Founder",
            )
        })
        .collect()
}

/// Three profiles scoring 90 (A), 65 (B), and 25 (C) against [`fintech_criteria`].
pub(super) fn ranked_batch() -> Vec<RawProfile> {
    vec![
        profile("bob-b", "Bob Builder", "Founder & CEO"),
        profile(
            "ada-l",
            "Ada Lovelace",
            "Co-Founder & CTO at fintech, PhD, former Director",
        ),
        profile("cy-t", "Cy Twombly", "VP Engineering, fintech, MSc"),
    ]
}

pub(super) fn fintech_criteria() -> SearchCriteria {
    SearchCriteria {
        sector: Some("fintech".to_string()),
        ..SearchCriteria::default()
    }
}

pub(super) fn discovery_config(policy: DiscoveryPolicy, target_pool_size: usize) -> DiscoveryConfig {
    DiscoveryConfig {
        policy,
        target_pool_size,
        page_limit: 30,
        preview_limit: 25,
        call_timeout: Duration::from_secs(2),
    }
}

pub(super) fn orchestrator(
    source: Arc<ScriptedSource>,
    config: DiscoveryConfig,
) -> DiscoveryOrchestrator {
    DiscoveryOrchestrator::new(source, config)
}

pub(super) fn build_service(
    steps: Vec<Step>,
    config: DiscoveryConfig,
) -> (
    DiscoveryService<MemoryRepository>,
    Arc<ScriptedSource>,
    Arc<MemoryRepository>,
) {
    let source = Arc::new(ScriptedSource::new(steps));
    let repository = Arc::new(MemoryRepository::default());
    let service = DiscoveryService::new(orchestrator(source.clone(), config), repository.clone());
    (service, source, repository)
}

pub(super) const MEMORY_LOCATION: &str = "memory://candidates";

#[derive(Default)]
pub(super) struct MemoryRepository {
    stored: Mutex<Vec<Candidate>>,
    persist_calls: AtomicUsize,
}

impl MemoryRepository {
    pub(super) fn stored(&self) -> Vec<Candidate> {
        self.stored.lock().expect("repository mutex poisoned").clone()
    }

    pub(super) fn persist_calls(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }
}

impl CandidateRepository for MemoryRepository {
    fn persist(&self, candidates: &[Candidate]) -> Result<String, SinkError> {
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        *self.stored.lock().expect("repository mutex poisoned") = candidates.to_vec();
        Ok(MEMORY_LOCATION.to_string())
    }

    fn load_all(&self) -> Result<Vec<Candidate>, SinkError> {
        Ok(self.stored())
    }
}

pub(super) struct UnavailableRepository;

impl CandidateRepository for UnavailableRepository {
    fn persist(&self, _candidates: &[Candidate]) -> Result<String, SinkError> {
        Err(SinkError::Unavailable("disk full".to_string()))
    }

    fn load_all(&self) -> Result<Vec<Candidate>, SinkError> {
        Err(SinkError::Unavailable("disk full".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
