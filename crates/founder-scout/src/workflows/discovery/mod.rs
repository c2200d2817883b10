//! Candidate discovery: query cascade against a people-search provider,
//! deduplication, normalization, rule scoring, and the ranked CSV result set.

pub mod cascade;
pub mod catalog;
pub mod dedup;
pub mod domain;
pub mod harvest;
pub mod normalize;
pub mod orchestrator;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod source;
pub mod storage;

#[cfg(test)]
mod tests;

pub use cascade::{ProfileQuery, QueryAttempt, ROTATION_QUERIES};
pub use catalog::{load_catalog, CatalogEntry, CatalogFilter, CatalogView};
pub use dedup::dedupe;
pub use domain::{Candidate, CandidateIdentity, ProfileType, RawProfile, SearchCriteria, Tier};
pub use harvest::HarvestClient;
pub use normalize::normalize_profile;
pub use orchestrator::{
    AttemptReport, AttemptStatus, DiscoveryConfig, DiscoveryOrchestrator, DiscoveryOutcome,
    DiscoveryPolicy, DiscoveryTrace,
};
pub use repository::{rank_candidates, CandidateRepository, SinkError};
pub use router::discovery_router;
pub use scoring::{ScoreCard, ScoreComponent, ScoreSignal, ScoringEngine};
pub use service::{DiscoveryResponse, DiscoveryService, DiscoveryServiceError, DiscoveryStatus};
pub use source::{ProfileSource, SourceError};
pub use storage::CsvCandidateRepository;
