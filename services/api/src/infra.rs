use founder_scout::config::AppConfig;
use founder_scout::error::AppError;
use founder_scout::workflows::discovery::{
    Candidate, CsvCandidateRepository, DiscoveryOrchestrator, DiscoveryService, HarvestClient,
    ProfileType,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type CsvDiscoveryService = DiscoveryService<CsvCandidateRepository>;

/// Wire the Harvest adapter and CSV sink described by `config` into a service.
pub(crate) fn build_discovery_service(
    config: &AppConfig,
) -> Result<Arc<CsvDiscoveryService>, AppError> {
    let client = HarvestClient::new(&config.harvest)?;
    if !client.has_credentials() {
        tracing::warn!("HARVEST_API_KEY not set; searches will return no candidates");
    }

    let orchestrator = DiscoveryOrchestrator::new(Arc::new(client), config.discovery.clone());
    let repository = Arc::new(CsvCandidateRepository::from_config(&config.storage));
    Ok(Arc::new(DiscoveryService::new(orchestrator, repository)))
}

/// Two hand-scored candidates used to populate an empty dashboard.
pub(crate) fn demo_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new(
            "Alex Chen",
            ProfileType::Technical,
            "Co-Founder & CTO at an AI infrastructure startup, PhD in machine learning",
            "Signals: technical founder with an exit and research background",
        )
        .with_links(
            vec!["https://www.linkedin.com/in/alex-chen-demo".to_string()],
            vec!["https://www.linkedin.com/in/alex-chen-demo".to_string()],
        )
        .with_score(92),
        Candidate::new(
            "Sarah Johnson",
            ProfileType::Business,
            "Founder & CEO of a B2B fintech company, former VP Sales",
            "Signals: repeat founder with go-to-market leadership",
        )
        .with_links(
            vec!["https://www.linkedin.com/in/sarah-johnson-demo".to_string()],
            vec!["https://www.linkedin.com/in/sarah-johnson-demo".to_string()],
        )
        .with_score(68),
    ]
}
