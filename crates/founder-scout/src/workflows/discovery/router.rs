use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::catalog::CatalogFilter;
use super::domain::SearchCriteria;
use super::repository::CandidateRepository;
use super::service::DiscoveryService;

/// Query string accepted by the candidates listing.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub tier: Option<String>,
    pub profile_type: Option<String>,
    pub q: Option<String>,
}

impl CatalogQuery {
    pub fn filter(&self) -> CatalogFilter {
        CatalogFilter::from_params(
            self.tier.as_deref(),
            self.profile_type.as_deref(),
            self.q.as_deref(),
        )
    }
}

/// Router builder exposing the discovery and catalog endpoints.
pub fn discovery_router<R>(service: Arc<DiscoveryService<R>>) -> Router
where
    R: CandidateRepository + 'static,
{
    Router::new()
        .route("/api/v1/search", post(search_handler::<R>))
        .route("/search", post(search_handler::<R>))
        .route("/api/v1/candidates", get(candidates_handler::<R>))
        .with_state(service)
}

pub(crate) async fn search_handler<R>(
    State(service): State<Arc<DiscoveryService<R>>>,
    axum::Json(criteria): axum::Json<SearchCriteria>,
) -> Response
where
    R: CandidateRepository + 'static,
{
    match service.run(criteria).await {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) => {
            tracing::error!(error = %error, "discovery run failed");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn candidates_handler<R>(
    State(service): State<Arc<DiscoveryService<R>>>,
    Query(query): Query<CatalogQuery>,
) -> Response
where
    R: CandidateRepository + 'static,
{
    match service.catalog(&query.filter()) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
