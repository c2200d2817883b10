use async_trait::async_trait;

use super::cascade::ProfileQuery;
use super::domain::RawProfile;

/// Outbound people-search provider.
///
/// `Ok(vec![])` means the provider answered with zero matches, while
/// [`SourceError::Unavailable`] means it could not be asked at all (for example
/// because no credential is configured).
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn search_people(&self, query: &ProfileQuery) -> Result<Vec<RawProfile>, SourceError>;

    /// Resolve free-text location into the provider's geo identifier.
    async fn lookup_geo_id(&self, search: &str) -> Result<Option<String>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("profile source unavailable: {0}")]
    Unavailable(String),
    #[error("profile source request failed: {0}")]
    Http(String),
    #[error("profile source timed out")]
    Timeout,
    #[error("profile source returned status {0}")]
    Status(u16),
    #[error("profile source payload could not be decoded: {0}")]
    Decode(String),
    #[error("profile source client could not be built: {0}")]
    Client(String),
}

impl SourceError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SourceError::Unavailable(_))
    }
}
