use async_trait::async_trait;
use serde_json::Value;
use crate::endpoint::Endpoint;
use crate::error::TmdbError;

/// Anything that can answer a TMDB endpoint with its JSON body.
///
/// The HTTP client is the production implementation; tests plug in a source
/// that serves canned payloads. Typed access lives in [`crate::api`].
#[async_trait]
pub trait MetadataSource: Send + Sync {
    fn source_name(&self) -> &str;

    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, TmdbError>;
}
