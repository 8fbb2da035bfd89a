use async_trait::async_trait;
use fudidoflix_config::TmdbConfig;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use crate::endpoint::Endpoint;
use crate::error::TmdbError;
use crate::traits::MetadataSource;

/// HTTP access to the TMDB v3 API.
#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    language: String,
}

pub fn create_http_client() -> Client {
    Client::builder()
        .user_agent(concat!("fudidoflix/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

impl TmdbClient {
    pub fn new(base_url: String, api_key: String, language: String) -> Result<Self, TmdbError> {
        if api_key.trim().is_empty() {
            return Err(TmdbError::MissingApiKey);
        }
        Ok(Self {
            client: Arc::new(create_http_client()),
            base_url,
            api_key,
            language,
        })
    }

    pub fn from_config(config: &TmdbConfig, api_key: Option<String>) -> Result<Self, TmdbError> {
        let api_key = api_key.ok_or(TmdbError::MissingApiKey)?;
        Self::new(config.base_url.clone(), api_key, config.language.clone())
    }
}

#[async_trait]
impl MetadataSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, TmdbError> {
        let url = endpoint.to_url(&self.base_url, &self.api_key, &self.language);
        debug!(endpoint = %endpoint, "GET");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!(endpoint = %endpoint, status, "TMDB request failed");
            return Err(TmdbError::Status {
                status,
                endpoint: endpoint.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| TmdbError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        let config = TmdbConfig::default();
        assert!(matches!(
            TmdbClient::from_config(&config, None),
            Err(TmdbError::MissingApiKey)
        ));
        assert!(matches!(
            TmdbClient::from_config(&config, Some("  ".to_string())),
            Err(TmdbError::MissingApiKey)
        ));
        assert!(TmdbClient::from_config(&config, Some("key".to_string())).is_ok());
    }
}
