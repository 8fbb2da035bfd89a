use thiserror::Error;

#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} answered HTTP {status}")]
    Status { status: u16, endpoint: String },

    #[error("unexpected payload from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no TMDB API key configured")]
    MissingApiKey,
}

impl TmdbError {
    /// True for a 404 answer
    pub fn is_not_found(&self) -> bool {
        matches!(self, TmdbError::Status { status: 404, .. })
    }
}
