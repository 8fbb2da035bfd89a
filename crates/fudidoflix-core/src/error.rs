use fudidoflix_models::{MediaId, MediaKind};
use fudidoflix_tmdb::TmdbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Cannot play {kind} {id}: {reason}")]
    InvalidTarget {
        kind: MediaKind,
        id: MediaId,
        reason: String,
    },

    #[error("The roulette needs at least {needed} items, it has {have}")]
    NotEnoughCandidates { needed: usize, have: usize },

    #[error("The roulette is already spinning")]
    SpinInProgress,

    #[error("No player session to continue")]
    NoSession,

    #[error("Details for {kind} {id} are unavailable")]
    DetailsUnavailable { kind: MediaKind, id: MediaId },

    #[error("Search query must not be empty")]
    EmptyQuery,

    #[error("Search query must have at least {min} characters")]
    QueryTooShort { min: usize },

    #[error("No trailer available for {kind} {id}")]
    NoTrailer { kind: MediaKind, id: MediaId },

    #[error("Unknown filter preset: {0}")]
    UnknownPreset(String),

    #[error(transparent)]
    Remote(#[from] TmdbError),
}

impl CoreError {
    pub fn invalid_target(kind: MediaKind, id: MediaId, reason: impl Into<String>) -> Self {
        CoreError::InvalidTarget {
            kind,
            id,
            reason: reason.into(),
        }
    }
}
