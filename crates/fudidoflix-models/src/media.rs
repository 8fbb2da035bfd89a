use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two kinds of title the catalogue serves.
///
/// Serialized as `"movie"` / `"tv"`, matching both the TMDB `media_type`
/// field and the `type` field of persisted entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }

    /// Infer the kind of an API item that carries no `media_type`.
    ///
    /// Movies have a `title`, series only a `name`.
    pub fn infer(media_type: Option<&str>, has_title: bool) -> Option<Self> {
        match media_type {
            Some(raw) => raw.parse().ok(),
            None if has_title => Some(MediaKind::Movie),
            None => Some(MediaKind::Tv),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "tv" | "show" | "series" => Ok(MediaKind::Tv),
            other => Err(format!("Unknown media kind: {}. Use 'movie' or 'tv'", other)),
        }
    }
}
