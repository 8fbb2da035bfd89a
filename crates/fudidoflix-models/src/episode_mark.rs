use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::media::MediaKind;
use crate::media_id::MediaId;

/// A watched movie, or a single watched episode of a series.
///
/// Movies carry no season/episode; the pair is only meaningful for `tv`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedEpisodeMark {
    #[serde(deserialize_with = "crate::media_id::lenient")]
    pub id: MediaId,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default, deserialize_with = "crate::media_id::lenient_opt")]
    pub season: Option<u32>,
    #[serde(default, deserialize_with = "crate::media_id::lenient_opt")]
    pub episode: Option<u32>,
    #[serde(rename = "watchedAt")]
    pub watched_at: DateTime<Utc>,
}

impl WatchedEpisodeMark {
    pub fn new(
        id: MediaId,
        kind: MediaKind,
        season: Option<u32>,
        episode: Option<u32>,
        watched_at: DateTime<Utc>,
    ) -> Self {
        // Movie marks never store a season/episode, whatever the caller passed
        let (season, episode) = match kind {
            MediaKind::Movie => (None, None),
            MediaKind::Tv => (season, episode),
        };
        Self { id, kind, season, episode, watched_at }
    }

    /// Identity of the mark: `movie-42` or `tv-42-S1-E3`.
    pub fn identifier(&self) -> String {
        match self.kind {
            MediaKind::Movie => format!("movie-{}", self.id),
            MediaKind::Tv => format!(
                "tv-{}-S{}-E{}",
                self.id,
                self.season.unwrap_or(0),
                self.episode.unwrap_or(0)
            ),
        }
    }

    /// Movies match on id alone; episodes need the exact season and episode.
    pub fn matches(&self, id: MediaId, kind: MediaKind, season: Option<u32>, episode: Option<u32>) -> bool {
        if self.id != id || self.kind != kind {
            return false;
        }
        match kind {
            MediaKind::Movie => true,
            MediaKind::Tv => self.season == season && self.episode == episode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_mark_drops_season_and_episode() {
        let mark = WatchedEpisodeMark::new(42, MediaKind::Movie, Some(3), Some(9), Utc::now());
        assert_eq!(mark.season, None);
        assert_eq!(mark.identifier(), "movie-42");
        assert!(mark.matches(42, MediaKind::Movie, Some(1), Some(1)));
    }

    #[test]
    fn test_episode_mark_requires_exact_match() {
        let mark = WatchedEpisodeMark::new(7, MediaKind::Tv, Some(1), Some(2), Utc::now());
        assert_eq!(mark.identifier(), "tv-7-S1-E2");
        assert!(mark.matches(7, MediaKind::Tv, Some(1), Some(2)));
        assert!(!mark.matches(7, MediaKind::Tv, Some(1), Some(3)));
        assert!(!mark.matches(7, MediaKind::Movie, Some(1), Some(2)));
    }

    #[test]
    fn test_reads_browser_shape() {
        let raw = r#"{"id":7,"type":"tv","season":"1","episode":2,"watchedAt":"2025-01-02T03:04:05.000Z"}"#;
        let mark: WatchedEpisodeMark = serde_json::from_str(raw).unwrap();
        assert_eq!(mark.season, Some(1));
        assert_eq!(mark.episode, Some(2));
    }
}
