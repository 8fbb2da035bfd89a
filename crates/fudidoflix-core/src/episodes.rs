use fudidoflix_models::{MediaId, MediaKind};
use fudidoflix_tmdb::{api, Episode, MetadataSource, SeasonSummary};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};
use crate::watch_store::WatchStore;

/// Season episode lists already fetched during this session.
#[derive(Debug, Default, Clone)]
pub struct SeasonCache {
    seasons: HashMap<(MediaId, u32), Vec<Episode>>,
}

impl SeasonCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, series_id: MediaId, season: u32) -> bool {
        self.seasons.contains_key(&(series_id, season))
    }

    /// Episodes of `season`, fetched once. Failures are not cached.
    pub async fn episodes(
        &mut self,
        source: &dyn MetadataSource,
        series_id: MediaId,
        season: u32,
    ) -> Option<Vec<Episode>> {
        if let Some(cached) = self.seasons.get(&(series_id, season)) {
            debug!(series_id, season, "Season served from cache");
            return Some(cached.clone());
        }
        match api::season(source, series_id, season).await {
            Ok(details) => {
                self.seasons.insert((series_id, season), details.episodes.clone());
                Some(details.episodes)
            }
            Err(e) => {
                warn!(series_id, season, error = %e, "Failed to load season");
                None
            }
        }
    }

    pub fn clear(&mut self) {
        self.seasons.clear();
    }
}

/// Season the panel opens on: the current one, else the first playable,
/// else 1.
pub fn initial_season(current: Option<u32>, seasons: &[SeasonSummary]) -> u32 {
    current
        .or_else(|| seasons.iter().find(|s| s.is_playable()).map(|s| s.season_number))
        .unwrap_or(1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeRow {
    pub season: u32,
    pub episode: u32,
    pub name: String,
    pub overview: Option<String>,
    pub runtime: Option<u32>,
    pub still_path: Option<String>,
    pub watched: bool,
    pub active: bool,
}

/// List rows for one season with watched flags; `active` marks the
/// highlighted episode.
pub fn episode_rows(
    store: &WatchStore,
    series_id: MediaId,
    season: u32,
    episodes: &[Episode],
    active: Option<(u32, u32)>,
) -> Vec<EpisodeRow> {
    let marks = store.watched_episodes();
    episodes
        .iter()
        .map(|ep| EpisodeRow {
            season,
            episode: ep.episode_number,
            name: ep.display_name(),
            overview: ep.overview.clone().filter(|o| !o.trim().is_empty()),
            runtime: ep.runtime,
            still_path: ep.still_path.clone(),
            watched: marks
                .iter()
                .any(|m| m.matches(series_id, MediaKind::Tv, Some(season), Some(ep.episode_number))),
            active: active == Some((season, ep.episode_number)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use fudidoflix_config::StorageConfig;
    use fudidoflix_tmdb::fake::FakeSource;
    use serde_json::json;
    use std::sync::Arc;

    fn season(n: u32, count: u32) -> SeasonSummary {
        SeasonSummary {
            season_number: n,
            episode_count: count,
            name: None,
            air_date: None,
            poster_path: None,
        }
    }

    #[test]
    fn test_initial_season_skips_specials() {
        let seasons = vec![season(0, 4), season(1, 0), season(2, 8)];
        assert_eq!(initial_season(None, &seasons), 2);
        assert_eq!(initial_season(Some(5), &seasons), 5);
        assert_eq!(initial_season(None, &[]), 1);
    }

    #[tokio::test]
    async fn test_season_is_fetched_once() {
        let source = FakeSource::new().with(
            "/tv/7/season/1",
            json!({"season_number": 1, "episodes": [{"episode_number": 1, "name": "Pilot"}]}),
        );
        let mut cache = SeasonCache::new();
        assert_eq!(cache.episodes(&source, 7, 1).await.unwrap().len(), 1);
        assert_eq!(cache.episodes(&source, 7, 1).await.unwrap().len(), 1);
        assert_eq!(source.call_count("/tv/7/season/1"), 1);

        assert!(cache.episodes(&source, 7, 2).await.is_none());
        assert!(!cache.contains(7, 2));
    }

    #[test]
    fn test_rows_carry_watched_and_active_flags() {
        let store = WatchStore::new(Arc::new(MemoryStore::new()), &StorageConfig::default());
        store.save_watched_episode(7, MediaKind::Tv, Some(1), Some(2));
        let episodes = vec![
            Episode { season_number: 1, episode_number: 1, ..Episode::default() },
            Episode { season_number: 1, episode_number: 2, name: Some("Two".into()), ..Episode::default() },
        ];

        let rows = episode_rows(&store, 7, 1, &episodes, Some((1, 1)));
        assert_eq!(rows[0].name, "Episódio 1");
        assert!(rows[0].active && !rows[0].watched);
        assert!(rows[1].watched && !rows[1].active);
    }
}
