use fudidoflix_models::{EntryDraft, MediaId, MediaKind};
use fudidoflix_tmdb::{api, Certifications, Credits, MetadataSource, SeasonSummary, TitleDetails, Video};
use serde::Serialize;
use tracing::{debug, warn};
use crate::episodes::{episode_rows, EpisodeRow, SeasonCache};
use crate::error::CoreError;
use crate::watch_store::WatchStore;

const DEFAULT_AGE_RATING: &str = "L";
const MISSING: &str = "Não especificado";

/// Everything the details modal shows.
#[derive(Debug, Clone, Serialize)]
pub struct DetailsView {
    pub id: MediaId,
    pub kind: MediaKind,
    pub title: String,
    pub overview: String,
    pub relevance: String,
    pub year: Option<i32>,
    pub length: Option<String>,
    pub age_rating: String,
    pub cast: String,
    pub genres: String,
    pub tags: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub seasons: Vec<SeasonSummary>,
    /// Episodes of the first playable season, episode 1 selected.
    pub episodes: Vec<EpisodeRow>,
    pub in_my_list: bool,
    /// Movies only; series track watched state per episode.
    pub watched: bool,
    pub trailer: Option<Video>,
    #[serde(skip)]
    pub draft: EntryDraft,
}

impl DetailsView {
    pub fn default_season(&self) -> Option<u32> {
        self.seasons.first().map(|s| s.season_number)
    }
}

/// `vote_average` as a percentage, `--` when unrated.
pub fn relevance_label(vote_average: f64) -> String {
    if vote_average > 0.0 {
        format!("{}", (vote_average * 10.0).round() as i64)
    } else {
        "--".to_string()
    }
}

pub fn runtime_label(minutes: u32) -> String {
    format!("{}h {}min", minutes / 60, minutes % 60)
}

pub fn seasons_label(count: u32) -> String {
    if count > 1 {
        format!("{} Temporadas", count)
    } else {
        format!("{} Temporada", count)
    }
}

fn length_label(kind: MediaKind, details: &TitleDetails) -> Option<String> {
    match kind {
        MediaKind::Movie => details.runtime.filter(|m| *m > 0).map(runtime_label),
        MediaKind::Tv => details.number_of_seasons.filter(|n| *n > 0).map(seasons_label),
    }
}

/// Regional certification, `L` when absent.
pub fn age_rating(certifications: Option<&Certifications>, region: &str) -> String {
    certifications
        .and_then(|c| c.for_region(region))
        .unwrap_or_else(|| DEFAULT_AGE_RATING.to_string())
}

pub fn top_cast(credits: Option<&Credits>) -> String {
    let names: Vec<&str> = credits
        .map(|c| c.cast.iter().take(3).map(|m| m.name.as_str()).collect())
        .unwrap_or_default();
    if names.is_empty() {
        "Não disponível".to_string()
    } else {
        names.join(", ")
    }
}

/// Tagline, else the first six words of the overview.
pub fn tags(tagline: Option<&str>, overview: Option<&str>) -> String {
    if let Some(tagline) = tagline.filter(|t| !t.trim().is_empty()) {
        return tagline.to_string();
    }
    match overview.filter(|o| !o.trim().is_empty()) {
        Some(overview) => {
            let head: Vec<&str> = overview.split(' ').take(6).collect();
            format!("{}...", head.join(" "))
        }
        None => MISSING.to_string(),
    }
}

/// Official pt/en YouTube trailer, then any official trailer, then any
/// trailer, then any YouTube video.
pub fn choose_trailer(videos: &[Video]) -> Option<&Video> {
    let trailers: Vec<&Video> = videos
        .iter()
        .filter(|v| v.is_youtube() && v.video_type == "Trailer")
        .collect();
    trailers
        .iter()
        .find(|v| v.official && matches!(v.iso_639_1.as_deref(), Some("pt") | Some("en")))
        .or_else(|| trailers.iter().find(|v| v.official))
        .or_else(|| trailers.first())
        .copied()
        .or_else(|| videos.iter().find(|v| v.is_youtube()))
}

/// Fetch the title's best trailer.
pub async fn load_trailer(
    source: &dyn MetadataSource,
    kind: MediaKind,
    id: MediaId,
) -> Result<Video, CoreError> {
    match api::videos(source, kind, id).await {
        Ok(list) => choose_trailer(&list.results)
            .cloned()
            .ok_or(CoreError::NoTrailer { kind, id }),
        Err(e) => {
            warn!(%kind, id, error = %e, "Failed to load videos");
            Err(CoreError::NoTrailer { kind, id })
        }
    }
}

/// Fetch details, credits, videos and certifications together.
///
/// Only the details request is required; the others degrade to
/// placeholders. Series also get the first playable season's episodes.
pub async fn load_details(
    source: &dyn MetadataSource,
    store: &WatchStore,
    seasons_cache: &mut SeasonCache,
    kind: MediaKind,
    id: MediaId,
    region: &str,
) -> Result<DetailsView, CoreError> {
    let (details, credits, videos, certifications) = futures::join!(
        api::details(source, kind, id),
        api::credits(source, kind, id),
        api::videos(source, kind, id),
        api::certifications(source, kind, id),
    );

    let details = details.map_err(|e| {
        warn!(%kind, id, error = %e, "Failed to load details");
        CoreError::DetailsUnavailable { kind, id }
    })?;
    let credits = credits
        .map_err(|e| debug!(%kind, id, error = %e, "Credits unavailable"))
        .ok();
    let videos = videos
        .map_err(|e| debug!(%kind, id, error = %e, "Videos unavailable"))
        .ok();
    let certifications = certifications
        .map_err(|e| debug!(%kind, id, error = %e, "Certifications unavailable"))
        .ok();

    let seasons = match kind {
        MediaKind::Tv => details.playable_seasons(),
        MediaKind::Movie => Vec::new(),
    };
    let episodes = match seasons.first() {
        Some(first) => {
            let season = first.season_number;
            match seasons_cache.episodes(source, id, season).await {
                Some(list) => episode_rows(store, id, season, &list, Some((season, 1))),
                None => Vec::new(),
            }
        }
        None => Vec::new(),
    };

    Ok(DetailsView {
        id,
        kind,
        title: details.display_title().to_string(),
        overview: details
            .overview
            .clone()
            .filter(|o| !o.trim().is_empty())
            .unwrap_or_else(|| "Nenhuma descrição disponível.".to_string()),
        relevance: relevance_label(details.vote_average),
        year: details.year(),
        length: length_label(kind, &details),
        age_rating: age_rating(certifications.as_ref(), region),
        cast: top_cast(credits.as_ref()),
        genres: if details.genres.is_empty() {
            MISSING.to_string()
        } else {
            details
                .genres
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        },
        tags: tags(details.tagline.as_deref(), details.overview.as_deref()),
        poster_path: details.poster_path.clone(),
        backdrop_path: details.backdrop_path.clone().or_else(|| details.poster_path.clone()),
        seasons,
        episodes,
        in_my_list: store.is_in_my_list(id, kind),
        watched: kind == MediaKind::Movie && store.is_episode_watched(id, kind, None, None),
        trailer: videos
            .as_ref()
            .and_then(|v| choose_trailer(&v.results))
            .cloned(),
        draft: details.to_draft(kind),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use fudidoflix_config::StorageConfig;
    use fudidoflix_tmdb::fake::FakeSource;
    use serde_json::json;
    use std::sync::Arc;

    fn video(key: &str, kind: &str, official: bool, lang: &str) -> Video {
        Video {
            key: key.to_string(),
            site: "YouTube".to_string(),
            video_type: kind.to_string(),
            official,
            iso_639_1: Some(lang.to_string()),
            name: None,
        }
    }

    fn store() -> WatchStore {
        WatchStore::new(Arc::new(MemoryStore::new()), &StorageConfig::default())
    }

    #[test]
    fn test_trailer_preference_order() {
        let mut videos = vec![
            video("teaser", "Teaser", true, "en"),
            video("fr", "Trailer", true, "fr"),
            video("pt", "Trailer", true, "pt"),
        ];
        assert_eq!(choose_trailer(&videos).unwrap().key, "pt");

        videos.pop();
        assert_eq!(choose_trailer(&videos).unwrap().key, "fr");

        videos.pop();
        assert_eq!(choose_trailer(&videos).unwrap().key, "teaser");

        let mut vimeo = video("v", "Trailer", true, "pt");
        vimeo.site = "Vimeo".to_string();
        assert!(choose_trailer(&[vimeo]).is_none());
    }

    #[test]
    fn test_labels() {
        assert_eq!(relevance_label(7.46), "75");
        assert_eq!(relevance_label(7.25), "73");
        assert_eq!(relevance_label(0.0), "--");
        assert_eq!(runtime_label(135), "2h 15min");
        assert_eq!(seasons_label(1), "1 Temporada");
        assert_eq!(seasons_label(3), "3 Temporadas");
        assert_eq!(
            tags(None, Some("Um garoto descobre que é um bruxo famoso")),
            "Um garoto descobre que é um..."
        );
        assert_eq!(tags(Some("Tagline"), Some("ignored")), "Tagline");
        assert_eq!(tags(None, None), "Não especificado");
        assert_eq!(top_cast(None), "Não disponível");
    }

    #[tokio::test]
    async fn test_movie_details_view() {
        let store = store();
        store.save_watched_episode(42, MediaKind::Movie, None, None);
        let source = FakeSource::new()
            .with(
                "/movie/42",
                json!({"id": 42, "title": "X", "overview": "A plot", "vote_average": 8.1,
                       "release_date": "2019-05-30", "runtime": 132, "poster_path": "/x.jpg",
                       "genres": [{"id": 18, "name": "Drama"}, {"id": 53, "name": "Thriller"}]}),
            )
            .with(
                "/movie/42/credits",
                json!({"cast": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}, {"id": 3, "name": "C"}, {"id": 4, "name": "D"}]}),
            )
            .with(
                "/movie/42/release_dates",
                json!({"results": [{"iso_3166_1": "BR", "release_dates": [{"certification": ""}, {"certification": "16"}]}]}),
            );

        let mut cache = SeasonCache::new();
        let view = load_details(&source, &store, &mut cache, MediaKind::Movie, 42, "BR")
            .await
            .unwrap();
        assert_eq!(view.title, "X");
        assert_eq!(view.relevance, "81");
        assert_eq!(view.year, Some(2019));
        assert_eq!(view.length.as_deref(), Some("2h 12min"));
        assert_eq!(view.age_rating, "16");
        assert_eq!(view.cast, "A, B, C");
        assert_eq!(view.genres, "Drama, Thriller");
        assert_eq!(view.tags, "A plot...");
        assert!(view.watched);
        assert!(!view.in_my_list);
        assert!(view.trailer.is_none());
        assert_eq!(view.backdrop_path.as_deref(), Some("/x.jpg"));
    }

    #[tokio::test]
    async fn test_series_details_load_first_season() {
        let source = FakeSource::new()
            .with(
                "/tv/9",
                json!({"id": 9, "name": "Dark", "number_of_seasons": 2,
                       "seasons": [{"season_number": 0, "episode_count": 3},
                                   {"season_number": 1, "episode_count": 2}]}),
            )
            .with(
                "/tv/9/season/1",
                json!({"episodes": [{"episode_number": 1}, {"episode_number": 2}]}),
            );

        let mut cache = SeasonCache::new();
        let view = load_details(&source, &store(), &mut cache, MediaKind::Tv, 9, "BR")
            .await
            .unwrap();
        assert_eq!(view.length.as_deref(), Some("2 Temporadas"));
        assert_eq!(view.default_season(), Some(1));
        assert_eq!(view.episodes.len(), 2);
        assert!(view.episodes[0].active);
        assert_eq!(view.age_rating, "L");
        assert!(!view.watched);
    }

    #[tokio::test]
    async fn test_missing_details_is_fatal() {
        let source = FakeSource::new().with("/movie/1/credits", json!({"cast": []}));
        let mut cache = SeasonCache::new();
        let err = load_details(&source, &store(), &mut cache, MediaKind::Movie, 1, "BR")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::DetailsUnavailable { id: 1, .. }));
    }

    #[tokio::test]
    async fn test_load_trailer_reports_missing() {
        let source = FakeSource::new().with("/tv/3/videos", json!({"results": []}));
        assert!(matches!(
            load_trailer(&source, MediaKind::Tv, 3).await,
            Err(CoreError::NoTrailer { .. })
        ));
    }
}
