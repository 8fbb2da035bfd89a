//! The Sorte page: a roulette over saved titles, a "surprise me" picker and
//! studio/actor discovery grids.

use fudidoflix_config::SorteConfig;
use fudidoflix_models::{MediaId, MediaKind, RouletteItem};
use fudidoflix_tmdb::{api, Company, Endpoint, Genre, MediaItem, MetadataSource, Person};
use futures::future::join_all;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};
use crate::error::CoreError;
use crate::watch_store::WatchStore;

pub const MIN_CANDIDATES: usize = 2;
pub const MIN_ROULETTE_QUERY: usize = 3;
const ROULETTE_SEARCH_LIMIT: usize = 5;
const SURPRISE_MIN_VOTES: u32 = 100;

/// Share of a segment kept clear on each side of the stopping point.
const BORDER_MARGIN: f64 = 0.15;

/// Where a spin will land. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinPlan {
    pub target_index: usize,
    /// Offset of the pointer from the wheel origin once stopped.
    pub stop_angle: f64,
    pub start_rotation: f64,
    pub final_rotation: f64,
    #[serde(skip)]
    pub duration: Duration,
}

impl SpinPlan {
    pub fn total_rotation(&self) -> f64 {
        self.final_rotation - self.start_rotation
    }
}

/// Index under the pointer for a wheel rotated by `rotation` degrees.
pub fn winner_index(rotation: f64, candidates: usize) -> Option<usize> {
    if candidates == 0 {
        return None;
    }
    let segment = 360.0 / candidates as f64;
    let angle = rotation.rem_euclid(360.0);
    let winning_angle = (360.0 - angle).rem_euclid(360.0);
    let index = (winning_angle / segment).floor() as usize;
    (index < candidates).then_some(index)
}

/// Wheel state between spins.
#[derive(Debug, Default, Clone)]
pub struct Wheel {
    rotation: f64,
    spinning: Option<usize>,
}

impl Wheel {
    pub fn new(rotation: f64) -> Self {
        Self { rotation, spinning: None }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning.is_some()
    }

    /// Pick a stopping segment and the rotation that lands on it.
    ///
    /// The wheel is busy until [`Wheel::finish`] is called.
    pub fn spin<R>(
        &mut self,
        candidates: usize,
        config: &SorteConfig,
        rng: &mut R,
    ) -> Result<SpinPlan, CoreError>
    where
        R: Rng + ?Sized,
    {
        if self.is_spinning() {
            return Err(CoreError::SpinInProgress);
        }
        if candidates < MIN_CANDIDATES {
            return Err(CoreError::NotEnoughCandidates {
                needed: MIN_CANDIDATES,
                have: candidates,
            });
        }

        let segment = 360.0 / candidates as f64;
        let target_index = rng.gen_range(0..candidates);
        let offset = rng.gen_range(BORDER_MARGIN..(1.0 - BORDER_MARGIN)) * segment;
        let stop_angle = target_index as f64 * segment + offset;

        let start_rotation = self.rotation;
        let base = start_rotation - start_rotation.rem_euclid(360.0);
        let final_rotation = base + f64::from(config.base_turns) * 360.0 + (360.0 - stop_angle);

        self.rotation = final_rotation;
        self.spinning = Some(candidates);
        debug!(target_index, stop_angle, final_rotation, "Spin planned");

        Ok(SpinPlan {
            target_index,
            stop_angle,
            start_rotation,
            final_rotation,
            duration: Duration::from_millis(config.spin_duration_ms),
        })
    }

    /// Release the busy flag and report the index under the pointer.
    pub fn finish(&mut self) -> Option<usize> {
        let candidates = self.spinning.take()?;
        winner_index(self.rotation, candidates)
    }
}

fn as_candidate(item: &MediaItem) -> Option<RouletteItem> {
    let media_type = item.kind()?;
    let poster_path = item.poster_path.clone().filter(|p| !p.trim().is_empty())?;
    Some(RouletteItem {
        id: item.id,
        title: item.display_title().to_string(),
        poster_path,
        media_type,
    })
}

/// Titles that can be put on the wheel: movies and series with a poster,
/// first five hits.
///
/// `Ok(None)` means the request failed.
pub async fn search_candidates(
    source: &dyn MetadataSource,
    query: &str,
) -> Result<Option<Vec<RouletteItem>>, CoreError> {
    let query = query.trim();
    if query.chars().count() < MIN_ROULETTE_QUERY {
        return Err(CoreError::QueryTooShort { min: MIN_ROULETTE_QUERY });
    }
    match api::search_multi(source, query).await {
        Ok(page) => Ok(Some(
            page.results
                .iter()
                .filter(|item| matches!(item.media_type.as_deref(), Some("movie") | Some("tv")))
                .filter_map(as_candidate)
                .take(ROULETTE_SEARCH_LIMIT)
                .collect(),
        )),
        Err(e) => {
            warn!(query, error = %e, "Roulette search failed");
            Ok(None)
        }
    }
}

/// Wheel entry for a title looked up by id.
pub async fn candidate_for(
    source: &dyn MetadataSource,
    kind: MediaKind,
    id: MediaId,
) -> Result<RouletteItem, CoreError> {
    let details = api::details(source, kind, id).await.map_err(|e| {
        warn!(%kind, id, error = %e, "Failed to load roulette candidate");
        CoreError::DetailsUnavailable { kind, id }
    })?;
    let poster_path = details
        .poster_path
        .clone()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| CoreError::invalid_target(kind, id, "title has no poster"))?;
    Ok(RouletteItem {
        id,
        title: details.display_title().to_string(),
        poster_path,
        media_type: kind,
    })
}

/// Spin over the saved candidates and wait out the animation.
pub async fn spin_saved<R>(
    store: &WatchStore,
    wheel: &mut Wheel,
    config: &SorteConfig,
    rng: &mut R,
) -> Result<(SpinPlan, RouletteItem), CoreError>
where
    R: Rng + ?Sized,
{
    let items = store.roulette_items();
    let plan = wheel.spin(items.len(), config, rng)?;
    tokio::time::sleep(plan.duration).await;
    let index = wheel
        .finish()
        .ok_or(CoreError::NotEnoughCandidates { needed: MIN_CANDIDATES, have: items.len() })?;
    let winner = items
        .get(index)
        .cloned()
        .ok_or(CoreError::NotEnoughCandidates { needed: MIN_CANDIDATES, have: items.len() })?;
    info!(operation = "roulette_spin", winner = %winner.title, index, "Roulette stopped");
    Ok((plan, winner))
}

/// What "surprise me" draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurpriseMode {
    Anything,
    Genre(u32),
}

#[derive(Debug, Clone, Serialize)]
pub struct SurprisePick {
    pub kind: MediaKind,
    pub item: MediaItem,
}

fn surprise_endpoint(kind: MediaKind, mode: SurpriseMode) -> Endpoint {
    let endpoint = Endpoint::new(format!("/discover/{}", kind))
        .param("sort_by", "popularity.desc")
        .param("vote_count.gte", SURPRISE_MIN_VOTES);
    match mode {
        SurpriseMode::Anything => endpoint,
        SurpriseMode::Genre(genre) => endpoint.param("with_genres", genre),
    }
}

/// Random popular title with poster, backdrop and synopsis.
///
/// Each attempt picks movie or series at random, reads how many pages the
/// listing has and samples one. `None` once every attempt came up empty.
pub async fn surprise<R>(
    source: &dyn MetadataSource,
    config: &SorteConfig,
    mode: SurpriseMode,
    rng: &mut R,
) -> Option<SurprisePick>
where
    R: Rng + ?Sized,
{
    for attempt in 1..=config.surprise_attempts {
        let kind = if rng.gen_bool(0.5) { MediaKind::Movie } else { MediaKind::Tv };
        let base = surprise_endpoint(kind, mode);

        let first = match api::media_page(source, &base.clone().param("page", 1)).await {
            Ok(page) => page,
            Err(e) => {
                warn!(attempt, %kind, error = %e, "Surprise attempt failed");
                continue;
            }
        };
        if first.total_pages == 0 {
            debug!(attempt, %kind, ?mode, "No titles for surprise");
            continue;
        }

        let page = rng.gen_range(1..=first.total_pages.min(config.max_random_page));
        let listing = match api::media_page(source, &base.param("page", page)).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!(attempt, %kind, page, error = %e, "Surprise attempt failed");
                continue;
            }
        };
        let valid: Vec<&MediaItem> = listing
            .results
            .iter()
            .filter(|item| item.has_poster() && item.has_backdrop() && item.has_overview())
            .collect();
        if let Some(item) = valid.choose(rng) {
            info!(operation = "surprise", attempt, %kind, id = item.id, "Surprise found");
            return Some(SurprisePick { kind, item: (*item).clone() });
        }
    }
    warn!(attempts = config.surprise_attempts, "No surprise found");
    None
}

/// Movie and series genres merged by id, sorted by name.
pub async fn genres(source: &dyn MetadataSource) -> Result<Vec<Genre>, CoreError> {
    let (movie, tv) = futures::join!(
        api::genres(source, MediaKind::Movie),
        api::genres(source, MediaKind::Tv)
    );
    let mut by_id = BTreeMap::new();
    for genre in movie?.genres.into_iter().chain(tv?.genres) {
        by_id.insert(genre.id, genre.name);
    }
    let mut merged: Vec<Genre> = by_id.into_iter().map(|(id, name)| Genre { id, name }).collect();
    merged.sort_by_key(|g| collation_key(&g.name));
    Ok(merged)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Studio {
    pub id: MediaId,
    pub name: &'static str,
}

pub const STUDIOS: &[Studio] = &[
    Studio { id: 41077, name: "A24" },
    Studio { id: 10342, name: "Studio Ghibli" },
    Studio { id: 3, name: "Pixar" },
    Studio { id: 420, name: "Marvel Studios" },
    Studio { id: 174, name: "Warner Bros. Pictures" },
    Studio { id: 33, name: "Universal Pictures" },
    Studio { id: 521, name: "DreamWorks Animation" },
    Studio { id: 2, name: "Walt Disney Pictures" },
    Studio { id: 128064, name: "DC Films" },
    Studio { id: 34, name: "Sony Pictures" },
];

/// Most popular movies of a studio over the first `studio_pages` pages,
/// fetched together. Failed pages are skipped.
pub async fn studio_grid(
    source: &dyn MetadataSource,
    company_id: MediaId,
    config: &SorteConfig,
) -> Vec<MediaItem> {
    let base = Endpoint::new("/discover/movie")
        .param("with_companies", company_id)
        .param("sort_by", "popularity.desc");
    let requests: Vec<Endpoint> = (1..=config.studio_pages)
        .map(|page| base.clone().param("page", page))
        .collect();
    let pages = join_all(requests.iter().map(|endpoint| api::media_page(source, endpoint))).await;

    let mut seen = HashSet::new();
    let mut items = Vec::new();
    for (endpoint, page) in requests.iter().zip(pages) {
        match page {
            Ok(page) => items.extend(
                page.results
                    .into_iter()
                    .filter(|item| seen.insert(item.id))
                    .map(|mut item| {
                        item.media_type.get_or_insert_with(|| MediaKind::Movie.to_string());
                        item
                    }),
            ),
            Err(e) => warn!(endpoint = %endpoint, error = %e, "Failed to load studio page"),
        }
    }
    debug!(company_id, count = items.len(), "Studio grid loaded");
    items
}

/// Everything a person appeared in or worked on, most popular first.
pub async fn actor_grid(
    source: &dyn MetadataSource,
    person_id: MediaId,
) -> Result<Vec<MediaItem>, CoreError> {
    let (movie, tv) = futures::join!(
        api::person_credits(source, person_id, MediaKind::Movie),
        api::person_credits(source, person_id, MediaKind::Tv)
    );
    let (movie, tv) = (movie?, tv?);

    let tagged = |items: Vec<MediaItem>, kind: MediaKind| {
        items.into_iter().map(move |mut item| {
            item.media_type = Some(kind.to_string());
            item
        })
    };
    let credits = tagged(movie.cast, MediaKind::Movie)
        .chain(tagged(movie.crew, MediaKind::Movie))
        .chain(tagged(tv.cast, MediaKind::Tv))
        .chain(tagged(tv.crew, MediaKind::Tv));

    let mut seen = HashSet::new();
    let mut items: Vec<MediaItem> = credits
        .filter(|item| seen.insert((item.media_type.clone(), item.id)))
        .collect();
    sort_grid(&mut items, GridSort::Popularity);
    Ok(items)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GridSort {
    #[default]
    Popularity,
    Rating,
    Date,
    Alpha,
}

impl FromStr for GridSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "popularity" => Ok(GridSort::Popularity),
            "rating" => Ok(GridSort::Rating),
            "date" => Ok(GridSort::Date),
            "alpha" | "title" => Ok(GridSort::Alpha),
            other => Err(format!(
                "unknown sort '{}', expected popularity, rating, date or alpha",
                other
            )),
        }
    }
}

/// Lowercased with Portuguese diacritics folded, so "Ação" sorts among the a's.
fn collation_key(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Titles without a date sort last.
pub fn sort_grid(items: &mut [MediaItem], order: GridSort) {
    match order {
        GridSort::Popularity => items.sort_by(|a, b| b.popularity.total_cmp(&a.popularity)),
        GridSort::Rating => items.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average)),
        GridSort::Date => items.sort_by(|a, b| b.date().cmp(&a.date())),
        GridSort::Alpha => items.sort_by_key(|item| collation_key(item.display_title())),
    }
}

pub async fn popular_people(source: &dyn MetadataSource) -> Result<Vec<Person>, CoreError> {
    Ok(api::popular_people(source).await?.results)
}

/// People and studios matching a name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Discovery {
    pub people: Vec<Person>,
    pub studios: Vec<Company>,
}

/// Studios are only listed when they have a logo.
pub async fn find(source: &dyn MetadataSource, query: &str) -> Result<Discovery, CoreError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CoreError::EmptyQuery);
    }
    let (people, companies) = futures::join!(
        api::search_people(source, query),
        api::search_companies(source, query)
    );
    Ok(Discovery {
        people: people?.results,
        studios: companies?
            .results
            .into_iter()
            .filter(|c| c.logo_path.as_deref().is_some_and(|p| !p.is_empty()))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use fudidoflix_config::StorageConfig;
    use fudidoflix_tmdb::fake::FakeSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use std::sync::Arc;

    fn quick_config() -> SorteConfig {
        SorteConfig {
            spin_duration_ms: 1,
            ..SorteConfig::default()
        }
    }

    fn candidate(id: MediaId) -> RouletteItem {
        RouletteItem {
            id,
            title: format!("Title {}", id),
            poster_path: format!("/{}.jpg", id),
            media_type: MediaKind::Movie,
        }
    }

    #[test]
    fn test_winner_index_from_rotation() {
        assert_eq!(winner_index(0.0, 4), Some(0));
        assert_eq!(winner_index(-10.0, 4), Some(0));
        assert_eq!(winner_index(350.0, 4), Some(0));
        assert_eq!(winner_index(260.0, 4), Some(1));
        assert_eq!(winner_index(720.0 + 100.0, 4), Some(2));
        assert_eq!(winner_index(45.0, 0), None);
    }

    #[test]
    fn test_spin_lands_on_chosen_segment_from_any_rotation() {
        let config = SorteConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut wheel = Wheel::new(1234.5);
        for n in 2..12 {
            let plan = wheel.spin(n, &config, &mut rng).unwrap();
            assert!(plan.total_rotation() >= f64::from(config.base_turns - 1) * 360.0);
            assert_eq!(wheel.finish(), Some(plan.target_index));
        }
    }

    #[test]
    fn test_spin_is_busy_and_needs_two_candidates() {
        let config = SorteConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut wheel = Wheel::default();

        assert!(matches!(
            wheel.spin(1, &config, &mut rng),
            Err(CoreError::NotEnoughCandidates { needed: 2, have: 1 })
        ));
        wheel.spin(3, &config, &mut rng).unwrap();
        assert!(matches!(wheel.spin(3, &config, &mut rng), Err(CoreError::SpinInProgress)));
        assert!(wheel.finish().is_some());
        assert!(!wheel.is_spinning());
        assert_eq!(wheel.finish(), None);
    }

    #[tokio::test]
    async fn test_spin_saved_returns_stored_winner() {
        let store = WatchStore::new(Arc::new(MemoryStore::new()), &StorageConfig::default());
        store.add_roulette_item(candidate(1));
        store.add_roulette_item(candidate(2));
        store.add_roulette_item(candidate(3));

        let mut wheel = Wheel::default();
        let mut rng = StdRng::seed_from_u64(9);
        let (plan, winner) = spin_saved(&store, &mut wheel, &quick_config(), &mut rng).await.unwrap();
        assert_eq!(winner, store.roulette_items()[plan.target_index]);
        assert!(!wheel.is_spinning());
    }

    #[tokio::test]
    async fn test_candidate_search_rules() {
        let source = FakeSource::new().with(
            "/search/multi?query=matrix",
            json!({"results": [
                {"id": 1, "media_type": "movie", "title": "The Matrix", "poster_path": "/m.jpg"},
                {"id": 2, "media_type": "person", "name": "Matrix Fan", "poster_path": "/p.jpg"},
                {"id": 3, "media_type": "tv", "name": "Matrix Show"},
                {"id": 4, "media_type": "tv", "name": "Matrix Anime", "poster_path": "/a.jpg"},
                {"id": 5, "media_type": "movie", "title": "M2", "poster_path": "/5.jpg"},
                {"id": 6, "media_type": "movie", "title": "M3", "poster_path": "/6.jpg"},
                {"id": 7, "media_type": "movie", "title": "M4", "poster_path": "/7.jpg"},
                {"id": 8, "media_type": "movie", "title": "M5", "poster_path": "/8.jpg"}
            ]}),
        );
        let found = search_candidates(&source, "matrix").await.unwrap().unwrap();
        let ids: Vec<MediaId> = found.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 4, 5, 6, 7]);
        assert_eq!(found[1].media_type, MediaKind::Tv);

        assert!(matches!(
            search_candidates(&source, "ma").await,
            Err(CoreError::QueryTooShort { min: 3 })
        ));
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_surprise_picks_complete_titles() {
        let listing = json!({"total_pages": 1, "results": [
            {"id": 10, "title": "No backdrop", "poster_path": "/a.jpg", "overview": "x"},
            {"id": 11, "title": "Full", "poster_path": "/b.jpg", "backdrop_path": "/c.jpg", "overview": "Plot"}
        ]});
        let source = FakeSource::new()
            .with("/discover/movie?sort_by=popularity.desc&vote_count.gte=100&with_genres=27&page=1", listing.clone())
            .with("/discover/tv?sort_by=popularity.desc&vote_count.gte=100&with_genres=27&page=1", listing);
        let mut rng = StdRng::seed_from_u64(21);

        let pick = surprise(&source, &SorteConfig::default(), SurpriseMode::Genre(27), &mut rng)
            .await
            .unwrap();
        assert_eq!(pick.item.id, 11);
    }

    #[tokio::test]
    async fn test_surprise_gives_up_after_attempts() {
        let source = FakeSource::new();
        let mut rng = StdRng::seed_from_u64(1);
        let config = SorteConfig {
            surprise_attempts: 3,
            ..SorteConfig::default()
        };
        assert!(surprise(&source, &config, SurpriseMode::Anything, &mut rng).await.is_none());
        assert_eq!(source.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_genres_merge_and_sort() {
        let source = FakeSource::new()
            .with("/genre/movie/list", json!({"genres": [{"id": 28, "name": "Ação"}, {"id": 35, "name": "Comédia"}]}))
            .with("/genre/tv/list", json!({"genres": [{"id": 35, "name": "Comédia"}, {"id": 16, "name": "Animação"}]}));
        let names: Vec<String> = genres(&source).await.unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Ação", "Animação", "Comédia"]);
    }

    #[tokio::test]
    async fn test_studio_grid_dedups_across_pages() {
        let config = SorteConfig {
            studio_pages: 2,
            ..SorteConfig::default()
        };
        let source = FakeSource::new()
            .with(
                "/discover/movie?with_companies=41077&sort_by=popularity.desc&page=1",
                json!({"results": [{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]}),
            )
            .with(
                "/discover/movie?with_companies=41077&sort_by=popularity.desc&page=2",
                json!({"results": [{"id": 2, "title": "B"}, {"id": 3, "title": "C"}]}),
            );
        let items = studio_grid(&source, 41077, &config).await;
        let ids: Vec<MediaId> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(items[0].kind(), Some(MediaKind::Movie));
    }

    #[tokio::test]
    async fn test_actor_grid_merges_credits_by_popularity() {
        let source = FakeSource::new()
            .with(
                "/person/5/movie_credits",
                json!({
                    "cast": [{"id": 1, "title": "Low", "popularity": 1.0}],
                    "crew": [{"id": 1, "title": "Low", "popularity": 1.0}, {"id": 2, "title": "High", "popularity": 9.0}]
                }),
            )
            .with(
                "/person/5/tv_credits",
                json!({"cast": [{"id": 1, "name": "Show", "popularity": 5.0}], "crew": []}),
            );
        let items = actor_grid(&source, 5).await.unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.display_title()).collect();
        assert_eq!(titles, vec!["High", "Show", "Low"]);
        assert_eq!(items[1].kind(), Some(MediaKind::Tv));
    }

    #[test]
    fn test_sort_grid_orders() {
        let item = |id, title: &str, rating, date: Option<&str>| MediaItem {
            id,
            title: Some(title.to_string()),
            vote_average: rating,
            release_date: date.map(str::to_string),
            ..MediaItem::default()
        };
        let mut items = vec![
            item(1, "beta", 7.0, Some("2001-01-01")),
            item(2, "Alpha", 9.0, None),
            item(3, "gamma", 5.0, Some("2020-05-05")),
        ];

        sort_grid(&mut items, GridSort::Rating);
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![2, 1, 3]);
        sort_grid(&mut items, GridSort::Date);
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![3, 1, 2]);
        sort_grid(&mut items, GridSort::Alpha);
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![2, 1, 3]);
        assert_eq!("title".parse::<GridSort>(), Ok(GridSort::Alpha));
    }

    #[tokio::test]
    async fn test_find_keeps_studios_with_logos() {
        let source = FakeSource::new()
            .with("/search/person?query=pixar", json!({"results": [{"id": 9, "name": "Pixar Person"}]}))
            .with(
                "/search/company?query=pixar",
                json!({"results": [
                    {"id": 3, "name": "Pixar", "logo_path": "/pixar.png"},
                    {"id": 4, "name": "Pixar Shorts", "logo_path": null}
                ]}),
            );
        let found = find(&source, "pixar").await.unwrap();
        assert_eq!(found.people.len(), 1);
        assert_eq!(found.studios.len(), 1);
        assert_eq!(found.studios[0].id, 3);
    }
}
