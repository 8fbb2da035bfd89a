use fudidoflix_models::{MediaKind, PosterEntry};
use fudidoflix_tmdb::{api, Endpoint, MediaItem, MetadataSource, Page};
use futures::future::join_all;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};
use crate::error::CoreError;
use crate::watch_store::WatchStore;

/// Genre id TMDB uses for animation; the anime grid is animated series.
pub const ANIMATION_GENRE: &str = "16";
pub const DEFAULT_SORT: &str = "popularity.desc";
const MIN_VOTE_COUNT: u32 = 50;

/// Which grid is being browsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowseType {
    Movie,
    Tv,
    Anime,
}

impl BrowseType {
    /// Kind queried on `/discover`; anime is served by the tv endpoint.
    pub fn media_kind(&self) -> MediaKind {
        match self {
            BrowseType::Movie => MediaKind::Movie,
            BrowseType::Tv | BrowseType::Anime => MediaKind::Tv,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            BrowseType::Movie => "Filmes",
            BrowseType::Tv => "Séries",
            BrowseType::Anime => "Animes",
        }
    }
}

impl fmt::Display for BrowseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BrowseType::Movie => "movie",
            BrowseType::Tv => "tv",
            BrowseType::Anime => "anime",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for BrowseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movie" | "movies" | "filmes" => Ok(BrowseType::Movie),
            "tv" | "series" | "séries" => Ok(BrowseType::Tv),
            "anime" | "animes" => Ok(BrowseType::Anime),
            other => Err(format!("unknown browse type '{}', expected movie, tv or anime", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Genre,
    Provider,
    Company,
    Keyword,
    Country,
    EraMovie,
    EraTv,
}

/// A named category of the browse header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterPreset {
    pub name: &'static str,
    pub kind: FilterKind,
    pub value: &'static str,
}

const fn preset(name: &'static str, kind: FilterKind, value: &'static str) -> FilterPreset {
    FilterPreset { name, kind, value }
}

pub const MOVIE_FILTERS: &[FilterPreset] = &[
    preset("Todos os Gêneros", FilterKind::Genre, ""),
    preset("Ação e Aventura", FilterKind::Genre, "28,12"),
    preset("Animação", FilterKind::Genre, "16"),
    preset("Comédia", FilterKind::Genre, "35"),
    preset("Criminal", FilterKind::Genre, "80"),
    preset("Suspense", FilterKind::Genre, "53"),
    preset("Terror", FilterKind::Genre, "27"),
    preset("Drama", FilterKind::Genre, "18"),
    preset("Romance", FilterKind::Genre, "10749"),
    preset("Ficção-Científica e Fantasia", FilterKind::Genre, "878,14"),
    preset("Mistério", FilterKind::Genre, "9648"),
    preset("Policial", FilterKind::Genre, "80"),
    preset("Disney e Pixar", FilterKind::Company, "2|3"),
    preset("Brasileiros", FilterKind::Country, "BR"),
    preset("Clássicos (até 1990)", FilterKind::EraMovie, "1990-12-31"),
    preset("Premiados Oscar", FilterKind::Keyword, "9715"),
    preset("Netflix", FilterKind::Provider, "8"),
    preset("Prime Video", FilterKind::Provider, "9"),
    preset("Max", FilterKind::Provider, "1899"),
    preset("Paramount+", FilterKind::Provider, "531"),
    preset("Globoplay", FilterKind::Provider, "307"),
    preset("Disney+", FilterKind::Provider, "337"),
    preset("Apple TV+", FilterKind::Provider, "350"),
];

pub const TV_FILTERS: &[FilterPreset] = &[
    preset("Todos os Gêneros", FilterKind::Genre, ""),
    preset("Ação e Aventura", FilterKind::Genre, "10759"),
    preset("Animação", FilterKind::Genre, "16"),
    preset("Comédia", FilterKind::Genre, "35"),
    preset("Criminal", FilterKind::Genre, "80"),
    preset("Suspense", FilterKind::Genre, "9648"),
    preset("Terror", FilterKind::Genre, "9648"),
    preset("Drama", FilterKind::Genre, "18"),
    preset("Romance", FilterKind::Genre, "18"),
    preset("Ficção-Científica e Fantasia", FilterKind::Genre, "10765"),
    preset("Mistério", FilterKind::Genre, "9648"),
    preset("Policial", FilterKind::Genre, "80"),
    preset("Disney e Pixar", FilterKind::Company, "2|3"),
    preset("Brasileiros", FilterKind::Country, "BR"),
    preset("Clássicos (até 1990)", FilterKind::EraTv, "1990-12-31"),
    preset("Premiados Emmy", FilterKind::Keyword, "11961"),
    preset("Netflix", FilterKind::Provider, "8"),
    preset("Prime Video", FilterKind::Provider, "9"),
    preset("Max", FilterKind::Provider, "1899"),
    preset("Paramount+", FilterKind::Provider, "531"),
    preset("Globoplay", FilterKind::Provider, "307"),
    preset("Disney+", FilterKind::Provider, "337"),
    preset("Apple TV+", FilterKind::Provider, "350"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortOption {
    pub name: &'static str,
    pub value: &'static str,
}

pub const MOVIE_SORTS: &[SortOption] = &[
    SortOption { name: "Mais Populares", value: "popularity.desc" },
    SortOption { name: "Melhores Avaliados", value: "vote_average.desc" },
    SortOption { name: "Mais Recentes", value: "primary_release_date.desc" },
    SortOption { name: "Ordem Alfabética (A-Z)", value: "original_title.asc" },
];

pub const TV_SORTS: &[SortOption] = &[
    SortOption { name: "Mais Populares", value: "popularity.desc" },
    SortOption { name: "Melhores Avaliados", value: "vote_average.desc" },
    SortOption { name: "Mais Recentes", value: "first_air_date.desc" },
    SortOption { name: "Ordem Alfabética (A-Z)", value: "name.asc" },
];

pub fn filter_presets(kind: MediaKind) -> &'static [FilterPreset] {
    match kind {
        MediaKind::Movie => MOVIE_FILTERS,
        MediaKind::Tv => TV_FILTERS,
    }
}

pub fn sort_options(kind: MediaKind) -> &'static [SortOption] {
    match kind {
        MediaKind::Movie => MOVIE_SORTS,
        MediaKind::Tv => TV_SORTS,
    }
}

/// Case-insensitive lookup by preset name.
pub fn find_preset(kind: MediaKind, name: &str) -> Result<&'static FilterPreset, CoreError> {
    let wanted = name.trim().to_lowercase();
    filter_presets(kind)
        .iter()
        .find(|p| p.name.to_lowercase() == wanted)
        .ok_or_else(|| CoreError::UnknownPreset(name.to_string()))
}

/// Accepts a sort option by name or by its API value.
pub fn find_sort(kind: MediaKind, name_or_value: &str) -> Result<&'static SortOption, CoreError> {
    let wanted = name_or_value.trim().to_lowercase();
    sort_options(kind)
        .iter()
        .find(|s| s.value == wanted || s.name.to_lowercase() == wanted)
        .ok_or_else(|| CoreError::UnknownPreset(name_or_value.to_string()))
}

/// Release ceiling applied by the "classics" presets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Era {
    pub until: String,
    pub kind: MediaKind,
}

/// Filter state of a browse grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoverQuery {
    pub browse: BrowseType,
    pub page: u32,
    pub sort_by: String,
    pub genre: Option<String>,
    pub provider: Option<String>,
    pub company: Option<String>,
    pub keyword: Option<String>,
    pub country: Option<String>,
    pub era: Option<Era>,
}

impl DiscoverQuery {
    pub fn new(browse: BrowseType) -> Self {
        Self {
            browse,
            page: 1,
            sort_by: DEFAULT_SORT.to_string(),
            genre: (browse == BrowseType::Anime).then(|| ANIMATION_GENRE.to_string()),
            provider: None,
            company: None,
            keyword: None,
            country: None,
            era: None,
        }
    }

    pub fn with_sort(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Replace the category filters with `preset`. Anime keeps its genre.
    pub fn with_preset(mut self, preset: &FilterPreset) -> Self {
        self.genre = None;
        self.provider = None;
        self.company = None;
        self.keyword = None;
        self.country = None;
        self.era = None;

        let value = (!preset.value.is_empty()).then(|| preset.value.to_string());
        match preset.kind {
            FilterKind::Genre => self.genre = value,
            FilterKind::Provider => self.provider = value,
            FilterKind::Company => self.company = value,
            FilterKind::Keyword => self.keyword = value,
            FilterKind::Country => self.country = value,
            FilterKind::EraMovie => {
                self.era = value.map(|until| Era { until, kind: MediaKind::Movie })
            }
            FilterKind::EraTv => self.era = value.map(|until| Era { until, kind: MediaKind::Tv }),
        }

        if self.browse == BrowseType::Anime {
            self.genre = Some(ANIMATION_GENRE.to_string());
        }
        self
    }

    pub fn endpoint(&self, region: &str) -> Endpoint {
        let mut endpoint = Endpoint::new(format!("/discover/{}", self.browse.media_kind()))
            .param("sort_by", &self.sort_by)
            .param("page", self.page)
            .param_opt("with_genres", self.genre.as_ref())
            .param_opt("with_companies", self.company.as_ref())
            .param_opt("with_keywords", self.keyword.as_ref())
            .param_opt("with_origin_country", self.country.as_ref());
        if let Some(provider) = &self.provider {
            endpoint = endpoint
                .param("with_watch_providers", provider)
                .param("watch_region", region);
        }
        if let Some(era) = &self.era {
            let key = match era.kind {
                MediaKind::Movie => "primary_release_date.lte",
                MediaKind::Tv => "first_air_date.lte",
            };
            endpoint = endpoint.param(key, &era.until);
        }
        endpoint.param("vote_count.gte", MIN_VOTE_COUNT)
    }
}

/// One discover page, keeping only titles with a poster. `None` on failure.
pub async fn fetch_grid(
    source: &dyn MetadataSource,
    query: &DiscoverQuery,
    region: &str,
) -> Option<Page<MediaItem>> {
    let endpoint = query.endpoint(region);
    match api::media_page(source, &endpoint).await {
        Ok(mut page) => {
            page.results.retain(MediaItem::has_poster);
            Some(page)
        }
        Err(e) => {
            warn!(endpoint = %endpoint, error = %e, "Failed to load grid page");
            None
        }
    }
}

/// Random trending title that has a backdrop and a synopsis.
pub async fn fetch_hero<R>(source: &dyn MetadataSource, rng: &mut R) -> Option<MediaItem>
where
    R: Rng + ?Sized,
{
    let page = match api::trending_today(source).await {
        Ok(page) => page,
        Err(e) => {
            warn!(error = %e, "Failed to load hero");
            return None;
        }
    };
    let playable: Vec<&MediaItem> = page
        .results
        .iter()
        .filter(|item| item.has_backdrop() && item.has_overview())
        .collect();
    playable.choose(rng).map(|item| (*item).clone())
}

/// Multi-search without people or poster-less titles.
///
/// `Ok(None)` means the request failed.
pub async fn search(
    source: &dyn MetadataSource,
    query: &str,
) -> Result<Option<Vec<MediaItem>>, CoreError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CoreError::EmptyQuery);
    }
    match api::search_multi(source, query).await {
        Ok(page) => Ok(Some(
            page.results
                .into_iter()
                .filter(|item| !item.is_person() && item.has_poster())
                .collect(),
        )),
        Err(e) => {
            warn!(query, error = %e, "Search failed");
            Ok(None)
        }
    }
}

/// Where a home row gets its titles from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSource {
    Remote(&'static str),
    WatchedHistory,
    ContinueWatching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub title: &'static str,
    pub source: RowSource,
}

const fn remote(title: &'static str, endpoint: &'static str) -> Category {
    Category {
        title,
        source: RowSource::Remote(endpoint),
    }
}

pub const HOME_CATEGORIES: &[Category] = &[
    remote("Em Alta Hoje", "/trending/all/day"),
    Category {
        title: "Continuar Assistindo",
        source: RowSource::ContinueWatching,
    },
    Category {
        title: "Últimos Assistidos",
        source: RowSource::WatchedHistory,
    },
    remote("Séries Aclamadas pela Crítica", "/tv/top_rated?vote_count.gte=1000"),
    remote("Filmes de Terror", "/discover/movie?with_genres=27"),
    remote("Filmes Suspense", "/discover/movie?with_genres=53"),
    remote("Filmes Populares", "/movie/popular"),
    remote("Animes", "/discover/tv?with_genres=16&sort_by=popularity.desc"),
    remote("Documentários", "/discover/movie?with_genres=99"),
    remote("Originais e Exclusivos Netflix", "/discover/tv?with_networks=213&language=pt-BR"),
    remote("Originais e Exclusivos Prime Video", "/discover/tv?with_networks=1024&language=pt-BR"),
    remote("Originais e Exclusivos Max", "/discover/tv?with_networks=49&language=pt-BR"),
    remote("Originais e Exclusivos Paramount+", "/discover/tv?with_networks=4330&language=pt-BR"),
    remote("Originais e Exclusivos Globoplay", "/discover/tv?with_networks=3290&language=pt-BR"),
    remote("Originais e Exclusivos Disney+", "/discover/tv?with_networks=2739&language=pt-BR"),
    remote("Originais e Exclusivos Apple TV+", "/discover/tv?with_networks=2552&language=pt-BR"),
    remote("Filmes Brasileiros", "/discover/movie?with_origin_country=BR&sort_by=popularity.desc"),
];

/// A titled carousel of the home page.
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub title: String,
    pub items: Vec<MediaItem>,
}

/// Stored entries rendered like API items so rows share one tile shape.
pub fn entry_as_item(entry: &PosterEntry) -> MediaItem {
    let (title, name) = match entry.kind {
        MediaKind::Movie => (Some(entry.title.clone()), None),
        MediaKind::Tv => (None, Some(entry.title.clone())),
    };
    MediaItem {
        id: entry.id,
        media_type: Some(entry.kind.to_string()),
        title,
        name,
        poster_path: Some(entry.poster_path.clone()),
        ..MediaItem::default()
    }
}

async fn load_row(source: &dyn MetadataSource, store: &WatchStore, category: &Category) -> Vec<MediaItem> {
    match category.source {
        RowSource::WatchedHistory => store.watched_history().iter().map(entry_as_item).collect(),
        RowSource::ContinueWatching => store.continue_watching().iter().map(entry_as_item).collect(),
        RowSource::Remote(raw) => {
            let endpoint = Endpoint::parse(raw);
            match api::media_page(source, &endpoint).await {
                Ok(page) => page.results,
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "Failed to load row");
                    Vec::new()
                }
            }
        }
    }
}

/// Fetch every category concurrently and keep the non-empty rows in order.
pub async fn home_rows(
    source: &dyn MetadataSource,
    store: &WatchStore,
    categories: &[Category],
) -> Vec<Row> {
    let loaded = join_all(categories.iter().map(|c| load_row(source, store, c))).await;
    categories
        .iter()
        .zip(loaded)
        .filter_map(|(category, items)| {
            if items.is_empty() {
                if matches!(category.source, RowSource::Remote(_)) {
                    warn!(row = category.title, "No items for row");
                }
                None
            } else {
                Some(Row {
                    title: category.title.to_string(),
                    items,
                })
            }
        })
        .collect()
}

/// Paging state for the infinite-scroll grid.
#[derive(Debug, Clone)]
pub struct BrowseCursor {
    query: DiscoverQuery,
    in_flight: bool,
    exhausted: bool,
    total_pages: Option<u32>,
}

impl BrowseCursor {
    pub fn new(query: DiscoverQuery) -> Self {
        Self {
            query,
            in_flight: false,
            exhausted: false,
            total_pages: None,
        }
    }

    pub fn query(&self) -> &DiscoverQuery {
        &self.query
    }

    /// Page count reported by the last loaded page.
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Number of the last page loaded, if any.
    pub fn last_page(&self) -> Option<u32> {
        self.total_pages.map(|_| self.query.page.saturating_sub(1))
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// A filter change starts over at page 1.
    pub fn reset(&mut self, query: DiscoverQuery) {
        self.query = query.with_page(1);
        self.in_flight = false;
        self.exhausted = false;
        self.total_pages = None;
    }

    /// Query for the next page, or `None` while a page is loading or after
    /// the last one.
    pub fn begin(&mut self) -> Option<DiscoverQuery> {
        if self.in_flight || self.exhausted {
            debug!(page = self.query.page, in_flight = self.in_flight, "Ignoring page request");
            return None;
        }
        self.in_flight = true;
        Some(self.query.clone())
    }

    /// Record the outcome of the page handed out by [`BrowseCursor::begin`].
    pub fn complete<T>(&mut self, page: Option<&Page<T>>) {
        self.in_flight = false;
        if let Some(page) = page {
            self.total_pages = Some(page.total_pages);
            if page.total_pages == 0 || page.page >= page.total_pages {
                self.exhausted = true;
            }
            self.query.page = page.page.max(self.query.page) + 1;
        }
    }

    pub async fn load_next(
        &mut self,
        source: &dyn MetadataSource,
        region: &str,
    ) -> Option<Vec<MediaItem>> {
        let query = self.begin()?;
        let page = fetch_grid(source, &query, region).await;
        self.complete(page.as_ref());
        page.map(|p| p.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use fudidoflix_config::StorageConfig;
    use fudidoflix_models::EntryDraft;
    use fudidoflix_tmdb::fake::FakeSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use std::sync::Arc;

    fn store() -> WatchStore {
        WatchStore::new(Arc::new(MemoryStore::new()), &StorageConfig::default())
    }

    #[test]
    fn test_discover_query_includes_filters() {
        let query = DiscoverQuery::new(BrowseType::Movie)
            .with_preset(find_preset(MediaKind::Movie, "netflix").unwrap())
            .with_sort("vote_average.desc")
            .with_page(3);
        assert_eq!(
            query.endpoint("BR").to_string(),
            "/discover/movie?page=3&sort_by=vote_average.desc&vote_count.gte=50&watch_region=BR&with_watch_providers=8"
        );
    }

    #[test]
    fn test_anime_forces_animation_genre() {
        let query = DiscoverQuery::new(BrowseType::Anime)
            .with_preset(find_preset(MediaKind::Tv, "Comédia").unwrap());
        let endpoint = query.endpoint("BR");
        assert_eq!(endpoint.path(), "/discover/tv");
        assert_eq!(endpoint.get("with_genres"), Some("16"));
    }

    #[test]
    fn test_era_preset_uses_release_ceiling() {
        let movie = DiscoverQuery::new(BrowseType::Movie)
            .with_preset(find_preset(MediaKind::Movie, "Clássicos (até 1990)").unwrap());
        assert_eq!(movie.endpoint("BR").get("primary_release_date.lte"), Some("1990-12-31"));

        let tv = DiscoverQuery::new(BrowseType::Tv)
            .with_preset(find_preset(MediaKind::Tv, "Clássicos (até 1990)").unwrap());
        assert_eq!(tv.endpoint("BR").get("first_air_date.lte"), Some("1990-12-31"));
    }

    #[test]
    fn test_all_genres_preset_clears_filters() {
        let query = DiscoverQuery::new(BrowseType::Tv)
            .with_preset(find_preset(MediaKind::Tv, "Brasileiros").unwrap())
            .with_preset(find_preset(MediaKind::Tv, "Todos os Gêneros").unwrap());
        let endpoint = query.endpoint("BR");
        assert!(!endpoint.has("with_genres"));
        assert!(!endpoint.has("with_origin_country"));
        assert!(find_preset(MediaKind::Tv, "Nope").is_err());
    }

    #[test]
    fn test_find_sort_accepts_name_or_value() {
        assert_eq!(find_sort(MediaKind::Tv, "name.asc").unwrap().name, "Ordem Alfabética (A-Z)");
        assert_eq!(find_sort(MediaKind::Movie, "mais recentes").unwrap().value, "primary_release_date.desc");
    }

    #[tokio::test]
    async fn test_grid_keeps_only_posters() {
        let query = DiscoverQuery::new(BrowseType::Movie);
        let source = FakeSource::new().with(
            &query.endpoint("BR").to_string(),
            json!({"page": 1, "total_pages": 2, "results": [
                {"id": 1, "title": "A", "poster_path": "/a.jpg"},
                {"id": 2, "title": "B", "poster_path": null}
            ]}),
        );
        let page = fetch_grid(&source, &query, "BR").await.unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].id, 1);
    }

    #[tokio::test]
    async fn test_hero_requires_backdrop_and_overview() {
        let source = FakeSource::new().with(
            "/trending/all/day",
            json!({"results": [
                {"id": 1, "title": "No backdrop", "overview": "x"},
                {"id": 2, "title": "Good", "overview": "Plot", "backdrop_path": "/b.jpg"},
                {"id": 3, "name": "No overview", "backdrop_path": "/c.jpg", "overview": ""}
            ]}),
        );
        let mut rng = StdRng::seed_from_u64(11);
        let hero = fetch_hero(&source, &mut rng).await.unwrap();
        assert_eq!(hero.id, 2);

        let empty = FakeSource::new().with("/trending/all/day", json!({"results": []}));
        assert!(fetch_hero(&empty, &mut rng).await.is_none());
    }

    #[tokio::test]
    async fn test_search_filters_people_and_rejects_empty_query() {
        let source = FakeSource::new().with(
            "/search/multi?query=dark",
            json!({"results": [
                {"id": 1, "media_type": "tv", "name": "Dark", "poster_path": "/d.jpg"},
                {"id": 2, "media_type": "person", "name": "Dark Actor", "poster_path": "/p.jpg"},
                {"id": 3, "media_type": "movie", "title": "Dark Movie"}
            ]}),
        );
        let results = search(&source, "  dark ").await.unwrap().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind(), Some(MediaKind::Tv));

        assert!(matches!(search(&source, "   ").await, Err(CoreError::EmptyQuery)));
        assert_eq!(source.calls().len(), 1);

        assert_eq!(search(&source, "missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_home_rows_skip_empty_and_include_history() {
        let store = store();
        store.save_to_watched_history(
            &EntryDraft::new(42, MediaKind::Movie).with_title("X").with_poster("/x.jpg"),
        );
        let categories = [
            remote("Em Alta Hoje", "/trending/all/day"),
            Category { title: "Continuar Assistindo", source: RowSource::ContinueWatching },
            Category { title: "Últimos Assistidos", source: RowSource::WatchedHistory },
            remote("Broken", "/movie/popular"),
        ];
        let source = FakeSource::new()
            .with("/trending/all/day", json!({"results": [{"id": 5, "title": "T", "poster_path": "/t.jpg"}]}));

        let rows = home_rows(&source, &store, &categories).await;
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Em Alta Hoje", "Últimos Assistidos"]);
        assert_eq!(rows[1].items[0].kind(), Some(MediaKind::Movie));
        assert_eq!(rows[1].items[0].display_title(), "X");
    }

    #[tokio::test]
    async fn test_cursor_ignores_requests_in_flight_and_stops_at_last_page() {
        let base = DiscoverQuery::new(BrowseType::Tv);
        let source = FakeSource::new()
            .with(
                &base.clone().with_page(1).endpoint("BR").to_string(),
                json!({"page": 1, "total_pages": 2, "results": [{"id": 1, "name": "A", "poster_path": "/a.jpg"}]}),
            )
            .with(
                &base.clone().with_page(2).endpoint("BR").to_string(),
                json!({"page": 2, "total_pages": 2, "results": [{"id": 2, "name": "B", "poster_path": "/b.jpg"}]}),
            );

        let mut cursor = BrowseCursor::new(base.clone());
        let first = cursor.begin().unwrap();
        assert!(cursor.begin().is_none());
        let page = fetch_grid(&source, &first, "BR").await;
        cursor.complete(page.as_ref());
        assert_eq!(cursor.query().page, 2);
        assert_eq!((cursor.last_page(), cursor.total_pages()), (Some(1), Some(2)));

        let second = cursor.load_next(&source, "BR").await.unwrap();
        assert_eq!(second[0].id, 2);
        assert!(cursor.is_exhausted());
        assert!(cursor.load_next(&source, "BR").await.is_none());

        cursor.reset(base.with_sort("name.asc"));
        assert!(!cursor.is_exhausted());
        assert_eq!(cursor.query().page, 1);
        assert_eq!(cursor.last_page(), None);
    }
}
