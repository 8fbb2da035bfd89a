use chrono::{Datelike, NaiveDate};
use fudidoflix_models::{EntryDraft, MediaId, MediaKind};
use serde::{Deserialize, Deserializer, Serialize};

/// TMDB sends `null` for missing numbers and lists as often as it omits them.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default, deserialize_with = "null_default")]
    pub total_pages: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

/// A title as returned by trending, discover, search and credit listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    pub id: MediaId,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub vote_count: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub genre_ids: Vec<u32>,
}

impl MediaItem {
    pub fn display_title(&self) -> &str {
        non_empty(&self.title)
            .or_else(|| non_empty(&self.name))
            .unwrap_or("Sem título")
    }

    /// Explicit `media_type`, else inferred from the presence of `title`.
    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::infer(self.media_type.as_deref(), non_empty(&self.title).is_some())
    }

    pub fn is_person(&self) -> bool {
        self.media_type.as_deref() == Some("person")
    }

    pub fn has_poster(&self) -> bool {
        non_empty(&self.poster_path).is_some()
    }

    pub fn has_backdrop(&self) -> bool {
        non_empty(&self.backdrop_path).is_some()
    }

    pub fn has_overview(&self) -> bool {
        non_empty(&self.overview).is_some()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(self.release_date.as_deref()).or_else(|| parse_date(self.first_air_date.as_deref()))
    }

    pub fn year(&self) -> Option<i32> {
        self.date().map(|d| d.year())
    }

    /// Candidate storage entry; the kind falls back to `fallback` when the
    /// payload does not say.
    pub fn to_draft(&self, fallback: Option<MediaKind>) -> EntryDraft {
        EntryDraft {
            id: Some(self.id),
            kind: self.kind().or(fallback),
            title: self.title.clone(),
            name: self.name.clone(),
            poster_path: self.poster_path.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenreList {
    #[serde(default, deserialize_with = "null_default")]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonSummary {
    #[serde(default, deserialize_with = "null_default")]
    pub season_number: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub episode_count: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl SeasonSummary {
    /// Specials (season 0) and empty seasons are not offered.
    pub fn is_playable(&self) -> bool {
        self.season_number > 0 && self.episode_count > 0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    #[serde(default, deserialize_with = "null_default")]
    pub season_number: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub episode_number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub still_path: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
}

impl Episode {
    pub fn aired_on(&self) -> Option<NaiveDate> {
        parse_date(self.air_date.as_deref())
    }

    pub fn display_name(&self) -> String {
        match non_empty(&self.name) {
            Some(name) => name.to_string(),
            None => format!("Episódio {}", self.episode_number),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonDetails {
    #[serde(default, deserialize_with = "null_default")]
    pub season_number: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub episodes: Vec<Episode>,
}

/// `/movie/{id}` or `/tv/{id}`; fields of the other kind stay empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitleDetails {
    pub id: MediaId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default, deserialize_with = "null_default")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_default")]
    pub seasons: Vec<SeasonSummary>,
    #[serde(default)]
    pub last_episode_to_air: Option<Episode>,
}

impl TitleDetails {
    pub fn display_title(&self) -> &str {
        non_empty(&self.title)
            .or_else(|| non_empty(&self.name))
            .unwrap_or("Sem título")
    }

    pub fn year(&self) -> Option<i32> {
        parse_date(self.release_date.as_deref())
            .or_else(|| parse_date(self.first_air_date.as_deref()))
            .map(|d| d.year())
    }

    pub fn playable_seasons(&self) -> Vec<SeasonSummary> {
        self.seasons.iter().filter(|s| s.is_playable()).cloned().collect()
    }

    pub fn to_draft(&self, kind: MediaKind) -> EntryDraft {
        EntryDraft {
            id: Some(self.id),
            kind: Some(kind),
            title: self.title.clone(),
            name: self.name.clone(),
            poster_path: self.poster_path.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: MediaId,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default, deserialize_with = "null_default")]
    pub cast: Vec<CastMember>,
}

/// A person's filmography: both lists carry plain title records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonCredits {
    #[serde(default, deserialize_with = "null_default")]
    pub cast: Vec<MediaItem>,
    #[serde(default, deserialize_with = "null_default")]
    pub crew: Vec<MediaItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub key: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
    #[serde(default, deserialize_with = "null_default")]
    pub official: bool,
    #[serde(default)]
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Video {
    pub fn is_youtube(&self) -> bool {
        self.site == "YouTube"
    }

    pub fn youtube_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default, deserialize_with = "null_default")]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseDate {
    #[serde(default)]
    pub certification: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountryReleaseDates {
    pub iso_3166_1: String,
    #[serde(default, deserialize_with = "null_default")]
    pub release_dates: Vec<ReleaseDate>,
}

/// `/movie/{id}/release_dates`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseDates {
    #[serde(default, deserialize_with = "null_default")]
    pub results: Vec<CountryReleaseDates>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentRating {
    pub iso_3166_1: String,
    #[serde(default)]
    pub rating: Option<String>,
}

/// `/tv/{id}/content_ratings`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentRatings {
    #[serde(default, deserialize_with = "null_default")]
    pub results: Vec<ContentRating>,
}

/// Age certifications, shaped by media kind.
#[derive(Debug, Clone)]
pub enum Certifications {
    Movie(ReleaseDates),
    Tv(ContentRatings),
}

impl Certifications {
    /// First non-empty certification for `region`.
    pub fn for_region(&self, region: &str) -> Option<String> {
        match self {
            Certifications::Movie(dates) => dates
                .results
                .iter()
                .find(|r| r.iso_3166_1 == region)
                .and_then(|r| {
                    r.release_dates
                        .iter()
                        .find_map(|d| non_empty(&d.certification).map(str::to_string))
                }),
            Certifications::Tv(ratings) => ratings
                .results
                .iter()
                .find(|r| r.iso_3166_1 == region)
                .and_then(|r| non_empty(&r.rating).map(str::to_string)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: MediaId,
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub popularity: f64,
    #[serde(default)]
    pub known_for_department: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub id: MediaId,
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_media_item_tolerates_nulls() {
        let item: MediaItem = serde_json::from_value(json!({
            "id": 5,
            "name": "Dark",
            "poster_path": null,
            "popularity": null,
            "genre_ids": null,
            "first_air_date": "2017-12-01"
        }))
        .unwrap();
        assert_eq!(item.kind(), Some(MediaKind::Tv));
        assert!(!item.has_poster());
        assert_eq!(item.popularity, 0.0);
        assert_eq!(item.year(), Some(2017));
        assert_eq!(item.display_title(), "Dark");
    }

    #[test]
    fn test_media_item_kind_prefers_explicit_type() {
        let item = MediaItem {
            id: 1,
            media_type: Some("tv".to_string()),
            title: Some("Odd".to_string()),
            ..MediaItem::default()
        };
        assert_eq!(item.kind(), Some(MediaKind::Tv));

        let movie = MediaItem {
            id: 2,
            title: Some("Heat".to_string()),
            ..MediaItem::default()
        };
        assert_eq!(movie.kind(), Some(MediaKind::Movie));
    }

    #[test]
    fn test_playable_seasons_skip_specials_and_empty() {
        let details: TitleDetails = serde_json::from_value(json!({
            "id": 9,
            "name": "Show",
            "seasons": [
                {"season_number": 0, "episode_count": 3},
                {"season_number": 1, "episode_count": 8},
                {"season_number": 2, "episode_count": 0}
            ]
        }))
        .unwrap();
        let seasons = details.playable_seasons();
        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].season_number, 1);
    }

    #[test]
    fn test_certification_lookup() {
        let movie: ReleaseDates = serde_json::from_value(json!({
            "results": [
                {"iso_3166_1": "US", "release_dates": [{"certification": "R"}]},
                {"iso_3166_1": "BR", "release_dates": [{"certification": ""}, {"certification": "16"}]}
            ]
        }))
        .unwrap();
        assert_eq!(Certifications::Movie(movie).for_region("BR"), Some("16".to_string()));

        let tv: ContentRatings = serde_json::from_value(json!({
            "results": [{"iso_3166_1": "BR", "rating": ""}]
        }))
        .unwrap();
        assert_eq!(Certifications::Tv(tv).for_region("BR"), None);
    }
}
