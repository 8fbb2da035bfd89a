use fudidoflix_models::{MediaId, MediaKind};
use serde::de::DeserializeOwned;
use crate::endpoint::Endpoint;
use crate::error::TmdbError;
use crate::traits::MetadataSource;
use crate::types::{
    Certifications, Company, ContentRatings, Credits, GenreList, MediaItem, Page, Person,
    PersonCredits, ReleaseDates, SeasonDetails, TitleDetails, VideoList,
};

/// Fetch `endpoint` and decode its body as `T`.
pub async fn get<T: DeserializeOwned>(
    source: &dyn MetadataSource,
    endpoint: &Endpoint,
) -> Result<T, TmdbError> {
    let value = source.fetch(endpoint).await?;
    serde_json::from_value(value).map_err(|source| TmdbError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Any listing endpoint (`/discover/...`, `/movie/popular`, ...).
pub async fn media_page(
    source: &dyn MetadataSource,
    endpoint: &Endpoint,
) -> Result<Page<MediaItem>, TmdbError> {
    get(source, endpoint).await
}

pub async fn trending_today(source: &dyn MetadataSource) -> Result<Page<MediaItem>, TmdbError> {
    media_page(source, &Endpoint::new("/trending/all/day")).await
}

pub async fn search_multi(
    source: &dyn MetadataSource,
    query: &str,
) -> Result<Page<MediaItem>, TmdbError> {
    media_page(source, &Endpoint::new("/search/multi").param("query", query)).await
}

pub async fn details(
    source: &dyn MetadataSource,
    kind: MediaKind,
    id: MediaId,
) -> Result<TitleDetails, TmdbError> {
    get(source, &Endpoint::new(format!("/{}/{}", kind, id))).await
}

pub async fn credits(
    source: &dyn MetadataSource,
    kind: MediaKind,
    id: MediaId,
) -> Result<Credits, TmdbError> {
    get(source, &Endpoint::new(format!("/{}/{}/credits", kind, id))).await
}

pub async fn videos(
    source: &dyn MetadataSource,
    kind: MediaKind,
    id: MediaId,
) -> Result<VideoList, TmdbError> {
    get(source, &Endpoint::new(format!("/{}/{}/videos", kind, id))).await
}

/// Release dates for movies, content ratings for series.
pub async fn certifications(
    source: &dyn MetadataSource,
    kind: MediaKind,
    id: MediaId,
) -> Result<Certifications, TmdbError> {
    match kind {
        MediaKind::Movie => {
            let dates: ReleaseDates =
                get(source, &Endpoint::new(format!("/movie/{}/release_dates", id))).await?;
            Ok(Certifications::Movie(dates))
        }
        MediaKind::Tv => {
            let ratings: ContentRatings =
                get(source, &Endpoint::new(format!("/tv/{}/content_ratings", id))).await?;
            Ok(Certifications::Tv(ratings))
        }
    }
}

pub async fn season(
    source: &dyn MetadataSource,
    series_id: MediaId,
    season_number: u32,
) -> Result<SeasonDetails, TmdbError> {
    get(
        source,
        &Endpoint::new(format!("/tv/{}/season/{}", series_id, season_number)),
    )
    .await
}

pub async fn genres(source: &dyn MetadataSource, kind: MediaKind) -> Result<GenreList, TmdbError> {
    get(source, &Endpoint::new(format!("/genre/{}/list", kind))).await
}

pub async fn person_credits(
    source: &dyn MetadataSource,
    person_id: MediaId,
    kind: MediaKind,
) -> Result<PersonCredits, TmdbError> {
    get(
        source,
        &Endpoint::new(format!("/person/{}/{}_credits", person_id, kind)),
    )
    .await
}

pub async fn popular_people(source: &dyn MetadataSource) -> Result<Page<Person>, TmdbError> {
    get(source, &Endpoint::new("/person/popular")).await
}

pub async fn search_people(
    source: &dyn MetadataSource,
    query: &str,
) -> Result<Page<Person>, TmdbError> {
    get(source, &Endpoint::new("/search/person").param("query", query)).await
}

pub async fn search_companies(
    source: &dyn MetadataSource,
    query: &str,
) -> Result<Page<Company>, TmdbError> {
    get(source, &Endpoint::new("/search/company").param("query", query)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeSource;
    use serde_json::json;

    #[tokio::test]
    async fn test_details_decodes_payload() {
        let source = FakeSource::new().with(
            "/movie/42",
            json!({"id": 42, "title": "X", "runtime": 95, "genres": [{"id": 18, "name": "Drama"}]}),
        );
        let details = details(&source, MediaKind::Movie, 42).await.unwrap();
        assert_eq!(details.display_title(), "X");
        assert_eq!(details.runtime, Some(95));
        assert_eq!(source.calls(), vec!["/movie/42".to_string()]);
    }

    #[tokio::test]
    async fn test_decode_error_names_endpoint() {
        let source = FakeSource::new().with("/tv/1", json!({"id": "not-a-number"}));
        let err = details(&source, MediaKind::Tv, 1).await.unwrap_err();
        match err {
            TmdbError::Decode { endpoint, .. } => assert_eq!(endpoint, "/tv/1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_certifications_pick_endpoint_by_kind() {
        let source = FakeSource::new()
            .with("/movie/7/release_dates", json!({"results": []}))
            .with("/tv/7/content_ratings", json!({"results": [{"iso_3166_1": "BR", "rating": "14"}]}));

        assert!(matches!(
            certifications(&source, MediaKind::Movie, 7).await.unwrap(),
            Certifications::Movie(_)
        ));
        let tv = certifications(&source, MediaKind::Tv, 7).await.unwrap();
        assert_eq!(tv.for_region("BR"), Some("14".to_string()));
    }

    #[tokio::test]
    async fn test_search_sends_query_param() {
        let source = FakeSource::new().with("/search/multi?query=cidade de deus", json!({"results": []}));
        let page = search_multi(&source, "cidade de deus").await.unwrap();
        assert!(page.results.is_empty());
    }
}
