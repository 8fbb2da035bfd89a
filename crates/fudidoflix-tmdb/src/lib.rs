pub mod api;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod images;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use client::TmdbClient;
pub use endpoint::Endpoint;
pub use error::TmdbError;
pub use images::ImageUrls;
pub use traits::MetadataSource;
pub use types::{
    CastMember, Certifications, Company, Credits, Episode, Genre, GenreList, MediaItem, Page,
    Person, PersonCredits, SeasonDetails, SeasonSummary, TitleDetails, Video, VideoList,
};
