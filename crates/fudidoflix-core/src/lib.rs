pub mod catalog;
pub mod clock;
pub mod details;
pub mod episodes;
pub mod error;
pub mod notifications;
pub mod player;
pub mod request;
pub mod sorte;
pub mod store;
pub mod watch_store;

pub use catalog::{BrowseCursor, BrowseType, DiscoverQuery, Row, HOME_CATEGORIES};
pub use clock::{Clock, FixedClock, SystemClock};
pub use details::DetailsView;
pub use episodes::{EpisodeRow, SeasonCache};
pub use error::CoreError;
pub use notifications::{check_for_updates, ScanOutcome};
pub use player::{ModalManager, ModalState, PlayOutcome, PlaybackTarget, PlayerSession};
pub use request::{RequestScope, RequestToken, View};
pub use sorte::{GridSort, SurpriseMode, Wheel};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use watch_store::WatchStore;
