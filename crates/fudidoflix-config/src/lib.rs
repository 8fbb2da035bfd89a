pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{
    Config, NotificationConfig, PlayerConfig, SorteConfig, StorageConfig, TmdbConfig, MAX_CHECK_INTERVAL_HOURS,
    MAX_LOOKBACK_DAYS,
};
pub use credentials::{CredentialStore, API_KEY_ENV};
pub use paths::{BASE_PATH_ENV, PathManager, container_base_path};
