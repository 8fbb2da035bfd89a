use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Longest allowed gap between inbox checks (one year).
pub const MAX_CHECK_INTERVAL_HOURS: i64 = 24 * 365;
/// Furthest back a first inbox check looks (ten years).
pub const MAX_LOOKBACK_DAYS: i64 = 3650;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub sorte: SorteConfig,
}

/// Remote catalogue endpoints and locale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Region used for watch providers and age certifications
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_poster_base_url")]
    pub poster_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_history_limit")]
    pub continue_watching_limit: usize,
    /// Overrides the default store directory under the data dir
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationConfig {
    #[serde(default = "default_check_interval_hours")]
    pub check_interval_hours: i64,
    #[serde(default = "default_first_run_lookback_days")]
    pub first_run_lookback_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerConfig {
    #[serde(default = "default_embed_base_url")]
    pub embed_base_url: String,
    #[serde(default = "default_true")]
    pub remove_from_my_list_on_play: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SorteConfig {
    #[serde(default = "default_spin_duration_ms")]
    pub spin_duration_ms: u64,
    #[serde(default = "default_base_turns")]
    pub base_turns: u32,
    #[serde(default = "default_surprise_attempts")]
    pub surprise_attempts: u32,
    #[serde(default = "default_max_random_page")]
    pub max_random_page: u32,
    #[serde(default = "default_studio_pages")]
    pub studio_pages: u32,
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_language() -> String {
    "pt-BR".to_string()
}

fn default_region() -> String {
    "BR".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/original".to_string()
}

fn default_poster_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_history_limit() -> usize {
    20
}

fn default_check_interval_hours() -> i64 {
    4
}

fn default_first_run_lookback_days() -> i64 {
    7
}

fn default_embed_base_url() -> String {
    "https://vidsrc.cc/v2/embed".to_string()
}

fn default_spin_duration_ms() -> u64 {
    10_000
}

fn default_base_turns() -> u32 {
    5
}

fn default_surprise_attempts() -> u32 {
    5
}

fn default_max_random_page() -> u32 {
    500 // TMDB refuses pages above 500
}

fn default_studio_pages() -> u32 {
    5
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language: default_language(),
            region: default_region(),
            image_base_url: default_image_base_url(),
            poster_base_url: default_poster_base_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            continue_watching_limit: default_history_limit(),
            directory: None,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            check_interval_hours: default_check_interval_hours(),
            first_run_lookback_days: default_first_run_lookback_days(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            embed_base_url: default_embed_base_url(),
            remove_from_my_list_on_play: default_true(),
        }
    }
}

impl Default for SorteConfig {
    fn default() -> Self {
        Self {
            spin_duration_ms: default_spin_duration_ms(),
            base_turns: default_base_turns(),
            surprise_attempts: default_surprise_attempts(),
            max_random_page: default_max_random_page(),
            studio_pages: default_studio_pages(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file when it exists, defaults otherwise.
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [
            ("tmdb.base_url", &self.tmdb.base_url),
            ("tmdb.image_base_url", &self.tmdb.image_base_url),
            ("tmdb.poster_base_url", &self.tmdb.poster_base_url),
            ("player.embed_base_url", &self.player.embed_base_url),
        ] {
            if !is_http_url(url) {
                return Err(anyhow::anyhow!("{} must be an http(s) URL, got {:?}", name, url));
            }
        }

        if self.tmdb.language.trim().is_empty() {
            return Err(anyhow::anyhow!("tmdb.language cannot be empty"));
        }
        if self.tmdb.region.len() != 2 {
            return Err(anyhow::anyhow!("tmdb.region must be a two-letter country code"));
        }

        if self.storage.history_limit == 0 {
            return Err(anyhow::anyhow!("storage.history_limit must be positive"));
        }
        if self.storage.continue_watching_limit == 0 {
            return Err(anyhow::anyhow!("storage.continue_watching_limit must be positive"));
        }

        if self.notifications.check_interval_hours <= 0
            || self.notifications.check_interval_hours > MAX_CHECK_INTERVAL_HOURS
        {
            return Err(anyhow::anyhow!(
                "notifications.check_interval_hours must be between 1 and {}",
                MAX_CHECK_INTERVAL_HOURS
            ));
        }
        if self.notifications.first_run_lookback_days < 0
            || self.notifications.first_run_lookback_days > MAX_LOOKBACK_DAYS
        {
            return Err(anyhow::anyhow!(
                "notifications.first_run_lookback_days must be between 0 and {}",
                MAX_LOOKBACK_DAYS
            ));
        }

        if self.sorte.spin_duration_ms == 0 {
            return Err(anyhow::anyhow!("sorte.spin_duration_ms must be positive"));
        }
        if self.sorte.base_turns == 0 {
            return Err(anyhow::anyhow!("sorte.base_turns must be positive"));
        }
        if self.sorte.surprise_attempts == 0 {
            return Err(anyhow::anyhow!("sorte.surprise_attempts must be positive"));
        }
        if self.sorte.max_random_page == 0 || self.sorte.max_random_page > 500 {
            return Err(anyhow::anyhow!("sorte.max_random_page must be between 1 and 500"));
        }
        if self.sorte.studio_pages == 0 {
            return Err(anyhow::anyhow!("sorte.studio_pages must be positive"));
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/') && !value.contains(' '))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.tmdb.language = "en-US".to_string();
        config.storage.history_limit = 50;
        config.player.remove_from_my_list_on_play = false;

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.tmdb.language, "en-US");
        assert_eq!(loaded.storage.history_limit, 50);
        assert!(!loaded.player.remove_from_my_list_on_play);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[notifications]\ncheck_interval_hours = 6\n").unwrap();

        let loaded = Config::load_from_file(&file.path().to_path_buf()).unwrap();
        assert_eq!(loaded.notifications.check_interval_hours, 6);
        assert_eq!(loaded.notifications.first_run_lookback_days, 7);
        assert_eq!(loaded.tmdb.region, "BR");
        assert_eq!(loaded.sorte.spin_duration_ms, 10_000);
        assert_eq!(loaded.storage.continue_watching_limit, 20);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let loaded = Config::load_or_default(&path).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.notifications.check_interval_hours = 0;
        assert!(config.validate().is_err());
        config.notifications.check_interval_hours = i64::MAX;
        assert!(config.validate().is_err());
        config.notifications.check_interval_hours = 4;

        config.notifications.first_run_lookback_days = MAX_LOOKBACK_DAYS + 1;
        assert!(config.validate().is_err());
        config.notifications.first_run_lookback_days = 7;

        config.tmdb.base_url = "api.themoviedb.org/3".to_string();
        assert!(config.validate().is_err());
        config.tmdb.base_url = default_base_url();

        config.storage.history_limit = 0;
        assert!(config.validate().is_err());
        config.storage.history_limit = 20;

        config.sorte.max_random_page = 900;
        assert!(config.validate().is_err());
    }
}
