use color_eyre::Result;
use fudidoflix_config::{Config, CredentialStore, PathManager, API_KEY_ENV};
use fudidoflix_core::{FileStore, ModalManager, WatchStore};
use fudidoflix_tmdb::{ImageUrls, MetadataSource, TmdbClient};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs: configuration, local state and the catalogue.
pub struct AppContext {
    pub config: Config,
    pub paths: PathManager,
    pub store: WatchStore,
    pub images: ImageUrls,
    source: Option<Arc<dyn MetadataSource>>,
}

impl AppContext {
    /// Load config and open the store. A missing API key only fails the
    /// commands that talk to TMDB.
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;

        let store_dir = config
            .storage
            .directory
            .clone()
            .unwrap_or_else(|| paths.store_dir());
        let backend = FileStore::new(&store_dir)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to open store at {}: {}", store_dir.display(), e))?;
        let store = WatchStore::new(Arc::new(backend), &config.storage);

        let credentials_file = paths.credentials_file();
        let mut credentials = CredentialStore::new(credentials_file.clone());
        credentials
            .load()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

        let source = match TmdbClient::from_config(&config.tmdb, credentials.resolve_tmdb_api_key()) {
            Ok(client) => Some(Arc::new(client) as Arc<dyn MetadataSource>),
            Err(e) => {
                debug!(error = %e, "TMDB client unavailable");
                None
            }
        };

        Ok(Self {
            images: ImageUrls::from_config(&config.tmdb),
            config,
            paths,
            store,
            source,
        })
    }

    pub fn source(&self) -> Result<Arc<dyn MetadataSource>> {
        self.source.clone().ok_or_else(|| {
            color_eyre::eyre::eyre!(
                "No TMDB API key configured. Run 'fudidoflix config set-api-key' or set {}",
                API_KEY_ENV
            )
        })
    }

    pub fn region(&self) -> &str {
        &self.config.tmdb.region
    }

    pub fn modal(&self) -> Result<ModalManager> {
        Ok(ModalManager::new(
            self.source()?,
            self.store.clone(),
            self.config.player.clone(),
            self.region(),
        ))
    }

    pub fn rng(&self) -> StdRng {
        StdRng::from_entropy()
    }
}
