//! RPG Assistant client state
//!
//! Wires the API client, durable storage and the session/campaign stores
//! together. Build one [`App`] per process and hand its stores to whatever
//! needs them; clones of a store share state.
//!
//! # Example
//!
//! ```rust,no_run
//! use rpg_assistant::{init_logging, App, AppConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging("rpg_assistant=info");
//!
//!     let app = App::open(AppConfig::new("http://localhost:8000", "rpg_assistant_kv.db"))?;
//!     if !app.session.is_authenticated() {
//!         app.session.login("gm@example.com", "hunter2").await?;
//!     }
//!     app.campaigns.load_campaigns().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub use api_client::{
    ApiClient, ApiClientConfig, ApiError, Campaign, CampaignId, CampaignUpdate, NewCampaign, User,
};
pub use app_state::{CampaignState, CampaignStore, SessionState, SessionStore, StoreError};
pub use storage::{DurableStorage, KvConfig, KvError, KvStore};

/// Errors raised while assembling an [`App`]
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage could not be opened
    #[error("Storage error: {0}")]
    Storage(#[from] KvError),

    /// API client could not be built
    #[error("API client error: {0}")]
    Api(#[from] ApiError),
}

/// Top-level configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// API client settings
    pub api: ApiClientConfig,
    /// Durable storage settings
    pub storage: KvConfig,
}

impl AppConfig {
    /// Create a configuration for a service URL and storage path
    pub fn new(base_url: impl Into<String>, storage_path: impl Into<String>) -> Self {
        Self {
            api: ApiClientConfig::new(base_url),
            storage: KvConfig::new(storage_path),
        }
    }
}

/// Process-wide stores
#[derive(Clone)]
pub struct App {
    /// Session store
    pub session: SessionStore,
    /// Campaign store, authorized through `session`
    pub campaigns: CampaignStore,
}

impl App {
    /// Open storage, build the client and restore any persisted session
    pub fn open(config: AppConfig) -> Result<Self, AppError> {
        let storage = KvStore::new(config.storage)?;
        Self::with_storage(config.api, Arc::new(storage)).map_err(AppError::from)
    }

    /// Build the stores on top of an existing storage backend
    pub fn with_storage(
        api: ApiClientConfig,
        storage: Arc<dyn DurableStorage>,
    ) -> Result<Self, ApiError> {
        let client = ApiClient::new(api)?;
        let session = SessionStore::new(client.clone(), storage);
        let campaigns = CampaignStore::new(client, session.clone());

        tracing::debug!(authenticated = session.is_authenticated(), "app state ready");
        Ok(Self { session, campaigns })
    }
}

/// Install a global `tracing` subscriber
///
/// `RUST_LOG` takes precedence over `default_directive`. Returns `false`
/// when a subscriber was already installed.
pub fn init_logging(default_directive: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}
