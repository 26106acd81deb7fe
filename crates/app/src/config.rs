//! Client configuration.

use std::path::PathBuf;

use clap::Args;

/// Backend service endpoints.
///
/// The platform exposes three independently versioned REST services; each
/// gets its own base URL so deployments can split or co-host them freely.
#[derive(Debug, Clone, Args)]
pub struct BackendConfig {
    /// Base URL of the identity and driver service
    #[arg(
        long,
        env = "FOODIEHUB_IDENTITY_URL",
        default_value = "http://localhost:8080/api/v1"
    )]
    pub identity_url: String,

    /// Base URL of the menu service
    #[arg(
        long,
        env = "FOODIEHUB_MENU_URL",
        default_value = "http://localhost:8081/api/v2"
    )]
    pub menu_url: String,

    /// Base URL of the order and payment service
    #[arg(
        long,
        env = "FOODIEHUB_ORDERS_URL",
        default_value = "http://localhost:8082/api/v3"
    )]
    pub orders_url: String,
}

/// Client-local storage settings.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory holding client-local state files
    #[arg(long, env = "FOODIEHUB_STATE_DIR", default_value = ".foodiehub")]
    pub state_dir: PathBuf,
}

/// Full application configuration.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Backend endpoint settings.
    #[command(flatten)]
    pub backends: BackendConfig,

    /// Local storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,
}
