//! REST API server exposing the archive fetch routine

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::{ConnectionResponse, NseDataResponse, WELCOME_TEXT};
pub use routes::create_router;
pub use state::AppState;

use crate::archive::ArchiveFetcher;
use crate::config::{ConfigError, FetchConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host address (default: "0.0.0.0")
    pub host: String,
    /// Server port (default: 5000)
    pub port: u16,
    /// Fetch routine settings
    pub fetch: FetchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 5000,
            fetch: FetchConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Creates a new server configuration
    pub fn new(host: impl Into<String>, port: u16, fetch: FetchConfig) -> Self {
        ServerConfig {
            host: host.into(),
            port,
            fetch,
        }
    }

    /// Reads `HOST`, `PORT` and the fetch variables from the environment.
    ///
    /// An unparseable `PORT` falls back to the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();
        let host = std::env::var("HOST").unwrap_or(defaults.host);
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(defaults.port);
        Ok(ServerConfig::new(host, port, FetchConfig::from_env()?))
    }
}

/// Runs the API server
///
/// # Arguments
/// * `config` - Server configuration
///
/// # Returns
/// Returns an error if the server fails to start or encounters a fatal error
///
/// # Example
/// ```rust,no_run
/// use nse_api::server::{run_server, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ServerConfig::default();
///     run_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    tracing::info!(
        port = ?std::env::var("PORT").ok(),
        mode = %config.fetch.mode,
        candidates = config.fetch.url_templates.len(),
        "starting NSE API"
    );

    let fetcher = ArchiveFetcher::new(config.fetch);
    let state = Arc::new(AppState::new(Arc::new(fetcher)));
    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
