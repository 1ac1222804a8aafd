use core_config::{AppInfo, FromEnv, app_info, cors::CorsConfig, server::ServerConfig};
use database::common::RetryConfig;
use database::postgres::PostgresConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    /// Startup connection policy (`DB_CONNECT_RETRIES`, `DB_CONNECT_RETRY_DELAY_MS`)
    pub database_retry: RetryConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub environment: Environment,
    /// Send internal error detail to clients
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let database_retry = RetryConfig::from_env()?;
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=5151
        let cors = CorsConfig::from_env()?;
        let debug = environment.debug_enabled()?;

        Ok(Self {
            app: app_info!(),
            database,
            database_retry,
            server,
            cors,
            environment,
            debug,
        })
    }
}
