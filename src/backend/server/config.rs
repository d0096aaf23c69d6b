/**
 * Server Configuration
 *
 * This module handles loading of server configuration and opening of the
 * SQLite database.
 *
 * # Configuration Sources
 *
 * Values are resolved in this order, later sources winning:
 *
 * 1. Built-in defaults (port 3000, database under the user data directory)
 * 2. A TOML file named by `LICENSE_SERVER_CONFIG`, if set
 * 3. `DATABASE_URL`, `SERVER_PORT` and `RUST_LOG` environment variables
 *
 * A `.env` file is read first so the variables above can live there during
 * development.
 *
 * # Error Handling
 *
 * Unlike optional services, the database is required. Failing to open it or
 * to run migrations aborts startup.
 */

use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::shared::ConfigError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_FILTER: &str = "info,license_inventory=debug";

/// Settings of the license server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// sqlx SQLite URL, e.g. `sqlite://inventory.db?mode=rwc`
    pub database_url: String,
    pub port: u16,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            port: DEFAULT_PORT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut config = match std::env::var("LICENSE_SERVER_CONFIG") {
            Ok(path) => {
                tracing::info!("Loading server configuration from {}", path);
                Self::from_toml_str(&std::fs::read_to_string(path)?)?
            }
            Err(_) => Self::default(),
        };

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            config.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SERVER_PORT",
                value: port.clone(),
            })?;
        }
        if let Ok(filter) = std::env::var("RUST_LOG") {
            config.log_filter = filter;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("database_url"));
        }
        if !self.database_url.starts_with("sqlite:") {
            return Err(ConfigError::InvalidValue {
                key: "database_url",
                value: self.database_url.clone(),
            });
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Database file under the platform data directory
fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("license-inventory")
        .join("inventory.db")
}

fn default_database_url() -> String {
    format!("sqlite://{}?mode=rwc", default_database_path().display())
}

/// Open the database and bring its schema up to date
pub async fn load_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    tracing::info!("Connecting to database...");
    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database ready");

    Ok(pool)
}

/// Private in-memory database with the schema applied.
///
/// The pool keeps a single connection alive forever, since every new
/// in-memory connection would see an empty database.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    Ok(pool)
}
