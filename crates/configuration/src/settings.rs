use crate::error::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    /// Default `tracing` directive when `RUST_LOG` is not set (e.g. "debug").
    pub log_level: String,
    pub enrichment: EnrichmentSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
}

/// Where to look up release date, lyrics and link for a new song.
#[derive(Debug, Clone)]
pub struct EnrichmentSettings {
    pub base_url: String,
    /// `None` waits for the lookup as long as it takes.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl ServerSettings {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DatabaseSettings {
    /// The `postgres://` URL handed to the connection pool.
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

/// Flat view of the environment, one field per variable
/// (`REST_PORT` -> `rest_port`, `POSTGRES_HOST` -> `postgres_host`, ...).
#[derive(Debug, Deserialize)]
pub(crate) struct RawSettings {
    pub rest_host: IpAddr,
    pub rest_port: u16,
    pub log_level: String,
    #[serde(default)]
    pub enrichment_url: String,
    /// Older deployments name the lookup service `SWAGGER_URL`.
    pub swagger_url: Option<String>,
    pub enrichment_timeout_secs: Option<u64>,
    pub postgres_host: String,
    pub postgres_port: u16,
    pub postgres_user: String,
    pub postgres_password: String,
    pub postgres_db: String,
    pub postgres_max_connections: u32,
}

impl From<RawSettings> for Settings {
    fn from(raw: RawSettings) -> Self {
        Self {
            server: ServerSettings {
                host: raw.rest_host,
                port: raw.rest_port,
            },
            log_level: raw.log_level,
            enrichment: EnrichmentSettings {
                base_url: if raw.enrichment_url.trim().is_empty() {
                    raw.swagger_url.unwrap_or_default()
                } else {
                    raw.enrichment_url
                },
                timeout: raw.enrichment_timeout_secs.map(Duration::from_secs),
            },
            database: DatabaseSettings {
                host: raw.postgres_host,
                port: raw.postgres_port,
                user: raw.postgres_user,
                password: raw.postgres_password,
                name: raw.postgres_db,
                max_connections: raw.postgres_max_connections,
            },
        }
    }
}

impl Settings {
    /// Rejects settings the service cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enrichment.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "ENRICHMENT_URL (or SWAGGER_URL) must be set".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "REST_PORT must be a non-zero port".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "POSTGRES_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
