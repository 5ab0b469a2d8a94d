use std::net::SocketAddr;

use clap::Parser;
use thiserror::Error;
use url::Url;

use crate::error::ErrorStatusPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid database url: {0}")]
    InvalidDatabaseUrl(#[from] url::ParseError),

    #[error("invalid database {0}")]
    InvalidDatabasePart(&'static str),
}

/// Process configuration, parsed once at startup from flags and environment
#[derive(Debug, Clone, Parser)]
#[command(name = "feedback-api")]
#[command(about = "Session feedback collection service")]
#[command(version)]
pub struct AppConfig {
    #[arg(long, env = "FEEDBACK_DB_HOST", default_value = "127.0.0.1", help = "Database hostname")]
    pub db_host: String,

    #[arg(long, env = "FEEDBACK_DB_PORT", default_value_t = 5432, help = "Database port")]
    pub db_port: u16,

    #[arg(long, env = "FEEDBACK_DB_USERNAME", default_value = "db", help = "Database username")]
    pub db_username: String,

    #[arg(long, env = "FEEDBACK_DB_PASSWORD", default_value = "db", hide_env_values = true, help = "Database password")]
    pub db_password: String,

    #[arg(long, env = "FEEDBACK_DB_NAME", default_value = "db", help = "Database name")]
    pub db_name: String,

    /// Full connection URL; when set, the individual db-* parts are ignored
    #[arg(long, env = "FEEDBACK_DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "FEEDBACK_DB_MAX_CONNECTIONS", default_value_t = 10, help = "Connection pool size")]
    pub db_max_connections: u32,

    #[arg(long, env = "FEEDBACK_DB_CONNECT_TIMEOUT_SECS", default_value_t = 5, help = "Seconds to wait for a pooled connection")]
    pub db_connect_timeout_secs: u64,

    #[arg(long, env = "FEEDBACK_LISTEN_ADDR", default_value = "0.0.0.0:8080", help = "HTTP listen address")]
    pub listen_addr: SocketAddr,

    #[arg(long, env = "FEEDBACK_DEBUG", help = "Enable debug logging")]
    pub debug: bool,

    #[arg(
        long,
        env = "FEEDBACK_ERROR_STATUS",
        value_enum,
        default_value_t = ErrorStatusPolicy::Uniform,
        help = "How error kinds map to HTTP status codes"
    )]
    pub error_status: ErrorStatusPolicy,
}

/// Everything the database layer needs to open its pool
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl AppConfig {
    /// Postgres connection URL, either the explicit override or one built
    /// from the host/port/credential parts
    pub fn connection_url(&self) -> Result<String, ConfigError> {
        if let Some(raw) = &self.database_url {
            Url::parse(raw)?;
            return Ok(raw.clone());
        }

        let mut url = Url::parse("postgres://localhost")?;
        url.set_host(Some(&self.db_host))?;
        url.set_port(Some(self.db_port))
            .map_err(|_| ConfigError::InvalidDatabasePart("port"))?;
        url.set_username(&self.db_username)
            .map_err(|_| ConfigError::InvalidDatabasePart("username"))?;
        url.set_password(Some(&self.db_password))
            .map_err(|_| ConfigError::InvalidDatabasePart("password"))?;
        url.set_path(&format!("/{}", self.db_name));
        url.query_pairs_mut().append_pair("sslmode", "disable");
        Ok(url.into())
    }

    pub fn database_settings(&self) -> Result<DatabaseSettings, ConfigError> {
        Ok(DatabaseSettings {
            url: self.connection_url()?,
            max_connections: self.db_max_connections,
            connect_timeout_secs: self.db_connect_timeout_secs,
        })
    }
}
