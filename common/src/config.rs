//! Service configuration.
//!
//! Values come from the process environment. Parsing goes through a lookup
//! function so that tests never have to touch the real environment.

use std::path::PathBuf;
use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::errors::{AppError, AppResult};

/// Origins allowed to make cross-origin browser requests.
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "https://delightful-bay-025c9560f.5.azurestaticapps.net",
];

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_SQLITE_MAX_CONNECTIONS: u32 = 4;

/// Transport encryption policy for the primary store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SslPolicy {
    /// Never negotiate TLS.
    Disable,
    /// Use TLS when the server offers it.
    #[default]
    Prefer,
    /// Refuse to connect without TLS.
    Require,
}

impl SslPolicy {
    /// Maps the policy to the driver's SSL mode.
    pub fn ssl_mode(self) -> PgSslMode {
        match self {
            SslPolicy::Disable => PgSslMode::Disable,
            SslPolicy::Prefer => PgSslMode::Prefer,
            SslPolicy::Require => PgSslMode::Require,
        }
    }
}

impl FromStr for SslPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "disable" => Ok(SslPolicy::Disable),
            "prefer" => Ok(SslPolicy::Prefer),
            "require" => Ok(SslPolicy::Require),
            other => Err(AppError::Config(format!(
                "DB_SSL_MODE must be one of disable, prefer, require (got `{}`)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for SslPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SslPolicy::Disable => write!(f, "disable"),
            SslPolicy::Prefer => write!(f, "prefer"),
            SslPolicy::Require => write!(f, "require"),
        }
    }
}

/// Connection parameters for the primary (PostgreSQL) store.
#[derive(Clone)]
pub struct PrimaryStoreConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub ssl: SslPolicy,
}

impl PrimaryStoreConfig {
    /// Builds fresh driver options for a single connection attempt.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(self.ssl.ssl_mode())
    }
}

impl std::fmt::Debug for PrimaryStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimaryStoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .field("ssl", &self.ssl)
            .finish()
    }
}

/// Settings for the secondary (SQLite) store.
#[derive(Debug, Clone)]
pub struct SecondaryStoreConfig {
    /// Database file location.
    pub path: PathBuf,
    /// Upper bound on concurrently checked-out connections.
    pub max_connections: u32,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service_name: String,
    /// Deployment environment label, informational only.
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub primary: PrimaryStoreConfig,
    pub secondary: SecondaryStoreConfig,
    pub cors_origins: Vec<String>,
    /// Enables the unrestricted SQL execution endpoint.
    pub allow_raw_sql: bool,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn load_with_service(service_name: &str) -> AppResult<Self> {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let primary = PrimaryStoreConfig {
            host: get("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or("DB_PORT", get("DB_PORT"), 5432)?,
            database: get("DB_NAME").unwrap_or_else(|| "postgres".to_string()),
            user: get("DB_USER").unwrap_or_else(|| "postgres".to_string()),
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            ssl: match get("DB_SSL_MODE") {
                Some(v) => v.parse()?,
                None => SslPolicy::default(),
            },
        };

        let secondary = SecondaryStoreConfig {
            path: get("SQLITE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_sqlite_path),
            max_connections: parse_or(
                "SQLITE_MAX_CONNECTIONS",
                get("SQLITE_MAX_CONNECTIONS"),
                DEFAULT_SQLITE_MAX_CONNECTIONS,
            )?
            .max(1),
        };

        let cors_origins = match get("CORS_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            service_name: service_name.to_string(),
            environment: get("ENV").unwrap_or_else(|| "local".to_string()),
            host: get("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or("SERVER_PORT", get("SERVER_PORT"), DEFAULT_PORT)?,
            primary,
            secondary,
            cors_origins,
            allow_raw_sql: get("ALLOW_RAW_SQL").map(|v| parse_flag(&v)).unwrap_or(false),
        })
    }
}

/// The secondary store file sits in a `db/` directory next to the running
/// executable. Falls back to the working directory if the executable path
/// is unavailable.
fn default_sqlite_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_default()
        .join("db")
        .join("hlth_demo.db")
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> AppResult<T> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value `{}`", key, v))),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
