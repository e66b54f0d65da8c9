//! PostgreSQL settings for the account and catalog store.

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Name the server reports to Postgres in `pg_stat_activity`.
const APPLICATION_NAME: &str = "ott-api";

/// Connection and pool settings, read from `POSTGRES_*` variables.
///
/// | Variable | Default |
/// |---|---|
/// | `POSTGRES_HOST` | `localhost` |
/// | `POSTGRES_PORT` | `5432` |
/// | `POSTGRES_USER` | `ott` |
/// | `POSTGRES_PASSWORD` | empty |
/// | `POSTGRES_DATABASE` | `ott` |
/// | `POSTGRES_MAX_CONNECTIONS` | `10` |
/// | `POSTGRES_MIN_CONNECTIONS` | `1` |
/// | `POSTGRES_ACQUIRE_TIMEOUT` | `30` (seconds) |
/// | `POSTGRES_IDLE_TIMEOUT` | `600` (seconds) |
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,

    /// Pool ceiling; each request holds at most one connection
    pub max_connections: u32,
    pub min_connections: u32,

    /// Seconds to wait for a free connection before the request fails
    pub acquire_timeout: u64,

    /// Seconds an unused connection is kept open
    pub idle_timeout: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "ott".to_string(),
            password: String::new(),
            database: "ott".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: 30,
            idle_timeout: 600,
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        Self::from_vars(std::env::vars())
    }

    /// Load settings from `POSTGRES_`-prefixed key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed("POSTGRES_").from_iter(vars)
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .application_name(APPLICATION_NAME)
    }
}

// The password never reaches logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .finish_non_exhaustive()
    }
}
