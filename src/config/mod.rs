//! Environment-backed configuration.
//!
//! All endpoints, credentials and table locations are supplied via named
//! environment variables with documented defaults; no core behavior depends
//! on how these values are loaded, so every struct can equally be built in
//! code.
//!
//! | Variable                 | Default       | Description                      |
//! |--------------------------|---------------|----------------------------------|
//! | `SOURCE_DB`              | `sqlserver`   | `sqlserver` or `postgres`        |
//! | `TRINO_HOST`             | `localhost`   | Query endpoint host              |
//! | `TRINO_PORT`             | `8080`        | Query endpoint port              |
//! | `TRINO_USER`             | `user`        | Identity header value            |
//! | `TRINO_CATALOG`          | `iceberg`     | Lakehouse catalog                |
//! | `TRINO_SCHEMA`           | `cdc`         | Lakehouse schema                 |
//! | `TRINO_TIMEOUT_SECS`     | `30`          | Per-request timeout              |
//! | `CREATE_ICEBERG_TABLES`  | `0`           | Register Iceberg tables on init  |
//! | `SQLSERVER_HOST`         | `localhost`   | SQL Server host                  |
//! | `SQLSERVER_PORT`         | `1433`        | SQL Server port                  |
//! | `SQLSERVER_USER`         | `sa`          | SQL Server login                 |
//! | `SQLSERVER_PASSWORD`     | (demo value)  | SQL Server password              |
//! | `SQLSERVER_DB`           | `commerce`    | SQL Server database              |
//! | `POSTGRES_HOST`          | `localhost`   | Postgres host                    |
//! | `POSTGRES_PORT`          | `5432`        | Postgres port                    |
//! | `POSTGRES_USER`          | `postgres`    | Postgres role                    |
//! | `POSTGRES_PASSWORD`      | `postgres`    | Postgres password                |
//! | `POSTGRES_DB`            | `commerce`    | Postgres database                |
//! | `DB_CONNECT_ATTEMPTS`    | `10`          | Connection retry attempts        |
//! | `DB_CONNECT_DELAY_SECS`  | `5`           | Delay between retry attempts     |

use crate::db::RetryPolicy;
use crate::error::ConfigError;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which family of source database the demo writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// SQL-Server-family source, accessed via TDS
    SqlServer,
    /// Postgres-family source
    Postgres,
}

impl FromStr for SourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlserver" | "mssql" => Ok(Self::SqlServer),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(ConfigError::InvalidValue {
                name: "SOURCE_DB".to_string(),
                message: format!("expected 'sqlserver' or 'postgres', got '{other}'"),
            }),
        }
    }
}

/// Settings for the HTTP query endpoint and the lakehouse target it serves.
#[derive(Debug, Clone)]
pub struct TrinoConfig {
    /// Endpoint host
    pub host: String,
    /// Endpoint port
    pub port: u16,
    /// Identity header value
    pub user: String,
    /// Lakehouse catalog holding the demo tables
    pub catalog: String,
    /// Lakehouse schema holding the demo tables
    pub schema: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for TrinoConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            user: "user".to_string(),
            catalog: "iceberg".to_string(),
            schema: "cdc".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl TrinoConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: env_or("TRINO_HOST", &defaults.host),
            port: parse_env("TRINO_PORT", defaults.port)?,
            user: env_or("TRINO_USER", &defaults.user),
            catalog: env_or("TRINO_CATALOG", &defaults.catalog),
            schema: env_or("TRINO_SCHEMA", &defaults.schema),
            request_timeout: Duration::from_secs(parse_env(
                "TRINO_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
        })
    }
}

/// Connection settings for a SQL Server source database.
#[derive(Clone)]
pub struct SqlServerConfig {
    /// Database host
    pub host: String,
    /// Database port
    pub port: u16,
    /// Login name
    pub username: String,
    /// Login password
    pub password: String,
    /// Database name
    pub database: String,
    /// Require an encrypted connection
    pub encrypt: bool,
    /// Accept the server certificate without validation
    pub trust_server_certificate: bool,
}

impl Default for SqlServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1433,
            username: "sa".to_string(),
            password: "YourStrongPassword123!".to_string(),
            database: "commerce".to_string(),
            encrypt: true,
            trust_server_certificate: true,
        }
    }
}

impl SqlServerConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: env_or("SQLSERVER_HOST", &defaults.host),
            port: parse_env("SQLSERVER_PORT", defaults.port)?,
            username: env_or("SQLSERVER_USER", &defaults.username),
            password: env_or("SQLSERVER_PASSWORD", &defaults.password),
            database: env_or("SQLSERVER_DB", &defaults.database),
            encrypt: parse_flag("SQLSERVER_ENCRYPT", defaults.encrypt)?,
            trust_server_certificate: parse_flag(
                "SQLSERVER_TRUST_CERT",
                defaults.trust_server_certificate,
            )?,
        })
    }
}

// Prevent the password from leaking into logs
impl fmt::Debug for SqlServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("encrypt", &self.encrypt)
            .field("trust_server_certificate", &self.trust_server_certificate)
            .finish()
    }
}

/// Connection settings for a Postgres source database.
#[derive(Clone)]
pub struct PostgresConfig {
    /// Database host
    pub host: String,
    /// Database port
    pub port: u16,
    /// Role name
    pub username: String,
    /// Role password
    pub password: String,
    /// Database name
    pub database: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            username: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "commerce".to_string(),
        }
    }
}

impl PostgresConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: env_or("POSTGRES_HOST", &defaults.host),
            port: parse_env("POSTGRES_PORT", defaults.port)?,
            username: env_or("POSTGRES_USER", &defaults.username),
            password: env_or("POSTGRES_PASSWORD", &defaults.password),
            database: env_or("POSTGRES_DB", &defaults.database),
        })
    }
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Complete settings for the init and smoke binaries.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Source database family to target
    pub source: SourceKind,
    /// SQL Server settings (used when `source` is `SqlServer`)
    pub sqlserver: SqlServerConfig,
    /// Postgres settings (used when `source` is `Postgres`)
    pub postgres: PostgresConfig,
    /// Query endpoint and lakehouse settings
    pub trino: TrinoConfig,
    /// Register Iceberg tables during initialization
    pub create_iceberg_tables: bool,
    /// Retry policy for source database connections
    pub connect_retry: RetryPolicy,
}

impl Settings {
    /// Load every setting from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let retry_defaults = RetryPolicy::default();
        Ok(Self {
            source: env_or("SOURCE_DB", "sqlserver").parse()?,
            sqlserver: SqlServerConfig::from_env()?,
            postgres: PostgresConfig::from_env()?,
            trino: TrinoConfig::from_env()?,
            create_iceberg_tables: parse_flag("CREATE_ICEBERG_TABLES", false)?,
            connect_retry: RetryPolicy {
                max_attempts: parse_env("DB_CONNECT_ATTEMPTS", retry_defaults.max_attempts)?,
                delay: Duration::from_secs(parse_env(
                    "DB_CONNECT_DELAY_SECS",
                    retry_defaults.delay.as_secs(),
                )?),
            },
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name: name.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(name: &str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(raw) => parse_flag_value(&raw).ok_or_else(|| ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("expected a boolean flag, got '{}'", raw.trim()),
        }),
        Err(_) => Ok(default),
    }
}

fn parse_flag_value(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trino_defaults_match_demo_endpoint() {
        let config = TrinoConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.catalog, "iceberg");
        assert_eq!(config.schema, "cdc");
        assert_eq!(config.user, "user");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn source_kind_parses_aliases() {
        assert_eq!("sqlserver".parse::<SourceKind>().unwrap(), SourceKind::SqlServer);
        assert_eq!("MSSQL".parse::<SourceKind>().unwrap(), SourceKind::SqlServer);
        assert_eq!("postgres".parse::<SourceKind>().unwrap(), SourceKind::Postgres);
        assert_eq!("PostgreSQL".parse::<SourceKind>().unwrap(), SourceKind::Postgres);
        assert!("oracle".parse::<SourceKind>().is_err());
    }

    #[test]
    fn passwords_are_redacted_in_debug_output() {
        let debug = format!("{:?}", SqlServerConfig::default());
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("YourStrongPassword123!"));

        let config = PostgresConfig {
            password: "pg-secret".to_string(),
            ..PostgresConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("pg-secret"));
    }

    #[test]
    fn flag_values_parse_case_insensitively() {
        for raw in ["1", "true", "True", "TRUE", "yes", "YES", " Yes "] {
            assert_eq!(parse_flag_value(raw), Some(true), "raw = {raw:?}");
        }
        for raw in ["0", "false", "False", "FALSE", "no", "No", ""] {
            assert_eq!(parse_flag_value(raw), Some(false), "raw = {raw:?}");
        }
        assert_eq!(parse_flag_value("enabled"), None);
        assert_eq!(parse_flag_value("2"), None);
    }

    #[test]
    fn sqlserver_defaults() {
        let config = SqlServerConfig::default();
        assert_eq!(config.port, 1433);
        assert_eq!(config.username, "sa");
        assert_eq!(config.database, "commerce");
        assert!(config.encrypt);
        assert!(config.trust_server_certificate);
    }
}
