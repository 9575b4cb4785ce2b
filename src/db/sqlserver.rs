//! SQL Server source database client.
//!
//! Uses Tiberius for TDS communication. DDL is written to be idempotent
//! so repeated initialization runs are safe, and all user-influenced
//! values travel as `@P1`-style driver parameters.

use crate::config::SqlServerConfig;
use crate::db::{retry_connect, RetryPolicy, SourceDatabase};
use crate::error::DatabaseError;
use crate::query::protocol::Row;
use async_trait::async_trait;
use serde_json::Value;
use tiberius::{AuthMethod, Client, Config, EncryptionLevel};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, info};

/// Idempotent DDL for the demo schema and tables.
pub(crate) const CREATE_DEMO_TABLES: &str = "\
IF NOT EXISTS (SELECT 1 FROM sys.schemas WHERE name = 'commerce')
    EXEC('CREATE SCHEMA commerce');
IF OBJECT_ID('commerce.account', 'U') IS NULL
    CREATE TABLE commerce.account (
        user_id INT IDENTITY(1,1) PRIMARY KEY,
        email VARCHAR(255) NOT NULL
    );
IF OBJECT_ID('commerce.product', 'U') IS NULL
    CREATE TABLE commerce.product (
        product_id INT IDENTITY(1,1) PRIMARY KEY,
        product_name VARCHAR(255) NOT NULL
    );";

const INSERT_ACCOUNT: &str = "INSERT INTO commerce.account (email) VALUES (@P1)";
const INSERT_PRODUCT: &str = "INSERT INTO commerce.product (product_name) VALUES (@P1)";
const SELECT_ACCOUNTS: &str = "SELECT user_id, email FROM commerce.account ORDER BY user_id";
const SELECT_PRODUCTS: &str =
    "SELECT product_id, product_name FROM commerce.product ORDER BY product_id";

/// SQL Server client for the demo source tables.
pub struct SqlServerClient {
    client: Client<Compat<TcpStream>>,
}

impl SqlServerClient {
    /// Connect to SQL Server.
    pub async fn connect(config: &SqlServerConfig) -> Result<Self, DatabaseError> {
        debug!(
            "connecting to SQL Server {}:{}/{}",
            config.host, config.port, config.database
        );

        let mut tiberius_config = Config::new();
        tiberius_config.host(&config.host);
        tiberius_config.port(config.port);
        tiberius_config.database(&config.database);
        tiberius_config.authentication(AuthMethod::sql_server(&config.username, &config.password));

        if config.encrypt {
            tiberius_config.encryption(EncryptionLevel::Required);
            if config.trust_server_certificate {
                tiberius_config.trust_cert();
            }
        } else {
            tiberius_config.encryption(EncryptionLevel::NotSupported);
        }

        let connection_failed = |message: String| DatabaseError::ConnectionFailed {
            host: config.host.clone(),
            port: config.port,
            message,
        };

        let tcp = TcpStream::connect(tiberius_config.get_addr())
            .await
            .map_err(|e| connection_failed(e.to_string()))?;
        tcp.set_nodelay(true)
            .map_err(|e| connection_failed(e.to_string()))?;

        let client = Client::connect(tiberius_config, tcp.compat_write())
            .await
            .map_err(|e| connection_failed(e.to_string()))?;

        info!(
            "connected to SQL Server {}:{}/{}",
            config.host, config.port, config.database
        );
        Ok(Self { client })
    }

    /// Connect under a retry policy, sleeping between failed attempts.
    pub async fn connect_with_retry(
        config: &SqlServerConfig,
        policy: RetryPolicy,
    ) -> Result<Self, DatabaseError> {
        retry_connect(policy, || Self::connect(config)).await
    }

    async fn run_batch(&mut self, sql: &str) -> Result<(), DatabaseError> {
        self.client
            .simple_query(sql)
            .await
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
            .into_results()
            .await
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    async fn query_rows(&mut self, sql: &str) -> Result<Vec<Row>, DatabaseError> {
        let rows = self
            .client
            .query(sql, &[])
            .await
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
            .into_first_result()
            .await
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(rows.iter().map(json_row).collect())
    }
}

#[async_trait]
impl SourceDatabase for SqlServerClient {
    async fn ensure_demo_tables(&mut self) -> Result<(), DatabaseError> {
        info!("creating SQL Server demo tables if missing");
        self.run_batch(CREATE_DEMO_TABLES).await
    }

    async fn seed_demo_data(&mut self) -> Result<(), DatabaseError> {
        info!("inserting initial demo data");
        self.insert_account("initial_user@example.com").await?;
        self.insert_product("Initial Product").await?;
        Ok(())
    }

    async fn insert_account(&mut self, email: &str) -> Result<u64, DatabaseError> {
        let result = self
            .client
            .execute(INSERT_ACCOUNT, &[&email])
            .await
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Ok(result.total())
    }

    async fn insert_product(&mut self, product_name: &str) -> Result<u64, DatabaseError> {
        let result = self
            .client
            .execute(INSERT_PRODUCT, &[&product_name])
            .await
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Ok(result.total())
    }

    async fn fetch_accounts(&mut self) -> Result<Vec<Row>, DatabaseError> {
        self.query_rows(SELECT_ACCOUNTS).await
    }

    async fn fetch_products(&mut self) -> Result<Vec<Row>, DatabaseError> {
        self.query_rows(SELECT_PRODUCTS).await
    }
}

fn json_row(row: &tiberius::Row) -> Row {
    (0..row.len()).map(|idx| column_value(row, idx)).collect()
}

/// Convert one column to a JSON value by probing likely types.
///
/// The demo tables only carry integer and varchar columns, with floats
/// and booleans handled for completeness.
fn column_value(row: &tiberius::Row, idx: usize) -> Value {
    if let Some(v) = row.try_get::<&str, _>(idx).ok().flatten() {
        Value::String(v.to_string())
    } else if let Some(v) = row.try_get::<i64, _>(idx).ok().flatten() {
        Value::Number(v.into())
    } else if let Some(v) = row.try_get::<i32, _>(idx).ok().flatten() {
        Value::Number(v.into())
    } else if let Some(v) = row.try_get::<i16, _>(idx).ok().flatten() {
        Value::Number(v.into())
    } else if let Some(v) = row.try_get::<f64, _>(idx).ok().flatten() {
        serde_json::Number::from_f64(v)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    } else if let Some(v) = row.try_get::<bool, _>(idx).ok().flatten() {
        Value::Bool(v)
    } else {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_is_idempotent() {
        assert!(CREATE_DEMO_TABLES.contains("IF NOT EXISTS"));
        assert!(CREATE_DEMO_TABLES.contains("IF OBJECT_ID('commerce.account', 'U') IS NULL"));
        assert!(CREATE_DEMO_TABLES.contains("IF OBJECT_ID('commerce.product', 'U') IS NULL"));
    }

    #[test]
    fn inserts_use_driver_parameters() {
        // Values must never be interpolated into statement text
        assert!(INSERT_ACCOUNT.contains("@P1"));
        assert!(INSERT_PRODUCT.contains("@P1"));
        assert!(!INSERT_ACCOUNT.contains('\''));
        assert!(!INSERT_PRODUCT.contains('\''));
    }

    #[test]
    fn selects_are_deterministically_ordered() {
        assert!(SELECT_ACCOUNTS.ends_with("ORDER BY user_id"));
        assert!(SELECT_PRODUCTS.ends_with("ORDER BY product_id"));
    }
}
