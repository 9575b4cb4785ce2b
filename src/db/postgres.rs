//! Postgres source database client.
//!
//! Uses tokio-postgres with a spawned connection driver task. DDL is
//! idempotent via `IF NOT EXISTS`, and all user-influenced values travel
//! as `$1`-style driver parameters.

use crate::config::PostgresConfig;
use crate::db::{retry_connect, RetryPolicy, SourceDatabase};
use crate::error::DatabaseError;
use crate::query::protocol::Row;
use async_trait::async_trait;
use serde_json::Value;
use tokio_postgres::NoTls;
use tracing::{debug, info, warn};

/// Idempotent DDL for the demo schema and tables.
pub(crate) const CREATE_DEMO_TABLES: &str = "\
CREATE SCHEMA IF NOT EXISTS commerce;
CREATE TABLE IF NOT EXISTS commerce.account (
    user_id INT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
    email VARCHAR(255) NOT NULL
);
CREATE TABLE IF NOT EXISTS commerce.product (
    product_id INT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
    product_name VARCHAR(255) NOT NULL
);";

const INSERT_ACCOUNT: &str = "INSERT INTO commerce.account (email) VALUES ($1)";
const INSERT_PRODUCT: &str = "INSERT INTO commerce.product (product_name) VALUES ($1)";
const SELECT_ACCOUNTS: &str = "SELECT user_id, email FROM commerce.account ORDER BY user_id";
const SELECT_PRODUCTS: &str =
    "SELECT product_id, product_name FROM commerce.product ORDER BY product_id";

/// Postgres client for the demo source tables.
pub struct PostgresClient {
    client: tokio_postgres::Client,
}

impl PostgresClient {
    /// Connect to Postgres and spawn the connection driver task.
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DatabaseError> {
        debug!(
            "connecting to Postgres {}:{}/{}",
            config.host, config.port, config.database
        );

        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .host(&config.host)
            .port(config.port)
            .user(&config.username)
            .password(&config.password)
            .dbname(&config.database);

        let (client, connection) =
            pg_config
                .connect(NoTls)
                .await
                .map_err(|e| DatabaseError::ConnectionFailed {
                    host: config.host.clone(),
                    port: config.port,
                    message: e.to_string(),
                })?;

        // The connection object drives the socket; it must be polled for
        // the client to make progress.
        tokio::spawn(async move {
            if let Err(error) = connection.await {
                warn!(%error, "postgres connection terminated");
            }
        });

        info!(
            "connected to Postgres {}:{}/{}",
            config.host, config.port, config.database
        );
        Ok(Self { client })
    }

    /// Connect under a retry policy, sleeping between failed attempts.
    pub async fn connect_with_retry(
        config: &PostgresConfig,
        policy: RetryPolicy,
    ) -> Result<Self, DatabaseError> {
        retry_connect(policy, || Self::connect(config)).await
    }

    async fn query_rows(&mut self, sql: &str) -> Result<Vec<Row>, DatabaseError> {
        let rows = self
            .client
            .query(sql, &[])
            .await
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(rows.iter().map(json_row).collect())
    }
}

#[async_trait]
impl SourceDatabase for PostgresClient {
    async fn ensure_demo_tables(&mut self) -> Result<(), DatabaseError> {
        info!("creating Postgres demo tables if missing");
        self.client
            .batch_execute(CREATE_DEMO_TABLES)
            .await
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    async fn seed_demo_data(&mut self) -> Result<(), DatabaseError> {
        info!("inserting initial demo data");
        self.insert_account("initial_user@example.com").await?;
        self.insert_product("Initial Product").await?;
        Ok(())
    }

    async fn insert_account(&mut self, email: &str) -> Result<u64, DatabaseError> {
        self.client
            .execute(INSERT_ACCOUNT, &[&email])
            .await
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    async fn insert_product(&mut self, product_name: &str) -> Result<u64, DatabaseError> {
        self.client
            .execute(INSERT_PRODUCT, &[&product_name])
            .await
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    async fn fetch_accounts(&mut self) -> Result<Vec<Row>, DatabaseError> {
        self.query_rows(SELECT_ACCOUNTS).await
    }

    async fn fetch_products(&mut self) -> Result<Vec<Row>, DatabaseError> {
        self.query_rows(SELECT_PRODUCTS).await
    }
}

fn json_row(row: &tokio_postgres::Row) -> Row {
    (0..row.len()).map(|idx| column_value(row, idx)).collect()
}

/// Convert one column to a JSON value by probing likely types.
fn column_value(row: &tokio_postgres::Row, idx: usize) -> Value {
    if let Ok(v) = row.try_get::<_, Option<i64>>(idx) {
        return v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<_, Option<i32>>(idx) {
        return v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<_, Option<i16>>(idx) {
        return v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<_, Option<f64>>(idx) {
        return v
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<_, Option<bool>>(idx) {
        return v.map(Value::Bool).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<_, Option<String>>(idx) {
        return v.map(Value::String).unwrap_or(Value::Null);
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_is_idempotent() {
        assert!(CREATE_DEMO_TABLES.contains("CREATE SCHEMA IF NOT EXISTS commerce"));
        assert!(CREATE_DEMO_TABLES.contains("CREATE TABLE IF NOT EXISTS commerce.account"));
        assert!(CREATE_DEMO_TABLES.contains("CREATE TABLE IF NOT EXISTS commerce.product"));
    }

    #[test]
    fn inserts_use_driver_parameters() {
        assert!(INSERT_ACCOUNT.contains("$1"));
        assert!(INSERT_PRODUCT.contains("$1"));
        assert!(!INSERT_ACCOUNT.contains('\''));
        assert!(!INSERT_PRODUCT.contains('\''));
    }
}
