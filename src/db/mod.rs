//! Source database clients.
//!
//! The demo pipeline writes to either a SQL-Server-family or a
//! Postgres-family source database. Both clients implement the same trait
//! so the init and smoke flows stay driver-agnostic, and both issue
//! parameterized statements through a native driver rather than
//! interpolating values into SQL text.
//!
//! Connection establishment is the one place with retries: a fixed-count,
//! fixed-delay policy injected at construction. Everything after a
//! successful connect fails fast.

pub mod postgres;
pub mod sqlserver;

pub use postgres::PostgresClient;
pub use sqlserver::SqlServerClient;

use crate::error::DatabaseError;
use crate::query::protocol::Row;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Fixed-count retry policy for connection establishment.
///
/// Applies to source database connections only; the HTTP query client
/// fails fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of connection attempts before giving up
    pub max_attempts: u32,
    /// Delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// A policy that tries exactly once.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

/// Operations the init and smoke flows need from a source database.
#[async_trait]
pub trait SourceDatabase: Send {
    /// Create the demo schema and tables if they do not already exist.
    async fn ensure_demo_tables(&mut self) -> Result<(), DatabaseError>;

    /// Insert the fixed seed rows.
    async fn seed_demo_data(&mut self) -> Result<(), DatabaseError>;

    /// Insert one account row, returning the number of rows affected.
    async fn insert_account(&mut self, email: &str) -> Result<u64, DatabaseError>;

    /// Insert one product row, returning the number of rows affected.
    async fn insert_product(&mut self, product_name: &str) -> Result<u64, DatabaseError>;

    /// All account rows ordered by user id.
    async fn fetch_accounts(&mut self) -> Result<Vec<Row>, DatabaseError>;

    /// All product rows ordered by product id.
    async fn fetch_products(&mut self) -> Result<Vec<Row>, DatabaseError>;
}

/// Run a connect attempt under a retry policy.
///
/// Each failed attempt is logged and followed by the policy's delay,
/// except after the final one. The last failure's text is carried in the
/// terminal [`DatabaseError::RetriesExhausted`].
pub(crate) async fn retry_connect<T, F, Fut>(
    policy: RetryPolicy,
    mut connect: F,
) -> Result<T, DatabaseError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DatabaseError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_message = String::new();

    for attempt in 1..=attempts {
        match connect().await {
            Ok(connection) => return Ok(connection),
            Err(error) => {
                warn!(attempt, max_attempts = attempts, %error, "connection attempt failed");
                last_message = error.to_string();
                if attempt < attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    Err(DatabaseError::RetriesExhausted {
        attempts,
        message: last_message,
    })
}
