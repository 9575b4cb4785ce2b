//! # cdc-smoke
//!
//! Initialization and smoke-test harness for a CDC demo pipeline.
//!
//! The library has one component with a real contract: [`QueryClient`],
//! a client for an HTTP query-submission API that posts a statement to
//! `POST <base>/v1/statement` and follows `nextUri` continuation links
//! until the result set is fully materialized. Around it sit the demo
//! collaborators: source database clients (SQL Server via Tiberius,
//! Postgres via tokio-postgres), Iceberg table registration through the
//! query API, and the init/smoke flows the two binaries run.
//!
//! ## Example
//!
//! ```no_run
//! use cdc_smoke::QueryClientBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = QueryClientBuilder::new()
//!     .host("localhost")
//!     .port(8080)
//!     .user("user")
//!     .build()?;
//!
//! let results = client.execute("SHOW CATALOGS").await?;
//! println!("{} catalogs", results.len());
//!
//! let registered = client.table_exists("iceberg", "cdc", "commerce_account").await?;
//! println!("registered: {registered}");
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod config;
pub mod db;
pub mod error;
pub mod flows;
pub mod lakehouse;
pub mod query;

// Re-export public API
pub use config::{PostgresConfig, Settings, SourceKind, SqlServerConfig, TrinoConfig};
pub use db::{PostgresClient, RetryPolicy, SourceDatabase, SqlServerClient};
pub use error::{ConfigError, DatabaseError, Error, QueryError};
pub use lakehouse::CatalogTarget;
pub use query::{QueryClient, QueryClientBuilder, ResultSet};
