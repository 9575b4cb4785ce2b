//! Query submission and result handling.
//!
//! This module provides the client for the HTTP query-submission API:
//! a statement is posted to the endpoint, and the response chain is
//! followed through `nextUri` continuation links until the result set
//! is fully materialized.
//!
//! The module is organized into:
//! - `client` - statement submission and continuation draining
//! - `protocol` - wire types for the query API responses
//! - `results` - accumulated result set for one submission
//!
//! # Example
//!
//! ```no_run
//! use cdc_smoke::query::QueryClientBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = QueryClientBuilder::new()
//!     .host("trino.internal")
//!     .port(8080)
//!     .user("etl")
//!     .build()?;
//!
//! let results = client.execute("SHOW CATALOGS").await?;
//! for row in results.rows() {
//!     println!("{row:?}");
//! }
//!
//! if client.table_exists("iceberg", "cdc", "commerce_account").await? {
//!     println!("table already registered");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod protocol;
pub mod results;

// Re-export commonly used types
pub use client::{QueryClient, QueryClientBuilder, USER_HEADER};
pub use protocol::{EngineError, Row, StatementResponse};
pub use results::ResultSet;
