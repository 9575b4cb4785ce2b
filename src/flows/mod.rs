//! Pipeline flows: initialization and smoke test.
//!
//! Both flows drive a [`SourceDatabase`](crate::db::SourceDatabase)
//! implementation and, for initialization, optionally the query client:
//! - `init` creates and seeds the source tables, then registers the
//!   Iceberg tables in the lakehouse catalog when enabled.
//! - `smoke` exercises the pipeline end by inserting fresh rows and
//!   verifying they are visible on re-read.

pub mod init;
pub mod smoke;

pub use init::initialize;
pub use smoke::{run_smoke, SmokeReport};
