//! Pipeline initialization flow.
//!
//! Creates the source tables, seeds them with the initial demo rows, and
//! optionally registers the corresponding Iceberg tables in the lakehouse
//! catalog through the query API.

use crate::db::SourceDatabase;
use crate::error::Error;
use crate::lakehouse::{self, CatalogTarget};
use crate::query::QueryClient;
use tracing::info;

/// Run the initialization flow.
///
/// When `lakehouse` is `None`, Iceberg registration is skipped and only
/// the source database is touched.
pub async fn initialize<D>(
    db: &mut D,
    lakehouse: Option<(&QueryClient, &CatalogTarget)>,
) -> Result<(), Error>
where
    D: SourceDatabase + ?Sized,
{
    db.ensure_demo_tables().await?;
    db.seed_demo_data().await?;

    match lakehouse {
        Some((client, target)) => {
            lakehouse::ensure_demo_tables(client, target).await?;
        }
        None => {
            info!("skipping Iceberg table registration, using existing auto-created tables");
        }
    }

    info!("initialization complete");
    Ok(())
}
