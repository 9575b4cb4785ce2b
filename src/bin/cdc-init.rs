//! Create and seed the demo source tables, optionally registering the
//! corresponding Iceberg tables in the lakehouse catalog.
//!
//! Configuration is environment-driven; see the `config` module for the
//! variable table. Set `CREATE_ICEBERG_TABLES=1` to enable registration.

use anyhow::{Context, Result};
use cdc_smoke::flows::initialize;
use cdc_smoke::{
    CatalogTarget, PostgresClient, QueryClientBuilder, Settings, SourceKind, SqlServerClient,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let settings = Settings::from_env().context("failed to load configuration")?;
    info!(source = ?settings.source, "starting pipeline initialization");

    let client;
    let target;
    let lakehouse = if settings.create_iceberg_tables {
        client = QueryClientBuilder::from_config(&settings.trino)
            .build()
            .context("failed to build query client")?;
        target = CatalogTarget::new(&settings.trino.catalog, &settings.trino.schema)
            .context("invalid lakehouse catalog target")?;
        Some((&client, &target))
    } else {
        None
    };

    match settings.source {
        SourceKind::SqlServer => {
            let mut db =
                SqlServerClient::connect_with_retry(&settings.sqlserver, settings.connect_retry)
                    .await
                    .context("could not reach SQL Server")?;
            initialize(&mut db, lakehouse).await?;
        }
        SourceKind::Postgres => {
            let mut db =
                PostgresClient::connect_with_retry(&settings.postgres, settings.connect_retry)
                    .await
                    .context("could not reach Postgres")?;
            initialize(&mut db, lakehouse).await?;
        }
    }

    info!("tables created and initial data inserted");
    Ok(())
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
