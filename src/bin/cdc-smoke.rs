//! Exercise the pipeline: read the demo tables, insert fresh test rows,
//! re-read, and verify the inserts are visible.
//!
//! Exits non-zero when the inserted rows do not appear on re-read.

use anyhow::{bail, Context, Result};
use cdc_smoke::flows::{run_smoke, SmokeReport};
use cdc_smoke::{PostgresClient, Settings, SourceKind, SqlServerClient};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let settings = Settings::from_env().context("failed to load configuration")?;
    info!(source = ?settings.source, "starting pipeline smoke test");

    let report = match settings.source {
        SourceKind::SqlServer => {
            let mut db =
                SqlServerClient::connect_with_retry(&settings.sqlserver, settings.connect_retry)
                    .await
                    .context("could not reach SQL Server")?;
            run_smoke(&mut db).await?
        }
        SourceKind::Postgres => {
            let mut db =
                PostgresClient::connect_with_retry(&settings.postgres, settings.connect_retry)
                    .await
                    .context("could not reach Postgres")?;
            run_smoke(&mut db).await?
        }
    };

    summarize(&report);

    if !report.verified {
        bail!("inserted rows were not visible on re-read");
    }
    Ok(())
}

fn summarize(report: &SmokeReport) {
    info!(
        email = %report.inserted_email,
        product = %report.inserted_product,
        "inserted test rows"
    );
    info!(
        accounts_before = report.accounts_before,
        accounts_after = report.accounts_after,
        products_before = report.products_before,
        products_after = report.products_after,
        verified = report.verified,
        "smoke test finished"
    );
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
