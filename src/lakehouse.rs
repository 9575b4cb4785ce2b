//! Iceberg table registration through the query API.
//!
//! The lakehouse catalog is reachable only through the query engine's SQL
//! dialect, so registration is a handful of DDL statements issued with
//! [`QueryClient`](crate::query::QueryClient). Every statement is
//! idempotent and each table is additionally checked with `SHOW TABLES`
//! before creation, matching how the pipeline's auto-created tables are
//! left untouched.

use crate::error::QueryError;
use crate::query::client::validate_identifier;
use crate::query::QueryClient;
use tracing::info;

/// Lakehouse table mirroring the source `commerce.account` table.
pub const ACCOUNT_TABLE: &str = "commerce_account";

/// Lakehouse table mirroring the source `commerce.product` table.
pub const PRODUCT_TABLE: &str = "commerce_product";

/// Catalog and schema the demo tables are registered under.
///
/// Both names are validated as plain identifiers at construction, so a
/// target can always be interpolated into statement text safely.
#[derive(Debug, Clone)]
pub struct CatalogTarget {
    catalog: String,
    schema: String,
}

impl CatalogTarget {
    /// Create a target, validating both names as plain identifiers.
    pub fn new(catalog: &str, schema: &str) -> Result<Self, QueryError> {
        validate_identifier(catalog)?;
        validate_identifier(schema)?;
        Ok(Self {
            catalog: catalog.to_string(),
            schema: schema.to_string(),
        })
    }

    /// Catalog name.
    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    /// Schema name.
    pub fn schema(&self) -> &str {
        &self.schema
    }
}

/// Ensure the demo schema and both Iceberg tables exist in the catalog.
pub async fn ensure_demo_tables(
    client: &QueryClient,
    target: &CatalogTarget,
) -> Result<(), QueryError> {
    info!(
        catalog = %target.catalog,
        schema = %target.schema,
        "ensuring Iceberg schema and tables"
    );

    client.execute(&create_schema_statement(target)).await?;

    for (table, columns) in [
        (ACCOUNT_TABLE, "user_id BIGINT, email VARCHAR"),
        (PRODUCT_TABLE, "product_id BIGINT, product_name VARCHAR"),
    ] {
        if client
            .table_exists(&target.catalog, &target.schema, table)
            .await?
        {
            info!(table, "Iceberg table already registered");
            continue;
        }
        client
            .execute(&create_table_statement(target, table, columns))
            .await?;
        info!(table, "Iceberg table registered");
    }

    Ok(())
}

fn create_schema_statement(target: &CatalogTarget) -> String {
    format!(
        "CREATE SCHEMA IF NOT EXISTS {}.{}",
        target.catalog, target.schema
    )
}

fn create_table_statement(target: &CatalogTarget, table: &str, columns: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {}.{}.{table} ({columns}) WITH (format = 'PARQUET')",
        target.catalog, target.schema
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> CatalogTarget {
        CatalogTarget::new("iceberg", "cdc").unwrap()
    }

    #[test]
    fn schema_statement_is_idempotent() {
        let statement = create_schema_statement(&target());
        assert_eq!(statement, "CREATE SCHEMA IF NOT EXISTS iceberg.cdc");
    }

    #[test]
    fn table_statement_names_format() {
        let statement =
            create_table_statement(&target(), ACCOUNT_TABLE, "user_id BIGINT, email VARCHAR");
        assert_eq!(
            statement,
            "CREATE TABLE IF NOT EXISTS iceberg.cdc.commerce_account \
             (user_id BIGINT, email VARCHAR) WITH (format = 'PARQUET')"
        );
    }

    #[test]
    fn target_rejects_injection_shaped_names() {
        assert!(CatalogTarget::new("iceberg", "cdc; DROP SCHEMA x").is_err());
        assert!(CatalogTarget::new("ice-berg", "cdc").is_err());
    }

    #[test]
    fn target_exposes_validated_names() {
        let target = target();
        assert_eq!(target.catalog(), "iceberg");
        assert_eq!(target.schema(), "cdc");
    }
}
