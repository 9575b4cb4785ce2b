//! Pipeline smoke-test flow.
//!
//! Reads the demo tables, inserts one random account and one random
//! product, re-reads, and verifies the inserted values are visible.

use crate::db::SourceDatabase;
use crate::error::Error;
use crate::query::protocol::Row;
use rand::Rng;
use tracing::info;

/// Outcome of one smoke-test run.
#[derive(Debug, Clone)]
pub struct SmokeReport {
    /// Email inserted into `commerce.account`
    pub inserted_email: String,
    /// Product name inserted into `commerce.product`
    pub inserted_product: String,
    /// Account rows before the insert
    pub accounts_before: usize,
    /// Account rows after the insert
    pub accounts_after: usize,
    /// Product rows before the insert
    pub products_before: usize,
    /// Product rows after the insert
    pub products_after: usize,
    /// Whether both inserted values were visible on re-read
    pub verified: bool,
}

/// Generate a random test account email.
pub fn random_email() -> String {
    let n: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    format!("test_{n}@example.com")
}

/// Generate a random test product name.
pub fn random_product() -> String {
    let mut rng = rand::thread_rng();
    let variant = ['A', 'B', 'C'][rng.gen_range(0..3)];
    let n: u32 = rng.gen_range(100_000..=999_999);
    format!("Item_{variant}{n}")
}

/// Run the smoke-test flow.
pub async fn run_smoke<D>(db: &mut D) -> Result<SmokeReport, Error>
where
    D: SourceDatabase + ?Sized,
{
    info!("querying source tables before insert");
    let accounts_before = db.fetch_accounts().await?;
    let products_before = db.fetch_products().await?;
    log_rows("accounts", &accounts_before);
    log_rows("products", &products_before);

    let email = random_email();
    let product = random_product();
    info!(email = %email, product = %product, "inserting test rows");
    db.insert_account(&email).await?;
    db.insert_product(&product).await?;

    info!("querying source tables after insert");
    let accounts_after = db.fetch_accounts().await?;
    let products_after = db.fetch_products().await?;
    log_rows("accounts", &accounts_after);
    log_rows("products", &products_after);

    let verified =
        contains_value(&accounts_after, &email) && contains_value(&products_after, &product);

    Ok(SmokeReport {
        inserted_email: email,
        inserted_product: product,
        accounts_before: accounts_before.len(),
        accounts_after: accounts_after.len(),
        products_before: products_before.len(),
        products_after: products_after.len(),
        verified,
    })
}

fn log_rows(table: &str, rows: &[Row]) {
    info!(table, count = rows.len());
    for row in rows {
        info!(table, row = %serde_json::Value::Array(row.clone()));
    }
}

fn contains_value(rows: &[Row], needle: &str) -> bool {
    rows.iter()
        .flatten()
        .any(|value| value.as_str() == Some(needle))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::DatabaseError;
    use async_trait::async_trait;
    use serde_json::json;

    /// In-memory stand-in for a source database.
    #[derive(Default)]
    pub(crate) struct FakeDatabase {
        pub tables_created: bool,
        pub accounts: Vec<String>,
        pub products: Vec<String>,
        pub fail_ddl: bool,
        pub drop_inserts: bool,
    }

    #[async_trait]
    impl SourceDatabase for FakeDatabase {
        async fn ensure_demo_tables(&mut self) -> Result<(), DatabaseError> {
            if self.fail_ddl {
                return Err(DatabaseError::QueryFailed("permission denied".to_string()));
            }
            self.tables_created = true;
            Ok(())
        }

        async fn seed_demo_data(&mut self) -> Result<(), DatabaseError> {
            self.insert_account("initial_user@example.com").await?;
            self.insert_product("Initial Product").await?;
            Ok(())
        }

        async fn insert_account(&mut self, email: &str) -> Result<u64, DatabaseError> {
            if self.drop_inserts {
                return Ok(0);
            }
            self.accounts.push(email.to_string());
            Ok(1)
        }

        async fn insert_product(&mut self, product_name: &str) -> Result<u64, DatabaseError> {
            if self.drop_inserts {
                return Ok(0);
            }
            self.products.push(product_name.to_string());
            Ok(1)
        }

        async fn fetch_accounts(&mut self) -> Result<Vec<Row>, DatabaseError> {
            Ok(self
                .accounts
                .iter()
                .enumerate()
                .map(|(i, email)| vec![json!(i as i64 + 1), json!(email)])
                .collect())
        }

        async fn fetch_products(&mut self) -> Result<Vec<Row>, DatabaseError> {
            Ok(self
                .products
                .iter()
                .enumerate()
                .map(|(i, name)| vec![json!(i as i64 + 1), json!(name)])
                .collect())
        }
    }

    #[tokio::test]
    async fn smoke_inserts_and_verifies_rows() {
        let mut db = FakeDatabase::default();
        db.seed_demo_data().await.unwrap();

        let report = run_smoke(&mut db).await.unwrap();

        assert!(report.verified);
        assert_eq!(report.accounts_before, 1);
        assert_eq!(report.accounts_after, 2);
        assert_eq!(report.products_before, 1);
        assert_eq!(report.products_after, 2);
        assert!(db.accounts.contains(&report.inserted_email));
        assert!(db.products.contains(&report.inserted_product));
    }

    #[tokio::test]
    async fn smoke_reports_unverified_when_rows_do_not_appear() {
        let mut db = FakeDatabase {
            drop_inserts: true,
            ..FakeDatabase::default()
        };

        let report = run_smoke(&mut db).await.unwrap();
        assert!(!report.verified);
        assert_eq!(report.accounts_before, report.accounts_after);
    }

    #[test]
    fn random_email_shape() {
        let email = random_email();
        assert!(email.starts_with("test_"));
        assert!(email.ends_with("@example.com"));
        let digits = &email["test_".len()..email.len() - "@example.com".len()];
        assert_eq!(digits.len(), 6);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn random_product_shape() {
        let product = random_product();
        assert!(product.starts_with("Item_"));
        let variant = product.chars().nth("Item_".len()).unwrap();
        assert!(matches!(variant, 'A' | 'B' | 'C'));
        let digits = &product["Item_".len() + 1..];
        assert_eq!(digits.len(), 6);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }
}
