//! HTTP query-submission client.
//!
//! A statement is posted to `POST <base>/v1/statement` with an identity
//! header attached; the response chain is then followed through `nextUri`
//! continuation links, strictly sequentially, until a page arrives without
//! one. Rows from every page are concatenated in fetch order.
//!
//! The client holds no state between calls and never retries: a rejected
//! request fails the whole operation with the endpoint's diagnostic text.

use crate::config::TrinoConfig;
use crate::error::QueryError;
use crate::query::protocol::StatementResponse;
use crate::query::results::ResultSet;
use std::time::Duration;
use tracing::{debug, trace};

/// Header carrying the identity under which statements are executed.
pub const USER_HEADER: &str = "X-Trino-User";

/// Default endpoint host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default endpoint port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default identity header value.
pub const DEFAULT_USER: &str = "user";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the HTTP query-submission API.
///
/// Cheap to clone or share; each `execute` call is an independent
/// submission with no cross-call state.
#[derive(Debug, Clone)]
pub struct QueryClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
}

impl QueryClient {
    /// Create a builder with default settings.
    pub fn builder() -> QueryClientBuilder {
        QueryClientBuilder::new()
    }

    /// Submit one statement and drain all of its paginated results.
    ///
    /// Performs exactly one submission request plus one request per
    /// continuation link. Rows from every page, including the submission
    /// response itself, are returned in fetch order.
    ///
    /// # Errors
    ///
    /// - [`QueryError::EmptyStatement`] if the statement is blank
    /// - [`QueryError::Submission`] if the submission is rejected
    /// - [`QueryError::Follow`] if a continuation fetch is rejected
    /// - [`QueryError::MalformedResponse`] if any body fails to parse
    /// - [`QueryError::Engine`] if a page carries an engine error object
    /// - [`QueryError::Transport`] on connection failure or timeout
    ///
    /// Errors are atomic: no partial result set is ever returned.
    pub async fn execute(&self, statement: &str) -> Result<ResultSet, QueryError> {
        if statement.trim().is_empty() {
            return Err(QueryError::EmptyStatement);
        }

        let url = format!("{}/v1/statement", self.base_url);
        debug!(url = %url, "submitting statement");

        let response = self
            .http
            .post(&url)
            .header(USER_HEADER, &self.user)
            .body(statement.to_string())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(QueryError::Submission {
                status: status.as_u16(),
                body,
            });
        }

        let mut page: StatementResponse = serde_json::from_str(&body)?;
        check_engine_error(&page)?;

        let mut results = ResultSet::new();
        results.append_page(page.take_rows());

        let mut next_uri = page.next_uri;
        while let Some(uri) = next_uri {
            trace!(uri = %uri, "fetching continuation");

            let response = self
                .http
                .get(&uri)
                .header(USER_HEADER, &self.user)
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(QueryError::Follow {
                    status: status.as_u16(),
                    body,
                });
            }

            let mut page: StatementResponse = serde_json::from_str(&body)?;
            check_engine_error(&page)?;
            results.append_page(page.take_rows());
            next_uri = page.next_uri;
        }

        debug!(rows = results.len(), "statement drained");
        Ok(results)
    }

    /// Report whether at least one table matches the pattern in the given
    /// catalog and schema.
    ///
    /// Catalog and schema must be plain identifiers; single quotes in the
    /// pattern are escaped before interpolation.
    pub async fn table_exists(
        &self,
        catalog: &str,
        schema: &str,
        table_pattern: &str,
    ) -> Result<bool, QueryError> {
        let catalog = validate_identifier(catalog)?;
        let schema = validate_identifier(schema)?;
        let pattern = table_pattern.replace('\'', "''");

        let statement = format!("SHOW TABLES FROM {catalog}.{schema} LIKE '{pattern}'");
        let results = self.execute(&statement).await?;
        Ok(!results.is_empty())
    }

    /// The base URL statements are submitted to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The identity header value attached to every request.
    pub fn user(&self) -> &str {
        &self.user
    }
}

fn check_engine_error(page: &StatementResponse) -> Result<(), QueryError> {
    match &page.error {
        Some(error) => Err(QueryError::Engine(error.to_string())),
        None => Ok(()),
    }
}

/// Validate that a name is a plain SQL identifier (letters, digits,
/// underscores, not starting with a digit) so it can be interpolated into
/// statement text safely.
pub(crate) fn validate_identifier(name: &str) -> Result<&str, QueryError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(name)
    } else {
        Err(QueryError::InvalidIdentifier(name.to_string()))
    }
}

/// Builder for constructing a [`QueryClient`].
#[derive(Debug, Clone)]
pub struct QueryClientBuilder {
    host: String,
    port: u16,
    user: String,
    request_timeout: Duration,
    base_url: Option<String>,
}

impl QueryClientBuilder {
    /// Create a builder with default values.
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            base_url: None,
        }
    }

    /// Create a builder preconfigured from endpoint settings.
    pub fn from_config(config: &TrinoConfig) -> Self {
        Self::new()
            .host(&config.host)
            .port(config.port)
            .user(&config.user)
            .request_timeout(config.request_timeout)
    }

    /// Set the endpoint host.
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the endpoint port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the identity header value.
    pub fn user(mut self, user: &str) -> Self {
        self.user = user.to_string();
        self
    }

    /// Set the per-request timeout. An expired timeout surfaces as
    /// [`QueryError::Transport`] and fails the whole operation.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override the full base URL, taking precedence over host and port.
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<QueryClient, QueryError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port));

        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?;

        Ok(QueryClient {
            http,
            base_url,
            user: self.user,
        })
    }
}

impl Default for QueryClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let client = QueryClientBuilder::new().build().unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.user(), "user");
    }

    #[test]
    fn builder_composes_base_url_from_host_and_port() {
        let client = QueryClientBuilder::new()
            .host("trino.internal")
            .port(9090)
            .user("etl")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://trino.internal:9090");
        assert_eq!(client.user(), "etl");
    }

    #[test]
    fn builder_base_url_override_strips_trailing_slash() {
        let client = QueryClientBuilder::new()
            .base_url("http://127.0.0.1:49152/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:49152");
    }

    #[tokio::test]
    async fn blank_statement_is_rejected_before_any_request() {
        let client = QueryClientBuilder::new().build().unwrap();
        let err = client.execute("   \n\t").await.unwrap_err();
        assert!(matches!(err, QueryError::EmptyStatement));
    }

    #[test]
    fn identifier_validation() {
        assert!(validate_identifier("iceberg").is_ok());
        assert!(validate_identifier("cdc_v2").is_ok());
        assert!(validate_identifier("_private").is_ok());

        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("2fast").is_err());
        assert!(validate_identifier("bad-name").is_err());
        assert!(validate_identifier("a.b").is_err());
        assert!(validate_identifier("x; DROP TABLE t").is_err());
    }
}
