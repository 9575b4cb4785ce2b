//! Wire types for the HTTP query-submission API.
//!
//! The query engine replies with JSON documents carrying an optional
//! continuation link (`nextUri`), an optional batch of rows (`data`),
//! and an optional error object. Field names are camelCase on the wire.

use serde::Deserialize;
use serde_json::Value;

/// A single result row: an ordered sequence of column values of
/// heterogeneous type (string, number, boolean, null).
pub type Row = Vec<Value>;

/// One page of a query response.
///
/// The result set is exhausted once a page arrives without `nextUri`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResponse {
    /// Query identifier assigned by the engine
    #[serde(default)]
    pub id: Option<String>,

    /// URL of the next portion of results, absent when exhausted
    #[serde(default)]
    pub next_uri: Option<String>,

    /// Rows carried by this page, absent when the page has none
    #[serde(default)]
    pub data: Option<Vec<Row>>,

    /// Failure reported by the engine; can appear inside a 200 response
    #[serde(default)]
    pub error: Option<EngineError>,
}

impl StatementResponse {
    /// Take this page's rows, leaving `data` empty.
    pub fn take_rows(&mut self) -> Vec<Row> {
        self.data.take().unwrap_or_default()
    }
}

/// Error object reported by the query engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineError {
    /// Human-readable failure description
    pub message: String,

    /// Numeric error code
    #[serde(default)]
    pub error_code: Option<i64>,

    /// Symbolic error name
    #[serde(default)]
    pub error_name: Option<String>,
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_name {
            Some(name) => write!(f, "{}: {}", name, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
