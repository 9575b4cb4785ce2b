//! Error types for cdc-smoke.
//!
//! This module defines domain-specific error types organized by functional
//! area: query API access, source database access, and configuration.

use thiserror::Error;

/// Top-level error type encompassing all possible errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Query API errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Source database errors
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised by the HTTP query client.
///
/// Every variant is terminal for the `execute` call that produced it: the
/// client never retries the submission chain and never returns a partial
/// result set. Diagnostic text returned by the remote endpoint is carried
/// verbatim to aid debugging of the target query engine.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The initial submission request was rejected
    #[error("query submission rejected with status {status}: {body}")]
    Submission { status: u16, body: String },

    /// A continuation fetch was rejected
    #[error("continuation fetch rejected with status {status}: {body}")]
    Follow { status: u16, body: String },

    /// A response body could not be parsed as a query response
    #[error("malformed query response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// The query engine reported a failure inside an otherwise successful response
    #[error("query engine reported failure: {0}")]
    Engine(String),

    /// Transport-level failure, including an expired per-request timeout
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The statement was empty or blank
    #[error("statement must not be empty")]
    EmptyStatement,

    /// A catalog or schema name was not a plain identifier
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),
}

/// Errors raised by source database clients.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a connection to the database
    #[error("failed to connect to {host}:{port}: {message}")]
    ConnectionFailed {
        host: String,
        port: u16,
        message: String,
    },

    /// Connection retries exhausted without a successful attempt
    #[error("failed to connect after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// A statement failed to execute
    #[error("query failed: {0}")]
    QueryFailed(String),
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}
