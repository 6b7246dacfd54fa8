//! error types
//!
//! structured errors for config, transport, json, and graphql responses.

use crate::graphql::GraphQlError;
use std::fmt;

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for the query client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document error: {0}")]
    Document(String),

    #[error("response contained no data")]
    MissingData,

    #[error("graphql error: {message}")]
    GraphQl {
        /// http status if available
        status: Option<u16>,
        /// graphql error list
        errors: Vec<GraphQlError>,
        /// raw response body
        body: String,
        /// top-level message
        message: String,
    },
}

/// coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// bad endpoint, header, or query document; nothing was sent
    Config,
    /// the endpoint could not be reached or the connection failed
    Transport,
    /// the server answered with a non-2xx status or graphql errors
    Query,
    /// the response body did not have the expected shape
    Deserialize,
}

impl Error {
    /// classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) | Error::Url(_) | Error::Document(_) => ErrorKind::Config,
            Error::Http(err) if err.is_builder() => ErrorKind::Config,
            Error::Http(_) => ErrorKind::Transport,
            Error::Json(_) | Error::MissingData => ErrorKind::Deserialize,
            Error::GraphQl { .. } => ErrorKind::Query,
        }
    }

    /// true if the exchange with the endpoint failed at the network level
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// graphql errors returned by the server, if any
    pub fn graphql_errors(&self) -> &[GraphQlError] {
        match self {
            Error::GraphQl { errors, .. } => errors,
            _ => &[],
        }
    }
}

impl fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
