//! dappio token info client
//!
//! this crate provides a small, typed client for the dappio services graphql
//! api. start with [`Client`] and [`ClientConfig`], then call
//! [`Client::fetch_token_info`], or use `execute_raw` / `execute` for ad-hoc
//! queries.
//!
//! ## quick start
//!
//! ```no_run
//! use dappio::{Client, ClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientConfig::dappio())?;
//! let info = client.fetch_token_info("ETH").await?;
//! println!("{} {}", info.symbol, info.price);
//! # Ok(())
//! # }
//! ```
//!
//! ## typed operations
//!
//! implement [`Operation`] for a document and its response shape, then run
//! it with [`Client::execute_operation`]. variables are checked against the
//! document's declarations before the request goes out.

mod client;
mod config;
mod document;
mod error;
mod graphql;
mod logging;
mod operation;
mod token_info;

pub use client::{Client, INTROSPECTION_QUERY};
pub use config::{ClientConfig, DEFAULT_ENDPOINT, ENDPOINT_ENV};
pub use document::{OperationKind, QueryDocument, VariableSpec};
pub use error::{Error, ErrorKind, Result};
pub use graphql::{GraphQlError, GraphQlLocation, GraphQlRequest, GraphQlResponse};
pub use logging::{default_directive, init_logging};
pub use operation::Operation;
pub use token_info::{GetTokenInfo, TokenInfo, TokenInfoVariables, TokenInfosData, TOKEN_INFO_QUERY};
