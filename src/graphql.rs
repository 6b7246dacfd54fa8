//! graphql types
//!
//! request body plus wrappers for graphql responses and errors.

use serde::{Deserialize, Serialize};

/// graphql request body (`{query, operationName, variables}`)
///
/// fields serialize in declaration order, so equal inputs produce
/// byte-identical bodies.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a, V> {
    /// document text
    pub query: &'a str,
    /// operation to run when the document names one
    #[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<&'a str>,
    /// variables object
    pub variables: V,
}

impl<'a, V: Serialize> GraphQlRequest<'a, V> {
    /// build a request body
    pub fn new(query: &'a str, operation_name: Option<&'a str>, variables: V) -> Self {
        Self {
            query,
            operation_name,
            variables,
        }
    }
}

/// graphql response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlResponse<T> {
    /// response data or null if errors
    pub data: Option<T>,
    /// graphql errors array
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

impl<T> GraphQlResponse<T> {
    /// true if the response contains graphql errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// take the data payload, failing if the server sent none
    pub fn into_data(self) -> crate::Result<T> {
        self.data.ok_or(crate::Error::MissingData)
    }
}

/// graphql error entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlError {
    /// error message
    pub message: String,
    /// error locations in the query
    #[serde(default)]
    pub locations: Vec<GraphQlLocation>,
    /// response path
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
    /// optional extensions payload
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

/// graphql error location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlLocation {
    /// line number (1-based)
    pub line: i64,
    /// column number (1-based)
    pub column: i64,
}
