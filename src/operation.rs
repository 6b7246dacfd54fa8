//! typed operation helper
//!
//! hand-maintained stand-in for generated document types.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// graphql operation contract for typed documents
pub trait Operation {
    /// graphql query or mutation string
    const QUERY: &'static str;
    /// operation name declared in [`Operation::QUERY`]
    const OPERATION_NAME: &'static str;
    /// variables object
    type Variables: Serialize;
    /// response payload type
    type Response: DeserializeOwned;
}
