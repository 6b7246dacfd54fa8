//! token info query
//!
//! the `getTokenInfo` document and its response shape. every field is
//! kept as the string the service returns.

use crate::operation::Operation;
use serde::{Deserialize, Serialize};

/// `getTokenInfo` document text
pub const TOKEN_INFO_QUERY: &str = r#"query getTokenInfo($symbol: String!) {
  TokenInfos(symbol: $symbol) {
    timestamp
    price
    protocol
    chainId
    mint
    name
    decimals
    symbol
    logoURI
  }
}
"#;

/// token metadata and latest price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub timestamp: String,
    /// decimal string
    pub price: String,
    pub protocol: String,
    #[serde(rename = "chainId")]
    pub chain_id: String,
    /// token address
    pub mint: String,
    pub name: String,
    /// integer string
    pub decimals: String,
    pub symbol: String,
    #[serde(rename = "logoURI")]
    pub logo_uri: String,
}

/// variables for [`GetTokenInfo`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfoVariables {
    pub symbol: String,
}

impl TokenInfoVariables {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

/// `data` payload for [`GetTokenInfo`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenInfosData {
    #[serde(rename = "TokenInfos")]
    pub token_infos: TokenInfo,
}

/// `getTokenInfo` operation
pub struct GetTokenInfo;

impl Operation for GetTokenInfo {
    const QUERY: &'static str = TOKEN_INFO_QUERY;
    const OPERATION_NAME: &'static str = "getTokenInfo";
    type Variables = TokenInfoVariables;
    type Response = TokenInfosData;
}
