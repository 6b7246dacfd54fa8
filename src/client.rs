//! main client
//!
//! includes helpers for raw graphql execution, typed operations, the token
//! info query, and schema introspection.

use crate::config::ClientConfig;
use crate::document::QueryDocument;
use crate::error::{Error, Result};
use crate::graphql::{GraphQlRequest, GraphQlResponse};
use crate::operation::Operation;
use crate::token_info::{GetTokenInfo, TokenInfo, TokenInfoVariables};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

/// standard introspection query, as used by schema tooling
pub const INTROSPECTION_QUERY: &str = r#"query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types { ...FullType }
    directives {
      name
      description
      locations
      args { ...InputValue }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args { ...InputValue }
    type { ...TypeRef }
    isDeprecated
    deprecationReason
  }
  inputFields { ...InputValue }
  interfaces { ...TypeRef }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes { ...TypeRef }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType { kind name }
            }
          }
        }
      }
    }
  }
}
"#;

/// graphql client for the dappio services endpoint
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
}

impl Client {
    /// create a new client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = match &config.http_client {
            Some(http) => http.clone(),
            None => {
                let mut builder = reqwest::Client::builder()
                    .default_headers(config.extra_headers.clone())
                    .user_agent(config.user_agent.clone())
                    .danger_accept_invalid_certs(!config.verify_ssl);
                if let Some(timeout) = config.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(customize) = &config.http_client_builder {
                    builder = customize(builder);
                }
                builder.build()?
            }
        };

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// access the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// execute a raw graphql query
    pub async fn execute_raw(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<GraphQlResponse<serde_json::Value>> {
        self.execute(query, variables).await
    }

    /// execute a raw graphql query and deserialize into a typed response
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<GraphQlResponse<T>> {
        let variables = variables.unwrap_or_else(|| serde_json::json!({}));
        self.execute_with(query, None, variables, |url, body| self.post(url, body))
            .await
    }

    /// execute a typed operation
    pub async fn execute_operation<O: Operation>(
        &self,
        variables: &O::Variables,
    ) -> Result<GraphQlResponse<O::Response>> {
        let variables = serde_json::to_value(variables)?;
        self.execute_with(
            O::QUERY,
            Some(O::OPERATION_NAME),
            variables,
            |url, body| self.post(url, body),
        )
        .await
    }

    /// fetch token info for a symbol
    ///
    /// the symbol is sent verbatim. every call is a separate request.
    pub async fn fetch_token_info(&self, symbol: &str) -> Result<TokenInfo> {
        self.fetch_token_info_with(symbol, |url, body| self.post(url, body))
            .await
    }

    /// run the introspection query and return its `data` object
    pub async fn introspect_schema(&self) -> Result<serde_json::Value> {
        self.execute_with::<serde_json::Value, _, _>(
            INTROSPECTION_QUERY,
            Some("IntrospectionQuery"),
            serde_json::json!({}),
            |url, body| self.post(url, body),
        )
        .await?
        .into_data()
    }

    async fn post(&self, url: Url, body: String) -> Result<(StatusCode, String)> {
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }
}

/// serialize a request body after checking the document against its variables
fn build_request_body(
    query: &str,
    operation_name: Option<&str>,
    variables: &serde_json::Value,
) -> Result<String> {
    let document = QueryDocument::parse_operation(query, operation_name)?;
    document.check_variables(variables)?;

    let request = GraphQlRequest::new(query, document_name(operation_name, &document), variables);
    Ok(serde_json::to_string(&request)?)
}

fn document_name<'a>(requested: Option<&'a str>, document: &'a QueryDocument) -> Option<&'a str> {
    requested.or_else(|| document.operation_name())
}

fn parse_graphql_response<T: DeserializeOwned>(
    status: StatusCode,
    text: String,
) -> Result<GraphQlResponse<T>> {
    if !status.is_success() {
        let errors = serde_json::from_str::<GraphQlResponse<serde_json::Value>>(&text)
            .map(|parsed| parsed.errors)
            .unwrap_or_default();
        let message = errors
            .first()
            .map(|err| err.message.clone())
            .unwrap_or_else(|| format!("graphql http error: {}", status));
        return Err(Error::GraphQl {
            status: Some(status.as_u16()),
            errors,
            body: text,
            message,
        });
    }

    // decode loosely first so graphql errors win over a data shape mismatch
    let parsed: GraphQlResponse<serde_json::Value> = serde_json::from_str(&text)?;
    if parsed.has_errors() {
        let message = parsed
            .errors
            .first()
            .map(|err| err.message.clone())
            .unwrap_or_else(|| "graphql error".to_string());
        return Err(Error::GraphQl {
            status: Some(status.as_u16()),
            errors: parsed.errors,
            body: text,
            message,
        });
    }

    let data = match parsed.data {
        Some(value) => Some(serde_json::from_value(value)?),
        None => None,
    };

    Ok(GraphQlResponse {
        data,
        errors: Vec::new(),
    })
}

impl Client {
    pub(crate) async fn execute_with<T: DeserializeOwned, F, Fut>(
        &self,
        query: &str,
        operation_name: Option<&str>,
        variables: serde_json::Value,
        send: F,
    ) -> Result<GraphQlResponse<T>>
    where
        F: FnOnce(Url, String) -> Fut,
        Fut: Future<Output = Result<(StatusCode, String)>>,
    {
        let url = self.config.endpoint.clone();
        let body = build_request_body(query, operation_name, &variables)?;

        debug!(endpoint = %url, operation = ?operation_name, "sending graphql request");
        let (status, text) = send(url, body).await?;
        debug!(
            status = status.as_u16(),
            bytes = text.len(),
            "graphql response received"
        );

        parse_graphql_response(status, text)
    }

    #[instrument(level = "debug", skip(self, send))]
    pub(crate) async fn fetch_token_info_with<F, Fut>(
        &self,
        symbol: &str,
        send: F,
    ) -> Result<TokenInfo>
    where
        F: FnOnce(Url, String) -> Fut,
        Fut: Future<Output = Result<(StatusCode, String)>>,
    {
        let variables = serde_json::to_value(TokenInfoVariables::new(symbol))?;
        let response = self
            .execute_with::<<GetTokenInfo as Operation>::Response, _, _>(
                GetTokenInfo::QUERY,
                Some(GetTokenInfo::OPERATION_NAME),
                variables,
                send,
            )
            .await?;

        Ok(response.into_data()?.token_infos)
    }
}
