//! query document checks
//!
//! parses an executable graphql document and checks a variables object
//! against the selected operation's variable declarations before anything
//! is sent. schema validation stays with the server.

use crate::error::{Error, Result};
use graphql_parser::query::{parse_query, Definition, OperationDefinition, Type, VariableDefinition};
use std::collections::BTreeSet;

/// kind of the selected operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// a declared operation variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSpec {
    /// name without the leading `$`
    pub name: String,
    /// non-null and without a default value
    pub required: bool,
}

/// the operation selected from a parsed document
#[derive(Debug, Clone)]
pub struct QueryDocument {
    operation_name: Option<String>,
    kind: OperationKind,
    variables: Vec<VariableSpec>,
}

impl QueryDocument {
    /// parse a document containing exactly one operation
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_operation(text, None)
    }

    /// parse a document and select an operation by name
    ///
    /// with no name the document must contain exactly one operation.
    pub fn parse_operation(text: &str, operation_name: Option<&str>) -> Result<Self> {
        let document = parse_query::<String>(text)
            .map_err(|err| Error::Document(format!("invalid query document: {err}")))?;

        let operations: Vec<&OperationDefinition<'_, String>> = document
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                Definition::Operation(operation) => Some(operation),
                Definition::Fragment(_) => None,
            })
            .collect();

        let selected = match operation_name {
            Some(name) => operations
                .into_iter()
                .find(|op| definition_name(op) == Some(name))
                .ok_or_else(|| Error::Document(format!("operation not found: {name}")))?,
            None => match operations[..] {
                [operation] => operation,
                _ => {
                    return Err(Error::Document(format!(
                        "expected exactly one operation, found {}",
                        operations.len()
                    )))
                }
            },
        };

        Self::from_definition(selected)
    }

    fn from_definition(operation: &OperationDefinition<'_, String>) -> Result<Self> {
        let (operation_name, kind, definitions) = match operation {
            OperationDefinition::SelectionSet(_) => (None, OperationKind::Query, &[][..]),
            OperationDefinition::Query(query) => (
                query.name.clone(),
                OperationKind::Query,
                &query.variable_definitions[..],
            ),
            OperationDefinition::Mutation(mutation) => (
                mutation.name.clone(),
                OperationKind::Mutation,
                &mutation.variable_definitions[..],
            ),
            OperationDefinition::Subscription(_) => {
                return Err(Error::Document("subscriptions are not supported".to_string()))
            }
        };

        Ok(Self {
            operation_name,
            kind,
            variables: definitions.iter().map(variable_spec).collect(),
        })
    }

    /// operation name, if the document gives one
    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }

    /// operation kind
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// declared variables in document order
    pub fn variables(&self) -> &[VariableSpec] {
        &self.variables
    }

    /// check a variables object against the declarations
    ///
    /// every key must be declared and every required variable must be
    /// present. values are not type-checked.
    pub fn check_variables(&self, variables: &serde_json::Value) -> Result<()> {
        let provided: BTreeSet<&str> = match variables {
            serde_json::Value::Object(map) => map.keys().map(String::as_str).collect(),
            serde_json::Value::Null => BTreeSet::new(),
            other => {
                return Err(Error::Document(format!(
                    "variables must be a json object, got {other}"
                )))
            }
        };
        let declared: BTreeSet<&str> = self.variables.iter().map(|v| v.name.as_str()).collect();

        if let Some(unknown) = provided.difference(&declared).next() {
            return Err(Error::Document(format!("undeclared variable: ${unknown}")));
        }

        if let Some(missing) = self
            .variables
            .iter()
            .find(|v| v.required && !provided.contains(v.name.as_str()))
        {
            return Err(Error::Document(format!(
                "missing required variable: ${}",
                missing.name
            )));
        }

        Ok(())
    }
}

fn definition_name<'d>(operation: &'d OperationDefinition<'_, String>) -> Option<&'d str> {
    match operation {
        OperationDefinition::SelectionSet(_) => None,
        OperationDefinition::Query(query) => query.name.as_deref(),
        OperationDefinition::Mutation(mutation) => mutation.name.as_deref(),
        OperationDefinition::Subscription(subscription) => subscription.name.as_deref(),
    }
}

fn variable_spec(definition: &VariableDefinition<'_, String>) -> VariableSpec {
    VariableSpec {
        name: definition.name.clone(),
        required: matches!(definition.var_type, Type::NonNullType(_))
            && definition.default_value.is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TOKEN_QUERY: &str =
        "query getTokenInfo($symbol: String!) { TokenInfos(symbol: $symbol) { symbol } }";

    #[test]
    fn test_parse_named_query() {
        let doc = QueryDocument::parse(TOKEN_QUERY).unwrap();
        assert_eq!(doc.operation_name(), Some("getTokenInfo"));
        assert_eq!(doc.kind(), OperationKind::Query);
        assert_eq!(
            doc.variables(),
            &[VariableSpec {
                name: "symbol".to_string(),
                required: true,
            }]
        );
    }

    #[test]
    fn test_parse_shorthand() {
        let doc = QueryDocument::parse("{ __typename }").unwrap();
        assert_eq!(doc.operation_name(), None);
        assert!(doc.variables().is_empty());
        assert!(doc.check_variables(&json!({})).is_ok());
        assert!(doc.check_variables(&serde_json::Value::Null).is_ok());
    }

    #[test]
    fn test_parse_invalid() {
        let err = QueryDocument::parse("query {").unwrap_err();
        assert!(matches!(err, Error::Document(_)));
    }

    #[test]
    fn test_parse_subscription_rejected() {
        let err = QueryDocument::parse("subscription s { ticks }").unwrap_err();
        assert!(matches!(err, Error::Document(_)));
    }

    #[test]
    fn test_subscription_only_rejected_when_selected() {
        let text = "query q($s: String!) { t(s: $s) } subscription ticks { ticks }";
        let doc = QueryDocument::parse_operation(text, Some("q")).unwrap();
        assert_eq!(doc.kind(), OperationKind::Query);
        assert_eq!(doc.variables()[0].name, "s");

        let err = QueryDocument::parse_operation(text, Some("ticks")).unwrap_err();
        assert!(err.to_string().contains("subscriptions"));
    }

    #[test]
    fn test_operation_selection() {
        let text = "query a { x } query b($n: Int) { y(n: $n) }";
        assert!(QueryDocument::parse(text).is_err());

        let doc = QueryDocument::parse_operation(text, Some("b")).unwrap();
        assert_eq!(doc.operation_name(), Some("b"));
        assert!(!doc.variables()[0].required);

        let err = QueryDocument::parse_operation(text, Some("c")).unwrap_err();
        assert!(matches!(err, Error::Document(_)));
    }

    #[test]
    fn test_check_variables_exact() {
        let doc = QueryDocument::parse(TOKEN_QUERY).unwrap();
        assert!(doc.check_variables(&json!({"symbol": "ETH"})).is_ok());
        // values pass through unchecked
        assert!(doc.check_variables(&json!({"symbol": ""})).is_ok());

        let missing = doc.check_variables(&json!({})).unwrap_err();
        assert!(missing.to_string().contains("$symbol"));

        let unknown = doc
            .check_variables(&json!({"symbol": "ETH", "chain": "1"}))
            .unwrap_err();
        assert!(unknown.to_string().contains("$chain"));

        assert!(doc.check_variables(&json!(["ETH"])).is_err());
    }

    #[test]
    fn test_defaulted_variable_optional() {
        let doc = QueryDocument::parse("query q($s: String! = \"ETH\") { t(s: $s) }").unwrap();
        assert!(!doc.variables()[0].required);
        assert!(doc.check_variables(&json!({})).is_ok());
    }
}
