//! Tool definitions and argument decoding.

use crate::error::{Result, ServerError};
use apidocs_http_tools::semantics::MethodSemantics;
use reqwest::Method;
use rmcp::model::{JsonObject, Tool};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

pub const LIST_ALL_ENDPOINTS: &str = "list-all-endpoints";
pub const GET_API_SPECS: &str = "get-api-specs";
pub const INVOKE_API_ENDPOINT: &str = "invoke-api-endpoint";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEndpointsArgs {
    #[serde(default)]
    pub filter_by_tag: Option<String>,
}

impl ListEndpointsArgs {
    /// The tag to filter on; a blank tag means no filter.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.filter_by_tag
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct EndpointArgs {
    pub path: String,
    pub method: String,
}

/// Decode a tool's arguments object. Absent arguments decode like `{}`.
///
/// # Errors
///
/// Returns [`ServerError::InvalidArguments`] naming `target` if the shape does not match.
pub fn parse_args<T: DeserializeOwned>(target: &str, arguments: Option<JsonObject>) -> Result<T> {
    serde_json::from_value(Value::Object(arguments.unwrap_or_default()))
        .map_err(|e| ServerError::invalid_arguments(target, e.to_string()))
}

/// Reject blank `path`/`method` values that deserialized fine.
pub(crate) fn require_endpoint(target: &str, path: &str, method: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(ServerError::invalid_arguments(target, "`path` must not be empty"));
    }
    if method.trim().is_empty() {
        return Err(ServerError::invalid_arguments(target, "`method` must not be empty"));
    }
    Ok(())
}

#[must_use]
pub fn tool_definitions() -> Vec<Tool> {
    let lookup = MethodSemantics::of(&Method::GET);
    let invoke = MethodSemantics {
        read_only: Some(false),
        destructive: Some(true),
        idempotent: Some(false),
    };

    vec![
        tool(
            LIST_ALL_ENDPOINTS,
            "List every endpoint in the API, grouped by tag. Pass `filterByTag` to see a single \
             tag's endpoints.",
            json!({
                "type": "object",
                "properties": {
                    "filterByTag": {
                        "type": "string",
                        "description": "Only list endpoints whose first tag is exactly this value"
                    }
                }
            }),
            lookup.to_annotations(Some("List API endpoints")),
        ),
        tool(
            GET_API_SPECS,
            "Show the documented parameters, request body and responses of one endpoint, with \
             schema references expanded.",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Endpoint path exactly as documented, e.g. /customers"
                    },
                    "method": {
                        "type": "string",
                        "description": "HTTP method, any case, e.g. GET"
                    }
                },
                "required": ["path", "method"]
            }),
            lookup.to_annotations(Some("Get endpoint details")),
        ),
        tool(
            INVOKE_API_ENDPOINT,
            "Call a documented endpoint on the live API and return the response. Requires an API \
             key and is disabled in read-only mode.",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Endpoint path with any path parameters already substituted"
                    },
                    "method": {
                        "type": "string",
                        "description": "HTTP method, any case"
                    },
                    "parameters": {
                        "type": "object",
                        "description": "Query parameters; null values are omitted"
                    },
                    "headers": {
                        "type": "object",
                        "description": "Extra request headers; these override the defaults"
                    },
                    "body": {
                        "description": "JSON request body"
                    }
                },
                "required": ["path", "method"]
            }),
            invoke.to_annotations(Some("Invoke API endpoint")),
        ),
    ]
}

fn tool(
    name: &'static str,
    description: &'static str,
    schema: Value,
    annotations: rmcp::model::ToolAnnotations,
) -> Tool {
    let schema = match schema {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    };
    let mut tool = Tool::new(name, description, Arc::new(schema));
    tool.annotations = Some(annotations);
    tool
}
