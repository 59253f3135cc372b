//! Error types for the MCP server.

use apidocs_openapi_tools::error::OpenApiToolsError;
use apidocs_openapi_tools::runtime::InvocationError;
use rmcp::model::ErrorData;
use thiserror::Error;

/// Why a tool or prompt call produced a protocol error instead of a result.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Arguments missing, of the wrong type, or otherwise malformed.
    #[error("Invalid arguments for '{target}': {message}")]
    InvalidArguments { target: String, message: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    #[error("Endpoint not found: {method} {path}")]
    EndpointNotFound { method: String, path: String },

    /// Invocation refused by configuration (read-only mode, missing API key).
    #[error("{0}")]
    InvocationRejected(InvocationError),

    /// The spec could not be obtained. Nothing is cached; the next call retries.
    #[error("Failed to load OpenAPI spec: {0}")]
    SpecLoad(#[from] OpenApiToolsError),

    #[error("Failed to render result: {0}")]
    Render(#[from] serde_json::Error),
}

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

impl ServerError {
    pub(crate) fn invalid_arguments(target: &str, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            target: target.to_string(),
            message: message.into(),
        }
    }
}

impl From<InvocationError> for ServerError {
    fn from(e: InvocationError) -> Self {
        match e {
            InvocationError::UnknownEndpoint { method, path } => {
                Self::EndpointNotFound { method, path }
            }
            other => Self::InvocationRejected(other),
        }
    }
}

impl From<ServerError> for ErrorData {
    fn from(e: ServerError) -> Self {
        let message = e.to_string();
        match e {
            ServerError::InvalidArguments { .. }
            | ServerError::UnknownTool(_)
            | ServerError::UnknownPrompt(_) => ErrorData::invalid_params(message, None),
            ServerError::EndpointNotFound { .. } => ErrorData::resource_not_found(message, None),
            ServerError::InvocationRejected(_) => ErrorData::invalid_request(message, None),
            ServerError::SpecLoad(_) | ServerError::Render(_) => {
                ErrorData::internal_error(message, None)
            }
        }
    }
}
