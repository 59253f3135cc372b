//! Error types for `apidocs-openapi-tools`.

use apidocs_http_tools::runtime::HttpToolsError;
use thiserror::Error;

/// Main error type for `OpenAPI` tooling.
#[derive(Error, Debug)]
pub enum OpenApiToolsError {
    /// Configuration errors (invalid values, conflicts).
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("OpenAPI error: failed to fetch spec from '{url}': {message}")]
    OpenApiSpecFetch { url: String, message: String },

    #[error("OpenAPI error: failed to read spec file '{path}': {source}")]
    OpenApiSpecReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Both parsers rejected the document; each one's complaint is kept.
    #[error(
        "OpenAPI error: failed to parse spec from '{location}' (as YAML: {yaml}; as JSON: {json})"
    )]
    OpenApiSpecParse {
        location: String,
        yaml: serde_yaml::Error,
        json: serde_json::Error,
    },

    /// HTTP client setup errors.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpToolsError),
}

/// Result type alias for `OpenAPI` tooling operations.
pub type Result<T> = std::result::Result<T, OpenApiToolsError>;
