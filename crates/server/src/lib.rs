//! MCP server exposing an `OpenAPI`-described REST API to language-model agents.
//!
//! Three tools (`list-all-endpoints`, `get-api-specs`, `invoke-api-endpoint`) and three prompts
//! (`find-endpoint`, `test-endpoint`, `analyze-response`) are served over stdio. The heavy
//! lifting lives in `apidocs-openapi-tools`; this crate is protocol glue and presentation.

pub mod cli;
pub mod error;
pub mod format;
pub mod handler;
pub mod prompts;
pub mod tools;

pub use handler::ApiDocsServer;
