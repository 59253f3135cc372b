//! Shared HTTP plumbing for apidocs-mcp.
//!
//! This crate is intended to be used by:
//! - `apidocs-openapi-tools` (spec fetching and endpoint invocation)
//! - `apidocs-mcp-server` (tool annotations)
//!
//! It intentionally contains **no** `OpenAPI` knowledge; callers hand it fully-composed requests.

pub mod runtime;
pub mod safety;
pub mod semantics;
