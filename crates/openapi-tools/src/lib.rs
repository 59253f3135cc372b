//! `OpenAPI` document handling for apidocs-mcp.
//!
//! This crate is intended to be used by `apidocs-mcp-server`. It owns everything that needs to
//! understand an `OpenAPI` document:
//! - loading it once (remote first, local fallback) in [`loader`]
//! - expanding `#/components/schemas/*` references in [`resolver`]
//! - flattening `paths` into endpoint records in [`index`]
//! - guarded invocation of a documented endpoint in [`runtime`]
//!
//! It intentionally contains **no** MCP protocol logic.

pub mod config;
pub mod error;
pub mod index;
pub mod loader;
pub mod resolver;
pub mod runtime;
pub mod spec;
