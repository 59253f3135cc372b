//! HTTP method semantics.
//!
//! RFC 9110 tells us which methods are safe and idempotent. We surface that to agents twice: as
//! MCP `ToolAnnotations` on the exposed tools, and as the caution line of the `test-endpoint`
//! prompt.

use reqwest::Method;
use rmcp::model::ToolAnnotations;

/// What a method promises about its effect on the server. `None` means "do not guess".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSemantics {
    pub read_only: Option<bool>,
    pub destructive: Option<bool>,
    pub idempotent: Option<bool>,
}

impl MethodSemantics {
    #[must_use]
    pub fn of(method: &Method) -> Self {
        let (read_only, destructive, idempotent) = match method.as_str() {
            "GET" | "HEAD" | "OPTIONS" => (Some(true), Some(false), Some(true)),
            "POST" => (Some(false), Some(false), Some(false)),
            "PUT" | "DELETE" => (Some(false), Some(true), Some(true)),
            // PATCH may or may not be idempotent.
            "PATCH" => (Some(false), Some(true), None),
            _ => (None, None, None),
        };
        Self {
            read_only,
            destructive,
            idempotent,
        }
    }

    /// MCP annotations for a tool that talks to an external HTTP API.
    #[must_use]
    pub fn to_annotations(self, title: Option<&str>) -> ToolAnnotations {
        ToolAnnotations {
            title: title.map(str::to_string),
            read_only_hint: self.read_only,
            destructive_hint: self.destructive,
            idempotent_hint: self.idempotent,
            open_world_hint: Some(true),
        }
    }
}
