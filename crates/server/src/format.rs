//! Text rendering of tool results.

use crate::error::Result;
use apidocs_openapi_tools::index::{ApiSummary, EndpointDetails};
use apidocs_openapi_tools::runtime::{ApiErrorRecord, ApiResponse, InvocationOutcome};
use rmcp::model::{CallToolResult, Content};
use serde_json::Value;
use std::fmt::Write as _;

pub fn format_api_summary(summary: &ApiSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

pub fn format_endpoint_details(details: &EndpointDetails) -> Result<String> {
    Ok(serde_json::to_string_pretty(details)?)
}

#[must_use]
pub fn format_success_response(response: &ApiResponse) -> String {
    let mut out = format!(
        "## Response: {} {}\n\n",
        response.status, response.status_text
    );

    if !response.headers.is_empty() {
        out.push_str("### Headers\n\n");
        for (name, value) in &response.headers {
            let _ = writeln!(out, "- `{name}`: {value}");
        }
        out.push('\n');
    }

    out.push_str("### Body\n\n");
    out.push_str(&fenced_value(&response.data));
    out
}

#[must_use]
pub fn format_error_response(error: &ApiErrorRecord) -> String {
    let mut out = String::from("## Request failed\n\n");
    let _ = writeln!(out, "**Message:** {}", error.message);
    if let Some(code) = &error.code {
        let _ = writeln!(out, "**Code:** `{code}`");
    }
    if let Some(response) = &error.response {
        let _ = writeln!(
            out,
            "**Status:** {} {}",
            response.status, response.status_text
        );
        if let Some(data) = &response.data {
            out.push_str("\n### Response data\n\n");
            out.push_str(&fenced_value(data));
        }
    }

    let status = error.response.as_ref().map(|r| r.status);
    let _ = write!(out, "\n### Troubleshooting\n\n{}\n", troubleshooting_hint(status));
    out
}

/// Success and failure both come back as ordinary tool results; failures are flagged.
#[must_use]
pub fn outcome_to_result(outcome: &InvocationOutcome) -> CallToolResult {
    match outcome {
        InvocationOutcome::Success(response) => {
            CallToolResult::success(vec![Content::text(format_success_response(response))])
        }
        InvocationOutcome::Failure(error) => {
            CallToolResult::error(vec![Content::text(format_error_response(error))])
        }
    }
}

fn troubleshooting_hint(status: Option<u16>) -> &'static str {
    match status {
        None => {
            "No response was received. Check network connectivity and the configured base URL."
        }
        Some(400 | 422) => {
            "The API rejected the request. Compare the parameters and body with the endpoint's \
             documented schema (use `get-api-specs`)."
        }
        Some(401 | 403) => {
            "The API refused the credentials. Check that the API key is valid and allowed to use \
             this endpoint."
        }
        Some(404) => {
            "The resource was not found. Check the path and any identifiers substituted into it."
        }
        Some(409) => "The request conflicts with the current state of the resource.",
        Some(429) => "The API is rate limiting requests. Wait before trying again.",
        Some(500..=599) => "The API reported a server-side error. Try again later.",
        Some(_) => "The API returned an unexpected status.",
    }
}

/// Pretty JSON in a fenced block; bare strings are shown as text.
fn fenced_value(value: &Value) -> String {
    match value {
        Value::String(text) => format!("```\n{text}\n```\n"),
        Value::Null => "_(empty)_\n".to_string(),
        other => {
            let pretty = serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string());
            format!("```json\n{pretty}\n```\n")
        }
    }
}
