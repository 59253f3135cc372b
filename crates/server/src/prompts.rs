//! Guidance prompts. Pure text generators over endpoint index output and caller text.

use crate::error::Result;
use crate::format::format_endpoint_details;
use apidocs_http_tools::runtime::parse_http_method;
use apidocs_http_tools::semantics::MethodSemantics;
use apidocs_openapi_tools::index::{ApiSummary, EndpointDetails};
use rmcp::model::{Prompt, PromptArgument};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write as _;

pub const FIND_ENDPOINT: &str = "find-endpoint";
pub const TEST_ENDPOINT: &str = "test-endpoint";
pub const ANALYZE_RESPONSE: &str = "analyze-response";

#[derive(Debug, Deserialize)]
pub struct FindEndpointArgs {
    pub goal: String,
}

#[derive(Debug, Deserialize)]
pub struct TestEndpointArgs {
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeResponseArgs {
    pub response_data: String,
    pub endpoint_path: String,
    pub endpoint_method: String,
    #[serde(default)]
    pub goal: Option<String>,
}

fn argument(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        required: Some(required),
    }
}

#[must_use]
pub fn prompt_definitions() -> Vec<Prompt> {
    vec![
        Prompt::new(
            FIND_ENDPOINT,
            Some("Find the endpoint(s) that accomplish a goal"),
            Some(vec![argument(
                "goal",
                "What you are trying to do with the API",
                true,
            )]),
        ),
        Prompt::new(
            TEST_ENDPOINT,
            Some("Plan and run a test call against one endpoint"),
            Some(vec![
                argument("path", "Endpoint path as documented", true),
                argument("method", "HTTP method", true),
                argument("goal", "What the test should demonstrate", false),
            ]),
        ),
        Prompt::new(
            ANALYZE_RESPONSE,
            Some("Interpret a response returned by an endpoint"),
            Some(vec![
                argument("response_data", "The response body or tool output", true),
                argument("endpoint_path", "Path of the endpoint that was called", true),
                argument("endpoint_method", "HTTP method that was used", true),
                argument("goal", "What the call was meant to achieve", false),
            ]),
        ),
    ]
}

#[must_use]
pub fn render_find_endpoint(args: &FindEndpointArgs, summary: &ApiSummary) -> String {
    let api = api_name(summary);
    let mut out = format!(
        "I want to accomplish the following with {api}:\n\n{}\n\n",
        args.goal.trim()
    );
    let _ = writeln!(
        out,
        "These are the {} available endpoints, grouped by tag:",
        summary.total_endpoints
    );

    for (tag, endpoints) in &summary.endpoints_by_tag {
        let _ = write!(out, "\n## {tag}\n\n");
        for endpoint in endpoints {
            let _ = write!(out, "- `{} {}`", endpoint.method, endpoint.path);
            if let Some(text) = &endpoint.summary {
                let _ = write!(out, ": {text}");
            }
            if let Some(operation_id) = &endpoint.operation_id {
                let _ = write!(out, " (`{operation_id}`)");
            }
            out.push('\n');
        }
    }

    out.push_str(
        "\nWhich endpoint or sequence of endpoints should I use, and why? For each one, use the \
         `get-api-specs` tool to check its parameters and request body before suggesting a call.",
    );
    out
}

/// # Errors
///
/// Returns an error if the detail record cannot be rendered.
pub fn render_test_endpoint(args: &TestEndpointArgs, details: &EndpointDetails) -> Result<String> {
    let method = details.method.to_uppercase();
    let mut out = format!("Help me test `{method} {}`", details.path);
    if let Some(summary) = &details.summary {
        let _ = write!(out, " ({summary})");
    }
    out.push_str(".\n\n");

    if let Some(goal) = non_blank(args.goal.as_deref()) {
        let _ = write!(out, "Goal: {goal}\n\n");
    }

    let _ = write!(
        out,
        "Documented endpoint:\n\n```json\n{}\n```\n\n",
        format_endpoint_details(details)?
    );
    out.push_str(method_caution(&method));
    out.push_str(
        "\n\nPlease:\n\
         1. Propose realistic values for the required parameters and request body.\n\
         2. Call the `invoke-api-endpoint` tool with them.\n\
         3. Explain whether the response matches the documented responses.",
    );
    Ok(out)
}

#[must_use]
pub fn render_analyze_response(
    args: &AnalyzeResponseArgs,
    details: Option<&EndpointDetails>,
) -> String {
    let method = args.endpoint_method.trim().to_uppercase();
    let path = args.endpoint_path.trim();
    let mut out = format!("Analyze this response from `{method} {path}`.\n\n");

    if let Some(goal) = non_blank(args.goal.as_deref()) {
        let _ = write!(out, "The call was meant to: {goal}\n\n");
    }

    let _ = write!(out, "Response:\n\n{}\n", fenced(&args.response_data));

    match details.and_then(|d| d.responses.as_ref()) {
        Some(responses) => {
            let documented =
                serde_json::to_string_pretty(responses).unwrap_or_else(|_| responses.to_string());
            let _ = write!(out, "Documented responses:\n\n```json\n{documented}\n```\n\n");
        }
        None if details.is_none() => {
            out.push_str("This endpoint is not in the API description.\n\n");
        }
        None => {}
    }

    out.push_str(
        "Summarize what the response says, point out errors or unexpected fields, and suggest the \
         next step.",
    );
    out
}

fn api_name(summary: &ApiSummary) -> String {
    summary
        .info
        .as_ref()
        .and_then(|i| i.title.as_deref())
        .map_or_else(|| "this API".to_string(), |t| format!("the {t}"))
}

fn method_caution(method: &str) -> &'static str {
    let semantics = parse_http_method(method).map(|m| MethodSemantics::of(&m)).ok();
    match semantics.and_then(|s| s.read_only) {
        Some(true) => "This method only reads data, so it is safe to call repeatedly.",
        Some(false) => {
            "This method changes data on the server. Prefer the sandbox environment and use test \
             values."
        }
        None => "The effect of this method is not known; treat it as if it changes data.",
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// JSON input is pretty-printed; anything else is shown verbatim.
fn fenced(data: &str) -> String {
    match serde_json::from_str::<Value>(data) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => {
            let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| data.to_string());
            format!("```json\n{pretty}\n```\n")
        }
        _ => format!("```\n{}\n```\n", data.trim_end()),
    }
}
