//! The MCP server: tool and prompt dispatch over the spec loader and invocation gateway.

use crate::error::{Result, ServerError};
use crate::format::{format_api_summary, format_endpoint_details, outcome_to_result};
use crate::prompts::{
    ANALYZE_RESPONSE, AnalyzeResponseArgs, FIND_ENDPOINT, FindEndpointArgs, TEST_ENDPOINT,
    TestEndpointArgs, prompt_definitions, render_analyze_response, render_find_endpoint,
    render_test_endpoint,
};
use crate::tools::{
    EndpointArgs, GET_API_SPECS, INVOKE_API_ENDPOINT, LIST_ALL_ENDPOINTS, ListEndpointsArgs,
    parse_args, require_endpoint, tool_definitions,
};
use apidocs_http_tools::runtime::ReqwestTransport;
use apidocs_openapi_tools::config::{ApiServerConfig, Environment};
use apidocs_openapi_tools::error::OpenApiToolsError;
use apidocs_openapi_tools::index::{build_summary, filter_by_tag, get_details};
use apidocs_openapi_tools::loader::SpecLoader;
use apidocs_openapi_tools::resolver::resolve_details;
use apidocs_openapi_tools::runtime::{InvocationGateway, InvokeRequest};
use apidocs_openapi_tools::spec::Spec;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorData, GetPromptRequestParams,
    GetPromptResult, Implementation, JsonObject, ListPromptsResult, ListToolsResult,
    PaginatedRequestParams, Prompt, PromptMessage, PromptMessageRole, ProtocolVersion,
    ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use std::future::Future;
use std::sync::Arc;

const USER_AGENT: &str = concat!("apidocs-mcp/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct ApiDocsServer {
    loader: Arc<SpecLoader>,
    gateway: Arc<InvocationGateway>,
    environment: Environment,
}

impl ApiDocsServer {
    #[must_use]
    pub fn new(
        loader: Arc<SpecLoader>,
        gateway: Arc<InvocationGateway>,
        environment: Environment,
    ) -> Self {
        Self {
            loader,
            gateway,
            environment,
        }
    }

    /// Production wiring: one reqwest client shared by the spec fetch and invocations.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ApiServerConfig) -> std::result::Result<Self, OpenApiToolsError> {
        let transport = ReqwestTransport::with_user_agent(USER_AGENT)?;
        let loader = SpecLoader::from_config(config, transport.client().clone());
        let gateway = InvocationGateway::new(config, Arc::new(transport));
        Ok(Self::new(
            Arc::new(loader),
            Arc::new(gateway),
            config.environment,
        ))
    }

    #[must_use]
    pub fn tool_definitions(&self) -> Vec<Tool> {
        tool_definitions()
    }

    #[must_use]
    pub fn prompt_definitions(&self) -> Vec<Prompt> {
        prompt_definitions()
    }

    /// Run one tool call.
    ///
    /// # Errors
    ///
    /// Returns a [`ServerError`] for malformed arguments, unknown tools or endpoints, refused
    /// invocations and spec load failures. Failed API calls are *not* errors: they come back as a
    /// result flagged with `is_error`.
    pub async fn dispatch_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult> {
        match name {
            LIST_ALL_ENDPOINTS => self.list_all_endpoints(parse_args(name, arguments)?).await,
            GET_API_SPECS => self.get_api_specs(parse_args(name, arguments)?).await,
            INVOKE_API_ENDPOINT => self.invoke_api_endpoint(parse_args(name, arguments)?).await,
            other => Err(ServerError::UnknownTool(other.to_string())),
        }
    }

    /// Render one prompt.
    ///
    /// # Errors
    ///
    /// Returns a [`ServerError`] for malformed arguments, unknown prompts, unknown endpoints
    /// (`test-endpoint` only) and spec load failures.
    pub async fn render_prompt(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<GetPromptResult> {
        let (description, text) = match name {
            FIND_ENDPOINT => {
                let args: FindEndpointArgs = parse_args(name, arguments)?;
                let spec = self.spec().await?;
                (
                    "Find the right endpoint for a goal",
                    render_find_endpoint(&args, &build_summary(&spec)),
                )
            }
            TEST_ENDPOINT => {
                let args: TestEndpointArgs = parse_args(name, arguments)?;
                require_endpoint(name, &args.path, &args.method)?;
                let spec = self.spec().await?;
                let details = get_details(&spec, &args.path, &args.method).ok_or_else(|| {
                    ServerError::EndpointNotFound {
                        method: args.method.clone(),
                        path: args.path.clone(),
                    }
                })?;
                (
                    "Test an endpoint",
                    render_test_endpoint(&args, &resolve_details(&details, &spec))?,
                )
            }
            ANALYZE_RESPONSE => {
                let args: AnalyzeResponseArgs = parse_args(name, arguments)?;
                let spec = self.spec().await?;
                let details = get_details(&spec, args.endpoint_path.trim(), &args.endpoint_method)
                    .map(|d| resolve_details(&d, &spec));
                (
                    "Analyze an API response",
                    render_analyze_response(&args, details.as_ref()),
                )
            }
            other => return Err(ServerError::UnknownPrompt(other.to_string())),
        };

        Ok(GetPromptResult {
            description: Some(description.to_string()),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
        })
    }

    async fn spec(&self) -> Result<Arc<Spec>> {
        Ok(self.loader.load().await?)
    }

    async fn list_all_endpoints(&self, args: ListEndpointsArgs) -> Result<CallToolResult> {
        let spec = self.spec().await?;
        let summary = build_summary(&spec);
        let summary = match args.tag() {
            Some(tag) => filter_by_tag(&summary, tag),
            None => summary,
        };
        Ok(CallToolResult::success(vec![Content::text(
            format_api_summary(&summary)?,
        )]))
    }

    async fn get_api_specs(&self, args: EndpointArgs) -> Result<CallToolResult> {
        require_endpoint(GET_API_SPECS, &args.path, &args.method)?;
        let spec = self.spec().await?;
        let details = get_details(&spec, &args.path, &args.method).ok_or_else(|| {
            ServerError::EndpointNotFound {
                method: args.method.clone(),
                path: args.path.clone(),
            }
        })?;
        let resolved = resolve_details(&details, &spec);
        Ok(CallToolResult::success(vec![Content::text(
            format_endpoint_details(&resolved)?,
        )]))
    }

    async fn invoke_api_endpoint(&self, request: InvokeRequest) -> Result<CallToolResult> {
        require_endpoint(INVOKE_API_ENDPOINT, &request.path, &request.method)?;
        // Refuse before loading anything when configuration alone forbids the call.
        self.gateway.check_policy()?;
        let spec = self.spec().await?;
        let outcome = self.gateway.invoke(&request, &spec).await?;
        Ok(outcome_to_result(&outcome))
    }

    fn instructions(&self) -> String {
        let mut text = format!(
            "Documentation and test access for a REST API ({} environment).\n\
             1) Call list-all-endpoints to see what exists (optionally filterByTag).\n\
             2) Call get-api-specs with a path and method before building a request.\n\
             3) Call invoke-api-endpoint to send it.",
            self.environment
        );
        if self.gateway.is_read_only() {
            text.push_str("\nRead-only mode is on: invoke-api-endpoint is disabled.");
        } else if !self.gateway.has_api_key() {
            text.push_str("\nNo API key is configured: invoke-api-endpoint is disabled.");
        }
        text
    }
}

impl ServerHandler for ApiDocsServer {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: self.tool_definitions(),
            ..Default::default()
        }))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            self.dispatch_tool(&request.name, request.arguments)
                .await
                .map_err(|e| {
                    tracing::warn!("Tool call '{}' failed: {}", request.name, e);
                    ErrorData::from(e)
                })
        }
    }

    fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<ListPromptsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListPromptsResult {
            prompts: self.prompt_definitions(),
            ..Default::default()
        }))
    }

    fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<GetPromptResult, ErrorData>> + Send + '_ {
        async move {
            self.render_prompt(&request.name, request.arguments)
                .await
                .map_err(|e| {
                    tracing::warn!("Prompt '{}' failed: {}", request.name, e);
                    ErrorData::from(e)
                })
        }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("API documentation".to_string()),
                ..Default::default()
            },
            instructions: Some(self.instructions()),
            ..Default::default()
        }
    }
}
