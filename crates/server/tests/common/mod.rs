#![allow(dead_code, unused_imports)]

use anyhow::Context as _;
use apidocs_http_tools::runtime::ReqwestTransport;
use apidocs_mcp_server::ApiDocsServer;
use apidocs_openapi_tools::config::{ApiServerConfig, Environment};
use apidocs_openapi_tools::loader::SpecLoader;
use apidocs_openapi_tools::runtime::InvocationGateway;
use rmcp::model::{CallToolResult, GetPromptResult, JsonObject};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub use apidocs_test_support::{KillOnDrop, MockServer, pick_unused_port, write_spec};

/// Two `Customer` operations and one `Addresses` operation.
pub const STORE_SPEC_YAML: &str = r##"openapi: 3.0.0
info:
  title: Store API
  version: "1.0"
paths:
  /customers:
    post:
      operationId: createCustomer
      summary: Create a customer
      tags: [Customer]
      requestBody:
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/Customer"
      responses:
        "201":
          description: Created
    get:
      operationId: listCustomers
      summary: List customers
      tags: [Customer]
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
      responses:
        "200":
          description: OK
  /addresses:
    post:
      operationId: createAddress
      summary: Create an address
      tags: [Addresses]
      responses:
        "201":
          description: Created
components:
  schemas:
    Customer:
      type: object
      properties:
        name:
          type: string
        address:
          $ref: "#/components/schemas/Address"
    Address:
      type: object
      properties:
        city:
          type: string
"##;

pub struct Setup {
    pub spec_url: Option<String>,
    pub local_spec_path: PathBuf,
    pub base_url: String,
    pub api_key: Option<String>,
    pub read_only: bool,
}

impl Setup {
    /// Local file only, writes allowed, API key set.
    pub fn local(path: &Path) -> Self {
        Self {
            spec_url: None,
            local_spec_path: path.to_path_buf(),
            base_url: "http://127.0.0.1:9/v1".to_string(),
            api_key: Some("test-key".to_string()),
            read_only: false,
        }
    }

    pub fn config(&self) -> ApiServerConfig {
        let mut config = ApiServerConfig::for_environment(Environment::Sandbox);
        config.spec_url.clone_from(&self.spec_url);
        config.local_spec_path.clone_from(&self.local_spec_path);
        config.base_url.clone_from(&self.base_url);
        config.api_key.clone_from(&self.api_key);
        config.read_only = self.read_only;
        config.spec_fetch_timeout = Duration::from_millis(500);
        config.request_timeout = Duration::from_secs(5);
        config
    }

    pub fn server(&self) -> ApiDocsServer {
        let config = self.config();
        let transport = ReqwestTransport::default();
        let loader = SpecLoader::from_config(&config, transport.client().clone());
        let gateway = InvocationGateway::new(&config, Arc::new(transport));
        ApiDocsServer::new(Arc::new(loader), Arc::new(gateway), config.environment)
    }
}

pub fn args(value: Value) -> Option<JsonObject> {
    value.as_object().cloned()
}

pub fn tool_text(result: &CallToolResult) -> anyhow::Result<String> {
    let v = serde_json::to_value(result)?;
    v["content"][0]["text"]
        .as_str()
        .map(str::to_string)
        .context("tool result has no text content")
}

pub fn tool_json(result: &CallToolResult) -> anyhow::Result<Value> {
    serde_json::from_str(&tool_text(result)?).context("tool text is not JSON")
}

pub fn prompt_text(result: &GetPromptResult) -> anyhow::Result<String> {
    let v = serde_json::to_value(result)?;
    v["messages"][0]["content"]["text"]
        .as_str()
        .map(str::to_string)
        .context("prompt has no text message")
}
