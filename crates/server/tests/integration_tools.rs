mod common;

use apidocs_mcp_server::error::ServerError;
use axum::Router;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use common::{MockServer, STORE_SPEC_YAML, Setup, args, pick_unused_port, tool_json, tool_text, write_spec};
use rmcp::model::{ErrorCode, ErrorData};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;

#[tokio::test]
async fn list_all_endpoints_groups_by_tag() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let server = Setup::local(&path).server();

    let result = server.dispatch_tool("list-all-endpoints", None).await?;
    let body = tool_json(&result)?;
    assert_eq!(body["totalEndpoints"], 3);
    assert_eq!(body["endpointsByTag"]["Customer"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["endpointsByTag"]["Addresses"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["info"]["title"], "Store API");

    let result = server
        .dispatch_tool("list-all-endpoints", args(json!({"filterByTag": "Addresses"})))
        .await?;
    let body = tool_json(&result)?;
    assert_eq!(body["totalEndpoints"], 1);
    assert!(body["endpointsByTag"].get("Customer").is_none());
    assert_eq!(
        body["endpointsByTag"]["Addresses"][0]["operationId"],
        "createAddress"
    );
    Ok(())
}

#[tokio::test]
async fn list_all_endpoints_with_unknown_tag_is_empty() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let server = Setup::local(&path).server();

    let result = server
        .dispatch_tool("list-all-endpoints", args(json!({"filterByTag": "Orders"})))
        .await?;
    let body = tool_json(&result)?;
    assert_eq!(body["totalEndpoints"], 0);
    assert_eq!(body["endpointsByTag"], json!({}));
    Ok(())
}

#[tokio::test]
async fn get_api_specs_returns_expanded_details() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let server = Setup::local(&path).server();

    let result = server
        .dispatch_tool(
            "get-api-specs",
            args(json!({"path": "/customers", "method": "post"})),
        )
        .await?;
    let text = tool_text(&result)?;
    assert!(!text.contains("$ref"), "{text}");

    let body: Value = serde_json::from_str(&text)?;
    assert_eq!(body["operationId"], "createCustomer");
    assert_eq!(body["method"], "post");
    assert_eq!(
        body["requestBody"]["content"]["application/json"]["schema"]["properties"]["address"]
            ["properties"]["city"]["type"],
        "string"
    );
    Ok(())
}

#[tokio::test]
async fn get_api_specs_for_unknown_endpoint_is_not_found() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let server = Setup::local(&path).server();

    let err = server
        .dispatch_tool(
            "get-api-specs",
            args(json!({"path": "/nonexistent", "method": "GET"})),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServerError::EndpointNotFound { .. }));
    assert_eq!(ErrorData::from(err).code, ErrorCode::RESOURCE_NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_arguments_and_unknown_tools_are_invalid_params() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let server = Setup::local(&path).server();

    let err = server
        .dispatch_tool("get-api-specs", args(json!({"path": "/customers"})))
        .await
        .unwrap_err();
    assert!(matches!(err, ServerError::InvalidArguments { .. }));
    assert_eq!(ErrorData::from(err).code, ErrorCode::INVALID_PARAMS);

    let err = server
        .dispatch_tool("invoke-api-endpoint", args(json!({"path": 1, "method": "GET"})))
        .await
        .unwrap_err();
    assert!(matches!(err, ServerError::InvalidArguments { .. }));

    let err = server.dispatch_tool("delete-everything", None).await.unwrap_err();
    assert!(matches!(err, ServerError::UnknownTool(_)));
    assert_eq!(ErrorData::from(err).code, ErrorCode::INVALID_PARAMS);
    Ok(())
}

#[tokio::test]
async fn spec_fetch_failure_falls_back_to_local_file() -> anyhow::Result<()> {
    let app = Router::new()
        .route(
            "/broken.yaml",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        )
        .route(
            "/slow.yaml",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "openapi: 3.0.0\npaths: {}\n"
            }),
        );
    let spec_host = MockServer::start(app).await?;
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;

    for remote in ["/broken.yaml", "/slow.yaml"] {
        let mut setup = Setup::local(&path);
        setup.spec_url = Some(spec_host.url(remote));
        let server = setup.server();

        let result = server.dispatch_tool("list-all-endpoints", None).await?;
        assert_eq!(result.is_error, Some(false));
        assert_eq!(tool_json(&result)?["totalEndpoints"], 3, "{remote}");
    }
    Ok(())
}

#[tokio::test]
async fn spec_load_failure_is_internal_error_and_retried() -> anyhow::Result<()> {
    let port = pick_unused_port()?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("openapi.yaml");

    let mut setup = Setup::local(&path);
    setup.spec_url = Some(format!("http://127.0.0.1:{port}/openapi.yaml"));
    let server = setup.server();

    let err = server.dispatch_tool("list-all-endpoints", None).await.unwrap_err();
    assert!(matches!(err, ServerError::SpecLoad(_)));
    assert_eq!(ErrorData::from(err).code, ErrorCode::INTERNAL_ERROR);

    std::fs::write(&path, STORE_SPEC_YAML)?;
    let result = server.dispatch_tool("list-all-endpoints", None).await?;
    assert_eq!(tool_json(&result)?["totalEndpoints"], 3);
    Ok(())
}

#[tokio::test]
async fn read_only_mode_refuses_invocation() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let mut setup = Setup::local(&path);
    setup.read_only = true;
    let server = setup.server();

    let err = server
        .dispatch_tool(
            "invoke-api-endpoint",
            args(json!({"path": "/customers", "method": "GET"})),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServerError::InvocationRejected(_)));
    assert!(err.to_string().contains("read-only"));
    assert_eq!(ErrorData::from(err).code, ErrorCode::INVALID_REQUEST);
    Ok(())
}

#[tokio::test]
async fn missing_api_key_refuses_invocation() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let mut setup = Setup::local(&path);
    setup.api_key = None;
    let server = setup.server();

    let err = server
        .dispatch_tool(
            "invoke-api-endpoint",
            args(json!({"path": "/customers", "method": "GET"})),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServerError::InvocationRejected(_)));
    assert!(err.to_string().contains("API key"));
    Ok(())
}

#[tokio::test]
async fn invoking_undocumented_endpoint_is_not_found() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let server = Setup::local(&path).server();

    let err = server
        .dispatch_tool(
            "invoke-api-endpoint",
            args(json!({"path": "/customers", "method": "DELETE"})),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServerError::EndpointNotFound { .. }));
    Ok(())
}

#[tokio::test]
async fn invokes_live_endpoint_with_query_and_key() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/v1/customers",
        get(
            |headers: HeaderMap, Query(query): Query<HashMap<String, String>>| async move {
                let key = headers
                    .get("x-api-key")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                axum::Json(json!({"key": key, "limit": query.get("limit")}))
            },
        ),
    );
    let api = MockServer::start(app).await?;
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let mut setup = Setup::local(&path);
    setup.base_url = api.url("/v1");
    let server = setup.server();

    let result = server
        .dispatch_tool(
            "invoke-api-endpoint",
            args(json!({
                "path": "/customers",
                "method": "get",
                "parameters": {"limit": 10, "offset": null}
            })),
        )
        .await?;
    assert_eq!(result.is_error, Some(false));
    let text = tool_text(&result)?;
    assert!(text.starts_with("## Response: 200 OK"), "{text}");
    assert!(text.contains("\"key\": \"test-key\""), "{text}");
    assert!(text.contains("\"limit\": \"10\""), "{text}");
    Ok(())
}

#[tokio::test]
async fn api_errors_come_back_as_flagged_results() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/v1/addresses",
        axum::routing::post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                axum::Json(json!({"error": "city is required"})),
            )
        }),
    );
    let api = MockServer::start(app).await?;
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let mut setup = Setup::local(&path);
    setup.base_url = api.url("/v1");
    let server = setup.server();

    let result = server
        .dispatch_tool(
            "invoke-api-endpoint",
            args(json!({"path": "/addresses", "method": "POST", "body": {"line1": "1 Main St"}})),
        )
        .await?;
    assert_eq!(result.is_error, Some(true));
    let text = tool_text(&result)?;
    assert!(text.contains("**Status:** 422 Unprocessable Entity"), "{text}");
    assert!(text.contains("city is required"), "{text}");
    Ok(())
}

#[tokio::test]
async fn unreachable_api_comes_back_as_flagged_result() -> anyhow::Result<()> {
    let port = pick_unused_port()?;
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let mut setup = Setup::local(&path);
    setup.base_url = format!("http://127.0.0.1:{port}/v1");
    let server = setup.server();

    let result = server
        .dispatch_tool(
            "invoke-api-endpoint",
            args(json!({"path": "/customers", "method": "GET"})),
        )
        .await?;
    assert_eq!(result.is_error, Some(true));
    let text = tool_text(&result)?;
    assert!(text.contains("CONNECTION_FAILED"), "{text}");
    assert!(text.contains("No response was received"), "{text}");
    Ok(())
}
