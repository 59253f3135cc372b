mod common;

use apidocs_mcp_server::error::ServerError;
use common::{STORE_SPEC_YAML, Setup, args, prompt_text, write_spec};
use rmcp::model::{ErrorCode, ErrorData};
use serde_json::json;

#[tokio::test]
async fn find_endpoint_lists_every_operation_by_tag() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let server = Setup::local(&path).server();

    let result = server
        .render_prompt("find-endpoint", args(json!({"goal": "register a new customer"})))
        .await?;
    let text = prompt_text(&result)?;
    assert!(text.contains("register a new customer"), "{text}");
    assert!(text.contains("the Store API"), "{text}");
    assert!(text.contains("These are the 3 available endpoints"), "{text}");
    assert!(text.contains("## Addresses"), "{text}");
    assert!(
        text.contains("- `POST /customers`: Create a customer (`createCustomer`)"),
        "{text}"
    );
    Ok(())
}

#[tokio::test]
async fn test_endpoint_embeds_resolved_details() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let server = Setup::local(&path).server();

    let result = server
        .render_prompt(
            "test-endpoint",
            args(json!({"path": "/customers", "method": "post", "goal": "create Ada"})),
        )
        .await?;
    let text = prompt_text(&result)?;
    assert!(text.starts_with("Help me test `POST /customers` (Create a customer)"), "{text}");
    assert!(text.contains("Goal: create Ada"), "{text}");
    assert!(text.contains("\"city\""), "{text}");
    assert!(!text.contains("$ref"), "{text}");
    assert!(text.contains("changes data on the server"), "{text}");
    Ok(())
}

#[tokio::test]
async fn test_endpoint_for_unknown_endpoint_is_not_found() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let server = Setup::local(&path).server();

    let err = server
        .render_prompt(
            "test-endpoint",
            args(json!({"path": "/orders", "method": "GET"})),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServerError::EndpointNotFound { .. }));
    assert_eq!(ErrorData::from(err).code, ErrorCode::RESOURCE_NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn analyze_response_tolerates_unknown_endpoints() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let server = Setup::local(&path).server();

    let known = server
        .render_prompt(
            "analyze-response",
            args(json!({
                "response_data": "{\"id\": 7}",
                "endpoint_path": "/customers",
                "endpoint_method": "POST"
            })),
        )
        .await?;
    let text = prompt_text(&known)?;
    assert!(text.contains("Documented responses"), "{text}");
    assert!(text.contains("\"201\""), "{text}");

    let unknown = server
        .render_prompt(
            "analyze-response",
            args(json!({
                "response_data": "oops",
                "endpoint_path": "/orders",
                "endpoint_method": "GET"
            })),
        )
        .await?;
    let text = prompt_text(&unknown)?;
    assert!(text.contains("not in the API description"), "{text}");
    Ok(())
}

#[tokio::test]
async fn unknown_prompt_and_missing_arguments_are_invalid_params() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_spec(dir.path(), "openapi.yaml", STORE_SPEC_YAML)?;
    let server = Setup::local(&path).server();

    let err = server.render_prompt("write-my-code", None).await.unwrap_err();
    assert!(matches!(err, ServerError::UnknownPrompt(_)));
    assert_eq!(ErrorData::from(err).code, ErrorCode::INVALID_PARAMS);

    let err = server.render_prompt("find-endpoint", None).await.unwrap_err();
    assert!(matches!(err, ServerError::InvalidArguments { .. }));
    Ok(())
}
