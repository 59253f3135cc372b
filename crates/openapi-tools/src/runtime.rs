//! Guarded invocation of documented endpoints.
//!
//! [`InvocationGateway::invoke`] has two failure channels. Requests the gateway refuses to send
//! (read-only mode, no API key, undocumented endpoint) are [`InvocationError`]s. Anything that
//! goes wrong once a request is on its way (error status, network fault) comes back as
//! [`InvocationOutcome::Failure`] so the caller can show it to the user.

use crate::config::ApiServerConfig;
use crate::index::{EndpointDetails, get_details};
use crate::spec::Spec;
use apidocs_http_tools::runtime::{
    HttpTransport, OutboundRequest, TransportError, TransportResponse, append_query,
    build_query_string, parse_http_method, value_to_string,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const CONTENT_TYPE_HEADER: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Arguments of one invocation, as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub path: String,
    pub method: String,
    /// Query parameters, encoded in insertion order. `null` values are dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
    /// Extra headers; these win over the gateway's own on a case-insensitive name clash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Map<String, Value>>,
    /// JSON body. `null` is the same as no body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Why an invocation was refused before anything was sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvocationError {
    #[error("API invocation is disabled: the server is running in read-only mode")]
    ReadOnly,

    #[error("API invocation requires an API key, but none is configured")]
    MissingApiKey,

    #[error("Endpoint not found: {method} {path}")]
    UnknownEndpoint { method: String, path: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status: u16,
    pub status_text: String,
    /// Body as JSON when it parses, otherwise the raw text.
    pub data: Value,
    /// Lowercased header names; repeated headers joined with `", "`.
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorRecord {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Present when the server answered with an error status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ApiErrorResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub status: u16,
    pub status_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvocationOutcome {
    Success(ApiResponse),
    Failure(ApiErrorRecord),
}

impl InvocationOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<TransportResponse> for ApiResponse {
    fn from(resp: TransportResponse) -> Self {
        let data = resp.body_value();
        Self {
            status: resp.status,
            status_text: resp.status_text,
            data,
            headers: resp.headers.into_iter().collect(),
        }
    }
}

impl ApiErrorRecord {
    fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            response: None,
        }
    }

    fn from_error_status(resp: &TransportResponse) -> Self {
        let code = match resp.status {
            400..=499 => "HTTP_CLIENT_ERROR",
            500..=599 => "HTTP_SERVER_ERROR",
            _ => "HTTP_UNEXPECTED_STATUS",
        };
        let data = Some(resp.body_value()).filter(|v| !v.is_null());
        Self {
            message: format!("Request failed with status code {}", resp.status),
            code: Some(code.to_string()),
            response: Some(ApiErrorResponse {
                status: resp.status,
                status_text: resp.status_text.clone(),
                data,
            }),
        }
    }
}

impl From<TransportError> for ApiErrorRecord {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Network { message, code } => Self {
                message,
                code,
                response: None,
            },
            TransportError::Unexpected(message) => Self::message_only(message),
        }
    }
}

/// Sends caller-described requests to the configured API, if policy allows.
pub struct InvocationGateway {
    base_url: String,
    api_key: Option<String>,
    api_key_header: String,
    read_only: bool,
    timeout: Duration,
    transport: Arc<dyn HttpTransport>,
}

impl InvocationGateway {
    #[must_use]
    pub fn new(config: &ApiServerConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            api_key_header: config.api_key_header.clone(),
            read_only: config.read_only,
            timeout: config.request_timeout,
            transport,
        }
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Configuration-level checks: read-only mode first, then API key presence.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::ReadOnly`] or [`InvocationError::MissingApiKey`].
    pub fn check_policy(&self) -> Result<(), InvocationError> {
        if self.read_only {
            return Err(InvocationError::ReadOnly);
        }
        if self.api_key.is_none() {
            return Err(InvocationError::MissingApiKey);
        }
        Ok(())
    }

    /// Apply the invocation policy without sending anything.
    ///
    /// Checks run in order: read-only mode, API key presence, then endpoint existence.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvocationError`] that applies.
    pub fn check(
        &self,
        request: &InvokeRequest,
        spec: &Spec,
    ) -> Result<EndpointDetails, InvocationError> {
        self.check_policy()?;
        get_details(spec, &request.path, &request.method).ok_or_else(|| {
            InvocationError::UnknownEndpoint {
                method: request.method.clone(),
                path: request.path.clone(),
            }
        })
    }

    /// Invoke a documented endpoint. Exactly one request is sent when the policy allows it, and
    /// none otherwise.
    ///
    /// # Errors
    ///
    /// Returns an [`InvocationError`] when the request is refused. Transport and HTTP failures are
    /// reported through [`InvocationOutcome::Failure`] instead.
    pub async fn invoke(
        &self,
        request: &InvokeRequest,
        spec: &Spec,
    ) -> Result<InvocationOutcome, InvocationError> {
        let details = self.check(request, spec)?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(InvocationError::MissingApiKey)?;

        tracing::info!(
            "Invoking {} {} ({})",
            request.method.to_uppercase(),
            request.path,
            details.operation_id.as_deref().unwrap_or("no operationId")
        );

        let outbound = match self.build_request(request, api_key) {
            Ok(outbound) => outbound,
            Err(record) => return Ok(InvocationOutcome::Failure(record)),
        };

        let outcome = match self.transport.send(outbound).await {
            Ok(resp) if resp.is_success() => InvocationOutcome::Success(resp.into()),
            Ok(resp) => {
                tracing::warn!(
                    "{} {} returned {} {}",
                    request.method.to_uppercase(),
                    request.path,
                    resp.status,
                    resp.status_text
                );
                InvocationOutcome::Failure(ApiErrorRecord::from_error_status(&resp))
            }
            Err(e) => {
                tracing::warn!(
                    "{} {} failed: {}",
                    request.method.to_uppercase(),
                    request.path,
                    e
                );
                InvocationOutcome::Failure(e.into())
            }
        };
        Ok(outcome)
    }

    fn build_request(
        &self,
        request: &InvokeRequest,
        api_key: &str,
    ) -> Result<OutboundRequest, ApiErrorRecord> {
        let method = parse_http_method(&request.method)
            .map_err(|e| ApiErrorRecord::message_only(e.to_string()))?;

        let url = format!("{}{}", self.base_url, request.path);
        let url = match &request.parameters {
            Some(params) => append_query(&url, &build_query_string(params)),
            None => url,
        };

        let body = match &request.body {
            Some(body) if !body.is_null() => Some(
                serde_json::to_string(body)
                    .map_err(|e| ApiErrorRecord::message_only(e.to_string()))?,
            ),
            _ => None,
        };

        Ok(OutboundRequest {
            method,
            url,
            headers: self.compose_headers(api_key, request.headers.as_ref()),
            body,
            timeout: self.timeout,
        })
    }

    fn compose_headers(
        &self,
        api_key: &str,
        overrides: Option<&Map<String, Value>>,
    ) -> Vec<(String, String)> {
        let mut headers = vec![
            (self.api_key_header.clone(), api_key.to_string()),
            (CONTENT_TYPE_HEADER.to_string(), JSON_CONTENT_TYPE.to_string()),
        ];

        for (name, value) in overrides.into_iter().flatten() {
            if value.is_null() {
                continue;
            }
            let entry = (name.clone(), value_to_string(value));
            match headers.iter().position(|(k, _)| k.eq_ignore_ascii_case(name)) {
                Some(i) => headers[i] = entry,
                None => headers.push(entry),
            }
        }
        headers
    }
}
