//! Flattened views over a spec's `paths`.
//!
//! An operation is any entry under a path item whose value is an object carrying at least one of
//! `responses`, `summary`, `description` or `operationId`. Everything else under a path item
//! (shared `parameters`, `servers`, vendor extensions) is skipped.

use crate::spec::{Info, Spec};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Bucket for operations that declare no tags.
pub const DEFAULT_TAG: &str = "default";

const OPERATION_MARKERS: [&str; 4] = ["responses", "summary", "description", "operationId"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSummary {
    pub path: String,
    /// Upper-cased method key.
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub tags: Vec<String>,
}

impl EndpointSummary {
    /// The bucket this endpoint is listed under: its first tag, or [`DEFAULT_TAG`].
    #[must_use]
    pub fn primary_tag(&self) -> &str {
        self.tags.first().map_or(DEFAULT_TAG, String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
    pub total_endpoints: usize,
    /// Tag -> endpoints, tags in lexical order, endpoints in document order.
    pub endpoints_by_tag: BTreeMap<String, Vec<EndpointSummary>>,
}

impl ApiSummary {
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.endpoints_by_tag.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDetails {
    pub path: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub parameters: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Value>,
    pub tags: Vec<String>,
}

#[must_use]
pub fn is_operation(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|op| OPERATION_MARKERS.iter().any(|k| op.contains_key(*k)))
}

/// Every operation in document order as `(path, method, operation)`.
pub fn operations(spec: &Spec) -> impl Iterator<Item = (&str, &str, &Map<String, Value>)> {
    spec.paths
        .iter()
        .filter_map(|(path, item)| item.as_object().map(|item| (path.as_str(), item)))
        .flat_map(|(path, item)| {
            item.iter().filter_map(move |(method, op)| {
                if is_operation(op) {
                    op.as_object().map(|op| (path, method.as_str(), op))
                } else {
                    None
                }
            })
        })
}

#[must_use]
pub fn list_summaries(spec: &Spec) -> Vec<EndpointSummary> {
    operations(spec)
        .map(|(path, method, op)| EndpointSummary {
            path: path.to_string(),
            method: method.to_uppercase(),
            summary: string_field(op, "summary"),
            description: string_field(op, "description"),
            operation_id: string_field(op, "operationId"),
            tags: tags_of(op),
        })
        .collect()
}

#[must_use]
pub fn build_summary(spec: &Spec) -> ApiSummary {
    let summaries = list_summaries(spec);
    let total_endpoints = summaries.len();

    let mut endpoints_by_tag: BTreeMap<String, Vec<EndpointSummary>> = BTreeMap::new();
    for summary in summaries {
        endpoints_by_tag
            .entry(summary.primary_tag().to_string())
            .or_default()
            .push(summary);
    }

    ApiSummary {
        info: spec.info.clone(),
        total_endpoints,
        endpoints_by_tag,
    }
}

/// Keep only the `tag` bucket (exact match). An unknown tag yields no buckets and a zero total.
#[must_use]
pub fn filter_by_tag(summary: &ApiSummary, tag: &str) -> ApiSummary {
    let mut endpoints_by_tag = BTreeMap::new();
    if let Some(entries) = summary.endpoints_by_tag.get(tag)
        && !entries.is_empty()
    {
        endpoints_by_tag.insert(tag.to_string(), entries.clone());
    }
    let total_endpoints = endpoints_by_tag.values().map(Vec::len).sum();

    ApiSummary {
        info: summary.info.clone(),
        total_endpoints,
        endpoints_by_tag,
    }
}

/// Detail record for `method` (any case) at exactly `path`.
///
/// Parameters declared on the path item are included unless the operation redeclares the same
/// `name`/`in` pair.
#[must_use]
pub fn get_details(spec: &Spec, path: &str, method: &str) -> Option<EndpointDetails> {
    let item = spec.paths.get(path)?.as_object()?;
    let (method_key, op) = item
        .iter()
        .find(|(key, value)| key.eq_ignore_ascii_case(method) && is_operation(value))?;
    let op = op.as_object()?;

    Some(EndpointDetails {
        path: path.to_string(),
        method: method_key.clone(),
        summary: string_field(op, "summary"),
        description: string_field(op, "description"),
        operation_id: string_field(op, "operationId"),
        parameters: merge_parameters(item.get("parameters"), op.get("parameters")),
        request_body: op.get("requestBody").cloned(),
        responses: op.get("responses").cloned(),
        tags: tags_of(op),
    })
}

fn string_field(op: &Map<String, Value>, key: &str) -> Option<String> {
    op.get(key).and_then(Value::as_str).map(str::to_string)
}

fn tags_of(op: &Map<String, Value>) -> Vec<String> {
    op.get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parameter_key(param: &Value) -> Option<(&str, &str)> {
    let name = param.get("name")?.as_str()?;
    let location = param.get("in")?.as_str()?;
    Some((name, location))
}

fn merge_parameters(path_level: Option<&Value>, op_level: Option<&Value>) -> Vec<Value> {
    let op_params: &[Value] = op_level
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let path_params: &[Value] = path_level
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut merged: Vec<Value> = path_params
        .iter()
        .filter(|param| {
            let Some(key) = parameter_key(param) else {
                return true;
            };
            !op_params.iter().any(|p| parameter_key(p) == Some(key))
        })
        .cloned()
        .collect();
    merged.extend(op_params.iter().cloned());
    merged
}
