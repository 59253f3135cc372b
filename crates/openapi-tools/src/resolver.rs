//! `$ref` expansion for `#/components/schemas/*` references.
//!
//! Expansion is recursive. Each branch carries its own set of the references it has already
//! followed: a reference seen again on the same branch is left as a bare `{"$ref": ...}` marker,
//! while siblings referring to the same schema both get a full expansion.
//!
//! References that point anywhere else (other component kinds, external documents) or name a
//! schema that does not exist are returned unchanged.

use crate::index::EndpointDetails;
use crate::spec::Spec;
use serde_json::{Map, Value, json};
use std::collections::HashSet;

pub const COMPONENT_SCHEMA_PREFIX: &str = "#/components/schemas/";

/// Expand every resolvable schema reference in `node`.
#[must_use]
pub fn resolve_refs(node: &Value, spec: &Spec) -> Value {
    let empty = Map::new();
    let schemas = spec.components.as_ref().map_or(&empty, |c| &c.schemas);
    resolve(node, schemas, HashSet::new())
}

/// [`resolve_refs`] applied to the schema-bearing parts of a detail record.
#[must_use]
pub fn resolve_details(details: &EndpointDetails, spec: &Spec) -> EndpointDetails {
    EndpointDetails {
        parameters: details
            .parameters
            .iter()
            .map(|p| resolve_refs(p, spec))
            .collect(),
        request_body: details.request_body.as_ref().map(|b| resolve_refs(b, spec)),
        responses: details.responses.as_ref().map(|r| resolve_refs(r, spec)),
        ..details.clone()
    }
}

fn resolve(node: &Value, schemas: &Map<String, Value>, visited: HashSet<String>) -> Value {
    match node {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| resolve(item, schemas, visited.clone()))
                .collect(),
        ),
        Value::Object(map) => match map.get("$ref") {
            Some(reference) => resolve_reference(node, reference, schemas, visited),
            None => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), resolve(v, schemas, visited.clone())))
                    .collect(),
            ),
        },
        scalar => scalar.clone(),
    }
}

fn resolve_reference(
    node: &Value,
    reference: &Value,
    schemas: &Map<String, Value>,
    mut visited: HashSet<String>,
) -> Value {
    let Some(reference) = reference.as_str() else {
        return node.clone();
    };
    let Some(target) = schema_name(reference).and_then(|name| schemas.get(&name)) else {
        return node.clone();
    };
    if visited.contains(reference) {
        return json!({ "$ref": reference });
    }

    visited.insert(reference.to_string());
    resolve(target, schemas, visited)
}

/// Schema name from a local component reference, JSON-pointer escapes decoded.
fn schema_name(reference: &str) -> Option<String> {
    let raw = reference.strip_prefix(COMPONENT_SCHEMA_PREFIX)?;
    if raw.is_empty() || raw.contains('/') {
        return None;
    }
    Some(raw.replace("~1", "/").replace("~0", "~"))
}
