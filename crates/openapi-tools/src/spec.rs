//! The parts of an `OpenAPI` document this crate reads.
//!
//! Only the top-level shape is typed. Path items, operations and schemas stay as
//! `serde_json::Value` so whatever the document contains is passed through untouched.

use crate::error::{OpenApiToolsError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Value>>,

    /// Path template -> path item. A document without `paths` has no endpoints.
    #[serde(default)]
    pub paths: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Schema name -> schema.
    #[serde(default)]
    pub schemas: Map<String, Value>,
}

impl Spec {
    /// Named schema under `components.schemas`.
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<&Value> {
        self.components.as_ref()?.schemas.get(name)
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.info.as_ref()?.title.as_deref()
    }
}

/// Parse a document as YAML, then as JSON if YAML refuses it.
///
/// # Errors
///
/// Returns [`OpenApiToolsError::OpenApiSpecParse`] carrying both parser errors when neither
/// format accepts `content`.
pub fn parse_spec(content: &str, location: &str) -> Result<Spec> {
    match serde_yaml::from_str::<Spec>(content) {
        Ok(spec) => Ok(spec),
        Err(yaml) => serde_json::from_str::<Spec>(content).map_err(|json| {
            OpenApiToolsError::OpenApiSpecParse {
                location: location.to_string(),
                yaml,
                json,
            }
        }),
    }
}
