use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A REST documentation document: typed at the top level, with schema
/// bodies as plain nested JSON values. Serialization to YAML/JSON text is
/// an external collaborator concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestDocument {
    pub openapi: String,
    pub info: DocInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<DocServer>,
    pub paths: IndexMap<String, IndexMap<String, DocOperation>>,
    pub components: DocComponents,
}

impl RestDocument {
    /// Internal reference to a component schema.
    pub fn schema_ref(name: &str) -> String {
        format!("#/components/schemas/{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocInfo {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocServer {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocOperation {
    #[serde(rename = "operationId")]
    pub operation_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Value>,

    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,

    pub responses: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocComponents {
    pub schemas: IndexMap<String, Value>,
}
