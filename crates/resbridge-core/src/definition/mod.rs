//! The target definition-language document model. Values of these types are
//! the forward converter's output and the reverse converter's input; the
//! textual rendering of the definition language itself (imports, namespace
//! blocks, decorators) is an external collaborator's job.

pub mod types;

use serde::{Deserialize, Serialize};

use crate::ir::Cardinality;

/// A complete definition document: one or more namespaces plus the service
/// metadata an external renderer needs for its header decorations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub namespaces: Vec<Namespace>,
}

impl Definition {
    /// Total number of models across all namespaces.
    pub fn model_count(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.models.len()).sum()
    }

    /// Find a model by name across namespaces.
    pub fn find_model(&self, name: &str) -> Option<&Model> {
        self.namespaces
            .iter()
            .flat_map(|ns| ns.models.iter())
            .find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,

    #[serde(default)]
    pub models: Vec<Model>,

    #[serde(default)]
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,

    #[serde(default)]
    pub properties: Vec<Property>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Name of the field carrying the resource-type value. Every generated
    /// model is tagged with `"type"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
}

/// What kind of thing a property is, recorded when the property is created
/// so the reverse direction never has to re-infer it from surface syntax.
/// `Unspecified` appears on documents built by external tools; the reverse
/// converter falls back to lexical classification for those.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Scalar,
    Enum,
    SingularRelation,
    PluralRelation,
    #[default]
    Unspecified,
}

impl PropertyKind {
    pub fn relation_cardinality(&self) -> Option<Cardinality> {
        match self {
            PropertyKind::SingularRelation => Some(Cardinality::Singular),
            PropertyKind::PluralRelation => Some(Cardinality::Plural),
            _ => None,
        }
    }

    fn is_unspecified(&self) -> bool {
        *self == PropertyKind::Unspecified
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,

    /// Rendered type expression: primitives, unions (`A | B`), nullable
    /// unions (`T | null`), and arrays (`T[]`).
    #[serde(rename = "type")]
    pub type_expr: String,

    #[serde(default, skip_serializing_if = "PropertyKind::is_unspecified")]
    pub kind: PropertyKind,

    #[serde(default)]
    pub optional: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// HTTP method of a synthesized operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A synthesized CRUD operation attached to a namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,

    pub method: HttpMethod,

    pub path: String,

    /// Response status codes this operation is defined for.
    pub statuses: Vec<u16>,

    /// Model the operation reads or writes, when one applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_round_trips_through_json() {
        let def = Definition {
            title: Some("Blog".to_string()),
            namespaces: vec![Namespace {
                name: "Api".to_string(),
                models: vec![Model {
                    name: "Posts".to_string(),
                    properties: vec![Property {
                        name: "title".to_string(),
                        type_expr: "string".to_string(),
                        kind: PropertyKind::Scalar,
                        optional: false,
                        description: None,
                    }],
                    description: None,
                    discriminator: Some("type".to_string()),
                }],
                operations: vec![],
            }],
            ..Definition::default()
        };
        let json = serde_json::to_string(&def).unwrap();
        let back: Definition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, def);
    }

    #[test]
    fn test_kind_defaults_to_unspecified() {
        let json = r#"{"name": "title", "type": "string"}"#;
        let p: Property = serde_json::from_str(json).unwrap();
        assert_eq!(p.kind, PropertyKind::Unspecified);
        assert!(!p.optional);
    }

    #[test]
    fn test_relation_cardinality() {
        assert_eq!(
            PropertyKind::PluralRelation.relation_cardinality(),
            Some(Cardinality::Plural)
        );
        assert_eq!(PropertyKind::Scalar.relation_cardinality(), None);
    }

    #[test]
    fn test_find_model() {
        let mut def = Definition::default();
        def.namespaces.push(Namespace {
            name: "Api".to_string(),
            models: vec![Model {
                name: "Boxes".to_string(),
                ..Model::default()
            }],
            operations: vec![],
        });
        assert!(def.find_model("Boxes").is_some());
        assert!(def.find_model("Crates").is_none());
        assert_eq!(def.model_count(), 1);
    }
}
