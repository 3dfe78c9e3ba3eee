use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

/// The abstract value category of an attribute, used as the mapping key
/// between the three representations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    #[default]
    String,
    Integer,
    Boolean,
    Date,
    Array,
    Object,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::String => "string",
            SemanticType::Integer => "integer",
            SemanticType::Boolean => "boolean",
            SemanticType::Date => "date",
            SemanticType::Array => "array",
            SemanticType::Object => "object",
        }
    }
}

/// Singular vs. plural classification of a relationship. `Singular` covers
/// both belongs-to-one and has-exactly-one source forms; the two are
/// indistinguishable downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Singular,
    Plural,
}

/// A single resource attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,

    #[serde(rename = "type", default)]
    pub semantic_type: SemanticType,

    #[serde(default)]
    pub nullable: bool,

    /// When present, the attribute renders as a closed string union
    /// regardless of `semantic_type`.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Name of the delegate method when the source declared the attribute
    /// in the terse "delegate to named method" form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_accessor: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Attribute {
            name: name.into(),
            semantic_type,
            nullable: false,
            enum_values: None,
            description: None,
            custom_accessor: None,
        }
    }
}

/// A named link to another resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,

    pub cardinality: Cardinality,

    /// Plural slug of the resource this relationship points at.
    pub target_resource: String,

    #[serde(default)]
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Relationship {
    pub fn new(
        name: impl Into<String>,
        cardinality: Cardinality,
        target_resource: impl Into<String>,
    ) -> Self {
        Relationship {
            name: name.into(),
            cardinality,
            target_resource: target_resource.into(),
            nullable: false,
            description: None,
        }
    }
}

/// The canonical definition of a single resource. Produced once (by an
/// extractor or by direct construction) and treated as immutable after
/// that; every converter is a pure function over it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    pub name: String,

    /// Plural slug used in routes and discriminator values. May be absent,
    /// in which case converters derive one from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field: Option<String>,

    #[serde(default)]
    pub attributes: Vec<Attribute>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,

    /// Dotted module path the resource was declared under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ResourceDefinition {
    /// An empty definition carrying only a name, used when no declaration
    /// could be recovered from source text.
    pub fn named(name: impl Into<String>) -> Self {
        ResourceDefinition {
            name: name.into(),
            ..ResourceDefinition::default()
        }
    }

    /// Route/discriminator slug: the declared resource type, or one derived
    /// from the resource name.
    pub fn slug(&self) -> String {
        match &self.resource_type {
            Some(t) => t.clone(),
            None => super::naming::pluralize(&self.name.to_snake_case()),
        }
    }
}

/// Document-level IR: the set of resources a single conversion operates on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub resources: Vec<ResourceDefinition>,
}

impl ResourceSchema {
    /// Wrap a single resource definition in a schema document.
    pub fn single(resource: ResourceDefinition) -> Self {
        ResourceSchema {
            resources: vec![resource],
            ..ResourceSchema::default()
        }
    }
}
