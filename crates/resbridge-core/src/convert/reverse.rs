//! Reverse conversion: definition document → Resource IR.

use std::collections::HashSet;

use heck::ToLowerCamelCase;

use crate::convert::Conversion;
use crate::definition::types::{self, TypeShape};
use crate::definition::{Definition, Model, Property, PropertyKind};
use crate::ir::{
    naming, Attribute, Cardinality, Relationship, ResourceDefinition, ResourceSchema, SemanticType,
};

/// Options for the reverse converter.
#[derive(Debug, Clone, Default)]
pub struct ReverseOptions {
    pub title: Option<String>,
    pub version: Option<String>,
}

/// Convert a definition document back to an IR schema. Properties with no
/// IR representation (arrays of primitives, out-of-grammar unions) are
/// dropped with a warning; only duplicate model names abort the whole
/// conversion. Never panics, never returns `Err`.
pub fn reverse(definition: &Definition, options: &ReverseOptions) -> Conversion<ResourceSchema> {
    let mut out = Conversion::new(ResourceSchema::default());

    if let Err(message) = check_definition(definition) {
        out.fail(message);
        return out;
    }

    let mut schema = ResourceSchema {
        title: options.title.clone().or_else(|| definition.title.clone()),
        version: options.version.clone().or_else(|| definition.version.clone()),
        description: definition.description.clone(),
        resources: Vec::new(),
    };

    for namespace in &definition.namespaces {
        for model in &namespace.models {
            match convert_model(model, &namespace.name, &mut out) {
                Ok(resource) => schema.resources.push(resource),
                Err(message) => out.warn(message),
            }
        }
    }

    out.value = schema;
    out
}

fn check_definition(definition: &Definition) -> Result<(), String> {
    let mut seen = HashSet::new();
    for namespace in &definition.namespaces {
        for model in &namespace.models {
            if !seen.insert(model.name.as_str()) {
                return Err(format!("duplicate model name in definition: {}", model.name));
            }
        }
    }
    Ok(())
}

fn convert_model(
    model: &Model,
    namespace: &str,
    out: &mut Conversion<ResourceSchema>,
) -> Result<ResourceDefinition, String> {
    if model.name.is_empty() {
        return Err("skipping model with an empty name".to_string());
    }

    // De-pluralize and lower-camel-case the model name. Not a guaranteed
    // inverse of the forward pluralization for irregular plurals.
    let slug = naming::slug_from_model(&model.name);

    let mut resource = ResourceDefinition::named(&slug);
    resource.resource_type = Some(slug.clone());
    resource.description = model.description.clone();
    if !namespace.is_empty() {
        resource.namespace = Some(namespace.to_string());
    }

    let mut seen = HashSet::new();
    for property in &model.properties {
        if !seen.insert(property.name.clone()) {
            out.warn(format!(
                "{}: duplicate property {} dropped",
                model.name, property.name
            ));
            continue;
        }
        match classify(property) {
            Classified::Attribute(attribute) => resource.attributes.push(attribute),
            Classified::Relationship(relationship) => {
                resource.relationships.push(relationship)
            }
            Classified::Dropped(reason) => {
                out.warn(format!("{}: {reason}", model.name));
            }
        }
    }

    Ok(resource)
}

enum Classified {
    Attribute(Attribute),
    Relationship(Relationship),
    Dropped(String),
}

/// Classify one property as attribute or relationship. The explicit kind
/// recorded at creation wins; documents produced by external tools carry
/// `Unspecified` and fall back to the structural test on the type
/// expression.
fn classify(property: &Property) -> Classified {
    let parsed = types::parse_type(&property.type_expr);
    let nullable = parsed.nullable || property.optional;

    if let Some(cardinality) = property.kind.relation_cardinality() {
        let target = match &parsed.shape {
            TypeShape::Reference { target, .. } => target.clone(),
            _ => strip_type_suffixes(&property.type_expr),
        };
        return Classified::Relationship(relationship(
            property,
            cardinality,
            &target,
            nullable,
        ));
    }

    match &parsed.shape {
        TypeShape::Scalar(semantic) => {
            let mut attribute = Attribute::new(&property.name, *semantic);
            attribute.nullable = nullable;
            attribute.description = property.description.clone();
            Classified::Attribute(attribute)
        }
        TypeShape::Enum(values) => {
            let mut attribute = Attribute::new(&property.name, SemanticType::String);
            attribute.nullable = nullable;
            attribute.enum_values = Some(values.clone());
            attribute.description = property.description.clone();
            Classified::Attribute(attribute)
        }
        TypeShape::Reference { target, plural } => {
            let cardinality = if *plural {
                Cardinality::Plural
            } else {
                Cardinality::Singular
            };
            Classified::Relationship(relationship(property, cardinality, target, nullable))
        }
        TypeShape::ScalarArray(_) => Classified::Dropped(format!(
            "property {} is an array of a primitive type and has no IR representation, dropped",
            property.name
        )),
        TypeShape::Other(expr) => Classified::Dropped(format!(
            "property {} has unsupported type {expr:?}, dropped",
            property.name
        )),
    }
}

fn relationship(
    property: &Property,
    cardinality: Cardinality,
    target: &str,
    nullable: bool,
) -> Relationship {
    let mut rel = Relationship::new(
        &property.name,
        cardinality,
        target.to_lower_camel_case(),
    );
    rel.nullable = nullable;
    rel.description = property.description.clone();
    rel
}

/// Best-effort base token for a property whose explicit kind says
/// "relation" but whose type expression did not parse as a reference.
fn strip_type_suffixes(type_expr: &str) -> String {
    let base = type_expr
        .split('|')
        .next()
        .unwrap_or(type_expr)
        .trim();
    base.strip_suffix("[]").unwrap_or(base).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Namespace;

    fn definition_with(model: Model) -> Definition {
        Definition {
            namespaces: vec![Namespace {
                name: "Api".to_string(),
                models: vec![model],
                operations: vec![],
            }],
            ..Definition::default()
        }
    }

    fn property(name: &str, type_expr: &str) -> Property {
        Property {
            name: name.to_string(),
            type_expr: type_expr.to_string(),
            kind: PropertyKind::Unspecified,
            optional: false,
            description: None,
        }
    }

    #[test]
    fn test_scalar_properties_become_attributes() {
        let model = Model {
            name: "Articles".to_string(),
            properties: vec![
                property("title", "string"),
                property("publishedAt", "utcDateTime | null"),
            ],
            ..Model::default()
        };
        let out = reverse(&definition_with(model), &ReverseOptions::default());
        assert!(out.is_clean());
        let resource = &out.value.resources[0];
        assert_eq!(resource.name, "article");
        assert_eq!(resource.resource_type.as_deref(), Some("article"));
        assert_eq!(resource.attributes.len(), 2);
        assert_eq!(resource.attributes[1].semantic_type, SemanticType::Date);
        assert!(resource.attributes[1].nullable);
    }

    #[test]
    fn test_uppercase_tokens_become_relationships() {
        let model = Model {
            name: "Articles".to_string(),
            properties: vec![
                property("author", "Authors"),
                property("comments", "Comments[]"),
            ],
            ..Model::default()
        };
        let out = reverse(&definition_with(model), &ReverseOptions::default());
        let resource = &out.value.resources[0];
        assert_eq!(resource.relationships.len(), 2);
        assert_eq!(resource.relationships[0].cardinality, Cardinality::Singular);
        assert_eq!(resource.relationships[0].target_resource, "authors");
        assert_eq!(resource.relationships[1].cardinality, Cardinality::Plural);
        assert_eq!(resource.relationships[1].target_resource, "comments");
    }

    #[test]
    fn test_explicit_kind_wins_over_lexical_test() {
        let mut p = property("author", "Authors | null");
        p.kind = PropertyKind::SingularRelation;
        let model = Model {
            name: "Articles".to_string(),
            properties: vec![p],
            ..Model::default()
        };
        let out = reverse(&definition_with(model), &ReverseOptions::default());
        let rel = &out.value.resources[0].relationships[0];
        assert!(rel.nullable);
        assert_eq!(rel.target_resource, "authors");
    }

    #[test]
    fn test_enum_union_recovers_enum_attribute() {
        let model = Model {
            name: "Articles".to_string(),
            properties: vec![property("status", "\"draft\" | \"published\"")],
            ..Model::default()
        };
        let out = reverse(&definition_with(model), &ReverseOptions::default());
        let attr = &out.value.resources[0].attributes[0];
        assert_eq!(attr.semantic_type, SemanticType::String);
        assert_eq!(
            attr.enum_values.as_deref(),
            Some(["draft".to_string(), "published".to_string()].as_slice())
        );
    }

    #[test]
    fn test_primitive_array_is_dropped_with_warning() {
        let model = Model {
            name: "Articles".to_string(),
            properties: vec![property("tags", "string[]"), property("title", "string")],
            ..Model::default()
        };
        let out = reverse(&definition_with(model), &ReverseOptions::default());
        assert_eq!(out.warnings.len(), 1);
        let resource = &out.value.resources[0];
        assert_eq!(resource.attributes.len(), 1);
        assert!(resource.relationships.is_empty());
    }

    #[test]
    fn test_duplicate_model_names_abort_with_empty_schema() {
        let mut def = definition_with(Model {
            name: "Articles".to_string(),
            ..Model::default()
        });
        def.namespaces[0].models.push(Model {
            name: "Articles".to_string(),
            ..Model::default()
        });
        let out = reverse(&def, &ReverseOptions::default());
        assert!(out.has_errors());
        assert!(out.value.resources.is_empty());
    }

    #[test]
    fn test_depluralization_table() {
        for (model, slug) in [("Categories", "category"), ("Boxes", "box"), ("Posts", "post")] {
            let out = reverse(
                &definition_with(Model {
                    name: model.to_string(),
                    ..Model::default()
                }),
                &ReverseOptions::default(),
            );
            assert_eq!(out.value.resources[0].resource_type.as_deref(), Some(slug));
        }
    }
}
