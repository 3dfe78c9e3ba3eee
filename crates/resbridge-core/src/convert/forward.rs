//! Forward conversion: Resource IR → definition document.

use std::collections::HashSet;

use heck::ToSnakeCase;

use crate::convert::Conversion;
use crate::definition::{
    types, Definition, HttpMethod, Model, Namespace, Operation, Property, PropertyKind,
};
use crate::ir::{naming, Attribute, Cardinality, Relationship, ResourceDefinition, ResourceSchema};
use crate::typemap;

/// Options for the forward converter.
#[derive(Debug, Clone)]
pub struct ForwardOptions {
    /// Namespace every generated model and operation lands in.
    pub namespace: String,
    pub include_relationships: bool,
    /// Synthesize the five CRUD operations per resource.
    pub generate_operations: bool,
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

impl Default for ForwardOptions {
    fn default() -> Self {
        ForwardOptions {
            namespace: "Api".to_string(),
            include_relationships: true,
            generate_operations: false,
            title: None,
            version: None,
            description: None,
        }
    }
}

/// Convert an IR schema to a definition document. Element-level failures
/// are demoted to warnings; a schema-level shape violation yields an empty
/// document plus an error entry. Never panics, never returns `Err`.
pub fn forward(schema: &ResourceSchema, options: &ForwardOptions) -> Conversion<Definition> {
    let mut out = Conversion::new(Definition::default());

    if let Err(message) = check_schema(schema) {
        out.fail(message);
        return out;
    }

    let mut namespace = Namespace {
        name: options.namespace.clone(),
        models: Vec::new(),
        operations: Vec::new(),
    };

    for resource in &schema.resources {
        match convert_resource(resource, options, &mut out) {
            Ok(model) => {
                if options.generate_operations {
                    namespace
                        .operations
                        .extend(crud_operations(&model.name, &resource.slug()));
                }
                namespace.models.push(model);
            }
            Err(message) => out.warn(message),
        }
    }

    out.value = Definition {
        title: options.title.clone().or_else(|| schema.title.clone()),
        version: options.version.clone().or_else(|| schema.version.clone()),
        description: options
            .description
            .clone()
            .or_else(|| schema.description.clone()),
        namespaces: vec![namespace],
    };
    out
}

/// The only condition treated as a top-level shape violation: resource
/// types must be unique across the schema.
fn check_schema(schema: &ResourceSchema) -> Result<(), String> {
    let mut seen = HashSet::new();
    for resource in &schema.resources {
        if let Some(slug) = &resource.resource_type {
            if !seen.insert(slug.as_str()) {
                return Err(format!("duplicate resource type in schema: {slug}"));
            }
        }
    }
    Ok(())
}

fn convert_resource(
    resource: &ResourceDefinition,
    options: &ForwardOptions,
    out: &mut Conversion<Definition>,
) -> Result<Model, String> {
    if resource.name.is_empty() {
        return Err("skipping resource with an empty name".to_string());
    }

    let base = resource
        .resource_type
        .clone()
        .unwrap_or_else(|| resource.name.to_snake_case());
    let model_name = naming::model_name(&base);

    let mut model = Model {
        name: model_name.clone(),
        properties: Vec::new(),
        description: resource.description.clone(),
        discriminator: Some("type".to_string()),
    };

    let mut seen = HashSet::new();
    for attribute in &resource.attributes {
        match attribute_property(attribute) {
            Ok(property) => {
                if !seen.insert(property.name.clone()) {
                    out.warn(format!(
                        "{model_name}: duplicate attribute {} dropped",
                        property.name
                    ));
                    continue;
                }
                model.properties.push(property);
            }
            Err(message) => out.warn(format!("{model_name}: {message}")),
        }
    }

    if options.include_relationships {
        for relationship in &resource.relationships {
            match relationship_property(relationship) {
                Ok(property) => {
                    if !seen.insert(property.name.clone()) {
                        out.warn(format!(
                            "{model_name}: relationship {} collides with an attribute, dropped",
                            property.name
                        ));
                        continue;
                    }
                    model.properties.push(property);
                }
                Err(message) => out.warn(format!("{model_name}: {message}")),
            }
        }
    }

    Ok(model)
}

fn attribute_property(attribute: &Attribute) -> Result<Property, String> {
    let name = naming::member_name(&attribute.name);
    if !naming::is_identifier(&name) {
        return Err(format!(
            "attribute {:?} does not map to a usable member name",
            attribute.name
        ));
    }

    // Enum values force a closed string union regardless of the semantic
    // type.
    let (type_expr, kind) = match &attribute.enum_values {
        Some(values) if values.is_empty() => {
            return Err(format!("attribute {name} declares an empty enum"));
        }
        Some(values) => (types::render_enum(values), PropertyKind::Enum),
        None => (
            typemap::semantic_to_definition(attribute.semantic_type).to_string(),
            PropertyKind::Scalar,
        ),
    };

    let type_expr = if attribute.nullable {
        types::render_nullable(&type_expr)
    } else {
        type_expr
    };

    Ok(Property {
        name,
        type_expr,
        kind,
        optional: attribute.nullable,
        description: attribute.description.clone(),
    })
}

fn relationship_property(relationship: &Relationship) -> Result<Property, String> {
    let name = naming::member_name(&relationship.name);
    if !naming::is_identifier(&name) {
        return Err(format!(
            "relationship {:?} does not map to a usable member name",
            relationship.name
        ));
    }
    if relationship.target_resource.is_empty() {
        return Err(format!("relationship {name} has an empty target"));
    }

    let mut type_expr = format!(
        "{}{}",
        naming::reference_name(&relationship.target_resource),
        typemap::cardinality_suffix(relationship.cardinality)
    );
    if relationship.nullable {
        type_expr = types::render_nullable(&type_expr);
    }

    let kind = match relationship.cardinality {
        Cardinality::Singular => PropertyKind::SingularRelation,
        Cardinality::Plural => PropertyKind::PluralRelation,
    };

    Ok(Property {
        name,
        type_expr,
        kind,
        optional: relationship.nullable,
        description: relationship.description.clone(),
    })
}

/// The five deterministic CRUD operations for one resource.
fn crud_operations(model_name: &str, slug: &str) -> Vec<Operation> {
    let collection = format!("/{slug}");
    let member = format!("/{slug}/{{id}}");
    vec![
        Operation {
            name: format!("list{model_name}"),
            method: HttpMethod::Get,
            path: collection.clone(),
            statuses: vec![200],
            model: Some(model_name.to_string()),
        },
        Operation {
            name: format!("get{model_name}"),
            method: HttpMethod::Get,
            path: member.clone(),
            statuses: vec![200, 404],
            model: Some(model_name.to_string()),
        },
        Operation {
            name: format!("create{model_name}"),
            method: HttpMethod::Post,
            path: collection,
            statuses: vec![201, 400],
            model: Some(model_name.to_string()),
        },
        Operation {
            name: format!("update{model_name}"),
            method: HttpMethod::Patch,
            path: member.clone(),
            statuses: vec![200, 404],
            model: Some(model_name.to_string()),
        },
        Operation {
            name: format!("delete{model_name}"),
            method: HttpMethod::Delete,
            path: member,
            statuses: vec![204, 404],
            model: Some(model_name.to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::SemanticType;

    fn article_resource() -> ResourceDefinition {
        let mut r = ResourceDefinition::named("article");
        r.resource_type = Some("articles".to_string());
        r.attributes.push(Attribute::new("title", SemanticType::String));
        let mut published = Attribute::new("published_at", SemanticType::Date);
        published.nullable = true;
        r.attributes.push(published);
        r.relationships
            .push(Relationship::new("author", Cardinality::Singular, "authors"));
        r
    }

    #[test]
    fn test_property_mapping() {
        let out = forward(
            &ResourceSchema::single(article_resource()),
            &ForwardOptions::default(),
        );
        assert!(out.is_clean());
        let model = out.value.find_model("Articles").expect("Articles model");
        assert_eq!(model.properties.len(), 3);
        assert_eq!(model.properties[0].type_expr, "string");
        assert_eq!(model.properties[1].name, "publishedAt");
        assert_eq!(model.properties[1].type_expr, "utcDateTime | null");
        assert!(model.properties[1].optional);
        assert_eq!(model.properties[2].type_expr, "Authors");
        assert_eq!(model.properties[2].kind, PropertyKind::SingularRelation);
        assert_eq!(model.discriminator.as_deref(), Some("type"));
    }

    #[test]
    fn test_cardinality_preserved_in_property_count() {
        let resource = article_resource();
        let expected = resource.attributes.len() + resource.relationships.len();
        let out = forward(
            &ResourceSchema::single(resource),
            &ForwardOptions::default(),
        );
        let model = &out.value.namespaces[0].models[0];
        assert_eq!(model.properties.len(), expected);
    }

    #[test]
    fn test_enum_overrides_semantic_type() {
        let mut r = ResourceDefinition::named("article");
        let mut status = Attribute::new("status", SemanticType::Integer);
        status.enum_values = Some(vec!["draft".to_string(), "published".to_string()]);
        r.attributes.push(status);
        let out = forward(&ResourceSchema::single(r), &ForwardOptions::default());
        let property = &out.value.namespaces[0].models[0].properties[0];
        assert_eq!(property.type_expr, "\"draft\" | \"published\"");
        assert_eq!(property.kind, PropertyKind::Enum);
    }

    #[test]
    fn test_plural_nullable_relationship() {
        let mut r = ResourceDefinition::named("article");
        let mut rel = Relationship::new("comments", Cardinality::Plural, "comments");
        rel.nullable = true;
        r.relationships.push(rel);
        let out = forward(&ResourceSchema::single(r), &ForwardOptions::default());
        let property = &out.value.namespaces[0].models[0].properties[0];
        assert_eq!(property.type_expr, "Comments[] | null");
        assert_eq!(property.kind, PropertyKind::PluralRelation);
    }

    #[test]
    fn test_relationships_can_be_excluded() {
        let out = forward(
            &ResourceSchema::single(article_resource()),
            &ForwardOptions {
                include_relationships: false,
                ..ForwardOptions::default()
            },
        );
        assert_eq!(out.value.namespaces[0].models[0].properties.len(), 2);
    }

    #[test]
    fn test_operations_synthesis() {
        let out = forward(
            &ResourceSchema::single(article_resource()),
            &ForwardOptions {
                generate_operations: true,
                ..ForwardOptions::default()
            },
        );
        let ops = &out.value.namespaces[0].operations;
        assert_eq!(ops.len(), 5);
        let get = ops.iter().find(|o| o.name == "getArticles").unwrap();
        assert_eq!(get.path, "/articles/{id}");
        assert_eq!(get.statuses, vec![200, 404]);
        let create = ops.iter().find(|o| o.name == "createArticles").unwrap();
        assert_eq!(create.method, HttpMethod::Post);
        assert_eq!(create.statuses, vec![201, 400]);
        let delete = ops.iter().find(|o| o.name == "deleteArticles").unwrap();
        assert_eq!(delete.statuses, vec![204, 404]);
    }

    #[test]
    fn test_bad_attribute_is_demoted_to_warning() {
        let mut resource = article_resource();
        resource.attributes.push(Attribute::new("", SemanticType::String));
        let out = forward(
            &ResourceSchema::single(resource),
            &ForwardOptions::default(),
        );
        assert!(!out.warnings.is_empty());
        assert!(out.errors.is_empty());
        // Unaffected properties survive.
        assert_eq!(out.value.namespaces[0].models[0].properties.len(), 3);
    }

    #[test]
    fn test_duplicate_resource_type_is_a_top_level_error() {
        let mut schema = ResourceSchema::single(article_resource());
        schema.resources.push(article_resource());
        let out = forward(&schema, &ForwardOptions::default());
        assert!(out.has_errors());
        assert!(out.value.namespaces.is_empty());
    }

    #[test]
    fn test_model_name_without_resource_type() {
        let r = ResourceDefinition::named("BlogEntry");
        let out = forward(&ResourceSchema::single(r), &ForwardOptions::default());
        assert_eq!(out.value.namespaces[0].models[0].name, "BlogEntries");
    }
}
