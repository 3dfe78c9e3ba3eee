//! REST documentation generation: Resource IR → [`RestDocument`].
//!
//! Two rendering modes share the path/operation conventions of the forward
//! converter. In structured mode each resource schema nests its attributes
//! and relationships, with relationship linkage rendered as
//! `{data: {id, type}}` envelopes; flat mode lifts everything to sibling
//! top-level properties and renders relationships as schema references.

mod document;

pub use document::{DocComponents, DocInfo, DocOperation, DocServer, RestDocument};

use heck::{ToPascalCase, ToSnakeCase};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::ir::{naming, Attribute, Cardinality, Relationship, ResourceDefinition, ResourceSchema};
use crate::typemap;

/// Options for the documentation generator.
#[derive(Debug, Clone, Default)]
pub struct DocOptions {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub servers: Vec<DocServer>,
    /// Nest attributes/relationships per resource instead of flattening
    /// them to sibling properties.
    pub structured_format: bool,
}

/// Generate a REST document for every resource in the schema. A pure
/// function: the IR is never mutated and repeated calls yield identical
/// documents.
pub fn generate(schema: &ResourceSchema, options: &DocOptions) -> RestDocument {
    let mut paths = IndexMap::new();
    let mut schemas = IndexMap::new();

    for resource in &schema.resources {
        let names = ResourceNames::of(resource);
        schemas.insert(
            names.schema.clone(),
            resource_schema(resource, &names, options.structured_format),
        );
        schemas.insert(
            names.collection.clone(),
            collection_schema(&names, options.structured_format),
        );
        add_paths(&mut paths, resource, &names);
    }

    RestDocument {
        openapi: "3.0.3".to_string(),
        info: DocInfo {
            title: options
                .title
                .clone()
                .or_else(|| schema.title.clone())
                .unwrap_or_else(|| "API".to_string()),
            version: options
                .version
                .clone()
                .or_else(|| schema.version.clone())
                .unwrap_or_else(|| "1.0.0".to_string()),
            description: options
                .description
                .clone()
                .or_else(|| schema.description.clone()),
        },
        servers: options.servers.clone(),
        paths,
        components: DocComponents { schemas },
    }
}

/// The derived names one resource contributes to the document.
struct ResourceNames {
    /// Component schema key, e.g. `Article`.
    schema: String,
    /// Paired collection schema key, e.g. `ArticleCollection`.
    collection: String,
    /// Route/discriminator slug, e.g. `articles`.
    slug: String,
    /// Operation name stem, e.g. `Articles`.
    model: String,
    /// Identity field, `id` unless overridden.
    id_field: String,
}

impl ResourceNames {
    fn of(resource: &ResourceDefinition) -> Self {
        let schema = resource.name.to_pascal_case();
        let base = resource
            .resource_type
            .clone()
            .unwrap_or_else(|| resource.name.to_snake_case());
        ResourceNames {
            collection: format!("{schema}Collection"),
            slug: resource.slug(),
            model: naming::model_name(&base),
            id_field: resource.id_field.clone().unwrap_or_else(|| "id".to_string()),
            schema,
        }
    }
}

/// Schema key a relationship target resolves to.
fn target_schema_name(target_slug: &str) -> String {
    naming::singularize(target_slug).to_pascal_case()
}

fn resource_schema(resource: &ResourceDefinition, names: &ResourceNames, structured: bool) -> Value {
    if structured {
        structured_schema(resource, names)
    } else {
        flat_schema(resource, names)
    }
}

fn flat_schema(resource: &ResourceDefinition, names: &ResourceNames) -> Value {
    let mut properties = Map::new();
    properties.insert(
        names.id_field.clone(),
        json!({"type": "integer", "format": "int64"}),
    );
    properties.insert(
        "type".to_string(),
        json!({"type": "string", "enum": [names.slug]}),
    );

    let mut required = vec![names.id_field.clone(), "type".to_string()];
    for attribute in &resource.attributes {
        properties.insert(attribute.name.clone(), attribute_schema(attribute));
        if !attribute.nullable {
            required.push(attribute.name.clone());
        }
    }
    for relationship in &resource.relationships {
        properties.insert(
            relationship.name.clone(),
            flat_relationship_schema(relationship),
        );
        if !relationship.nullable {
            required.push(relationship.name.clone());
        }
    }

    let mut schema = json!({
        "type": "object",
        "properties": properties,
        "required": required,
    });
    if let Some(description) = &resource.description {
        schema["description"] = json!(description);
    }
    schema
}

fn structured_schema(resource: &ResourceDefinition, names: &ResourceNames) -> Value {
    let mut attr_properties = Map::new();
    let mut attr_required = Vec::new();
    for attribute in &resource.attributes {
        attr_properties.insert(attribute.name.clone(), attribute_schema(attribute));
        if !attribute.nullable {
            attr_required.push(attribute.name.clone());
        }
    }

    let mut properties = Map::new();
    properties.insert(names.id_field.clone(), json!({"type": "string"}));
    properties.insert(
        "type".to_string(),
        json!({"type": "string", "enum": [names.slug]}),
    );
    properties.insert(
        "attributes".to_string(),
        json!({
            "type": "object",
            "properties": attr_properties,
            "required": attr_required,
        }),
    );

    if !resource.relationships.is_empty() {
        let mut rel_properties = Map::new();
        let mut rel_required = Vec::new();
        for relationship in &resource.relationships {
            rel_properties.insert(
                relationship.name.clone(),
                linkage_schema(relationship),
            );
            if !relationship.nullable {
                rel_required.push(relationship.name.clone());
            }
        }
        properties.insert(
            "relationships".to_string(),
            json!({
                "type": "object",
                "properties": rel_properties,
                "required": rel_required,
            }),
        );
    }

    let mut schema = json!({
        "type": "object",
        "properties": properties,
        "required": [names.id_field, "type"],
    });
    if let Some(description) = &resource.description {
        schema["description"] = json!(description);
    }
    schema
}

fn attribute_schema(attribute: &Attribute) -> Value {
    let mut schema = Map::new();
    if let Some(values) = &attribute.enum_values {
        schema.insert("type".to_string(), json!("string"));
        schema.insert("enum".to_string(), json!(values));
    } else {
        let (doc_type, format) = typemap::semantic_to_doc(attribute.semantic_type);
        schema.insert("type".to_string(), json!(doc_type));
        if let Some(format) = format {
            schema.insert("format".to_string(), json!(format));
        }
    }
    if attribute.nullable {
        schema.insert("nullable".to_string(), json!(true));
    }
    if let Some(description) = &attribute.description {
        schema.insert("description".to_string(), json!(description));
    }
    Value::Object(schema)
}

fn flat_relationship_schema(relationship: &Relationship) -> Value {
    let reference = RestDocument::schema_ref(&target_schema_name(&relationship.target_resource));
    match relationship.cardinality {
        Cardinality::Plural => {
            let mut schema = json!({"type": "array", "items": {"$ref": reference}});
            if relationship.nullable {
                schema["nullable"] = json!(true);
            }
            schema
        }
        Cardinality::Singular if relationship.nullable => {
            // `$ref` takes no siblings; the nullable wrapper goes through
            // `allOf`.
            json!({"allOf": [{"$ref": reference}], "nullable": true})
        }
        Cardinality::Singular => json!({"$ref": reference}),
    }
}

/// `{data: {id, type}}` (singular) or `{data: [{id, type}]}` (plural).
fn linkage_schema(relationship: &Relationship) -> Value {
    let mut identifier = json!({
        "type": "object",
        "properties": {
            "id": {"type": "string"},
            "type": {"type": "string", "enum": [relationship.target_resource]},
        },
        "required": ["id", "type"],
    });
    let data = match relationship.cardinality {
        Cardinality::Singular => {
            if relationship.nullable {
                identifier["nullable"] = json!(true);
            }
            identifier
        }
        Cardinality::Plural => json!({"type": "array", "items": identifier}),
    };
    json!({
        "type": "object",
        "properties": {"data": data},
    })
}

fn collection_schema(names: &ResourceNames, structured: bool) -> Value {
    let reference = RestDocument::schema_ref(&names.schema);
    if structured {
        json!({
            "type": "object",
            "properties": {
                "data": {"type": "array", "items": {"$ref": reference}},
                "meta": {"type": "object"},
            },
            "required": ["data"],
        })
    } else {
        json!({"type": "array", "items": {"$ref": reference}})
    }
}

fn add_paths(
    paths: &mut IndexMap<String, IndexMap<String, DocOperation>>,
    resource: &ResourceDefinition,
    names: &ResourceNames,
) {
    let collection_path = format!("/{}", names.slug);
    let member_path = format!("/{}/{{id}}", names.slug);
    let resource_ref = RestDocument::schema_ref(&names.schema);
    let collection_ref = RestDocument::schema_ref(&names.collection);

    let mut collection_ops = IndexMap::new();
    collection_ops.insert(
        "get".to_string(),
        DocOperation {
            operation_id: format!("list{}", names.model),
            summary: Some(format!("List {}", names.slug)),
            tags: vec![names.slug.clone()],
            parameters: vec![],
            request_body: None,
            responses: responses([(200, body_response("OK", &collection_ref))]),
        },
    );
    collection_ops.insert(
        "post".to_string(),
        DocOperation {
            operation_id: format!("create{}", names.model),
            summary: Some(format!("Create one of {}", names.slug)),
            tags: vec![names.slug.clone()],
            parameters: vec![],
            request_body: Some(request_body(&resource_ref)),
            responses: responses([
                (201, body_response("Created", &resource_ref)),
                (400, plain_response("Bad request")),
            ]),
        },
    );
    paths.insert(collection_path, collection_ops);

    let id_parameter = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": {"type": "string"},
    });

    let mut member_ops = IndexMap::new();
    member_ops.insert(
        "get".to_string(),
        DocOperation {
            operation_id: format!("get{}", names.model),
            summary: Some(format!("Fetch one of {}", names.slug)),
            tags: vec![names.slug.clone()],
            parameters: vec![id_parameter.clone()],
            request_body: None,
            responses: responses([
                (200, body_response("OK", &resource_ref)),
                (404, plain_response("Not found")),
            ]),
        },
    );
    member_ops.insert(
        "patch".to_string(),
        DocOperation {
            operation_id: format!("update{}", names.model),
            summary: Some(format!("Update one of {}", names.slug)),
            tags: vec![names.slug.clone()],
            parameters: vec![id_parameter.clone()],
            request_body: Some(request_body(&resource_ref)),
            responses: responses([
                (200, body_response("OK", &resource_ref)),
                (404, plain_response("Not found")),
            ]),
        },
    );
    member_ops.insert(
        "delete".to_string(),
        DocOperation {
            operation_id: format!("delete{}", names.model),
            summary: Some(format!("Delete one of {}", names.slug)),
            tags: vec![names.slug.clone()],
            parameters: vec![id_parameter],
            request_body: None,
            responses: responses([
                (204, plain_response("Deleted")),
                (404, plain_response("Not found")),
            ]),
        },
    );
    paths.insert(member_path, member_ops);
}

fn responses<const N: usize>(entries: [(u16, Value); N]) -> IndexMap<String, Value> {
    entries
        .into_iter()
        .map(|(status, body)| (status.to_string(), body))
        .collect()
}

fn body_response(description: &str, reference: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": reference}}},
    })
}

fn plain_response(description: &str) -> Value {
    json!({"description": description})
}

fn request_body(reference: &str) -> Value {
    json!({
        "required": true,
        "content": {"application/json": {"schema": {"$ref": reference}}},
    })
}
