use resbridge_core::docgen::{generate, DocOptions, DocServer};
use resbridge_core::extract::HeuristicExtractor;
use resbridge_core::ir::ResourceSchema;
use resbridge_core::Extract;
use serde_json::Value;

const ARTICLE: &str = include_str!("fixtures/article.res");

fn article_schema() -> ResourceSchema {
    let resource = HeuristicExtractor.extract(ARTICLE, "article").unwrap();
    ResourceSchema {
        title: Some("Blog API".to_string()),
        version: Some("2.0.0".to_string()),
        resources: vec![resource],
        ..ResourceSchema::default()
    }
}

#[test]
fn extracted_resource_documents_end_to_end() {
    let doc = generate(&article_schema(), &DocOptions::default());

    assert_eq!(doc.openapi, "3.0.3");
    assert_eq!(doc.info.title, "Blog API");
    assert_eq!(doc.info.version, "2.0.0");

    assert!(doc.components.schemas.contains_key("Article"));
    assert!(doc.components.schemas.contains_key("ArticleCollection"));
    assert!(doc.paths.contains_key("/articles"));
    assert!(doc.paths.contains_key("/articles/{id}"));
}

#[test]
fn flat_mode_renders_siblings() {
    let doc = generate(&article_schema(), &DocOptions::default());
    let article = &doc.components.schemas["Article"];
    let properties = article["properties"].as_object().unwrap();

    // Attributes and relationships side by side.
    assert!(properties.contains_key("title"));
    assert!(properties.contains_key("author"));
    assert_eq!(
        properties["author"]["$ref"],
        Value::String("#/components/schemas/Author".to_string())
    );
    // Nullable singular relationships wrap the reference.
    assert!(properties["category"]["allOf"].is_array());
    assert_eq!(properties["category"]["nullable"], Value::Bool(true));

    let collection = &doc.components.schemas["ArticleCollection"];
    assert_eq!(collection["type"], Value::String("array".to_string()));
}

#[test]
fn structured_mode_nests_attributes_and_relationships() {
    let doc = generate(
        &article_schema(),
        &DocOptions {
            structured_format: true,
            ..DocOptions::default()
        },
    );
    let article = &doc.components.schemas["Article"];
    let properties = article["properties"].as_object().unwrap();

    let attributes = properties["attributes"]["properties"].as_object().unwrap();
    assert!(attributes.contains_key("title"));
    assert!(attributes.contains_key("published_at"));

    let relationships = properties["relationships"]["properties"]
        .as_object()
        .unwrap();
    let author_data = &relationships["author"]["properties"]["data"];
    assert_eq!(author_data["type"], Value::String("object".to_string()));
    assert_eq!(
        author_data["properties"]["type"]["enum"],
        serde_json::json!(["authors"])
    );
    let comments_data = &relationships["comments"]["properties"]["data"];
    assert_eq!(comments_data["type"], Value::String("array".to_string()));

    let collection = &doc.components.schemas["ArticleCollection"];
    assert_eq!(
        collection["properties"]["data"]["type"],
        Value::String("array".to_string())
    );
    assert!(collection["properties"]["meta"].is_object());
}

#[test]
fn required_set_tracks_nullability() {
    let doc = generate(&article_schema(), &DocOptions::default());
    let required: Vec<&str> = doc.components.schemas["Article"]["required"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();

    assert!(required.contains(&"id"));
    assert!(required.contains(&"type"));
    assert!(required.contains(&"title"));
    assert!(required.contains(&"author"));
    // The accessor-backed attribute and the optional relationship are
    // nullable, so they're absent.
    assert!(!required.contains(&"has_comments"));
    assert!(!required.contains(&"category"));
}

#[test]
fn status_code_conventions_match_the_forward_converter() {
    let doc = generate(&article_schema(), &DocOptions::default());

    let collection = &doc.paths["/articles"];
    assert!(collection["get"].responses.contains_key("200"));
    assert!(collection["post"].responses.contains_key("201"));
    assert!(collection["post"].responses.contains_key("400"));

    let member = &doc.paths["/articles/{id}"];
    for method in ["get", "patch"] {
        assert!(member[method].responses.contains_key("200"));
        assert!(member[method].responses.contains_key("404"));
    }
    assert!(member["delete"].responses.contains_key("204"));
    assert!(member["delete"].responses.contains_key("404"));
}

#[test]
fn servers_are_carried_into_the_document() {
    let doc = generate(
        &article_schema(),
        &DocOptions {
            servers: vec![DocServer {
                url: "https://blog.example.com/api".to_string(),
                description: None,
            }],
            ..DocOptions::default()
        },
    );
    assert_eq!(doc.servers.len(), 1);
    assert_eq!(doc.servers[0].url, "https://blog.example.com/api");
}

#[test]
fn generation_is_pure_and_repeatable() {
    let schema = article_schema();
    let options = DocOptions::default();
    let first = serde_json::to_string(&generate(&schema, &options)).unwrap();
    let second = serde_json::to_string(&generate(&schema, &options)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn operation_ids_are_deterministic() {
    let doc = generate(&article_schema(), &DocOptions::default());
    let ids: Vec<&str> = doc
        .paths
        .values()
        .flat_map(|ops| ops.values())
        .map(|op| op.operation_id.as_str())
        .collect();
    insta::assert_snapshot!(
        ids.join(", "),
        @"listArticles, createArticles, getArticles, updateArticles, deleteArticles"
    );
}
