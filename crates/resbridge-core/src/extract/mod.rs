//! Source extraction: recovering a [`ResourceDefinition`] from serializer
//! DSL source text.
//!
//! Two interchangeable strategies implement the [`Extract`] capability:
//!
//! - [`HeuristicExtractor`] scans line by line with a block-depth counter.
//!   Fast and forgiving, with a documented blind spot around constructs
//!   that never produce a standalone closing token.
//! - [`TreeExtractor`] tokenizes the source and builds a small concrete
//!   syntax tree with a recursive-descent parser, then extracts by walking
//!   the tree. It resolves the scanner's blind spot at the cost of a
//!   stricter view of the input.
//!
//! Callers pick a strategy at construction time via [`extractor_for`].

mod infer;
mod lexer;
mod scanner;
mod tree;

pub use scanner::HeuristicExtractor;
pub use tree::TreeExtractor;

use serde::Deserialize;

use crate::error::ExtractError;
use crate::ir::{naming, Attribute, Cardinality, Relationship, ResourceDefinition};

/// Extraction strategy over serializer DSL source text.
pub trait Extract {
    /// Recover a resource definition from source text. `fallback_name` is
    /// used when the class declaration carries no usable name (typically
    /// derived from a file name by the caller).
    fn extract(
        &self,
        source: &str,
        fallback_name: &str,
    ) -> Result<ResourceDefinition, ExtractError>;
}

/// Which extraction strategy to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    #[default]
    Heuristic,
    Tree,
}

/// Construct the extractor for a strategy kind.
pub fn extractor_for(kind: ExtractorKind) -> Box<dyn Extract> {
    match kind {
        ExtractorKind::Heuristic => Box::new(HeuristicExtractor),
        ExtractorKind::Tree => Box::new(TreeExtractor),
    }
}

/// Tolerant variant of [`Extract::extract`]: a source with no recognizable
/// class declaration yields an empty definition named from the fallback
/// instead of an error.
pub fn extract_or_default(
    kind: ExtractorKind,
    source: &str,
    fallback_name: &str,
) -> ResourceDefinition {
    match extractor_for(kind).extract(source, fallback_name) {
        Ok(def) => def,
        Err(ExtractError::MissingDeclaration) => {
            log::debug!("no declaration found, falling back to empty definition");
            ResourceDefinition::named(resource_name(fallback_name))
        }
    }
}

/// One recognized top-level directive inside a resource class body. Both
/// extraction strategies reduce source text to a sequence of these before
/// assembly.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Directive {
    ResourceType(String),
    IdField(String),
    /// `attributes :a, :b, :c` — every name on the line.
    Attributes(Vec<String>),
    /// `attribute :name`, optionally with a delegate option or an accessor
    /// block whose text feeds type inference.
    Attribute {
        name: String,
        delegate: Option<String>,
        block: Option<String>,
    },
    Relationship {
        name: String,
        cardinality: Cardinality,
        target: Option<String>,
        nullable: bool,
    },
    /// Cache hints are recognized so they don't read as noise, then
    /// discarded.
    CacheHint,
}

/// What an extraction strategy recovered before assembly.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawResource {
    pub class_name: String,
    pub namespace: Vec<String>,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
}

/// Resource name for a class name: the conventional `Resource` /
/// `Serializer` suffix is dropped.
pub(crate) fn resource_name(class_name: &str) -> String {
    let name = class_name
        .strip_suffix("Resource")
        .or_else(|| class_name.strip_suffix("Serializer"))
        .unwrap_or(class_name);
    if name.is_empty() {
        class_name.to_string()
    } else {
        name.to_string()
    }
}

/// Build the final definition from recovered directives. Duplicate
/// attribute names keep their first occurrence; later ones are dropped to
/// preserve the uniqueness invariant.
pub(crate) fn assemble(raw: RawResource) -> ResourceDefinition {
    let mut def = ResourceDefinition::named(resource_name(&raw.class_name));
    def.description = raw.description;
    if !raw.namespace.is_empty() {
        def.namespace = Some(raw.namespace.join("."));
    }

    for directive in raw.directives {
        match directive {
            Directive::ResourceType(slug) => def.resource_type = Some(slug),
            Directive::IdField(name) => def.id_field = Some(name),
            Directive::Attributes(names) => {
                for name in names {
                    push_attribute(&mut def, Attribute::new(&name, infer::from_name(&name)));
                }
            }
            Directive::Attribute {
                name,
                delegate,
                block,
            } => {
                let mut attr =
                    Attribute::new(&name, infer::infer(&name, block.as_deref()));
                // A custom accessor body gives no reliable return type, so
                // the value is treated as possibly absent.
                attr.nullable = block.is_some();
                attr.custom_accessor = delegate;
                push_attribute(&mut def, attr);
            }
            Directive::Relationship {
                name,
                cardinality,
                target,
                nullable,
            } => {
                let target = target.unwrap_or_else(|| default_target(&name, cardinality));
                let mut rel = Relationship::new(&name, cardinality, target);
                rel.nullable = nullable;
                def.relationships.push(rel);
            }
            Directive::CacheHint => {}
        }
    }

    def
}

fn push_attribute(def: &mut ResourceDefinition, attr: Attribute) {
    if def.attributes.iter().any(|a| a.name == attr.name) {
        log::debug!("dropping duplicate attribute declaration: {}", attr.name);
        return;
    }
    def.attributes.push(attr);
}

/// Target slug for a relationship with no explicit override: plural
/// relationship names already are slugs; singular ones are pluralized.
fn default_target(name: &str, cardinality: Cardinality) -> String {
    match cardinality {
        Cardinality::Singular => naming::pluralize(name),
        Cardinality::Plural => name.to_string(),
    }
}

/// Consecutive comment lines immediately above the first class declaration
/// become the resource description.
pub(crate) fn leading_description(source: &str) -> Option<String> {
    let mut pending: Vec<String> = Vec::new();
    for raw in source.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            pending.push(comment.trim().to_string());
            continue;
        }
        if line.starts_with("class ") {
            break;
        }
        pending.clear();
    }
    if pending.is_empty() {
        None
    } else {
        Some(pending.join(" "))
    }
}
