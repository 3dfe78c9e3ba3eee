//! Rendering and parsing of definition-language type expressions. The
//! grammar is deliberately small: scalar names, quoted-literal unions,
//! model references, a `[]` array suffix, and a ` | null` nullable union.

use crate::ir::SemanticType;
use crate::typemap;

/// Structural classification of a parsed type expression, after any
/// trailing `| null` has been stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// A known scalar name.
    Scalar(SemanticType),
    /// A union made entirely of quoted string literals.
    Enum(Vec<String>),
    /// An uppercase-first token that names a model.
    Reference { target: String, plural: bool },
    /// An array whose element is a known scalar. Has no IR representation.
    ScalarArray(SemanticType),
    /// Anything the grammar does not cover (mixed unions, empty input).
    Other(String),
}

/// A parsed type expression: its shape plus whether `| null` was present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedType {
    pub shape: TypeShape,
    pub nullable: bool,
}

/// Render enum values as a union of quoted literals.
pub fn render_enum(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Append the nullable alternative to a rendered type.
pub fn render_nullable(type_expr: &str) -> String {
    format!("{type_expr} | null")
}

/// Parse a rendered type expression back into its structural parts.
pub fn parse_type(expr: &str) -> ParsedType {
    let mut parts: Vec<&str> = expr.split('|').map(str::trim).collect();
    let nullable = parts.iter().any(|p| *p == "null");
    parts.retain(|p| *p != "null" && !p.is_empty());

    if parts.is_empty() {
        return ParsedType {
            shape: TypeShape::Other(expr.to_string()),
            nullable,
        };
    }

    // A union of quoted literals is an enum; a mixed union is out of
    // grammar.
    if parts.len() > 1 || is_quoted(parts[0]) {
        if parts.iter().all(|p| is_quoted(p)) {
            let values = parts.iter().map(|p| unquote(p).to_string()).collect();
            return ParsedType {
                shape: TypeShape::Enum(values),
                nullable,
            };
        }
        return ParsedType {
            shape: TypeShape::Other(expr.to_string()),
            nullable,
        };
    }

    let token = parts[0];
    let (base, plural) = match token.strip_suffix("[]") {
        Some(inner) => (inner.trim(), true),
        None => (token, false),
    };

    match typemap::definition_to_semantic(base) {
        Some(ty) if plural => ParsedType {
            shape: TypeShape::ScalarArray(ty),
            nullable,
        },
        Some(ty) => ParsedType {
            shape: TypeShape::Scalar(ty),
            nullable,
        },
        None if base.chars().next().is_some_and(|c| c.is_ascii_uppercase()) => ParsedType {
            shape: TypeShape::Reference {
                target: base.to_string(),
                plural,
            },
            nullable,
        },
        None => ParsedType {
            shape: TypeShape::Other(expr.to_string()),
            nullable,
        },
    }
}

fn is_quoted(part: &str) -> bool {
    part.len() >= 2 && part.starts_with('"') && part.ends_with('"')
}

fn unquote(part: &str) -> &str {
    &part[1..part.len() - 1]
}
