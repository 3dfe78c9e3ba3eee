//! Pure lookup tables mapping semantic value kinds and relationship
//! cardinalities across the three representations. Every function here is
//! total over its input domain and allocation-free where possible.

use crate::ir::{Cardinality, SemanticType};

/// Definition-language scalar for a semantic type.
pub fn semantic_to_definition(ty: SemanticType) -> &'static str {
    match ty {
        SemanticType::String => "string",
        // 64-bit float-capable numeric; integers in the source have no
        // width information to preserve.
        SemanticType::Integer => "float64",
        SemanticType::Boolean => "boolean",
        SemanticType::Date => "utcDateTime",
        SemanticType::Array => "unknown[]",
        SemanticType::Object => "Record<unknown>",
    }
}

/// Reverse scalar lookup. `None` means the token is not a known scalar and
/// is a candidate reference type.
pub fn definition_to_semantic(token: &str) -> Option<SemanticType> {
    match token {
        "string" | "url" | "bytes" => Some(SemanticType::String),
        "float64" | "float32" | "int8" | "int16" | "int32" | "int64" | "integer" | "numeric"
        | "safeint" | "decimal" => Some(SemanticType::Integer),
        "boolean" => Some(SemanticType::Boolean),
        "utcDateTime" | "offsetDateTime" | "plainDate" | "plainTime" | "duration" => {
            Some(SemanticType::Date)
        }
        "unknown" => Some(SemanticType::Object),
        _ if token.starts_with("Record<") && token.ends_with('>') => Some(SemanticType::Object),
        _ => None,
    }
}

/// Whether a bare type token names a scalar rather than a model reference.
pub fn is_known_scalar(token: &str) -> bool {
    definition_to_semantic(token).is_some() || token == "null"
}

/// REST documentation `(type, format)` pair for a semantic type.
pub fn semantic_to_doc(ty: SemanticType) -> (&'static str, Option<&'static str>) {
    match ty {
        SemanticType::String => ("string", None),
        SemanticType::Integer => ("integer", Some("int64")),
        SemanticType::Boolean => ("boolean", None),
        SemanticType::Date => ("string", Some("date-time")),
        SemanticType::Array => ("array", None),
        SemanticType::Object => ("object", None),
    }
}

/// Array suffix carried by a relationship's definition-language type.
pub fn cardinality_suffix(cardinality: Cardinality) -> &'static str {
    match cardinality {
        Cardinality::Singular => "",
        Cardinality::Plural => "[]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_to_definition_is_total() {
        assert_eq!(semantic_to_definition(SemanticType::String), "string");
        assert_eq!(semantic_to_definition(SemanticType::Integer), "float64");
        assert_eq!(semantic_to_definition(SemanticType::Boolean), "boolean");
        assert_eq!(semantic_to_definition(SemanticType::Date), "utcDateTime");
        assert_eq!(semantic_to_definition(SemanticType::Array), "unknown[]");
        assert_eq!(
            semantic_to_definition(SemanticType::Object),
            "Record<unknown>"
        );
    }

    #[test]
    fn test_definition_scalars_round_trip() {
        for ty in [
            SemanticType::String,
            SemanticType::Integer,
            SemanticType::Boolean,
            SemanticType::Date,
        ] {
            let rendered = semantic_to_definition(ty);
            assert_eq!(definition_to_semantic(rendered), Some(ty));
        }
    }

    #[test]
    fn test_numeric_aliases_collapse_to_integer() {
        for alias in ["int32", "int64", "float32", "numeric", "safeint"] {
            assert_eq!(definition_to_semantic(alias), Some(SemanticType::Integer));
        }
    }

    #[test]
    fn test_references_are_not_scalars() {
        assert!(!is_known_scalar("Author"));
        assert!(!is_known_scalar("BlogPost"));
        assert!(is_known_scalar("Record<unknown>"));
        assert!(is_known_scalar("null"));
        assert!(is_known_scalar("utcDateTime"));
    }

    #[test]
    fn test_doc_pairs() {
        assert_eq!(semantic_to_doc(SemanticType::Date), ("string", Some("date-time")));
        assert_eq!(semantic_to_doc(SemanticType::Integer), ("integer", Some("int64")));
        assert_eq!(semantic_to_doc(SemanticType::String), ("string", None));
    }

    #[test]
    fn test_cardinality_suffix() {
        assert_eq!(cardinality_suffix(Cardinality::Singular), "");
        assert_eq!(cardinality_suffix(Cardinality::Plural), "[]");
    }
}
