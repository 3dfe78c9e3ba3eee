//! Semantic type inference for extracted attributes. A pure function of
//! the attribute name plus, when an accessor block is present, the block
//! text. Rules apply in order; the first match wins and the default is
//! string.

use crate::ir::SemanticType;

/// Infer from the attribute name alone.
pub(crate) fn from_name(name: &str) -> SemanticType {
    infer(name, None)
}

/// Infer from the attribute name and optional accessor block text.
pub(crate) fn infer(name: &str, block: Option<&str>) -> SemanticType {
    if name.ends_with("_id") || name == "id" {
        return SemanticType::Integer;
    }
    if name.ends_with("_at")
        || name.ends_with("_on")
        || name.ends_with("_date")
        || name.ends_with("_time")
        || name.contains("timestamp")
    {
        return SemanticType::Date;
    }
    if name.starts_with("is_")
        || name.starts_with("has_")
        || name.ends_with("_flag")
        || name.ends_with('?')
    {
        return SemanticType::Boolean;
    }
    if name.ends_with("_count") || name.ends_with("_size") {
        return SemanticType::Integer;
    }

    if let Some(text) = block {
        if text.contains(".length") || text.contains(".size") || text.contains(".count") {
            return SemanticType::Integer;
        }
        if text.contains(".present?")
            || text.contains(".empty?")
            || text.contains(".any?")
            || text.contains(".blank?")
            || text.contains(".nil?")
        {
            return SemanticType::Boolean;
        }
        if text.contains("strftime")
            || text.contains("iso8601")
            || text.contains("to_date")
            || text.contains("to_time")
        {
            return SemanticType::Date;
        }
    }

    SemanticType::String
}
