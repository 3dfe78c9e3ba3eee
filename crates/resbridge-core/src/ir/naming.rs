use heck::{ToLowerCamelCase, ToPascalCase};

/// Pluralize a resource slug with the fixed suffix table: trailing `y`
/// becomes `ies`; trailing `s`, `sh`, `ch`, `x`, `z` gains `es`; anything
/// else gains `s`.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return word.to_string();
    }
    if word.ends_with('y') {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    if word.ends_with('s')
        || word.ends_with("sh")
        || word.ends_with("ch")
        || word.ends_with('x')
        || word.ends_with('z')
    {
        return format!("{word}es");
    }
    format!("{word}s")
}

/// Exact inverse of the [`pluralize`] suffix table. Irregular plurals that
/// never came from `pluralize` round-trip only best-effort.
pub fn singularize(word: &str) -> String {
    if word.ends_with("ies") && word.len() > 3 {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if (word.ends_with("ses")
        || word.ends_with("shes")
        || word.ends_with("ches")
        || word.ends_with("xes")
        || word.ends_with("zes"))
        && word.len() > 3
    {
        return word[..word.len() - 2].to_string();
    }
    if word.ends_with('s') && !word.ends_with("ss") && word.len() > 1 {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Model name for a resource slug: PascalCased plural. Slugs that already
/// look plural (their singularization differs) are kept as-is rather than
/// pluralized twice.
pub fn model_name(slug: &str) -> String {
    ensure_plural(slug).to_pascal_case()
}

fn ensure_plural(word: &str) -> String {
    if singularize(word) != word {
        word.to_string()
    } else {
        pluralize(word)
    }
}

/// Recover a resource slug from a model name: de-pluralize, then
/// lowerCamelCase.
pub fn slug_from_model(model: &str) -> String {
    singularize(&model.to_lower_camel_case())
}

/// Property/member name in the definition language.
pub fn member_name(name: &str) -> String {
    name.to_lower_camel_case()
}

/// Reference type name for a relationship target slug.
pub fn reference_name(slug: &str) -> String {
    slug.to_pascal_case()
}

/// Whether a name is usable as an identifier across all three
/// representations: ASCII alphanumerics and underscores, not starting with
/// a digit.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
