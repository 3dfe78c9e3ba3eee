//! Line-oriented heuristic extraction. No grammar: the scanner walks the
//! source a line at a time, tracking whether it is inside the class body
//! and a signed block-depth counter. Directives are recognized only at
//! depth zero.
//!
//! Known blind spot: the depth counter pairs block-opening keywords with a
//! standalone `end` line. Constructs that never produce one — single-line
//! method bodies (`def slug; title.downcase; end`), endless method
//! definitions — leave the counter inflated, and every later top-level
//! directive is then treated as block payload and silently dropped. The
//! [`super::TreeExtractor`] parses block structure and does not share this
//! limitation.

use crate::error::ExtractError;
use crate::extract::{
    assemble, leading_description, Directive, Extract, RawResource,
};
use crate::ir::{Cardinality, ResourceDefinition};

pub struct HeuristicExtractor;

impl Extract for HeuristicExtractor {
    fn extract(
        &self,
        source: &str,
        fallback_name: &str,
    ) -> Result<ResourceDefinition, ExtractError> {
        let mut raw = RawResource::default();
        let mut found_class = false;
        let mut class_done = false;
        let mut depth: i32 = 0;
        let mut block: Option<BlockCapture> = None;

        for raw_line in source.lines() {
            let line_owned = strip_comment(raw_line);
            let line = line_owned.trim();
            if line.is_empty() || class_done {
                continue;
            }

            if !found_class {
                if let Some(name) = keyword_arg(line, "module ") {
                    raw.namespace.push(name.to_string());
                } else if let Some(decl) = keyword_arg(line, "class ") {
                    let const_path = decl.split('<').next().unwrap_or(decl).trim();
                    let mut segments: Vec<&str> =
                        const_path.split("::").map(str::trim).collect();
                    let class_name = segments.pop().unwrap_or(const_path);
                    raw.namespace.extend(segments.iter().map(|s| s.to_string()));
                    raw.class_name = if class_name.is_empty() {
                        fallback_name.to_string()
                    } else {
                        class_name.to_string()
                    };
                    found_class = true;
                    depth = 0;
                }
                continue;
            }

            if let Some(capture) = &mut block {
                depth += depth_delta(line);
                if depth <= capture.start_depth {
                    let text = capture.lines.join("\n");
                    raw.directives.push(Directive::Attribute {
                        name: capture.name.clone(),
                        delegate: None,
                        block: Some(text),
                    });
                    block = None;
                } else {
                    capture.lines.push(line.to_string());
                }
                continue;
            }

            if depth == 0 {
                if is_end(line) {
                    class_done = true;
                    continue;
                }
                if let Some(parsed) = parse_directive_line(line) {
                    if parsed.opens_block {
                        depth += 1;
                        match parsed.directive {
                            Directive::Attribute { name, .. } => {
                                block = Some(BlockCapture {
                                    name,
                                    start_depth: 0,
                                    lines: Vec::new(),
                                });
                            }
                            other => {
                                // Non-attribute directives keep their line
                                // form; the block body is skipped.
                                raw.directives.push(other);
                            }
                        }
                    } else {
                        raw.directives.push(parsed.directive);
                    }
                    continue;
                }
                depth += depth_delta(line);
                depth = depth.max(0);
            } else {
                depth += depth_delta(line);
                depth = depth.max(0);
            }
        }

        if !found_class {
            return Err(ExtractError::MissingDeclaration);
        }
        if raw.class_name.is_empty() {
            raw.class_name = fallback_name.to_string();
        }
        raw.description = leading_description(source);
        Ok(assemble(raw))
    }
}

struct BlockCapture {
    name: String,
    start_depth: i32,
    lines: Vec<String>,
}

pub(crate) struct LineDirective {
    pub directive: Directive,
    pub opens_block: bool,
}

/// Recognize one directive line. Returns `None` for anything that is not a
/// directive; the caller decides what depth bookkeeping applies.
pub(crate) fn parse_directive_line(line: &str) -> Option<LineDirective> {
    let (word, rest) = split_word(line);
    let opens_block = line.ends_with(" do") || line.contains(" do |");

    let directive = match word {
        "resource_type" | "model_name" => Directive::ResourceType(first_name(rest)?),
        "id_field" | "primary_key" => Directive::IdField(first_name(rest)?),
        "attributes" => {
            let names = name_args(rest);
            if names.is_empty() {
                return None;
            }
            Directive::Attributes(names)
        }
        "attribute" => Directive::Attribute {
            name: first_name(rest)?,
            delegate: option_arg(rest, "delegate"),
            block: None,
        },
        "has_one" | "belongs_to" => relationship(rest, Cardinality::Singular)?,
        "has_many" => relationship(rest, Cardinality::Plural)?,
        "caches" | "cache_field" | "cache_key" => Directive::CacheHint,
        _ => return None,
    };

    Some(LineDirective {
        directive,
        opens_block,
    })
}

fn relationship(rest: &str, cardinality: Cardinality) -> Option<Directive> {
    // Only the first name on a multi-name line is captured.
    let name = first_name(rest)?;
    Some(Directive::Relationship {
        name,
        cardinality,
        target: option_arg(rest, "resource").or_else(|| option_arg(rest, "class_name")),
        nullable: option_arg(rest, "optional").is_some_and(|v| v == "true"),
    })
}

fn split_word(line: &str) -> (&str, &str) {
    match line.find(char::is_whitespace) {
        Some(i) => (&line[..i], line[i..].trim_start()),
        None => (line, ""),
    }
}

/// First positional argument: a `:symbol` or quoted string.
fn first_name(args: &str) -> Option<String> {
    let first = args.split(',').next()?.trim();
    parse_name(first)
}

/// Every positional `:symbol`/string argument, stopping at the first
/// `key: value` option.
fn name_args(args: &str) -> Vec<String> {
    let mut names = Vec::new();
    for part in args.split(',') {
        let part = part.trim();
        if part.is_empty() || is_option(part) {
            break;
        }
        if let Some(name) = parse_name(part) {
            names.push(name);
        }
    }
    names
}

fn parse_name(token: &str) -> Option<String> {
    let token = token.trim().trim_end_matches(" do").trim();
    if let Some(sym) = token.strip_prefix(':') {
        let sym = sym.trim();
        if !sym.is_empty() {
            return Some(sym.to_string());
        }
    }
    for quote in ['"', '\''] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return Some(token[1..token.len() - 1].to_string());
        }
    }
    None
}

/// `key: value` option arguments; values may be symbols, quoted strings, or
/// bare words.
fn option_arg(args: &str, key: &str) -> Option<String> {
    for part in args.split(',') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix(key) {
            let value = value.trim_start();
            if let Some(value) = value.strip_prefix(':') {
                let value = value.trim();
                return parse_name(value).or_else(|| Some(value.to_string()));
            }
        }
    }
    None
}

fn is_option(part: &str) -> bool {
    !part.starts_with(':') && part.contains(':')
}

/// Signed depth contribution of a line: +1 for block-opening tokens, -1
/// for a standalone `end`.
fn depth_delta(line: &str) -> i32 {
    if is_end(line) {
        return -1;
    }
    let (word, _) = split_word(line);
    let opener_keyword = matches!(
        word,
        "def" | "if" | "unless" | "case" | "while" | "until" | "begin" | "class" | "module"
    );
    if opener_keyword || line.ends_with(" do") || line == "do" || line.contains(" do |") {
        return 1;
    }
    0
}

fn is_end(line: &str) -> bool {
    line == "end" || line.starts_with("end ")
}

fn keyword_arg<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix).map(str::trim)
}

/// Drop a trailing comment, respecting string quotes.
fn strip_comment(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_quote: Option<char> = None;
    for c in line.chars() {
        match in_quote {
            Some(q) => {
                if c == q {
                    in_quote = None;
                }
            }
            None => {
                if c == '#' {
                    break;
                }
                if c == '"' || c == '\'' {
                    in_quote = Some(c);
                }
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::SemanticType;

    fn extract(source: &str) -> ResourceDefinition {
        HeuristicExtractor.extract(source, "fallback").unwrap()
    }

    #[test]
    fn test_missing_declaration() {
        let err = HeuristicExtractor
            .extract("just some text\nwithout a class\n", "x")
            .unwrap_err();
        assert_eq!(err, ExtractError::MissingDeclaration);
    }

    #[test]
    fn test_empty_class_body_is_not_an_error() {
        let def = extract("class ArticleResource < Base\nend\n");
        assert_eq!(def.name, "Article");
        assert!(def.attributes.is_empty());
        assert!(def.relationships.is_empty());
    }

    #[test]
    fn test_attribute_list_line() {
        let def = extract(
            "class ArticleResource\n  attributes :title, :body, :word_count\nend\n",
        );
        let names: Vec<&str> = def.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["title", "body", "word_count"]);
        assert_eq!(def.attributes[2].semantic_type, SemanticType::Integer);
    }

    #[test]
    fn test_accessor_block_feeds_inference() {
        let src = "class ArticleResource\n  attribute :comment_total do\n    comments.count\n  end\n  attributes :title\nend\n";
        let def = extract(src);
        let attr = &def.attributes[0];
        assert_eq!(attr.name, "comment_total");
        assert_eq!(attr.semantic_type, SemanticType::Integer);
        assert!(attr.nullable);
        // The directive after a well-formed block is still seen.
        assert_eq!(def.attributes[1].name, "title");
    }

    #[test]
    fn test_delegate_form() {
        let def = extract(
            "class ArticleResource\n  attribute :reading_minutes, delegate: :estimate_reading\nend\n",
        );
        assert_eq!(
            def.attributes[0].custom_accessor.as_deref(),
            Some("estimate_reading")
        );
        assert_eq!(def.attributes[0].semantic_type, SemanticType::String);
    }

    #[test]
    fn test_relationships() {
        let src = "class ArticleResource\n  has_one :author\n  has_many :comments\n  belongs_to :category, optional: true\nend\n";
        let def = extract(src);
        assert_eq!(def.relationships.len(), 3);
        assert_eq!(def.relationships[0].cardinality, Cardinality::Singular);
        assert_eq!(def.relationships[0].target_resource, "authors");
        assert_eq!(def.relationships[1].cardinality, Cardinality::Plural);
        assert_eq!(def.relationships[1].target_resource, "comments");
        assert!(def.relationships[2].nullable);
        assert_eq!(def.relationships[2].target_resource, "categories");
    }

    #[test]
    fn test_relationship_target_override() {
        let def = extract(
            "class ArticleResource\n  has_many :comments, resource: :remarks\nend\n",
        );
        assert_eq!(def.relationships[0].target_resource, "remarks");
    }

    #[test]
    fn test_only_first_relationship_name_is_captured() {
        let def = extract("class ArticleResource\n  has_many :comments, :tags\nend\n");
        assert_eq!(def.relationships.len(), 1);
        assert_eq!(def.relationships[0].name, "comments");
    }

    #[test]
    fn test_resource_type_and_id_field() {
        let src = "class ArticleResource\n  resource_type :posts\n  id_field :uuid\nend\n";
        let def = extract(src);
        assert_eq!(def.resource_type.as_deref(), Some("posts"));
        assert_eq!(def.id_field.as_deref(), Some("uuid"));
    }

    #[test]
    fn test_cache_hints_are_discarded() {
        let src = "class ArticleResource\n  caches\n  cache_field :updated_at\n  attributes :title\nend\n";
        let def = extract(src);
        assert_eq!(def.attributes.len(), 1);
    }

    #[test]
    fn test_namespace_from_modules() {
        let src = "module Blog\n  module V2\n    class ArticleResource\n      attributes :title\n    end\n  end\nend\n";
        let def = extract(src);
        assert_eq!(def.namespace.as_deref(), Some("Blog.V2"));
        assert_eq!(def.attributes.len(), 1);
    }

    #[test]
    fn test_namespace_from_scoped_class_name() {
        let def = extract("class Blog::ArticleResource\nend\n");
        assert_eq!(def.name, "Article");
        assert_eq!(def.namespace.as_deref(), Some("Blog"));
    }

    #[test]
    fn test_directives_inside_methods_are_ignored() {
        let src = "class ArticleResource\n  def build\n    attributes :bogus\n  end\n  attributes :title\nend\n";
        let def = extract(src);
        let names: Vec<&str> = def.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["title"]);
    }

    #[test]
    fn test_known_blind_spot_single_line_method() {
        // `def slug; title.downcase; end` never yields a standalone `end`
        // line, so the depth counter stays inflated and the directive after
        // it is dropped. Documented limitation of the heuristic strategy.
        let src = "class ArticleResource\n  attributes :title\n  def slug; title.downcase; end\n  attributes :body\nend\n";
        let def = extract(src);
        let names: Vec<&str> = def.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["title"]);
    }

    #[test]
    fn test_comments_and_strings_do_not_confuse_the_scanner() {
        let src = "class ArticleResource\n  # has_many :ghosts\n  attributes :title # the headline\nend\n";
        let def = extract(src);
        assert_eq!(def.attributes.len(), 1);
        assert!(def.relationships.is_empty());
    }
}
