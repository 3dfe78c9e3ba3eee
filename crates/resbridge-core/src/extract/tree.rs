//! Tree-based extraction strategy. The tokens from [`super::lexer`] are
//! parsed into a small concrete syntax tree by recursive descent, and the
//! definition is recovered by walking the tree. Because block structure is
//! parsed rather than counted, directives that follow a custom accessor
//! block are attributed correctly — the heuristic scanner's known blind
//! spot does not apply here.

use crate::error::ExtractError;
use crate::extract::lexer::{render_tokens, tokenize, Keyword, Token};
use crate::extract::{assemble, leading_description, Directive, Extract, RawResource};
use crate::ir::{Cardinality, ResourceDefinition};

pub struct TreeExtractor;

impl Extract for TreeExtractor {
    fn extract(
        &self,
        source: &str,
        fallback_name: &str,
    ) -> Result<ResourceDefinition, ExtractError> {
        let tokens = tokenize(source);
        let mut parser = Parser { tokens: &tokens, pos: 0 };
        let nodes = parser.parse_nodes(false);

        let mut namespace = Vec::new();
        let Some(class) = find_class(&nodes, &mut namespace) else {
            return Err(ExtractError::MissingDeclaration);
        };

        let mut raw = RawResource {
            class_name: if class.name.is_empty() {
                fallback_name.to_string()
            } else {
                class.name.clone()
            },
            namespace,
            description: leading_description(source),
            directives: Vec::new(),
        };
        raw.namespace.extend(class.scope.iter().cloned());
        for node in &class.body {
            if let Node::Directive(directive) = node {
                raw.directives.push(directive.clone());
            }
        }
        Ok(assemble(raw))
    }
}

#[derive(Debug)]
enum Node {
    Module { name: String, body: Vec<Node> },
    Class(ClassNode),
    Directive(Directive),
    /// Method definitions, nested control flow, expression statements —
    /// parsed for structure, ignored for content.
    Opaque,
}

#[derive(Debug)]
struct ClassNode {
    name: String,
    /// Leading `A::B::` segments of a scoped class name.
    scope: Vec<String>,
    body: Vec<Node>,
}

/// Depth-first search for the first class declaration, accumulating the
/// module path above it.
fn find_class<'a>(nodes: &'a [Node], namespace: &mut Vec<String>) -> Option<&'a ClassNode> {
    for node in nodes {
        match node {
            Node::Class(class) => return Some(class),
            Node::Module { name, body } => {
                namespace.push(name.clone());
                if let Some(found) = find_class(body, namespace) {
                    return Some(found);
                }
                namespace.pop();
            }
            _ => {}
        }
    }
    None
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek(), Some(Token::Newline)) {
            self.pos += 1;
        }
    }

    /// Parse statements until EOF, or until a balancing `end` when
    /// `until_end` is set. Unbalanced input is tolerated: EOF closes every
    /// open construct.
    fn parse_nodes(&mut self, until_end: bool) -> Vec<Node> {
        let mut nodes = Vec::new();
        loop {
            self.skip_newlines();
            match self.peek() {
                None => break,
                Some(Token::Keyword(Keyword::End)) if until_end => {
                    self.pos += 1;
                    break;
                }
                Some(Token::Keyword(Keyword::End)) => {
                    // Stray close; skip it.
                    self.pos += 1;
                }
                Some(Token::Keyword(Keyword::Module)) => {
                    self.pos += 1;
                    let name = match self.next() {
                        Some(Token::Const(name)) => name.clone(),
                        _ => {
                            self.skip_statement();
                            continue;
                        }
                    };
                    let body = self.parse_nodes(true);
                    nodes.push(Node::Module { name, body });
                }
                Some(Token::Keyword(Keyword::Class)) => {
                    self.pos += 1;
                    let mut path = self.const_path();
                    if matches!(self.peek(), Some(Token::Lt)) {
                        self.skip_to_newline();
                    }
                    let name = path.pop().unwrap_or_default();
                    let body = self.parse_nodes(true);
                    nodes.push(Node::Class(ClassNode {
                        name,
                        scope: path,
                        body,
                    }));
                }
                Some(Token::Keyword(Keyword::Def)) => {
                    self.pos += 1;
                    self.skip_method();
                    nodes.push(Node::Opaque);
                }
                Some(Token::Keyword(
                    Keyword::If
                    | Keyword::Unless
                    | Keyword::Case
                    | Keyword::While
                    | Keyword::Until
                    | Keyword::Begin,
                )) => {
                    self.pos += 1;
                    self.skip_block_body();
                    nodes.push(Node::Opaque);
                }
                Some(Token::Ident(word)) => {
                    if let Some(directive) = self.parse_directive(word.clone()) {
                        nodes.push(Node::Directive(directive));
                    } else {
                        nodes.push(Node::Opaque);
                    }
                }
                Some(_) => {
                    self.skip_statement();
                    nodes.push(Node::Opaque);
                }
            }
        }
        nodes
    }

    /// `A` or `A::B::C` after a `class`/`module` keyword.
    fn const_path(&mut self) -> Vec<String> {
        let mut path = Vec::new();
        while let Some(Token::Const(name)) = self.peek() {
            path.push(name.clone());
            self.pos += 1;
            if matches!(self.peek(), Some(Token::Scope)) {
                self.pos += 1;
            } else {
                break;
            }
        }
        path
    }

    /// Skip a method definition. Endless form (`def slug = expr`) ends at
    /// the newline; the block form runs to its matching `end`.
    fn skip_method(&mut self) {
        let mut endless = false;
        loop {
            match self.peek() {
                None | Some(Token::Newline) => break,
                Some(Token::Assign) => {
                    endless = true;
                    self.skip_to_newline();
                    break;
                }
                _ => {
                    self.pos += 1;
                }
            }
        }
        if !endless {
            self.skip_block_body();
        }
    }

    /// Consume the body of an already-opened block through its matching
    /// `end`. Openers are only counted in statement position, so modifier
    /// conditionals don't unbalance the walk.
    fn skip_block_body(&mut self) {
        self.block_body(|_| {});
    }

    fn block_body<F: FnMut(&'a Token)>(&mut self, mut visit: F) {
        let mut depth = 1u32;
        let mut at_statement_start = true;
        while let Some(token) = self.next() {
            match token {
                Token::Newline => {
                    at_statement_start = true;
                    visit(token);
                    continue;
                }
                Token::Keyword(Keyword::End) => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                Token::Keyword(Keyword::Do) => depth += 1,
                Token::Keyword(Keyword::Def) if at_statement_start => {
                    if !self.def_is_endless() {
                        depth += 1;
                    }
                }
                Token::Keyword(
                    Keyword::If
                    | Keyword::Unless
                    | Keyword::Case
                    | Keyword::While
                    | Keyword::Until
                    | Keyword::Begin,
                ) if at_statement_start => depth += 1,
                Token::Keyword(Keyword::Class | Keyword::Module) if at_statement_start => {
                    depth += 1
                }
                _ => {}
            }
            at_statement_start = false;
            visit(token);
        }
    }

    /// Lookahead: does the `def` just consumed use the endless form?
    fn def_is_endless(&self) -> bool {
        let mut i = self.pos;
        while let Some(token) = self.tokens.get(i) {
            match token {
                Token::Newline => return false,
                Token::Assign => return true,
                _ => i += 1,
            }
        }
        false
    }

    fn skip_to_newline(&mut self) {
        while let Some(token) = self.next() {
            if matches!(token, Token::Newline) {
                break;
            }
        }
    }

    /// Skip one expression statement, including any `do … end` block that
    /// hangs off it.
    fn skip_statement(&mut self) {
        while let Some(token) = self.next() {
            match token {
                Token::Newline => return,
                Token::Keyword(Keyword::Do) => {
                    self.skip_block_body();
                    return;
                }
                _ => {}
            }
        }
    }

    /// Recognize a directive statement starting at the identifier `word`.
    /// Consumes the statement either way; returns `None` when the word is
    /// not a directive keyword.
    fn parse_directive(&mut self, word: String) -> Option<Directive> {
        let known = matches!(
            word.as_str(),
            "resource_type"
                | "model_name"
                | "id_field"
                | "primary_key"
                | "attributes"
                | "attribute"
                | "has_one"
                | "belongs_to"
                | "has_many"
                | "caches"
                | "cache_field"
                | "cache_key"
        );
        if !known {
            self.skip_statement();
            return None;
        }
        self.pos += 1;

        let mut args: Vec<&'a Token> = Vec::new();
        let mut opens_block = false;
        loop {
            match self.peek() {
                None | Some(Token::Newline) => break,
                Some(Token::Keyword(Keyword::Do)) => {
                    self.pos += 1;
                    opens_block = true;
                    break;
                }
                Some(token) => {
                    args.push(token);
                    self.pos += 1;
                }
            }
        }

        let block = if opens_block {
            let mut body: Vec<Token> = Vec::new();
            self.block_body(|t| body.push(t.clone()));
            Some(render_tokens(&body))
        } else {
            None
        };

        let positional = positional_names(&args);
        match word.as_str() {
            "resource_type" | "model_name" => {
                Some(Directive::ResourceType(positional.first()?.clone()))
            }
            "id_field" | "primary_key" => Some(Directive::IdField(positional.first()?.clone())),
            "attributes" => {
                if positional.is_empty() {
                    None
                } else {
                    Some(Directive::Attributes(positional))
                }
            }
            "attribute" => Some(Directive::Attribute {
                name: positional.first()?.clone(),
                delegate: option_value(&args, "delegate"),
                block,
            }),
            "has_one" | "belongs_to" => relationship(&args, &positional, Cardinality::Singular),
            "has_many" => relationship(&args, &positional, Cardinality::Plural),
            "caches" | "cache_field" | "cache_key" => Some(Directive::CacheHint),
            _ => None,
        }
    }
}

fn relationship(
    args: &[&Token],
    positional: &[String],
    cardinality: Cardinality,
) -> Option<Directive> {
    // Only the first name on a multi-name line is captured.
    Some(Directive::Relationship {
        name: positional.first()?.clone(),
        cardinality,
        target: option_value(args, "resource").or_else(|| option_value(args, "class_name")),
        nullable: option_value(args, "optional").is_some_and(|v| v == "true"),
    })
}

/// Positional `:symbol` / string arguments, up to the first `key:` option.
fn positional_names(args: &[&Token]) -> Vec<String> {
    let mut names = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i] {
            Token::Symbol(s) | Token::Str(s) => {
                // A symbol followed by `:` is actually an option key.
                if matches!(args.get(i + 1), Some(Token::Colon)) {
                    break;
                }
                names.push(s.clone());
                i += 1;
            }
            Token::Ident(_) if matches!(args.get(i + 1), Some(Token::Colon)) => break,
            Token::Comma => i += 1,
            _ => break,
        }
    }
    names
}

/// Value of a `key: value` option argument, rendered as a plain string.
fn option_value(args: &[&Token], key: &str) -> Option<String> {
    let mut i = 0;
    while i + 1 < args.len() {
        if let (Token::Ident(k), Token::Colon) = (args[i], args[i + 1]) {
            if k == key {
                return args.get(i + 2).and_then(|t| match t {
                    Token::Symbol(s) | Token::Str(s) | Token::Ident(s) | Token::Const(s)
                    | Token::Number(s) => Some(s.clone()),
                    _ => None,
                });
            }
        }
        i += 1;
    }
    None
}
