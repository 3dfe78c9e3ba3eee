use thiserror::Error;

/// Errors surfaced by the source extractors. Everything else in the core is
/// demoted to accumulated warnings/errors on a [`crate::convert::Conversion`]
/// value; missing input files are a collaborator concern and never reach
/// this type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// No class-like construct was found anywhere in the source text.
    #[error("no resource class declaration found in source")]
    MissingDeclaration,
}
