//! Extraction and mapping core for resbridge: serializer DSL source text is
//! recovered into a canonical resource IR, which converts forward into a
//! typed API definition document, back again, and out to a REST
//! documentation document. All public entry points are pure functions; file
//! I/O lives with the callers.

pub mod config;
pub mod convert;
pub mod definition;
pub mod docgen;
pub mod error;
pub mod extract;
pub mod ir;
pub mod typemap;

pub use convert::Conversion;
pub use error::ExtractError;
pub use extract::{extract_or_default, extractor_for, Extract, ExtractorKind};
