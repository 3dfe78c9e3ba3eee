//! Bidirectional conversion between the Resource IR and the definition
//! document. Both directions follow the same diagnostics discipline:
//! element-level failures are demoted to warnings and the element is
//! skipped; only a top-level shape violation produces an `errors` entry,
//! and then the accompanying value is a safe empty default. Neither
//! direction panics or returns `Err`.

mod forward;
mod reverse;

pub use forward::{forward, ForwardOptions};
pub use reverse::{reverse, ReverseOptions};

use serde::Serialize;

/// A conversion result: the converted value plus accumulated diagnostics.
/// A non-empty `errors` list means `value` is a safe but possibly empty
/// default — callers should inspect both lists.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion<T> {
    pub value: T,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl<T> Conversion<T> {
    pub fn new(value: T) -> Self {
        Conversion {
            value,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Record a demoted element-level failure.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.warnings.push(message);
    }

    /// Record a top-level failure. The value should already be the empty
    /// default when this is called.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{message}");
        self.errors.push(message);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
