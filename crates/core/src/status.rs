//! Shared error for document status machines.

use thiserror::Error;

/// A document was asked to move to a status its current status cannot reach.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot move {document} from '{from}' to '{to}'")]
pub struct InvalidTransition {
    /// Kind of document ("purchase order", "sale", ...).
    pub document: &'static str,
    /// Current status.
    pub from: &'static str,
    /// Requested status.
    pub to: &'static str,
}

impl InvalidTransition {
    /// Creates a new transition error.
    #[must_use]
    pub const fn new(document: &'static str, from: &'static str, to: &'static str) -> Self {
        Self { document, from, to }
    }
}
