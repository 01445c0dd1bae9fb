//! Error types for doppel.

use thiserror::Error;

/// Errors raised by the matching core.
///
/// Both variants are invariant violations coming from upstream integration
/// bugs, not expected runtime conditions. They propagate immediately and
/// must not be absorbed or retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DoppelError {
    /// A match was constructed from two fragments of the same document.
    #[error("match fragments must come from two distinct documents, both are from '{0}'")]
    SameDocument(String),

    /// A match for a different document pair was added to a
    /// [`DocumentPairMatches`](crate::model::matches::DocumentPairMatches).
    #[error(
        "match between '{match_doc1}' and '{match_doc2}' does not belong to the pair ('{pair_doc1}', '{pair_doc2}')"
    )]
    DifferentDocumentPair {
        pair_doc1: String,
        pair_doc2: String,
        match_doc1: String,
        match_doc2: String,
    },
}

/// Result type for doppel operations.
pub type Result<T> = std::result::Result<T, DoppelError>;
