//! Error types for the in-memory store.

/// Errors that can occur in [`MemoryStore`](crate::MemoryStore)
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    /// A merge targeted a path with no existing document.
    #[error("no document at {0}")]
    Missing(String),

    /// A merge was attempted with a non-object partial, or against a
    /// non-object document. Top-level field merge is only defined
    /// between JSON objects.
    #[error("cannot merge non-object values at {0}")]
    InvalidMerge(String),
}
