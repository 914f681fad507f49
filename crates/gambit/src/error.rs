//! Unified error type for the Gambit workspace.

use gambit_model::ModelError;
use gambit_session::SessionError;
use gambit_store::MemoryStoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `gambit` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GambitError {
    /// A model-level error (encode, decode, invalid document).
    #[error(transparent)]
    Model(#[from] ModelError),

    /// An in-memory store error (missing document, bad merge).
    #[error(transparent)]
    Store(#[from] MemoryStoreError),

    /// A session-level error (not found, room full, finished game).
    #[error(transparent)]
    Session(#[from] SessionError),
}
