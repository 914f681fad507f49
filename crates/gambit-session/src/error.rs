//! Error types for the session layer.

use gambit_model::{ModelError, RoomId};

/// Errors that can occur during session operations.
///
/// Failures are classified, never swallowed: a failed read aborts the
/// operation before any write happens, and store errors pass through
/// unmodified — no retry, no backoff at this layer.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No room document exists for this id. Retrying will not help;
    /// either the id is wrong or the room was never created.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Both seats are occupied. The caller decides what to offer
    /// instead (spectating, a queue, a new room).
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The game already reached its terminal state; the requested
    /// mutation would extend a dead game.
    #[error("room {0} is already finished")]
    GameFinished(RoomId),

    /// The room document failed encoding, decoding, or boundary
    /// validation.
    #[error("bad document for room {0}: {1}")]
    Document(RoomId, #[source] ModelError),

    /// A store operation failed. The underlying transport error is
    /// carried unmodified.
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl SessionError {
    /// Wraps a store collaborator error.
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }
}
