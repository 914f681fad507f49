//! Error types for the model layer.
//!
//! Each crate in Gambit defines its own error enum. A `ModelError` always
//! means a problem with the shape of the data — encoding, decoding, or a
//! document that violates the room invariants — never a storage or
//! session failure.

/// Errors that can occur while converting rooms to and from documents.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Serialization failed (turning a room into a JSON document).
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Deserialization failed (turning a JSON document into a room).
    ///
    /// Common causes: missing required fields, wrong data types, or a
    /// document written by an incompatible client version.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The document deserialized but violates a room invariant.
    ///
    /// E.g. the same uid seated twice, a negative clock value, or a
    /// finished room with no game-over info.
    #[error("invalid room document: {0}")]
    InvalidDocument(String),
}
