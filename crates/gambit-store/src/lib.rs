//! Document store abstraction for Gambit.
//!
//! Provides the [`DocumentStore`] and [`DocumentWatch`] traits that
//! abstract over whatever actually persists room documents (a hosted
//! document database in production, [`MemoryStore`] in tests and
//! development).
//!
//! The contract is deliberately small: point read, initial write,
//! partial merge, and a push-based change feed. Everything is untyped
//! `serde_json::Value` at this layer — the model crate owns the typed
//! contract on top.

#![allow(async_fn_in_trait)]

mod error;
mod memory;

pub use error::MemoryStoreError;
pub use memory::{MemoryStore, MemoryWatch};

use serde_json::Value;

/// A key-value document store addressed by slash-separated paths
/// (e.g. `games/{room_id}`), one JSON document per path.
pub trait DocumentStore: Send + Sync + 'static {
    /// The error type for store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The change-feed type produced by [`watch`](Self::watch).
    type Watch: DocumentWatch;

    /// Point read. Returns `None` when no document exists at `path`.
    async fn fetch(&self, path: &str) -> Result<Option<Value>, Self::Error>;

    /// Initial write of a full document.
    ///
    /// Upsert semantics: writing to an existing path replaces the
    /// document. Watchers observe the committed value.
    async fn create(&self, path: &str, value: Value) -> Result<(), Self::Error>;

    /// Merges the top-level fields of `partial` into the existing
    /// document at `path`. Fields absent from `partial` are untouched;
    /// present fields are replaced wholesale (no deep merge).
    ///
    /// Fails when no document exists at `path` — merge is a mutation of
    /// existing state, not an upsert.
    async fn merge(&self, path: &str, partial: Value) -> Result<(), Self::Error>;

    /// Opens a push-based change feed for the document at `path`.
    ///
    /// The feed delivers the full current value immediately when the
    /// document already exists, then again on every committed change —
    /// including writes made through this same store handle. Dropping
    /// the watch cancels it.
    fn watch(&self, path: &str) -> Result<Self::Watch, Self::Error>;
}

/// A change feed over a single document.
pub trait DocumentWatch: Send + 'static {
    /// Waits for the next committed document value.
    ///
    /// Returns `None` once the feed is closed (the store went away).
    /// A slow consumer may skip intermediate values, but whatever is
    /// delivered is always a complete committed document, never a diff.
    fn changed(&mut self) -> impl std::future::Future<Output = Option<Value>> + Send;
}
