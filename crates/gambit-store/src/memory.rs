//! In-memory [`DocumentStore`] implementation.
//!
//! Documents live in a mutex-guarded map; each watched path gets a
//! `tokio::sync::broadcast` channel. Commits publish while the lock is
//! held, so every watcher observes commits in the order they happened.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::broadcast;

use crate::{DocumentStore, DocumentWatch, MemoryStoreError};

/// Per-path feed capacity. A lagged watcher skips to newer snapshots,
/// which is lossless here because every message is a full document.
const FEED_CAPACITY: usize = 32;

#[derive(Default)]
struct Inner {
    docs: HashMap<String, Value>,
    feeds: HashMap<String, broadcast::Sender<Value>>,
}

/// An in-process document store for tests and development.
///
/// Cloning is cheap and all clones share the same documents, so a test
/// can hand one clone to the service under test and keep another for
/// assertions — the same way two clients share one remote database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning only happens if a holder panicked; the data is
        // plain JSON with no torn states, so keep going.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(inner: &mut Inner, path: &str) {
        if let Some(tx) = inner.feeds.get(path) {
            if let Some(doc) = inner.docs.get(path) {
                // Send only fails with zero receivers; that just means
                // nobody is watching right now.
                let _ = tx.send(doc.clone());
            }
        }
    }
}

impl DocumentStore for MemoryStore {
    type Error = MemoryStoreError;
    type Watch = MemoryWatch;

    async fn fetch(&self, path: &str) -> Result<Option<Value>, Self::Error> {
        Ok(self.lock().docs.get(path).cloned())
    }

    async fn create(&self, path: &str, value: Value) -> Result<(), Self::Error> {
        let mut inner = self.lock();
        inner.docs.insert(path.to_owned(), value);
        Self::publish(&mut inner, path);
        tracing::debug!(%path, "document created");
        Ok(())
    }

    async fn merge(&self, path: &str, partial: Value) -> Result<(), Self::Error> {
        let mut inner = self.lock();
        let doc = inner
            .docs
            .get_mut(path)
            .ok_or_else(|| MemoryStoreError::Missing(path.to_owned()))?;

        match (doc.as_object_mut(), partial) {
            (Some(fields), Value::Object(patch)) => {
                for (key, value) in patch {
                    fields.insert(key, value);
                }
            }
            _ => return Err(MemoryStoreError::InvalidMerge(path.to_owned())),
        }

        Self::publish(&mut inner, path);
        tracing::debug!(%path, "document merged");
        Ok(())
    }

    fn watch(&self, path: &str) -> Result<Self::Watch, Self::Error> {
        let mut inner = self.lock();
        let rx = inner
            .feeds
            .entry(path.to_owned())
            .or_insert_with(|| broadcast::channel(FEED_CAPACITY).0)
            .subscribe();
        // Deliver the current value up front, if the document exists.
        let pending = inner.docs.get(path).cloned();
        Ok(MemoryWatch { pending, rx })
    }
}

/// Change feed over a single document in a [`MemoryStore`].
pub struct MemoryWatch {
    pending: Option<Value>,
    rx: broadcast::Receiver<Value>,
}

impl DocumentWatch for MemoryWatch {
    async fn changed(&mut self) -> Option<Value> {
        if let Some(initial) = self.pending.take() {
            return Some(initial);
        }
        loop {
            match self.rx.recv().await {
                Ok(value) => return Some(value),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "watch lagged, skipping to newer snapshot");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_absent_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.fetch("games/missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let store = MemoryStore::new();
        store.create("games/a", json!({"x": 1})).await.unwrap();
        assert_eq!(store.fetch("games/a").await.unwrap(), Some(json!({"x": 1})));
    }

    #[tokio::test]
    async fn test_merge_replaces_top_level_fields_only() {
        let store = MemoryStore::new();
        store
            .create("games/a", json!({"x": 1, "nested": {"a": 1, "b": 2}}))
            .await
            .unwrap();
        store
            .merge("games/a", json!({"nested": {"a": 9}}))
            .await
            .unwrap();

        // Top-level field replaced wholesale — no deep merge.
        assert_eq!(
            store.fetch("games/a").await.unwrap(),
            Some(json!({"x": 1, "nested": {"a": 9}}))
        );
    }

    #[tokio::test]
    async fn test_merge_on_missing_document_fails() {
        let store = MemoryStore::new();
        let err = store.merge("games/none", json!({"x": 1})).await.unwrap_err();
        assert!(matches!(err, MemoryStoreError::Missing(_)));
    }

    #[tokio::test]
    async fn test_merge_with_non_object_partial_fails() {
        let store = MemoryStore::new();
        store.create("games/a", json!({})).await.unwrap();
        let err = store.merge("games/a", json!(42)).await.unwrap_err();
        assert!(matches!(err, MemoryStoreError::InvalidMerge(_)));
    }
}
