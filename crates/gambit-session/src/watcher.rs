//! Change notification: room snapshot streams and their cancellation.

use gambit_model::{Room, RoomId};
use gambit_store::DocumentWatch;
use tokio::task::JoinHandle;

use crate::SessionError;

/// A pull-based stream of room snapshots.
///
/// Each item is the complete current room, rehydrated from the raw
/// document — never a diff. A document that fails boundary validation
/// surfaces as an `Err` item so the caller can decide whether to keep
/// listening. Dropping the watcher cancels the underlying feed.
pub struct RoomWatcher<W: DocumentWatch> {
    room_id: RoomId,
    watch: W,
}

impl<W: DocumentWatch> RoomWatcher<W> {
    pub(crate) fn new(room_id: RoomId, watch: W) -> Self {
        Self { room_id, watch }
    }

    /// The room this watcher observes.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Waits for the next snapshot. Returns `None` once the feed closes.
    pub async fn next(&mut self) -> Option<Result<Room, SessionError>> {
        let value = self.watch.changed().await?;
        Some(
            Room::from_document(value)
                .map_err(|e| SessionError::Document(self.room_id.clone(), e)),
        )
    }
}

/// Handle to a running callback subscription.
///
/// This is the one long-lived resource the session layer hands out, and
/// releasing it is the caller's only cleanup obligation.
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// Cancels the subscription and waits for the driver task to stop.
    ///
    /// Once this returns, no further callback invocation can happen —
    /// even for a mutation that was in flight at cancel time. The
    /// callback only runs inside the driver task, and awaiting the
    /// aborted task completes only after that task has terminated.
    pub async fn unsubscribe(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }

    /// Returns `true` while the driver task is still running.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Best-effort cancel; unsubscribe() is the race-safe path.
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
