//! The room session service: lifecycle manager and clock coordinator.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use gambit_model::{GameOverInfo, ModelError, Player, Room, RoomId, Side, Uid, User};
use gambit_store::DocumentStore;
use rand::Rng;

use crate::watcher::{RoomWatcher, Subscription};
use crate::SessionError;

/// Default collection namespace: rooms live at `games/{id}`.
pub const DEFAULT_COLLECTION: &str = "games";

/// Manages the lifecycle of two-player game sessions backed by a shared
/// document store.
///
/// The store is injected at construction; the service owns no state of
/// its own beyond the collection namespace. Every operation follows
/// read → pure transition → write (see the crate docs for the
/// consistency contract this implies).
pub struct RoomSessionService<S: DocumentStore> {
    store: Arc<S>,
    collection: String,
}

impl<S: DocumentStore> Clone for RoomSessionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection.clone(),
        }
    }
}

impl<S: DocumentStore> RoomSessionService<S> {
    /// Creates a service over the given store, using the default
    /// `games/{id}` document paths.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_collection(store, DEFAULT_COLLECTION)
    }

    /// Creates a service with a custom collection namespace.
    pub fn with_collection(store: Arc<S>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    fn path(&self, id: &RoomId) -> String {
        format!("{}/{}", self.collection, id)
    }

    fn encode(id: &RoomId, room: &Room) -> Result<serde_json::Value, SessionError> {
        room.to_document()
            .map_err(|e| SessionError::Document(id.clone(), e))
    }

    /// Writes the full room back to its document.
    async fn write_room(&self, room: &Room) -> Result<(), SessionError> {
        let doc = Self::encode(&room.id, room)?;
        self.store
            .merge(&self.path(&room.id), doc)
            .await
            .map_err(SessionError::store)
    }

    /// Writes only the `timerState` field, leaving the rest of the
    /// document to whoever wrote it last.
    async fn write_timer(&self, room: &Room) -> Result<(), SessionError> {
        let timer = serde_json::to_value(&room.timer_state)
            .map_err(|e| SessionError::Document(room.id.clone(), ModelError::Encode(e)))?;
        self.store
            .merge(&self.path(&room.id), serde_json::json!({ "timerState": timer }))
            .await
            .map_err(SessionError::store)
    }

    // -----------------------------------------------------------------
    // Room lifecycle
    // -----------------------------------------------------------------

    /// Creates a fresh room with the given per-side time budget
    /// (seconds), persists it, and returns it.
    pub async fn create_room(&self, time_per_move: f64) -> Result<Room, SessionError> {
        let id = RoomId::new(generate_room_id());
        let room = Room::new(id.clone(), time_per_move, now_ms());
        let doc = Self::encode(&id, &room)?;
        self.store
            .create(&self.path(&id), doc)
            .await
            .map_err(SessionError::store)?;
        tracing::info!(room_id = %id, time_per_move, "room created");
        Ok(room)
    }

    /// Fetches and rehydrates the current room.
    pub async fn get_room(&self, id: &RoomId) -> Result<Room, SessionError> {
        let doc = self
            .store
            .fetch(&self.path(id))
            .await
            .map_err(SessionError::store)?
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        Room::from_document(doc).map_err(|e| SessionError::Document(id.clone(), e))
    }

    /// Seats `user` in the room.
    ///
    /// Idempotent for an already-seated uid: the current room comes back
    /// unchanged and nothing is written. Otherwise the user takes the
    /// first empty seat, with `preferred_side` when that color is free,
    /// else the color opposite the existing occupant (white in an empty
    /// room).
    pub async fn join_room(
        &self,
        id: &RoomId,
        user: &User,
        preferred_side: Option<Side>,
    ) -> Result<Room, SessionError> {
        let mut room = self.get_room(id).await?;

        if room.is_seated(&user.uid) {
            tracing::debug!(room_id = %id, uid = %user.uid, "already seated, join is a no-op");
            return Ok(room);
        }
        if room.status.is_finished() {
            return Err(SessionError::GameFinished(id.clone()));
        }

        let side = room.side_for_new_player(preferred_side);
        let seat = room
            .seat(Player::from_user(user, side))
            .ok_or_else(|| SessionError::RoomFull(id.clone()))?;

        self.write_room(&room).await?;
        tracing::info!(room_id = %id, uid = %user.uid, %side, seat, "player joined");
        Ok(room)
    }

    /// Clears every seat occupied by `uid`. Clock and status are
    /// untouched; kicking an absent uid is a no-op write.
    pub async fn kick_from_room(&self, id: &RoomId, uid: &Uid) -> Result<Room, SessionError> {
        let mut room = self.get_room(id).await?;
        let cleared = room.clear_seats_of(uid);
        self.write_room(&room).await?;
        tracing::info!(room_id = %id, %uid, cleared, "player kicked");
        Ok(room)
    }

    /// Terminal transition: marks the room finished and attaches the
    /// outcome. Calling it again on a finished room is inert — the first
    /// outcome stands and nothing is written.
    pub async fn set_game_over(
        &self,
        id: &RoomId,
        info: GameOverInfo,
    ) -> Result<Room, SessionError> {
        let mut room = self.get_room(id).await?;
        if !room.finish(info) {
            tracing::debug!(room_id = %id, "already finished, keeping first outcome");
            return Ok(room);
        }
        self.write_room(&room).await?;
        tracing::info!(room_id = %id, winner = ?room.game_over_info.as_ref().and_then(|i| i.winner), "game over");
        Ok(room)
    }

    // -----------------------------------------------------------------
    // Clock coordination
    // -----------------------------------------------------------------

    /// Grants `side` a fresh full time budget and re-stamps the
    /// last-move timestamp. The other side's remaining time is
    /// untouched. Persists only the `timerState` field.
    pub async fn reset_timer(&self, id: &RoomId, side: Side) -> Result<(), SessionError> {
        let mut room = self.live_room(id).await?;
        room.timer_state.reset_side(side, room.time_per_move, now_ms());
        self.write_timer(&room).await?;
        tracing::debug!(room_id = %id, %side, "timer reset");
        Ok(())
    }

    /// Sets `side`'s remaining time to a caller-computed value
    /// (clamped at zero). No elapsed-time arithmetic happens here and
    /// the last-move timestamp is untouched — this is a pure state
    /// setter over the ledger.
    pub async fn update_time_left(
        &self,
        id: &RoomId,
        side: Side,
        time_left: f64,
    ) -> Result<(), SessionError> {
        let mut room = self.live_room(id).await?;
        room.timer_state.set_time_left(side, time_left);
        self.write_timer(&room).await
    }

    /// One-way latch: records that the first move has been played, so
    /// callers know the clock should start counting down.
    pub async fn set_first_move_played(&self, id: &RoomId) -> Result<(), SessionError> {
        let mut room = self.live_room(id).await?;
        room.timer_state.mark_first_move_played();
        self.write_timer(&room).await
    }

    /// Fetches a room and rejects clock mutations on a finished game.
    async fn live_room(&self, id: &RoomId) -> Result<Room, SessionError> {
        let room = self.get_room(id).await?;
        if room.status.is_finished() {
            return Err(SessionError::GameFinished(id.clone()));
        }
        Ok(room)
    }

    // -----------------------------------------------------------------
    // Change notification
    // -----------------------------------------------------------------

    /// Opens a stream of room snapshots: every committed mutation of the
    /// document — including writes from other clients — yields the
    /// complete rehydrated room. Dropping the watcher cancels it.
    pub fn subscribe(&self, id: &RoomId) -> Result<RoomWatcher<S::Watch>, SessionError> {
        let watch = self
            .store
            .watch(&self.path(id))
            .map_err(SessionError::store)?;
        Ok(RoomWatcher::new(id.clone(), watch))
    }

    /// Callback flavor of [`subscribe`](Self::subscribe): spawns a task
    /// that invokes `callback` with each snapshot. The returned
    /// [`Subscription`] is the cleanup obligation — awaiting its
    /// `unsubscribe` guarantees no further invocations.
    pub fn subscribe_with<F>(
        &self,
        id: &RoomId,
        mut callback: F,
    ) -> Result<Subscription, SessionError>
    where
        F: FnMut(Room) + Send + 'static,
    {
        let mut watcher = self.subscribe(id)?;
        let room_id = id.clone();
        let handle = tokio::spawn(async move {
            while let Some(snapshot) = watcher.next().await {
                match snapshot {
                    Ok(room) => callback(room),
                    Err(err) => {
                        tracing::warn!(room_id = %room_id, %err, "skipping undeliverable snapshot");
                    }
                }
            }
        });
        Ok(Subscription::new(handle))
    }
}

/// Generates a random 32-character hex room id (128 bits of entropy),
/// so collisions across independent clients are negligible.
fn generate_room_id() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Wall-clock now as epoch milliseconds.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_ids_are_32_hex_chars() {
        let id = generate_room_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_room_ids_do_not_repeat() {
        let a = generate_room_id();
        let b = generate_room_id();
        assert_ne!(a, b);
    }
}
