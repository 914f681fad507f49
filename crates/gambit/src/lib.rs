//! # Gambit
//!
//! Session management for two-player chess rooms backed by a shared,
//! externally-synchronized document store.
//!
//! Gambit keeps one [`Room`] document per game consistent across
//! independent clients: seat assignment, the per-side chess clock, and
//! game termination all go through [`RoomSessionService`], while the
//! store itself (and the board rules, and identity) stay external
//! collaborators behind the [`DocumentStore`] trait.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use gambit::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), gambit::GambitError> {
//! let store = Arc::new(MemoryStore::new());
//! let service = RoomSessionService::new(store);
//!
//! let room = service.create_room(60.0).await?;
//! let room = service
//!     .join_room(&room.id, &User::named("uid-1", "Anna"), None)
//!     .await?;
//! assert_eq!(room.players[0].as_ref().unwrap().side, Side::White);
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::GambitError;

pub use gambit_model::{
    Board, GameOverInfo, GameOverReason, GameStatus, ModelError, Player,
    Room, RoomId, Side, TimerState, Uid, User,
};
pub use gambit_session::{
    RoomSessionService, RoomWatcher, SessionError, Subscription,
};
pub use gambit_store::{
    DocumentStore, DocumentWatch, MemoryStore, MemoryStoreError,
};

/// The most commonly used types, for glob import.
pub mod prelude {
    pub use crate::{
        DocumentStore, GameOverInfo, GameOverReason, GameStatus,
        MemoryStore, Room, RoomId, RoomSessionService, Side, Uid, User,
    };
}

/// Installs a global `tracing` subscriber filtered by `RUST_LOG`.
///
/// Convenience for binaries and examples; calling it twice is harmless
/// (the second install attempt is ignored).
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
