//! Room session management for Gambit.
//!
//! One service, three responsibilities:
//!
//! - **Room lifecycle** — create rooms, assign and release seats,
//!   finalize games.
//! - **Clock coordination** — the per-side time ledger: reset, set,
//!   first-move latch.
//! - **Change notification** — bridge remote document mutations into a
//!   stream of fully-typed room snapshots.
//!
//! All of it composes into [`RoomSessionService`], constructed with its
//! [`DocumentStore`](gambit_store::DocumentStore) collaborator injected,
//! so tests substitute an in-memory store for the real one.
//!
//! # Consistency contract
//!
//! Every operation is "read full room → apply a pure transition → write".
//! There is no in-process locking and no transactional isolation at the
//! store: two clients racing on the same room resolve last-writer-wins
//! at document granularity, and reconcile through the next snapshot the
//! notifier delivers. Callers that need strict turns serialize through a
//! single authoritative client (e.g. the side to move owns the clock
//! write for that turn).

mod error;
mod service;
mod watcher;

pub use error::SessionError;
pub use service::{DEFAULT_COLLECTION, RoomSessionService};
pub use watcher::{RoomWatcher, Subscription};
