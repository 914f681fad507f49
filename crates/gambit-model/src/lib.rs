//! Data model for Gambit chess rooms.
//!
//! This crate defines the "shape" of everything the session service
//! persists and exchanges:
//!
//! - **Types** ([`Room`], [`Player`], [`TimerState`], [`Side`], etc.) —
//!   the aggregate and its parts.
//! - **Document contract** ([`Room::to_document`] /
//!   [`Room::from_document`]) — how a room is converted to and from a
//!   transport-safe JSON record, validated at the boundary.
//! - **Errors** ([`ModelError`]) — what can go wrong while converting.
//!
//! # Architecture
//!
//! The model layer sits below the store and the session service. It does
//! no I/O and holds no locks — every transition here is a pure function
//! on owned data, which is what makes the service's read-modify-write
//! cycles easy to test in isolation.

mod document;
mod error;
mod room;
mod types;

pub use error::ModelError;
pub use room::{Room, TimerState};
pub use types::{
    Board, GameOverInfo, GameOverReason, GameStatus, Player, RoomId, Side,
    Uid, User,
};
