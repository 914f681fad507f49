//! The room aggregate and its per-side chess clock.
//!
//! A [`Room`] is the single source of truth for one game session. The
//! session service mutates it through the pure helpers defined here —
//! read the current room from the store, apply a transition, write the
//! whole room back. Keeping the transitions free of I/O is what lets the
//! invariants (seat exclusivity, clock non-negativity, terminal
//! finality) be unit-tested without a store.

use serde::{Deserialize, Serialize};

use crate::types::{Board, GameOverInfo, GameStatus, Player, RoomId, Side, Uid};

/// Number of seats in a room. Two-player game, always exactly two.
pub const SEAT_COUNT: usize = 2;

// ---------------------------------------------------------------------------
// TimerState
// ---------------------------------------------------------------------------

/// Per-side remaining time plus the bookkeeping the clock needs.
///
/// This is an accounting ledger, not a running clock: nothing in here
/// decrements time on its own, and a side hitting zero triggers no
/// action. Elapsed-time arithmetic and timeout consequences belong to
/// the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Remaining time for white, in seconds. Never negative.
    pub white_time: f64,

    /// Remaining time for black, in seconds. Never negative.
    pub black_time: f64,

    /// Wall-clock timestamp (epoch milliseconds) of the last move or
    /// clock reset. Callers use it to compute elapsed time.
    pub last_move_time: u64,

    /// One-way latch: the clock should not count down before the first
    /// move has been played.
    pub is_first_move_played: bool,
}

impl TimerState {
    /// A fresh clock with both sides at the full budget.
    pub fn new(time_per_move: f64, now_ms: u64) -> Self {
        Self {
            white_time: time_per_move,
            black_time: time_per_move,
            last_move_time: now_ms,
            is_first_move_played: false,
        }
    }

    /// Returns the named side's remaining time.
    pub fn time_left(&self, side: Side) -> f64 {
        match side {
            Side::White => self.white_time,
            Side::Black => self.black_time,
        }
    }

    /// Sets the named side's remaining time, clamped at zero.
    ///
    /// Does not touch `last_move_time` — the caller computed this value
    /// from the previous remaining time and the elapsed interval, and a
    /// separate [`reset_side`](Self::reset_side) re-stamps the clock.
    pub fn set_time_left(&mut self, side: Side, seconds: f64) {
        let seconds = seconds.max(0.0);
        match side {
            Side::White => self.white_time = seconds,
            Side::Black => self.black_time = seconds,
        }
    }

    /// Grants the named side a fresh full budget and re-stamps
    /// `last_move_time`. The other side is untouched.
    pub fn reset_side(&mut self, side: Side, time_per_move: f64, now_ms: u64) {
        self.set_time_left(side, time_per_move);
        self.last_move_time = now_ms;
    }

    /// Latches the first move as played. Never resets.
    pub fn mark_first_move_played(&mut self) {
        self.is_first_move_played = true;
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// The persisted aggregate representing one game session.
///
/// `id` and `time_per_move` are fixed at creation; everything else is
/// mutated in place by the session service's transitions. The room is
/// conceptually destroyed only by external retention policy — no
/// operation here deletes one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique identifier, immutable after creation.
    pub id: RoomId,

    /// The two seats. Index is "first empty slot" order and carries no
    /// color meaning — a player's color lives on the [`Player`] itself.
    pub players: [Option<Player>; SEAT_COUNT],

    /// Opaque board payload owned by the external board component.
    pub board: Board,

    /// Lifecycle status. Monotonic; `Finished` is terminal.
    pub status: GameStatus,

    /// Which color is currently to move. Toggled by the external
    /// move-application logic; the clock coordinator only reads it.
    pub moving_side: Side,

    /// Fixed per-side time budget in seconds, immutable after creation.
    pub time_per_move: f64,

    /// Wall-clock creation timestamp, epoch milliseconds.
    pub created_at: u64,

    /// The embedded chess clock.
    pub timer_state: TimerState,

    /// Terminal outcome. Present if and only if `status` is `Finished`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_over_info: Option<GameOverInfo>,
}

impl Room {
    /// Builds a fresh room: empty seats, `NotStarted`, empty board,
    /// white to move, clock seeded with the full budget on both sides.
    pub fn new(id: RoomId, time_per_move: f64, now_ms: u64) -> Self {
        Self {
            id,
            players: [None, None],
            board: Board::empty(),
            status: GameStatus::NotStarted,
            moving_side: Side::White,
            time_per_move,
            created_at: now_ms,
            timer_state: TimerState::new(time_per_move, now_ms),
            game_over_info: None,
        }
    }

    /// Returns the seat index occupied by `uid`, if any.
    pub fn seat_of(&self, uid: &Uid) -> Option<usize> {
        self.players
            .iter()
            .position(|seat| seat.as_ref().is_some_and(|p| &p.uid == uid))
    }

    /// Returns `true` if `uid` currently occupies a seat.
    pub fn is_seated(&self, uid: &Uid) -> bool {
        self.seat_of(uid).is_some()
    }

    /// Returns the lowest empty seat index, or `None` when full.
    pub fn first_empty_seat(&self) -> Option<usize> {
        self.players.iter().position(Option::is_none)
    }

    /// Returns the first occupant found, scanning seats in order.
    pub fn occupant(&self) -> Option<&Player> {
        self.players.iter().flatten().next()
    }

    /// Computes the color for a joining player.
    ///
    /// The preferred side wins when it is still free; otherwise the new
    /// player takes the color opposite the existing occupant, and white
    /// when the room is empty.
    pub fn side_for_new_player(&self, preferred: Option<Side>) -> Side {
        let taken = self.occupant().map(|p| p.side);
        match (preferred, taken) {
            (Some(side), Some(occupied)) if side == occupied => side.opposite(),
            (Some(side), _) => side,
            (None, Some(occupied)) => occupied.opposite(),
            (None, None) => Side::White,
        }
    }

    /// Places a player into the lowest empty seat and returns its
    /// index. Returns `None`, leaving the room unchanged, when both
    /// seats are occupied — an occupant is never overwritten.
    pub fn seat(&mut self, player: Player) -> Option<usize> {
        let index = self.first_empty_seat()?;
        self.players[index] = Some(player);
        Some(index)
    }

    /// Clears every seat occupied by `uid`. Returns how many seats were
    /// cleared (0 when the uid was not present). Clock and status are
    /// untouched.
    pub fn clear_seats_of(&mut self, uid: &Uid) -> usize {
        let mut cleared = 0;
        for seat in &mut self.players {
            if seat.as_ref().is_some_and(|p| &p.uid == uid) {
                *seat = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Terminal transition: marks the room `Finished` and attaches the
    /// outcome. Returns `false` (and changes nothing) when the room was
    /// already finished — the first outcome wins.
    pub fn finish(&mut self, info: GameOverInfo) -> bool {
        if self.status.is_finished() {
            return false;
        }
        self.status = GameStatus::Finished;
        self.game_over_info = Some(info);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GameOverReason, User};

    fn room() -> Room {
        Room::new(RoomId::new("r1"), 60.0, 1_000)
    }

    #[test]
    fn test_new_room_shape() {
        let room = room();
        assert_eq!(room.status, GameStatus::NotStarted);
        assert_eq!(room.players, [None, None]);
        assert_eq!(room.moving_side, Side::White);
        assert_eq!(room.timer_state.white_time, 60.0);
        assert_eq!(room.timer_state.black_time, 60.0);
        assert!(!room.timer_state.is_first_move_played);
        assert!(room.game_over_info.is_none());
    }

    #[test]
    fn test_side_for_new_player_opposition_rule() {
        let mut room = room();
        // Empty room, no preference: white.
        assert_eq!(room.side_for_new_player(None), Side::White);
        // Empty room, preference honored.
        assert_eq!(room.side_for_new_player(Some(Side::Black)), Side::Black);

        room.seat(Player::from_user(&User::new("a"), Side::White));
        // Occupied room, no preference: opposite color.
        assert_eq!(room.side_for_new_player(None), Side::Black);
        // Preference for a free color honored.
        assert_eq!(room.side_for_new_player(Some(Side::Black)), Side::Black);
        // Preference for the taken color falls back to the free one.
        assert_eq!(room.side_for_new_player(Some(Side::White)), Side::Black);
    }

    #[test]
    fn test_seat_fills_lowest_empty_seat() {
        let mut room = room();
        assert_eq!(room.first_empty_seat(), Some(0));
        assert_eq!(room.seat(Player::from_user(&User::new("a"), Side::White)), Some(0));
        assert_eq!(room.first_empty_seat(), Some(1));
        assert_eq!(room.seat(Player::from_user(&User::new("b"), Side::Black)), Some(1));
        assert_eq!(room.first_empty_seat(), None);
    }

    #[test]
    fn test_seat_never_overwrites_an_occupant() {
        let mut room = room();
        room.seat(Player::from_user(&User::new("a"), Side::White));
        room.seat(Player::from_user(&User::new("b"), Side::Black));

        assert_eq!(room.seat(Player::from_user(&User::new("c"), Side::White)), None);
        assert_eq!(room.players[0].as_ref().unwrap().uid, Uid::new("a"));
        assert_eq!(room.players[1].as_ref().unwrap().uid, Uid::new("b"));
    }

    #[test]
    fn test_clear_seats_of_leaves_other_seat() {
        let mut room = room();
        room.seat(Player::from_user(&User::new("a"), Side::White));
        room.seat(Player::from_user(&User::new("b"), Side::Black));

        assert_eq!(room.clear_seats_of(&Uid::new("a")), 1);
        assert!(room.players[0].is_none());
        assert_eq!(
            room.players[1].as_ref().map(|p| p.uid.clone()),
            Some(Uid::new("b"))
        );

        // Kicking an absent uid clears nothing.
        assert_eq!(room.clear_seats_of(&Uid::new("ghost")), 0);
    }

    #[test]
    fn test_finish_is_terminal_and_keeps_first_info() {
        let mut room = room();
        let first = GameOverInfo::won_by(Side::Black, GameOverReason::Timeout);
        let second = GameOverInfo::drawn(GameOverReason::Stalemate);

        assert!(room.finish(first.clone()));
        assert!(!room.finish(second));
        assert_eq!(room.status, GameStatus::Finished);
        assert_eq!(room.game_over_info, Some(first));
    }

    #[test]
    fn test_set_time_left_clamps_at_zero() {
        let mut timer = TimerState::new(60.0, 0);
        timer.set_time_left(Side::White, -5.0);
        assert_eq!(timer.white_time, 0.0);
        assert_eq!(timer.black_time, 60.0);
    }

    #[test]
    fn test_set_time_left_does_not_stamp_clock() {
        let mut timer = TimerState::new(60.0, 1_000);
        timer.set_time_left(Side::Black, 30.0);
        assert_eq!(timer.last_move_time, 1_000);
        assert_eq!(timer.black_time, 30.0);
    }

    #[test]
    fn test_reset_side_restores_budget_and_stamps_clock() {
        let mut timer = TimerState::new(60.0, 1_000);
        timer.set_time_left(Side::White, 12.5);
        timer.set_time_left(Side::Black, 40.0);

        timer.reset_side(Side::White, 60.0, 2_000);
        assert_eq!(timer.white_time, 60.0);
        assert_eq!(timer.black_time, 40.0);
        assert_eq!(timer.last_move_time, 2_000);
    }

    #[test]
    fn test_first_move_latch() {
        let mut timer = TimerState::new(60.0, 0);
        assert!(!timer.is_first_move_played);
        timer.mark_first_move_played();
        timer.mark_first_move_played();
        assert!(timer.is_first_move_played);
    }
}
