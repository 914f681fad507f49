//! Core identity and value types shared across the workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Opaque identifier for a room, assigned once at creation.
///
/// Stored as a string so it can carry high-entropy ids (the session layer
/// generates 128-bit hex strings) as well as externally minted ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Creates a `RoomId` from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier for a user, issued by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(pub String);

impl Uid {
    /// Creates a `Uid` from any string-like value.
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// Returns the uid as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// One of the two chess colors.
///
/// A side is assigned to an occupant and is independent of the seat
/// index they happen to sit in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// Returns the opposing color.
    pub fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// The lifecycle status of a game.
///
/// Transitions are strictly forward — no edges back:
///
/// ```text
/// NotStarted → InProgress → Finished
/// ```
///
/// `Finished` is terminal; once a room reaches it the status never
/// changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    NotStarted,
    InProgress,
    Finished,
}

impl GameStatus {
    /// Returns `true` if the game has reached its terminal state.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }

}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "NOT_STARTED"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

// ---------------------------------------------------------------------------
// User / Player
// ---------------------------------------------------------------------------

/// A projection of the externally authenticated user.
///
/// Identity and authentication live outside this workspace; the session
/// service only needs the uid plus whatever display attributes the
/// caller wants persisted into the seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier from the identity provider.
    pub uid: Uid,

    /// Optional human-readable name shown to the opponent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl User {
    /// Creates a user with no display name.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: Uid::new(uid),
            display_name: None,
        }
    }

    /// Creates a user with a display name.
    pub fn named(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: Uid::new(uid),
            display_name: Some(name.into()),
        }
    }
}

/// An occupant of a seat: a user plus their assigned color.
///
/// Players have no independent lifecycle — one is built when a user
/// joins and cleared when they are kicked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Stable identifier from the identity provider.
    pub uid: Uid,

    /// Optional human-readable name shown to the opponent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// The color this player moves.
    pub side: Side,
}

impl Player {
    /// Builds a seat occupant from a user and an assigned color.
    pub fn from_user(user: &User, side: Side) -> Self {
        Self {
            uid: user.uid.clone(),
            display_name: user.display_name.clone(),
            side,
        }
    }
}

// ---------------------------------------------------------------------------
// Game over
// ---------------------------------------------------------------------------

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOverReason {
    Checkmate,
    Timeout,
    Resignation,
    Stalemate,
    Draw,
    Abandoned,
}

/// The terminal outcome attached to a finished room.
///
/// Set exactly once by the lifecycle manager; present if and only if the
/// room status is [`GameStatus::Finished`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverInfo {
    /// The winning side, or `None` for a drawn game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Side>,

    /// How the game ended.
    pub reason: GameOverReason,
}

impl GameOverInfo {
    /// Outcome where `winner` won for the given reason.
    pub fn won_by(winner: Side, reason: GameOverReason) -> Self {
        Self {
            winner: Some(winner),
            reason,
        }
    }

    /// Drawn outcome.
    pub fn drawn(reason: GameOverReason) -> Self {
        Self {
            winner: None,
            reason,
        }
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The opaque board payload.
///
/// The session stores and round-trips this value but never interprets
/// it — move legality and board representation belong to an external
/// component. The one thing the model guarantees is that the payload is
/// a JSON object, so rehydrated snapshots carry the exact structure the
/// board component wrote; anything else is rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Board(serde_json::Value);

impl Board {
    /// An empty board payload, used when a room is first created.
    pub fn empty() -> Self {
        Self(serde_json::Value::Object(serde_json::Map::new()))
    }

    /// Wraps a raw payload.
    ///
    /// Returns `None` if the payload is not a JSON object — anything
    /// else would not survive a document merge intact.
    pub fn from_payload(value: serde_json::Value) -> Option<Self> {
        value.is_object().then_some(Self(value))
    }

    /// Returns the raw payload.
    pub fn payload(&self) -> &serde_json::Value {
        &self.0
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

/// Rehydration goes through [`Board::from_payload`], so a document
/// carrying a non-object board never deserializes into a room.
impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_payload(value).ok_or_else(|| {
            serde::de::Error::custom("board payload must be a JSON object")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::White.opposite(), Side::Black);
        assert_eq!(Side::Black.opposite(), Side::White);
    }

    #[test]
    fn test_side_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Side::White).unwrap(), "white");
        assert_eq!(serde_json::to_value(Side::Black).unwrap(), "black");
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(GameStatus::NotStarted).unwrap(),
            "NOT_STARTED"
        );
        assert_eq!(
            serde_json::to_value(GameStatus::Finished).unwrap(),
            "FINISHED"
        );
    }

    #[test]
    fn test_player_from_user_carries_display_name() {
        let user = User::named("u1", "Magnus");
        let player = Player::from_user(&user, Side::Black);
        assert_eq!(player.uid, Uid::new("u1"));
        assert_eq!(player.display_name.as_deref(), Some("Magnus"));
        assert_eq!(player.side, Side::Black);
    }

    #[test]
    fn test_board_rejects_non_object_payload() {
        assert!(Board::from_payload(serde_json::json!({"fen": "start"})).is_some());
        assert!(Board::from_payload(serde_json::json!([1, 2, 3])).is_none());
        assert!(Board::from_payload(serde_json::json!("fen")).is_none());
    }

    #[test]
    fn test_board_deserialize_requires_object() {
        let ok: Result<Board, _> =
            serde_json::from_value(serde_json::json!({"fen": "start"}));
        assert!(ok.is_ok());

        let err: Result<Board, _> = serde_json::from_value(serde_json::json!("garbage"));
        assert!(err.is_err());
        let err: Result<Board, _> = serde_json::from_value(serde_json::json!(null));
        assert!(err.is_err());
    }

    #[test]
    fn test_game_over_info_winner_serialization() {
        let info = GameOverInfo::won_by(Side::Black, GameOverReason::Timeout);
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["winner"], "black");
        assert_eq!(value["reason"], "timeout");

        let drawn = GameOverInfo::drawn(GameOverReason::Stalemate);
        let value = serde_json::to_value(&drawn).unwrap();
        assert!(value.get("winner").is_none());
    }

    #[test]
    fn test_room_id_display() {
        let id = RoomId::new("abc123");
        assert_eq!(id.to_string(), "abc123");
    }

    #[test]
    fn test_uid_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(Uid::new("a"), 0usize);
        map.insert(Uid::new("b"), 1usize);
        assert_eq!(map[&Uid::new("a")], 0);
    }
}
