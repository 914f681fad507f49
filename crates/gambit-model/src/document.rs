//! The document contract: `Room` to and from a transport-safe record.
//!
//! The store moves untyped JSON; this module is the one place where a
//! room crosses that boundary. Encoding is a pure projection, decoding
//! validates the result against the room invariants before anyone
//! downstream sees it. Nothing else in the workspace is allowed to
//! assume a raw document is well-formed.

use serde_json::Value;

use crate::error::ModelError;
use crate::room::Room;
use crate::types::Uid;

impl Room {
    /// Projects the room into the JSON record the store persists.
    pub fn to_document(&self) -> Result<Value, ModelError> {
        serde_json::to_value(self).map_err(ModelError::Encode)
    }

    /// Rehydrates a room from a raw store document.
    ///
    /// This is the snapshot-reconstruction step: a value arriving from
    /// the change feed (or a point read) becomes a fully-typed [`Room`],
    /// with the opaque board payload restored to its expected shape and
    /// the invariants checked. Documents another client corrupted are
    /// rejected here rather than propagated as half-valid rooms.
    pub fn from_document(value: Value) -> Result<Self, ModelError> {
        let room: Room =
            serde_json::from_value(value).map_err(ModelError::Decode)?;
        room.validate()?;
        Ok(room)
    }

    fn validate(&self) -> Result<(), ModelError> {
        let seated: Vec<&Uid> =
            self.players.iter().flatten().map(|p| &p.uid).collect();
        if seated.len() == 2 && seated[0] == seated[1] {
            return Err(ModelError::InvalidDocument(format!(
                "uid {} occupies both seats",
                seated[0]
            )));
        }

        if self.time_per_move < 0.0 {
            return Err(ModelError::InvalidDocument(format!(
                "negative time budget: {}",
                self.time_per_move
            )));
        }
        if self.timer_state.white_time < 0.0 || self.timer_state.black_time < 0.0 {
            return Err(ModelError::InvalidDocument(format!(
                "negative clock value: white={} black={}",
                self.timer_state.white_time, self.timer_state.black_time
            )));
        }

        if self.status.is_finished() != self.game_over_info.is_some() {
            return Err(ModelError::InvalidDocument(format!(
                "status {} inconsistent with game-over info presence",
                self.status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        GameOverInfo, GameOverReason, Player, RoomId, Side, User,
    };

    fn room() -> Room {
        Room::new(RoomId::new("r1"), 60.0, 1_000)
    }

    #[test]
    fn test_round_trip_preserves_room() {
        let mut room = room();
        room.seat(Player::from_user(&User::named("a", "Anna"), Side::White));
        room.finish(GameOverInfo::won_by(Side::White, GameOverReason::Resignation));

        let doc = room.to_document().unwrap();
        let back = Room::from_document(doc).unwrap();
        assert_eq!(back, room);
    }

    #[test]
    fn test_document_uses_camel_case_fields() {
        let doc = room().to_document().unwrap();
        assert_eq!(doc["timePerMove"], 60.0);
        assert_eq!(doc["movingSide"], "white");
        assert_eq!(doc["status"], "NOT_STARTED");
        assert_eq!(doc["timerState"]["whiteTime"], 60.0);
        assert_eq!(doc["timerState"]["isFirstMovePlayed"], false);
        assert!(doc.get("gameOverInfo").is_none());
    }

    #[test]
    fn test_board_payload_survives_rehydration() {
        let mut room = room();
        room.board = crate::types::Board::from_payload(
            serde_json::json!({"fen": "8/8/8/8/8/8/8/8 w - - 0 1", "moves": []}),
        )
        .unwrap();

        let doc = room.to_document().unwrap();
        let back = Room::from_document(doc).unwrap();
        assert_eq!(back.board.payload()["fen"], "8/8/8/8/8/8/8/8 w - - 0 1");
    }

    #[test]
    fn test_rejects_duplicate_uid_across_seats() {
        let mut room = room();
        room.seat(Player::from_user(&User::new("dup"), Side::White));
        room.seat(Player::from_user(&User::new("dup"), Side::Black));

        let doc = room.to_document().unwrap();
        let err = Room::from_document(doc).unwrap_err();
        assert!(matches!(err, ModelError::InvalidDocument(_)));
    }

    #[test]
    fn test_rejects_non_object_board() {
        let mut doc = room().to_document().unwrap();
        doc["board"] = serde_json::json!("not an object");

        let err = Room::from_document(doc).unwrap_err();
        assert!(matches!(err, ModelError::Decode(_)));

        let mut doc = room().to_document().unwrap();
        doc["board"] = serde_json::json!([1, 2, 3]);
        assert!(Room::from_document(doc).is_err());
    }

    #[test]
    fn test_rejects_negative_clock() {
        let mut doc = room().to_document().unwrap();
        doc["timerState"]["whiteTime"] = serde_json::json!(-1.0);

        let err = Room::from_document(doc).unwrap_err();
        assert!(matches!(err, ModelError::InvalidDocument(_)));
    }

    #[test]
    fn test_rejects_finished_without_outcome() {
        let mut doc = room().to_document().unwrap();
        doc["status"] = serde_json::json!("FINISHED");

        let err = Room::from_document(doc).unwrap_err();
        assert!(matches!(err, ModelError::InvalidDocument(_)));
    }

    #[test]
    fn test_rejects_malformed_document() {
        let err = Room::from_document(serde_json::json!({"id": "r1"})).unwrap_err();
        assert!(matches!(err, ModelError::Decode(_)));
    }
}
