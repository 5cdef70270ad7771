//! JSON messages exchanged with game clients.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameRequest {
    pub width: i32,
    pub height: i32,
    pub mines_count: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub game_id: Uuid,
    pub row: i32,
    pub col: i32,
}

/// Player-facing view of a game. `field` holds one code per cell: `" "` for
/// hidden, `"0"`..`"8"` for opened cells, `"M"` for a shown mine and `"X"` for
/// the mine that went off.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfoResponse {
    pub game_id: Uuid,
    pub width: i32,
    pub height: i32,
    pub mines_count: i32,
    pub completed: bool,
    pub field: Vec<Vec<String>>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unknown,
    GameNotFound,
    WrongCoordinate,
    ValidationFailed,
    GameCompleted,
    CellAlreadyOpened,
    ConcurrentUpdate,
    CreationFailed,
}

impl ErrorCode {
    /// Same text the code serializes to.
    pub const fn name(self) -> &'static str {
        use ErrorCode::*;
        match self {
            Unknown => "UNKNOWN",
            GameNotFound => "GAME_NOT_FOUND",
            WrongCoordinate => "WRONG_COORDINATE",
            ValidationFailed => "VALIDATION_FAILED",
            GameCompleted => "GAME_COMPLETED",
            CellAlreadyOpened => "CELL_ALREADY_OPENED",
            ConcurrentUpdate => "CONCURRENT_UPDATE",
            CreationFailed => "CREATION_FAILED",
        }
    }

    /// HTTP status a transport should answer with.
    pub const fn status(self) -> u16 {
        use ErrorCode::*;
        match self {
            Unknown | CreationFailed => 500,
            GameNotFound => 404,
            WrongCoordinate | ValidationFailed => 400,
            GameCompleted | CellAlreadyOpened | ConcurrentUpdate => 409,
        }
    }

    pub const fn message(self) -> &'static str {
        use ErrorCode::*;
        match self {
            Unknown => "Unexpected error",
            GameNotFound => "Game not found",
            WrongCoordinate => "Invalid coordinates",
            ValidationFailed => "Request validation failed",
            GameCompleted => "Game already completed",
            CellAlreadyOpened => "Cell already opened",
            ConcurrentUpdate => "Game was updated concurrently, retry the turn",
            CreationFailed => "Failed to create game",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error body sent to clients, e.g.
/// `{"code":"GAME_NOT_FOUND","status":404,"message":"Game not found"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceError {
    pub code: ErrorCode,
    pub status: u16,
    pub message: String,
}

impl From<ErrorCode> for ServiceError {
    fn from(code: ErrorCode) -> Self {
        Self {
            code,
            status: code.status(),
            message: code.message().to_string(),
        }
    }
}
