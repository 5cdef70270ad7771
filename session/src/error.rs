use sweeper_core::GameError;
use sweeper_protocol::{ErrorCode, ServiceError};
use thiserror::Error;

use crate::*;

/// Why a session operation was refused. None of these leave a partially
/// applied move behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Invalid game parameters: {0}")]
    Validation(#[source] GameError),
    #[error("Game with ID {0} not found")]
    NotFound(GameId),
    #[error("Invalid coordinates: row={row}, col={col}")]
    InvalidCoordinates { row: i32, col: i32 },
    #[error("Game {0} already completed")]
    AlreadyCompleted(GameId),
    #[error("Cell row={row}, col={col} is already opened")]
    CellAlreadyOpened { row: i32, col: i32 },
    #[error("Game {id} was updated concurrently (expected version {expected})")]
    ConcurrencyConflict { id: GameId, expected: Version },
    #[error("Failed to create game")]
    GameCreationFailed(#[source] StoreError),
    #[error("Stored game {0} is inconsistent: {1}")]
    CorruptRecord(GameId, #[source] GameError),
    #[error("Store failure")]
    Store(#[from] StoreError),
}

impl SessionError {
    pub fn code(&self) -> ErrorCode {
        use SessionError::*;
        match self {
            Validation(_) => ErrorCode::ValidationFailed,
            NotFound(_) => ErrorCode::GameNotFound,
            InvalidCoordinates { .. } => ErrorCode::WrongCoordinate,
            AlreadyCompleted(_) => ErrorCode::GameCompleted,
            CellAlreadyOpened { .. } => ErrorCode::CellAlreadyOpened,
            ConcurrencyConflict { .. } => ErrorCode::ConcurrentUpdate,
            GameCreationFailed(_) => ErrorCode::CreationFailed,
            CorruptRecord(..) | Store(_) => ErrorCode::Unknown,
        }
    }

    /// Whether repeating the whole turn may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }
}

impl From<&SessionError> for ServiceError {
    fn from(err: &SessionError) -> Self {
        err.code().into()
    }
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;
