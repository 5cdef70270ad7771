use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board sides must be between 2 and 30 cells")]
    InvalidDimensions,
    #[error("Mine count must be at least 1")]
    TooFewMines,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Cell is already opened")]
    CellAlreadyOpened,
}

pub type Result<T> = core::result::Result<T, GameError>;
