use sweeper_core::{
    CellCount, Coord, Coord2, GameConfig, GameError, LayoutGenerator, RandomLayoutGenerator,
    ToNdIndex, apply_move,
};
use sweeper_protocol::{GameInfoResponse, NewGameRequest, TurnRequest};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Fixed seed for every mine layout; a fresh random seed per game if unset.
    pub seed: Option<u64>,
}

/// Runs games against a [`GameStateStore`].
///
/// Holds no per-game state: each turn reads the record, computes the next
/// board on a private copy, and commits with one versioned write. Two turns
/// racing on the same game both compute, and the store lets exactly one of
/// them commit.
#[derive(Debug)]
pub struct GameSession<S> {
    store: S,
    config: SessionConfig,
}

impl<S: GameStateStore> GameSession<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, SessionConfig::default())
    }

    pub fn with_config(store: S, config: SessionConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn new_game(&self, width: Coord, height: Coord, mines: CellCount) -> Result<GameRecord> {
        let config = GameConfig::new(width, height, mines).map_err(SessionError::Validation)?;
        let record = self.store.create(GameRecord::new(config)).map_err(|err| {
            log::error!("Failed to create game: {err}");
            SessionError::GameCreationFailed(err)
        })?;
        log::info!(
            "New game {} created: {width}x{height} with {mines} mines",
            record.id
        );
        Ok(record)
    }

    pub fn info(&self, id: GameId) -> Result<GameRecord> {
        self.store.get(id)?.ok_or(SessionError::NotFound(id))
    }

    /// Opens the cell at `(row, col)`.
    ///
    /// Every check runs before anything is written. The first move of a game
    /// also generates the mine layout, which is committed in the same write as
    /// the move itself; if that write loses a race the layout is dropped.
    pub fn turn(&self, id: GameId, row: Coord, col: Coord) -> Result<GameRecord> {
        let coords = (row, col);
        let record = self.info(id)?;

        if !record.config.contains(coords) {
            return Err(invalid_coordinates(coords));
        }
        if record.completed {
            return Err(SessionError::AlreadyCompleted(id));
        }

        let generated = match record.hidden {
            Some(_) => None,
            None => {
                let layout = RandomLayoutGenerator::new(self.next_seed(), coords)
                    .generate(record.config)
                    .map_err(|err| SessionError::CorruptRecord(id, err))?;
                log::debug!("Placed mines for game {id} around first move {coords:?}");
                Some(layout)
            }
        };
        let Some(hidden) = record.hidden.as_ref().or(generated.as_ref()) else {
            return Err(SessionError::CorruptRecord(id, GameError::InvalidBoardShape));
        };

        match record.visible.get(coords.to_nd_index()) {
            Some(cell) if cell.is_hidden() => {}
            Some(_) => return Err(already_opened(coords)),
            None => return Err(SessionError::CorruptRecord(id, GameError::InvalidBoardShape)),
        }

        let (visible, completed) =
            apply_move(&record.visible, hidden, coords).map_err(|err| match err {
                GameError::AlreadyEnded => SessionError::AlreadyCompleted(id),
                GameError::CellAlreadyOpened => already_opened(coords),
                GameError::InvalidCoords => invalid_coordinates(coords),
                other => SessionError::CorruptRecord(id, other),
            })?;

        let update = RecordUpdate {
            expected_version: record.version,
            visible,
            completed,
            hidden: generated,
        };
        match self.store.update(id, update)? {
            UpdateOutcome::Committed(committed) => {
                if committed.completed {
                    log::info!("Game {id} completed at version {}", committed.version);
                } else {
                    log::debug!("Game {id} advanced to version {}", committed.version);
                }
                Ok(committed)
            }
            UpdateOutcome::Conflict { stored } => {
                log::warn!(
                    "Turn {coords:?} on game {id} lost a race: read version {}, stored {stored}",
                    record.version
                );
                Err(SessionError::ConcurrencyConflict {
                    id,
                    expected: record.version,
                })
            }
            UpdateOutcome::NotFound => Err(SessionError::NotFound(id)),
        }
    }

    pub fn new_game_request(&self, request: &NewGameRequest) -> Result<GameInfoResponse> {
        let width = Coord::try_from(request.width)
            .map_err(|_| SessionError::Validation(GameError::InvalidDimensions))?;
        let height = Coord::try_from(request.height)
            .map_err(|_| SessionError::Validation(GameError::InvalidDimensions))?;
        let mines = CellCount::try_from(request.mines_count).map_err(|_| {
            SessionError::Validation(if request.mines_count < 1 {
                GameError::TooFewMines
            } else {
                GameError::TooManyMines
            })
        })?;
        Ok(self.new_game(width, height, mines)?.to_response())
    }

    pub fn turn_request(&self, request: &TurnRequest) -> Result<GameInfoResponse> {
        let invalid = || SessionError::InvalidCoordinates {
            row: request.row,
            col: request.col,
        };
        let row = Coord::try_from(request.row).map_err(|_| invalid())?;
        let col = Coord::try_from(request.col).map_err(|_| invalid())?;
        Ok(self.turn(request.game_id.into(), row, col)?.to_response())
    }

    fn next_seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(rand::random)
    }
}

fn invalid_coordinates((row, col): Coord2) -> SessionError {
    SessionError::InvalidCoordinates {
        row: row.into(),
        col: col.into(),
    }
}

fn already_opened((row, col): Coord2) -> SessionError {
    SessionError::CellAlreadyOpened {
        row: row.into(),
        col: col.into(),
    }
}
