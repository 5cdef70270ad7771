use hashbrown::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Game {0} already exists")]
    DuplicateId(GameId),
    #[error("Mine layout of game {0} is already set")]
    HiddenBoardAlreadySet(GameId),
    #[error("Update does not match the board shape of game {0}")]
    ShapeMismatch(GameId),
    #[error("Update would move game {0} backwards")]
    Regression(GameId),
    #[error("Store lock poisoned")]
    Poisoned,
}

/// Result of a conditional write.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateOutcome {
    Committed(GameRecord),
    /// `expected_version` was stale; nothing was written.
    Conflict { stored: Version },
    NotFound,
}

/// Persistence for game records.
///
/// `update` must compare the stored version with `expected_version` and write
/// as one atomic step: it is the only point where concurrent turns on the same
/// game are serialized.
pub trait GameStateStore {
    fn create(&self, record: GameRecord) -> Result<GameRecord, StoreError>;

    fn get(&self, id: GameId) -> Result<Option<GameRecord>, StoreError>;

    fn update(&self, id: GameId, update: RecordUpdate) -> Result<UpdateOutcome, StoreError>;
}

impl<S: GameStateStore + ?Sized> GameStateStore for &S {
    fn create(&self, record: GameRecord) -> Result<GameRecord, StoreError> {
        (**self).create(record)
    }

    fn get(&self, id: GameId) -> Result<Option<GameRecord>, StoreError> {
        (**self).get(id)
    }

    fn update(&self, id: GameId, update: RecordUpdate) -> Result<UpdateOutcome, StoreError> {
        (**self).update(id, update)
    }
}

impl<S: GameStateStore + ?Sized> GameStateStore for Arc<S> {
    fn create(&self, record: GameRecord) -> Result<GameRecord, StoreError> {
        (**self).create(record)
    }

    fn get(&self, id: GameId) -> Result<Option<GameRecord>, StoreError> {
        (**self).get(id)
    }

    fn update(&self, id: GameId, update: RecordUpdate) -> Result<UpdateOutcome, StoreError> {
        (**self).update(id, update)
    }
}

/// Process-local store. Every operation holds the map lock for its whole
/// duration, which makes `update` a compare-and-swap on the version.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    games: Mutex<HashMap<GameId, GameRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<GameId, GameRecord>>, StoreError> {
        self.games.lock().map_err(|_| StoreError::Poisoned)
    }
}

/// Checks that `update` only moves `record` forward.
fn check_forward(record: &GameRecord, update: &RecordUpdate) -> Result<(), StoreError> {
    if update.visible.dim() != record.visible.dim() {
        return Err(StoreError::ShapeMismatch(record.id));
    }
    if let Some(hidden) = &update.hidden {
        if record.hidden.is_some() {
            return Err(StoreError::HiddenBoardAlreadySet(record.id));
        }
        if hidden.shape() != record.config.shape() {
            return Err(StoreError::ShapeMismatch(record.id));
        }
    }
    let cells_forward = record
        .visible
        .iter()
        .zip(update.visible.iter())
        .all(|(&stored, &next)| stored.can_become(next));
    if !cells_forward || (record.completed && !update.completed) {
        return Err(StoreError::Regression(record.id));
    }
    Ok(())
}

impl GameStateStore for InMemoryStore {
    fn create(&self, record: GameRecord) -> Result<GameRecord, StoreError> {
        let mut games = self.lock()?;
        if games.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        games.insert(record.id, record.clone());
        Ok(record)
    }

    fn get(&self, id: GameId) -> Result<Option<GameRecord>, StoreError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    fn update(&self, id: GameId, update: RecordUpdate) -> Result<UpdateOutcome, StoreError> {
        let mut games = self.lock()?;
        let Some(record) = games.get_mut(&id) else {
            return Ok(UpdateOutcome::NotFound);
        };

        if record.version != update.expected_version {
            log::warn!(
                "Rejected stale write to game {id}: expected version {}, stored {}",
                update.expected_version,
                record.version
            );
            return Ok(UpdateOutcome::Conflict {
                stored: record.version,
            });
        }

        if let Err(err) = check_forward(record, &update) {
            log::warn!("Rejected write to game {id}: {err}");
            return Err(err);
        }

        record.visible = update.visible;
        record.completed = update.completed;
        if let Some(hidden) = update.hidden {
            record.hidden = Some(hidden);
        }
        record.version += 1;

        Ok(UpdateOutcome::Committed(record.clone()))
    }
}
