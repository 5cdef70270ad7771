use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use sweeper_core::{Cell, GameConfig, MineLayout, ToNdIndex};
use uuid::Uuid;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(Uuid);

impl GameId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for GameId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Commit counter of a stored game.
pub type Version = u64;

pub const INITIAL_VERSION: Version = 0;

/// A game as persisted by a [`GameStateStore`](crate::GameStateStore).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub config: GameConfig,
    pub visible: Array2<Cell>,
    /// Mine layout, absent until the first move is committed.
    pub hidden: Option<MineLayout>,
    pub completed: bool,
    pub version: Version,
}

impl GameRecord {
    /// Unplayed game under a fresh id.
    pub fn new(config: GameConfig) -> Self {
        Self {
            id: GameId::random(),
            config,
            visible: Array2::default(config.shape().to_nd_index()),
            hidden: None,
            completed: false,
            version: INITIAL_VERSION,
        }
    }

    pub fn is_started(&self) -> bool {
        self.hidden.is_some()
    }
}

/// The single conditional write that commits a turn.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordUpdate {
    pub expected_version: Version,
    pub visible: Array2<Cell>,
    pub completed: bool,
    /// Set only by the first move of a game.
    pub hidden: Option<MineLayout>,
}
