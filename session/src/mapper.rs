use sweeper_protocol::GameInfoResponse;

use crate::*;

impl GameRecord {
    /// Client view of the record. The mine layout is never included.
    pub fn to_response(&self) -> GameInfoResponse {
        GameInfoResponse {
            game_id: *self.id.as_uuid(),
            width: self.config.width.into(),
            height: self.config.height.into(),
            mines_count: self.config.mines.into(),
            completed: self.completed,
            field: self
                .visible
                .rows()
                .into_iter()
                .map(|row| row.iter().map(|cell| cell.code().to_string()).collect())
                .collect(),
        }
    }
}
