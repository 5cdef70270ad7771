use alloc::collections::VecDeque;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// What a successful reveal did to the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Safe cell opened; carries how many cells the flood fill opened.
    Revealed(CellCount),
    HitMine,
    /// Last safe cell opened; carries how many cells the flood fill opened.
    Won(CellCount),
}

impl RevealOutcome {
    pub const fn is_final(self) -> bool {
        matches!(self, Self::HitMine | Self::Won(_))
    }
}

/// Applies moves to a visible board against a fixed mine layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    mine_layout: MineLayout,
    board: Array2<Cell>,
    revealed_count: CellCount,
    state: EngineState,
}

impl PlayEngine {
    /// Fresh game, every cell hidden.
    pub fn new(mine_layout: MineLayout) -> Self {
        let shape = mine_layout.shape();
        Self {
            mine_layout,
            board: Array2::default(shape.to_nd_index()),
            revealed_count: 0,
            state: EngineState::InProgress,
        }
    }

    /// Picks a game back up from a persisted visible board.
    pub fn resume(mine_layout: MineLayout, board: Array2<Cell>) -> Result<Self> {
        if grid_shape(&board) != mine_layout.shape() {
            return Err(GameError::InvalidBoardShape);
        }

        let revealed_count: CellCount = board
            .iter()
            .filter(|cell| matches!(cell, Cell::Count(_)))
            .count()
            .try_into()
            .map_err(|_| GameError::InvalidBoardShape)?;

        let state = if board.iter().any(|&cell| cell == Cell::ExplodedMine) {
            EngineState::Lost
        } else if revealed_count >= mine_layout.safe_cell_count() {
            EngineState::Won
        } else {
            EngineState::InProgress
        };

        Ok(Self {
            mine_layout,
            board,
            revealed_count,
            state,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn shape(&self) -> Coord2 {
        self.mine_layout.shape()
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords.to_nd_index()]
    }

    pub fn board(&self) -> &Array2<Cell> {
        &self.board
    }

    pub fn into_board(self) -> Array2<Cell> {
        self.board
    }

    /// Opens one cell. Every precondition is checked before the board is
    /// touched, so an error leaves the engine exactly as it was.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        if self.state.is_finished() {
            return Err(GameError::AlreadyEnded);
        }
        let coords = self.mine_layout.validate_coords(coords)?;
        if !self.cell_at(coords).is_hidden() {
            return Err(GameError::CellAlreadyOpened);
        }

        if self.mine_layout.contains_mine(coords) {
            self.explode(coords);
            return Ok(RevealOutcome::HitMine);
        }

        let opened = self.open_region(coords);
        log::debug!("Opened {opened} cells from {coords:?}");

        if self.revealed_count == self.mine_layout.safe_cell_count() {
            self.show_hidden_mines();
            self.state = EngineState::Won;
            Ok(RevealOutcome::Won(opened))
        } else {
            Ok(RevealOutcome::Revealed(opened))
        }
    }

    /// Opens `start` and, through zero-count cells, everything connected to
    /// it. Uses a worklist instead of recursion; a cell is only opened while
    /// still hidden, so each one is opened at most once.
    fn open_region(&mut self, start: Coord2) -> CellCount {
        let mut opened: CellCount = 0;
        let mut pending = VecDeque::from([start]);

        while let Some(pos) = pending.pop_front() {
            if !self.board[pos.to_nd_index()].is_hidden() {
                continue;
            }

            let adjacent_mines = self.mine_layout.adjacent_mine_count(pos);
            self.board[pos.to_nd_index()] = Cell::Count(adjacent_mines);
            opened += 1;

            if adjacent_mines == 0 {
                let board = &self.board;
                pending.extend(
                    self.mine_layout
                        .iter_neighbors(pos)
                        .filter(|neighbor| board[neighbor.to_nd_index()].is_hidden()),
                );
            }
        }

        self.revealed_count += opened;
        opened
    }

    /// Loss: the triggered mine explodes and the rest of the board is shown.
    fn explode(&mut self, triggered: Coord2) {
        let layout = &self.mine_layout;
        for ((row, col), cell) in self.board.indexed_iter_mut() {
            let pos = (row as Coord, col as Coord);
            if !cell.is_hidden() {
                continue;
            }
            *cell = if pos == triggered {
                Cell::ExplodedMine
            } else if layout.contains_mine(pos) {
                Cell::Mine
            } else {
                Cell::Count(layout.adjacent_mine_count(pos))
            };
        }
        self.revealed_count = self.mine_layout.safe_cell_count();
        self.state = EngineState::Lost;
    }

    fn show_hidden_mines(&mut self) {
        for pos in self.mine_layout.iter_mines() {
            let cell = &mut self.board[pos.to_nd_index()];
            if cell.is_hidden() {
                *cell = Cell::Mine;
            }
        }
    }
}

/// Resolves one move against a private copy of `visible`, returning the new
/// visible board and whether the game is now over.
pub fn apply_move(
    visible: &Array2<Cell>,
    hidden: &MineLayout,
    coords: Coord2,
) -> Result<(Array2<Cell>, bool)> {
    let mut engine = PlayEngine::resume(hidden.clone(), visible.clone())?;
    engine.reveal(coords)?;
    let completed = engine.is_finished();
    Ok((engine.into_board(), completed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(shape: Coord2, mines: &[Coord2]) -> MineLayout {
        MineLayout::from_mine_coords(shape, mines).unwrap()
    }

    fn count_cells(engine: &PlayEngine, wanted: Cell) -> usize {
        engine.board().iter().filter(|&&cell| cell == wanted).count()
    }

    #[test]
    fn reveal_hits_mine_and_shows_whole_board() {
        let mines = &[(0, 4), (2, 2), (4, 0)];
        let mut engine = PlayEngine::new(layout((5, 5), mines));

        assert_eq!(engine.reveal((2, 2)).unwrap(), RevealOutcome::HitMine);

        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(engine.cell_at((2, 2)), Cell::ExplodedMine);
        assert_eq!(engine.cell_at((0, 4)), Cell::Mine);
        assert_eq!(engine.cell_at((4, 0)), Cell::Mine);
        assert_eq!(engine.cell_at((1, 1)), Cell::Count(1));
        assert_eq!(engine.cell_at((1, 3)), Cell::Count(2));
        assert_eq!(engine.cell_at((0, 0)), Cell::Count(0));
        assert_eq!(count_cells(&engine, Cell::Hidden), 0);
        assert_eq!(
            count_cells(&engine, Cell::Mine) + count_cells(&engine, Cell::ExplodedMine),
            usize::from(engine.total_mines())
        );
    }

    #[test]
    fn reveal_flood_fill_opens_zero_region() {
        let mut engine = PlayEngine::new(layout((5, 5), &[(2, 4), (4, 4)]));

        let outcome = engine.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed(22));
        assert_eq!(engine.cell_at((0, 0)), Cell::Count(0));
        assert_eq!(engine.cell_at((1, 3)), Cell::Count(1));
        assert_eq!(engine.cell_at((3, 3)), Cell::Count(2));
        assert_eq!(engine.cell_at((3, 4)), Cell::Hidden);
        assert_eq!(engine.cell_at((2, 4)), Cell::Hidden);
    }

    #[test]
    fn flood_fill_stops_at_count_cells() {
        let wall: [Coord2; 5] = [(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)];
        let mut engine = PlayEngine::new(layout((5, 5), &wall));

        let outcome = engine.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed(10));
        for row in 0..5 {
            assert_eq!(engine.cell_at((row, 0)), Cell::Count(0));
            assert!(matches!(engine.cell_at((row, 1)), Cell::Count(n) if n > 0));
            assert_eq!(engine.cell_at((row, 3)), Cell::Hidden);
            assert_eq!(engine.cell_at((row, 4)), Cell::Hidden);
        }
    }

    #[test]
    fn flood_fill_opens_each_cell_once() {
        // the walled-off corner pocket keeps the game from ending
        let wall: [Coord2; 5] = [(0, 2), (1, 2), (2, 2), (2, 1), (2, 0)];
        let mut engine = PlayEngine::new(layout((9, 9), &wall));

        let Ok(RevealOutcome::Revealed(opened)) = engine.reveal((8, 8)) else {
            panic!("expected a safe reveal");
        };

        let shown = 81 - count_cells(&engine, Cell::Hidden);
        assert_eq!(usize::from(opened), shown);
        assert_eq!(engine.revealed_count(), opened);
        assert_eq!(engine.cell_at((0, 0)), Cell::Hidden);
        assert_eq!(count_cells(&engine, Cell::Hidden), 9);
    }

    #[test]
    fn opening_a_full_size_board_does_not_recurse() {
        let mut engine = PlayEngine::new(layout((MAX_SIDE, MAX_SIDE), &[(0, 0)]));

        let outcome = engine.reveal((29, 29)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won(899));
        assert_eq!(engine.cell_at((0, 0)), Cell::Mine);
    }

    #[test]
    fn winning_board_shows_mines_without_explosion() {
        let mut engine = PlayEngine::new(layout((2, 2), &[(1, 1)]));

        assert_eq!(engine.reveal((0, 1)).unwrap(), RevealOutcome::Revealed(1));
        assert_eq!(engine.reveal((1, 0)).unwrap(), RevealOutcome::Revealed(1));
        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::Won(1));

        assert_eq!(engine.state(), EngineState::Won);
        assert_eq!(count_cells(&engine, Cell::Mine), 1);
        assert_eq!(count_cells(&engine, Cell::ExplodedMine), 0);
        assert_eq!(count_cells(&engine, Cell::Hidden), 0);
    }

    #[test]
    fn rejected_moves_leave_board_untouched() {
        let mut engine = PlayEngine::new(layout((3, 3), &[(0, 0), (2, 2)]));
        assert_eq!(engine.reveal((0, 2)).unwrap(), RevealOutcome::Revealed(4));
        let before = engine.clone();

        assert_eq!(engine.reveal((0, 2)), Err(GameError::CellAlreadyOpened));
        assert_eq!(engine.reveal((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(engine.reveal((0, 3)), Err(GameError::InvalidCoords));
        assert_eq!(engine, before);
    }

    #[test]
    fn finished_game_rejects_moves() {
        let mut engine = PlayEngine::new(layout((2, 2), &[(0, 0), (1, 1)]));
        engine.reveal((0, 0)).unwrap();
        let before = engine.clone();

        assert_eq!(engine.reveal((0, 1)), Err(GameError::AlreadyEnded));
        assert_eq!(engine.reveal((9, 9)), Err(GameError::AlreadyEnded));
        assert_eq!(engine, before);
    }

    #[test]
    fn resume_recovers_state_from_board() {
        let mines = layout((2, 2), &[(1, 1)]);
        let mut engine = PlayEngine::new(mines.clone());
        engine.reveal((0, 0)).unwrap();

        let resumed = PlayEngine::resume(mines.clone(), engine.board().clone()).unwrap();
        assert_eq!(resumed.state(), EngineState::InProgress);
        assert_eq!(resumed.revealed_count(), 1);

        engine.reveal((1, 1)).unwrap();
        let resumed = PlayEngine::resume(mines.clone(), engine.into_board()).unwrap();
        assert_eq!(resumed.state(), EngineState::Lost);

        assert_eq!(
            PlayEngine::resume(mines, Array2::default((3, 2))),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn apply_move_works_on_a_copy() {
        let mines = layout((2, 2), &[(0, 0)]);
        let visible: Array2<Cell> = Array2::default((2, 2));

        let (after, completed) = apply_move(&visible, &mines, (0, 0)).unwrap();

        assert!(completed);
        assert_eq!(after[[0, 0]], Cell::ExplodedMine);
        assert!(visible.iter().all(|cell| cell.is_hidden()));
    }
}
