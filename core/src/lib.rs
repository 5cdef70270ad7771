//! Mine-clearing game rules: board configuration, hidden mine layouts, layout
//! generation and the move-resolution engine.
//!
//! Positions are `(row, col)` and grids are `Array2` values shaped
//! `(height, width)`.

#![no_std]

extern crate alloc;

use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod tile;
mod types;

/// Smallest allowed board side.
pub const MIN_SIDE: Coord = 2;

/// Largest allowed board side.
pub const MAX_SIDE: Coord = 30;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    /// Checks `2 <= width, height <= 30` and `1 <= mines < width * height`.
    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        let sides = MIN_SIDE..=MAX_SIDE;
        if !sides.contains(&width) || !sides.contains(&height) {
            return Err(GameError::InvalidDimensions);
        }
        if mines < 1 {
            return Err(GameError::TooFewMines);
        }
        if mines >= mult(width, height) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(width, height, mines))
    }

    /// Grid shape as `(rows, cols)`.
    pub const fn shape(&self) -> Coord2 {
        (self.height, self.width)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub const fn contains(&self, (row, col): Coord2) -> bool {
        row < self.height && col < self.width
    }
}

/// The hidden board: which cells hold a mine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_coords(shape: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(shape.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= shape.0 || coords.1 >= shape.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        let (height, width) = self.shape();
        GameConfig::new_unchecked(width, height, self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let shape = self.shape();
        if coords.0 < shape.0 && coords.1 < shape.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Shape as `(rows, cols)`.
    pub fn shape(&self) -> Coord2 {
        grid_shape(&self.mine_mask)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // at most eight neighbors, so the cast is lossless
        self.iter_neighbors(coords).filter(|&pos| self[pos]).count() as u8
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for MineLayout {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.mine_mask[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn config_rejects_out_of_range_sides() {
        assert_eq!(GameConfig::new(1, 5, 1), Err(GameError::InvalidDimensions));
        assert_eq!(GameConfig::new(5, 31, 1), Err(GameError::InvalidDimensions));
        assert!(GameConfig::new(30, 30, 899).is_ok());
    }

    #[test]
    fn config_rejects_bad_mine_counts() {
        assert_eq!(GameConfig::new(5, 5, 0), Err(GameError::TooFewMines));
        assert_eq!(GameConfig::new(5, 5, 25), Err(GameError::TooManyMines));
        assert_eq!(GameConfig::new(2, 2, 3).map(|c| c.total_cells()), Ok(4));
    }

    #[test]
    fn layout_counts_adjacent_mines() {
        let layout = MineLayout::from_mine_coords((3, 4), &[(0, 0), (2, 3)]).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.safe_cell_count(), 10);
        assert_eq!(layout.shape(), (3, 4));
        assert_eq!(layout.adjacent_mine_count((1, 1)), 1);
        assert_eq!(layout.adjacent_mine_count((1, 2)), 1);
        assert_eq!(layout.adjacent_mine_count((0, 3)), 0);
        assert_eq!(layout.iter_mines().collect::<Vec<_>>(), [(0, 0), (2, 3)]);
    }

    #[test]
    fn layout_rejects_out_of_bounds_mines() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn layout_survives_serialization() {
        let layout = MineLayout::from_mine_coords((2, 3), &[(1, 2)]).unwrap();
        let json = serde_json::to_string(&layout).unwrap();
        let restored: MineLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, layout);
    }
}
