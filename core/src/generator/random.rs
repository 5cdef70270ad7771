use super::*;
use ndarray::Array2;

/// Uniformly random placement that never puts a mine on the `safe` cell, which
/// is the cell of the first move.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
    safe: Coord2,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64, safe: Coord2) -> Self {
        Self { seed, safe }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use alloc::vec::Vec;
        use rand::prelude::*;

        let total_cells = usize::from(config.total_cells());
        let mines = usize::from(config.mines);
        if mines >= total_cells {
            return Err(GameError::TooManyMines);
        }
        if !config.contains(self.safe) {
            return Err(GameError::InvalidCoords);
        }

        let width = usize::from(config.width);
        let safe_index = usize::from(self.safe.0) * width + usize::from(self.safe.1);
        let mut candidates: Vec<usize> = (0..total_cells).filter(|&i| i != safe_index).collect();

        // partial Fisher-Yates: the first `mines` entries are an unbiased sample
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let (chosen, _) = candidates.partial_shuffle(&mut rng, mines);

        let mut mine_mask: Array2<bool> = Array2::default(config.shape().to_nd_index());
        if let Some(cells) = mine_mask.as_slice_mut() {
            for &index in chosen.iter() {
                cells[index] = true;
            }
        } else {
            for &index in chosen.iter() {
                mine_mask[[index / width, index % width]] = true;
            }
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        log::debug!(
            "Generated {}x{} layout with {} mines, safe cell {:?}",
            config.width,
            config.height,
            layout.mine_count(),
            self.safe
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exact_mine_count_and_spares_safe_cell() {
        for (width, height) in [(2, 2), (5, 3), (9, 9), (30, 16), (30, 30)] {
            let total = mult(width, height);
            for mines in [1, total / 2, total - 1] {
                let config = GameConfig::new(width, height, mines).unwrap();
                for (seed, safe) in [(0, (0, 0)), (7, (height - 1, width - 1)), (42, (height / 2, 1))] {
                    let layout = RandomLayoutGenerator::new(seed, safe)
                        .generate(config)
                        .unwrap();
                    assert_eq!(layout.mine_count(), mines);
                    assert_eq!(layout.shape(), (height, width));
                    assert!(!layout.contains_mine(safe));
                }
            }
        }
    }

    #[test]
    fn same_seed_reproduces_layout() {
        let config = GameConfig::new(16, 16, 40).unwrap();
        let first = RandomLayoutGenerator::new(1234, (3, 3)).generate(config);
        let second = RandomLayoutGenerator::new(1234, (3, 3)).generate(config);
        assert_eq!(first, second);
    }

    #[test]
    fn every_other_cell_can_receive_a_mine() {
        let config = GameConfig::new(3, 3, 1).unwrap();
        let mut seen = Array2::<bool>::default((3, 3));
        for seed in 0..500 {
            let layout = RandomLayoutGenerator::new(seed, (1, 1)).generate(config).unwrap();
            for pos in layout.iter_mines() {
                seen[pos.to_nd_index()] = true;
            }
        }
        assert!(!seen[[1, 1]]);
        assert_eq!(seen.iter().filter(|&&hit| hit).count(), 8);
    }

    #[test]
    fn rejects_full_board() {
        let config = GameConfig::new_unchecked(2, 2, 4);
        assert_eq!(
            RandomLayoutGenerator::new(0, (0, 0)).generate(config),
            Err(GameError::TooManyMines)
        );
    }

    #[test]
    fn rejects_safe_cell_outside_board() {
        let config = GameConfig::new(2, 2, 1).unwrap();
        assert_eq!(
            RandomLayoutGenerator::new(0, (2, 0)).generate(config),
            Err(GameError::InvalidCoords)
        );
    }
}
