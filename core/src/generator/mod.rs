use crate::*;
pub use random::*;

mod random;

/// Produces the hidden board for a game.
pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}
