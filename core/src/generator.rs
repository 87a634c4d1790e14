use ndarray::Array2;

use crate::*;

pub trait BoardGenerator {
    fn generate(self, size: Coord2, block_types: ColorId) -> Array2<GridCell>;
}

/// Fills every cell with a color drawn uniformly from `[0, block_types)`.
/// The same seed always yields the same board, so both devices of a hosted
/// match can agree on the opening layout.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, size: Coord2, block_types: ColorId) -> Array2<GridCell> {
        use rand::prelude::*;

        let block_types = if block_types == 0 {
            log::warn!("Cannot generate blocks without block types, using one color");
            1
        } else {
            block_types
        };

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut cells: Array2<GridCell> = Array2::default(size.to_nd_index());
        for cell in cells.iter_mut() {
            *cell = GridCell::Block(rng.random_range(0..block_types));
        }
        log::debug!(
            "Generated {:?} board with {} block types from seed {}",
            size,
            block_types,
            self.seed
        );
        cells
    }
}
