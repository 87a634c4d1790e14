use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::*;

/// Why a set of blocks left the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearReason {
    /// The acting player matched a connected region.
    PlayerMatch,
    /// Removed by the board itself, not by the acting player.
    Scripted,
}

/// Blocks removed together by one matching action. Each cell counts once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearBatch {
    pub cleared: BTreeSet<Coord2>,
    pub reason: ClearReason,
}

impl ClearBatch {
    pub fn new(cleared: impl IntoIterator<Item = Coord2>, reason: ClearReason) -> Self {
        Self {
            cleared: cleared.into_iter().collect(),
            reason,
        }
    }

    pub fn len(&self) -> usize {
        self.cleared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cleared.is_empty()
    }
}

/// The grid subsystem the turn logic drives.
///
/// Implementations own the visual side of the board; the turn logic only
/// queries colors, places new blocks and removes blocks.
pub trait Board {
    fn grid_size(&self) -> Coord2;

    fn block_color(&self, coords: Coord2) -> GridCell;

    /// Places a block that will come to rest at `coords`, starting from the
    /// visual `spawn` position.
    fn create_block(&mut self, spawn: Position, coords: Coord2, color: ColorId);

    fn destroy_block(&mut self, coords: Coord2);

    /// Drops every block and resizes the grid.
    fn reset_grid(&mut self, size: Coord2);

    fn contains(&self, (x, y): Coord2) -> bool {
        let (width, height) = self.grid_size();
        x < width && y < height
    }

    fn is_occupied(&self, coords: Coord2) -> bool {
        !self.block_color(coords).is_empty()
    }

    fn occupied_in_column(&self, x: Coord) -> CellCount {
        let (_, height) = self.grid_size();
        (0..height)
            .filter(|&y| self.is_occupied((x, y)))
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_counts_each_cell_once() {
        let batch = ClearBatch::new([(2, 1), (0, 0), (2, 1), (0, 0)], ClearReason::PlayerMatch);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.cleared.into_iter().collect::<Vec<_>>(), vec![(0, 0), (2, 1)]);
    }
}
