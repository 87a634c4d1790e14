use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Refill work for one clear batch: how many blocks each column lost.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplenishOrder {
    columns: BTreeMap<Coord, CellCount>,
}

impl ReplenishOrder {
    pub fn from_batch(batch: &ClearBatch) -> Self {
        let mut columns = BTreeMap::new();
        for &(x, _) in &batch.cleared {
            *columns.entry(x).or_insert(0) += 1;
        }
        Self { columns }
    }

    pub fn columns(&self) -> impl Iterator<Item = (Coord, CellCount)> + '_ {
        self.columns.iter().map(|(&x, &count)| (x, count))
    }

    pub fn total(&self) -> CellCount {
        self.columns.values().sum()
    }

    /// Stacks fresh blocks on top of each affected column, starting at the
    /// lowest row with nothing above it. New blocks spawn above the grid so
    /// they fall into place. Columns that no longer exist are skipped, which
    /// makes a late refill against a torn-down board a no-op.
    ///
    /// Returns the number of blocks created.
    pub fn apply<B: Board + ?Sized>(
        &self,
        board: &mut B,
        rng: &mut SmallRng,
        block_types: ColorId,
    ) -> CellCount {
        use rand::prelude::*;

        let (width, height) = board.grid_size();
        let block_types = block_types.max(1);
        let mut created = 0;

        for (x, count) in self.columns() {
            if x >= width {
                log::warn!(
                    "Skipping refill of column {} on a {}x{} board",
                    x,
                    width,
                    height
                );
                continue;
            }

            let lowest = (0..height)
                .find(|&y| !board.is_occupied((x, y)))
                .unwrap_or(height);

            for delta in 0..count {
                let Some(y) = Coord::try_from(delta)
                    .ok()
                    .and_then(|delta| lowest.checked_add(delta))
                    .filter(|&y| y < height)
                else {
                    log::warn!(
                        "Column {} overflows, {} of {} blocks not refilled",
                        x,
                        count - delta,
                        count
                    );
                    break;
                };
                let spawn = (f32::from(x), f32::from(height) + delta as f32);
                let color = rng.random_range(0..block_types);
                board.create_block(spawn, (x, y), color);
                created += 1;
            }
        }

        log::debug!(
            "Refilled {} of {} cleared blocks",
            created,
            self.total()
        );
        created
    }
}
