use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Full match state exchanged between turns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    grid: Array2<GridCell>,
    pub turns_left: i32,
    pub scores: PlayerScores,
}

impl MatchSnapshot {
    pub fn new(grid: Array2<GridCell>, turns_left: i32, scores: PlayerScores) -> Result<Self> {
        let snapshot = Self {
            grid,
            turns_left,
            scores,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub(crate) const fn new_unchecked(
        grid: Array2<GridCell>,
        turns_left: i32,
        scores: PlayerScores,
    ) -> Self {
        Self {
            grid,
            turns_left,
            scores,
        }
    }

    /// Captures the cells of `board` as they are now.
    pub fn from_board<B: Board + ?Sized>(
        board: &B,
        turns_left: i32,
        scores: PlayerScores,
    ) -> Self {
        let size = board.grid_size();
        let mut grid = Array2::default(size.to_nd_index());

        let (x_end, y_end) = size;
        for x in 0..x_end {
            for y in 0..y_end {
                let coords = (x, y);
                grid[coords.to_nd_index()] = board.block_color(coords);
            }
        }

        Self::new_unchecked(grid, turns_left, scores)
    }

    /// Rebuilds the visible board from this snapshot.
    pub fn apply_to_board<B: Board + ?Sized>(&self, board: &mut B) {
        let size = self.size();
        board.reset_grid(size);

        let (x_end, y_end) = size;
        for x in 0..x_end {
            for y in 0..y_end {
                let coords = (x, y);
                if let GridCell::Block(color) = self[coords] {
                    board.create_block((x.into(), y.into()), coords, color);
                }
            }
        }
        log::debug!("Restored {}x{} board from snapshot", x_end, y_end);
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.grid.dim();
        (
            dim.0.try_into().unwrap_or(Coord::MAX),
            dim.1.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn grid(&self) -> &Array2<GridCell> {
        &self.grid
    }

    pub fn total_cells(&self) -> CellCount {
        let (width, height) = self.size();
        mult(width, height)
    }

    pub fn is_terminal(&self) -> bool {
        self.turns_left <= 0
    }

    /// First block whose color is outside `[0, block_types)`, if any.
    pub fn find_color_out_of_range(&self, block_types: ColorId) -> Option<(Coord2, ColorId)> {
        let (x_end, y_end) = self.size();
        for y in 0..y_end {
            for x in 0..x_end {
                if let GridCell::Block(color) = self[(x, y)] {
                    if color >= block_types {
                        return Some(((x, y), color));
                    }
                }
            }
        }
        None
    }

    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.grid.dim();
        if Coord::try_from(width).is_err() || Coord::try_from(height).is_err() {
            return Err(DecodeError::InvalidDimension {
                token: format!("{}x{}", width, height),
            }
            .into());
        }
        validate_player_id(self.scores.known_player_id().into())?;
        Ok(())
    }
}

impl Index<Coord2> for MatchSnapshot {
    type Output = GridCell;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.grid[(x as usize, y as usize)]
    }
}

impl IndexMut<Coord2> for MatchSnapshot {
    fn index_mut(&mut self, (x, y): Coord2) -> &mut Self::Output {
        &mut self.grid[(x as usize, y as usize)]
    }
}
