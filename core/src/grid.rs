use std::collections::{BTreeSet, VecDeque};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Smallest connected region a tap clears by default.
pub const DEFAULT_MIN_MATCH: CellCount = 2;

/// In-memory board: blocks rest on the bottom row and fall when cells below
/// them are cleared.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridBoard {
    cells: Array2<GridCell>,
    min_match: CellCount,
}

impl GridBoard {
    pub fn new(size: Coord2) -> Self {
        Self::from_cells(Array2::default(size.to_nd_index()))
    }

    pub fn from_cells(cells: Array2<GridCell>) -> Self {
        Self {
            cells,
            min_match: DEFAULT_MIN_MATCH,
        }
    }

    pub fn with_min_match(self, min_match: CellCount) -> Self {
        Self {
            min_match: min_match.max(1),
            ..self
        }
    }

    pub fn cells(&self) -> &Array2<GridCell> {
        &self.cells
    }

    pub fn occupied_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| !cell.is_empty())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    /// Orthogonally connected blocks sharing the color at `coords`.
    pub fn region_at(&self, coords: Coord2) -> Vec<Coord2> {
        let GridCell::Block(color) = self.block_color(coords) else {
            return Vec::new();
        };

        let mut visited = BTreeSet::from([coords]);
        let mut to_visit = VecDeque::from([coords]);
        while let Some(visit_coords) = to_visit.pop_front() {
            to_visit.extend(
                self.cells
                    .iter_neighbors(visit_coords)
                    .filter(|&pos| self.cells[pos.to_nd_index()] == GridCell::Block(color))
                    .filter(|&pos| visited.insert(pos)),
            );
        }
        log::trace!(
            "Region of color {} at {:?} has {} blocks",
            color,
            coords,
            visited.len()
        );

        visited.into_iter().collect()
    }

    /// Whether any tap would clear something.
    pub fn has_match(&self) -> bool {
        let (x_end, y_end) = self.grid_size();
        (0..x_end)
            .flat_map(|x| (0..y_end).map(move |y| (x, y)))
            .any(|coords| self.region_at(coords).len() as CellCount >= self.min_match)
    }

    /// Clears the region under `coords` when it is large enough, then lets the
    /// remaining blocks fall.
    pub fn tap(&mut self, coords: Coord2) -> Option<ClearBatch> {
        if !self.contains(coords) {
            log::debug!("Tap outside the board at {:?}", coords);
            return None;
        }

        let region = self.region_at(coords);
        if (region.len() as CellCount) < self.min_match {
            log::debug!(
                "Region at {:?} too small to clear ({} < {})",
                coords,
                region.len(),
                self.min_match
            );
            return None;
        }

        for &pos in &region {
            self.destroy_block(pos);
        }
        self.collapse();

        Some(ClearBatch::new(region, ClearReason::PlayerMatch))
    }

    /// Moves every block down until it rests on the bottom or on another block.
    pub fn collapse(&mut self) {
        let (x_end, y_end) = self.grid_size();
        for x in 0..x_end {
            let mut landing = 0;
            for y in 0..y_end {
                let cell = self.cells[(x, y).to_nd_index()];
                if cell.is_empty() {
                    continue;
                }
                if landing != y {
                    self.cells[(x, landing).to_nd_index()] = cell;
                    self.cells[(x, y).to_nd_index()] = GridCell::Empty;
                }
                landing += 1;
            }
        }
    }
}

impl Board for GridBoard {
    fn grid_size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (
            dim.0.try_into().unwrap_or(Coord::MAX),
            dim.1.try_into().unwrap_or(Coord::MAX),
        )
    }

    fn block_color(&self, coords: Coord2) -> GridCell {
        if self.contains(coords) {
            self.cells[coords.to_nd_index()]
        } else {
            GridCell::Empty
        }
    }

    fn create_block(&mut self, spawn: Position, coords: Coord2, color: ColorId) {
        if !self.contains(coords) {
            log::warn!("Dropping block created outside the board at {:?}", coords);
            return;
        }
        log::trace!(
            "Block of color {} falls from {:?} to {:?}",
            color,
            spawn,
            coords
        );
        self.cells[coords.to_nd_index()] = GridCell::Block(color);
    }

    fn destroy_block(&mut self, coords: Coord2) {
        if self.contains(coords) {
            self.cells[coords.to_nd_index()] = GridCell::Empty;
        }
    }

    fn reset_grid(&mut self, size: Coord2) {
        self.cells = Array2::default(size.to_nd_index());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rows are given top to bottom, `.` is empty.
    fn board(rows: &[&str]) -> GridBoard {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        let mut cells = Array2::default([width, height]);
        for (row, line) in rows.iter().enumerate() {
            let y = height - 1 - row;
            for (x, ch) in line.chars().enumerate() {
                cells[[x, y]] = match ch.to_digit(10) {
                    Some(color) => GridCell::Block(color as ColorId),
                    None => GridCell::Empty,
                };
            }
        }
        GridBoard::from_cells(cells)
    }

    #[test]
    fn region_follows_orthogonal_neighbors_only() {
        let b = board(&["10", "01"]);

        assert_eq!(b.region_at((0, 0)), vec![(0, 0)]);

        let b = board(&["110", "010", "011"]);
        assert_eq!(
            b.region_at((1, 0)),
            vec![(0, 2), (1, 0), (1, 1), (1, 2), (2, 0)]
        );
    }

    #[test]
    fn tap_clears_region_and_collapses_columns() {
        let mut b = board(&["23", "11", "12"]);

        let batch = b.tap((0, 1)).unwrap();

        assert_eq!(batch.cleared, BTreeSet::from([(0, 0), (0, 1), (1, 1)]));
        assert_eq!(batch.reason, ClearReason::PlayerMatch);
        assert_eq!(b.block_color((0, 0)), GridCell::Block(2));
        assert_eq!(b.block_color((0, 1)), GridCell::Empty);
        assert_eq!(b.block_color((1, 0)), GridCell::Block(2));
        assert_eq!(b.block_color((1, 1)), GridCell::Block(3));
        assert_eq!(b.occupied_count(), 3);
    }

    #[test]
    fn tap_ignores_small_regions_and_empty_cells() {
        let mut b = board(&["12", "21"]);

        assert_eq!(b.tap((0, 0)), None);
        assert_eq!(b.tap((5, 5)), None);
        assert!(!b.has_match());

        let mut b = board(&["1.", "12"]);
        assert_eq!(b.tap((1, 1)), None);
        assert!(b.has_match());
    }

    #[test]
    fn out_of_bounds_access_is_harmless() {
        let mut b = GridBoard::new((1, 1));

        b.create_block((0.0, 3.0), (0, 3), 1);
        b.destroy_block((9, 9));

        assert_eq!(b.block_color((0, 3)), GridCell::Empty);
        assert_eq!(b.occupied_count(), 0);
    }
}
