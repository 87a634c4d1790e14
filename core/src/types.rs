use ndarray::Array2;

/// Single coordinate axis used for grid width, height, and positions.
pub type Coord = u16;

/// Count type used for cleared-block counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional grid coordinates `(x, y)`, `y = 0` is the bottom row.
pub type Coord2 = (Coord, Coord);

/// Color identifier of a block, always in `[0, block_types)` for a live board.
pub type ColorId = u16;

/// Points awarded to a player.
pub type Score = u32;

/// Identifier the tournament host assigns to a player.
pub type PlayerId = String;

/// Monotonic timestamp in milliseconds, supplied by whoever drives the tick loop.
pub type Millis = u64;

/// Visual spawn position of a block in board space, may lie above the grid.
pub type Position = (f32, f32);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Offsets of the cells a block connects to.
const ORTHOGONAL: [(i16, i16); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

pub trait NeighborsExt {
    /// Orthogonal neighbors of `coords` that lie inside the grid.
    fn iter_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2>;
}

impl<T> NeighborsExt for Array2<T> {
    fn iter_neighbors(&self, (x, y): Coord2) -> impl Iterator<Item = Coord2> {
        let (width, height) = self.dim();
        ORTHOGONAL.into_iter().filter_map(move |(dx, dy)| {
            let next = (x.checked_add_signed(dx)?, y.checked_add_signed(dy)?);
            (usize::from(next.0) < width && usize::from(next.1) < height).then_some(next)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_stay_in_bounds() {
        let grid: Array2<u8> = Array2::default([3, 2]);

        let corner: Vec<_> = grid.iter_neighbors((0, 0)).collect();
        assert_eq!(corner, vec![(1, 0), (0, 1)]);

        let edge: Vec<_> = grid.iter_neighbors((1, 1)).collect();
        assert_eq!(edge, vec![(1, 0), (0, 1), (2, 1)]);
    }

    #[test]
    fn mult_saturates() {
        assert_eq!(mult(50, 50), 2500);
        assert_eq!(mult(Coord::MAX, Coord::MAX), 4_294_836_225);
    }
}
