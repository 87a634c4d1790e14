use serde::{Deserialize, Serialize};

use crate::ColorId;

/// Wire token of an empty cell.
pub const EMPTY_CELL_TOKEN: i64 = -1;

/// Content of one grid slot, as captured in a snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridCell {
    Empty,
    Block(ColorId),
}

impl GridCell {
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn color(self) -> Option<ColorId> {
        match self {
            Self::Empty => None,
            Self::Block(color) => Some(color),
        }
    }

    /// Integer used on the wire, `-1` for empty.
    pub fn to_token(self) -> i64 {
        match self {
            Self::Empty => EMPTY_CELL_TOKEN,
            Self::Block(color) => color.into(),
        }
    }

    /// Inverse of [`GridCell::to_token`]; any other negative value or a color that
    /// does not fit [`ColorId`] has no cell.
    pub fn from_token(token: i64) -> Option<Self> {
        if token == EMPTY_CELL_TOKEN {
            Some(Self::Empty)
        } else {
            ColorId::try_from(token).ok().map(Self::Block)
        }
    }
}

impl Default for GridCell {
    fn default() -> Self {
        Self::Empty
    }
}

impl From<Option<ColorId>> for GridCell {
    fn from(other: Option<ColorId>) -> Self {
        match other {
            None => GridCell::Empty,
            Some(color) => GridCell::Block(color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_map_sentinel_and_colors() {
        assert_eq!(GridCell::Empty.to_token(), -1);
        assert_eq!(GridCell::Block(3).to_token(), 3);
        assert_eq!(GridCell::from_token(-1), Some(GridCell::Empty));
        assert_eq!(GridCell::from_token(0), Some(GridCell::Block(0)));
    }

    #[test]
    fn other_negatives_have_no_cell() {
        assert_eq!(GridCell::from_token(-2), None);
        assert_eq!(GridCell::from_token(i64::from(ColorId::MAX) + 1), None);
    }
}
