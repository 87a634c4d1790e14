//! Text form of a [`MatchSnapshot`].
//!
//! ```text
//! <turnsLeft>x<knownPlayerId>;<knownScore>x<unknownScore>x<width>x<height>x<cell0>;<cell1>;...
//! ```
//!
//! Cells are listed row by row, `y` being the slow index, and an empty cell is
//! written as `-1`. There is no trailing delimiter.

use core::fmt::{self, Write};
use core::str::FromStr;
use ndarray::Array2;

use crate::*;

pub const FIELD_SEPARATOR: char = 'x';
pub const SCORE_SEPARATOR: char = ';';
pub const CELL_SEPARATOR: char = ';';

pub fn encode(snapshot: &MatchSnapshot) -> String {
    let (width, height) = snapshot.size();
    let mut out = String::with_capacity(32 + 3 * snapshot.total_cells() as usize);

    // writing into a String cannot fail
    let _ = write!(
        out,
        "{turns}{f}{id}{s}{known}{f}{unknown}{f}{width}{f}{height}{f}",
        turns = snapshot.turns_left,
        id = snapshot.scores.known_player_id(),
        known = snapshot.scores.known_score(),
        unknown = snapshot.scores.unknown_score(),
        f = FIELD_SEPARATOR,
        s = SCORE_SEPARATOR,
    );

    let mut first = true;
    for y in 0..height {
        for x in 0..width {
            if !first {
                out.push(CELL_SEPARATOR);
            }
            first = false;
            let _ = write!(out, "{}", snapshot[(x, y)].to_token());
        }
    }

    out
}

pub fn decode(text: &str) -> core::result::Result<MatchSnapshot, DecodeError> {
    let fields: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
    let [turns, player, unknown, width, height, cells] = fields[..] else {
        return Err(DecodeError::FieldCount {
            found: fields.len(),
        });
    };

    let turns_left: i32 = turns.parse().map_err(|_| DecodeError::InvalidTurnsLeft {
        token: turns.into(),
    })?;

    let player_parts: Vec<&str> = player.split(SCORE_SEPARATOR).collect();
    let [known_player_id, known] = player_parts[..] else {
        return Err(DecodeError::PlayerScoreParts {
            found: player_parts.len(),
        });
    };
    let known_score = parse_score(known)?;
    let unknown_score = parse_score(unknown)?;

    let width = parse_dimension(width)?;
    let height = parse_dimension(height)?;
    let expected = mult(width, height) as usize;

    let tokens: Vec<&str> = if cells.is_empty() && expected == 0 {
        Vec::new()
    } else {
        cells.split(CELL_SEPARATOR).collect()
    };
    if tokens.len() != expected {
        return Err(DecodeError::CellCountMismatch {
            expected,
            found: tokens.len(),
        });
    }

    let mut grid: Array2<GridCell> = Array2::default((width, height).to_nd_index());
    for (index, token) in tokens.into_iter().enumerate() {
        let x = index % usize::from(width);
        let y = index / usize::from(width);
        grid[[x, y]] = token
            .parse::<i64>()
            .ok()
            .and_then(GridCell::from_token)
            .ok_or_else(|| DecodeError::InvalidCell {
                index,
                token: token.into(),
            })?;
    }

    // splitting on both separators already keeps them out of the id
    let scores = PlayerScores::new_unchecked(known_player_id.into(), known_score, unknown_score);

    log::trace!(
        "Decoded {}x{} snapshot with {} turns left",
        width,
        height,
        turns_left
    );
    Ok(MatchSnapshot::new_unchecked(grid, turns_left, scores))
}

fn parse_score(token: &str) -> core::result::Result<Score, DecodeError> {
    token.parse().map_err(|_| DecodeError::InvalidScore {
        token: token.into(),
    })
}

fn parse_dimension(token: &str) -> core::result::Result<Coord, DecodeError> {
    token.parse().map_err(|_| DecodeError::InvalidDimension {
        token: token.into(),
    })
}

impl fmt::Display for MatchSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for MatchSnapshot {
    type Err = DecodeError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        decode(s)
    }
}
