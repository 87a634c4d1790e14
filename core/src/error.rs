use thiserror::Error;

use crate::{ColorId, Coord2};

/// Reasons a snapshot blob is rejected. Decoding never yields a partial snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Expected 6 fields, found {found}")]
    FieldCount { found: usize },
    #[error("Turns-left field is not an integer: {token:?}")]
    InvalidTurnsLeft { token: String },
    #[error("Player/score field must have exactly 2 parts, found {found}")]
    PlayerScoreParts { found: usize },
    #[error("Score is not a non-negative integer: {token:?}")]
    InvalidScore { token: String },
    #[error("Grid dimension is not a non-negative integer: {token:?}")]
    InvalidDimension { token: String },
    #[error("Grid declares {expected} cells but {found} were given")]
    CellCountMismatch { expected: usize, found: usize },
    #[error("Cell {index} is not a valid color or empty marker: {token:?}")]
    InvalidCell { index: usize, token: String },
}

/// Why a tournament flow could not start or continue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateIssue {
    #[error("no tournament is in progress")]
    NotInProgress,
    #[error("no board data to resume from")]
    MissingBoardData,
    #[error("color {color} at {coords:?} exceeds the {block_types} configured block types")]
    ColorOutOfRange {
        coords: Coord2,
        color: ColorId,
        block_types: ColorId,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Could not decode match snapshot: {0}")]
    Decode(#[from] DecodeError),
    #[error("Invalid tournament state: {0}")]
    InvalidTournamentState(StateIssue),
    #[error("Player id {0:?} contains a reserved delimiter")]
    InvalidPlayerId(String),
    #[error("Match already complete, no new turns are accepted")]
    MatchComplete,
    #[error("Turn already handed off to the tournament host")]
    TurnHandedOff,
    #[error("This device already took its turn, waiting for the handoff")]
    TurnAlreadyTaken,
    #[error("Input is disabled until the pacing delay is over")]
    InputDisabled,
    #[error("Match was abandoned")]
    Abandoned,
}

impl From<StateIssue> for MatchError {
    fn from(issue: StateIssue) -> Self {
        Self::InvalidTournamentState(issue)
    }
}

pub type Result<T> = core::result::Result<T, MatchError>;
