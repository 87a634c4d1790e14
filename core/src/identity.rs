//! Scores stored by role rather than by player.
//!
//! Only the player who started a match is known when the first snapshot is
//! written; the opponent's id is discovered when they take their first turn.
//! Scores are therefore kept in a `known` slot and an `unknown` slot, and every
//! accessor resolves a player id to one of those slots.

use serde::{Deserialize, Serialize};

use crate::*;

/// Delimiters that can never appear in a player id, since they frame the id on the wire.
pub const RESERVED_ID_CHARS: [char; 2] = [FIELD_SEPARATOR, SCORE_SEPARATOR];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// The player who began the match.
    Known,
    /// Whoever else takes a turn.
    Unknown,
}

impl Role {
    pub const fn other(self) -> Self {
        match self {
            Self::Known => Self::Unknown,
            Self::Unknown => Self::Known,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScores {
    known_player_id: PlayerId,
    known_score: Score,
    unknown_score: Score,
}

impl PlayerScores {
    pub fn new(known_player_id: impl Into<PlayerId>) -> Result<Self> {
        Self::with_scores(known_player_id, 0, 0)
    }

    pub fn with_scores(
        known_player_id: impl Into<PlayerId>,
        known_score: Score,
        unknown_score: Score,
    ) -> Result<Self> {
        let known_player_id = validate_player_id(known_player_id.into())?;
        Ok(Self::new_unchecked(known_player_id, known_score, unknown_score))
    }

    pub(crate) const fn new_unchecked(
        known_player_id: PlayerId,
        known_score: Score,
        unknown_score: Score,
    ) -> Self {
        Self {
            known_player_id,
            known_score,
            unknown_score,
        }
    }

    pub fn known_player_id(&self) -> &str {
        &self.known_player_id
    }

    pub fn known_score(&self) -> Score {
        self.known_score
    }

    pub fn unknown_score(&self) -> Score {
        self.unknown_score
    }

    pub fn role_of(&self, player_id: &str) -> Role {
        if player_id == self.known_player_id {
            Role::Known
        } else {
            Role::Unknown
        }
    }

    /// Score of the given player.
    pub fn score(&self, player_id: &str) -> Score {
        self.slot(self.role_of(player_id))
    }

    /// Score of the given player's opponent.
    pub fn other_score(&self, player_id: &str) -> Score {
        self.slot(self.role_of(player_id).other())
    }

    pub fn set_score(&mut self, player_id: &str, score: Score) {
        *self.slot_mut(self.role_of(player_id)) = score;
    }

    pub fn set_other_score(&mut self, player_id: &str, score: Score) {
        *self.slot_mut(self.role_of(player_id).other()) = score;
    }

    fn slot(&self, role: Role) -> Score {
        match role {
            Role::Known => self.known_score,
            Role::Unknown => self.unknown_score,
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut Score {
        match role {
            Role::Known => &mut self.known_score,
            Role::Unknown => &mut self.unknown_score,
        }
    }
}

pub fn validate_player_id(player_id: PlayerId) -> Result<PlayerId> {
    if player_id.contains(RESERVED_ID_CHARS) {
        Err(MatchError::InvalidPlayerId(player_id))
    } else {
        Ok(player_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_value_for_either_role() {
        let mut scores = PlayerScores::new("P1").unwrap();

        scores.set_score("P1", 400);
        scores.set_score("P2", 900);

        assert_eq!(scores.score("P1"), 400);
        assert_eq!(scores.score("P2"), 900);
        assert_eq!(scores.known_score(), 400);
        assert_eq!(scores.unknown_score(), 900);
    }

    #[test]
    fn other_accessors_mirror_self_accessors() {
        let mut scores = PlayerScores::with_scores("P1", 100, 250).unwrap();

        assert_eq!(scores.other_score("P1"), 250);
        assert_eq!(scores.other_score("P2"), 100);

        scores.set_other_score("P2", 700);
        assert_eq!(scores.score("P1"), 700);
        assert_eq!(scores.score("P2"), 250);
    }

    #[test]
    fn other_setter_never_touches_own_slot() {
        let mut scores = PlayerScores::with_scores("P1", 100, 250).unwrap();

        scores.set_other_score("P1", 5);
        assert_eq!(scores.score("P1"), 100);

        scores.set_other_score("someone", 6);
        assert_eq!(scores.score("someone"), 250);
    }

    #[test]
    fn any_unknown_id_shares_the_unknown_slot() {
        let mut scores = PlayerScores::new("P1").unwrap();

        scores.set_score("P2", 30);

        assert_eq!(scores.score("P3"), 30);
        assert_eq!(scores.role_of("P3"), Role::Unknown);
        assert_eq!(scores.role_of("P1"), Role::Known);
    }

    #[test]
    fn ids_with_delimiters_are_rejected() {
        assert_eq!(
            PlayerScores::new("max"),
            Err(MatchError::InvalidPlayerId("max".into()))
        );
        assert!(PlayerScores::new("a;b").is_err());
        assert!(PlayerScores::new("").is_ok());
        assert!(PlayerScores::new("X1").is_ok());
    }
}
