use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    NoOutcome,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    NoOutcome,
    Win,
    Loss,
    Tie,
}

impl MatchOutcome {
    pub const fn is_final(self) -> bool {
        use MatchOutcome::*;
        match self {
            NoOutcome => false,
            Win => true,
            Loss => true,
            Tie => true,
        }
    }

    pub fn by_score(player_score: Score, opponent_score: Score) -> Self {
        use core::cmp::Ordering::*;
        match player_score.cmp(&opponent_score) {
            Greater => Self::Win,
            Less => Self::Loss,
            Equal => Self::Tie,
        }
    }
}

/// Everything handed to the host when a turn ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSubmission {
    /// Encoded [`MatchSnapshot`] for the next participant.
    pub game_data: String,
    pub display_score: String,
    pub player_score: Score,
    pub opponent_score: Score,
    pub round_outcome: RoundOutcome,
    pub match_outcome: MatchOutcome,
}

impl TurnSubmission {
    pub fn is_final(&self) -> bool {
        self.match_outcome.is_final()
    }
}

/// Matchmaking/relay service that carries snapshots between devices.
///
/// Submissions are fire-and-forget: retrying or resubmitting is up to the host.
pub trait TournamentHost {
    fn is_tournament_in_progress(&self) -> bool;

    /// Seed for generating the opening board of a fresh match.
    fn random_seed(&mut self) -> u64;

    fn complete_turn(&mut self, submission: TurnSubmission);

    /// Ends the match early without submitting a final score.
    fn notify_abort(&mut self);

    /// The player is done looking at a replayed turn.
    fn finish_review(&mut self);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_score_compares_from_player_side() {
        assert_eq!(MatchOutcome::by_score(900, 400), MatchOutcome::Win);
        assert_eq!(MatchOutcome::by_score(400, 900), MatchOutcome::Loss);
        assert_eq!(MatchOutcome::by_score(400, 400), MatchOutcome::Tie);
    }

    #[test]
    fn only_no_outcome_is_not_final() {
        assert!(!MatchOutcome::NoOutcome.is_final());
        assert!(MatchOutcome::Win.is_final());
        assert!(MatchOutcome::Tie.is_final());
    }
}
