use serde::{Deserialize, Serialize};

use crate::*;

/// What the host tells us about the match when a turn or review starts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub player_id: PlayerId,
    pub difficulty: Option<u32>,
    /// Encoded snapshot from the previous turn, absent for a fresh match.
    pub continue_data: Option<String>,
}

impl MatchInfo {
    fn continuation(&self) -> Option<&str> {
        self.continue_data
            .as_deref()
            .filter(|data| !data.is_empty())
    }
}

fn decode_logged(data: &str) -> Result<MatchSnapshot> {
    decode(data).map_err(|err| {
        log::error!("Rejecting match data {:?}: {}", data, err);
        MatchError::from(err)
    })
}

/// Starts the local player's hosted turn: restores or generates the board
/// and builds the controller for it. Nothing on `board` changes on failure.
pub fn begin_turn<H, B>(
    info: &MatchInfo,
    host: &mut H,
    board: &mut B,
    config: &MatchConfig,
) -> Result<TurnController>
where
    H: TournamentHost + ?Sized,
    B: Board + ?Sized,
{
    if !host.is_tournament_in_progress() {
        return Err(StateIssue::NotInProgress.into());
    }
    let config = config.with_difficulty(info.difficulty).clamped();

    let snapshot = match info.continuation() {
        Some(data) => {
            let snapshot = decode_logged(data)?;
            if snapshot.is_terminal() {
                return Err(MatchError::MatchComplete);
            }
            if let Some((coords, color)) = snapshot.find_color_out_of_range(config.block_types) {
                log::error!(
                    "Snapshot color {} at {:?} is outside {} block types",
                    color,
                    coords,
                    config.block_types
                );
                return Err(StateIssue::ColorOutOfRange {
                    coords,
                    color,
                    block_types: config.block_types,
                }
                .into());
            }
            log::info!(
                "Resuming match for {:?} with {} turns left",
                info.player_id,
                snapshot.turns_left
            );
            snapshot
        }
        None => {
            let scores = PlayerScores::new(info.player_id.clone())?;
            let seed = host.random_seed();
            log::info!(
                "Starting fresh match for {:?} from seed {}",
                info.player_id,
                seed
            );
            let cells =
                RandomBoardGenerator::new(seed).generate(config.board_size, config.block_types);
            MatchSnapshot::new(cells, config.turns, scores)?
        }
    };

    let seed = host.random_seed();
    let controller =
        TurnController::from_snapshot(&config, &snapshot, info.player_id.clone(), seed)?;
    snapshot.apply_to_board(board);
    Ok(controller)
}

/// Read-only replay of the latest snapshot of a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewSession {
    player_id: PlayerId,
    snapshot: MatchSnapshot,
}

impl ReviewSession {
    pub fn snapshot(&self) -> &MatchSnapshot {
        &self.snapshot
    }

    pub fn player_score(&self) -> Score {
        self.snapshot.scores.score(&self.player_id)
    }

    pub fn opponent_score(&self) -> Score {
        self.snapshot.scores.other_score(&self.player_id)
    }

    pub fn turns_left(&self) -> i32 {
        self.snapshot.turns_left
    }

    pub fn input_enabled(&self) -> bool {
        false
    }

    /// Returns control to the host.
    pub fn finish<H: TournamentHost + ?Sized>(self, host: &mut H) {
        log::debug!("Review finished for {:?}", self.player_id);
        host.finish_review();
    }
}

/// Replays the latest snapshot. Reviewing a match that already ended is
/// allowed but logged, since the host normally only offers it mid-tournament.
pub fn begin_review<H, B>(info: &MatchInfo, host: &H, board: &mut B) -> Result<ReviewSession>
where
    H: TournamentHost + ?Sized,
    B: Board + ?Sized,
{
    if !host.is_tournament_in_progress() {
        log::error!("Reviewing match for {:?} outside a tournament", info.player_id);
    }
    let data = info
        .continuation()
        .ok_or(MatchError::InvalidTournamentState(StateIssue::MissingBoardData))?;
    let snapshot = decode_logged(data)?;
    snapshot.apply_to_board(board);
    log::info!(
        "Reviewing match for {:?}: {} turns left",
        info.player_id,
        snapshot.turns_left
    );

    Ok(ReviewSession {
        player_id: info.player_id.clone(),
        snapshot,
    })
}

/// Ends the match early. The host only hears about it when a tournament is
/// actually running; no score is submitted either way.
pub fn abandon<H: TournamentHost + ?Sized>(host: &mut H) {
    if host.is_tournament_in_progress() {
        log::info!("Notifying host of abandoned match");
        host.notify_abort();
    } else {
        log::debug!("Abandon outside a tournament, nothing to notify");
    }
}

/// Forwards handoffs produced by a tick to the host.
pub fn submit_events<H: TournamentHost + ?Sized>(host: &mut H, events: &[TurnEvent]) -> usize {
    let mut submitted = 0;
    for event in events {
        if let TurnEvent::HandedOff(submission) = event {
            host.complete_turn(submission.clone());
            submitted += 1;
        }
    }
    submitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingHost;

    fn config() -> MatchConfig {
        MatchConfig {
            turns: 6,
            board_size: (5, 4),
            ..MatchConfig::default()
        }
    }

    fn info(player_id: &str, continue_data: Option<&str>) -> MatchInfo {
        MatchInfo {
            player_id: player_id.into(),
            difficulty: None,
            continue_data: continue_data.map(Into::into),
        }
    }

    /// Plays one full hosted turn and returns what the host received.
    fn take_turn(
        host: &mut RecordingHost,
        info: &MatchInfo,
        board: &mut GridBoard,
    ) -> TurnSubmission {
        let mut controller = begin_turn(info, host, board, &config()).unwrap();
        let (width, height) = board.grid_size();
        let batch = (0..width)
            .flat_map(|x| (0..height).map(move |y| (x, y)))
            .find_map(|coords| board.tap(coords))
            .unwrap_or_else(|| {
                let coords = (0, 0);
                board.destroy_block(coords);
                board.collapse();
                ClearBatch::new(vec![coords], ClearReason::Scripted)
            });
        controller.on_clear(&batch, 0).unwrap();
        let events = controller.tick(10_000, board);
        assert_eq!(submit_events(host, &events), 1);
        host.submissions.last().cloned().unwrap()
    }

    #[test]
    fn requires_tournament_in_progress() {
        let mut host = RecordingHost::default();
        let mut board = GridBoard::new((0, 0));

        let result = begin_turn(&info("alice", None), &mut host, &mut board, &config());

        assert_eq!(
            result.err(),
            Some(MatchError::InvalidTournamentState(StateIssue::NotInProgress))
        );
    }

    #[test]
    fn fresh_match_makes_local_player_known_and_seeds_board() {
        let mut host = RecordingHost::active(77);
        let mut board = GridBoard::new((0, 0));

        let controller =
            begin_turn(&info("alice", Some("")), &mut host, &mut board, &config()).unwrap();

        let expected = RandomBoardGenerator::new(77).generate((5, 4), config().block_types);
        assert_eq!(board.cells(), &expected);
        assert_eq!(controller.turns_left(), 6);
        assert_eq!(controller.score(Seat::One), 0);
        assert_eq!(controller.score(Seat::Two), 0);
        assert!(matches!(
            controller.mode(),
            PlayMode::Hosted { scores, .. } if scores.known_player_id() == "alice"
        ));
    }

    #[test]
    fn turns_alternate_between_devices() {
        let mut host = RecordingHost::active(5);
        let mut alice_board = GridBoard::new((0, 0));
        let mut bob_board = GridBoard::new((0, 0));

        let first = take_turn(&mut host, &info("alice", None), &mut alice_board);
        assert_eq!(first.opponent_score, 0);

        let second = take_turn(
            &mut host,
            &info("bob", Some(&first.game_data)),
            &mut bob_board,
        );
        assert_eq!(second.opponent_score, first.player_score);

        let third = take_turn(
            &mut host,
            &info("alice", Some(&second.game_data)),
            &mut alice_board,
        );
        assert_eq!(third.opponent_score, second.player_score);
        assert!(third.player_score > first.player_score);

        let snapshot = decode(&third.game_data).unwrap();
        assert_eq!(snapshot.turns_left, 3);
        assert_eq!(snapshot.scores.known_player_id(), "alice");
        assert_eq!(snapshot.scores.known_score(), third.player_score);
        assert_eq!(snapshot.scores.unknown_score(), second.player_score);
        assert_eq!(host.submissions.len(), 3);
    }

    #[test]
    fn corrupt_data_builds_no_controller_and_leaves_board() {
        let mut host = RecordingHost::active(1);
        let mut board = GridBoard::new((2, 2));
        board.create_block((0.0, 0.0), (0, 0), 1);
        let before = board.clone();

        let result = begin_turn(&info("bob", Some("5xP1;100x0")), &mut host, &mut board, &config());

        assert_eq!(
            result.err(),
            Some(MatchError::Decode(DecodeError::FieldCount { found: 3 }))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn colors_beyond_block_types_are_rejected() {
        let mut host = RecordingHost::active(1);
        let mut board = GridBoard::new((0, 0));

        let match_info = info("bob", Some("5xP1;100x0x2x1x0;9"));
        let result = begin_turn(&match_info, &mut host, &mut board, &config());

        assert_eq!(
            result.err(),
            Some(MatchError::InvalidTournamentState(StateIssue::ColorOutOfRange {
                coords: (1, 0),
                color: 9,
                block_types: config().block_types,
            }))
        );
    }

    #[test]
    fn finished_match_takes_no_more_turns() {
        let mut host = RecordingHost::active(1);
        let mut board = GridBoard::new((0, 0));

        let match_info = info("bob", Some("0xP1;100x0x1x1x0"));
        let result = begin_turn(&match_info, &mut host, &mut board, &config());

        assert_eq!(result.err(), Some(MatchError::MatchComplete));
    }

    #[test]
    fn review_shows_scores_from_player_side() {
        let host = RecordingHost::active(1);
        let mut board = GridBoard::new((0, 0));

        let match_info = info("bob", Some("5xP1;100x40x2x1x-1;1"));
        let review = begin_review(&match_info, &host, &mut board).unwrap();

        assert_eq!(review.player_score(), 40);
        assert_eq!(review.opponent_score(), 100);
        assert_eq!(review.turns_left(), 5);
        assert!(!review.input_enabled());
        assert_eq!(board.block_color((0, 0)), GridCell::Empty);
        assert_eq!(board.block_color((1, 0)), GridCell::Block(1));

        let mut host = host;
        review.finish(&mut host);
        assert_eq!(host.reviews_finished, 1);
        assert!(host.submissions.is_empty());
    }

    #[test]
    fn review_after_the_tournament_still_works() {
        let mut host = RecordingHost::default();
        let mut board = GridBoard::new((0, 0));

        let match_info = info("alice", Some("0xalice;900x700x1x1x2"));
        let review = begin_review(&match_info, &host, &mut board).unwrap();

        assert_eq!(review.player_score(), 900);
        assert_eq!(review.turns_left(), 0);
        assert_eq!(board.block_color((0, 0)), GridCell::Block(2));
        review.finish(&mut host);
        assert_eq!(host.reviews_finished, 1);
    }

    #[test]
    fn zero_turn_config_starts_a_playable_match() {
        let mut host = RecordingHost::active(3);
        let mut board = GridBoard::new((0, 0));
        let cfg = MatchConfig {
            turns: 0,
            ..config()
        };

        let controller = begin_turn(&info("alice", None), &mut host, &mut board, &cfg).unwrap();

        assert_eq!(controller.turns_left(), 1);
        assert!(controller.input_enabled());
    }

    #[test]
    fn review_without_data_is_rejected() {
        let host = RecordingHost::active(1);
        let mut board = GridBoard::new((0, 0));

        for data in [None, Some("")] {
            assert_eq!(
                begin_review(&info("bob", data), &host, &mut board).err(),
                Some(MatchError::InvalidTournamentState(StateIssue::MissingBoardData))
            );
        }
    }

    #[test]
    fn abandon_notifies_only_active_tournaments() {
        let mut idle = RecordingHost::default();
        let mut active = RecordingHost::active(1);

        abandon(&mut idle);
        abandon(&mut active);

        assert_eq!(idle.aborts, 0);
        assert_eq!(active.aborts, 1);
        assert!(active.submissions.is_empty());
    }
}
