use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// One of the two players taking turns. On a hosted device the local player
/// always sits in [`Seat::One`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// Valid transitions:
/// - AwaitingInput -> Scoring
/// - Scoring -> Replenishing
/// - Replenishing -> Scoring (another clear before the handoff)
/// - Replenishing -> HandoffReady
/// - HandoffReady -> AwaitingInput
/// - HandoffReady -> MatchComplete
/// - any non-final -> Abandoned
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    AwaitingInput,
    Scoring,
    Replenishing,
    HandoffReady,
    MatchComplete,
    Abandoned,
}

impl TurnPhase {
    pub const fn is_final(self) -> bool {
        use TurnPhase::*;
        match self {
            AwaitingInput => false,
            Scoring => false,
            Replenishing => false,
            HandoffReady => false,
            MatchComplete => true,
            Abandoned => true,
        }
    }
}

impl Default for TurnPhase {
    fn default() -> Self {
        Self::AwaitingInput
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayMode {
    /// Both players share this device.
    Local,
    /// The local player takes one turn and hands the match to a tournament host.
    Hosted {
        local_player_id: PlayerId,
        scores: PlayerScores,
    },
}

impl PlayMode {
    pub const fn is_hosted(&self) -> bool {
        matches!(self, Self::Hosted { .. })
    }
}

/// Per-turn state, rebuilt from a snapshot (or defaults) whenever a turn starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnSession {
    pub current: Seat,
    pub turns_left: i32,
    pub input_disabled: bool,
    /// Input stays disabled at least until this time.
    pub input_disabled_until: Millis,
    pub turn_taken: bool,
    pub scores: [Score; 2],
    pub pacing_delay_ms: Millis,
    pub replenish_delay_ms: Millis,
    pub scoring: ScoreRule,
    pub block_types: ColorId,
    pub outcome_policy: OutcomePolicy,
}

impl TurnSession {
    pub fn new(config: &MatchConfig, turns_left: i32, scores: [Score; 2]) -> Self {
        let config = config.clamped();
        Self {
            current: Seat::One,
            turns_left,
            input_disabled: false,
            input_disabled_until: 0,
            turn_taken: false,
            scores,
            pacing_delay_ms: config.pacing_delay_ms,
            replenish_delay_ms: config.replenish_delay_ms,
            scoring: config.scoring,
            block_types: config.block_types,
            outcome_policy: config.outcome_policy,
        }
    }

    pub fn score(&self, seat: Seat) -> Score {
        self.scores[seat.index()]
    }

    pub fn final_score(&self) -> FinalScore {
        FinalScore {
            seat_one: self.score(Seat::One),
            seat_two: self.score(Seat::Two),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub seat_one: Score,
    pub seat_two: Score,
}

impl FinalScore {
    /// `None` on a tie.
    pub fn winner(&self) -> Option<Seat> {
        use core::cmp::Ordering::*;
        match self.seat_one.cmp(&self.seat_two) {
            Greater => Some(Seat::One),
            Less => Some(Seat::Two),
            Equal => None,
        }
    }
}

/// One step of handling a clear batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurnCommand {
    AwardScore { seat: Seat, points: Score },
    PauseInput { until: Millis },
    ScheduleReplenish { due_at: Millis, order: ReplenishOrder },
    FlipTurn,
}

/// Commands for one clear batch, in the order they must run: scoring comes
/// before the refill is scheduled, and the turn flips last.
pub fn plan_clear(session: &TurnSession, batch: &ClearBatch, now: Millis) -> Vec<TurnCommand> {
    let cleared = CellCount::try_from(batch.len()).unwrap_or(CellCount::MAX);
    vec![
        TurnCommand::AwardScore {
            seat: session.current,
            points: session.scoring.clear_score(cleared),
        },
        TurnCommand::PauseInput {
            until: now.saturating_add(session.pacing_delay_ms),
        },
        TurnCommand::ScheduleReplenish {
            due_at: now.saturating_add(session.replenish_delay_ms),
            order: ReplenishOrder::from_batch(batch),
        },
        TurnCommand::FlipTurn,
    ]
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
enum Deferred {
    ResumeInput,
    Replenish(ReplenishOrder),
}

/// Something the caller should react to after a tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    InputResumed,
    Replenished { created: CellCount },
    /// Hosted only: submit this to the tournament host.
    HandedOff(TurnSubmission),
    MatchComplete(FinalScore),
}

/// Drives scoring, refills and handoff for one match on one device.
#[derive(Clone, Debug)]
pub struct TurnController {
    session: TurnSession,
    mode: PlayMode,
    phase: TurnPhase,
    handed_off: bool,
    scheduler: Scheduler<Deferred>,
    rng: SmallRng,
}

impl TurnController {
    fn new(session: TurnSession, mode: PlayMode, seed: u64) -> Self {
        use rand::prelude::*;

        Self {
            session,
            mode,
            phase: Default::default(),
            handed_off: false,
            scheduler: Scheduler::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Same-device game for two players, both starting at zero.
    pub fn local(config: &MatchConfig, seed: u64) -> Self {
        let turns = config.clamped().turns;
        log::info!("Starting local match with {} turns", turns);
        let session = TurnSession::new(config, turns, [0, 0]);
        Self::new(session, PlayMode::Local, seed)
    }

    /// A hosted turn for `local_player_id`, whose score is resolved through
    /// the role-based `scores`.
    pub fn hosted(
        config: &MatchConfig,
        local_player_id: impl Into<PlayerId>,
        scores: PlayerScores,
        turns_left: i32,
        seed: u64,
    ) -> Result<Self> {
        let local_player_id = validate_player_id(local_player_id.into())?;
        let seat_scores = [
            scores.score(&local_player_id),
            scores.other_score(&local_player_id),
        ];
        log::info!(
            "Starting hosted turn for {:?} ({:?} role), {} turns left",
            local_player_id,
            scores.role_of(&local_player_id),
            turns_left
        );
        let session = TurnSession::new(config, turns_left, seat_scores);
        let mode = PlayMode::Hosted {
            local_player_id,
            scores,
        };
        Ok(Self::new(session, mode, seed))
    }

    /// Resumes a hosted match from the opponent's snapshot.
    pub fn from_snapshot(
        config: &MatchConfig,
        snapshot: &MatchSnapshot,
        local_player_id: impl Into<PlayerId>,
        seed: u64,
    ) -> Result<Self> {
        Self::hosted(
            config,
            local_player_id,
            snapshot.scores.clone(),
            snapshot.turns_left,
            seed,
        )
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn session(&self) -> &TurnSession {
        &self.session
    }

    pub fn mode(&self) -> &PlayMode {
        &self.mode
    }

    pub fn current_seat(&self) -> Seat {
        self.session.current
    }

    pub fn turns_left(&self) -> i32 {
        self.session.turns_left
    }

    pub fn score(&self, seat: Seat) -> Score {
        self.session.score(seat)
    }

    pub fn input_enabled(&self) -> bool {
        !self.session.input_disabled && !self.awaiting_handoff() && !self.phase.is_final()
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_final()
    }

    pub fn pending_replenishments(&self) -> usize {
        self.scheduler
            .count_matching(|task| matches!(task, Deferred::Replenish(_)))
    }

    /// When the next deferred action becomes due.
    pub fn next_wakeup(&self) -> Option<Millis> {
        self.scheduler.next_due()
    }

    /// Scores a clear batch and queues its refill. Returns the points
    /// awarded, or `None` for an empty batch.
    ///
    /// Clears are refused while input is paused, and on a hosted device once
    /// its single clear is waiting to be handed off.
    pub fn on_clear(&mut self, batch: &ClearBatch, now: Millis) -> Result<Option<Score>> {
        self.check_accepting_clears()?;
        if batch.is_empty() {
            return Ok(None);
        }
        log::debug!(
            "{:?} cleared {} blocks ({:?})",
            self.session.current,
            batch.len(),
            batch.reason
        );

        self.transition(TurnPhase::Scoring);
        let mut awarded = 0;
        for command in plan_clear(&self.session, batch, now) {
            if let TurnCommand::AwardScore { points, .. } = command {
                awarded = points;
            }
            self.apply(command);
        }
        self.transition(TurnPhase::Replenishing);

        Ok(Some(awarded))
    }

    pub fn apply(&mut self, command: TurnCommand) {
        match command {
            TurnCommand::AwardScore { seat, points } => {
                let score = &mut self.session.scores[seat.index()];
                *score = score.saturating_add(points);
                log::debug!("{:?} scores {} (total {})", seat, points, score);
            }
            TurnCommand::PauseInput { until } => {
                self.session.input_disabled = true;
                self.session.input_disabled_until = self.session.input_disabled_until.max(until);
                self.scheduler.schedule(until, Deferred::ResumeInput);
            }
            TurnCommand::ScheduleReplenish { due_at, order } => {
                self.scheduler.schedule(due_at, Deferred::Replenish(order));
            }
            TurnCommand::FlipTurn => {
                self.session.current = self.session.current.other();
                self.session.turns_left -= 1;
                self.session.turn_taken = true;
                log::debug!(
                    "Turn passes to {:?}, {} turns left",
                    self.session.current,
                    self.session.turns_left
                );
            }
        }
    }

    /// Runs deferred actions that are due and advances the phase.
    pub fn tick<B: Board + ?Sized>(&mut self, now: Millis, board: &mut B) -> Vec<TurnEvent> {
        let mut events = Vec::new();

        for task in self.scheduler.take_due(now) {
            match task {
                Deferred::ResumeInput => {
                    if self.session.input_disabled
                        && !self.handed_off
                        && now >= self.session.input_disabled_until
                    {
                        self.session.input_disabled = false;
                        events.push(TurnEvent::InputResumed);
                    }
                }
                Deferred::Replenish(order) => {
                    let created = order.apply(board, &mut self.rng, self.session.block_types);
                    events.push(TurnEvent::Replenished { created });
                }
            }
        }

        // pending timers above still run after an abandon, nothing else does
        if self.phase == TurnPhase::Abandoned {
            return events;
        }

        if self.phase == TurnPhase::Replenishing
            && self.session.turn_taken
            && !self.session.input_disabled
            && self.pending_replenishments() == 0
        {
            self.transition(TurnPhase::HandoffReady);
        }

        if self.phase == TurnPhase::HandoffReady {
            self.hand_off(board, &mut events);
        }

        events
    }

    /// Stops the match for the UI. Deferred refills already queued still run
    /// on later ticks.
    pub fn abandon(&mut self) {
        if !self.phase.is_final() {
            log::info!("Match abandoned with {} turns left", self.session.turns_left);
            self.transition(TurnPhase::Abandoned);
        }
    }

    /// Snapshot of the match as it would be handed off right now.
    pub fn snapshot<B: Board + ?Sized>(&self, board: &B) -> MatchSnapshot {
        let scores = match &self.mode {
            PlayMode::Hosted {
                local_player_id,
                scores,
            } => {
                let mut scores = scores.clone();
                scores.set_score(local_player_id, self.session.score(Seat::One));
                scores.set_other_score(local_player_id, self.session.score(Seat::Two));
                scores
            }
            PlayMode::Local => PlayerScores::new_unchecked(
                String::new(),
                self.session.score(Seat::One),
                self.session.score(Seat::Two),
            ),
        };
        MatchSnapshot::from_board(board, self.session.turns_left, scores)
    }

    fn hand_off<B: Board + ?Sized>(&mut self, board: &B, events: &mut Vec<TurnEvent>) {
        self.session.turn_taken = false;
        let match_over = self.session.turns_left <= 0;

        if self.mode.is_hosted() {
            let submission = self.submission(board, match_over);
            log::info!(
                "Handing off turn: {} - {}, outcome {:?}",
                submission.player_score,
                submission.opponent_score,
                submission.match_outcome
            );
            self.session.input_disabled = true;
            self.handed_off = true;
            events.push(TurnEvent::HandedOff(submission));
        }

        if match_over {
            let final_score = self.session.final_score();
            log::info!(
                "Match complete: {} - {}",
                final_score.seat_one,
                final_score.seat_two
            );
            self.transition(TurnPhase::MatchComplete);
            events.push(TurnEvent::MatchComplete(final_score));
        } else {
            self.transition(TurnPhase::AwaitingInput);
        }
    }

    fn submission<B: Board + ?Sized>(&self, board: &B, match_over: bool) -> TurnSubmission {
        let player_score = self.session.score(Seat::One);
        let opponent_score = self.session.score(Seat::Two);
        let match_outcome = match (match_over, self.session.outcome_policy) {
            (false, _) => MatchOutcome::NoOutcome,
            (true, OutcomePolicy::HostAdjudicated) => MatchOutcome::Win,
            (true, OutcomePolicy::ByScore) => MatchOutcome::by_score(player_score, opponent_score),
        };

        TurnSubmission {
            game_data: self.snapshot(board).to_string(),
            display_score: player_score.to_string(),
            player_score,
            opponent_score,
            round_outcome: RoundOutcome::NoOutcome,
            match_outcome,
        }
    }

    fn check_accepting_clears(&self) -> Result<()> {
        match self.phase {
            TurnPhase::MatchComplete => Err(MatchError::MatchComplete),
            TurnPhase::Abandoned => Err(MatchError::Abandoned),
            _ if self.handed_off => Err(MatchError::TurnHandedOff),
            _ if self.awaiting_handoff() => Err(MatchError::TurnAlreadyTaken),
            _ if self.session.input_disabled => Err(MatchError::InputDisabled),
            _ => Ok(()),
        }
    }

    /// A hosted device plays exactly one clear per handoff.
    fn awaiting_handoff(&self) -> bool {
        self.mode.is_hosted() && self.session.turn_taken
    }

    fn transition(&mut self, next: TurnPhase) {
        if self.phase != next {
            log::debug!("Turn phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }
}
