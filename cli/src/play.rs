use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use blockbreaker_core::*;
use ndarray::Array2;
use web_time::Instant;

/// Milliseconds since the driver started.
#[derive(Debug)]
pub(crate) struct Clock {
    start: Instant,
}

impl Clock {
    pub(crate) fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub(crate) fn now(&self) -> Millis {
        self.start.elapsed().as_millis().try_into().unwrap_or(Millis::MAX)
    }

    fn sleep_until(&self, due_at: Millis) {
        let now = self.now();
        if due_at > now {
            std::thread::sleep(Duration::from_millis(due_at - now));
        }
    }
}

/// Draws the grid top row first, `.` for empty cells.
pub(crate) fn render_grid(cells: &Array2<GridCell>) -> String {
    let (width, height) = cells.dim();
    let mut out = String::new();
    for y in (0..height).rev() {
        let _ = write!(out, "{:>3} ", y);
        for x in 0..width {
            match cells[[x, y]] {
                GridCell::Empty => out.push_str(" ."),
                GridCell::Block(color) => {
                    let _ = write!(out, " {}", color);
                }
            }
        }
        out.push('\n');
    }
    out.push_str("    ");
    for x in 0..width {
        let _ = write!(out, " {}", x % 10);
    }
    out.push('\n');
    out
}

fn seat_name(seat: Seat, hosted: bool) -> &'static str {
    match (seat, hosted) {
        (Seat::One, true) => "You",
        (Seat::Two, true) => "Opponent",
        (Seat::One, false) => "Player 1",
        (Seat::Two, false) => "Player 2",
    }
}

pub(crate) fn render_status(controller: &TurnController) -> String {
    let hosted = controller.mode().is_hosted();
    format!(
        "{}: {}  {}: {}  turns left: {}  now playing: {}",
        seat_name(Seat::One, hosted),
        controller.score(Seat::One),
        seat_name(Seat::Two, hosted),
        controller.score(Seat::Two),
        controller.turns_left(),
        seat_name(controller.current_seat(), hosted),
    )
}

enum Command {
    Tap(Coord2),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if matches!(line, "q" | "quit") {
        return Some(Command::Quit);
    }
    let mut parts = line.split_whitespace().map(str::parse::<Coord>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y)), None) => Some(Command::Tap((x, y))),
        _ => None,
    }
}

/// Clears the region under `coords`. With no match left anywhere the lone
/// block is removed instead so the game can go on.
fn clear_at(board: &mut GridBoard, coords: Coord2) -> Option<ClearBatch> {
    if board.has_match() {
        return board.tap(coords);
    }
    if !board.is_occupied(coords) {
        return None;
    }
    log::info!("No matches left, removing single block at {:?}", coords);
    board.destroy_block(coords);
    board.collapse();
    Some(ClearBatch::new(vec![coords], ClearReason::Scripted))
}

/// How a driven session ended.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SessionEnd {
    HandedOff,
    Complete(FinalScore),
    Quit,
}

/// Runs the controller against terminal input until the turn is handed off,
/// the match ends or the player quits. Handoffs are forwarded to `host`.
pub(crate) fn drive<H, R, W>(
    controller: &mut TurnController,
    board: &mut GridBoard,
    host: &mut H,
    input: &mut R,
    out: &mut W,
) -> Result<SessionEnd>
where
    H: TournamentHost + ?Sized,
    R: BufRead,
    W: Write,
{
    let clock = Clock::new();
    let mut needs_prompt = true;

    loop {
        let events = controller.tick(clock.now(), board);
        let handed_off = submit_events(host, &events) > 0;
        for event in &events {
            match event {
                TurnEvent::Replenished { created } if *created > 0 => needs_prompt = true,
                TurnEvent::InputResumed => needs_prompt = true,
                TurnEvent::MatchComplete(final_score) => {
                    writeln!(out, "{}", render_grid(board.cells()))?;
                    writeln!(out, "Match over! {}", render_status(controller))?;
                    return Ok(SessionEnd::Complete(*final_score));
                }
                _ => {}
            }
        }
        if handed_off {
            writeln!(out, "{}", render_grid(board.cells()))?;
            writeln!(out, "Turn submitted. {}", render_status(controller))?;
            return Ok(SessionEnd::HandedOff);
        }

        if !controller.input_enabled() {
            match controller.next_wakeup() {
                Some(due_at) => clock.sleep_until(due_at),
                None => return Ok(SessionEnd::Quit),
            }
            continue;
        }

        if needs_prompt {
            writeln!(out, "{}", render_grid(board.cells()))?;
            writeln!(out, "{}", render_status(controller))?;
            needs_prompt = false;
        }
        write!(out, "tap x y (q to quit)> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(SessionEnd::Quit);
        }
        match parse_command(&line) {
            Some(Command::Quit) => return Ok(SessionEnd::Quit),
            Some(Command::Tap(coords)) => match clear_at(board, coords) {
                Some(batch) => {
                    if let Some(points) = controller.on_clear(&batch, clock.now())? {
                        writeln!(out, "+{} points", points)?;
                    }
                }
                None => writeln!(out, "Nothing to clear at {:?}", coords)?,
            },
            None => writeln!(out, "Expected two numbers, like `3 0`")?,
        }
    }
}
