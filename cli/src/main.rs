use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use blockbreaker_core::*;
use clap::{Parser, Subcommand};

mod play;
mod relay;
mod settings;

use play::SessionEnd;
use relay::FileRelay;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Two players taking turns on this terminal
    Local {
        /// Force a seed instead of random
        #[arg(short, long)]
        seed: Option<u64>,

        /// TOML file with match settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Take one turn of a relayed match and submit it
    Turn {
        /// JSON file shared by both players
        #[arg(short, long)]
        relay: PathBuf,

        #[arg(short, long)]
        player: String,

        #[arg(short, long)]
        difficulty: Option<u32>,

        /// TOML file with match settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show the latest state of a relayed match
    Review {
        #[arg(short, long)]
        relay: PathBuf,

        #[arg(short, long)]
        player: String,
    },
    /// Abort a relayed match
    Abandon {
        #[arg(short, long)]
        relay: PathBuf,
    },
    /// Decode a snapshot blob and print it
    Inspect { blob: String },
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    log::debug!("{:?}", args.command);

    match args.command {
        Command::Local { seed, config } => run_local(seed, config),
        Command::Turn {
            relay,
            player,
            difficulty,
            config,
        } => run_turn(relay, player, difficulty, config),
        Command::Review { relay, player } => run_review(relay, player),
        Command::Abandon { relay } => run_abandon(relay),
        Command::Inspect { blob } => run_inspect(&blob),
    }
}

/// Host for same-terminal play: there is no tournament, so handoffs and
/// aborts have nowhere to go.
struct NoHost;

impl TournamentHost for NoHost {
    fn is_tournament_in_progress(&self) -> bool {
        false
    }

    fn random_seed(&mut self) -> u64 {
        0
    }

    fn complete_turn(&mut self, _submission: TurnSubmission) {}

    fn notify_abort(&mut self) {}

    fn finish_review(&mut self) {}
}

fn run_local(seed: Option<u64>, config: Option<PathBuf>) -> Result<()> {
    let config = settings::load(config.as_deref())?;
    let seed = seed.unwrap_or_else(|| {
        use web_time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default()
    });
    log::info!("Local match with seed {}", seed);

    let cells = RandomBoardGenerator::new(seed).generate(config.board_size, config.block_types);
    let mut board = GridBoard::from_cells(cells);
    let mut controller = TurnController::local(&config, seed);
    let mut host = NoHost;

    let end = play::drive(
        &mut controller,
        &mut board,
        &mut host,
        &mut io::stdin().lock(),
        &mut io::stdout(),
    )?;
    match end {
        SessionEnd::Complete(final_score) => match final_score.winner() {
            Some(Seat::One) => println!("Player 1 wins!"),
            Some(Seat::Two) => println!("Player 2 wins!"),
            None => println!("It's a tie!"),
        },
        SessionEnd::Quit => {
            controller.abandon();
            abandon(&mut host);
        }
        SessionEnd::HandedOff => {}
    }
    Ok(())
}

fn run_turn(
    relay: PathBuf,
    player: String,
    difficulty: Option<u32>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = settings::load(config.as_deref())?;
    let mut relay = FileRelay::open(relay)?;
    let info = MatchInfo {
        player_id: player,
        difficulty,
        continue_data: relay.state().continue_data(),
    };

    let mut board = GridBoard::new((0, 0));
    let mut controller = begin_turn(&info, &mut relay, &mut board, &config)
        .with_context(|| format!("Could not start a turn from {}", relay.path().display()))?;

    let end = play::drive(
        &mut controller,
        &mut board,
        &mut relay,
        &mut io::stdin().lock(),
        &mut io::stdout(),
    )?;
    if end == SessionEnd::Quit {
        controller.abandon();
        abandon(&mut relay);
        println!("Match abandoned.");
    }
    relay.save()
}

fn run_review(relay: PathBuf, player: String) -> Result<()> {
    let mut relay = FileRelay::open(relay)?;
    let info = MatchInfo {
        player_id: player,
        difficulty: None,
        continue_data: relay.state().continue_data(),
    };

    let mut board = GridBoard::new((0, 0));
    let review = begin_review(&info, &relay, &mut board)?;
    println!("{}", play::render_grid(board.cells()));
    println!(
        "You: {}  Opponent: {}  turns left: {}{}",
        review.player_score(),
        review.opponent_score(),
        review.turns_left(),
        if relay.is_tournament_in_progress() {
            ""
        } else {
            "  (match over)"
        }
    );
    review.finish(&mut relay);
    relay.save()
}

fn run_abandon(relay: PathBuf) -> Result<()> {
    let mut relay = FileRelay::open(relay)?;
    if !relay.is_tournament_in_progress() {
        bail!("No match in progress in {}", relay.path().display());
    }
    abandon(&mut relay);
    relay.save()
}

fn run_inspect(blob: &str) -> Result<()> {
    let snapshot: MatchSnapshot = blob.parse().context("Could not decode snapshot")?;
    let (width, height) = snapshot.size();
    println!("{}", play::render_grid(snapshot.grid()));
    println!("grid:        {}x{}", width, height);
    println!("turns left:  {}", snapshot.turns_left);
    println!(
        "known:       {:?} with {}",
        snapshot.scores.known_player_id(),
        snapshot.scores.known_score()
    );
    println!("unknown:     {}", snapshot.scores.unknown_score());
    Ok(())
}
