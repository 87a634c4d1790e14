use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blockbreaker_core::{TournamentHost, TurnSubmission};
use serde::{Deserialize, Serialize};

/// Everything the relay file stores about one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RelayState {
    pub seed: u64,
    pub in_progress: bool,
    pub aborted: bool,
    pub reviews_finished: usize,
    /// Oldest first.
    pub submissions: Vec<TurnSubmission>,
}

impl RelayState {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            seed,
            in_progress: true,
            aborted: false,
            reviews_finished: 0,
            submissions: Vec::new(),
        }
    }

    /// Game data the next turn continues from.
    pub(crate) fn continue_data(&self) -> Option<String> {
        self.submissions.last().map(|last| last.game_data.clone())
    }
}

/// Store-and-forward tournament host backed by a JSON file, so two players can
/// pass a match back and forth by sharing the file.
#[derive(Debug)]
pub(crate) struct FileRelay {
    path: PathBuf,
    state: RelayState,
}

impl FileRelay {
    /// Opens the relay at `path`, starting a new match when the file does not exist.
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .with_context(|| format!("Corrupt relay file {}", path.display()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let seed = fresh_seed();
                log::info!("Starting new match in {} with seed {}", path.display(), seed);
                RelayState::new(seed)
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Could not read relay file {}", path.display()));
            }
        };
        Ok(Self { path, state })
    }

    pub(crate) fn state(&self) -> &RelayState {
        &self.state
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn save(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.path, text)
            .with_context(|| format!("Could not write relay file {}", self.path.display()))?;
        log::debug!("Saved relay to {}", self.path.display());
        Ok(())
    }
}

fn fresh_seed() -> u64 {
    use web_time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

impl TournamentHost for FileRelay {
    fn is_tournament_in_progress(&self) -> bool {
        self.state.in_progress
    }

    fn random_seed(&mut self) -> u64 {
        self.state.seed
    }

    fn complete_turn(&mut self, submission: TurnSubmission) {
        if submission.is_final() {
            log::info!("Final turn received: {:?}", submission.match_outcome);
            self.state.in_progress = false;
        }
        self.state.submissions.push(submission);
    }

    fn notify_abort(&mut self) {
        self.state.in_progress = false;
        self.state.aborted = true;
    }

    fn finish_review(&mut self) {
        self.state.reviews_finished += 1;
    }
}
