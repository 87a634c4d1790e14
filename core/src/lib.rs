//! Turn exchange for a two-player block matching game: the match snapshot
//! codec, the role-based score store and the controller that scores clears,
//! refills the board and hands the turn to a tournament host.

pub use board::*;
pub use cell::*;
pub use codec::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use host::*;
pub use identity::*;
pub use replenish::*;
pub use schedule::*;
pub use scoring::*;
pub use snapshot::*;
pub use tournament::*;
pub use types::*;

mod board;
mod cell;
mod codec;
mod config;
mod controller;
mod error;
mod generator;
mod grid;
mod host;
mod identity;
mod replenish;
mod schedule;
mod scoring;
mod snapshot;
mod tournament;
mod types;
