//! Scoring for a shared-device game of Schocken: a roster of players, penalty
//! counters from each Schock-Aus, a per-point stake, and persisted sessions.

pub mod config;
pub mod export;
pub mod game_states;
pub mod persistence;
pub mod scoreboard;
pub mod types;

pub use config::Config;
pub use game_states::{Confirmation, GameSession, SchockEvent};
pub use persistence::{PersistenceError, PersistenceGateway, SavedGame, Store};
pub use scoreboard::Scoreboard;
pub use types::{Factor, Phase, Player, PlayerIndex, Players};
