//! The scoring state of a session and the transient Schock-Aus event which
//! mutates it.

pub mod schock_aus;
pub mod session;

pub use schock_aus::SchockEvent;
pub use session::{Confirmation, GameSession, RESET_PROMPT};
