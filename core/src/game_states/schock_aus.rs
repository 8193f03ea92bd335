use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::game_states::session::GameSession;
use crate::types::{Penalty, Phase, PlayerIndex};

/// The Schock-Aus dialog: everything recorded about the end of a round until
/// it is either submitted or cancelled.
///
/// Player references are roster positions taken when the event was opened.
/// They are resolved against whatever roster is passed to `submit`, so a
/// player removed in between shifts the reference onto a different player.
///
/// `durch_player` and `handaus` are recorded but don't affect scoring yet.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct SchockEvent {
    durch_player: Option<PlayerIndex>,
    verloren_player: Option<PlayerIndex>,
    handaus: bool,
    durchmarsch: bool,
    phase: Phase,
    /// Length of the roster at the time the event was opened, if known.
    #[serde(skip)]
    roster_len: Option<usize>,
}

impl SchockEvent {
    /// Open a fresh event against `session`'s current roster.
    pub fn open(session: &GameSession) -> Self {
        Self {
            roster_len: Some(session.players().len()),
            ..Self::default()
        }
    }

    pub fn durch_player(&self) -> Option<PlayerIndex> {
        self.durch_player
    }

    pub fn verloren_player(&self) -> Option<PlayerIndex> {
        self.verloren_player
    }

    pub fn handaus(&self) -> bool {
        self.handaus
    }

    pub fn durchmarsch(&self) -> bool {
        self.durchmarsch
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Change the phase. Ignored while a Durchmarsch is recorded, since a
    /// Durchmarsch always happens in the second half.
    #[must_use]
    pub fn set_phase(self, phase: Phase) -> Self {
        if self.durchmarsch {
            debug!("phase is locked during a Durchmarsch");
            return self;
        }
        Self { phase, ..self }
    }

    /// Flip the Durchmarsch flag. Turning it on forces the phase to the
    /// second half; turning it off again leaves the phase where it is.
    #[must_use]
    pub fn toggle_durchmarsch(self) -> Self {
        if self.durchmarsch {
            Self {
                durchmarsch: false,
                ..self
            }
        } else {
            Self {
                durchmarsch: true,
                phase: Phase::SecondHalf,
                ..self
            }
        }
    }

    #[must_use]
    pub fn toggle_handaus(self) -> Self {
        Self {
            handaus: !self.handaus,
            ..self
        }
    }

    /// Record who lost the round. Not checked against the roster until submit.
    #[must_use]
    pub fn set_verloren_player(self, player: Option<PlayerIndex>) -> Self {
        Self {
            verloren_player: player,
            ..self
        }
    }

    /// Record who ended the round with a Schock-Aus.
    #[must_use]
    pub fn set_durch_player(self, player: Option<PlayerIndex>) -> Self {
        Self {
            durch_player: player,
            ..self
        }
    }

    /// The scoring mutation this event would apply, if any.
    ///
    /// A loss counts in the final, or whenever it was a Durchmarsch; a
    /// Durchmarsch additionally counts on its own counter.
    pub fn penalty(&self) -> Option<(PlayerIndex, Penalty)> {
        let loser = self.verloren_player?;
        let penalty = Penalty {
            verloren: if self.phase == Phase::Final || self.durchmarsch {
                1
            } else {
                0
            },
            durchmarsch: if self.durchmarsch { 1 } else { 0 },
        };
        Some((loser, penalty))
    }

    /// Apply the event to `session`, returning the updated session. The event
    /// is consumed either way; unset or unknown players leave the session
    /// unchanged.
    #[must_use]
    pub fn submit(self, session: &GameSession) -> GameSession {
        if let Some(len) = self.roster_len {
            if len != session.players().len() {
                warn!(
                    "roster changed from {} to {} players while a Schock-Aus was open",
                    len,
                    session.players().len()
                );
            }
        }

        let (loser, penalty) = match self.penalty() {
            Some(p) => p,
            None => {
                debug!("Schock-Aus submitted without a losing player");
                return session.clone();
            }
        };
        if penalty.is_empty() {
            return session.clone();
        }

        match session.apply_penalty(loser, penalty) {
            Ok(updated) => updated,
            Err(e) => {
                debug!("ignoring Schock-Aus for player {}: {}", loser.0, e);
                session.clone()
            }
        }
    }

    /// Throw the event away without scoring it.
    #[must_use]
    pub fn cancel(self) -> Self {
        Self::default()
    }
}
