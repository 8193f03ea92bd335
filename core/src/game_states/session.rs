use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::types::{Factor, Penalty, Player, PlayerError, PlayerIndex, Players};

/// The question asked before a session is wiped.
pub const RESET_PROMPT: &str = "Neue Runde starten? Alle Daten werden zurückgesetzt!";

/// A yes/no answer from whoever is using the scoreboard. `None` means the
/// question was dismissed without an answer.
pub trait Confirmation {
    fn confirm(&mut self, prompt: &str) -> Option<bool>;
}

impl<F> Confirmation for F
where
    F: FnMut(&str) -> Option<bool>,
{
    fn confirm(&mut self, prompt: &str) -> Option<bool> {
        self(prompt)
    }
}

/// The live scoring state: the roster plus the stake each point is worth.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameSession {
    #[serde(default)]
    players: Players,
    #[serde(default)]
    factor: Factor,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(players: Players, factor: Factor) -> Self {
        Self { players, factor }
    }

    pub fn players(&self) -> &'_ Players {
        &self.players
    }

    pub fn factor(&self) -> Factor {
        self.factor
    }

    #[must_use]
    pub fn add_player(&self, name: &str) -> Self {
        Self {
            players: self.players.add_player(name),
            factor: self.factor,
        }
    }

    pub fn remove_player(&self, index: PlayerIndex) -> Result<Self, PlayerError> {
        Ok(Self {
            players: self.players.remove_player(index)?,
            factor: self.factor,
        })
    }

    /// Replace the stake. The value is stored verbatim, without validation.
    #[must_use]
    pub fn set_factor(&self, factor: Factor) -> Self {
        Self {
            players: self.players.clone(),
            factor,
        }
    }

    pub fn apply_penalty(&self, index: PlayerIndex, penalty: Penalty) -> Result<Self, PlayerError> {
        Ok(Self {
            players: self.players.apply_penalty(index, penalty)?,
            factor: self.factor,
        })
    }

    /// `(verloren + durchmarsch) * factor`, with exactly two decimals.
    pub fn compute_total(&self, player: &Player) -> String {
        self.factor.total(player.points())
    }

    /// Every player alongside their formatted total, in roster order.
    pub fn standings(&self) -> impl Iterator<Item = (&'_ Player, String)> + '_ {
        self.players
            .players()
            .iter()
            .map(move |p| (p, self.compute_total(p)))
    }

    /// Ask for confirmation and, only on an explicit yes, return an empty
    /// session with the default stake. Any other answer returns `None` and
    /// the caller keeps its current session.
    pub fn reset<C: Confirmation + ?Sized>(&self, confirmation: &mut C) -> Option<Self> {
        match confirmation.confirm(RESET_PROMPT) {
            Some(true) => {
                info!("resetting session with {} players", self.players.len());
                Some(Self::default())
            }
            answer => {
                debug!("reset not confirmed ({:?})", answer);
                None
            }
        }
    }
}
