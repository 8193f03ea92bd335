use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Penalty, Player, PlayerIndex};

/// The roster of players, in the order they were added.
///
/// Insertion order is the only stable reference to a player: there is no
/// separate ID, and duplicate names are allowed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct Players {
    players: Vec<Player>,
}

impl Players {
    pub fn new() -> Self {
        Self { players: vec![] }
    }

    /// Get all of the players, in roster order.
    pub fn players(&self) -> &'_ [Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Get the player at `index`. Returns `PlayerDoesntExist` if the index is
    /// past the end of the roster.
    pub fn player(&self, index: PlayerIndex) -> Result<&'_ Player, PlayerError> {
        self.players
            .get(index.0)
            .ok_or(PlayerError::PlayerDoesntExist)
    }

    /// Add a player to the end of the roster. The name is trimmed first; a
    /// blank name leaves the roster unchanged.
    #[must_use]
    pub fn add_player(&self, name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() {
            debug!("ignoring blank player name");
            return self.clone();
        }
        let mut self_ = self.clone();
        self_.players.push(Player::new(name.to_string()));
        self_
    }

    /// Remove the player at `index`. Every later player moves down by one
    /// position, which invalidates any index taken before the removal.
    pub fn remove_player(&self, index: PlayerIndex) -> Result<Self, PlayerError> {
        if index.0 >= self.players.len() {
            return Err(PlayerError::PlayerDoesntExist);
        }
        let mut self_ = self.clone();
        self_.players.remove(index.0);
        Ok(self_)
    }

    /// Add `penalty` to the counters of the player at `index`.
    pub fn apply_penalty(&self, index: PlayerIndex, penalty: Penalty) -> Result<Self, PlayerError> {
        let updated = self.player(index)?.apply(penalty);
        let mut self_ = self.clone();
        self_.players[index.0] = updated;
        Ok(self_)
    }
}

#[derive(Error, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum PlayerError {
    #[error("Player does not exist")]
    PlayerDoesntExist,
}
