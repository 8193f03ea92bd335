//! Reading and writing the current session and the list of named snapshots.

use std::convert::TryFrom;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::game_states::GameSession;
use crate::types::{Factor, Players};

mod clock;
mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use store::{FileStore, MemoryStore, Store, StoreError};

/// A named copy of a session, as it was when it was saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedGame {
    pub id: u64,
    pub name: String,
    pub players: Players,
    pub factor: Factor,
    pub date: String,
}

impl SavedGame {
    pub fn session(&self) -> GameSession {
        GameSession::from_parts(self.players.clone(), self.factor)
    }
}

/// Persists sessions into a `Store` under the keys named in `Config`.
pub struct PersistenceGateway<S, C = SystemClock> {
    store: S,
    clock: C,
    config: Config,
}

impl<S: Store> PersistenceGateway<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock, Config::default())
    }
}

impl<S: Store, C: Clock> PersistenceGateway<S, C> {
    pub fn with_clock(store: S, clock: C, config: Config) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &'_ Config {
        &self.config
    }

    pub fn clock(&self) -> &'_ C {
        &self.clock
    }

    pub fn store(&self) -> &'_ S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Load the current session. Missing, unreadable or unparsable data all
    /// produce the default session.
    pub fn load_current_session(&self) -> GameSession {
        let key = &self.config.current_session_key;
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return GameSession::default(),
            Err(e) => {
                warn!("couldn't read {}: {}", key, e);
                return GameSession::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(e) => {
                warn!("discarding unparsable {}: {}", key, e);
                GameSession::default()
            }
        }
    }

    /// Overwrite the current session.
    pub fn save_current_session(&mut self, session: &GameSession) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(session)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        self.store.set(&self.config.current_session_key, &raw)?;
        Ok(())
    }

    /// Forget the current session entirely.
    pub fn clear_current_session(&mut self) -> Result<(), PersistenceError> {
        self.store.remove(&self.config.current_session_key)?;
        Ok(())
    }

    /// All snapshots, oldest first. Missing or unparsable data is treated as
    /// an empty list.
    pub fn list_saved_games(&self) -> Result<Vec<SavedGame>, PersistenceError> {
        Ok(self.read_saved_games()?.unwrap_or_default())
    }

    fn read_saved_games(&self) -> Result<Option<Vec<SavedGame>>, PersistenceError> {
        let key = &self.config.saved_games_key;
        match self.store.get(key)? {
            None => Ok(Some(vec![])),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(games) => Ok(Some(games)),
                Err(e) => {
                    warn!("unparsable {}: {}", key, e);
                    Ok(None)
                }
            },
        }
    }

    /// Append a snapshot of `session` under `name`. A blank name saves
    /// nothing and returns `None`.
    pub fn save_named_game(
        &mut self,
        name: &str,
        session: &GameSession,
    ) -> Result<Option<SavedGame>, PersistenceError> {
        if name.trim().is_empty() {
            debug!("not saving a game without a name");
            return Ok(None);
        }
        let key = &self.config.saved_games_key;
        let mut games = self
            .read_saved_games()?
            .ok_or_else(|| PersistenceError::CorruptSavedGames(key.clone()))?;

        let now = self.clock.now();
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = match games.iter().map(|g| g.id).max() {
            Some(last) if last >= millis => match last.checked_add(1) {
                Some(next) => next,
                None => return Err(PersistenceError::SavedGameIdsExhausted),
            },
            _ => millis,
        };
        let game = SavedGame {
            id,
            name: name.to_string(),
            players: session.players().clone(),
            factor: session.factor(),
            date: now.format(&self.config.date_format).to_string(),
        };
        games.push(game.clone());

        let raw = serde_json::to_string(&games)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        self.store.set(key, &raw)?;
        info!("saved game {:?} as {}", game.name, game.id);
        Ok(Some(game))
    }

    /// Look up the snapshot with `id` and return the session it holds.
    /// Returns `None` if no such snapshot exists.
    pub fn load_named_game(&self, id: u64) -> Result<Option<GameSession>, PersistenceError> {
        match self.list_saved_games()?.into_iter().find(|g| g.id == id) {
            Some(game) => {
                info!("loading saved game {:?} ({})", game.name, game.id);
                Ok(Some(game.session()))
            }
            None => {
                debug!("no saved game with id {}", id);
                Ok(None)
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Saved games under {0} are unreadable; refusing to overwrite them")]
    CorruptSavedGames(String),
    #[error("No saved game id left after the highest stored one")]
    SavedGameIdsExhausted,
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::{FixedClock, MemoryStore, PersistenceError, PersistenceGateway, Store, StoreError};
    use crate::config::Config;
    use crate::game_states::GameSession;
    use crate::types::{Factor, Penalty, PlayerIndex};

    fn gateway(store: MemoryStore) -> PersistenceGateway<MemoryStore, FixedClock> {
        let clock = FixedClock(Local.timestamp_millis_opt(1_700_000_000_000).unwrap());
        PersistenceGateway::with_clock(store, clock, Config::default())
    }

    fn session() -> GameSession {
        GameSession::new()
            .add_player("A")
            .add_player("B")
            .set_factor(Factor::new(0.5))
    }

    #[test]
    pub fn test_load_missing_session() {
        let g = gateway(MemoryStore::new());
        assert_eq!(g.load_current_session(), GameSession::new());
    }

    #[test]
    pub fn test_load_unparsable_session() {
        let mut store = MemoryStore::new();
        store.set("schocken_game", "{not json").unwrap();
        assert_eq!(gateway(store).load_current_session(), GameSession::new());

        let mut store = MemoryStore::new();
        store.set("schocken_game", "{}").unwrap();
        assert_eq!(gateway(store).load_current_session(), GameSession::new());
    }

    #[test]
    pub fn test_load_from_unavailable_store() {
        let g = gateway(MemoryStore::unavailable());
        assert_eq!(g.load_current_session(), GameSession::new());
    }

    #[test]
    pub fn test_save_and_load_current_session() {
        let mut g = gateway(MemoryStore::new());
        g.save_current_session(&session()).unwrap();
        assert_eq!(g.load_current_session(), session());

        g.clear_current_session().unwrap();
        assert_eq!(g.store().get("schocken_game").unwrap(), None);
        assert_eq!(g.load_current_session(), GameSession::new());
    }

    #[test]
    pub fn test_nan_factor_loads_as_default() {
        let mut g = gateway(MemoryStore::new());
        let s = session().set_factor(Factor::parse_input("x"));
        g.save_current_session(&s).unwrap();
        assert_eq!(g.load_current_session().factor(), Factor::DEFAULT);
        assert_eq!(g.load_current_session().players(), session().players());
    }

    #[test]
    pub fn test_save_errors_are_typed() {
        let mut g = gateway(MemoryStore::with_quota(16));
        assert!(matches!(
            g.save_current_session(&session()).unwrap_err(),
            PersistenceError::Store(StoreError::QuotaExceeded { .. })
        ));

        let mut g = gateway(MemoryStore::unavailable());
        assert_eq!(
            g.save_current_session(&session()).unwrap_err(),
            PersistenceError::Store(StoreError::Unavailable)
        );
        assert_eq!(
            g.list_saved_games().unwrap_err(),
            PersistenceError::Store(StoreError::Unavailable)
        );
    }

    #[test]
    pub fn test_save_named_game_snapshot_is_independent() {
        let mut g = gateway(MemoryStore::new());
        let s = session();
        let saved = g.save_named_game("Fri", &s).unwrap().unwrap();
        assert_eq!(saved.id, 1_700_000_000_000);
        assert_eq!(saved.name, "Fri");

        // Keep playing after saving.
        let _later = s
            .apply_penalty(
                PlayerIndex(0),
                Penalty {
                    verloren: 2,
                    durchmarsch: 1,
                },
            )
            .unwrap()
            .set_factor(Factor::new(3.0));

        assert_eq!(g.load_named_game(saved.id).unwrap(), Some(s));
    }

    #[test]
    pub fn test_blank_name_saves_nothing() {
        let mut g = gateway(MemoryStore::new());
        assert_eq!(g.save_named_game("  ", &session()).unwrap(), None);
        assert!(g.list_saved_games().unwrap().is_empty());
        assert_eq!(g.store().get("schocken_saved_games").unwrap(), None);
    }

    #[test]
    pub fn test_saved_game_ids_are_unique() {
        let mut g = gateway(MemoryStore::new());
        let first = g.save_named_game("a", &session()).unwrap().unwrap();
        let second = g
            .save_named_game("b", &GameSession::new())
            .unwrap()
            .unwrap();
        assert!(second.id > first.id);

        let games = g.list_saved_games().unwrap();
        assert_eq!(games, vec![first.clone(), second.clone()]);
        assert_eq!(
            g.load_named_game(second.id).unwrap(),
            Some(GameSession::new())
        );
        assert_eq!(g.load_named_game(first.id).unwrap(), Some(session()));
    }

    #[test]
    pub fn test_load_unknown_game() {
        let mut g = gateway(MemoryStore::new());
        assert_eq!(g.load_named_game(42).unwrap(), None);
        g.save_named_game("a", &session()).unwrap();
        assert_eq!(g.load_named_game(42).unwrap(), None);
    }

    #[test]
    pub fn test_corrupt_saved_games() {
        let mut store = MemoryStore::new();
        store.set("schocken_saved_games", "oops").unwrap();
        let mut g = gateway(store);

        assert!(g.list_saved_games().unwrap().is_empty());
        assert_eq!(
            g.save_named_game("a", &session()).unwrap_err(),
            PersistenceError::CorruptSavedGames("schocken_saved_games".to_string())
        );
        assert_eq!(
            g.store().get("schocken_saved_games").unwrap(),
            Some("oops".to_string())
        );
    }

    #[test]
    pub fn test_saved_game_id_overflow() {
        let mut store = MemoryStore::new();
        let last = format!(
            r#"[{{"id":{},"name":"last","players":[],"factor":1.0,"date":""}}]"#,
            u64::MAX
        );
        store.set("schocken_saved_games", &last).unwrap();
        let mut g = gateway(store);

        assert_eq!(
            g.save_named_game("next", &session()).unwrap_err(),
            PersistenceError::SavedGameIdsExhausted
        );
        assert_eq!(
            g.store().get("schocken_saved_games").unwrap(),
            Some(last.clone())
        );
        assert_eq!(g.list_saved_games().unwrap()[0].id, u64::MAX);
    }

    #[test]
    pub fn test_saved_game_format() {
        let mut g = gateway(MemoryStore::new());
        let saved = g.save_named_game("Fri", &session()).unwrap().unwrap();
        let raw = g.store().get("schocken_saved_games").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], 1_700_000_000_000u64);
        assert_eq!(value[0]["name"], "Fri");
        assert_eq!(value[0]["factor"], 0.5);
        assert_eq!(value[0]["players"][1]["name"], "B");
        assert_eq!(value[0]["date"], saved.date.as_str());
    }
}
