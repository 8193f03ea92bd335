//! The scoreboard as seen by a front end: one live session, at most one open
//! Schock-Aus, and a write-through to storage after every change.

use log::debug;

use crate::export::CsvExport;
use crate::game_states::{Confirmation, GameSession, SchockEvent};
use crate::persistence::{
    Clock, PersistenceError, PersistenceGateway, SavedGame, Store, SystemClock,
};
use crate::types::{Factor, PlayerIndex};

type Observer = Box<dyn FnMut(&GameSession)>;

pub struct Scoreboard<S, C = SystemClock> {
    session: GameSession,
    schock_aus: Option<SchockEvent>,
    gateway: PersistenceGateway<S, C>,
    observers: Vec<Observer>,
}

impl<S: Store, C: Clock> Scoreboard<S, C> {
    /// Start from whatever session the gateway has stored.
    pub fn open(gateway: PersistenceGateway<S, C>) -> Self {
        Self {
            session: gateway.load_current_session(),
            schock_aus: None,
            gateway,
            observers: vec![],
        }
    }

    pub fn session(&self) -> &'_ GameSession {
        &self.session
    }

    pub fn gateway(&self) -> &'_ PersistenceGateway<S, C> {
        &self.gateway
    }

    /// Register a callback invoked with the new session after every change.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&GameSession) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    fn replace(&mut self, session: GameSession) {
        self.session = session;
        for observer in self.observers.iter_mut() {
            observer(&self.session);
        }
    }

    fn commit(&mut self, session: GameSession) -> Result<(), PersistenceError> {
        self.replace(session);
        self.gateway.save_current_session(&self.session)
    }

    pub fn add_player(&mut self, name: &str) -> Result<(), PersistenceError> {
        let session = self.session.add_player(name);
        self.commit(session)
    }

    /// Remove the player at `index`. Out-of-range indices are ignored.
    pub fn remove_player(&mut self, index: PlayerIndex) -> Result<(), PersistenceError> {
        match self.session.remove_player(index) {
            Ok(session) => self.commit(session),
            Err(e) => {
                debug!("not removing player {}: {}", index.0, e);
                Ok(())
            }
        }
    }

    pub fn set_factor(&mut self, factor: Factor) -> Result<(), PersistenceError> {
        let session = self.session.set_factor(factor);
        self.commit(session)
    }

    /// Wipe the session if `confirmation` answers yes. Returns whether the
    /// reset happened.
    pub fn reset<F: Confirmation + ?Sized>(
        &mut self,
        confirmation: &mut F,
    ) -> Result<bool, PersistenceError> {
        let session = match self.session.reset(confirmation) {
            Some(session) => session,
            None => return Ok(false),
        };
        self.schock_aus = None;
        self.replace(session);
        self.gateway.clear_current_session()?;
        Ok(true)
    }

    /// Open a fresh Schock-Aus, discarding any event that was still open.
    pub fn open_schock_aus(&mut self) -> &'_ SchockEvent {
        let event = SchockEvent::open(&self.session);
        self.schock_aus.insert(event)
    }

    pub fn schock_aus(&self) -> Option<&'_ SchockEvent> {
        self.schock_aus.as_ref()
    }

    /// Change the open Schock-Aus, e.g. `|e| e.toggle_durchmarsch()`. Does
    /// nothing when no event is open.
    pub fn edit_schock_aus<F>(&mut self, edit: F)
    where
        F: FnOnce(SchockEvent) -> SchockEvent,
    {
        match self.schock_aus.take() {
            Some(event) => self.schock_aus = Some(edit(event)),
            None => debug!("no Schock-Aus open to edit"),
        }
    }

    /// Score the open Schock-Aus and close it.
    pub fn submit_schock_aus(&mut self) -> Result<(), PersistenceError> {
        match self.schock_aus.take() {
            Some(event) => {
                let session = event.submit(&self.session);
                self.commit(session)
            }
            None => {
                debug!("no Schock-Aus open to submit");
                Ok(())
            }
        }
    }

    /// Close the open Schock-Aus without scoring it.
    pub fn cancel_schock_aus(&mut self) {
        self.schock_aus = None;
    }

    pub fn save_named_game(&mut self, name: &str) -> Result<Option<SavedGame>, PersistenceError> {
        self.gateway.save_named_game(name, &self.session)
    }

    pub fn saved_games(&self) -> Result<Vec<SavedGame>, PersistenceError> {
        self.gateway.list_saved_games()
    }

    /// Replace the session with a saved snapshot. Returns `false`, leaving the
    /// session untouched, if `id` is unknown.
    pub fn load_named_game(&mut self, id: u64) -> Result<bool, PersistenceError> {
        match self.gateway.load_named_game(id)? {
            Some(session) => {
                self.commit(session)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn export_csv(&self) -> CsvExport {
        CsvExport::new(
            &self.session,
            &self.gateway.config().export_prefix,
            &self.gateway.clock().now(),
        )
    }
}
