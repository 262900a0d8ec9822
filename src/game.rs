//! Host-owned game session
//!
//! Owns the deck, the state and the store, threads the state through the
//! engine and saves after every mutation. A failed save is reported but the
//! game keeps running from memory.

use crate::error::GameError;
use crate::persistence::{self, StateStore, StoreError};
use crate::platform::{ScanSourceError, resolve_payload};
use crate::presenter::{GridView, Notice, grid_view};
use crate::sim::{
    Deck, GameState, Judgment, MatchMode, PendingJudgment, Reveal, build_deck, engine,
};

/// Result of one scan attempt
#[derive(Debug)]
pub struct ScanReport {
    pub outcome: Result<Reveal, GameError>,
    /// Outcome of saving; `Ok` when nothing needed saving
    pub save: Result<(), StoreError>,
}

impl ScanReport {
    fn rejected(err: impl Into<GameError>) -> Self {
        Self {
            outcome: Err(err.into()),
            save: Ok(()),
        }
    }

    /// Messages for the player, in display order
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = vec![match &self.outcome {
            Ok(reveal) => Notice::from_reveal(reveal),
            Err(err) => Notice::Error(err.clone()),
        }];
        if let Err(e) = &self.save {
            notices.push(Notice::Error(e.clone().into()));
        }
        notices
    }
}

/// Result of judging a revealed pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgmentReport {
    pub judgment: Judgment,
    pub save: Result<(), StoreError>,
}

impl JudgmentReport {
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = vec![Notice::from_judgment(&self.judgment)];
        if let Err(e) = &self.save {
            notices.push(Notice::Error(e.clone().into()));
        }
        notices
    }
}

/// A running game bound to a store
pub struct Game<S: StateStore> {
    deck: Deck,
    state: GameState,
    mode: MatchMode,
    store: S,
}

impl<S: StateStore> Game<S> {
    /// Resume the saved game (or start fresh) and settle any pair whose
    /// judgment was interrupted. Returns notices worth showing.
    pub fn open(store: S, mode: MatchMode) -> (Self, Vec<Notice>) {
        let mut notices = Vec::new();
        let state = match persistence::load_state(&store) {
            Ok(Some(state)) => state,
            Ok(None) => {
                log::info!("No saved game, starting fresh");
                GameState::new()
            }
            Err(e) => {
                log::warn!("Starting fresh, saved game unusable: {}", e);
                notices.push(Notice::Error(e.into()));
                GameState::new()
            }
        };

        let mut game = Self {
            deck: build_deck(),
            state,
            mode,
            store,
        };

        if let Some(judgment) = engine::recover_pending(&game.deck, &mut game.state, game.mode) {
            if judgment.is_match() {
                log::info!("Settled interrupted judgment");
                if let Err(e) = game.save() {
                    notices.push(Notice::Error(e.into()));
                }
            }
        }

        (game, notices)
    }

    /// Handle a raw card id
    pub fn scan(&mut self, raw: i64) -> ScanReport {
        let before = self.state.clone();
        let outcome = engine::handle_scan(&self.deck, &mut self.state, raw);

        match &outcome {
            Ok(reveal) => log::info!("Revealed {}", reveal.card()),
            Err(e) => log::info!("Scan rejected: {}", e),
        }

        let save = if self.state != before {
            self.save()
        } else {
            Ok(())
        };

        ScanReport {
            outcome: outcome.map_err(GameError::from),
            save,
        }
    }

    /// Handle a decoded QR payload (bare id or URL with `id=`)
    pub fn scan_payload(&mut self, payload: &str) -> ScanReport {
        match resolve_payload(payload) {
            Ok(raw) => self.scan(raw),
            Err(e) => {
                log::info!("Unreadable payload {:?}", payload);
                ScanReport::rejected(e)
            }
        }
    }

    /// The camera or decoder gave up; nothing changes
    pub fn scan_failed(&self, err: ScanSourceError) -> Notice {
        log::warn!("Scan source failed");
        Notice::Error(err.into())
    }

    /// Judge the pair revealed by the last scan, after the display delay
    pub fn commit_judgment(&mut self, pending: PendingJudgment) -> Option<JudgmentReport> {
        let judgment = engine::commit_judgment(&self.deck, &mut self.state, self.mode, pending)?;
        let save = self.save();
        Some(JudgmentReport { judgment, save })
    }

    /// Start over: empty state and no saved entry
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.state = engine::reset_state();
        let result = persistence::clear_state(&mut self.store);
        if let Err(e) = &result {
            log::error!("Could not clear saved game: {}", e);
        }
        result
    }

    fn save(&mut self) -> Result<(), StoreError> {
        let result = persistence::save_state(&mut self.store, &self.state);
        if let Err(e) = &result {
            log::error!("Save failed, progress is in memory only: {}", e);
        }
        result
    }

    pub fn view(&self) -> GridView {
        grid_view(&self.deck, &self.state)
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: MatchMode) {
        self.mode = mode;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
