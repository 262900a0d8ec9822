//! Game state
//!
//! All state that must be persisted across page reloads lives here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CardId;
use crate::consts::DECK_SIZE;

/// Reasons a (usually freshly loaded) state is not one the engine could produce
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("card id {0} is out of range")]
    OutOfRange(CardId),
    #[error("card id {0} appears more than once")]
    Duplicate(CardId),
    #[error("{0} cards flipped, at most 2 allowed")]
    TooManyFlipped(usize),
    #[error("odd number of found cards ({0})")]
    UnpairedFound(usize),
}

/// Complete game state (serializable, order-preserving)
///
/// Serialized as `{"foundPairs": [...], "flippedCards": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Ids retired as matched, appended two at a time in flip order
    pub found_pairs: Vec<CardId>,
    /// Ids currently face up and awaiting (or left after) judgment
    pub flipped_cards: Vec<CardId>,
}

impl GameState {
    /// Empty state for a new game
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_found(&self, id: CardId) -> bool {
        self.found_pairs.contains(&id)
    }

    pub fn is_flipped(&self, id: CardId) -> bool {
        self.flipped_cards.contains(&id)
    }

    /// Face up for display: retired or currently flipped
    pub fn is_open(&self, id: CardId) -> bool {
        self.is_found(id) || self.is_flipped(id)
    }

    /// Number of pairs retired so far
    pub fn pairs_found(&self) -> usize {
        self.found_pairs.len() / 2
    }

    /// True once every card has been retired
    pub fn is_complete(&self) -> bool {
        self.found_pairs.len() == DECK_SIZE
    }

    /// Check the structural invariants the engine maintains
    pub fn validate(&self) -> Result<(), StateError> {
        if self.flipped_cards.len() > 2 {
            return Err(StateError::TooManyFlipped(self.flipped_cards.len()));
        }
        if self.found_pairs.len() % 2 != 0 {
            return Err(StateError::UnpairedFound(self.found_pairs.len()));
        }

        let mut seen = [false; DECK_SIZE];
        for &id in self.found_pairs.iter().chain(self.flipped_cards.iter()) {
            if id >= DECK_SIZE {
                return Err(StateError::OutOfRange(id));
            }
            if seen[id] {
                return Err(StateError::Duplicate(id));
            }
            seen[id] = true;
        }
        Ok(())
    }
}

/// Completion query used by the presenter after every render
pub fn is_complete(state: &GameState) -> bool {
    state.is_complete()
}
