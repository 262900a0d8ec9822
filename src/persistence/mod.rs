//! Save/load of game state through a string key-value store
//!
//! Features:
//! - Plain JSON payload (`{"foundPairs": [...], "flippedCards": [...]}`)
//! - Validation of loaded data, corrupt saves are reported
//! - LocalStorage backend on web, in-memory backend elsewhere
//!
//! Failures are surfaced to the caller, never retried.

pub mod memory;

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

pub use memory::MemoryStore;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use thiserror::Error;

use crate::consts::STORAGE_KEY;
use crate::sim::GameState;

/// Persistence failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage error: {0}")]
    Backend(String),
    #[error("could not serialize game state: {0}")]
    Serialize(String),
    #[error("saved game is corrupt: {0}")]
    Corrupt(String),
}

/// Opaque string-keyed storage
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<T: StateStore + ?Sized> StateStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}

/// Load the saved game; `Ok(None)` means no save exists (new game)
pub fn load_state<S: StateStore + ?Sized>(store: &S) -> Result<Option<GameState>, StoreError> {
    let Some(json) = store.get(STORAGE_KEY)? else {
        return Ok(None);
    };
    let state: GameState =
        serde_json::from_str(&json).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    state
        .validate()
        .map_err(|e| StoreError::Corrupt(e.to_string()))?;
    log::info!(
        "Loaded saved game ({} pairs found, {} flipped)",
        state.pairs_found(),
        state.flipped_cards.len()
    );
    Ok(Some(state))
}

/// Save the game state
pub fn save_state<S: StateStore + ?Sized>(store: &mut S, state: &GameState) -> Result<(), StoreError> {
    let json = serde_json::to_string(state).map_err(|e| StoreError::Serialize(e.to_string()))?;
    store.set(STORAGE_KEY, &json)?;
    log::debug!("Game saved ({} pairs found)", state.pairs_found());
    Ok(())
}

/// Delete the saved game
pub fn clear_state<S: StateStore + ?Sized>(store: &mut S) -> Result<(), StoreError> {
    store.delete(STORAGE_KEY)?;
    log::info!("Saved game cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn missing_key_means_new_game() {
        let store = MemoryStore::new();
        assert_eq!(load_state(&store), Ok(None));
    }

    #[test]
    fn save_then_load() {
        let mut store = MemoryStore::new();
        let state = GameState {
            found_pairs: vec![13, 0],
            flipped_cards: vec![3, 10],
        };
        save_state(&mut store, &state).unwrap();
        assert_eq!(
            store.get(STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"foundPairs":[13,0],"flippedCards":[3,10]}"#)
        );
        assert_eq!(load_state(&store), Ok(Some(state)));
    }

    #[test]
    fn clear_removes_key() {
        let mut store = MemoryStore::new();
        save_state(&mut store, &GameState::new()).unwrap();
        clear_state(&mut store).unwrap();
        assert_eq!(store.get(STORAGE_KEY), Ok(None));
        // Deleting an absent key is fine
        assert!(clear_state(&mut store).is_ok());
    }

    #[test]
    fn garbage_is_corrupt() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "not json").unwrap();
        assert!(matches!(load_state(&store), Err(StoreError::Corrupt(_))));

        store
            .set(STORAGE_KEY, r#"{"foundPairs":[1,1],"flippedCards":[]}"#)
            .unwrap();
        assert!(matches!(load_state(&store), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn backend_failures_surface() {
        let mut store = MemoryStore::new();
        store.set_failing(true);
        assert!(matches!(
            save_state(&mut store, &GameState::new()),
            Err(StoreError::Backend(_))
        ));
        assert!(matches!(load_state(&store), Err(StoreError::Backend(_))));
        assert!(matches!(clear_state(&mut store), Err(StoreError::Backend(_))));
    }

    proptest! {
        #[test]
        fn prop_save_load_round_trip(ids in Just((0usize..52).collect::<Vec<_>>()).prop_shuffle(), found in 0usize..=26, flipped in 0usize..=2) {
            let found_len = (found * 2).min(52);
            let flipped_len = flipped.min(52 - found_len);
            let state = GameState {
                found_pairs: ids[..found_len].to_vec(),
                flipped_cards: ids[found_len..found_len + flipped_len].to_vec(),
            };
            let mut store = MemoryStore::new();
            save_state(&mut store, &state).unwrap();
            prop_assert_eq!(load_state(&store).unwrap(), Some(state));
        }
    }
}
