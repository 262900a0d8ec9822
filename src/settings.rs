//! Game settings and preferences
//!
//! Persisted separately from the game state in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_JUDGMENT_DELAY_MS, SETTINGS_KEY};
use crate::persistence::{StateStore, StoreError};
use crate::sim::MatchMode;

/// Longest display delay accepted before judging a pair
pub const MAX_JUDGMENT_DELAY_MS: u32 = 5_000;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pairing rule
    pub match_mode: MatchMode,
    /// How long the second card stays visible before the verdict (ms)
    pub judgment_delay_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::Strict,
            judgment_delay_ms: DEFAULT_JUDGMENT_DELAY_MS,
        }
    }
}

impl Settings {
    /// Settings with the given pairing rule
    pub fn with_mode(match_mode: MatchMode) -> Self {
        Self {
            match_mode,
            ..Self::default()
        }
    }

    /// Delay clamped to a sane range
    pub fn effective_delay_ms(&self) -> u32 {
        self.judgment_delay_ms.min(MAX_JUDGMENT_DELAY_MS)
    }

    /// Apply a `mode=strict|loose` query override, if present and valid
    pub fn apply_query(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mode = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "mode")
            .and_then(|(_, value)| MatchMode::from_str(value));
        if let Some(mode) = mode {
            log::info!("Match mode overridden by URL: {}", mode.as_str());
            self.match_mode = mode;
        }
    }

    /// Load settings from a store, falling back to defaults
    pub fn load_from<S: StateStore + ?Sized>(store: &S) -> Self {
        match store.get(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable settings: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to a store
    pub fn save_to<S: StateStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        let json = serde_json::to_string(self).map_err(|e| StoreError::Serialize(e.to_string()))?;
        store.set(SETTINGS_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match crate::persistence::LocalStorageStore::open() {
            Ok(store) => Self::load_from(&store),
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), StoreError> {
        let mut store = crate::persistence::LocalStorageStore::open()?;
        self.save_to(&mut store)
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), StoreError> {
        // No-op for native
        Ok(())
    }
}
