//! Walking Trump - A QR-scanned pair-matching card game
//!
//! Core modules:
//! - `sim`: Deterministic match engine (deck, game state, reveal/judge/reset)
//! - `persistence`: Save/load of game state through a string key-value store
//! - `platform`: Scan input resolution (QR payloads, `?id=` query)
//! - `presenter`: State-to-grid view contract and user-facing notices
//! - `game`: Host-owned game session tying the pieces together

pub mod error;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod presenter;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use game::{Game, JudgmentReport, ScanReport};
pub use settings::Settings;
pub use sim::{Card, Deck, GameState, Judgment, MatchMode, Reveal, ScanError, build_deck};

/// Game configuration constants
pub mod consts {
    /// Number of cards in the deck (ids are 0..DECK_SIZE)
    pub const DECK_SIZE: usize = 52;

    /// Storage key holding the serialized game state
    pub const STORAGE_KEY: &str = "walkingTrumpGame_52";

    /// Storage key holding the serialized settings
    pub const SETTINGS_KEY: &str = "walking_trump_settings";

    /// Delay between showing the second card and judging the pair
    pub const DEFAULT_JUDGMENT_DELAY_MS: u32 = 300;
}

/// Card id as printed in the QR codes (index into the deck)
pub type CardId = usize;
