//! Deterministic match engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed deck order (ids are printed on physical cards)
//! - State is passed in and mutated explicitly, no globals
//! - Seeded RNG only (autoplay)
//! - No rendering, storage or platform dependencies

pub mod autoplay;
pub mod card;
pub mod deck;
pub mod engine;
pub mod state;

pub use autoplay::DemoPlayer;
pub use card::{Card, Color, Rank, Suit};
pub use deck::{Deck, build_deck};
pub use engine::{
    Judgment, MatchMode, PendingJudgment, Reveal, ScanError, check_match, commit_judgment,
    handle_scan, recover_pending, reset_state,
};
pub use state::{GameState, StateError, is_complete};
