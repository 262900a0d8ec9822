//! State-to-grid view contract and user-facing notices
//!
//! The grid is re-derived from `GameState` in full on every change; there
//! are no partial diffs.

use std::fmt;

use crate::consts::DECK_SIZE;
use crate::error::GameError;
use crate::sim::{Card, Color, Deck, GameState, Judgment, Reveal, ScanError};

/// Visual state of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    /// Face down
    Closed,
    /// Face up, awaiting judgment (or a mismatch left open)
    Open(Color),
    /// Face up and retired
    Matched(Color),
}

/// One cell of the 52-card grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCell {
    pub id: usize,
    pub face: CardFace,
    /// Display name when face up
    pub label: Option<String>,
}

impl CardCell {
    /// CSS classes for the cell element
    pub fn classes(&self) -> Vec<&'static str> {
        match self.face {
            CardFace::Closed => vec!["card"],
            CardFace::Open(color) => vec!["card", "open", color.as_str()],
            CardFace::Matched(color) => vec!["card", "open", color.as_str(), "matched"],
        }
    }

    /// Space-separated class attribute
    pub fn class_name(&self) -> String {
        self.classes().join(" ")
    }
}

/// Full grid view derived from the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    pub cells: Vec<CardCell>,
    pub pairs_found: usize,
    pub complete: bool,
}

impl GridView {
    /// Status line under the grid
    pub fn status_text(&self) -> String {
        if self.complete {
            "🎊 All pairs found! Congratulations! 🎊".to_string()
        } else {
            format!("{} / {} pairs found", self.pairs_found, DECK_SIZE / 2)
        }
    }
}

/// Derive the grid for every card in the deck
pub fn grid_view(deck: &Deck, state: &GameState) -> GridView {
    let cells = deck
        .cards()
        .iter()
        .map(|card| {
            let face = if state.is_found(card.id) {
                CardFace::Matched(card.color)
            } else if state.is_flipped(card.id) {
                CardFace::Open(card.color)
            } else {
                CardFace::Closed
            };
            let label = (face != CardFace::Closed).then(|| card.display_name());
            CardCell {
                id: card.id,
                face,
                label,
            }
        })
        .collect();

    GridView {
        cells,
        pairs_found: state.pairs_found(),
        complete: state.is_complete(),
    }
}

/// Message shown to the player after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    FirstCard(Card),
    SecondCard(Card),
    Matched(Card, Card),
    Mismatched(Card, Card),
    Reset,
    Error(GameError),
}

impl Notice {
    pub fn from_reveal(reveal: &Reveal) -> Self {
        match reveal {
            Reveal::FirstCardRevealed(card) => Notice::FirstCard(*card),
            Reveal::SecondCardRevealed { card, .. } => Notice::SecondCard(*card),
        }
    }

    pub fn from_judgment(judgment: &Judgment) -> Self {
        match *judgment {
            Judgment::Matched(a, b) => Notice::Matched(a, b),
            Judgment::Mismatched(a, b) => Notice::Mismatched(a, b),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }

    /// The second reveal is only rendered, the verdict follows right after
    pub fn needs_alert(&self) -> bool {
        !matches!(self, Notice::SecondCard(_))
    }
}

impl From<GameError> for Notice {
    fn from(err: GameError) -> Self {
        Notice::Error(err)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::FirstCard(card) => {
                write!(f, "First card: {}\nNow find its partner!", card)
            }
            Notice::SecondCard(card) => write!(f, "Second card: {}", card),
            Notice::Matched(a, b) => write!(f, "🎉 Pair found!\n{} and {}", a, b),
            Notice::Mismatched(a, b) => write!(
                f,
                "😢 No match!\n{} and {}\n(Next scan starts a new turn)",
                a, b
            ),
            Notice::Reset => f.write_str("Game reset"),
            Notice::Error(GameError::Scan(ScanError::InvalidId(_))) => {
                f.write_str("Invalid QR code")
            }
            Notice::Error(GameError::Scan(ScanError::AlreadyMatched(card))) => {
                write!(f, "{} has already been matched!", card)
            }
            Notice::Error(GameError::Scan(ScanError::AlreadyFlipped(card))) => {
                write!(f, "{} is already face up", card)
            }
            Notice::Error(err) => write!(f, "{}", capitalize(&err.to_string())),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
