//! The fixed 52-card deck
//!
//! Card ids are embedded in the QR codes printed on physical cards, so the
//! enumeration order (suit-major, rank-minor) must never change.

use super::card::{Card, Rank, Suit};
use crate::CardId;
use crate::consts::DECK_SIZE;

/// Ordered collection of all 52 cards, indexed by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build the standard deck: ♠A..♠K, ♣A..♣K, ♥A..♥K, ♦A..♦K
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(cards.len(), suit, rank));
            }
        }
        Self { cards }
    }

    /// Look up a card by id
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    /// Look up a card by a raw (possibly negative) scanned value
    pub fn lookup(&self, raw: i64) -> Option<&Card> {
        usize::try_from(raw).ok().and_then(|id| self.get(id))
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Find the id of a card by suit and rank
    pub fn find(&self, suit: Suit, rank: Rank) -> Option<CardId> {
        self.cards
            .iter()
            .find(|c| c.suit == suit && c.rank == rank)
            .map(|c| c.id)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}

/// Construct the deck (deterministic, no inputs)
pub fn build_deck() -> Deck {
    Deck::standard()
}
