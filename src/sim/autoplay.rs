//! Demo player that scans cards on its own
//!
//! Remembers every face it has seen and goes for a known pair when it can,
//! otherwise scans a random unseen card. Seeded for reproducible runs.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::card::Card;
use super::deck::Deck;
use super::engine::{MatchMode, Reveal, commit_judgment, handle_scan};
use super::state::GameState;
use crate::CardId;
use crate::consts::DECK_SIZE;

/// A simulated player with perfect memory
#[derive(Debug, Clone)]
pub struct DemoPlayer {
    rng: Pcg32,
    mode: MatchMode,
    seen: Vec<Option<Card>>,
}

impl DemoPlayer {
    pub fn new(seed: u64, mode: MatchMode) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            mode,
            seen: vec![None; DECK_SIZE],
        }
    }

    /// Remember a revealed face
    pub fn observe(&mut self, card: &Card) {
        if let Some(slot) = self.seen.get_mut(card.id) {
            *slot = Some(*card);
        }
    }

    /// Pick the next card to scan, or `None` once the game is complete
    pub fn choose(&mut self, state: &GameState) -> Option<CardId> {
        let open: Vec<CardId> = (0..DECK_SIZE).filter(|&id| !state.is_found(id)).collect();
        if open.is_empty() {
            return None;
        }

        // Second card of the turn: finish with a known partner if there is one
        if let [first] = state.flipped_cards.as_slice() {
            let first = *first;
            if let Some(partner) = self.known_partner(first, &open) {
                return Some(partner);
            }
            let rest: Vec<CardId> = open.iter().copied().filter(|&id| id != first).collect();
            return self.pick_unseen(&rest);
        }

        // New turn: start a known pair if memory has one
        for &id in &open {
            if self.known_partner(id, &open).is_some() {
                return Some(id);
            }
        }
        self.pick_unseen(&open)
    }

    /// Play until complete or `max_scans` is reached; returns scans used
    pub fn play(&mut self, deck: &Deck, state: &mut GameState, max_scans: usize) -> usize {
        let mut scans = 0;
        while scans < max_scans {
            let Some(id) = self.choose(state) else {
                break;
            };
            scans += 1;
            match handle_scan(deck, state, id as i64) {
                Ok(Reveal::FirstCardRevealed(card)) => self.observe(&card),
                Ok(Reveal::SecondCardRevealed { card, pending }) => {
                    self.observe(&card);
                    let _ = commit_judgment(deck, state, self.mode, pending);
                }
                Err(e) => log::debug!("Demo scan rejected: {}", e),
            }
        }
        scans
    }

    fn known_partner(&self, id: CardId, open: &[CardId]) -> Option<CardId> {
        let card = self.seen.get(id).copied().flatten()?;
        open.iter().copied().find(|&other| {
            other != id
                && self.seen[other].is_some_and(|o| self.mode.is_match(&card, &o))
        })
    }

    fn pick_unseen(&mut self, pool: &[CardId]) -> Option<CardId> {
        let unseen: Vec<CardId> = pool
            .iter()
            .copied()
            .filter(|&id| self.seen[id].is_none())
            .collect();
        let pool = if unseen.is_empty() { pool.to_vec() } else { unseen };
        if pool.is_empty() {
            return None;
        }
        let i = self.rng.random_range(0..pool.len());
        Some(pool[i])
    }
}
