//! Turn state machine: reveal, judge, retire, reset
//!
//! A scan reveals a card. The second reveal of a turn hands back a
//! [`PendingJudgment`] which the host commits after its display delay.
//! A mismatched pair stays face up until the next scan clears it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::card::Card;
use super::deck::Deck;
use super::state::GameState;
use crate::CardId;

/// Pairing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Same rank and same color (♠A pairs with ♣A, not with ♥A)
    #[default]
    Strict,
    /// Same rank, any suit
    Loose,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Strict => "strict",
            MatchMode::Loose => "loose",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Some(MatchMode::Strict),
            "loose" => Some(MatchMode::Loose),
            _ => None,
        }
    }

    /// Whether two cards form a pair under this rule
    pub fn is_match(&self, a: &Card, b: &Card) -> bool {
        match self {
            MatchMode::Strict => a.rank == b.rank && a.color == b.color,
            MatchMode::Loose => a.rank == b.rank,
        }
    }
}

/// A scan that was rejected without touching the board
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("invalid card id: {0:?}")]
    InvalidId(String),
    #[error("{0} has already been matched")]
    AlreadyMatched(Card),
    #[error("{0} is already flipped")]
    AlreadyFlipped(Card),
}

/// Judgment owed for the two cards of a completed reveal
///
/// Not `Clone`: committing consumes it, so a pair is judged at most once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "the pair must be judged with commit_judgment"]
pub struct PendingJudgment {
    first: CardId,
    second: CardId,
}

impl PendingJudgment {
    /// Ids in flip order
    pub fn ids(&self) -> (CardId, CardId) {
        (self.first, self.second)
    }
}

/// Result of an accepted scan
#[derive(Debug, PartialEq, Eq)]
pub enum Reveal {
    /// First card of a turn is face up
    FirstCardRevealed(Card),
    /// Second card is face up; the pair still has to be judged
    SecondCardRevealed {
        card: Card,
        pending: PendingJudgment,
    },
}

impl Reveal {
    pub fn card(&self) -> &Card {
        match self {
            Reveal::FirstCardRevealed(card) => card,
            Reveal::SecondCardRevealed { card, .. } => card,
        }
    }
}

/// Verdict on a pair of flipped cards (in flip order)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgment {
    Matched(Card, Card),
    Mismatched(Card, Card),
}

impl Judgment {
    pub fn is_match(&self) -> bool {
        matches!(self, Judgment::Matched(..))
    }

    pub fn cards(&self) -> (&Card, &Card) {
        match self {
            Judgment::Matched(a, b) | Judgment::Mismatched(a, b) => (a, b),
        }
    }
}

/// Process one scanned card id
///
/// Rejections (`InvalidId`, `AlreadyMatched`) leave the state untouched. A
/// stale mismatched pair is cleared before the duplicate check, so the
/// caller should re-render after every call.
pub fn handle_scan(deck: &Deck, state: &mut GameState, index: i64) -> Result<Reveal, ScanError> {
    let card = *deck
        .lookup(index)
        .ok_or_else(|| ScanError::InvalidId(index.to_string()))?;

    if state.is_found(card.id) {
        return Err(ScanError::AlreadyMatched(card));
    }

    // Previous turn ended in a mismatch; this scan starts a new one
    if state.flipped_cards.len() >= 2 {
        log::debug!("Clearing stale pair {:?}", state.flipped_cards);
        state.flipped_cards.clear();
    }

    if state.is_flipped(card.id) {
        return Err(ScanError::AlreadyFlipped(card));
    }

    state.flipped_cards.push(card.id);

    match state.flipped_cards.as_slice() {
        [first, second] => Ok(Reveal::SecondCardRevealed {
            card,
            pending: PendingJudgment {
                first: *first,
                second: *second,
            },
        }),
        _ => Ok(Reveal::FirstCardRevealed(card)),
    }
}

/// Judge the two flipped cards
///
/// Returns `None` unless exactly two cards are flipped.
pub fn check_match(deck: &Deck, state: &mut GameState, mode: MatchMode) -> Option<Judgment> {
    let (id1, id2) = match state.flipped_cards.as_slice() {
        [a, b] => (*a, *b),
        other => {
            log::warn!("check_match called with {} flipped cards", other.len());
            return None;
        }
    };
    let card1 = *deck.get(id1)?;
    let card2 = *deck.get(id2)?;

    if mode.is_match(&card1, &card2) {
        state.found_pairs.push(id1);
        state.found_pairs.push(id2);
        state.flipped_cards.clear();
        log::info!("Pair matched: {} and {}", card1, card2);
        Some(Judgment::Matched(card1, card2))
    } else {
        log::info!("Pair mismatched: {} and {}", card1, card2);
        Some(Judgment::Mismatched(card1, card2))
    }
}

/// Second phase of a two-card reveal, called once the display delay elapsed
///
/// The judgment is discarded if the flipped cards no longer match the ones
/// the token was issued for.
pub fn commit_judgment(
    deck: &Deck,
    state: &mut GameState,
    mode: MatchMode,
    pending: PendingJudgment,
) -> Option<Judgment> {
    if state.flipped_cards != [pending.first, pending.second] {
        log::warn!(
            "Discarding judgment for {:?}, board now shows {:?}",
            pending.ids(),
            state.flipped_cards
        );
        return None;
    }
    check_match(deck, state, mode)
}

/// Judge a pair that was revealed but never committed (e.g. page closed
/// during the display delay). Re-judging a stale mismatch changes nothing.
pub fn recover_pending(deck: &Deck, state: &mut GameState, mode: MatchMode) -> Option<Judgment> {
    if state.flipped_cards.len() == 2 {
        check_match(deck, state, mode)
    } else {
        None
    }
}

/// Empty state for a new game
pub fn reset_state() -> GameState {
    GameState::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DECK_SIZE;
    use crate::sim::card::{Rank, Suit};
    use crate::sim::deck::build_deck;
    use proptest::prelude::*;

    fn id(deck: &Deck, suit: Suit, rank: Rank) -> i64 {
        deck.find(suit, rank).unwrap() as i64
    }

    fn reveal_pair(
        deck: &Deck,
        state: &mut GameState,
        a: i64,
        b: i64,
    ) -> PendingJudgment {
        assert!(matches!(
            handle_scan(deck, state, a),
            Ok(Reveal::FirstCardRevealed(_))
        ));
        match handle_scan(deck, state, b) {
            Ok(Reveal::SecondCardRevealed { pending, .. }) => pending,
            other => panic!("expected second reveal, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_ids_rejected() {
        let deck = build_deck();
        let mut state = GameState {
            found_pairs: vec![0, 13],
            flipped_cards: vec![5],
        };
        let before = state.clone();
        for raw in [-1, 52, 1000, i64::MIN, i64::MAX] {
            assert_eq!(
                handle_scan(&deck, &mut state, raw),
                Err(ScanError::InvalidId(raw.to_string()))
            );
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_first_card_revealed() {
        let deck = build_deck();
        let mut state = GameState::new();
        let result = handle_scan(&deck, &mut state, 7);
        assert_eq!(result, Ok(Reveal::FirstCardRevealed(deck.cards()[7])));
        assert_eq!(state.flipped_cards, vec![7]);
    }

    #[test]
    fn test_duplicate_in_turn_rejected() {
        let deck = build_deck();
        let mut state = GameState {
            found_pairs: vec![],
            flipped_cards: vec![5],
        };
        assert_eq!(
            handle_scan(&deck, &mut state, 5),
            Err(ScanError::AlreadyFlipped(deck.cards()[5]))
        );
        assert_eq!(state.flipped_cards, vec![5]);
    }

    #[test]
    fn test_already_matched_rejected() {
        let deck = build_deck();
        let mut state = GameState {
            found_pairs: vec![0, 13],
            flipped_cards: vec![3, 10],
        };
        let before = state.clone();
        assert_eq!(
            handle_scan(&deck, &mut state, 13),
            Err(ScanError::AlreadyMatched(deck.cards()[13]))
        );
        // Rejected before the stale pair is cleared
        assert_eq!(state, before);
    }

    #[test]
    fn test_stale_pair_auto_cleared() {
        let deck = build_deck();
        let mut state = GameState {
            found_pairs: vec![],
            flipped_cards: vec![3, 10],
        };
        let result = handle_scan(&deck, &mut state, 7);
        assert!(matches!(result, Ok(Reveal::FirstCardRevealed(c)) if c.id == 7));
        assert_eq!(state.flipped_cards, vec![7]);
    }

    #[test]
    fn test_rescan_of_stale_card_starts_new_turn() {
        let deck = build_deck();
        let mut state = GameState {
            found_pairs: vec![],
            flipped_cards: vec![3, 10],
        };
        let result = handle_scan(&deck, &mut state, 3);
        assert!(matches!(result, Ok(Reveal::FirstCardRevealed(c)) if c.id == 3));
        assert_eq!(state.flipped_cards, vec![3]);
    }

    #[test]
    fn test_strict_match_round_trip() {
        let deck = build_deck();
        let mut state = GameState::new();
        let spade_ace = id(&deck, Suit::Spade, Rank::Ace);
        let club_ace = id(&deck, Suit::Club, Rank::Ace);

        let pending = reveal_pair(&deck, &mut state, spade_ace, club_ace);
        assert_eq!(pending.ids(), (spade_ace as usize, club_ace as usize));

        let judgment = commit_judgment(&deck, &mut state, MatchMode::Strict, pending).unwrap();
        assert!(matches!(judgment, Judgment::Matched(a, b) if a.id == 0 && b.id == 13));
        assert_eq!(state.found_pairs, vec![0, 13]);
        assert!(state.flipped_cards.is_empty());
    }

    #[test]
    fn test_strict_mismatch_stays_open() {
        let deck = build_deck();
        let mut state = GameState::new();
        let spade_ace = id(&deck, Suit::Spade, Rank::Ace);
        let heart_ace = id(&deck, Suit::Heart, Rank::Ace);

        let pending = reveal_pair(&deck, &mut state, spade_ace, heart_ace);
        let judgment = commit_judgment(&deck, &mut state, MatchMode::Strict, pending).unwrap();
        assert!(!judgment.is_match());
        assert_eq!(state.flipped_cards, vec![0, 26]);
        assert!(state.found_pairs.is_empty());

        // Next scan starts a new turn
        handle_scan(&deck, &mut state, 30).unwrap();
        assert_eq!(state.flipped_cards, vec![30]);
    }

    #[test]
    fn test_loose_matches_any_suit() {
        let deck = build_deck();
        let mut state = GameState::new();
        let spade_ace = id(&deck, Suit::Spade, Rank::Ace);
        let heart_ace = id(&deck, Suit::Heart, Rank::Ace);

        let pending = reveal_pair(&deck, &mut state, spade_ace, heart_ace);
        let judgment = commit_judgment(&deck, &mut state, MatchMode::Loose, pending).unwrap();
        assert!(judgment.is_match());
        assert_eq!(state.found_pairs, vec![0, 26]);
    }

    #[test]
    fn test_different_ranks_never_match() {
        let deck = build_deck();
        let a = deck.cards()[0];
        let b = deck.cards()[14];
        assert!(!MatchMode::Strict.is_match(&a, &b));
        assert!(!MatchMode::Loose.is_match(&a, &b));
    }

    #[test]
    fn test_stale_token_discarded() {
        let deck = build_deck();
        let mut state = GameState::new();
        let pending = reveal_pair(&deck, &mut state, 0, 26);
        state.flipped_cards.clear();
        assert!(commit_judgment(&deck, &mut state, MatchMode::Strict, pending).is_none());
        assert!(state.found_pairs.is_empty());
    }

    #[test]
    fn test_check_match_requires_two_cards() {
        let deck = build_deck();
        let mut state = GameState {
            found_pairs: vec![],
            flipped_cards: vec![4],
        };
        assert!(check_match(&deck, &mut state, MatchMode::Strict).is_none());
        assert_eq!(state.flipped_cards, vec![4]);
    }

    #[test]
    fn test_recover_pending_retires_match() {
        let deck = build_deck();
        let mut state = GameState {
            found_pairs: vec![],
            flipped_cards: vec![0, 13],
        };
        let judgment = recover_pending(&deck, &mut state, MatchMode::Strict);
        assert!(judgment.is_some_and(|j| j.is_match()));
        assert_eq!(state.found_pairs, vec![0, 13]);

        let mut single = GameState {
            found_pairs: vec![],
            flipped_cards: vec![4],
        };
        assert!(recover_pending(&deck, &mut single, MatchMode::Strict).is_none());
    }

    #[test]
    fn test_match_mode_from_str() {
        assert_eq!(MatchMode::from_str("Strict"), Some(MatchMode::Strict));
        assert_eq!(MatchMode::from_str(" loose "), Some(MatchMode::Loose));
        assert_eq!(MatchMode::from_str("rank"), None);
        assert_eq!(MatchMode::default(), MatchMode::Strict);
    }

    #[test]
    fn test_reset_state_is_empty() {
        assert_eq!(reset_state(), GameState::new());
    }

    proptest! {
        #[test]
        fn prop_out_of_range_leaves_state_unchanged(
            raw in prop_oneof![i64::MIN..0i64, (DECK_SIZE as i64)..i64::MAX],
            flipped in proptest::collection::vec(0usize..DECK_SIZE, 0..=1),
        ) {
            let deck = build_deck();
            let mut state = GameState { found_pairs: vec![], flipped_cards: flipped };
            let before = serde_json::to_string(&state).unwrap();
            let result = handle_scan(&deck, &mut state, raw);
            prop_assert!(matches!(result, Err(ScanError::InvalidId(_))));
            prop_assert_eq!(serde_json::to_string(&state).unwrap(), before);
        }

        #[test]
        fn prop_completed_game_is_absorbing(raw in 0i64..(DECK_SIZE as i64)) {
            let deck = build_deck();
            let mut state = GameState {
                found_pairs: (0..DECK_SIZE).collect(),
                flipped_cards: vec![],
            };
            let result = handle_scan(&deck, &mut state, raw);
            prop_assert!(matches!(result, Err(ScanError::AlreadyMatched(_))));
            prop_assert!(state.is_complete());
            prop_assert_eq!(state.found_pairs.len(), DECK_SIZE);
        }

        #[test]
        fn prop_flipped_never_exceeds_two(scans in proptest::collection::vec(0i64..DECK_SIZE as i64, 1..40)) {
            let deck = build_deck();
            let mut state = GameState::new();
            for raw in scans {
                if let Ok(Reveal::SecondCardRevealed { pending, .. }) = handle_scan(&deck, &mut state, raw) {
                    let _ = commit_judgment(&deck, &mut state, MatchMode::Strict, pending);
                }
                prop_assert!(state.flipped_cards.len() <= 2);
                prop_assert!(state.validate().is_ok());
            }
        }
    }
}
