//! Ordered in-memory card list
//!
//! The store mirrors the remote list in display order. Position is
//! meaningful: an undone archive puts the card back where it was.

use crate::domain::card::{Card, CardId};

/// Errors that can occur during store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Card index {index} out of range for store of length {len}")]
    OutOfRange { index: usize, len: usize },
}

/// Cards currently visible in the list view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardStore {
    cards: Vec<Card>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        let mut store = Self::new();
        store.replace(cards);
        store
    }

    /// Replaces the whole sequence with a fresh snapshot
    ///
    /// Later duplicates of an id already seen are dropped so ids stay unique.
    pub fn replace(&mut self, cards: Vec<Card>) {
        let mut unique: Vec<Card> = Vec::with_capacity(cards.len());
        for card in cards {
            let duplicate = !card.is_placeholder() && unique.iter().any(|c| c.id == card.id);
            if !duplicate {
                unique.push(card);
            }
        }
        self.cards = unique;
    }

    /// Detaches the card at `index`
    pub fn remove_at(&mut self, index: usize) -> Result<Card, StoreError> {
        if index >= self.cards.len() {
            return Err(StoreError::OutOfRange {
                index,
                len: self.cards.len(),
            });
        }
        Ok(self.cards.remove(index))
    }

    /// Reinserts a card, clamping `index` to the current length
    ///
    /// Returns the position the card actually landed at.
    pub fn insert_at(&mut self, index: usize, card: Card) -> usize {
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
        index
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.iter().any(|c| &c.id == id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
