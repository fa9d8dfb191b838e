//! In-memory list service
//!
//! Keeps cards and their archived flag locally and records every call so
//! scenarios can assert on exactly which remote operations were issued.
//! Failures can be switched on to exercise the best-effort paths.

use crate::domain::{Card, CardId};
use crate::service::ListService;

/// A remote operation observed by [`InMemoryListService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    Fetch,
    Archive(CardId),
    Unarchive(CardId),
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryListService {
    cards: Vec<(Card, bool)>,
    calls: Vec<ServiceCall>,
    fail_fetch: Option<String>,
    fail_mutations: bool,
}

impl InMemoryListService {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into_iter().map(|c| (c, false)).collect(),
            ..Self::default()
        }
    }

    /// Makes subsequent fetches fail with `message`
    pub fn fail_fetch_with(&mut self, message: impl Into<String>) {
        self.fail_fetch = Some(message.into());
    }

    /// Makes archive/unarchive calls report failure without changing state
    pub fn fail_mutations(&mut self, fail: bool) {
        self.fail_mutations = fail;
    }

    /// Adds a card remotely, as another client would
    pub fn push_remote(&mut self, card: Card) {
        self.cards.push((card, false));
    }

    pub fn calls(&self) -> &[ServiceCall] {
        &self.calls
    }

    pub fn count(&self, call: &ServiceCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn is_archived(&self, id: &CardId) -> bool {
        self.cards.iter().any(|(c, closed)| &c.id == id && *closed)
    }

    fn set_closed(&mut self, id: &CardId, closed: bool) -> bool {
        if self.fail_mutations {
            return false;
        }
        match self.cards.iter_mut().find(|(c, _)| &c.id == id) {
            Some(entry) => {
                entry.1 = closed;
                true
            }
            None => false,
        }
    }
}

impl ListService for InMemoryListService {
    fn fetch_cards(&mut self) -> Vec<Card> {
        self.calls.push(ServiceCall::Fetch);
        if let Some(message) = &self.fail_fetch {
            return vec![Card::placeholder(message)];
        }
        self.cards
            .iter()
            .filter(|(_, closed)| !closed)
            .map(|(c, _)| c.clone())
            .collect()
    }

    fn archive_card(&mut self, id: &CardId) -> bool {
        self.calls.push(ServiceCall::Archive(id.clone()));
        self.set_closed(id, true)
    }

    fn unarchive_card(&mut self, id: &CardId) -> bool {
        self.calls.push(ServiceCall::Unarchive(id.clone()));
        self.set_closed(id, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archived_cards_are_not_fetched() {
        let mut service =
            InMemoryListService::new(vec![Card::new("a", "Buy milk"), Card::new("b", "Call Sam")]);
        assert!(service.archive_card(&CardId::new("b")));
        assert_eq!(service.fetch_cards(), vec![Card::new("a", "Buy milk")]);

        assert!(service.unarchive_card(&CardId::new("b")));
        assert_eq!(service.fetch_cards().len(), 2);
        assert_eq!(service.count(&ServiceCall::Fetch), 2);
    }

    #[test]
    fn failing_fetch_returns_placeholder() {
        let mut service = InMemoryListService::new(vec![Card::new("a", "Buy milk")]);
        service.fail_fetch_with("timed out");
        let cards = service.fetch_cards();
        assert_eq!(cards, vec![Card::placeholder("timed out")]);
    }

    #[test]
    fn failing_mutation_is_recorded_but_ignored() {
        let mut service = InMemoryListService::new(vec![Card::new("a", "Buy milk")]);
        service.fail_mutations(true);
        assert!(!service.archive_card(&CardId::new("a")));
        assert!(!service.is_archived(&CardId::new("a")));
        assert_eq!(service.calls(), &[ServiceCall::Archive(CardId::new("a"))]);
    }
}
