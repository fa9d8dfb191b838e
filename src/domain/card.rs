//! Cards as they come from the list service

use std::fmt;

/// Opaque card identifier assigned by the list service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One visible task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub text: String,
}

impl Card {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: CardId::new(id),
            text: text.into(),
        }
    }

    /// Stand-in card shown when the list could not be fetched
    pub fn placeholder(message: impl fmt::Display) -> Self {
        Self {
            id: CardId::default(),
            text: format!("Error: {message}"),
        }
    }

    /// Placeholder cards carry no remote identity and cannot be archived
    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_has_no_identity() {
        let card = Card::placeholder("connection refused");
        assert!(card.is_placeholder());
        assert_eq!(card.text, "Error: connection refused");
    }

    #[test]
    fn regular_card_is_selectable() {
        let card = Card::new("5f2a", "Buy milk");
        assert!(!card.is_placeholder());
        assert_eq!(card.id.as_str(), "5f2a");
        assert_eq!(card.id.to_string(), "5f2a");
    }
}
