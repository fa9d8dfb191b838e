//! Remote list service
//!
//! The rest of the application only sees the [`ListService`] capability.
//! Calls are synchronous and best-effort: fetching never fails (a
//! placeholder card is returned instead) and archive/unarchive report a
//! plain success flag that the caller is free to ignore.

pub mod memory;
pub mod trello;

use crate::domain::{Card, CardId};

pub use memory::InMemoryListService;
pub use trello::TrelloClient;

/// Errors raised while talking to the list service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response status {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Operations the board needs from the remote list
pub trait ListService {
    /// Visible cards in display order, archived entries excluded
    ///
    /// Never fails: transport or parse errors come back as a single
    /// placeholder card carrying the error message.
    fn fetch_cards(&mut self) -> Vec<Card>;

    /// Archives a card remotely, returning whether the call succeeded
    fn archive_card(&mut self, id: &CardId) -> bool;

    /// Restores an archived card remotely, returning whether the call succeeded
    fn unarchive_card(&mut self, id: &CardId) -> bool;
}

impl<S: ListService + ?Sized> ListService for Box<S> {
    fn fetch_cards(&mut self) -> Vec<Card> {
        (**self).fetch_cards()
    }

    fn archive_card(&mut self, id: &CardId) -> bool {
        (**self).archive_card(id)
    }

    fn unarchive_card(&mut self, id: &CardId) -> bool {
        (**self).unarchive_card(id)
    }
}
