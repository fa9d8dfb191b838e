//! Trello REST client
//!
//! Cards are read from a single list and archived by setting `closed`.
//! Credentials travel as query parameters, as the Trello API expects.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::TrelloCredentials;
use crate::domain::{Card, CardId};
use crate::service::{ListService, ServiceError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Card as returned by `GET /lists/{id}/cards?fields=name,closed`
#[derive(Debug, Deserialize)]
struct RawCard {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    closed: bool,
}

/// Parses a card list payload, dropping closed cards
pub fn parse_cards(body: &str) -> Result<Vec<Card>, ServiceError> {
    let raw: Vec<RawCard> = serde_json::from_str(body)?;
    Ok(raw
        .into_iter()
        .filter(|c| !c.closed)
        .map(|c| Card::new(c.id, c.name))
        .collect())
}

#[derive(Debug)]
pub struct TrelloClient {
    client: Client,
    api_base: String,
    credentials: TrelloCredentials,
}

impl TrelloClient {
    pub fn new(api_base: &str, credentials: TrelloCredentials) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn cards_endpoint(&self) -> String {
        format!("{}/lists/{}/cards", self.api_base, self.credentials.list_id)
    }

    fn card_endpoint(&self, id: &CardId) -> String {
        format!("{}/cards/{}", self.api_base, id)
    }

    fn auth(&self) -> [(&'static str, &str); 2] {
        [
            ("key", self.credentials.api_key.as_str()),
            ("token", self.credentials.api_token.as_str()),
        ]
    }

    fn try_fetch(&self) -> Result<Vec<Card>, ServiceError> {
        let endpoint = self.cards_endpoint();
        let response = self
            .client
            .get(&endpoint)
            .query(&[("fields", "name,closed")])
            .query(&self.auth())
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                endpoint,
            });
        }

        parse_cards(&response.text()?)
    }

    fn set_closed(&self, id: &CardId, closed: bool) -> Result<(), ServiceError> {
        let endpoint = self.card_endpoint(id);
        let closed = if closed { "true" } else { "false" };
        let response = self
            .client
            .put(&endpoint)
            .query(&[("closed", closed)])
            .query(&self.auth())
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                endpoint,
            });
        }
        Ok(())
    }
}

/// Collapses a fetch result into what the list shows
fn cards_or_placeholder(result: Result<Vec<Card>, ServiceError>) -> Vec<Card> {
    match result {
        Ok(cards) => {
            tracing::debug!(count = cards.len(), "fetched cards");
            cards
        }
        Err(err) => {
            tracing::warn!(error = %err, "card fetch failed");
            vec![Card::placeholder(err)]
        }
    }
}

impl ListService for TrelloClient {
    fn fetch_cards(&mut self) -> Vec<Card> {
        cards_or_placeholder(self.try_fetch())
    }

    fn archive_card(&mut self, id: &CardId) -> bool {
        match self.set_closed(id, true) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(card_id = %id, error = %err, "archive failed");
                false
            }
        }
    }

    fn unarchive_card(&mut self, id: &CardId) -> bool {
        match self.set_closed(id, false) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(card_id = %id, error = %err, "unarchive failed");
                false
            }
        }
    }
}
