//! Startup configuration
//!
//! Credentials and the target list come from `trello_secrets.env` or the
//! environment. The timing constants of the board are not configurable;
//! they live with the state machine in [`crate::app::state`].

pub mod settings;

pub use settings::{Config, ConfigError, TrelloCredentials};
