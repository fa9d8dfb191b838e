//! Today board: a fullscreen view of a remote card list
//!
//! Cards are fetched from a list service and drawn as stacked blocks. Tapping
//! a card slides it into a confirmation panel where it can be archived or
//! restored with Undo before the countdown runs out.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod platform;
pub mod service;
pub mod ui;

pub use error::{AppError, Result};
