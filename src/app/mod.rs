//! Application orchestration layer
//!
//! Coordinates the card store, the list service, the modal state machine
//! and the renderers, and runs the main loop.

pub mod context;
pub mod controller;
pub mod runner;
pub mod state;

pub use context::AppContext;
pub use controller::{ModalController, SelectionError};
pub use runner::{App, Flow, run};
pub use state::{ANIM_DURATION, ModalState, REFRESH_INTERVAL, UNDO_TIMEOUT};
