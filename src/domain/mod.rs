//! Domain logic and core data structures
//!
//! This module contains pure logic that is independent of the list
//! service, the rendering backend and the display platform.

pub mod card;
pub mod core;
pub mod layout;
pub mod store;

pub use card::{Card, CardId};
pub use layout::{CardBlock, FontMetrics};
pub use store::{CardStore, StoreError};
