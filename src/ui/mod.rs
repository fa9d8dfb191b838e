//! Drawing: text, primitives, the list and the modal
//!
//! Every function here draws into a caller-owned pixmap and keeps no state
//! between frames.

pub mod list_view;
pub mod modal;
pub mod renderer;
pub mod text;
pub mod theme;

pub use renderer::RenderError;
pub use text::{GlyphFont, TextPainter};
pub use theme::Theme;
