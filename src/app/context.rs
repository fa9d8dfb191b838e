//! Shared rendering context
//!
//! Everything the renderers need besides the application state: screen
//! geometry, colours and the font. Owned by the main loop and passed down
//! explicitly.

use crate::domain::core::Rect;
use crate::ui::text::TextPainter;
use crate::ui::theme::Theme;

pub struct AppContext {
    pub screen: Rect,
    pub theme: Theme,
    pub font: Box<dyn TextPainter>,
}

impl AppContext {
    pub fn new(width: u32, height: u32, font: Box<dyn TextPainter>) -> Self {
        Self {
            screen: Rect::new(0, 0, width as i32, height as i32),
            theme: Theme::default(),
            font,
        }
    }

    /// Line height rounded up to whole pixels
    pub fn line_height(&self) -> i32 {
        self.font.line_height().ceil() as i32
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("screen", &self.screen)
            .field("line_height", &self.line_height())
            .finish_non_exhaustive()
    }
}
