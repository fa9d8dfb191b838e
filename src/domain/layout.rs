//! Word wrapping and card block sizing
//!
//! Layout is kept apart from drawing so it can be exercised without a font
//! file or a pixmap. Anything that can measure a string implements
//! [`FontMetrics`].

/// Text measurement used by the layout engine
pub trait FontMetrics {
    /// Rendered width of `text` in pixels
    fn text_width(&self, text: &str) -> f32;

    /// Height of a single line of text in pixels
    fn line_height(&self) -> f32;
}

/// Padding between a card's edge and its text, left and right
pub const CARD_PADDING_X: i32 = 15;
/// Padding between a card's edge and its text, top and bottom
pub const CARD_PADDING_Y: i32 = 10;
/// Extra space between consecutive wrapped lines
pub const LINE_SPACING: i32 = 2;

/// Wrapped text and the pixel height of the block that holds it
#[derive(Debug, Clone, PartialEq)]
pub struct CardBlock {
    pub lines: Vec<String>,
    pub line_height: i32,
    pub height: i32,
}

impl CardBlock {
    /// Lays out `text` for a card of total width `block_width`
    pub fn layout<M: FontMetrics + ?Sized>(text: &str, block_width: i32, metrics: &M) -> Self {
        let inner_width = (block_width - 2 * CARD_PADDING_X).max(0) as f32;
        let lines = wrap_text(text, inner_width, metrics);
        let line_height = metrics.line_height().ceil() as i32;
        let height = block_height(lines.len(), line_height);
        Self {
            lines,
            line_height,
            height,
        }
    }

    /// Vertical offset of line `index` relative to the block's top edge
    pub fn line_offset(&self, index: usize) -> i32 {
        CARD_PADDING_Y + index as i32 * (self.line_height + LINE_SPACING)
    }
}

/// Total height for `line_count` lines including padding
pub fn block_height(line_count: usize, line_height: i32) -> i32 {
    let line_count = line_count.max(1) as i32;
    line_count * line_height + (line_count - 1) * LINE_SPACING + 2 * CARD_PADDING_Y
}

/// Greedy word wrap
///
/// Words are added to the current line while the line still fits in
/// `max_width`. A word wider than `max_width` is placed on a line of its own
/// and never split. Text without words yields a single empty line.
pub fn wrap_text<M: FontMetrics + ?Sized>(text: &str, max_width: f32, metrics: &M) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if metrics.text_width(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    lines.push(current);
    lines
}
