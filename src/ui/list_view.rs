//! List view: every card as a stacked rounded block
//!
//! Layout is computed separately from drawing, so hit-testing and tests
//! can use it without touching a pixmap.

use tiny_skia::Pixmap;

use crate::domain::core::Rect;
use crate::domain::layout::{CardBlock, FontMetrics};
use crate::domain::{Card, CardId, CardStore};
use crate::ui::renderer::draw_card_block;
use crate::ui::text::TextPainter;
use crate::ui::theme::Theme;

/// Y of the first card
pub const LIST_TOP: i32 = 15;
/// Vertical gap between cards
pub const CARD_SPACING: i32 = 10;
/// Share of the screen width used by the card column
pub const CONTAINER_RATIO: f32 = 0.94;

/// Horizontal placement of the card column for a given screen width
pub fn container_span(screen_width: i32) -> (i32, i32) {
    let width = (screen_width as f32 * CONTAINER_RATIO) as i32;
    ((screen_width - width) / 2, width)
}

/// Where a card was drawn this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardHit {
    pub rect: Rect,
    /// Position of the card in the store
    pub index: usize,
    pub id: CardId,
    pub text: String,
}

impl CardHit {
    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }
}

/// Positions every card except `excluded`, top to bottom
pub fn layout_list<M: FontMetrics + ?Sized>(
    cards: &[Card],
    excluded: Option<&CardId>,
    screen_width: i32,
    metrics: &M,
) -> Vec<(CardHit, CardBlock)> {
    let (x, width) = container_span(screen_width);
    let mut y = LIST_TOP;
    let mut placed = Vec::with_capacity(cards.len());

    for (index, card) in cards.iter().enumerate() {
        if excluded.is_some_and(|id| !card.is_placeholder() && *id == card.id) {
            continue;
        }
        let block = CardBlock::layout(&card.text, width, metrics);
        let hit = CardHit {
            rect: Rect::new(x, y, width, block.height),
            index,
            id: card.id.clone(),
            text: card.text.clone(),
        };
        y += block.height + CARD_SPACING;
        placed.push((hit, block));
    }

    placed
}

/// Draws the list and returns the rectangles for hit-testing
///
/// Cards that start below the bottom of the screen are not drawn.
pub fn render_list(
    pixmap: &mut Pixmap,
    painter: &dyn TextPainter,
    theme: &Theme,
    store: &CardStore,
    excluded: Option<&CardId>,
) -> Vec<CardHit> {
    let screen_height = pixmap.height() as i32;
    layout_list(store.cards(), excluded, pixmap.width() as i32, painter)
        .into_iter()
        .filter(|(hit, _)| hit.rect.y < screen_height)
        .map(|(hit, block)| {
            draw_card_block(pixmap, painter, theme, &block, hit.rect);
            hit
        })
        .collect()
}

/// Topmost card under the pointer
pub fn hit_test(hits: &[CardHit], x: i32, y: i32) -> Option<&CardHit> {
    hits.iter().find(|hit| hit.rect.contains_point(x, y))
}
