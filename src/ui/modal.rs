//! Confirmation modal drawn over the bottom of the list
//!
//! [`ModalLayout`] fixes the panel geometry once, when a card is selected.
//! Each frame [`render_modal`] draws the panel at its animated vertical
//! offset and reports where the buttons ended up.

use tiny_skia::{IntRect, Pixmap, PixmapPaint, Transform};

use crate::domain::core::{Point, Rect};
use crate::ui::list_view::container_span;
use crate::ui::renderer::{draw_centered_text, fill_rect, fill_rounded_rect};
use crate::ui::text::TextPainter;
use crate::ui::theme::Theme;

pub const HEADER_LABEL: &str = "Archive this card?";
pub const UNDO_LABEL: &str = "Undo";
pub const DISMISS_LABEL: &str = "Dismiss";

const PANEL_PADDING: i32 = 15;
const HEADER_GAP: i32 = 10;
const BUTTON_GAP: i32 = 10;
const MIN_BUTTON_HEIGHT: i32 = 44;

/// Panel geometry relative to the panel's top edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModalLayout {
    pub screen_height: i32,
    pub panel_height: i32,
    /// Y of the panel top when fully shown
    pub resting_y: i32,
    pub header_offset: i32,
    pub header_height: i32,
    /// Offset of the card snapshot from the panel top
    pub card_offset: i32,
    /// Visible card height, capped so the buttons stay on screen
    pub card_height: i32,
    pub button_offset: i32,
    pub button_height: i32,
    pub undo_x: i32,
    pub dismiss_x: i32,
    pub button_width: i32,
}

impl ModalLayout {
    /// Sizes the panel around a card block of `card_height`
    ///
    /// A card taller than the room left between header and buttons is cut
    /// at the bottom. The buttons always end inside the screen.
    pub fn compute(screen_width: i32, screen_height: i32, card_height: i32, line_height: i32) -> Self {
        let header_offset = PANEL_PADDING;
        let header_height = line_height;
        let card_offset = header_offset + header_height + HEADER_GAP;
        let button_height = (line_height + 16).max(MIN_BUTTON_HEIGHT);

        let chrome = card_offset + PANEL_PADDING + button_height + PANEL_PADDING;
        let card_height = card_height.min(screen_height - chrome).max(0);
        let button_offset = card_offset + card_height + PANEL_PADDING;
        let panel_height = button_offset + button_height + PANEL_PADDING;

        let (x, width) = container_span(screen_width);
        let button_width = (width - BUTTON_GAP) / 2;

        Self {
            screen_height,
            panel_height,
            resting_y: (screen_height - panel_height).max(0),
            header_offset,
            header_height,
            card_offset,
            card_height,
            button_offset,
            button_height,
            undo_x: x,
            dismiss_x: x + width - button_width,
            button_width,
        }
    }

    /// Panel top while fully off-screen below the bottom edge
    pub fn hidden_y(&self) -> f32 {
        self.screen_height as f32
    }

    pub fn resting_y(&self) -> f32 {
        self.resting_y as f32
    }

    /// Card position inside the panel for a panel top at `top`
    pub fn card_position(&self, card_x: f32, top: f32) -> Point {
        Point::new(card_x, top + self.card_offset as f32)
    }

    pub fn undo_rect(&self, top: i32) -> Rect {
        Rect::new(self.undo_x, top + self.button_offset, self.button_width, self.button_height)
    }

    pub fn dismiss_rect(&self, top: i32) -> Rect {
        Rect::new(self.dismiss_x, top + self.button_offset, self.button_width, self.button_height)
    }
}

/// Button rectangles as drawn this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalHits {
    pub undo: Rect,
    pub dismiss: Rect,
}

/// Everything that changes between two frames of the modal
#[derive(Debug, Clone, Copy)]
pub struct ModalFrame<'a> {
    pub top: f32,
    pub card_image: &'a Pixmap,
    pub card_position: Point,
    pub dismiss_progress: f32,
}

/// Width of the remaining-time bar for a given dismiss progress
pub fn timer_width(button_width: i32, dismiss_progress: f32) -> i32 {
    let remaining = 1.0 - dismiss_progress.clamp(0.0, 1.0);
    (button_width as f32 * remaining).round() as i32
}

pub fn render_modal(
    pixmap: &mut Pixmap,
    painter: &dyn TextPainter,
    theme: &Theme,
    layout: &ModalLayout,
    frame: &ModalFrame<'_>,
) -> ModalHits {
    let top = frame.top.round() as i32;
    let width = pixmap.width() as i32;

    fill_rect(
        pixmap,
        Rect::new(0, top, width, layout.panel_height.max(layout.screen_height - top)),
        theme.panel_fill,
    );

    let header = Rect::new(0, top + layout.header_offset, width, layout.header_height);
    draw_centered_text(pixmap, painter, HEADER_LABEL, header, theme.header_text);

    let card_x = frame.card_position.x.round() as i32;
    let card_y = frame.card_position.y.round() as i32;
    let image = frame.card_image;
    if image.height() as i32 <= layout.card_height {
        pixmap.draw_pixmap(card_x, card_y, image.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    } else if let Some(clipped) = IntRect::from_xywh(0, 0, image.width(), layout.card_height as u32)
        .and_then(|rect| image.clone_rect(rect))
    {
        pixmap.draw_pixmap(card_x, card_y, clipped.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    }

    let undo = layout.undo_rect(top);
    fill_rounded_rect(pixmap, undo, theme.button_radius, theme.undo_fill);
    draw_centered_text(pixmap, painter, UNDO_LABEL, undo, theme.button_text);

    let dismiss = layout.dismiss_rect(top);
    fill_rounded_rect(pixmap, dismiss, theme.button_radius, theme.dismiss_fill);
    let remaining = timer_width(dismiss.w, frame.dismiss_progress);
    if remaining > 0 {
        let bar = Rect::new(dismiss.right() - remaining, dismiss.y, remaining, dismiss.h);
        fill_rounded_rect(pixmap, bar, theme.button_radius, theme.timer_fill);
    }
    draw_centered_text(pixmap, painter, DISMISS_LABEL, dismiss, theme.button_text);

    ModalHits { undo, dismiss }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::renderer::new_pixmap;
    use crate::ui::text::testing::BarPainter;
    use tiny_skia::Color;

    fn layout() -> ModalLayout {
        ModalLayout::compute(480, 320, 40, 20)
    }

    #[test]
    fn panel_rests_at_bottom() {
        let layout = layout();
        assert_eq!(layout.resting_y + layout.panel_height, 320);
        assert_eq!(layout.hidden_y(), 320.0);
        assert!(layout.card_offset > layout.header_offset);
        assert!(layout.button_offset >= layout.card_offset + 40);
    }

    #[test]
    fn tall_card_keeps_buttons_on_screen() {
        let layout = ModalLayout::compute(320, 480, 600, 20);
        assert_eq!(layout.resting_y, 0);
        assert!(layout.card_height < 600);
        assert_eq!(layout.panel_height, 480);
        assert!(layout.undo_rect(layout.resting_y).bottom() <= 480);
        assert!(layout.dismiss_rect(layout.resting_y).bottom() <= 480);
    }

    #[test]
    fn seven_line_card_on_small_screen_stays_reachable() {
        // Seven wrapped lines of a 33px font on a 480x320 display
        let layout = ModalLayout::compute(480, 320, 263, 33);
        assert!(layout.card_height < 263);
        for rect in [layout.undo_rect(layout.resting_y), layout.dismiss_rect(layout.resting_y)] {
            assert!(rect.y >= 0);
            assert!(rect.bottom() <= 320);
        }
    }

    #[test]
    fn short_card_is_not_cut() {
        let layout = layout();
        assert_eq!(layout.card_height, 40);
    }

    #[test]
    fn oversized_snapshot_is_clipped_above_buttons() {
        let painter = BarPainter::default();
        let theme = Theme::default();
        let layout = ModalLayout::compute(480, 320, 400, 20);
        let mut pixmap = new_pixmap(480, 320).unwrap();
        let mut card = new_pixmap(451, 400).unwrap();
        card.fill(Color::from_rgba8(40, 40, 40, 255));

        let top = layout.resting_y();
        let frame = ModalFrame {
            top,
            card_image: &card,
            card_position: layout.card_position(14.0, top),
            dismiss_progress: 0.0,
        };
        let hits = render_modal(&mut pixmap, &painter, &theme, &layout, &frame);
        assert!(hits.undo.bottom() <= 320);

        // Gap between the cut card and the buttons shows the panel
        let gap_y = (hits.undo.y - 5) as u32;
        let px = pixmap.pixel(20, gap_y).unwrap();
        assert_eq!(px.red(), theme.panel_fill.to_color_u8().red());
    }

    #[test]
    fn buttons_split_the_column() {
        let layout = layout();
        let undo = layout.undo_rect(100);
        let dismiss = layout.dismiss_rect(100);
        assert_eq!(undo.y, dismiss.y);
        assert_eq!(undo.w, dismiss.w);
        assert!(undo.right() < dismiss.x);
        assert_eq!(dismiss.right(), 14 + 451);
    }

    #[test]
    fn timer_shrinks_with_progress() {
        assert_eq!(timer_width(200, 0.0), 200);
        assert_eq!(timer_width(200, 0.25), 150);
        assert_eq!(timer_width(200, 1.0), 0);
        assert_eq!(timer_width(200, 3.0), 0);
    }

    #[test]
    fn render_reports_button_hits_at_offset() {
        let painter = BarPainter::default();
        let layout = layout();
        let mut pixmap = new_pixmap(480, 320).unwrap();
        let mut card = new_pixmap(451, 40).unwrap();
        card.fill(Color::from_rgba8(40, 40, 40, 255));

        let top = layout.resting_y();
        let frame = ModalFrame {
            top,
            card_image: &card,
            card_position: layout.card_position(14.0, top),
            dismiss_progress: 0.5,
        };
        let hits = render_modal(&mut pixmap, &painter, &Theme::default(), &layout, &frame);
        assert_eq!(hits.undo, layout.undo_rect(layout.resting_y));
        assert_eq!(hits.dismiss, layout.dismiss_rect(layout.resting_y));

        // Snapshot was blitted at the card position
        let card_y = (top as i32 + layout.card_offset + 2) as u32;
        let px = pixmap.pixel(20, card_y).unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (40, 40, 40));
    }

    #[test]
    fn timer_bar_is_right_anchored() {
        let painter = BarPainter {
            advance: 0.0,
            height: 0.0,
        };
        let theme = Theme::default();
        let layout = layout();
        let mut pixmap = new_pixmap(480, 320).unwrap();
        let card = new_pixmap(1, 1).unwrap();
        let top = layout.resting_y();
        let frame = ModalFrame {
            top,
            card_image: &card,
            card_position: Point::new(0.0, 0.0),
            dismiss_progress: 0.5,
        };
        let hits = render_modal(&mut pixmap, &painter, &theme, &layout, &frame);

        let mid_y = (hits.dismiss.y + hits.dismiss.h / 2) as u32;
        let timer = theme.timer_fill.to_color_u8();
        let base = theme.dismiss_fill.to_color_u8();

        let right = pixmap.pixel((hits.dismiss.right() - 20) as u32, mid_y).unwrap();
        let left = pixmap.pixel((hits.dismiss.x + 20) as u32, mid_y).unwrap();
        assert_eq!(right.red(), timer.red());
        assert_eq!(left.red(), base.red());
    }
}
