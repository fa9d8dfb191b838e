//! Drawing primitives built on tiny-skia
//!
//! Rounded blocks, plain fills and the card block itself. The list view
//! and the card snapshot both go through [`draw_card_block`] so a snapshot
//! is pixel-identical to the card as it was drawn in the list.

use std::path::PathBuf;

use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Rect as SkiaRect, Transform};

use crate::domain::core::Rect;
use crate::domain::layout::{CARD_PADDING_X, CardBlock};
use crate::ui::text::TextPainter;
use crate::ui::theme::Theme;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to create {width}x{height} pixmap")]
    PixmapCreationFailed { width: u32, height: u32 },

    #[error("Failed to read font {path}: {source}")]
    FontRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("File {path} is not a usable TrueType font")]
    InvalidFont { path: PathBuf },
}

/// Allocates a transparent pixmap
pub fn new_pixmap(width: u32, height: u32) -> Result<Pixmap, RenderError> {
    Pixmap::new(width, height).ok_or(RenderError::PixmapCreationFailed { width, height })
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

/// Path of a rectangle with circular corners
///
/// The radius is reduced to fit small rectangles. Returns `None` for empty
/// rectangles.
pub fn rounded_rect_path(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Option<Path> {
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    // Cubic approximation of a quarter circle
    let k = r * 0.552_284_8;
    let (right, bottom) = (x + w, y + h);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.cubic_to(right - r + k, y, right, y + r - k, right, y + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.cubic_to(x + r - k, bottom, x, bottom - r + k, x, bottom - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.close();
    pb.finish()
}

pub fn fill_rounded_rect(pixmap: &mut Pixmap, rect: Rect, radius: f32, color: Color) {
    let path = rounded_rect_path(
        rect.x as f32,
        rect.y as f32,
        rect.w as f32,
        rect.h as f32,
        radius,
    );
    if let Some(path) = path {
        pixmap.fill_path(
            &path,
            &solid(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}

pub fn fill_rect(pixmap: &mut Pixmap, rect: Rect, color: Color) {
    if let Some(rect) = SkiaRect::from_xywh(rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32)
    {
        pixmap.fill_rect(rect, &solid(color), Transform::identity(), None);
    }
}

/// Draws one card: rounded dark block with its wrapped lines
pub fn draw_card_block(
    pixmap: &mut Pixmap,
    painter: &dyn TextPainter,
    theme: &Theme,
    block: &CardBlock,
    rect: Rect,
) {
    fill_rounded_rect(pixmap, rect, theme.card_radius, theme.card_fill);

    let text_x = (rect.x + CARD_PADDING_X) as f32;
    for (i, line) in block.lines.iter().enumerate() {
        let text_y = (rect.y + block.line_offset(i)) as f32;
        painter.draw_text(pixmap, line, text_x, text_y, theme.card_text);
    }
}

/// Renders a card on its own transparent pixmap, origin at its top-left
pub fn render_card_snapshot(
    painter: &dyn TextPainter,
    theme: &Theme,
    block: &CardBlock,
    width: i32,
) -> Result<Pixmap, RenderError> {
    let mut pixmap = new_pixmap(width.max(1) as u32, block.height.max(1) as u32)?;
    draw_card_block(
        &mut pixmap,
        painter,
        theme,
        block,
        Rect::new(0, 0, width, block.height),
    );
    Ok(pixmap)
}

/// Draws text centred inside `rect`
pub fn draw_centered_text(
    pixmap: &mut Pixmap,
    painter: &dyn TextPainter,
    text: &str,
    rect: Rect,
    color: Color,
) {
    let x = rect.x as f32 + (rect.w as f32 - painter.text_width(text)) / 2.0;
    let y = rect.y as f32 + (rect.h as f32 - painter.line_height()) / 2.0;
    painter.draw_text(pixmap, text, x, y, color);
}
