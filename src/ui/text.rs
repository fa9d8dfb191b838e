//! Glyph rasterisation with ab_glyph
//!
//! Text is drawn straight into the frame pixmap. Each glyph outline is
//! rasterised to coverage values which are blended source-over onto the
//! premultiplied pixels.

use std::path::Path;

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use tiny_skia::{Color, Pixmap, PremultipliedColorU8};

use crate::domain::layout::FontMetrics;
use crate::ui::renderer::RenderError;

/// Something that can measure and draw a single line of text
pub trait TextPainter: FontMetrics {
    /// Draws `text` with its line box's top-left corner at (`x`, `y`)
    fn draw_text(&self, pixmap: &mut Pixmap, text: &str, x: f32, y: f32, color: Color);
}

/// TrueType font at a fixed pixel size
pub struct GlyphFont {
    font: FontVec,
    scale: PxScale,
}

impl std::fmt::Debug for GlyphFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphFont")
            .field("scale", &self.scale.y)
            .finish_non_exhaustive()
    }
}

impl GlyphFont {
    pub fn from_file(path: &Path, size: f32) -> Result<Self, RenderError> {
        let data = std::fs::read(path).map_err(|source| RenderError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data, size).map_err(|_| RenderError::InvalidFont {
            path: path.to_path_buf(),
        })
    }

    pub fn from_bytes(data: Vec<u8>, size: f32) -> Result<Self, ab_glyph::InvalidFont> {
        Ok(Self {
            font: FontVec::try_from_vec(data)?,
            scale: PxScale::from(size),
        })
    }

    /// Glyph ids for `text` paired with their x offset from the line start
    fn positioned(&self, text: &str) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = self.font.as_scaled(self.scale);
        let mut caret = 0.0;
        let mut previous: Option<GlyphId> = None;
        let mut glyphs = Vec::with_capacity(text.len());

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            glyphs.push((id, caret));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        (glyphs, caret)
    }
}

impl FontMetrics for GlyphFont {
    fn text_width(&self, text: &str) -> f32 {
        self.positioned(text).1
    }

    fn line_height(&self) -> f32 {
        self.font.as_scaled(self.scale).height()
    }
}

impl TextPainter for GlyphFont {
    fn draw_text(&self, pixmap: &mut Pixmap, text: &str, x: f32, y: f32, color: Color) {
        let baseline = y + self.font.as_scaled(self.scale).ascent();
        let (glyphs, _) = self.positioned(text);

        for (id, offset) in glyphs {
            let glyph = id.with_scale_and_position(self.scale, point(x + offset, baseline));
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue; // whitespace
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                blend_pixel(
                    pixmap,
                    bounds.min.x as i32 + gx as i32,
                    bounds.min.y as i32 + gy as i32,
                    color,
                    coverage,
                );
            });
        }
    }
}

/// Source-over blend of `color` at `coverage` onto one pixel
pub(crate) fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: Color, coverage: f32) {
    let (width, height) = (pixmap.width() as i32, pixmap.height() as i32);
    if x < 0 || y < 0 || x >= width || y >= height {
        return;
    }

    let alpha = (coverage.clamp(0.0, 1.0) * color.alpha()).clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }

    let index = (y * width + x) as usize;
    let pixels = pixmap.pixels_mut();
    let dst = pixels[index];
    let keep = 1.0 - alpha;

    let channel = |src: f32, dst: u8| (src * alpha * 255.0 + dst as f32 * keep).round();
    let a = (alpha * 255.0 + dst.alpha() as f32 * keep).round().min(255.0) as u8;
    let r = channel(color.red(), dst.red()).min(a as f32) as u8;
    let g = channel(color.green(), dst.green()).min(a as f32) as u8;
    let b = channel(color.blue(), dst.blue()).min(a as f32) as u8;

    if let Some(blended) = PremultipliedColorU8::from_rgba(r, g, b, a) {
        pixels[index] = blended;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Fixed-advance painter that draws each line as a solid bar
    ///
    /// Lets renderer tests check geometry and pixels without a font file.
    pub(crate) struct BarPainter {
        pub advance: f32,
        pub height: f32,
    }

    impl Default for BarPainter {
        fn default() -> Self {
            Self {
                advance: 10.0,
                height: 20.0,
            }
        }
    }

    impl FontMetrics for BarPainter {
        fn text_width(&self, text: &str) -> f32 {
            text.chars().count() as f32 * self.advance
        }

        fn line_height(&self) -> f32 {
            self.height
        }
    }

    impl TextPainter for BarPainter {
        fn draw_text(&self, pixmap: &mut Pixmap, text: &str, x: f32, y: f32, color: Color) {
            let width = self.text_width(text) as i32;
            for py in y as i32..(y + self.height) as i32 {
                for px in x as i32..x as i32 + width {
                    blend_pixel(pixmap, px, py, color, 1.0);
                }
            }
        }
    }
}
