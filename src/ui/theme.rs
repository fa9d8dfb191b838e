//! Colours and corner radii shared by the list and the modal

use tiny_skia::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub card_fill: Color,
    pub card_text: Color,
    pub card_radius: f32,
    pub panel_fill: Color,
    pub header_text: Color,
    pub undo_fill: Color,
    pub dismiss_fill: Color,
    /// Remaining-time bar drawn over the Dismiss button
    pub timer_fill: Color,
    pub button_text: Color,
    pub button_radius: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(0, 0, 0, 255),
            card_fill: Color::from_rgba8(40, 40, 40, 255),
            card_text: Color::from_rgba8(240, 240, 240, 255),
            card_radius: 12.0,
            panel_fill: Color::from_rgba8(20, 20, 24, 255),
            header_text: Color::from_rgba8(200, 200, 200, 255),
            undo_fill: Color::from_rgba8(60, 60, 66, 255),
            dismiss_fill: Color::from_rgba8(90, 36, 36, 255),
            timer_fill: Color::from_rgba8(170, 60, 60, 255),
            button_text: Color::from_rgba8(245, 245, 245, 255),
            button_radius: 10.0,
        }
    }
}
