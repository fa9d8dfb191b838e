//! Core geometry types and interpolation helpers
//!
//! Pure types that work exclusively with screen pixels and have no
//! knowledge of the rendering backend or the display platform.

use std::time::Duration;

/// Rectangle in screen pixel coordinates
///
/// Hit-testing and layout both work on these integer rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Creates a new rectangle
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the right edge coordinate
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Returns the bottom edge coordinate
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Returns true if this rectangle contains the given point
    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Top-left corner as a floating point position
    pub fn origin(&self) -> Point {
        Point::new(self.x as f32, self.y as f32)
    }
}

/// Sub-pixel position used while a card is in motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `target`; see [`lerp`]
    pub fn lerp(self, target: Point, progress: f32) -> Point {
        Point::new(
            lerp(self.x, target.x, progress),
            lerp(self.y, target.y, progress),
        )
    }
}

/// Linear interpolation between `from` and `to`
///
/// Progress is clamped to `[0, 1]`. The end points are returned verbatim so
/// a finished animation lands exactly on its target.
pub fn lerp(from: f32, to: f32, progress: f32) -> f32 {
    let progress = clamp_progress(progress);
    if progress >= 1.0 {
        to
    } else if progress <= 0.0 {
        from
    } else {
        from + (to - from) * progress
    }
}

/// Clamps a progress value into `[0, 1]`, mapping NaN to 0
pub fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Fraction of `duration` covered between `started` and `now`
pub fn progress_between(started: Duration, now: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(started);
    clamp_progress((elapsed.as_secs_f64() / duration.as_secs_f64()) as f32)
}
