//! Display surfaces
//!
//! The main loop draws into a [`tiny_skia::Pixmap`] and hands it to a
//! [`DisplaySurface`]. On Windows that is a borderless fullscreen window;
//! tests use the scripted [`headless::HeadlessSurface`].

pub mod headless;
#[cfg(windows)]
pub mod window;

use tiny_skia::Pixmap;

pub use headless::HeadlessSurface;
#[cfg(windows)]
pub use window::FullscreenWindow;

/// Input delivered by a display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Touch or left click at screen coordinates
    PointerDown { x: i32, y: i32 },
    Escape,
    /// The window was closed
    Quit,
}

/// Errors raised by a display surface
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Failed to register window class")]
    ClassRegistrationFailed,

    #[error("Failed to create window")]
    WindowCreationFailed,

    #[error("Failed to get device context")]
    DeviceContextFailed,

    #[error("Failed to copy frame to the screen")]
    PresentFailed,

    #[error("Frame is {frame_width}x{frame_height} but the surface is {width}x{height}")]
    SizeMismatch {
        frame_width: u32,
        frame_height: u32,
        width: u32,
        height: u32,
    },
}

/// A fixed-resolution screen with pointer input
pub trait DisplaySurface {
    /// Width and height in pixels
    fn size(&self) -> (u32, u32);

    /// Drains the input received since the last call
    fn poll_events(&mut self) -> Result<Vec<SurfaceEvent>, SurfaceError>;

    /// Shows a complete frame
    fn present(&mut self, frame: &Pixmap) -> Result<(), SurfaceError>;
}

/// Rejects frames that do not match the surface size
pub(crate) fn check_frame_size(frame: &Pixmap, (width, height): (u32, u32)) -> Result<(), SurfaceError> {
    if frame.width() == width && frame.height() == height {
        Ok(())
    } else {
        Err(SurfaceError::SizeMismatch {
            frame_width: frame.width(),
            frame_height: frame.height(),
            width,
            height,
        })
    }
}
