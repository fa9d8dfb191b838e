//! Top-level error type
//!
//! Each layer has its own error enum; this one only gathers them for `main`.

use crate::config::ConfigError;
use crate::platform::SurfaceError;
use crate::service::ServiceError;
use crate::ui::renderer::RenderError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("List service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Display error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("No display backend is available on this platform")]
    NoDisplayBackend,
}
