use thiserror::Error;

use crate::config::ConfigError;
use bb_compositor::AssetLoadError;
use bb_render::GpuInitError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Asset(#[from] AssetLoadError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to initialize renderer: {0}")]
    Gpu(#[from] GpuInitError),
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
