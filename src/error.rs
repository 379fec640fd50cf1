use thiserror::Error;

/// Errors surfaced by the viewer layers around the motion controller.
#[derive(Debug, Error)]
pub enum MockupError {
    #[error("config parse error: {0}")]
    ConfigToml(#[from] toml::de::Error),

    #[error("config parse error: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

pub type Result<T> = std::result::Result<T, MockupError>;
