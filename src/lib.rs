// Re-export all public modules so they can be used from main.rs
pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

// Browser entry point: canvas, listeners and the requestAnimationFrame loop
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{MotionConfig, MotionProfile, ViewerConfig};
pub use controller::{FrameLoop, InteractionEvent, Mode, MotionController, SceneRenderer};
pub use error::{MockupError, Result};
pub use model::{Camera, ModelBounds, OrbitState};
