//! PixelSand
//!
//! A 2D cell world rendered on the GPU: a CPU-owned grid of materials is
//! uploaded every frame, colored by a compute kernel and drawn as a
//! full-window quad with a Dear ImGui debug overlay, built on wgpu and winit.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod input;
pub mod performance;
pub mod ui;
pub mod wgpu_utils;
pub mod world;

pub use app::PixelSandApp;
pub use config::AppConfig;
pub use error::{AppError, FrameError, StartupError, WorldError};

/// Creates an application with the default configuration and environment
/// overrides applied
pub fn default() -> Result<PixelSandApp, AppError> {
    PixelSandApp::new(AppConfig::from_env())
}
