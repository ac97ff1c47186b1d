//! # Error Types
//!
//! Failure taxonomy for the cell world and its device pipeline.
//!
//! - [`WorldError`] - rejected grid access; the grid is left untouched
//! - [`StartupError`] - any device or resource creation step failed; fatal,
//!   the frame loop is never entered
//! - [`AppError`] - what [`crate::PixelSandApp::run`] reports when it stops
//!   on a fatal error
//! - [`FrameError`] - a single frame could not be produced; see
//!   [`FrameError::is_recoverable`] for which ones skip the frame and which
//!   stop the application
//!
//! Creation paths return these explicitly and the caller checks them
//! immediately. Device validation failures are captured with wgpu error
//! scopes and converted here rather than surfacing through the uncaptured
//! error handler.

use thiserror::Error;

/// Grid access outside `[0, width) x [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Fatal failure while bringing up the window, device or any GPU resource.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create presentation surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("presentation surface reports no supported formats on this adapter")]
    SurfaceUnsupported,

    #[error("no suitable graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("unknown shader program '{0}'")]
    UnknownShader(String),

    #[error("shader program '{name}' has no recognizable stage suffix")]
    InvalidShaderStage { name: String },

    #[error("grid {width}x{height} exceeds the device image limit of {limit}")]
    GridTooLarge { width: u32, height: u32, limit: u32 },

    #[error("creating {step} failed: {message}")]
    Creation { step: &'static str, message: String },
}

/// Failure while producing one frame.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The surface image could not be acquired. Expected transiently while a
    /// resize is in flight.
    #[error("failed to acquire surface image: {0}")]
    Acquire(wgpu::SurfaceError),

    #[error("failed to map staging region: {0}")]
    Staging(#[from] wgpu::BufferAsyncError),

    #[error("staging region mapping was abandoned before completing")]
    StagingAbandoned,

    #[error("grid snapshot is {actual} bytes but the staging region holds {expected}")]
    SnapshotSize { expected: u64, actual: u64 },

    #[error("device rejected the frame's command stream: {0}")]
    Submission(String),
}

impl FrameError {
    /// Whether the frame loop may continue with the next tick.
    ///
    /// Only surface acquisition failures are absorbed; a partially recorded
    /// command stream has no rollback path.
    pub fn is_recoverable(&self) -> bool {
        match self {
            FrameError::Acquire(wgpu::SurfaceError::OutOfMemory) => false,
            FrameError::Acquire(_) => true,
            FrameError::Staging(_)
            | FrameError::StagingAbandoned
            | FrameError::SnapshotSize { .. }
            | FrameError::Submission(_) => false,
        }
    }
}

/// Reason the application stopped with a failure.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

pub type StartupResult<T> = Result<T, StartupError>;
pub type FrameResult<T> = Result<T, FrameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_failures_are_recoverable() {
        assert!(FrameError::Acquire(wgpu::SurfaceError::Timeout).is_recoverable());
        assert!(FrameError::Acquire(wgpu::SurfaceError::Outdated).is_recoverable());
        assert!(FrameError::Acquire(wgpu::SurfaceError::Lost).is_recoverable());
        assert!(!FrameError::Acquire(wgpu::SurfaceError::OutOfMemory).is_recoverable());
    }

    #[test]
    fn test_submission_failures_are_fatal() {
        assert!(!FrameError::Submission("validation".into()).is_recoverable());
        assert!(!FrameError::StagingAbandoned.is_recoverable());
    }

    #[test]
    fn test_out_of_bounds_message() {
        let err = WorldError::OutOfBounds {
            x: 4,
            y: 0,
            width: 4,
            height: 4,
        };
        assert_eq!(err.to_string(), "cell (4, 0) is outside the 4x4 grid");
    }
}
