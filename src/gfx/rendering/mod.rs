//! Frame recording and presentation
//!
//! Pipeline builders, the per-frame command stream and the window-bound
//! engine that presents it.

pub mod frame;
pub mod pipeline_config;
pub mod render_engine;

pub use frame::{FramePipeline, Overlay};
pub use pipeline_config::{ComputePipelineConfig, PipelineConfig};
pub use render_engine::RenderEngine;
