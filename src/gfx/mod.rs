//! # Graphics Module
//!
//! Device side of the cell world: every frame uploads the grid, runs a
//! compute kernel that turns cells into colors, and draws the result as a
//! full-target quad.
//!
//! ## Architecture Overview
//!
//! - **Context** ([`context`]) - Adapter, device and queue, windowed or headless
//! - **Shaders** ([`shaders`]) - WGSL programs addressed by logical name
//! - **Resources** ([`resources`]) - Pipelines, buffers, the color image
//! - **Stages** ([`stages`]) - Upload, compute and composite steps of a frame
//! - **Rendering** ([`rendering`]) - Frame recording and presentation
//! - **Readback** ([`readback`]) - Downloads for inspecting device contents
//!
//! ## Usage
//!
//! ```no_run
//! use pixelsand::gfx::{context::GpuContext, rendering::FramePipeline};
//! use pixelsand::world::Grid;
//!
//! let ctx = GpuContext::headless()?;
//! let pipeline = FramePipeline::new(&ctx.device, wgpu::TextureFormat::Rgba8Unorm, 64, 32)?;
//! let grid = Grid::new(64, 32);
//! # let target = ctx.device.create_texture(&wgpu::TextureDescriptor {
//! #     label: None,
//! #     size: wgpu::Extent3d { width: 64, height: 32, depth_or_array_layers: 1 },
//! #     mip_level_count: 1,
//! #     sample_count: 1,
//! #     dimension: wgpu::TextureDimension::D2,
//! #     format: wgpu::TextureFormat::Rgba8Unorm,
//! #     usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
//! #     view_formats: &[],
//! # });
//! # let view = target.create_view(&wgpu::TextureViewDescriptor::default());
//! pipeline.submit(&ctx.device, &ctx.queue, &grid, &view, None)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod context;
pub mod readback;
pub mod rendering;
pub mod resources;
pub mod shaders;
pub mod stages;

pub use context::GpuContext;
pub use rendering::{FramePipeline, Overlay, RenderEngine};
