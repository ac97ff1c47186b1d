//! Window-bound frame orchestrator
//!
//! Owns the presentation surface and drives one [`FramePipeline`] frame per
//! tick against the acquired surface image.

use std::sync::Arc;

use winit::window::Window;

use crate::config::{self, AppConfig};
use crate::error::{FrameError, FrameResult, StartupError, StartupResult};
use crate::gfx::context::GpuContext;
use crate::gfx::stages::Palette;
use crate::world::Grid;

use super::frame::{FramePipeline, Overlay};

/// Surface, device and frame pipeline for one window
///
/// The color image is sized to the grid, not the surface; resizing only
/// reconfigures the surface and the quad stretches to cover it.
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    context: GpuContext,
    config: wgpu::SurfaceConfiguration,
    frame: FramePipeline,
}

impl RenderEngine {
    /// Creates the surface for `window`, opens a compatible device and builds
    /// the frame pipeline for the configured grid.
    ///
    /// # Errors
    /// Any failure creating the surface, device or device resources.
    pub async fn new(window: Arc<Window>, app_config: &AppConfig) -> StartupResult<Self> {
        let size = window.inner_size();
        let instance = GpuContext::create_instance();
        let surface = instance.create_surface(window)?;
        let context = GpuContext::new(&instance, Some(&surface)).await?;

        let capabilities = surface.get_capabilities(&context.adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .ok_or(StartupError::SurfaceUnsupported)?;
        let alpha_mode = if capabilities
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::Opaque)
        {
            wgpu::CompositeAlphaMode::Opaque
        } else {
            capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: app_config.present_mode(),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &config);
        log::info!(
            "configured {}x{} surface ({:?}, {:?})",
            config.width,
            config.height,
            format,
            config.present_mode
        );

        let frame = FramePipeline::new(
            &context.device,
            format,
            app_config.grid_width,
            app_config.grid_height,
        )?;

        Ok(Self {
            surface,
            context,
            config,
            frame,
        })
    }

    /// Renders one frame of `grid` with an optional overlay and presents it.
    ///
    /// # Errors
    /// [`FrameError::Acquire`] when no surface image is available; the surface
    /// is reconfigured first if it was lost or outdated. Any other error is
    /// from recording or submission.
    pub fn render_frame(&mut self, grid: &Grid, overlay: Option<&mut dyn Overlay>) -> FrameResult<()> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => {
                if matches!(err, wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) {
                    self.surface.configure(&self.context.device, &self.config);
                }
                return Err(FrameError::Acquire(err));
            }
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.frame.submit(
            &self.context.device,
            &self.context.queue,
            grid,
            &view,
            overlay,
        )?;
        surface_texture.present();
        Ok(())
    }

    /// Reconfigures the surface; zero sizes (minimized windows) are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.context.device, &self.config);
        log::debug!("surface resized to {}x{}", width, height);
    }

    pub fn vsync(&self) -> bool {
        config::is_vsync(self.config.present_mode)
    }

    /// Switches presentation between vsync and uncapped and reconfigures
    pub fn set_vsync(&mut self, enabled: bool) {
        self.config.present_mode = config::present_mode_for(enabled);
        self.surface.configure(&self.context.device, &self.config);
        log::info!("vsync {}", if enabled { "on" } else { "off" });
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.frame.set_palette(&self.context.queue, palette);
    }

    pub fn palette(&self) -> &Palette {
        self.frame.palette()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.context.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.context.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current surface size in pixels
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Grid size the device resources were created for
    pub fn grid_size(&self) -> (u32, u32) {
        let resources = self.frame.resources();
        (resources.width(), resources.height())
    }

    /// Waits for the device to go idle, then releases every resource
    pub fn teardown(self) {
        if let Err(err) = self.context.device.poll(wgpu::PollType::Wait) {
            log::warn!("device did not go idle before teardown: {}", err);
        }
        self.frame.teardown();
        drop(self.surface);
        log::info!("render engine shut down");
    }
}
