//! Frame orchestration
//!
//! One frame is one command stream, recorded in a fixed order:
//!
//! 1. stage the grid snapshot and copy it into the cell buffer
//! 2. compute scope: fill kernel writes the color image
//! 3. render scope on the target: composite quad, then the overlay
//!
//! The device executes scopes in program order, so the composite always
//! samples the image written by this frame's dispatch.

use crate::error::{FrameError, FrameResult, StartupResult};
use crate::gfx::resources::DeviceResources;
use crate::gfx::stages::{composite, compute, upload, Palette};
use crate::world::Grid;

/// Draw commands appended to the frame's render scope after the background
/// quad.
///
/// The pass borrows the implementor for its whole lifetime, which is what
/// immediate-mode renderers that keep per-frame buffers need.
pub trait Overlay {
    fn record<'pass>(
        &'pass mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pass: &mut wgpu::RenderPass<'pass>,
    );
}

/// Device resources plus the palette currently uploaded to them
pub struct FramePipeline {
    resources: DeviceResources,
    palette: Palette,
}

impl FramePipeline {
    /// Creates the device resources for a `width` x `height` grid drawn into
    /// `target_format` targets, using the default palette.
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> StartupResult<Self> {
        let palette = Palette::default();
        let resources = DeviceResources::new(device, target_format, width, height, &palette)?;
        log::info!("frame pipeline ready for a {}x{} grid", width, height);
        Ok(Self { resources, palette })
    }

    pub fn resources(&self) -> &DeviceResources {
        &self.resources
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Uploads new palette colors for the next dispatch
    pub fn set_palette(&mut self, queue: &wgpu::Queue, palette: Palette) {
        if self.resources.set_palette(queue, &palette) {
            log::debug!("palette updated");
        }
        self.palette = palette;
    }

    /// Records one frame into `encoder`.
    ///
    /// Staging happens immediately; everything else is recorded and runs when
    /// the encoder is submitted.
    ///
    /// # Arguments
    /// * `device` - Device owning the resources
    /// * `queue` - Queue the overlay may write through
    /// * `encoder` - Command stream to record into
    /// * `grid` - World snapshot for this frame; must match the resource size
    /// * `target` - View the render scope draws to
    /// * `overlay` - Optional draw commands after the background quad
    pub fn record(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        grid: &Grid,
        target: &wgpu::TextureView,
        overlay: Option<&mut dyn Overlay>,
    ) -> FrameResult<()> {
        let resources = &self.resources;

        upload::stage(device, resources.staging_buffer(), grid.snapshot())?;
        upload::commit(encoder, resources.staging_buffer(), resources.cell_buffer());

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Fill Pass"),
                timestamp_writes: None,
            });
            compute::dispatch(
                &mut pass,
                resources.compute_pipeline(),
                resources.compute_bind_group(),
                resources.width(),
                resources.height(),
            );
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Composite Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(composite::CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        composite::draw(
            &mut pass,
            resources.draw_pipeline(),
            resources.vertex_buffer(),
            resources.draw_bind_group(),
        );
        if let Some(overlay) = overlay {
            overlay.record(device, queue, &mut pass);
        }

        Ok(())
    }

    /// Records and submits one frame, converting device validation failures
    /// into [`FrameError::Submission`].
    pub fn submit(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        grid: &Grid,
        target: &wgpu::TextureView,
        overlay: Option<&mut dyn Overlay>,
    ) -> FrameResult<()> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });
        let recorded = self.record(device, queue, &mut encoder, grid, target, overlay);
        if recorded.is_ok() {
            queue.submit(std::iter::once(encoder.finish()));
        }

        let scope = pollster::block_on(device.pop_error_scope());
        recorded?;
        match scope {
            Some(error) => Err(FrameError::Submission(error.to_string())),
            None => Ok(()),
        }
    }

    /// Releases the device resources
    pub fn teardown(self) {
        self.resources.teardown();
    }
}
