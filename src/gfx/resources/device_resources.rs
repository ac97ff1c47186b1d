//! Device resource set
//!
//! Everything the frame pipeline needs on the device, created once in a fixed
//! order. Each step runs inside a validation error scope so the first failure
//! is reported with the step that caused it and nothing after it is created.

use crate::error::{StartupError, StartupResult};
use crate::gfx::context::checked;
use crate::gfx::rendering::pipeline_config::{ComputePipelineConfig, PipelineConfig};
use crate::gfx::shaders::{
    load_program, ProgramBindings, FILL_TEXTURE_COMP, TEXTURED_QUAD_FRAG, TEXTURED_QUAD_VERT,
};
use crate::gfx::stages::{Palette, PaletteUniform};
use crate::wgpu_utils::UniformBuffer;
use crate::world::Cell;

use super::color_image::create_color_image;
use super::quad::{create_quad_buffer, QuadVertex};
use super::texture_resource::TextureResource;

/// Pipelines, buffers, the color image and their bind groups
pub struct DeviceResources {
    width: u32,
    height: u32,
    draw_pipeline: wgpu::RenderPipeline,
    compute_pipeline: wgpu::ComputePipeline,
    vertex_buffer: wgpu::Buffer,
    color_image: TextureResource,
    cell_buffer: wgpu::Buffer,
    staging_buffer: wgpu::Buffer,
    palette: UniformBuffer<PaletteUniform>,
    compute_bind_group: wgpu::BindGroup,
    draw_bind_group: wgpu::BindGroup,
}

impl DeviceResources {
    /// Creates the resource set for a `width` x `height` grid drawn into
    /// targets of `target_format`.
    ///
    /// # Errors
    /// [`StartupError::GridTooLarge`] when the grid exceeds the device's image
    /// or storage limits; [`StartupError::Creation`] naming the first step the
    /// device rejected.
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        palette: &Palette,
    ) -> StartupResult<Self> {
        if width == 0 || height == 0 {
            return Err(StartupError::Config(format!(
                "grid must be at least 1x1, got {}x{}",
                width, height
            )));
        }

        let limits = device.limits();
        let image_limit = limits.max_texture_dimension_2d;
        if width > image_limit || height > image_limit {
            return Err(StartupError::GridTooLarge {
                width,
                height,
                limit: image_limit,
            });
        }
        let cell_bytes = width as u64 * height as u64 * Cell::GPU_SIZE;
        if cell_bytes > limits.max_storage_buffer_binding_size as u64
            || cell_bytes > limits.max_buffer_size
        {
            return Err(StartupError::Creation {
                step: "cell buffer",
                message: format!(
                    "{} bytes exceeds the device storage binding limit of {}",
                    cell_bytes, limits.max_storage_buffer_binding_size
                ),
            });
        }

        let vertex_program = load_program(device, TEXTURED_QUAD_VERT, ProgramBindings::NONE)?;
        let fragment_program = load_program(
            device,
            TEXTURED_QUAD_FRAG,
            ProgramBindings {
                samplers: 1,
                ..ProgramBindings::NONE
            },
        )?;
        let compute_program = load_program(
            device,
            FILL_TEXTURE_COMP,
            ProgramBindings {
                storage_buffers: 1,
                storage_textures: 1,
                uniform_buffers: 1,
                ..ProgramBindings::NONE
            },
        )?;

        let missing_layout = |name: &str| StartupError::Creation {
            step: "bind group layout",
            message: format!("program '{}' declares no bindings", name),
        };
        let draw_layout = checked(device, "draw bind group layout", || {
            fragment_program.bind_group_layout(device)
        })?
        .ok_or_else(|| missing_layout(fragment_program.name))?;
        let compute_layout = checked(device, "compute bind group layout", || {
            compute_program.bind_group_layout(device)
        })?
        .ok_or_else(|| missing_layout(compute_program.name))?;
        log::debug!("created bind group layouts");

        let draw_pipeline = checked(device, "draw pipeline", || {
            PipelineConfig::new(
                "Composite Pipeline",
                &vertex_program,
                &fragment_program,
                target_format,
            )
            .with_bind_group_layouts(vec![&draw_layout])
            .with_vertex_buffers(vec![QuadVertex::desc()])
            .create(device)
        })?;
        log::debug!("created draw pipeline for {:?}", target_format);

        let compute_pipeline = checked(device, "compute pipeline", || {
            ComputePipelineConfig::new("Fill Pipeline", &compute_program)
                .with_bind_group_layouts(vec![&compute_layout])
                .create(device)
        })?;
        log::debug!("created compute pipeline");

        let vertex_buffer = checked(device, "vertex buffer", || create_quad_buffer(device))?;

        let color_image = checked(device, "color image", || {
            create_color_image(device, width, height)
        })?;
        log::debug!("created {}x{} color image", width, height);

        let cell_buffer = checked(device, "cell buffer", || {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Cell Buffer"),
                size: cell_bytes,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_DST
                    | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            })
        })?;
        let staging_buffer = checked(device, "staging buffer", || {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Cell Staging Buffer"),
                size: cell_bytes,
                usage: wgpu::BufferUsages::MAP_WRITE | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            })
        })?;
        log::debug!("created cell and staging buffers ({} bytes each)", cell_bytes);

        let palette = checked(device, "palette uniform", || {
            UniformBuffer::new_with_data(device, &palette.to_uniform())
        })?;

        let compute_bind_group = checked(device, "compute bind group", || {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Fill Bind Group"),
                layout: &compute_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: cell_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&color_image.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: palette.binding_resource(),
                    },
                ],
            })
        })?;
        let draw_bind_group = checked(device, "draw bind group", || {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Composite Bind Group"),
                layout: &draw_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&color_image.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&color_image.sampler),
                    },
                ],
            })
        })?;
        log::debug!("created bind groups");

        Ok(Self {
            width,
            height,
            draw_pipeline,
            compute_pipeline,
            vertex_buffer,
            color_image,
            cell_buffer,
            staging_buffer,
            palette,
            compute_bind_group,
            draw_bind_group,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn draw_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.draw_pipeline
    }

    pub fn compute_pipeline(&self) -> &wgpu::ComputePipeline {
        &self.compute_pipeline
    }

    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    pub fn color_image(&self) -> &TextureResource {
        &self.color_image
    }

    pub fn cell_buffer(&self) -> &wgpu::Buffer {
        &self.cell_buffer
    }

    pub fn staging_buffer(&self) -> &wgpu::Buffer {
        &self.staging_buffer
    }

    pub fn compute_bind_group(&self) -> &wgpu::BindGroup {
        &self.compute_bind_group
    }

    pub fn draw_bind_group(&self) -> &wgpu::BindGroup {
        &self.draw_bind_group
    }

    /// Writes new palette colors; returns false if nothing changed
    pub fn set_palette(&mut self, queue: &wgpu::Queue, palette: &Palette) -> bool {
        self.palette.update_content(queue, palette.to_uniform())
    }

    /// Releases every handle, dependents before what they depend on.
    ///
    /// Consumes the set, so it cannot run twice.
    pub fn teardown(self) {
        let Self {
            draw_pipeline,
            compute_pipeline,
            vertex_buffer,
            color_image,
            cell_buffer,
            staging_buffer,
            palette,
            compute_bind_group,
            draw_bind_group,
            ..
        } = self;

        drop(draw_bind_group);
        drop(compute_bind_group);
        palette.buffer().destroy();
        drop(palette);
        staging_buffer.destroy();
        cell_buffer.destroy();
        color_image.destroy();
        vertex_buffer.destroy();
        drop(compute_pipeline);
        drop(draw_pipeline);

        log::info!("released device resources");
    }
}
