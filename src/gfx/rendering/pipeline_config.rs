//! Pipeline configuration builders
//!
//! Every descriptor field is set explicitly in the constructor; the builder
//! methods only override. Nothing relies on a zeroed or `Default` descriptor.

use wgpu::*;

use crate::gfx::shaders::{ShaderProgram, ShaderStage};

/// Configuration for creating a render pipeline
pub struct PipelineConfig<'a> {
    pub label: &'a str,
    pub vertex: &'a ShaderProgram,
    pub fragment: &'a ShaderProgram,
    pub bind_group_layouts: Vec<&'a BindGroupLayout>,
    pub vertex_buffers: Vec<VertexBufferLayout<'static>>,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub multisample: MultisampleState,
    pub color_targets: Vec<Option<ColorTargetState>>,
}

impl<'a> PipelineConfig<'a> {
    /// Creates a config drawing triangle lists into one `target_format` target
    ///
    /// # Arguments
    /// * `label` - Debug label
    /// * `vertex` - Vertex stage program
    /// * `fragment` - Fragment stage program
    /// * `target_format` - Format of the single color target
    pub fn new(
        label: &'a str,
        vertex: &'a ShaderProgram,
        fragment: &'a ShaderProgram,
        target_format: TextureFormat,
    ) -> Self {
        Self {
            label,
            vertex,
            fragment,
            bind_group_layouts: Vec::new(),
            vertex_buffers: Vec::new(),
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: None,
            multisample: MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            color_targets: vec![Some(ColorTargetState {
                format: target_format,
                blend: Some(BlendState::ALPHA_BLENDING),
                write_mask: ColorWrites::ALL,
            })],
        }
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<&'a BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn with_vertex_buffers(mut self, buffers: Vec<VertexBufferLayout<'static>>) -> Self {
        self.vertex_buffers = buffers;
        self
    }

    /// Creates the render pipeline
    pub fn create(&self, device: &Device) -> RenderPipeline {
        debug_assert_eq!(self.vertex.stage, ShaderStage::Vertex);
        debug_assert_eq!(self.fragment.stage, ShaderStage::Fragment);

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", self.label)),
            bind_group_layouts: &self.bind_group_layouts,
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(self.label),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &self.vertex.module,
                entry_point: Some(self.vertex.entry_point()),
                buffers: &self.vertex_buffers,
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &self.fragment.module,
                entry_point: Some(self.fragment.entry_point()),
                targets: &self.color_targets,
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: self.primitive_topology,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: self.cull_mode,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: self.multisample,
            multiview: None,
            cache: None,
        })
    }
}

/// Configuration for creating a compute pipeline
pub struct ComputePipelineConfig<'a> {
    pub label: &'a str,
    pub program: &'a ShaderProgram,
    pub bind_group_layouts: Vec<&'a BindGroupLayout>,
}

impl<'a> ComputePipelineConfig<'a> {
    pub fn new(label: &'a str, program: &'a ShaderProgram) -> Self {
        Self {
            label,
            program,
            bind_group_layouts: Vec::new(),
        }
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<&'a BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    /// Creates the compute pipeline
    pub fn create(&self, device: &Device) -> ComputePipeline {
        debug_assert_eq!(self.program.stage, ShaderStage::Compute);

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", self.label)),
            bind_group_layouts: &self.bind_group_layouts,
            push_constant_ranges: &[],
        });

        device.create_compute_pipeline(&ComputePipelineDescriptor {
            label: Some(self.label),
            layout: Some(&pipeline_layout),
            module: &self.program.module,
            entry_point: Some(self.program.entry_point()),
            compilation_options: PipelineCompilationOptions::default(),
            cache: None,
        })
    }
}
