//! Shader program loading
//!
//! Programs are addressed by a logical name whose suffix selects the stage
//! (`.vert`, `.frag`, `.comp`). The caller states how many resources of each
//! kind the program binds; the bind group layout is derived from those counts
//! in a fixed binding order, which the WGSL sources follow:
//!
//! 1. sampled textures, each immediately followed by its sampler
//! 2. read-only storage buffers
//! 3. write-only storage textures
//! 4. uniform buffers

use crate::error::{StartupError, StartupResult};
use crate::gfx::context::checked;
use crate::gfx::resources::color_image::COLOR_IMAGE_FORMAT;
use crate::wgpu_utils::binding_types;

pub const TEXTURED_QUAD_VERT: &str = "textured_quad.vert";
pub const TEXTURED_QUAD_FRAG: &str = "textured_quad.frag";
pub const FILL_TEXTURE_COMP: &str = "fill_texture.comp";

const PROGRAMS: &[(&str, &str)] = &[
    (TEXTURED_QUAD_VERT, include_str!("textured_quad.vert.wgsl")),
    (TEXTURED_QUAD_FRAG, include_str!("textured_quad.frag.wgsl")),
    (FILL_TEXTURE_COMP, include_str!("fill_texture.comp.wgsl")),
];

/// Pipeline stage a program runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

impl ShaderStage {
    /// Stage implied by a program name's suffix
    pub fn from_program_name(name: &str) -> Option<Self> {
        if name.ends_with(".vert") {
            Some(ShaderStage::Vertex)
        } else if name.ends_with(".frag") {
            Some(ShaderStage::Fragment)
        } else if name.ends_with(".comp") {
            Some(ShaderStage::Compute)
        } else {
            None
        }
    }

    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
            ShaderStage::Compute => "cs_main",
        }
    }

    pub fn visibility(self) -> wgpu::ShaderStages {
        match self {
            ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderStage::Fragment => wgpu::ShaderStages::FRAGMENT,
            ShaderStage::Compute => wgpu::ShaderStages::COMPUTE,
        }
    }
}

/// Number of resources of each kind a program binds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramBindings {
    pub samplers: u32,
    pub uniform_buffers: u32,
    pub storage_buffers: u32,
    pub storage_textures: u32,
}

impl ProgramBindings {
    pub const NONE: ProgramBindings = ProgramBindings {
        samplers: 0,
        uniform_buffers: 0,
        storage_buffers: 0,
        storage_textures: 0,
    };

    /// Total number of binding slots, counting texture and sampler separately
    pub fn slot_count(&self) -> u32 {
        self.samplers * 2 + self.storage_buffers + self.storage_textures + self.uniform_buffers
    }

    /// Layout entries in canonical binding order
    pub fn layout_entries(&self, visibility: wgpu::ShaderStages) -> Vec<wgpu::BindGroupLayoutEntry> {
        let mut entries = Vec::with_capacity(self.slot_count() as usize);
        let mut binding = 0;
        let mut push = |ty: wgpu::BindingType| {
            entries.push(binding_types::entry(binding, visibility, ty));
            binding += 1;
        };

        for _ in 0..self.samplers {
            push(binding_types::texture_2d());
            push(binding_types::sampler(wgpu::SamplerBindingType::Filtering));
        }
        for _ in 0..self.storage_buffers {
            push(binding_types::storage_buffer_read_only());
        }
        for _ in 0..self.storage_textures {
            push(binding_types::image_2d(
                COLOR_IMAGE_FORMAT,
                wgpu::StorageTextureAccess::WriteOnly,
            ));
        }
        for _ in 0..self.uniform_buffers {
            push(binding_types::uniform());
        }

        entries
    }
}

/// A compiled shader module with its stage and binding counts
pub struct ShaderProgram {
    pub name: &'static str,
    pub stage: ShaderStage,
    pub bindings: ProgramBindings,
    pub module: wgpu::ShaderModule,
}

impl ShaderProgram {
    pub fn entry_point(&self) -> &'static str {
        self.stage.entry_point()
    }

    /// Bind group layout for group 0, or `None` if the program binds nothing
    pub fn bind_group_layout(&self, device: &wgpu::Device) -> Option<wgpu::BindGroupLayout> {
        if self.bindings.slot_count() == 0 {
            return None;
        }
        let entries = self.bindings.layout_entries(self.stage.visibility());
        Some(
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{} Layout", self.name)),
                entries: &entries,
            }),
        )
    }
}

/// WGSL source for a logical program name
pub fn program_source(name: &str) -> Option<(&'static str, &'static str)> {
    PROGRAMS
        .iter()
        .find(|(program, _)| *program == name)
        .copied()
}

/// Compiles the named program
///
/// # Arguments
/// * `device` - Device to compile on
/// * `name` - Logical program name, e.g. [`FILL_TEXTURE_COMP`]
/// * `bindings` - Resource counts the program declares
///
/// # Errors
/// Unknown names, names without a stage suffix, and WGSL that fails
/// validation all return a [`StartupError`].
pub fn load_program(
    device: &wgpu::Device,
    name: &str,
    bindings: ProgramBindings,
) -> StartupResult<ShaderProgram> {
    let (name, source) =
        program_source(name).ok_or_else(|| StartupError::UnknownShader(name.to_string()))?;
    let stage = ShaderStage::from_program_name(name).ok_or_else(|| {
        StartupError::InvalidShaderStage {
            name: name.to_string(),
        }
    })?;

    let module = checked(device, "shader module", || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(name),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    })?;
    log::debug!("loaded {:?} program '{}'", stage, name);

    Ok(ShaderProgram {
        name,
        stage,
        bindings,
        module,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_from_suffix() {
        assert_eq!(
            ShaderStage::from_program_name(TEXTURED_QUAD_VERT),
            Some(ShaderStage::Vertex)
        );
        assert_eq!(
            ShaderStage::from_program_name(TEXTURED_QUAD_FRAG),
            Some(ShaderStage::Fragment)
        );
        assert_eq!(
            ShaderStage::from_program_name(FILL_TEXTURE_COMP),
            Some(ShaderStage::Compute)
        );
        assert_eq!(ShaderStage::from_program_name("textured_quad"), None);
    }

    #[test]
    fn test_every_program_has_source() {
        for name in [TEXTURED_QUAD_VERT, TEXTURED_QUAD_FRAG, FILL_TEXTURE_COMP] {
            let (_, source) = program_source(name).unwrap();
            let entry = ShaderStage::from_program_name(name).unwrap().entry_point();
            assert!(source.contains(&format!("fn {}", entry)), "{} lacks {}", name, entry);
        }
        assert!(program_source("missing.comp").is_none());
    }

    #[test]
    fn test_fill_kernel_cell_count_matches_materials() {
        let (_, source) = program_source(FILL_TEXTURE_COMP).unwrap();
        let declared = source
            .lines()
            .find_map(|line| line.trim().strip_prefix("const CELL_COUNT: u32 = "))
            .and_then(|rest| rest.trim_end_matches(';').strip_suffix('u'))
            .and_then(|count| count.parse::<usize>().ok());
        assert_eq!(declared, Some(crate::world::Cell::COUNT));
        assert!(!source.contains("2u)"), "material clamp must use CELL_COUNT");
    }

    #[test]
    fn test_fill_kernel_layout_order() {
        let bindings = ProgramBindings {
            storage_buffers: 1,
            storage_textures: 1,
            uniform_buffers: 1,
            ..ProgramBindings::NONE
        };
        let entries = bindings.layout_entries(wgpu::ShaderStages::COMPUTE);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].ty, binding_types::storage_buffer_read_only());
        assert_eq!(
            entries[1].ty,
            binding_types::image_2d(COLOR_IMAGE_FORMAT, wgpu::StorageTextureAccess::WriteOnly)
        );
        assert_eq!(entries[2].ty, binding_types::uniform());
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.binding, i as u32);
        }
    }

    #[test]
    fn test_sampler_counts_two_slots() {
        let bindings = ProgramBindings {
            samplers: 1,
            ..ProgramBindings::NONE
        };
        let entries = bindings.layout_entries(wgpu::ShaderStages::FRAGMENT);
        assert_eq!(bindings.slot_count(), 2);
        assert_eq!(entries[0].ty, binding_types::texture_2d());
        assert_eq!(
            entries[1].ty,
            binding_types::sampler(wgpu::SamplerBindingType::Filtering)
        );
    }
}
