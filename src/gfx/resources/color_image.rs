//! Color image written by the fill kernel and sampled by the composite quad

use super::texture_resource::TextureResource;

/// Storage format of the color image; one RGBA8 texel per cell
pub const COLOR_IMAGE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Creates the color image for a `width` x `height` grid
///
/// The texture is a compute storage target and a sampled texture. `COPY_SRC`
/// lets tools and tests read it back. Addressing repeats on both axes and
/// filtering is nearest so each cell stays a hard-edged block when the quad
/// is stretched over a larger surface.
pub fn create_color_image(device: &wgpu::Device, width: u32, height: u32) -> TextureResource {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Color Image"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: COLOR_IMAGE_FORMAT,
        usage: wgpu::TextureUsages::STORAGE_BINDING
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Color Image Sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::FilterMode::Nearest,
        lod_min_clamp: 0.0,
        lod_max_clamp: 32.0,
        compare: None,
        anisotropy_clamp: 1,
        border_color: None,
    });

    TextureResource {
        texture,
        view,
        sampler,
    }
}
