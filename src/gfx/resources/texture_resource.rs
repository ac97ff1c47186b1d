//! Texture resource bundle

/// GPU texture resource containing texture, view, and sampler
///
/// Bundles the three pieces a sampled texture needs:
/// - Texture: The actual GPU memory allocation
/// - View: Interface for shader access
/// - Sampler: Filtering and addressing configuration
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Releases the texture memory now rather than when the last handle drops
    pub fn destroy(self) {
        drop(self.sampler);
        drop(self.view);
        self.texture.destroy();
    }
}
