//! Composite stage: color image to presentation target

use crate::gfx::resources::quad::QUAD_VERTEX_COUNT;

/// Opaque black; shows through wherever the color image is transparent
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Draws the full-target quad sampling the color image.
///
/// # Arguments
/// * `pass` - Open render scope on the presentation target
/// * `pipeline` - Textured quad pipeline
/// * `vertex_buffer` - The six quad vertices
/// * `image_bindings` - Color image + sampler bind group
pub fn draw(
    pass: &mut wgpu::RenderPass<'_>,
    pipeline: &wgpu::RenderPipeline,
    vertex_buffer: &wgpu::Buffer,
    image_bindings: &wgpu::BindGroup,
) {
    pass.set_pipeline(pipeline);
    pass.set_vertex_buffer(0, vertex_buffer.slice(..));
    pass.set_bind_group(0, image_bindings, &[]);
    pass.draw(0..QUAD_VERTEX_COUNT, 0..1);
}
