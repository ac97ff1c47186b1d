//! Full-screen quad geometry

use wgpu::util::DeviceExt;

/// Vertex with position and texture coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl QuadVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x2,
        },
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub const QUAD_VERTEX_COUNT: u32 = 6;

/// Two triangles covering clip space.
///
/// Texture v runs top to bottom, so grid row 0 lands on the top edge of the
/// surface and window pixel `(x, y)` shows cell `(x, y)` when sizes match.
#[rustfmt::skip]
pub const QUAD_VERTICES: [QuadVertex; QUAD_VERTEX_COUNT as usize] = [
    QuadVertex { position: [-1.0, -1.0, 0.0], tex_coords: [0.0, 1.0] },
    QuadVertex { position: [ 1.0, -1.0, 0.0], tex_coords: [1.0, 1.0] },
    QuadVertex { position: [ 1.0,  1.0, 0.0], tex_coords: [1.0, 0.0] },
    QuadVertex { position: [-1.0, -1.0, 0.0], tex_coords: [0.0, 1.0] },
    QuadVertex { position: [ 1.0,  1.0, 0.0], tex_coords: [1.0, 0.0] },
    QuadVertex { position: [-1.0,  1.0, 0.0], tex_coords: [0.0, 0.0] },
];

/// Uploads the quad once; the buffer is never written again
pub fn create_quad_buffer(device: &wgpu::Device) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Composite Quad Vertices"),
        contents: bytemuck::cast_slice(&QUAD_VERTICES),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 20);
        let layout = QuadVertex::desc();
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.attributes[1].offset, 12);
    }

    #[test]
    fn test_quad_covers_clip_space() {
        let xs: Vec<f32> = QUAD_VERTICES.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = QUAD_VERTICES.iter().map(|v| v.position[1]).collect();
        assert!(xs.contains(&-1.0) && xs.contains(&1.0));
        assert!(ys.contains(&-1.0) && ys.contains(&1.0));
    }

    #[test]
    fn test_top_left_samples_first_row() {
        for vertex in QUAD_VERTICES.iter() {
            // clip y = +1 is the top edge, which must sample v = 0
            let expected_v = (1.0 - vertex.position[1]) / 2.0;
            let expected_u = (vertex.position[0] + 1.0) / 2.0;
            assert_eq!(vertex.tex_coords, [expected_u, expected_v]);
        }
    }
}
