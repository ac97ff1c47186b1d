//! Compute stage: cell buffer to color image
//!
//! The fill kernel runs one invocation per cell in 8x8 workgroups. Each
//! invocation owns exactly one output texel, so the dispatch needs no
//! synchronization beyond the pass boundaries.
//!
//! The cell-to-color mapping is a closed lookup table ([`Palette`]) uploaded
//! as a uniform. [`Palette::shade`] evaluates the same table on the CPU and is
//! the reference the device output is checked against.

use crate::world::Cell;

/// Local workgroup size of the fill kernel; must match `@workgroup_size`
pub const WORKGROUP_SIZE: (u32, u32, u32) = (8, 8, 1);

/// RGBA8 color for each cell material, indexed by [`Cell::index`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub colors: [[u8; 4]; Cell::COUNT],
}

impl Default for Palette {
    fn default() -> Self {
        let mut colors = [[0; 4]; Cell::COUNT];
        colors[Cell::Stone.index()] = [128, 128, 128, 255];
        colors[Cell::Dirt.index()] = [139, 90, 43, 255];
        colors[Cell::Air.index()] = [0, 0, 0, 0];
        Self { colors }
    }
}

impl Palette {
    pub fn color_of(&self, cell: Cell) -> [u8; 4] {
        self.colors[cell.index()]
    }

    pub fn set_color(&mut self, cell: Cell, color: [u8; 4]) {
        self.colors[cell.index()] = color;
    }

    /// CPU evaluation of the fill kernel: tightly packed RGBA8 rows
    pub fn shade(&self, cells: &[Cell]) -> Vec<u8> {
        cells.iter().flat_map(|&cell| self.color_of(cell)).collect()
    }

    pub fn to_uniform(&self) -> PaletteUniform {
        let mut colors = [[0.0; 4]; Cell::COUNT];
        for (dst, src) in colors.iter_mut().zip(self.colors.iter()) {
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d = *s as f32 / 255.0;
            }
        }
        PaletteUniform { colors }
    }
}

/// Device layout of [`Palette`]: `array<vec4<f32>, 3>`
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PaletteUniform {
    pub colors: [[f32; 4]; Cell::COUNT],
}

/// Workgroups needed to cover a `width` x `height` image
pub fn workgroup_count(width: u32, height: u32) -> (u32, u32, u32) {
    (
        width.div_ceil(WORKGROUP_SIZE.0),
        height.div_ceil(WORKGROUP_SIZE.1),
        1,
    )
}

/// Binds the fill kernel and dispatches it over the whole grid.
///
/// # Arguments
/// * `pass` - Open compute scope
/// * `pipeline` - Fill kernel pipeline
/// * `bindings` - Cell buffer, color image and palette bind group
/// * `width` - Grid width in cells
/// * `height` - Grid height in cells
pub fn dispatch(
    pass: &mut wgpu::ComputePass<'_>,
    pipeline: &wgpu::ComputePipeline,
    bindings: &wgpu::BindGroup,
    width: u32,
    height: u32,
) {
    let (x, y, z) = workgroup_count(width, height);
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bindings, &[]);
    pass.dispatch_workgroups(x, y, z);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Grid;

    #[test]
    fn test_workgroup_count_rounds_up() {
        assert_eq!(workgroup_count(1920, 1080), (240, 135, 1));
        assert_eq!(workgroup_count(16, 16), (2, 2, 1));
        assert_eq!(workgroup_count(17, 9), (3, 2, 1));
        assert_eq!(workgroup_count(1, 1), (1, 1, 1));
    }

    #[test]
    fn test_shade_is_deterministic() {
        let grid = Grid::new(12, 7);
        let first = Palette::default().shade(grid.snapshot());
        let second = Palette::default().shade(grid.snapshot());
        assert_eq!(first, second);
        assert_eq!(first.len(), grid.len() * 4);

        let palette = Palette::default();
        assert_ne!(palette.color_of(Cell::Stone), palette.color_of(Cell::Dirt));
        assert_ne!(palette.color_of(Cell::Dirt), palette.color_of(Cell::Air));
    }

    #[test]
    fn test_shade_changes_only_edited_pixel() {
        let palette = Palette::default();
        let mut grid = Grid::new(10, 10);
        let before = palette.shade(grid.snapshot());

        grid.write(3, 2, Cell::Stone).unwrap();
        let after = palette.shade(grid.snapshot());

        let changed: Vec<usize> = before
            .chunks(4)
            .zip(after.chunks(4))
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(changed, vec![2 * 10 + 3]);
        assert_eq!(&after[(2 * 10 + 3) * 4..][..4], &palette.color_of(Cell::Stone));
    }

    #[test]
    fn test_uniform_normalises_channels() {
        let uniform = Palette::default().to_uniform();
        assert_eq!(uniform.colors[Cell::Air.index()], [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(uniform.colors[Cell::Stone.index()][3], 1.0);
        assert_eq!(std::mem::size_of::<PaletteUniform>(), 48);
    }
}
