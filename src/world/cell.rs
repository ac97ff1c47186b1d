//! Cell material states

/// Material state of one grid unit.
///
/// The discriminants are the exact values the compute kernel reads from the
/// cell buffer, so the layout is pinned to `u32`.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, bytemuck::NoUninit)]
pub enum Cell {
    Stone = 0,
    Dirt = 1,
    #[default]
    Air = 2,
}

impl Cell {
    /// Every cell variant, ordered by discriminant.
    pub const ALL: [Cell; 3] = [Cell::Stone, Cell::Dirt, Cell::Air];

    /// Number of distinct cell states.
    pub const COUNT: usize = Self::ALL.len();

    /// Size of one cell in device memory.
    pub const GPU_SIZE: u64 = std::mem::size_of::<Cell>() as u64;

    /// Index into per-material lookup tables such as the palette.
    pub fn index(self) -> usize {
        self as u32 as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Cell::Stone => "Stone",
            Cell::Dirt => "Dirt",
            Cell::Air => "Air",
        }
    }

    /// Inverse of [`Cell::index`].
    pub fn from_index(index: usize) -> Option<Cell> {
        Self::ALL.get(index).copied()
    }
}
