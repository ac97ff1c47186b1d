//! Grid Store: the authoritative CPU-side cell array

use super::Cell;
use crate::error::WorldError;

/// Fixed-size, row-major array of cells.
///
/// The length is `width * height` for the whole lifetime of the grid. Every
/// mutation goes through bounds-checked entry points, so pointer samples that
/// land outside the world are rejected instead of touching a neighbouring row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid with the default three-band layout.
    ///
    /// Rows are split with integer arithmetic only:
    /// - rows `[0, height / 2)` are [`Cell::Air`]
    /// - rows `[height / 2, height * 3 / 4)` are [`Cell::Dirt`]
    /// - rows `[height * 3 / 4, height)` are [`Cell::Stone`]
    ///
    /// Each band is inclusive at its start row and exclusive at its end row,
    /// so a boundary row belongs to the band below it.
    ///
    /// # Arguments
    /// * `width` - Cells per row
    /// * `height` - Number of rows
    pub fn new(width: u32, height: u32) -> Self {
        let mut grid = Self::filled(width, height, Cell::Air);
        grid.reset();
        grid
    }

    /// Creates a grid where every cell holds `cell`.
    pub fn filled(width: u32, height: u32, cell: Cell) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![cell; len],
        }
    }

    /// Restores the default three-band layout in place.
    pub fn reset(&mut self) {
        let width = self.width as usize;
        let dirt_start = (self.height / 2) as usize * width;
        let stone_start = (self.height as u64 * 3 / 4) as usize * width;

        self.cells[..dirt_start].fill(Cell::Air);
        self.cells[dirt_start..stone_start].fill(Cell::Dirt);
        self.cells[stone_start..].fill(Cell::Stone);
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of `(x, y)`, or `None` outside the grid.
    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// Coordinate of flat index `index`, or `None` past the end.
    pub fn coords_of(&self, index: usize) -> Option<(u32, u32)> {
        (index < self.cells.len()).then(|| {
            let width = self.width as usize;
            ((index % width) as u32, (index / width) as u32)
        })
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Cell> {
        self.index_of(x, y).map(|i| self.cells[i])
    }

    /// Writes exactly one cell.
    ///
    /// # Errors
    /// Returns [`WorldError::OutOfBounds`] and leaves the grid unchanged if
    /// `(x, y)` lies outside the grid.
    pub fn write(&mut self, x: u32, y: u32, cell: Cell) -> Result<(), WorldError> {
        let index = self.index_of(x, y).ok_or(WorldError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        self.cells[index] = cell;
        Ok(())
    }

    /// Read-only view of every cell in storage (row-major) order.
    pub fn snapshot(&self) -> &[Cell] {
        &self.cells
    }

    /// The snapshot reinterpreted as the bytes uploaded to the device.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    /// Size of one full snapshot in device memory.
    pub fn byte_size(&self) -> u64 {
        self.cells.len() as u64 * Cell::GPU_SIZE
    }

    /// Iterates `(x, y, cell)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, Cell)> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| ((i % width) as u32, (i / width) as u32, cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_band_layout_4x4() {
        let grid = Grid::new(4, 4);
        assert_eq!(grid.len(), 16);

        let cells = grid.snapshot();
        assert!(cells[0..8].iter().all(|&c| c == Cell::Air));
        assert!(cells[8..12].iter().all(|&c| c == Cell::Dirt));
        assert!(cells[12..16].iter().all(|&c| c == Cell::Stone));
    }

    #[test]
    fn test_band_boundaries_odd_height() {
        // height 7: air rows 0..3, dirt rows 3..5, stone rows 5..7
        let grid = Grid::new(3, 7);
        assert_eq!(grid.get(0, 2), Some(Cell::Air));
        assert_eq!(grid.get(0, 3), Some(Cell::Dirt));
        assert_eq!(grid.get(2, 4), Some(Cell::Dirt));
        assert_eq!(grid.get(0, 5), Some(Cell::Stone));
        assert_eq!(grid.get(2, 6), Some(Cell::Stone));
    }

    #[test]
    fn test_full_size_band_rows() {
        let grid = Grid::new(1920, 1080);
        assert_eq!(grid.len(), 1920 * 1080);
        assert_eq!(grid.get(0, 539), Some(Cell::Air));
        assert_eq!(grid.get(0, 540), Some(Cell::Dirt));
        assert_eq!(grid.get(1919, 809), Some(Cell::Dirt));
        assert_eq!(grid.get(0, 810), Some(Cell::Stone));
        assert_eq!(grid.get(1919, 1079), Some(Cell::Stone));
    }

    #[test]
    fn test_index_coordinate_mapping() {
        let grid = Grid::new(5, 3);
        for i in 0..grid.len() {
            let (x, y) = grid.coords_of(i).unwrap();
            assert_eq!(x, i as u32 % 5);
            assert_eq!(y, i as u32 / 5);
            assert_eq!(grid.index_of(x, y), Some(i));
        }
        assert_eq!(grid.coords_of(grid.len()), None);
    }

    #[test]
    fn test_write_changes_only_target_cell() {
        let mut grid = Grid::new(16, 9);
        let mut rng = rand::rng();

        for _ in 0..64 {
            let x = rng.random_range(0..16);
            let y = rng.random_range(0..9);
            let cell = Cell::ALL[rng.random_range(0..Cell::COUNT)];

            let before = grid.clone();
            grid.write(x, y, cell).unwrap();

            let target = grid.index_of(x, y).unwrap();
            assert_eq!(grid.snapshot()[target], cell);
            for (i, (&a, &b)) in before.snapshot().iter().zip(grid.snapshot()).enumerate() {
                if i != target {
                    assert_eq!(a, b, "cell {} changed", i);
                }
            }
        }
    }

    #[test]
    fn test_write_corners() {
        let mut grid = Grid::new(8, 6);
        assert!(grid.write(0, 0, Cell::Stone).is_ok());
        assert!(grid.write(7, 5, Cell::Air).is_ok());
        assert_eq!(grid.get(0, 0), Some(Cell::Stone));
        assert_eq!(grid.get(7, 5), Some(Cell::Air));
    }

    #[test]
    fn test_out_of_bounds_write_is_rejected() {
        let mut grid = Grid::new(8, 6);
        let before = grid.clone();

        assert_eq!(
            grid.write(8, 6, Cell::Dirt),
            Err(WorldError::OutOfBounds {
                x: 8,
                y: 6,
                width: 8,
                height: 6
            })
        );
        // x past the row end must not wrap into the next row
        assert!(grid.write(8, 0, Cell::Dirt).is_err());
        assert!(grid.write(0, 6, Cell::Dirt).is_err());
        assert!(grid.write(u32::MAX, u32::MAX, Cell::Dirt).is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_snapshot_bytes_are_little_endian_discriminants() {
        let mut grid = Grid::filled(2, 1, Cell::Air);
        grid.write(1, 0, Cell::Dirt).unwrap();
        assert_eq!(grid.byte_size(), 8);
        assert_eq!(grid.as_bytes(), &[2, 0, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_reset_restores_layout() {
        let mut grid = Grid::new(4, 4);
        grid.fill(Cell::Stone);
        grid.reset();
        assert_eq!(grid, Grid::new(4, 4));
    }
}
