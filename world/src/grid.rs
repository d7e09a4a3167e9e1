//! Occupancy grid and the mapping between grid cells and math coordinates.

use origin_defence_core::{CellCoord, MathCoord};

/// Fixed-size board tracking which cells are occupied.
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates an empty grid with the provided dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![false; capacity],
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Grid cell of the origin, the center of the board.
    #[must_use]
    pub fn origin(&self) -> CellCoord {
        CellCoord::new(half(self.width), half(self.height))
    }

    /// Reports whether the cell lies inside the board and is unoccupied.
    #[must_use]
    pub fn is_valid_position(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .is_some_and(|index| !self.cells.get(index).copied().unwrap_or(true))
    }

    /// Reports whether the cell lies inside the board and is occupied.
    #[must_use]
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .is_some_and(|index| self.cells.get(index).copied().unwrap_or(false))
    }

    /// Occupies the cell when it is a valid position.
    ///
    /// Returns `true` when the cell became occupied; invalid cells are left
    /// untouched.
    pub fn occupy_cell(&mut self, cell: CellCoord) -> bool {
        if !self.is_valid_position(cell) {
            return false;
        }

        match self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            Some(slot) => {
                *slot = true;
                true
            }
            None => false,
        }
    }

    /// Vacates every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|occupied| **occupied).count()
    }

    /// Converts a grid cell into its math coordinate.
    #[must_use]
    pub fn to_math(&self, cell: CellCoord) -> MathCoord {
        to_math(self.origin(), cell)
    }

    /// Converts a math coordinate into its grid cell.
    #[must_use]
    pub fn from_math(&self, coord: MathCoord) -> CellCoord {
        let origin = self.origin();
        CellCoord::new(
            origin.column().saturating_add(coord.x()),
            origin.row().saturating_sub(coord.y()),
        )
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column < self.width && row < self.height {
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Converts a grid cell into a math coordinate relative to `origin`.
#[must_use]
pub fn to_math(origin: CellCoord, cell: CellCoord) -> MathCoord {
    MathCoord::new(
        cell.column().saturating_sub(origin.column()),
        origin.row().saturating_sub(cell.row()),
    )
}

fn half(extent: u32) -> i32 {
    i32::try_from(extent / 2).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_sits_at_floored_center() {
        assert_eq!(Grid::new(27, 27).origin(), CellCoord::new(13, 13));
        assert_eq!(Grid::new(32, 24).origin(), CellCoord::new(16, 12));
    }

    #[test]
    fn origin_maps_to_zero_math_coordinate() {
        for (width, height) in [(1, 1), (2, 5), (27, 27), (32, 24)] {
            let grid = Grid::new(width, height);
            assert_eq!(grid.to_math(grid.origin()), MathCoord::ORIGIN);
        }
    }

    #[test]
    fn math_coordinates_invert_the_row_axis() {
        let grid = Grid::new(10, 10);
        assert_eq!(grid.to_math(CellCoord::new(7, 2)), MathCoord::new(2, 3));
        assert_eq!(grid.to_math(CellCoord::new(0, 9)), MathCoord::new(-5, -4));
        assert_eq!(grid.from_math(MathCoord::new(2, 3)), CellCoord::new(7, 2));
    }

    #[test]
    fn occupied_cell_cannot_be_reoccupied() {
        let mut grid = Grid::new(4, 4);
        let cell = CellCoord::new(1, 2);
        assert!(grid.occupy_cell(cell));
        assert!(!grid.occupy_cell(cell));
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn clear_vacates_all_cells() {
        let mut grid = Grid::new(3, 3);
        assert!(grid.occupy_cell(CellCoord::new(0, 0)));
        assert!(grid.occupy_cell(CellCoord::new(2, 2)));
        grid.clear();
        assert_eq!(grid.occupied_count(), 0);
        assert!(grid.is_valid_position(CellCoord::new(2, 2)));
    }
}
