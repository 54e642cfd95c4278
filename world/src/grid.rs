use brutal_maze_core::{Cell, CellCoord, MazeView, RingLayout, GRID_SIDE};

/// Square grid of maze cells stored column-major behind a ring layout.
///
/// Every logical index wraps, so rotating the grid only moves its origins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGrid {
    cells: Vec<Cell>,
    layout: RingLayout,
}

impl MazeGrid {
    /// Creates a full-size grid where every cell holds `cell`.
    #[must_use]
    pub fn filled(cell: Cell) -> Self {
        Self {
            cells: vec![cell; GRID_SIDE * GRID_SIDE],
            layout: RingLayout::new(GRID_SIDE, GRID_SIDE),
        }
    }

    /// Builds a grid from logical columns; every column is fitted to the first one's length.
    #[must_use]
    pub fn from_columns(columns: Vec<Vec<Cell>>) -> Self {
        let rows = columns.first().map_or(0, Vec::len);
        let layout = RingLayout::new(columns.len(), rows);
        let mut cells = Vec::with_capacity(layout.len());
        for mut column in columns {
            column.resize(rows, Cell::Wall);
            cells.extend(column);
        }
        Self { cells, layout }
    }

    /// Returns the state of a logical cell.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Cell {
        self.view().cell(cell)
    }

    /// Overwrites a logical cell.
    pub fn set(&mut self, cell: CellCoord, state: Cell) {
        if let Some(index) = self.layout.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = state;
            }
        }
    }

    /// Circularly shifts every column by `shift` positions.
    pub fn rotate_columns(&mut self, shift: i32) {
        self.layout.rotate_columns(shift);
    }

    /// Circularly shifts every row by `shift` positions.
    pub fn rotate_rows(&mut self, shift: i32) {
        self.layout.rotate_rows(shift);
    }

    /// Writes a freshly generated column so that logical row `r + row_shift` holds `cells[r]`.
    pub(crate) fn overwrite_column(&mut self, column: i32, cells: &[Cell], row_shift: i32) {
        for (row, state) in (0_i32..).zip(cells.iter().copied()) {
            self.set(CellCoord::new(column, row + row_shift), state);
        }
    }

    /// Captures a read-only view of the grid.
    #[must_use]
    pub fn view(&self) -> MazeView<'_> {
        MazeView::with_layout(&self.cells, self.layout)
    }
}
