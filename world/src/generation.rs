//! Procedural maze generation.
//!
//! The maze is a binary-tree layout: every 10×10 maze cell keeps a solid
//! wall block in its top-left quarter, an open corridor in its bottom-right
//! quarter, and one random bit decides which of the two remaining quarters
//! is open.

use brutal_maze_core::{Cell, CellCoord, CELL_WIDTH, LAST_ROW, MAZE_SIZE, ROAD_WIDTH};
use rand::Rng;

use crate::grid::MazeGrid;

/// Half-column pattern selected by one random bit.
///
/// An open bit yields `ROAD_WIDTH` walls followed by `ROAD_WIDTH` empty cells
/// on both halves. A closed bit walls the upper half entirely and clears the
/// lower half entirely.
#[must_use]
pub fn half_column(open: bool, upper: bool) -> [Cell; CELL_WIDTH] {
    let mut cells = [Cell::Empty; CELL_WIDTH];
    let walled = match (open, upper) {
        (true, _) => ROAD_WIDTH,
        (false, true) => CELL_WIDTH,
        (false, false) => 0,
    };
    cells[..walled].fill(Cell::Wall);
    cells
}

/// Generates one maze column: `ROAD_WIDTH` upper columns followed by `ROAD_WIDTH` lower ones.
pub fn column_block<R: Rng + ?Sized>(rng: &mut R) -> Vec<Vec<Cell>> {
    let mut upper = Vec::with_capacity(MAZE_SIZE * CELL_WIDTH);
    let mut lower = Vec::with_capacity(MAZE_SIZE * CELL_WIDTH);
    for _ in 0..MAZE_SIZE {
        let open = rng.gen::<bool>();
        upper.extend(half_column(open, true));
        lower.extend(half_column(open, false));
    }

    let mut block = vec![upper; ROAD_WIDTH];
    block.extend(std::iter::repeat(lower).take(ROAD_WIDTH));
    block
}

/// Generates a complete maze grid with the hero marker at the centre.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> MazeGrid {
    let columns = (0..MAZE_SIZE).flat_map(|_| column_block(rng)).collect();
    let mut grid = MazeGrid::from_columns(columns);
    grid.set(CellCoord::middle(), Cell::Hero);
    grid
}

/// Replaces the trailing `CELL_WIDTH` columns with a fresh maze column.
///
/// `row_shift` is the accumulated row rotation, which keeps the new rows in
/// phase with the rest of the grid.
pub(crate) fn regenerate_columns<R: Rng + ?Sized>(
    grid: &mut MazeGrid,
    rng: &mut R,
    row_shift: i32,
) {
    for (offset, column) in (0_i32..).zip(column_block(rng)) {
        grid.overwrite_column(LAST_ROW + offset, &column, row_shift);
    }
}

/// Rewrites the trailing `CELL_WIDTH` rows with a fresh row of maze cells.
pub(crate) fn regenerate_rows<R: Rng + ?Sized>(
    grid: &mut MazeGrid,
    rng: &mut R,
    column_shift: i32,
) {
    let width = CELL_WIDTH as i32;
    let road = ROAD_WIDTH as i32;
    for index in 0..MAZE_SIZE as i32 {
        let open = rng.gen::<bool>();
        let first = (index - 1) * width + column_shift;
        for (half, upper) in [(0, true), (road, false)] {
            let pattern = half_column(open, upper);
            for column in first + half..first + half + road {
                for (row, state) in (LAST_ROW..).zip(pattern) {
                    grid.set(CellCoord::new(column, row), state);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brutal_maze_core::{GRID_SIDE, MIDDLE};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn is_valid_half(cells: &[Cell; CELL_WIDTH], upper: bool) -> bool {
        let walls = cells.iter().filter(|cell| **cell == Cell::Wall).count();
        let uniform = walls == 0 || walls == CELL_WIDTH;
        let halved = walls == ROAD_WIDTH
            && cells[..ROAD_WIDTH].iter().all(|cell| *cell == Cell::Wall);
        (uniform && (walls == CELL_WIDTH) == upper) || halved
    }

    #[test]
    fn half_columns_are_uniform_or_split() {
        for open in [true, false] {
            for upper in [true, false] {
                let cells = half_column(open, upper);
                assert_eq!(cells.len(), 2 * ROAD_WIDTH);
                assert!(is_valid_half(&cells, upper), "{open} {upper}: {cells:?}");
            }
        }
    }

    #[test]
    fn generation_is_reproducible_per_seed() {
        let first = generate(&mut ChaCha8Rng::seed_from_u64(11));
        let second = generate(&mut ChaCha8Rng::seed_from_u64(11));
        let other = generate(&mut ChaCha8Rng::seed_from_u64(12));
        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn generated_grid_is_square_with_hero_marker() {
        let grid = generate(&mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(grid.view().dimensions(), (GRID_SIDE, GRID_SIDE));
        assert_eq!(grid.get(CellCoord::middle()), Cell::Hero);
    }

    #[test]
    fn every_maze_cell_keeps_its_fixed_quarters() {
        let grid = generate(&mut ChaCha8Rng::seed_from_u64(5));
        for column in 0..GRID_SIDE as i32 {
            for row in 0..GRID_SIDE as i32 {
                let cell = CellCoord::new(column, row);
                if cell == CellCoord::middle() {
                    continue;
                }
                let local_column = column as usize % CELL_WIDTH;
                let local_row = row as usize % CELL_WIDTH;
                match (local_column < ROAD_WIDTH, local_row < ROAD_WIDTH) {
                    (true, true) => assert_eq!(grid.get(cell), Cell::Wall),
                    (false, false) => assert_eq!(grid.get(cell), Cell::Empty),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn hero_surroundings_start_open() {
        let grid = generate(&mut ChaCha8Rng::seed_from_u64(9));
        for column in MIDDLE - 2..=MIDDLE + 2 {
            for row in MIDDLE - 1..=MIDDLE + 1 {
                let cell = CellCoord::new(column, row);
                assert_ne!(grid.get(cell), Cell::Wall, "{cell:?}");
            }
        }
    }

    #[test]
    fn regenerated_rows_keep_the_pattern() {
        let mut grid = MazeGrid::filled(Cell::Enemy);
        regenerate_rows(&mut grid, &mut ChaCha8Rng::seed_from_u64(1), 0);
        for column in 0..GRID_SIDE as i32 {
            for row in LAST_ROW..GRID_SIDE as i32 {
                let state = grid.get(CellCoord::new(column, row));
                assert_ne!(state, Cell::Enemy);
                let local_column = column as usize % CELL_WIDTH;
                let local_row = row as usize % CELL_WIDTH;
                if local_column < ROAD_WIDTH && local_row < ROAD_WIDTH {
                    assert_eq!(state, Cell::Wall);
                }
            }
            assert_eq!(grid.get(CellCoord::new(column, LAST_ROW - 1)), Cell::Enemy);
        }
    }
}
