#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Line-of-sight system that wakes sleeping enemies once they can see the hero.

use brutal_maze_core::{CellCoord, Command, EnemyView, Event, MazeView, Viewport, MIDDLE};

/// Pure system that re-checks sleeping enemies whenever the maze scrolls.
#[derive(Debug, Default)]
pub struct Visibility;

impl Visibility {
    /// Creates a new visibility system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits a wake command for every sleeping enemy with a clear line of sight.
    ///
    /// Geometry only changes when the maze moves, so nothing is checked
    /// unless `events` contains a [`Event::MazeMoved`].
    pub fn handle(
        &mut self,
        events: &[Event],
        viewport: &Viewport,
        maze: MazeView<'_>,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::MazeMoved { .. }))
        {
            return;
        }

        for enemy in enemies.iter().filter(|enemy| !enemy.awake) {
            if can_see_hero(viewport, maze, enemy.cell) {
                out.push(Command::WakeEnemy { enemy: enemy.id });
            }
        }
    }
}

/// Reports whether no wall occludes the segment between the hero and the cell.
///
/// Every wall inside the bounding rectangle of the two cells is tested
/// against the sight line. A wall whose perpendicular distance to the line
/// is at most `distance × (cos θ + sin θ)`, with θ the line's angle to the
/// column axis, blocks the view.
#[must_use]
pub fn can_see_hero(viewport: &Viewport, maze: MazeView<'_>, cell: CellCoord) -> bool {
    let hero = viewport.hero();
    let target = viewport.cell_center(cell);
    let dx = target.x - hero.x;
    let dy = target.y - hero.y;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return true;
    }

    let distance = viewport.distance();
    let clearance = if dx == 0.0 {
        distance
    } else {
        let theta = (dy / dx).atan().abs();
        (theta.cos() + theta.sin()) * distance
    };

    let columns = MIDDLE.min(cell.column())..=MIDDLE.max(cell.column());
    let rows = MIDDLE.min(cell.row())..=MIDDLE.max(cell.row());
    for column in columns {
        for row in rows.clone() {
            let sample = CellCoord::new(column, row);
            if sample == cell || !maze.is_wall(sample) {
                continue;
            }
            let point = viewport.cell_center(sample);
            let offset = (dy * (point.x - hero.x) - dx * (point.y - hero.y)).abs() / length;
            if offset <= clearance {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use brutal_maze_core::{Cell, GRID_SIDE};

    fn empty_cells() -> Vec<Cell> {
        vec![Cell::Empty; GRID_SIDE * GRID_SIDE]
    }

    fn set(cells: &mut [Cell], cell: CellCoord, state: Cell) {
        let index = cell.column() as usize * GRID_SIDE + cell.row() as usize;
        cells[index] = state;
    }

    #[test]
    fn open_floor_is_transparent() {
        let viewport = Viewport::new(640, 480);
        let cells = empty_cells();
        let maze = MazeView::new(&cells, GRID_SIDE, GRID_SIDE);
        assert!(can_see_hero(&viewport, maze, CellCoord::middle().offset(6, 3)));
    }

    #[test]
    fn wall_on_the_segment_blocks_sight() {
        let viewport = Viewport::new(640, 480);
        let enemy = CellCoord::middle().offset(6, 0);
        let mut cells = empty_cells();
        set(&mut cells, CellCoord::middle().offset(3, 0), Cell::Wall);
        let maze = MazeView::new(&cells, GRID_SIDE, GRID_SIDE);
        assert!(!can_see_hero(&viewport, maze, enemy));

        set(&mut cells, CellCoord::middle().offset(3, 0), Cell::Empty);
        let maze = MazeView::new(&cells, GRID_SIDE, GRID_SIDE);
        assert!(can_see_hero(&viewport, maze, enemy));
    }

    #[test]
    fn enemy_cell_never_occludes_itself() {
        let viewport = Viewport::new(640, 480);
        let enemy = CellCoord::middle().offset(0, -4);
        let mut cells = empty_cells();
        set(&mut cells, enemy, Cell::Wall);
        let maze = MazeView::new(&cells, GRID_SIDE, GRID_SIDE);
        assert!(can_see_hero(&viewport, maze, enemy));
    }

    #[test]
    fn walls_outside_the_rectangle_are_ignored() {
        let viewport = Viewport::new(640, 480);
        let mut cells = empty_cells();
        set(&mut cells, CellCoord::middle().offset(-1, 0), Cell::Wall);
        set(&mut cells, CellCoord::middle().offset(3, 1), Cell::Wall);
        let maze = MazeView::new(&cells, GRID_SIDE, GRID_SIDE);
        assert!(can_see_hero(&viewport, maze, CellCoord::middle().offset(5, 0)));
    }
}
