#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Population system that keeps the enemy count in step with the score.
//!
//! The target population is `log_φ(score)`, with φ the golden mean, so each
//! additional enemy requires the score to grow by a constant factor.

use brutal_maze_core::{
    CellCoord, Command, Direction, EnemyKind, Event, MazeView, Viewport, GOLDEN_MEAN,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Tolerance that keeps an exact power of φ from spawning one enemy too many.
const TARGET_EPSILON: f64 = 1e-9;

/// Configuration parameters required to construct the population system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that spawns sleeping enemies on visible wall cells.
#[derive(Debug)]
pub struct Population {
    rng: ChaCha8Rng,
    candidates: Vec<CellCoord>,
}

impl Population {
    /// Creates a new population system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            candidates: Vec::new(),
        }
    }

    /// Tops up the population after enemies were killed or scrolled away.
    pub fn handle(
        &mut self,
        events: &[Event],
        score: f64,
        live_enemies: usize,
        viewport: &Viewport,
        maze: MazeView<'_>,
        out: &mut Vec<Command>,
    ) {
        let depleted = events.iter().any(|event| {
            matches!(
                event,
                Event::EnemyKilled { .. } | Event::EnemyCulled { .. }
            )
        });
        if depleted {
            self.populate(score, live_enemies, viewport, maze, out);
        }
    }

    /// Spawns enemies until the population reaches `log_φ(score)` or candidates run out.
    ///
    /// Candidates are visible wall cells that have at least one non-wall
    /// neighbour, so no enemy is buried inside solid rock. Cells are drawn
    /// without replacement and each receives a uniformly chosen kind.
    pub fn populate(
        &mut self,
        score: f64,
        live_enemies: usize,
        viewport: &Viewport,
        maze: MazeView<'_>,
        out: &mut Vec<Command>,
    ) {
        let target = target_population(score);
        let mut count = live_enemies;
        if count as f64 >= target - TARGET_EPSILON {
            return;
        }

        self.candidates.clear();
        for column in viewport.columns().iter() {
            for row in viewport.rows().iter() {
                let cell = CellCoord::new(column, row);
                if maze.is_wall(cell) && !is_enclosed(maze, cell) {
                    self.candidates.push(cell);
                }
            }
        }

        while (count as f64) < target - TARGET_EPSILON && !self.candidates.is_empty() {
            let index = self.rng.gen_range(0..self.candidates.len());
            let cell = self.candidates.swap_remove(index);
            let kind = EnemyKind::ALL[self.rng.gen_range(0..EnemyKind::ALL.len())];
            out.push(Command::SpawnEnemy { cell, kind });
            count += 1;
        }
    }
}

/// Number of enemies the given score calls for.
#[must_use]
pub fn target_population(score: f64) -> f64 {
    if score <= 1.0 {
        return 0.0;
    }
    score.ln() / GOLDEN_MEAN.ln()
}

fn is_enclosed(maze: MazeView<'_>, cell: CellCoord) -> bool {
    Direction::ALL
        .iter()
        .all(|direction| maze.is_wall(cell.neighbour(*direction)))
}
