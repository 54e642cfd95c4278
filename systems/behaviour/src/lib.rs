#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decision making for awake enemies.
//!
//! Every idle enemy picks exactly one action per frame, in priority order:
//! shoot at the hero, step toward the hero, or start a spinning melee attack.

use brutal_maze_core::{
    CellCoord, Command, Direction, EnemySnapshot, EnemyView, HeroSnapshot, MazeView, Tuning,
    Viewport, MIDDLE,
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Enemies this close to the hero, in cells along each axis, never shoot.
const POINT_BLANK: u32 = 1;

/// Configuration parameters required to construct the behaviour system.
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

/// Pure system emitting fire, step and spin commands for idle enemies.
#[derive(Debug)]
pub struct Behaviour {
    rng: ChaCha8Rng,
}

impl Behaviour {
    /// Creates a new behaviour system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Chooses one action for every awake enemy that is neither sliding nor spinning.
    pub fn handle(
        &mut self,
        tuning: &Tuning,
        viewport: &Viewport,
        maze: MazeView<'_>,
        hero: &HeroSnapshot,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        for enemy in enemies.iter().filter(|enemy| enemy.is_idle()) {
            if self.wants_to_fire(tuning, viewport, hero, enemy) {
                out.push(Command::EnemyFire { enemy: enemy.id });
            } else if let Some(direction) = self.choose_step(maze, hero, enemy) {
                out.push(Command::StepEnemy {
                    enemy: enemy.id,
                    direction,
                });
            } else {
                out.push(Command::SpinEnemy {
                    enemy: enemy.id,
                    clockwise: self.rng.gen(),
                });
            }
        }
    }

    fn wants_to_fire(
        &mut self,
        tuning: &Tuning,
        viewport: &Viewport,
        hero: &HeroSnapshot,
        enemy: &EnemySnapshot,
    ) -> bool {
        let range = tuning.fire_range * viewport.distance();
        if hero.dead
            || !enemy.ready_to_strike
            || enemy.cell.is_within(CellCoord::middle(), POINT_BLANK)
            || enemy.position.distance_to(viewport.hero()) > range
        {
            return false;
        }
        let odds = (u32::from(hero.slashing) + 1) * 3;
        self.rng.gen_range(0..odds) == 0
    }

    /// Picks the first open cell among the two axis-aligned moves toward the
    /// hero, in random order, followed by one random neighbour.
    fn choose_step(
        &mut self,
        maze: MazeView<'_>,
        hero: &HeroSnapshot,
        enemy: &EnemySnapshot,
    ) -> Option<Direction> {
        if !enemy.ready_to_strike {
            return None;
        }
        let wander = *Direction::ALL.choose(&mut self.rng)?;
        let mut options = Vec::with_capacity(3);
        if !hero.dead {
            let mut toward: Vec<Direction> = [
                Direction::from_delta((MIDDLE - enemy.cell.column()).signum(), 0),
                Direction::from_delta(0, (MIDDLE - enemy.cell.row()).signum()),
            ]
            .into_iter()
            .flatten()
            .collect();
            toward.shuffle(&mut self.rng);
            options.extend(toward);
        }
        options.push(wander);

        options
            .into_iter()
            .find(|direction| maze.is_empty(enemy.cell.neighbour(*direction)))
    }
}
