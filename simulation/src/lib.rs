#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame orchestrator for Brutal Maze.
//!
//! A [`Simulation`] owns the world and every system and advances them in a
//! fixed order once per frame:
//!
//! 1. record input and rescale for the frame rate,
//! 2. scroll the maze (gating, rotation, regeneration, culling),
//! 3. replace culled enemies and wake those that now see the hero,
//! 4. let idle enemies act,
//! 5. advance hero, enemy and bullet motion,
//! 6. resolve melee and bullets, then settle casualties,
//! 7. replace killed enemies and check whether the hero died.
//!
//! Drawing is left to the host, which reads the world through
//! `brutal_maze_world::query` after each frame.

use brutal_maze_core::{Command, Event, SimulationError, Tuning};
use brutal_maze_system_behaviour::{self as behaviour, Behaviour};
use brutal_maze_system_combat::Combat;
use brutal_maze_system_population::{self as population, Population};
use brutal_maze_system_visibility::Visibility;
use brutal_maze_world::{self as world, query, MazeGrid, World};
use tracing::{info, trace};

const POPULATION_SALT: u64 = 0x9e37_79b9_7f4a_7c15;
const BEHAVIOUR_SALT: u64 = 0xc2b2_ae3d_27d4_eb4f;

/// Parameters of a new run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    tuning: Tuning,
    width: u32,
    height: u32,
    seed: Option<u64>,
    grid: Option<MazeGrid>,
}

impl Config {
    /// Creates an unseeded configuration for a `width × height` surface.
    #[must_use]
    pub fn new(tuning: Tuning, width: u32, height: u32) -> Self {
        Self {
            tuning,
            width,
            height,
            seed: None,
            grid: None,
        }
    }

    /// Fixes the seed so that identical inputs replay identically.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Starts the run on a prepared maze instead of a generated one.
    #[must_use]
    pub fn with_grid(mut self, grid: MazeGrid) -> Self {
        self.grid = Some(grid);
        self
    }
}

/// Player input and timing for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    /// Frames per second the host currently sustains.
    pub frame_rate: f32,
    /// Maze scroll along columns, in `-1..=1`; the hero appears to move the opposite way.
    pub right: i32,
    /// Maze scroll along rows, in `-1..=1`; the hero appears to move the opposite way.
    pub down: i32,
    /// Heading the hero should face, in radians.
    pub angle: f32,
    /// Whether the long-range attack is held.
    pub firing: bool,
    /// Whether the close-range attack is held.
    pub slashing: bool,
}

impl FrameInput {
    /// Input that neither moves nor attacks.
    #[must_use]
    pub const fn idle(frame_rate: f32) -> Self {
        Self {
            frame_rate,
            right: 0,
            down: 0,
            angle: 0.0,
            firing: false,
            slashing: false,
        }
    }

    /// Returns the input with the provided scroll direction.
    #[must_use]
    pub const fn scrolling(mut self, right: i32, down: i32) -> Self {
        self.right = right;
        self.down = down;
        self
    }
}

/// Outcome of a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameStatus {
    /// The hero is alive.
    Running,
    /// The hero died this frame.
    Ended {
        /// Final raw score.
        score: f64,
    },
}

/// Everything that happened during one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    /// Events emitted by the world, in order.
    pub events: Vec<Event>,
    /// Whether the run continues.
    pub status: FrameStatus,
}

/// Owns the world and systems and advances them frame by frame.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    visibility: Visibility,
    combat: Combat,
    population: Population,
    behaviour: Behaviour,
    frames: u64,
    final_score: Option<f64>,
}

impl Simulation {
    /// Generates a maze and populates it for a new run.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let world = match config.grid {
            Some(grid) => World::from_grid(config.tuning, grid, config.width, config.height, seed),
            None => World::new(config.tuning, config.width, config.height, seed),
        };
        let mut simulation = Self {
            world,
            visibility: Visibility::new(),
            combat: Combat::new(),
            population: Population::new(population::Config::new(seed ^ POPULATION_SALT)),
            behaviour: Behaviour::new(behaviour::Config::new(seed ^ BEHAVIOUR_SALT)),
            frames: 0,
            final_score: None,
        };

        let mut commands = Vec::new();
        simulation.population.populate(
            query::score(&simulation.world),
            query::enemy_view(&simulation.world).len(),
            query::viewport(&simulation.world),
            query::maze(&simulation.world),
            &mut commands,
        );
        let mut events = Vec::new();
        let _ = simulation.execute(commands, &mut events);
        info!(seed, enemies = spawned(&events), "simulation started");
        simulation
    }

    /// Read-only access to the world, for drawing and inspection.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of frames advanced so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Reports whether the run has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.final_score.is_some()
    }

    /// Maps the world onto a surface of a new size.
    pub fn resize(&mut self, width: u32, height: u32) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Resize { width, height }, &mut events);
        events
    }

    /// Advances the run by one frame.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Terminated`] once the hero has died and
    /// [`SimulationError::InvalidFrameRate`] when the frame rate is not a
    /// positive finite number.
    pub fn advance(&mut self, input: FrameInput) -> Result<FrameReport, SimulationError> {
        if let Some(score) = self.final_score {
            return Err(SimulationError::Terminated { score });
        }
        if !(input.frame_rate.is_finite() && input.frame_rate > 0.0) {
            return Err(SimulationError::InvalidFrameRate {
                frame_rate: input.frame_rate,
            });
        }

        let mut events = Vec::new();
        let _ = self.execute(
            vec![
                Command::Control {
                    right: input.right,
                    down: input.down,
                    angle: input.angle,
                    firing: input.firing,
                    slashing: input.slashing,
                },
                Command::Tick {
                    frame_rate: input.frame_rate,
                },
            ],
            &mut events,
        );

        let scrolled = self.execute(vec![Command::Scroll], &mut events);
        self.replenish(&scrolled, &mut events);

        let mut commands = Vec::new();
        self.visibility.handle(
            &scrolled,
            query::viewport(&self.world),
            query::maze(&self.world),
            &query::enemy_view(&self.world),
            &mut commands,
        );
        let _ = self.execute(commands, &mut events);

        let mut commands = Vec::new();
        self.behaviour.handle(
            query::tuning(&self.world),
            query::viewport(&self.world),
            query::maze(&self.world),
            &query::hero(&self.world),
            &query::enemy_view(&self.world),
            &mut commands,
        );
        commands.push(Command::AdvanceCharacters);
        let _ = self.execute(commands, &mut events);

        let mut commands = Vec::new();
        self.combat.handle(
            query::viewport(&self.world),
            query::maze(&self.world),
            &query::hero(&self.world),
            &query::enemy_view(&self.world),
            &query::bullet_view(&self.world),
            &mut commands,
        );
        commands.push(Command::ResolveCasualties);
        let casualties = self.execute(commands, &mut events);
        self.replenish(&casualties, &mut events);

        self.frames += 1;
        trace!(frame = self.frames, events = events.len(), "frame advanced");

        let status = if query::is_over(&self.world) {
            let score = query::score(&self.world);
            self.final_score = Some(score);
            info!(frame = self.frames, score, "run ended");
            FrameStatus::Ended { score }
        } else {
            FrameStatus::Running
        };
        Ok(FrameReport { events, status })
    }

    fn replenish(&mut self, trigger: &[Event], log: &mut Vec<Event>) {
        let mut commands = Vec::new();
        self.population.handle(
            trigger,
            query::score(&self.world),
            query::enemy_view(&self.world).len(),
            query::viewport(&self.world),
            query::maze(&self.world),
            &mut commands,
        );
        let _ = self.execute(commands, log);
    }

    /// Applies commands in order, returning the events of this batch and appending them to `log`.
    fn execute(&mut self, commands: Vec<Command>, log: &mut Vec<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        log.extend(events.iter().cloned());
        events
    }
}

/// Number of enemies a batch of events brought into play.
fn spawned(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::EnemySpawned { .. }))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brutal_maze_core::{BulletId, BulletSource, CellCoord, EnemyId, EnemyKind};

    #[test]
    fn only_spawn_events_count_as_new_enemies() {
        let spawn = |id| Event::EnemySpawned {
            enemy: EnemyId::new(id),
            cell: CellCoord::middle().offset(3, 1),
            kind: EnemyKind::Plum,
        };
        let events = vec![
            spawn(0),
            Event::BulletFired {
                bullet: BulletId::new(0),
                source: BulletSource::Hero,
            },
            Event::MazeMoved { dx: 1, dy: 0 },
            spawn(1),
            Event::EnemyCulled {
                enemy: EnemyId::new(0),
            },
        ];
        assert_eq!(spawned(&events), 2);
        assert_eq!(spawned(&[]), 0);
    }
}
