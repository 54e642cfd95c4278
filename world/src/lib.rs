#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Brutal Maze.
//!
//! The world owns the ring-buffered maze grid, the scroll state, the hero,
//! every enemy and every bullet. It mutates only in response to
//! [`Command`] values passed to [`apply`] and reports each change as an
//! [`Event`].

mod characters;
pub mod generation;
mod grid;
mod scroll;

use std::f32::consts::PI;

use brutal_maze_core::{
    Axis, BulletId, BulletSource, Cell, CellCoord, Command, Direction, EnemyId, EnemyKind, Event,
    PixelPoint, Tuning, Viewport,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use characters::{Bullet, Enemy, Hero};
pub use grid::MazeGrid;
use scroll::ScrollState;

/// Frame rate substituted when the configured one cannot drive the simulation.
const FALLBACK_FRAME_RATE: f32 = 30.0;

/// Represents the authoritative Brutal Maze world state.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    grid: MazeGrid,
    scroll: ScrollState,
    viewport: Viewport,
    frame_rate: f32,
    hero: Hero,
    enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    intent: (i32, i32),
    score: f64,
    rng: ChaCha8Rng,
    next_enemy_id: u32,
    next_bullet_id: u32,
}

impl World {
    /// Creates a world with a freshly generated maze mapped onto a `width × height` surface.
    ///
    /// The seed drives maze generation and every other random choice the world makes.
    #[must_use]
    pub fn new(tuning: Tuning, width: u32, height: u32, rng_seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
        let grid = generation::generate(&mut rng);
        Self::with_grid(tuning, grid, width, height, rng)
    }

    /// Creates a world over a prepared grid. The hero marker is placed at the centre.
    #[must_use]
    pub fn from_grid(
        tuning: Tuning,
        grid: MazeGrid,
        width: u32,
        height: u32,
        rng_seed: u64,
    ) -> Self {
        Self::with_grid(tuning, grid, width, height, ChaCha8Rng::seed_from_u64(rng_seed))
    }

    fn with_grid(
        tuning: Tuning,
        mut grid: MazeGrid,
        width: u32,
        height: u32,
        rng: ChaCha8Rng,
    ) -> Self {
        let frame_rate = if tuning.frame_rate.is_finite() && tuning.frame_rate > 0.0 {
            tuning.frame_rate
        } else {
            FALLBACK_FRAME_RATE
        };
        grid.set(CellCoord::middle(), Cell::Hero);

        let mut world = Self {
            grid,
            scroll: ScrollState::new(frame_rate, tuning.move_speed),
            viewport: Viewport::new(width, height),
            frame_rate,
            hero: Hero::new(frame_rate, &tuning),
            enemies: Vec::new(),
            bullets: Vec::new(),
            intent: (0, 0),
            score: tuning.initial_score,
            rng,
            next_enemy_id: 0,
            next_bullet_id: 0,
            tuning,
        };
        world.refresh_anchor();
        world
    }

    fn refresh_anchor(&mut self) {
        let (offset_x, offset_y) = self.scroll.offsets();
        let step = self.scroll.step(self.viewport.distance());
        self.viewport.set_scroll(offset_x, offset_y, step);
    }

    fn enemy_index(&self, enemy_id: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|enemy| enemy.id == enemy_id)
    }

    fn enemy_mut(&mut self, enemy_id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id == enemy_id)
    }

    fn scroll(&mut self, out_events: &mut Vec<Event>) {
        let distance = self.viewport.distance();
        let step = self.scroll.step(distance);
        let clearance = 1.5 * distance - self.viewport.hero_radius();
        let (right, down) = self.intent;

        let dx = self
            .scroll
            .gate(Axis::Horizontal, right, self.grid.view(), step, clearance);
        let dy = self
            .scroll
            .gate(Axis::Vertical, down, self.grid.view(), step, clearance);
        if dx == 0 && dy == 0 {
            return;
        }

        self.grid.set(CellCoord::middle(), Cell::Empty);
        self.rotate(Axis::Horizontal, out_events);
        self.rotate(Axis::Vertical, out_events);
        self.grid.set(CellCoord::middle(), Cell::Hero);
        self.refresh_anchor();

        for bullet in &mut self.bullets {
            bullet.place(dx as f32 * step, dy as f32 * step);
        }
        self.cull_bullets(out_events);
        out_events.push(Event::MazeMoved { dx, dy });
    }

    fn rotate(&mut self, axis: Axis, out_events: &mut Vec<Event>) {
        let shift = self.scroll.take_rotation(axis);
        if shift == 0 {
            return;
        }
        let (columns, rows) = match axis {
            Axis::Horizontal => (shift, 0),
            Axis::Vertical => (0, shift),
        };
        self.grid.rotate_columns(columns);
        self.grid.rotate_rows(rows);
        for enemy in &mut self.enemies {
            enemy.cell = enemy.cell.offset(columns, rows);
        }
        out_events.push(Event::MazeRotated { axis, sign: shift });
        self.cull_enemies(out_events);

        if self.scroll.take_regeneration(axis) {
            let (rotate_x, rotate_y) = self.scroll.rotations();
            match axis {
                Axis::Horizontal => {
                    generation::regenerate_columns(&mut self.grid, &mut self.rng, rotate_y)
                }
                Axis::Vertical => {
                    generation::regenerate_rows(&mut self.grid, &mut self.rng, rotate_x)
                }
            }
            debug!(?axis, "regenerated maze slice");
            out_events.push(Event::SliceRegenerated { axis });
        }
    }

    fn cull_enemies(&mut self, out_events: &mut Vec<Event>) {
        let (kept, culled): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut self.enemies)
            .into_iter()
            .partition(|enemy| self.viewport.contains(enemy.cell));
        self.enemies = kept;
        for enemy in culled {
            self.bury(&enemy);
            trace!(enemy = enemy.id.get(), "enemy scrolled out of view");
            out_events.push(Event::EnemyCulled { enemy: enemy.id });
        }
    }

    fn cull_bullets(&mut self, out_events: &mut Vec<Event>) {
        let viewport = &self.viewport;
        let (kept, culled): (Vec<Bullet>, Vec<Bullet>) = std::mem::take(&mut self.bullets)
            .into_iter()
            .partition(|bullet| viewport.contains(viewport.cell_at(bullet.position())));
        self.bullets = kept;
        for bullet in culled {
            trace!(bullet = bullet.id.get(), "bullet scrolled out of view");
            out_events.push(Event::BulletRemoved { bullet: bullet.id });
        }
    }

    fn bury(&mut self, enemy: &Enemy) {
        let remains = if enemy.awake { Cell::Empty } else { Cell::Wall };
        self.vacate(enemy.cell, remains);
    }

    /// Overwrites an enemy's old cell unless the hero is standing on it.
    fn vacate(&mut self, cell: CellCoord, remains: Cell) {
        if cell != CellCoord::middle() {
            self.grid.set(cell, remains);
        }
    }

    fn spawn_enemy(&mut self, cell: CellCoord, kind: EnemyKind, out_events: &mut Vec<Event>) {
        if !self.viewport.contains(cell) || self.grid.get(cell) != Cell::Wall {
            return;
        }
        let enemy_id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        self.grid.set(cell, Cell::Enemy);
        self.enemies
            .push(Enemy::new(enemy_id, cell, kind, self.frame_rate, &self.tuning));
        trace!(enemy = enemy_id.get(), ?cell, ?kind, "enemy spawned");
        out_events.push(Event::EnemySpawned {
            enemy: enemy_id,
            cell,
            kind,
        });
    }

    fn step_enemy(&mut self, enemy_id: EnemyId, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(index) = self.enemy_index(enemy_id) else {
            return;
        };
        let from = self.enemies[index].cell;
        let to = from.neighbour(direction);
        if !self.enemies[index].is_idle() || self.grid.get(to) != Cell::Empty {
            return;
        }
        self.vacate(from, Cell::Empty);
        self.grid.set(to, Cell::Enemy);
        self.enemies[index].step(to, self.frame_rate, &self.tuning);
        out_events.push(Event::EnemyStepped {
            enemy: enemy_id,
            from,
            to,
        });
    }

    fn enemy_fire(&mut self, enemy_id: EnemyId, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.iter_mut().find(|enemy| enemy.id == enemy_id) else {
            return;
        };
        if !enemy.is_idle() || !enemy.can_strike() {
            return;
        }
        enemy.strike(&self.tuning);
        let position = enemy.position(&self.viewport, self.frame_rate, &self.tuning);
        let source = BulletSource::Enemy(enemy.kind);
        let angle = position.angle_from(self.viewport.hero()) + PI;
        self.fire(position, angle, source, out_events);
    }

    fn fire(
        &mut self,
        position: PixelPoint,
        angle: f32,
        source: BulletSource,
        out_events: &mut Vec<Event>,
    ) {
        let bullet = BulletId::new(self.next_bullet_id);
        self.next_bullet_id = self.next_bullet_id.wrapping_add(1);
        self.bullets
            .push(Bullet::new(bullet, position, angle, source, &self.tuning));
        out_events.push(Event::BulletFired { bullet, source });
    }

    fn advance_characters(&mut self, out_events: &mut Vec<Event>) {
        let clockwise = self.rng.gen::<bool>();
        self.hero.update(self.frame_rate, &self.tuning, clockwise);
        if let Some(angle) = self.hero.try_fire(&self.tuning) {
            self.fire(self.viewport.hero(), angle, BulletSource::Hero, out_events);
        }

        for enemy in &mut self.enemies {
            enemy.update(self.frame_rate, &self.tuning);
        }
        let distance = self.viewport.distance();
        for bullet in &mut self.bullets {
            bullet.update(self.frame_rate, distance, &self.tuning);
        }
    }

    fn resolve_casualties(&mut self, out_events: &mut Vec<Event>) {
        let max_wound = self.tuning.enemy_hp;
        let (alive, dead): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut self.enemies)
            .into_iter()
            .partition(|enemy| enemy.wound < max_wound);
        self.enemies = alive;
        for enemy in dead {
            self.score += f64::from(enemy.wound);
            self.bury(&enemy);
            debug!(enemy = enemy.id.get(), score = self.score, "enemy killed");
            out_events.push(Event::EnemyKilled {
                enemy: enemy.id,
                wound: enemy.wound,
            });
        }

        let (flying, fallen): (Vec<Bullet>, Vec<Bullet>) = std::mem::take(&mut self.bullets)
            .into_iter()
            .partition(|bullet| !bullet.spent && !bullet.is_expired());
        self.bullets = flying;
        for bullet in fallen {
            out_events.push(Event::BulletRemoved { bullet: bullet.id });
        }

        if self.hero.check_death(&self.tuning) {
            info!(score = self.score, "hero died");
            out_events.push(Event::HeroDied { score: self.score });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the hero is dead only [`Command::Resize`] has any effect.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.hero.is_dead() && !matches!(command, Command::Resize { .. }) {
        return;
    }

    match command {
        Command::Control {
            right,
            down,
            angle,
            firing,
            slashing,
        } => {
            world.intent = (right.signum(), down.signum());
            world.hero.control(angle, firing, slashing);
        }
        Command::Tick { frame_rate } => {
            if !(frame_rate.is_finite() && frame_rate > 0.0) {
                return;
            }
            world.scroll.rescale(frame_rate, world.tuning.move_speed);
            world.frame_rate = frame_rate;
            world.refresh_anchor();
            out_events.push(Event::TimeAdvanced { frame_rate });
        }
        Command::Scroll => world.scroll(out_events),
        Command::Resize { width, height } => {
            world.viewport = Viewport::new(width, height);
            world.refresh_anchor();
            out_events.push(Event::Resized {
                width: world.viewport.width(),
                height: world.viewport.height(),
            });
        }
        Command::SpawnEnemy { cell, kind } => world.spawn_enemy(cell, kind, out_events),
        Command::WakeEnemy { enemy } => {
            if let Some(target) = world.enemy_mut(enemy) {
                if !target.awake {
                    target.awake = true;
                    out_events.push(Event::EnemyWoke { enemy });
                }
            }
        }
        Command::StepEnemy { enemy, direction } => world.step_enemy(enemy, direction, out_events),
        Command::SpinEnemy { enemy, clockwise } => {
            if let Some(target) = world.enemy_mut(enemy) {
                if target.is_idle() {
                    target.spin(clockwise);
                    out_events.push(Event::EnemySpun { enemy });
                }
            }
        }
        Command::EnemyFire { enemy } => world.enemy_fire(enemy, out_events),
        Command::AdvanceCharacters => world.advance_characters(out_events),
        Command::WoundHero { amount } => {
            if amount > 0.0 {
                world.hero.wound(amount);
                out_events.push(Event::HeroWounded { amount });
            }
        }
        Command::WoundEnemy { enemy, amount } => {
            if let Some(target) = world.enemy_mut(enemy) {
                target.wound += amount.max(0.0);
            }
        }
        Command::DestroyBullet { bullet } => {
            if let Some(target) = world.bullets.iter_mut().find(|target| target.id == bullet) {
                target.spent = true;
            }
        }
        Command::ResolveCasualties => world.resolve_casualties(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use brutal_maze_core::{BulletView, EnemyView, HeroSnapshot, MazeView, Tuning, Viewport};

    use super::World;

    /// Provides read-only access to the tuning the world runs with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Provides read-only access to the grid-to-pixel mapping.
    #[must_use]
    pub fn viewport(world: &World) -> &Viewport {
        &world.viewport
    }

    /// Exposes a read-only view of the maze grid.
    #[must_use]
    pub fn maze(world: &World) -> MazeView<'_> {
        world.grid.view()
    }

    /// Captures the hero's state.
    #[must_use]
    pub fn hero(world: &World) -> HeroSnapshot {
        world.hero.snapshot(&world.tuning)
    }

    /// Captures a read-only view of the enemies inhabiting the maze.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| enemy.snapshot(&world.viewport, world.frame_rate, &world.tuning))
                .collect(),
        )
    }

    /// Captures a read-only view of the bullets in flight.
    #[must_use]
    pub fn bullet_view(world: &World) -> BulletView {
        BulletView::from_snapshots(
            world
                .bullets
                .iter()
                .map(|bullet| bullet.snapshot(&world.tuning))
                .collect(),
        )
    }

    /// Raw score, including the initial score.
    #[must_use]
    pub fn score(world: &World) -> f64 {
        world.score
    }

    /// Score shown to players: points earned beyond the initial score.
    #[must_use]
    pub fn displayed_score(world: &World) -> u64 {
        (world.score - world.tuning.initial_score).max(0.0).floor() as u64
    }

    /// Frame rate of the most recent tick.
    #[must_use]
    pub fn frame_rate(world: &World) -> f32 {
        world.frame_rate
    }

    /// Captures the scroll offsets and rotation accumulators.
    #[must_use]
    pub fn scroll(world: &World) -> ScrollSnapshot {
        let (offset_x, offset_y) = world.scroll.offsets();
        let (rotate_x, rotate_y) = world.scroll.rotations();
        ScrollSnapshot {
            offset_x,
            offset_y,
            rotate_x,
            rotate_y,
            frames_per_cell: world.scroll.speed(),
        }
    }

    /// Reports whether the run has ended.
    #[must_use]
    pub fn is_over(world: &World) -> bool {
        world.hero.is_dead()
    }

    /// Scroll progress of the maze.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ScrollSnapshot {
        /// Column-axis offset in frames of movement.
        pub offset_x: f32,
        /// Row-axis offset in frames of movement.
        pub offset_y: f32,
        /// Column rotations since the last column regeneration.
        pub rotate_x: i32,
        /// Row rotations since the last row regeneration.
        pub rotate_y: i32,
        /// Frames of movement that make up one cell.
        pub frames_per_cell: f32,
    }
}
