#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Brutal Maze engine.
//!
//! This crate defines the message surface that connects hosts, the
//! authoritative world, and pure systems. Hosts and systems submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values describing
//! what changed. Systems consume event streams, query immutable views such as
//! [`MazeView`] and [`Viewport`], and respond exclusively with new command
//! batches.

use std::f32::consts::{PI, SQRT_2};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width, in cells, of every corridor and every wall run.
pub const ROAD_WIDTH: usize = 5;

/// Width, in cells, of one maze slice (a wall run plus a corridor).
pub const CELL_WIDTH: usize = ROAD_WIDTH * 2;

/// Number of maze slices laid out along each axis of the grid.
pub const MAZE_SIZE: usize = 12;

/// Number of cells along each side of the square grid.
pub const GRID_SIDE: usize = MAZE_SIZE * CELL_WIDTH;

/// Logical index of the column and row the hero is pinned to.
pub const MIDDLE: i32 = ((MAZE_SIZE + MAZE_SIZE % 2 - 1) * ROAD_WIDTH + ROAD_WIDTH / 2) as i32;

/// First row rewritten when a cell-row of maze is regenerated.
pub const LAST_ROW: i32 = ((MAZE_SIZE - 1) * CELL_WIDTH) as i32;

/// Base of the logarithm relating score to the enemy population.
pub const GOLDEN_MEAN: f64 = 1.618_033_988_749_895;

/// Score every run starts with; players are shown the score above it.
pub const INIT_SCORE: f64 = 208.2016;

/// State of a single maze cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Traversable floor.
    #[default]
    Empty,
    /// Solid wall blocking movement and line of sight.
    Wall,
    /// Marker occupying the fixed logical centre where the hero stands.
    Hero,
    /// Marker occupying the cell of a live enemy.
    Enemy,
}

/// Location of a single grid cell expressed as logical column and row indices.
///
/// Indices outside `0..GRID_SIDE` wrap around, mirroring the ring-buffer storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Coordinate of the cell the hero is pinned to.
    #[must_use]
    pub const fn middle() -> Self {
        Self::new(MIDDLE, MIDDLE)
    }

    /// Logical column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Logical row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the coordinate translated by the provided deltas.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self::new(self.column + columns, self.row + rows)
    }

    /// Returns the neighbouring cell in the provided direction.
    #[must_use]
    pub const fn neighbour(self, direction: Direction) -> Self {
        let (columns, rows) = direction.delta();
        self.offset(columns, rows)
    }

    /// Reports whether both coordinates lie within `radius` cells of `other` on each axis.
    #[must_use]
    pub fn is_within(self, other: CellCoord, radius: u32) -> bool {
        self.column.abs_diff(other.column) <= radius && self.row.abs_diff(other.row) <= radius
    }
}

/// Axis along which the maze scrolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Column axis; positive values scroll toward increasing column indices.
    Horizontal,
    /// Row axis; positive values scroll toward increasing row indices.
    Vertical,
}

/// Cardinal movement directions available to enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All cardinal directions in clockwise order starting east.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    /// Column and row delta of a single step in the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Converts a unit delta back into a direction, if it is one.
    #[must_use]
    pub const fn from_delta(columns: i32, rows: i32) -> Option<Self> {
        match (columns, rows) {
            (0, -1) => Some(Self::North),
            (1, 0) => Some(Self::East),
            (0, 1) => Some(Self::South),
            (-1, 0) => Some(Self::West),
            _ => None,
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BulletId(u32);

impl BulletId {
    /// Creates a new bullet identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Palette family of an enemy. Each family has three shades, one per wound stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Yellow family.
    Butter,
    /// Orange family.
    Orange,
    /// Brown family.
    Chocolate,
    /// Green family.
    Chameleon,
    /// Blue family.
    SkyBlue,
    /// Purple family.
    Plum,
    /// Red family.
    ScarletRed,
}

impl EnemyKind {
    /// Every enemy kind, in palette order.
    pub const ALL: [EnemyKind; 7] = [
        EnemyKind::Butter,
        EnemyKind::Orange,
        EnemyKind::Chocolate,
        EnemyKind::Chameleon,
        EnemyKind::SkyBlue,
        EnemyKind::Plum,
        EnemyKind::ScarletRed,
    ];
}

/// Who fired a bullet. Plays the role of the bullet colour when resolving hits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BulletSource {
    /// Fired by the hero; damages enemies and is stopped by walls.
    Hero,
    /// Fired by an enemy of the given kind; damages the hero.
    Enemy(EnemyKind),
}

/// Continuous position measured in surface pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelPoint {
    /// Horizontal pixel coordinate.
    pub x: f32,
    /// Vertical pixel coordinate.
    pub y: f32,
}

impl PixelPoint {
    /// Creates a new pixel-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance_to(self, other: PixelPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle of the vector pointing from `origin` to this point, in radians.
    #[must_use]
    pub fn angle_from(self, origin: PixelPoint) -> f32 {
        (self.y - origin.y).atan2(self.x - origin.x)
    }
}

/// Inclusive span of logical indices along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellSpan {
    first: i32,
    last: i32,
}

impl CellSpan {
    /// Creates the span `MIDDLE - half_extent ..= MIDDLE + half_extent`.
    #[must_use]
    pub const fn around_middle(half_extent: i32) -> Self {
        Self {
            first: MIDDLE - half_extent,
            last: MIDDLE + half_extent,
        }
    }

    /// First index contained in the span.
    #[must_use]
    pub const fn first(&self) -> i32 {
        self.first
    }

    /// Last index contained in the span.
    #[must_use]
    pub const fn last(&self) -> i32 {
        self.last
    }

    /// Reports whether the index falls within the span.
    #[must_use]
    pub const fn contains(&self, index: i32) -> bool {
        self.first <= index && index <= self.last
    }

    /// Iterates over every index of the span in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i32> {
        self.first..=self.last
    }
}

/// Affine mapping between grid indices and surface pixels plus the visible index window.
///
/// Every position conversion in the engine goes through a single `distance`
/// (pixels per cell) scalar. The hero is drawn at the surface centre; the
/// anchor is the pixel position of the centre cell after applying the current
/// sub-cell scroll offsets.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    distance: f32,
    hero_radius: f32,
    step: f32,
    hero: PixelPoint,
    anchor: PixelPoint,
    columns: CellSpan,
    rows: CellSpan,
}

impl Viewport {
    /// Derives the viewport of a surface sized `width × height` with no scroll applied.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let area = width as f32 * height as f32;
        let distance = (area / 416.0).sqrt();
        let hero_radius = (area / (PI * 2.0 / 3.0).sin() / 624.0).sqrt();
        let hero = PixelPoint::new((width >> 1) as f32, (height >> 1) as f32);

        Self {
            width,
            height,
            distance,
            hero_radius,
            step: 0.0,
            hero,
            anchor: hero,
            columns: CellSpan::around_middle(half_extent(width, distance)),
            rows: CellSpan::around_middle(half_extent(height, distance)),
        }
    }

    /// Moves the anchor by the provided scroll offsets, measured in frames of `step` pixels.
    pub fn set_scroll(&mut self, offset_x: f32, offset_y: f32, step: f32) {
        self.step = step;
        self.anchor = PixelPoint::new(
            self.hero.x + offset_x * step,
            self.hero.y + offset_y * step,
        );
    }

    /// Surface width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Side length of one cell in pixels.
    #[must_use]
    pub const fn distance(&self) -> f32 {
        self.distance
    }

    /// Pixels the maze scrolls per frame of movement.
    #[must_use]
    pub const fn step(&self) -> f32 {
        self.step
    }

    /// Circumradius of the hero's body in pixels.
    #[must_use]
    pub const fn hero_radius(&self) -> f32 {
        self.hero_radius
    }

    /// Reach of a slash, measured from the slasher's centre.
    #[must_use]
    pub fn slash_distance(&self) -> f32 {
        self.hero_radius + self.distance / SQRT_2
    }

    /// Pixel position of the hero.
    #[must_use]
    pub const fn hero(&self) -> PixelPoint {
        self.hero
    }

    /// Pixel position of the centre cell after scrolling.
    #[must_use]
    pub const fn anchor(&self) -> PixelPoint {
        self.anchor
    }

    /// Visible column window.
    #[must_use]
    pub const fn columns(&self) -> CellSpan {
        self.columns
    }

    /// Visible row window.
    #[must_use]
    pub const fn rows(&self) -> CellSpan {
        self.rows
    }

    /// Reports whether the cell lies inside the visible window.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        self.columns.contains(cell.column()) && self.rows.contains(cell.row())
    }

    /// Pixel position of the centre of a cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> PixelPoint {
        PixelPoint::new(
            (cell.column() - MIDDLE) as f32 * self.distance + self.anchor.x,
            (cell.row() - MIDDLE) as f32 * self.distance + self.anchor.y,
        )
    }

    /// Cell containing a pixel position on the scrolled grid. Inverse of
    /// [`Viewport::cell_center`].
    #[must_use]
    pub fn cell_at(&self, point: PixelPoint) -> CellCoord {
        CellCoord::new(
            MIDDLE + ((point.x - self.anchor.x) / self.distance).round() as i32,
            MIDDLE + ((point.y - self.anchor.y) / self.distance).round() as i32,
        )
    }
}

fn half_extent(pixels: u32, distance: f32) -> i32 {
    ((pixels as f32 / distance + 2.0) / 2.0) as i32
}

/// Placement of a ring-buffered square grid inside dense column-major storage.
///
/// Rotations only move the origins, so scrolling costs O(1) regardless of
/// grid size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RingLayout {
    columns: usize,
    rows: usize,
    column_origin: usize,
    row_origin: usize,
}

impl RingLayout {
    /// Creates a layout with both origins at zero.
    #[must_use]
    pub const fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            column_origin: 0,
            row_origin: 0,
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cells backing the layout.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns * self.rows
    }

    /// Reports whether the layout has no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage index of a logical cell, wrapping out-of-range indices.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let column = (wrap(cell.column(), self.columns) + self.column_origin) % self.columns;
        let row = (wrap(cell.row(), self.rows) + self.row_origin) % self.rows;
        Some(column * self.rows + row)
    }

    /// Circularly shifts columns: afterwards logical column `c` holds what was at `c - shift`.
    pub fn rotate_columns(&mut self, shift: i32) {
        if self.columns > 0 {
            self.column_origin = wrap(self.column_origin as i32 - shift, self.columns);
        }
    }

    /// Circularly shifts rows: afterwards logical row `r` holds what was at `r - shift`.
    pub fn rotate_rows(&mut self, shift: i32) {
        if self.rows > 0 {
            self.row_origin = wrap(self.row_origin as i32 - shift, self.rows);
        }
    }
}

fn wrap(index: i32, len: usize) -> usize {
    index.rem_euclid(len as i32) as usize
}

/// Read-only view into the ring-buffered maze grid.
#[derive(Clone, Copy, Debug)]
pub struct MazeView<'a> {
    cells: &'a [Cell],
    layout: RingLayout,
}

impl<'a> MazeView<'a> {
    /// Captures a view over column-major cells with both origins at zero.
    #[must_use]
    pub fn new(cells: &'a [Cell], columns: usize, rows: usize) -> Self {
        Self::with_layout(cells, RingLayout::new(columns, rows))
    }

    /// Captures a view over cells placed according to `layout`.
    #[must_use]
    pub fn with_layout(cells: &'a [Cell], layout: RingLayout) -> Self {
        Self { cells, layout }
    }

    /// Returns the state of a cell. Storage gaps read as walls.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Cell {
        self.layout
            .index(coord)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(Cell::Wall)
    }

    /// Reports whether the cell is a wall.
    #[must_use]
    pub fn is_wall(&self, coord: CellCoord) -> bool {
        self.cell(coord) == Cell::Wall
    }

    /// Reports whether the cell is free floor.
    #[must_use]
    pub fn is_empty(&self, coord: CellCoord) -> bool {
        self.cell(coord) == Cell::Empty
    }

    /// Provides the dimensions of the underlying grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.layout.columns(), self.layout.rows())
    }
}

/// Immutable representation of the hero used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroSnapshot {
    /// Accumulated damage.
    pub wound: f32,
    /// Wound level the hero cannot survive.
    pub max_wound: f32,
    /// Heading of the hero in radians.
    pub angle: f32,
    /// Frames needed to complete one slash.
    pub spin_speed: f32,
    /// Frames left in the current slash, signed by spin direction.
    pub spin_queue: f32,
    /// Whether the player holds the close-range attack.
    pub slashing: bool,
    /// Whether the player holds the long-range attack.
    pub firing: bool,
    /// Whether the run has ended.
    pub dead: bool,
}

impl HeroSnapshot {
    /// Reports whether a slash is in progress.
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.spin_queue != 0.0
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Grid cell currently occupied by the enemy.
    pub cell: CellCoord,
    /// Palette family of the enemy.
    pub kind: EnemyKind,
    /// Pixel position, including sub-cell movement.
    pub position: PixelPoint,
    /// Whether the enemy has seen the hero.
    pub awake: bool,
    /// Accumulated damage.
    pub wound: f32,
    /// Wound level at which the enemy dies.
    pub max_wound: f32,
    /// Heading of the enemy in radians.
    pub angle: f32,
    /// Frames needed to complete one spin attack.
    pub spin_speed: f32,
    /// Frames left in the current spin attack, signed by spin direction.
    pub spin_queue: f32,
    /// Whether the enemy is still sliding toward its cell.
    pub moving: bool,
    /// Whether the enemy's strike cooldown has elapsed.
    pub ready_to_strike: bool,
}

impl EnemySnapshot {
    /// Reports whether a spin attack is in progress.
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.spin_queue != 0.0
    }

    /// Reports whether the enemy is awake and free to choose its next action.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.awake && !self.moving && !self.is_spinning()
    }
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of live enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single bullet used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletSnapshot {
    /// Unique identifier assigned to the bullet.
    pub id: BulletId,
    /// Pixel position of the bullet's centre.
    pub position: PixelPoint,
    /// Direction of travel in radians.
    pub angle: f32,
    /// Who fired the bullet.
    pub source: BulletSource,
    /// Remaining fraction of the bullet's lifetime; also the wound it inflicts.
    pub remaining: f32,
}

/// Read-only snapshot describing all bullets in flight.
#[derive(Clone, Debug, Default)]
pub struct BulletView {
    snapshots: Vec<BulletSnapshot>,
}

impl BulletView {
    /// Creates a new bullet view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BulletSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &BulletSnapshot> {
        self.snapshots.iter()
    }

    /// Number of bullets in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no bullet is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Gameplay tuning constants.
///
/// The damage formulas keep their structure; these values only set the
/// balance and may be overridden from configuration files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Hero scrolling speed in cells per second.
    pub move_speed: f32,
    /// Number of wound stages the hero survives.
    pub hero_hp: f32,
    /// Number of wound stages an enemy survives.
    pub enemy_hp: f32,
    /// Wound healed per second.
    pub heal_speed: f32,
    /// Cooldown between strikes, in milliseconds.
    pub attack_speed_ms: f32,
    /// Flight time of a bullet, in milliseconds.
    pub bullet_lifetime_ms: f32,
    /// Bullet speed in cells per second.
    pub bullet_speed: f32,
    /// Enemy walking speed in cells per second.
    pub enemy_speed: f32,
    /// Maximum distance, in cells, from which enemies shoot.
    pub fire_range: f32,
    /// Score a run starts with.
    pub initial_score: f64,
    /// Frame rate assumed before the host reports one.
    pub frame_rate: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            hero_hp: 6.0,
            enemy_hp: 3.0,
            heal_speed: 1.0,
            attack_speed_ms: 333.333,
            bullet_lifetime_ms: 1000.0,
            bullet_speed: 15.0,
            enemy_speed: 6.0,
            fire_range: 6.0,
            initial_score: INIT_SCORE,
            frame_rate: 30.0,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Records the player's input for the current frame.
    Control {
        /// Requested maze scroll along columns, in `-1..=1`.
        right: i32,
        /// Requested maze scroll along rows, in `-1..=1`.
        down: i32,
        /// Heading the hero should face, in radians.
        angle: f32,
        /// Whether the long-range attack is held.
        firing: bool,
        /// Whether the close-range attack is held.
        slashing: bool,
    },
    /// Starts a frame at the provided frame rate, rescaling speed-dependent state.
    Tick {
        /// Frames per second reported by the host.
        frame_rate: f32,
    },
    /// Applies the recorded scroll intent: collision gating, rotation and regeneration.
    Scroll,
    /// Resizes the render surface the world is mapped onto.
    Resize {
        /// New surface width in pixels.
        width: u32,
        /// New surface height in pixels.
        height: u32,
    },
    /// Requests that a sleeping enemy be created on a wall cell.
    SpawnEnemy {
        /// Wall cell the enemy takes over.
        cell: CellCoord,
        /// Palette family of the new enemy.
        kind: EnemyKind,
    },
    /// Wakes a sleeping enemy that can see the hero.
    WakeEnemy {
        /// Identifier of the enemy to wake.
        enemy: EnemyId,
    },
    /// Requests that an idle enemy walk one cell.
    StepEnemy {
        /// Identifier of the walking enemy.
        enemy: EnemyId,
        /// Direction of the step.
        direction: Direction,
    },
    /// Starts an enemy's spinning melee attack.
    SpinEnemy {
        /// Identifier of the attacking enemy.
        enemy: EnemyId,
        /// Whether the spin turns clockwise.
        clockwise: bool,
    },
    /// Requests that an enemy shoot at the hero.
    EnemyFire {
        /// Identifier of the shooting enemy.
        enemy: EnemyId,
    },
    /// Advances hero, enemy and bullet motion by one frame.
    AdvanceCharacters,
    /// Adds damage to the hero.
    WoundHero {
        /// Wound to add.
        amount: f32,
    },
    /// Adds damage to an enemy. Death is settled by [`Command::ResolveCasualties`].
    WoundEnemy {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Wound to add.
        amount: f32,
    },
    /// Marks a bullet as spent. Removal is settled by [`Command::ResolveCasualties`].
    DestroyBullet {
        /// Identifier of the spent bullet.
        bullet: BulletId,
    },
    /// Removes dead enemies and spent bullets, scores kills and checks the hero.
    ResolveCasualties,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that a new frame started.
    TimeAdvanced {
        /// Frames per second of the frame.
        frame_rate: f32,
    },
    /// Confirms that a scroll move passed the collision gate.
    MazeMoved {
        /// Accepted column-axis delta.
        dx: i32,
        /// Accepted row-axis delta.
        dy: i32,
    },
    /// Reports a one-cell rotation of the grid.
    MazeRotated {
        /// Axis that rotated.
        axis: Axis,
        /// Direction of the rotation.
        sign: i32,
    },
    /// Reports that a slice of fresh maze replaced the far edge.
    SliceRegenerated {
        /// Axis whose accumulator triggered the regeneration.
        axis: Axis,
    },
    /// Confirms that an enemy was created.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Cell the enemy occupies.
        cell: CellCoord,
        /// Palette family of the enemy.
        kind: EnemyKind,
    },
    /// Confirms that an enemy woke up.
    EnemyWoke {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// Reports that an enemy scrolled out of the visible window and was removed.
    EnemyCulled {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
    },
    /// Confirms that an enemy walked between two cells.
    EnemyStepped {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Cell the enemy left.
        from: CellCoord,
        /// Cell the enemy entered.
        to: CellCoord,
    },
    /// Confirms that an enemy started a spin attack.
    EnemySpun {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// Confirms that a bullet was fired.
    BulletFired {
        /// Identifier assigned to the bullet.
        bullet: BulletId,
        /// Who fired it.
        source: BulletSource,
    },
    /// Reports that a bullet left play.
    BulletRemoved {
        /// Identifier of the bullet.
        bullet: BulletId,
    },
    /// Reports that an enemy died in combat.
    EnemyKilled {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Wound accumulated at death; added to the score.
        wound: f32,
    },
    /// Reports damage taken by the hero.
    HeroWounded {
        /// Wound added.
        amount: f32,
    },
    /// Reports the end of the run.
    HeroDied {
        /// Final raw score.
        score: f64,
    },
    /// Confirms a change of surface size.
    Resized {
        /// Surface width in pixels.
        width: u32,
        /// Surface height in pixels.
        height: u32,
    },
}

/// Contract violations reported by the simulation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SimulationError {
    /// A frame was requested after the hero died.
    #[error("simulation already ended with score {score:.2}")]
    Terminated {
        /// Final raw score of the run.
        score: f64,
    },
    /// The host reported a frame rate that cannot drive the simulation.
    #[error("frame rate must be positive and finite, got {frame_rate}")]
    InvalidFrameRate {
        /// Offending frame rate.
        frame_rate: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_matches_grid_constants() {
        assert_eq!(MIDDLE, 57);
        assert_eq!(LAST_ROW, 110);
        assert_eq!(GRID_SIDE, 120);
    }

    #[test]
    fn viewport_maps_cells_through_single_distance() {
        let mut viewport = Viewport::new(640, 480);
        let distance = viewport.distance();
        assert!((distance - (640.0_f32 * 480.0 / 416.0).sqrt()).abs() < 1e-3);

        let hero = viewport.cell_center(CellCoord::middle());
        assert_eq!(hero, viewport.hero());

        viewport.set_scroll(2.0, -1.0, 3.0);
        let east = viewport.cell_center(CellCoord::middle().offset(1, 0));
        assert!((east.x - (320.0 + distance + 6.0)).abs() < 1e-3);
        assert!((east.y - (240.0 - 3.0)).abs() < 1e-3);
    }

    #[test]
    fn viewport_window_is_centered_on_middle() {
        let viewport = Viewport::new(640, 480);
        assert_eq!(viewport.columns(), CellSpan::around_middle(12));
        assert_eq!(viewport.rows(), CellSpan::around_middle(9));
        assert!(viewport.contains(CellCoord::new(MIDDLE + 12, MIDDLE - 9)));
        assert!(!viewport.contains(CellCoord::new(MIDDLE + 13, MIDDLE)));
    }

    #[test]
    fn cell_at_inverts_cell_center() {
        let mut viewport = Viewport::new(800, 600);
        let cell = CellCoord::new(MIDDLE - 4, MIDDLE + 3);
        assert_eq!(viewport.cell_at(viewport.cell_center(cell)), cell);

        let step = viewport.distance() / 5.0;
        viewport.set_scroll(4.0, -3.0, step);
        assert_eq!(viewport.cell_at(viewport.cell_center(cell)), cell);
        let wall = CellCoord::new(MIDDLE + 3, MIDDLE);
        assert_eq!(viewport.cell_at(viewport.cell_center(wall)), wall);
        let center = viewport.cell_center(wall);
        let nudged = PixelPoint::new(center.x + viewport.distance() * 0.4, center.y);
        assert_eq!(viewport.cell_at(nudged), wall);
    }

    #[test]
    fn ring_layout_rotation_shifts_logical_cells() {
        let cells: Vec<Cell> = (0..12)
            .map(|index| if index % 5 == 0 { Cell::Wall } else { Cell::Empty })
            .collect();
        let mut layout = RingLayout::new(4, 3);
        let before: Vec<Cell> = (0..4)
            .flat_map(|column| (0..3).map(move |row| CellCoord::new(column, row)))
            .map(|cell| MazeView::with_layout(&cells, layout).cell(cell))
            .collect();

        layout.rotate_columns(1);
        let view = MazeView::with_layout(&cells, layout);
        assert_eq!(view.cell(CellCoord::new(1, 0)), before[0]);
        assert_eq!(view.cell(CellCoord::new(0, 0)), before[9]);

        layout.rotate_columns(-1);
        layout.rotate_rows(2);
        layout.rotate_rows(-2);
        assert_eq!(layout, RingLayout::new(4, 3));
    }

    #[test]
    fn maze_view_wraps_negative_indices() {
        let mut cells = vec![Cell::Empty; 9];
        cells[8] = Cell::Wall;
        let view = MazeView::new(&cells, 3, 3);
        assert!(view.is_wall(CellCoord::new(-1, -1)));
        assert!(view.is_empty(CellCoord::new(0, 0)));
    }

    #[test]
    fn empty_maze_view_reads_walls() {
        let view = MazeView::new(&[], 0, 0);
        assert!(view.is_wall(CellCoord::middle()));
    }

    #[test]
    fn direction_delta_round_trips() {
        for direction in Direction::ALL {
            let (columns, rows) = direction.delta();
            assert_eq!(Direction::from_delta(columns, rows), Some(direction));
        }
        assert_eq!(Direction::from_delta(0, 0), None);
    }

    #[test]
    fn partial_tuning_fills_defaults() {
        let tuning: Tuning = toml::from_str("move_speed = 8.0\nhero_hp = 4.0\n").expect("parse");
        assert_eq!(tuning.move_speed, 8.0);
        assert_eq!(tuning.hero_hp, 4.0);
        assert_eq!(tuning.enemy_hp, Tuning::default().enemy_hp);
    }

    #[test]
    fn terminated_error_mentions_score() {
        let message = SimulationError::Terminated { score: 12.5 }.to_string();
        assert!(message.contains("12.50"));
    }
}
