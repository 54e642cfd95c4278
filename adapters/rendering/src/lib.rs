#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Brutal Maze adapters.
//!
//! Adapters implement [`RenderSurface`]; a [`Scene`] captured from the world
//! views turns itself into background and polygon fills on that surface.

use std::f32::consts::{FRAC_PI_4, SQRT_2, TAU};

use anyhow::Result as AnyResult;
use brutal_maze_core::{
    BulletSource, BulletView, Cell, CellCoord, EnemyKind, EnemyView, HeroSnapshot, MazeView,
    PixelPoint, Viewport,
};
use glam::Vec2;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Perceived brightness in the range 0.0..=1.0.
    #[must_use]
    pub fn luminance(self) -> f32 {
        0.2126 * self.red + 0.7152 * self.green + 0.0722 * self.blue
    }
}

/// Tango desktop palette.
pub mod palette {
    use super::Color;
    use brutal_maze_core::EnemyKind;

    /// Aluminium shades from lightest to darkest; the hero darkens as it is wounded.
    pub const ALUMINIUM: [Color; 6] = [
        Color::from_rgb_u8(238, 238, 236),
        Color::from_rgb_u8(211, 215, 207),
        Color::from_rgb_u8(186, 189, 182),
        Color::from_rgb_u8(136, 138, 133),
        Color::from_rgb_u8(85, 87, 83),
        Color::from_rgb_u8(46, 52, 54),
    ];

    /// Colour of the empty floor.
    pub const BACKGROUND: Color = ALUMINIUM[5];

    /// Colour of walls and of sleeping enemies hidden inside them.
    pub const FOREGROUND: Color = ALUMINIUM[0];

    /// Light, medium and dark shade of an enemy family.
    #[must_use]
    pub const fn shades(kind: EnemyKind) -> [Color; 3] {
        match kind {
            EnemyKind::Butter => [
                Color::from_rgb_u8(252, 233, 79),
                Color::from_rgb_u8(237, 212, 0),
                Color::from_rgb_u8(196, 160, 0),
            ],
            EnemyKind::Orange => [
                Color::from_rgb_u8(252, 175, 62),
                Color::from_rgb_u8(245, 121, 0),
                Color::from_rgb_u8(206, 92, 0),
            ],
            EnemyKind::Chocolate => [
                Color::from_rgb_u8(233, 185, 110),
                Color::from_rgb_u8(193, 125, 17),
                Color::from_rgb_u8(143, 89, 2),
            ],
            EnemyKind::Chameleon => [
                Color::from_rgb_u8(138, 226, 52),
                Color::from_rgb_u8(115, 210, 22),
                Color::from_rgb_u8(78, 154, 6),
            ],
            EnemyKind::SkyBlue => [
                Color::from_rgb_u8(114, 159, 207),
                Color::from_rgb_u8(52, 101, 164),
                Color::from_rgb_u8(32, 74, 135),
            ],
            EnemyKind::Plum => [
                Color::from_rgb_u8(173, 127, 168),
                Color::from_rgb_u8(117, 80, 123),
                Color::from_rgb_u8(92, 53, 102),
            ],
            EnemyKind::ScarletRed => [
                Color::from_rgb_u8(239, 41, 41),
                Color::from_rgb_u8(204, 0, 0),
                Color::from_rgb_u8(164, 0, 0),
            ],
        }
    }
}

/// Drawable target that scenes are rasterized onto.
pub trait RenderSurface {
    /// Adapts the surface to a new size in pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Clears the whole surface with a solid color.
    fn fill_background(&mut self, color: Color);

    /// Fills the polygon described by `points`, in pixel coordinates.
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    /// Shows everything drawn since the previous call.
    fn present(&mut self) -> AnyResult<()>;
}

/// Returns the vertices of a regular polygon with circumradius `radius`
/// whose first vertex lies at `angle` radians from `center`.
#[must_use]
pub fn regular_polygon(sides: u32, radius: f32, angle: f32, center: Vec2) -> Vec<Vec2> {
    let angle = angle.rem_euclid(TAU);
    (0..sides)
        .map(|side| {
            let theta = angle + TAU * side as f32 / sides as f32;
            center + radius * Vec2::new(theta.cos(), theta.sin())
        })
        .collect()
}

/// Filled shape ready to be sent to a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shape {
    /// Number of vertices.
    pub sides: u32,
    /// Circumradius in pixels.
    pub radius: f32,
    /// Heading of the first vertex in radians.
    pub angle: f32,
    /// Centre in pixels.
    pub center: Vec2,
    /// Fill colour.
    pub color: Color,
}

impl Shape {
    fn fill<S: RenderSurface>(&self, surface: &mut S) {
        let points = regular_polygon(self.sides, self.radius, self.angle, self.center);
        surface.fill_polygon(&points, self.color);
    }
}

/// Everything needed to draw one frame, captured from the world views.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Surface size in pixels.
    pub size: (u32, u32),
    /// Wall squares in the visible window.
    pub walls: Vec<Shape>,
    /// Enemies, sleeping ones painted in the wall colour.
    pub enemies: Vec<Shape>,
    /// The hero triangle.
    pub hero: Shape,
    /// Bullets in flight.
    pub bullets: Vec<Shape>,
}

impl Scene {
    /// Captures the visible part of the maze and every character in it.
    #[must_use]
    pub fn new(
        viewport: &Viewport,
        maze: MazeView<'_>,
        hero: &HeroSnapshot,
        enemies: &EnemyView,
        bullets: &BulletView,
    ) -> Self {
        let distance = viewport.distance();
        let mut walls = Vec::new();
        for column in viewport.columns().iter() {
            for row in viewport.rows().iter() {
                let cell = CellCoord::new(column, row);
                if maze.cell(cell) == Cell::Wall {
                    walls.push(Shape {
                        sides: 4,
                        radius: distance / SQRT_2,
                        angle: FRAC_PI_4,
                        center: to_vec2(viewport.cell_center(cell)),
                        color: palette::FOREGROUND,
                    });
                }
            }
        }

        let enemies = enemies
            .iter()
            .map(|enemy| Shape {
                sides: 4,
                radius: distance / SQRT_2 - if enemy.awake { 2.0 } else { 0.0 },
                angle: enemy.angle,
                center: to_vec2(enemy.position),
                color: if enemy.awake {
                    enemy_color(enemy.kind, enemy.wound)
                } else {
                    palette::FOREGROUND
                },
            })
            .collect();

        let bullets = bullets
            .iter()
            .map(|bullet| Shape {
                sides: 5,
                radius: (distance / 4.0).floor(),
                angle: bullet.angle,
                center: to_vec2(bullet.position),
                color: bullet_color(bullet.source),
            })
            .collect();

        Self {
            size: (viewport.width(), viewport.height()),
            walls,
            enemies,
            hero: Shape {
                sides: 3,
                radius: viewport.hero_radius(),
                angle: hero.angle,
                center: to_vec2(viewport.hero()),
                color: hero_color(hero.wound),
            },
            bullets,
        }
    }

    /// Paints the scene back to front and presents it.
    ///
    /// # Errors
    ///
    /// Propagates any failure reported by [`RenderSurface::present`].
    pub fn draw<S: RenderSurface>(&self, surface: &mut S) -> AnyResult<()> {
        surface.fill_background(palette::BACKGROUND);
        for shape in self
            .walls
            .iter()
            .chain(&self.enemies)
            .chain(std::iter::once(&self.hero))
            .chain(&self.bullets)
        {
            shape.fill(surface);
        }
        surface.present()
    }
}

/// Colour of the hero for the given accumulated wound.
#[must_use]
pub fn hero_color(wound: f32) -> Color {
    palette::ALUMINIUM[shade_index(wound, palette::ALUMINIUM.len())]
}

/// Colour of an awake enemy for the given accumulated wound.
#[must_use]
pub fn enemy_color(kind: EnemyKind, wound: f32) -> Color {
    let shades = palette::shades(kind);
    shades[shade_index(wound, shades.len())]
}

fn bullet_color(source: BulletSource) -> Color {
    match source {
        BulletSource::Hero => palette::FOREGROUND,
        BulletSource::Enemy(kind) => palette::shades(kind)[0],
    }
}

fn shade_index(wound: f32, len: usize) -> usize {
    (wound.max(0.0) as usize).min(len - 1)
}

fn to_vec2(point: PixelPoint) -> Vec2 {
    Vec2::new(point.x, point.y)
}
