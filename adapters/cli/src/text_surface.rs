//! Character-cell render surface that prints frames as text.

use std::io::Write;

use anyhow::{Context, Result};
use brutal_maze_rendering::{Color, RenderSurface};
use glam::Vec2;

/// Pixels covered by one character.
const GLYPH_SIZE: Vec2 = Vec2::new(8.0, 16.0);

/// Glyphs from darkest to brightest.
const RAMP: &[u8] = b" .:-=+*#%@";

/// Rasterizes polygons onto a grid of characters and writes it to `out`.
#[derive(Debug)]
pub(crate) struct TextSurface<W> {
    columns: usize,
    rows: usize,
    glyphs: Vec<u8>,
    out: W,
}

impl<W: Write> TextSurface<W> {
    pub(crate) fn new(width: u32, height: u32, out: W) -> Self {
        let mut surface = Self {
            columns: 0,
            rows: 0,
            glyphs: Vec::new(),
            out,
        };
        surface.resize(width, height);
        surface
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn center_of(&self, column: usize, row: usize) -> Vec2 {
        Vec2::new(column as f32 + 0.5, row as f32 + 0.5) * GLYPH_SIZE
    }
}

impl<W: Write> RenderSurface for TextSurface<W> {
    fn resize(&mut self, width: u32, height: u32) {
        self.columns = ((width as f32 / GLYPH_SIZE.x).ceil() as usize).max(1);
        self.rows = ((height as f32 / GLYPH_SIZE.y).ceil() as usize).max(1);
        self.glyphs = vec![b' '; self.columns * self.rows];
    }

    fn fill_background(&mut self, color: Color) {
        self.glyphs.fill(glyph(color));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        let (min, max) = points
            .iter()
            .fold((points[0], points[0]), |(min, max), point| {
                (min.min(*point), max.max(*point))
            });
        let first_column = (min.x / GLYPH_SIZE.x).floor().max(0.0) as usize;
        let first_row = (min.y / GLYPH_SIZE.y).floor().max(0.0) as usize;
        let last_column = ((max.x / GLYPH_SIZE.x).ceil().max(0.0) as usize).min(self.columns);
        let last_row = ((max.y / GLYPH_SIZE.y).ceil().max(0.0) as usize).min(self.rows);

        let value = glyph(color);
        for row in first_row..last_row {
            for column in first_column..last_column {
                if contains(points, self.center_of(column, row)) {
                    self.glyphs[row * self.columns + column] = value;
                }
            }
        }
    }

    fn present(&mut self) -> Result<()> {
        for line in self.glyphs.chunks(self.columns) {
            self.out.write_all(line).context("failed to write frame")?;
            self.out.write_all(b"\n").context("failed to write frame")?;
        }
        self.out.flush().context("failed to flush frame")
    }
}

fn glyph(color: Color) -> u8 {
    let level = (color.luminance().clamp(0.0, 1.0) * (RAMP.len() - 1) as f32).round();
    RAMP[level as usize]
}

/// Even-odd point-in-polygon test.
fn contains(points: &[Vec2], point: Vec2) -> bool {
    let mut inside = false;
    let mut previous = points[points.len() - 1];
    for current in points {
        if (current.y > point.y) != (previous.y > point.y) {
            let t = (point.y - current.y) / (previous.y - current.y);
            let crossing = current.x + t * (previous.x - current.x);
            if point.x < crossing {
                inside = !inside;
            }
        }
        previous = *current;
    }
    inside
}
