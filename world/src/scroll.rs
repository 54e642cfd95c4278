use brutal_maze_core::{Axis, CellCoord, MazeView, CELL_WIDTH, MIDDLE};

/// Sub-cell scroll offsets and rotation accumulators of the maze.
///
/// Offsets are counted in frames of movement; `speed` frames add up to one
/// full cell.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ScrollState {
    offset_x: f32,
    offset_y: f32,
    rotate_x: i32,
    rotate_y: i32,
    frame_rate: f32,
    speed: f32,
}

impl ScrollState {
    pub(crate) fn new(frame_rate: f32, move_speed: f32) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            rotate_x: 0,
            rotate_y: 0,
            frame_rate,
            speed: frame_rate / move_speed,
        }
    }

    /// Adapts the offsets to a new frame rate so the pixel position is preserved.
    pub(crate) fn rescale(&mut self, frame_rate: f32, move_speed: f32) {
        if frame_rate == self.frame_rate {
            return;
        }
        let ratio = frame_rate / self.frame_rate;
        self.offset_x *= ratio;
        self.offset_y *= ratio;
        self.frame_rate = frame_rate;
        self.speed = frame_rate / move_speed;
    }

    /// Pixels covered by one frame of movement.
    pub(crate) fn step(&self, distance: f32) -> f32 {
        distance / self.speed
    }

    pub(crate) fn offsets(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    pub(crate) fn rotations(&self) -> (i32, i32) {
        (self.rotate_x, self.rotate_y)
    }

    pub(crate) fn speed(&self) -> f32 {
        self.speed
    }

    /// Tentatively scrolls one frame along `axis` and reverts if the hero would overlap a wall.
    ///
    /// Returns the accepted delta, which is zero when no move was requested
    /// or the move was blocked.
    pub(crate) fn gate(
        &mut self,
        axis: Axis,
        intent: i32,
        maze: MazeView<'_>,
        step: f32,
        clearance: f32,
    ) -> i32 {
        if intent == 0 {
            return 0;
        }
        let offset = match axis {
            Axis::Horizontal => &mut self.offset_x,
            Axis::Vertical => &mut self.offset_y,
        };
        *offset += intent as f32;
        let reach = sign(*offset) * 2;
        let blocked = (-1..=1)
            .map(|lateral| match axis {
                Axis::Horizontal => CellCoord::new(MIDDLE - reach, MIDDLE + lateral),
                Axis::Vertical => CellCoord::new(MIDDLE + lateral, MIDDLE - reach),
            })
            .any(|cell| maze.is_wall(cell));

        if blocked && offset.abs() * step > clearance {
            *offset -= intent as f32;
            0
        } else {
            intent
        }
    }

    /// Completes a cell of movement along `axis`, returning the rotation to apply.
    pub(crate) fn take_rotation(&mut self, axis: Axis) -> i32 {
        let (offset, rotate) = match axis {
            Axis::Horizontal => (&mut self.offset_x, &mut self.rotate_x),
            Axis::Vertical => (&mut self.offset_y, &mut self.rotate_y),
        };
        if offset.abs() < self.speed {
            return 0;
        }
        let shift = sign(*offset);
        *offset = 0.0;
        *rotate += shift;
        shift
    }

    /// Reports, and resets, an accumulator that reached a full maze cell.
    pub(crate) fn take_regeneration(&mut self, axis: Axis) -> bool {
        let rotate = match axis {
            Axis::Horizontal => &mut self.rotate_x,
            Axis::Vertical => &mut self.rotate_y,
        };
        if rotate.unsigned_abs() as usize >= CELL_WIDTH {
            *rotate = 0;
            true
        } else {
            false
        }
    }
}

fn sign(value: f32) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
