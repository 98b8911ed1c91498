use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenArea {
    pub width: u32,
    pub height: u32,
}

impl ScreenArea {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Random point in the middle 60% of the screen on both axes.
    pub fn random_inner_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        Position {
            x: inner_coordinate(rng, self.width),
            y: inner_coordinate(rng, self.height),
        }
    }
}

impl Default for ScreenArea {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

fn inner_coordinate<R: Rng + ?Sized>(rng: &mut R, extent: u32) -> i32 {
    let lower = (extent as f64 * 0.2) as i32;
    let upper = (extent as f64 * 0.8) as i32;
    if upper <= lower {
        lower
    } else {
        rng.gen_range(lower..upper)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Leave through one edge, come back through the opposite one
    #[default]
    Wrap,
    /// Reflect off the screen edges
    Bounce,
}

/// One axis of the edge check.
#[derive(Clone, Copy, Debug)]
pub struct Axis {
    pub extent: i32,
    pub sprite: i32,
    pub overflow: i32,
}

/// Applies edge handling to one coordinate, returning the new coordinate
/// and velocity component.
pub fn constrain(mode: EdgeMode, axis: Axis, pos: i32, velocity: i32) -> (i32, i32) {
    match mode {
        EdgeMode::Wrap => (wrap(axis, pos), velocity),
        EdgeMode::Bounce => bounce(axis, pos, velocity),
    }
}

fn wrap(axis: Axis, pos: i32) -> i32 {
    let cross = pos - axis.extent;
    if pos < 0 {
        if cross < -(axis.overflow + axis.sprite) {
            return axis.extent;
        }
    } else if cross > axis.overflow {
        return 0;
    }
    pos
}

fn bounce(axis: Axis, pos: i32, velocity: i32) -> (i32, i32) {
    let max = (axis.extent - axis.sprite).max(0);
    if pos < 0 {
        (0, velocity.abs())
    } else if pos > max {
        (max, -velocity.abs())
    } else {
        (pos, velocity)
    }
}

/// Window placement while the context menu is open. The window grows to the
/// menu size but stays on screen, and the sprite keeps its screen position.
/// Returns the window origin and the sprite offset inside the window.
pub fn menu_window(
    position: Position,
    sprite: (i32, i32),
    menu: (i32, i32),
    screen: ScreenArea,
) -> (Position, Position) {
    let (x, dx) = menu_axis(position.x, sprite.0, menu.0, screen.width as i32);
    let (y, dy) = menu_axis(position.y, sprite.1, menu.1, screen.height as i32);
    (Position::new(x, y), Position::new(dx, dy))
}

fn menu_axis(pos: i32, sprite: i32, menu: i32, extent: i32) -> (i32, i32) {
    let size = sprite.max(menu);
    let origin = pos.min(extent - size).max(0);
    let offset = (pos - origin).clamp(0, size - sprite);
    (origin, offset)
}
