// Velocity sampling for the autonomous motion modes

use rand::Rng;
use rand::seq::SliceRandom;
use std::ops::Range;
use std::time::Duration;

use super::geometry::ScreenArea;
use super::mode::MotionMode;

/// Seconds to cross the screen at the slowest and fastest chase speed.
const SLOW_CROSSING_SECS: f64 = 5.0;
const FAST_CROSSING_SECS: f64 = 1.0;

/// Duration of a pattern that does not move the pet.
pub const IDLE_PATTERN: Duration = Duration::from_secs(1);

/// Steps per tick needed to travel `distance` pixels in `duration_secs`.
pub fn steps_for(duration_secs: f64, tick_ms: u64, distance: u32) -> i32 {
    let ticks = duration_secs * 1000.0 / tick_ms.max(1) as f64;
    (distance as f64 / ticks).round() as i32
}

fn step_range(lower: i32, upper: i32) -> Range<i32> {
    let lower = lower.max(1);
    if upper <= lower {
        lower..lower + 1
    } else {
        lower..upper
    }
}

/// A signed step: random direction, magnitude drawn from `range`.
pub fn random_direct_step<R: Rng + ?Sized>(rng: &mut R, range: Range<i32>) -> i32 {
    let direction = *[-1, 1].choose(rng).unwrap_or(&1);
    direction * rng.gen_range(range)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AxisRanges {
    pub x: Range<i32>,
    pub y: Range<i32>,
}

/// Per-axis step ranges derived from screen size and tick interval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MotionProfile {
    pub float: AxisRanges,
    pub chase: AxisRanges,
}

impl MotionProfile {
    pub fn new(screen: ScreenArea, tick_ms: u64) -> Self {
        let slow_x = steps_for(SLOW_CROSSING_SECS, tick_ms, screen.width);
        let slow_y = steps_for(SLOW_CROSSING_SECS, tick_ms, screen.height);
        let fast_x = steps_for(FAST_CROSSING_SECS, tick_ms, screen.width);
        let fast_y = steps_for(FAST_CROSSING_SECS, tick_ms, screen.height);

        Self {
            float: AxisRanges {
                x: step_range(1, slow_x),
                y: step_range(1, slow_y),
            },
            chase: AxisRanges {
                x: step_range(slow_x, fast_x),
                y: step_range(slow_y, fast_y),
            },
        }
    }

    pub fn velocity<R: Rng + ?Sized>(&self, mode: MotionMode, rng: &mut R) -> (i32, i32) {
        let ranges = match mode {
            MotionMode::Float => &self.float,
            MotionMode::Chase => &self.chase,
            MotionMode::Stay | MotionMode::Drag => return (0, 0),
        };
        (
            random_direct_step(rng, ranges.x.clone()),
            random_direct_step(rng, ranges.y.clone()),
        )
    }
}

/// How long a freshly drawn pattern lasts.
pub fn pattern_duration<R: Rng + ?Sized>(rng: &mut R, velocity: (i32, i32)) -> Duration {
    if velocity == (0, 0) {
        return IDLE_PATTERN;
    }
    // zero to ten seconds inclusive, hundredth-of-a-second resolution
    let hundredths: u64 = rng.gen_range(0..=1000);
    Duration::from_millis(hundredths * 10)
}
