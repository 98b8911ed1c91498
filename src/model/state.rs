// Motion and animation state machine driven by the UI timer

use anyhow::{Result, bail};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

use super::geometry::{Axis, EdgeMode, Position, ScreenArea, constrain};
use super::mode::{MenuAction, MotionMode};
use super::motion::{MotionProfile, pattern_duration};
use super::sprite::SpriteMetrics;
use crate::event::PetMsg;

/// Timing and boundary settings the state machine runs with.
#[derive(Clone, Debug, PartialEq)]
pub struct Behavior {
    /// How long the pet stays put before it starts floating again.
    pub rest_time: Duration,
    /// How far past the right/bottom edge the sprite may travel before it
    /// wraps.
    pub overflow: (i32, i32),
    pub tick_interval: Duration,
    pub frame_interval: Duration,
    pub edge: EdgeMode,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            rest_time: Duration::from_secs(5),
            overflow: (30, 30),
            tick_interval: Duration::from_millis(10),
            frame_interval: Duration::from_millis(50),
            edge: EdgeMode::Wrap,
        }
    }
}

pub struct PetState {
    behavior: Behavior,
    screen: ScreenArea,
    profile: MotionProfile,
    sprites: Vec<SpriteMetrics>,
    sprite_ix: usize,
    frame_ix: usize,
    position: Position,
    velocity: (i32, i32),
    mode: MotionMode,
    last_mode: MotionMode,
    random_mode: bool,
    stationary_since: Option<Instant>,
    dragging: bool,
    pattern_started: Instant,
    pattern_duration: Duration,
    last_frame: Instant,
    rng: StdRng,
}

impl PetState {
    pub fn new(
        sprites: Vec<SpriteMetrics>,
        screen: ScreenArea,
        behavior: Behavior,
        seed: Option<u64>,
        now: Instant,
    ) -> Result<Self> {
        if sprites.is_empty() {
            bail!("No sprites to animate");
        }
        if sprites.iter().any(|s| s.frames == 0) {
            bail!("Sprite has no frames");
        }

        let mut rng = seed.map(StdRng::seed_from_u64).unwrap_or_else(StdRng::from_entropy);
        let position = screen.random_inner_point(&mut rng);
        let profile = MotionProfile::new(screen, behavior.tick_interval.as_millis() as u64);

        let mut state = Self {
            behavior,
            screen,
            profile,
            sprites,
            sprite_ix: 0,
            frame_ix: 0,
            position,
            velocity: (0, 0),
            mode: MotionMode::Stay,
            last_mode: MotionMode::Stay,
            random_mode: false,
            stationary_since: None,
            dragging: false,
            pattern_started: now,
            pattern_duration: Duration::ZERO,
            last_frame: now,
            rng,
        };
        state.change_mode(MotionMode::Float, false, now);
        Ok(state)
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    pub fn last_mode(&self) -> MotionMode {
        self.last_mode
    }

    pub fn is_random(&self) -> bool {
        self.random_mode
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_stationary(&self) -> bool {
        self.stationary_since.is_some()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn velocity(&self) -> (i32, i32) {
        self.velocity
    }

    pub fn sprite_index(&self) -> usize {
        self.sprite_ix
    }

    pub fn frame_index(&self) -> usize {
        self.frame_ix
    }

    pub fn screen(&self) -> ScreenArea {
        self.screen
    }

    pub fn sprite_size(&self) -> (u32, u32) {
        let sprite = &self.sprites[self.sprite_ix];
        (sprite.width, sprite.height)
    }

    /// Updates the screen area, e.g. once the monitor size becomes known.
    pub fn set_screen(&mut self, screen: ScreenArea) {
        if screen == self.screen {
            return;
        }
        debug!("screen area {}x{}", screen.width, screen.height);
        self.screen = screen;
        self.profile = MotionProfile::new(screen, self.behavior.tick_interval.as_millis() as u64);
    }

    pub fn handle(&mut self, msg: &PetMsg, now: Instant) -> Option<PetMsg> {
        match msg {
            PetMsg::Tick => self.tick(now),
            PetMsg::PointerEntered => self.select(MotionMode::Stay, false, now),
            PetMsg::PointerLeft => self.resume_mode(now),
            PetMsg::PrimaryClick => self.cycle_sprite(1),
            PetMsg::DragTo { x, y } => self.drag_to(*x, *y),
            PetMsg::DragReleased => self.release_drag(now),
            PetMsg::Menu(action) => match action {
                MenuAction::Random => self.set_random(),
                MenuAction::Exit => return Some(PetMsg::Quit),
                other => {
                    if let Some(mode) = other.mode() {
                        self.select(mode, true, now);
                    }
                }
            },
            PetMsg::SpritesLoaded(_) | PetMsg::LoadFailed(_) | PetMsg::Quit => {}
        }
        None
    }

    /// A mode chosen by the user; always leaves random mode.
    pub fn select(&mut self, mode: MotionMode, overwrite: bool, now: Instant) {
        self.random_mode = false;
        self.change_mode(mode, overwrite, now);
    }

    pub fn set_random(&mut self) {
        debug!("random mode on");
        self.random_mode = true;
    }

    pub fn change_mode(&mut self, mode: MotionMode, overwrite: bool, now: Instant) {
        if self.dragging {
            self.stationary_since = None;
            self.random_mode = false;
            return;
        }

        self.last_mode = self.mode;
        self.mode = mode;
        debug!("mode change to {} (last {})", mode.name(), self.last_mode.name());
        if overwrite {
            self.last_mode = mode;
        }

        self.dragging = mode == MotionMode::Drag;
        if self.dragging {
            self.stationary_since = None;
            self.random_mode = false;
        } else if mode == MotionMode::Stay {
            self.stationary_since.get_or_insert(now);
        } else {
            self.stationary_since = None;
        }

        // forces a fresh pattern on the next tick
        self.pattern_duration = Duration::ZERO;
    }

    pub fn resume_mode(&mut self, now: Instant) {
        if self.dragging {
            return;
        }
        debug!("resume last mode {}", self.last_mode.name());
        self.change_mode(self.last_mode, false, now);
    }

    pub fn cycle_sprite(&mut self, step: usize) {
        if self.dragging {
            return;
        }
        self.sprite_ix = (self.sprite_ix + step) % self.sprites.len();
        self.frame_ix = 0;
        debug!("change sprite {}", self.sprite_ix);
    }

    pub fn drag_to(&mut self, x: i32, y: i32) {
        if !self.dragging {
            return;
        }
        let (w, h) = self.sprite_size();
        self.position = Position::new(x - w as i32 / 2, y - h as i32 / 2);
    }

    pub fn release_drag(&mut self, now: Instant) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.change_mode(MotionMode::Float, true, now);
        debug!("release drag");
    }

    pub fn tick(&mut self, now: Instant) {
        if !self.dragging {
            if let Some(since) = self.stationary_since {
                if now.saturating_duration_since(since) > self.behavior.rest_time {
                    debug!("break stationary");
                    self.change_mode(MotionMode::Float, true, now);
                }
            } else if now.saturating_duration_since(self.pattern_started) > self.pattern_duration {
                self.next_pattern(now);

                if self.random_mode && self.rng.gen_bool(0.5) {
                    self.random_sprite();
                }
            }
        }

        if now.saturating_duration_since(self.last_frame) > self.behavior.frame_interval {
            self.last_frame = now;
            self.advance_position();
            self.advance_frame();
        }
    }

    fn next_pattern(&mut self, now: Instant) {
        if self.random_mode {
            let mode = *MotionMode::RANDOM_POOL
                .choose(&mut self.rng)
                .unwrap_or(&MotionMode::Float);
            self.change_mode(mode, false, now);
        }

        self.velocity = self.profile.velocity(self.mode, &mut self.rng);
        self.pattern_duration = pattern_duration(&mut self.rng, self.velocity);
        self.pattern_started = now;
        debug!(
            "pattern {:?} for {:?} in {}",
            self.velocity,
            self.pattern_duration,
            self.mode.name()
        );
    }

    fn random_sprite(&mut self) {
        let count = self.sprites.len();
        if count < 2 {
            return;
        }
        let step = self.rng.gen_range(1..count);
        debug!("random sprite step {}", step);
        self.cycle_sprite(step);
    }

    fn advance_position(&mut self) {
        if self.is_stationary() || self.dragging || self.velocity == (0, 0) {
            return;
        }

        let (w, h) = self.sprite_size();
        let (overflow_x, overflow_y) = self.behavior.overflow;
        let edge = self.behavior.edge;

        let (x, vx) = constrain(
            edge,
            Axis {
                extent: self.screen.width as i32,
                sprite: w as i32,
                overflow: overflow_x,
            },
            self.position.x + self.velocity.0,
            self.velocity.0,
        );
        let (y, vy) = constrain(
            edge,
            Axis {
                extent: self.screen.height as i32,
                sprite: h as i32,
                overflow: overflow_y,
            },
            self.position.y + self.velocity.1,
            self.velocity.1,
        );

        self.position = Position::new(x, y);
        self.velocity = (vx, vy);
    }

    fn advance_frame(&mut self) {
        let frames = self.sprites[self.sprite_ix].frames;
        self.frame_ix = (self.frame_ix + 1) % frames;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: ScreenArea = ScreenArea {
        width: 1000,
        height: 800,
    };

    fn metrics(frames: usize, size: u32) -> SpriteMetrics {
        SpriteMetrics {
            frames,
            width: size,
            height: size,
        }
    }

    fn pet_with(sprites: Vec<SpriteMetrics>, behavior: Behavior) -> (PetState, Instant) {
        let t0 = Instant::now();
        let pet = PetState::new(sprites, SCREEN, behavior, Some(42), t0).unwrap();
        (pet, t0)
    }

    fn pet() -> (PetState, Instant) {
        pet_with(vec![metrics(3, 64), metrics(2, 32)], Behavior::default())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_initial_state() {
        let (pet, _) = pet();
        assert_eq!(pet.mode(), MotionMode::Float);
        assert_eq!(pet.last_mode(), MotionMode::Stay);
        assert!(!pet.is_random());
        assert!(!pet.is_stationary());
        assert!(!pet.is_dragging());

        let p = pet.position();
        assert!((200..800).contains(&p.x));
        assert!((160..640).contains(&p.y));
    }

    #[test]
    fn test_empty_library_rejected() {
        let res = PetState::new(vec![], SCREEN, Behavior::default(), None, Instant::now());
        assert!(res.is_err());

        let res = PetState::new(vec![metrics(0, 8)], SCREEN, Behavior::default(), None, Instant::now());
        assert!(res.is_err());
    }

    #[test]
    fn test_hover_stays_and_leave_resumes() {
        let (mut pet, t0) = pet();

        pet.handle(&PetMsg::PointerEntered, t0 + ms(5));
        assert_eq!(pet.mode(), MotionMode::Stay);
        assert_eq!(pet.last_mode(), MotionMode::Float);
        assert!(pet.is_stationary());

        pet.handle(&PetMsg::PointerLeft, t0 + ms(500));
        assert_eq!(pet.mode(), MotionMode::Float);
        assert_eq!(pet.last_mode(), MotionMode::Stay);
        assert!(!pet.is_stationary());
    }

    #[test]
    fn test_stationary_breaks_after_rest_time() {
        let (mut pet, t0) = pet();
        pet.handle(&PetMsg::Menu(MenuAction::Stay), t0);
        assert_eq!(pet.mode(), MotionMode::Stay);
        assert_eq!(pet.last_mode(), MotionMode::Stay);

        pet.tick(t0 + Duration::from_secs(4));
        assert_eq!(pet.mode(), MotionMode::Stay);

        pet.tick(t0 + ms(5_010));
        assert_eq!(pet.mode(), MotionMode::Float);
        assert_eq!(pet.last_mode(), MotionMode::Float);
        assert!(!pet.is_stationary());
    }

    #[test]
    fn test_stationary_timer_not_restarted_by_repeat_stay() {
        let (mut pet, t0) = pet();
        pet.handle(&PetMsg::Menu(MenuAction::Stay), t0);
        pet.handle(&PetMsg::PointerEntered, t0 + Duration::from_secs(3));

        pet.tick(t0 + ms(5_010));
        assert_eq!(pet.mode(), MotionMode::Float);
    }

    #[test]
    fn test_float_moves_by_velocity() {
        let (mut pet, t0) = pet();
        pet.tick(t0 + ms(1));
        assert_ne!(pet.velocity(), (0, 0));

        let before = pet.position();
        pet.tick(t0 + ms(60));
        let (vx, vy) = pet.velocity();
        assert_eq!(pet.position(), Position::new(before.x + vx, before.y + vy));
    }

    #[test]
    fn test_no_motion_while_stationary() {
        let (mut pet, t0) = pet();
        pet.tick(t0 + ms(1));
        pet.handle(&PetMsg::PointerEntered, t0 + ms(2));

        let before = pet.position();
        pet.tick(t0 + ms(60));
        pet.tick(t0 + ms(120));
        assert_eq!(pet.position(), before);
        // the animation keeps playing
        assert_eq!(pet.frame_index(), 2);
    }

    #[test]
    fn test_frame_cycling() {
        let (mut pet, t0) = pet();
        pet.tick(t0 + ms(30));
        assert_eq!(pet.frame_index(), 0);

        pet.tick(t0 + ms(60));
        assert_eq!(pet.frame_index(), 1);
        pet.tick(t0 + ms(120));
        assert_eq!(pet.frame_index(), 2);
        pet.tick(t0 + ms(180));
        assert_eq!(pet.frame_index(), 0);
    }

    #[test]
    fn test_click_cycles_sprites() {
        let (mut pet, t0) = pet();
        pet.tick(t0 + ms(60));
        assert_eq!(pet.frame_index(), 1);

        pet.handle(&PetMsg::PrimaryClick, t0 + ms(70));
        assert_eq!(pet.sprite_index(), 1);
        assert_eq!(pet.frame_index(), 0);
        assert_eq!(pet.sprite_size(), (32, 32));

        pet.handle(&PetMsg::PrimaryClick, t0 + ms(80));
        assert_eq!(pet.sprite_index(), 0);
    }

    #[test]
    fn test_drag_mode() {
        let (mut pet, t0) = pet();
        pet.handle(&PetMsg::Menu(MenuAction::Random), t0);
        pet.handle(&PetMsg::Menu(MenuAction::Drag), t0);
        assert!(pet.is_dragging());
        assert_eq!(pet.mode(), MotionMode::Drag);
        assert!(!pet.is_random());

        // hover, leave and clicks are ignored while dragging
        pet.handle(&PetMsg::PointerEntered, t0 + ms(1));
        pet.handle(&PetMsg::PointerLeft, t0 + ms(2));
        pet.handle(&PetMsg::PrimaryClick, t0 + ms(3));
        assert_eq!(pet.mode(), MotionMode::Drag);
        assert_eq!(pet.sprite_index(), 0);

        pet.handle(&PetMsg::DragTo { x: 500, y: 400 }, t0 + ms(4));
        assert_eq!(pet.position(), Position::new(468, 368));

        // no autonomous motion while dragging
        pet.tick(t0 + ms(100));
        assert_eq!(pet.position(), Position::new(468, 368));

        pet.handle(&PetMsg::DragReleased, t0 + ms(110));
        assert!(!pet.is_dragging());
        assert_eq!(pet.mode(), MotionMode::Float);
        assert_eq!(pet.last_mode(), MotionMode::Float);
    }

    #[test]
    fn test_drag_ignored_outside_drag_mode() {
        let (mut pet, t0) = pet();
        let before = pet.position();
        pet.handle(&PetMsg::DragTo { x: 10, y: 10 }, t0);
        pet.handle(&PetMsg::DragReleased, t0);
        assert_eq!(pet.position(), before);
        assert_eq!(pet.mode(), MotionMode::Float);
    }

    #[test]
    fn test_exit_requests_quit() {
        let (mut pet, t0) = pet();
        assert!(matches!(pet.handle(&PetMsg::Menu(MenuAction::Exit), t0), Some(PetMsg::Quit)));
        assert!(pet.handle(&PetMsg::Tick, t0).is_none());
    }

    #[test]
    fn test_random_mode_picks_from_pool() {
        let (mut pet, t0) = pet();
        pet.handle(&PetMsg::Menu(MenuAction::Random), t0);
        assert!(pet.is_random());

        let mut now = t0;
        for _ in 0..2_000 {
            now += ms(60);
            pet.tick(now);
            assert!(MotionMode::RANDOM_POOL.contains(&pet.mode()));
            assert!(pet.sprite_index() < 2);
        }

        pet.handle(&PetMsg::Menu(MenuAction::Chase), now);
        assert!(!pet.is_random());
        assert_eq!(pet.mode(), MotionMode::Chase);
    }

    #[test]
    fn test_random_mode_survives_rest_timeout() {
        let (mut pet, t0) = pet();
        pet.handle(&PetMsg::Menu(MenuAction::Stay), t0);
        pet.handle(&PetMsg::Menu(MenuAction::Random), t0);

        pet.tick(t0 + Duration::from_secs(6));
        assert_eq!(pet.mode(), MotionMode::Float);
        assert!(pet.is_random());
    }

    #[test]
    fn test_random_mode_switches_sprites() {
        let sprites = vec![metrics(3, 64), metrics(2, 32), metrics(4, 48), metrics(1, 16)];
        let (mut pet, t0) = pet_with(sprites, Behavior::default());
        pet.handle(&PetMsg::Menu(MenuAction::Random), t0);

        let mut now = t0;
        let mut last = pet.sprite_index();
        let mut switches = 0;
        for _ in 0..5_000 {
            now += ms(60);
            pet.tick(now);
            if pet.sprite_index() != last {
                switches += 1;
                last = pet.sprite_index();
            }
        }
        assert!(switches > 0);
    }

    #[test]
    fn test_random_sprite_always_changes_index() {
        let sprites = vec![metrics(3, 64), metrics(2, 32), metrics(4, 48)];
        let (mut pet, _) = pet_with(sprites, Behavior::default());
        for _ in 0..200 {
            let before = pet.sprite_index();
            pet.random_sprite();
            assert_ne!(pet.sprite_index(), before);
            assert!(pet.sprite_index() < 3);
            assert_eq!(pet.frame_index(), 0);
        }
    }

    #[test]
    fn test_random_sprite_with_single_sprite() {
        let (mut pet, t0) = pet_with(vec![metrics(2, 16)], Behavior::default());
        pet.handle(&PetMsg::Menu(MenuAction::Random), t0);
        let mut now = t0;
        for _ in 0..500 {
            now += ms(60);
            pet.tick(now);
        }
        assert_eq!(pet.sprite_index(), 0);
    }

    #[test]
    fn test_wraps_at_right_edge() {
        let (mut pet, t0) = pet();
        pet.tick(t0 + ms(1));
        pet.position = Position::new(1028, 300);
        pet.velocity = (5, 0);
        pet.pattern_duration = Duration::from_secs(60);

        pet.tick(t0 + ms(60));
        assert_eq!(pet.position(), Position::new(0, 300));
    }

    #[test]
    fn test_wraps_at_left_edge() {
        let (mut pet, t0) = pet();
        pet.tick(t0 + ms(1));
        pet.position = Position::new(5, 300);
        pet.velocity = (-5, 0);
        pet.pattern_duration = Duration::from_secs(60);

        pet.tick(t0 + ms(60));
        assert_eq!(pet.position(), Position::new(0, 300));

        pet.tick(t0 + ms(120));
        assert_eq!(pet.position(), Position::new(1000, 300));
    }

    #[test]
    fn test_bounce_reflects() {
        let behavior = Behavior {
            edge: EdgeMode::Bounce,
            ..Behavior::default()
        };
        let (mut pet, t0) = pet_with(vec![metrics(1, 100)], behavior);
        pet.tick(t0 + ms(1));
        pet.position = Position::new(898, 797);
        pet.velocity = (4, 6);
        pet.pattern_duration = Duration::from_secs(60);

        pet.tick(t0 + ms(60));
        assert_eq!(pet.position(), Position::new(900, 700));
        assert_eq!(pet.velocity(), (-4, -6));
    }

    #[test]
    fn test_set_screen_rebuilds_profile() {
        let (mut pet, _) = pet();
        pet.set_screen(ScreenArea::new(5000, 5000));
        assert_eq!(pet.screen(), ScreenArea::new(5000, 5000));
        assert_eq!(pet.profile.chase.x, 10..50);
    }
}
