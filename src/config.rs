use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::geometry::{EdgeMode, ScreenArea};
use crate::model::state::Behavior;

const APP_DIR: &str = "deskpet";
const CONFIG_FILE: &str = "config.toml";
/// Longest rest the pet takes before floating again, one day.
const MAX_REST_SECS: f64 = 86_400.0;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetConfig {
    pub window: WindowConfig,
    pub motion: MotionConfig,
    pub sprites: SpriteConfig,
    pub prepare: PrepareConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Keep the pet out of the strip reserved for the taskbar.
    pub exclude_taskbar: bool,
    pub taskbar_height: u32,
    pub screen_width: Option<u32>,
    pub screen_height: Option<u32>,
    /// Window size while the context menu is open.
    pub menu_width: f32,
    pub menu_height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            exclude_taskbar: true,
            taskbar_height: 48,
            screen_width: None,
            screen_height: None,
            menu_width: 120.0,
            menu_height: 170.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub rest_time_secs: f64,
    pub overflow_x: i32,
    pub overflow_y: i32,
    pub tick_interval_ms: u64,
    pub frame_interval_ms: u64,
    pub edge: EdgeMode,
    pub seed: Option<u64>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            rest_time_secs: 5.0,
            overflow_x: 30,
            overflow_y: 30,
            tick_interval_ms: 10,
            frame_interval_ms: 50,
            edge: EdgeMode::Wrap,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    pub dir: Option<PathBuf>,
    /// Explicit sprite files, used instead of scanning `dir` when non-empty.
    pub paths: Vec<PathBuf>,
    pub scale: f32,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            dir: None,
            paths: Vec::new(),
            scale: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    pub size: u32,
    pub delay_ms: u32,
    /// Worker threads for batch resizing, 0 means one per core.
    pub thread_count: usize,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            size: 200,
            delay_ms: 100,
            thread_count: 0,
        }
    }
}

impl PetConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads `path` if given, otherwise the per-user config file when it
    /// exists, otherwise the defaults. Values are not clamped yet; call
    /// [`PetConfig::validated`] once command-line overrides are applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)
            .with_context(|| format!("Failed to write config {}", path.display()))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Clamps values the state machine cannot work with.
    pub fn validated(mut self) -> Self {
        if !self.motion.rest_time_secs.is_finite() || self.motion.rest_time_secs < 0.0 {
            self.motion.rest_time_secs = MotionConfig::default().rest_time_secs;
        }
        self.motion.rest_time_secs = self.motion.rest_time_secs.min(MAX_REST_SECS);
        self.motion.tick_interval_ms = self.motion.tick_interval_ms.max(1);
        self.motion.frame_interval_ms = self.motion.frame_interval_ms.max(1);
        self.motion.overflow_x = self.motion.overflow_x.max(0);
        self.motion.overflow_y = self.motion.overflow_y.max(0);
        if !(self.sprites.scale.is_finite() && self.sprites.scale > 0.0) {
            self.sprites.scale = 1.0;
        }
        self.prepare.size = self.prepare.size.max(1);
        self
    }

    pub fn behavior(&self) -> Behavior {
        Behavior {
            rest_time: Duration::try_from_secs_f64(self.motion.rest_time_secs)
                .unwrap_or(Behavior::default().rest_time),
            overflow: (self.motion.overflow_x, self.motion.overflow_y),
            tick_interval: Duration::from_millis(self.motion.tick_interval_ms),
            frame_interval: Duration::from_millis(self.motion.frame_interval_ms),
            edge: self.motion.edge,
        }
    }

    /// The area the pet roams in. Explicit overrides win over the monitor
    /// size reported by the window system.
    pub fn screen_area(&self, monitor: Option<(u32, u32)>) -> ScreenArea {
        let fallback = monitor.unwrap_or_else(|| {
            let area = ScreenArea::default();
            (area.width, area.height)
        });
        let width = self.window.screen_width.unwrap_or(fallback.0);
        let mut height = self.window.screen_height.unwrap_or(fallback.1);
        if self.window.exclude_taskbar {
            height = height.saturating_sub(self.window.taskbar_height);
        }
        ScreenArea::new(width.max(1), height.max(1))
    }
}
