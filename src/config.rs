use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const APP_DIR_NAME: &str = "maze-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Pixel size of one tile.
pub const DEFAULT_GRID_SIZE_PX: u32 = 20;

/// Viewport edge used when no viewport is known.
pub const DEFAULT_VIEWPORT_PX: u32 = 600;

/// Tile count used when the viewport cannot produce one.
pub const FALLBACK_TILE_COUNT: usize = 20;

/// Base tick interval in milliseconds.
pub const DEFAULT_BASE_SPEED_MS: u64 = 100;

/// Extra tick interval per snake segment, in milliseconds.
pub const INTERVAL_PER_SEGMENT_MS: f64 = 2.0;

/// Preferred spawn coordinate on both axes.
pub const SPAWN_COORDINATE: i32 = 10;

/// Levels at or above this one have no outer wall and wrap at the edges.
pub const TOROIDAL_LEVEL: u32 = 1000;

/// Respawns landing at or above this level wait for player input.
pub const MANUAL_RESUME_LEVEL: u32 = 100;

/// Placement attempts before a wall or item is given up.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

/// Score for one pellet.
pub const PELLET_POINTS: u32 = 10;

/// Score for one pellet while the star multiplier runs.
pub const STAR_PELLET_POINTS: u32 = 20;

/// Cosmetic hue advance per tick, in degrees.
pub const RAINBOW_HUE_STEP: f32 = 0.5;

/// Self-collision index guard. Graze recovery only applies below
/// `snake.len() - SELF_GRAZE_GUARD`, which no real snake reaches.
pub const SELF_GRAZE_GUARD: usize = 500_000_000;

pub const MUSHROOM_DURATION_MS: f64 = 8000.0;
pub const LIGHTNING_DURATION_MS: f64 = 6000.0;
pub const HOURGLASS_DURATION_MS: f64 = 8000.0;
pub const STAR_DURATION_MS: f64 = 10000.0;

pub const LIGHTNING_SPEED_MULTIPLIER: f64 = 0.75;
pub const HOURGLASS_SPEED_MULTIPLIER: f64 = 1.25;

pub const MUSHROOM_MIN_LEVEL: u32 = 5;
pub const LIGHTNING_MIN_LEVEL: u32 = 3;
pub const HOURGLASS_MIN_LEVEL: u32 = 5;
pub const STAR_MIN_LEVEL: u32 = 4;

/// Chance of items appearing when a level is generated.
pub const MUSHROOM_LEVEL_CHANCE: f64 = 0.15;
pub const LIGHTNING_LEVEL_CHANCE: f64 = 0.001;
pub const HOURGLASS_LEVEL_CHANCE: f64 = 0.001;
pub const STAR_LEVEL_CHANCE: f64 = 0.001;

/// Chance of one more item appearing on any tick.
pub const MUSHROOM_TICK_CHANCE: f64 = 0.005;
pub const LIGHTNING_TICK_CHANCE: f64 = 0.008;
pub const HOURGLASS_TICK_CHANCE: f64 = 0.015;
pub const STAR_TICK_CHANCE: f64 = 0.02;

/// Highest level scanned when a typed code is looked up.
pub const PASSWORD_SCAN_LIMIT: u32 = 10_000;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Session settings. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Pixel size of one tile; the viewport is divided by it.
    pub grid_size_px: u32,
    /// Viewport edge in pixels. `None` lets the host derive it.
    pub viewport_px: Option<u32>,
    /// Tick interval before length and level adjustments.
    pub base_speed_ms: u64,
    /// Seed for level generation. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size_px: DEFAULT_GRID_SIZE_PX,
            viewport_px: Some(DEFAULT_VIEWPORT_PX),
            base_speed_ms: DEFAULT_BASE_SPEED_MS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Loads the config at `path`, or the per-user default file when `path`
    /// is `None`. A missing default file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::load_from_path(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size_px == 0 {
            return Err(ConfigError::Invalid("grid_size_px must be positive".to_owned()));
        }
        if self.base_speed_ms == 0 {
            return Err(ConfigError::Invalid("base_speed_ms must be positive".to_owned()));
        }
        Ok(())
    }
}

/// Returns the platform-correct default config path.
#[must_use]
pub fn default_config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}
