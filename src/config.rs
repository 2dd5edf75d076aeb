//! Game configuration ("diary")
//!
//! Loaded once at startup from a JSON document and validated before the
//! first tick. A missing or invalid document is a hard error: the scheduler
//! never runs on silent defaults.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Document could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON or misses a required field
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("max pulpit destroy time ({max}) is less than min pulpit destroy time ({min})")]
    InvalidRange { min: f32, max: f32 },

    #[error("spawn threshold {value}s never opens: pulpits collapse at {window}s remaining")]
    GateInCollapseWindow { value: f32, window: f32 },

    #[error("invalid spawner settings: {0}")]
    InvalidSpawner(String),
}

/// Raw player section of the diary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_death_y")]
    pub death_y: f32,
}

fn default_speed() -> f32 {
    PLAYER_SPEED
}

fn default_death_y() -> f32 {
    DEATH_Y
}

impl Default for PlayerData {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            death_y: DEATH_Y,
        }
    }
}

/// Raw pulpit section of the diary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulpitData {
    pub min_pulpit_destroy_time: f32,
    pub max_pulpit_destroy_time: f32,
    /// `<= 0` selects a random threshold drawn every tick
    pub pulpit_spawn_time: f32,
}

/// Spawner tuning; every field is optional in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub max_active: usize,
    pub grid_spacing: f32,
    pub origin: Vec3,
    pub scale_up_duration: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            max_active: MAX_ACTIVE,
            grid_spacing: GRID_SPACING,
            origin: Vec3::ZERO,
            scale_up_duration: SCALE_UP_DURATION,
        }
    }
}

impl SpawnerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_active == 0 {
            return Err(ConfigError::InvalidSpawner("max_active must be at least 1".into()));
        }
        if !self.grid_spacing.is_finite() || self.grid_spacing <= 0.0 {
            return Err(ConfigError::InvalidSpawner(format!(
                "grid_spacing must be positive (got {})",
                self.grid_spacing
            )));
        }
        if !self.origin.is_finite() {
            return Err(ConfigError::InvalidSpawner("origin must be finite".into()));
        }
        if !self.scale_up_duration.is_finite() || self.scale_up_duration < 0.0 {
            return Err(ConfigError::InvalidSpawner(format!(
                "scale_up_duration must not be negative (got {})",
                self.scale_up_duration
            )));
        }
        Ok(())
    }
}

/// How the spawn gate threshold is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnThreshold {
    /// Draw a fresh value in `[min_lifetime, max_lifetime]` on every tick
    Random,
    /// Spawn once the oldest pulpit has at most this many seconds left
    Fixed(f32),
}

impl SpawnThreshold {
    /// Interpret the raw diary value
    pub fn from_raw(value: f32) -> Self {
        if value <= 0.0 {
            SpawnThreshold::Random
        } else {
            SpawnThreshold::Fixed(value)
        }
    }
}

/// Validated pulpit timing, immutable for a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub min_lifetime: f32,
    pub max_lifetime: f32,
    pub spawn_threshold: SpawnThreshold,
}

impl PlatformConfig {
    /// Build a config, refusing out-of-range values instead of clamping them
    pub fn new(
        min_lifetime: f32,
        max_lifetime: f32,
        spawn_threshold: f32,
    ) -> Result<Self, ConfigError> {
        if !min_lifetime.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "min_pulpit_destroy_time",
            });
        }
        if !max_lifetime.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "max_pulpit_destroy_time",
            });
        }
        if !spawn_threshold.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "pulpit_spawn_time",
            });
        }
        if min_lifetime <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "min_pulpit_destroy_time",
                value: min_lifetime,
            });
        }
        if max_lifetime < min_lifetime {
            return Err(ConfigError::InvalidRange {
                min: min_lifetime,
                max: max_lifetime,
            });
        }

        // Remaining time freezes once a pulpit collapses, so the gate must
        // open before the collapse window or the stream stops
        let spawn_threshold = SpawnThreshold::from_raw(spawn_threshold);
        let gate = match spawn_threshold {
            SpawnThreshold::Fixed(x) => x,
            SpawnThreshold::Random => max_lifetime,
        };
        if gate <= SHRINK_DURATION {
            return Err(ConfigError::GateInCollapseWindow {
                value: gate,
                window: SHRINK_DURATION,
            });
        }

        Ok(Self {
            min_lifetime,
            max_lifetime,
            spawn_threshold,
        })
    }
}

impl TryFrom<&PulpitData> for PlatformConfig {
    type Error = ConfigError;

    fn try_from(data: &PulpitData) -> Result<Self, Self::Error> {
        PlatformConfig::new(
            data.min_pulpit_destroy_time,
            data.max_pulpit_destroy_time,
            data.pulpit_spawn_time,
        )
    }
}

/// Validated player tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub speed: f32,
    pub death_y: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            death_y: DEATH_Y,
        }
    }
}

impl TryFrom<&PlayerData> for PlayerConfig {
    type Error = ConfigError;

    fn try_from(data: &PlayerData) -> Result<Self, Self::Error> {
        if !data.speed.is_finite() {
            return Err(ConfigError::NotFinite { field: "speed" });
        }
        if !data.death_y.is_finite() {
            return Err(ConfigError::NotFinite { field: "death_y" });
        }
        if data.speed <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "speed",
                value: data.speed,
            });
        }
        Ok(Self {
            speed: data.speed,
            death_y: data.death_y,
        })
    }
}

/// Root of the diary document as it appears on disk
#[derive(Debug, Deserialize)]
struct DiaryDocument {
    #[serde(default)]
    player_data: Option<PlayerData>,
    pulpit_data: PulpitData,
    #[serde(default)]
    spawner: SpawnerConfig,
}

/// Complete validated configuration for a run
#[derive(Debug, Clone, PartialEq)]
pub struct DiaryConfig {
    pub platform: PlatformConfig,
    pub player: PlayerConfig,
    pub spawner: SpawnerConfig,
}

impl DiaryConfig {
    /// Config with the given pulpit timing and default player/spawner tuning
    pub fn with_platform(platform: PlatformConfig) -> Self {
        Self {
            platform,
            player: PlayerConfig::default(),
            spawner: SpawnerConfig::default(),
        }
    }

    /// Parse and validate a diary document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let doc: DiaryDocument = serde_json::from_str(json)?;

        let platform = PlatformConfig::try_from(&doc.pulpit_data)?;
        let player = match &doc.player_data {
            Some(data) => PlayerConfig::try_from(data)?,
            None => {
                log::warn!("Diary has no player_data, using default player tuning");
                PlayerConfig::default()
            }
        };
        doc.spawner.validate()?;

        Ok(Self {
            platform,
            player,
            spawner: doc.spawner,
        })
    }

    /// Read, parse and validate a diary document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded diary from {}: lifetime {}..{}s, threshold {:?}",
            path.display(),
            config.platform.min_lifetime,
            config.platform.max_lifetime,
            config.platform.spawn_threshold
        );
        Ok(config)
    }
}
