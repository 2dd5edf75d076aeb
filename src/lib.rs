//! Pulpit Run - an endless platform-hopping arcade core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pulpit lifecycle, spawn scheduling, session state)
//! - `config`: Data-driven tuning loaded from the diary document
//! - `autopilot`: Stand-in player used by the headless binary

pub mod autopilot;
pub mod config;
pub mod sim;

pub use config::{
    ConfigError, DiaryConfig, PlatformConfig, PlayerConfig, SpawnThreshold, SpawnerConfig,
};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Spawner defaults
    pub const MAX_ACTIVE: usize = 2;
    pub const GRID_SPACING: f32 = 9.0;
    /// Grow-in animation length for freshly spawned pulpits (seconds)
    pub const SCALE_UP_DURATION: f32 = 0.5;
    /// Remaining time at which a pulpit stops accepting contact and shrinks away.
    /// Also the length of the shrink animation.
    pub const SHRINK_DURATION: f32 = 0.3;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 3.0;
    /// Falling below this height ends the run
    pub const DEATH_Y: f32 = -10.0;
    pub const GRAVITY: f32 = 9.81;
}

/// One of the four cardinal grid directions on the X/Z plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridDir {
    /// +X
    Right,
    /// -X
    Left,
    /// +Z
    Forward,
    /// -Z
    Back,
}

impl GridDir {
    pub const ALL: [GridDir; 4] = [GridDir::Right, GridDir::Left, GridDir::Forward, GridDir::Back];

    /// Unit offset on the X/Z plane
    #[inline]
    pub fn unit(self) -> Vec3 {
        match self {
            GridDir::Right => Vec3::X,
            GridDir::Left => Vec3::NEG_X,
            GridDir::Forward => Vec3::Z,
            GridDir::Back => Vec3::NEG_Z,
        }
    }
}

/// Cell adjacent to `from` in direction `dir`, `spacing` units away
#[inline]
pub fn grid_neighbor(from: Vec3, dir: GridDir, spacing: f32) -> Vec3 {
    from + dir.unit() * spacing
}

/// Sanitize a frame delta: non-finite or negative deltas count as no time passing
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}
