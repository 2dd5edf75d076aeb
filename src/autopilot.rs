//! Autopilot player
//!
//! A kinematic stand-in for the movement and collision collaborators so a
//! run can be played without input or a physics engine. It walks toward the
//! newest pulpit, reports trigger entries as contacts and falls whenever no
//! pulpit is under its feet.

use glam::{Vec2, Vec3};

use crate::config::DiaryConfig;
use crate::consts::GRAVITY;
use crate::sim::{GameState, PulpitId, TickInput};

/// Demo player driven by the current pulpit layout
#[derive(Debug, Clone)]
pub struct Autopilot {
    pub pos: Vec3,
    vertical_vel: f32,
    speed: f32,
    /// Half the side of a pulpit's square footprint
    half_extent: f32,
    standing_on: Option<PulpitId>,
}

impl Autopilot {
    pub fn new(config: &DiaryConfig) -> Self {
        Self {
            pos: config.spawner.origin,
            vertical_vel: 0.0,
            speed: config.player.speed,
            half_extent: config.spawner.grid_spacing / 2.0,
            standing_on: None,
        }
    }

    /// Put the player back on the origin for a new run
    pub fn reset(&mut self, config: &DiaryConfig) {
        *self = Self::new(config);
    }

    /// Id of the pulpit the player currently stands on
    pub fn standing_on(&self) -> Option<PulpitId> {
        self.standing_on
    }

    /// Move for `dt` seconds and report what happened as tick input
    pub fn step(&mut self, state: &GameState, dt: f32) -> TickInput {
        let mut input = TickInput::default();

        let support = self.support(state);
        let grounded = support.is_some_and(|(_, surface)| self.pos.y >= surface - f32::EPSILON);

        if grounded {
            // Head for the newest live pulpit
            if let Some(target) = state.scheduler.iter().rev().find(|p| p.is_alive()) {
                let to_target = Vec2::new(
                    target.position.x - self.pos.x,
                    target.position.z - self.pos.z,
                );
                let step = self.speed * dt;
                let delta = if to_target.length() <= step {
                    to_target
                } else {
                    to_target.normalize_or_zero() * step
                };
                self.pos.x += delta.x;
                self.pos.z += delta.y;
            }
        }

        // Re-evaluate after moving
        match self.support(state) {
            Some((id, surface)) if self.pos.y >= surface - f32::EPSILON => {
                self.pos.y = surface;
                self.vertical_vel = 0.0;
                if self.standing_on != Some(id) {
                    self.standing_on = Some(id);
                    input.contacts.push(id);
                }
            }
            _ => {
                self.standing_on = None;
                self.vertical_vel -= GRAVITY * dt;
                self.pos.y += self.vertical_vel * dt;
            }
        }

        input.player_y = Some(self.pos.y);
        input
    }

    /// Newest pulpit under the player's feet, with its surface height
    fn support(&self, state: &GameState) -> Option<(PulpitId, f32)> {
        state
            .scheduler
            .iter()
            .rev()
            .filter(|p| !p.is_destroyed())
            .find(|p| {
                (self.pos.x - p.position.x).abs() <= self.half_extent
                    && (self.pos.z - p.position.z).abs() <= self.half_extent
            })
            .map(|p| (p.id, p.position.y))
    }
}
