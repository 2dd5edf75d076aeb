//! Pulpit entity: a timed platform the player steps across
//!
//! A pulpit counts down from its lifetime. Shortly before it runs out it
//! stops accepting contact and shrinks away, after which it is destroyed and
//! pruned by the scheduler.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::anim::{AnimStatus, ScaleAnim};
use crate::consts::SHRINK_DURATION;

/// Identity of a pulpit: session generation plus spawn order within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PulpitId {
    pub run: u32,
    pub index: u32,
}

impl std::fmt::Display for PulpitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}.{}", self.run, self.index)
    }
}

/// Lifecycle of a pulpit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PulpitState {
    /// Counting down, accepts contact
    Active,
    /// Shrinking away, no longer interactive
    Collapsing,
    /// Gone, waiting to be pruned
    Destroyed,
}

/// Transition reported by [`Pulpit::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulpitTransition {
    Collapsing,
    Destroyed,
}

/// A single timed platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pulpit {
    pub id: PulpitId,
    pub position: Vec3,
    lifetime: f32,
    remaining: f32,
    stepped: bool,
    state: PulpitState,
    anim: Option<ScaleAnim>,
}

impl Pulpit {
    /// Spawn a pulpit with a full countdown and a grow-in animation
    pub fn spawn(id: PulpitId, position: Vec3, lifetime: f32, grow_duration: f32) -> Self {
        let lifetime = lifetime.max(0.0);
        Self {
            id,
            position,
            lifetime,
            remaining: lifetime,
            stepped: false,
            state: PulpitState::Active,
            anim: Some(ScaleAnim::grow(grow_duration)),
        }
    }

    /// Advance the countdown and any running animation
    pub fn tick(&mut self, dt: f32) -> Option<PulpitTransition> {
        match self.state {
            PulpitState::Active => {
                self.remaining = (self.remaining - dt).max(0.0);

                if self.remaining <= SHRINK_DURATION {
                    // Shrink pre-empts whatever is left of the grow-in
                    self.state = PulpitState::Collapsing;
                    self.anim = Some(ScaleAnim::shrink(SHRINK_DURATION));
                    return Some(PulpitTransition::Collapsing);
                }

                if let Some(anim) = &mut self.anim {
                    if anim.advance(dt) == AnimStatus::Finished {
                        self.anim = None;
                    }
                }
                None
            }
            PulpitState::Collapsing => {
                let finished = match &mut self.anim {
                    Some(anim) => anim.advance(dt) == AnimStatus::Finished,
                    None => true,
                };
                if finished {
                    self.state = PulpitState::Destroyed;
                    Some(PulpitTransition::Destroyed)
                } else {
                    None
                }
            }
            PulpitState::Destroyed => None,
        }
    }

    /// Register player contact. Returns true only for the first contact
    /// while the pulpit is still active.
    pub fn on_player_contact(&mut self) -> bool {
        if self.state != PulpitState::Active || self.stepped {
            return false;
        }
        self.stepped = true;
        true
    }

    /// Tear the pulpit down immediately, skipping the shrink
    pub fn destroy(&mut self) {
        self.state = PulpitState::Destroyed;
        self.anim = None;
    }

    pub fn remaining_time(&self) -> f32 {
        self.remaining
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    pub fn is_stepped(&self) -> bool {
        self.stepped
    }

    pub fn state(&self) -> PulpitState {
        self.state
    }

    /// Still counting down and accepting contact
    pub fn is_alive(&self) -> bool {
        self.state == PulpitState::Active
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == PulpitState::Destroyed
    }

    /// Visual scale for the presentation layer
    pub fn scale(&self) -> f32 {
        match (&self.anim, self.state) {
            (Some(anim), _) => anim.scale(),
            (None, PulpitState::Destroyed) => 0.0,
            (None, _) => 1.0,
        }
    }
}
