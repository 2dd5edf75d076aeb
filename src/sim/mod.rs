//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod anim;
pub mod pulpit;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod tick;

pub use anim::{AnimKind, AnimStatus, ScaleAnim};
pub use pulpit::{Pulpit, PulpitId, PulpitState, PulpitTransition};
pub use scheduler::Scheduler;
pub use session::{Session, SessionPhase};
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, tick};
