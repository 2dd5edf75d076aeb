//! Per-frame simulation tick
//!
//! Sequences one frame: countdown, prune/spawn, contacts, death check.
//! Countdown runs before contacts so a pulpit that collapses this frame
//! rejects a step arriving in the same frame.

use super::pulpit::PulpitId;
use super::state::{GameEvent, GameState};
use crate::sanitize_dt;

/// Collaborator input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pulpits whose trigger volume the player entered this frame
    pub contacts: Vec<PulpitId>,
    /// Player height, when the movement collaborator reports it
    pub player_y: Option<f32>,
    /// Restart (or back to main menu and in again)
    pub restart: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.restart {
        state.restart();
        return;
    }

    // World time is frozen once the run is over
    if state.session.is_game_over() {
        return;
    }

    let dt = sanitize_dt(dt);

    state.scheduler.advance(dt, &mut state.events);
    state.scheduler.tick(&mut state.events);

    for &id in &input.contacts {
        apply_contact(state, id);
    }

    if let Some(y) = input.player_y
        && y <= state.config().player.death_y
        && let Some(final_score) = state.session.trigger_game_over()
    {
        state.events.push(GameEvent::SessionEnded { final_score });
    }
}

/// Player entered a pulpit's trigger volume
fn apply_contact(state: &mut GameState, id: PulpitId) {
    let Some(pulpit) = state.scheduler.find_mut(id) else {
        log::trace!("Contact with unknown pulpit {} ignored", id);
        return;
    };

    if !pulpit.on_player_contact() {
        return;
    }

    if let Some(score) = state.session.on_platform_stepped() {
        log::debug!("Pulpit {} stepped, score {}", id, score);
        state.events.push(GameEvent::PulpitStepped { id, score });
    }
}
