//! Run context and game events
//!
//! `GameState` is the single object the host loop owns: scheduler, session
//! and the queue of events waiting to be handed to presentation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::pulpit::PulpitId;
use super::scheduler::Scheduler;
use super::session::{Session, SessionPhase};
use crate::config::DiaryConfig;

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new run began (initial pulpit follows)
    SessionStarted { run: u32 },
    /// Hook up the grow-in visual
    PulpitSpawned {
        id: PulpitId,
        position: Vec3,
        lifetime: f32,
    },
    /// Hook up the shrink visual
    PulpitCollapsing { id: PulpitId },
    /// Pulpit removed, either expired or evicted to respect the active limit
    PulpitDestroyed { id: PulpitId, evicted: bool },
    /// First contact on a pulpit; scoring sound hookup
    PulpitStepped { id: PulpitId, score: u32 },
    /// Run over; pause and show the game over panel
    SessionEnded { final_score: u32 },
}

/// Complete state of the current run
#[derive(Debug, Clone)]
pub struct GameState {
    config: DiaryConfig,
    /// Seed of the current run
    pub seed: u64,
    /// Session generation, bumped on every restart
    pub run: u32,
    pub scheduler: Scheduler,
    pub session: Session,
    /// Events not yet drained by the host
    pub(super) events: Vec<GameEvent>,
}

impl GameState {
    /// Start run 0 with the given seed
    pub fn new(config: DiaryConfig, seed: u64) -> Self {
        let mut state = Self {
            scheduler: Scheduler::new(config.platform, config.spawner.clone(), 0, seed),
            session: Session::new(),
            config,
            seed,
            run: 0,
            events: Vec::new(),
        };
        state.begin_run();
        state
    }

    /// Throw away the current run and start a fresh one.
    ///
    /// Scheduler and session are replaced together and undelivered events of
    /// the old run are dropped, so nothing from it can leak into the new one.
    pub fn restart(&mut self) {
        let seed = self.scheduler.next_seed();
        let run = self.run.wrapping_add(1);

        self.seed = seed;
        self.run = run;
        self.scheduler =
            Scheduler::new(self.config.platform, self.config.spawner.clone(), run, seed);
        self.session = Session::new();
        self.events.clear();

        self.begin_run();
    }

    fn begin_run(&mut self) {
        log::info!("Run {} started with seed {}", self.run, self.seed);
        self.events.push(GameEvent::SessionStarted { run: self.run });
        self.scheduler.spawn_initial(&mut self.events);
    }

    /// Hand all pending events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn config(&self) -> &DiaryConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }
}
