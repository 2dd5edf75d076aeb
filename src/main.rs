//! Pulpit Run entry point
//!
//! Loads the diary, then plays headless runs with the autopilot standing in
//! for the player, logging every event the core emits.
//!
//! Usage: `pulpit-run [DIARY_PATH] [SEED] [RUNS]`

use std::process::ExitCode;

use pulpit_run::autopilot::Autopilot;
use pulpit_run::consts::*;
use pulpit_run::sim::{GameEvent, GameState, TickInput, tick};
use pulpit_run::DiaryConfig;

const DEFAULT_DIARY: &str = "doofus_diary.json";
/// Give up on a run that outlives this many simulated seconds
const MAX_RUN_SECONDS: f32 = 120.0;
/// Host frame time; the sim substeps at `SIM_DT`
const FRAME_DT: f32 = 1.0 / 30.0;

/// Host-side game loop state
struct Game {
    state: GameState,
    pilot: Autopilot,
    accumulator: f32,
    elapsed: f32,
}

impl Game {
    fn new(config: DiaryConfig, seed: u64) -> Self {
        Self {
            pilot: Autopilot::new(&config),
            state: GameState::new(config, seed),
            accumulator: 0.0,
            elapsed: 0.0,
        }
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.pilot.step(&self.state, SIM_DT);
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            self.elapsed += SIM_DT;
            substeps += 1;
        }

        for event in self.state.drain_events() {
            report(&event);
        }
    }

    /// Same path the game over panel's restart button takes
    fn restart(&mut self) {
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut self.state, &input, 0.0);
        self.pilot.reset(self.state.config());
        self.elapsed = 0.0;
        self.accumulator = 0.0;
    }
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::SessionStarted { run } => log::info!("Run {} started", run),
        GameEvent::PulpitStepped { score, .. } => log::info!("Score: {}", score),
        GameEvent::SessionEnded { final_score } => log::info!("Game over - score {}", final_score),
        other => match serde_json::to_string(other) {
            Ok(json) => log::debug!("{}", json),
            Err(e) => log::warn!("Could not encode event {:?}: {}", other, e),
        },
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Pulpit Run (headless) starting...");

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| DEFAULT_DIARY.to_string());
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed: {}", e);
            return ExitCode::FAILURE;
        }
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0),
    };
    let runs = match args.next().map(|s| s.parse::<u32>()) {
        Some(Ok(runs)) => runs.max(1),
        Some(Err(e)) => {
            log::error!("Invalid run count: {}", e);
            return ExitCode::FAILURE;
        }
        None => 1,
    };

    // No diary, no game: never fall back to defaults
    let config = match DiaryConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("pulpit-run: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut game = Game::new(config, seed);
    let mut scores = Vec::with_capacity(runs as usize);

    for run in 0..runs {
        if run > 0 {
            game.restart();
        }
        loop {
            game.update(FRAME_DT);
            if game.state.session.is_game_over() {
                break;
            }
            if game.elapsed >= MAX_RUN_SECONDS {
                log::info!("Run {} survived {}s, stopping", game.state.run, MAX_RUN_SECONDS);
                break;
            }
        }
        scores.push(game.state.score());
    }

    for (run, score) in scores.iter().enumerate() {
        println!("run {}: score {}", run, score);
    }
    ExitCode::SUCCESS
}
