//! Exit Finder entry point
//!
//! Loads settings and the predictor, then runs the simulation on a headless
//! surface until interrupted (Ctrl-C / SIGTERM) or a fatal fault. Progress is
//! reported through the log.

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use exit_finder::Settings;
use exit_finder::predictor::{FeedForwardNet, NetConfig};
use exit_finder::render::HeadlessSurface;
use exit_finder::sim::{SimState, Simulation};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Exit Finder starting...");

    let settings = Settings::load();
    let seed: u64 = rand::random();
    log::info!("Obstacle seed: {seed}");

    let predictor =
        match FeedForwardNet::load_or_new(&settings.model_path, NetConfig::default(), seed) {
            Ok(net) => net,
            Err(e) => {
                log::error!("Could not load predictor: {e}");
                return ExitCode::FAILURE;
            }
        };

    let state = match SimState::new(seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Could not build the field: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stop = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&stop);
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Release)) {
        log::warn!("Could not install interrupt handler, only faults will save: {e}");
    }

    let mut sim = Simulation::new(
        state,
        predictor,
        HeadlessSurface::new(),
        settings.sound.build(),
    )
    .with_autosave(settings.autosave_every)
    .with_stop_flag(stop);

    match sim.run() {
        Ok(()) => {
            log::info!("Exit Finder stopped");
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    }
}
