//! Paced simulation loop with side effects
//!
//! Wraps [`tick`] with everything that is not simulation logic: playing
//! cues, reporting progress, projecting onto the render surface, pacing and
//! saving the predictor when the run ends.
//!
//! A run ends on a fatal fault, a panic inside a tick, or when the stop flag
//! from [`Simulation::stop_handle`] is raised. The predictor is saved in all
//! three cases.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::audio::{NotificationSink, SoundEffect};
use crate::error::SimResult;
use crate::predictor::Predictor;
use crate::render::{RenderSurface, SceneProjector};

use super::controller::Motion;
use super::pacer::FramePacer;
use super::state::{SimEvent, SimState};
use super::tick::tick;

pub struct Simulation<P: Predictor, S: RenderSurface> {
    state: SimState,
    predictor: P,
    surface: S,
    projector: SceneProjector,
    notifier: Box<dyn NotificationSink>,
    pacer: FramePacer,
    /// Save every N resolved obstacles (0 = only when the run ends)
    autosave_every: u64,
    stop: Arc<AtomicBool>,
}

impl<P: Predictor, S: RenderSurface> Simulation<P, S> {
    pub fn new(
        state: SimState,
        predictor: P,
        surface: S,
        notifier: Box<dyn NotificationSink>,
    ) -> Self {
        let pacer = FramePacer::new(state.config.fps);
        Self {
            state,
            predictor,
            surface,
            projector: SceneProjector::new(),
            notifier,
            pacer,
            autosave_every: 0,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_autosave(mut self, every: u64) -> Self {
        self.autosave_every = every;
        self
    }

    /// Share an existing stop flag, e.g. one raised by a signal handler
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Flag that ends [`Simulation::run`] after the current tick when set
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn is_stopping(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// One tick plus its side effects, without pacing
    pub fn step(&mut self) -> SimResult<Motion> {
        let motion = tick(&mut self.state, &self.predictor)?;
        for event in self.state.drain_events() {
            self.handle_event(event);
        }
        self.projector.sync(&self.state, &mut self.surface);
        Ok(motion)
    }

    /// Run at the configured frame rate until stopped or a fatal fault
    ///
    /// The predictor is saved before returning, whatever ended the run.
    pub fn run(&mut self) -> SimResult<()> {
        log::info!(
            "Running at {} fps with {} obstacles on screen",
            self.state.config.fps,
            self.state.obstacles.len()
        );
        while !self.is_stopping() {
            if let Err(e) = self.guarded_step() {
                log::error!("Simulation stopped: {e}");
                self.persist();
                return Err(e);
            }
            self.pacer.wait();
        }
        log::info!("Stop requested after {} ticks", self.state.time_ticks);
        self.persist();
        Ok(())
    }

    /// Run up to `ticks` unpaced ticks, then save the predictor
    pub fn run_for(&mut self, ticks: u64) -> SimResult<()> {
        let mut result = Ok(());
        for _ in 0..ticks {
            if self.is_stopping() {
                break;
            }
            if let Err(e) = self.guarded_step() {
                log::error!("Simulation stopped: {e}");
                result = Err(e);
                break;
            }
        }
        self.persist();
        result
    }

    /// [`Simulation::step`] that still saves the predictor when a tick panics
    fn guarded_step(&mut self) -> SimResult<Motion> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.step())) {
            Ok(result) => result,
            Err(payload) => {
                log::error!("Simulation panicked at tick {}", self.state.time_ticks);
                self.persist();
                panic::resume_unwind(payload)
            }
        }
    }

    fn handle_event(&mut self, event: SimEvent) {
        match event {
            SimEvent::ObstacleRetired { id, passed } => {
                log::debug!("Obstacle {id} resolved (passed: {passed})");
                if !passed {
                    log::warn!("COLLISION! ({})", self.state.tracker.collision_count());
                }
                if let Err(e) = self.notifier.notify(SoundEffect::for_outcome(passed)) {
                    log::warn!("Notification failed: {e}");
                }
                self.report();
                self.maybe_autosave();
            }
            SimEvent::CollisionDetected { id } => {
                log::debug!("Agent touched obstacle {id}");
            }
            SimEvent::ObstacleSpawned { id } => {
                log::trace!("Obstacle {id} spawned");
            }
        }
    }

    fn report(&self) {
        let tracker = &self.state.tracker;
        log::info!("Seen objects {}", tracker.seen_count());
        log::info!(
            "Error through last {} obstacles = {}%",
            tracker.window().len(),
            tracker.error_rate()
        );
        if let Some(fps) = self.pacer.fps() {
            log::debug!("{fps:.1} fps");
        }
    }

    fn maybe_autosave(&self) {
        let seen = self.state.tracker.seen_count();
        if self.autosave_every > 0 && seen % self.autosave_every == 0 {
            if let Err(e) = self.predictor.save() {
                log::warn!("Autosave failed: {e}");
            }
        }
    }

    fn persist(&self) {
        if let Err(e) = self.predictor.save() {
            log::error!("Could not save predictor: {e}");
        }
    }
}
