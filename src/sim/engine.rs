//! Engine facade for the presentation layer
//!
//! Wraps [`GameState`] with the pieces a frame loop needs: the run/pause
//! flag, the FPS readout, and observer callbacks for game events. The host
//! delivers frame times and input here and reads entities back out.

use glam::DVec2;
use rand_pcg::Pcg32;

use super::fps::FpsCounter;
use super::launch;
use super::state::{Ball, Brick, GameEvent, GamePhase, GameState};
use super::tick::tick;
use crate::settings::Settings;

/// Callback invoked for every game event
pub type Observer = Box<dyn FnMut(&GameEvent)>;

pub struct Engine {
    state: GameState,
    running: bool,
    fps: FpsCounter,
    observers: Vec<Observer>,
    /// Events dispatched since the last poll
    pending: Vec<GameEvent>,
}

impl Engine {
    pub fn new(settings: Settings) -> Self {
        Self::from_state(GameState::new(settings))
    }

    /// Engine with an explicit brick placement RNG (deterministic levels)
    pub fn with_rng(settings: Settings, rng: Pcg32) -> Self {
        Self::from_state(GameState::with_rng(settings, rng))
    }

    fn from_state(state: GameState) -> Self {
        let fps = FpsCounter::new(state.settings.fps_window);
        Self {
            state,
            running: true,
            fps,
            observers: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Register a callback for game events
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Set the play-field size; the first call starts the game
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.state.set_viewport_size(width, height);
        self.dispatch();
    }

    /// Advance one frame of `dt` seconds
    ///
    /// The FPS readout always updates. Physics only runs while the engine is
    /// running; a paused engine keeps its scene frozen for rendering.
    pub fn tick(&mut self, dt: f64) {
        self.fps.record(dt);
        if self.running {
            tick(&mut self.state, dt);
            self.dispatch();
        }
    }

    /// Player aim input. Ignored unless a target is being placed.
    pub fn fire(&mut self, aim_point: DVec2) -> bool {
        let fired = launch::fire(&mut self.state, aim_point);
        self.dispatch();
        fired
    }

    /// Return to aiming from a target drag
    pub fn begin_aim(&mut self) -> bool {
        let aiming = launch::begin_aim(&mut self.state);
        self.dispatch();
        aiming
    }

    /// Hand recorded events to observers and queue them for polling
    fn dispatch(&mut self) {
        let events = self.state.drain_events();
        for event in &events {
            for observer in &mut self.observers {
                observer(event);
            }
        }
        self.pending.extend(events);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        if self.running != running {
            log::info!("Simulation {}", if running { "resumed" } else { "paused" });
        }
        self.running = running;
    }

    pub fn balls(&self) -> &[Ball] {
        self.state.balls()
    }

    pub fn bricks(&self) -> &[Brick] {
        self.state.bricks()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn shooting_point(&self) -> DVec2 {
        self.state.shooting_point()
    }

    pub fn target_point(&self) -> Option<DVec2> {
        self.state.target_point()
    }

    pub fn level(&self) -> u32 {
        self.state.level()
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// Take every event dispatched since the previous call
    ///
    /// Observers have already seen these; polling hosts read them here
    /// instead. Each event is returned exactly once.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Serialize the current state for debugging
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.state)
    }
}
