//! Session lifecycle and frame driving
//!
//! `Idle -> Running -> Ended`, and `Ended -> Running` only through a reset.
//! The host calls `frame` once per display refresh while it returns
//! `FrameOutcome::Continue`; tests and headless runs call `advance` directly.

use crate::config::{ConfigError, GameConfig};
use crate::input::{self, NormalizedInput, RawInput};
use crate::sim::{EndCause, GameEvent, GamePhase, GameState, RenderFrame, TickInput, clamp_dt, tick};

/// Drawing collaborator. Never queried for state.
pub trait Renderer {
    fn draw(&mut self, frame: &RenderFrame);
    /// Show the end-of-run overlay
    fn show_overlay(&mut self, message: &str);
    fn hide_overlay(&mut self);
}

/// Result of an activate signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// First run began
    Started,
    /// An arrow was queued for the next tick
    Fired,
    /// The ended run was replaced by a fresh one
    Reset,
}

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule another frame
    Continue,
    /// This frame ended the run; stop scheduling
    Ended(EndCause),
    /// Not running; nothing was simulated or drawn
    Stopped,
}

pub struct Session {
    state: GameState,
    input: TickInput,
    /// Host timestamp of the previous frame (ms)
    last_time: Option<f64>,
}

impl Session {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            state: GameState::new(config, seed)?,
            input: TickInput::default(),
            last_time: None,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Begin (or restart) a run
    pub fn start(&mut self) {
        self.state.reset();
        self.input = TickInput::default();
        self.last_time = None;
    }

    /// Set the aim used from the next tick on
    pub fn aim(&mut self, angle: f32) {
        if angle.is_finite() {
            self.input.aim = Some(angle);
        }
    }

    /// Click/tap/space: fire while running, restart once ended
    pub fn activate(&mut self) -> Activation {
        match self.state.phase {
            GamePhase::Running => {
                self.input.fire = true;
                Activation::Fired
            }
            GamePhase::Ended(_) => {
                self.start();
                Activation::Reset
            }
            GamePhase::Idle => {
                self.start();
                Activation::Started
            }
        }
    }

    /// Feed one normalized input
    pub fn apply(&mut self, input: NormalizedInput) -> Option<Activation> {
        if let Some(aim) = input.aim {
            self.aim(aim);
        }
        input.activate.then(|| self.activate())
    }

    /// Normalize and feed one raw device event
    pub fn handle(&mut self, event: &RawInput) -> Option<Activation> {
        let normalized = input::normalize(event, &self.state.archer);
        if normalized.is_empty() {
            return None;
        }
        self.apply(normalized)
    }

    /// Step the simulation by `dt` seconds as given. Returns the end cause if
    /// this step ended the run.
    ///
    /// The delta is not clamped here: a 30 second `dt` integrates 30 seconds
    /// in one step. Only `frame` caps wall-clock deltas at `max_frame_dt`, so
    /// headless callers pick their own step size.
    pub fn advance(&mut self, dt: f32) -> Option<EndCause> {
        let was_running = self.state.is_running();
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input, dt);
        if was_running {
            self.state.end_cause()
        } else {
            None
        }
    }

    /// One display refresh: derive the delta from the host timestamp, step,
    /// draw, and raise the overlay if the run ended
    pub fn frame<R: Renderer + ?Sized>(&mut self, now_ms: f64, renderer: &mut R) -> FrameOutcome {
        if !self.state.is_running() {
            return FrameOutcome::Stopped;
        }

        let dt = match self.last_time {
            Some(last) => clamp_dt(
                ((now_ms - last) / 1000.0) as f32,
                self.state.config.max_frame_dt,
            ),
            None => {
                renderer.hide_overlay();
                0.0
            }
        };
        self.last_time = Some(now_ms);

        let ended = self.advance(dt);
        renderer.draw(&self.render_frame());

        match ended {
            Some(cause) => {
                renderer.show_overlay(cause.message());
                FrameOutcome::Ended(cause)
            }
            None => FrameOutcome::Continue,
        }
    }

    /// Track a new playfield size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame::capture(&self.state)
    }

    /// Events from the most recent tick, or from `start` (the floor spawns)
    /// if no tick has run since
    pub fn events(&self) -> &[GameEvent] {
        &self.state.events
    }

    /// Take the most recent tick's events, leaving none behind
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        draws: usize,
        last_score: Option<u32>,
        overlay: Option<String>,
        hides: usize,
    }

    impl Renderer for Recorder {
        fn draw(&mut self, frame: &RenderFrame) {
            self.draws += 1;
            self.last_score = Some(frame.score);
        }

        fn show_overlay(&mut self, message: &str) {
            self.overlay = Some(message.to_string());
        }

        fn hide_overlay(&mut self) {
            self.hides += 1;
            self.overlay = None;
        }
    }

    fn session() -> Session {
        Session::new(GameConfig::default(), 2024).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = GameConfig {
            spawn_interval: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Session::new(config, 1),
            Err(ConfigError::SpawnInterval(_))
        ));
    }

    #[test]
    fn test_idle_until_activated() {
        let mut s = session();
        assert_eq!(s.phase(), GamePhase::Idle);
        let mut r = Recorder::default();
        assert_eq!(s.frame(0.0, &mut r), FrameOutcome::Stopped);
        assert_eq!(r.draws, 0);

        assert_eq!(s.activate(), Activation::Started);
        assert!(s.is_running());
        assert_eq!(s.state().enemies.len(), 5);
    }

    #[test]
    fn test_activate_fires_while_running() {
        let mut s = session();
        s.start();
        assert_eq!(s.activate(), Activation::Fired);
        assert!(s.state().arrows.is_empty());
        s.advance(0.016);
        assert_eq!(s.state().arrows.len(), 1);
        // One-shot: no second arrow
        s.advance(0.016);
        assert_eq!(s.state().arrows.len(), 1);
    }

    #[test]
    fn test_activate_resets_after_end() {
        let mut s = session();
        s.start();
        s.state_mut().score = 7;
        s.state_mut().time_remaining = 0.01;
        assert_eq!(s.advance(0.02), Some(EndCause::TimeUp));

        assert_eq!(s.activate(), Activation::Reset);
        let state = s.state();
        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.time_remaining, 100.0);
        assert_eq!(state.enemies.len(), 5);
        assert!(state.arrows.is_empty());
    }

    #[test]
    fn test_frame_delta_and_stall_clamp() {
        let mut s = session();
        s.start();
        let mut r = Recorder::default();

        assert_eq!(s.frame(1000.0, &mut r), FrameOutcome::Continue);
        assert_eq!(s.state().time_remaining, 100.0);
        assert_eq!(r.hides, 1);

        s.frame(1020.0, &mut r);
        assert!((s.state().time_remaining - 99.98).abs() < 1e-4);

        // A five second stall only advances 40ms
        s.frame(6020.0, &mut r);
        assert!((s.state().time_remaining - 99.94).abs() < 1e-4);
        assert_eq!(r.draws, 3);
        assert_eq!(r.hides, 1);
    }

    #[test]
    fn test_frame_reports_end_and_shows_overlay() {
        let mut s = session();
        s.start();
        let mut r = Recorder::default();
        s.frame(0.0, &mut r);
        s.state_mut().time_remaining = 0.01;

        assert_eq!(
            s.frame(30.0, &mut r),
            FrameOutcome::Ended(EndCause::TimeUp)
        );
        assert_eq!(r.overlay.as_deref(), Some(EndCause::TimeUp.message()));
        let draws = r.draws;

        // Host stops scheduling; a stray frame does nothing
        assert_eq!(s.frame(60.0, &mut r), FrameOutcome::Stopped);
        assert_eq!(r.draws, draws);

        // Reset clears the overlay on the next frame
        s.activate();
        assert_eq!(s.frame(90.0, &mut r), FrameOutcome::Continue);
        assert!(r.overlay.is_none());
        assert_eq!(r.last_score, Some(0));
    }

    #[test]
    fn test_handle_raw_input() {
        let mut s = session();
        s.start();
        assert_eq!(
            s.handle(&RawInput::PointerMove { x: 500.0, y: 390.0 }),
            None
        );
        assert_eq!(
            s.handle(&RawInput::KeyDown("Space".to_string())),
            Some(Activation::Fired)
        );
        assert_eq!(s.handle(&RawInput::KeyDown("Enter".to_string())), None);

        s.advance(0.016);
        assert_eq!(s.state().archer.aim, 0.0);
        assert_eq!(s.state().arrows.len(), 1);
    }

    #[test]
    fn test_drain_events() {
        let mut s = session();
        s.start();
        s.activate();
        s.advance(0.016);
        let events = s.drain_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::Fired { .. }))
        );
        assert!(s.events().is_empty());
    }

    #[test]
    fn test_advance_integrates_full_delta() {
        let config = GameConfig {
            enemy_floor: 0,
            spawn_interval: 100.0,
            ..Default::default()
        };
        let mut s = Session::new(config, 5).unwrap();
        s.start();
        assert_eq!(s.advance(30.0), None);
        assert_eq!(s.state().time_remaining, 70.0);
    }

    #[test]
    fn test_floor_spawns_drainable_before_first_tick() {
        let mut s = session();
        s.start();
        let spawned = s
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 5);

        // A reset after the run ends reports its own floor
        s.state_mut().end(EndCause::Caught);
        s.drain_events();
        assert_eq!(s.activate(), Activation::Reset);
        assert_eq!(s.drain_events().len(), 5);
    }

    #[test]
    fn test_reset_scenario() {
        let mut s = session();
        s.start();
        for _ in 0..50 {
            s.activate();
            s.advance(0.04);
        }
        s.state_mut().end(EndCause::Caught);
        s.activate();

        assert_eq!(s.state().enemies.len(), 5);
        assert_eq!(s.state().score, 0);
        assert_eq!(s.state().time_remaining, 100.0);
        assert_eq!(s.state().kills_since_bonus, 0);
    }
}
