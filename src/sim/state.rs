//! Reactor state and touch handling
//!
//! Every scalar the scene mutates lives on `ReactorState`. Touch handlers
//! update the knob and rod commands directly; `tick` does the rest.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::knob::Knob;
use super::mode::{EventMode, ModeTimer};
use super::rods::RodBank;
use super::score::Score;
use crate::consts::*;

/// Something the presentation layer should react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Knob crossed a detent (light haptic)
    Detent,
    /// Event mode switched
    ModeChanged(EventMode),
    /// Points paid out for a second in the safe window
    ScoreAwarded(u64),
    /// Temperature entered the critical zone (heavy haptic)
    CriticalTemperature { temperature: f32, lost: u64 },
    /// Pause toggled
    PauseChanged(bool),
}

/// Complete reactor state
#[derive(Debug, Clone)]
pub struct ReactorState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Knob centre in scene coordinates
    pub knob_center: Vec2,
    pub knob: Knob,
    pub rods: RodBank,
    /// Normalized reactor temperature
    pub temperature: f32,
    /// Smoothed gauge needle angle (radians, 0 = straight up)
    pub needle_angle: f32,
    pub score: Score,
    pub mode: ModeTimer,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paused: bool,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl ReactorState {
    /// Create a new reactor with the given seed and knob position
    pub fn new(seed: u64, knob_center: Vec2) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mode = ModeTimer::new(&mut rng);
        Self {
            seed,
            rng,
            knob_center,
            knob: Knob::new(0.0),
            rods: RodBank::default(),
            temperature: INITIAL_TEMPERATURE,
            needle_angle: 0.0,
            score: Score::default(),
            mode,
            time_ticks: 0,
            paused: false,
            events: Vec::new(),
        }
    }

    /// Simulation time in seconds
    pub fn time_secs(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    /// Finger down. Ignored while paused.
    pub fn touch_began(&mut self, point: Vec2) {
        if self.paused {
            return;
        }
        self.knob.touch_began(self.knob_center, point);
    }

    /// Drag: turn the knob and command the rods
    pub fn touch_moved(&mut self, point: Vec2) {
        if self.paused {
            return;
        }
        let Some(turn) = self.knob.touch_moved(self.knob_center, point) else {
            return;
        };
        if turn.detent {
            self.events.push(GameEvent::Detent);
        }
        self.rods.command(turn.finger_delta);
    }

    pub fn touch_ended(&mut self) {
        self.knob.release();
    }

    /// A finger lifted with `fingers_down` still touching. The knob is only
    /// let go once the last finger is up.
    pub fn finger_lifted(&mut self, fingers_down: u32) {
        if fingers_down == 0 {
            self.touch_ended();
        }
    }

    pub fn touch_cancelled(&mut self) {
        self.knob.release();
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time_secs: self.time_secs(),
            temperature: self.temperature,
            needle_angle: self.needle_angle,
            knob_rotation: self.knob.rotation,
            rod_positions: std::array::from_fn(|i| self.rods.rods[i].position),
            score: self.score.points,
            best_streak_secs: self.score.best_streak_secs,
            mode: self.mode.mode,
        }
    }
}

/// Plain view of the state for HUD and logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time_secs: f32,
    pub temperature: f32,
    pub needle_angle: f32,
    pub knob_rotation: f32,
    pub rod_positions: [f32; ROD_COUNT],
    pub score: u64,
    pub best_streak_secs: u32,
    pub mode: EventMode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar_to_cartesian;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_new_state() {
        let state = ReactorState::new(1, Vec2::ZERO);
        assert_eq!(state.temperature, INITIAL_TEMPERATURE);
        assert_eq!(state.mode.mode, EventMode::Normal);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_clockwise_drag_raises_rod_commands() {
        let center = Vec2::new(0.0, -550.0);
        let mut state = ReactorState::new(1, center);
        state.touch_began(center + polar_to_cartesian(100.0, FRAC_PI_2));
        // Clockwise = decreasing angle
        state.touch_moved(center + polar_to_cartesian(100.0, FRAC_PI_2 - 0.5));
        assert!(state.rods.rods.iter().all(|r| r.commanded > 0.0));
        state.touch_ended();
        assert!(!state.knob.active);
    }

    #[test]
    fn test_touch_outside_knob_leaves_rods() {
        let center = Vec2::new(0.0, -550.0);
        let mut state = ReactorState::new(1, center);
        state.touch_began(center + polar_to_cartesian(KNOB_TOUCH_RADIUS + 10.0, FRAC_PI_2));
        for i in 1..=5 {
            state.touch_moved(center + polar_to_cartesian(200.0, FRAC_PI_2 - i as f32 * 0.3));
        }
        assert!(!state.knob.active);
        assert_eq!(state.knob.rotation, 0.0);
        assert!(state.rods.rods.iter().all(|r| r.commanded == 0.0));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_knob_held_until_last_finger_lifts() {
        let center = Vec2::ZERO;
        let mut state = ReactorState::new(1, center);
        state.touch_began(polar_to_cartesian(100.0, FRAC_PI_2));
        state.finger_lifted(1);
        assert!(state.knob.active);
        state.touch_moved(polar_to_cartesian(100.0, FRAC_PI_2 - 0.5));
        assert!(state.rods.rods[0].commanded > 0.0);
        state.finger_lifted(0);
        assert!(!state.knob.active);
    }

    #[test]
    fn test_detent_event_raised() {
        let center = Vec2::ZERO;
        let mut state = ReactorState::new(1, center);
        state.touch_began(polar_to_cartesian(100.0, FRAC_PI_2));
        for i in 1..=5 {
            state.touch_moved(polar_to_cartesian(100.0, FRAC_PI_2 - i as f32 * 0.3));
        }
        assert_eq!(state.drain_events(), vec![GameEvent::Detent]);
        assert!(state.events.is_empty());
    }
}
