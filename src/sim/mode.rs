//! Timed event modes
//!
//! The reactor spends most of its time in `Normal`. Every so often a random
//! event (a power surge or a coolant leak) swaps in a harsher parameter set
//! for a few seconds.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::TICKS_PER_SECOND;

/// Seconds of calm between events (inclusive range)
pub const NORMAL_DURATION_SECS: (u32, u32) = (10, 20);
/// Seconds an event lasts (inclusive range)
pub const EVENT_DURATION_SECS: (u32, u32) = (6, 10);

/// Reactor operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventMode {
    #[default]
    Normal,
    /// Runaway heat, rods creep on their own
    Surge,
    /// Cooling collapses
    CoolantLeak,
}

/// Simulation parameters for one mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeParams {
    /// Heat added per tick at full rod withdrawal
    pub heat_gen_rate: f32,
    /// Heat removed per tick at full rod insertion
    pub cooling_rate: f32,
    /// Amplitude of the slow sinusoidal drift
    pub drift_rate: f32,
    /// Half-width of the uniform per-tick noise
    pub noise: f32,
    /// Rod creep speed (0 = rods hold still)
    pub rod_drift: f32,
    /// Score multiplier while the mode is active
    pub score_multiplier: u64,
}

impl EventMode {
    pub fn params(&self) -> ModeParams {
        match self {
            EventMode::Normal => ModeParams {
                heat_gen_rate: 0.005,
                cooling_rate: 0.004,
                drift_rate: 0.0008,
                noise: 0.0005,
                rod_drift: 0.0,
                score_multiplier: 1,
            },
            EventMode::Surge => ModeParams {
                heat_gen_rate: 0.009,
                cooling_rate: 0.004,
                drift_rate: 0.0015,
                noise: 0.001,
                rod_drift: 0.005,
                score_multiplier: 2,
            },
            EventMode::CoolantLeak => ModeParams {
                heat_gen_rate: 0.005,
                cooling_rate: 0.0015,
                drift_rate: 0.0012,
                noise: 0.0008,
                rod_drift: 0.0,
                score_multiplier: 2,
            },
        }
    }

    /// Banner text
    pub fn label(&self) -> &'static str {
        match self {
            EventMode::Normal => "NORMAL",
            EventMode::Surge => "POWER SURGE",
            EventMode::CoolantLeak => "COOLANT LEAK",
        }
    }

    pub fn is_event(&self) -> bool {
        *self != EventMode::Normal
    }
}

/// Counts down the current mode and picks the next one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeTimer {
    pub mode: EventMode,
    pub ticks_left: u32,
}

impl ModeTimer {
    /// Start in `Normal` with a random calm period
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self {
            mode: EventMode::Normal,
            ticks_left: roll_duration(rng, NORMAL_DURATION_SECS),
        }
    }

    /// Advance one tick. Returns the new mode when it changed.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Option<EventMode> {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        if self.ticks_left > 0 {
            return None;
        }

        let (next, duration) = match self.mode {
            EventMode::Normal => {
                let event = if rng.random_bool(0.5) {
                    EventMode::Surge
                } else {
                    EventMode::CoolantLeak
                };
                (event, EVENT_DURATION_SECS)
            }
            EventMode::Surge | EventMode::CoolantLeak => (EventMode::Normal, NORMAL_DURATION_SECS),
        };
        self.mode = next;
        self.ticks_left = roll_duration(rng, duration);
        log::info!("Reactor mode -> {:?} for {} ticks", next, self.ticks_left);
        Some(next)
    }

    /// Seconds left in the current mode (rounded up)
    pub fn seconds_left(&self) -> u32 {
        self.ticks_left.div_ceil(TICKS_PER_SECOND)
    }
}

fn roll_duration<R: Rng>(rng: &mut R, (min_secs, max_secs): (u32, u32)) -> u32 {
    rng.random_range(min_secs..=max_secs) * TICKS_PER_SECOND
}
