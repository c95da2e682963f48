//! Control rods
//!
//! Each rod has its own response: a speed factor that scales both how far a
//! knob turn moves its target and how fast it slides toward that target, and
//! a transport delay between the operator's command and the rod reacting.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::{ROD_COMMAND_SCALE, ROD_COUNT, ROD_MAX_Y, ROD_MIN_Y, ROD_MOVE_SPEED};

/// Per-rod speed factors
pub const ROD_SPEED_FACTORS: [f32; ROD_COUNT] = [1.0, 0.8, 1.2];
/// Per-rod response delays in ticks (0, 100 and 200 ms at 60 Hz)
pub const ROD_DELAY_TICKS: [usize; ROD_COUNT] = [0, 6, 12];
/// Initial creep directions for the two free-drifting rods
const ROD_DRIFT_DIRECTIONS: [f32; 2] = [1.0, -1.0];
/// Phase offset of the second rod's drift (seconds)
const ROD_DRIFT_PHASE: f32 = 1.0;

/// Ease-in-out sine on [0, 1] (periodic outside it)
#[inline]
pub fn ease_in_out_sine(t: f32) -> f32 {
    -((std::f32::consts::PI * t).cos() - 1.0) / 2.0
}

/// A single control rod
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rod {
    /// Current position (0 = bottom, 1 = top)
    pub position: f32,
    /// Target the rod is sliding toward (delayed command)
    pub target: f32,
    /// Latest operator command
    pub commanded: f32,
    pub speed_factor: f32,
    /// Commands waiting to reach the rod
    delay_line: VecDeque<f32>,
}

impl Rod {
    pub fn new(speed_factor: f32, delay_ticks: usize) -> Self {
        Self {
            position: 0.0,
            target: 0.0,
            commanded: 0.0,
            speed_factor,
            delay_line: std::iter::repeat_n(0.0, delay_ticks).collect(),
        }
    }

    /// Response delay in ticks
    pub fn delay_ticks(&self) -> usize {
        self.delay_line.len()
    }

    /// Apply a knob turn. Counter-clockwise (positive) turns drop the rod,
    /// clockwise turns raise it.
    pub fn command(&mut self, finger_delta: f32) {
        let step = finger_delta.abs() * ROD_COMMAND_SCALE * self.speed_factor;
        if finger_delta > 0.0 {
            self.commanded = (self.commanded - step).max(0.0);
        } else {
            self.commanded = (self.commanded + step).min(1.0);
        }
    }

    /// Advance one tick: feed the delay line, then ease toward the target
    pub fn step(&mut self) {
        self.target = match self.delay_line.pop_front() {
            Some(delayed) => {
                self.delay_line.push_back(self.commanded);
                delayed
            }
            None => self.commanded,
        };
        self.position += (self.target - self.position) * ROD_MOVE_SPEED * self.speed_factor;
    }

    /// Scene height of the rod sprite
    pub fn scene_y(&self) -> f32 {
        ROD_MIN_Y + (ROD_MAX_Y - ROD_MIN_Y) * self.position
    }
}

/// The rod bank plus its drift state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RodBank {
    pub rods: [Rod; ROD_COUNT],
    drift_directions: [f32; 2],
}

impl Default for RodBank {
    fn default() -> Self {
        Self {
            rods: std::array::from_fn(|i| Rod::new(ROD_SPEED_FACTORS[i], ROD_DELAY_TICKS[i])),
            drift_directions: ROD_DRIFT_DIRECTIONS,
        }
    }
}

impl RodBank {
    /// Mean rod position
    pub fn average_position(&self) -> f32 {
        self.rods.iter().map(|r| r.position).sum::<f32>() / ROD_COUNT as f32
    }

    pub fn command(&mut self, finger_delta: f32) {
        for rod in &mut self.rods {
            rod.command(finger_delta);
        }
    }

    /// Creep the commands on their own. The first two rods wander in opposite
    /// directions and bounce off the ends, the third follows their mean.
    pub fn drift(&mut self, speed: f32, time_secs: f32) {
        if speed <= 0.0 {
            return;
        }

        let phases = [time_secs, time_secs + ROD_DRIFT_PHASE];
        for i in 0..2 {
            let rod = &mut self.rods[i];
            rod.commanded += self.drift_directions[i] * speed * ease_in_out_sine(phases[i]);
            if rod.commanded <= 0.0 || rod.commanded >= 1.0 {
                self.drift_directions[i] = -self.drift_directions[i];
            }
            rod.commanded = rod.commanded.clamp(0.0, 1.0);
        }
        self.rods[2].commanded = (self.rods[0].commanded + self.rods[1].commanded) / 2.0;
    }

    pub fn step(&mut self) {
        for rod in &mut self.rods {
            rod.step();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clockwise_raises_counter_clockwise_drops() {
        let mut rod = Rod::new(1.0, 0);
        rod.command(-1.0);
        assert!((rod.commanded - ROD_COMMAND_SCALE).abs() < 1e-6);
        rod.command(0.5);
        assert!((rod.commanded - ROD_COMMAND_SCALE * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_command_clamped() {
        let mut rod = Rod::new(1.2, 0);
        for _ in 0..100 {
            rod.command(-3.0);
        }
        assert_eq!(rod.commanded, 1.0);
        for _ in 0..100 {
            rod.command(3.0);
        }
        assert_eq!(rod.commanded, 0.0);
    }

    #[test]
    fn test_delay_holds_command() {
        let mut rod = Rod::new(1.0, 6);
        rod.command(-2.0);
        for _ in 0..6 {
            rod.step();
            assert_eq!(rod.target, 0.0);
            assert_eq!(rod.position, 0.0);
        }
        rod.step();
        assert!((rod.target - rod.commanded).abs() < 1e-6);
        assert!(rod.position > 0.0);
    }

    #[test]
    fn test_undelayed_rod_reacts_immediately() {
        let mut bank = RodBank::default();
        bank.command(-2.0);
        bank.step();
        assert!(bank.rods[0].position > 0.0);
        assert_eq!(bank.rods[1].position, 0.0);
        assert_eq!(bank.rods[2].position, 0.0);
    }

    #[test]
    fn test_bank_delays_per_rod() {
        let mut bank = RodBank::default();
        for (rod, delay) in bank.rods.iter().zip(ROD_DELAY_TICKS) {
            assert_eq!(rod.delay_ticks(), delay);
        }

        bank.command(-2.0);
        for _ in 0..12 {
            bank.step();
        }
        assert!(bank.rods[1].position > 0.0);
        assert_eq!(bank.rods[2].target, 0.0);
        assert_eq!(bank.rods[2].position, 0.0);

        bank.step();
        assert!((bank.rods[2].target - bank.rods[2].commanded).abs() < 1e-6);
        assert!(bank.rods[2].position > 0.0);
        // Delay line length never changes
        assert_eq!(bank.rods[2].delay_ticks(), 12);
    }

    #[test]
    fn test_position_converges() {
        let mut rod = Rod::new(0.8, 0);
        rod.command(-5.0);
        for _ in 0..1000 {
            rod.step();
        }
        assert!((rod.position - rod.commanded).abs() < 1e-3);
        assert!((rod.scene_y() - (ROD_MIN_Y + (ROD_MAX_Y - ROD_MIN_Y) * rod.position)).abs() < 1e-4);
    }

    #[test]
    fn test_drift_stays_bounded_and_third_follows_mean() {
        let mut bank = RodBank::default();
        for i in 0..5000 {
            bank.drift(0.005, i as f32 / 60.0);
            for rod in &bank.rods {
                assert!((0.0..=1.0).contains(&rod.commanded));
            }
            let mean = (bank.rods[0].commanded + bank.rods[1].commanded) / 2.0;
            assert!((bank.rods[2].commanded - mean).abs() < 1e-6);
        }
    }

    #[test]
    fn test_no_drift_when_speed_zero() {
        let mut bank = RodBank::default();
        bank.drift(0.0, 0.5);
        assert!(bank.rods.iter().all(|r| r.commanded == 0.0));
    }

    #[test]
    fn test_ease_in_out_sine_endpoints() {
        assert!(ease_in_out_sine(0.0).abs() < 1e-6);
        assert!((ease_in_out_sine(0.5) - 0.5).abs() < 1e-6);
        assert!((ease_in_out_sine(1.0) - 1.0).abs() < 1e-6);
    }
}
