//! Scoring windows
//!
//! Points come from holding the temperature inside the safe window. Every
//! full second in the window pays out, and longer streaks pay more. Touching
//! the critical zone costs points once per visit.

use serde::{Deserialize, Serialize};

use crate::consts::TICKS_PER_SECOND;

/// Safe temperature window (inclusive)
pub const SAFE_MIN: f32 = 0.35;
pub const SAFE_MAX: f32 = 0.65;
/// Critical thresholds
pub const CRITICAL_LOW: f32 = 0.1;
pub const CRITICAL_HIGH: f32 = 0.9;

pub const POINTS_PER_SECOND: u64 = 10;
/// Streak seconds per extra multiplier step
pub const STREAK_STEP_SECS: u32 = 5;
pub const MAX_STREAK_MULTIPLIER: u64 = 5;
pub const CRITICAL_PENALTY: u64 = 25;

/// Where the temperature sits relative to the scoring windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempZone {
    Safe,
    Warning,
    Critical,
}

impl TempZone {
    pub fn classify(temperature: f32) -> Self {
        if temperature <= CRITICAL_LOW || temperature >= CRITICAL_HIGH {
            TempZone::Critical
        } else if (SAFE_MIN..=SAFE_MAX).contains(&temperature) {
            TempZone::Safe
        } else {
            TempZone::Warning
        }
    }
}

/// What happened to the score this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreChange {
    Awarded(u64),
    Penalized(u64),
}

/// Running score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Score {
    pub points: u64,
    /// Ticks spent in the safe window since entering it
    pub window_ticks: u32,
    /// Completed seconds in the current streak
    pub streak_secs: u32,
    pub best_streak_secs: u32,
    /// Currently inside the critical zone
    pub in_critical: bool,
}

impl Score {
    /// Multiplier for the next payout
    pub fn streak_multiplier(&self) -> u64 {
        (1 + (self.streak_secs / STREAK_STEP_SECS) as u64).min(MAX_STREAK_MULTIPLIER)
    }

    /// Account one tick at `temperature`
    pub fn update(&mut self, temperature: f32, mode_multiplier: u64) -> Option<ScoreChange> {
        match TempZone::classify(temperature) {
            TempZone::Safe => {
                self.in_critical = false;
                self.window_ticks += 1;
                if self.window_ticks < TICKS_PER_SECOND {
                    return None;
                }
                self.window_ticks = 0;
                let award = POINTS_PER_SECOND * self.streak_multiplier() * mode_multiplier;
                self.streak_secs += 1;
                self.best_streak_secs = self.best_streak_secs.max(self.streak_secs);
                self.points += award;
                Some(ScoreChange::Awarded(award))
            }
            TempZone::Warning => {
                self.in_critical = false;
                self.break_streak();
                None
            }
            TempZone::Critical => {
                self.break_streak();
                if self.in_critical {
                    return None;
                }
                self.in_critical = true;
                let lost = self.points.min(CRITICAL_PENALTY);
                self.points -= lost;
                Some(ScoreChange::Penalized(lost))
            }
        }
    }

    fn break_streak(&mut self) {
        self.window_ticks = 0;
        self.streak_secs = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zones() {
        assert_eq!(TempZone::classify(0.5), TempZone::Safe);
        assert_eq!(TempZone::classify(SAFE_MIN), TempZone::Safe);
        assert_eq!(TempZone::classify(0.2), TempZone::Warning);
        assert_eq!(TempZone::classify(0.75), TempZone::Warning);
        assert_eq!(TempZone::classify(0.0), TempZone::Critical);
        assert_eq!(TempZone::classify(0.95), TempZone::Critical);
    }

    #[test]
    fn test_award_after_full_second() {
        let mut score = Score::default();
        for _ in 0..TICKS_PER_SECOND - 1 {
            assert_eq!(score.update(0.5, 1), None);
        }
        assert_eq!(score.update(0.5, 1), Some(ScoreChange::Awarded(POINTS_PER_SECOND)));
        assert_eq!(score.points, POINTS_PER_SECOND);
        assert_eq!(score.streak_secs, 1);
    }

    #[test]
    fn test_leaving_window_resets_partial_second() {
        let mut score = Score::default();
        for _ in 0..TICKS_PER_SECOND - 1 {
            score.update(0.5, 1);
        }
        score.update(0.8, 1);
        for _ in 0..TICKS_PER_SECOND - 1 {
            assert_eq!(score.update(0.5, 1), None);
        }
        assert_eq!(score.points, 0);
    }

    #[test]
    fn test_streak_multiplier_grows_and_caps() {
        let mut score = Score::default();
        for _ in 0..(60 * TICKS_PER_SECOND) {
            score.update(0.5, 1);
        }
        assert_eq!(score.streak_multiplier(), MAX_STREAK_MULTIPLIER);
        assert_eq!(score.best_streak_secs, 60);

        score.update(0.2, 1);
        assert_eq!(score.streak_multiplier(), 1);
        assert_eq!(score.best_streak_secs, 60);
    }

    #[test]
    fn test_mode_multiplier_doubles() {
        let mut score = Score::default();
        let mut last = None;
        for _ in 0..TICKS_PER_SECOND {
            last = score.update(0.5, 2);
        }
        assert_eq!(last, Some(ScoreChange::Awarded(2 * POINTS_PER_SECOND)));
    }

    #[test]
    fn test_critical_penalty_once_per_visit() {
        let mut score = Score {
            points: 100,
            ..Default::default()
        };
        assert_eq!(score.update(0.95, 1), Some(ScoreChange::Penalized(CRITICAL_PENALTY)));
        assert_eq!(score.update(0.97, 1), None);
        assert_eq!(score.points, 100 - CRITICAL_PENALTY);

        score.update(0.8, 1);
        assert_eq!(score.update(0.05, 1), Some(ScoreChange::Penalized(CRITICAL_PENALTY)));
    }

    #[test]
    fn test_penalty_saturates() {
        let mut score = Score {
            points: 10,
            ..Default::default()
        };
        assert_eq!(score.update(1.0, 1), Some(ScoreChange::Penalized(10)));
        assert_eq!(score.points, 0);
    }
}
