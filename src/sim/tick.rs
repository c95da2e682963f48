//! Fixed timestep simulation tick
//!
//! Order per tick: mode timer, temperature integration, needle smoothing,
//! rod drift and rod motion, then scoring.

use rand::Rng;

use super::score::ScoreChange;
use super::state::{GameEvent, ReactorState};
use crate::consts::*;

/// Frame-level commands (touches go through the `ReactorState` handlers)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause toggle
    pub pause: bool,
}

/// Needle angle for a temperature: -120° cold, +120° hot
#[inline]
pub fn needle_target(temperature: f32) -> f32 {
    NEEDLE_RANGE * (temperature * 2.0 - 1.0)
}

/// Advance the reactor by one fixed timestep
pub fn tick(state: &mut ReactorState, input: &TickInput) {
    if input.pause {
        state.paused = !state.paused;
        if state.paused {
            state.knob.release();
        }
        state.events.push(GameEvent::PauseChanged(state.paused));
    }
    if state.paused {
        return;
    }

    state.time_ticks += 1;
    let time_secs = state.time_secs();

    if let Some(mode) = state.mode.step(&mut state.rng) {
        state.events.push(GameEvent::ModeChanged(mode));
    }
    let params = state.mode.mode.params();

    // Heat follows the rods: withdrawn rods heat, inserted rods cool
    let avg = state.rods.average_position();
    let mut temperature = state.temperature;
    temperature += avg * params.heat_gen_rate;
    temperature -= (1.0 - avg) * params.cooling_rate;

    let noise = if params.noise > 0.0 {
        state.rng.random_range(-params.noise..=params.noise)
    } else {
        0.0
    };
    let drift = (time_secs * DRIFT_FREQUENCY).sin() * params.drift_rate + noise;
    state.temperature = (temperature + drift).clamp(0.0, 1.0);

    let target = needle_target(state.temperature);
    state.needle_angle += (target - state.needle_angle) * NEEDLE_SMOOTH;

    state.rods.drift(params.rod_drift, time_secs);
    state.rods.step();

    match state
        .score
        .update(state.temperature, params.score_multiplier)
    {
        Some(ScoreChange::Awarded(points)) => state.events.push(GameEvent::ScoreAwarded(points)),
        Some(ScoreChange::Penalized(lost)) => {
            log::warn!("Critical temperature {:.3}", state.temperature);
            state.events.push(GameEvent::CriticalTemperature {
                temperature: state.temperature,
                lost,
            });
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::mode::EventMode;
    use glam::Vec2;
    use std::f32::consts::FRAC_PI_2;

    fn run(state: &mut ReactorState, ticks: u32) {
        let input = TickInput::default();
        for _ in 0..ticks {
            tick(state, &input);
        }
    }

    #[test]
    fn test_inserted_rods_cool_reactor() {
        let mut state = ReactorState::new(12345, Vec2::ZERO);
        run(&mut state, 10 * TICKS_PER_SECOND);
        // Rods start fully down: net cooling dominates drift
        assert!(state.temperature < INITIAL_TEMPERATURE);
    }

    #[test]
    fn test_withdrawn_rods_heat_reactor() {
        let mut state = ReactorState::new(12345, Vec2::ZERO);
        for rod in &mut state.rods.rods {
            rod.commanded = 1.0;
            rod.position = 1.0;
        }
        run(&mut state, 5 * TICKS_PER_SECOND);
        assert!(state.temperature > INITIAL_TEMPERATURE);
    }

    #[test]
    fn test_needle_tracks_temperature() {
        let mut state = ReactorState::new(9, Vec2::ZERO);
        run(&mut state, 20 * TICKS_PER_SECOND);
        // Smoothing factor 0.5 converges within a few ticks
        assert!((state.needle_angle - needle_target(state.temperature)).abs() < 0.1);
    }

    #[test]
    fn test_needle_target_range() {
        assert!((needle_target(0.0) + NEEDLE_RANGE).abs() < 1e-6);
        assert!(needle_target(0.5).abs() < 1e-6);
        assert!((needle_target(1.0) - NEEDLE_RANGE).abs() < 1e-6);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = ReactorState::new(5, Vec2::ZERO);
        run(&mut state, 10);
        let frozen = state.snapshot();

        tick(&mut state, &TickInput { pause: true });
        assert!(state.paused);
        run(&mut state, 100);
        assert_eq!(state.snapshot(), frozen);

        tick(&mut state, &TickInput { pause: true });
        assert!(!state.paused);
        assert_eq!(state.time_ticks, 11);
        let pauses: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::PauseChanged(_)))
            .collect();
        assert_eq!(
            pauses,
            vec![GameEvent::PauseChanged(true), GameEvent::PauseChanged(false)]
        );
    }

    #[test]
    fn test_touch_during_pause_does_not_jump_knob() {
        let center = Vec2::ZERO;
        let at = |angle: f32| center + crate::polar_to_cartesian(100.0, angle);
        let mut state = ReactorState::new(5, center);

        tick(&mut state, &TickInput { pause: true });
        state.touch_began(at(FRAC_PI_2));
        assert!(!state.knob.active);
        state.touch_moved(at(FRAC_PI_2 + 2.5));

        tick(&mut state, &TickInput { pause: true });
        assert!(!state.paused);
        // Finger still down from the pause: nothing happens until a new touch
        state.touch_moved(at(FRAC_PI_2 + 2.6));
        assert_eq!(state.knob.rotation, 0.0);
        assert!(state.rods.rods.iter().all(|r| r.commanded == 0.0));

        state.touch_began(at(FRAC_PI_2 + 2.6));
        state.touch_moved(at(FRAC_PI_2 + 2.7));
        assert!((state.knob.rotation - 0.1 * KNOB_ROTATION_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_mode_changes_are_reported() {
        let mut state = ReactorState::new(77, Vec2::ZERO);
        let calm = state.mode.ticks_left;
        run(&mut state, calm);
        assert!(state.mode.mode.is_event());
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ModeChanged(m) if *m != EventMode::Normal))
        );
    }

    #[test]
    fn test_holding_safe_window_scores() {
        let mut state = ReactorState::new(3, Vec2::ZERO);
        // Balance point: avg * 0.005 == (1 - avg) * 0.004
        let balance = 0.004 / 0.009;
        for rod in &mut state.rods.rods {
            rod.commanded = balance;
            rod.position = balance;
        }
        run(&mut state, 5 * TICKS_PER_SECOND);
        assert!(state.score.points > 0);
    }

    #[test]
    fn test_determinism() {
        let center = Vec2::new(0.0, -550.0);
        let mut state1 = ReactorState::new(99999, center);
        let mut state2 = ReactorState::new(99999, center);

        for state in [&mut state1, &mut state2] {
            state.touch_began(center + crate::polar_to_cartesian(120.0, FRAC_PI_2));
            for i in 0..300u32 {
                let angle = FRAC_PI_2 - (i as f32 * 0.05).sin();
                state.touch_moved(center + crate::polar_to_cartesian(120.0, angle));
                tick(state, &TickInput::default());
            }
            state.touch_ended();
            run(state, 2000);
        }

        assert_eq!(state1.snapshot(), state2.snapshot());
        assert_eq!(state1.drain_events(), state2.drain_events());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn state_stays_bounded(
                seed in any::<u64>(),
                drags in prop::collection::vec(-3.0f32..3.0, 1..400),
            ) {
                let center = Vec2::new(0.0, -550.0);
                let mut state = ReactorState::new(seed, center);
                state.touch_began(center + crate::polar_to_cartesian(150.0, FRAC_PI_2));
                let mut angle = FRAC_PI_2;
                for delta in drags {
                    angle += delta;
                    state.touch_moved(center + crate::polar_to_cartesian(150.0, angle));
                    for _ in 0..10 {
                        tick(&mut state, &TickInput::default());
                    }

                    prop_assert!((0.0..=1.0).contains(&state.temperature));
                    prop_assert!(state.needle_angle.abs() <= NEEDLE_RANGE + 1e-4);
                    for rod in &state.rods.rods {
                        prop_assert!((0.0..=1.0).contains(&rod.position));
                        prop_assert!((0.0..=1.0).contains(&rod.target));
                        prop_assert!((0.0..=1.0).contains(&rod.commanded));
                    }
                }
            }
        }
    }
}
