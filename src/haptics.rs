//! Haptic feedback
//!
//! On the web a detent is a short vibration plus a procedurally generated
//! click (iOS browsers ignore `navigator.vibrate`). Natively it is logged.

use crate::sim::GameEvent;

/// Impact strength
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStyle {
    /// Knob detent
    Light,
    /// Mode change
    Medium,
    /// Critical temperature
    Heavy,
}

impl ImpactStyle {
    /// Vibration length in milliseconds
    pub fn vibration_ms(&self) -> u32 {
        match self {
            ImpactStyle::Light => 8,
            ImpactStyle::Medium => 20,
            ImpactStyle::Heavy => 60,
        }
    }

    /// Click pitch in Hz
    pub fn click_freq(&self) -> f32 {
        match self {
            ImpactStyle::Light => 1800.0,
            ImpactStyle::Medium => 900.0,
            ImpactStyle::Heavy => 120.0,
        }
    }

    /// Haptic response for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Detent => Some(ImpactStyle::Light),
            GameEvent::ModeChanged(_) => Some(ImpactStyle::Medium),
            GameEvent::CriticalTemperature { .. } => Some(ImpactStyle::Heavy),
            GameEvent::ScoreAwarded(_) | GameEvent::PauseChanged(_) => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::HapticFeedback;

#[cfg(not(target_arch = "wasm32"))]
pub use native::HapticFeedback;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, OscillatorType};

    use super::ImpactStyle;

    /// Vibration + click generator
    pub struct HapticFeedback {
        ctx: Option<AudioContext>,
        vibrate: bool,
        click: bool,
    }

    impl HapticFeedback {
        pub fn new(vibrate: bool, click: bool) -> Self {
            Self {
                ctx: None,
                vibrate,
                click,
            }
        }

        /// Create/resume the audio context. Must run inside a user gesture.
        pub fn prepare(&mut self) {
            if !self.click {
                return;
            }
            if self.ctx.is_none() {
                self.ctx = AudioContext::new().ok();
                if self.ctx.is_none() {
                    log::warn!("Failed to create AudioContext - detent clicks disabled");
                }
            }
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        pub fn impact(&mut self, style: ImpactStyle) {
            if self.vibrate {
                if let Some(window) = web_sys::window() {
                    let _ = window.navigator().vibrate_with_duration(style.vibration_ms());
                }
            }
            if self.click {
                self.play_click(style);
            }
        }

        fn play_click(&self, style: ImpactStyle) {
            let Some(ctx) = &self.ctx else { return };
            let Ok(osc) = ctx.create_oscillator() else { return };
            let Ok(gain) = ctx.create_gain() else { return };

            osc.set_type(OscillatorType::Square);
            osc.frequency().set_value(style.click_freq());
            if osc.connect_with_audio_node(&gain).is_err()
                || gain.connect_with_audio_node(&ctx.destination()).is_err()
            {
                return;
            }

            let t = ctx.current_time();
            let length = style.vibration_ms() as f64 / 1000.0;
            gain.gain().set_value_at_time(0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + length)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + length + 0.01).ok();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::ImpactStyle;

    /// Logs impacts (no haptic hardware natively)
    pub struct HapticFeedback {
        enabled: bool,
        impacts: u64,
    }

    impl HapticFeedback {
        pub fn new(vibrate: bool, click: bool) -> Self {
            Self {
                enabled: vibrate || click,
                impacts: 0,
            }
        }

        pub fn prepare(&mut self) {}

        pub fn impact(&mut self, style: ImpactStyle) {
            if self.enabled {
                self.impacts += 1;
                log::debug!("Haptic impact: {:?}", style);
            }
        }

        /// Impacts fired so far
        pub fn impacts(&self) -> u64 {
            self.impacts
        }
    }
}
