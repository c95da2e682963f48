//! Reactor Core - keep a toy reactor in the green with a single knob
//!
//! Core modules:
//! - `sim`: Deterministic simulation (knob, rods, temperature, event modes, score)
//! - `scene`: Named scene-node layout and node transforms
//! - `renderer`: WebGPU rendering pipeline
//! - `haptics`: Detent feedback (vibration / click)
//! - `hud`: Label text
//! - `settings`: Session settings from the query string
//! - `frame`: Fixed-step frame pacing

pub mod frame;
pub mod haptics;
pub mod hud;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;

pub use scene::{SceneError, SceneLayout, SceneNodes};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (the scene runs its update at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks per simulated second
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Design resolution of the scene (portrait)
    pub const DESIGN_WIDTH: f32 = 1080.0;
    pub const DESIGN_HEIGHT: f32 = 1920.0;

    /// Knob
    pub const KNOB_TOUCH_RADIUS: f32 = 350.0;
    /// Fraction of finger rotation applied to the knob
    pub const KNOB_ROTATION_SPEED: f32 = 0.4;
    /// Knob rotation between haptic detents (radians)
    pub const HAPTIC_TICK_STEP: f32 = 0.4;

    /// Rods
    pub const ROD_COUNT: usize = 3;
    pub const ROD_MIN_Y: f32 = -100.0;
    pub const ROD_MAX_Y: f32 = 150.0;
    pub const ROD_MOVE_SPEED: f32 = 0.05;
    /// Target change per radian of finger rotation
    pub const ROD_COMMAND_SCALE: f32 = 0.08;

    /// Reactor
    pub const INITIAL_TEMPERATURE: f32 = 0.5;
    pub const NEEDLE_SMOOTH: f32 = 0.5;
    /// Needle sweeps ±120°
    pub const NEEDLE_RANGE: f32 = 2.0 * std::f32::consts::PI / 3.0;
    /// Frequency of the slow sinusoidal temperature drift (rad/s)
    pub const DRIFT_FREQUENCY: f32 = 0.1;
}

/// Wrap an angle into [-π, π]
#[inline]
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    while angle > PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

/// Signed shortest rotation from `from` to `to`
#[inline]
pub fn angle_diff(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
