//! Rotary knob tracking
//!
//! The finger angle is measured around the knob centre with 0 pointing up.
//! Only a fraction of the finger rotation reaches the knob, and a haptic
//! detent fires every `HAPTIC_TICK_STEP` radians of knob rotation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::angle_diff;
use crate::consts::{HAPTIC_TICK_STEP, KNOB_ROTATION_SPEED, KNOB_TOUCH_RADIUS};

/// Angle of `point` around `center`, rotated so that straight up is 0
#[inline]
pub fn angle_from_center(center: Vec2, point: Vec2) -> f32 {
    let d = point - center;
    d.y.atan2(d.x) - std::f32::consts::FRAC_PI_2
}

/// Result of a finger drag on the knob
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobTurn {
    /// Wrapped finger rotation since the previous move (radians, CCW positive)
    pub finger_delta: f32,
    /// A haptic detent was crossed
    pub detent: bool,
}

/// Knob state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Knob {
    /// Accumulated knob rotation (unbounded)
    pub rotation: f32,
    /// Finger angle at the previous touch event
    last_touch_angle: f32,
    /// Knob rotation at the last detent
    last_tick_angle: f32,
    /// A finger is currently holding the knob
    pub active: bool,
}

impl Knob {
    pub fn new(rotation: f32) -> Self {
        Self {
            rotation,
            last_touch_angle: 0.0,
            last_tick_angle: rotation,
            active: false,
        }
    }

    /// Finger down. The touch angle is always recorded; the knob only grabs
    /// the touch inside its radius.
    pub fn touch_began(&mut self, center: Vec2, point: Vec2) {
        self.last_touch_angle = angle_from_center(center, point);
        if point.distance(center) <= KNOB_TOUCH_RADIUS {
            self.active = true;
        }
    }

    /// Finger drag. Returns `None` when the knob is not held.
    pub fn touch_moved(&mut self, center: Vec2, point: Vec2) -> Option<KnobTurn> {
        if !self.active {
            return None;
        }

        let angle = angle_from_center(center, point);
        let finger_delta = angle_diff(self.last_touch_angle, angle);
        self.rotation += finger_delta * KNOB_ROTATION_SPEED;
        self.last_touch_angle = angle;

        let detent = self.check_detent();
        Some(KnobTurn {
            finger_delta,
            detent,
        })
    }

    /// Finger up or cancelled
    pub fn release(&mut self) {
        self.active = false;
    }

    fn check_detent(&mut self) -> bool {
        let delta = angle_diff(self.last_tick_angle, self.rotation);
        if delta.abs() >= HAPTIC_TICK_STEP {
            self.last_tick_angle = self.rotation;
            true
        } else {
            false
        }
    }
}
