//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod knob;
pub mod mode;
pub mod rods;
pub mod score;
pub mod state;
pub mod tick;

pub use knob::{Knob, KnobTurn, angle_from_center};
pub use mode::{EventMode, ModeParams, ModeTimer};
pub use rods::{Rod, RodBank};
pub use score::{Score, ScoreChange, TempZone};
pub use state::{GameEvent, ReactorState, Snapshot};
pub use tick::{TickInput, needle_target, tick};
