//! HUD label text

use crate::sim::{EventMode, ReactorState, TempZone};

/// Everything the HUD shows, already formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudText {
    pub score: String,
    pub temperature: String,
    /// Empty in normal operation
    pub banner: String,
    pub streak: String,
    /// CSS class for the temperature readout
    pub zone_class: &'static str,
}

impl HudText {
    pub fn from_state(state: &ReactorState) -> Self {
        let mode = state.mode.mode;
        let banner = match mode {
            EventMode::Normal => String::new(),
            _ => format!("{} {}s", mode.label(), state.mode.seconds_left()),
        };
        let streak = if state.score.streak_multiplier() > 1 {
            format!("x{}", state.score.streak_multiplier())
        } else {
            String::new()
        };

        Self {
            score: state.score.points.to_string(),
            temperature: format!("{:.0}%", state.temperature * 100.0),
            banner,
            streak,
            zone_class: zone_class(TempZone::classify(state.temperature)),
        }
    }
}

fn zone_class(zone: TempZone) -> &'static str {
    match zone {
        TempZone::Safe => "safe",
        TempZone::Warning => "warning",
        TempZone::Critical => "critical",
    }
}
