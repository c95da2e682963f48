//! Session settings
//!
//! Read from the page query string (`?seed=42&feedback=vibrate&fps=1`) or the
//! first command-line argument natively. Nothing is stored between sessions.

use serde::{Deserialize, Serialize};

/// How detents are felt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FeedbackLevel {
    Off,
    /// Vibration only
    Vibrate,
    /// Vibration and an audible click
    #[default]
    Full,
}

impl FeedbackLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackLevel::Off => "Off",
            FeedbackLevel::Vibrate => "Vibrate",
            FeedbackLevel::Full => "Full",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Some(FeedbackLevel::Off),
            "vibrate" | "haptic" => Some(FeedbackLevel::Vibrate),
            "full" | "on" => Some(FeedbackLevel::Full),
            _ => None,
        }
    }

    pub fn vibrate(&self) -> bool {
        *self != FeedbackLevel::Off
    }

    pub fn click(&self) -> bool {
        *self == FeedbackLevel::Full
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Fixed run seed (random when absent)
    pub seed: Option<u64>,
    pub feedback: FeedbackLevel,
    /// Show FPS counter
    pub show_fps: bool,
    /// Frames to simulate in the native headless runner
    pub frames: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            feedback: FeedbackLevel::Full,
            show_fps: false,
            frames: 60 * 60,
        }
    }
}

impl Settings {
    /// Parse `key=value` pairs separated by `&`. Unknown keys and bad values
    /// are logged and skipped.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let applied = match key {
                "seed" => value.parse().ok().map(|seed| settings.seed = Some(seed)),
                "feedback" => FeedbackLevel::from_str(value).map(|f| settings.feedback = f),
                "fps" => parse_flag(value).map(|on| settings.show_fps = on),
                "frames" => value.parse().ok().map(|n| settings.frames = n),
                _ => None,
            };
            if applied.is_none() {
                log::warn!("Ignoring setting {:?}", pair);
            }
        }

        settings
    }

    /// Seed for this run: the fixed one, or `fallback` (typically the clock)
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "" | "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_default() {
        assert_eq!(Settings::from_query(""), Settings::default());
        assert_eq!(Settings::from_query("?"), Settings::default());
    }

    #[test]
    fn test_full_query() {
        let s = Settings::from_query("?seed=42&feedback=vibrate&fps&frames=120");
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.feedback, FeedbackLevel::Vibrate);
        assert!(s.show_fps);
        assert_eq!(s.frames, 120);
        assert_eq!(s.seed_or(7), 42);
    }

    #[test]
    fn test_bad_values_skipped() {
        let s = Settings::from_query("seed=abc&feedback=loud&fps=maybe&color=red");
        assert_eq!(s, Settings::default());
        assert_eq!(s.seed_or(7), 7);
    }

    #[test]
    fn test_feedback_levels() {
        assert!(!FeedbackLevel::Off.vibrate());
        assert!(FeedbackLevel::Vibrate.vibrate() && !FeedbackLevel::Vibrate.click());
        assert!(FeedbackLevel::Full.click());
        assert_eq!(FeedbackLevel::from_str("NONE"), Some(FeedbackLevel::Off));
        assert_eq!(FeedbackLevel::Full.as_str(), "Full");
    }
}
