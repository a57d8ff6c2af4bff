use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(self) -> bool {
        !matches!(self, Phase::Work)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Focus Time",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

pub const DEFAULT_WORK_MIN: u32 = 25;
pub const DEFAULT_SHORT_BREAK_MIN: u32 = 5;
pub const DEFAULT_LONG_BREAK_MIN: u32 = 15;
pub const DEFAULT_LONG_BREAK_INTERVAL: u32 = 4;

pub const MAX_WORK_MIN: u32 = 60;
pub const MAX_SHORT_BREAK_MIN: u32 = 30;
pub const MAX_LONG_BREAK_MIN: u32 = 60;
pub const MAX_LONG_BREAK_INTERVAL: u32 = 12;

/// Pomodoro durations in minutes.
///
/// Values are sanitized on every path into the engine: zero falls back to
/// the field default and anything above the field maximum is clamped, so a
/// countdown can never be empty or unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    #[serde(default = "default_work")]
    pub work_duration: u32,
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    #[serde(default = "default_long_break")]
    pub long_break: u32,
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
}

fn default_work() -> u32 {
    DEFAULT_WORK_MIN
}
fn default_short_break() -> u32 {
    DEFAULT_SHORT_BREAK_MIN
}
fn default_long_break() -> u32 {
    DEFAULT_LONG_BREAK_MIN
}
fn default_long_break_interval() -> u32 {
    DEFAULT_LONG_BREAK_INTERVAL
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_duration: DEFAULT_WORK_MIN,
            short_break: DEFAULT_SHORT_BREAK_MIN,
            long_break: DEFAULT_LONG_BREAK_MIN,
            long_break_interval: DEFAULT_LONG_BREAK_INTERVAL,
        }
    }
}

fn sanitize(value: u32, default: u32, max: u32) -> u32 {
    if value == 0 {
        default
    } else {
        value.min(max)
    }
}

impl PomodoroSettings {
    /// Return a copy with every field forced into its valid range.
    pub fn sanitized(self) -> Self {
        Self {
            work_duration: sanitize(self.work_duration, DEFAULT_WORK_MIN, MAX_WORK_MIN),
            short_break: sanitize(self.short_break, DEFAULT_SHORT_BREAK_MIN, MAX_SHORT_BREAK_MIN),
            long_break: sanitize(self.long_break, DEFAULT_LONG_BREAK_MIN, MAX_LONG_BREAK_MIN),
            long_break_interval: sanitize(
                self.long_break_interval,
                DEFAULT_LONG_BREAK_INTERVAL,
                MAX_LONG_BREAK_INTERVAL,
            ),
        }
    }

    /// Configured duration of `phase` in minutes.
    pub fn duration_min(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_duration,
            Phase::ShortBreak => self.short_break,
            Phase::LongBreak => self.long_break,
        }
    }

    /// Configured duration of `phase` in seconds.
    pub fn duration_secs(&self, phase: Phase) -> u64 {
        u64::from(self.duration_min(phase)).saturating_mul(60)
    }

    /// Merge a partial update, then sanitize.
    pub fn apply(self, patch: SettingsPatch) -> Self {
        Self {
            work_duration: patch.work_duration.unwrap_or(self.work_duration),
            short_break: patch.short_break.unwrap_or(self.short_break),
            long_break: patch.long_break.unwrap_or(self.long_break),
            long_break_interval: patch
                .long_break_interval
                .unwrap_or(self.long_break_interval),
        }
        .sanitized()
    }
}

/// Partial settings update. `None` leaves the field untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub work_duration: Option<u32>,
    pub short_break: Option<u32>,
    pub long_break: Option<u32>,
    pub long_break_interval: Option<u32>,
}

impl SettingsPatch {
    /// Build a single-field patch from text input.
    ///
    /// Field names accept both the snake_case and camelCase spelling.
    /// Non-numeric text becomes `0`, which sanitizes to the field default.
    pub fn parse_field(field: &str, value: &str) -> Result<Self, ValidationError> {
        let minutes = value.trim().parse::<u32>().unwrap_or(0);
        let mut patch = Self::default();
        match field {
            "work_duration" | "workDuration" | "work" => patch.work_duration = Some(minutes),
            "short_break" | "shortBreak" => patch.short_break = Some(minutes),
            "long_break" | "longBreak" => patch.long_break = Some(minutes),
            "long_break_interval" | "longBreakInterval" => {
                patch.long_break_interval = Some(minutes)
            }
            other => return Err(ValidationError::UnknownField(other.to_string())),
        }
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let s = PomodoroSettings::default();
        assert_eq!(s.work_duration, 25);
        assert_eq!(s.short_break, 5);
        assert_eq!(s.long_break, 15);
        assert_eq!(s.long_break_interval, 4);
    }

    #[test]
    fn zero_falls_back_to_default() {
        let s = PomodoroSettings {
            work_duration: 0,
            short_break: 0,
            long_break: 0,
            long_break_interval: 0,
        }
        .sanitized();
        assert_eq!(s, PomodoroSettings::default());
    }

    #[test]
    fn oversized_values_are_clamped() {
        let s = PomodoroSettings {
            work_duration: 500,
            short_break: 45,
            long_break: 90,
            long_break_interval: 99,
        }
        .sanitized();
        assert_eq!(s.work_duration, MAX_WORK_MIN);
        assert_eq!(s.short_break, MAX_SHORT_BREAK_MIN);
        assert_eq!(s.long_break, MAX_LONG_BREAK_MIN);
        assert_eq!(s.long_break_interval, MAX_LONG_BREAK_INTERVAL);
    }

    #[test]
    fn parse_field_non_numeric_uses_default() {
        let patch = SettingsPatch::parse_field("workDuration", "abc").unwrap();
        let s = PomodoroSettings {
            work_duration: 40,
            ..PomodoroSettings::default()
        }
        .apply(patch);
        assert_eq!(s.work_duration, DEFAULT_WORK_MIN);
    }

    #[test]
    fn parse_field_rejects_unknown_name() {
        assert_eq!(
            SettingsPatch::parse_field("coffee_break", "10"),
            Err(ValidationError::UnknownField("coffee_break".into()))
        );
    }

    #[test]
    fn duration_secs_per_phase() {
        let s = PomodoroSettings::default();
        assert_eq!(s.duration_secs(Phase::Work), 1500);
        assert_eq!(s.duration_secs(Phase::ShortBreak), 300);
        assert_eq!(s.duration_secs(Phase::LongBreak), 900);
    }
}
