use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Low,
    Tough,
}

impl Mood {
    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Great => "😄",
            Mood::Good => "😊",
            Mood::Okay => "😐",
            Mood::Low => "😔",
            Mood::Tough => "😞",
        }
    }
}

impl std::str::FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "great" => Ok(Mood::Great),
            "good" => Ok(Mood::Good),
            "okay" => Ok(Mood::Okay),
            "low" => Ok(Mood::Low),
            "tough" => Ok(Mood::Tough),
            other => Err(ValidationError::InvalidValue {
                field: "mood".into(),
                message: format!("'{other}' is not one of great, good, okay, low, tough"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodSlot {
    Morning,
    Evening,
}

impl std::str::FromStr for MoodSlot {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(MoodSlot::Morning),
            "evening" => Ok(MoodSlot::Evening),
            other => Err(ValidationError::InvalidValue {
                field: "slot".into(),
                message: format!("'{other}' is not one of morning, evening"),
            }),
        }
    }
}

/// Morning/evening check-in for a single day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMood {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning: Option<Mood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evening: Option<Mood>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl DailyMood {
    /// Record `mood` for `slot` on `today`. A check-in left over from an
    /// earlier day is cleared first.
    pub fn set(&mut self, slot: MoodSlot, mood: Mood, today: NaiveDate) {
        if self.date != Some(today) {
            *self = DailyMood {
                date: Some(today),
                ..DailyMood::default()
            };
        }
        match slot {
            MoodSlot::Morning => self.morning = Some(mood),
            MoodSlot::Evening => self.evening = Some(mood),
        }
    }

    pub fn is_for(&self, day: NaiveDate) -> bool {
        self.date == Some(day)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}
