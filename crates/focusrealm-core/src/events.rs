use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, PomodoroSettings, TimerState};

/// Every state change in the engine produces an Event.
/// The CLI prints them; the dashboard routes timer events into progression.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Breathing interval began; the countdown starts when it ends.
    BreathingStarted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero and the timer moved to the next phase.
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        session_count: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        phase: Phase,
        remaining_secs: u64,
        total_secs: u64,
        session_count: u32,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task_id: String,
        xp_awarded: u64,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        task_id: String,
        at: DateTime<Utc>,
    },
    XpAwarded {
        amount: u64,
        total_xp: u64,
        at: DateTime<Utc>,
    },
    LevelUp {
        level: u64,
        at: DateTime<Utc>,
    },
    ChapterUnlocked {
        chapter_id: u32,
        title: String,
        at: DateTime<Utc>,
    },
    ChallengeCompleted {
        challenge_id: String,
        xp_reward: u64,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: PomodoroSettings,
        at: DateTime<Utc>,
    },
}
