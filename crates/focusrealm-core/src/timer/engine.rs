//! Session timer implementation.
//!
//! The session timer is a tick-driven state machine. It owns no thread and
//! reads no clock: the caller feeds it one `tick()` per elapsed second,
//! usually through a [`super::TimerDriver`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Preparing -> Running -> (Paused | Idle on phase completion)
//! ```
//!
//! Phases loop `Work -> ShortBreak -> Work ... -> LongBreak -> Work` with a
//! long break after every `long_break_interval` completed work phases.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = SessionTimer::new(settings, TimerOptions::default());
//! timer.start();
//! // Once per second:
//! timer.tick(); // Returns Some(Event::PhaseCompleted) on transition
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::phase::{Phase, PomodoroSettings};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    /// Breathing interval before the countdown begins.
    Preparing,
    Running,
    Paused,
}

/// Behavioral switches that are not part of the persisted settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerOptions {
    /// Once the countdown is running it cannot be paused.
    #[serde(default)]
    pub strict_mode: bool,
    /// Length of the breathing interval; `0` starts counting immediately.
    #[serde(default = "default_prep_delay")]
    pub prep_delay_secs: u64,
    /// Keep running into the next phase instead of stopping.
    #[serde(default)]
    pub auto_advance: bool,
}

pub const DEFAULT_PREP_DELAY_SECS: u64 = 3;

fn default_prep_delay() -> u64 {
    DEFAULT_PREP_DELAY_SECS
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            strict_mode: false,
            prep_delay_secs: DEFAULT_PREP_DELAY_SECS,
            auto_advance: false,
        }
    }
}

/// Identifies the timer generation a scheduled tick was issued under.
///
/// Every start, pause and reset bumps the generation, so a tick scheduled
/// before one of those is recognized as stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickToken {
    generation: u64,
}

/// Pomodoro session timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTimer {
    settings: PomodoroSettings,
    #[serde(default)]
    options: TimerOptions,
    phase: Phase,
    remaining_secs: u64,
    session_count: u32,
    state: TimerState,
    #[serde(default)]
    prep_remaining_secs: u64,
    #[serde(default)]
    generation: u64,
}

impl SessionTimer {
    /// Create an idle timer at the start of a work phase.
    pub fn new(settings: PomodoroSettings, options: TimerOptions) -> Self {
        let settings = settings.sanitized();
        Self {
            remaining_secs: settings.duration_secs(Phase::Work),
            settings,
            options,
            phase: Phase::Work,
            session_count: 0,
            state: TimerState::Idle,
            prep_remaining_secs: 0,
            generation: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    pub fn prep_remaining_secs(&self) -> u64 {
        self.prep_remaining_secs
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    pub fn options(&self) -> &TimerOptions {
        &self.options
    }

    /// Token for ticks scheduled against the current generation.
    pub fn token(&self) -> TickToken {
        TickToken {
            generation: self.generation,
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.settings.duration_secs(self.phase)
    }

    /// 0.0 .. 100.0 progress within the current phase.
    pub fn progress_pct(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining_secs);
        (elapsed as f64 / total as f64 * 100.0).min(100.0)
    }

    /// Remaining time as `MM:SS`.
    pub fn format_remaining(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            session_count: self.session_count,
            progress_pct: self.progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle | TimerState::Paused => {
                self.generation += 1;
                if self.options.prep_delay_secs == 0 {
                    Some(self.begin_countdown())
                } else {
                    self.state = TimerState::Preparing;
                    self.prep_remaining_secs = self.options.prep_delay_secs;
                    debug!(secs = self.prep_remaining_secs, "breathing interval started");
                    Some(Event::BreathingStarted {
                        duration_secs: self.prep_remaining_secs,
                        at: Utc::now(),
                    })
                }
            }
            TimerState::Preparing | TimerState::Running => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running if self.options.strict_mode => {
                debug!("pause refused: strict mode");
                None
            }
            TimerState::Running => {
                self.generation += 1;
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Preparing => {
                // Cancel the breathing interval without touching the countdown.
                self.generation += 1;
                self.prep_remaining_secs = 0;
                self.state = if self.remaining_secs == self.total_secs() {
                    TimerState::Idle
                } else {
                    TimerState::Paused
                };
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Idle | TimerState::Paused => None,
        }
    }

    /// Single start/pause control.
    pub fn toggle(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running | TimerState::Preparing => self.pause(),
            TimerState::Idle | TimerState::Paused => self.start(),
        }
    }

    /// Stop and rewind the current phase. Phase and session count are kept.
    pub fn reset(&mut self) -> Option<Event> {
        self.generation += 1;
        self.state = TimerState::Idle;
        self.prep_remaining_secs = 0;
        self.remaining_secs = self.total_secs();
        Some(Event::TimerReset {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Advance by one second. Returns `Some(Event::PhaseCompleted)` on
    /// transition, `Some(Event::TimerStarted)` when the breathing interval
    /// ends.
    pub fn tick(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Preparing => {
                self.prep_remaining_secs = self.prep_remaining_secs.saturating_sub(1);
                if self.prep_remaining_secs == 0 {
                    return Some(self.begin_countdown());
                }
                None
            }
            TimerState::Running => {
                self.remaining_secs = self.remaining_secs.saturating_sub(1);
                if self.remaining_secs == 0 {
                    return Some(self.advance());
                }
                None
            }
            TimerState::Idle | TimerState::Paused => None,
        }
    }

    /// Tick on behalf of a scheduled callback. Stale tokens are ignored.
    pub fn tick_with(&mut self, token: TickToken) -> Option<Event> {
        if token != self.token() {
            debug!(
                stale = token.generation,
                current = self.generation,
                "stale tick ignored"
            );
            return None;
        }
        self.tick()
    }

    /// Replace the durations. An untouched idle countdown picks up the new
    /// duration immediately; anything in progress keeps its remaining time.
    pub fn set_settings(&mut self, settings: PomodoroSettings) {
        let untouched =
            self.state == TimerState::Idle && self.remaining_secs == self.total_secs();
        self.settings = settings.sanitized();
        if untouched {
            self.remaining_secs = self.total_secs();
        }
    }

    pub fn set_options(&mut self, options: TimerOptions) {
        self.options = options;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_countdown(&mut self) -> Event {
        self.state = TimerState::Running;
        self.prep_remaining_secs = 0;
        Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    fn advance(&mut self) -> Event {
        let completed = self.phase;
        let next = match completed {
            Phase::Work => {
                self.session_count += 1;
                let interval = self.settings.long_break_interval.max(1);
                if self.session_count % interval == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };
        self.phase = next;
        self.remaining_secs = self.settings.duration_secs(next);
        if !self.options.auto_advance {
            self.generation += 1;
            self.state = TimerState::Idle;
        }
        info!(
            completed = ?completed,
            next = ?next,
            session_count = self.session_count,
            "phase completed"
        );
        Event::PhaseCompleted {
            completed,
            next,
            session_count: self.session_count,
            at: Utc::now(),
        }
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new(PomodoroSettings::default(), TimerOptions::default())
    }
}
