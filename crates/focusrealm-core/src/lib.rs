//! # Focus Realm Core Library
//!
//! This library provides the core logic for Focus Realm, a gamified Pomodoro
//! dashboard. All operations are available through the standalone
//! `focusrealm` CLI binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Session Timer**: A tick-driven state machine; a [`TimerDriver`]
//!   converts elapsed [`Clock`] time into ticks
//! - **Progression**: XP, levels, tasks, story chapters and the weekly
//!   challenge
//! - **Storage**: SQLite-backed state record and session log, TOML-based
//!   configuration
//! - **Dashboard**: Funnels user operations through the timer and the
//!   progression store and persists the result
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: Core timer state machine
//! - [`ProgressionStore`]: Persistent progression state
//! - [`Dashboard`]: Wiring and persistence
//! - [`Database`]: State and statistics persistence
//! - [`Config`]: Application configuration management

pub mod dashboard;
pub mod error;
pub mod events;
pub mod progression;
pub mod storage;
pub mod timer;

pub use dashboard::Dashboard;
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use progression::{NewTask, ProgressionStore, Task};
pub use storage::{Config, Database, MemoryStore, StateStore};
pub use timer::{
    Clock, ManualClock, Phase, PomodoroSettings, SessionTimer, SystemClock, TimerDriver,
    TimerOptions, TimerState,
};
