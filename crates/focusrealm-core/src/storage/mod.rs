mod config;
pub mod database;

pub use config::{Config, LogConfig, TimerConfig};
pub use database::{Database, SessionRecord, SessionStats};

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::{ConfigError, Result};
use crate::timer::Phase;

/// Key of the serialized progression record.
pub const STATE_KEY: &str = "focus-realm-data";
/// Key of the serialized timer engine and driver.
pub const TIMER_KEY: &str = "timer_engine";

/// Returns the data directory, creating it if needed.
///
/// `FOCUSREALM_DATA_DIR` overrides the location. Otherwise this is
/// `~/.config/focusrealm[-dev]/`, with the `-dev` suffix selected by
/// `FOCUSREALM_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("FOCUSREALM_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSREALM_ENV").unwrap_or_else(|_| "production".into());
            if env == "dev" {
                base_dir.join("focusrealm-dev")
            } else {
                base_dir.join("focusrealm")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

/// Durable home for the serialized state and the session log.
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Append a completed phase to the session log.
    fn record_session(
        &self,
        phase: Phase,
        duration_min: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<()>;
}

/// Volatile store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    sessions: RefCell<Vec<(Phase, u32, DateTime<Utc>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.borrow().len()
    }

    pub fn sessions(&self) -> Vec<(Phase, u32, DateTime<Utc>)> {
        self.sessions.borrow().clone()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn record_session(
        &self,
        phase: Phase,
        duration_min: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<()> {
        self.sessions
            .borrow_mut()
            .push((phase, duration_min, completed_at));
        Ok(())
    }
}

impl StateStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.kv_get(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Ok(self.kv_set(key, value)?)
    }

    fn record_session(
        &self,
        phase: Phase,
        duration_min: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<()> {
        Database::record_session(self, phase, duration_min, completed_at)?;
        Ok(())
    }
}
