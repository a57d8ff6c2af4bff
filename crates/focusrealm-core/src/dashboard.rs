//! Dashboard: the timer and the progression store behind one front door.
//!
//! Every user operation goes through a [`Dashboard`] method. The dashboard
//! applies the mutation, routes finished focus sessions into the
//! progression store, appends completed phases to the session log and
//! writes the snapshot back to its [`StateStore`].
//!
//! Saving is fire-and-forget: a failed write is logged and the in-memory
//! state stays authoritative.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::progression::{Mood, MoodSlot, NewTask, ProgressionStore, Task, Theme};
use crate::storage::{StateStore, STATE_KEY, TIMER_KEY};
use crate::timer::{Clock, Phase, SessionTimer, SettingsPatch, TimerDriver, TimerOptions};

#[derive(Serialize, Deserialize)]
struct TimerRecord {
    timer: SessionTimer,
    #[serde(default)]
    driver: TimerDriver,
}

pub struct Dashboard<S: StateStore> {
    store: S,
    progression: ProgressionStore,
    timer: SessionTimer,
    driver: TimerDriver,
}

impl<S: StateStore> Dashboard<S> {
    /// Restore the dashboard from `store`.
    ///
    /// A missing or unreadable progression record yields the defaults. The
    /// timer picks up `options` from the current configuration and the
    /// durations from the progression record.
    pub fn load(store: S, options: TimerOptions) -> Self {
        Self::load_on(store, options, Local::now().date_naive())
    }

    pub fn load_on(store: S, options: TimerOptions, today: NaiveDate) -> Self {
        let mut progression = match store.get(STATE_KEY) {
            Ok(Some(json)) => ProgressionStore::from_json(&json).unwrap_or_else(|e| {
                warn!(error = %e, "discarding unreadable progression record");
                ProgressionStore::default()
            }),
            Ok(None) => ProgressionStore::default(),
            Err(e) => {
                warn!(error = %e, "failed to read progression record");
                ProgressionStore::default()
            }
        };
        progression.roll_week(today);

        let record = match store.get(TIMER_KEY) {
            Ok(Some(json)) => serde_json::from_str::<TimerRecord>(&json)
                .map_err(|e| warn!(error = %e, "discarding unreadable timer record"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read timer record");
                None
            }
        };
        let (mut timer, driver) = match record {
            Some(record) => (record.timer, record.driver),
            None => (
                SessionTimer::new(*progression.pomodoro_settings(), options),
                TimerDriver::new(),
            ),
        };
        timer.set_options(options);
        timer.set_settings(*progression.pomodoro_settings());

        Self {
            store,
            progression,
            timer,
            driver,
        }
    }

    pub fn progression(&self) -> &ProgressionStore {
        &self.progression
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write the progression record and the timer.
    ///
    /// # Errors
    /// Returns an error if serialization or the store write fails.
    pub fn save(&self) -> Result<()> {
        self.store.set(STATE_KEY, &self.progression.to_json()?)?;
        let record = serde_json::to_string(&TimerRecord {
            timer: self.timer.clone(),
            driver: self.driver.clone(),
        })?;
        self.store.set(TIMER_KEY, &record)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!(error = %e, "failed to persist dashboard state");
        }
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let event = self.timer.start();
        self.persist();
        event
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.timer.pause();
        self.persist();
        event
    }

    pub fn toggle(&mut self) -> Option<Event> {
        let event = self.timer.toggle();
        self.persist();
        event
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.driver.clear();
        let event = self.timer.reset();
        self.persist();
        event
    }

    /// Advance the timer by `secs` seconds, ignoring the clock.
    pub fn tick(&mut self, secs: u64) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..secs {
            if let Some(event) = self.timer.tick() {
                events.push(event);
            }
        }
        self.driver.clear();
        let events = self.route(events);
        self.persist();
        events
    }

    /// Apply the time elapsed on `clock` since the last pump.
    pub fn pump<C: Clock + ?Sized>(&mut self, clock: &C) -> Vec<Event> {
        let events = self.driver.pump(&mut self.timer, clock);
        let events = self.route(events);
        self.persist();
        events
    }

    /// Credit completed phases and extend the event list with whatever the
    /// progression store emitted in response.
    fn route(&mut self, events: Vec<Event>) -> Vec<Event> {
        let mut routed = Vec::with_capacity(events.len());
        for event in events {
            let completed = match &event {
                Event::PhaseCompleted { completed, at, .. } => Some((*completed, *at)),
                _ => None,
            };
            routed.push(event);
            let Some((phase, at)) = completed else {
                continue;
            };

            let minutes = self.timer.settings().duration_min(phase);
            if let Err(e) = self.store.record_session(phase, minutes, at) {
                warn!(error = %e, phase = ?phase, "failed to record session");
            }
            if phase == Phase::Work {
                routed.extend(self.progression.complete_phase());
            } else {
                debug!(phase = ?phase, "break finished");
            }
        }
        routed
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&mut self, new: NewTask) -> Result<Task, ValidationError> {
        let task = self.progression.add_task(new)?.clone();
        self.persist();
        Ok(task)
    }

    pub fn complete_task(&mut self, id: &str) -> Option<Vec<Event>> {
        let events = self.progression.complete_task(id)?;
        self.persist();
        Some(events)
    }

    pub fn delete_task(&mut self, id: &str) -> Option<Event> {
        let event = self.progression.delete_task(id)?;
        self.persist();
        Some(event)
    }

    pub fn review_task(&mut self, id: &str) -> Option<Vec<Event>> {
        let events = self.progression.claim_review_bonus(id)?;
        self.persist();
        Some(events)
    }

    // ── Everything else ──────────────────────────────────────────────

    /// Merge a settings patch and hand the result to the timer.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Event {
        let event = self.progression.update_settings(patch);
        self.timer.set_settings(*self.progression.pomodoro_settings());
        self.persist();
        event
    }

    pub fn open_chapter(&mut self, id: u32) -> bool {
        let opened = self.progression.open_chapter(id);
        if opened {
            self.persist();
        }
        opened
    }

    pub fn set_mood(&mut self, slot: MoodSlot, mood: Mood) {
        self.progression
            .update_mood(slot, mood, Local::now().date_naive());
        self.persist();
    }

    pub fn set_gratitude(&mut self, entry: impl Into<String>) {
        self.progression.update_gratitude(entry);
        self.persist();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.progression.toggle_theme();
        self.persist();
        theme
    }

    pub fn set_pet_skin(&mut self, skin: &str) -> Result<(), ValidationError> {
        self.progression.set_pet_skin(skin)?;
        self.persist();
        Ok(())
    }
}
