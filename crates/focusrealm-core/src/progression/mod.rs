//! Progression store: XP, tasks, story chapters, the weekly challenge and
//! the small personal fields that travel with them.
//!
//! The store is the single source of truth for everything that survives a
//! restart. Every mutation goes through a method here; derived values such
//! as the level or the task ranking are computed on demand and never
//! cached.
//!
//! Mutating methods return the [`Event`]s they produced so the caller can
//! report them.

mod challenge;
mod mood;
mod rewards;
mod story;
mod task;

pub use challenge::{week_key, WeeklyChallenge};
pub use mood::{DailyMood, Mood, MoodSlot, Theme};
pub use rewards::{
    level_for, level_progress_pct, xp_into_level, xp_to_next_level, MotivationTier, RewardGame,
    XP_PER_LEVEL,
};
pub use story::{default_chapters, NextUnlock, StoryChapter};
pub use task::{
    rank_tasks, Difficulty, NewTask, Priority, Task, DEFAULT_ESTIMATED_MIN, MAX_ESTIMATED_MIN,
};

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::events::Event;
use crate::timer::{PomodoroSettings, SettingsPatch};

/// XP granted for each completed focus session.
pub const PHASE_XP: u64 = 25;
/// XP granted once per completed task for reviewing it.
pub const REVIEW_BONUS_XP: u64 = 15;
pub const DEFAULT_PET_SKIN: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressionStore {
    xp: u64,
    streak: u32,
    total_pomodoros: u32,
    total_tasks: u32,
    tasks: Vec<Task>,
    story_chapters: Vec<StoryChapter>,
    current_chapter: u32,
    weekly_challenge: WeeklyChallenge,
    pomodoro_settings: PomodoroSettings,
    theme: Theme,
    pet_skin: String,
    unlocked_skins: Vec<String>,
    daily_mood: DailyMood,
    gratitude_entry: String,
    reviewed_tasks: Vec<String>,
}

impl Default for ProgressionStore {
    fn default() -> Self {
        Self {
            xp: 0,
            streak: 0,
            total_pomodoros: 0,
            total_tasks: 0,
            tasks: Vec::new(),
            story_chapters: default_chapters(),
            current_chapter: 1,
            weekly_challenge: WeeklyChallenge::default(),
            pomodoro_settings: PomodoroSettings::default(),
            theme: Theme::default(),
            pet_skin: DEFAULT_PET_SKIN.to_string(),
            unlocked_skins: vec![DEFAULT_PET_SKIN.to_string()],
            daily_mood: DailyMood::default(),
            gratitude_entry: String::new(),
            reviewed_tasks: Vec::new(),
        }
    }
}

/// Serialized form: the store plus its derived level for readers of the
/// raw record. The level is ignored when loading.
#[derive(Serialize)]
struct PersistedState<'a> {
    #[serde(flatten)]
    state: &'a ProgressionStore,
    level: u64,
}

/// Read-only summary for display.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub xp: u64,
    pub level: u64,
    pub xp_into_level: u64,
    pub xp_to_next_level: u64,
    pub level_progress_pct: f64,
    pub streak: u32,
    pub total_pomodoros: u32,
    pub total_tasks: u32,
    pub motivation: MotivationTier,
    pub motivation_message: &'static str,
    pub unlocked_chapters: usize,
    pub total_chapters: usize,
    pub next_unlock: Option<NextUnlock>,
    pub challenge_progress_pct: f64,
    pub unlocked_games: Vec<RewardGame>,
}

impl ProgressionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Serialize the full state, including the derived level.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&PersistedState {
            state: self,
            level: self.level(),
        })
    }

    /// Parse a persisted record. Missing fields take their defaults and the
    /// result is normalized so every invariant holds again.
    ///
    /// A field that cannot be read keeps its default while the rest of the
    /// record is still applied. Only text that is not a JSON object fails.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let mut store = match serde_json::from_value::<ProgressionStore>(value.clone()) {
            Ok(store) => store,
            Err(e) => {
                let serde_json::Value::Object(fields) = value else {
                    return Err(e);
                };
                Self::merge_fields(fields)
            }
        };
        store.normalize();
        Ok(store)
    }

    /// Apply each readable field of a damaged record over the defaults.
    fn merge_fields(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        let mut merged = match serde_json::to_value(Self::default()) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => return Self::default(),
        };
        for (key, value) in fields {
            // Unknown keys, including the derived `level`, are not state.
            if !merged.contains_key(&key) {
                continue;
            }
            let previous = merged.insert(key.clone(), value);
            let candidate = serde_json::Value::Object(merged.clone());
            if let Err(e) = serde_json::from_value::<Self>(candidate) {
                warn!(field = %key, error = %e, "keeping default for unreadable field");
                if let Some(previous) = previous {
                    merged.insert(key, previous);
                }
            }
        }
        serde_json::from_value(serde_json::Value::Object(merged)).unwrap_or_default()
    }

    fn normalize(&mut self) {
        if self.story_chapters.is_empty() {
            self.story_chapters = default_chapters();
        }
        story::unlock_reached(&mut self.story_chapters, self.xp);
        self.current_chapter = self.current_chapter.max(1);
        self.weekly_challenge.normalize();
        self.pomodoro_settings = self.pomodoro_settings.sanitized();
        if !self.unlocked_skins.iter().any(|s| s == DEFAULT_PET_SKIN) {
            self.unlocked_skins.insert(0, DEFAULT_PET_SKIN.to_string());
        }
        if !self.unlocked_skins.contains(&self.pet_skin) {
            self.pet_skin = DEFAULT_PET_SKIN.to_string();
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn xp(&self) -> u64 {
        self.xp
    }

    /// Always `xp / 100 + 1`.
    pub fn level(&self) -> u64 {
        level_for(self.xp)
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn total_pomodoros(&self) -> u32 {
        self.total_pomodoros
    }

    pub fn total_tasks(&self) -> u32 {
        self.total_tasks
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn completed_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.completed)
    }

    pub fn story_chapters(&self) -> &[StoryChapter] {
        &self.story_chapters
    }

    pub fn current_chapter(&self) -> u32 {
        self.current_chapter
    }

    pub fn unlocked_chapter_count(&self) -> usize {
        self.story_chapters.iter().filter(|c| c.unlocked).count()
    }

    pub fn next_unlock(&self) -> Option<NextUnlock> {
        story::next_unlock(&self.story_chapters, self.xp)
    }

    pub fn weekly_challenge(&self) -> &WeeklyChallenge {
        &self.weekly_challenge
    }

    pub fn pomodoro_settings(&self) -> &PomodoroSettings {
        &self.pomodoro_settings
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn pet_skin(&self) -> &str {
        &self.pet_skin
    }

    pub fn unlocked_skins(&self) -> &[String] {
        &self.unlocked_skins
    }

    pub fn daily_mood(&self) -> &DailyMood {
        &self.daily_mood
    }

    /// Today's check-in, if one was recorded today.
    pub fn mood_for(&self, today: NaiveDate) -> Option<&DailyMood> {
        Some(&self.daily_mood).filter(|m| m.is_for(today))
    }

    pub fn gratitude_entry(&self) -> &str {
        &self.gratitude_entry
    }

    pub fn is_reviewed(&self, task_id: &str) -> bool {
        self.reviewed_tasks.iter().any(|id| id == task_id)
    }

    /// Incomplete tasks in recommended order.
    pub fn rank_tasks(&self) -> Vec<&Task> {
        rank_tasks(&self.tasks)
    }

    pub fn summary(&self) -> ProgressSummary {
        let motivation = MotivationTier::for_xp(self.xp);
        ProgressSummary {
            xp: self.xp,
            level: self.level(),
            xp_into_level: xp_into_level(self.xp),
            xp_to_next_level: xp_to_next_level(self.xp),
            level_progress_pct: level_progress_pct(self.xp),
            streak: self.streak,
            total_pomodoros: self.total_pomodoros,
            total_tasks: self.total_tasks,
            motivation,
            motivation_message: motivation.message(),
            unlocked_chapters: self.unlocked_chapter_count(),
            total_chapters: self.story_chapters.len(),
            next_unlock: self.next_unlock(),
            challenge_progress_pct: self.weekly_challenge.progress_pct(),
            unlocked_games: RewardGame::ALL
                .into_iter()
                .filter(|g| g.is_unlocked(self.xp))
                .collect(),
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Add XP and unlock every chapter the new total reaches.
    pub fn add_xp(&mut self, amount: u64) -> Vec<Event> {
        let mut events = Vec::new();
        let level_before = self.level();
        self.xp = self.xp.saturating_add(amount);
        if amount > 0 {
            debug!(amount, total = self.xp, "xp awarded");
            events.push(Event::XpAwarded {
                amount,
                total_xp: self.xp,
                at: Utc::now(),
            });
        }
        if self.level() > level_before {
            info!(level = self.level(), "level up");
            events.push(Event::LevelUp {
                level: self.level(),
                at: Utc::now(),
            });
        }
        for chapter in story::unlock_reached(&mut self.story_chapters, self.xp) {
            info!(chapter = chapter.id, title = %chapter.title, "chapter unlocked");
            events.push(Event::ChapterUnlocked {
                chapter_id: chapter.id,
                title: chapter.title,
                at: Utc::now(),
            });
        }
        events
    }

    /// Validate and append a new task.
    pub fn add_task(&mut self, new: NewTask) -> Result<&Task, ValidationError> {
        let task = new.into_task(Uuid::new_v4().to_string())?;
        debug!(id = %task.id, title = %task.title, "task added");
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Mark a task completed and award its difficulty XP.
    ///
    /// Returns `None` when the id is unknown or the task was already
    /// completed; no XP is awarded in either case.
    pub fn complete_task(&mut self, id: &str) -> Option<Vec<Event>> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        if task.completed {
            debug!(id, "task already completed");
            return None;
        }
        task.completed = true;
        task.completed_at = Some(Utc::now());
        let reward = task.difficulty.xp_reward();
        self.total_tasks += 1;

        let mut events = vec![Event::TaskCompleted {
            task_id: id.to_string(),
            xp_awarded: reward,
            at: Utc::now(),
        }];
        events.extend(self.add_xp(reward));
        Some(events)
    }

    /// Remove a task. XP already granted for it is kept.
    pub fn delete_task(&mut self, id: &str) -> Option<Event> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        self.tasks.remove(index);
        self.reviewed_tasks.retain(|r| r != id);
        Some(Event::TaskDeleted {
            task_id: id.to_string(),
            at: Utc::now(),
        })
    }

    /// One-time bonus for reviewing a completed task.
    pub fn claim_review_bonus(&mut self, id: &str) -> Option<Vec<Event>> {
        let task = self.task(id)?;
        if !task.completed || self.is_reviewed(id) {
            return None;
        }
        self.reviewed_tasks.push(id.to_string());
        Some(self.add_xp(REVIEW_BONUS_XP))
    }

    /// Credit a completed focus session, using today's local date for the
    /// weekly rollover.
    pub fn complete_phase(&mut self) -> Vec<Event> {
        self.complete_phase_on(Local::now().date_naive())
    }

    pub fn complete_phase_on(&mut self, today: NaiveDate) -> Vec<Event> {
        self.roll_week(today);
        self.total_pomodoros += 1;
        self.streak += 1;

        let mut events = Vec::new();
        if self.weekly_challenge.record_session() {
            info!(id = %self.weekly_challenge.id, "weekly challenge completed");
            events.push(Event::ChallengeCompleted {
                challenge_id: self.weekly_challenge.id.clone(),
                xp_reward: self.weekly_challenge.xp_reward,
                at: Utc::now(),
            });
        }
        events.extend(self.add_xp(PHASE_XP));
        if let Some(reward) = self.weekly_challenge.claim_reward() {
            events.extend(self.add_xp(reward));
        }
        events
    }

    /// Start a fresh weekly challenge if `today` is in a new ISO week.
    pub fn roll_week(&mut self, today: NaiveDate) -> bool {
        let rolled = self.weekly_challenge.roll_over(today);
        if rolled {
            info!(week = ?self.weekly_challenge.week, "weekly challenge reset");
        }
        rolled
    }

    /// Mark a chapter as read. Locked or unknown chapters are ignored.
    pub fn open_chapter(&mut self, id: u32) -> bool {
        let unlocked = self
            .story_chapters
            .iter()
            .any(|c| c.id == id && c.unlocked);
        if unlocked {
            self.current_chapter = self.current_chapter.max(id);
        }
        unlocked
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) -> Event {
        self.pomodoro_settings = self.pomodoro_settings.apply(patch);
        Event::SettingsUpdated {
            settings: self.pomodoro_settings,
            at: Utc::now(),
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn set_pet_skin(&mut self, skin: &str) -> Result<(), ValidationError> {
        if !self.unlocked_skins.iter().any(|s| s == skin) {
            return Err(ValidationError::LockedSkin(skin.to_string()));
        }
        self.pet_skin = skin.to_string();
        Ok(())
    }

    pub fn update_mood(&mut self, slot: MoodSlot, mood: Mood, today: NaiveDate) {
        self.daily_mood.set(slot, mood, today);
    }

    pub fn update_gratitude(&mut self, entry: impl Into<String>) {
        self.gratitude_entry = entry.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn add(store: &mut ProgressionStore, title: &str, difficulty: Difficulty) -> String {
        store
            .add_task(NewTask::new(title).difficulty(difficulty))
            .unwrap()
            .id
            .clone()
    }

    #[test]
    fn add_xp_unlocks_and_levels() {
        let mut store = ProgressionStore::new();
        let events = store.add_xp(120);
        assert_eq!(store.level(), 2);
        assert!(events.iter().any(|e| matches!(e, Event::LevelUp { level: 2, .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::ChapterUnlocked { chapter_id: 2, .. })));
        assert_eq!(store.unlocked_chapter_count(), 2);
    }

    #[test]
    fn task_completion_awards_difficulty_xp() {
        let mut store = ProgressionStore::new();
        let easy = add(&mut store, "easy", Difficulty::Easy);
        let medium = add(&mut store, "medium", Difficulty::Medium);
        let hard = add(&mut store, "hard", Difficulty::Hard);

        store.complete_task(&easy).unwrap();
        assert_eq!(store.xp(), 10);
        store.complete_task(&medium).unwrap();
        assert_eq!(store.xp(), 30);
        store.complete_task(&hard).unwrap();
        assert_eq!(store.xp(), 60);
        assert_eq!(store.total_tasks(), 3);
    }

    #[test]
    fn completing_twice_awards_once() {
        let mut store = ProgressionStore::new();
        let id = add(&mut store, "write report", Difficulty::Hard);
        assert!(store.complete_task(&id).is_some());
        assert!(store.complete_task(&id).is_none());
        assert_eq!(store.xp(), 30);
        assert_eq!(store.total_tasks(), 1);
        assert!(store.task(&id).unwrap().completed_at.is_some());
    }

    #[test]
    fn unknown_ids_are_noops() {
        let mut store = ProgressionStore::new();
        assert!(store.complete_task("missing").is_none());
        assert!(store.delete_task("missing").is_none());
        assert_eq!(store, ProgressionStore::new());
    }

    #[test]
    fn empty_title_leaves_store_untouched() {
        let mut store = ProgressionStore::new();
        assert_eq!(
            store.add_task(NewTask::new("  ")).unwrap_err(),
            ValidationError::EmptyTitle
        );
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn delete_keeps_granted_xp() {
        let mut store = ProgressionStore::new();
        let id = add(&mut store, "a", Difficulty::Medium);
        store.complete_task(&id);
        assert!(store.delete_task(&id).is_some());
        assert!(store.tasks().is_empty());
        assert_eq!(store.xp(), 20);
    }

    #[test]
    fn complete_phase_credits_session() {
        let mut store = ProgressionStore::new();
        store.complete_phase_on(today());
        assert_eq!(store.total_pomodoros(), 1);
        assert_eq!(store.streak(), 1);
        assert_eq!(store.weekly_challenge().current, 1);
        assert_eq!(store.xp(), PHASE_XP);
    }

    #[test]
    fn challenge_reward_paid_once_on_completion() {
        let mut store = ProgressionStore::new();
        for _ in 0..9 {
            store.complete_phase_on(today());
        }
        assert_eq!(store.xp(), 9 * PHASE_XP);
        let events = store.complete_phase_on(today());
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::ChallengeCompleted { .. })));
        assert_eq!(store.xp(), 10 * PHASE_XP + 100);
        store.complete_phase_on(today());
        assert_eq!(store.xp(), 11 * PHASE_XP + 100);
        assert_eq!(store.weekly_challenge().current, 10);
    }

    #[test]
    fn new_week_resets_challenge() {
        let mut store = ProgressionStore::new();
        store.complete_phase_on(today());
        let next_week = today() + chrono::Duration::days(7);
        store.complete_phase_on(next_week);
        assert_eq!(store.weekly_challenge().current, 1);
        assert_eq!(store.total_pomodoros(), 2);
    }

    #[test]
    fn review_bonus_requires_completion_and_pays_once() {
        let mut store = ProgressionStore::new();
        let id = add(&mut store, "study", Difficulty::Easy);
        assert!(store.claim_review_bonus(&id).is_none());
        store.complete_task(&id);
        assert!(store.claim_review_bonus(&id).is_some());
        assert!(store.claim_review_bonus(&id).is_none());
        assert_eq!(store.xp(), 10 + REVIEW_BONUS_XP);
    }

    #[test]
    fn open_chapter_requires_unlock() {
        let mut store = ProgressionStore::new();
        assert!(!store.open_chapter(3));
        assert_eq!(store.current_chapter(), 1);
        store.add_xp(300);
        assert!(store.open_chapter(3));
        assert!(store.open_chapter(2));
        assert_eq!(store.current_chapter(), 3);
    }

    #[test]
    fn pet_skin_must_be_unlocked() {
        let mut store = ProgressionStore::new();
        assert!(store.set_pet_skin("dragon").is_err());
        assert!(store.set_pet_skin("default").is_ok());
        assert_eq!(store.pet_skin(), "default");
    }

    #[test]
    fn mood_only_reported_for_today() {
        let mut store = ProgressionStore::new();
        store.update_mood(MoodSlot::Morning, Mood::Great, today());
        assert!(store.mood_for(today()).is_some());
        assert!(store.mood_for(today().succ_opt().unwrap()).is_none());
    }

    #[test]
    fn json_roundtrip_carries_level() {
        let mut store = ProgressionStore::new();
        store.add_xp(250);
        let json = store.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["level"], 3);
        assert_eq!(value["xp"], 250);
        let restored = ProgressionStore::from_json(&json).unwrap();
        assert_eq!(restored, store);
    }

    #[test]
    fn partial_record_merges_over_defaults() {
        let restored =
            ProgressionStore::from_json(r#"{"xp": 120, "level": 99, "theme": "dark"}"#).unwrap();
        assert_eq!(restored.xp(), 120);
        assert_eq!(restored.level(), 2);
        assert_eq!(restored.theme(), Theme::Dark);
        assert_eq!(restored.pomodoro_settings(), &PomodoroSettings::default());
        // Chapter 2 (100 XP) must be unlocked even though the record omitted it.
        assert_eq!(restored.unlocked_chapter_count(), 2);
    }

    #[test]
    fn bad_field_keeps_the_rest_of_the_record() {
        let restored =
            ProgressionStore::from_json(r#"{"xp": 340, "streak": 12, "theme": "sepia"}"#)
                .unwrap();
        assert_eq!(restored.xp(), 340);
        assert_eq!(restored.streak(), 12);
        assert_eq!(restored.theme(), Theme::Light);
        assert_eq!(restored.unlocked_chapter_count(), 3);
    }

    #[test]
    fn several_bad_fields_each_fall_back() {
        let restored = ProgressionStore::from_json(
            r#"{
                "xp": "lots",
                "totalPomodoros": 7,
                "tasks": [{"id": 1}],
                "petSkin": "default",
                "gratitudeEntry": "sunlight",
                "level": 42
            }"#,
        )
        .unwrap();
        assert_eq!(restored.xp(), 0);
        assert_eq!(restored.total_pomodoros(), 7);
        assert!(restored.tasks().is_empty());
        assert_eq!(restored.gratitude_entry(), "sunlight");
    }

    #[test]
    fn non_object_record_is_rejected() {
        assert!(ProgressionStore::from_json("[1, 2, 3]").is_err());
        assert!(ProgressionStore::from_json("{not json").is_err());
    }

    #[test]
    fn loaded_completed_challenge_does_not_pay_again() {
        let mut store = ProgressionStore::from_json(
            r#"{
                "xp": 400,
                "weeklyChallenge": {
                    "id": "week1", "title": "Focus Master", "description": "",
                    "target": 10, "current": 10, "xpReward": 100, "completed": true,
                    "week": "2026-W42"
                }
            }"#,
        )
        .unwrap();
        let events = store.complete_phase_on(today());
        assert_eq!(store.xp(), 400 + PHASE_XP);
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::ChallengeCompleted { .. })));
    }

    #[test]
    fn settings_patch_is_sanitized() {
        let mut store = ProgressionStore::new();
        store.update_settings(SettingsPatch {
            work_duration: Some(0),
            short_break: Some(10),
            ..SettingsPatch::default()
        });
        assert_eq!(store.pomodoro_settings().work_duration, 25);
        assert_eq!(store.pomodoro_settings().short_break, 10);
    }
}
