use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Bounded weekly counter with a one-time XP reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyChallenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target: u32,
    #[serde(default)]
    pub current: u32,
    pub xp_reward: u64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub reward_claimed: bool,
    /// ISO week this progress belongs to, e.g. `2026-W42`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<String>,
}

impl Default for WeeklyChallenge {
    fn default() -> Self {
        Self {
            id: "week1".into(),
            title: "Focus Master".into(),
            description: "Complete 10 Pomodoro sessions this week".into(),
            target: 10,
            current: 0,
            xp_reward: 100,
            completed: false,
            reward_claimed: false,
            week: None,
        }
    }
}

pub fn week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

impl WeeklyChallenge {
    /// Count one focus session. Returns `true` when this call completed
    /// the challenge.
    pub fn record_session(&mut self) -> bool {
        let was_completed = self.completed;
        self.current = self.current.saturating_add(1).min(self.target);
        self.completed = self.current >= self.target;
        self.completed && !was_completed
    }

    /// Hand out the reward once per completed challenge.
    pub fn claim_reward(&mut self) -> Option<u64> {
        if self.completed && !self.reward_claimed {
            self.reward_claimed = true;
            Some(self.xp_reward)
        } else {
            None
        }
    }

    /// Reset progress when `today` falls in a later week than the stored
    /// one. Returns `true` if progress was reset.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        let key = week_key(today);
        match self.week.as_deref() {
            Some(week) if week == key => false,
            None => {
                self.week = Some(key);
                false
            }
            Some(_) => {
                self.current = 0;
                self.completed = false;
                self.reward_claimed = false;
                self.week = Some(key);
                true
            }
        }
    }

    /// 0.0 .. 100.0
    pub fn progress_pct(&self) -> f64 {
        if self.target == 0 {
            return 100.0;
        }
        (f64::from(self.current) / f64::from(self.target) * 100.0).min(100.0)
    }

    /// Repair values a hand-edited or older record may carry.
    ///
    /// A challenge that is already complete when loaded has paid out its
    /// reward; the reward is only handed out in the session that completes it.
    pub(crate) fn normalize(&mut self) {
        self.target = self.target.max(1);
        self.current = self.current.min(self.target);
        self.completed = self.current >= self.target;
        self.reward_claimed = self.completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn completes_exactly_at_target() {
        let mut c = WeeklyChallenge {
            target: 3,
            ..WeeklyChallenge::default()
        };
        assert!(!c.record_session());
        assert!(!c.record_session());
        assert!(!c.completed);
        assert!(c.record_session());
        assert!(c.completed);
        assert_eq!(c.current, 3);
        assert!(!c.record_session());
        assert_eq!(c.current, 3);
    }

    #[test]
    fn reward_is_claimed_once() {
        let mut c = WeeklyChallenge {
            target: 1,
            ..WeeklyChallenge::default()
        };
        assert_eq!(c.claim_reward(), None);
        c.record_session();
        assert_eq!(c.claim_reward(), Some(100));
        assert_eq!(c.claim_reward(), None);
    }

    #[test]
    fn week_key_format() {
        assert_eq!(week_key(date(2026, 10, 16)), "2026-W42");
        // ISO year differs from calendar year at the boundary.
        assert_eq!(week_key(date(2027, 1, 1)), "2026-W53");
    }

    #[test]
    fn roll_over_resets_only_on_new_week() {
        let mut c = WeeklyChallenge::default();
        assert!(!c.roll_over(date(2026, 10, 12)));
        c.record_session();
        assert!(!c.roll_over(date(2026, 10, 18)));
        assert_eq!(c.current, 1);
        assert!(c.roll_over(date(2026, 10, 19)));
        assert_eq!(c.current, 0);
        assert_eq!(c.week.as_deref(), Some("2026-W43"));
    }

    #[test]
    fn normalize_clamps_corrupt_values() {
        let mut c = WeeklyChallenge {
            target: 0,
            current: 50,
            ..WeeklyChallenge::default()
        };
        c.normalize();
        assert_eq!(c.target, 1);
        assert_eq!(c.current, 1);
        assert!(c.completed);
    }

    #[test]
    fn normalize_marks_loaded_completion_as_paid() {
        let mut c = WeeklyChallenge {
            current: 10,
            completed: true,
            reward_claimed: false,
            ..WeeklyChallenge::default()
        };
        c.normalize();
        assert!(c.reward_claimed);
        assert!(!c.record_session());
        assert_eq!(c.claim_reward(), None);
    }

    #[test]
    fn normalize_clears_claim_on_incomplete_challenge() {
        let mut c = WeeklyChallenge {
            current: 4,
            completed: true,
            reward_claimed: true,
            ..WeeklyChallenge::default()
        };
        c.normalize();
        assert!(!c.completed);
        assert!(!c.reward_claimed);
    }
}
