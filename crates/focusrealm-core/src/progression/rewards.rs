//! Pure derivations from the XP total.

use serde::{Deserialize, Serialize};

pub const XP_PER_LEVEL: u64 = 100;

pub fn level_for(xp: u64) -> u64 {
    xp / XP_PER_LEVEL + 1
}

pub fn xp_into_level(xp: u64) -> u64 {
    xp % XP_PER_LEVEL
}

pub fn xp_to_next_level(xp: u64) -> u64 {
    XP_PER_LEVEL - xp_into_level(xp)
}

/// 0.0 .. 100.0 progress toward the next level.
pub fn level_progress_pct(xp: u64) -> f64 {
    xp_into_level(xp) as f64 / XP_PER_LEVEL as f64 * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivationTier {
    GettingStarted,
    OnFire,
    ProductivityMaster,
    Legendary,
}

impl MotivationTier {
    pub fn for_xp(xp: u64) -> Self {
        match xp {
            0..=49 => MotivationTier::GettingStarted,
            50..=199 => MotivationTier::OnFire,
            200..=499 => MotivationTier::ProductivityMaster,
            _ => MotivationTier::Legendary,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            MotivationTier::GettingStarted => "Just getting started! 🌱",
            MotivationTier::OnFire => "You're on fire! 🔥",
            MotivationTier::ProductivityMaster => "Productivity master! ⭐",
            MotivationTier::Legendary => "Legendary focus! 🏆",
        }
    }
}

/// Reward minigames gated by XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardGame {
    Snake,
    TicTacToe,
}

impl RewardGame {
    pub const ALL: [RewardGame; 2] = [RewardGame::Snake, RewardGame::TicTacToe];

    pub fn xp_required(self) -> u64 {
        match self {
            RewardGame::Snake => 100,
            RewardGame::TicTacToe => 250,
        }
    }

    pub fn is_unlocked(self, xp: u64) -> bool {
        xp >= self.xp_required()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_examples() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(99), 1);
        assert_eq!(level_for(100), 2);
        assert_eq!(level_for(250), 3);
    }

    #[test]
    fn next_level_distance() {
        assert_eq!(xp_to_next_level(0), 100);
        assert_eq!(xp_to_next_level(250), 50);
        assert_eq!(level_progress_pct(250), 50.0);
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(MotivationTier::for_xp(49), MotivationTier::GettingStarted);
        assert_eq!(MotivationTier::for_xp(50), MotivationTier::OnFire);
        assert_eq!(MotivationTier::for_xp(200), MotivationTier::ProductivityMaster);
        assert_eq!(MotivationTier::for_xp(500), MotivationTier::Legendary);
    }

    #[test]
    fn games_unlock_at_thresholds() {
        assert!(!RewardGame::Snake.is_unlocked(99));
        assert!(RewardGame::Snake.is_unlocked(100));
        assert!(!RewardGame::TicTacToe.is_unlocked(249));
        assert!(RewardGame::TicTacToe.is_unlocked(250));
    }
}
