use crate::shop::ShopOrder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Current persisted-state format version
pub const STATE_VERSION: u32 = 1;

/// A reward accepted as earned but not yet credited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingReward {
    pub level: u32,
    pub amount: f64,
}

/// The durable player record.
///
/// Every field is always present; missing fields in a stored blob take their
/// defaults. Older blobs used different names for some fields (`sbrBalance`,
/// `levelsCompleted`, ...), which are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressState {
    /// Missing in legacy blobs, which therefore load as version 0.
    #[serde(default)]
    pub version: u32,
    pub current_level: u32,
    #[serde(alias = "sbrBalance")]
    pub balance: f64,
    pub total_earned: f64,
    #[serde(alias = "levelsCompleted")]
    pub levels_completed_count: u32,
    #[serde(alias = "completedLevels")]
    pub completed_level_set: BTreeSet<u32>,
    #[serde(alias = "attempts")]
    pub attempts_by_level: BTreeMap<u32, u32>,
    pub pending_reward: Option<PendingReward>,
    #[serde(alias = "totalAdsWatched")]
    pub ads_watched_count: u32,
    pub last_played_at: DateTime<Utc>,
    /// Set once the last level has been settled or skipped.
    pub finished: bool,
    pub orders: Vec<ShopOrder>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            current_level: 1,
            balance: 0.0,
            total_earned: 0.0,
            levels_completed_count: 0,
            completed_level_set: BTreeSet::new(),
            attempts_by_level: BTreeMap::new(),
            pending_reward: None,
            ads_watched_count: 0,
            last_played_at: Utc::now(),
            finished: false,
            orders: Vec::new(),
        }
    }
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts_for(&self, level: u32) -> u32 {
        self.attempts_by_level.get(&level).copied().unwrap_or(0)
    }

    pub fn record_attempt(&mut self, level: u32) -> u32 {
        let attempts = self.attempts_by_level.entry(level).or_insert(0);
        *attempts += 1;
        *attempts
    }

    /// Adds `level` to the completion set; the count only moves when the
    /// level is new.
    pub fn mark_completed(&mut self, level: u32) -> bool {
        let inserted = self.completed_level_set.insert(level);
        self.levels_completed_count = self.completed_level_set.len() as u32;
        inserted
    }

    pub fn touch(&mut self) {
        self.last_played_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = ProgressState::new();
        assert_eq!(state.version, STATE_VERSION);
        assert_eq!(state.current_level, 1);
        assert_eq!(state.balance, 0.0);
        assert!(state.pending_reward.is_none());
    }

    #[test]
    fn test_serialized_shape_uses_camel_case() {
        let mut state = ProgressState::new();
        state.record_attempt(1);
        state.pending_reward = Some(PendingReward { level: 1, amount: 1.001 });

        let value = serde_json::to_value(&state).unwrap();
        for key in [
            "currentLevel",
            "balance",
            "totalEarned",
            "levelsCompletedCount",
            "completedLevelSet",
            "attemptsByLevel",
            "pendingReward",
            "adsWatchedCount",
            "lastPlayedAt",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["attemptsByLevel"]["1"], 1);
        assert_eq!(value["pendingReward"]["level"], 1);
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let mut state = ProgressState::new();
        state.current_level = 7;
        state.balance = 3.5;
        state.total_earned = 6.0;
        state.mark_completed(3);
        state.record_attempt(3);
        state.record_attempt(3);
        state.ads_watched_count = 4;

        let json = serde_json::to_string(&state).unwrap();
        let loaded: ProgressState = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_missing_fields_are_defaulted() {
        let loaded: ProgressState = serde_json::from_str(r#"{"currentLevel": 4}"#).unwrap();
        assert_eq!(loaded.current_level, 4);
        assert_eq!(loaded.version, 0);
        assert!(loaded.completed_level_set.is_empty());
    }

    #[test]
    fn test_legacy_field_names() {
        let legacy = r#"{
            "currentLevel": 3,
            "sbrBalance": 2.5,
            "totalEarned": 2.5,
            "levelsCompleted": 2,
            "totalAdsWatched": 2,
            "attempts": {"1": 1, "2": 3},
            "completedLevels": [1, 2],
            "lastPlayedAt": "2025-01-01T00:00:00.000Z"
        }"#;
        let loaded: ProgressState = serde_json::from_str(legacy).unwrap();
        assert_eq!(loaded.balance, 2.5);
        assert_eq!(loaded.levels_completed_count, 2);
        assert_eq!(loaded.ads_watched_count, 2);
        assert_eq!(loaded.attempts_for(2), 3);
        assert!(loaded.completed_level_set.contains(&2));
    }

    #[test]
    fn test_mark_completed_is_idempotent() {
        let mut state = ProgressState::new();
        assert!(state.mark_completed(1));
        assert!(!state.mark_completed(1));
        assert_eq!(state.levels_completed_count, 1);
    }
}
