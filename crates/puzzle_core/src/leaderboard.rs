//! Locally cached leaderboard.
//!
//! This is an approximation kept on the device, not an authoritative global
//! ranking: it only knows about players whose scores were merged into this
//! cache.

use crate::error::GameResult;
use crate::identity::PlayerIdentity;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};

pub const LEADERBOARD_KEY: &str = "bit3k_leaderboard";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player_id: String,
    pub display_name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaderboard {
    size: usize,
}

impl Leaderboard {
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    /// Read the cached list. A corrupt cache reads as empty.
    pub fn cached<S: KeyValueStore + ?Sized>(&self, store: &S) -> GameResult<Vec<LeaderboardEntry>> {
        let Some(raw) = store.load(LEADERBOARD_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<LeaderboardEntry>>(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed leaderboard cache");
                Ok(Vec::new())
            }
        }
    }

    /// Upsert `identity` with `score`, re-rank and truncate.
    pub fn merge(
        &self,
        mut entries: Vec<LeaderboardEntry>,
        identity: &PlayerIdentity,
        score: f64,
    ) -> Vec<LeaderboardEntry> {
        match entries.iter_mut().find(|e| e.player_id == identity.id) {
            Some(entry) => {
                entry.score = score;
                entry.display_name = identity.display_name.clone();
            }
            None => entries.push(LeaderboardEntry {
                player_id: identity.id.clone(),
                display_name: identity.display_name.clone(),
                score,
            }),
        }
        self.rank(entries)
    }

    fn rank(&self, mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        entries.truncate(self.size);
        entries
    }

    /// Cached list, with the current player's score merged in and written back
    /// when an identity is known. Guests get the cache unchanged.
    pub fn refresh<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        identity: Option<&PlayerIdentity>,
        score: f64,
    ) -> GameResult<Vec<LeaderboardEntry>> {
        let cached = self.cached(store)?;
        let Some(identity) = identity else {
            return Ok(cached);
        };

        let merged = self.merge(cached, identity, score);
        store.save(LEADERBOARD_KEY, &serde_json::to_string(&merged)?)?;
        tracing::debug!(player = %identity.id, score, entries = merged.len(), "leaderboard updated");
        Ok(merged)
    }
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn entry(id: &str, score: f64) -> LeaderboardEntry {
        LeaderboardEntry { player_id: id.into(), display_name: format!("Player {id}"), score }
    }

    #[test]
    fn test_guest_gets_cache_unchanged() {
        let board = Leaderboard::default();
        let cached = vec![entry("a", 5.0)];
        let mut store =
            MemoryStore::with_entry(LEADERBOARD_KEY, &serde_json::to_string(&cached).unwrap());

        let list = board.refresh(&mut store, None, 99.0).unwrap();
        assert_eq!(list, cached);
    }

    #[test]
    fn test_upsert_sorts_and_truncates() {
        let board = Leaderboard::new(3);
        let cached = vec![entry("a", 5.0), entry("b", 4.0), entry("c", 3.0)];
        let mut store =
            MemoryStore::with_entry(LEADERBOARD_KEY, &serde_json::to_string(&cached).unwrap());
        let me = PlayerIdentity::new("me", "Me");

        let list = board.refresh(&mut store, Some(&me), 4.5).unwrap();
        let ids: Vec<_> = list.iter().map(|e| e.player_id.as_str()).collect();
        assert_eq!(ids, ["a", "me", "b"]);

        // Written back, and a second refresh updates rather than duplicates.
        let list = board.refresh(&mut store, Some(&me), 6.0).unwrap();
        assert_eq!(list[0].player_id, "me");
        assert_eq!(list.iter().filter(|e| e.player_id == "me").count(), 1);
    }

    #[test]
    fn test_malformed_cache_reads_empty() {
        let board = Leaderboard::default();
        let mut store = MemoryStore::with_entry(LEADERBOARD_KEY, "not json");
        let me = PlayerIdentity::new("me", "Me");
        let list = board.refresh(&mut store, Some(&me), 1.0).unwrap();
        assert_eq!(list, vec![LeaderboardEntry {
            player_id: "me".into(),
            display_name: "Me".into(),
            score: 1.0
        }]);
    }

    #[test]
    fn test_caps_at_size() {
        let board = Leaderboard::default();
        let many: Vec<_> = (0..15).map(|i| entry(&i.to_string(), i as f64)).collect();
        let merged = board.merge(many, &PlayerIdentity::new("x", "X"), 0.5);
        assert_eq!(merged.len(), 10);
        assert!(merged.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
