//! Ranked list of past runs, persisted as a JSON array of
//! `{"name": .., "score": .., "ts": ..}` under one storage key.

use serde::{Deserialize, Serialize};

use crate::config::StorageKeys;
use crate::error::StorageError;
use crate::storage::Storage;

pub const DEFAULT_NAME: &str = "Player";
pub const MAX_NAME_CHARS: usize = 24;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    /// Epoch milliseconds.
    pub ts: i64,
}

impl LeaderboardEntry {
    pub fn new(name: &str, score: u32, ts: i64) -> Self {
        Self {
            name: canonical_name(name),
            score,
            ts,
        }
    }
}

/// Trimmed, clipped, never empty.
pub fn canonical_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_NAME.to_string();
    }
    trimmed.chars().take(MAX_NAME_CHARS).collect::<String>().trim_end().to_string()
}

pub struct Leaderboard<S: Storage> {
    storage: S,
    keys: StorageKeys,
    capacity: usize,
    entries: Vec<LeaderboardEntry>,
}

impl<S: Storage> Leaderboard<S> {
    /// Read whatever is stored. Corrupt data is logged and dropped.
    pub fn load(storage: S, keys: StorageKeys, capacity: usize) -> Self {
        let mut entries: Vec<LeaderboardEntry> = match storage.get(&keys.leaderboard) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(%err, key = %keys.leaderboard, "discarding unreadable leaderboard");
                Vec::new()
            }),
            None => Vec::new(),
        };
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(capacity);
        Self {
            storage,
            keys,
            capacity,
            entries,
        }
    }

    pub fn list(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Insert, rank, trim to capacity and persist. Returns the 0-based rank,
    /// or `None` when the score did not make the cut.
    ///
    /// The in-memory board is updated even when persisting fails.
    pub fn append(&mut self, entry: LeaderboardEntry) -> Result<Option<usize>, StorageError> {
        // Ties rank below older entries.
        let rank = self.entries.iter().filter(|e| e.score >= entry.score).count();
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(self.capacity);
        self.persist()?;
        Ok((rank < self.capacity).then_some(rank))
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.storage.remove(&self.keys.leaderboard)
    }

    /// Would `score` earn a place on the board right now?
    pub fn qualifies(&self, score: u32) -> bool {
        self.entries.len() < self.capacity
            || self.entries.last().is_some_and(|last| score > last.score)
    }

    pub fn player_name(&self) -> Option<String> {
        let raw = self.storage.get(&self.keys.player_name)?;
        // Older saves stored the bare string.
        let name = serde_json::from_str::<String>(&raw).unwrap_or(raw);
        let name = name.trim();
        (!name.is_empty()).then(|| canonical_name(name))
    }

    pub fn remember_name(&mut self, raw: &str) -> Result<String, StorageError> {
        let name = canonical_name(raw);
        let encoded = serde_json::to_string(&name).map_err(|source| StorageError::Encode {
            key: self.keys.player_name.clone(),
            source,
        })?;
        self.storage.set(&self.keys.player_name, &encoded)?;
        Ok(name)
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let encoded =
            serde_json::to_string(&self.entries).map_err(|source| StorageError::Encode {
                key: self.keys.leaderboard.clone(),
                source,
            })?;
        self.storage.set(&self.keys.leaderboard, &encoded)
    }
}
