use std::collections::HashMap;

use super::board::Mark;

/// Persisted key for the X win counter.
pub const SCORE_KEY_X: &str = "scoreX";
/// Persisted key for the O win counter.
pub const SCORE_KEY_O: &str = "scoreO";

pub fn score_key(mark: Mark) -> &'static str {
    match mark {
        Mark::X => SCORE_KEY_X,
        Mark::O => SCORE_KEY_O,
    }
}

/// Durable key-value storage for win counters. The browser front end backs
/// this with `localStorage`; tests and native hosts use [`MemoryStore`].
/// Implementations must tolerate absent keys, and callers must tolerate a
/// store that silently drops writes.
pub trait ScoreStore {
    fn load(&self, key: &str) -> Option<u32>;
    fn save(&mut self, key: &str, value: u32);
    fn remove(&mut self, key: &str);
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self, key: &str) -> Option<u32> {
        self.entries.get(key).copied()
    }

    fn save(&mut self, key: &str, value: u32) {
        self.entries.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_read_as_none() {
        let store = MemoryStore::new();
        assert_eq!(store.load(SCORE_KEY_X), None);
    }

    #[test]
    fn saved_values_round_trip_and_remove() {
        let mut store = MemoryStore::new();
        store.save(SCORE_KEY_O, 4);
        assert_eq!(store.load(SCORE_KEY_O), Some(4));
        store.remove(SCORE_KEY_O);
        assert_eq!(store.load(SCORE_KEY_O), None);
    }
}
