use tracing::{debug, warn};

use super::store::HighScoreStore;

/// Score for the running game plus the persisted best for one speed mode
pub struct ScoreTracker<S> {
    store: S,
    key: String,
    score: u64,
    high_score: u64,
}

impl<S: HighScoreStore> ScoreTracker<S> {
    /// Start at score 0 and load the high score stored under `key`.
    ///
    /// A missing, unreadable or unparseable record counts as 0.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let high_score = read_high_score(&store, &key);
        debug!(%key, high_score, "loaded high score");

        Self {
            store,
            key,
            score: 0,
            high_score,
        }
    }

    /// Count one fruit and persist the high score if it moved.
    pub fn on_fruit_eaten(&mut self) {
        self.score += 1;

        // Another session may have raised the stored record meanwhile
        let stored = read_high_score(&self.store, &self.key);
        let best = self.high_score.max(stored).max(self.score);
        self.high_score = best;

        if best > stored {
            if let Err(err) = self.store.set(&self.key, &best.to_string()) {
                warn!(key = %self.key, error = %err, "could not persist high score");
            }
        }
    }

    pub fn current_score(&self) -> u64 {
        self.score
    }

    pub fn current_high_score(&self) -> u64 {
        self.high_score
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn read_high_score<S: HighScoreStore>(store: &S, key: &str) -> u64 {
    match store.get(key) {
        Ok(Some(text)) => text.trim().parse().unwrap_or_else(|_| {
            warn!(%key, value = %text, "ignoring unparseable high score");
            0
        }),
        Ok(None) => 0,
        Err(err) => {
            warn!(%key, error = %err, "could not read high score");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{MemoryStore, StoreError};

    /// Store whose writes always fail
    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("blocked")))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("full")))
        }
    }

    #[test]
    fn test_defaults_to_zero() {
        let tracker = ScoreTracker::new(MemoryStore::new(), "hs200");
        assert_eq!(tracker.current_score(), 0);
        assert_eq!(tracker.current_high_score(), 0);
    }

    #[test]
    fn test_loads_existing_high_score() {
        let mut store = MemoryStore::new();
        store.set("hs200", "12").unwrap();
        let tracker = ScoreTracker::new(store, "hs200");
        assert_eq!(tracker.current_high_score(), 12);
    }

    #[test]
    fn test_fruit_raises_and_persists_high_score() {
        let mut tracker = ScoreTracker::new(MemoryStore::new(), "hs100");
        tracker.on_fruit_eaten();
        tracker.on_fruit_eaten();

        assert_eq!(tracker.current_score(), 2);
        assert_eq!(tracker.current_high_score(), 2);
        assert_eq!(tracker.store().get("hs100").unwrap(), Some("2".to_string()));
        assert_eq!(tracker.store().get("hs200").unwrap(), None);
    }

    #[test]
    fn test_high_score_does_not_decrease() {
        let mut store = MemoryStore::new();
        store.set("hs200", "5").unwrap();
        let mut tracker = ScoreTracker::new(store, "hs200");

        tracker.on_fruit_eaten();
        assert_eq!(tracker.current_score(), 1);
        assert_eq!(tracker.current_high_score(), 5);
        assert_eq!(tracker.store().get("hs200").unwrap(), Some("5".to_string()));
    }

    #[test]
    fn test_garbage_record_counts_as_zero() {
        let mut store = MemoryStore::new();
        store.set("hs200", "lots").unwrap();
        let mut tracker = ScoreTracker::new(store, "hs200");
        assert_eq!(tracker.current_high_score(), 0);

        tracker.on_fruit_eaten();
        assert_eq!(tracker.store().get("hs200").unwrap(), Some("1".to_string()));
    }

    #[test]
    fn test_broken_store_keeps_scoring_in_memory() {
        let mut tracker = ScoreTracker::new(BrokenStore, "hs200");
        tracker.on_fruit_eaten();
        tracker.on_fruit_eaten();
        assert_eq!(tracker.current_score(), 2);
        assert_eq!(tracker.current_high_score(), 2);
    }
}
