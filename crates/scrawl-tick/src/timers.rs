use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::trace;

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<K> {
    pub key: K,
    /// The generation passed to [`Timers::schedule`].
    pub generation: u64,
}

#[derive(Debug)]
struct Entry {
    deadline: Instant,
    generation: u64,
    seq: u64,
}

/// Keyed one-shot deadlines.
///
/// At most one timer per key: scheduling an existing key replaces it.
/// Timers that share a deadline fire in the order they were scheduled.
#[derive(Debug)]
pub struct Timers<K> {
    entries: HashMap<K, Entry>,
    seq: u64,
}

impl<K> Timers<K>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            seq: 0,
        }
    }

    /// Arms `key` to fire after `delay`, replacing any existing timer for
    /// the same key.
    pub fn schedule(&mut self, key: K, delay: Duration, generation: u64) {
        self.seq += 1;
        let entry = Entry {
            deadline: Instant::now() + delay,
            generation,
            seq: self.seq,
        };
        trace!(?key, ?delay, generation, "timer scheduled");
        self.entries.insert(key, entry);
    }

    /// Returns `true` if a timer was armed for `key`.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Cancels every timer whose key matches `pred`.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&K) -> bool) {
        self.entries.retain(|key, _| !pred(key));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_scheduled(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn deadline(&self, key: &K) -> Option<Instant> {
        self.entries.get(key).map(|e| e.deadline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Waits for the earliest timer and removes it. Pends forever while
    /// nothing is scheduled.
    pub async fn next_fired(&mut self) -> Fired<K> {
        let Some((key, deadline)) = self
            .entries
            .iter()
            .min_by_key(|(_, e)| (e.deadline, e.seq))
            .map(|(k, e)| (k.clone(), e.deadline))
        else {
            return std::future::pending().await;
        };

        time::sleep_until(deadline).await;

        // Only reachable without an intervening `&mut self` call, so the
        // entry is still there.
        let generation = self
            .entries
            .remove(&key)
            .map(|e| e.generation)
            .unwrap_or_default();
        trace!(?key, generation, "timer fired");
        Fired { key, generation }
    }
}

impl<K> Default for Timers<K>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
