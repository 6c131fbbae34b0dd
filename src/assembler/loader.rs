//! Collect-then-fetch batch loading.
//!
//! A stand-in for a relational join: keys referenced across a whole page
//! are collected first, resolved with a single storage call, and then
//! joined in memory.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::hash::Hash;

use crate::error::AppError;

/// Accumulates unique keys in first-seen order.
#[derive(Debug, Clone)]
pub struct BatchLoader<K> {
    seen: HashSet<K>,
    keys: Vec<K>,
}

impl<K> Default for BatchLoader<K> {
    fn default() -> Self {
        Self {
            seen: HashSet::new(),
            keys: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> BatchLoader<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key. Duplicates are ignored.
    pub fn request(&mut self, key: K) {
        if self.seen.insert(key.clone()) {
            self.keys.push(key);
        }
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Fetch every requested key with one call to `fetch` and index the
    /// results by `key_of`.
    ///
    /// `fetch` is not called at all when nothing was requested. Values whose
    /// key was not requested are discarded.
    pub async fn resolve<V, F, Fut>(
        self,
        fetch: F,
        key_of: impl Fn(&V) -> K,
    ) -> Result<Resolved<K, V>, AppError>
    where
        F: FnOnce(Vec<K>) -> Fut,
        Fut: Future<Output = Result<Vec<V>, AppError>>,
    {
        if self.keys.is_empty() {
            return Ok(Resolved {
                values: HashMap::new(),
            });
        }

        let seen = self.seen;
        let values = fetch(self.keys)
            .await?
            .into_iter()
            .map(|value| (key_of(&value), value))
            .filter(|(key, _)| seen.contains(key))
            .collect();

        Ok(Resolved { values })
    }
}

/// Result of a batch load: key -> value.
#[derive(Debug, Clone)]
pub struct Resolved<K, V> {
    values: HashMap<K, V>,
}

impl<K: Eq + Hash, V> Resolved<K, V> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Transform every value, keeping the keys.
    pub fn map_values<W>(self, f: impl Fn(V) -> W) -> Resolved<K, W> {
        Resolved {
            values: self.values.into_iter().map(|(k, v)| (k, f(v))).collect(),
        }
    }
}
