//! The multi-value concurrent map.
//!
//! Queues live in a `DashMap` as `Arc<Q>`. A push runs while the shard guard
//! for its key is held, which is what keeps it from landing in a queue that
//! a concurrent `delete` has already unlinked.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace};

use syncmap_queue::{DrainableQueue, SafeList};

use crate::config::MultiMapConfig;

/// A concurrent map from each key to a queue of values.
///
/// Reading is destructive: [`drain`](Self::drain) (and its alias
/// [`get`](Self::get)) removes what it returns. Use
/// [`pending`](Self::pending) to look without consuming.
///
/// The queue type defaults to [`SafeList`]; any [`DrainableQueue`] with a
/// `Default` constructor can be substituted.
pub struct MultiValueConcurrentMap<K, V, Q = SafeList<V>> {
    queues: DashMap<K, Arc<Q>>,
    _values: PhantomData<fn(V) -> V>,
}

impl<K, V, Q> MultiValueConcurrentMap<K, V, Q>
where
    K: Eq + Hash,
    Q: DrainableQueue<V> + Default,
{
    /// Create an empty map.
    pub fn new() -> Self {
        Self::with_config(MultiMapConfig::default())
    }

    /// Create an empty map from explicit options.
    pub fn with_config(config: MultiMapConfig) -> Self {
        Self {
            queues: DashMap::with_capacity(config.initial_capacity),
            _values: PhantomData,
        }
    }

    // ---------------------------------------------------------------
    // Producers
    // ---------------------------------------------------------------

    /// Append `value` to the queue for `key`, creating the queue if needed.
    pub fn put(&self, key: K, value: V) {
        if let Some(queue) = self.queues.get(&key) {
            queue.push(value);
            return;
        }
        self.queues
            .entry(key)
            .or_insert_with(Self::new_queue)
            .push(value);
    }

    /// Append every value from `values` to the queue for `key`, in order.
    ///
    /// The values are pushed under one shard guard, so a concurrent
    /// `delete` sees either all of them or none.
    pub fn put_all<I>(&self, key: K, values: I)
    where
        I: IntoIterator<Item = V>,
    {
        let queue = self.queues.entry(key).or_insert_with(Self::new_queue);
        for value in values {
            queue.push(value);
        }
    }

    fn new_queue() -> Arc<Q> {
        trace!("queue created");
        Arc::new(Q::default())
    }

    // ---------------------------------------------------------------
    // Consumers
    // ---------------------------------------------------------------

    /// Take every value queued under `key`, oldest first.
    ///
    /// This is a consume-once read: the returned values are gone from the
    /// map. Returns an empty `Vec` if `key` has no queue. The queue itself
    /// stays in place, empty.
    pub fn drain<B>(&self, key: &B) -> Vec<V>
    where
        K: Borrow<B>,
        B: Hash + Eq + ?Sized,
    {
        match self.queues.get(key) {
            Some(queue) => {
                let values = queue.drain_all();
                trace!(count = values.len(), "queue drained");
                values
            }
            None => Vec::new(),
        }
    }

    /// Same as [`drain`](Self::drain). The read is destructive.
    pub fn get<B>(&self, key: &B) -> Vec<V>
    where
        K: Borrow<B>,
        B: Hash + Eq + ?Sized,
    {
        self.drain(key)
    }

    /// Drain every queue present when the call starts, passing each key and
    /// its values to `f`.
    ///
    /// There is no global snapshot: a value put while `range` runs is
    /// delivered here or by a later drain, depending on whether its key has
    /// been visited yet. `f` may call back into the map.
    pub fn range<F>(&self, mut f: F)
    where
        K: Clone,
        F: FnMut(&K, Vec<V>),
    {
        let queues: Vec<(K, Arc<Q>)> = self
            .queues
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        for (key, queue) in &queues {
            f(key, queue.drain_all());
        }
    }

    /// Remove `key` and its queue.
    ///
    /// Returns the values that were still queued (they are no longer
    /// reachable through the map), or `None` if `key` had no queue. A later
    /// `put` starts a fresh queue.
    pub fn delete<B>(&self, key: &B) -> Option<Vec<V>>
    where
        K: Borrow<B>,
        B: Hash + Eq + ?Sized,
    {
        let (_, queue) = self.queues.remove(key)?;
        let discarded = queue.drain_all();
        debug!(discarded = discarded.len(), "queue deleted");
        Some(discarded)
    }

    /// Remove every key and queue.
    pub fn clear(&self) {
        self.queues.clear();
        debug!("multi-value map cleared");
    }

    // ---------------------------------------------------------------
    // Non-destructive views
    // ---------------------------------------------------------------

    /// Number of values waiting under `key`.
    pub fn pending<B>(&self, key: &B) -> usize
    where
        K: Borrow<B>,
        B: Hash + Eq + ?Sized,
    {
        self.queues.get(key).map_or(0, |queue| queue.len())
    }

    /// Returns `true` if `key` has a queue, even an empty one.
    pub fn contains_key<B>(&self, key: &B) -> bool
    where
        K: Borrow<B>,
        B: Hash + Eq + ?Sized,
    {
        self.queues.contains_key(key)
    }

    /// Snapshot of the keys that currently have a queue, in no particular
    /// order.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.queues.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of keys with a queue.
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}

impl<K, V, Q> Default for MultiValueConcurrentMap<K, V, Q>
where
    K: Eq + Hash,
    Q: DrainableQueue<V> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, Q> fmt::Debug for MultiValueConcurrentMap<K, V, Q>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiValueConcurrentMap")
            .field("key_count", &self.queues.len())
            .finish()
    }
}
