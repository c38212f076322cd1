//! The ordered concurrent map.
//!
//! [`OrderedConcurrentMap`] stores values in a `DashMap` and the key order in
//! a `Vec` behind a `Mutex`.
//!
//! # Invariants
//!
//! - The key-order sequence holds exactly the live keys of the value store,
//!   with no duplicates, whenever the key-order lock is free.
//! - A key enters the sequence once, on its first insert. Overwrites only
//!   touch the value store.
//! - Lock order is key-order lock first, then a value-store shard. No
//!   operation takes the key-order lock while holding a shard guard.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::io;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace};

use crate::config::OrderedMapConfig;
use crate::error::MapResult;
use crate::json;
use crate::pair::Pair;

// Upper bound on capacity reserved from a deserializer's length hint.
const MAX_PREALLOCATED: usize = 4096;

/// A concurrent map that remembers the order in which keys were inserted.
///
/// Share it across threads behind an `Arc`; every method takes `&self`.
///
/// Comparators passed to [`sort_keys_by`](Self::sort_keys_by) and
/// [`sort_by`](Self::sort_by) run while the key-order lock is held and must
/// not insert into or delete from the same map.
pub struct OrderedConcurrentMap<K, V> {
    order: Mutex<Vec<K>>,
    values: DashMap<K, V>,
    escape_html: AtomicBool,
}

impl<K, V> OrderedConcurrentMap<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty map that escapes HTML in its JSON output.
    pub fn new() -> Self {
        Self::with_config(OrderedMapConfig::default())
    }

    /// Create an empty map from explicit options.
    pub fn with_config(config: OrderedMapConfig) -> Self {
        Self {
            order: Mutex::new(Vec::with_capacity(config.initial_capacity)),
            values: DashMap::with_capacity(config.initial_capacity),
            escape_html: AtomicBool::new(config.escape_html),
        }
    }

    // A panic while the lock is held (say, in a user comparator) leaves the
    // sequence permuted but complete, so poisoning is safe to ignore.
    fn order(&self) -> MutexGuard<'_, Vec<K>> {
        self.order.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ---------------------------------------------------------------
    // Configuration
    // ---------------------------------------------------------------

    /// Choose whether `<`, `>` and `&` are escaped in JSON strings.
    pub fn set_escape_html(&self, on: bool) {
        self.escape_html.store(on, AtomicOrdering::Relaxed);
    }

    pub fn escape_html(&self) -> bool {
        self.escape_html.load(AtomicOrdering::Relaxed)
    }

    // ---------------------------------------------------------------
    // Point operations
    // ---------------------------------------------------------------

    /// Insert or overwrite `key`, returning the previous value.
    ///
    /// A new key is appended to the key order in the same critical section
    /// that commits its value, so no reader of [`keys`](Self::keys) can see
    /// a key whose value is missing.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        // Overwrites leave the order alone and skip the key-order lock. A
        // concurrent delete either runs before (we fall through) or after.
        if let Some(mut slot) = self.values.get_mut(&key) {
            return Some(std::mem::replace(slot.value_mut(), value));
        }

        let mut order = self.order();
        match self.values.entry(key) {
            Entry::Occupied(mut slot) => Some(slot.insert(value)),
            Entry::Vacant(slot) => {
                order.push(slot.key().clone());
                slot.insert(value);
                trace!(len = order.len(), "key appended to order");
                None
            }
        }
    }

    /// Look up a value without removing it.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.values.get(key).map(|entry| entry.value().clone())
    }

    /// Returns `true` if `key` is live.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.values.contains_key(key)
    }

    /// Remove `key` from both the value store and the key order.
    ///
    /// Returns the removed value, or `None` (and changes nothing) if the key
    /// was absent.
    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut order = self.order();
        let (_, value) = self.values.remove(key)?;
        if let Some(pos) = order.iter().position(|k| <K as Borrow<Q>>::borrow(k) == key) {
            order.remove(pos);
        }
        trace!(len = order.len(), "key removed from order");
        Some(value)
    }

    /// Remove every entry.
    pub fn clear(&self) {
        let mut order = self.order();
        self.values.clear();
        order.clear();
        debug!("ordered map cleared");
    }

    // ---------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------

    /// Snapshot of the key order.
    pub fn keys(&self) -> Vec<K> {
        self.order().clone()
    }

    /// Number of live keys.
    pub fn size(&self) -> usize {
        self.order().len()
    }

    /// Alias for [`size`](Self::size).
    pub fn len(&self) -> usize {
        self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.order().is_empty()
    }

    /// Call `f` for each entry until it returns `false`.
    ///
    /// Iteration follows the value store's internal layout, not the key
    /// order; use [`keys`](Self::keys) with [`get`](Self::get) for ordered
    /// access. Entries are copied out first, so `f` may freely call back
    /// into the map. Changes made while iterating may or may not be seen.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
        V: Clone,
    {
        let entries: Vec<(K, V)> = self
            .values
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        for (key, value) in &entries {
            if !f(key, value) {
                break;
            }
        }
    }

    // ---------------------------------------------------------------
    // Ordering
    // ---------------------------------------------------------------

    /// Reorder the keys with `compare`. The sort is stable.
    pub fn sort_keys_by<F>(&self, mut compare: F)
    where
        F: FnMut(&K, &K) -> Ordering,
    {
        let mut order = self.order();
        order.sort_by(|a, b| compare(a, b));
        debug!(len = order.len(), "key order sorted by key comparator");
    }

    /// Reorder the keys by their natural order.
    pub fn sort_keys(&self)
    where
        K: Ord,
    {
        self.sort_keys_by(K::cmp);
    }

    /// Reorder the keys by comparing whole key/value pairs. The sort is
    /// stable.
    ///
    /// Pairs are built and the order rewritten without releasing the
    /// key-order lock, so concurrent inserts and deletes wait for the sort
    /// to finish.
    pub fn sort_by<F>(&self, mut compare: F)
    where
        F: FnMut(&Pair<K, V>, &Pair<K, V>) -> Ordering,
        V: Clone,
    {
        let mut order = self.order();
        let mut pairs: Vec<Pair<K, V>> = order
            .iter()
            .filter_map(|key| {
                self.values
                    .get(key)
                    .map(|entry| Pair::new(key.clone(), entry.value().clone()))
            })
            .collect();
        debug_assert_eq!(pairs.len(), order.len(), "key order out of sync with values");

        pairs.sort_by(|a, b| compare(a, b));
        *order = pairs.into_iter().map(|pair| pair.into_inner().0).collect();
        debug!(len = order.len(), "key order sorted by pair comparator");
    }

    // ---------------------------------------------------------------
    // JSON
    // ---------------------------------------------------------------

    /// Encode the map as a compact JSON object in key order.
    ///
    /// Keys follow `serde_json`'s map-key rules: strings, integers and
    /// booleans are accepted, anything else is an encoding error. Nothing is
    /// returned on failure.
    pub fn to_json(&self) -> MapResult<Vec<u8>>
    where
        K: Serialize,
        V: Serialize,
    {
        json::to_vec(self, self.escape_html())
    }

    /// Encode the map with [`to_json`](Self::to_json) and write it out in
    /// one piece.
    pub fn write_json<W: io::Write>(&self, mut writer: W) -> MapResult<()>
    where
        K: Serialize,
        V: Serialize,
    {
        let bytes = self.to_json()?;
        writer.write_all(&bytes)?;
        Ok(())
    }
}

impl<K, V> Default for OrderedConcurrentMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedConcurrentMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = Self::new();
        for (key, value) in iter {
            map.put(key, value);
        }
        map
    }
}

impl<K, V> Extend<(K, V)> for OrderedConcurrentMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

/// Serializes as a map whose entries follow the key order.
impl<K, V> Serialize for OrderedConcurrentMap<K, V>
where
    K: Eq + Hash + Clone + Serialize,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let order = self.order();
        let mut map = serializer.serialize_map(Some(order.len()))?;
        for key in order.iter() {
            if let Some(entry) = self.values.get(key) {
                map.serialize_entry(key, entry.value())?;
            }
        }
        map.end()
    }
}

/// Deserializes from a map; the key order is the document order. A repeated
/// key keeps its first position and its last value.
impl<'de, K, V> Deserialize<'de> for OrderedConcurrentMap<K, V>
where
    K: Eq + Hash + Clone + Deserialize<'de>,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

struct OrderedMapVisitor<K, V>(PhantomData<fn() -> (K, V)>);

impl<'de, K, V> Visitor<'de> for OrderedMapVisitor<K, V>
where
    K: Eq + Hash + Clone + Deserialize<'de>,
    V: Deserialize<'de>,
{
    type Value = OrderedConcurrentMap<K, V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let map = OrderedConcurrentMap::with_config(OrderedMapConfig {
            initial_capacity: access.size_hint().unwrap_or(0).min(MAX_PREALLOCATED),
            ..OrderedMapConfig::default()
        });
        while let Some((key, value)) = access.next_entry()? {
            map.put(key, value);
        }
        Ok(map)
    }
}

impl<K, V> fmt::Debug for OrderedConcurrentMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedConcurrentMap")
            .field("entry_count", &self.size())
            .field("escape_html", &self.escape_html())
            .finish()
    }
}
