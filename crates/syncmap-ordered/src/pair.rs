//! Key/value pairs used while sorting.

/// A key together with its value, as seen by an
/// [`OrderedConcurrentMap::sort_by`](crate::OrderedConcurrentMap::sort_by)
/// comparator.
///
/// Pairs are built for the duration of a sort and are not stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pair<K, V> {
    key: K,
    value: V,
}

impl<K, V> Pair<K, V> {
    /// Create a pair.
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Split the pair back into its parts.
    pub fn into_inner(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for Pair<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}
