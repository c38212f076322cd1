//! Mutex-guarded linked queue.
//!
//! [`SafeList`] keeps its elements in a `VecDeque` behind a `Mutex`. New
//! values enter at the front and the oldest value sits at the back, so a
//! drain walks from the back to hand values out in push order.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::traits::DrainableQueue;

/// A thread-safe list with O(1) push-front and atomic pop-all-from-back.
///
/// Every operation takes the internal lock exactly once, which makes
/// [`pop_back_all`](SafeList::pop_back_all) linearizable against
/// concurrent [`push_front`](SafeList::push_front) calls.
pub struct SafeList<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> SafeList<T> {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }

    /// Create a new empty list with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    // The deque is a valid sequence after any panic, so poisoning carries
    // no information for us.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Prepend a value. It becomes the newest element.
    pub fn push_front(&self, value: T) {
        self.lock().push_front(value);
    }

    /// Remove and return the oldest element, if any.
    pub fn pop_back(&self) -> Option<T> {
        self.lock().pop_back()
    }

    /// Atomically remove every element and return them oldest first.
    pub fn pop_back_all(&self) -> Vec<T> {
        let taken = std::mem::take(&mut *self.lock());
        trace!(count = taken.len(), "safe list drained");
        taken.into_iter().rev().collect()
    }

    /// Number of elements in the list.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every element without returning them.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl<T> Default for SafeList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> DrainableQueue<T> for SafeList<T> {
    fn push(&self, value: T) {
        self.push_front(value);
    }

    fn drain_all(&self) -> Vec<T> {
        self.pop_back_all()
    }

    fn len(&self) -> usize {
        SafeList::len(self)
    }

    fn is_empty(&self) -> bool {
        SafeList::is_empty(self)
    }
}

/// Values are pushed in iteration order, so the first item drains first.
impl<T> FromIterator<T> for SafeList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let list = SafeList::new();
        {
            let mut items = list.lock();
            for value in iter {
                items.push_front(value);
            }
        }
        list
    }
}

impl<T> Extend<T> for SafeList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let items = self.items.get_mut().unwrap_or_else(PoisonError::into_inner);
        for value in iter {
            items.push_front(value);
        }
    }
}

impl<T> std::fmt::Debug for SafeList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeList")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    // -----------------------------------------------------------------------
    // Ordering
    // -----------------------------------------------------------------------

    #[test]
    fn pop_back_all_returns_push_order() {
        let list = SafeList::new();
        list.push_front(1);
        list.push_front(2);
        list.push_front(3);
        assert_eq!(list.pop_back_all(), vec![1, 2, 3]);
    }

    #[test]
    fn pop_back_all_leaves_list_empty() {
        let list = SafeList::new();
        list.push_front("a");
        assert_eq!(list.pop_back_all(), vec!["a"]);
        assert!(list.is_empty());
        assert!(list.pop_back_all().is_empty());
    }

    #[test]
    fn pop_back_takes_oldest() {
        let list = SafeList::new();
        list.push_front('x');
        list.push_front('y');
        assert_eq!(list.pop_back(), Some('x'));
        assert_eq!(list.pop_back(), Some('y'));
        assert_eq!(list.pop_back(), None);
    }

    #[test]
    fn list_is_reusable_after_drain() {
        let list = SafeList::new();
        list.push_front(1);
        list.pop_back_all();
        list.push_front(2);
        list.push_front(3);
        assert_eq!(list.pop_back_all(), vec![2, 3]);
    }

    // -----------------------------------------------------------------------
    // Trait surface
    // -----------------------------------------------------------------------

    #[test]
    fn drainable_queue_delegates() {
        fn fill<Q: DrainableQueue<u32>>(queue: &Q) {
            queue.push(10);
            queue.push(20);
        }

        let list = SafeList::default();
        fill(&list);
        assert_eq!(DrainableQueue::len(&list), 2);
        assert_eq!(list.drain_all(), vec![10, 20]);
        assert!(DrainableQueue::is_empty(&list));
    }

    #[test]
    fn from_iter_and_extend_keep_order() {
        let mut list: SafeList<i32> = (1..=3).collect();
        list.extend([4, 5]);
        assert_eq!(list.len(), 5);
        assert_eq!(list.pop_back_all(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn clear_discards_everything() {
        let list: SafeList<i32> = (0..10).collect();
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn debug_format() {
        let list: SafeList<u8> = SafeList::with_capacity(4);
        list.push_front(1);
        let debug = format!("{list:?}");
        assert!(debug.contains("SafeList"));
        assert!(debug.contains("len: 1"));
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_push_and_drain_observe_each_value_once() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 2_000;

        let list = Arc::new(SafeList::new());

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let list = Arc::clone(&list);
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        list.push_front((p, i));
                    }
                })
            })
            .collect();

        let drainer = {
            let list = Arc::clone(&list);
            thread::spawn(move || {
                let mut seen = Vec::new();
                for _ in 0..200 {
                    seen.extend(list.pop_back_all());
                    thread::yield_now();
                }
                seen
            })
        };

        for h in producers {
            h.join().expect("producer should not panic");
        }
        let mut seen = drainer.join().expect("drainer should not panic");
        seen.extend(list.pop_back_all());

        assert_eq!(seen.len(), PRODUCERS * PER_PRODUCER);
        let unique: HashSet<_> = seen.iter().copied().collect();
        assert_eq!(unique.len(), seen.len());

        // Per-producer order survives across drains.
        for p in 0..PRODUCERS {
            let mine: Vec<usize> = seen.iter().filter(|(q, _)| *q == p).map(|(_, i)| *i).collect();
            assert!(mine.windows(2).all(|w| w[0] < w[1]));
        }
    }

    proptest! {
        #[test]
        fn drains_concatenate_to_push_sequence(
            values in proptest::collection::vec(any::<i64>(), 0..64),
            split in 0usize..64,
        ) {
            let list = SafeList::new();
            let split = split.min(values.len());
            for v in &values[..split] {
                list.push_front(*v);
            }
            let mut out = list.pop_back_all();
            for v in &values[split..] {
                list.push_front(*v);
            }
            out.extend(list.pop_back_all());
            prop_assert_eq!(out, values);
        }
    }
}
