//! The [`DrainableQueue`] trait consumed by the multi-value map.

/// A concurrent FIFO queue that is read by draining.
///
/// Implementations must be thread-safe (`Send + Sync`) and linearizable:
/// a push that races a drain is either included in that drain or left for
/// a strictly later one.
pub trait DrainableQueue<T>: Send + Sync {
    /// Add a value at the newest end of the queue.
    fn push(&self, value: T);

    /// Atomically remove and return every element, oldest first.
    ///
    /// Returns an empty `Vec` when the queue is empty. The queue stays
    /// usable afterwards.
    fn drain_all(&self) -> Vec<T>;

    /// Number of elements currently queued.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is queued.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
