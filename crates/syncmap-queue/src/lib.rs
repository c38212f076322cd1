//! Drainable queues for the syncmap containers.
//!
//! A drainable queue is the per-key storage behind
//! `MultiValueConcurrentMap`: producers push values one at a time, and a
//! consumer atomically takes everything accumulated so far.
//!
//! # Contract
//!
//! - `push` is O(1) and safe under arbitrary concurrency.
//! - `drain_all` empties the queue and returns its elements oldest first.
//! - Every push is observed by exactly one drain: never dropped, never
//!   returned twice.
//!
//! # Modules
//!
//! - [`traits`] -- The [`DrainableQueue`] capability
//! - [`safe_list`] -- [`SafeList`], the mutex-guarded default implementation

pub mod safe_list;
pub mod traits;

pub use safe_list::SafeList;
pub use traits::DrainableQueue;
