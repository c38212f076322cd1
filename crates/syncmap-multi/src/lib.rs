//! Concurrent multi-value map for syncmap.
//!
//! [`MultiValueConcurrentMap`] gives every key its own drainable queue.
//! Producers [`put`](MultiValueConcurrentMap::put) values from any thread;
//! consumers take everything accumulated for a key in one destructive read.
//!
//! # Design Rules
//!
//! 1. Reads are consume-once: a value handed out by `get`, `drain` or `range`
//!    is never handed out again.
//! 2. Values for a key come out in the order they were put.
//! 3. A queue drained to empty stays in the map; only `delete` removes it.
//! 4. A value racing a `delete` lands in exactly one queue: the deleted one
//!    (and is discarded with it) or its replacement.
//!
//! # Modules
//!
//! - [`config`] -- [`MultiMapConfig`]
//! - [`map`] -- [`MultiValueConcurrentMap`] itself

pub mod config;
pub mod map;

pub use config::MultiMapConfig;
pub use map::MultiValueConcurrentMap;
pub use syncmap_queue::{DrainableQueue, SafeList};
