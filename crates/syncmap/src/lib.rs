//! Concurrency-safe generic containers.
//!
//! Provides a single entry point for the syncmap crates:
//!
//! - [`OrderedConcurrentMap`] -- a concurrent map that keeps first-insertion
//!   key order (or an explicit sort) and emits JSON objects in that order.
//! - [`MultiValueConcurrentMap`] -- a concurrent map from each key to a queue
//!   of values, read by draining.
//! - [`DrainableQueue`] / [`SafeList`] -- the per-key queue capability and its
//!   default implementation.
//!
//! ```
//! use syncmap::{MultiValueConcurrentMap, OrderedConcurrentMap};
//!
//! let ordered = OrderedConcurrentMap::new();
//! ordered.put("b", 2);
//! ordered.put("a", 1);
//! assert_eq!(ordered.to_json().unwrap(), br#"{"b":2,"a":1}"#);
//!
//! let events: MultiValueConcurrentMap<&str, u32> = MultiValueConcurrentMap::new();
//! events.put("clicks", 1);
//! events.put("clicks", 2);
//! assert_eq!(events.drain("clicks"), vec![1, 2]);
//! assert!(events.drain("clicks").is_empty());
//! ```

pub use syncmap_multi::{MultiMapConfig, MultiValueConcurrentMap};
pub use syncmap_ordered::{
    JsonFormatter, MapError, MapResult, OrderedConcurrentMap, OrderedMapConfig, Pair,
};
pub use syncmap_queue::{DrainableQueue, SafeList};

/// Serialization helpers shared by the ordered map.
pub mod json {
    pub use syncmap_ordered::json::{to_vec, to_writer, JsonFormatter};
}
