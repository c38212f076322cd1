//! Insertion-ordered concurrent map for syncmap.
//!
//! [`OrderedConcurrentMap`] pairs a sharded concurrent value store with a
//! mutex-guarded key-order sequence. Readers hit the value store directly;
//! every structural change (first insert, delete, sort) is serialized on the
//! key-order lock so the two never disagree.
//!
//! # Ordering
//!
//! - Keys are ordered by first insertion. Overwriting a key keeps its slot.
//! - [`OrderedConcurrentMap::sort_keys_by`] and [`OrderedConcurrentMap::sort_by`]
//!   reorder the sequence atomically.
//! - Serialization (JSON or any serde format) follows the key order.
//!
//! # Modules
//!
//! - [`error`] -- [`MapError`] and the `MapResult` alias
//! - [`config`] -- [`OrderedMapConfig`]
//! - [`pair`] -- [`Pair`], the key/value view handed to sort comparators
//! - [`json`] -- Compact JSON formatter with optional HTML escaping
//! - [`map`] -- [`OrderedConcurrentMap`] itself

pub mod config;
pub mod error;
mod finite;
pub mod json;
pub mod map;
pub mod pair;

pub use config::OrderedMapConfig;
pub use error::{MapError, MapResult};
pub use json::JsonFormatter;
pub use map::OrderedConcurrentMap;
pub use pair::Pair;
