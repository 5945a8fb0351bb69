//! chained-hashmap: a single-threaded key/value map built on separate
//! chaining, with arena-backed chains and first-write-wins insertion.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an open-hashing map whose chains never hold dangling links and
//!   whose traversal cannot observe a half-mutated table.
//! - Layers:
//!   - `chain::Chains<K, V>`: node arena (`SlotMap`) plus the bucket array
//!     of chain heads. Owns every structural algorithm: find, append at
//!     tail, unlink, regroup into a larger array, clear.
//!   - `HashTable<K, V>`: public API. Computes hash codes, applies the
//!     first-write-wins rule, and drives growth.
//!   - `iter`: `Iter` and `CursorMut`, both borrowing the table.
//!
//! Constraints
//! - Single-threaded: no locking. Share across threads only behind an
//!   external lock.
//! - Nodes are addressed by generational `DefaultKey` handles; a bucket slot
//!   is `Option<DefaultKey>` naming the chain head.
//! - Count is the arena length, so it always equals the number of nodes
//!   reachable from the buckets.
//!
//! Insertion semantics
//! - `put` on a present key returns the stored value and changes nothing.
//!   This is deliberate and differs from `std::collections::HashMap`.
//!   Overwrite through `get_mut`, a cursor `Entry`, or `remove` + `put`.
//! - New nodes are appended at the tail of their chain, so colliding keys
//!   iterate in insertion order.
//!
//! Hashing and growth
//! - The hash code is `hashbrown`'s default builder applied to the key,
//!   read as `i64`. The bucket index is its unsigned magnitude modulo the
//!   bucket count, which keeps `i64::MIN` in range.
//! - Each node stores its code; regrouping never calls `K: Hash`.
//! - Initial capacity 16 buckets, load factor 0.75. Growth doubles the
//!   array and relinks existing nodes; no node is reallocated.
//!
//! Traversal
//! - Ascending bucket index, then chain order. Views borrow the table, so
//!   structural mutation during traversal is rejected at compile time.
//! - Running past the end surfaces `IterError::Exhausted` from `try_next`
//!   and `CursorMut::next_entry`; the `Iterator` impl returns `None`.
//!
//! Notes and non-goals
//! - No custom hasher parameter.
//! - No ordered iteration beyond the bucket/chain order above.
//! - `clear` keeps the bucket count; the table never shrinks.

#![forbid(unsafe_code)]

mod chain;
mod error;
mod hash_table;
#[cfg(test)]
mod hash_table_proptest;
pub mod iter;

// Public surface
pub use error::IterError;
pub use hash_table::{HashTable, DEFAULT_CAPACITY, LOAD_FACTOR};
pub use iter::{CursorMut, Entry, Iter};
