//! HashTable: the public separate-chaining map.

use crate::chain::{Chains, Walk};
use crate::iter::{CursorMut, Iter};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use tracing::trace;

/// Bucket count of a table built with `new`.
pub const DEFAULT_CAPACITY: usize = 16;

/// Growth threshold: after an insertion, the bucket array doubles once
/// `len >= capacity * LOAD_FACTOR`.
pub const LOAD_FACTOR: f64 = 0.75;

/// A key/value map using separate chaining.
///
/// `put` is first-write-wins: inserting a key that is already present keeps
/// the stored value and hands it back instead of replacing it.
///
/// Keys must uphold the usual `Hash`/`Eq` contract (equal keys hash
/// equally); a key that violates it may become unreachable.
///
/// The table is single-threaded and does no locking. Callers that share it
/// across threads serialize access themselves, e.g. behind a `Mutex`.
pub struct HashTable<K, V> {
    hasher: DefaultHashBuilder,
    chains: Chains<K, V>,
}

impl<K, V> HashTable<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty table with `buckets` bucket slots (at least one).
    pub fn with_capacity(buckets: usize) -> Self {
        Self {
            hasher: DefaultHashBuilder::default(),
            chains: Chains::with_buckets(buckets.max(1)),
        }
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.len() == 0
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.chains.bucket_count()
    }

    /// Drop every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        trace!(
            len = self.chains.len(),
            buckets = self.chains.bucket_count(),
            "clearing table"
        );
        self.chains.clear();
    }

    /// Entries in ascending bucket order, then chain order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.chains)
    }

    /// Cursor yielding writable `Entry` views in the same order as `iter`.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, V> {
        CursorMut::new(&mut self.chains)
    }

    /// Apply `f` to every entry, allowing the value to be modified in place.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V),
    {
        let mut cursor = self.cursor_mut();
        while let Ok(mut entry) = cursor.next_entry() {
            let key = entry.key();
            f(key, entry.value_mut());
        }
    }

    /// Linear scan over every chain for a value equal to `value`.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|(_, v)| v == value)
    }

    #[cfg(feature = "bench_internal")]
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.chains.chain_lengths()
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self)
    where
        K: Eq + fmt::Debug,
    {
        self.chains.assert_consistent();
    }

    fn grow_if_loaded(&mut self) {
        let buckets = self.chains.bucket_count();
        let len = self.chains.len();
        if len as f64 >= buckets as f64 * LOAD_FACTOR {
            let grown = buckets * 2;
            trace!(from = buckets, to = grown, len, "growing bucket array");
            self.chains.regroup(grown);
        }
    }
}

impl<K, V> HashTable<K, V>
where
    K: Eq + Hash,
{
    fn hash_code<Q>(&self, q: &Q) -> i64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q) as i64
    }

    /// Insert `key` if absent and return `None`.
    ///
    /// If an equal key is already present, nothing changes: the stored value
    /// is returned and `value` is dropped. This differs from
    /// `std::collections::HashMap::insert`, which replaces the value; use
    /// `get_mut` or `remove` + `put` to overwrite.
    pub fn put(&mut self, key: K, value: V) -> Option<&V> {
        let code = self.hash_code(&key);
        if let Some(existing) = self.chains.find(code, &key) {
            return Some(&self.chains.node(existing).value);
        }
        self.chains.append(code, key, value);
        self.grow_if_loaded();
        None
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let code = self.hash_code(q);
        self.chains
            .find(code, q)
            .map(|k| &self.chains.node(k).value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let code = self.hash_code(q);
        let k = self.chains.find(code, q)?;
        Some(&mut self.chains.node_mut(k).value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let code = self.hash_code(q);
        self.chains.find(code, q).is_some()
    }

    /// Unlink the entry for `q` and return its value.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    /// Unlink the entry for `q` and return the owned key and value.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let code = self.hash_code(q);
        self.chains.unlink(code, q)
    }
}

impl<K, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuilds from a table of default capacity, appending each entry in
/// iteration order. Growth happens independently of the source table.
impl<K, V> Clone for HashTable<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        let mut copy = Self {
            hasher: self.hasher.clone(),
            chains: Chains::with_buckets(DEFAULT_CAPACITY),
        };
        let mut walk = Walk::new();
        while let Some(k) = walk.advance(&self.chains) {
            let node = self.chains.node(k);
            // Keys are unique in the source, so the duplicate probe is skipped.
            copy.chains
                .append(node.code, node.key.clone(), node.value.clone());
            copy.grow_if_loaded();
        }
        copy
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a HashTable<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Uses `put`, so the first value seen for a key is the one kept.
impl<K, V> Extend<(K, V)> for HashTable<K, V>
where
    K: Eq + Hash,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashTable<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}
