//! Traversal over a `HashTable`: ascending bucket index, then chain order.
//!
//! Both views borrow the table for their whole lifetime, so the table cannot
//! be structurally mutated (insert, remove, grow, clear) while one is alive.

use crate::chain::{Chains, Walk};
use crate::error::IterError;
use core::fmt;
use core::iter::FusedIterator;

/// Iterator over `(&K, &V)` pairs.
pub struct Iter<'a, K, V> {
    chains: &'a Chains<K, V>,
    walk: Walk,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(chains: &'a Chains<K, V>) -> Self {
        Self {
            chains,
            walk: Walk::new(),
            remaining: chains.len(),
        }
    }

    /// Like `next`, but reports exhaustion as `IterError::Exhausted`.
    pub fn try_next(&mut self) -> Result<(&'a K, &'a V), IterError> {
        self.next().ok_or(IterError::Exhausted)
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.walk.advance(self.chains)?;
        self.remaining = self.remaining.saturating_sub(1);
        let node = self.chains.node(k);
        Some((&node.key, &node.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            chains: self.chains,
            walk: self.walk,
            remaining: self.remaining,
        }
    }
}

/// Read/write view of one entry: the key is fixed, the value can change.
pub struct Entry<'a, K, V> {
    key: &'a K,
    value: &'a mut V,
}

impl<'a, K, V> Entry<'a, K, V> {
    pub fn key(&self) -> &'a K {
        self.key
    }

    pub fn value(&self) -> &V {
        &*self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut *self.value
    }

    /// Store `value` and return the one it replaced.
    pub fn set_value(&mut self, value: V) -> V {
        core::mem::replace(self.value, value)
    }

    pub fn into_value_mut(self) -> &'a mut V {
        self.value
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", self.key)
            .field("value", &*self.value)
            .finish()
    }
}

/// Lending cursor that yields one `Entry` at a time.
///
/// Each `Entry` borrows the cursor, so at most one is alive at once; this is
/// what lets the cursor hand out `&mut V` without aliasing.
pub struct CursorMut<'a, K, V> {
    chains: &'a mut Chains<K, V>,
    walk: Walk,
    remaining: usize,
}

impl<'a, K, V> CursorMut<'a, K, V> {
    pub(crate) fn new(chains: &'a mut Chains<K, V>) -> Self {
        let remaining = chains.len();
        Self {
            chains,
            walk: Walk::new(),
            remaining,
        }
    }

    /// Advance to the next entry, or fail with `IterError::Exhausted` once
    /// every entry has been visited.
    pub fn next_entry(&mut self) -> Result<Entry<'_, K, V>, IterError> {
        let k = self
            .walk
            .advance(&*self.chains)
            .ok_or(IterError::Exhausted)?;
        self.remaining = self.remaining.saturating_sub(1);
        let node = self.chains.node_mut(k);
        Ok(Entry {
            key: &node.key,
            value: &mut node.value,
        })
    }

    /// Entries not yet visited.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}
