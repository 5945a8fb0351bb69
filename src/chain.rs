//! Chains: node arena plus the bucket array of chain heads.
//!
//! Nodes live in a `SlotMap` and link to each other through generational
//! `DefaultKey` handles, so unlinking a node never leaves a dangling link
//! behind and regrouping moves handles instead of nodes.

use core::borrow::Borrow;
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    // Hash code computed once at insertion; regrouping never rehashes the key.
    pub(crate) code: i64,
    pub(crate) next: Option<DefaultKey>,
}

/// Reduce a signed hash code to a bucket index.
///
/// Uses the unsigned magnitude, so `i64::MIN` reduces to `2^63 % buckets`
/// rather than overflowing on negation.
#[inline]
pub(crate) fn bucket_index(code: i64, buckets: usize) -> usize {
    debug_assert!(buckets > 0, "bucket array must not be empty");
    (code.unsigned_abs() % buckets as u64) as usize
}

#[derive(Debug)]
pub(crate) struct Chains<K, V> {
    heads: Vec<Option<DefaultKey>>,
    nodes: SlotMap<DefaultKey, Node<K, V>>,
}

impl<K, V> Chains<K, V> {
    pub(crate) fn with_buckets(buckets: usize) -> Self {
        debug_assert!(buckets > 0);
        Self {
            heads: vec![None; buckets],
            nodes: SlotMap::with_key(),
        }
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn head(&self, bucket: usize) -> Option<DefaultKey> {
        self.heads.get(bucket).copied().flatten()
    }

    #[inline]
    pub(crate) fn node(&self, k: DefaultKey) -> &Node<K, V> {
        &self.nodes[k]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, k: DefaultKey) -> &mut Node<K, V> {
        &mut self.nodes[k]
    }

    /// Walk the chain `code` maps to and return the first node whose key equals `q`.
    pub(crate) fn find<Q>(&self, code: i64, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cur = self.heads[bucket_index(code, self.bucket_count())];
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if node.key.borrow() == q {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    /// Allocate a node and link it at the tail of its chain. The caller
    /// guarantees the key is not already present.
    pub(crate) fn append(&mut self, code: i64, key: K, value: V) -> DefaultKey {
        let k = self.nodes.insert(Node {
            key,
            value,
            code,
            next: None,
        });
        let bucket = bucket_index(code, self.bucket_count());
        match self.heads[bucket] {
            None => self.heads[bucket] = Some(k),
            Some(mut tail) => {
                while let Some(next) = self.nodes[tail].next {
                    tail = next;
                }
                self.nodes[tail].next = Some(k);
            }
        }
        k
    }

    /// Unlink and free the first node whose key equals `q`.
    pub(crate) fn unlink<Q>(&mut self, code: i64, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let bucket = bucket_index(code, self.bucket_count());
        let mut prev: Option<DefaultKey> = None;
        let mut cur = self.heads[bucket];
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if node.key.borrow() == q {
                let next = node.next;
                match prev {
                    None => self.heads[bucket] = next,
                    Some(p) => self.nodes[p].next = next,
                }
                let node = self.nodes.remove(k)?;
                return Some((node.key, node.value));
            }
            prev = cur;
            cur = node.next;
        }
        None
    }

    /// Replace the bucket array with one of `buckets` slots and relink every
    /// node into it. Buckets are drained in ascending order and nodes are
    /// appended at the tail, so nodes sharing a new bucket keep their
    /// relative order.
    pub(crate) fn regroup(&mut self, buckets: usize) {
        debug_assert!(buckets > 0);
        let old = core::mem::replace(&mut self.heads, vec![None; buckets]);
        let mut tails: Vec<Option<DefaultKey>> = vec![None; buckets];
        for head in old {
            let mut cur = head;
            while let Some(k) = cur {
                let node = &mut self.nodes[k];
                cur = node.next.take();
                let b = bucket_index(node.code, buckets);
                match tails[b] {
                    None => self.heads[b] = Some(k),
                    Some(t) => self.nodes[t].next = Some(k),
                }
                tails[b] = Some(k);
            }
        }
    }

    /// Empty every bucket and free every node. Bucket count is unchanged.
    pub(crate) fn clear(&mut self) {
        self.heads.fill(None);
        self.nodes.clear();
    }

    #[cfg(any(test, feature = "bench_internal"))]
    pub(crate) fn chain_lengths(&self) -> Vec<usize> {
        self.heads
            .iter()
            .map(|&head| {
                let mut n = 0;
                let mut cur = head;
                while let Some(k) = cur {
                    n += 1;
                    cur = self.nodes[k].next;
                }
                n
            })
            .collect()
    }

    /// Panics if any structural invariant is broken: a node sitting in a
    /// bucket its code does not map to, a node reachable twice or not at
    /// all, or two equal keys in one chain.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self)
    where
        K: Eq + core::fmt::Debug,
    {
        let mut seen = slotmap::SecondaryMap::<DefaultKey, ()>::new();
        for (bucket, &head) in self.heads.iter().enumerate() {
            let mut keys: Vec<&K> = Vec::new();
            let mut cur = head;
            while let Some(k) = cur {
                let node = &self.nodes[k];
                assert_eq!(
                    bucket_index(node.code, self.bucket_count()),
                    bucket,
                    "node {:?} linked into the wrong bucket",
                    node.key
                );
                assert!(seen.insert(k, ()).is_none(), "node reachable twice");
                assert!(
                    !keys.contains(&&node.key),
                    "duplicate key {:?} in chain",
                    node.key
                );
                keys.push(&node.key);
                cur = node.next;
            }
        }
        assert_eq!(seen.len(), self.nodes.len(), "unreachable nodes in arena");
    }
}

/// Cursor over the chains: ascending bucket index, then chain order.
///
/// Holds no borrow itself; callers pass the chains on every step, which lets
/// both shared and exclusive views drive the same walk.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Walk {
    bucket: usize,
    current: Option<DefaultKey>,
}

impl Walk {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn advance<K, V>(&mut self, chains: &Chains<K, V>) -> Option<DefaultKey> {
        if let Some(next) = self.current.and_then(|k| chains.node(k).next) {
            self.current = Some(next);
            return Some(next);
        }
        while self.bucket < chains.bucket_count() {
            let head = chains.head(self.bucket);
            self.bucket += 1;
            if head.is_some() {
                self.current = head;
                return head;
            }
        }
        self.current = None;
        None
    }
}
