#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can check
// structural invariants on the private chain layout.

use crate::{HashTable, IterError};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Key whose hash only sees the first byte, so most keys collide.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
struct Clumped(String);
impl Hash for Clumped {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_bytes().first().hash(state);
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Get(usize),
    Remove(usize),
    Contains(String),
    ContainsValue(i32),
    Mutate(usize, i32),
    Snapshot,
    Clear,
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=40).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), -50i32..50).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            3 => idx.clone().prop_map(OpI::Remove),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => (-50i32..50).prop_map(OpI::ContainsValue),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Snapshot),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: State-machine equivalence against a first-write-wins model.
// Invariants exercised across random operation sequences:
// - `put` on a present key returns the stored value and leaves it unchanged.
// - `get`/`contains_key` parity with the model; borrowed `&str` lookup agrees.
// - `remove` returns the model's value and shrinks `len` by exactly one.
// - `contains_value` is a full scan that agrees with the model.
// - Clones are equal at creation and independent afterwards.
// - Iteration yields each live entry exactly once, then `IterError::Exhausted`.
// - Every node sits in the bucket its stored code maps to; no duplicates.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: HashTable<Key, i32> = HashTable::new();
        let mut model: HashMap<Key, i32> = HashMap::new();
        let mut snapshots: Vec<(HashTable<Key, i32>, HashMap<Key, i32>)> = Vec::new();

        for op in ops {
            match op {
                OpI::Put(i, v) => {
                    let k = key_from(&pool, i);
                    let expected = model.get(&k).copied();
                    let got = sut.put(k.clone(), v).copied();
                    prop_assert_eq!(got, expected);
                    model.entry(k).or_insert(v);
                }
                OpI::Get(i) => {
                    let k = key_from(&pool, i);
                    prop_assert_eq!(sut.get(&k), model.get(&k));
                    prop_assert_eq!(sut.get(k.0.as_str()), model.get(&k));
                }
                OpI::Remove(i) => {
                    let k = key_from(&pool, i);
                    let before = sut.len();
                    let got = sut.remove(&k);
                    prop_assert_eq!(got, model.remove(&k));
                    let expected_len = if got.is_some() { before - 1 } else { before };
                    prop_assert_eq!(sut.len(), expected_len);
                    prop_assert!(sut.get(&k).is_none());
                }
                OpI::Contains(s) => {
                    let has = sut.contains_key(s.as_str());
                    let has_model = model.keys().any(|k| k.0 == s);
                    prop_assert_eq!(has, has_model);
                }
                OpI::ContainsValue(v) => {
                    prop_assert_eq!(sut.contains_value(&v), model.values().any(|&x| x == v));
                }
                OpI::Mutate(i, d) => {
                    let k = key_from(&pool, i);
                    if let Some(v) = sut.get_mut(&k) {
                        *v = v.wrapping_add(d);
                    }
                    if let Some(v) = model.get_mut(&k) {
                        *v = v.wrapping_add(d);
                    }
                }
                OpI::Snapshot => {
                    snapshots.push((sut.clone(), model.clone()));
                }
                OpI::Clear => {
                    sut.clear();
                    model.clear();
                    prop_assert!(sut.is_empty());
                    prop_assert_eq!(sut.iter().count(), 0);
                }
                OpI::Iterate => {
                    let mut it = sut.iter();
                    let mut seen: BTreeMap<Key, i32> = BTreeMap::new();
                    while let Ok((k, v)) = it.try_next() {
                        prop_assert!(seen.insert(k.clone(), *v).is_none(), "entry visited twice");
                    }
                    prop_assert_eq!(it.try_next(), Err(IterError::Exhausted));
                    let expected: BTreeMap<Key, i32> =
                        model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    prop_assert_eq!(seen, expected);
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            prop_assert_eq!(sut.iter().count(), sut.len());
            sut.assert_consistent();
        }

        // Snapshots taken by `clone` must still match the model at that time.
        for (snap, snap_model) in &snapshots {
            snap.assert_consistent();
            prop_assert_eq!(snap.len(), snap_model.len());
            for (k, v) in snap_model {
                prop_assert_eq!(snap.get(k), Some(v));
            }
        }
    }
}

// Property: under heavy collisions, chain order within one bucket equals
// insertion order of the surviving keys, across growth and removals.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_colliding_chain_order(
        words in proptest::collection::vec("a[a-z]{1,4}", 1..60),
        drops in proptest::collection::vec(any::<prop::sample::Index>(), 0..10),
    ) {
        let mut sut: HashTable<Clumped, usize> = HashTable::new();
        let mut order: Vec<String> = Vec::new();
        for (i, w) in words.iter().enumerate() {
            if sut.put(Clumped(w.clone()), i).is_none() {
                order.push(w.clone());
            }
        }
        for d in drops {
            if order.is_empty() {
                break;
            }
            let w = order.remove(d.index(order.len()));
            prop_assert!(sut.remove(&Clumped(w)).is_some());
        }
        sut.assert_consistent();

        // Every key starts with 'a', so all share a single chain.
        let seen: Vec<String> = sut.iter().map(|(k, _)| k.0.clone()).collect();
        prop_assert_eq!(seen, order);
    }
}

// Property: growth preserves every entry, and the bucket count is the
// smallest doubling of 16 that keeps `len < capacity * 0.75`.
proptest! {
    #[test]
    fn prop_growth_keeps_entries(keys in proptest::collection::btree_set(any::<u64>(), 0..300)) {
        let mut sut: HashTable<u64, u64> = HashTable::new();
        for &k in &keys {
            prop_assert!(sut.put(k, k ^ 0x5a5a).is_none());
        }
        let mut cap = 16usize;
        while keys.len() as f64 >= cap as f64 * 0.75 {
            cap *= 2;
        }
        prop_assert_eq!(sut.capacity(), cap);
        for &k in &keys {
            prop_assert_eq!(sut.get(&k), Some(&(k ^ 0x5a5a)));
        }
        let seen: BTreeSet<u64> = sut.iter().map(|(k, _)| *k).collect();
        prop_assert_eq!(seen, keys);
        sut.assert_consistent();
    }
}
