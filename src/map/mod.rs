// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! A persistent hash trie map.
//!
//! A 32-way branching hash array mapped trie keyed by
//! `std::hash::Hash`/`BuildHasher`, the same hashing contract
//! `std::collections::HashMap` uses, since nothing here requires
//! deterministic on-disk hashing.

mod bitmap;
mod builder;
pub(crate) mod node;

pub use builder::HashTrieMapBuilder;

use std::borrow::Borrow;
use std::collections::hash_map::{DefaultHasher, RandomState};
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Arc;

use crate::owner::OwnerId;
use crate::sync::RefEq;

use node::Link;

/// A persistent, immutable hash trie map.
///
/// `insert` and `remove` are `O(log32 n)` and structurally share every
/// untouched node with the receiver.
pub struct HashTrieMap<K, V, S = RandomState> {
    root: Link<K, V>,
    len: usize,
    hasher: S,
}

impl<K, V> HashTrieMap<K, V, RandomState> {
    pub fn new() -> Self {
        HashTrieMap { root: None, len: 0, hasher: RandomState::new() }
    }
}

impl<K, V> Default for HashTrieMap<K, V, RandomState> {
    fn default() -> Self {
        HashTrieMap::new()
    }
}

impl<K, V, S: BuildHasher + Default> HashTrieMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        HashTrieMap { root: None, len: 0, hasher }
    }
}

impl<K, V, S> HashTrieMap<K, V, S> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> node::Iter<'_, K, V> {
        node::Iter::new(&self.root)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Whether `self` and `other` are backed by the same root node, a
    /// stronger check than [`PartialEq`], which compares by entries.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.ref_eq(other)
    }
}

impl<K, V, S: BuildHasher> HashTrieMap<K, V, S> {
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + PartialEq + ?Sized,
    {
        self.get(key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + PartialEq + ?Sized,
    {
        let hash = node::hash_of(key, &self.hasher);
        node::get(&self.root, hash, key)
    }
}

impl<K: Clone + Eq + Hash, V: Clone + PartialEq, S: BuildHasher + Clone> HashTrieMap<K, V, S> {
    /// Insert `key`/`value`, returning the new map and any value it
    /// displaced. If `value` equals the value already stored at `key`, the
    /// result shares `self`'s root node rather than rebuilding it.
    pub fn insert(&self, key: K, value: V) -> (Self, Option<V>) {
        let hash = node::hash_of(&key, &self.hasher);
        let (new_root, old) = node::insert(self.root.clone(), OwnerId::none(), &self.hasher, hash, key, value);
        let len = if old.is_some() { self.len } else { self.len + 1 };
        (HashTrieMap { root: Some(new_root), len, hasher: self.hasher.clone() }, old)
    }

    pub fn set(&self, key: K, value: V) -> Self {
        self.insert(key, value).0
    }

    /// Remove `key`, returning the new map and the removed value, if any.
    pub fn remove<Q>(&self, key: &Q) -> (Self, Option<V>)
    where
        K: Borrow<Q>,
        Q: Hash + PartialEq + ?Sized,
    {
        let hash = node::hash_of(key, &self.hasher);
        let (new_root, old) = node::remove(self.root.clone(), OwnerId::none(), hash, key);
        let len = if old.is_some() { self.len - 1 } else { self.len };
        (HashTrieMap { root: new_root, len, hasher: self.hasher.clone() }, old)
    }

    pub fn to_builder(&self) -> HashTrieMapBuilder<K, V, S> {
        let owner = OwnerId::fresh();
        node::freeze_reachable(&self.root, owner);
        HashTrieMapBuilder { root: self.root.clone(), len: self.len, owner, hasher: self.hasher.clone() }
    }
}

impl<K, V, S: Clone> Clone for HashTrieMap<K, V, S> {
    fn clone(&self) -> Self {
        HashTrieMap { root: self.root.clone(), len: self.len, hasher: self.hasher.clone() }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashTrieMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq, V: PartialEq, S: BuildHasher> PartialEq for HashTrieMap<K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Hash + Eq, V: Eq, S: BuildHasher> Eq for HashTrieMap<K, V, S> {}

impl<K: Hash, V: Hash, S> Hash for HashTrieMap<K, V, S> {
    /// XOR-folds each entry's independently-computed hash, so the result is
    /// the same regardless of the order entries were inserted or iterated.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self.iter().fold(0u64, |acc, entry| {
            let mut h = DefaultHasher::new();
            entry.hash(&mut h);
            acc ^ h.finish()
        });
        self.len.hash(state);
        combined.hash(state);
    }
}

impl<K: Clone + Eq + Hash, V: Clone + PartialEq, S: BuildHasher + Default + Clone> FromIterator<(K, V)> for HashTrieMap<K, V, S> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HashTrieMap::with_hasher(S::default());
        for (k, v) in iter {
            map = map.set(k, v);
        }
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashTrieMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = node::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(debug_assertions)]
impl<K, V, S> HashTrieMap<K, V, S> {
    pub(crate) fn check_invariants(&self) {
        node::check_invariants(&self.root);
    }
}

impl<K, V, S> RefEq for HashTrieMap<K, V, S> {
    fn ref_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove_round_trip() {
        let m: HashTrieMap<&str, i32> = HashTrieMap::new();
        let (m, old) = m.insert("a", 1);
        assert_eq!(old, None);
        let (m, old) = m.insert("b", 2);
        assert_eq!(old, None);
        assert_eq!(m.get("a"), Some(&1));
        assert_eq!(m.get("b"), Some(&2));
        assert_eq!(m.len(), 2);
        let (m, old) = m.remove("a");
        assert_eq!(old, Some(1));
        assert_eq!(m.get("a"), None);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn insert_replaces_existing_key() {
        let m: HashTrieMap<&str, i32> = HashTrieMap::new();
        let (m, _) = m.insert("a", 1);
        let (m, old) = m.insert("a", 2);
        assert_eq!(old, Some(1));
        assert_eq!(m.get("a"), Some(&2));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn insert_does_not_mutate_source() {
        let m0: HashTrieMap<&str, i32> = HashTrieMap::new();
        let (m0, _) = m0.insert("a", 1);
        let (m1, _) = m0.insert("b", 2);
        assert_eq!(m0.len(), 1);
        assert_eq!(m1.len(), 2);
        assert_eq!(m0.get("b"), None);
    }

    #[test]
    fn many_entries_survive_eager_splits() {
        let mut m: HashTrieMap<i32, i32> = HashTrieMap::new();
        for i in 0..500 {
            m = m.set(i, i * 2);
        }
        for i in 0..500 {
            assert_eq!(m.get(&i), Some(&(i * 2)));
        }
        assert_eq!(m.len(), 500);
        #[cfg(debug_assertions)]
        m.check_invariants();
    }

    #[test]
    fn remove_contracts_back_to_empty() {
        let mut m: HashTrieMap<i32, i32> = HashTrieMap::new();
        for i in 0..100 {
            m = m.set(i, i);
        }
        for i in 0..100 {
            let (next, old) = m.remove(&i);
            assert_eq!(old, Some(i));
            m = next;
        }
        assert!(m.is_empty());
        assert!(m.root.is_none());
    }
}
