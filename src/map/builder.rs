// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use crate::owner::OwnerId;

use super::node::{self, Link};
use super::HashTrieMap;

/// Transient builder for [`HashTrieMap`]. Mutates its own unfrozen,
/// uniquely-owned nodes in place; [`to_immutable`](Self::to_immutable)
/// freezes the tree reachable from the root so later builder edits fall back
/// to path-copying instead of corrupting a shared snapshot.
pub struct HashTrieMapBuilder<K, V, S = RandomState> {
    pub(crate) root: Link<K, V>,
    pub(crate) len: usize,
    pub(crate) owner: OwnerId,
    pub(crate) hasher: S,
}

impl<K, V> HashTrieMapBuilder<K, V, RandomState> {
    pub fn new() -> Self {
        HashTrieMapBuilder { root: None, len: 0, owner: OwnerId::fresh(), hasher: RandomState::new() }
    }
}

impl<K, V> Default for HashTrieMapBuilder<K, V, RandomState> {
    fn default() -> Self {
        HashTrieMapBuilder::new()
    }
}

impl<K, V, S> HashTrieMapBuilder<K, V, S> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> node::Iter<'_, K, V> {
        node::Iter::new(&self.root)
    }
}

impl<K, V, S: BuildHasher> HashTrieMapBuilder<K, V, S> {
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + PartialEq + ?Sized,
    {
        let hash = node::hash_of(key, &self.hasher);
        node::get(&self.root, hash, key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + PartialEq + ?Sized,
    {
        self.get(key).is_some()
    }
}

impl<K: Clone + Eq + Hash, V: Clone + PartialEq, S: BuildHasher + Clone> HashTrieMapBuilder<K, V, S> {
    pub fn from_map(map: &HashTrieMap<K, V, S>) -> Self {
        map.to_builder()
    }

    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let hash = node::hash_of(&key, &self.hasher);
        let (new_root, old) = node::insert(self.root.take(), self.owner, &self.hasher, hash, key, value);
        self.root = Some(new_root);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + PartialEq + ?Sized,
    {
        let hash = node::hash_of(key, &self.hasher);
        let (new_root, old) = node::remove(self.root.take(), self.owner, hash, key);
        self.root = new_root;
        if old.is_some() {
            self.len -= 1;
        }
        old
    }

    pub fn to_immutable(&self) -> HashTrieMap<K, V, S> {
        node::freeze_reachable(&self.root, self.owner);
        HashTrieMap { root: self.root.clone(), len: self.len, hasher: self.hasher.clone() }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashTrieMapBuilder<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = node::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_amortizes_a_run_of_inserts() {
        let mut b: HashTrieMapBuilder<i32, i32> = HashTrieMapBuilder::new();
        for i in 0..50 {
            b.set(i, i * 2);
        }
        assert_eq!(b.len(), 50);
        let snapshot = b.to_immutable();
        assert_eq!(snapshot.get(&10), Some(&20));
    }

    #[test]
    fn to_immutable_freezes_so_later_edits_path_copy() {
        let mut b: HashTrieMapBuilder<i32, i32> = HashTrieMapBuilder::new();
        b.set(1, 1);
        let snapshot = b.to_immutable();
        b.set(2, 2);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get(&2), None);
        assert_eq!(b.len(), 2);
    }
}
