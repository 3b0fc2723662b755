// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! `getOrAdd`/`addOrUpdate`/`tryAdd`/`tryUpdate`/`tryRemove`, specialized to
//! a cell holding a [`HashTrieMap`].

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use crate::map::HashTrieMap;

use super::AtomicCell;

impl<K: Clone + Eq + Hash, V: Clone + PartialEq, S: BuildHasher + Clone> AtomicCell<HashTrieMap<K, V, S>> {
    /// Look up `key`; if present, return its existing value without
    /// invoking `factory`. Otherwise compute `v = factory(&key)` and CAS it
    /// in; on a losing race, re-look-up and return the winner's value
    /// (which may differ from `v`) without re-invoking `factory`.
    pub fn get_or_add(&self, key: K, factory: impl Fn(&K) -> V) -> V {
        loop {
            let current = self.get().expect("cell is uninitialized");
            if let Some(existing) = current.get(&key) {
                return existing.clone();
            }
            let value = factory(&key);
            let (next, _) = current.insert(key.clone(), value.clone());
            let desired = Arc::new(next);
            let prev = self.cas_raw(&current, desired.clone());
            if Arc::ptr_eq(&prev, &current) {
                return value;
            }
        }
    }

    /// Apply `add_fn(&key)` if `key` is absent, else `update_fn(&key,
    /// &existing)`; CAS the result in, retrying on contention.
    pub fn add_or_update(&self, key: K, add_fn: impl Fn(&K) -> V, update_fn: impl Fn(&K, &V) -> V) -> V {
        loop {
            let current = self.get().expect("cell is uninitialized");
            let value = match current.get(&key) {
                Some(existing) => update_fn(&key, existing),
                None => add_fn(&key),
            };
            let (next, _) = current.insert(key.clone(), value.clone());
            let desired = Arc::new(next);
            let prev = self.cas_raw(&current, desired.clone());
            if Arc::ptr_eq(&prev, &current) {
                return value;
            }
        }
    }

    /// Insert `key`/`value` only if `key` is absent. Returns `false` without
    /// retrying the factory/caller's intent if it is already present — a
    /// plain boolean, not an `Error`, per the closed error set's contract
    /// that key-presence outcomes are never exceptional.
    pub fn try_add(&self, key: K, value: V) -> bool {
        loop {
            let current = self.get().expect("cell is uninitialized");
            if current.contains_key(&key) {
                return false;
            }
            let (next, _) = current.insert(key.clone(), value.clone());
            let desired = Arc::new(next);
            let prev = self.cas_raw(&current, desired);
            if Arc::ptr_eq(&prev, &current) {
                return true;
            }
        }
    }

    /// Replace `key`'s value with `new_value` only if its current value
    /// equals `expected_old`.
    pub fn try_update(&self, key: K, expected_old: &V, new_value: V) -> bool {
        loop {
            let current = self.get().expect("cell is uninitialized");
            match current.get(&key) {
                Some(existing) if existing == expected_old => {}
                _ => return false,
            }
            let (next, _) = current.insert(key.clone(), new_value.clone());
            let desired = Arc::new(next);
            let prev = self.cas_raw(&current, desired);
            if Arc::ptr_eq(&prev, &current) {
                return true;
            }
        }
    }

    /// Remove `key` if present, returning its value.
    pub fn try_remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + PartialEq + ?Sized,
    {
        loop {
            let current = self.get().expect("cell is uninitialized");
            let (next, removed) = current.remove(key);
            let removed = removed?;
            let desired = Arc::new(next);
            let prev = self.cas_raw(&current, desired);
            if Arc::ptr_eq(&prev, &current) {
                return Some(removed);
            }
        }
    }

    fn cas_raw(&self, current: &Arc<HashTrieMap<K, V, S>>, desired: Arc<HashTrieMap<K, V, S>>) -> Arc<HashTrieMap<K, V, S>> {
        self.inner
            .compare_and_swap(current, Some(desired))
            .unwrap_or_else(|| panic!("cell observed initialized above"))
    }
}
