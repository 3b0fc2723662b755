// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! End-to-end scenarios exercising each container's core guarantees:
//! structural sharing, hash-collision handling, queue amortization, builder
//! freeze semantics, atomic-cell races, and range operations.

use std::hash::{BuildHasher, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pcollections::factory;
use pcollections::map::HashTrieMap;
use pcollections::sync::AtomicCell;

#[test]
fn list_path_copy() {
    let l = factory::list::create_all(0..10);
    let l2 = l.set(5, 99).unwrap();

    assert_eq!(*l.get(5).unwrap(), 5);
    assert_eq!(*l2.get(5).unwrap(), 99);
    assert_eq!(*l2.get(4).unwrap(), 4);
    assert_eq!(l2.len(), 10);
    assert_ne!(l, l2);
}

/// A `BuildHasher` that maps every key to hash `0`, forcing every insert
/// into the same HAMT bucket regardless of the key's real identity.
#[derive(Clone, Default)]
struct ZeroHashBuilder;

struct ZeroHasher;

impl Hasher for ZeroHasher {
    fn finish(&self) -> u64 {
        0
    }

    fn write(&mut self, _bytes: &[u8]) {}
}

impl BuildHasher for ZeroHashBuilder {
    type Hasher = ZeroHasher;

    fn build_hasher(&self) -> Self::Hasher {
        ZeroHasher
    }
}

#[test]
fn hamt_hash_collisions() {
    let m: HashTrieMap<&str, i32, ZeroHashBuilder> = HashTrieMap::with_hasher(ZeroHashBuilder);
    let (m, _) = m.insert("a", 1);
    let (m, _) = m.insert("b", 2);
    let (m, _) = m.insert("c", 3);

    assert_eq!(m.len(), 3);
    assert_eq!(m.get("a"), Some(&1));
    assert_eq!(m.get("b"), Some(&2));
    assert_eq!(m.get("c"), Some(&3));

    let (m, removed) = m.remove("b");
    assert_eq!(removed, Some(2));
    assert_eq!(m.len(), 2);
    assert!(!m.contains_key("b"));
}

#[test]
fn queue_amortization_over_a_long_run() {
    let mut q = factory::queue::create::<i32>();
    for i in 1..=1000 {
        q = q.enqueue(i);
    }
    let mut polled = Vec::with_capacity(1000);
    for _ in 0..1000 {
        let (next, value) = q.dequeue().unwrap();
        polled.push(value);
        q = next;
    }
    assert_eq!(polled, (1..=1000).collect::<Vec<_>>());
    assert!(q.is_empty());
}

#[test]
fn builder_freeze_shares_untouched_nodes() {
    let mut b = factory::list::create_builder::<i32>();
    for i in 1..=100 {
        b.push_back(i);
    }
    let snapshot_1 = b.to_immutable();
    b.push_back(101);
    let snapshot_2 = b.to_immutable();

    assert_eq!(snapshot_1.len(), 100);
    assert_eq!(snapshot_2.len(), 101);
    for i in 0..100 {
        assert_eq!(snapshot_1.get(i).unwrap(), snapshot_2.get(i).unwrap());
    }
}

#[test]
fn atomic_get_or_add_race_yields_one_winner() {
    let cell = Arc::new(AtomicCell::new(HashTrieMap::<&str, Arc<i32>>::new()));
    let factory_calls = Arc::new(AtomicUsize::new(0));

    let spawn = |cell: Arc<AtomicCell<HashTrieMap<&str, Arc<i32>>>>, calls: Arc<AtomicUsize>| {
        std::thread::spawn(move || {
            cell.get_or_add("k", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                Arc::new(42)
            })
        })
    };

    let t1 = spawn(cell.clone(), factory_calls.clone());
    let t2 = spawn(cell.clone(), factory_calls.clone());

    let v1 = t1.join().unwrap();
    let v2 = t2.join().unwrap();

    assert_eq!(*v1, 42);
    assert_eq!(*v2, 42);
    assert!(factory_calls.load(Ordering::SeqCst) <= 2);

    let final_map = cell.get().unwrap();
    assert_eq!(final_map.len(), 1);
}

#[test]
fn sorted_sub_range() {
    let l = factory::list::create_all([3, 1, 4, 1, 5, 9, 2, 6]);
    let sorted = l.sort(2, 6, |a: &i32, b: &i32| a.cmp(b)).unwrap();
    let expected = vec![3, 1, 1, 4, 5, 9, 2, 6];
    assert_eq!(sorted.iter().copied().collect::<Vec<_>>(), expected);
}
