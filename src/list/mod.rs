// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! A persistent, AVL-balanced indexed list.
//!
//! Indexed by in-order rank rather than by key — `get`/`set`/`insert`/
//! `remove` all take a position in `[0, len())`. Every mutator returns a new
//! `List` that shares unaffected structure with its parent; see
//! `crate::list::node` for the node algebra this is built on.

mod builder;
mod iter;
mod node;

pub use builder::ListBuilder;
pub use iter::Iter;

use std::cmp::Ordering as CmpOrdering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::owner::OwnerId;
use crate::sync::RefEq;
use node::Link;

/// A persistent indexed list with `O(log n)` `get`/`set`/`insert`/`remove`.
pub struct List<T> {
    root: Link<T>,
}

impl<T> List<T> {
    /// The empty list.
    pub fn new() -> Self {
        List { root: None }
    }

    pub fn len(&self) -> usize {
        node::size_of(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        node::get(&self.root, index).ok_or(Error::OutOfRange { index, len: self.len() })
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root)
    }
}

impl<T: Clone> List<T> {
    /// A list containing the single element `value`.
    pub fn singleton(value: T) -> Self {
        List { root: Some(node::new_leaf(value, OwnerId::none())) }
    }

    /// Build a balanced list from a slice in `O(n)`.
    pub fn from_slice(items: &[T]) -> Self {
        List { root: node::build_balanced(items, OwnerId::none()) }
    }

    pub fn set(&self, index: usize, value: T) -> Result<Self> {
        let len = self.len();
        if index >= len {
            return Err(Error::OutOfRange { index, len });
        }
        Ok(List { root: node::set(self.root.clone(), OwnerId::none(), index, value) })
    }

    pub fn insert(&self, index: usize, value: T) -> Result<Self> {
        let len = self.len();
        if index > len {
            return Err(Error::OutOfRange { index, len });
        }
        Ok(List { root: node::insert(self.root.clone(), OwnerId::none(), index, value) })
    }

    pub fn push_back(&self, value: T) -> Self {
        self.insert(self.len(), value).expect("appending is always in range")
    }

    pub fn push_front(&self, value: T) -> Self {
        self.insert(0, value).expect("prepending is always in range")
    }

    pub fn remove(&self, index: usize) -> Result<Self> {
        let len = self.len();
        if index >= len {
            return Err(Error::OutOfRange { index, len });
        }
        Ok(List { root: node::remove(self.root.clone(), OwnerId::none(), index) })
    }

    /// The contiguous sub-range `[from, to)` as a new, independently balanced
    /// list, built in `O(log n + (to - from))`.
    pub fn sub_list(&self, from: usize, to: usize) -> Result<Self> {
        let len = self.len();
        if from > to || to > len {
            return Err(Error::OutOfRange { index: to, len });
        }
        let owner = OwnerId::none();
        let (_, tail) = node::split_at(self.root.clone(), from, owner);
        let (middle, _) = node::split_at(tail, to - from, owner);
        Ok(List { root: middle })
    }

    /// Remove the contiguous sub-range `[from, to)`, splicing the remainder
    /// back together in `O(log n + (to - from))`.
    pub fn remove_range(&self, from: usize, to: usize) -> Result<Self> {
        let len = self.len();
        if from > to || to > len {
            return Err(Error::OutOfRange { index: to, len });
        }
        let owner = OwnerId::none();
        let (prefix, rest) = node::split_at(self.root.clone(), from, owner);
        let (_, suffix) = node::split_at(rest, to - from, owner);
        Ok(List { root: node::join2(prefix, suffix, owner) })
    }

    /// Reverse the contiguous sub-range `[from, to)` in place (functionally):
    /// the affected span is collected into a buffer, reversed, and rebuilt
    /// into a freshly balanced subtree before being spliced back in.
    pub fn reverse(&self, from: usize, to: usize) -> Result<Self> {
        self.rebuild_range(from, to, |buf| buf.reverse())
    }

    /// Sort the contiguous sub-range `[from, to)` using `compare`.
    pub fn sort(&self, from: usize, to: usize, compare: impl FnMut(&T, &T) -> CmpOrdering) -> Result<Self> {
        let mut compare = compare;
        self.rebuild_range(from, to, move |buf| buf.sort_by(&mut compare))
    }

    fn rebuild_range(&self, from: usize, to: usize, edit: impl FnOnce(&mut Vec<T>)) -> Result<Self> {
        let len = self.len();
        if from > to || to > len {
            return Err(Error::OutOfRange { index: to, len });
        }
        let owner = OwnerId::none();
        let (prefix, rest) = node::split_at(self.root.clone(), from, owner);
        let (middle, suffix) = node::split_at(rest, to - from, owner);
        let mut buf = Vec::with_capacity(to - from);
        node::collect_inorder(&middle, &mut buf);
        edit(&mut buf);
        let rebuilt = node::build_balanced(&buf, owner);
        let spliced = node::join2(node::join2(prefix, rebuilt, owner), suffix, owner);
        Ok(List { root: spliced })
    }

    /// Start a transient builder pre-populated with this list's elements.
    pub fn to_builder(&self) -> ListBuilder<T> {
        ListBuilder::from_list(self)
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        List::new()
    }
}

impl<T> Clone for List<T> {
    fn clone(&self) -> Self {
        List { root: self.root.clone() }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T: Hash> Hash for List<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items: Vec<T> = iter.into_iter().collect();
        List::from_slice(&items)
    }
}

impl<T> RefEq for List<T> {
    fn ref_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(debug_assertions)]
impl<T> List<T> {
    pub(crate) fn check_invariants(&self) {
        node::check_invariants(&self.root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_zero_len() {
        let l: List<i32> = List::new();
        assert_eq!(l.len(), 0);
        assert!(l.is_empty());
    }

    #[test]
    fn get_out_of_range() {
        let l = List::from_slice(&[1, 2, 3]);
        assert_eq!(l.get(3), Err(Error::OutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn insert_preserves_order_and_shares_structure() {
        let l0 = List::from_slice(&[1, 2, 3, 4, 5]);
        let l1 = l0.insert(2, 99).unwrap();
        assert_eq!(l1.iter().copied().collect::<Vec<_>>(), vec![1, 2, 99, 3, 4, 5]);
        assert_eq!(l0.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        l1.check_invariants();
        l0.check_invariants();
    }

    #[test]
    fn remove_then_get() {
        let l0 = List::from_slice(&[1, 2, 3, 4, 5]);
        let l1 = l0.remove(0).unwrap();
        assert_eq!(l1.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
        l1.check_invariants();
    }

    #[test]
    fn sub_list_and_remove_range() {
        let l0 = List::from_slice(&[0, 1, 2, 3, 4, 5, 6]);
        let mid = l0.sub_list(2, 5).unwrap();
        assert_eq!(mid.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);

        let trimmed = l0.remove_range(2, 5).unwrap();
        assert_eq!(trimmed.iter().copied().collect::<Vec<_>>(), vec![0, 1, 5, 6]);
        trimmed.check_invariants();
    }

    #[test]
    fn reverse_and_sort_ranges() {
        let l0 = List::from_slice(&[5, 4, 3, 2, 1]);
        let reversed = l0.reverse(1, 4).unwrap();
        assert_eq!(reversed.iter().copied().collect::<Vec<_>>(), vec![5, 2, 3, 4, 1]);

        let sorted = l0.sort(0, 5, |a, b| a.cmp(b)).unwrap();
        assert_eq!(sorted.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        sorted.check_invariants();
    }

    #[test]
    fn equality_is_structural_and_order_sensitive() {
        let a = List::from_slice(&[1, 2, 3]);
        let b = List::from_slice(&[1, 2, 3]);
        let c = List::from_slice(&[3, 2, 1]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
