// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Transient builder for [`super::List`].
//!
//! A `ListBuilder` amortizes a run of edits: each mutator stamps newly
//! touched nodes with the builder's own [`OwnerId`] and mutates them in
//! place on subsequent calls instead of path-copying every time. Calling
//! [`ListBuilder::to_immutable`] freezes every node the builder currently
//! owns (transitively, stopping at already-frozen subtrees) so the returned
//! snapshot can never be observed to change underneath a caller, while the
//! builder itself stays usable for further edits.

use std::cmp::Ordering as CmpOrdering;

use crate::error::{Error, Result};
use crate::owner::OwnerId;

use super::node::{self, Link};
use super::List;

pub struct ListBuilder<T> {
    root: Link<T>,
    owner: OwnerId,
}

impl<T> ListBuilder<T> {
    pub fn new() -> Self {
        ListBuilder { root: None, owner: OwnerId::fresh() }
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

    pub fn iter(&self) -> super::Iter<'_, T> {
        super::Iter::new(&self.root)
    }
}

impl<T: Clone> ListBuilder<T> {
    pub(crate) fn from_list(list: &List<T>) -> Self {
        ListBuilder { root: list.root.clone(), owner: OwnerId::fresh() }
    }

    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(Error::OutOfRange { index, len });
        }
        self.root = node::set(self.root.take(), self.owner, index, value);
        Ok(())
    }

    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(Error::OutOfRange { index, len });
        }
        self.root = node::insert(self.root.take(), self.owner, index, value);
        Ok(())
    }

    pub fn push_back(&mut self, value: T) {
        let len = self.len();
        self.insert(len, value).expect("appending is always in range");
    }

    pub fn push_front(&mut self, value: T) {
        self.insert(0, value).expect("prepending is always in range");
    }

    pub fn remove(&mut self, index: usize) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(Error::OutOfRange { index, len });
        }
        self.root = node::remove(self.root.take(), self.owner, index);
        Ok(())
    }

    pub fn sort(&mut self, compare: impl FnMut(&T, &T) -> CmpOrdering) {
        let mut buf = Vec::with_capacity(self.len());
        node::collect_inorder(&self.root, &mut buf);
        buf.sort_by(compare);
        self.root = node::build_balanced(&buf, self.owner);
    }

    /// Freeze every node currently owned by this builder and return an
    /// immutable snapshot that shares structure with it. The builder remains
    /// usable; further edits allocate fresh, freshly mutable nodes.
    pub fn to_immutable(&self) -> List<T> {
        node::freeze_reachable(&self.root, self.owner);
        List { root: self.root.clone() }
    }
}

impl<T> Default for ListBuilder<T> {
    fn default() -> Self {
        ListBuilder::new()
    }
}

impl<'a, T> IntoIterator for &'a ListBuilder<T> {
    type Item = &'a T;
    type IntoIter = super::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_round_trips_through_immutable() {
        let mut b = ListBuilder::new();
        b.push_back(1);
        b.push_back(2);
        b.push_back(3);
        let snapshot = b.to_immutable();
        assert_eq!(snapshot.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);

        b.push_back(4);
        let snapshot2 = b.to_immutable();
        assert_eq!(snapshot.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(snapshot2.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn from_list_then_edit_does_not_mutate_source() {
        let list = List::from_slice(&[1, 2, 3]);
        let mut b = list.to_builder();
        b.set(0, 99).unwrap();
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(b.to_immutable().iter().copied().collect::<Vec<_>>(), vec![99, 2, 3]);
    }
}
