// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! `push`/`tryPop` CAS-loop analogues, specialized to a cell holding a
//! [`Stack`].

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::stack::Stack;

use super::AtomicCell;

impl<T: Clone> AtomicCell<Stack<T>> {
    /// Push `value` onto the cell's stack, retrying under contention.
    pub fn push(&self, value: T) {
        loop {
            let current = self.get().expect("cell is uninitialized");
            let desired = Arc::new(current.push(value.clone()));
            let prev = self
                .inner_compare_and_swap(&current, desired);
            if Arc::ptr_eq(&prev, &current) {
                return;
            }
        }
    }

    /// Pop the top element, if any, retrying under contention.
    pub fn try_pop(&self) -> Result<T> {
        loop {
            let current = self.get().expect("cell is uninitialized");
            let (next, value) = match current.pop() {
                Ok((next, value)) => (next, value.clone()),
                Err(Error::EmptyContainer) => return Err(Error::EmptyContainer),
                Err(e) => return Err(e),
            };
            let desired = Arc::new(next);
            let prev = self.inner_compare_and_swap(&current, desired);
            if Arc::ptr_eq(&prev, &current) {
                return Ok(value);
            }
        }
    }

    fn inner_compare_and_swap(&self, current: &Arc<Stack<T>>, desired: Arc<Stack<T>>) -> Arc<Stack<T>> {
        self.inner
            .compare_and_swap(current, Some(desired))
            .unwrap_or_else(|| panic!("cell observed initialized above"))
    }
}
