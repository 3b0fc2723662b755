// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! `enqueue`/`tryPoll` CAS-loop analogues, specialized to a cell holding a
//! [`Queue`].

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::queue::Queue;

use super::AtomicCell;

impl<T: Clone> AtomicCell<Queue<T>> {
    /// Enqueue `value`, retrying under contention.
    pub fn enqueue(&self, value: T) {
        loop {
            let current = self.get().expect("cell is uninitialized");
            let desired = Arc::new(current.enqueue(value.clone()));
            let prev = self.inner_compare_and_swap(&current, desired);
            if Arc::ptr_eq(&prev, &current) {
                return;
            }
        }
    }

    /// Dequeue the least-recently-enqueued element, if any, retrying under
    /// contention.
    pub fn try_poll(&self) -> Result<T> {
        loop {
            let current = self.get().expect("cell is uninitialized");
            let (next, value) = match current.dequeue() {
                Ok((next, value)) => (next, value),
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

    fn inner_compare_and_swap(&self, current: &Arc<Queue<T>>, desired: Arc<Queue<T>>) -> Arc<Queue<T>> {
        self.inner
            .compare_and_swap(current, Some(desired))
            .unwrap_or_else(|| panic!("cell observed initialized above"))
    }
}
