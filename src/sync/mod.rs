// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Lock-free, CAS-based atomic update helpers for sharing a persistent
//! container across threads through a single mutable cell.
//!
//! Built on [`arc_swap::ArcSwapOption`] rather than a hand-rolled `AtomicPtr`
//! CAS loop — `ArcSwapOption::compare_and_swap` gives exactly the
//! single-word CAS this module needs, and its `None` state is the natural
//! "uninitialized" sentinel for [`AtomicCell::interlocked_initialize`].

mod map_ext;
mod queue_ext;
mod stack_ext;

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::error::{Error, Result};

/// Compares two container values by the identity of their root pointer
/// rather than by structural equality, so [`AtomicCell::update`] can
/// short-circuit a CAS when `f` returns a value that is the *same* shared
/// tree as its input (not merely one that compares equal to it).
pub(crate) trait RefEq {
    fn ref_eq(&self, other: &Self) -> bool;
}

/// A mutable cell holding an immutable container value, updated only
/// through lock-free compare-and-swap loops.
pub struct AtomicCell<T> {
    inner: ArcSwapOption<T>,
}

impl<T> AtomicCell<T> {
    pub fn new(value: T) -> Self {
        AtomicCell { inner: ArcSwapOption::from_pointee(value) }
    }

    /// A cell with no value yet, to be published once via
    /// [`interlocked_initialize`](AtomicCell::interlocked_initialize).
    pub fn uninitialized() -> Self {
        AtomicCell { inner: ArcSwapOption::from(None) }
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.inner.load_full()
    }

    /// Unconditionally replace the cell's value, returning the previous one.
    pub fn get_and_set(&self, value: T) -> Option<Arc<T>> {
        self.inner.swap(Some(Arc::new(value)))
    }

    /// CAS from uninitialized to `value`; fails if the cell already holds a
    /// value.
    pub fn interlocked_initialize(&self, value: T) -> Result<()> {
        let prev = self.inner.compare_and_swap(&None::<Arc<T>>, Some(Arc::new(value)));
        if prev.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        Ok(())
    }
}

impl<T: RefEq> AtomicCell<T> {
    /// `v' = f(v)`; retries under contention until the CAS succeeds. `f`
    /// must be pure with respect to the cell — it may run more than once.
    pub fn update(&self, f: impl Fn(&T) -> T) -> Arc<T> {
        self.update_with_state(&(), |v, ()| f(v))
    }

    /// As [`update`](Self::update), with a captured `state` passed to every
    /// invocation of `f`.
    pub fn update_with_state<S>(&self, state: &S, f: impl Fn(&T, &S) -> T) -> Arc<T> {
        let mut current = self.inner.load_full().expect("cell is uninitialized");
        loop {
            let next = f(&current, state);
            if current.ref_eq(&next) {
                return current;
            }
            let desired = Arc::new(next);
            let prev = self.inner.compare_and_swap(&current, Some(desired.clone()));
            match prev {
                ref p if Arc::ptr_eq(p, &current) => return desired,
                Some(p) => current = p,
                None => unreachable!("cell was observed initialized above"),
            }
        }
    }

    /// Single CAS; returns `true` on success.
    pub fn compare_and_set(&self, expected: &Arc<T>, desired: T) -> bool {
        let prev = self.inner.compare_and_swap(expected, Some(Arc::new(desired)));
        Arc::ptr_eq(&prev.unwrap_or_else(|| panic!("compare_and_set against an uninitialized cell")), expected)
    }
}
