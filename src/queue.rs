// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! A persistent FIFO queue built from two [`Stack`]s.
//!
//! New elements are pushed onto `back`; `dequeue` pops from `front`, and
//! only when `front` runs dry is `back` reversed into a fresh `front` — the
//! classic two-stack ("batched") queue, amortized `O(1)` per operation
//! across a single-threaded sequence of uses. As with any purely functional
//! queue built this way, repeatedly dequeuing from the *same* stale handle
//! rather than always continuing from the latest one can force the same
//! rotation to happen more than once; the amortized bound holds under
//! ordinary (non-adversarial-replay) usage.

use std::fmt;

use crate::error::{Error, Result};
use crate::stack::Stack;
use crate::sync::RefEq;

/// A persistent FIFO queue.
pub struct Queue<T> {
    front: Stack<T>,
    back: Stack<T>,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Queue { front: Stack::new(), back: Stack::new() }
    }

    pub fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_empty() && self.back.is_empty()
    }

    pub fn enqueue(&self, value: T) -> Self {
        Queue { front: self.front.clone(), back: self.back.push(value) }
    }

    /// Iterate in FIFO (dequeue) order.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut back_items: Vec<&T> = self.back.iter().collect();
        back_items.reverse();
        Iter { front: self.front.iter(), back_rev: back_items.into_iter() }
    }
}

impl<T: Clone> Queue<T> {
    /// The least-recently-enqueued element still present.
    pub fn peek(&self) -> Result<T> {
        if let Ok(v) = self.front.peek() {
            return Ok(v.clone());
        }
        let (_, value) = self.dequeue()?;
        Ok(value)
    }

    /// Remove and return the least-recently-enqueued element, along with the
    /// resulting queue.
    pub fn dequeue(&self) -> Result<(Self, T)> {
        if let Ok((new_front, value)) = self.front.pop() {
            return Ok((Queue { front: new_front, back: self.back.clone() }, value.clone()));
        }
        if self.back.is_empty() {
            return Err(Error::EmptyContainer);
        }
        let rotated_front: Stack<T> = self.back.iter().cloned().collect();
        let (new_front, value) = rotated_front.pop().expect("back was just confirmed non-empty");
        Ok((Queue { front: new_front, back: Stack::new() }, value.clone()))
    }

    pub fn to_builder(&self) -> QueueBuilder<T> {
        QueueBuilder { queue: self.clone() }
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Queue::new()
    }
}

impl<T> Clone for Queue<T> {
    fn clone(&self) -> Self {
        Queue { front: self.front.clone(), back: self.back.clone() }
    }
}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Queue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Queue<T> {}

impl<T> RefEq for Queue<T> {
    fn ref_eq(&self, other: &Self) -> bool {
        self.front.ref_eq(&other.front) && self.back.ref_eq(&other.back)
    }
}

/// Iterator over a [`Queue`] in FIFO order.
pub struct Iter<'a, T> {
    front: crate::stack::Iter<'a, T>,
    back_rev: std::vec::IntoIter<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.front.next().or_else(|| self.back_rev.next())
    }
}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut q = Queue::new();
        for item in iter {
            q = q.enqueue(item);
        }
        q
    }
}

/// Transient builder for [`Queue`].
pub struct QueueBuilder<T> {
    queue: Queue<T>,
}

impl<T> QueueBuilder<T> {
    pub fn new() -> Self {
        QueueBuilder { queue: Queue::new() }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn enqueue(&mut self, value: T) {
        self.queue = self.queue.enqueue(value);
    }

    pub fn enqueue_all(&mut self, values: impl IntoIterator<Item = T>) {
        for value in values {
            self.enqueue(value);
        }
    }
}

impl<T: Clone> QueueBuilder<T> {
    pub fn dequeue(&mut self) -> Result<T> {
        let (rest, value) = self.queue.dequeue()?;
        self.queue = rest;
        Ok(value)
    }

    pub fn to_immutable(&self) -> Queue<T> {
        self.queue.clone()
    }
}

impl<T> Default for QueueBuilder<T> {
    fn default() -> Self {
        QueueBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_preserved_across_rotation() {
        let q = Queue::new().enqueue(1).enqueue(2).enqueue(3);
        let (q, v) = q.dequeue().unwrap();
        assert_eq!(v, 1);
        let (q, v) = q.dequeue().unwrap();
        assert_eq!(v, 2);
        let q = q.enqueue(4);
        let (q, v) = q.dequeue().unwrap();
        assert_eq!(v, 3);
        let (_, v) = q.dequeue().unwrap();
        assert_eq!(v, 4);
    }

    #[test]
    fn dequeue_empty_is_error() {
        let q: Queue<i32> = Queue::new();
        assert_eq!(q.dequeue().err(), Some(Error::EmptyContainer));
    }

    #[test]
    fn enqueue_does_not_mutate_source() {
        let q0 = Queue::new().enqueue(1);
        let q1 = q0.enqueue(2);
        assert_eq!(q0.len(), 1);
        assert_eq!(q1.len(), 2);
    }

    #[test]
    fn builder_amortizes_a_run_of_enqueues() {
        let mut b = QueueBuilder::new();
        b.enqueue_all([1, 2, 3, 4]);
        assert_eq!(b.dequeue().unwrap(), 1);
        let snapshot = b.to_immutable();
        assert_eq!(snapshot.len(), 3);
    }
}
