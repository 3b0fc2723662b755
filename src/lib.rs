// Copyright 2021-2023 Protocol Labs
// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Persistent, structurally-shared collections.
//!
//! Four core containers, each immutable: an AVL-balanced indexed [`List`],
//! a HAMT-backed [`HashTrieMap`](map::HashTrieMap) and
//! [`HashTrieSet`](set::HashTrieSet), and a two-stack [`Queue`] built on a
//! first-class persistent [`Stack`]. Every mutator returns a new value that
//! structurally shares untouched nodes with its parent in `O(log n)` (`O(1)`
//! for the stack and queue).
//!
//! For a run of edits, each container has a transient "builder" companion
//! (`ListBuilder`, `HashTrieMapBuilder`, `HashTrieSetBuilder`,
//! `StackBuilder`, `QueueBuilder`) that mutates its own nodes in place and
//! amortizes the cost of the whole run down to the cost of one conversion
//! back to an immutable snapshot (`to_immutable`). See [`owner`] for how a
//! node's eligibility for in-place mutation is tracked.
//!
//! [`sync`] builds lock-free, CAS-based atomic update helpers (`update`,
//! `compare_and_set`, `get_or_add`, ...) on top of any of the containers
//! above, for sharing a persistent value across threads through a single
//! mutable cell.

mod error;
mod owner;

pub mod list;
pub mod map;
pub mod queue;
pub mod set;
pub mod stack;
pub mod sync;

pub mod factory;

pub use error::{Error, Result};
pub use list::{List, ListBuilder};
pub use map::{HashTrieMap, HashTrieMapBuilder};
pub use queue::{Queue, QueueBuilder};
pub use set::{HashTrieSet, HashTrieSetBuilder};
pub use stack::{Stack, StackBuilder};
