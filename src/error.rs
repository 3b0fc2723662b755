// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! The closed set of error conditions surfaced by this crate.

use thiserror::Error;

/// Errors returned by the persistent containers and their builders.
///
/// This set is intentionally closed: `KeyAbsent` and `KeyPresent` from the
/// design notes are not variants here, since the atomic `try_*` helpers
/// report them as a plain `false`/`None` return rather than an error (see
/// `crate::sync`).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// An index or sub-range fell outside a container's bounds.
    #[error("index {index} out of range for length {len}")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// The container's length at the time of the call.
        len: usize,
    },

    /// `peek`/`poll`/`pop` was called on an empty queue or stack.
    #[error("operation requires a non-empty container")]
    EmptyContainer,

    /// `interlocked_initialize` was called on a cell that already holds a
    /// value.
    #[error("cell was already initialized")]
    AlreadyInitialized,

    /// A builder was used after `move_to_immutable`, or `move_to_immutable`
    /// was called while capacity and length disagreed.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// A `None` key or value was passed to a container that was asked to
    /// reject it.
    #[error("null element is not permitted here")]
    NullElement,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
