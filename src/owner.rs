// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Builder identity tokens.
//!
//! Every node created inside a builder is stamped with the builder's
//! [`OwnerId`]. A node may be mutated in place iff it is unfrozen *and*
//! stamped with the identity of the builder currently operating on it;
//! every other node (frozen, or owned by a different/expired builder) must
//! be cloned before mutation. A node carries this frozen/owned state
//! directly rather than through a separate pointer-indirection layer, since
//! nothing here needs to track on-disk or cross-process identity.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OWNER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a single builder instance.
///
/// Two `OwnerId`s compare equal iff they were minted for the same builder.
/// `OwnerId::none()` never compares equal to any minted id, and is what
/// freshly-frozen (published) nodes are stamped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Mint a fresh, globally unique owner id for a new builder.
    pub fn fresh() -> Self {
        OwnerId(NEXT_OWNER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The id stamped on nodes that belong to no builder (immutable,
    /// published values created outside of any builder).
    pub const fn none() -> Self {
        OwnerId(0)
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        OwnerId::none()
    }
}
