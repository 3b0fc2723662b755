// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Node algebra and tree algorithms for the AVL-indexed list.
//!
//! Every node is reached through an `Arc`, carries a `Cell<bool>` frozen
//! flag and an immutable `OwnerId` stamped at construction time. A node may
//! be mutated in place (via `Arc::get_mut`) iff it is unfrozen and stamped
//! with the identity of the builder currently operating on it; every other
//! node (frozen, or owned by a different or expired builder) is cloned
//! before mutation instead. Rotations are free functions that consume and
//! return an owned node handle, rebalancing by height/balance-factor rather
//! than red/black coloring.

use std::cell::Cell;
use std::sync::Arc;

use crate::owner::OwnerId;

pub(crate) type Link<T> = Option<Arc<AvlNode<T>>>;

pub(crate) struct AvlNode<T> {
    pub(crate) value: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) height: u32,
    pub(crate) size: usize,
    frozen: Cell<bool>,
    owner: OwnerId,
}

#[inline]
pub(crate) fn height_of<T>(link: &Link<T>) -> u32 {
    link.as_ref().map_or(0, |n| n.height)
}

#[inline]
pub(crate) fn size_of<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |n| n.size)
}

fn new_node<T>(value: T, left: Link<T>, right: Link<T>, owner: OwnerId) -> Arc<AvlNode<T>> {
    let height = 1 + height_of(&left).max(height_of(&right));
    let size = 1 + size_of(&left) + size_of(&right);
    Arc::new(AvlNode {
        value,
        left,
        right,
        height,
        size,
        frozen: Cell::new(owner == OwnerId::none()),
        owner,
    })
}

/// Produce a node with the given `value`/`left`/`right`, reusing `node`'s
/// allocation in place when it is unfrozen and owned by `owner`, cloning
/// otherwise. This is the single write-path primitive every mutator in this
/// module funnels through.
fn rebuild<T>(mut node: Arc<AvlNode<T>>, owner: OwnerId, value: T, left: Link<T>, right: Link<T>) -> Arc<AvlNode<T>> {
    let can_mutate = !node.frozen.get() && node.owner == owner;
    if can_mutate {
        if let Some(n) = Arc::get_mut(&mut node) {
            n.value = value;
            n.left = left;
            n.right = right;
            n.height = 1 + height_of(&n.left).max(height_of(&n.right));
            n.size = 1 + size_of(&n.left) + size_of(&n.right);
            return node;
        }
    }
    new_node(value, left, right, owner)
}

pub(crate) fn new_leaf<T>(value: T, owner: OwnerId) -> Arc<AvlNode<T>> {
    new_node(value, None, None, owner)
}

fn balance_factor<T>(n: &AvlNode<T>) -> i32 {
    height_of(&n.left) as i32 - height_of(&n.right) as i32
}

//            x                         pivot
//           / \                        /   \
//          a  pivot      ==>          x     c
//             / \                    / \
//            b   c                  a   b
fn rotate_left<T: Clone>(x: Arc<AvlNode<T>>, owner: OwnerId) -> Arc<AvlNode<T>> {
    let pivot = x.right.clone().expect("rotate_left requires a right child");
    let x_value = x.value.clone();
    let x_left = x.left.clone();
    let pivot_left = pivot.left.clone();
    let new_x = rebuild(x, owner, x_value, x_left, pivot_left);
    let pivot_value = pivot.value.clone();
    let pivot_right = pivot.right.clone();
    rebuild(pivot, owner, pivot_value, Some(new_x), pivot_right)
}

//              x                     pivot
//             / \                    /   \
//         pivot  c       ==>        a     x
//         /  \                           / \
//        a    b                         b   c
fn rotate_right<T: Clone>(x: Arc<AvlNode<T>>, owner: OwnerId) -> Arc<AvlNode<T>> {
    let pivot = x.left.clone().expect("rotate_right requires a left child");
    let x_value = x.value.clone();
    let x_right = x.right.clone();
    let pivot_right = pivot.right.clone();
    let new_x = rebuild(x, owner, x_value, pivot_right, x_right);
    let pivot_value = pivot.value.clone();
    let pivot_left = pivot.left.clone();
    rebuild(pivot, owner, pivot_value, pivot_left, Some(new_x))
}

/// Restore the AVL balance-factor invariant at `node`, assuming both
/// children already satisfy it (true right after a single-path edit).
pub(crate) fn rebalance<T: Clone>(node: Arc<AvlNode<T>>, owner: OwnerId) -> Arc<AvlNode<T>> {
    let bf = balance_factor(&node);
    if bf > 1 {
        let left = node.left.clone().expect("positive balance factor implies a left child");
        if balance_factor(&left) < 0 {
            let value = node.value.clone();
            let right = node.right.clone();
            let new_left = rotate_left(left, owner);
            let node = rebuild(node, owner, value, Some(new_left), right);
            rotate_right(node, owner)
        } else {
            rotate_right(node, owner)
        }
    } else if bf < -1 {
        let right = node.right.clone().expect("negative balance factor implies a right child");
        if balance_factor(&right) > 0 {
            let value = node.value.clone();
            let left = node.left.clone();
            let new_right = rotate_right(right, owner);
            let node = rebuild(node, owner, value, left, Some(new_right));
            rotate_left(node, owner)
        } else {
            rotate_left(node, owner)
        }
    } else {
        node
    }
}

pub(crate) fn get<T>(mut link: &Link<T>, mut index: usize) -> Option<&T> {
    loop {
        let n = link.as_ref()?;
        let left_size = size_of(&n.left);
        match index.cmp(&left_size) {
            std::cmp::Ordering::Equal => return Some(&n.value),
            std::cmp::Ordering::Less => link = &n.left,
            std::cmp::Ordering::Greater => {
                index -= left_size + 1;
                link = &n.right;
            }
        }
    }
}

pub(crate) fn set<T: Clone>(node: Link<T>, owner: OwnerId, index: usize, value: T) -> Link<T> {
    let mut arc = node.expect("index validated by caller");
    let left_size = size_of(&arc.left);
    match index.cmp(&left_size) {
        std::cmp::Ordering::Equal => {
            let can_mutate = !arc.frozen.get() && arc.owner == owner;
            if can_mutate {
                if let Some(n) = Arc::get_mut(&mut arc) {
                    n.value = value;
                    return Some(arc);
                }
            }
            Some(rebuild(arc.clone(), owner, value, arc.left.clone(), arc.right.clone()))
        }
        std::cmp::Ordering::Less => {
            let can_mutate = !arc.frozen.get() && arc.owner == owner;
            if can_mutate {
                if let Some(n) = Arc::get_mut(&mut arc) {
                    let left = n.left.take();
                    n.left = set(left, owner, index, value);
                    return Some(arc);
                }
            }
            let new_left = set(arc.left.clone(), owner, index, value);
            Some(rebuild(arc.clone(), owner, arc.value.clone(), new_left, arc.right.clone()))
        }
        std::cmp::Ordering::Greater => {
            let rest = index - left_size - 1;
            let can_mutate = !arc.frozen.get() && arc.owner == owner;
            if can_mutate {
                if let Some(n) = Arc::get_mut(&mut arc) {
                    let right = n.right.take();
                    n.right = set(right, owner, rest, value);
                    return Some(arc);
                }
            }
            let new_right = set(arc.right.clone(), owner, rest, value);
            Some(rebuild(arc.clone(), owner, arc.value.clone(), arc.left.clone(), new_right))
        }
    }
}

pub(crate) fn insert<T: Clone>(node: Link<T>, owner: OwnerId, index: usize, value: T) -> Link<T> {
    let mut arc = match node {
        None => return Some(new_leaf(value, owner)),
        Some(arc) => arc,
    };
    let left_size = size_of(&arc.left);
    let can_mutate = !arc.frozen.get() && arc.owner == owner;
    if index <= left_size {
        if can_mutate {
            if let Some(n) = Arc::get_mut(&mut arc) {
                let left = n.left.take();
                n.left = insert(left, owner, index, value);
                n.height = 1 + height_of(&n.left).max(height_of(&n.right));
                n.size = 1 + size_of(&n.left) + size_of(&n.right);
                return Some(rebalance(arc, owner));
            }
        }
        let new_left = insert(arc.left.clone(), owner, index, value);
        Some(rebalance(
            rebuild(arc.clone(), owner, arc.value.clone(), new_left, arc.right.clone()),
            owner,
        ))
    } else {
        let rest = index - left_size - 1;
        if can_mutate {
            if let Some(n) = Arc::get_mut(&mut arc) {
                let right = n.right.take();
                n.right = insert(right, owner, rest, value);
                n.height = 1 + height_of(&n.left).max(height_of(&n.right));
                n.size = 1 + size_of(&n.left) + size_of(&n.right);
                return Some(rebalance(arc, owner));
            }
        }
        let new_right = insert(arc.right.clone(), owner, rest, value);
        Some(rebalance(
            rebuild(arc.clone(), owner, arc.value.clone(), arc.left.clone(), new_right),
            owner,
        ))
    }
}

/// Remove and return the leftmost element of `node`, along with the
/// resulting subtree. `node` must be non-empty.
fn remove_min<T: Clone>(node: Arc<AvlNode<T>>, owner: OwnerId) -> (Link<T>, T) {
    if node.left.is_none() {
        return (node.right.clone(), node.value.clone());
    }
    let left = node.left.clone().unwrap();
    let value = node.value.clone();
    let right = node.right.clone();
    let (new_left, min_value) = remove_min(left, owner);
    let rebuilt = rebuild(node, owner, value, new_left, right);
    (Some(rebalance(rebuilt, owner)), min_value)
}

pub(crate) fn remove<T: Clone>(node: Link<T>, owner: OwnerId, index: usize) -> Link<T> {
    let arc = node.expect("index validated by caller");
    let left_size = size_of(&arc.left);
    match index.cmp(&left_size) {
        std::cmp::Ordering::Equal => match (arc.left.clone(), arc.right.clone()) {
            (None, right) => right,
            (left, None) => left,
            (Some(left), Some(right)) => {
                let (new_right, successor) = remove_min(right, owner);
                Some(rebalance(rebuild(arc, owner, successor, Some(left), new_right), owner))
            }
        },
        std::cmp::Ordering::Less => {
            let new_left = remove(arc.left.clone(), owner, index);
            Some(rebalance(
                rebuild(arc.clone(), owner, arc.value.clone(), new_left, arc.right.clone()),
                owner,
            ))
        }
        std::cmp::Ordering::Greater => {
            let new_right = remove(arc.right.clone(), owner, index - left_size - 1);
            Some(rebalance(
                rebuild(arc.clone(), owner, arc.value.clone(), arc.left.clone(), new_right),
                owner,
            ))
        }
    }
}

pub(crate) fn build_balanced<T: Clone>(items: &[T], owner: OwnerId) -> Link<T> {
    if items.is_empty() {
        return None;
    }
    let mid = items.len() / 2;
    let left = build_balanced(&items[..mid], owner);
    let right = build_balanced(&items[mid + 1..], owner);
    Some(new_node(items[mid].clone(), left, right, owner))
}

pub(crate) fn collect_inorder<T: Clone>(link: &Link<T>, out: &mut Vec<T>) {
    if let Some(n) = link {
        collect_inorder(&n.left, out);
        out.push(n.value.clone());
        collect_inorder(&n.right, out);
    }
}

/// Join two subtrees with a middle value, maintaining the AVL invariant.
/// `left` and `right` may each be empty.
pub(crate) fn join<T: Clone>(left: Link<T>, mid: T, right: Link<T>, owner: OwnerId) -> Link<T> {
    let lh = height_of(&left);
    let rh = height_of(&right);
    if lh > rh + 1 {
        let n = left.unwrap();
        let value = n.value.clone();
        let left_child = n.left.clone();
        let new_right = join(n.right.clone(), mid, right, owner);
        Some(rebalance(rebuild(n, owner, value, left_child, new_right), owner))
    } else if rh > lh + 1 {
        let n = right.unwrap();
        let value = n.value.clone();
        let right_child = n.right.clone();
        let new_left = join(left, mid, n.left.clone(), owner);
        Some(rebalance(rebuild(n, owner, value, new_left, right_child), owner))
    } else {
        Some(new_node(mid, left, right, owner))
    }
}

fn split_last<T: Clone>(node: Arc<AvlNode<T>>, owner: OwnerId) -> (Link<T>, T) {
    match node.right.clone() {
        None => (node.left.clone(), node.value.clone()),
        Some(right) => {
            let value = node.value.clone();
            let left = node.left.clone();
            let (new_right, last) = split_last(right, owner);
            let rebuilt = rebuild(node, owner, value, left, new_right);
            (Some(rebalance(rebuilt, owner)), last)
        }
    }
}

/// Join two subtrees without a middle value.
pub(crate) fn join2<T: Clone>(left: Link<T>, right: Link<T>, owner: OwnerId) -> Link<T> {
    match left {
        None => right,
        Some(n) => {
            let (rest, last) = split_last(n, owner);
            join(rest, last, right, owner)
        }
    }
}

/// Split `node` into the first `at` elements (in-order) and the rest.
pub(crate) fn split_at<T: Clone>(node: Link<T>, at: usize, owner: OwnerId) -> (Link<T>, Link<T>) {
    let n = match node {
        None => return (None, None),
        Some(n) => n,
    };
    let left_size = size_of(&n.left);
    if at <= left_size {
        let (ll, lr) = split_at(n.left.clone(), at, owner);
        (ll, join(lr, n.value.clone(), n.right.clone(), owner))
    } else {
        let (rl, rr) = split_at(n.right.clone(), at - left_size - 1, owner);
        (join(n.left.clone(), n.value.clone(), rl, owner), rr)
    }
}

pub(crate) fn freeze_reachable<T>(link: &Link<T>, owner: OwnerId) {
    if let Some(n) = link {
        if n.owner == owner && !n.frozen.get() {
            n.frozen.set(true);
            freeze_reachable(&n.left, owner);
            freeze_reachable(&n.right, owner);
        }
    }
}

#[cfg(debug_assertions)]
pub(crate) fn check_invariants<T>(link: &Link<T>) {
    if let Some(n) = link {
        assert_eq!(n.size, 1 + size_of(&n.left) + size_of(&n.right));
        assert_eq!(n.height, 1 + height_of(&n.left).max(height_of(&n.right)));
        let bf = balance_factor(n);
        assert!((-1..=1).contains(&bf), "balance factor {bf} out of range");
        check_invariants(&n.left);
        check_invariants(&n.right);
    }
}
