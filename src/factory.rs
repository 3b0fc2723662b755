// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Uniform `create`/`create_all`/`create_builder` constructors per container
//! kind, so call sites read the same way across list/map/set/queue/stack
//! instead of five differently-named sets of inherent constructors.

pub mod list {
    use crate::list::{List, ListBuilder};

    pub fn create<T>() -> List<T> {
        List::new()
    }

    pub fn create_all<T: Clone>(items: impl IntoIterator<Item = T>) -> List<T> {
        items.into_iter().collect()
    }

    pub fn create_builder<T>() -> ListBuilder<T> {
        ListBuilder::new()
    }
}

pub mod map {
    use std::collections::hash_map::RandomState;
    use std::hash::Hash;

    use crate::map::{HashTrieMap, HashTrieMapBuilder};

    pub fn create<K, V>() -> HashTrieMap<K, V, RandomState> {
        HashTrieMap::new()
    }

    pub fn create_all<K: Clone + Eq + Hash, V: Clone + PartialEq>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> HashTrieMap<K, V, RandomState> {
        entries.into_iter().collect()
    }

    pub fn create_builder<K, V>() -> HashTrieMapBuilder<K, V, RandomState> {
        HashTrieMapBuilder::new()
    }
}

pub mod set {
    use std::collections::hash_map::RandomState;
    use std::hash::Hash;

    use crate::set::{HashTrieSet, HashTrieSetBuilder};

    pub fn create<T>() -> HashTrieSet<T, RandomState> {
        HashTrieSet::new()
    }

    pub fn create_all<T: Clone + Eq + Hash>(items: impl IntoIterator<Item = T>) -> HashTrieSet<T, RandomState> {
        items.into_iter().collect()
    }

    pub fn create_builder<T>() -> HashTrieSetBuilder<T, RandomState> {
        HashTrieSetBuilder::new()
    }
}

pub mod queue {
    use crate::queue::{Queue, QueueBuilder};

    pub fn create<T>() -> Queue<T> {
        Queue::new()
    }

    pub fn create_all<T: Clone>(items: impl IntoIterator<Item = T>) -> Queue<T> {
        items.into_iter().collect()
    }

    pub fn create_builder<T>() -> QueueBuilder<T> {
        QueueBuilder::new()
    }
}

pub mod stack {
    use crate::stack::{Stack, StackBuilder};

    pub fn create<T>() -> Stack<T> {
        Stack::new()
    }

    pub fn create_all<T>(items: impl IntoIterator<Item = T>) -> Stack<T> {
        items.into_iter().collect()
    }

    pub fn create_builder<T>() -> StackBuilder<T> {
        StackBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_names_construct_each_container() {
        let l = list::create_all([1, 2, 3]);
        assert_eq!(l.len(), 3);
        let m = map::create_all([(1, "a"), (2, "b")]);
        assert_eq!(m.len(), 2);
        let s = set::create_all([1, 2, 2]);
        assert_eq!(s.len(), 2);
        let q = queue::create_all([1, 2, 3]);
        assert_eq!(q.len(), 3);
        let st = stack::create_all([1, 2, 3]);
        assert_eq!(st.len(), 3);
    }
}
