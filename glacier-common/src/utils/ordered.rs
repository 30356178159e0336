// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;

/// A duplicate-free collection that iterates in first-seen order.
///
/// The contract is "first-seen order, unique elements": the iteration
/// order of generated declarations and axioms must not depend on hash
/// iteration order, so that prover input is reproducible and diffable.
#[derive(Debug, Clone)]
pub struct InsertionOrderedSet<T> {
    items: Vec<T>,
    index: FxHashSet<T>,
}

impl<T: Clone + Eq + Hash> InsertionOrderedSet<T> {
    pub fn new() -> Self {
        InsertionOrderedSet {
            items: Vec::new(),
            index: FxHashSet::default(),
        }
    }

    /// Returns true if the item was not yet present.
    pub fn insert(&mut self, item: T) -> bool {
        if self.index.insert(item.clone()) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index.contains(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    /// Union keeping left-then-right first-seen order.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, other: I) {
        for item in other {
            self.insert(item);
        }
    }
}

impl<T: Clone + Eq + Hash> Default for InsertionOrderedSet<T> {
    fn default() -> Self {
        InsertionOrderedSet::new()
    }
}

impl<T: Clone + Eq + Hash> IntoIterator for InsertionOrderedSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: Clone + Eq + Hash> FromIterator<T> for InsertionOrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = InsertionOrderedSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Clone + Eq + Hash> PartialEq for InsertionOrderedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Clone + Eq + Hash> Eq for InsertionOrderedSet<T> {}

/// A map with unique keys that iterates in first-seen key order.
#[derive(Debug, Clone)]
pub struct InsertionOrderedMap<K, V> {
    keys: Vec<K>,
    map: FxHashMap<K, V>,
}

impl<K: Clone + Eq + Hash, V> InsertionOrderedMap<K, V> {
    pub fn new() -> Self {
        InsertionOrderedMap {
            keys: Vec::new(),
            map: FxHashMap::default(),
        }
    }

    /// Insert, replacing any previous value but keeping the key's
    /// original position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.map.insert(key.clone(), value);
        if previous.is_none() {
            self.keys.push(key);
        }
        previous
    }

    /// Insert only if the key is absent. Returns true if inserted.
    pub fn insert_if_absent(&mut self, key: K, value: V) -> bool {
        if self.map.contains_key(&key) {
            false
        } else {
            self.map.insert(key.clone(), value);
            self.keys.push(key);
            true
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.keys.iter().map(move |key| (key, &self.map[key]))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.keys.iter().map(move |key| &self.map[key])
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.map.clear();
    }

    /// Left-biased union: entries of `other` are appended in their own
    /// order, but keys already present keep the existing value.
    pub fn extend_absent(&mut self, other: InsertionOrderedMap<K, V>) {
        let InsertionOrderedMap { keys, mut map } = other;
        for key in keys {
            if let Some(value) = map.remove(&key) {
                self.insert_if_absent(key, value);
            }
        }
    }
}

impl<K: Clone + Eq + Hash, V> Default for InsertionOrderedMap<K, V> {
    fn default() -> Self {
        InsertionOrderedMap::new()
    }
}

impl<K: Clone + Eq + Hash, V: PartialEq> PartialEq for InsertionOrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.map == other.map
    }
}

impl<K: Clone + Eq + Hash, V: Eq> Eq for InsertionOrderedMap<K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_keeps_first_seen_order() {
        let mut set = InsertionOrderedSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert!(set.insert("c"));
        assert_eq!(set.as_slice(), &["b", "a", "c"]);
    }

    #[test]
    fn set_union_is_left_then_right() {
        let mut left: InsertionOrderedSet<_> = ["x", "y"].into_iter().collect();
        let right: InsertionOrderedSet<_> = ["y", "z"].into_iter().collect();
        left.extend(right);
        assert_eq!(left.as_slice(), &["x", "y", "z"]);
    }

    #[test]
    fn map_keeps_first_seen_key_order() {
        let mut map = InsertionOrderedMap::new();
        map.insert("b", 1);
        map.insert("a", 2);
        map.insert("b", 3);
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(map.get(&"b"), Some(&3));
    }

    #[test]
    fn map_left_biased_union() {
        let mut left = InsertionOrderedMap::new();
        left.insert("l1", 1);
        let mut right = InsertionOrderedMap::new();
        right.insert("l2", 2);
        right.insert("l1", 99);
        left.extend_absent(right);
        let entries: Vec<_> = map_entries(&left);
        assert_eq!(entries, vec![("l1", 1), ("l2", 2)]);
    }

    fn map_entries(map: &InsertionOrderedMap<&'static str, i32>) -> Vec<(&'static str, i32)> {
        map.iter().map(|(k, v)| (*k, *v)).collect()
    }
}
