// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::model::index::ClassIndex;
use fxhash::FxHashMap;
use smallvec::SmallVec;
use std::{collections::BTreeMap, hash::Hash};

/// Classes present per `(key, cell)`, where the key is a room or a course
/// and the cell a (week, day) pair. Empty entries are removed.
#[derive(Debug, Clone)]
pub struct Occupancy<K> {
    slots: FxHashMap<(K, u32), SmallVec<[ClassIndex; 4]>>,
}

impl<K> Default for Occupancy<K> {
    fn default() -> Self {
        Self {
            slots: FxHashMap::default(),
        }
    }
}

impl<K: Copy + Eq + Hash + Ord> Occupancy<K> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn insert(&mut self, key: K, cell: u32, class: ClassIndex) {
        let entry = self.slots.entry((key, cell)).or_default();
        debug_assert!(!entry.contains(&class));
        entry.push(class);
    }

    /// Returns `false` if `class` was not recorded at `(key, cell)`.
    #[inline]
    pub fn remove(&mut self, key: K, cell: u32, class: ClassIndex) -> bool {
        let Some(entry) = self.slots.get_mut(&(key, cell)) else {
            return false;
        };
        let Some(pos) = entry.iter().position(|&c| c == class) else {
            return false;
        };
        entry.swap_remove(pos);
        if entry.is_empty() {
            self.slots.remove(&(key, cell));
        }
        true
    }

    #[inline]
    pub fn at(&self, key: K, cell: u32) -> &[ClassIndex] {
        self.slots.get(&(key, cell)).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Number of non-empty entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Order-independent view for comparing two occupancies.
    pub fn normalized(&self) -> BTreeMap<(K, u32), Vec<ClassIndex>> {
        self.slots
            .iter()
            .map(|(&k, v)| {
                let mut v = v.to_vec();
                v.sort_unstable();
                (k, v)
            })
            .collect()
    }
}

impl<K: Copy + Eq + Hash + Ord> PartialEq for Occupancy<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.normalized() == other.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::index::RoomIndex;

    #[test]
    fn test_insert_remove_drops_empty_entries() {
        let mut occ = Occupancy::new();
        occ.insert(RoomIndex(0), 3, ClassIndex(1));
        occ.insert(RoomIndex(0), 3, ClassIndex(2));
        assert_eq!(occ.at(RoomIndex(0), 3).len(), 2);

        assert!(occ.remove(RoomIndex(0), 3, ClassIndex(1)));
        assert!(!occ.remove(RoomIndex(0), 3, ClassIndex(1)));
        assert_eq!(occ.at(RoomIndex(0), 3), &[ClassIndex(2)]);

        assert!(occ.remove(RoomIndex(0), 3, ClassIndex(2)));
        assert!(occ.is_empty());
        assert!(occ.at(RoomIndex(0), 3).is_empty());
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let mut a = Occupancy::new();
        let mut b = Occupancy::new();
        a.insert(RoomIndex(1), 0, ClassIndex(1));
        a.insert(RoomIndex(1), 0, ClassIndex(2));
        b.insert(RoomIndex(1), 0, ClassIndex(2));
        b.insert(RoomIndex(1), 0, ClassIndex(1));
        assert_eq!(a, b);
        b.insert(RoomIndex(1), 1, ClassIndex(1));
        assert_ne!(a, b);
    }
}
