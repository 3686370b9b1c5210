//! Insertion-ordered hash map using Robin Hood open addressing.
//!
//! # Layout
//!
//! Entries live in an arena (`Vec<Option<Entry>>` plus a free list) and are
//! chained into a doubly-linked insertion-order list by arena index. The
//! bucket array only stores `(arena index, hash, probe)` triples, so growing
//! the table rehashes buckets without touching the arena or the order list.
//!
//! # Probing
//!
//! Insertion starts at `hash % capacity`. An incoming bucket that has probed
//! further than the current occupant takes its slot and the occupant keeps
//! probing. Lookup stops as soon as it meets an occupant whose probe count
//! is below the number of probes already made: the key would have displaced
//! that occupant had it been present.
//!
//! Deletion uses backward shift: following buckets with a non-zero probe
//! count slide back by one until an empty slot or a home-bucket occupant.

use std::fmt;
use std::hash::{BuildHasher, Hash};

use rustc_hash::FxBuildHasher;

/// Initial bucket count.
const MIN_CAPACITY: usize = 16;

/// Load factor above which the bucket array doubles.
const MAX_LOAD: f64 = 0.9;

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    entry: usize,
    hash: u64,
    probe: usize,
}

/// A hash map that iterates in insertion order.
///
/// Re-inserting a present key replaces its value in place and keeps its
/// position. `get` and `remove` return `None` for absent keys, which stays
/// distinct from a stored `None` when `V` is itself an `Option`.
///
/// # Examples
///
/// ```
/// use package_routing::collections::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.insert("c", 3);
/// map.insert("a", 1);
/// map.insert("b", 2);
/// map.insert("a", 10);
///
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, vec!["c", "a", "b"]);
/// assert_eq!(map.get(&"a"), Some(&10));
///
/// assert_eq!(map.remove(&"c"), Some(3));
/// assert_eq!(map.get(&"c"), None);
/// ```
#[derive(Clone)]
pub struct OrderedMap<K, V, S = FxBuildHasher> {
    buckets: Vec<Option<Bucket>>,
    entries: Vec<Option<Entry<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
    hasher: S,
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map with the default bucket count.
    pub fn new() -> Self {
        Self::with_capacity_and_hasher(MIN_CAPACITY, FxBuildHasher)
    }

    /// Creates an empty map with at least `capacity` buckets.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, FxBuildHasher)
    }
}

impl<K, V, S> OrderedMap<K, V, S> {
    /// Creates an empty map with at least `capacity` buckets and the given hasher.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            buckets: vec![None; capacity.max(MIN_CAPACITY)],
            entries: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            hasher,
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current bucket count.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Iterates `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            entries: &self.entries,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Iterates `(key, &mut value)` pairs in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> + '_ {
        let order: Vec<usize> = self.order().collect();
        let mut slots: Vec<Option<(&K, &mut V)>> = self
            .entries
            .iter_mut()
            .map(|e| e.as_mut().map(|e| (&e.key, &mut e.value)))
            .collect();
        order.into_iter().filter_map(move |i| slots[i].take())
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Iterates values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Iterates mutable values in insertion order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.iter_mut().map(|(_, v)| v)
    }

    /// Removes every entry, keeping the current bucket count.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|b| *b = None);
        self.entries.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn order(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.head, move |&i| {
            self.entries[i].as_ref().and_then(|e| e.next)
        })
    }

    fn alloc(&mut self, entry: Entry<K, V>) -> usize {
        match self.free.pop() {
            Some(i) => {
                self.entries[i] = Some(entry);
                i
            }
            None => {
                self.entries.push(Some(entry));
                self.entries.len() - 1
            }
        }
    }

    fn link_tail(&mut self, idx: usize) {
        match self.tail {
            Some(t) => {
                if let Some(e) = self.entries[t].as_mut() {
                    e.next = Some(idx);
                }
            }
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }

    fn unlink(&mut self, prev: Option<usize>, next: Option<usize>) {
        match prev {
            Some(p) => {
                if let Some(e) = self.entries[p].as_mut() {
                    e.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(e) = self.entries[n].as_mut() {
                    e.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn grow(&mut self) {
        let capacity = self.buckets.len() * 2;
        let old = std::mem::replace(&mut self.buckets, vec![None; capacity]);
        for bucket in old.into_iter().flatten() {
            place(&mut self.buckets, bucket);
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> OrderedMap<K, V, S> {
    /// Inserts a key-value pair.
    ///
    /// Returns the previous value if the key was present; its insertion
    /// position is unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hasher.hash_one(&key);
        if let Some((_, idx)) = self.find(&key, hash) {
            if let Some(entry) = self.entries[idx].as_mut() {
                return Some(std::mem::replace(&mut entry.value, value));
            }
        }

        let idx = self.alloc(Entry {
            key,
            value,
            prev: self.tail,
            next: None,
        });
        self.link_tail(idx);
        place(
            &mut self.buckets,
            Bucket {
                entry: idx,
                hash,
                probe: 0,
            },
        );
        self.len += 1;

        if self.len as f64 / self.buckets.len() as f64 > MAX_LOAD {
            self.grow();
        }
        None
    }

    /// Returns a reference to the value for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let (_, idx) = self.find(key, self.hasher.hash_one(key))?;
        self.entries[idx].as_ref().map(|e| &e.value)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let (_, idx) = self.find(key, self.hasher.hash_one(key))?;
        self.entries[idx].as_mut().map(|e| &mut e.value)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key, self.hasher.hash_one(key)).is_some()
    }

    /// Removes `key` and returns its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (slot, idx) = self.find(key, self.hasher.hash_one(key))?;
        let cap = self.buckets.len();

        self.buckets[slot] = None;
        let mut hole = slot;
        loop {
            let next = (hole + 1) % cap;
            match self.buckets[next] {
                Some(mut bucket) if bucket.probe > 0 => {
                    bucket.probe -= 1;
                    self.buckets[hole] = Some(bucket);
                    self.buckets[next] = None;
                    hole = next;
                }
                _ => break,
            }
        }

        let entry = self.entries[idx].take()?;
        self.free.push(idx);
        self.unlink(entry.prev, entry.next);
        self.len -= 1;
        Some(entry.value)
    }

    /// Returns `(bucket index, arena index)` for `key`.
    fn find(&self, key: &K, hash: u64) -> Option<(usize, usize)> {
        let cap = self.buckets.len();
        let mut slot = (hash % cap as u64) as usize;
        for probes in 0..cap {
            let bucket = self.buckets[slot]?;
            if bucket.hash == hash {
                if let Some(entry) = self.entries[bucket.entry].as_ref() {
                    if entry.key == *key {
                        return Some((slot, bucket.entry));
                    }
                }
            }
            if bucket.probe < probes {
                return None;
            }
            slot = (slot + 1) % cap;
        }
        None
    }
}

/// Robin Hood placement of a bucket known to be absent from the table.
fn place(buckets: &mut [Option<Bucket>], mut incoming: Bucket) {
    let cap = buckets.len();
    let mut slot = (incoming.hash % cap as u64) as usize;
    incoming.probe = 0;
    loop {
        match buckets[slot].as_mut() {
            None => {
                buckets[slot] = Some(incoming);
                return;
            }
            Some(occupant) => {
                if occupant.probe < incoming.probe {
                    std::mem::swap(occupant, &mut incoming);
                }
            }
        }
        slot = (slot + 1) % cap;
        incoming.probe += 1;
    }
}

impl<K, V, S: Default> Default for OrderedMap<K, V, S> {
    fn default() -> Self {
        Self::with_capacity_and_hasher(MIN_CAPACITY, S::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for OrderedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> FromIterator<(K, V)> for OrderedMap<K, V, S> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Extend<(K, V)> for OrderedMap<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a OrderedMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Insertion-order iterator over an [`OrderedMap`].
pub struct Iter<'a, K, V> {
    entries: &'a [Option<Entry<K, V>>],
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries[self.cursor?].as_ref()?;
        self.cursor = entry.next;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
