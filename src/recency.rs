use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::mem;

// Null link in the slot-indexed list
const NIL: usize = usize::MAX;

// Internal node structure for the doubly linked list
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

/// Unsynchronized LRU storage: a slot arena threaded by a doubly linked
/// recency list, with a `HashMap` from key to slot.
///
/// The list runs from `head` (most recently used) to `tail` (least recently
/// used). Freed slots go on a free list, so the arena never holds more than
/// `capacity` slots.
pub(crate) struct RecencyList<K, V, S> {
    capacity: usize,
    map: HashMap<K, usize, S>,
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
}

impl<K, V, S> RecencyList<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    pub(crate) fn with_hasher(capacity: usize, hasher: S) -> Self {
        debug_assert!(capacity > 0);
        Self {
            capacity,
            map: HashMap::with_hasher(hasher),
            slots: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Looks up `key` without touching recency.
    pub(crate) fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|&idx| &self.node(idx).value)
    }

    /// Looks up `key` and makes it the most recently used entry.
    pub(crate) fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.reinsert_front(idx);
        Some(&self.node(idx).value)
    }

    /// Inserts or updates `key` as the most recently used entry.
    ///
    /// Returns the value pushed out by the call: the previous value when the
    /// key was present, or the evicted least recently used value when a new
    /// key arrived at capacity.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&idx) = self.map.get(&key) {
            let old = mem::replace(&mut self.node_mut(idx).value, value);
            self.reinsert_front(idx);
            return Some(old);
        }

        // Make room first so the count never exceeds capacity
        let evicted = if self.map.len() == self.capacity {
            self.evict_lru()
        } else {
            None
        };

        // Index first: hashing the key may panic, and nothing else has
        // changed yet if it does.
        let idx = self.next_slot();
        let previous = self.map.insert(key.clone(), idx);
        debug_assert!(previous.is_none(), "duplicate key survived insertion");

        let slot = self.alloc(Node {
            key,
            value,
            prev: NIL,
            next: NIL,
        });
        debug_assert_eq!(slot, idx);
        self.push_front(idx);

        evicted
    }

    /// Removes `key` from both the index and the recency list.
    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        debug_assert!(!self.map.contains_key(key), "erased more than one entry");
        self.unlink(idx);
        Some(self.release(idx).value)
    }

    /// Empties the cache, handing back the old slots so their values can be
    /// dropped by the caller.
    pub(crate) fn take_all(&mut self) -> Vec<Option<Node<K, V>>> {
        self.map.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
        mem::take(&mut self.slots)
    }

    fn evict_lru(&mut self) -> Option<V> {
        let idx = self.tail;
        if idx == NIL {
            return None;
        }
        // Drop the index entry before touching the list, so a panicking
        // `Hash` or `Eq` leaves the entry fully in place.
        let tail_key = &self.slots[idx]
            .as_ref()
            .unwrap_or_else(|| unreachable!("dangling tail slot {idx}"))
            .key;
        let removed = self.map.remove(tail_key);
        debug_assert_eq!(removed, Some(idx), "evicted a node the index did not point at");

        self.unlink(idx);
        let node = self.release(idx);
        tracing::trace!(slot = idx, "evicted least recently used entry");
        Some(node.value)
    }

    // Slot the next `alloc` will hand out
    fn next_slot(&self) -> usize {
        self.free.last().copied().unwrap_or(self.slots.len())
    }

    fn alloc(&mut self, node: Node<K, V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                debug_assert!(self.slots[idx].is_none());
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                debug_assert!(self.slots.len() < self.capacity);
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> Node<K, V> {
        let node = self.slots[idx]
            .take()
            .unwrap_or_else(|| unreachable!("released an empty slot {idx}"));
        self.free.push(idx);
        node
    }

    fn node(&self, idx: usize) -> &Node<K, V> {
        self.slots[idx]
            .as_ref()
            .unwrap_or_else(|| unreachable!("dangling slot {idx}"))
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        self.slots[idx]
            .as_mut()
            .unwrap_or_else(|| unreachable!("dangling slot {idx}"))
    }

    // Insert node at the front of the list
    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(idx);
            node.prev = NIL;
            node.next = old_head;
        }
        if old_head != NIL {
            self.node_mut(old_head).prev = idx;
        } else {
            // Empty list case
            self.tail = idx;
        }
        self.head = idx;
    }

    // Detach node from its neighbours
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };

        if prev != NIL {
            self.node_mut(prev).next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.node_mut(next).prev = prev;
        } else {
            self.tail = prev;
        }
    }

    fn reinsert_front(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    /// Keys from most to least recently used.
    #[cfg(test)]
    pub(crate) fn keys_mru(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cur = self.head;
        while cur != NIL {
            let node = self.node(cur);
            keys.push(node.key.clone());
            cur = node.next;
        }
        keys
    }

    /// Walks the whole structure and panics on any broken invariant.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert!(self.len() <= self.capacity, "len exceeds capacity");
        assert!(self.slots.len() <= self.capacity, "arena grew past capacity");

        let mut seen = 0;
        let mut prev = NIL;
        let mut cur = self.head;
        while cur != NIL {
            let node = self.node(cur);
            assert_eq!(node.prev, prev, "broken back link at slot {cur}");
            assert_eq!(self.map.get(&node.key), Some(&cur), "list node missing from index");
            seen += 1;
            assert!(seen <= self.len(), "cycle in recency list");
            prev = cur;
            cur = node.next;
        }
        assert_eq!(self.tail, prev, "tail does not end the list");
        assert_eq!(seen, self.len(), "index and list disagree on size");

        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(occupied, self.len());
        assert_eq!(occupied + self.free.len(), self.slots.len());
    }
}
