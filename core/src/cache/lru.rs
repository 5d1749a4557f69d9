// Eviction cache — bounded key/value store with least-recently-used eviction
//
// Recency is kept in a doubly linked list threaded through a slab of slots
// (indices, not pointers). A hash index maps each key to its slot, so lookup,
// promotion and eviction are all O(1). Freed slots are recycled.

use std::collections::HashMap;
use std::hash::Hash;

/// Slab index of a cache slot
type Slot = usize;

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    /// Towards the most-recently-used end
    prev: Option<Slot>,
    /// Towards the least-recently-used end
    next: Option<Slot>,
}

/// Fixed-capacity cache with least-recently-used eviction.
///
/// Both `get` and `put` count as a use. A capacity of zero makes every `put`
/// a no-op, so such a cache never holds anything.
#[derive(Debug, Clone)]
pub struct EvictionCache<K, V> {
    capacity: usize,
    /// Key → slot in `slots`
    index: HashMap<K, Slot>,
    slots: Vec<Option<Entry<K, V>>>,
    /// Vacated slots available for reuse
    free: Vec<Slot>,
    /// Most recently used
    head: Option<Slot>,
    /// Least recently used (next eviction victim)
    tail: Option<Slot>,
}

impl<K, V> EvictionCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Check presence without touching recency
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Look up a value and mark it most recently used.
    ///
    /// `None` is a miss. A stored empty value is still a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let slot = *self.index.get(key)?;
        self.promote(slot);
        self.slots[slot].as_ref().map(|entry| &entry.value)
    }

    /// Look up a value without changing its recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        let slot = *self.index.get(key)?;
        self.slots[slot].as_ref().map(|entry| &entry.value)
    }

    /// Insert or update a value and mark it most recently used.
    ///
    /// Updating an existing key never evicts. Inserting a new key into a full
    /// cache first evicts the least recently used entry, which is returned.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(&slot) = self.index.get(&key) {
            if let Some(entry) = self.slots[slot].as_mut() {
                entry.value = value;
            }
            self.promote(slot);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.pop_lru()
        } else {
            None
        };

        let entry = Entry {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, slot);
        self.push_front(slot);

        evicted
    }

    /// Remove and return the least recently used entry
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let slot = self.tail?;
        self.unlink(slot);
        let entry = self.slots[slot].take()?;
        self.free.push(slot);
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Keys ordered from most to least recently used
    pub fn keys_by_recency(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            match self.slots[slot].as_ref() {
                Some(entry) => {
                    keys.push(&entry.key);
                    cursor = entry.next;
                }
                None => break,
            }
        }
        keys
    }

    fn promote(&mut self, slot: Slot) {
        if self.head == Some(slot) {
            return;
        }
        self.unlink(slot);
        self.push_front(slot);
    }

    fn unlink(&mut self, slot: Slot) {
        let (prev, next) = match self.slots[slot].as_ref() {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(entry) = self.slots[p].as_mut() {
                    entry.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(entry) = self.slots[n].as_mut() {
                    entry.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(entry) = self.slots[slot].as_mut() {
            entry.prev = None;
            entry.next = None;
        }
    }

    fn push_front(&mut self, slot: Slot) {
        let old_head = self.head;
        if let Some(entry) = self.slots[slot].as_mut() {
            entry.prev = None;
            entry.next = old_head;
        }
        if let Some(h) = old_head {
            if let Some(entry) = self.slots[h].as_mut() {
                entry.prev = Some(slot);
            }
        }
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }
}
