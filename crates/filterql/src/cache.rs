//! Memoization of compiled queries, keyed by the exact query text.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::ast::Condition;

/// Storage for compiled queries.
///
/// Implementations must be safe to share between threads; the parser calls
/// [`load`](CacheProvider::load) before compiling and
/// [`store`](CacheProvider::store) after a successful compile. Keys are
/// compared byte for byte: `a = 1` and `a=1` are different entries.
pub trait CacheProvider<E: ?Sized>: Send + Sync {
    /// Returns the tree previously stored under `query`.
    fn load(&self, query: &str) -> Option<Arc<Condition<E>>>;

    /// Stores `cond` under `query`, replacing any previous entry.
    fn store(&self, query: &str, cond: Arc<Condition<E>>);
}

/// Unbounded cache. Entries are never evicted.
pub struct MapCache<E: ?Sized> {
    entries: RwLock<HashMap<String, Arc<Condition<E>>>>,
}

impl<E: ?Sized> MapCache<E> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached queries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<E: ?Sized> Default for MapCache<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> fmt::Debug for MapCache<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapCache").field("len", &self.len()).finish()
    }
}

impl<E: ?Sized> CacheProvider<E> for MapCache<E> {
    fn load(&self, query: &str) -> Option<Arc<Condition<E>>> {
        self.entries.read().get(query).cloned()
    }

    fn store(&self, query: &str, cond: Arc<Condition<E>>) {
        self.entries.write().insert(query.to_string(), cond);
    }
}

/// Fixed-capacity cache that evicts the least recently used query.
///
/// Both [`load`](CacheProvider::load) hits and
/// [`store`](CacheProvider::store) count as a use. Every operation is O(1)
/// and runs under a single lock.
pub struct LruCache<E: ?Sized> {
    capacity: usize,
    state: Mutex<LruState<E>>,
}

/// Index-linked recency list over a slot vector.
///
/// `head` is the most recently used slot, `tail` the least. Slots are never
/// freed: once the cache is full, an eviction hands its slot to the newcomer.
struct LruState<E: ?Sized> {
    slots: Vec<Slot<E>>,
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

struct Slot<E: ?Sized> {
    key: String,
    cond: Arc<Condition<E>>,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<E: ?Sized> LruState<E> {
    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.slots[slot].prev, self.slots[slot].next);
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        self.slots[slot].prev = None;
        self.slots[slot].next = None;
    }

    fn push_front(&mut self, slot: usize) {
        self.slots[slot].prev = None;
        self.slots[slot].next = self.head;
        if let Some(h) = self.head {
            self.slots[h].prev = Some(slot);
        }
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }

    fn touch(&mut self, slot: usize) {
        if self.head != Some(slot) {
            self.unlink(slot);
            self.push_front(slot);
        }
    }
}

impl<E: ?Sized> LruCache<E> {
    /// Creates a cache holding at most `capacity` queries. Zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            state: Mutex::new(LruState {
                slots: Vec::with_capacity(capacity),
                index: HashMap::with_capacity(capacity),
                head: None,
                tail: None,
            }),
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached queries.
    pub fn len(&self) -> usize {
        self.state.lock().index.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.state.lock().index.is_empty()
    }

    /// Returns true if `query` is cached. Does not count as a use.
    pub fn contains(&self, query: &str) -> bool {
        self.state.lock().index.contains_key(query)
    }
}

impl<E: ?Sized> fmt::Debug for LruCache<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

impl<E: ?Sized> CacheProvider<E> for LruCache<E> {
    fn load(&self, query: &str) -> Option<Arc<Condition<E>>> {
        let mut state = self.state.lock();
        let slot = *state.index.get(query)?;
        state.touch(slot);
        Some(Arc::clone(&state.slots[slot].cond))
    }

    fn store(&self, query: &str, cond: Arc<Condition<E>>) {
        let mut state = self.state.lock();

        if let Some(&slot) = state.index.get(query) {
            state.slots[slot].cond = cond;
            state.touch(slot);
            return;
        }

        if state.slots.len() < self.capacity {
            let slot = state.slots.len();
            state.slots.push(Slot {
                key: query.to_string(),
                cond,
                prev: None,
                next: None,
            });
            state.index.insert(query.to_string(), slot);
            state.push_front(slot);
            return;
        }

        let Some(victim) = state.tail else {
            return;
        };
        state.unlink(victim);
        let evicted = std::mem::replace(&mut state.slots[victim].key, query.to_string());
        tracing::trace!(evicted = %evicted, capacity = self.capacity, "evicting compiled query");
        state.index.remove(&evicted);
        state.slots[victim].cond = cond;
        state.index.insert(query.to_string(), victim);
        state.push_front(victim);
    }
}
