//! Maps keyed by object identity.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Map keyed by the address of an `Arc`'s value rather than by equality.
///
/// Host windows and pages have no meaningful equality; two distinct pages
/// may look identical. The map keeps every key `Arc` alive while its entry
/// exists, so an address can never be reused by another object while it is
/// still a key.
///
/// # Examples
///
/// ```rust
/// use workbench_di::IdentityMap;
/// use std::sync::Arc;
///
/// let a: Arc<str> = Arc::from("page");
/// let b: Arc<str> = Arc::from("page");
///
/// let mut map = IdentityMap::new();
/// map.insert(a.clone(), 1);
/// assert_eq!(map.get(&a), Some(&1));
/// assert_eq!(map.get(&b), None);
/// ```
pub struct IdentityMap<K: ?Sized, V> {
    entries: HashMap<usize, (Arc<K>, V)>,
}

#[inline]
fn address<K: ?Sized>(key: &Arc<K>) -> usize {
    Arc::as_ptr(key) as *const () as usize
}

impl<K: ?Sized, V> IdentityMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Inserts `value` for `key`, returning the previous value.
    pub fn insert(&mut self, key: Arc<K>, value: V) -> Option<V> {
        self.entries
            .insert(address(&key), (key, value))
            .map(|(_, old)| old)
    }

    pub fn get(&self, key: &Arc<K>) -> Option<&V> {
        self.entries.get(&address(key)).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Arc<K>) -> bool {
        self.entries.contains_key(&address(key))
    }

    pub fn remove(&mut self, key: &Arc<K>) -> Option<V> {
        self.entries.remove(&address(key)).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Arc<K>> {
        self.entries.values().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values().map(|(_, v)| v)
    }

    /// Removes and returns every entry.
    pub fn drain(&mut self) -> Vec<(Arc<K>, V)> {
        self.entries.drain().map(|(_, entry)| entry).collect()
    }
}

impl<K: ?Sized, V> Default for IdentityMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ?Sized, V: fmt::Debug> fmt::Debug for IdentityMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(addr, (_, v))| (format!("{:#x}", addr), v)))
            .finish()
    }
}
