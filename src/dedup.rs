//! Deduplication for extracted wordlist values
//!
//! Each category keeps its own set of values already written. The registry is
//! owned by the aggregator, so sets are plain (unlocked) hash sets: the
//! presence check and the insert happen in one call on a single thread.

use crate::category::Category;
use ahash::RandomState;
use hashbrown::HashSet;

/// Trait for deduplication implementations
pub trait Deduplicator: Send {
    /// Check if item is unique and add it if so
    /// Returns true if the item is unique (not seen before)
    fn insert(&mut self, item: &str) -> bool;

    /// Check if item exists without adding it
    fn contains(&self, item: &str) -> bool;

    /// Get the number of unique items
    fn len(&self) -> usize;

    /// Check if empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get approximate memory usage in bytes
    fn memory_usage(&self) -> usize;
}

/// In-memory HashSet-based deduplicator
pub struct MemoryDeduplicator {
    set: HashSet<String, RandomState>,
}

impl MemoryDeduplicator {
    pub fn new() -> Self {
        Self {
            set: HashSet::with_hasher(RandomState::new()),
        }
    }
}

impl Default for MemoryDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Deduplicator for MemoryDeduplicator {
    fn insert(&mut self, item: &str) -> bool {
        // Avoid allocating for values we have already seen
        if self.set.contains(item) {
            return false;
        }
        self.set.insert(item.to_string())
    }

    fn contains(&self, item: &str) -> bool {
        self.set.contains(item)
    }

    fn len(&self) -> usize {
        self.set.len()
    }

    fn memory_usage(&self) -> usize {
        // Approximate: each entry is roughly String overhead + content + HashSet overhead
        self.set.iter().map(|s| s.capacity() + 24).sum::<usize>() + self.set.capacity() * 8
    }
}

/// One dedup set per category, created fresh for every run
pub struct DedupRegistry {
    sets: [Box<dyn Deduplicator>; 4],
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self {
            sets: [
                Box::new(MemoryDeduplicator::new()),
                Box::new(MemoryDeduplicator::new()),
                Box::new(MemoryDeduplicator::new()),
                Box::new(MemoryDeduplicator::new()),
            ],
        }
    }

    /// Insert a value for a category. Returns true the first time only.
    #[inline]
    pub fn insert(&mut self, category: Category, value: &str) -> bool {
        self.sets[category.index()].insert(value)
    }

    pub fn contains(&self, category: Category, value: &str) -> bool {
        self.sets[category.index()].contains(value)
    }

    /// Unique values seen for a category
    pub fn len(&self, category: Category) -> usize {
        self.sets[category.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.iter().all(|set| set.is_empty())
    }

    pub fn memory_usage(&self) -> usize {
        self.sets.iter().map(|set| set.memory_usage()).sum()
    }
}

impl Default for DedupRegistry {
    fn default() -> Self {
        Self::new()
    }
}
