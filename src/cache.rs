//! Floor-plan cache.
//!
//! Re-parsing a gym's SVG map on every view is wasted work; parsed plans
//! are immutable, so the engine keeps them in a small LRU cache keyed by
//! gym id and hands out `Arc` clones.

use std::collections::HashMap;
use std::sync::Arc;

use crate::map::FloorPlan;

/// Default number of gyms to keep parsed plans for.
pub const DEFAULT_PLAN_CAPACITY: usize = 16;

/// Fixed-capacity LRU cache of parsed floor plans.
///
/// Eviction is an O(n) scan for the stalest access counter. A user has a
/// handful of gyms at most, so the linear scan beats maintaining a linked
/// list.
#[derive(Debug)]
pub struct PlanCache {
    capacity: usize,
    entries: HashMap<String, CacheEntry>,
    access_counter: u64,
}

#[derive(Debug)]
struct CacheEntry {
    plan: Arc<FloorPlan>,
    last_access: u64,
}

impl PlanCache {
    /// Create a cache holding up to `capacity` plans.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            access_counter: 0,
        }
    }

    /// Fetch a gym's plan, marking it recently used.
    pub fn get(&mut self, gym_id: &str) -> Option<Arc<FloorPlan>> {
        if let Some(entry) = self.entries.get_mut(gym_id) {
            self.access_counter += 1;
            entry.last_access = self.access_counter;
            Some(entry.plan.clone())
        } else {
            None
        }
    }

    /// Store a gym's plan, evicting the stalest entry at capacity.
    pub fn insert(&mut self, gym_id: String, plan: Arc<FloorPlan>) {
        if let Some(entry) = self.entries.get_mut(&gym_id) {
            self.access_counter += 1;
            entry.plan = plan;
            entry.last_access = self.access_counter;
            return;
        }

        if self.entries.len() >= self.capacity {
            self.evict_stalest();
        }

        self.access_counter += 1;
        self.entries.insert(
            gym_id,
            CacheEntry {
                plan,
                last_access: self.access_counter,
            },
        );
    }

    /// Drop a single gym's cached plan (e.g. after the owner edits the map).
    pub fn invalidate(&mut self, gym_id: &str) {
        self.entries.remove(gym_id);
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.access_counter = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, gym_id: &str) -> bool {
        self.entries.contains_key(gym_id)
    }

    /// Iterate cached plans (for engine stats).
    pub fn plans(&self) -> impl Iterator<Item = (&str, &Arc<FloorPlan>)> {
        self.entries
            .iter()
            .map(|(gym_id, entry)| (gym_id.as_str(), &entry.plan))
    }

    fn evict_stalest(&mut self) {
        let stalest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(gym_id, _)| gym_id.clone());

        if let Some(gym_id) = stalest {
            self.entries.remove(&gym_id);
        }
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new(DEFAULT_PLAN_CAPACITY)
    }
}
