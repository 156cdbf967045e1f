//! Handle table for long-lived sweeps
//!
//! Fixed capacity, O(1) insert/lookup/remove. Handles are never reused even
//! when their slot is. Each slot has its own lock, so running one sweep
//! never blocks access to another.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

struct Index {
    /// Unoccupied slot indices
    free: Vec<usize>,
    next_handle: u64,
    handle_to_slot: HashMap<u64, usize>,
}

/// Fixed-capacity table of `T` addressed by opaque `u64` handles
pub struct SweepSlab<T> {
    slots: Vec<Mutex<Option<T>>>,
    index: RwLock<Index>,
}

impl<T> SweepSlab<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| Mutex::new(None)).collect(),
            index: RwLock::new(Index {
                free: (0..capacity).rev().collect(),
                next_handle: 0,
                handle_to_slot: HashMap::new(),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Store `item`; `None` when the table is full
    pub fn insert(&self, item: T) -> Option<u64> {
        let mut index = self.index.write().ok()?;
        let slot = index.free.pop()?;

        *self.slots[slot].lock().ok()? = Some(item);

        let handle = index.next_handle;
        index.next_handle += 1;
        index.handle_to_slot.insert(handle, slot);
        Some(handle)
    }

    fn slot_of(&self, handle: u64) -> Option<usize> {
        self.index.read().ok()?.handle_to_slot.get(&handle).copied()
    }

    /// Run `f` on the entry, holding only that entry's lock
    pub fn with_entry<F, R>(&self, handle: u64, f: F) -> Option<R>
    where
        F: FnOnce(&T) -> R,
    {
        let slot = self.slot_of(handle)?;
        let guard = self.slots[slot].lock().ok()?;
        guard.as_ref().map(f)
    }

    pub fn with_entry_mut<F, R>(&self, handle: u64, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let slot = self.slot_of(handle)?;
        let mut guard = self.slots[slot].lock().ok()?;
        guard.as_mut().map(f)
    }

    pub fn remove(&self, handle: u64) -> Option<T> {
        let mut index = self.index.write().ok()?;
        let slot = index.handle_to_slot.remove(&handle)?;
        let item = self.slots[slot].lock().ok()?.take();
        index.free.push(slot);
        item
    }

    /// Live entries
    pub fn count(&self) -> usize {
        self.index.read().map(|i| i.handle_to_slot.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sweep::{MonteCarloDriver, Scheme};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_insert_lookup_remove() {
        let slab: SweepSlab<String> = SweepSlab::new(4);
        let h = slab.insert("sweep".to_string()).unwrap();
        assert_eq!(slab.count(), 1);
        assert_eq!(slab.with_entry(h, |s| s.len()), Some(5));

        assert_eq!(slab.remove(h).as_deref(), Some("sweep"));
        assert_eq!(slab.count(), 0);
        assert!(slab.with_entry(h, |s| s.len()).is_none());
        assert!(slab.remove(h).is_none());
    }

    #[test]
    fn test_full_table_and_handle_freshness() {
        let slab: SweepSlab<u32> = SweepSlab::new(2);
        let a = slab.insert(1).unwrap();
        let _b = slab.insert(2).unwrap();
        assert!(slab.insert(3).is_none());

        slab.remove(a);
        let c = slab.insert(3).unwrap();
        assert_ne!(a, c, "slot reused but handle must be fresh");
        assert!(slab.with_entry(a, |v| *v).is_none());
        assert_eq!(slab.with_entry(c, |v| *v), Some(3));
        assert_eq!(slab.count(), slab.capacity());
    }

    #[test]
    fn test_concurrent_entries() {
        let slab: Arc<SweepSlab<u64>> = Arc::new(SweepSlab::new(16));
        let handles: Vec<u64> = (0..8).map(|i| slab.insert(i).unwrap()).collect();

        let workers: Vec<_> = handles
            .iter()
            .map(|&h| {
                let slab = Arc::clone(&slab);
                thread::spawn(move || {
                    for _ in 0..500 {
                        slab.with_entry_mut(h, |v| *v += 1);
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }

        for (i, &h) in handles.iter().enumerate() {
            assert_eq!(slab.with_entry(h, |v| *v), Some(i as u64 + 500));
        }
    }

    #[test]
    fn test_holds_drivers() {
        let slab = SweepSlab::new(2);
        let config = SimConfig {
            trials: 100,
            snr_db: vec![10.0],
            ..SimConfig::default()
        };
        let h = slab.insert(MonteCarloDriver::new(config).unwrap()).unwrap();
        let point = slab
            .with_entry(h, |d| d.run_point(Scheme::Hybrid, 0, 1))
            .unwrap()
            .unwrap();
        assert_eq!(point.trials, 100);
    }
}
