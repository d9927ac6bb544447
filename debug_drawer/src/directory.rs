use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::ReentrantMutex;

use crate::registry::GeometryRegistry;

/// Slot value of a registration that has been removed.
const VACANT: usize = usize::MAX;

struct DirectoryEntry {
    /// Shared with the owning [`DirectorySlot`]; rewritten when the entry moves.
    slot: Arc<AtomicUsize>,
    registry: Arc<GeometryRegistry>,
}

/// Registration of one handler in an [`InstanceDirectory`].
///
/// The index is stable until another registration is removed, at which
/// point the last registration may be moved into the freed slot.
#[derive(Debug)]
pub struct DirectorySlot {
    slot: Arc<AtomicUsize>,
}

impl DirectorySlot {
    /// Current slot index, or `None` once deregistered.
    pub fn index(&self) -> Option<usize> {
        match self.slot.load(Ordering::Acquire) {
            VACANT => None,
            index => Some(index),
        }
    }
}

/// Directory of live handler instances.
///
/// Entries are kept dense: registration appends, removal swaps the last entry
/// into the freed slot and truncates, fixing up the moved entry's slot index.
/// All mutations happen under one reentrant lock so a handler can deregister
/// from teardown code that already holds the directory.
///
/// `has_instances` mirrors "non-empty" and can be read without the lock. It
/// is only cleared once the directory was seen empty under the lock, so a
/// `false` read is never wrong about a registration that completed before it.
pub struct InstanceDirectory {
    entries: ReentrantMutex<RefCell<Vec<DirectoryEntry>>>,
    has_instances: AtomicBool,
    generation: AtomicU64,
}

impl InstanceDirectory {
    pub fn new() -> Self {
        Self {
            entries: ReentrantMutex::new(RefCell::new(Vec::new())),
            has_instances: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    /// Append `registry` and return its slot.
    pub fn register(&self, registry: Arc<GeometryRegistry>) -> DirectorySlot {
        let guard = self.entries.lock();
        let mut entries = guard.borrow_mut();
        let slot = Arc::new(AtomicUsize::new(entries.len()));
        entries.push(DirectoryEntry {
            slot: Arc::clone(&slot),
            registry,
        });
        self.has_instances.store(true, Ordering::Release);
        log::debug!(
            "Registered debug draw instance in slot {} ({} live)",
            entries.len() - 1,
            entries.len()
        );
        DirectorySlot { slot }
    }

    /// Remove the registration behind `slot`.
    ///
    /// Returns `false` if it was already removed or belongs to another
    /// directory.
    pub fn deregister(&self, slot: &DirectorySlot) -> bool {
        let guard = self.entries.lock();
        let mut entries = guard.borrow_mut();

        let index = slot.slot.load(Ordering::Acquire);
        let owned = entries
            .get(index)
            .is_some_and(|entry| Arc::ptr_eq(&entry.slot, &slot.slot));
        if !owned {
            if index != VACANT {
                log::warn!("Deregistering slot {index} not owned by this directory");
            }
            return false;
        }

        entries.swap_remove(index);
        if let Some(moved) = entries.get(index) {
            moved.slot.store(index, Ordering::Release);
        }
        slot.slot.store(VACANT, Ordering::Release);

        if entries.is_empty() {
            self.has_instances.store(false, Ordering::Release);
        }
        log::debug!(
            "Deregistered debug draw instance from slot {index} ({} live)",
            entries.len()
        );
        true
    }

    /// Lock-free check for "at least one instance registered".
    ///
    /// May briefly report `true` for a directory that just became empty.
    pub fn has_instances(&self) -> bool {
        self.has_instances.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of replay passes started so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Start a replay pass: bump the generation and visit every live
    /// registry while holding the directory lock.
    ///
    /// Registrations cannot be added or removed by other threads during the
    /// visit. Returns the new generation.
    pub fn visit_registries(&self, mut f: impl FnMut(usize, &GeometryRegistry)) -> u64 {
        let guard = self.entries.lock();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let mut index = 0;
        loop {
            // Release the borrow before `f` so it may reenter the directory
            // on this thread.
            let next = guard.borrow().get(index).map(|e| Arc::clone(&e.registry));
            let Some(registry) = next else {
                break;
            };
            f(index, &registry);
            index += 1;
        }
        generation
    }
}

impl Default for InstanceDirectory {
    fn default() -> Self {
        Self::new()
    }
}
