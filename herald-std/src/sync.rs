//! Reconciliation of shared listeners into a manager's local registry.
//!
//! Each manager caches, per event, the shared listeners it last attached. On
//! every trigger the cache is checked against the [`SharedEventManager`]:
//!
//! 1. Same shared generation and same identifier version: nothing to do.
//! 2. No cache entry yet: attach everything and remember it.
//! 3. Listwise equal: only refresh the stamps.
//! 4. Otherwise detach what disappeared, attach what appeared.
//!
//! Shared listeners are thus attached once, not once per trigger, and changes
//! made by third parties become visible on the next trigger.

use crate::{
    local::LocalRegistry,
    priority::{Origin, Registration},
    shared::{SharedEventManager, SharedListener},
};
use herald_core::EventError;
use std::collections::{HashMap, HashSet, hash_map::Entry};

/// What a refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The cached view was still current.
    Unchanged,
    /// First sync of this event.
    Initialized {
        /// Shared listeners attached.
        attached: usize,
    },
    /// The cached view was stale and has been patched.
    Reconciled {
        /// Shared listeners newly attached.
        attached: usize,
        /// Shared listeners detached.
        detached: usize,
    },
}

#[derive(Debug)]
struct CacheEntry<R> {
    generation: u64,
    identifiers_version: u64,
    listeners: Vec<SharedListener<R>>,
}

/// Per-manager cache of shared listeners, keyed by event name.
#[derive(Debug)]
pub struct SharedListenerSync<R> {
    cache: HashMap<String, CacheEntry<R>>,
}

impl<R> Default for SharedListenerSync<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> SharedListenerSync<R> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Bring the shared listeners of `event` in `registry` up to date.
    ///
    /// `identifiers_version` must change whenever `identifiers` does.
    pub fn refresh<S: AsRef<str>>(
        &mut self,
        shared: &SharedEventManager<R>,
        identifiers: &[S],
        identifiers_version: u64,
        event: &str,
        registry: &mut LocalRegistry<R>,
    ) -> Result<SyncOutcome, EventError> {
        let current_stamps = |entry: &CacheEntry<R>| {
            entry.generation == shared.generation()
                && entry.identifiers_version == identifiers_version
        };
        if self.cache.get(event).is_some_and(current_stamps) {
            return Ok(SyncOutcome::Unchanged);
        }

        let (generation, current) = shared.snapshot(identifiers, event)?;
        let queue = registry.resolve(event);

        let entry = match self.cache.entry(event.to_owned()) {
            Entry::Vacant(vacant) => {
                for listener in &current {
                    queue.insert(registration(listener));
                }
                let attached = current.len();
                #[cfg(feature = "tracing")]
                tracing::debug!(event, attached, "shared listeners attached");
                vacant.insert(CacheEntry {
                    generation,
                    identifiers_version,
                    listeners: current,
                });
                return Ok(SyncOutcome::Initialized { attached });
            }
            Entry::Occupied(occupied) => occupied.into_mut(),
        };

        entry.generation = generation;
        entry.identifiers_version = identifiers_version;
        if entry.listeners == current {
            return Ok(SyncOutcome::Unchanged);
        }

        let previous: HashSet<(u64, u32)> = entry.listeners.iter().map(SharedListener::key).collect();
        let next: HashSet<(u64, u32)> = current.iter().map(SharedListener::key).collect();

        let mut detached = 0;
        for stale in entry.listeners.iter().filter(|l| !next.contains(&l.key())) {
            let (sequence, rank) = stale.key();
            detached += queue.remove_where(|r| {
                r.origin() == Origin::Shared && r.sequence() == sequence && r.rank() == rank
            });
        }

        let mut attached = 0;
        for fresh in current.iter().filter(|l| !previous.contains(&l.key())) {
            queue.insert(registration(fresh));
            attached += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(event, attached, detached, "shared listeners reconciled");
        entry.listeners = current;
        Ok(SyncOutcome::Reconciled { attached, detached })
    }

    /// Forget the cached view of `event`; the next refresh starts over.
    pub fn invalidate(&mut self, event: &str) {
        self.cache.remove(event);
    }

    /// The shared listeners currently attached for `event`.
    pub fn cached(&self, event: &str) -> Option<&[SharedListener<R>]> {
        self.cache.get(event).map(|entry| entry.listeners.as_slice())
    }
}

fn registration<R>(listener: &SharedListener<R>) -> Registration<R> {
    Registration::shared(
        listener.listener().clone(),
        listener.priority(),
        listener.rank(),
        listener.sequence(),
    )
}
