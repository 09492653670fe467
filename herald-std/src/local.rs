//! Per-manager listener storage.
//!
//! [`LocalRegistry`] is a two-phase structure: a map of concrete event names
//! to their [`PriorityRegistry`], plus a list of wildcard registrations that
//! are materialized into a concrete registry whenever that event is resolved.
//!
//! Wildcard listeners attached while some events already exist are inserted
//! into those events immediately; events created later receive them on first
//! resolution.

use crate::priority::{Origin, PriorityRegistry, Registration};
use herald_core::{Listener, ListenerId, WILDCARD};
use indexmap::IndexMap;

/// Local listeners of one event manager.
#[derive(Debug)]
pub struct LocalRegistry<R> {
    events: IndexMap<String, PriorityRegistry<R>>,
    wildcards: Vec<Registration<R>>,
    next_sequence: u64,
}

impl<R> Default for LocalRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> LocalRegistry<R> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            events: IndexMap::new(),
            wildcards: Vec::new(),
            next_sequence: 0,
        }
    }

    fn sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    /// Attach `listener` to `event` at `priority`.
    ///
    /// Names are expected to be validated by the caller.
    pub fn attach(&mut self, event: &str, listener: Listener<R>, priority: i32) -> Listener<R> {
        let sequence = self.sequence();

        if event == WILDCARD {
            let registration = Registration::wildcard(listener.clone(), priority, sequence);
            for registry in self.events.values_mut() {
                registry.insert(registration.clone());
            }
            self.wildcards.push(registration);
        } else {
            self.events
                .entry(event.to_owned())
                .or_default()
                .insert(Registration::local(listener.clone(), priority, sequence));
        }

        listener
    }

    /// Get the registry for `event`, creating it and materializing pending
    /// wildcard registrations as needed.
    ///
    /// Materialization is idempotent: a wildcard registration is never
    /// inserted twice into the same event.
    pub fn resolve(&mut self, event: &str) -> &mut PriorityRegistry<R> {
        let registry = self.events.entry(event.to_owned()).or_default();
        for wildcard in &self.wildcards {
            if !registry.contains_position(&wildcard.position()) {
                registry.insert(wildcard.clone());
            }
        }
        registry
    }

    /// The registry for `event`, if one exists.
    pub fn get(&self, event: &str) -> Option<&PriorityRegistry<R>> {
        self.events.get(event)
    }

    /// Detach local registrations of `id`.
    ///
    /// With no event (or the wildcard event) the listener is removed from
    /// every concrete event and from the wildcard list. With a named event it
    /// is removed from that event only; a wildcard registration of the same
    /// listener stays pending and is materialized again on the next
    /// resolution. Shared registrations are never touched.
    pub fn detach(&mut self, id: ListenerId, event: Option<&str>) -> usize {
        let is_local = |r: &Registration<R>| r.origin() != Origin::Shared && r.listener().id() == id;

        match event {
            None | Some(WILDCARD) => {
                let before = self.wildcards.len();
                self.wildcards.retain(|r| r.listener().id() != id);
                let mut removed = before - self.wildcards.len();
                for registry in self.events.values_mut() {
                    removed += registry.remove_where(is_local);
                }
                removed
            }
            Some(name) => self
                .events
                .get_mut(name)
                .map_or(0, |registry| registry.remove_where(is_local)),
        }
    }

    /// Drop the registry of `event` entirely.
    ///
    /// Clearing the wildcard event drops every wildcard registration, pending
    /// or materialized, and leaves the concrete registries otherwise intact.
    /// Returns `false` if there was nothing to clear.
    pub fn clear(&mut self, event: &str) -> bool {
        if event != WILDCARD {
            return self.events.shift_remove(event).is_some();
        }

        let had_wildcards = !self.wildcards.is_empty();
        self.wildcards.clear();
        for registry in self.events.values_mut() {
            registry.remove_where(|r| r.origin() == Origin::Wildcard);
        }
        had_wildcards
    }

    /// Names of events with a concrete registry, in creation order.
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    /// Wildcard registrations, in attach order.
    pub fn wildcards(&self) -> &[Registration<R>] {
        &self.wildcards
    }
}
