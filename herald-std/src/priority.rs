//! Priority-ordered listener storage for a single event.
//!
//! Registrations are kept in a `BTreeMap` keyed by [`Position`], a total order
//! of `(priority desc, origin, rank, sequence)`. Iteration therefore always
//! yields strictly priority-descending order, and equal priorities resolve by
//! origin (local, then local wildcard, then shared) and then FIFO.

use herald_core::{Listener, ListenerId};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Where a registration came from. Declaration order is tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Origin {
    /// Attached to this exact event on the local manager.
    Local,
    /// Attached to the wildcard event on the local manager.
    Wildcard,
    /// Pulled in from a shared event manager.
    Shared,
}

/// Sort key of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    priority: Reverse<i32>,
    origin: Origin,
    rank: u32,
    sequence: u64,
}

/// A listener together with its ordering metadata.
#[derive(Debug)]
pub struct Registration<R> {
    listener: Listener<R>,
    priority: i32,
    origin: Origin,
    rank: u32,
    sequence: u64,
}

impl<R> Clone for Registration<R> {
    fn clone(&self) -> Self {
        Self {
            listener: self.listener.clone(),
            priority: self.priority,
            origin: self.origin,
            rank: self.rank,
            sequence: self.sequence,
        }
    }
}

impl<R> Registration<R> {
    /// A registration against a concrete event.
    pub fn local(listener: Listener<R>, priority: i32, sequence: u64) -> Self {
        Self {
            listener,
            priority,
            origin: Origin::Local,
            rank: 0,
            sequence,
        }
    }

    /// A registration against the wildcard event.
    pub fn wildcard(listener: Listener<R>, priority: i32, sequence: u64) -> Self {
        Self {
            listener,
            priority,
            origin: Origin::Wildcard,
            rank: 0,
            sequence,
        }
    }

    /// A registration pulled from a shared event manager.
    ///
    /// `rank` orders the identifier groups; `sequence` is the shared
    /// manager's registration sequence.
    pub fn shared(listener: Listener<R>, priority: i32, rank: u32, sequence: u64) -> Self {
        Self {
            listener,
            priority,
            origin: Origin::Shared,
            rank,
            sequence,
        }
    }

    /// The registered listener.
    pub fn listener(&self) -> &Listener<R> {
        &self.listener
    }

    /// The registration priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The registration origin.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The attach sequence used for FIFO ordering.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The shared group rank (`0` for local registrations).
    pub fn rank(&self) -> u32 {
        self.rank
    }

    /// The sort key of this registration.
    pub fn position(&self) -> Position {
        Position {
            priority: Reverse(self.priority),
            origin: self.origin,
            rank: self.rank,
            sequence: self.sequence,
        }
    }
}

/// An ordered collection of registrations for one event.
#[derive(Debug)]
pub struct PriorityRegistry<R> {
    entries: BTreeMap<Position, Registration<R>>,
}

impl<R> Default for PriorityRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> PriorityRegistry<R> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert a registration, returning its listener.
    ///
    /// A registration already stored at the same position is replaced.
    pub fn insert(&mut self, registration: Registration<R>) -> &Listener<R> {
        let position = registration.position();
        self.entries.insert(position, registration);
        &self.entries[&position].listener
    }

    /// Returns `true` if a registration occupies `position`.
    pub fn contains_position(&self, position: &Position) -> bool {
        self.entries.contains_key(position)
    }

    /// Returns `true` if `id` is registered at any priority.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.values().any(|r| r.listener.id() == id)
    }

    /// Remove every registration of `id`, returning how many were removed.
    pub fn remove(&mut self, id: ListenerId) -> usize {
        self.remove_where(|r| r.listener.id() == id)
    }

    /// Remove every registration matching `predicate`.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Registration<R>) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|_, r| !predicate(r));
        before - self.entries.len()
    }

    /// Iterate over registrations in invocation order.
    pub fn iter(&self) -> impl Iterator<Item = &Registration<R>> {
        self.entries.values()
    }

    /// Snapshot the listeners in invocation order.
    ///
    /// The snapshot is detached from the registry: later mutations do not
    /// affect it. Dispatch always runs over such a snapshot.
    pub fn listeners(&self) -> Vec<Listener<R>> {
        self.entries.values().map(|r| r.listener.clone()).collect()
    }

    /// Total registrations across all priorities.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
