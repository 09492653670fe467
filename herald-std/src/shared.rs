//! # Shared Event Manager
//!
//! A registry of listeners keyed by `(identifier, event)`, independent of any
//! single [`EventManager`]. Managers advertise identifiers and pull in the
//! shared listeners registered for them when they trigger.
//!
//! Both keys accept the wildcard token:
//!
//! - wildcard **identifier**: run for any component
//! - wildcard **event**: run for any event of that identifier
//!
//! The registry is meant to be wrapped in an `Arc` and injected into every
//! manager that should see it:
//!
//! ```rust,ignore
//! let shared = Arc::new(SharedEventManager::new());
//! shared.attach("Blog\\Post", "save", Listener::from_fn(|_| "cached"))?;
//!
//! let events = EventManager::with_shared(shared.clone(), ["Blog\\Post"])?;
//! events.trigger("save", None, Params::new())?;
//! ```
//!
//! Every mutation bumps a generation counter, which lets managers detect an
//! unchanged registry in O(1).
//!
//! [`EventManager`]: crate::EventManager

use herald_core::{
    DEFAULT_PRIORITY, EventError, Listener, WILDCARD, is_wildcard, validate_event_name,
    validate_identifier,
};
use indexmap::IndexMap;
use parking_lot::RwLock;

#[derive(Debug)]
struct SharedEntry<R> {
    listener: Listener<R>,
    priority: i32,
    sequence: u64,
}

type EventTable<R> = IndexMap<String, Vec<SharedEntry<R>>>;

#[derive(Debug)]
struct SharedState<R> {
    identifiers: IndexMap<String, EventTable<R>>,
    generation: u64,
    next_sequence: u64,
}

/// A shared listener resolved for a set of identifiers and one event.
///
/// `rank` is the position of the group the listener was found in: for
/// identifier `i` of `n`, its exact-event listeners have rank `2i` and its
/// wildcard-event listeners `2i + 1`; the wildcard identifier follows with
/// `2n` and `2n + 1`.
#[derive(Debug)]
pub struct SharedListener<R> {
    listener: Listener<R>,
    priority: i32,
    rank: u32,
    sequence: u64,
}

impl<R> SharedListener<R> {
    /// The listener.
    pub fn listener(&self) -> &Listener<R> {
        &self.listener
    }

    /// The priority it was attached with.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The rank of the identifier group it was resolved from.
    pub fn rank(&self) -> u32 {
        self.rank
    }

    /// The shared registration sequence, unique per `attach` call.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub(crate) fn key(&self) -> (u64, u32) {
        (self.sequence, self.rank)
    }
}

impl<R> Clone for SharedListener<R> {
    fn clone(&self) -> Self {
        Self {
            listener: self.listener.clone(),
            priority: self.priority,
            rank: self.rank,
            sequence: self.sequence,
        }
    }
}

impl<R> PartialEq for SharedListener<R> {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
            && self.rank == other.rank
            && self.priority == other.priority
            && self.listener == other.listener
    }
}

impl<R> Eq for SharedListener<R> {}

/// Cross-manager listener registry.
#[derive(Debug)]
pub struct SharedEventManager<R> {
    state: RwLock<SharedState<R>>,
}

impl<R> Default for SharedEventManager<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> SharedEventManager<R> {
    /// Create an empty shared registry.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SharedState {
                identifiers: IndexMap::new(),
                generation: 0,
                next_sequence: 0,
            }),
        }
    }

    /// Attach `listener` to `event` for components identified by
    /// `identifier`, at the default priority.
    pub fn attach(
        &self,
        identifier: &str,
        event: &str,
        listener: Listener<R>,
    ) -> Result<Listener<R>, EventError> {
        self.attach_with_priority(identifier, event, listener, DEFAULT_PRIORITY)
    }

    /// Attach `listener` to `event` for components identified by
    /// `identifier`, at `priority`.
    ///
    /// Either key may be the wildcard token.
    pub fn attach_with_priority(
        &self,
        identifier: &str,
        event: &str,
        listener: Listener<R>,
        priority: i32,
    ) -> Result<Listener<R>, EventError> {
        validate_identifier(identifier)?;
        validate_event_name(event)?;

        let mut state = self.state.write();
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.generation += 1;
        state
            .identifiers
            .entry(identifier.to_owned())
            .or_default()
            .entry(event.to_owned())
            .or_default()
            .push(SharedEntry {
                listener: listener.clone(),
                priority,
                sequence,
            });

        #[cfg(feature = "tracing")]
        tracing::debug!(identifier, event, priority, listener = %listener.id(), "shared listener attached");
        Ok(listener)
    }

    /// Detach every registration of `listener`.
    ///
    /// `None` for the identifier or event means "all of them". Detaching a
    /// listener that is not registered is a no-op.
    pub fn detach(
        &self,
        listener: &Listener<R>,
        identifier: Option<&str>,
        event: Option<&str>,
    ) -> Result<(), EventError> {
        if let Some(identifier) = identifier {
            validate_identifier(identifier)?;
        }
        if let Some(event) = event {
            validate_event_name(event)?;
        }

        let id = listener.id();
        let mut state = self.state.write();
        let mut removed = 0;

        let tables = state
            .identifiers
            .iter_mut()
            .filter(|(key, _)| identifier.is_none_or(|wanted| key.as_str() == wanted));
        for (_, table) in tables {
            let lists = table
                .iter_mut()
                .filter(|(key, _)| event.is_none_or(|wanted| key.as_str() == wanted));
            for (_, entries) in lists {
                let before = entries.len();
                entries.retain(|entry| entry.listener.id() != id);
                removed += before - entries.len();
            }
        }

        if removed > 0 {
            state.generation += 1;
            #[cfg(feature = "tracing")]
            tracing::debug!(?identifier, ?event, listener = %id, removed, "shared listener detached");
        }
        Ok(())
    }

    /// Resolve the shared listeners for `identifiers` and a concrete `event`.
    ///
    /// The result lists, for each identifier in order, its exact-event
    /// listeners then its wildcard-event listeners, followed by the wildcard
    /// identifier's exact-event and wildcard-event listeners. Each group keeps
    /// attach order.
    pub fn listeners<S: AsRef<str>>(
        &self,
        identifiers: &[S],
        event: &str,
    ) -> Result<Vec<SharedListener<R>>, EventError> {
        self.snapshot(identifiers, event).map(|(_, listeners)| listeners)
    }

    /// Like [`listeners`](Self::listeners), also returning the generation the
    /// result was read at.
    pub(crate) fn snapshot<S: AsRef<str>>(
        &self,
        identifiers: &[S],
        event: &str,
    ) -> Result<(u64, Vec<SharedListener<R>>), EventError> {
        validate_event_name(event)?;
        if is_wildcard(event) {
            return Err(EventError::InvalidArgument(
                "shared listeners can only be resolved for a concrete event name".into(),
            ));
        }
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            validate_identifier(identifier)?;
            if is_wildcard(identifier) {
                return Err(EventError::InvalidArgument(
                    "shared listeners can only be resolved for concrete identifiers".into(),
                ));
            }
        }

        let state = self.state.read();
        let mut listeners = Vec::new();
        let groups = identifiers
            .iter()
            .map(AsRef::as_ref)
            .chain(std::iter::once(WILDCARD));

        for (index, identifier) in groups.enumerate() {
            let Some(table) = state.identifiers.get(identifier) else {
                continue;
            };
            let base = (index * 2) as u32;
            for (offset, key) in [event, WILDCARD].into_iter().enumerate() {
                let Some(entries) = table.get(key) else {
                    continue;
                };
                listeners.extend(entries.iter().map(|entry| SharedListener {
                    listener: entry.listener.clone(),
                    priority: entry.priority,
                    rank: base + offset as u32,
                    sequence: entry.sequence,
                }));
            }
        }

        Ok((state.generation, listeners))
    }

    /// Remove listeners of `identifier`, for one event or for all of them.
    ///
    /// Clearing a concrete event leaves the identifier's wildcard-event
    /// listeners in place. Returns `false` if the identifier is unknown.
    pub fn clear_listeners(&self, identifier: &str, event: Option<&str>) -> bool {
        let mut state = self.state.write();
        if !state.identifiers.contains_key(identifier) {
            return false;
        }

        let changed = match event {
            None => state.identifiers.shift_remove(identifier).is_some(),
            Some(event) => state
                .identifiers
                .get_mut(identifier)
                .is_some_and(|table| table.shift_remove(event).is_some()),
        };

        if changed {
            state.generation += 1;
            #[cfg(feature = "tracing")]
            tracing::debug!(identifier, ?event, "shared listeners cleared");
        }
        true
    }

    /// Event names with registrations for `identifier`, in registration order.
    pub fn events(&self, identifier: &str) -> Vec<String> {
        self.state
            .read()
            .identifiers
            .get(identifier)
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// The current generation. It changes whenever the registry is mutated.
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }
}
