//! # Event Manager
//!
//! The per-instance notification system. Components attach listeners to named
//! events; triggering an event invokes every matching listener in priority
//! order and collects their results.
//!
//! Listeners for a trigger come from three places:
//!
//! 1. listeners attached to the exact event name
//! 2. listeners attached to the wildcard event
//! 3. listeners registered in an injected [`SharedEventManager`] for one of
//!    this manager's identifiers
//!
//! They are merged into one order: priority descending, then the source order
//! above (shared listeners ordered by identifier group), then attach order.
//!
//! # Example
//!
//! ```rust,ignore
//! let events: EventManager<&str> = EventManager::new();
//! events.attach("e", Listener::from_fn(|_| "x"))?;
//! events.attach("e", Listener::from_fn(|_| "y"))?;
//!
//! let responses = events.trigger("e", None, Params::new())?;
//! assert_eq!(responses.first(), Some(&"x"));
//! assert_eq!(responses.last(), Some(&"y"));
//! ```
//!
//! # Concurrency
//!
//! State lives behind a mutex that is released before any listener runs.
//! Listeners may therefore attach, detach or trigger on the same manager;
//! such changes only affect later triggers.

use crate::{local::LocalRegistry, shared::SharedEventManager, sync::SharedListenerSync};
use herald_core::{
    DEFAULT_PRIORITY, Event, EventError, Listener, Params, Predicate, ResponseCollection, Value,
    is_wildcard, validate_event_name, validate_identifier,
};
use indexmap::IndexSet;
use parking_lot::Mutex;
use std::sync::Arc;

struct ManagerState<R> {
    registry: LocalRegistry<R>,
    sync: SharedListenerSync<R>,
    identifiers: Vec<String>,
    identifiers_version: u64,
    prototype: Event,
}

impl<R> ManagerState<R> {
    fn replace_identifiers(&mut self, identifiers: IndexSet<String>) {
        let identifiers: Vec<String> = identifiers.into_iter().collect();
        if identifiers != self.identifiers {
            self.identifiers = identifiers;
            self.identifiers_version += 1;
        }
    }
}

/// A priority-ordered, identifier-aware event manager.
pub struct EventManager<R> {
    state: Mutex<ManagerState<R>>,
    shared: Option<Arc<SharedEventManager<R>>>,
}

impl<R> Default for EventManager<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> std::fmt::Debug for EventManager<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("EventManager")
            .field("identifiers", &state.identifiers)
            .field("events", &state.registry.events().collect::<Vec<_>>())
            .field("shared", &self.shared.is_some())
            .finish()
    }
}

impl<R> EventManager<R> {
    /// Create a manager with no identifiers and no shared manager.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ManagerState {
                registry: LocalRegistry::new(),
                sync: SharedListenerSync::new(),
                identifiers: Vec::new(),
                identifiers_version: 0,
                prototype: Event::default(),
            }),
            shared: None,
        }
    }

    /// Create a manager pulling shared listeners for `identifiers`.
    pub fn with_shared<I, S>(
        shared: Arc<SharedEventManager<R>>,
        identifiers: I,
    ) -> Result<Self, EventError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder().shared(shared).identifiers(identifiers).build()
    }

    /// Start building a manager.
    pub fn builder() -> EventManagerBuilder<R> {
        EventManagerBuilder::new()
    }

    /// The injected shared manager, if any.
    pub fn shared_manager(&self) -> Option<&Arc<SharedEventManager<R>>> {
        self.shared.as_ref()
    }

    // ------------------------------------------------------------------------
    // Identifiers
    // ------------------------------------------------------------------------

    /// Identifiers used to pull shared listeners, in insertion order.
    pub fn identifiers(&self) -> Vec<String> {
        self.state.lock().identifiers.clone()
    }

    /// Replace the identifiers. Duplicates are dropped, first occurrence wins.
    pub fn set_identifiers<I, S>(&self, identifiers: I) -> Result<(), EventError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let identifiers = collect_identifiers(identifiers)?;
        self.state.lock().replace_identifiers(identifiers);
        Ok(())
    }

    /// Append identifiers, skipping ones already present.
    pub fn add_identifiers<I, S>(&self, identifiers: I) -> Result<(), EventError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let added = collect_identifiers(identifiers)?;
        let mut state = self.state.lock();
        let merged: IndexSet<String> = state.identifiers.iter().cloned().chain(added).collect();
        state.replace_identifiers(merged);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Event prototype
    // ------------------------------------------------------------------------

    /// Set the event cloned by name-based triggers.
    ///
    /// Its target and parameters act as defaults for every trigger.
    pub fn set_event_prototype(&self, prototype: Event) {
        self.state.lock().prototype = prototype;
    }

    /// A clone of the current event prototype.
    pub fn event_prototype(&self) -> Event {
        self.state.lock().prototype.clone()
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Attach `listener` to `event` at the default priority.
    pub fn attach(&self, event: &str, listener: Listener<R>) -> Result<Listener<R>, EventError> {
        self.attach_with_priority(event, listener, DEFAULT_PRIORITY)
    }

    /// Attach `listener` to `event` at `priority`. Higher priorities run first.
    ///
    /// Attaching to the wildcard event makes the listener run for every event.
    pub fn attach_with_priority(
        &self,
        event: &str,
        listener: Listener<R>,
        priority: i32,
    ) -> Result<Listener<R>, EventError> {
        validate_event_name(event)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(event, priority, listener = %listener.id(), "listener attached");
        Ok(self.state.lock().registry.attach(event, listener, priority))
    }

    /// Detach `listener` from `event`, or from everything when `event` is
    /// `None` or the wildcard.
    ///
    /// Detaching from a named event leaves a wildcard registration of the same
    /// listener in place. Detaching an unknown listener is a no-op.
    pub fn detach(&self, listener: &Listener<R>, event: Option<&str>) -> Result<(), EventError> {
        if let Some(event) = event {
            validate_event_name(event)?;
        }
        let removed = self.state.lock().registry.detach(listener.id(), event);
        #[cfg(feature = "tracing")]
        tracing::debug!(?event, listener = %listener.id(), removed, "listener detached");
        #[cfg(not(feature = "tracing"))]
        let _ = removed;
        Ok(())
    }

    /// Forget every local listener of `event`.
    ///
    /// Wildcard and shared listeners are resolved again on the next trigger.
    /// Clearing the wildcard event removes every wildcard listener instead.
    /// Returns `false` if the event had no listeners to clear.
    pub fn clear_listeners(&self, event: &str) -> bool {
        let mut state = self.state.lock();
        let cleared = state.registry.clear(event);
        if cleared {
            state.sync.invalidate(event);
            #[cfg(feature = "tracing")]
            tracing::debug!(event, "listeners cleared");
        }
        cleared
    }

    /// Names of events with local registrations, in creation order.
    pub fn events(&self) -> Vec<String> {
        self.state.lock().registry.events().map(str::to_owned).collect()
    }

    /// The listeners a trigger of `event` would invoke, in order.
    ///
    /// Runs the same resolution as a trigger, including shared listener
    /// reconciliation, without invoking anything.
    pub fn listeners(&self, event: &str) -> Result<Vec<Listener<R>>, EventError> {
        validate_trigger_name(event)?;
        self.resolve(event)
    }

    // ------------------------------------------------------------------------
    // Triggering
    // ------------------------------------------------------------------------

    /// Trigger `event`, invoking every listener.
    pub fn trigger(
        &self,
        event: &str,
        target: Option<Value>,
        params: Params,
    ) -> Result<ResponseCollection<R>, EventError> {
        let mut event = self.prepare(event, target, params);
        self.trigger_listeners(&mut event, None)
    }

    /// Trigger `event`, stopping after the first listener whose result
    /// satisfies `predicate`.
    pub fn trigger_until<P>(
        &self,
        predicate: P,
        event: &str,
        target: Option<Value>,
        params: Params,
    ) -> Result<ResponseCollection<R>, EventError>
    where
        P: Fn(&R) -> bool,
    {
        let mut event = self.prepare(event, target, params);
        self.trigger_listeners(&mut event, Some(&predicate as &Predicate<'_, R>))
    }

    /// Trigger a caller-built event.
    ///
    /// Changes listeners make to the event stay visible to the caller.
    pub fn trigger_event(&self, event: &mut Event) -> Result<ResponseCollection<R>, EventError> {
        self.trigger_listeners(event, None)
    }

    /// Trigger a caller-built event, stopping after the first listener whose
    /// result satisfies `predicate`.
    pub fn trigger_event_until<P>(
        &self,
        predicate: P,
        event: &mut Event,
    ) -> Result<ResponseCollection<R>, EventError>
    where
        P: Fn(&R) -> bool,
    {
        self.trigger_listeners(event, Some(&predicate as &Predicate<'_, R>))
    }

    fn prepare(&self, name: &str, target: Option<Value>, params: Params) -> Event {
        let mut event = self.event_prototype();
        event.set_name(name);
        if target.is_some() {
            event.set_target(target);
        }
        event.params_mut().merge(params);
        event
    }

    fn trigger_listeners(
        &self,
        event: &mut Event,
        predicate: Option<&Predicate<'_, R>>,
    ) -> Result<ResponseCollection<R>, EventError> {
        let name = event.name().to_owned();
        validate_trigger_name(&name)?;

        event.stop_propagation(false);
        let listeners = self.resolve(&name)?;
        #[cfg(feature = "tracing")]
        tracing::trace!(event = %name, listeners = listeners.len(), "triggering");

        let mut responses = ResponseCollection::new();
        for listener in listeners {
            let response = listener.call(event).map_err(EventError::Listener)?;

            let propagation_stopped = event.propagation_is_stopped();
            let predicate_matched =
                !propagation_stopped && predicate.is_some_and(|predicate| predicate(&response));
            responses.push(response);

            if propagation_stopped || predicate_matched {
                #[cfg(feature = "tracing")]
                tracing::trace!(event = %name, propagation_stopped, predicate_matched, "trigger stopped");
                responses.set_stopped(true);
                break;
            }
        }

        Ok(responses)
    }

    /// Sync shared listeners, materialize wildcards and snapshot the order.
    fn resolve(&self, name: &str) -> Result<Vec<Listener<R>>, EventError> {
        let mut state = self.state.lock();
        let ManagerState {
            registry,
            sync,
            identifiers,
            identifiers_version,
            ..
        } = &mut *state;

        if let Some(shared) = &self.shared {
            sync.refresh(shared, identifiers.as_slice(), *identifiers_version, name, registry)?;
        }
        Ok(registry.resolve(name).listeners())
    }
}

fn validate_trigger_name(name: &str) -> Result<(), EventError> {
    if name.is_empty() {
        return Err(EventError::MissingEventName);
    }
    if is_wildcard(name) {
        return Err(EventError::InvalidArgument(
            "cannot trigger the wildcard event; use a concrete event name".into(),
        ));
    }
    Ok(())
}

fn collect_identifiers<I, S>(identifiers: I) -> Result<IndexSet<String>, EventError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    identifiers
        .into_iter()
        .map(|identifier| {
            let identifier = identifier.into();
            validate_identifier(&identifier)?;
            if is_wildcard(&identifier) {
                return Err(EventError::InvalidArgument(
                    "a manager identifier cannot be the wildcard".into(),
                ));
            }
            Ok(identifier)
        })
        .collect()
}

// ============================================================================
// EventManagerBuilder
// ============================================================================

/// Builder for an [`EventManager`].
///
/// # Example
/// ```ignore
/// let events = EventManager::builder()
///     .shared(shared.clone())
///     .identifiers(["Blog\\Post", "Blog\\Entity"])
///     .event_prototype(Event::default().with_param("locale", "en"))
///     .build()?;
/// ```
pub struct EventManagerBuilder<R> {
    shared: Option<Arc<SharedEventManager<R>>>,
    identifiers: Vec<String>,
    prototype: Event,
}

impl<R> Default for EventManagerBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> EventManagerBuilder<R> {
    /// Create a builder with no identifiers and no shared manager.
    pub fn new() -> Self {
        Self {
            shared: None,
            identifiers: Vec::new(),
            prototype: Event::default(),
        }
    }

    /// Inject a shared manager.
    pub fn shared(mut self, shared: Arc<SharedEventManager<R>>) -> Self {
        self.shared = Some(shared);
        self
    }

    /// Add identifiers.
    pub fn identifiers<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifiers.extend(identifiers.into_iter().map(Into::into));
        self
    }

    /// Set the event prototype.
    pub fn event_prototype(mut self, prototype: Event) -> Self {
        self.prototype = prototype;
        self
    }

    /// Build the manager, validating the identifiers.
    pub fn build(self) -> Result<EventManager<R>, EventError> {
        let identifiers = collect_identifiers(self.identifiers)?;
        let manager = EventManager {
            state: Mutex::new(ManagerState {
                registry: LocalRegistry::new(),
                sync: SharedListenerSync::new(),
                identifiers: identifiers.into_iter().collect(),
                identifiers_version: 0,
                prototype: self.prototype,
            }),
            shared: self.shared,
        };
        Ok(manager)
    }
}
