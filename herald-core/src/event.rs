//! # Event
//!
//! The value object handed to every listener during a trigger.
//!
//! An [`Event`] carries:
//!
//! - a **name** identifying what happened (`"save.post"`, `"render"`, ...)
//! - an optional **target**, usually the component that emitted the event
//! - a **parameter bag** of heterogeneous, shared values
//! - a **propagation flag** listeners use to halt the remaining invocations
//!
//! Targets and parameters are stored as [`Value`]s (`Arc<dyn Any>`), so cloning
//! an event is cheap and listeners downcast to the concrete type they expect.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut event = Event::new("save.post").with_param("id", 42_u64);
//! assert_eq!(event.param::<u64>("id"), Some(&42));
//! event.stop_propagation(true);
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A shared, type-erased value stored as an event target or parameter.
pub type Value = Arc<dyn Any + Send + Sync>;

/// The parameter bag of an [`Event`].
#[derive(Clone, Default)]
pub struct Params {
    values: HashMap<String, Value>,
}

impl Params {
    /// Create an empty parameter bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, returning the bag for chaining.
    pub fn with<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a parameter.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Arc::new(value));
    }

    /// Insert or replace a parameter with an already shared value.
    pub fn insert_value(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Get a parameter downcast to `T`.
    ///
    /// Returns `None` if the key is absent or holds a different type.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Get the shared value stored under `key`.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Remove a parameter.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Returns `true` if a parameter is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Overlay `other` on top of this bag; keys in `other` win.
    pub fn merge(&mut self, other: Params) {
        self.values.extend(other.values);
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the bag holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over parameter keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("Params").field("keys", &keys).finish()
    }
}

/// An event passed to listeners.
#[derive(Clone, Default)]
pub struct Event {
    name: String,
    target: Option<Value>,
    params: Params,
    propagation_stopped: bool,
}

impl Event {
    /// Create a named event with no target and no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the target, returning the event for chaining.
    pub fn with_target<T: Any + Send + Sync>(mut self, target: T) -> Self {
        self.set_target(Some(Arc::new(target)));
        self
    }

    /// Set a parameter, returning the event for chaining.
    pub fn with_param<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.set_param(key, value);
        self
    }

    /// The event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the event.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The raw target, if any.
    pub fn target_value(&self) -> Option<&Value> {
        self.target.as_ref()
    }

    /// The target downcast to `T`.
    pub fn target<T: Any>(&self) -> Option<&T> {
        self.target.as_ref().and_then(|t| t.downcast_ref::<T>())
    }

    /// Replace the target.
    pub fn set_target(&mut self, target: Option<Value>) {
        self.target = target;
    }

    /// The parameter bag.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Mutable access to the parameter bag.
    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Replace the whole parameter bag.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Get a parameter downcast to `T`.
    pub fn param<T: Any>(&self, key: &str) -> Option<&T> {
        self.params.get(key)
    }

    /// Get a parameter downcast to `T`, or `default` if absent or mistyped.
    pub fn param_or<'a, T: Any>(&'a self, key: &str, default: &'a T) -> &'a T {
        self.params.get(key).unwrap_or(default)
    }

    /// Set a single parameter.
    pub fn set_param<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.params.insert(key, value);
    }

    /// Set or clear the propagation-stopped flag.
    pub fn stop_propagation(&mut self, stop: bool) {
        self.propagation_stopped = stop;
    }

    /// Returns `true` if a listener asked to halt the remaining invocations.
    pub fn propagation_is_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("has_target", &self.target.is_some())
            .field("params", &self.params)
            .field("propagation_stopped", &self.propagation_stopped)
            .finish()
    }
}
