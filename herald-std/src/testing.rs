//! Testing utilities for Herald.
//!
//! - [`RecordingListener`]: records the name of every event it receives
//! - [`CountingListener`]: counts invocations
//! - [`OrderRecorder`]: builds listeners that log a label into a shared
//!   sequence, for asserting invocation order

use herald_core::{Event, Listener};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Listener
// ============================================================================

/// Records the names of the events it is invoked with.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingListener::new();
/// events.attach("*", recorder.listener("ok"))?;
/// events.trigger("save", None, Params::new())?;
/// assert_eq!(recorder.events(), vec!["save"]);
/// ```
#[derive(Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingListener {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that records into this recorder and returns `response`.
    ///
    /// Every call builds a new listener with its own identity.
    pub fn listener<R>(&self, response: R) -> Listener<R>
    where
        R: Clone + Send + Sync + 'static,
    {
        let events = Arc::clone(&self.events);
        Listener::from_fn(move |event: &mut Event| {
            events.lock().push(event.name().to_owned());
            response.clone()
        })
    }

    /// Recorded event names, oldest first.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    /// Number of recorded invocations.
    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

// ============================================================================
// Counting Listener
// ============================================================================

/// Counts how often its listeners are invoked.
#[derive(Clone, Default)]
pub struct CountingListener {
    count: Arc<AtomicUsize>,
}

impl CountingListener {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that bumps this counter and returns `R::default()`.
    pub fn listener<R: Default + 'static>(&self) -> Listener<R> {
        let count = Arc::clone(&self.count);
        Listener::from_fn(move |_: &mut Event| {
            count.fetch_add(1, Ordering::SeqCst);
            R::default()
        })
    }

    /// Invocations so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

// ============================================================================
// Order Recorder
// ============================================================================

/// Shared log of listener labels in invocation order.
///
/// # Example
///
/// ```rust,ignore
/// let order = OrderRecorder::new();
/// events.attach_with_priority("foo", order.listener("low"), 1)?;
/// events.attach_with_priority("foo", order.listener("high"), 10)?;
/// events.trigger("foo", None, Params::new())?;
/// assert_eq!(order.take(), vec!["high", "low"]);
/// ```
#[derive(Clone, Default)]
pub struct OrderRecorder {
    order: Arc<Mutex<Vec<String>>>,
}

impl OrderRecorder {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener appending `label` to the log and returning it.
    pub fn listener(&self, label: impl Into<String>) -> Listener<String> {
        let order = Arc::clone(&self.order);
        let label = label.into();
        Listener::from_fn(move |_: &mut Event| {
            order.lock().push(label.clone());
            label.clone()
        })
    }

    /// The labels logged so far.
    pub fn order(&self) -> Vec<String> {
        self.order.lock().clone()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.order.lock())
    }
}
