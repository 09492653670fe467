#![allow(dead_code)]

use herald::{Event, EventManager, Listener, Params};
use parking_lot::Mutex;
use std::sync::Arc;

// ============================================================================
// Accumulating Listeners
// ============================================================================

/// Shared log carried in an event's parameters.
pub type Accumulator = Arc<Mutex<Vec<i32>>>;

pub const ACCUMULATOR: &str = "accumulator";

/// A `test` event carrying a fresh accumulator.
pub fn accumulating_event() -> (Event, Accumulator) {
    let accumulator = Accumulator::default();
    let event = Event::new("test").with_param(ACCUMULATOR, Arc::clone(&accumulator));
    (event, accumulator)
}

/// A listener pushing `value` into the event's accumulator.
pub fn accumulate(value: i32) -> Listener<()> {
    Listener::from_fn(move |event: &mut Event| {
        event
            .param::<Accumulator>(ACCUMULATOR)
            .expect("event carries an accumulator")
            .lock()
            .push(value);
    })
}

pub fn values(accumulator: &Accumulator) -> Vec<i32> {
    accumulator.lock().clone()
}

// ============================================================================
// Constant Listeners
// ============================================================================

pub fn returning<R>(value: R) -> Listener<R>
where
    R: Clone + Send + Sync + 'static,
{
    Listener::from_fn(move |_: &mut Event| value.clone())
}

/// Trigger `name` with no target or params and collect the responses.
pub fn fire<R>(events: &EventManager<R>, name: &str) -> Vec<R> {
    events
        .trigger(name, None, Params::new())
        .expect("trigger succeeds")
        .into_vec()
}
