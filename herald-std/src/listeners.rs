//! Stock listeners.

use herald_core::{Event, Listener};

/// A listener that logs every event it sees and returns `R::default()`.
///
/// Attach it to the wildcard event to trace everything a manager triggers.
#[cfg(feature = "tracing")]
pub fn tracing_listener<R: Default + 'static>() -> Listener<R> {
    Listener::from_fn(|event: &mut Event| {
        tracing::info!(
            event = event.name(),
            params = ?event.params(),
            has_target = event.target_value().is_some(),
            "event triggered"
        );
        R::default()
    })
}

/// Wrap `listener` so that propagation stops once it has returned.
///
/// Errors from `listener` are passed through and leave the flag untouched.
pub fn stopping<R: 'static>(listener: Listener<R>) -> Listener<R> {
    Listener::new(move |event: &mut Event| {
        let response = listener.call(event)?;
        event.stop_propagation(true);
        Ok(response)
    })
}
