//! # Listener
//!
//! A listener is any closure taking `&mut Event` and returning a result of the
//! manager's response type `R`. Closures are type-erased into a [`Listener`]
//! handle so that listeners of different concrete types can live in the same
//! registry.
//!
//! # Identity
//!
//! Every handle carries a [`ListenerId`] assigned at construction. Clones share
//! the id, so the handle passed to `attach` can later be passed to `detach`.
//! Two handles built from the same closure value are *different* listeners.
//!
//! ```rust,ignore
//! let listener = Listener::from_fn(|event: &mut Event| event.name().to_string());
//! events.attach("save", listener.clone())?;
//! events.detach(&listener, None)?;
//! ```

use crate::{error::BoxError, event::Event};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identity of a [`Listener`] handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// The result a listener produces.
pub type ListenerResult<R> = Result<R, BoxError>;

/// Object-safe listener callable.
pub trait DynListener<R>: Send + Sync {
    /// Invoke the listener.
    fn call(&self, event: &mut Event) -> ListenerResult<R>;
}

impl<R, F> DynListener<R> for F
where
    F: Fn(&mut Event) -> ListenerResult<R> + Send + Sync + 'static,
{
    fn call(&self, event: &mut Event) -> ListenerResult<R> {
        (self)(event)
    }
}

/// A type-erased, cheaply cloneable listener with a stable identity.
pub struct Listener<R> {
    id: ListenerId,
    inner: Arc<dyn DynListener<R>>,
}

impl<R: 'static> Listener<R> {
    /// Wrap a fallible closure.
    ///
    /// An `Err` returned by the closure aborts the trigger and is surfaced to
    /// the caller.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Event) -> ListenerResult<R> + Send + Sync + 'static,
    {
        Self {
            id: ListenerId::next(),
            inner: Arc::new(f),
        }
    }

    /// Wrap an infallible closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&mut Event) -> R + Send + Sync + 'static,
    {
        Self::new(move |event: &mut Event| Ok(f(event)))
    }
}

impl<R> Listener<R> {
    /// The identity shared by all clones of this handle.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Invoke the listener.
    pub fn call(&self, event: &mut Event) -> ListenerResult<R> {
        self.inner.call(event)
    }
}

impl<R> Clone for Listener<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> PartialEq for Listener<R> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<R> Eq for Listener<R> {}

impl<R> fmt::Debug for Listener<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener").field(&self.id).finish()
    }
}

/// A caller-supplied predicate that ends a trigger early when it returns
/// `true` for a listener result.
pub type Predicate<'a, R> = dyn Fn(&R) -> bool + 'a;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_identity() {
        let listener = Listener::from_fn(|_: &mut Event| 1);
        let cloned = listener.clone();
        assert_eq!(listener, cloned);
        assert_eq!(listener.id(), cloned.id());
    }

    #[test]
    fn test_distinct_handles_are_distinct_listeners() {
        let f = |_: &mut Event| 1;
        let a = Listener::from_fn(f);
        let b = Listener::from_fn(f);
        assert_ne!(a, b);
    }

    #[test]
    fn test_call_propagates_errors() {
        let ok = Listener::from_fn(|event: &mut Event| event.name().len());
        let failing: Listener<usize> = Listener::new(|_: &mut Event| Err("nope".into()));

        let mut event = Event::new("abc");
        assert_eq!(ok.call(&mut event).unwrap(), 3);
        assert_eq!(failing.call(&mut event).unwrap_err().to_string(), "nope");
    }
}
