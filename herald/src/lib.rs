//! # herald - In-Process Event Manager
//!
//! `herald` lets components announce named events and lets other code react to
//! them, without either side knowing the other.
//!
//! - Listeners run in **priority order** (higher first, FIFO among equals).
//! - The wildcard event `"*"` attaches a listener to **every event**.
//! - A [`SharedEventManager`] holds listeners keyed by **component
//!   identifier**, picked up by every [`EventManager`] carrying that
//!   identifier, including listeners registered after the manager was built.
//! - Triggers collect results into a [`ResponseCollection`] and can be
//!   **short-circuited** by a listener stopping propagation or by a caller
//!   predicate.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use herald::prelude::*;
//! use std::sync::Arc;
//!
//! let shared = Arc::new(SharedEventManager::new());
//! shared.attach("Blog\\Post", "save", Listener::from_fn(|_| "audit"))?;
//!
//! let events = EventManager::with_shared(shared, ["Blog\\Post"])?;
//! events.attach("save", Listener::from_fn(|_| "persist"))?;
//!
//! let responses = events.trigger("save", None, Params::new())?;
//! assert_eq!(responses.into_vec(), vec!["persist", "audit"]);
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use herald_core::{
    // Constants
    DEFAULT_PRIORITY,
    WILDCARD,
    // Errors
    BoxError,
    // Listener
    DynListener,
    // Event
    Event,
    EventError,
    Listener,
    ListenerId,
    ListenerResult,
    Params,
    Predicate,
    // Response
    ResponseCollection,
    Value,
    is_wildcard,
    validate_event_name,
    validate_identifier,
};

pub use herald_std::{
    manager::{EventManager, EventManagerBuilder},
    shared::{SharedEventManager, SharedListener},
};

/// Listener storage and ordering internals.
pub mod registry {
    pub use herald_std::{
        local::LocalRegistry,
        priority::{Origin, Position, PriorityRegistry, Registration},
        sync::{SharedListenerSync, SyncOutcome},
    };
}

/// Stock listeners.
pub mod listeners {
    pub use herald_std::listeners::stopping;
    #[cfg(feature = "tracing")]
    pub use herald_std::listeners::tracing_listener;
}

/// Testing utilities.
pub mod testing {
    pub use herald_std::testing::{CountingListener, OrderRecorder, RecordingListener};
}

/// Prelude module - common imports for Herald.
///
/// # Usage
///
/// ```rust,ignore
/// use herald::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        BoxError,
        // Core types
        Event,
        EventError,
        // Managers
        EventManager,
        Listener,
        Params,
        ResponseCollection,
        SharedEventManager,
        // Constants
        WILDCARD,
    };
}
