//! # herald-core
//!
//! Core types for the Herald event manager.
//!
//! This crate has minimal dependencies and holds the values exchanged between
//! the dispatch engine (`herald-std`) and user code:
//!
//! - [`Event`] - the name, target, parameter bag and propagation flag handed
//!   to every listener
//! - [`Listener`] - a type-erased callable with a stable [`ListenerId`]
//! - [`ResponseCollection`] - the ordered listener results of one trigger
//!
//! # Constants
//!
//! - [`WILDCARD`] - the reserved event name / identifier matching everything
//! - [`DEFAULT_PRIORITY`] - the priority used when none is given
//!
//! # Error Types
//!
//! - [`EventError`] - Top-level error type
//! - [`BoxError`] - Listener error currency

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod event;
mod listener;
mod response;

// Re-exports
pub use error::{BoxError, EventError, validate_event_name, validate_identifier};
pub use event::{Event, Params, Value};
pub use listener::{DynListener, Listener, ListenerId, ListenerResult, Predicate};
pub use response::ResponseCollection;

/// Reserved token meaning "every event" (as an event name) or "every
/// component" (as a shared identifier).
pub const WILDCARD: &str = "*";

/// Priority used by `attach` when none is given. Higher values run earlier.
pub const DEFAULT_PRIORITY: i32 = 1;

/// Returns `true` if `name` is the [`WILDCARD`] token.
pub fn is_wildcard(name: &str) -> bool {
    name == WILDCARD
}
