//! Error types for Herald.
//!
//! Every contract violation is reported synchronously at the offending call,
//! before any side effect takes place:
//!
//! - [`EventError::InvalidArgument`] - bad event name or identifier
//! - [`EventError::MissingEventName`] - trigger without a name
//! - [`EventError::Listener`] - a listener failed and aborted the trigger

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Herald operations.
#[derive(Error, Debug)]
pub enum EventError {
    /// An argument violated the contract of the called operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An event was triggered without a name.
    #[error("event is missing a name; cannot trigger")]
    MissingEventName,

    /// A listener returned an error; the remaining listeners were not invoked.
    #[error(transparent)]
    Listener(BoxError),
}

impl EventError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EventError::InvalidArgument(message.into())
    }

    /// Returns `true` if this is an [`EventError::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, EventError::InvalidArgument(_))
    }
}

impl From<BoxError> for EventError {
    fn from(err: BoxError) -> Self {
        EventError::Listener(err)
    }
}

/// Validates an event name used for registration.
///
/// Empty names are rejected. The wildcard token is accepted.
pub fn validate_event_name(name: &str) -> Result<(), EventError> {
    if name.is_empty() {
        return Err(EventError::invalid(
            "event name must be a non-empty string",
        ));
    }
    Ok(())
}

/// Validates a component identifier used for registration.
pub fn validate_identifier(identifier: &str) -> Result<(), EventError> {
    if identifier.is_empty() {
        return Err(EventError::invalid(
            "identifier must be a non-empty string",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_names_are_rejected() {
        assert!(validate_event_name("").unwrap_err().is_invalid_argument());
        assert!(validate_identifier("").unwrap_err().is_invalid_argument());
        assert!(validate_event_name("*").is_ok());
        assert!(validate_identifier("Foo").is_ok());
    }

    #[test]
    fn test_listener_error_is_transparent() {
        let inner: BoxError = "boom".into();
        let err = EventError::from(inner);
        assert_eq!(err.to_string(), "boom");
    }
}
