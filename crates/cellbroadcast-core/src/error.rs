//! Error handling for the cell broadcast core
//!
//! Provides error types for the collaborators the core talks to:
//! - Telephony errors (technology and country queries)
//! - Dispatch errors (hand-off to the radio configurator or alert service)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Telephony collaborator error type
///
/// A telephony query failing is always transient from the point of view of
/// the core: callers fall back to a safe default and move on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelephonyError {
    /// The telephony service could not be reached
    #[error("Telephony service unavailable: {service}")]
    ServiceUnavailable {
        /// The service that was queried.
        service: String,
    },

    /// The service was reached but the query failed
    #[error("Telephony query {query} failed: {reason}")]
    QueryFailed {
        /// The query that was issued.
        query: String,
        /// The reason the query failed.
        reason: String,
    },
}

/// Hand-off error type
///
/// Raised when a command or message cannot be handed to an outbound
/// collaborator at all. Downstream failures are never observed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The collaborator is no longer accepting work
    #[error("{target} is closed")]
    Closed {
        /// The collaborator that refused the hand-off.
        target: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telephony_error_display() {
        let err = TelephonyError::ServiceUnavailable {
            service: "phone".to_string(),
        };
        assert_eq!(err.to_string(), "Telephony service unavailable: phone");

        let err = TelephonyError::QueryFailed {
            query: "active_phone_type".to_string(),
            reason: "remote died".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Telephony query active_phone_type failed: remote died"
        );
    }

    #[test]
    fn test_dispatch_error_display() {
        let err = DispatchError::Closed {
            target: "config service".to_string(),
        };
        assert_eq!(err.to_string(), "config service is closed");
    }
}
