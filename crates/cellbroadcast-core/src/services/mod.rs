//! Collaborator interfaces
//!
//! The core never talks to the modem, the telephony stack or the alert
//! pipeline directly. It goes through these traits:
//! - [`TelephonyInfo`]: radio technology, slot count and SIM country queries
//! - [`RadioConfigurator`]: receives channel-configuration commands
//! - [`AlertService`]: receives verified broadcast messages
//!
//! Outbound hand-offs are fire-and-forget; the channel-backed implementations
//! only fail when the consuming side has gone away.

mod outbound;
mod telephony;

pub use outbound::*;
pub use telephony::*;
