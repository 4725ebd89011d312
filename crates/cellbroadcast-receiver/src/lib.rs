//! # Cell Broadcast Receiver
//!
//! Reacts to device-state events by reissuing channel-configuration commands:
//! - [`CarrierTechnologyResolver`]: GSM or CDMA command variant
//! - [`ReconfigurationTrigger`]: when to issue a command, with debouncing
//! - [`CellBroadcastReceiver`]: inbound dispatch and the privilege check for
//!   broadcast messages

pub mod receiver;
pub mod resolver;
pub mod trigger;

pub use receiver::{CellBroadcastReceiver, Dispatch};
pub use resolver::CarrierTechnologyResolver;
pub use trigger::{ReconfigurationTrigger, TriggerReason, TriggerState};
