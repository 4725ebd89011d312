//! # Cell Broadcast Core
//!
//! Core types, collaborator traits, and utilities shared by the receiver and
//! settings crates: subscription identity, coarse service state, channel
//! configuration commands, inbound device events, error types and the
//! application event bus.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod services;
pub mod types;

pub use data::{
    BroadcastKind, BroadcastMessage, ChannelVariant, ConfigCommand, Delivery, DeviceEvent,
    PhoneType, ServiceState, SubscriptionId,
};

pub use error::{DispatchError, TelephonyError};

pub use event_bus::{
    AlertEvent, AppEvent, EventBus, EventBusConfig, EventBusError, EventCategory, EventFilter,
    ListenerId, RadioEvent, SettingsEvent,
};

pub use services::{
    AlertService, ChannelAlertService, ChannelRadioConfigurator, RadioConfigurator,
    StaticTelephony, TelephonyInfo,
};

pub use types::{shared, Shared, SharedBus};
