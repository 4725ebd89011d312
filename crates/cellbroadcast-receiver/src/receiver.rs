//! Inbound device event dispatch
//!
//! Entry point for everything the OS delivers to the cell broadcast
//! subsystem. Device-state events go to the reconfiguration trigger;
//! broadcast messages go to the alert service, but only when they carry the
//! privileged delivery tag.

use cellbroadcast_core::{
    AlertEvent, AlertService, AppEvent, BroadcastMessage, ConfigCommand, Delivery, DeviceEvent,
    Shared, SharedBus,
};
use serde::Serialize;
use std::rc::Rc;

use crate::trigger::ReconfigurationTrigger;

/// What the receiver did with an inbound event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Dispatch {
    /// The event was evaluated and caused no command
    NoAction,
    /// A configuration command was issued
    Configured {
        /// The issued command.
        command: ConfigCommand,
    },
    /// The message was forwarded to the alert service
    Forwarded,
    /// The message was forwardable but the alert service refused it
    Undelivered,
    /// The message arrived through an unprivileged path and was dropped
    Dropped,
    /// The event was not recognized
    Ignored,
}

/// Inbound event dispatcher
pub struct CellBroadcastReceiver {
    trigger: Shared<ReconfigurationTrigger>,
    alerts: Rc<dyn AlertService>,
    bus: SharedBus,
}

impl CellBroadcastReceiver {
    /// Create a receiver sharing `trigger` with the settings controller
    pub fn new(
        trigger: Shared<ReconfigurationTrigger>,
        alerts: Rc<dyn AlertService>,
        bus: SharedBus,
    ) -> Self {
        Self {
            trigger,
            alerts,
            bus,
        }
    }

    /// The shared trigger
    pub fn trigger(&self) -> &Shared<ReconfigurationTrigger> {
        &self.trigger
    }

    /// Handle one inbound event to completion
    pub fn on_receive(&self, event: DeviceEvent) -> Dispatch {
        tracing::debug!("on_receive {}", event.description());

        match event {
            DeviceEvent::BroadcastReceived { message, delivery } => {
                self.on_broadcast(message, delivery)
            }
            DeviceEvent::Unrecognized { action } => {
                tracing::warn!("on_receive() unexpected action {}", action);
                Dispatch::Ignored
            }
            device_state => match self.trigger.borrow_mut().handle(&device_state) {
                Some(command) => Dispatch::Configured { command },
                None => Dispatch::NoAction,
            },
        }
    }

    fn on_broadcast(&self, message: BroadcastMessage, delivery: Delivery) -> Dispatch {
        // Anything outside the permission-checked route is treated as spoofed
        if delivery != Delivery::Privileged {
            tracing::error!("ignoring unprivileged action received: {}", message.kind);
            return Dispatch::Dropped;
        }

        let (kind, channel) = (message.kind, message.channel);
        match self.alerts.forward(message) {
            Ok(()) => {
                self.bus
                    .publish(AppEvent::Alert(AlertEvent::Forwarded { kind, channel }))
                    .ok();
                Dispatch::Forwarded
            }
            Err(e) => {
                tracing::warn!("{} on channel {} not delivered: {}", kind, channel, e);
                Dispatch::Undelivered
            }
        }
    }
}

impl std::fmt::Debug for CellBroadcastReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellBroadcastReceiver")
            .field("trigger", &self.trigger.borrow())
            .finish_non_exhaustive()
    }
}
