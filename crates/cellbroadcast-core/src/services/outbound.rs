//! Outbound collaborators: radio configuration and alert delivery.

use tokio::sync::mpsc;

use crate::data::{BroadcastMessage, ConfigCommand};
use crate::error::DispatchError;

/// Receives channel-configuration commands
///
/// Implementations must return without waiting for the hardware to be
/// reprogrammed; the hand-off itself is the unit of success.
pub trait RadioConfigurator {
    /// Hand off an enable-channels command
    fn enable_channels(&self, command: ConfigCommand) -> Result<(), DispatchError>;
}

/// Receives broadcast messages that passed the privilege check
pub trait AlertService {
    /// Hand off a message for rendering
    fn forward(&self, message: BroadcastMessage) -> Result<(), DispatchError>;
}

/// Radio configurator that queues commands on an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelRadioConfigurator {
    tx: mpsc::UnboundedSender<ConfigCommand>,
}

impl ChannelRadioConfigurator {
    /// Create the configurator and the receiving end for the config service
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ConfigCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RadioConfigurator for ChannelRadioConfigurator {
    fn enable_channels(&self, command: ConfigCommand) -> Result<(), DispatchError> {
        self.tx.send(command).map_err(|_| DispatchError::Closed {
            target: "config service".to_string(),
        })
    }
}

/// Alert service that queues messages on an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelAlertService {
    tx: mpsc::UnboundedSender<BroadcastMessage>,
}

impl ChannelAlertService {
    /// Create the service and the receiving end for the alert pipeline
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BroadcastMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AlertService for ChannelAlertService {
    fn forward(&self, message: BroadcastMessage) -> Result<(), DispatchError> {
        self.tx.send(message).map_err(|_| DispatchError::Closed {
            target: "alert service".to_string(),
        })
    }
}
