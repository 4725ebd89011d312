//! Event type definitions for the event bus.
//!
//! Events announce what the core did after the fact; nothing in the core
//! makes decisions based on them. They are cloneable and serializable so
//! subscribers can log or replay them.

use serde::{Deserialize, Serialize};

use crate::data::{BroadcastKind, ConfigCommand, SubscriptionId};

/// Root event enum for all application events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Channel configuration hand-offs
    Radio(RadioEvent),
    /// Broadcast message delivery
    Alert(AlertEvent),
    /// Preference edits and tab selection
    Settings(SettingsEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Radio(_) => EventCategory::Radio,
            AppEvent::Alert(_) => EventCategory::Alert,
            AppEvent::Settings(_) => EventCategory::Settings,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Radio(e) => e.description(),
            AppEvent::Alert(e) => e.description(),
            AppEvent::Settings(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Channel configuration events.
    Radio,
    /// Broadcast delivery events.
    Alert,
    /// Settings events.
    Settings,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Radio => write!(f, "Radio"),
            EventCategory::Alert => write!(f, "Alert"),
            EventCategory::Settings => write!(f, "Settings"),
        }
    }
}

/// Channel configuration events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RadioEvent {
    /// A command was handed to the radio configurator.
    ChannelsConfigured {
        /// The command that was handed off.
        command: ConfigCommand,
    },
    /// The radio configurator refused the hand-off.
    HandOffFailed {
        /// The command that was refused.
        command: ConfigCommand,
        /// Error message from the collaborator.
        error: String,
    },
}

impl RadioEvent {
    fn description(&self) -> String {
        match self {
            RadioEvent::ChannelsConfigured { command } => format!("Configured {}", command),
            RadioEvent::HandOffFailed { command, error } => {
                format!("Hand-off of {} failed: {}", command, error)
            }
        }
    }
}

/// Broadcast delivery events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlertEvent {
    /// A verified message was forwarded to the alert service.
    Forwarded {
        /// Delivering action.
        kind: BroadcastKind,
        /// Broadcast channel.
        channel: u16,
    },
}

impl AlertEvent {
    fn description(&self) -> String {
        match self {
            AlertEvent::Forwarded { kind, channel } => {
                format!("Forwarded {} on channel {}", kind, channel)
            }
        }
    }
}

/// Settings events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingsEvent {
    /// A preference value was persisted.
    PreferenceChanged {
        /// Logical preference key.
        key: String,
        /// Slot the value is stored for; `None` for device-global keys.
        subscription: Option<SubscriptionId>,
        /// New value, rendered as text.
        value: String,
    },
    /// The active subscription changed.
    SubscriptionSelected {
        /// Newly active slot.
        subscription: SubscriptionId,
    },
}

impl SettingsEvent {
    fn description(&self) -> String {
        match self {
            SettingsEvent::PreferenceChanged {
                key,
                subscription,
                value,
            } => match subscription {
                Some(sub) => format!("{} = {} ({})", key, value, sub),
                None => format!("{} = {}", key, value),
            },
            SettingsEvent::SubscriptionSelected { subscription } => {
                format!("Selected {}", subscription)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ChannelVariant;

    #[test]
    fn test_categories() {
        let radio = AppEvent::Radio(RadioEvent::ChannelsConfigured {
            command: ConfigCommand::enable_channels(ChannelVariant::Gsm),
        });
        assert_eq!(radio.category(), EventCategory::Radio);

        let settings = AppEvent::Settings(SettingsEvent::SubscriptionSelected {
            subscription: SubscriptionId(1),
        });
        assert_eq!(settings.category(), EventCategory::Settings);
        assert_eq!(settings.description(), "Selected SUB2");
    }

    #[test]
    fn test_preference_description() {
        let event = SettingsEvent::PreferenceChanged {
            key: "enable_alert_vibrate".to_string(),
            subscription: Some(SubscriptionId(0)),
            value: "false".to_string(),
        };
        assert_eq!(
            AppEvent::Settings(event).description(),
            "enable_alert_vibrate = false (SUB1)"
        );
    }
}
