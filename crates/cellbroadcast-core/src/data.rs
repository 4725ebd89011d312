//! Data models for cell broadcast configuration
//!
//! Provides the values that flow between device events, the reconfiguration
//! trigger and the radio collaborator:
//! - Subscription identity (one SIM/profile slot)
//! - Coarse service state
//! - Radio technology and channel-configuration commands
//! - Inbound device events and broadcast messages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one active SIM/profile slot
///
/// Zero-based, matching the phone slot index reported by telephony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub u32);

impl SubscriptionId {
    /// Slot index as used when namespacing storage keys
    pub fn slot(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tabs are labelled one-based
        write!(f, "SUB{}", self.0 + 1)
    }
}

impl From<u32> for SubscriptionId {
    fn from(slot: u32) -> Self {
        Self(slot)
    }
}

/// Coarse network registration state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    /// Registered and in service
    InService,
    /// Only emergency calls are possible
    EmergencyOnly,
    /// Out of service, powered off, or anything else
    Other,
}

impl ServiceState {
    /// Raw telephony code for in-service
    pub const RAW_IN_SERVICE: i32 = 0;
    /// Raw telephony code for emergency-only
    pub const RAW_EMERGENCY_ONLY: i32 = 2;

    /// Classify a raw telephony registration code
    pub fn from_raw(code: i32) -> Self {
        match code {
            Self::RAW_IN_SERVICE => Self::InService,
            Self::RAW_EMERGENCY_ONLY => Self::EmergencyOnly,
            _ => Self::Other,
        }
    }

    /// Whether entering this state warrants reconfiguring channels
    pub fn is_qualifying(&self) -> bool {
        matches!(self, Self::InService | Self::EmergencyOnly)
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InService => write!(f, "in-service"),
            Self::EmergencyOnly => write!(f, "emergency-only"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Phone type reported by telephony
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneType {
    /// No radio
    None,
    /// GSM/UMTS/LTE family
    #[default]
    Gsm,
    /// CDMA family
    Cdma,
    /// SIP-only
    Sip,
}

/// Channel set a configuration command enables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelVariant {
    /// GSM-style cell broadcast channels
    #[default]
    Gsm,
    /// CDMA-style broadcast service categories
    Cdma,
}

impl ChannelVariant {
    /// Action name understood by the radio configuration service
    pub fn action(&self) -> &'static str {
        match self {
            Self::Gsm => "enable_channels_gsm",
            Self::Cdma => "enable_channels_cdma",
        }
    }
}

impl From<PhoneType> for ChannelVariant {
    fn from(phone_type: PhoneType) -> Self {
        match phone_type {
            PhoneType::Cdma => Self::Cdma,
            _ => Self::Gsm,
        }
    }
}

impl fmt::Display for ChannelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gsm => write!(f, "GSM"),
            Self::Cdma => write!(f, "CDMA"),
        }
    }
}

/// Command telling the radio collaborator to (re)enable broadcast channels
///
/// Carries no channel list: the collaborator re-reads preferences itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigCommand {
    /// Channel family to program
    pub variant: ChannelVariant,
    /// Slot the command is scoped to, if any
    pub subscription: Option<SubscriptionId>,
}

impl ConfigCommand {
    /// Build a command for every slot
    pub fn enable_channels(variant: ChannelVariant) -> Self {
        Self {
            variant,
            subscription: None,
        }
    }

    /// Build a command scoped to one slot
    pub fn enable_channels_for(variant: ChannelVariant, subscription: SubscriptionId) -> Self {
        Self {
            variant,
            subscription: Some(subscription),
        }
    }
}

impl fmt::Display for ConfigCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subscription {
            Some(sub) => write!(f, "{} ({})", self.variant.action(), sub),
            None => write!(f, "{}", self.variant.action()),
        }
    }
}

/// Which broadcast action delivered a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastKind {
    /// Ordinary GSM cell broadcast
    CellBroadcast,
    /// GSM emergency cell broadcast (ETWS/CMAS)
    EmergencyCellBroadcast,
    /// CDMA emergency broadcast message
    EmergencyCdma,
}

impl fmt::Display for BroadcastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellBroadcast => write!(f, "cell broadcast"),
            Self::EmergencyCellBroadcast => write!(f, "emergency cell broadcast"),
            Self::EmergencyCdma => write!(f, "CDMA emergency message"),
        }
    }
}

/// Path a broadcast message arrived through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    /// Delivered through the permission-checked route
    Privileged,
    /// Delivered outside the permission-checked route
    Unprivileged,
}

impl Delivery {
    /// Build a delivery tag from a privilege flag
    pub fn from_flag(privileged: bool) -> Self {
        if privileged {
            Self::Privileged
        } else {
            Self::Unprivileged
        }
    }
}

/// A received broadcast message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    /// Delivering action
    pub kind: BroadcastKind,
    /// Broadcast channel (message identifier / service category)
    pub channel: u16,
    /// Slot the message was received on
    #[serde(default)]
    pub subscription: Option<SubscriptionId>,
    /// Message body
    #[serde(default)]
    pub body: String,
}

/// Inbound device events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceEvent {
    /// Boot completed
    Startup,
    /// Airplane mode toggled
    AirplaneModeChanged {
        /// Whether airplane mode is now on
        on: bool,
    },
    /// Network registration changed
    ServiceStateChanged {
        /// New coarse state
        state: ServiceState,
    },
    /// A broadcast message arrived
    BroadcastReceived {
        /// The message
        message: BroadcastMessage,
        /// The path it arrived through
        delivery: Delivery,
    },
    /// Any other action routed to the receiver
    Unrecognized {
        /// Action name as delivered
        action: String,
    },
}

impl DeviceEvent {
    /// Short description for logging
    pub fn description(&self) -> String {
        match self {
            Self::Startup => "startup".to_string(),
            Self::AirplaneModeChanged { on } => format!("airplane mode on: {}", on),
            Self::ServiceStateChanged { state } => format!("service state: {}", state),
            Self::BroadcastReceived { message, delivery } => {
                format!("{} on channel {} ({:?})", message.kind, message.channel, delivery)
            }
            Self::Unrecognized { action } => format!("unrecognized action {}", action),
        }
    }
}
