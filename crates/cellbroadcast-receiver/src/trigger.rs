//! Channel reconfiguration trigger
//!
//! Decides, from device-state events and preference changes, when to hand an
//! enable-channels command to the radio configurator.
//!
//! State machine:
//!
//! ```text
//! Uninitialized --Startup--> Listening --trigger--> Triggering --> Listening
//! ```
//!
//! Service-state changes are only observed once listening. Repeated
//! notifications of the same state are debounced, and only transitions into
//! in-service or emergency-only trigger.

use cellbroadcast_core::{
    AppEvent, ConfigCommand, DeviceEvent, RadioConfigurator, RadioEvent, ServiceState, SharedBus,
    SubscriptionId,
};
use serde::Serialize;
use std::rc::Rc;

use crate::resolver::CarrierTechnologyResolver;

/// Trigger lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerState {
    /// Startup has not been seen yet
    Uninitialized,
    /// Observing service-state transitions
    Listening,
    /// Handing a command to the radio configurator
    Triggering,
}

/// Why a command was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerReason {
    /// Airplane mode was switched off
    AirplaneModeOff,
    /// The network entered a qualifying state
    ServiceAcquired(ServiceState),
    /// A radio-affecting preference was edited
    PreferenceChanged(SubscriptionId),
}

impl std::fmt::Display for TriggerReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AirplaneModeOff => write!(f, "airplane mode off"),
            Self::ServiceAcquired(state) => write!(f, "service state {}", state),
            Self::PreferenceChanged(sub) => write!(f, "preference change on {}", sub),
        }
    }
}

/// Reconfiguration decision engine
pub struct ReconfigurationTrigger {
    state: TriggerState,
    /// `None` until the first observation after startup
    last_service_state: Option<ServiceState>,
    resolver: CarrierTechnologyResolver,
    radio: Rc<dyn RadioConfigurator>,
    bus: SharedBus,
    issued: u64,
}

impl ReconfigurationTrigger {
    /// Create a trigger in the `Uninitialized` state
    pub fn new(
        resolver: CarrierTechnologyResolver,
        radio: Rc<dyn RadioConfigurator>,
        bus: SharedBus,
    ) -> Self {
        Self {
            state: TriggerState::Uninitialized,
            last_service_state: None,
            resolver,
            radio,
            bus,
            issued: 0,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Last observed service state, `None` if unknown
    pub fn last_service_state(&self) -> Option<ServiceState> {
        self.last_service_state
    }

    /// Number of commands successfully handed off
    pub fn issued_count(&self) -> u64 {
        self.issued
    }

    /// Evaluate a device-state event
    ///
    /// Returns the command issued, if the event triggered one. Broadcast and
    /// unrecognized events are not device-state events and never trigger.
    pub fn handle(&mut self, event: &DeviceEvent) -> Option<ConfigCommand> {
        match event {
            DeviceEvent::Startup => {
                self.on_startup();
                None
            }
            DeviceEvent::AirplaneModeChanged { on } => self.on_airplane_mode_changed(*on),
            DeviceEvent::ServiceStateChanged { state } => self.on_service_state_changed(*state),
            DeviceEvent::BroadcastReceived { .. } | DeviceEvent::Unrecognized { .. } => None,
        }
    }

    /// Boot completed: start observing service state
    pub fn on_startup(&mut self) {
        if self.state == TriggerState::Listening {
            tracing::debug!("startup while already listening, resetting service state");
        } else {
            tracing::debug!("registering for service state updates");
        }
        self.state = TriggerState::Listening;
        self.last_service_state = None;
    }

    /// Airplane mode toggled; switching it off always reconfigures
    pub fn on_airplane_mode_changed(&mut self, on: bool) -> Option<ConfigCommand> {
        tracing::debug!("airplane mode on: {}", on);
        if on {
            return None;
        }
        Some(self.fire(TriggerReason::AirplaneModeOff, None))
    }

    /// Network registration changed
    pub fn on_service_state_changed(&mut self, state: ServiceState) -> Option<ConfigCommand> {
        if self.state == TriggerState::Uninitialized {
            tracing::debug!("ignoring service state {} before startup", state);
            return None;
        }
        if self.last_service_state == Some(state) {
            return None;
        }

        tracing::debug!(
            "service state changed: {:?} -> {}",
            self.last_service_state,
            state
        );
        self.last_service_state = Some(state);

        if state.is_qualifying() {
            Some(self.fire(TriggerReason::ServiceAcquired(state), None))
        } else {
            None
        }
    }

    /// A radio-affecting preference was persisted for `subscription`
    pub fn on_preference_changed(&mut self, subscription: SubscriptionId) -> ConfigCommand {
        self.fire(TriggerReason::PreferenceChanged(subscription), Some(subscription))
    }

    fn fire(
        &mut self,
        reason: TriggerReason,
        subscription: Option<SubscriptionId>,
    ) -> ConfigCommand {
        let resume = self.state;
        self.state = TriggerState::Triggering;

        let variant = self.resolver.resolve();
        let command = ConfigCommand {
            variant,
            subscription,
        };

        match self.radio.enable_channels(command) {
            Ok(()) => {
                self.issued += 1;
                tracing::info!("{} -> {}", reason, command);
                self.bus
                    .publish(AppEvent::Radio(RadioEvent::ChannelsConfigured { command }))
                    .ok();
            }
            Err(e) => {
                tracing::warn!("{} -> {} not handed off: {}", reason, command, e);
                self.bus
                    .publish(AppEvent::Radio(RadioEvent::HandOffFailed {
                        command,
                        error: e.to_string(),
                    }))
                    .ok();
            }
        }

        self.state = resume;
        command
    }
}

impl std::fmt::Debug for ReconfigurationTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconfigurationTrigger")
            .field("state", &self.state)
            .field("last_service_state", &self.last_service_state)
            .field("issued", &self.issued)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellbroadcast_core::{
        ChannelRadioConfigurator, ChannelVariant, EventBus, EventBusConfig, EventCategory,
        PhoneType, StaticTelephony,
    };
    use std::sync::Arc;

    type Commands = tokio::sync::mpsc::UnboundedReceiver<ConfigCommand>;

    fn trigger_with(telephony: StaticTelephony) -> (ReconfigurationTrigger, SharedBus, Commands) {
        let (radio, rx) = ChannelRadioConfigurator::new();
        let bus = Arc::new(EventBus::with_config(EventBusConfig::with_history(64)));
        let trigger = ReconfigurationTrigger::new(
            CarrierTechnologyResolver::new(Rc::new(telephony)),
            Rc::new(radio),
            bus.clone(),
        );
        (trigger, bus, rx)
    }

    #[test]
    fn test_startup_starts_listening_without_trigger() {
        let (mut trigger, bus, _rx) = trigger_with(StaticTelephony::new());
        assert_eq!(trigger.state(), TriggerState::Uninitialized);

        assert_eq!(trigger.handle(&DeviceEvent::Startup), None);
        assert_eq!(trigger.state(), TriggerState::Listening);
        assert!(bus.history().is_empty());
    }

    #[test]
    fn test_service_state_ignored_before_startup() {
        let (mut trigger, _bus, _rx) = trigger_with(StaticTelephony::new());
        assert_eq!(
            trigger.on_service_state_changed(ServiceState::InService),
            None
        );
        assert_eq!(trigger.last_service_state(), None);
    }

    #[test]
    fn test_non_qualifying_state_is_remembered() {
        let (mut trigger, _bus, _rx) = trigger_with(StaticTelephony::new());
        trigger.on_startup();

        assert_eq!(trigger.on_service_state_changed(ServiceState::Other), None);
        assert_eq!(trigger.last_service_state(), Some(ServiceState::Other));
    }

    #[test]
    fn test_service_regained_after_loss_triggers_again() {
        let (mut trigger, _bus, _rx) = trigger_with(StaticTelephony::new());
        trigger.on_startup();

        assert!(trigger
            .on_service_state_changed(ServiceState::InService)
            .is_some());
        assert!(trigger.on_service_state_changed(ServiceState::Other).is_none());
        assert!(trigger
            .on_service_state_changed(ServiceState::InService)
            .is_some());
        assert_eq!(trigger.issued_count(), 2);
    }

    #[test]
    fn test_emergency_only_to_in_service_triggers() {
        let (mut trigger, _bus, _rx) = trigger_with(StaticTelephony::new());
        trigger.on_startup();

        assert!(trigger
            .on_service_state_changed(ServiceState::EmergencyOnly)
            .is_some());
        assert!(trigger
            .on_service_state_changed(ServiceState::InService)
            .is_some());
    }

    #[test]
    fn test_restart_forgets_last_state() {
        let (mut trigger, _bus, _rx) = trigger_with(StaticTelephony::new());
        trigger.on_startup();
        trigger.on_service_state_changed(ServiceState::InService);

        trigger.on_startup();
        assert_eq!(trigger.last_service_state(), None);
        assert!(trigger
            .on_service_state_changed(ServiceState::InService)
            .is_some());
    }

    #[test]
    fn test_preference_change_carries_subscription() {
        let (mut trigger, bus, mut rx) =
            trigger_with(StaticTelephony::new().with_phone_type(PhoneType::Cdma));

        let command = trigger.on_preference_changed(SubscriptionId(1));
        assert_eq!(
            command,
            ConfigCommand::enable_channels_for(ChannelVariant::Cdma, SubscriptionId(1))
        );
        assert_eq!(rx.try_recv().ok(), Some(command));
        assert_eq!(trigger.state(), TriggerState::Uninitialized);
        assert_eq!(bus.history_for(EventCategory::Radio).len(), 1);
    }

    #[test]
    fn test_failed_hand_off_is_reported_not_counted() {
        let (radio, rx) = ChannelRadioConfigurator::new();
        drop(rx);
        let bus = Arc::new(EventBus::with_config(EventBusConfig::with_history(8)));
        let mut trigger = ReconfigurationTrigger::new(
            CarrierTechnologyResolver::new(Rc::new(StaticTelephony::new())),
            Rc::new(radio),
            bus.clone(),
        );

        assert!(trigger.on_airplane_mode_changed(false).is_some());
        assert_eq!(trigger.issued_count(), 0);
        assert!(matches!(
            bus.history().as_slice(),
            [AppEvent::Radio(RadioEvent::HandOffFailed { .. })]
        ));
    }
}
