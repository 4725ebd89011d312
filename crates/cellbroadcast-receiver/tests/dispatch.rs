//! Tests for inbound event dispatch and the privilege boundary

use cellbroadcast_core::{
    shared, BroadcastKind, BroadcastMessage, ChannelAlertService, ChannelRadioConfigurator,
    ChannelVariant, ConfigCommand, Delivery, DeviceEvent, EventBus, EventBusConfig,
    EventCategory, ServiceState, StaticTelephony,
};
use cellbroadcast_receiver::{
    CarrierTechnologyResolver, CellBroadcastReceiver, Dispatch, ReconfigurationTrigger,
    TriggerState,
};
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

struct Harness {
    receiver: CellBroadcastReceiver,
    commands: UnboundedReceiver<ConfigCommand>,
    alerts: UnboundedReceiver<BroadcastMessage>,
    bus: Arc<EventBus>,
}

fn harness() -> Harness {
    let (radio, commands) = ChannelRadioConfigurator::new();
    let (alert_service, alerts) = ChannelAlertService::new();
    let bus = Arc::new(EventBus::with_config(EventBusConfig::with_history(32)));
    let trigger = ReconfigurationTrigger::new(
        CarrierTechnologyResolver::new(Rc::new(StaticTelephony::new())),
        Rc::new(radio),
        bus.clone(),
    );
    Harness {
        receiver: CellBroadcastReceiver::new(shared(trigger), Rc::new(alert_service), bus.clone()),
        commands,
        alerts,
        bus,
    }
}

fn extreme_alert(delivery: Delivery) -> DeviceEvent {
    DeviceEvent::BroadcastReceived {
        message: BroadcastMessage {
            kind: BroadcastKind::EmergencyCellBroadcast,
            channel: 4371,
            subscription: None,
            body: "Flash flood warning".to_string(),
        },
        delivery,
    }
}

#[test]
fn test_unprivileged_broadcast_is_dropped() {
    let mut h = harness();

    assert_eq!(
        h.receiver.on_receive(extreme_alert(Delivery::Unprivileged)),
        Dispatch::Dropped
    );

    assert!(h.alerts.try_recv().is_err());
    assert!(h.commands.try_recv().is_err());
    assert!(h.bus.history().is_empty());
}

#[test]
fn test_privileged_broadcast_is_forwarded() {
    let mut h = harness();

    assert_eq!(
        h.receiver.on_receive(extreme_alert(Delivery::Privileged)),
        Dispatch::Forwarded
    );

    let forwarded = h.alerts.try_recv().expect("message forwarded");
    assert_eq!(forwarded.channel, 4371);
    assert!(h.commands.try_recv().is_err());
    assert_eq!(h.bus.history_for(EventCategory::Alert).len(), 1);
}

#[test]
fn test_closed_alert_service_reports_undelivered() {
    let h = harness();
    drop(h.alerts);

    assert_eq!(
        h.receiver.on_receive(extreme_alert(Delivery::Privileged)),
        Dispatch::Undelivered
    );
}

#[test]
fn test_device_events_reach_trigger() {
    let mut h = harness();

    assert_eq!(h.receiver.on_receive(DeviceEvent::Startup), Dispatch::NoAction);
    assert_eq!(
        h.receiver.trigger().borrow().state(),
        TriggerState::Listening
    );

    assert_eq!(
        h.receiver
            .on_receive(DeviceEvent::AirplaneModeChanged { on: true }),
        Dispatch::NoAction
    );
    assert_eq!(
        h.receiver.on_receive(DeviceEvent::ServiceStateChanged {
            state: ServiceState::InService
        }),
        Dispatch::Configured {
            command: ConfigCommand::enable_channels(ChannelVariant::Gsm)
        }
    );
    assert_eq!(h.commands.try_recv().ok().map(|c| c.variant), Some(ChannelVariant::Gsm));
}

#[test]
fn test_unrecognized_action_is_ignored() {
    let mut h = harness();

    assert_eq!(
        h.receiver.on_receive(DeviceEvent::Unrecognized {
            action: "android.intent.action.SCREEN_ON".to_string()
        }),
        Dispatch::Ignored
    );
    assert!(h.commands.try_recv().is_err());
}
