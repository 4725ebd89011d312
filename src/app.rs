//! Application wiring
//!
//! Builds the receiver, trigger and settings controller from an
//! [`AppConfig`] and hands back the outbound channels so the caller can
//! drive the radio and alert collaborators.

use cellbroadcast_core::{
    shared, BroadcastMessage, ChannelAlertService, ChannelRadioConfigurator, ConfigCommand,
    EventBus, EventBusConfig, EventFilter, SharedBus,
};
use cellbroadcast_receiver::{
    CarrierTechnologyResolver, CellBroadcastReceiver, ReconfigurationTrigger,
};
use cellbroadcast_settings::{
    AppConfig, JsonFileBackend, PreferenceBackend, PreferenceStore, SettingsController,
    SettingsResult,
};
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// Outbound ends of the collaborators
#[derive(Debug)]
pub struct Outbound {
    /// Commands handed to the radio
    pub commands: UnboundedReceiver<ConfigCommand>,
    /// Messages forwarded to the alert service
    pub alerts: UnboundedReceiver<BroadcastMessage>,
}

/// Tasks logging outbound traffic; each resolves to the number of items seen
#[derive(Debug)]
pub struct OutboundLog {
    pub radio: JoinHandle<usize>,
    pub alerts: JoinHandle<usize>,
}

impl Outbound {
    /// Drain both channels on the runtime until the [`App`] is dropped
    ///
    /// Must be called within a tokio runtime. The tasks only make progress
    /// while the caller blocks if the runtime has worker threads.
    pub fn spawn_log(self) -> OutboundLog {
        OutboundLog {
            radio: tokio::spawn(radio_task(self.commands)),
            alerts: tokio::spawn(alert_task(self.alerts)),
        }
    }
}

async fn radio_task(mut commands: UnboundedReceiver<ConfigCommand>) -> usize {
    let mut count = 0;
    while let Some(command) = commands.recv().await {
        count += 1;
        tracing::info!("radio: {}", command);
    }
    count
}

async fn alert_task(mut alerts: UnboundedReceiver<BroadcastMessage>) -> usize {
    let mut count = 0;
    while let Some(message) = alerts.recv().await {
        count += 1;
        tracing::info!(
            "alert: {} on channel {}: {}",
            message.kind,
            message.channel,
            message.body
        );
    }
    count
}

/// The running cell broadcast subsystem
#[derive(Debug)]
pub struct App {
    pub receiver: CellBroadcastReceiver,
    pub controller: SettingsController,
    pub bus: SharedBus,
}

impl App {
    /// Wire the subsystem over `backend`
    pub fn new(config: &AppConfig, backend: Box<dyn PreferenceBackend>) -> (Self, Outbound) {
        let bus = Arc::new(EventBus::with_config(EventBusConfig::with_history(256)));
        bus.subscribe(EventFilter::All, |event| {
            tracing::debug!("[{}] {}", event.category(), event.description());
        });

        let telephony = Rc::new(config.telephony.clone());
        let (radio, commands) = ChannelRadioConfigurator::new();
        let (alert_service, alerts) = ChannelAlertService::new();

        let trigger = shared(ReconfigurationTrigger::new(
            CarrierTechnologyResolver::new(telephony.clone()),
            Rc::new(radio),
            bus.clone(),
        ));
        let receiver = CellBroadcastReceiver::new(trigger.clone(), Rc::new(alert_service), bus.clone());

        let store = PreferenceStore::new(backend, shared(config.policy.clone()));
        let controller = SettingsController::new(
            store,
            trigger,
            bus.clone(),
            telephony.as_ref(),
            config.developer_settings_enabled,
        );

        (
            Self {
                receiver,
                controller,
                bus,
            },
            Outbound { commands, alerts },
        )
    }

    /// Validate `config` and wire the subsystem over its preference file
    pub fn open(config: &AppConfig) -> SettingsResult<(Self, Outbound)> {
        config.validate()?;
        let path = config.preferences_file()?;
        tracing::info!("preferences: {}", path.display());
        let backend = JsonFileBackend::open(path)?;
        Ok(Self::new(config, Box::new(backend)))
    }
}
