//! # Cell Broadcast
//!
//! Per-subscription cell broadcast alert configuration for multi-SIM
//! devices.
//!
//! ## Architecture
//!
//! The workspace is organized into four crates:
//!
//! 1. **cellbroadcast-core** - Subscription identity, device events, channel
//!    commands, collaborator traits and the application event bus
//! 2. **cellbroadcast-receiver** - Reconfiguration trigger, carrier
//!    technology resolution and inbound dispatch
//! 3. **cellbroadcast-settings** - Preference keys, store, visibility rules
//!    and the settings controller
//! 4. **cellbroadcast** - This crate: wiring, the scripted runner and the
//!    binary

pub mod app;
pub mod script;

pub use app::{App, Outbound, OutboundLog};
pub use script::{run_script, ScriptStep, ScriptSummary, StateInput, StepOutcome};

pub use cellbroadcast_core::{
    BroadcastKind, BroadcastMessage, ChannelVariant, ConfigCommand, Delivery, DeviceEvent,
    ServiceState, SubscriptionId,
};
pub use cellbroadcast_receiver::{CellBroadcastReceiver, Dispatch, ReconfigurationTrigger};
pub use cellbroadcast_settings::{AppConfig, PrefValue, PreferenceKey, SettingsController};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty formatted output on stderr, keeping stdout for script outcomes
/// - RUST_LOG environment variable support, INFO when unset
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
