//! # Cell Broadcast Settings
//!
//! Per-subscription alert preferences and the controller that edits them.
//! Region policy and application configuration live in [`config`];
//! persistence backends in [`persistence`].

pub mod config;
pub mod controller;
pub mod error;
pub mod keys;
pub mod persistence;
pub mod store;
pub mod visibility;

pub use config::{AppConfig, RegionPolicy};
pub use controller::{ControlState, EditOutcome, SettingsController};
pub use error::{
    ConfigError, ConfigResult, PersistenceError, PersistenceResult, SettingsError, SettingsResult,
};
pub use keys::{
    children_of, parents_of, Category, DefaultValue, Dependency, KeySpec, PrefValue,
    PreferenceKey, Scope, ValueKind, DEPENDENCIES,
};
pub use persistence::{JsonFileBackend, MemoryBackend, PreferenceBackend};
pub use store::{DefaultProvider, PreferenceStore, Written};
pub use visibility::{Environment, SettingsSurface};
