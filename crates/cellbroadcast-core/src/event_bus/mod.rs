//! # Event Bus Module
//!
//! Provides an event bus for announcing what the core did to interested
//! observers (the presentation layer, loggers, tests).
//!
//! ## Overview
//!
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter and receive events of interest
//! - Supports both sync handlers and async broadcast receivers
//!
//! There is no process-wide instance: each component is handed a shared
//! `Arc<EventBus>` at construction.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cellbroadcast_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter};
//! use std::sync::Arc;
//!
//! let bus = Arc::new(EventBus::new());
//! let listener = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Radio]),
//!     |event| tracing::info!("{}", event.description()),
//! );
//!
//! bus.unsubscribe(listener);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
