//! Event Bus implementation.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{AppEvent, EventCategory};

/// Handle for removing a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler = Arc<dyn Fn(&AppEvent) + Send + Sync>;

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Channel capacity for broadcast.
    pub channel_capacity: usize,
    /// Whether to keep event history.
    pub enable_history: bool,
    /// Maximum number of events to retain in history.
    pub max_history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            enable_history: false,
            max_history_size: 512,
        }
    }
}

impl EventBusConfig {
    /// Configuration with history retention turned on
    pub fn with_history(max_history_size: usize) -> Self {
        Self {
            enable_history: true,
            max_history_size,
            ..Self::default()
        }
    }
}

/// Error types for event bus operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventBusError {
    /// No subscribers are listening
    #[error("No active subscribers")]
    NoSubscribers,
}

/// Event bus for application-wide notifications
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
    handlers: RwLock<HashMap<ListenerId, (EventFilter, EventHandler)>>,
    history: RwLock<VecDeque<AppEvent>>,
    config: EventBusConfig,
}

impl EventBus {
    /// Create a new event bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity);
        Self {
            sender,
            handlers: RwLock::new(HashMap::new()),
            history: RwLock::new(VecDeque::new()),
            config,
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of async receivers the event was sent to. Fails with
    /// [`EventBusError::NoSubscribers`] only when nobody at all is listening;
    /// publishers are expected to ignore that.
    pub fn publish(&self, event: AppEvent) -> Result<usize, EventBusError> {
        if self.config.enable_history {
            self.add_to_history(&event);
        }

        // Handlers run after the lock is released so they may subscribe or
        // unsubscribe themselves
        let (matching, registered): (Vec<EventHandler>, usize) = {
            let handlers = self.handlers.read();
            let matching = handlers
                .values()
                .filter(|(filter, _)| filter.matches(&event))
                .map(|(_, handler)| handler.clone())
                .collect();
            (matching, handlers.len())
        };
        for handler in &matching {
            handler(&event);
        }

        match self.sender.send(event) {
            Ok(count) => Ok(count),
            Err(_) if registered == 0 => Err(EventBusError::NoSubscribers),
            Err(_) => Ok(0),
        }
    }

    /// Subscribe with a synchronous handler
    ///
    /// The handler runs on the publishing thread and should return quickly.
    /// A handler added during a publish first sees the next event.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> ListenerId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = ListenerId::new();
        self.handlers.write().insert(id, (filter, Arc::new(handler)));
        tracing::debug!("{} added", id);
        id
    }

    /// Get a receiver for polling events from an async task
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Remove a handler
    ///
    /// Returns true if the listener was found and removed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("{} removed", id);
        }
        removed
    }

    /// Get the number of registered handlers
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Retained events, oldest first (empty unless history is enabled)
    pub fn history(&self) -> Vec<AppEvent> {
        self.history.read().iter().cloned().collect()
    }

    /// Retained events of one category, oldest first
    pub fn history_for(&self, category: EventCategory) -> Vec<AppEvent> {
        self.history
            .read()
            .iter()
            .filter(|event| event.category() == category)
            .cloned()
            .collect()
    }

    /// Clear event history
    pub fn clear_history(&self) {
        self.history.write().clear();
    }

    /// Get the current configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    fn add_to_history(&self, event: &AppEvent) {
        let mut history = self.history.write();
        history.push_back(event.clone());
        while history.len() > self.config.max_history_size {
            history.pop_front();
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}
