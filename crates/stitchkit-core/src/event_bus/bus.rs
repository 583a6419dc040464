//! Event Bus implementation.
//!
//! Each document store owns one bus. Synchronous handlers run on the
//! dispatching thread right after a snapshot is replaced; async consumers can
//! poll a broadcast receiver instead.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{AppEvent, EventCategory};

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
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
            max_history_size: 1000,
        }
    }
}

/// Publish/subscribe hub for editor events
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
    handlers: RwLock<HashMap<SubscriptionId, (EventFilter, EventHandler)>>,
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
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            handlers: RwLock::new(HashMap::new()),
            history: RwLock::new(VecDeque::new()),
            config,
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of handlers and receivers that saw the event.
    /// Handlers are cloned out of the registry before they run, so a handler
    /// may subscribe or unsubscribe without deadlocking.
    pub fn publish(&self, event: AppEvent) -> usize {
        if self.config.enable_history {
            self.add_to_history(&event);
        }

        let matching: Vec<EventHandler> = self
            .handlers
            .read()
            .values()
            .filter(|(filter, _)| filter.matches(&event))
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in &matching {
            handler(&event);
        }

        let receivers = self.sender.send(event).unwrap_or(0);
        matching.len() + receivers
    }

    /// Subscribe to events with a synchronous handler
    ///
    /// The handler runs on the publishing thread and should return quickly.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, (filter, Arc::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Get a receiver for polling events from a tokio task
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Recorded events, oldest first (empty unless history is enabled)
    pub fn history(&self) -> Vec<AppEvent> {
        self.history.read().iter().cloned().collect()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LoadStatus, ResourceKind};
    use crate::event_bus::events::{ChangeSet, DocumentEvent, EngineEvent, ResourceEvent};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn changed() -> AppEvent {
        AppEvent::Document(DocumentEvent::Changed {
            action: "Toggle3d".to_string(),
            changes: ChangeSet {
                view: true,
                ..Default::default()
            },
        })
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let bus = EventBus::new();

        let id = bus.subscribe(EventFilter::All, |_| {});
        assert_eq!(bus.subscriber_count(), 1);

        assert!(bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(), 0);

        // Double unsubscribe should return false
        assert!(!bus.unsubscribe(id));
    }

    #[test]
    fn test_event_filtering() {
        let bus = EventBus::new();
        let document_count = Arc::new(AtomicUsize::new(0));
        let resource_count = Arc::new(AtomicUsize::new(0));

        let dc = document_count.clone();
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Document]),
            move |_| {
                dc.fetch_add(1, Ordering::SeqCst);
            },
        );
        let rc = resource_count.clone();
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Resource]),
            move |_| {
                rc.fetch_add(1, Ordering::SeqCst);
            },
        );

        bus.publish(changed());
        bus.publish(AppEvent::Resource(ResourceEvent::Settled {
            kind: ResourceKind::Image,
            index: 1,
            status: LoadStatus::Succeeded,
        }));
        bus.publish(AppEvent::Engine(EngineEvent::Attached));

        assert_eq!(document_count.load(Ordering::SeqCst), 1);
        assert_eq!(resource_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_may_unsubscribe_itself() {
        let bus = Arc::new(EventBus::new());
        let slot: Arc<parking_lot::Mutex<Option<SubscriptionId>>> = Arc::default();

        let bus_clone = bus.clone();
        let slot_clone = slot.clone();
        let id = bus.subscribe(EventFilter::All, move |_| {
            if let Some(id) = slot_clone.lock().take() {
                bus_clone.unsubscribe(id);
            }
        });
        *slot.lock() = Some(id);

        bus.publish(changed());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_history_max_size() {
        let bus = EventBus::with_config(EventBusConfig {
            enable_history: true,
            max_history_size: 3,
            ..Default::default()
        });
        for _ in 0..5 {
            bus.publish(changed());
        }
        assert_eq!(bus.history().len(), 3);

        bus.clear_history();
        assert!(bus.history().is_empty());
    }

    #[tokio::test]
    async fn test_async_receiver() {
        let bus = EventBus::new();
        let mut receiver = bus.receiver();

        bus.publish(AppEvent::Engine(EngineEvent::Detached));

        let received = receiver.try_recv();
        assert_eq!(received.ok(), Some(AppEvent::Engine(EngineEvent::Detached)));
    }
}
