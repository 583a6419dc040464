//! Document store
//!
//! Owns the current [`DocumentState`] snapshot and applies actions to it.
//! Dispatch is serialized by a write lock: the reducer runs and the snapshot
//! is swapped under the lock, then the change is published on the store's
//! [`EventBus`] after the lock is released. Subscribers may therefore read
//! [`DocumentStore::snapshot`] or dispatch again from inside a handler.

use parking_lot::RwLock;
use std::sync::Arc;
use stitchkit_core::{
    AppEvent, Catalog, DocumentEvent, EventBus, EventCategory, EventFilter, SubscriptionId,
};
use stitchkit_settings::EditorConfig;
use tracing::debug;

use crate::actions::Action;
use crate::reducer::reduce;
use crate::state::DocumentState;

/// Single source of truth for the document.
pub struct DocumentStore {
    state: RwLock<DocumentState>,
    catalog: Arc<Catalog>,
    events: EventBus,
}

impl DocumentStore {
    pub fn new(catalog: Arc<Catalog>, initial: DocumentState) -> Self {
        Self {
            state: RwLock::new(initial),
            catalog,
            events: EventBus::new(),
        }
    }

    /// Store seeded from a configuration's catalog and view defaults.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(
            Arc::new(config.catalog()),
            DocumentState::from_config(config),
        )
    }

    /// Applies `action` and returns the resulting snapshot.
    ///
    /// The returned snapshot is the one this dispatch produced, which lets
    /// callers check whether a guarded action was applied.
    pub fn dispatch(&self, action: Action) -> DocumentState {
        let kind = action.kind();
        let (previous, next) = {
            let mut guard = self.state.write();
            let previous = guard.clone();
            let next = reduce(&previous, action, &self.catalog);
            *guard = next.clone();
            (previous, next)
        };

        let changes = next.changes_from(&previous);
        debug!(
            "{} -> product={} view={} editor={}",
            kind,
            changes.product,
            changes.view,
            changes.editor
        );

        let event = if changes.is_empty() {
            DocumentEvent::Unchanged {
                action: kind.to_string(),
            }
        } else {
            DocumentEvent::Changed {
                action: kind.to_string(),
                changes,
            }
        };
        self.events.publish(AppEvent::Document(event));
        next
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> DocumentState {
        self.state.read().clone()
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Bus carrying document, resource and engine events for this store.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Calls `handler` with the new snapshot after every dispatch that
    /// replaced at least one sub-tree.
    pub fn subscribe<F>(self: &Arc<Self>, handler: F) -> SubscriptionId
    where
        F: Fn(&DocumentState) + Send + Sync + 'static,
    {
        let store = Arc::downgrade(self);
        self.events.subscribe(
            EventFilter::Categories(vec![EventCategory::Document]),
            move |event| {
                if !matches!(event, AppEvent::Document(DocumentEvent::Changed { .. })) {
                    return;
                }
                if let Some(store) = store.upgrade() {
                    handler(&store.snapshot());
                }
            },
        )
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("state", &*self.state.read())
            .field("events", &self.events)
            .finish()
    }
}
