//! Event type definitions for the event bus.
//!
//! Events are small, cloneable and serializable. They describe what changed;
//! subscribers that need the new document read it from the store.

use serde::{Deserialize, Serialize};

use crate::data::{LoadStatus, ResourceKind};

/// Root event enum for all editor events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Document snapshot replacement
    Document(DocumentEvent),
    /// Catalog resource loading
    Resource(ResourceEvent),
    /// Rendering / gesture engine lifecycle
    Engine(EngineEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Document(_) => EventCategory::Document,
            AppEvent::Resource(_) => EventCategory::Resource,
            AppEvent::Engine(_) => EventCategory::Engine,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Document(e) => e.description(),
            AppEvent::Resource(e) => e.description(),
            AppEvent::Engine(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Document snapshot events.
    Document,
    /// Resource loading events.
    Resource,
    /// Engine lifecycle events.
    Engine,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Document => write!(f, "Document"),
            EventCategory::Resource => write!(f, "Resource"),
            EventCategory::Engine => write!(f, "Engine"),
        }
    }
}

/// Which sub-trees of the document were replaced by a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    pub product: bool,
    pub view: bool,
    pub editor: bool,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        !(self.product || self.view || self.editor)
    }
}

/// Document events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentEvent {
    /// A dispatch produced a new snapshot.
    Changed {
        /// Name of the action kind that was applied.
        action: String,
        /// Sub-trees that no longer share identity with the previous snapshot.
        changes: ChangeSet,
    },
    /// A dispatch was a no-op (for example a stale commit).
    Unchanged {
        /// Name of the action kind that was applied.
        action: String,
    },
}

impl DocumentEvent {
    fn description(&self) -> String {
        match self {
            DocumentEvent::Changed { action, changes } => format!(
                "{} changed product={} view={} editor={}",
                action, changes.product, changes.view, changes.editor
            ),
            DocumentEvent::Unchanged { action } => format!("{} left document unchanged", action),
        }
    }
}

/// Resource loading events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResourceEvent {
    /// A fetch was started for a catalog index.
    LoadStarted { kind: ResourceKind, index: usize },
    /// A load result landed in the document.
    Settled {
        kind: ResourceKind,
        index: usize,
        status: LoadStatus,
    },
    /// A load result was dropped because the selection moved on.
    StaleDiscarded {
        kind: ResourceKind,
        index: usize,
        current: usize,
    },
}

impl ResourceEvent {
    fn description(&self) -> String {
        match self {
            ResourceEvent::LoadStarted { kind, index } => {
                format!("{} {} load started", kind, index)
            }
            ResourceEvent::Settled {
                kind,
                index,
                status,
            } => format!("{} {} settled as {}", kind, index, status),
            ResourceEvent::StaleDiscarded {
                kind,
                index,
                current,
            } => format!("{} {} discarded (current is {})", kind, index, current),
        }
    }
}

/// Engine lifecycle events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// The rendering and gesture engines became available.
    Attached,
    /// The engines were torn down.
    Detached,
}

impl EngineEvent {
    fn description(&self) -> String {
        match self {
            EngineEvent::Attached => "engines attached".to_string(),
            EngineEvent::Detached => "engines detached".to_string(),
        }
    }
}
