//! # StitchKit Core
//!
//! Core types and utilities shared by the StitchKit editor crates.
//! Provides world-space geometry, element handles, the static resource
//! catalogs, the error taxonomy and the change-notification event bus.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod types;
pub mod units;

pub use data::{
    Catalog, DesignDefinition, DesignElement, ElementId, ImageDefinition, ImageElement,
    ImageMetadata, LetteringParams, LoadStatus, ResourceKind,
};

pub use error::{CatalogError, EngineError, Error, LoadError, Result};

pub use event_bus::{
    AppEvent, ChangeSet, DocumentEvent, EngineEvent, EventBus, EventBusConfig, EventCategory,
    EventFilter, ResourceEvent, SubscriptionId,
};

pub use types::{thread_safe_rw, Color, Matrix, Point, Rect, ThreadColor, ThreadSafeRw};
