//! # Event Bus Module
//!
//! Change notification for the editor core. The document store publishes a
//! [`DocumentEvent`] after every dispatch, and the resource loader publishes
//! [`ResourceEvent`]s as fetches start, settle or go stale.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stitchkit_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Document]),
//!     |event| tracing::debug!("{}", event.description()),
//! );
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
