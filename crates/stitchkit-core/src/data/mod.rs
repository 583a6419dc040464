//! Data models shared between the editor core and its collaborators.
//!
//! This module provides:
//! - Element handles created by the rendering engine (designs and images)
//! - The static, read-only design and image catalogs
//! - Load status tracking for catalog resources

pub mod catalog;
pub mod element;

pub use catalog::*;
pub use element::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Load status of a catalog resource.
///
/// The document stores `Option<LoadStatus>`; `None` means no load has been
/// started for the current index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadStatus {
    /// A fetch for the current index is in flight.
    Loading,
    /// The resource for the current index is in place (possibly empty).
    Succeeded,
    /// The fetch for the current index failed. Stays until reselected.
    Failed,
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Loading => write!(f, "Loading"),
            LoadStatus::Succeeded => write!(f, "Succeeded"),
            LoadStatus::Failed => write!(f, "Failed"),
        }
    }
}
