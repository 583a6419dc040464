//! StitchKit Settings Crate
//!
//! Handles editor configuration: canvas geometry, view defaults, zoom policy,
//! resource catalogs and logging.

pub mod config;
pub mod error;

pub use config::{
    CanvasSettings, CatalogSettings, EditorConfig, LoggingSettings, ViewSettings, ZoomSettings,
};
pub use error::{SettingsError, SettingsResult};
