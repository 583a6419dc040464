//! # StitchKit
//!
//! Editing core for an embroidery design editor: a single document store
//! holding the selected design, the background garment image, the viewport
//! and the selection, driven by asynchronous loads and pointer gestures.
//!
//! ## Architecture
//!
//! StitchKit is organized as a workspace with multiple crates:
//!
//! 1. **stitchkit-core** - Geometry, element handles, catalogs, errors, events
//! 2. **stitchkit-settings** - Configuration files and validation
//! 3. **stitchkit-designer** - Document store, reducer, loader, viewport and
//!    interaction controllers, engine traits
//! 4. **stitchkit** - Binary wiring logging and configuration to a session
//!
//! Rendering and gesture recognition are provided by engines implementing
//! [`designer::RenderEngine`] and [`designer::GestureEngine`].

use std::path::Path;

pub use stitchkit_designer as designer;
pub use stitchkit_settings as settings;

pub use stitchkit_core::{
    AppEvent, Catalog, Color, DesignElement, ElementId, Error, ImageElement, LoadStatus, Matrix,
    Point, Rect, ResourceKind, Result, ThreadColor,
};
pub use stitchkit_designer::{
    Action, DocumentState, DocumentStore, EditMode, EditorSession, GestureEngine, LoadOutcome,
    RenderEngine,
};
pub use stitchkit_settings::{EditorConfig, LoggingSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Loads the editor configuration from `path`, or from the platform default
/// location when no path is given. A missing default file yields defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EditorConfig> {
    let config = match path {
        Some(path) => EditorConfig::load_from_file(path)?,
        None => EditorConfig::load_or_default()?,
    };
    Ok(config)
}

/// Initialize logging from the logging settings
///
/// Sets up structured logging with:
/// - RUST_LOG environment variable support, falling back to the configured level
/// - Pretty console output, or JSON lines when `json` is set
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))?;

    if settings.json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_from_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("editor.toml");
        let mut config = EditorConfig::default();
        config.canvas.width_px = 1024;
        config.save_to_file(&path).unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.canvas.width_px, 1024);
    }

    #[test]
    fn test_load_config_rejects_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{ "canvas": { "width_px": 0, "height_px": 10, "dpi": 96.0 } }"#)
            .unwrap();

        assert!(load_config(Some(&path)).is_err());
    }
}
