//! Configuration management for the StitchKit editor
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats, chosen by file extension, stored in the platform
//! configuration directory by default.
//!
//! Configuration is organized into logical sections:
//! - Canvas geometry (pixel size and dpi of the drawing surface)
//! - View defaults (3D/twist toggles, background, initial viewport)
//! - Zoom policy (margins, dpi cap, animation durations)
//! - Catalog overrides (designs, images, lettering alphabet)
//! - Logging

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stitchkit_core::units::DEFAULT_SCREEN_DPI;
use stitchkit_core::{Catalog, Color, DesignDefinition, ImageDefinition, Rect};

use crate::error::{SettingsError, SettingsResult};

/// Canvas settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Drawing surface width in pixels
    pub width_px: u32,
    /// Drawing surface height in pixels
    pub height_px: u32,
    /// Screen resolution used to derive a default viewport
    pub dpi: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width_px: 500,
            height_px: 500,
            dpi: DEFAULT_SCREEN_DPI,
        }
    }
}

/// View defaults applied to a new document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Render stitches with 3D shading
    pub enable_3d: bool,
    /// Render thread twists
    pub enable_twists: bool,
    /// Canvas background colour
    pub background: Color,
    /// Visible world window at startup. An empty rectangle means "derive
    /// from the canvas size".
    pub initial_viewport: Rect,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            enable_3d: true,
            enable_twists: false,
            background: Color::rgba(200, 200, 200, 255),
            initial_viewport: Rect::new(-1000.0, -1000.0, 1000.0, 1000.0),
        }
    }
}

/// Zoom-to-fit and zoom-to-image policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomSettings {
    /// Margin kept around fitted content, in world units
    pub margin: f64,
    /// Maximum zoom expressed as screen dpi; `None` leaves zoom uncapped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_dpi: Option<f64>,
    /// Duration of the animated zoom-to-fit, in milliseconds
    pub fit_animation_ms: u64,
    /// Duration of the zoom performed after an image loads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_animation_ms: Option<u64>,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            margin: 10.0,
            max_dpi: None,
            fit_animation_ms: 300,
            image_animation_ms: None,
        }
    }
}

/// Catalog overrides. Missing lists fall back to the built-in catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designs: Option<Vec<DesignDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alphabet_locator: Option<String>,
}

impl CatalogSettings {
    /// Merges the overrides over the built-in catalog.
    pub fn resolve(&self) -> Catalog {
        let builtin = Catalog::builtin();
        Catalog {
            designs: self.designs.clone().unwrap_or(builtin.designs),
            images: self.images.clone().unwrap_or(builtin.images),
            alphabet_locator: self
                .alphabet_locator
                .clone()
                .unwrap_or(builtin.alphabet_locator),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level directive; `RUST_LOG` takes precedence
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete editor configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub canvas: CanvasSettings,
    #[serde(default)]
    pub view: ViewSettings,
    #[serde(default)]
    pub zoom: ZoomSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl EditorConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location (`<config dir>/stitchkit/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("stitchkit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Loads the config at the default location, or defaults when no file exists
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.canvas.width_px == 0 || self.canvas.height_px == 0 {
            return Err(SettingsError::invalid(
                "canvas",
                "pixel dimensions must be > 0",
            ));
        }
        if self.canvas.dpi <= 0.0 {
            return Err(SettingsError::invalid("canvas.dpi", "must be > 0"));
        }

        // An all-zero rectangle is allowed and means "derive from canvas"
        let vp = &self.view.initial_viewport;
        if *vp != Rect::empty() && vp.is_empty() {
            return Err(SettingsError::invalid(
                "view.initial_viewport",
                "must have positive width and height",
            ));
        }

        if self.zoom.margin < 0.0 || !self.zoom.margin.is_finite() {
            return Err(SettingsError::invalid("zoom.margin", "must be >= 0"));
        }
        if self.zoom.max_dpi.is_some_and(|dpi| dpi <= 0.0) {
            return Err(SettingsError::invalid("zoom.max_dpi", "must be > 0"));
        }

        self.catalog
            .resolve()
            .validate()
            .map_err(|e| SettingsError::invalid("catalog", e.to_string()))?;

        if self.logging.level.trim().is_empty() {
            return Err(SettingsError::invalid("logging.level", "must not be empty"));
        }

        Ok(())
    }

    /// The catalog in effect for this configuration
    pub fn catalog(&self) -> Catalog {
        self.catalog.resolve()
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
