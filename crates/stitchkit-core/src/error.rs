//! Error handling for StitchKit
//!
//! Provides error types for every layer of the editor core:
//! - Engine errors (reported by the external rendering/geometry engine)
//! - Catalog errors (invalid catalog indices or catalog structure)
//! - Load errors (a design or image fetch that failed)
//!
//! Load failures and stale results are normally absorbed into document
//! status fields rather than returned; these types exist so the boundary
//! code can describe what happened before converting it.

use thiserror::Error;

use crate::data::ResourceKind;

/// Engine error type
///
/// Failures reported by the rendering/geometry engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The resource could not be fetched
    #[error("Failed to fetch {locator}: {reason}")]
    ResourceFetch {
        /// The locator that was requested.
        locator: String,
        /// The reason the fetch failed.
        reason: String,
    },

    /// The resource was fetched but could not be decoded
    #[error("Failed to parse {locator}: {reason}")]
    Parse {
        /// The locator whose content failed to parse.
        locator: String,
        /// The reason parsing failed.
        reason: String,
    },

    /// A geometry query needed an element that is not resolved yet
    #[error("Element {element} is not loaded")]
    ElementNotLoaded {
        /// Display form of the element id.
        element: String,
    },

    /// A geometry computation failed
    #[error("Geometry error: {reason}")]
    Geometry {
        /// The reason for the failure.
        reason: String,
    },

    /// Generic engine error
    #[error("Engine error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

/// Catalog error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The index does not name an entry of the catalog
    #[error("No {kind} at catalog index {index} (catalog has {len} entries)")]
    IndexOutOfRange {
        /// The catalog that was indexed.
        kind: ResourceKind,
        /// The requested index.
        index: usize,
        /// The catalog length.
        len: usize,
    },

    /// The catalog breaks a structural rule
    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// Load error type
///
/// Describes a failed fetch before it is folded into a `Failed` status.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// Fetching or parsing a catalog resource failed
    #[error("Loading {kind} at index {index} failed")]
    LoadFailed {
        /// The resource kind.
        kind: ResourceKind,
        /// The catalog index that was being loaded.
        index: usize,
        /// The engine failure.
        #[source]
        source: EngineError,
    },
}

/// Main error type for StitchKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Engine error
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Catalog error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Load error
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The rendering engine has not been attached yet
    #[error("Rendering engine is not ready")]
    EngineNotReady,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error only means the engine is not attached yet
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Error::EngineNotReady)
    }

    /// Check if this is a catalog error
    pub fn is_catalog_error(&self) -> bool {
        matches!(self, Error::Catalog(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::IndexOutOfRange {
            kind: ResourceKind::Image,
            index: 5,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "No image at catalog index 5 (catalog has 3 entries)"
        );

        let err = EngineError::ResourceFetch {
            locator: "a.rfm".to_string(),
            reason: "404".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to fetch a.rfm: 404");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = CatalogError::Invalid("empty".to_string()).into();
        assert!(err.is_catalog_error());
        assert!(!err.is_not_ready());
        assert!(Error::EngineNotReady.is_not_ready());

        let load = LoadError::LoadFailed {
            kind: ResourceKind::Design,
            index: 1,
            source: EngineError::Other {
                message: "boom".to_string(),
            },
        };
        let err: Error = load.into();
        assert!(matches!(err, Error::Load(_)));
        assert_eq!(err.to_string(), "Loading design at index 1 failed");
    }
}
