//! Element handles owned by the rendering engine.
//!
//! The engine creates these when a resource is fetched. The editor core keeps
//! them behind `Arc` inside the document and only ever replaces the editable
//! parts (placement matrix, thread colours, lettering) through new values.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::types::{Matrix, Rect, ThreadColor};

/// Stable identity of an element inside the rendering engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Allocates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Elem({})", &self.0.to_string()[..8])
    }
}

/// One editable lettering run inside a design.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LetteringParams {
    pub text: String,
    /// Locator of the alphabet used to stitch the text.
    pub alphabet: Option<String>,
}

/// A loaded embroidery design.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignElement {
    pub uid: ElementId,
    /// Placement transform. `None` means identity.
    pub matrix: Option<Matrix>,
    pub colors: Vec<ThreadColor>,
    pub lettering: Vec<LetteringParams>,
}

impl DesignElement {
    /// Creates a design with no placement transform.
    pub fn new(colors: Vec<ThreadColor>, lettering: Vec<LetteringParams>) -> Self {
        Self {
            uid: ElementId::new(),
            matrix: None,
            colors,
            lettering,
        }
    }

    /// The stored matrix, or identity when none is set.
    pub fn base_matrix(&self) -> Matrix {
        self.matrix.unwrap_or_default()
    }
}

/// Pixel dimensions reported by the engine once an image is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub xdim: u32,
    pub ydim: u32,
}

/// A loaded background image (for example a garment photo).
#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub uid: ElementId,
    /// Placement rectangle in world units.
    pub rect: Rect,
    pub matrix: Option<Matrix>,
    pub metadata: Option<ImageMetadata>,
}

impl ImageElement {
    pub fn new(rect: Rect, metadata: Option<ImageMetadata>) -> Self {
        Self {
            uid: ElementId::new(),
            rect,
            matrix: None,
            metadata,
        }
    }

    pub fn base_matrix(&self) -> Matrix {
        self.matrix.unwrap_or_default()
    }
}
