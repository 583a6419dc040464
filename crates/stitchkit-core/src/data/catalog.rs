//! Static resource catalogs.
//!
//! This module provides:
//! - Design and image definitions (name, locator, placement)
//! - The catalog of available designs and images, indexed by position
//! - The built-in sample catalog
//!
//! Catalogs are read-only for the whole session. The document refers to
//! entries by index only, and image index 0 is reserved for "no image".

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CatalogError;
use crate::types::{Matrix, Point};
use crate::units::WORLD_UNITS_PER_INCH;

/// Which catalog a resource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Embroidery design
    Design,
    /// Background image
    Image,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Design => write!(f, "design"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// A design that can be loaded into the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDefinition {
    pub name: String,
    /// Source locator. An empty locator means "nothing to fetch".
    pub locator: String,
    /// Optional initial placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Matrix>,
}

impl DesignDefinition {
    pub fn new(name: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
            matrix: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.locator.is_empty()
    }
}

/// A background image that can be placed behind the design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDefinition {
    pub name: String,
    /// Source locator. An empty locator means "no image".
    pub locator: String,
    /// Width of the placed image in world units.
    pub placement_width: f64,
    /// Offset of the world origin inside the image, if not centered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_offset: Option<Point>,
}

impl ImageDefinition {
    pub fn new(name: impl Into<String>, locator: impl Into<String>, placement_width: f64) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
            placement_width,
            origin_offset: None,
        }
    }

    pub fn with_origin_offset(mut self, offset: Point) -> Self {
        self.origin_offset = Some(offset);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.locator.is_empty()
    }
}

const SAMPLE_BASE: &str = "https://teststitchenginepublic.blob.core.windows.net";

/// The design and image catalogs offered to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub designs: Vec<DesignDefinition>,
    pub images: Vec<ImageDefinition>,
    /// Alphabet used when lettering text is edited.
    pub alphabet_locator: String,
}

impl Catalog {
    /// The sample catalog shipped with the editor.
    pub fn builtin() -> Self {
        let garment_width = WORLD_UNITS_PER_INCH * 20.0;
        Self {
            designs: vec![
                DesignDefinition::new(
                    "Anchor",
                    format!("{SAMPLE_BASE}/rendercache/designcache/Anchor.rfm"),
                ),
                DesignDefinition::new(
                    "Rainbow",
                    format!("{SAMPLE_BASE}/rendercache/designcache/Rainbow.rfm"),
                ),
                DesignDefinition::new(
                    "Lettering Test",
                    format!("{SAMPLE_BASE}/testdownload/Test2Lettering.rfm"),
                ),
                DesignDefinition::new(
                    "Arch Oval",
                    format!("{SAMPLE_BASE}/testdownload/arch_oval.rfm"),
                ),
            ],
            images: vec![
                ImageDefinition::new("Blank Image", "", 0.0),
                ImageDefinition::new(
                    "White TShirt",
                    format!("{SAMPLE_BASE}/rendercache/designcache/WhiteTShirt.png"),
                    garment_width,
                )
                .with_origin_offset(Point::new(-600.0, 800.0)),
                ImageDefinition::new(
                    "Blue TShirt",
                    format!("{SAMPLE_BASE}/rendercache/designcache/Blue_Tshirt.jpg"),
                    garment_width,
                ),
            ],
            alphabet_locator: format!("{SAMPLE_BASE}/testdownload/Astra.alp.rfm"),
        }
    }

    pub fn design(&self, index: usize) -> Result<&DesignDefinition, CatalogError> {
        self.designs
            .get(index)
            .ok_or(CatalogError::IndexOutOfRange {
                kind: ResourceKind::Design,
                index,
                len: self.designs.len(),
            })
    }

    pub fn image(&self, index: usize) -> Result<&ImageDefinition, CatalogError> {
        self.images
            .get(index)
            .ok_or(CatalogError::IndexOutOfRange {
                kind: ResourceKind::Image,
                index,
                len: self.images.len(),
            })
    }

    /// Number of entries in the catalog for `kind`.
    pub fn len(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Design => self.designs.len(),
            ResourceKind::Image => self.images.len(),
        }
    }

    pub fn contains(&self, kind: ResourceKind, index: usize) -> bool {
        index < self.len(kind)
    }

    /// Locator of the entry at `index`.
    pub fn locator(&self, kind: ResourceKind, index: usize) -> Result<&str, CatalogError> {
        match kind {
            ResourceKind::Design => self.design(index).map(|d| d.locator.as_str()),
            ResourceKind::Image => self.image(index).map(|i| i.locator.as_str()),
        }
    }

    pub fn find_design_by_name(&self, name: &str) -> Option<usize> {
        self.designs.iter().position(|d| d.name == name)
    }

    pub fn find_image_by_name(&self, name: &str) -> Option<usize> {
        self.images.iter().position(|i| i.name == name)
    }

    /// Checks the structural rules the document relies on.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.designs.is_empty() {
            return Err(CatalogError::Invalid(
                "design catalog must not be empty".to_string(),
            ));
        }
        match self.images.first() {
            Some(first) if first.is_empty() => {}
            Some(_) => {
                return Err(CatalogError::Invalid(
                    "image catalog entry 0 is reserved for \"no image\"".to_string(),
                ))
            }
            None => {
                return Err(CatalogError::Invalid(
                    "image catalog must not be empty".to_string(),
                ))
            }
        }
        if let Some(bad) = self
            .images
            .iter()
            .find(|i| !i.is_empty() && i.placement_width <= 0.0)
        {
            return Err(CatalogError::Invalid(format!(
                "image '{}' needs a positive placement width",
                bad.name
            )));
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.designs.len(), 4);
        assert_eq!(catalog.images.len(), 3);
        assert!(catalog.images[0].is_empty());
        assert_eq!(catalog.images[1].placement_width, 5080.0);
    }

    #[test]
    fn test_out_of_range_lookup() {
        let catalog = Catalog::builtin();
        let err = catalog.design(9).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::IndexOutOfRange {
                kind: ResourceKind::Design,
                index: 9,
                len: 4
            }
        ));
        assert!(catalog.image(2).is_ok());
        assert!(!catalog.contains(ResourceKind::Image, 3));
    }

    #[test]
    fn test_find_by_name() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.find_design_by_name("Rainbow"), Some(1));
        assert_eq!(catalog.find_image_by_name("Blue TShirt"), Some(2));
        assert_eq!(catalog.find_design_by_name("Missing"), None);
    }

    #[test]
    fn test_reserved_blank_image() {
        let mut catalog = Catalog::builtin();
        catalog.images.remove(0);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_catalog_serde_roundtrip() {
        let catalog = Catalog::builtin();
        let json = serde_json::to_string(&catalog).expect("serialize");
        let back: Catalog = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, catalog);
    }
}
